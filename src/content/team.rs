//! Team member model

use serde::{Deserialize, Serialize};

use super::de;
use super::object::{ContentObject, ImageRef};

/// A team member
pub type TeamMember = ContentObject<TeamMemberMeta>;

/// Team member metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamMemberMeta {
    pub name: String,

    /// Job title
    pub title: String,

    /// Rich-text bio (HTML)
    #[serde(default, deserialize_with = "de::null_default")]
    pub bio: String,

    #[serde(default, deserialize_with = "de::null_default")]
    pub photo: ImageRef,

    #[serde(default, deserialize_with = "de::optional_string")]
    pub email: Option<String>,

    #[serde(default, deserialize_with = "de::optional_string")]
    pub linkedin: Option<String>,

    #[serde(default, deserialize_with = "de::optional_string")]
    pub twitter: Option<String>,

    #[serde(default, deserialize_with = "de::optional_string")]
    pub portfolio: Option<String>,

    #[serde(default, deserialize_with = "de::null_default")]
    pub skills: Vec<String>,

    /// Years of experience
    #[serde(default, deserialize_with = "de::optional_number")]
    pub experience: Option<u32>,

    /// Display position; lower first, unset last
    #[serde(default, deserialize_with = "de::optional_number")]
    pub order: Option<i64>,
}

/// A contact or social link of a team member
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SocialLink {
    pub kind: &'static str,
    pub label: String,
    pub href: String,
}

impl TeamMemberMeta {
    /// Links that are set, in display order
    pub fn links(&self) -> Vec<SocialLink> {
        let mut links = Vec::new();
        let mut push = |kind: &'static str, label: &str, href: String| {
            links.push(SocialLink {
                kind,
                label: format!("{} on {}", self.name, label),
                href,
            });
        };

        if let Some(url) = &self.linkedin {
            push("linkedin", "LinkedIn", url.clone());
        }
        if let Some(url) = &self.twitter {
            push("twitter", "Twitter", url.clone());
        }
        if let Some(url) = &self.portfolio {
            push("portfolio", "their portfolio", url.clone());
        }
        if let Some(email) = &self.email {
            push("email", "email", format!("mailto:{}", email));
        }

        links
    }
}

/// Stable sort by display order; members without an order go last
pub fn sort_by_display_order(members: &mut [TeamMember]) {
    members.sort_by_key(|m| (m.metadata.order.is_none(), m.metadata.order));
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn member(slug: &str, order: Option<i64>) -> TeamMember {
        serde_json::from_value(json!({
            "id": slug, "slug": slug, "title": slug, "type": "team-members",
            "metadata": {"name": slug, "title": "Designer", "order": order}
        }))
        .unwrap()
    }

    #[test]
    fn test_sort_by_display_order() {
        let mut members = vec![
            member("c", Some(3)),
            member("none", None),
            member("a", Some(1)),
            member("b", Some(2)),
        ];
        sort_by_display_order(&mut members);
        let slugs: Vec<_> = members.iter().map(|m| m.slug.as_str()).collect();
        assert_eq!(slugs, vec!["a", "b", "c", "none"]);
    }

    #[test]
    fn test_float_order_sorts_like_integer() {
        let floated: TeamMember = serde_json::from_value(json!({
            "id": "b", "slug": "b", "title": "b", "type": "team-members",
            "metadata": {"name": "b", "title": "Designer", "order": 2.0}
        }))
        .unwrap();
        assert_eq!(floated.metadata.order, Some(2));

        let mut members = vec![floated, member("c", Some(3)), member("a", Some(1))];
        sort_by_display_order(&mut members);
        let slugs: Vec<_> = members.iter().map(|m| m.slug.as_str()).collect();
        assert_eq!(slugs, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_unordered_members_keep_relative_order() {
        let mut members = vec![member("x", None), member("a", Some(1)), member("y", None)];
        sort_by_display_order(&mut members);
        let slugs: Vec<_> = members.iter().map(|m| m.slug.as_str()).collect();
        assert_eq!(slugs, vec!["a", "x", "y"]);
    }

    #[test]
    fn test_links_skip_unset() {
        let mut m = member("ada", None);
        m.metadata.linkedin = Some("https://linkedin.com/in/ada".into());
        m.metadata.email = Some("ada@novaworks.com".into());

        let links = m.metadata.links();
        assert_eq!(links.len(), 2);
        assert_eq!(links[0].kind, "linkedin");
        assert_eq!(links[1].href, "mailto:ada@novaworks.com");
    }

    #[test]
    fn test_blank_optional_fields() {
        let m: TeamMember = serde_json::from_value(json!({
            "id": "1", "slug": "bo", "title": "Bo", "type": "team-members",
            "metadata": {"name": "Bo", "title": "Dev", "bio": null, "photo": null,
                         "twitter": "", "skills": null, "order": ""}
        }))
        .unwrap();
        assert!(m.metadata.twitter.is_none());
        assert!(m.metadata.skills.is_empty());
        assert!(m.metadata.order.is_none());
        assert!(m.metadata.photo.is_empty());
        assert!(m.metadata.links().is_empty());
    }
}
