//! Content module - typed CMS entities and the accessors that fetch them

mod de;
mod object;
mod post;
mod project;
pub mod repository;
mod team;

use chrono::{DateTime, Utc};
use serde_json::Value;

pub use object::{Category, ContentKind, ContentObject, ImageRef, Reference};
pub use post::{BlogPost, BlogPostMeta};
pub use project::{Project, ProjectMeta};
pub use repository::{ContentRepository, FetchStats, Fetched, SitemapEntry};
pub use team::{sort_by_display_order, SocialLink, TeamMember, TeamMemberMeta};

use crate::cms::CmsError;

/// Any content entity, dispatched on the object type
#[derive(Debug, Clone)]
pub enum Content {
    Project(Project),
    BlogPost(BlogPost),
    TeamMember(TeamMember),
}

impl Content {
    /// Decode a raw CMS object according to its `type`
    pub fn from_value(value: Value) -> Result<Self, CmsError> {
        let kind = value
            .get("type")
            .or_else(|| value.get("type_slug"))
            .and_then(Value::as_str)
            .ok_or_else(|| CmsError::Decode("object has no type".to_string()))?
            .parse::<ContentKind>()
            .map_err(CmsError::Decode)?;

        let decode_err = |e: serde_json::Error| CmsError::Decode(e.to_string());
        Ok(match kind {
            ContentKind::Project => {
                Content::Project(serde_json::from_value(value).map_err(decode_err)?)
            }
            ContentKind::BlogPost => {
                Content::BlogPost(serde_json::from_value(value).map_err(decode_err)?)
            }
            ContentKind::TeamMember => {
                Content::TeamMember(serde_json::from_value(value).map_err(decode_err)?)
            }
        })
    }

    pub fn kind(&self) -> ContentKind {
        match self {
            Content::Project(_) => ContentKind::Project,
            Content::BlogPost(_) => ContentKind::BlogPost,
            Content::TeamMember(_) => ContentKind::TeamMember,
        }
    }

    pub fn slug(&self) -> &str {
        match self {
            Content::Project(p) => &p.slug,
            Content::BlogPost(p) => &p.slug,
            Content::TeamMember(m) => &m.slug,
        }
    }

    /// Human-readable name
    pub fn display_name(&self) -> &str {
        match self {
            Content::Project(p) => &p.metadata.name,
            Content::BlogPost(p) => &p.metadata.title,
            Content::TeamMember(m) => &m.metadata.name,
        }
    }

    pub fn modified_at(&self) -> Option<DateTime<Utc>> {
        match self {
            Content::Project(p) => p.modified_at,
            Content::BlogPost(p) => p.modified_at,
            Content::TeamMember(m) => m.modified_at,
        }
    }

    /// Site path of the entity's page
    pub fn path(&self) -> String {
        match self {
            Content::Project(p) => crate::helpers::project_path(&p.slug),
            Content::BlogPost(p) => crate::helpers::blog_post_path(&p.slug),
            Content::TeamMember(_) => ContentKind::TeamMember.index_path().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_dispatch_on_type() {
        let content = Content::from_value(json!({
            "id": "1", "slug": "ada", "title": "Ada", "type": "team-members",
            "metadata": {"name": "Ada", "title": "Lead"}
        }))
        .unwrap();
        assert_eq!(content.kind(), ContentKind::TeamMember);
        assert_eq!(content.display_name(), "Ada");
        assert_eq!(content.path(), "/team");

        let content = Content::from_value(json!({
            "id": "2", "slug": "launch", "type_slug": "blog-posts",
            "metadata": {"title": "Launch"}
        }))
        .unwrap();
        assert_eq!(content.kind(), ContentKind::BlogPost);
        assert_eq!(content.path(), "/blog/launch");
    }

    #[test]
    fn test_unknown_or_malformed() {
        let unknown = json!({"id": "1", "slug": "x", "type": "pages", "metadata": {}});
        assert!(Content::from_value(unknown).is_err());
        assert!(Content::from_value(json!({"id": "1", "slug": "x", "metadata": {}})).is_err());
        let incomplete = json!({"id": "1", "slug": "x", "type": "projects", "metadata": {}});
        assert!(Content::from_value(incomplete).is_err());
    }
}
