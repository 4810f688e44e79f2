//! List site content

use anyhow::Result;
use std::path::Path;

use crate::content::{Content, ContentKind, ContentRepository, Fetched};
use crate::helpers::reading_time;
use crate::Site;

/// List CMS content by type (`projects`, `posts`, `team` or `all`)
pub async fn run(site: &Site, content_type: &str, fixtures: Option<&Path>) -> Result<()> {
    let kinds = kinds(content_type)?;
    let backend = site.backend(fixtures)?;
    let repo = site.repository(backend.source());

    for kind in kinds {
        print!("{}", listing(&repo, kind).await?);
    }

    Ok(())
}

fn kinds(content_type: &str) -> Result<Vec<ContentKind>> {
    if content_type == "all" {
        return Ok(ContentKind::ALL.to_vec());
    }
    content_type
        .parse::<ContentKind>()
        .map(|kind| vec![kind])
        .map_err(|e| anyhow::anyhow!("{} (expected projects, posts, team or all)", e))
}

async fn listing(repo: &ContentRepository, kind: ContentKind) -> Result<String> {
    let items = match repo.all(kind).await {
        Fetched::Failed(err) => {
            anyhow::bail!("Failed to fetch {}: {}", kind, err)
        }
        fetched => fetched.into_list(),
    };

    let mut out = format!("{} ({}):\n", kind, items.len());
    for item in &items {
        let date = item
            .modified_at()
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "-".to_string());
        out.push_str(&format!(
            "  {}{} - {} [{}]{}\n",
            date,
            marker(item),
            item.display_name(),
            item.path(),
            minutes(item)
        ));
    }
    Ok(out)
}

/// Reading time of a post; estimated from the body when the CMS has none
fn minutes(item: &Content) -> String {
    match item {
        Content::BlogPost(post) => {
            let meta = &post.metadata;
            match meta.reading_time {
                Some(n) => format!(" {} min", n),
                None => format!(" ~{} min", reading_time(&meta.content)),
            }
        }
        _ => String::new(),
    }
}

/// Featured entities are starred
fn marker(item: &Content) -> &'static str {
    let featured = match item {
        Content::Project(p) => p.metadata.featured,
        Content::BlogPost(p) => p.metadata.featured,
        Content::TeamMember(_) => false,
    };
    if featured {
        " *"
    } else {
        ""
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::sample_repository;

    #[test]
    fn test_kinds() {
        assert_eq!(kinds("all").unwrap().len(), 3);
        assert_eq!(kinds("posts").unwrap(), vec![ContentKind::BlogPost]);
        assert!(kinds("pages").is_err());
    }

    #[tokio::test]
    async fn test_listing() {
        let repo = sample_repository();
        let out = listing(&repo, ContentKind::TeamMember).await.unwrap();
        assert!(out.starts_with("team-members (4):\n"));
        assert!(out.contains("2024-02-01 - Ada Park [/team]"));

        let out = listing(&repo, ContentKind::Project).await.unwrap();
        assert!(out.contains(" * - Acme Rebrand [/projects/acme-rebrand]\n"));

        let out = listing(&repo, ContentKind::BlogPost).await.unwrap();
        assert!(out.contains("Scaling Design Systems [/blog/scaling-design-systems] 8 min\n"));
        assert!(out.contains("Design Trends 2024 [/blog/design-trends-2024] ~1 min\n"));
    }
}
