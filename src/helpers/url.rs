//! URL helper functions

use crate::config::SiteConfig;

/// Generate a full URL including the domain
///
/// # Examples
/// ```ignore
/// full_url_for(&config, "/team") // -> "https://novaworks.com/team"
/// ```
pub fn full_url_for(config: &SiteConfig, path: &str) -> String {
    let base = config.url.trim_end_matches('/');
    let path = path.trim_start_matches('/');

    if path.is_empty() {
        base.to_string()
    } else {
        format!("{}/{}", base, path)
    }
}

/// Make a URL absolute unless it already is
pub fn absolute_url(config: &SiteConfig, path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        path.to_string()
    } else {
        full_url_for(config, path)
    }
}

/// Path of a project detail page
pub fn project_path(slug: &str) -> String {
    format!("/projects/{}", encode_segment(slug))
}

/// Path of a blog post page
pub fn blog_post_path(slug: &str) -> String {
    format!("/blog/{}", encode_segment(slug))
}

/// Encode a single URL path segment
pub fn encode_segment(segment: &str) -> String {
    percent_encoding::utf8_percent_encode(segment, SEGMENT).to_string()
}

const SEGMENT: &percent_encoding::AsciiSet = &percent_encoding::NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> SiteConfig {
        let mut config = SiteConfig::default();
        config.url = "https://example.com/".to_string();
        config
    }

    #[test]
    fn test_full_url_for() {
        let config = test_config();
        assert_eq!(full_url_for(&config, "/team"), "https://example.com/team");
        assert_eq!(full_url_for(&config, "/"), "https://example.com");
    }

    #[test]
    fn test_absolute_url_keeps_external() {
        let config = test_config();
        assert_eq!(
            absolute_url(&config, "https://cdn.example.com/a.jpg"),
            "https://cdn.example.com/a.jpg"
        );
        assert_eq!(
            absolute_url(&config, "/og-image.jpg"),
            "https://example.com/og-image.jpg"
        );
    }

    #[test]
    fn test_entity_paths() {
        assert_eq!(blog_post_path("design-trends-2024"), "/blog/design-trends-2024");
        assert_eq!(project_path("a b"), "/projects/a%20b");
    }
}
