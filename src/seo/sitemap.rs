//! sitemap.xml and robots.txt

use chrono::{DateTime, Utc};

use crate::config::SiteConfig;
use crate::content::{ContentKind, ContentRepository, Fetched, SitemapEntry};
use crate::helpers::{blog_post_path, date_xml, full_url_for, project_path};

/// How often a page is expected to change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeFreq {
    Daily,
    Weekly,
    Monthly,
}

impl ChangeFreq {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeFreq::Daily => "daily",
            ChangeFreq::Weekly => "weekly",
            ChangeFreq::Monthly => "monthly",
        }
    }
}

/// One `<url>` entry
#[derive(Debug, Clone, PartialEq)]
pub struct SitemapUrl {
    pub loc: String,
    pub last_modified: DateTime<Utc>,
    pub change_freq: ChangeFreq,
    pub priority: f32,
}

const STATIC_PAGES: &[(&str, ChangeFreq, f32)] = &[
    ("/", ChangeFreq::Weekly, 1.0),
    ("/projects", ChangeFreq::Weekly, 0.8),
    ("/blog", ChangeFreq::Daily, 0.8),
    ("/team", ChangeFreq::Monthly, 0.6),
    ("/contact", ChangeFreq::Monthly, 0.5),
];

/// Static pages plus one entry per project and blog post
///
/// If either collection cannot be fetched, only the static pages are listed.
pub async fn sitemap_urls(config: &SiteConfig, repo: &ContentRepository) -> Vec<SitemapUrl> {
    let now = Utc::now();
    let mut urls: Vec<SitemapUrl> = STATIC_PAGES
        .iter()
        .map(|(path, change_freq, priority)| SitemapUrl {
            loc: full_url_for(config, path),
            last_modified: now,
            change_freq: *change_freq,
            priority: *priority,
        })
        .collect();

    let (projects, posts) = tokio::join!(
        repo.sitemap_slugs(ContentKind::Project),
        repo.sitemap_slugs(ContentKind::BlogPost)
    );

    let (projects, posts) = match (projects, posts) {
        (Fetched::Found(projects), Fetched::Found(posts)) => (projects, posts),
        _ => {
            tracing::warn!("Sitemap lists static pages only; content could not be fetched");
            return urls;
        }
    };

    let entry =
        |item: SitemapEntry, path: String, change_freq: ChangeFreq, priority: f32| SitemapUrl {
            loc: full_url_for(config, &path),
            last_modified: item.modified_at.unwrap_or(now),
            change_freq,
            priority,
        };

    for item in projects {
        let path = project_path(&item.slug);
        urls.push(entry(item, path, ChangeFreq::Monthly, 0.7));
    }
    for item in posts {
        let path = blog_post_path(&item.slug);
        urls.push(entry(item, path, ChangeFreq::Weekly, 0.6));
    }

    urls
}

/// Render the sitemap document
pub fn render_sitemap(urls: &[SitemapUrl]) -> String {
    let mut xml = String::new();
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    xml.push('\n');
    xml.push_str(r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">"#);
    xml.push('\n');

    for url in urls {
        xml.push_str("  <url>\n");
        xml.push_str(&format!("    <loc>{}</loc>\n", escape_xml(&url.loc)));
        xml.push_str(&format!(
            "    <lastmod>{}</lastmod>\n",
            date_xml(&url.last_modified)
        ));
        xml.push_str(&format!(
            "    <changefreq>{}</changefreq>\n",
            url.change_freq.as_str()
        ));
        xml.push_str(&format!("    <priority>{:.1}</priority>\n", url.priority));
        xml.push_str("  </url>\n");
    }

    xml.push_str("</urlset>\n");
    xml
}

/// Render robots.txt
pub fn render_robots(config: &SiteConfig) -> String {
    let mut lines = vec!["User-agent: *".to_string(), "Allow: /".to_string()];
    for prefix in ["/admin/", "/api/", "/_next/"] {
        lines.push(format!("Disallow: {}", prefix));
    }
    lines.push(String::new());
    lines.push(format!("Sitemap: {}", full_url_for(config, "/sitemap.xml")));
    lines.push(format!("Host: {}", full_url_for(config, "/")));
    lines.push(String::new());
    lines.join("\n")
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
