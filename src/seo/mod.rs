//! SEO module - page metadata, structured data, sitemap and robots

mod meta;
mod schema;
mod sitemap;

pub use meta::{
    blog_post_metadata, generate, not_found_metadata, project_metadata, Metadata, OgImage,
    OgType, OpenGraph, PageSeo, TwitterCard, OG_IMAGE_HEIGHT, OG_IMAGE_WIDTH,
};
pub use schema::{
    blog_post_schema, breadcrumb_schema, organization_schema, project_schema, to_script_tag,
    website_schema, BlogPosting, BreadcrumbList, CreativeWork, Organization, WebSite,
};
pub use sitemap::{render_robots, render_sitemap, sitemap_urls, ChangeFreq, SitemapUrl};

use crate::config::SiteConfig;

/// Pages whose metadata does not depend on content
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StaticPage {
    Home,
    Projects,
    Blog,
    Team,
    Contact,
}

impl StaticPage {
    pub fn path(&self) -> &'static str {
        match self {
            StaticPage::Home => "/",
            StaticPage::Projects => "/projects",
            StaticPage::Blog => "/blog",
            StaticPage::Team => "/team",
            StaticPage::Contact => "/contact",
        }
    }

    /// Resolved metadata for the page
    pub fn metadata(&self, config: &SiteConfig) -> Metadata {
        let seo = match self {
            StaticPage::Home => PageSeo::new(
                format!("{} - {}", config.title, config.tagline),
                config.description.clone(),
            )
            .keywords(config.keywords.clone()),
            StaticPage::Projects => PageSeo::new(
                "Projects",
                "Explore our portfolio of creative projects including branding, web design, and development work.",
            ),
            StaticPage::Blog => PageSeo::new(
                "Blog - Insights & Trends",
                "Discover the latest insights, trends, and expert tips from our creative team on web design, development, branding, and digital strategy.",
            )
            .keywords([
                "design blog",
                "web development blog",
                "creative insights",
                "design trends",
                "development tips",
                "digital strategy",
                "UI/UX insights",
                "brand identity",
                "creative agency blog",
            ]),
            StaticPage::Team => PageSeo::new(
                "Team",
                "Meet our talented team of designers, developers, and strategists who bring your creative vision to life.",
            ),
            StaticPage::Contact => PageSeo::new(
                "Contact",
                "Get in touch with our creative team. We would love to hear about your project and discuss how we can help.",
            ),
        };
        generate(config, seo.canonical(self.path()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_pages() {
        let config = SiteConfig::default();

        let home = StaticPage::Home.metadata(&config);
        assert_eq!(home.title, "Nova Works - Creative Agency & Digital Solutions");
        assert_eq!(home.canonical.as_deref(), Some("https://novaworks.com"));
        assert_eq!(home.keywords.as_ref().map(Vec::len), Some(6));

        let team = StaticPage::Team.metadata(&config);
        assert_eq!(team.title, "Team | Nova Works");
        assert_eq!(team.canonical.as_deref(), Some("https://novaworks.com/team"));
    }
}
