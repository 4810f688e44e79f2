//! Page metadata: title, description, canonical URL and social preview tags

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use crate::config::SiteConfig;
use crate::content::{BlogPost, Project};
use crate::helpers::{
    absolute_url, blog_post_path, dedup_keywords, full_url_for, html_escape, image_url,
    meta_name, meta_property, Fit,
};

/// Width and height of social preview images
pub const OG_IMAGE_WIDTH: u32 = 1200;
pub const OG_IMAGE_HEIGHT: u32 = 630;

const INDEX_ROBOTS: &str = "index, follow, max-video-preview:-1, max-image-preview:large, max-snippet:-1";
const NOINDEX_ROBOTS: &str = "noindex, follow";

/// Open Graph object type
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OgType {
    #[default]
    Website,
    Article,
}

impl OgType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OgType::Website => "website",
            OgType::Article => "article",
        }
    }
}

/// What a page says about itself
#[derive(Debug, Clone, Default)]
pub struct PageSeo {
    pub title: String,
    pub description: String,
    pub keywords: Vec<String>,
    /// Site-relative canonical path
    pub canonical: Option<String>,
    /// Preview image; relative paths are resolved against the site URL
    pub og_image: Option<String>,
    pub og_type: OgType,
    pub published_time: Option<String>,
    pub modified_time: Option<String>,
    pub author: Option<String>,
    pub section: Option<String>,
    pub tags: Vec<String>,
    /// Keep the page out of search indexes
    pub noindex: bool,
}

impl PageSeo {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            ..Default::default()
        }
    }

    pub fn canonical(mut self, path: impl Into<String>) -> Self {
        self.canonical = Some(path.into());
        self
    }

    pub fn keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords = keywords.into_iter().map(Into::into).collect();
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OgImage {
    pub url: String,
    pub width: u32,
    pub height: u32,
    pub alt: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OpenGraph {
    pub title: String,
    pub description: String,
    pub og_type: OgType,
    pub url: Option<String>,
    pub site_name: String,
    pub locale: String,
    pub image: OgImage,
    pub published_time: Option<String>,
    pub modified_time: Option<String>,
    pub authors: Vec<String>,
    pub section: Option<String>,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TwitterCard {
    pub card: &'static str,
    pub title: String,
    pub description: String,
    pub image: String,
    pub creator: String,
}

/// Everything that goes into a page's `<head>`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metadata {
    pub title: String,
    pub description: String,
    pub keywords: Option<Vec<String>>,
    pub authors: Vec<String>,
    pub canonical: Option<String>,
    pub robots: &'static str,
    pub open_graph: OpenGraph,
    pub twitter: TwitterCard,
    pub google_verification: Option<String>,
}

/// Resolve page SEO input against the site defaults
pub fn generate(config: &SiteConfig, seo: PageSeo) -> Metadata {
    let title = if seo.title.contains(&config.title) {
        seo.title.clone()
    } else {
        format!("{} | {}", seo.title, config.title)
    };

    let description = if seo.description.trim().is_empty() {
        config.description.clone()
    } else {
        seo.description
    };

    let keywords = dedup_keywords(seo.keywords);
    let authors = vec![seo.author.unwrap_or_else(|| config.title.clone())];
    let canonical = seo.canonical.map(|path| full_url_for(config, &path));
    let image = absolute_url(config, seo.og_image.as_deref().unwrap_or(&config.og_image));

    let open_graph = OpenGraph {
        title: title.clone(),
        description: description.clone(),
        og_type: seo.og_type,
        url: canonical.clone(),
        site_name: config.title.clone(),
        locale: "en_US".to_string(),
        image: OgImage {
            url: image.clone(),
            width: OG_IMAGE_WIDTH,
            height: OG_IMAGE_HEIGHT,
            alt: seo.title,
        },
        published_time: seo.published_time,
        modified_time: seo.modified_time,
        authors: authors.clone(),
        section: seo.section,
        tags: seo.tags,
    };

    let twitter = TwitterCard {
        card: "summary_large_image",
        title: title.clone(),
        description: description.clone(),
        image,
        creator: config.twitter_handle.clone(),
    };

    Metadata {
        title,
        description,
        keywords: (!keywords.is_empty()).then_some(keywords),
        authors,
        canonical,
        robots: if seo.noindex { NOINDEX_ROBOTS } else { INDEX_ROBOTS },
        open_graph,
        twitter,
        google_verification: config.verification.google.clone(),
    }
}

impl Metadata {
    /// Render the head tags, one per line
    pub fn render_head(&self) -> String {
        let mut tags = vec![format!("<title>{}</title>", html_escape(&self.title))];
        tags.push(meta_name("description", &self.description));
        if let Some(keywords) = &self.keywords {
            tags.push(meta_name("keywords", &keywords.join(", ")));
        }
        for author in &self.authors {
            tags.push(meta_name("author", author));
        }
        tags.push(meta_name("robots", self.robots));
        if let Some(canonical) = &self.canonical {
            tags.push(format!(r#"<link rel="canonical" href="{}">"#, html_escape(canonical)));
        }

        let og = &self.open_graph;
        tags.push(meta_property("og:title", &og.title));
        tags.push(meta_property("og:description", &og.description));
        tags.push(meta_property("og:type", og.og_type.as_str()));
        if let Some(url) = &og.url {
            tags.push(meta_property("og:url", url));
        }
        tags.push(meta_property("og:site_name", &og.site_name));
        tags.push(meta_property("og:locale", &og.locale));
        tags.push(meta_property("og:image", &og.image.url));
        tags.push(meta_property("og:image:width", &og.image.width.to_string()));
        tags.push(meta_property("og:image:height", &og.image.height.to_string()));
        tags.push(meta_property("og:image:alt", &og.image.alt));
        if og.og_type == OgType::Article {
            if let Some(time) = &og.published_time {
                tags.push(meta_property("article:published_time", time));
            }
            if let Some(time) = &og.modified_time {
                tags.push(meta_property("article:modified_time", time));
            }
            for author in &og.authors {
                tags.push(meta_property("article:author", author));
            }
            if let Some(section) = &og.section {
                tags.push(meta_property("article:section", section));
            }
            for tag in &og.tags {
                tags.push(meta_property("article:tag", tag));
            }
        }

        let tw = &self.twitter;
        tags.push(meta_name("twitter:card", tw.card));
        tags.push(meta_name("twitter:title", &tw.title));
        tags.push(meta_name("twitter:description", &tw.description));
        tags.push(meta_name("twitter:image", &tw.image));
        tags.push(meta_name("twitter:creator", &tw.creator));

        if let Some(token) = &self.google_verification {
            tags.push(meta_name("google-site-verification", token));
        }

        tags.join("\n")
    }
}

fn timestamp(value: Option<DateTime<Utc>>) -> Option<String> {
    value.map(|t| t.to_rfc3339_opts(SecondsFormat::Secs, true))
}

/// Social preview URL for a CMS image, if it has one
fn preview_image(base: &str) -> Option<String> {
    let url = image_url(base, OG_IMAGE_WIDTH, OG_IMAGE_HEIGHT, Fit::Crop);
    (!url.is_empty()).then_some(url)
}

/// Metadata for a blog post page
pub fn blog_post_metadata(config: &SiteConfig, post: &BlogPost) -> Metadata {
    let meta = &post.metadata;

    let mut keywords = meta.tags.clone();
    if let Some(category) = meta.category_label() {
        keywords.push(category.to_lowercase());
    }
    keywords.extend(["blog", "insights", "creative agency"].map(String::from));

    generate(
        config,
        PageSeo {
            title: meta.title.clone(),
            description: meta.excerpt.clone(),
            keywords,
            canonical: Some(blog_post_path(&post.slug)),
            og_image: preview_image(meta.featured_image.base()),
            og_type: OgType::Article,
            published_time: timestamp(post.created_at),
            modified_time: timestamp(post.modified_at),
            author: meta.author().map(|a| a.metadata.name.clone()),
            section: meta.category_label().map(String::from),
            tags: meta.tags.clone(),
            noindex: false,
        },
    )
}

/// Metadata for a project page
pub fn project_metadata(config: &SiteConfig, project: &Project) -> Metadata {
    let meta = &project.metadata;

    let mut keywords = meta.technologies.clone();
    if let Some(category) = meta.category_label() {
        keywords.push(category.to_lowercase());
    }
    keywords.extend(["portfolio", "case study"].map(String::from));
    keywords.push(meta.client.to_lowercase());

    generate(
        config,
        PageSeo {
            title: meta.name.clone(),
            description: meta.short_description.clone(),
            keywords,
            canonical: Some(crate::helpers::project_path(&project.slug)),
            og_image: preview_image(meta.featured_image.base()),
            og_type: OgType::Article,
            published_time: meta.completion_date.map(|d| d.to_string()),
            modified_time: timestamp(project.modified_at),
            author: None,
            section: meta.category_label().map(String::from),
            tags: meta.technologies.clone(),
            noindex: false,
        },
    )
}

/// Metadata for a missing entity or unknown route
pub fn not_found_metadata(config: &SiteConfig, what: &str) -> Metadata {
    generate(
        config,
        PageSeo {
            noindex: true,
            ..PageSeo::new(
                format!("{} Not Found - {}", what, config.title),
                String::new(),
            )
        },
    )
}
