//! schema.org structured data (JSON-LD)
//!
//! Each builder maps an entity or the site config onto a serde struct. Fields
//! the entity lacks are `None` and skipped on output rather than emitted as
//! empty strings or zero values.

use serde::Serialize;

use super::meta::{OG_IMAGE_HEIGHT, OG_IMAGE_WIDTH};
use crate::config::SiteConfig;
use crate::content::{BlogPost, Project};
use crate::helpers::{
    blog_post_path, full_url_for, image_url, join_keywords, project_path, Fit,
};

const CONTEXT: &str = "https://schema.org";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Person {
    #[serde(rename = "@type")]
    pub kind: &'static str,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl Person {
    fn new(name: impl Into<String>, url: Option<String>) -> Self {
        Self {
            kind: "Person",
            name: name.into(),
            url,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageObject {
    #[serde(rename = "@type")]
    pub kind: &'static str,
    pub url: String,
}

/// An organization mentioned by another object
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrganizationRef {
    #[serde(rename = "@type")]
    pub kind: &'static str,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo: Option<ImageObject>,
}

impl OrganizationRef {
    fn named(name: impl Into<String>) -> Self {
        Self {
            kind: "Organization",
            name: name.into(),
            logo: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WebPageRef {
    #[serde(rename = "@type")]
    pub kind: &'static str,
    #[serde(rename = "@id")]
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPosting {
    #[serde(rename = "@context")]
    pub context: &'static str,
    #[serde(rename = "@type")]
    pub kind: &'static str,
    pub headline: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub author: Person,
    pub publisher: OrganizationRef,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_published: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_modified: Option<String>,
    pub main_entity_of_page: WebPageRef,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub article_section: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keywords: Option<String>,
    pub word_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_required: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreativeWork {
    #[serde(rename = "@context")]
    pub context: &'static str,
    #[serde(rename = "@type")]
    pub kind: &'static str,
    pub name: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub creator: OrganizationRef,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_created: Option<String>,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub about: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keywords: Option<String>,
    pub client: OrganizationRef,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactPoint {
    #[serde(rename = "@type")]
    pub kind: &'static str,
    pub telephone: String,
    pub contact_type: String,
    pub area_served: String,
    pub available_language: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostalAddress {
    #[serde(rename = "@type")]
    pub kind: &'static str,
    pub address_country: String,
    pub address_region: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Place {
    #[serde(rename = "@type")]
    pub kind: &'static str,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    #[serde(rename = "@context")]
    pub context: &'static str,
    #[serde(rename = "@type")]
    pub kind: &'static str,
    pub name: String,
    pub description: String,
    pub url: String,
    pub logo: String,
    pub same_as: Vec<String>,
    pub contact_point: ContactPoint,
    pub address: PostalAddress,
    pub founding_date: String,
    pub founder: Person,
    pub number_of_employees: String,
    pub knows_about: Vec<String>,
    pub service_area: Place,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchAction {
    #[serde(rename = "@type")]
    pub kind: &'static str,
    pub target: String,
    #[serde(rename = "query-input")]
    pub query_input: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebSite {
    #[serde(rename = "@context")]
    pub context: &'static str,
    #[serde(rename = "@type")]
    pub kind: &'static str,
    pub name: String,
    pub url: String,
    pub description: String,
    pub publisher: OrganizationRef,
    pub potential_action: SearchAction,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListItem {
    #[serde(rename = "@type")]
    pub kind: &'static str,
    pub position: usize,
    pub name: String,
    pub item: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BreadcrumbList {
    #[serde(rename = "@context")]
    pub context: &'static str,
    #[serde(rename = "@type")]
    pub kind: &'static str,
    pub item_list_element: Vec<ListItem>,
}

fn schema_image(base: &str) -> Option<String> {
    let url = image_url(base, OG_IMAGE_WIDTH, OG_IMAGE_HEIGHT, Fit::Crop);
    (!url.is_empty()).then_some(url)
}

fn keywords(items: &[String]) -> Option<String> {
    let joined = join_keywords(items);
    (!joined.is_empty()).then_some(joined)
}

/// `BlogPosting` for a blog post page
pub fn blog_post_schema(config: &SiteConfig, post: &BlogPost) -> BlogPosting {
    let meta = &post.metadata;

    let author = match meta.author() {
        Some(member) => Person::new(
            member.metadata.name.clone(),
            Some(
                member
                    .metadata
                    .portfolio
                    .clone()
                    .unwrap_or_else(|| full_url_for(config, "/team")),
            ),
        ),
        None => Person::new(config.team_name(), Some(full_url_for(config, "/team"))),
    };

    BlogPosting {
        context: CONTEXT,
        kind: "BlogPosting",
        headline: meta.title.clone(),
        description: meta.excerpt.clone(),
        image: schema_image(meta.featured_image.base()),
        author,
        publisher: OrganizationRef {
            logo: Some(ImageObject {
                kind: "ImageObject",
                url: config.logo_url(),
            }),
            ..OrganizationRef::named(config.title.clone())
        },
        date_published: post.created_at.map(|t| t.to_rfc3339()),
        date_modified: post.modified_at.map(|t| t.to_rfc3339()),
        main_entity_of_page: WebPageRef {
            kind: "WebPage",
            id: full_url_for(config, &blog_post_path(&post.slug)),
        },
        article_section: meta.category_label().map(String::from),
        keywords: keywords(&meta.tags),
        word_count: meta.word_count(),
        time_required: meta.reading_time.map(|minutes| format!("PT{}M", minutes)),
    }
}

/// `CreativeWork` for a project page
pub fn project_schema(config: &SiteConfig, project: &Project) -> CreativeWork {
    let meta = &project.metadata;
    CreativeWork {
        context: CONTEXT,
        kind: "CreativeWork",
        name: meta.name.clone(),
        description: meta.short_description.clone(),
        image: schema_image(meta.featured_image.base()),
        creator: OrganizationRef::named(config.title.clone()),
        date_created: meta.completion_date.map(|d| d.to_string()),
        url: full_url_for(config, &project_path(&project.slug)),
        about: meta.category_label().map(String::from),
        keywords: keywords(&meta.technologies),
        client: OrganizationRef::named(meta.client.clone()),
    }
}

/// Site-wide `Organization`
pub fn organization_schema(config: &SiteConfig) -> Organization {
    let org = &config.organization;
    Organization {
        context: CONTEXT,
        kind: "Organization",
        name: config.title.clone(),
        description: org.description.clone(),
        url: config.url.clone(),
        logo: config.logo_url(),
        same_as: org.same_as.clone(),
        contact_point: ContactPoint {
            kind: "ContactPoint",
            telephone: org.telephone.clone(),
            contact_type: org.contact_type.clone(),
            area_served: org.area_served.clone(),
            available_language: org.available_language.clone(),
        },
        address: PostalAddress {
            kind: "PostalAddress",
            address_country: org.address_country.clone(),
            address_region: org.address_region.clone(),
        },
        founding_date: org.founding_date.clone(),
        founder: Person::new(org.founder.clone(), None),
        number_of_employees: org.number_of_employees.clone(),
        knows_about: org.knows_about.clone(),
        service_area: Place {
            kind: "Place",
            name: org.service_area.clone(),
        },
    }
}

/// Site-wide `WebSite` with a search action
pub fn website_schema(config: &SiteConfig) -> WebSite {
    WebSite {
        context: CONTEXT,
        kind: "WebSite",
        name: config.title.clone(),
        url: config.url.clone(),
        description: config.organization.description.clone(),
        publisher: OrganizationRef::named(config.title.clone()),
        potential_action: SearchAction {
            kind: "SearchAction",
            target: format!("{}?q={{search_term_string}}", full_url_for(config, "/search")),
            query_input: "required name=search_term_string",
        },
    }
}

/// `BreadcrumbList` from (name, site path) pairs, home first
pub fn breadcrumb_schema(config: &SiteConfig, trail: &[(&str, &str)]) -> BreadcrumbList {
    BreadcrumbList {
        context: CONTEXT,
        kind: "BreadcrumbList",
        item_list_element: trail
            .iter()
            .enumerate()
            .map(|(i, (name, path))| ListItem {
                kind: "ListItem",
                position: i + 1,
                name: name.to_string(),
                item: full_url_for(config, path),
            })
            .collect(),
    }
}

/// Render a schema as an `application/ld+json` script element
pub fn to_script_tag<T: Serialize>(schema: &T) -> serde_json::Result<String> {
    let json = serde_json::to_string(schema)?.replace("</", "<\\/");
    Ok(format!(
        r#"<script type="application/ld+json">{}</script>"#,
        json
    ))
}
