//! View models handed to the templates
//!
//! Each struct is the display shape of one card or detail section. Image URLs
//! are already templated for the CDN, dates are formatted, and badge rows are
//! truncated, so the templates only lay things out.

use chrono::Utc;
use serde::Serialize;

use crate::config::SiteConfig;
use crate::contact::ContactForm;
use crate::content::{BlogPost, Category, Project, SocialLink, TeamMember};
use crate::helpers::{
    blog_post_path, cropped, date_xml, encode_segment, format_date, format_datetime,
    project_path, truncate, BadgeList,
};
use crate::theme::Theme;

/// Technologies shown on a project card before "+N more"
pub const CARD_TECHNOLOGIES: usize = 3;
/// Skills shown on a team card before "+N more"
pub const CARD_SKILLS: usize = 2;
/// Excerpt length on post cards
pub const CARD_EXCERPT_CHARS: usize = 160;

#[derive(Debug, Clone, Serialize)]
pub struct NavItem {
    pub name: &'static str,
    pub path: &'static str,
    pub active: bool,
}

const NAV: &[(&str, &str)] = &[
    ("Home", "/"),
    ("Projects", "/projects"),
    ("Blog", "/blog"),
    ("Team", "/team"),
    ("Contact", "/contact"),
];

pub fn nav(current_path: &str) -> Vec<NavItem> {
    NAV.iter()
        .map(|(name, path)| NavItem {
            name,
            path,
            active: if *path == "/" {
                current_path == "/"
            } else {
                current_path.starts_with(path)
            },
        })
        .collect()
}

#[derive(Debug, Clone, Serialize)]
pub struct SiteView {
    pub title: String,
    pub tagline: String,
    pub description: String,
    pub language: String,
    pub logo: String,
    pub year: String,
    pub emails: Vec<String>,
    pub phones: Vec<String>,
    pub address: Vec<String>,
    pub office_hours: Vec<String>,
    pub same_as: Vec<String>,
}

impl SiteView {
    pub fn new(config: &SiteConfig) -> Self {
        Self {
            title: config.title.clone(),
            tagline: config.tagline.clone(),
            description: config.description.clone(),
            language: config.language.clone(),
            logo: config.logo.clone(),
            year: Utc::now().format("%Y").to_string(),
            emails: config.contact.emails.clone(),
            phones: config.contact.phones.clone(),
            address: config.contact.address.clone(),
            office_hours: config.contact.office_hours.clone(),
            same_as: config.organization.same_as.clone(),
        }
    }
}

/// Shared frame of every page
#[derive(Debug, Clone, Serialize)]
pub struct LayoutView {
    pub site: SiteView,
    pub head: String,
    pub structured_data: Vec<String>,
    pub theme: Theme,
    pub next_theme: Theme,
    pub nav: Vec<NavItem>,
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryView {
    pub key: String,
    pub label: String,
    pub path: String,
}

impl CategoryView {
    pub fn for_projects(category: &Category) -> Self {
        Self::new(category, "/projects")
    }

    pub fn for_posts(category: &Category) -> Self {
        Self::new(category, "/blog")
    }

    fn new(category: &Category, base: &str) -> Self {
        Self {
            key: category.key.clone(),
            label: category.value.clone(),
            path: format!("{}/category/{}", base, encode_segment(&category.key)),
        }
    }
}

/// Distinct categories in first-seen order
pub fn distinct_categories<'a, I>(
    categories: I,
    to_view: fn(&Category) -> CategoryView,
) -> Vec<CategoryView>
where
    I: IntoIterator<Item = &'a Category>,
{
    let mut seen: Vec<CategoryView> = Vec::new();
    for category in categories {
        if !seen.iter().any(|c| c.key == category.key) {
            seen.push(to_view(category));
        }
    }
    seen
}

#[derive(Debug, Clone, Serialize)]
pub struct ProjectCard {
    pub slug: String,
    pub path: String,
    pub name: String,
    pub client: String,
    pub short_description: String,
    pub image: String,
    pub category: Option<CategoryView>,
    pub technologies: BadgeList,
    pub more_technologies: Option<String>,
    pub featured: bool,
}

impl From<&Project> for ProjectCard {
    fn from(project: &Project) -> Self {
        let meta = &project.metadata;
        let technologies = BadgeList::truncated(&meta.technologies, CARD_TECHNOLOGIES);
        Self {
            slug: project.slug.clone(),
            path: project_path(&project.slug),
            name: meta.name.clone(),
            client: meta.client.clone(),
            short_description: meta.short_description.clone(),
            image: cropped(meta.featured_image.base(), 600, 400),
            category: meta.category.as_ref().map(CategoryView::for_projects),
            more_technologies: technologies.more_label(),
            technologies,
            featured: meta.featured,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProjectDetail {
    pub name: String,
    pub client: String,
    pub short_description: String,
    pub full_description: String,
    pub image: String,
    pub category: Option<CategoryView>,
    pub technologies: Vec<String>,
    pub gallery: Vec<String>,
    pub project_url: Option<String>,
    pub completed: Option<String>,
    pub completed_iso: Option<String>,
}

impl From<&Project> for ProjectDetail {
    fn from(project: &Project) -> Self {
        let meta = &project.metadata;
        Self {
            name: meta.name.clone(),
            client: meta.client.clone(),
            short_description: meta.short_description.clone(),
            full_description: meta.full_description.clone(),
            image: cropped(meta.featured_image.base(), 1200, 600),
            category: meta.category.as_ref().map(CategoryView::for_projects),
            technologies: meta.technologies.clone(),
            gallery: meta
                .gallery_images()
                .map(|img| cropped(img.base(), 800, 600))
                .collect(),
            project_url: meta.project_url.clone(),
            completed: meta.completion_date.as_ref().map(format_date),
            completed_iso: meta.completion_date.map(|d| d.to_string()),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AuthorView {
    pub name: String,
    pub title: String,
    pub photo: String,
}

impl From<&TeamMember> for AuthorView {
    fn from(member: &TeamMember) -> Self {
        Self {
            name: member.metadata.name.clone(),
            title: member.metadata.title.clone(),
            photo: cropped(member.metadata.photo.base(), 80, 80),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PostCard {
    pub slug: String,
    pub path: String,
    pub title: String,
    pub excerpt: String,
    pub image: String,
    pub category: Option<CategoryView>,
    pub date: Option<String>,
    pub date_iso: Option<String>,
    pub reading_time: Option<u32>,
    pub author: Option<AuthorView>,
}

impl From<&BlogPost> for PostCard {
    fn from(post: &BlogPost) -> Self {
        let meta = &post.metadata;
        Self {
            slug: post.slug.clone(),
            path: blog_post_path(&post.slug),
            title: meta.title.clone(),
            excerpt: truncate(&meta.excerpt, CARD_EXCERPT_CHARS),
            image: cropped(meta.featured_image.base(), 600, 400),
            category: meta.category.as_ref().map(CategoryView::for_posts),
            date: post.created_at.as_ref().map(format_datetime),
            date_iso: post.created_at.as_ref().map(date_xml),
            reading_time: meta.reading_time,
            author: meta.author().map(AuthorView::from),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PostDetail {
    pub title: String,
    pub excerpt: String,
    pub content: String,
    pub image: String,
    pub category: Option<CategoryView>,
    pub date: Option<String>,
    pub date_iso: Option<String>,
    pub reading_time: Option<u32>,
    pub tags: Vec<String>,
    pub author: Option<AuthorView>,
}

impl From<&BlogPost> for PostDetail {
    fn from(post: &BlogPost) -> Self {
        let meta = &post.metadata;
        Self {
            title: meta.title.clone(),
            excerpt: meta.excerpt.clone(),
            content: meta.content.clone(),
            image: cropped(meta.featured_image.base(), 1200, 600),
            category: meta.category.as_ref().map(CategoryView::for_posts),
            date: post.created_at.as_ref().map(format_datetime),
            date_iso: post.created_at.as_ref().map(date_xml),
            reading_time: meta.reading_time,
            tags: meta.tags.clone(),
            author: meta.author().map(AuthorView::from),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TeamCard {
    pub slug: String,
    pub name: String,
    pub title: String,
    pub bio: String,
    pub photo: String,
    pub skills: BadgeList,
    pub more_skills: Option<String>,
    pub experience: Option<u32>,
    pub links: Vec<SocialLink>,
}

impl From<&TeamMember> for TeamCard {
    fn from(member: &TeamMember) -> Self {
        let meta = &member.metadata;
        let skills = BadgeList::truncated(&meta.skills, CARD_SKILLS);
        Self {
            slug: member.slug.clone(),
            name: meta.name.clone(),
            title: meta.title.clone(),
            bio: meta.bio.clone(),
            photo: cropped(meta.photo.base(), 400, 400),
            more_skills: skills.more_label(),
            skills,
            experience: meta.experience,
            links: meta.links(),
        }
    }
}

/// Values echoed back into the contact form
#[derive(Debug, Clone, Default, Serialize)]
pub struct ContactFormView {
    pub name: String,
    pub email: String,
    pub company: String,
    pub message: String,
    pub services: Vec<String>,
}

impl From<&ContactForm> for ContactFormView {
    fn from(form: &ContactForm) -> Self {
        Self {
            name: form.name.clone(),
            email: form.email.clone(),
            company: form.company.clone().unwrap_or_default(),
            message: form.message.clone(),
            services: form.services.clone(),
        }
    }
}
