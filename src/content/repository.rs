//! Content accessors
//!
//! One method per (content type × query shape). Every accessor returns a
//! [`Fetched`] so callers see one result type regardless of how the CMS
//! failed: list queries that match nothing are an empty `Found`, single
//! lookups that match nothing are `Missing`, and anything else is `Failed`.
//! Pages degrade `Missing` and `Failed` the same way; [`FetchStats`] keeps the
//! distinction for operators.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use super::{sort_by_display_order, BlogPost, Content, ContentKind, Project, TeamMember};
use crate::cms::{CmsError, ContentSource, Query};

/// Fields requested for every entity
const OBJECT_PROPS: &[&str] = &[
    "id",
    "slug",
    "title",
    "type",
    "created_at",
    "modified_at",
    "metadata",
];

/// Outcome of a content fetch
#[derive(Debug, Clone)]
pub enum Fetched<T> {
    /// The query succeeded (a list may be empty)
    Found(T),
    /// A single-entity lookup matched nothing
    Missing,
    /// The CMS could not be queried
    Failed(CmsError),
}

impl<T> Fetched<T> {
    /// Degrade to an optional value
    pub fn into_option(self) -> Option<T> {
        match self {
            Fetched::Found(value) => Some(value),
            Fetched::Missing | Fetched::Failed(_) => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Fetched::Found(_))
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Fetched::Missing)
    }

    pub fn error(&self) -> Option<&CmsError> {
        match self {
            Fetched::Failed(err) => Some(err),
            _ => None,
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Fetched<U> {
        match self {
            Fetched::Found(value) => Fetched::Found(f(value)),
            Fetched::Missing => Fetched::Missing,
            Fetched::Failed(err) => Fetched::Failed(err),
        }
    }
}

impl<T> Fetched<Vec<T>> {
    /// Degrade to a possibly empty list
    pub fn into_list(self) -> Vec<T> {
        self.into_option().unwrap_or_default()
    }
}

/// Counters separating confirmed not-found from upstream failures
#[derive(Debug, Default)]
pub struct FetchStats {
    requests: AtomicU64,
    not_found: AtomicU64,
    failures: AtomicU64,
    skipped: AtomicU64,
}

/// Point-in-time copy of [`FetchStats`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FetchSnapshot {
    pub requests: u64,
    pub not_found: u64,
    pub failures: u64,
    /// Objects dropped because they did not match their typed shape
    pub skipped: u64,
}

impl FetchStats {
    pub fn snapshot(&self) -> FetchSnapshot {
        FetchSnapshot {
            requests: self.requests.load(Ordering::Relaxed),
            not_found: self.not_found.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
            skipped: self.skipped.load(Ordering::Relaxed),
        }
    }

    fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }
}

/// Slug and last modification of an entity, for sitemaps
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SitemapEntry {
    pub slug: String,
    #[serde(default, deserialize_with = "super::de::optional_timestamp")]
    pub modified_at: Option<DateTime<Utc>>,
}

/// Typed access to site content over an injected source
#[derive(Clone)]
pub struct ContentRepository {
    source: Arc<dyn ContentSource>,
    featured_limit: usize,
    stats: Arc<FetchStats>,
}

impl ContentRepository {
    /// Create a repository; featured lists are capped at `featured_limit`
    pub fn new(source: Arc<dyn ContentSource>, featured_limit: usize) -> Self {
        Self {
            source,
            featured_limit,
            stats: Arc::new(FetchStats::default()),
        }
    }

    pub fn stats(&self) -> &FetchStats {
        &self.stats
    }

    pub fn featured_limit(&self) -> usize {
        self.featured_limit
    }

    /// Name of the underlying source
    pub fn source_name(&self) -> &'static str {
        self.source.name()
    }

    // Projects

    /// All projects
    pub async fn projects(&self) -> Fetched<Vec<Project>> {
        self.list(entity_query(ContentKind::Project), "projects").await
    }

    /// Projects flagged as featured, capped
    pub async fn featured_projects(&self) -> Fetched<Vec<Project>> {
        let query = entity_query(ContentKind::Project)
            .filter("metadata.featured", true)
            .limit(self.featured_limit);
        let limit = self.featured_limit;
        self.list(query, "featured projects")
            .await
            .map(|all: Vec<Project>| featured_subset(all, |p| p.metadata.featured, limit))
    }

    /// A single project by slug
    pub async fn project(&self, slug: &str) -> Fetched<Project> {
        if slug.trim().is_empty() {
            return Fetched::Missing;
        }
        self.single(entity_query(ContentKind::Project).filter("slug", slug), "project")
            .await
    }

    /// Projects in a category (by category key)
    pub async fn projects_by_category(&self, category: &str) -> Fetched<Vec<Project>> {
        if category.trim().is_empty() {
            return Fetched::Found(Vec::new());
        }
        let query = entity_query(ContentKind::Project).filter("metadata.category.key", category);
        self.list(query, "projects by category").await
    }

    // Blog posts

    /// All blog posts, newest first
    pub async fn blog_posts(&self) -> Fetched<Vec<BlogPost>> {
        let query = entity_query(ContentKind::BlogPost).sort("-created_at");
        self.list(query, "blog posts").await
    }

    /// Blog posts flagged as featured, newest first, capped
    pub async fn featured_blog_posts(&self) -> Fetched<Vec<BlogPost>> {
        let query = entity_query(ContentKind::BlogPost)
            .filter("metadata.featured", true)
            .sort("-created_at")
            .limit(self.featured_limit);
        let limit = self.featured_limit;
        self.list(query, "featured blog posts")
            .await
            .map(|all: Vec<BlogPost>| featured_subset(all, |p| p.metadata.featured, limit))
    }

    /// A single blog post by slug
    pub async fn blog_post(&self, slug: &str) -> Fetched<BlogPost> {
        if slug.trim().is_empty() {
            return Fetched::Missing;
        }
        self.single(entity_query(ContentKind::BlogPost).filter("slug", slug), "blog post")
            .await
    }

    /// Blog posts in a category (by category key), newest first
    pub async fn blog_posts_by_category(&self, category: &str) -> Fetched<Vec<BlogPost>> {
        if category.trim().is_empty() {
            return Fetched::Found(Vec::new());
        }
        let query = entity_query(ContentKind::BlogPost)
            .filter("metadata.category.key", category)
            .sort("-created_at");
        self.list(query, "blog posts by category").await
    }

    // Team

    /// All team members in display order
    pub async fn team_members(&self) -> Fetched<Vec<TeamMember>> {
        self.list(entity_query(ContentKind::TeamMember), "team members")
            .await
            .map(|mut members: Vec<TeamMember>| {
                sort_by_display_order(&mut members);
                members
            })
    }

    /// The first team members in display order, capped
    pub async fn featured_team_members(&self) -> Fetched<Vec<TeamMember>> {
        let limit = self.featured_limit;
        self.team_members().await.map(|mut members| {
            members.truncate(limit);
            members
        })
    }

    /// A single team member by slug
    pub async fn team_member(&self, slug: &str) -> Fetched<TeamMember> {
        if slug.trim().is_empty() {
            return Fetched::Missing;
        }
        self.single(
            entity_query(ContentKind::TeamMember).filter("slug", slug),
            "team member",
        )
        .await
    }

    // Any type

    /// Every entity of a type as the tagged [`Content`] union
    pub async fn all(&self, kind: ContentKind) -> Fetched<Vec<Content>> {
        let raw = self.raw_list(entity_query(kind), kind.type_slug()).await;
        raw.map(|values| {
            values
                .into_iter()
                .filter_map(|value| match Content::from_value(value) {
                    Ok(content) => Some(content),
                    Err(e) => {
                        self.skip(kind.type_slug(), &e);
                        None
                    }
                })
                .collect()
        })
    }

    /// Slugs and modification times, with a minimal projection
    pub async fn sitemap_slugs(&self, kind: ContentKind) -> Fetched<Vec<SitemapEntry>> {
        let query = Query::new(kind.type_slug()).props(&["slug", "modified_at"]);
        self.list(query, "sitemap entries").await
    }

    async fn raw_list(&self, query: Query, what: &str) -> Fetched<Vec<Value>> {
        FetchStats::bump(&self.stats.requests);
        match self.source.find(&query).await {
            Ok(values) => Fetched::Found(values),
            Err(err) if err.is_not_found() => {
                FetchStats::bump(&self.stats.not_found);
                tracing::debug!("No {} found", what);
                Fetched::Found(Vec::new())
            }
            Err(err) => {
                FetchStats::bump(&self.stats.failures);
                tracing::warn!("Failed to fetch {} from {}: {}", what, self.source.name(), err);
                Fetched::Failed(err)
            }
        }
    }

    async fn list<T: DeserializeOwned>(&self, query: Query, what: &str) -> Fetched<Vec<T>> {
        self.raw_list(query, what).await.map(|values| {
            values
                .into_iter()
                .filter_map(|value| match serde_json::from_value::<T>(value) {
                    Ok(item) => Some(item),
                    Err(e) => {
                        self.skip(what, &CmsError::Decode(e.to_string()));
                        None
                    }
                })
                .collect()
        })
    }

    async fn single<T: DeserializeOwned>(&self, query: Query, what: &str) -> Fetched<T> {
        FetchStats::bump(&self.stats.requests);
        match self.source.find_one(&query).await {
            Ok(value) => match serde_json::from_value::<T>(value) {
                Ok(item) => Fetched::Found(item),
                Err(e) => {
                    let err = CmsError::Decode(e.to_string());
                    self.skip(what, &err);
                    Fetched::Failed(err)
                }
            },
            Err(err) if err.is_not_found() => {
                FetchStats::bump(&self.stats.not_found);
                tracing::debug!("No {} matches {:?}", what, query.filters);
                Fetched::Missing
            }
            Err(err) => {
                FetchStats::bump(&self.stats.failures);
                tracing::warn!("Failed to fetch {} from {}: {}", what, self.source.name(), err);
                Fetched::Failed(err)
            }
        }
    }

    fn skip(&self, what: &str, err: &CmsError) {
        FetchStats::bump(&self.stats.skipped);
        tracing::warn!("Skipping malformed {} object: {}", what, err);
    }
}

fn entity_query(kind: ContentKind) -> Query {
    Query::new(kind.type_slug()).props(OBJECT_PROPS).depth(1)
}

/// Keep flagged items only and cap the count, whatever the source returned
fn featured_subset<T>(items: Vec<T>, is_featured: impl Fn(&T) -> bool, limit: usize) -> Vec<T> {
    items
        .into_iter()
        .filter(|item| is_featured(item))
        .take(limit)
        .collect()
}
