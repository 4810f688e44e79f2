//! The generic CMS object envelope and shared value types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use super::de;

/// A CMS object: identity, timestamps and typed metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentObject<M> {
    pub id: String,

    /// Unique within the type; the only external lookup key
    pub slug: String,

    #[serde(default)]
    pub title: String,

    /// Type discriminator (`projects`, `blog-posts`, `team-members`)
    #[serde(rename = "type", alias = "type_slug", default)]
    pub kind: String,

    #[serde(default, deserialize_with = "de::optional_timestamp")]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default, deserialize_with = "de::optional_timestamp")]
    pub modified_at: Option<DateTime<Utc>>,

    pub metadata: M,
}

/// An image stored on the CMS media CDN
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRef {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub imgix_url: String,
}

impl ImageRef {
    /// Base URL for CDN templating, preferring the imgix endpoint
    pub fn base(&self) -> &str {
        if self.imgix_url.is_empty() {
            &self.url
        } else {
            &self.imgix_url
        }
    }

    pub fn is_empty(&self) -> bool {
        self.base().is_empty()
    }
}

/// A select-dropdown value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub key: String,
    pub value: String,
}

/// Deserialize a category, treating `null` and blank keys as unset
pub fn optional_category<'de, D>(deserializer: D) -> Result<Option<Category>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .and_then(|v| serde_json::from_value::<Category>(v).ok())
        .filter(|c| !c.key.trim().is_empty()))
}

/// A reference to another object: resolved inline at depth ≥ 1, or a bare id
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Reference<T> {
    Resolved(Box<T>),
    Id(String),
}

impl<T> Reference<T> {
    pub fn resolved(&self) -> Option<&T> {
        match self {
            Reference::Resolved(inner) => Some(&**inner),
            Reference::Id(_) => None,
        }
    }
}

/// Deserialize an optional reference; unusable values are dropped with a warning
pub fn optional_reference<'de, D, T>(deserializer: D) -> Result<Option<Reference<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(id)) if !id.trim().is_empty() => Some(Reference::Id(id)),
        Some(obj @ Value::Object(_)) => match serde_json::from_value::<T>(obj) {
            Ok(inner) => Some(Reference::Resolved(Box::new(inner))),
            Err(e) => {
                tracing::warn!("Dropping unreadable object reference: {}", e);
                None
            }
        },
        _ => None,
    })
}

/// The content types this site reads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContentKind {
    #[serde(rename = "projects")]
    Project,
    #[serde(rename = "blog-posts")]
    BlogPost,
    #[serde(rename = "team-members")]
    TeamMember,
}

impl ContentKind {
    pub const ALL: [ContentKind; 3] = [
        ContentKind::Project,
        ContentKind::BlogPost,
        ContentKind::TeamMember,
    ];

    /// Object type slug in the CMS
    pub fn type_slug(&self) -> &'static str {
        match self {
            ContentKind::Project => "projects",
            ContentKind::BlogPost => "blog-posts",
            ContentKind::TeamMember => "team-members",
        }
    }

    /// Site path of the listing page
    pub fn index_path(&self) -> &'static str {
        match self {
            ContentKind::Project => "/projects",
            ContentKind::BlogPost => "/blog",
            ContentKind::TeamMember => "/team",
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_slug())
    }
}

impl FromStr for ContentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "projects" | "project" => Ok(ContentKind::Project),
            "blog-posts" | "posts" | "post" | "blog" => Ok(ContentKind::BlogPost),
            "team-members" | "team" | "member" => Ok(ContentKind::TeamMember),
            other => Err(format!("Unknown content type: {}", other)),
        }
    }
}
