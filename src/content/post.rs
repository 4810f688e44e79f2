//! Blog post model

use serde::{Deserialize, Serialize};

use super::de;
use super::object::{
    optional_category, optional_reference, Category, ContentObject, ImageRef, Reference,
};
use super::team::TeamMember;
use crate::helpers::word_count;

/// A blog post
pub type BlogPost = ContentObject<BlogPostMeta>;

/// Blog post metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlogPostMeta {
    /// Post title
    pub title: String,

    /// Short summary shown in cards and used as the page description
    #[serde(default, deserialize_with = "de::null_default")]
    pub excerpt: String,

    /// Rich-text body (HTML)
    #[serde(default, deserialize_with = "de::null_default")]
    pub content: String,

    #[serde(default, deserialize_with = "de::null_default")]
    pub featured_image: ImageRef,

    #[serde(default, deserialize_with = "optional_category")]
    pub category: Option<Category>,

    #[serde(default, deserialize_with = "de::null_default")]
    pub tags: Vec<String>,

    /// Author; embedded when fetched with depth 1
    #[serde(default, deserialize_with = "optional_reference")]
    pub author: Option<Reference<TeamMember>>,

    /// Estimated reading time in minutes
    #[serde(default, deserialize_with = "de::optional_number")]
    pub reading_time: Option<u32>,

    #[serde(default, deserialize_with = "de::flag")]
    pub featured: bool,
}

impl BlogPostMeta {
    /// The resolved author, if the post has one
    pub fn author(&self) -> Option<&TeamMember> {
        self.author.as_ref().and_then(Reference::resolved)
    }

    /// Display label of the category, if set
    pub fn category_label(&self) -> Option<&str> {
        self.category.as_ref().map(|c| c.value.as_str())
    }

    /// Words in the body, ignoring markup
    pub fn word_count(&self) -> usize {
        word_count(&self.content)
    }
}
