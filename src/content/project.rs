//! Project (portfolio case study) model

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::de;
use super::object::{optional_category, Category, ContentObject, ImageRef};

/// A portfolio project
pub type Project = ContentObject<ProjectMeta>;

/// Project metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectMeta {
    pub name: String,

    pub client: String,

    pub short_description: String,

    /// Rich-text case study (HTML)
    #[serde(default, deserialize_with = "de::null_default")]
    pub full_description: String,

    #[serde(default, deserialize_with = "de::null_default")]
    pub featured_image: ImageRef,

    #[serde(default, deserialize_with = "de::null_default")]
    pub gallery: Vec<ImageRef>,

    #[serde(default, deserialize_with = "optional_category")]
    pub category: Option<Category>,

    #[serde(default, deserialize_with = "de::null_default")]
    pub technologies: Vec<String>,

    /// Link to the live project
    #[serde(default, deserialize_with = "de::optional_string")]
    pub project_url: Option<String>,

    #[serde(default, deserialize_with = "de::optional_date")]
    pub completion_date: Option<NaiveDate>,

    #[serde(default, deserialize_with = "de::flag")]
    pub featured: bool,
}

impl ProjectMeta {
    /// Display label of the category, if set
    pub fn category_label(&self) -> Option<&str> {
        self.category.as_ref().map(|c| c.value.as_str())
    }

    /// Gallery images that actually point somewhere
    pub fn gallery_images(&self) -> impl Iterator<Item = &ImageRef> {
        self.gallery.iter().filter(|img| !img.is_empty())
    }
}
