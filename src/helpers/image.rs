//! Image CDN URL templating
//!
//! Every image reference coming from the CMS is an imgix base URL. Rendering
//! code never uses it directly: it always goes through [`image_url`], which
//! asks the CDN for a fixed size, fit mode, format and quality. The query
//! string is kept byte-for-byte compatible with the existing CDN integration.

use std::fmt;

/// Resize mode passed to the CDN as `fit=`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Fit {
    #[default]
    Crop,
    Max,
    Scale,
    Fill,
}

impl Fit {
    pub fn as_str(&self) -> &'static str {
        match self {
            Fit::Crop => "crop",
            Fit::Max => "max",
            Fit::Scale => "scale",
            Fit::Fill => "fill",
        }
    }
}

impl fmt::Display for Fit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Build a rendering-ready image URL
///
/// An empty base yields an empty string so templates can skip the image.
///
/// # Examples
/// ```ignore
/// image_url("https://imgix.cosmicjs.com/a.jpg", 1200, 630, Fit::Crop)
/// // -> "https://imgix.cosmicjs.com/a.jpg?w=1200&h=630&fit=crop&auto=format%2Ccompress&fm=webp&q=85"
/// ```
pub fn image_url(base: &str, width: u32, height: u32, fit: Fit) -> String {
    if base.is_empty() {
        return String::new();
    }
    format!(
        "{}?w={}&h={}&fit={}&auto=format%2Ccompress&fm=webp&q=85",
        base, width, height, fit
    )
}

/// [`image_url`] with the default crop fit
pub fn cropped(base: &str, width: u32, height: u32) -> String {
    image_url(base, width, height, Fit::Crop)
}
