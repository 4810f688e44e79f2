//! Helper functions shared by the page renderer and the SEO builders
//!
//! URL joining, date display, HTML escaping, image CDN templating and
//! small text utilities.

mod date;
mod html;
mod image;
mod list;
mod text;
mod url;

pub use date::*;
pub use html::*;
pub use image::*;
pub use list::*;
pub use text::*;
pub use url::*;
