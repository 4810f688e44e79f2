//! Built-in site templates using the Tera template engine
//!
//! All templates are embedded directly in the binary.

mod views;

use anyhow::Result;
use std::collections::HashMap;
use tera::{Context, Tera};

use crate::helpers::{html_escape, strip_html, truncate};

pub use views::{
    distinct_categories, nav, AuthorView, CategoryView, ContactFormView, LayoutView, NavItem,
    PostCard, PostDetail, ProjectCard, ProjectDetail, SiteView, TeamCard, CARD_EXCERPT_CHARS,
    CARD_SKILLS, CARD_TECHNOLOGIES,
};

/// Template renderer with the embedded site templates
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Create a new renderer with all templates loaded
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();

        // Rich text and pre-rendered head tags are marked `safe` in the
        // templates; everything else is escaped without touching `/` in URLs
        tera.set_escape_fn(html_escape);

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("site/layout.html")),
            ("macros.html", include_str!("site/macros.html")),
            ("home.html", include_str!("site/home.html")),
            ("projects.html", include_str!("site/projects.html")),
            ("project.html", include_str!("site/project.html")),
            ("blog.html", include_str!("site/blog.html")),
            ("post.html", include_str!("site/post.html")),
            ("team.html", include_str!("site/team.html")),
            ("contact.html", include_str!("site/contact.html")),
            ("not_found.html", include_str!("site/not_found.html")),
            // Partials
            (
                "partials/header.html",
                include_str!("site/partials/header.html"),
            ),
            (
                "partials/footer.html",
                include_str!("site/partials/footer.html"),
            ),
        ])?;

        tera.register_filter("strip_html", strip_html_filter);
        tera.register_filter("truncate_chars", truncate_chars_filter);

        Ok(Self { tera })
    }

    /// Render a template with given context
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template_name, context)?)
    }
}

/// Tera filter: strip HTML tags
fn strip_html_filter(
    value: &tera::Value,
    _args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("strip_html", "value", String, value);
    Ok(tera::Value::String(strip_html(&s)))
}

/// Tera filter: truncate by character count, appending "..."
fn truncate_chars_filter(
    value: &tera::Value,
    args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("truncate_chars", "value", String, value);
    let length = match args.get("length") {
        Some(val) => tera::try_get_value!("truncate_chars", "length", usize, val),
        None => CARD_EXCERPT_CHARS,
    };
    Ok(tera::Value::String(truncate(&s, length)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_templates_parse() {
        let renderer = TemplateRenderer::new().unwrap();
        let names: Vec<_> = renderer.tera.get_template_names().collect();
        assert!(names.contains(&"layout.html"));
        assert!(names.contains(&"not_found.html"));
    }

    #[test]
    fn test_escaping_keeps_urls_readable() {
        let mut tera = Tera::default();
        tera.set_escape_fn(html_escape);
        tera.add_raw_template("t.html", r#"<a href="{{ url }}">{{ text }}</a>{{ raw | safe }}"#)
            .unwrap();

        let mut context = Context::new();
        context.insert("url", "https://cdn/x.jpg?w=1&h=2");
        context.insert("text", "<b>hi</b>");
        context.insert("raw", "<p>ok</p>");

        assert_eq!(
            tera.render("t.html", &context).unwrap(),
            r#"<a href="https://cdn/x.jpg?w=1&amp;h=2">&lt;b&gt;hi&lt;/b&gt;</a><p>ok</p>"#
        );
    }

    #[test]
    fn test_filters() {
        let args = HashMap::new();
        assert_eq!(
            strip_html_filter(&json!("<p>Hello</p>"), &args).unwrap(),
            json!("Hello")
        );

        let mut args = HashMap::new();
        args.insert("length".to_string(), json!(5));
        assert_eq!(
            truncate_chars_filter(&json!("Hello world"), &args).unwrap(),
            json!("Hello...")
        );
    }
}
