//! Text utilities: slugs, word counts, reading time, email checks

use lazy_static::lazy_static;
use regex::Regex;

use super::html::strip_html;

const WORDS_PER_MINUTE: usize = 200;

lazy_static! {
    static ref EMAIL_RE: Regex = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap();
}

/// URL-safe slug for arbitrary text
pub fn slugify(text: &str) -> String {
    slug::slugify(text)
}

/// Count words in HTML content after stripping tags
pub fn word_count(html: &str) -> usize {
    strip_html(html).split_whitespace().count()
}

/// Estimated reading time in minutes (at least one for non-empty content)
pub fn reading_time(html: &str) -> u32 {
    word_count(html).div_ceil(WORDS_PER_MINUTE) as u32
}

/// Loose email shape check used by the contact form
pub fn validate_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Design Trends 2024!"), "design-trends-2024");
        assert_eq!(slugify("  UI / UX  "), "ui-ux");
    }

    #[test]
    fn test_word_count_ignores_markup() {
        assert_eq!(word_count("<p>One <em>two</em></p>\n<p>three</p>"), 3);
        assert_eq!(word_count(""), 0);
    }

    #[test]
    fn test_reading_time() {
        let words = vec!["word"; 401].join(" ");
        assert_eq!(reading_time(&format!("<p>{}</p>", words)), 3);
        assert_eq!(reading_time("<p>short</p>"), 1);
        assert_eq!(reading_time(""), 0);
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("hello@novaworks.com"));
        assert!(!validate_email("hello@novaworks"));
        assert!(!validate_email("hello world@novaworks.com"));
        assert!(!validate_email(""));
    }
}
