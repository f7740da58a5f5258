//! Markdown rendering for blog post bodies.
//!
//! Posts are authored in Markdown in the back-office and rendered to HTML
//! at display time.

use comrak::{Options, markdown_to_html};

/// Render markdown content to HTML.
///
/// Enables the table, strikethrough, and autolink extensions; raw HTML in
/// the source is escaped.
#[must_use]
pub fn render_markdown(markdown: &str) -> String {
    let mut options = Options::default();
    options.extension.table = true;
    options.extension.strikethrough = true;
    options.extension.autolink = true;
    options.render.escape = true;

    markdown_to_html(markdown, &options)
}

/// Estimated reading time in minutes, never below one.
#[must_use]
pub fn reading_time_minutes(markdown: &str) -> u32 {
    const WORDS_PER_MINUTE: usize = 200;

    let words = markdown.split_whitespace().count();
    u32::try_from(words.div_ceil(WORDS_PER_MINUTE).max(1)).unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_markdown_basic() {
        let html = render_markdown("# Title\n\nSome *emphasis*.");
        assert!(html.contains("<h1>"));
        assert!(html.contains("<em>emphasis</em>"));
    }

    #[test]
    fn test_render_markdown_escapes_raw_html() {
        let html = render_markdown("hello <script>alert(1)</script>");
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn test_reading_time_floor_is_one_minute() {
        assert_eq!(reading_time_minutes("a few words"), 1);
    }

    #[test]
    fn test_reading_time_scales_with_length() {
        let long = "word ".repeat(450);
        assert_eq!(reading_time_minutes(&long), 3);
    }
}
