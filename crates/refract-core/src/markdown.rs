//! Markdown and code-sample collaborators
//!
//! Comment prose and `@example` bodies are handed to an external
//! Markdown-to-HTML converter; its output is spliced back verbatim.

use comrak::{markdown_to_html, Options};

/// Converts comment prose to HTML
///
/// The rendering core treats the converter as text-in/HTML-out and
/// never inspects the result.
pub trait MarkdownRenderer {
    /// Render a Markdown fragment to HTML
    fn render(&self, text: &str) -> String;

    /// Render a code sample as a highlighted block
    fn render_code(&self, code: &str) -> String {
        format!("\n<pre><code>{}</code></pre>\n", crate::render::markup::escape_html(code))
    }
}

/// Comrak-backed converter used by the CLI
///
/// Link tags are expanded to raw `<a>` elements before conversion, so
/// raw HTML must pass through unescaped.
#[derive(Debug, Default)]
pub struct ComrakRenderer;

impl MarkdownRenderer for ComrakRenderer {
    fn render(&self, text: &str) -> String {
        let mut options = Options::default();
        options.render.unsafe_ = true;
        options.extension.table = true;
        options.extension.strikethrough = true;
        markdown_to_html(text, &options)
    }
}

/// Identity converter for unit tests
#[cfg(test)]
#[derive(Debug, Default)]
pub struct PlainRenderer;

#[cfg(test)]
impl MarkdownRenderer for PlainRenderer {
    fn render(&self, text: &str) -> String {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comrak_preserves_inline_html() {
        let html = ComrakRenderer.render("see <a href=\"#x\">x</a>");
        assert!(html.contains("<a href=\"#x\">x</a>"));
    }

    #[test]
    fn code_samples_are_escaped() {
        let html = ComrakRenderer.render_code("if a < b {}");
        assert!(html.contains("a &lt; b"));
    }
}
