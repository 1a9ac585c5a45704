//! Low-level HTML fragment helpers

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use crate::graph::LiteralValue;
use crate::permalink::{encode_anchor, render_permalink_anchor, Permalink};

/// Escape text for inclusion in HTML
///
/// The zero-width space gets a named placeholder so downstream tooling
/// can spot it.
pub fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#39;"),
            '/' => result.push_str("&#x2F;"),
            '`' => result.push_str("&#x60;"),
            '=' => result.push_str("&#x3D;"),
            '\u{200b}' => result.push_str("&amp;#zws;"),
            _ => result.push(c),
        }
    }
    result
}

pub fn span(value: &str, class: &str) -> String {
    if class.is_empty() {
        format!("<span>{value}</span>")
    } else {
        format!("<span class=\"{class}\">{value}</span>")
    }
}

pub fn div(content: &str, class: Option<&str>) -> String {
    match class {
        Some(class) => format!("\n<div class=\"{class}\">{content}</div>\n"),
        None => format!("\n<div>{content}</div>\n"),
    }
}

pub fn punct(value: &str) -> String {
    format!("<span class=\"punctuation\">{}</span>", escape_html(value))
}

pub fn keyword(k: &str) -> String {
    format!("<span class=\"keyword\">{}</span>", escape_html(k))
}

pub fn strong(s: &str) -> String {
    if s.is_empty() {
        String::new()
    } else {
        format!("<strong>{}</strong>", escape_html(s))
    }
}

pub fn var_tag(s: &str) -> String {
    if s.starts_with('\u{2192}') {
        format!("<var class=\"return\">{s}</var>")
    } else {
        format!("<var>{}</var>", escape_html(s))
    }
}

pub fn quoted_string(s: &str) -> String {
    format!("<span class=\"string-literal\">&quot;{}&quot;</span>", escape_html(s))
}

/// Render a literal type value; `None` stands for an undefined value
pub fn literal_to_string(value: Option<&LiteralValue>) -> String {
    let Some(value) = value else {
        return keyword("undefined");
    };
    match value {
        LiteralValue::Null => keyword("null"),
        LiteralValue::Bool(b) => keyword(if *b { "true" } else { "false" }),
        LiteralValue::Number(n) => span(&escape_html(&n.to_string()), "num-literal"),
        LiteralValue::String(s) => quoted_string(s),
        LiteralValue::Array(items) => {
            let body: Vec<String> =
                items.iter().map(|item| literal_to_string(Some(item))).collect();
            format!("{}{}{}", punct("["), body.join(&punct(", ")), punct("]"))
        }
        LiteralValue::Object(_) => escape_html(&value.to_string()),
    }
}

#[derive(Debug, Default)]
pub struct SectionOptions<'a> {
    pub permalink: Option<&'a Permalink>,
    pub class: Option<&'a str>,
    pub keywords: Option<String>,
}

pub fn section_html(content: &str, options: &SectionOptions<'_>) -> String {
    let mut result = String::from("<section");
    if let Some(keywords) = &options.keywords {
        result.push_str(&format!(" data-keywords=\"{}\"", keywords.to_lowercase()));
    }
    if let Some(permalink) = options.permalink {
        if !permalink.anchor.is_empty() {
            result.push_str(&format!(" id=\"{}\"", encode_anchor(&permalink.anchor)));
        }
    }
    if let Some(class) = options.class {
        result.push_str(&format!(" class=\"{class}\""));
    }
    result.push('>');
    result.push_str(content);
    result.push_str("\n</section>\n");
    result
}

pub fn list(items: &[String], class: Option<&str>) -> String {
    if items.is_empty() {
        return String::new();
    }
    let mut result = match class {
        Some(class) => format!("\n<ul class=\"{class}\">\n"),
        None => String::from("\n<ul>\n"),
    };
    for item in items {
        result.push_str(&format!("\n<li>{item}</li>\n"));
    }
    result.push_str("\n</ul>\n");
    result
}

/// Wrap a heading in the rotating highlight mark
///
/// The mark variant is chosen by hashing the anchor so output stays
/// deterministic run to run.
pub fn highlighting_mark(content: &str, anchor: &str) -> String {
    let mut hasher = DefaultHasher::new();
    anchor.hash(&mut hasher);
    let variant = hasher.finish() % 3 + 1;
    span(
        &format!(
            "{content}<svg class=\"highlighting-mark\">\
             <use xlink:href=\"#highlighting-mark-{variant}\"></use></svg>"
        ),
        "highlighting-mark-container",
    )
}

#[derive(Debug, Default)]
pub struct HeadingOptions<'a> {
    pub deprecated: bool,
    pub class: Option<&'a str>,
}

pub fn heading(
    level: u8,
    subhead: &str,
    head: &str,
    permalink: Option<&Permalink>,
    options: &HeadingOptions<'_>,
) -> String {
    let mut body = if subhead.is_empty() {
        String::new()
    } else {
        span(subhead, "subhead")
    };
    let head_class = if options.deprecated { "head deprecated" } else { "head" };
    let anchored = permalink.filter(|p| !p.anchor.is_empty());
    if let Some(permalink) = anchored {
        body.push_str(&highlighting_mark(&span(head, head_class), &permalink.anchor));
        body = span(&body, "stack");
        body.push_str(&render_permalink_anchor(permalink));
    } else {
        body.push_str(&span(head, head_class));
        body = span(&body, "stack");
    }
    match options.class {
        Some(class) => format!("<h{level} class=\"{class}\">{body}</h{level}>"),
        None => format!("<h{level}>{body}</h{level}>"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_covers_sensitive_characters() {
        assert_eq!(escape_html("a < b & c"), "a &lt; b &amp; c");
        assert_eq!(escape_html("path/to"), "path&#x2F;to");
    }

    #[test]
    fn literals() {
        assert_eq!(literal_to_string(None), keyword("undefined"));
        assert_eq!(literal_to_string(Some(&LiteralValue::Null)), keyword("null"));
        assert_eq!(
            literal_to_string(Some(&serde_json::json!("ok"))),
            quoted_string("ok")
        );
        assert!(literal_to_string(Some(&serde_json::json!([1, 2]))).contains("num-literal"));
    }

    #[test]
    fn highlight_mark_is_deterministic() {
        let a = highlighting_mark("x", "(f:instance)");
        let b = highlighting_mark("x", "(f:instance)");
        assert_eq!(a, b);
    }

    #[test]
    fn section_carries_anchor_and_keywords() {
        let permalink = Permalink {
            anchor: "(f:instance)".to_string(),
            title: "f".to_string(),
            document: None,
        };
        let html = section_html(
            "body",
            &SectionOptions {
                permalink: Some(&permalink),
                class: Some("card"),
                keywords: Some("F, zoom".to_string()),
            },
        );
        assert!(html.contains("id=\"(f%3Ainstance)\""));
        assert!(html.contains("data-keywords=\"f, zoom\""));
        assert!(html.contains("class=\"card\""));
    }
}
