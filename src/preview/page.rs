//! Standalone HTML page for eyeballing an extracted component

use super::css::{reset_css, scope_css};
use crate::library::ExtractedComponent;

/// Container id used on preview pages
pub fn scope_id(component_id: &str) -> String {
    let cleaned: String = component_id
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .collect();
    format!("preview-{}", cleaned)
}

/// Model output sometimes carries literal `\n` sequences instead of newlines.
pub fn unescape_newlines(html: &str) -> String {
    html.replace("\\n", "\n")
}

pub fn render_page(component: &ExtractedComponent) -> String {
    let scope = scope_id(&component.id);
    let css = format!("{}\n{}", reset_css(&scope), scope_css(&component.code.css, &scope));

    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n<title>{title}</title>\n<style>\n{css}\n</style>\n</head>\n<body>\n<div id=\"{scope}\">\n{html}\n</div>\n</body>\n</html>\n",
        title = escape_text(&component.name),
        css = css,
        scope = scope,
        html = unescape_newlines(&component.code.html),
    )
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
