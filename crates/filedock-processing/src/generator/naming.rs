//! Variant name templates
//!
//! `{{name}}` is the original file name, `{{ext}}` its extension with the
//! leading dot and `{{base}}` the name without extension. Whitespace inside
//! the braces is ignored; unknown placeholders render empty.

use regex::{Captures, Regex};
use std::path::Path;
use std::sync::OnceLock;

fn placeholder() -> Option<&'static Regex> {
    static PLACEHOLDER: OnceLock<Option<Regex>> = OnceLock::new();
    PLACEHOLDER
        .get_or_init(|| match Regex::new(r"\{\{\s*(\w+)\s*\}\}") {
            Ok(pattern) => Some(pattern),
            Err(e) => {
                tracing::error!(error = %e, "Failed to compile name template pattern");
                None
            }
        })
        .as_ref()
}

/// Render `template` for the uploaded file named `file_name`.
pub fn render_variant_name(template: &str, file_name: &str) -> String {
    let name = Path::new(file_name)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(file_name);
    let ext = Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e))
        .unwrap_or_default();
    let base = name.strip_suffix(ext.as_str()).unwrap_or(name);

    let Some(pattern) = placeholder() else {
        return template.to_string();
    };

    pattern
        .replace_all(template, |caps: &Captures| match &caps[1] {
            "name" => name.to_string(),
            "ext" => ext.clone(),
            "base" => base.to_string(),
            _ => String::new(),
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_template_keeps_name() {
        assert_eq!(render_variant_name("{{name}}", "photo.jpg"), "photo.jpg");
        assert_eq!(render_variant_name("{{ name }}", "photo.jpg"), "photo.jpg");
    }

    #[test]
    fn test_base_and_ext() {
        assert_eq!(
            render_variant_name("{{base}}_small{{ext}}", "holiday.photo.jpeg"),
            "holiday.photo_small.jpeg"
        );
        assert_eq!(render_variant_name("{{base}}-{{ext}}", "README"), "README-");
    }

    #[test]
    fn test_unknown_placeholder_renders_empty() {
        assert_eq!(render_variant_name("{{size}}{{name}}", "a.png"), "a.png");
        assert_eq!(render_variant_name("thumb", "a.png"), "thumb");
    }

    #[test]
    fn test_directory_components_are_dropped() {
        assert_eq!(render_variant_name("{{name}}", "some/dir/a.png"), "a.png");
    }
}
