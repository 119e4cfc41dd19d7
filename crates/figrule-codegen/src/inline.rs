//! Inline-style component dialect.
//!
//! Each element carries its merged style map as a `style={{ … }}` object
//! literal with camelCase keys.

use crate::helpers::{escape_string, wrap_component};
use crate::walker::{render, Dialect, WalkOptions};
use figrule_ir::{format_number, IrNode, PropertyMap, StyleValue};
use figrule_rules::RuleMatch;

/// Inline-style dialect.
#[derive(Debug, Default)]
pub struct InlineStyle;

impl Dialect for InlineStyle {
    fn style_attributes(&mut self, _: &IrNode<'_>, styles: &PropertyMap, _: &[RuleMatch]) -> Vec<String> {
        if styles.is_empty() {
            return Vec::new();
        }
        vec![format!("style={{{}}}", style_object(styles))]
    }

    fn attribute_value(&self, value: &str) -> String {
        escape_string(value)
    }

    fn text(&self, text: &str) -> String {
        jsx_text(text)
    }

    fn void_terminator(&self) -> &'static str {
        " />"
    }
}

/// `{ display: "flex", zIndex: 1 }`.
pub fn style_object(styles: &PropertyMap) -> String {
    let entries: Vec<String> = styles
        .iter()
        .map(|(key, value)| format!("{}: {}", object_key(key), js_value(value)))
        .collect();
    format!("{{ {} }}", entries.join(", "))
}

fn object_key(key: &str) -> String {
    let mut chars = key.chars();
    let is_identifier = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$');
    if is_identifier {
        key.to_string()
    } else {
        format!("\"{}\"", escape_string(key))
    }
}

fn js_value(value: &StyleValue) -> String {
    match value {
        StyleValue::Number(n) => format_number(*n),
        StyleValue::Text(s) => format!("\"{}\"", escape_string(s)),
    }
}

/// JSX text child. Text containing JSX-significant characters becomes a
/// string expression.
pub fn jsx_text(text: &str) -> String {
    if text.contains(['{', '}', '<', '>']) {
        format!("{{\"{}\"}}", escape_string(text))
    } else {
        text.to_string()
    }
}

/// Render `root` as an exported inline-style component.
pub fn generate(root: &IrNode<'_>, matches: &[RuleMatch], options: &WalkOptions<'_>) -> String {
    let mut markup = String::new();
    render(&mut InlineStyle, root, matches, options, 0, &mut markup);
    wrap_component(&root.name, &markup)
}

#[cfg(test)]
mod tests {
    use super::*;
    use figrule_ir::{normalize, Property, TransformContext};
    use figrule_source::SourceNode;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn source(value: serde_json::Value) -> SourceNode {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_style_object() {
        let mut styles = PropertyMap::new();
        styles.set(Property::Gap, "8px");
        styles.set(Property::ZIndex, 2usize);
        styles.set_by_name_if_absent("--accent", "red");
        assert_eq!(
            style_object(&styles),
            r#"{ gap: "8px", zIndex: 2, "--accent": "red" }"#
        );
    }

    #[test]
    fn test_jsx_text() {
        assert_eq!(jsx_text("Save"), "Save");
        assert_eq!(jsx_text("a < b"), r#"{"a < b"}"#);
        assert_eq!(jsx_text("{name}"), r#"{"{name}"}"#);
    }

    #[test]
    fn test_generate_component() {
        let node = source(json!({
            "id": "1:1", "name": "Primary Button", "type": "FRAME",
            "layoutMode": "HORIZONTAL", "itemSpacing": 8,
            "fills": [{"type": "SOLID", "color": {"r": 1, "g": 1, "b": 1}}],
            "children": [{"id": "1:2", "name": "Label", "type": "TEXT", "characters": "Click me"}]
        }));
        let ir = normalize(&node, &mut TransformContext::new()).unwrap();
        let matches = vec![RuleMatch {
            rule_id: "button".into(),
            priority: 10.0,
            contributed_properties: [
                ("htmlTag", "button"),
                ("cursor", "pointer"),
                ("attributes", r#"{"type":"button"}"#),
            ]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
            conflicts_with: Vec::new(),
            conflict_severity: None,
        }];

        let expected = r##"export function PrimaryButton() {
  return (
    <button style={{ display: "flex", flexDirection: "row", gap: "8px", background: "#FFFFFF", cursor: "pointer" }} type="button">
      <span>Click me</span>
    </button>
  );
}
"##;
        assert_eq!(generate(&ir, &matches, &WalkOptions::root_only()), expected);
    }
}
