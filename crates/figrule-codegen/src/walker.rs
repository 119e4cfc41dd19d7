//! Shared tree walk for every dialect.
//!
//! The walker owns everything the dialects agree on: tag selection, text
//! extraction, rule attributes, void tags, recursion order and indentation.
//! A [`Dialect`] only decides how styles become attributes and how text and
//! attribute values are escaped.

use crate::helpers::is_void_element;
use figrule_ir::{IrNode, NodeKind, PropertyMap};
use figrule_rules::model::{is_structural, ATTRIBUTES, HTML_TAG};
use figrule_rules::{evaluate, MappingRule, RuleMatch};
use std::collections::BTreeMap;

/// Output-shape strategy plugged into [`render`].
pub trait Dialect {
    /// Style-derived attributes for one element, already formatted
    /// (`className="…"`, `style={{…}}`, `class="…"`).
    fn style_attributes(
        &mut self,
        node: &IrNode<'_>,
        styles: &PropertyMap,
        matches: &[RuleMatch],
    ) -> Vec<String>;

    /// Escape a rule-authored attribute value for a double-quoted attribute.
    fn attribute_value(&self, value: &str) -> String;

    /// Render text content.
    fn text(&self, text: &str) -> String;

    /// Terminator of a void tag: `" />"` or `">"`.
    fn void_terminator(&self) -> &'static str;
}

/// How child nodes obtain their rule matches.
#[derive(Debug, Clone, Copy)]
pub struct WalkOptions<'r> {
    pub rules: &'r [MappingRule],
    /// Evaluate `rules` against every descendant. When off, descendants render
    /// with no matches and only the root's matches apply.
    pub propagate_rules: bool,
}

impl<'r> WalkOptions<'r> {
    pub fn root_only() -> Self {
        Self {
            rules: &[],
            propagate_rules: false,
        }
    }
}

/// Default tag for a node kind.
pub fn default_tag(kind: NodeKind) -> &'static str {
    match kind {
        NodeKind::Text => "span",
        NodeKind::Image => "img",
        NodeKind::Container | NodeKind::Group => "div",
    }
}

/// Tag of the highest-priority match that names one, else the kind default.
pub fn select_tag<'m>(node: &IrNode<'_>, matches: &'m [RuleMatch]) -> &'m str {
    matches
        .iter()
        .filter_map(|m| m.get(HTML_TAG))
        .find(|tag| !tag.is_empty())
        .unwrap_or_else(|| default_tag(node.kind))
}

/// IR styles plus every rule-contributed style property. IR values and
/// higher-priority rules win.
pub fn merged_styles(node: &IrNode<'_>, matches: &[RuleMatch]) -> PropertyMap {
    let mut styles = node.styles.clone();
    for m in matches {
        for (property, value) in &m.contributed_properties {
            if !is_structural(property) {
                styles.set_by_name_if_absent(property, value.as_str());
            }
        }
    }
    styles
}

/// Whether `key` can be written as an attribute name.
fn is_attribute_name(key: &str) -> bool {
    !key.is_empty()
        && !key.chars().any(|c| {
            c.is_whitespace() || c.is_control() || matches!(c, '"' | '\'' | '>' | '<' | '/' | '=')
        })
}

/// Rule attributes merged across matches. Keys already set by a
/// higher-priority match are kept; payloads that are not a JSON object and
/// keys that cannot be attribute names are skipped.
pub fn extract_attributes(matches: &[RuleMatch]) -> BTreeMap<String, String> {
    let mut attributes = BTreeMap::new();
    for m in matches {
        let Some(payload) = m.get(ATTRIBUTES) else {
            continue;
        };
        let parsed: serde_json::Map<String, serde_json::Value> =
            match serde_json::from_str(payload) {
                Ok(parsed) => parsed,
                Err(err) => {
                    tracing::debug!(rule = %m.rule_id, error = %err, "skipping malformed attributes");
                    continue;
                }
            };
        for (key, value) in parsed {
            if !is_attribute_name(&key) {
                tracing::debug!(rule = %m.rule_id, key = %key, "skipping invalid attribute name");
                continue;
            }
            let value = match value {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            };
            attributes.entry(key).or_insert(value);
        }
    }
    attributes
}

/// Render `node` and its subtree at `depth` (two spaces per level).
pub fn render<D: Dialect + ?Sized>(
    dialect: &mut D,
    node: &IrNode<'_>,
    matches: &[RuleMatch],
    options: &WalkOptions<'_>,
    depth: usize,
    out: &mut String,
) {
    let indent = "  ".repeat(depth);
    let tag = select_tag(node, matches);
    let styles = merged_styles(node, matches);

    let mut attributes = dialect.style_attributes(node, &styles, matches);
    for (key, value) in extract_attributes(matches) {
        attributes.push(format!("{key}=\"{}\"", dialect.attribute_value(&value)));
    }

    out.push_str(&indent);
    out.push('<');
    out.push_str(tag);
    for attribute in &attributes {
        out.push(' ');
        out.push_str(attribute);
    }

    if is_void_element(tag) {
        out.push_str(dialect.void_terminator());
        return;
    }
    out.push('>');

    let text = node.text();
    if node.has_children() {
        out.push('\n');
        if !text.is_empty() {
            out.push_str(&indent);
            out.push_str("  ");
            out.push_str(&dialect.text(text));
            out.push('\n');
        }
        for child in &node.children {
            let child_matches = if options.propagate_rules {
                evaluate(child, options.rules)
            } else {
                Vec::new()
            };
            render(dialect, child, &child_matches, options, depth + 1, out);
            out.push('\n');
        }
        out.push_str(&indent);
    } else if !text.is_empty() {
        out.push_str(&dialect.text(text));
    }

    out.push_str("</");
    out.push_str(tag);
    out.push('>');
}

#[cfg(test)]
mod tests {
    use super::*;
    use figrule_ir::{normalize, TransformContext};
    use figrule_source::SourceNode;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    struct Plain;

    impl Dialect for Plain {
        fn style_attributes(&mut self, _: &IrNode<'_>, styles: &PropertyMap, _: &[RuleMatch]) -> Vec<String> {
            if styles.is_empty() {
                Vec::new()
            } else {
                vec![format!("data-styles=\"{}\"", styles.len())]
            }
        }

        fn attribute_value(&self, value: &str) -> String {
            value.to_string()
        }

        fn text(&self, text: &str) -> String {
            text.to_string()
        }

        fn void_terminator(&self) -> &'static str {
            " />"
        }
    }

    fn source(value: serde_json::Value) -> SourceNode {
        serde_json::from_value(value).unwrap()
    }

    fn rule(value: serde_json::Value) -> MappingRule {
        serde_json::from_value(value).unwrap()
    }

    fn match_with(rule_id: &str, properties: &[(&str, &str)]) -> RuleMatch {
        RuleMatch {
            rule_id: rule_id.into(),
            priority: 1.0,
            contributed_properties: properties
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            conflicts_with: Vec::new(),
            conflict_severity: None,
        }
    }

    fn render_plain(node: &IrNode<'_>, matches: &[RuleMatch], options: &WalkOptions<'_>) -> String {
        let mut out = String::new();
        render(&mut Plain, node, matches, options, 0, &mut out);
        out
    }

    #[test]
    fn test_default_tags() {
        assert_eq!(default_tag(NodeKind::Text), "span");
        assert_eq!(default_tag(NodeKind::Image), "img");
        assert_eq!(default_tag(NodeKind::Group), "div");
    }

    #[test]
    fn test_rule_tag_overrides_default() {
        let node = source(json!({"id": "1", "name": "Cta", "type": "FRAME"}));
        let ir = normalize(&node, &mut TransformContext::new()).unwrap();
        let matches = vec![match_with("r", &[("htmlTag", "button")])];
        assert_eq!(select_tag(&ir, &matches), "button");
        assert_eq!(select_tag(&ir, &[]), "div");
    }

    #[test]
    fn test_empty_element_keeps_pair() {
        let node = source(json!({"id": "1", "name": "Box", "type": "FRAME"}));
        let ir = normalize(&node, &mut TransformContext::new()).unwrap();
        assert_eq!(render_plain(&ir, &[], &WalkOptions::root_only()), "<div></div>");
    }

    #[test]
    fn test_void_tag_has_no_children_or_close() {
        let node = source(json!({"id": "1", "name": "Pic", "type": "RECTANGLE"}));
        let ir = normalize(&node, &mut TransformContext::new()).unwrap();
        assert_eq!(render_plain(&ir, &[], &WalkOptions::root_only()), "<img />");

        let node = source(json!({
            "id": "1", "name": "Field", "type": "FRAME",
            "children": [{"id": "2", "name": "Hint", "type": "TEXT", "characters": "x"}]
        }));
        let ir = normalize(&node, &mut TransformContext::new()).unwrap();
        let matches = vec![match_with("r", &[("htmlTag", "input")])];
        assert_eq!(
            render_plain(&ir, &matches, &WalkOptions::root_only()),
            "<input data-styles=\"1\" />"
        );
    }

    #[test]
    fn test_attribute_merge_keeps_first_writer() {
        let matches = vec![
            match_with("high", &[("attributes", r#"{"type":"submit","aria-label":"Go"}"#)]),
            match_with("broken", &[("attributes", "{not json")]),
            match_with("low", &[("attributes", r#"{"type":"button","tabindex":0}"#)]),
        ];
        let attributes = extract_attributes(&matches);
        let pairs: Vec<(&str, &str)> = attributes
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        assert_eq!(
            pairs,
            vec![("aria-label", "Go"), ("tabindex", "0"), ("type", "submit")]
        );
    }

    #[test]
    fn test_invalid_attribute_names_are_skipped() {
        let matches = vec![match_with(
            "r",
            &[(
                "attributes",
                r#"{"":"x","on click":"x","a\"b":"x","x>y":"x","/x":"x","k=v":"x","it's":"x","tab\t":"x","data-id":"7"}"#,
            )],
        )];
        let attributes = extract_attributes(&matches);
        let keys: Vec<&str> = attributes.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["data-id"]);
    }

    #[test]
    fn test_merged_styles_prefer_ir_values() {
        let node = source(json!({
            "id": "1", "name": "Row", "type": "FRAME",
            "layoutMode": "HORIZONTAL", "itemSpacing": 8
        }));
        let ir = normalize(&node, &mut TransformContext::new()).unwrap();
        let matches = vec![match_with(
            "r",
            &[("gap", "24px"), ("cursor", "pointer"), ("htmlTag", "nav")],
        )];
        let styles = merged_styles(&ir, &matches);
        assert_eq!(styles.get_by_name("gap").unwrap().to_string(), "8px");
        assert_eq!(styles.get_by_name("cursor").unwrap().to_string(), "pointer");
        assert!(styles.get_by_name("htmlTag").is_none());
    }

    #[test]
    fn test_children_indent_and_text_inline() {
        let node = source(json!({
            "id": "1", "name": "Root", "type": "FRAME",
            "children": [
                {"id": "2", "name": "Label", "type": "TEXT", "characters": "Hello"},
                {"id": "3", "name": "Inner", "type": "FRAME", "children": [
                    {"id": "4", "name": "Icon", "type": "VECTOR"}
                ]}
            ]
        }));
        let ir = normalize(&node, &mut TransformContext::new()).unwrap();
        let expected = "\
<div data-styles=\"1\">
  <span>Hello</span>
  <div data-styles=\"1\">
    <img />
  </div>
</div>";
        assert_eq!(render_plain(&ir, &[], &WalkOptions::root_only()), expected);
    }

    #[test]
    fn test_rules_apply_to_root_only_by_default() {
        let node = source(json!({
            "id": "1", "name": "Root", "type": "FRAME", "layoutMode": "VERTICAL",
            "children": [{"id": "2", "name": "Box", "type": "FRAME"}]
        }));
        let ir = normalize(&node, &mut TransformContext::new()).unwrap();
        let rules = vec![rule(json!({
            "id": "section", "name": "Section", "priority": 1,
            "selector": {"nodeType": "container"}, "transformer": {"htmlTag": "section"}
        }))];
        let root_matches = evaluate(&ir, &rules);

        let options = WalkOptions {
            rules: &rules,
            propagate_rules: false,
        };
        let out = render_plain(&ir, &root_matches, &options);
        assert_eq!(out, "<section data-styles=\"2\">\n  <div></div>\n</section>");

        let options = WalkOptions {
            rules: &rules,
            propagate_rules: true,
        };
        let out = render_plain(&ir, &root_matches, &options);
        assert_eq!(out, "<section data-styles=\"2\">\n  <section></section>\n</section>");
    }
}
