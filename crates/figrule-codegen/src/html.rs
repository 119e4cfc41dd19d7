//! Markup + stylesheet dialect.
//!
//! Every element gets a class derived from its name and id; its merged
//! styles are collected under that class and rendered as a stylesheet once
//! the walk is done. Classes contributed by rules follow the derived one.

use crate::css::{self, StyleRule};
use crate::helpers::{escape_html, to_kebab_case};
use crate::walker::{render, Dialect, WalkOptions};
use figrule_ir::{IrNode, PropertyMap};
use figrule_rules::model::CSS_CLASSES;
use figrule_rules::RuleMatch;
use figrule_source::TokenMap;
use std::collections::HashSet;

/// Markup and its stylesheet.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkupOutput {
    pub html: String,
    pub css: String,
}

/// Markup dialect. Accumulates one style rule per styled element.
#[derive(Debug, Default)]
pub struct Markup {
    rules: Vec<StyleRule>,
}

impl Markup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_rules(self) -> Vec<StyleRule> {
        self.rules
    }
}

impl Dialect for Markup {
    fn style_attributes(&mut self, node: &IrNode<'_>, styles: &PropertyMap, matches: &[RuleMatch]) -> Vec<String> {
        let class = class_name(node);
        if !styles.is_empty() {
            self.rules.push(StyleRule {
                selector: format!(".{class}"),
                declarations: styles
                    .iter()
                    .map(|(property, value)| (to_kebab_case(property), value.to_string()))
                    .collect(),
            });
        }
        let mut seen = HashSet::new();
        let classes: Vec<&str> = std::iter::once(class.as_str())
            .chain(
                matches
                    .iter()
                    .filter_map(|m| m.get(CSS_CLASSES))
                    .flat_map(str::split_whitespace),
            )
            .filter(|c| seen.insert(*c))
            .collect();
        vec![format!("class=\"{}\"", escape_html(&classes.join(" ")))]
    }

    fn attribute_value(&self, value: &str) -> String {
        escape_html(value)
    }

    fn text(&self, text: &str) -> String {
        escape_html(text)
    }

    fn void_terminator(&self) -> &'static str {
        ">"
    }
}

/// `kebab-name-<id>`, with every character a class selector cannot carry
/// replaced by `-` (`1:23` → `1-23`). A result that would not start a valid
/// identifier (empty name, leading digit) is prefixed with `node-`.
pub fn class_name(node: &IrNode<'_>) -> String {
    let kebab = to_kebab_case(&node.name);
    let name: String = kebab
        .trim_matches('-')
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '-'
            }
        })
        .collect();
    let id: String = node
        .id
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '_' { c } else { '-' })
        .collect();

    let class = if name.is_empty() {
        id
    } else {
        format!("{name}-{id}")
    };
    if class.starts_with(|c: char| c.is_alphabetic() || c == '_') {
        class
    } else {
        format!("node-{class}")
    }
}

/// Render `root` as markup plus stylesheet.
pub fn generate(
    root: &IrNode<'_>,
    matches: &[RuleMatch],
    options: &WalkOptions<'_>,
    tokens: Option<&TokenMap>,
) -> MarkupOutput {
    let mut dialect = Markup::new();
    let mut html = String::new();
    render(&mut dialect, root, matches, options, 0, &mut html);
    html.push('\n');
    let css = css::generate(&dialect.into_rules(), tokens);
    MarkupOutput { html, css }
}
