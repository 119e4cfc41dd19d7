//! Utility-class component dialect.
//!
//! Styles become a `className` built from the class table, with the classes
//! rules contribute verbatim unioned in.

use crate::classes::utility_classes;
use crate::helpers::{escape_string, wrap_component};
use crate::inline::jsx_text;
use crate::walker::{render, Dialect, WalkOptions};
use figrule_ir::{IrNode, PropertyMap};
use figrule_rules::model::CSS_CLASSES;
use figrule_rules::RuleMatch;
use std::collections::HashSet;

/// Utility-class dialect.
#[derive(Debug, Default)]
pub struct UtilityClass;

impl Dialect for UtilityClass {
    fn style_attributes(&mut self, _: &IrNode<'_>, styles: &PropertyMap, matches: &[RuleMatch]) -> Vec<String> {
        let classes = class_list(styles, matches);
        if classes.is_empty() {
            return Vec::new();
        }
        vec![format!("className=\"{}\"", classes.join(" "))]
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

/// Derived classes first, then rule classes in priority order. Duplicates
/// keep their first position.
pub fn class_list(styles: &PropertyMap, matches: &[RuleMatch]) -> Vec<String> {
    let authored = matches
        .iter()
        .filter_map(|m| m.get(CSS_CLASSES))
        .flat_map(str::split_whitespace)
        .map(str::to_string);

    let mut seen = HashSet::new();
    utility_classes(styles)
        .into_iter()
        .chain(authored)
        .filter(|class| seen.insert(class.clone()))
        .collect()
}

/// Render `root` as an exported utility-class component.
pub fn generate(root: &IrNode<'_>, matches: &[RuleMatch], options: &WalkOptions<'_>) -> String {
    let mut markup = String::new();
    render(&mut UtilityClass, root, matches, options, 0, &mut markup);
    wrap_component(&root.name, &markup)
}

#[cfg(test)]
mod tests {
    use super::*;
    use figrule_ir::{Display, Property};
    use pretty_assertions::assert_eq;

    fn classes_match(classes: &str) -> RuleMatch {
        RuleMatch {
            rule_id: "r".into(),
            priority: 1.0,
            contributed_properties: [("cssClasses".to_string(), classes.to_string())]
                .into_iter()
                .collect(),
            conflicts_with: Vec::new(),
            conflict_severity: None,
        }
    }

    #[test]
    fn test_rule_classes_are_unioned() {
        let mut styles = PropertyMap::new();
        styles.set(Property::Display, Display::Flex);
        styles.set(Property::Padding, "16px");
        let matches = vec![classes_match(" btn  flex p-4 shadow ")];
        assert_eq!(class_list(&styles, &matches), vec!["flex", "p-4", "btn", "shadow"]);
    }

    #[test]
    fn test_no_classes_no_attribute() {
        let styles = PropertyMap::new();
        assert!(class_list(&styles, &[]).is_empty());
    }
}
