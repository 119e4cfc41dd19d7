//! Rule data model.

use figrule_ir::{LayoutDirection, NodeKind, StyleValue};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Contributed-property key for the output tag.
pub const HTML_TAG: &str = "htmlTag";
/// Contributed-property key for the space-joined class list.
pub const CSS_CLASSES: &str = "cssClasses";
/// Contributed-property key for the JSON-encoded attribute map.
pub const ATTRIBUTES: &str = "attributes";

/// Contributed properties that shape the element rather than its style.
pub fn is_structural(property: &str) -> bool {
    matches!(property, HTML_TAG | CSS_CLASSES | ATTRIBUTES)
}

/// A user-authored mapping rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MappingRule {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub selector: Selector,
    pub transformer: Transformer,
    /// Higher wins. Must be finite and non-negative.
    pub priority: f64,
    /// Absent means enabled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl MappingRule {
    pub fn is_enabled(&self) -> bool {
        self.enabled != Some(false)
    }
}

/// AND-composed pattern over IR nodes. Absent fields are not checked.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Selector {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_type: Option<NodeKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout_mode: Option<LayoutDirection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_children: Option<bool>,
    /// Style keys that must be present with exactly these values.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub custom_properties: BTreeMap<String, StyleValue>,
}

impl Selector {
    pub fn is_empty(&self) -> bool {
        self.node_type.is_none()
            && self.layout_mode.is_none()
            && self.has_children.is_none()
            && self.custom_properties.is_empty()
    }
}

/// Output shaping applied when a rule matches.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transformer {
    pub html_tag: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub css_classes: Vec<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub inline_styles: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
}

impl Transformer {
    /// Flatten into the property map a match contributes: the tag, the
    /// space-joined classes, every inline style, and the attributes as a
    /// JSON object string.
    pub fn contributed_properties(&self) -> BTreeMap<String, String> {
        let mut properties = BTreeMap::new();
        properties.insert(HTML_TAG.to_string(), self.html_tag.clone());
        if !self.css_classes.is_empty() {
            properties.insert(CSS_CLASSES.to_string(), self.css_classes.join(" "));
        }
        for (key, value) in &self.inline_styles {
            properties.insert(key.clone(), value.clone());
        }
        if !self.attributes.is_empty() {
            if let Ok(encoded) = serde_json::to_string(&self.attributes) {
                properties.insert(ATTRIBUTES.to_string(), encoded);
            }
        }
        properties
    }
}

/// Disagreement level between rules contributing the same property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConflictSeverity {
    Minor,
    Major,
}

impl fmt::Display for ConflictSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ConflictSeverity::Minor => "minor",
            ConflictSeverity::Major => "major",
        })
    }
}

/// A rule that matched one node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleMatch {
    pub rule_id: String,
    pub priority: f64,
    pub contributed_properties: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conflicts_with: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conflict_severity: Option<ConflictSeverity>,
}

impl RuleMatch {
    pub fn new(rule: &MappingRule) -> Self {
        Self {
            rule_id: rule.id.clone(),
            priority: rule.priority,
            contributed_properties: rule.transformer.contributed_properties(),
            conflicts_with: Vec::new(),
            conflict_severity: None,
        }
    }

    pub fn get(&self, property: &str) -> Option<&str> {
        self.contributed_properties.get(property).map(String::as_str)
    }
}

/// Outcome of folding a sorted match list.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedProperties {
    pub resolved: BTreeMap<String, String>,
    /// Property → id of the rule whose value won.
    pub property_provenance: BTreeMap<String, String>,
}
