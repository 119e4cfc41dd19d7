//! Rule file decoding and validation.
//!
//! Everything the engine evaluates passes through here first. Accepted
//! document shapes:
//!
//! ```text
//! [ rule, ... ]                                   library
//! { "version": .., "rules": [ rule, ... ] }       library
//! { "official": [..], "community": [..], "custom": [..] }
//! ```

use crate::model::MappingRule;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::fmt;

/// Minimum priority a custom-tier rule must carry.
pub const CUSTOM_PRIORITY_FLOOR: f64 = 100.0;

/// Where a rule came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleTier {
    /// Untiered rule library.
    Library,
    Official,
    Community,
    Custom,
}

impl RuleTier {
    pub fn as_str(self) -> &'static str {
        match self {
            RuleTier::Library => "library",
            RuleTier::Official => "official",
            RuleTier::Community => "community",
            RuleTier::Custom => "custom",
        }
    }
}

impl fmt::Display for RuleTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Position of a rule inside its document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleLocation {
    pub tier: RuleTier,
    pub index: usize,
}

impl fmt::Display for RuleLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.tier, self.index)
    }
}

/// Rule decode error.
#[derive(Debug, thiserror::Error)]
pub enum RuleDecodeError {
    #[error("invalid rules JSON: {0}")]
    Syntax(#[from] serde_json::Error),

    #[error("rules document must be an array, a library with `rules`, or an object of tiers")]
    Layout,

    #[error("{location}: {message}")]
    Shape {
        location: RuleLocation,
        message: String,
    },

    #[error("{location}: rule `{rule_id}`: invalid `{field}`: {reason}")]
    Invalid {
        location: RuleLocation,
        rule_id: String,
        field: &'static str,
        reason: String,
    },

    #[error("{location}: duplicate rule id `{rule_id}`")]
    DuplicateId {
        location: RuleLocation,
        rule_id: String,
    },
}

/// Rules grouped by tier. Evaluation order is library, official, community,
/// custom.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RuleStore {
    pub library: Vec<MappingRule>,
    pub official: Vec<MappingRule>,
    pub community: Vec<MappingRule>,
    pub custom: Vec<MappingRule>,
}

impl RuleStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tier(&self, tier: RuleTier) -> &[MappingRule] {
        match tier {
            RuleTier::Library => &self.library,
            RuleTier::Official => &self.official,
            RuleTier::Community => &self.community,
            RuleTier::Custom => &self.custom,
        }
    }

    fn tier_mut(&mut self, tier: RuleTier) -> &mut Vec<MappingRule> {
        match tier {
            RuleTier::Library => &mut self.library,
            RuleTier::Official => &mut self.official,
            RuleTier::Community => &mut self.community,
            RuleTier::Custom => &mut self.custom,
        }
    }

    pub fn rules(&self) -> impl Iterator<Item = &MappingRule> {
        self.library
            .iter()
            .chain(&self.official)
            .chain(&self.community)
            .chain(&self.custom)
    }

    /// Concatenate the tiers into one evaluation list.
    pub fn into_rules(self) -> Vec<MappingRule> {
        let mut rules = self.library;
        rules.extend(self.official);
        rules.extend(self.community);
        rules.extend(self.custom);
        rules
    }

    pub fn len(&self) -> usize {
        self.library.len() + self.official.len() + self.community.len() + self.custom.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Outcome of a lenient decode: every valid rule, plus one error per
/// rejected rule.
#[derive(Debug, Default)]
pub struct DecodeReport {
    pub store: RuleStore,
    pub errors: Vec<RuleDecodeError>,
}

/// Check one decoded rule's semantic constraints.
pub fn validate_rule(rule: &MappingRule, location: RuleLocation) -> Result<(), RuleDecodeError> {
    let invalid = |field: &'static str, reason: &str| RuleDecodeError::Invalid {
        location,
        rule_id: rule.id.clone(),
        field,
        reason: reason.to_string(),
    };

    if rule.id.trim().is_empty() {
        return Err(invalid("id", "must not be empty"));
    }
    if rule.name.trim().is_empty() {
        return Err(invalid("name", "must not be empty"));
    }
    if rule.transformer.html_tag.trim().is_empty() {
        return Err(invalid("transformer.htmlTag", "must not be empty"));
    }
    if !rule.priority.is_finite() || rule.priority < 0.0 {
        return Err(invalid("priority", "must be a non-negative number"));
    }
    if location.tier == RuleTier::Custom && rule.priority < CUSTOM_PRIORITY_FLOOR {
        return Err(invalid("priority", "custom rules must have priority >= 100"));
    }
    Ok(())
}

fn tiers_of(document: Value) -> Result<Vec<(RuleTier, Vec<Value>)>, RuleDecodeError> {
    match document {
        Value::Array(rules) => Ok(vec![(RuleTier::Library, rules)]),
        Value::Object(mut object) => {
            if let Some(rules) = object.remove("rules") {
                return match rules {
                    Value::Array(rules) => Ok(vec![(RuleTier::Library, rules)]),
                    _ => Err(RuleDecodeError::Layout),
                };
            }
            let tiers = [RuleTier::Official, RuleTier::Community, RuleTier::Custom];
            if !tiers.iter().any(|tier| object.contains_key(tier.as_str())) {
                return Err(RuleDecodeError::Layout);
            }
            let mut decoded = Vec::with_capacity(tiers.len());
            for tier in tiers {
                decoded.push((tier, take_array(&mut object, tier)?));
            }
            Ok(decoded)
        }
        _ => Err(RuleDecodeError::Layout),
    }
}

fn take_array(object: &mut Map<String, Value>, tier: RuleTier) -> Result<Vec<Value>, RuleDecodeError> {
    match object.remove(tier.as_str()) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(rules)) => Ok(rules),
        Some(_) => Err(RuleDecodeError::Layout),
    }
}

/// Decode a rules document, collecting per-rule errors instead of stopping
/// at the first. Only a syntax or layout error fails the whole call.
pub fn decode_lenient(json: &str) -> Result<DecodeReport, RuleDecodeError> {
    let document: Value = serde_json::from_str(json)?;
    let mut report = DecodeReport::default();
    let mut seen = HashSet::new();

    for (tier, values) in tiers_of(document)? {
        for (index, value) in values.into_iter().enumerate() {
            let location = RuleLocation { tier, index };
            let rule = match serde_json::from_value::<MappingRule>(value) {
                Ok(rule) => rule,
                Err(err) => {
                    report.errors.push(RuleDecodeError::Shape {
                        location,
                        message: err.to_string(),
                    });
                    continue;
                }
            };
            if let Err(err) = validate_rule(&rule, location) {
                report.errors.push(err);
                continue;
            }
            if !seen.insert(rule.id.clone()) {
                report.errors.push(RuleDecodeError::DuplicateId {
                    location,
                    rule_id: rule.id,
                });
                continue;
            }
            report.store.tier_mut(tier).push(rule);
        }
    }

    tracing::debug!(
        rules = report.store.len(),
        rejected = report.errors.len(),
        "decoded rules document"
    );
    Ok(report)
}

/// Decode a rules document into its tiers, failing on the first invalid rule.
pub fn decode_store(json: &str) -> Result<RuleStore, RuleDecodeError> {
    let report = decode_lenient(json)?;
    match report.errors.into_iter().next() {
        Some(err) => Err(err),
        None => Ok(report.store),
    }
}

/// Decode a rules document into one evaluation list.
pub fn decode_rules(json: &str) -> Result<Vec<MappingRule>, RuleDecodeError> {
    Ok(decode_store(json)?.into_rules())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ids(rules: &[MappingRule]) -> Vec<&str> {
        rules.iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn test_decode_array() {
        let rules = decode_rules(
            r#"[
                {"id": "a", "name": "A", "transformer": {"htmlTag": "div"}, "priority": 1},
                {"id": "b", "name": "B", "selector": {"nodeType": "text"},
                 "transformer": {"htmlTag": "span"}, "priority": 2, "enabled": false}
            ]"#,
        )
        .unwrap();
        assert_eq!(ids(&rules), vec!["a", "b"]);
        assert!(!rules[1].is_enabled());
    }

    #[test]
    fn test_decode_library_document() {
        let rules = decode_rules(
            r#"{"version": "1.0.0", "rules": [
                {"id": "a", "name": "A", "transformer": {"htmlTag": "div"}, "priority": 0}
            ], "metadata": {}}"#,
        )
        .unwrap();
        assert_eq!(ids(&rules), vec!["a"]);
    }

    #[test]
    fn test_tiers_concatenate_in_order() {
        let store = decode_store(
            r#"{
                "custom": [{"id": "c", "name": "C", "transformer": {"htmlTag": "b"}, "priority": 100}],
                "official": [{"id": "o", "name": "O", "transformer": {"htmlTag": "i"}, "priority": 5}],
                "community": [{"id": "m", "name": "M", "transformer": {"htmlTag": "u"}, "priority": 9}]
            }"#,
        )
        .unwrap();
        assert_eq!(ids(store.tier(RuleTier::Custom)), vec!["c"]);
        assert_eq!(ids(&store.into_rules()), vec!["o", "m", "c"]);
    }

    #[test]
    fn test_custom_priority_floor() {
        let err = decode_store(
            r#"{"custom": [{"id": "c", "name": "C", "transformer": {"htmlTag": "b"}, "priority": 10}]}"#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            RuleDecodeError::Invalid { field: "priority", .. }
        ));
    }

    #[test]
    fn test_rejects_negative_priority() {
        let err = decode_rules(
            r#"[{"id": "a", "name": "A", "transformer": {"htmlTag": "div"}, "priority": -1}]"#,
        )
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "library[0]: rule `a`: invalid `priority`: must be a non-negative number"
        );
    }

    #[test]
    fn test_rejects_empty_tag() {
        let err = decode_rules(
            r#"[{"id": "a", "name": "A", "transformer": {"htmlTag": " "}, "priority": 1}]"#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            RuleDecodeError::Invalid { field: "transformer.htmlTag", .. }
        ));
    }

    #[test]
    fn test_rejects_wrong_shape() {
        let err = decode_rules(r#"[{"id": "a", "name": "A", "priority": 1}]"#).unwrap_err();
        assert!(matches!(err, RuleDecodeError::Shape { .. }));

        let err = decode_rules(
            r#"[{"id": "a", "name": "A", "transformer": {"htmlTag": "div", "attributes": "nope"}, "priority": 1}]"#,
        )
        .unwrap_err();
        assert!(matches!(err, RuleDecodeError::Shape { .. }));
    }

    #[test]
    fn test_rejects_duplicate_ids_across_tiers() {
        let err = decode_store(
            r#"{
                "official": [{"id": "x", "name": "X", "transformer": {"htmlTag": "i"}, "priority": 1}],
                "community": [{"id": "x", "name": "X2", "transformer": {"htmlTag": "u"}, "priority": 1}]
            }"#,
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "community[0]: duplicate rule id `x`");
    }

    #[test]
    fn test_rejects_unknown_layout() {
        assert!(matches!(decode_rules(r#"{"foo": []}"#), Err(RuleDecodeError::Layout)));
        assert!(matches!(decode_rules("42"), Err(RuleDecodeError::Layout)));
        assert!(matches!(decode_rules("[1,"), Err(RuleDecodeError::Syntax(_))));
    }

    #[test]
    fn test_lenient_keeps_valid_rules() {
        let report = decode_lenient(
            r#"[
                {"id": "good", "name": "Good", "transformer": {"htmlTag": "div"}, "priority": 1},
                {"id": "", "name": "Bad", "transformer": {"htmlTag": "div"}, "priority": 1},
                {"name": "Worse"}
            ]"#,
        )
        .unwrap();
        assert_eq!(ids(&report.store.library), vec!["good"]);
        assert_eq!(report.errors.len(), 2);
    }
}
