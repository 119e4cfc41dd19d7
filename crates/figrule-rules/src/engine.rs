//! Selector matching, conflict annotation and resolution.

use crate::model::{ConflictSeverity, MappingRule, ResolvedProperties, RuleMatch, Selector};
use figrule_ir::{IrNode, NodeKind};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// Properties whose disagreement changes layout or element identity.
const LAYOUT_PROPERTIES: [&str; 4] = ["htmlTag", "display", "position", "flexDirection"];

/// Severity of two rules disagreeing on `property`.
pub fn conflict_severity(property: &str) -> ConflictSeverity {
    if LAYOUT_PROPERTIES.contains(&property) {
        ConflictSeverity::Major
    } else {
        ConflictSeverity::Minor
    }
}

/// Every present selector field must hold. An empty selector matches anything.
pub fn selector_matches(selector: &Selector, node: &IrNode<'_>) -> bool {
    if selector.node_type.is_some_and(|kind| kind != node.kind) {
        return false;
    }
    if let Some(layout) = selector.layout_mode {
        if node.layout_direction() != Some(layout) {
            return false;
        }
    }
    if selector
        .has_children
        .is_some_and(|wanted| wanted != node.has_children())
    {
        return false;
    }
    selector
        .custom_properties
        .iter()
        .all(|(key, value)| node.styles.get_by_name(key) == Some(value))
}

/// Matches for one node, highest priority first. Equal priorities keep their
/// input order. Disabled rules are skipped.
pub fn evaluate(node: &IrNode<'_>, rules: &[MappingRule]) -> Vec<RuleMatch> {
    let mut matches: Vec<RuleMatch> = rules
        .iter()
        .filter(|rule| rule.is_enabled() && selector_matches(&rule.selector, node))
        .map(RuleMatch::new)
        .collect();
    matches.sort_by(|a, b| b.priority.total_cmp(&a.priority));
    annotate_conflicts(&mut matches);

    if !matches.is_empty() {
        tracing::debug!(node = %node.id, matched = matches.len(), "evaluated rules");
    }
    matches
}

/// Flag, per match, the other rules contributing a different value for one of
/// its properties. Informational only.
fn annotate_conflicts(matches: &mut [RuleMatch]) {
    let mut owners: HashMap<&str, Vec<(&str, &str)>> = HashMap::new();
    for m in matches.iter() {
        for (property, value) in &m.contributed_properties {
            owners
                .entry(property.as_str())
                .or_default()
                .push((m.rule_id.as_str(), value.as_str()));
        }
    }

    let annotations: Vec<(Vec<String>, Option<ConflictSeverity>)> = matches
        .iter()
        .map(|m| {
            let mut conflicts: Vec<String> = Vec::new();
            let mut severity = None;
            for (property, value) in &m.contributed_properties {
                let Some(contributors) = owners.get(property.as_str()) else {
                    continue;
                };
                let mut disagrees = false;
                for (rule_id, other) in contributors {
                    if *rule_id != m.rule_id && *other != value.as_str() {
                        disagrees = true;
                        if !conflicts.iter().any(|c| c == rule_id) {
                            conflicts.push(rule_id.to_string());
                        }
                    }
                }
                if disagrees {
                    severity = severity.max(Some(conflict_severity(property)));
                }
            }
            (conflicts, severity)
        })
        .collect();
    drop(owners);

    for (m, (conflicts, severity)) in matches.iter_mut().zip(annotations) {
        m.conflicts_with = conflicts;
        m.conflict_severity = severity;
    }
}

/// Fold a priority-sorted match list: each property takes the value of its
/// first contributor.
pub fn resolve_conflicts(matches: &[RuleMatch]) -> ResolvedProperties {
    let mut resolution = ResolvedProperties::default();
    for m in matches {
        for (property, value) in &m.contributed_properties {
            if resolution.resolved.contains_key(property) {
                continue;
            }
            resolution.resolved.insert(property.clone(), value.clone());
            resolution
                .property_provenance
                .insert(property.clone(), m.rule_id.clone());
        }
    }
    resolution
}

/// Evaluate every node of the tree. Keyed by node id.
pub fn evaluate_tree(root: &IrNode<'_>, rules: &[MappingRule]) -> BTreeMap<String, Vec<RuleMatch>> {
    let mut all = BTreeMap::new();
    root.walk(&mut |node| {
        all.insert(node.id.clone(), evaluate(node, rules));
    });
    all
}

/// Per-node evaluation report.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeReport {
    pub id: String,
    pub name: String,
    pub kind: NodeKind,
    pub matches: Vec<RuleMatch>,
    pub resolution: ResolvedProperties,
}

/// Evaluate and resolve every node, in document order.
pub fn inspect(root: &IrNode<'_>, rules: &[MappingRule]) -> Vec<NodeReport> {
    let mut reports = Vec::with_capacity(root.len());
    root.walk(&mut |node| {
        let matches = evaluate(node, rules);
        let resolution = resolve_conflicts(&matches);
        reports.push(NodeReport {
            id: node.id.clone(),
            name: node.name.clone(),
            kind: node.kind,
            matches,
            resolution,
        });
    });
    reports
}
