//! figrule rule engine
//!
//! Decodes mapping rules at the boundary, matches them against IR nodes and
//! folds the matches into one property map per node.
//!
//! ```text
//! rules JSON → decode → Vec<MappingRule>
//! IrNode + rules → evaluate() → Vec<RuleMatch> → resolve_conflicts()
//! ```

pub mod decode;
pub mod engine;
pub mod model;

pub use decode::{
    decode_lenient, decode_rules, decode_store, validate_rule, DecodeReport, RuleDecodeError,
    RuleLocation, RuleStore, RuleTier,
};
pub use engine::{
    conflict_severity, evaluate, evaluate_tree, inspect, resolve_conflicts, selector_matches,
    NodeReport,
};
pub use model::{
    is_structural, ConflictSeverity, MappingRule, ResolvedProperties, RuleMatch, Selector,
    Transformer,
};
