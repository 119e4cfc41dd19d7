//! Per-run transformation state.
//!
//! The only mutable state of the normalizer is the sibling-name registry.
//! It lives here, owned by the caller, so two transformation runs never
//! share counters.

use figrule_source::TokenMap;
use std::collections::HashMap;

/// Counts name occurrences per `(scope, base name)`.
#[derive(Debug, Default)]
pub struct NameRegistry {
    counters: HashMap<(Option<String>, String), usize>,
}

impl NameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// First occurrence keeps the bare name; later ones get `_01`, `_02`, ...
    pub fn unique_name(&mut self, scope: Option<&str>, base: &str) -> String {
        let count = self
            .counters
            .entry((scope.map(str::to_string), base.to_string()))
            .or_insert(0);
        let seen = *count;
        *count += 1;
        if seen == 0 {
            base.to_string()
        } else {
            format!("{base}_{seen:02}")
        }
    }

    pub fn reset(&mut self) {
        self.counters.clear();
    }
}

/// State threaded through one normalization run.
#[derive(Debug, Default)]
pub struct TransformContext<'t> {
    pub names: NameRegistry,
    pub tokens: Option<&'t TokenMap>,
}

impl<'t> TransformContext<'t> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tokens(tokens: &'t TokenMap) -> Self {
        Self {
            names: NameRegistry::new(),
            tokens: Some(tokens),
        }
    }

    /// Clear the name registry so the context can serve an unrelated run.
    pub fn reset(&mut self) {
        self.names.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_suffixes_are_zero_padded() {
        let mut names = NameRegistry::new();
        assert_eq!(names.unique_name(Some("1:1"), "Button"), "Button");
        assert_eq!(names.unique_name(Some("1:1"), "Button"), "Button_01");
        assert_eq!(names.unique_name(Some("1:1"), "Button"), "Button_02");
    }

    #[test]
    fn test_scopes_are_independent() {
        let mut names = NameRegistry::new();
        assert_eq!(names.unique_name(Some("1:1"), "Icon"), "Icon");
        assert_eq!(names.unique_name(Some("1:2"), "Icon"), "Icon");
        assert_eq!(names.unique_name(None, "Icon"), "Icon");
    }

    #[test]
    fn test_reset_clears_counters() {
        let mut ctx = TransformContext::new();
        ctx.names.unique_name(None, "Card");
        ctx.reset();
        assert_eq!(ctx.names.unique_name(None, "Card"), "Card");
    }
}
