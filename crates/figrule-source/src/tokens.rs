//! Design tokens (named variables) bound to node properties.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A named design token with its resolved literal value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignToken {
    /// Token name as authored, e.g. `Colors/Brand/Primary`.
    pub name: String,
    /// Literal CSS value, e.g. `#1E40AF` or `16px`.
    pub value: String,
}

/// Nested token collection as returned by a token fetcher:
/// collection name → token id → token.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TokenCollections {
    pub collections: BTreeMap<String, BTreeMap<String, DesignToken>>,
}

/// Flat lookup from token id to token.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TokenMap {
    tokens: BTreeMap<String, DesignToken>,
}

impl TokenMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flatten nested collections. Later collections win on duplicate ids.
    pub fn from_collections(collections: &TokenCollections) -> Self {
        let mut map = Self::new();
        for tokens in collections.collections.values() {
            for (id, token) in tokens {
                map.insert(id.clone(), token.clone());
            }
        }
        map
    }

    pub fn insert(&mut self, id: impl Into<String>, token: DesignToken) {
        self.tokens.insert(short_id(&id.into()).to_string(), token);
    }

    pub fn get(&self, id: &str) -> Option<&DesignToken> {
        self.tokens.get(short_id(id))
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DesignToken> {
        self.tokens.values()
    }

    /// `var(--name, fallback)` when the token is known, otherwise `fallback`.
    pub fn resolve(&self, id: &str, fallback: &str) -> String {
        match self.get(id) {
            Some(token) => format!("var(--{}, {fallback})", css_variable_name(&token.name)),
            None => fallback.to_string(),
        }
    }
}

/// Resolve against an optional map; with no map the literal is used as-is.
pub fn resolve_token(tokens: Option<&TokenMap>, id: &str, fallback: &str) -> String {
    match tokens {
        Some(map) => map.resolve(id, fallback),
        None => fallback.to_string(),
    }
}

/// `Colors/Brand Primary` → `Colors-Brand-Primary`.
pub fn css_variable_name(name: &str) -> String {
    name.replace('/', "-")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}

/// Token ids arrive either short (`125:11`) or prefixed
/// (`VariableID:abc123/125:11`); both key the same entry.
fn short_id(id: &str) -> &str {
    id.rsplit_once('/').map_or(id, |(_, tail)| tail)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn token(name: &str, value: &str) -> DesignToken {
        DesignToken {
            name: name.into(),
            value: value.into(),
        }
    }

    #[test]
    fn test_css_variable_name() {
        assert_eq!(css_variable_name("Colors/Extra/02"), "Colors-Extra-02");
        assert_eq!(css_variable_name("Spacing/Small  Gap"), "Spacing-Small-Gap");
    }

    #[test]
    fn test_resolve_known_token() {
        let mut map = TokenMap::new();
        map.insert("125:11", token("Colors/Primary", "#1E40AF"));
        assert_eq!(
            map.resolve("VariableID:abc/125:11", "#1E40AF"),
            "var(--Colors-Primary, #1E40AF)"
        );
    }

    #[test]
    fn test_resolve_unknown_token_uses_literal() {
        let map = TokenMap::new();
        assert_eq!(map.resolve("9:9", "#FFFFFF"), "#FFFFFF");
        assert_eq!(resolve_token(None, "9:9", "#FFFFFF"), "#FFFFFF");
    }

    #[test]
    fn test_from_collections_flattens() {
        let mut collections = TokenCollections::default();
        collections
            .collections
            .entry("Colors".into())
            .or_default()
            .insert("1:1".into(), token("Colors/Red", "#FF0000"));
        collections
            .collections
            .entry("Spacing".into())
            .or_default()
            .insert("2:1".into(), token("Spacing/Md", "16px"));

        let map = TokenMap::from_collections(&collections);
        assert_eq!(map.len(), 2);
        assert_eq!(map.get("2:1").map(|t| t.value.as_str()), Some("16px"));
    }
}
