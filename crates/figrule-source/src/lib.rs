//! figrule source model
//!
//! The design tool's document tree as the pipeline reads it, plus the
//! interfaces of the collaborators that supply it (remote fetch, token
//! fetch, local cache). The pipeline only ever reads a `SourceNode`.
//!
//! ```
//! use figrule_source::parse_document;
//!
//! let node = parse_document(r#"{"id":"1:2","name":"Card","type":"FRAME"}"#).unwrap();
//! assert_eq!(node.name, "Card");
//! ```

pub mod key;
pub mod node;
pub mod remote;
pub mod tokens;

pub use key::{parse_design_url, NodeKey};
pub use node::{
    AxisAlign, Color, Constraint, Constraints, Effect, EffectType, LayoutMode, Paint, PaintType,
    Rect, SourceNode, SourceNodeType, TextAlignHorizontal, TypeStyle, Vector,
};
pub use remote::{CachedNode, FetchConfig, FetchError, MemoryCache, NodeCache, NodeFetcher};
pub use tokens::{DesignToken, TokenCollections, TokenMap};

use serde::Deserialize;

/// Error reading source input.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("invalid source document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid node key `{0}`: expected `fileKey:nodeId`")]
    InvalidKey(String),

    #[error("invalid design URL `{url}`: {reason}")]
    InvalidUrl { url: String, reason: String },
}

/// Accepted document shapes: a bare node, or a cache record wrapping one.
#[derive(Deserialize)]
#[serde(untagged)]
enum DocumentShape {
    Cached(CachedNode),
    Bare(SourceNode),
}

/// Parse a source document from JSON.
pub fn parse_document(json: &str) -> Result<SourceNode, SourceError> {
    let shape: DocumentShape = serde_json::from_str(json)?;
    Ok(match shape {
        DocumentShape::Cached(cached) => cached.document,
        DocumentShape::Bare(node) => node,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_bare_document() {
        let node = parse_document(r#"{"id":"1:1","name":"Root","type":"FRAME"}"#).unwrap();
        assert_eq!(node.id, "1:1");
    }

    #[test]
    fn test_parse_cached_document() {
        let node = parse_document(
            r#"{"nodeId":"1:1","fileKey":"abc","lastModified":"2025-11-23T00:00:00Z",
                "document":{"id":"1:1","name":"Root","type":"FRAME"}}"#,
        )
        .unwrap();
        assert_eq!(node.name, "Root");
    }

    #[test]
    fn test_parse_invalid_document() {
        let err = parse_document(r#"{"name":"No id"}"#).unwrap_err();
        assert!(matches!(err, SourceError::Json(_)));
    }
}
