//! Collaborator interfaces consumed by the pipeline.
//!
//! The network client and the on-disk cache live outside this workspace;
//! these traits pin down what the pipeline expects from them. Nothing here
//! retries: a failed fetch is reported to the caller as a typed error.

use crate::key::NodeKey;
use crate::node::SourceNode;
use crate::tokens::TokenCollections;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

/// Default request bound. Fetches never run without a timeout.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Credentials and limits for one fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchConfig {
    pub access_token: String,
    pub timeout: Duration,
}

impl FetchConfig {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            timeout: DEFAULT_FETCH_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Failure reported by a remote collaborator.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FetchError {
    #[error("node {node_id} not found in file {file_key}")]
    NotFound { file_key: String, node_id: String },

    #[error("authorization failed ({status}): {message}")]
    Unauthorized { status: u16, message: String },

    #[error("request timed out after {}ms", .timeout.as_millis())]
    Timeout { timeout: Duration },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("could not decode response: {0}")]
    Decode(String),
}

/// Fetches document subtrees from the design tool.
pub trait NodeFetcher {
    /// Fetch several nodes of one file; the result maps node id → subtree.
    fn fetch_nodes(
        &self,
        file_key: &str,
        node_ids: &[String],
        config: &FetchConfig,
    ) -> Result<BTreeMap<String, SourceNode>, FetchError>;

    /// Fetch a single node, reporting `NotFound` when the response omits it.
    fn fetch_node(&self, key: &NodeKey, config: &FetchConfig) -> Result<SourceNode, FetchError> {
        let mut nodes =
            self.fetch_nodes(&key.file_key, std::slice::from_ref(&key.node_id), config)?;
        nodes.remove(&key.node_id).ok_or_else(|| FetchError::NotFound {
            file_key: key.file_key.clone(),
            node_id: key.node_id.clone(),
        })
    }
}

/// Fetches the named design tokens of a file.
pub trait TokenFetcher {
    fn fetch_tokens(
        &self,
        file_key: &str,
        config: &FetchConfig,
    ) -> Result<TokenCollections, FetchError>;
}

/// A cached node document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CachedNode {
    pub node_id: String,
    pub file_key: String,
    pub document: SourceNode,
    pub last_modified: String,
}

/// Local node cache keyed by node id.
pub trait NodeCache {
    /// `None` when the node has not been cached; never an error.
    fn load(&self, node_id: &str) -> Option<CachedNode>;

    fn save(&mut self, node: CachedNode);
}

/// Process-local cache, used by tests and by hosts without persistence.
#[derive(Debug, Default)]
pub struct MemoryCache {
    nodes: HashMap<String, CachedNode>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl NodeCache for MemoryCache {
    fn load(&self, node_id: &str) -> Option<CachedNode> {
        self.nodes.get(node_id).cloned()
    }

    fn save(&mut self, node: CachedNode) {
        tracing::debug!(node_id = %node.node_id, "caching node document");
        self.nodes.insert(node.node_id.clone(), node);
    }
}

/// Serve from the cache when possible, otherwise fetch and store.
pub fn load_or_fetch(
    cache: &mut impl NodeCache,
    fetcher: &impl NodeFetcher,
    key: &NodeKey,
    config: &FetchConfig,
    last_modified: impl Into<String>,
) -> Result<SourceNode, FetchError> {
    if let Some(cached) = cache.load(&key.node_id) {
        return Ok(cached.document);
    }
    let document = fetcher.fetch_node(key, config)?;
    cache.save(CachedNode {
        node_id: key.node_id.clone(),
        file_key: key.file_key.clone(),
        document: document.clone(),
        last_modified: last_modified.into(),
    });
    Ok(document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::SourceNodeType;
    use pretty_assertions::assert_eq;
    use std::cell::Cell;

    struct StubFetcher {
        calls: Cell<usize>,
        fail_with: Option<FetchError>,
    }

    impl StubFetcher {
        fn ok() -> Self {
            Self {
                calls: Cell::new(0),
                fail_with: None,
            }
        }
    }

    impl NodeFetcher for StubFetcher {
        fn fetch_nodes(
            &self,
            _file_key: &str,
            node_ids: &[String],
            _config: &FetchConfig,
        ) -> Result<BTreeMap<String, SourceNode>, FetchError> {
            self.calls.set(self.calls.get() + 1);
            if let Some(err) = &self.fail_with {
                return Err(err.clone());
            }
            Ok(node_ids
                .iter()
                .filter(|id| id.as_str() != "404:0")
                .map(|id| {
                    let node = SourceNode {
                        id: id.clone(),
                        name: "Fetched".into(),
                        node_type: SourceNodeType::Frame,
                        ..SourceNode::default()
                    };
                    (id.clone(), node)
                })
                .collect())
        }
    }

    #[test]
    fn test_default_timeout_is_bounded() {
        let config = FetchConfig::new("token");
        assert_eq!(config.timeout, Duration::from_secs(10));
        let config = config.with_timeout(Duration::from_millis(250));
        assert_eq!(config.timeout, Duration::from_millis(250));
    }

    #[test]
    fn test_fetch_node_not_found() {
        let fetcher = StubFetcher::ok();
        let err = fetcher
            .fetch_node(&NodeKey::new("file", "404:0"), &FetchConfig::new("t"))
            .unwrap_err();
        assert_eq!(
            err,
            FetchError::NotFound {
                file_key: "file".into(),
                node_id: "404:0".into()
            }
        );
    }

    #[test]
    fn test_timeout_message_names_bound() {
        let err = FetchError::Timeout {
            timeout: Duration::from_millis(1500),
        };
        assert_eq!(err.to_string(), "request timed out after 1500ms");
    }

    #[test]
    fn test_memory_cache_miss_is_none() {
        let cache = MemoryCache::new();
        assert!(cache.load("1:1").is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_load_or_fetch_populates_cache_once() {
        let mut cache = MemoryCache::new();
        let fetcher = StubFetcher::ok();
        let key = NodeKey::new("file", "1:2");
        let config = FetchConfig::new("t");

        let first = load_or_fetch(&mut cache, &fetcher, &key, &config, "2025-01-01").unwrap();
        let second = load_or_fetch(&mut cache, &fetcher, &key, &config, "2025-01-01").unwrap();

        assert_eq!(first, second);
        assert_eq!(fetcher.calls.get(), 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_load_or_fetch_surfaces_auth_failure() {
        let mut cache = MemoryCache::new();
        let fetcher = StubFetcher {
            calls: Cell::new(0),
            fail_with: Some(FetchError::Unauthorized {
                status: 403,
                message: "Invalid token".into(),
            }),
        };
        let err = load_or_fetch(
            &mut cache,
            &fetcher,
            &NodeKey::new("file", "1:2"),
            &FetchConfig::new("bad"),
            "",
        )
        .unwrap_err();
        assert!(matches!(err, FetchError::Unauthorized { status: 403, .. }));
        assert!(cache.is_empty());
    }
}
