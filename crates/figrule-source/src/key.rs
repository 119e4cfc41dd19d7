//! Node identifiers and design-file URLs.

use crate::SourceError;
use percent_encoding::percent_decode_str;
use std::fmt;

/// Cache/fetch key of the form `fileKey:nodeId`.
///
/// Node ids themselves contain a colon (`12:34`), so the key splits on the
/// first one only.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeKey {
    pub file_key: String,
    pub node_id: String,
}

impl NodeKey {
    pub fn new(file_key: impl Into<String>, node_id: impl Into<String>) -> Self {
        Self {
            file_key: file_key.into(),
            node_id: node_id.into(),
        }
    }

    pub fn parse(key: &str) -> Result<Self, SourceError> {
        match key.split_once(':') {
            Some((file_key, node_id)) if !file_key.is_empty() && !node_id.is_empty() => {
                Ok(Self::new(file_key, node_id))
            }
            _ => Err(SourceError::InvalidKey(key.to_string())),
        }
    }
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file_key, self.node_id)
    }
}

/// Extract the file key and node id from a design-file URL.
///
/// The host must be `figma.com` or one of its subdomains. Accepts
/// `/file/<key>/...`, `/design/<key>/...` and `/proto/<key>/...` paths with a
/// percent-encoded `node-id` query parameter, either hyphenated (`1-2`) or
/// colon-separated (`1%3A2`). The node id must be `<digits>:<digits>`.
pub fn parse_design_url(url: &str) -> Result<NodeKey, SourceError> {
    let invalid = |reason: &str| SourceError::InvalidUrl {
        url: url.to_string(),
        reason: reason.to_string(),
    };

    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .ok_or_else(|| invalid("expected an http(s) URL"))?;
    let rest = rest.split('#').next().unwrap_or(rest);

    let (location, query) = rest.split_once('?').unwrap_or((rest, ""));
    let (authority, path) = location.split_once('/').unwrap_or((location, ""));

    let host = authority.rsplit('@').next().unwrap_or(authority);
    let host = host.split(':').next().unwrap_or(host).to_ascii_lowercase();
    if host != "figma.com" && !host.ends_with(".figma.com") {
        return Err(invalid("host must be figma.com"));
    }

    let mut segments = path.split('/');
    let file_key = loop {
        match segments.next() {
            Some("file" | "design" | "proto") => match segments.next() {
                Some(key) if !key.is_empty() && key.chars().all(|c| c.is_ascii_alphanumeric()) => {
                    break key;
                }
                _ => return Err(invalid("could not find file key")),
            },
            Some(_) => continue,
            None => return Err(invalid("could not find file key")),
        }
    };

    let node_param = query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(name, _)| *name == "node-id")
        .map(|(_, value)| value)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| invalid("missing node-id parameter"))?;

    let decoded = percent_decode_str(node_param)
        .decode_utf8()
        .map_err(|_| invalid("node-id is not valid UTF-8"))?;
    let node_id = decoded.replace('-', ":");
    if !is_node_id(&node_id) {
        return Err(invalid("node-id must look like 123:456"));
    }
    Ok(NodeKey::new(file_key, node_id))
}

/// `<digits>:<digits>`.
fn is_node_id(id: &str) -> bool {
    let digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());
    id.split_once(':')
        .is_some_and(|(page, node)| digits(page) && digits(node))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_key() {
        let key = NodeKey::parse("abc123:12:34").unwrap();
        assert_eq!(key.file_key, "abc123");
        assert_eq!(key.node_id, "12:34");
        assert_eq!(key.to_string(), "abc123:12:34");
    }

    #[test]
    fn test_parse_key_rejects_missing_parts() {
        assert!(NodeKey::parse("abc123").is_err());
        assert!(NodeKey::parse(":12").is_err());
        assert!(NodeKey::parse("abc:").is_err());
    }

    #[test]
    fn test_parse_design_url() {
        let key =
            parse_design_url("https://www.figma.com/design/AbC123/My-File?node-id=12-34&t=x")
                .unwrap();
        assert_eq!(key, NodeKey::new("AbC123", "12:34"));
    }

    #[test]
    fn test_parse_file_url() {
        let key = parse_design_url("https://www.figma.com/file/XyZ/Title?node-id=1%3A2").unwrap();
        assert_eq!(key, NodeKey::new("XyZ", "1:2"));
    }

    #[test]
    fn test_parse_url_missing_node_id() {
        let err = parse_design_url("https://www.figma.com/file/XyZ/Title").unwrap_err();
        assert!(err.to_string().contains("node-id"));
    }

    #[test]
    fn test_parse_url_without_file_key() {
        assert!(parse_design_url("https://www.figma.com/community?node-id=1-2").is_err());
        assert!(parse_design_url("ftp://example.com/file/abc?node-id=1-2").is_err());
    }

    #[test]
    fn test_parse_url_lowercase_escape() {
        let key = parse_design_url("https://figma.com/file/XyZ/T?node-id=1%3a2").unwrap();
        assert_eq!(key, NodeKey::new("XyZ", "1:2"));
    }

    #[test]
    fn test_parse_prototype_url() {
        let key = parse_design_url("https://www.figma.com/proto/XyZ/T?node-id=1-2").unwrap();
        assert_eq!(key, NodeKey::new("XyZ", "1:2"));
    }

    #[test]
    fn test_parse_url_rejects_other_hosts() {
        let err =
            parse_design_url("https://evil.example.com/design/XyZ/T?node-id=1-2").unwrap_err();
        assert!(err.to_string().contains("figma.com"));
        assert!(parse_design_url("https://notfigma.com/design/XyZ/T?node-id=1-2").is_err());
        assert!(parse_design_url("https://www.figma.com@evil.com/design/XyZ?node-id=1-2").is_err());
    }

    #[test]
    fn test_parse_url_rejects_malformed_node_id() {
        assert!(parse_design_url("https://www.figma.com/design/XyZ/T?node-id=abc").is_err());
        assert!(parse_design_url("https://www.figma.com/design/XyZ/T?node-id=1-2-3").is_err());
        assert!(parse_design_url("https://www.figma.com/design/XyZ/T?node-id=1%3A").is_err());
    }
}
