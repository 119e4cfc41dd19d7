//! IR tree.

use crate::style::{Display, FlexDirection, PropertyMap};
use figrule_source::SourceNode;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Normalized node category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Container,
    Text,
    Image,
    Group,
}

impl NodeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            NodeKind::Container => "container",
            NodeKind::Text => "text",
            NodeKind::Image => "image",
            NodeKind::Group => "group",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Layout direction derived from `display:flex` plus `flexDirection`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutDirection {
    Horizontal,
    Vertical,
}

/// One node of the IR tree.
///
/// Borrows the source node it was built from; the IR is rebuilt whenever the
/// source changes and never outlives it.
#[derive(Debug, Clone, PartialEq)]
pub struct IrNode<'a> {
    pub id: String,
    /// Name, deduplicated among siblings.
    pub name: String,
    pub kind: NodeKind,
    pub styles: PropertyMap,
    pub children: Vec<IrNode<'a>>,
    pub source: &'a SourceNode,
}

impl<'a> IrNode<'a> {
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    pub fn layout_direction(&self) -> Option<LayoutDirection> {
        if self.styles.display() != Some(Display::Flex) {
            return None;
        }
        match self.styles.flex_direction() {
            Some(FlexDirection::Row) => Some(LayoutDirection::Horizontal),
            Some(FlexDirection::Column) => Some(LayoutDirection::Vertical),
            None => None,
        }
    }

    /// Text content; empty for non-text nodes or when the source has none.
    pub fn text(&self) -> &'a str {
        if self.kind != NodeKind::Text {
            return "";
        }
        self.source.characters.as_deref().unwrap_or("")
    }

    /// Number of nodes in this subtree.
    pub fn len(&self) -> usize {
        1 + self.children.iter().map(IrNode::len).sum::<usize>()
    }

    /// Pre-order walk over this subtree.
    pub fn walk(&self, visit: &mut impl FnMut(&IrNode<'a>)) {
        visit(self);
        for child in &self.children {
            child.walk(visit);
        }
    }
}
