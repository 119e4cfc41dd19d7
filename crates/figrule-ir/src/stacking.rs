//! Sibling stacking order.

use crate::node::IrNode;
use crate::style::{Position, Property};

/// If any sibling is absolutely positioned, number every sibling's `zIndex`
/// by document order, starting at 1. Otherwise leave them untouched.
pub fn apply_z_index(siblings: &mut [IrNode<'_>]) {
    let any_absolute = siblings
        .iter()
        .any(|node| node.styles.position() == Some(Position::Absolute));
    if !any_absolute {
        return;
    }
    for (index, node) in siblings.iter_mut().enumerate() {
        node.styles.set(Property::ZIndex, index + 1);
    }
}

/// Apply [`apply_z_index`] to every sibling list in the tree.
pub fn assign_stacking_order(root: &mut IrNode<'_>) {
    apply_z_index(&mut root.children);
    for child in &mut root.children {
        assign_stacking_order(child);
    }
}
