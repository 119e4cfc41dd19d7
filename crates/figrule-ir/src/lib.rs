//! figrule intermediate representation
//!
//! Turns a raw design tree into a tree of [`IrNode`]s: invisible subtrees
//! are dropped, groups are flattened into their parents, sibling names are
//! made unique and each node gets a [`PropertyMap`] of CSS-like styles.
//!
//! ```
//! use figrule_ir::{assign_stacking_order, normalize, NodeKind, TransformContext};
//! use figrule_source::parse_document;
//!
//! let source = parse_document(
//!     r#"{"id":"1:1","name":"Row","type":"FRAME","layoutMode":"HORIZONTAL","itemSpacing":8}"#,
//! )
//! .unwrap();
//! let mut ir = normalize(&source, &mut TransformContext::new()).unwrap();
//! assign_stacking_order(&mut ir);
//! assert_eq!(ir.kind, NodeKind::Container);
//! assert_eq!(ir.styles.get_by_name("gap").unwrap().to_string(), "8px");
//! ```

pub mod context;
pub mod css;
pub mod node;
pub mod normalize;
pub mod stacking;
pub mod style;

pub use context::{NameRegistry, TransformContext};
pub use css::{color_to_css, format_number, parse_px, px};
pub use node::{IrNode, LayoutDirection, NodeKind};
pub use normalize::normalize;
pub use stacking::{apply_z_index, assign_stacking_order};
pub use style::{Display, FlexDirection, Position, Property, PropertyMap, StyleValue};
