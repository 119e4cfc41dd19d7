//! figrule code generator
//!
//! Runs the whole pipeline over a source tree and emits one of three
//! dialects: an inline-style component, a utility-class component, or
//! markup with a stylesheet.
//!
//! ```text
//! SourceNode → normalize() → assign_stacking_order() → evaluate(root)
//!            → walker + dialect → CompilerOutput { code, styles, .. }
//! ```

pub mod classes;
pub mod css;
pub mod helpers;
pub mod html;
pub mod inline;
pub mod utility;
pub mod walker;

use figrule_ir::{assign_stacking_order, normalize, TransformContext};
use figrule_rules::{evaluate, MappingRule};
use figrule_source::{SourceNode, TokenMap};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use walker::WalkOptions;

/// Output dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DialectKind {
    /// Component with `style={{…}}` objects.
    Inline,
    /// Component with utility `className`s.
    #[default]
    Utility,
    /// Plain markup plus a class-based stylesheet.
    Stylesheet,
}

impl DialectKind {
    pub fn as_str(self) -> &'static str {
        match self {
            DialectKind::Inline => "inline",
            DialectKind::Utility => "utility",
            DialectKind::Stylesheet => "stylesheet",
        }
    }

    /// Language tag of the generated code.
    pub fn language(self) -> &'static str {
        match self {
            DialectKind::Inline | DialectKind::Utility => "tsx",
            DialectKind::Stylesheet => "html",
        }
    }
}

impl fmt::Display for DialectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DialectKind {
    type Err = CodegenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "inline" => Ok(DialectKind::Inline),
            "utility" => Ok(DialectKind::Utility),
            "stylesheet" => Ok(DialectKind::Stylesheet),
            other => Err(CodegenError::UnknownDialect(other.to_string())),
        }
    }
}

/// Pipeline configuration.
#[derive(Debug, Clone, Default)]
pub struct CompileOptions {
    pub dialect: DialectKind,
    /// Evaluate rules against every descendant, not only the root.
    pub propagate_rules_to_descendants: bool,
    /// Design tokens for `var()` resolution and the stylesheet `:root` block.
    pub tokens: Option<TokenMap>,
}

/// Counts describing one compilation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompileMetadata {
    /// Nodes in the IR tree.
    pub node_count: usize,
    /// Rules matched on the root.
    pub rule_count: usize,
}

/// The generated code.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompilerOutput {
    pub dialect: DialectKind,
    pub code: String,
    /// Stylesheet; empty for the component dialects.
    pub styles: String,
    pub language: &'static str,
    pub metadata: CompileMetadata,
}

/// Code generation error.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CodegenError {
    #[error("Codegen error: root node `{id}` is not visible")]
    InvisibleRoot { id: String },

    #[error("Codegen error: unknown dialect `{0}` (expected inline, utility or stylesheet)")]
    UnknownDialect(String),
}

/// Compile a source tree with a rule set.
pub fn compile(
    source: &SourceNode,
    rules: &[MappingRule],
    options: &CompileOptions,
) -> Result<CompilerOutput, CodegenError> {
    let mut ctx = match &options.tokens {
        Some(tokens) => TransformContext::with_tokens(tokens),
        None => TransformContext::new(),
    };
    let mut root = normalize(source, &mut ctx).ok_or_else(|| CodegenError::InvisibleRoot {
        id: source.id.clone(),
    })?;
    assign_stacking_order(&mut root);

    let matches = evaluate(&root, rules);
    let walk = WalkOptions {
        rules,
        propagate_rules: options.propagate_rules_to_descendants,
    };

    let (code, styles) = match options.dialect {
        DialectKind::Inline => (inline::generate(&root, &matches, &walk), String::new()),
        DialectKind::Utility => (utility::generate(&root, &matches, &walk), String::new()),
        DialectKind::Stylesheet => {
            let out = html::generate(&root, &matches, &walk, options.tokens.as_ref());
            (out.html, out.css)
        }
    };

    let metadata = CompileMetadata {
        node_count: root.len(),
        rule_count: matches.len(),
    };
    tracing::info!(
        dialect = %options.dialect,
        nodes = metadata.node_count,
        rules = metadata.rule_count,
        "compiled"
    );

    Ok(CompilerOutput {
        dialect: options.dialect,
        code,
        styles,
        language: options.dialect.language(),
        metadata,
    })
}
