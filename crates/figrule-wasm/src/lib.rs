//! WASM bindings for the figrule code generator.
//!
//! Exposes `generate()` to JavaScript via wasm-bindgen.
//! Returns a JS object `{ code, styles, language, nodeCount, ruleCount }`
//! or throws on error.

use figrule_codegen::{CompileOptions, CompilerOutput, DialectKind};
use figrule_source::{DesignToken, TokenMap};
use serde::Deserialize;
use std::collections::BTreeMap;
use wasm_bindgen::prelude::*;

/// Optional settings passed as the fourth argument of `generate()`.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GenerateOptions {
    pub propagate_rules: bool,
    /// Token id → `{ name, value }`.
    pub tokens: Option<BTreeMap<String, DesignToken>>,
}

/// Generate code from a design tree and a rules document.
///
/// `rules_json` may be empty for no rules. `dialect` is `inline`,
/// `utility` or `stylesheet`; empty selects the default.
/// Throws a JS error if any input fails to decode.
#[wasm_bindgen]
pub fn generate(
    source_json: &str,
    rules_json: &str,
    dialect: &str,
    options: JsValue,
) -> Result<JsValue, JsError> {
    let options: GenerateOptions = if options.is_undefined() || options.is_null() {
        GenerateOptions::default()
    } else {
        serde_wasm_bindgen::from_value(options).map_err(|e| JsError::new(&e.to_string()))?
    };

    let output = generate_native(source_json, rules_json, dialect, options)
        .map_err(|e| JsError::new(&e))?;

    let js_obj = js_sys::Object::new();
    js_sys::Reflect::set(&js_obj, &"code".into(), &output.code.into())
        .map_err(|_| JsError::new("Failed to set code property"))?;
    js_sys::Reflect::set(&js_obj, &"styles".into(), &output.styles.into())
        .map_err(|_| JsError::new("Failed to set styles property"))?;
    js_sys::Reflect::set(&js_obj, &"language".into(), &output.language.into())
        .map_err(|_| JsError::new("Failed to set language property"))?;
    js_sys::Reflect::set(
        &js_obj,
        &"nodeCount".into(),
        &(output.metadata.node_count as u32).into(),
    )
    .map_err(|_| JsError::new("Failed to set nodeCount property"))?;
    js_sys::Reflect::set(
        &js_obj,
        &"ruleCount".into(),
        &(output.metadata.rule_count as u32).into(),
    )
    .map_err(|_| JsError::new("Failed to set ruleCount property"))?;

    Ok(js_obj.into())
}

/// Match every node against the rules and return the per-node report.
#[wasm_bindgen]
pub fn inspect(source_json: &str, rules_json: &str) -> Result<JsValue, JsError> {
    let source = figrule_source::parse_document(source_json).map_err(|e| JsError::new(&e.to_string()))?;
    let rules = decode(rules_json).map_err(|e| JsError::new(&e))?;
    let mut root = figrule_ir::normalize(&source, &mut figrule_ir::TransformContext::new())
        .ok_or_else(|| JsError::new(&format!("root node `{}` is not visible", source.id)))?;
    figrule_ir::assign_stacking_order(&mut root);

    let reports = figrule_rules::inspect(&root, &rules);
    serde_wasm_bindgen::to_value(&reports).map_err(|e| JsError::new(&e.to_string()))
}

/// Get the generator version.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn decode(rules_json: &str) -> Result<Vec<figrule_rules::MappingRule>, String> {
    if rules_json.trim().is_empty() {
        return Ok(Vec::new());
    }
    figrule_rules::decode_rules(rules_json).map_err(|e| e.to_string())
}

fn generate_native(
    source_json: &str,
    rules_json: &str,
    dialect: &str,
    options: GenerateOptions,
) -> Result<CompilerOutput, String> {
    let source = figrule_source::parse_document(source_json).map_err(|e| e.to_string())?;
    let rules = decode(rules_json)?;
    let dialect = if dialect.is_empty() {
        DialectKind::default()
    } else {
        dialect.parse::<DialectKind>().map_err(|e| e.to_string())?
    };

    let options = CompileOptions {
        dialect,
        propagate_rules_to_descendants: options.propagate_rules,
        tokens: options.tokens.map(|tokens| {
            let mut map = TokenMap::new();
            for (id, token) in tokens {
                map.insert(id, token);
            }
            map
        }),
    };
    figrule_codegen::compile(&source, &rules, &options).map_err(|e| e.to_string())
}
