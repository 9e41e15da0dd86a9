//! First pass: every `FuncDef` in the document, at any depth, and the
//! aliases its top-level imports bind.

use rustc_hash::{FxHashMap, FxHashSet};
use serde_json::Value as Json;

use crate::walker::is_alias;

/// Function name to parameter count. A later definition of the same name
/// replaces an earlier one, as it does at runtime.
pub(crate) fn collect_arities(body: &[Json]) -> FxHashMap<String, usize> {
    let mut arities = FxHashMap::default();
    for stmt in body {
        collect(stmt, &mut arities);
    }
    arities
}

fn collect(node: &Json, arities: &mut FxHashMap<String, usize>) {
    match node {
        Json::Object(obj) => {
            if obj.get("type").and_then(Json::as_str) == Some("FuncDef") {
                if let (Some(name), Some(Json::Array(params))) =
                    (obj.get("name").and_then(Json::as_str), obj.get("params"))
                {
                    if !name.is_empty() {
                        arities.insert(name.to_string(), params.len());
                    }
                }
            }
            for child in obj.values() {
                collect(child, arities);
            }
        }
        Json::Array(items) => {
            for item in items {
                collect(item, arities);
            }
        }
        _ => {}
    }
}

/// The alias of each well-formed top-level `Import`: its `alias` field, or
/// else the last segment of its path.
pub(crate) fn collect_import_aliases(body: &[Json]) -> FxHashSet<String> {
    body.iter()
        .filter(|stmt| stmt.get("type").and_then(Json::as_str) == Some("Import"))
        .filter_map(|stmt| {
            let alias = stmt.get("alias").and_then(Json::as_str);
            let path = stmt.get("path").and_then(Json::as_str)?;
            alias.or_else(|| path.rsplit('.').next())
        })
        .filter(|alias| is_alias(alias))
        .map(str::to_string)
        .collect()
}
