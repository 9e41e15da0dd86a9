//! Import flattening.
//!
//! An `Import` names another document by a dotted path relative to the
//! importing file: `lib.math` is `lib/math.coreil.json`. Flattening inlines
//! every top-level `FuncDef` of the imported document as `alias__name`,
//! rewrites each `alias.name` call to match and drops the `Import`
//! statements, so later stages only ever see import-free documents.
//!
//! ```text
//! main.coreil.json                         flattened
//!   Import utils                             FuncDef utils__add
//!   Call utils.add(1, 2)           ==>       Call utils__add(1, 2)
//! ```
//!
//! Each module is validated before it is inlined and flattened with its
//! own directory as the base, so transitive imports work. A module is read
//! once per flattening even when several files import it.

use std::path::{Path, PathBuf};

use rustc_hash::{FxHashMap, FxHashSet};
use serde_json::{Map, Value as Json};
use thiserror::Error;

/// Suffix of a module file on disk.
pub const MODULE_EXTENSION: &str = "coreil.json";

/// Joins a module alias and a function name in flattened documents.
pub const NAME_SEPARATOR: &str = "__";

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("cannot resolve import of '{0}' without a base directory")]
    NoBaseDir(String),
    #[error("module '{module}' not found: expected {}", .path.display())]
    NotFound { module: String, path: PathBuf },
    /// The chain lists module names from the first repeated one.
    #[error("circular import detected: {}", .chain.join(" -> "))]
    Circular { chain: Vec<String> },
    #[error("cannot load module {}: {detail}", .path.display())]
    Load { path: PathBuf, detail: String },
    #[error("module {} has validation errors: {messages}", .path.display())]
    Invalid { path: PathBuf, messages: String },
}

/// Replace every top-level `Import` in `doc` with the functions it names.
///
/// A document without imports is returned unchanged. `base_dir` is the
/// directory of the file `doc` was read from.
pub fn flatten(doc: Json, base_dir: Option<&Path>) -> Result<Json, ImportError> {
    Flattener::default().flatten(doc, base_dir)
}

/// Map a dotted module path to its file under `base_dir`.
pub fn resolve_module_path(module: &str, base_dir: &Path) -> Result<PathBuf, ImportError> {
    let mut relative: PathBuf = module.split('.').collect();
    relative.set_extension(MODULE_EXTENSION);
    let candidate = base_dir.join(relative);
    match candidate.canonicalize() {
        Ok(path) if path.is_file() => Ok(path),
        _ => Err(ImportError::NotFound {
            module: module.to_string(),
            path: candidate,
        }),
    }
}

/// A well-formed `Import` statement.
struct Import<'a> {
    module: &'a str,
    alias: &'a str,
}

impl<'a> Import<'a> {
    fn of(stmt: &'a Json) -> Option<Self> {
        if stmt.get("type").and_then(Json::as_str) != Some("Import") {
            return None;
        }
        let module = stmt
            .get("path")
            .and_then(Json::as_str)
            .filter(|m| !m.is_empty())?;
        let alias = match stmt.get("alias") {
            None | Some(Json::Null) => module.rsplit('.').next().unwrap_or(module),
            Some(alias) => alias.as_str().filter(|a| !a.is_empty() && !a.contains('.'))?,
        };
        Some(Import { module, alias })
    }
}

#[derive(Default)]
struct Flattener {
    /// Flattened documents by canonical path.
    loaded: FxHashMap<PathBuf, Json>,
    /// Modules being flattened, outermost first.
    loading: Vec<(PathBuf, String)>,
}

impl Flattener {
    fn flatten(&mut self, mut doc: Json, base_dir: Option<&Path>) -> Result<Json, ImportError> {
        let has_imports = match doc.get("body") {
            Some(Json::Array(body)) => body.iter().any(|stmt| Import::of(stmt).is_some()),
            _ => false,
        };
        if !has_imports {
            return Ok(doc);
        }

        let stmts = match doc.get_mut("body") {
            Some(Json::Array(body)) => std::mem::take(body),
            _ => Vec::new(),
        };
        let mut inlined = Vec::new();
        let mut rewrites: Vec<(String, FxHashSet<String>)> = Vec::new();
        let mut rest = Vec::with_capacity(stmts.len());

        for stmt in &stmts {
            let Some(import) = Import::of(stmt) else {
                // Malformed imports stay for the validator to report.
                rest.push(stmt.clone());
                continue;
            };
            let Some(base_dir) = base_dir else {
                return Err(ImportError::NoBaseDir(import.module.to_string()));
            };
            let path = resolve_module_path(import.module, base_dir)?;
            let module_doc = self.load(import.module, &path)?;

            let exports = exported_functions(&module_doc);
            if exports.is_empty() {
                continue;
            }
            let names: FxHashSet<String> = exports.iter().map(|(name, _)| name.clone()).collect();
            for (name, mut func) in exports {
                if let Json::Object(obj) = &mut func {
                    obj.insert("name".into(), Json::String(prefixed(import.alias, &name)));
                }
                rewrite_calls(&mut func, import.alias, &names, true);
                inlined.push(func);
            }
            tracing::debug!(
                module = import.module,
                alias = import.alias,
                functions = names.len(),
                "inlined module"
            );
            rewrites.push((import.alias.to_string(), names));
        }

        inlined.append(&mut rest);
        for (alias, names) in &rewrites {
            for stmt in &mut inlined {
                rewrite_calls(stmt, alias, names, false);
            }
        }
        if let Some(Json::Array(body)) = doc.get_mut("body") {
            *body = inlined;
        }
        Ok(doc)
    }

    /// Read, validate and flatten the module at `path`.
    fn load(&mut self, module: &str, path: &Path) -> Result<Json, ImportError> {
        if let Some(start) = self.loading.iter().position(|(p, _)| p == path) {
            let mut chain: Vec<String> = self.loading[start..]
                .iter()
                .map(|(_, name)| name.clone())
                .collect();
            chain.push(module.to_string());
            return Err(ImportError::Circular { chain });
        }
        if let Some(doc) = self.loaded.get(path) {
            return Ok(doc.clone());
        }

        self.loading.push((path.to_path_buf(), module.to_string()));
        let result = read_module(path).and_then(|doc| self.flatten(doc, path.parent()));
        self.loading.pop();

        let doc = result?;
        self.loaded.insert(path.to_path_buf(), doc.clone());
        Ok(doc)
    }
}

fn read_module(path: &Path) -> Result<Json, ImportError> {
    let load_error = |detail: String| ImportError::Load {
        path: path.to_path_buf(),
        detail,
    };
    let text = std::fs::read_to_string(path).map_err(|e| load_error(e.to_string()))?;
    let doc: Json = serde_json::from_str(&text).map_err(|e| load_error(e.to_string()))?;
    if let Err(violations) = cil_validate::check(&doc) {
        let messages: Vec<String> = violations.iter().take(5).map(ToString::to_string).collect();
        return Err(ImportError::Invalid {
            path: path.to_path_buf(),
            messages: messages.join("; "),
        });
    }
    Ok(doc)
}

/// Top-level `FuncDef`s by name, in document order. A later definition of
/// a name replaces the earlier one in place.
fn exported_functions(doc: &Json) -> Vec<(String, Json)> {
    let mut exports: Vec<(String, Json)> = Vec::new();
    let Some(Json::Array(body)) = doc.get("body") else {
        return exports;
    };
    for stmt in body {
        if stmt.get("type").and_then(Json::as_str) != Some("FuncDef") {
            continue;
        }
        let Some(name) = stmt.get("name").and_then(Json::as_str).filter(|n| !n.is_empty()) else {
            continue;
        };
        match exports.iter_mut().find(|(existing, _)| existing == name) {
            Some(entry) => entry.1 = stmt.clone(),
            None => exports.push((name.to_string(), stmt.clone())),
        }
    }
    exports
}

fn prefixed(alias: &str, name: &str) -> String {
    format!("{alias}{NAME_SEPARATOR}{name}")
}

/// Rename `alias.name` calls to `alias__name` wherever `name` is one of
/// `names`. Inside the module's own functions (`bare`), plain calls to a
/// sibling are renamed too.
fn rewrite_calls(node: &mut Json, alias: &str, names: &FxHashSet<String>, bare: bool) {
    match node {
        Json::Object(obj) => {
            rename_call(obj, alias, names, bare);
            for child in obj.values_mut() {
                rewrite_calls(child, alias, names, bare);
            }
        }
        Json::Array(items) => {
            for item in items {
                rewrite_calls(item, alias, names, bare);
            }
        }
        _ => {}
    }
}

fn rename_call(obj: &mut Map<String, Json>, alias: &str, names: &FxHashSet<String>, bare: bool) {
    if obj.get("type").and_then(Json::as_str) != Some("Call") {
        return;
    }
    let Some(name) = obj.get("name").and_then(Json::as_str) else {
        return;
    };
    let target = match name.split_once('.') {
        Some((prefix, func)) if prefix == alias => func,
        Some(_) => return,
        None if bare => name,
        None => return,
    };
    if names.contains(target) {
        let renamed = prefixed(alias, target);
        obj.insert("name".into(), Json::String(renamed));
    }
}
