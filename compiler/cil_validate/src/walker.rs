//! Registry-driven descent over statements and expressions.
//!
//! Each node is resolved against the registry for the position it occupies
//! (statement, expression or `For` iterator), gated on the document
//! version, and then its fields are checked in registry order. Context
//! (defined names, function and loop nesting) is threaded through the walk.

use cil_ir::registry::{self, BlockScope, FieldKind, FieldSpec, NodeSpec, Role, RoleSpec};
use cil_ir::{literal_from_json, BinaryOp, MathConst, MathOp, Version};
use rustc_hash::{FxHashMap, FxHashSet};
use serde_json::{Map, Value as Json};

use crate::document::violation;
use crate::Violation;

pub(crate) struct Walker {
    /// `None` when the declared version is unsupported; gating is skipped.
    version: Option<Version>,
    arities: FxHashMap<String, usize>,
    /// Aliases of top-level imports; `alias.name` calls resolve at flattening.
    imported: FxHashSet<String>,
    defined: FxHashSet<String>,
    /// Statement-list nesting; the top-level body is depth 1.
    depth: usize,
    in_function: bool,
    in_loop: bool,
    violations: Vec<Violation>,
}

impl Walker {
    pub(crate) fn new(
        version: Option<Version>,
        arities: FxHashMap<String, usize>,
        imported: FxHashSet<String>,
        violations: Vec<Violation>,
    ) -> Self {
        Walker {
            version,
            arities,
            imported,
            defined: FxHashSet::default(),
            depth: 0,
            in_function: false,
            in_loop: false,
            violations,
        }
    }

    pub(crate) fn top_level(&mut self, body: &[Json]) {
        self.block(body, "$.body");
    }

    pub(crate) fn finish(self) -> Vec<Violation> {
        self.violations
    }

    fn report(&mut self, path: &str, message: impl Into<String>) {
        self.violations.push(violation(path, message));
    }

    fn block(&mut self, stmts: &[Json], path: &str) {
        self.depth += 1;
        for (i, stmt) in stmts.iter().enumerate() {
            self.node(stmt, &format!("{path}[{i}]"), Role::Stmt);
        }
        self.depth -= 1;
    }

    /// Run `f` with the function/loop context a nested block implies.
    fn scoped(&mut self, scope: BlockScope, f: impl FnOnce(&mut Self)) {
        let saved = (self.in_function, self.in_loop);
        match scope {
            BlockScope::Inherit => {}
            BlockScope::Loop => self.in_loop = true,
            BlockScope::Function => {
                self.in_function = true;
                self.in_loop = false;
            }
            BlockScope::Detached => self.in_loop = false,
        }
        f(self);
        (self.in_function, self.in_loop) = saved;
    }

    fn node(&mut self, node: &Json, path: &str, position: Role) {
        let Json::Object(obj) = node else {
            self.report(path, "node must be an object");
            return;
        };
        let Some(tag) = obj.get("type").and_then(Json::as_str) else {
            self.report(&format!("{path}.type"), "missing type");
            return;
        };
        let Some(spec) = registry::lookup(tag) else {
            self.report(&format!("{path}.type"), format!("unknown type '{tag}'"));
            return;
        };
        let Some(role) = self.resolve(spec, obj, position, path) else {
            return;
        };

        if let Some(version) = self.version {
            if role.since > version {
                self.report(path, format!("'{tag}' requires {} or later", role.since));
            }
        }

        self.check_context(tag, path);
        self.fields(tag, obj, role, path);
        self.check_references(tag, obj, path);
    }

    /// Pick the role spec for `position`, reporting a violation if the tag
    /// cannot appear there.
    fn resolve(
        &mut self,
        spec: &'static NodeSpec,
        obj: &Map<String, Json>,
        position: Role,
        path: &str,
    ) -> Option<&'static RoleSpec> {
        let tag = spec.tag;
        if position == Role::Iter {
            if tag != "Range" {
                self.report(path, "For iter must be a Range");
                return None;
            }
        } else if tag == "Range" {
            self.report(path, "Range is only allowed as a For iter");
            return None;
        }

        if let Some((role, field)) = spec.role_by_fields(|f| obj.contains_key(f)) {
            if role != position {
                self.report(
                    path,
                    format!(
                        "'{tag}' with {field} is {}, not {}",
                        role.describe(),
                        position.describe()
                    ),
                );
                return None;
            }
        }

        let resolved = spec.role(position);
        if resolved.is_none() {
            let message = match position {
                Role::Expr => format!("unexpected expression type '{tag}'"),
                _ => format!("unexpected statement type '{tag}'"),
            };
            self.report(path, message);
        }
        resolved
    }

    fn check_context(&mut self, tag: &str, path: &str) {
        match tag {
            "Return" if !self.in_function => {
                self.report(path, "Return is only allowed inside FuncDef");
            }
            "Break" | "Continue" if !self.in_loop => {
                self.report(path, format!("{tag} is only allowed inside a loop"));
            }
            "Import" if self.depth > 1 => {
                self.report(path, "Import is only allowed at the top level");
            }
            _ => {}
        }
    }

    fn fields(&mut self, tag: &str, obj: &Map<String, Json>, role: &RoleSpec, path: &str) {
        // Function parameters are only visible inside the body.
        let outer_defined = (tag == "FuncDef").then(|| self.defined.clone());
        let mut pending: Vec<String> = Vec::new();

        for field in role.fields {
            if matches!(field.kind, FieldKind::Block(_) | FieldKind::OptionalBlock(_)) {
                self.defined.extend(pending.drain(..));
            }
            if let Some(name) = self.field(obj, *field, path) {
                pending.push(name);
            }
        }
        self.defined.extend(pending);

        if let Some(outer) = outer_defined {
            self.defined = outer;
        }
    }

    /// Check one field. Returns the name a binder field introduces.
    fn field(&mut self, obj: &Map<String, Json>, field: FieldSpec, path: &str) -> Option<String> {
        let name = field.name;
        let at = format!("{path}.{name}");
        let value = obj.get(name);
        let present = value.filter(|v| !v.is_null());

        match field.kind {
            FieldKind::Expr => match value {
                Some(node) => self.node(node, &at, Role::Expr),
                None => self.report(&at, format!("missing {name}")),
            },
            FieldKind::OptionalExpr => {
                if let Some(node) = present {
                    self.node(node, &at, Role::Expr);
                }
            }
            FieldKind::Range => match value {
                Some(node) => self.node(node, &at, Role::Iter),
                None => self.report(&at, format!("missing {name}")),
            },
            FieldKind::ExprList => match value {
                Some(Json::Array(items)) => {
                    for (i, item) in items.iter().enumerate() {
                        self.node(item, &format!("{at}[{i}]"), Role::Expr);
                    }
                }
                _ => self.report(&at, format!("missing or invalid {name}")),
            },
            FieldKind::Block(scope) => match value {
                Some(Json::Array(stmts)) => self.scoped(scope, |w| w.block(stmts, &at)),
                _ => self.report(&at, format!("missing or invalid {name}")),
            },
            FieldKind::OptionalBlock(scope) => match present {
                None => {}
                Some(Json::Array(stmts)) => self.scoped(scope, |w| w.block(stmts, &at)),
                Some(_) => self.report(&at, format!("invalid {name}")),
            },
            FieldKind::Ident | FieldKind::Binder => match non_empty_str(value) {
                Some(ident) if field.kind == FieldKind::Binder => return Some(ident.to_string()),
                Some(_) => {}
                None => self.report(&at, format!("missing or invalid {name}")),
            },
            FieldKind::FieldName => {
                if non_empty_str(value).is_none() {
                    self.report(&at, "missing or invalid field name");
                }
            }
            FieldKind::Params => self.params(value, &at),
            FieldKind::OptionalBool => {
                if present.is_some_and(|v| !v.is_boolean()) {
                    self.report(&at, format!("{name} must be a boolean"));
                }
            }
            FieldKind::BinaryOp => {
                if value.and_then(Json::as_str).and_then(BinaryOp::from_symbol).is_none() {
                    self.report(&at, format!("missing or invalid {name}"));
                }
            }
            FieldKind::MathOp => {
                if value.and_then(Json::as_str).and_then(MathOp::from_name).is_none() {
                    self.report(&at, format!("missing or invalid {name}"));
                }
            }
            FieldKind::MathConst => {
                if value.and_then(Json::as_str).and_then(MathConst::from_name).is_none() {
                    self.report(&at, format!("missing or invalid {name}"));
                }
            }
            FieldKind::LiteralValue => match value {
                None => self.report(&at, "missing value"),
                Some(v) if literal_from_json(v).is_none() => self.report(
                    &at,
                    "literal value must be null, a boolean, a number, or a string",
                ),
                Some(_) => {}
            },
            FieldKind::MapItems => {
                self.entries(value, &at, name, "item must be an object", |w, entry, p| {
                    w.required_expr(entry, "key", p);
                    w.required_expr(entry, "value", p);
                });
            }
            FieldKind::RecordFields => {
                self.entries(value, &at, name, "field must be an object", |w, entry, p| {
                    if non_empty_str(entry.get("name")).is_none() {
                        w.report(&format!("{p}.name"), "missing or invalid field name");
                    }
                    w.required_expr(entry, "value", p);
                });
            }
            FieldKind::ModulePath => {
                if !value.and_then(Json::as_str).is_some_and(is_module_path) {
                    self.report(&at, format!("missing or invalid {name}"));
                }
            }
            FieldKind::OptionalAlias => {
                if present.is_some_and(|v| v.as_str().map_or(true, |a| !is_alias(a))) {
                    self.report(&at, format!("invalid {name}"));
                }
            }
            FieldKind::Cases => {
                self.entries(value, &at, name, "case must be an object", |w, entry, p| {
                    w.case(entry, p);
                });
            }
        }
        None
    }

    fn required_expr(&mut self, obj: &Map<String, Json>, name: &str, path: &str) {
        let at = format!("{path}.{name}");
        match obj.get(name) {
            Some(node) => self.node(node, &at, Role::Expr),
            None => self.report(&at, format!("missing {name}")),
        }
    }

    fn entries(
        &mut self,
        value: Option<&Json>,
        at: &str,
        name: &str,
        not_object: &str,
        mut check: impl FnMut(&mut Self, &Map<String, Json>, &str),
    ) {
        let Some(Json::Array(items)) = value else {
            self.report(at, format!("missing or invalid {name}"));
            return;
        };
        for (i, item) in items.iter().enumerate() {
            let item_path = format!("{at}[{i}]");
            match item {
                Json::Object(entry) => check(self, entry, &item_path),
                _ => self.report(&item_path, not_object),
            }
        }
    }

    fn case(&mut self, case: &Map<String, Json>, path: &str) {
        let value_path = format!("{path}.value");
        match case.get("value") {
            None => self.report(&value_path, "missing value"),
            Some(value) if value.get("type").and_then(Json::as_str) == Some("Literal") => {
                self.node(value, &value_path, Role::Expr);
            }
            Some(_) => self.report(&value_path, "case value must be a Literal"),
        }
        let body_path = format!("{path}.body");
        match case.get("body") {
            Some(Json::Array(stmts)) => self.block(stmts, &body_path),
            _ => self.report(&body_path, "missing or invalid body"),
        }
    }

    fn params(&mut self, value: Option<&Json>, at: &str) {
        let Some(Json::Array(params)) = value else {
            self.report(at, "missing or invalid params");
            return;
        };
        for (i, param) in params.iter().enumerate() {
            match non_empty_str(Some(param)) {
                Some(name) => {
                    self.defined.insert(name.to_string());
                }
                None => self.report(
                    &format!("{at}[{i}]"),
                    "param must be a non-empty string",
                ),
            }
        }
    }

    /// Checks that need the whole node: name resolution, the closed
    /// function world and literal indices.
    fn check_references(&mut self, tag: &str, obj: &Map<String, Json>, path: &str) {
        match tag {
            "Var" => {
                if let Some(name) = non_empty_str(obj.get("name")) {
                    if !self.defined.contains(name) {
                        self.report(path, format!("variable '{name}' used before definition"));
                    }
                }
            }
            "Call" => self.check_call(obj, path),
            "Index" | "SetIndex" => self.check_literal_index(obj, path),
            _ => {}
        }
    }

    fn check_call(&mut self, obj: &Map<String, Json>, path: &str) {
        let Some(name) = non_empty_str(obj.get("name")) else {
            return;
        };
        let sealed = self.version.is_some_and(Version::is_sealed);
        if sealed && registry::SEALED_HELPER_NAMES.contains(&name) {
            self.report(
                &format!("{path}.name"),
                format!(
                    "helper function '{name}' is not allowed in v0.5; \
                     use explicit primitives (GetDefault, Keys, Push, Tuple)"
                ),
            );
            return;
        }
        let Some(&expected) = self.arities.get(name) else {
            if name
                .split_once('.')
                .is_some_and(|(alias, _)| self.imported.contains(alias))
            {
                return;
            }
            self.report(path, format!("call to undefined function '{name}'"));
            return;
        };
        if let Some(Json::Array(args)) = obj.get("args") {
            if args.len() != expected {
                self.report(
                    path,
                    format!(
                        "function '{name}' expects {expected} argument(s), got {}",
                        args.len()
                    ),
                );
            }
        }
    }

    fn check_literal_index(&mut self, obj: &Map<String, Json>, path: &str) {
        let Some(Json::Object(index)) = obj.get("index") else {
            return;
        };
        if index.get("type").and_then(Json::as_str) != Some("Literal") {
            return;
        }
        let negatives_allowed = self
            .version
            .unwrap_or(Version::LATEST)
            .allows_negative_index();
        let message = match index.get("value").and_then(Json::as_i64) {
            Some(n) if n < 0 && !negatives_allowed => "index must be a non-negative integer",
            Some(_) => return,
            None if negatives_allowed => "index must be an integer",
            None => "index must be a non-negative integer",
        };
        self.report(&format!("{path}.index"), message);
    }
}

fn non_empty_str(value: Option<&Json>) -> Option<&str> {
    value.and_then(Json::as_str).filter(|s| !s.is_empty())
}

pub(crate) fn is_alias(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_alphanumeric() || c == '_')
}

/// `lib.math`: one or more alias-shaped segments joined by dots.
fn is_module_path(path: &str) -> bool {
    path.split('.').all(is_alias)
}
