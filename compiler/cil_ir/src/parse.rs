//! JSON to typed IR.
//!
//! The parser expects a document that already passed validation, but it
//! never trusts that: any shape it cannot turn into a node is a
//! [`ParseError`] naming the offending path. Dual-role tags are split here,
//! once, using the registry's field-presence rule.

use serde_json::{Map, Value as Json};
use thiserror::Error;

use crate::ast::{
    BinaryOp, Document, Expr, FuncDef, Literal, MapItem, MathConst, MathOp, RangeIter,
    RecordField, Stmt, SwitchCase,
};
use crate::registry::{self, Role};
use crate::version::{unsupported_version_message, Version};

/// A document shape the typed IR cannot represent.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{path}: {message}")]
pub struct ParseError {
    pub path: String,
    pub message: String,
}

impl ParseError {
    #[cold]
    fn new(path: &str, message: impl Into<String>) -> Self {
        ParseError {
            path: path.to_string(),
            message: message.into(),
        }
    }
}

type ParseResult<T> = Result<T, ParseError>;

/// Parse a whole document.
pub fn parse_document(doc: &Json) -> ParseResult<Document> {
    let Json::Object(root) = doc else {
        return Err(ParseError::new("$", "document must be an object"));
    };
    let version = root
        .get("version")
        .and_then(Json::as_str)
        .and_then(Version::from_label)
        .ok_or_else(|| ParseError::new("$.version", unsupported_version_message()))?;
    let ambiguities = root
        .get("ambiguities")
        .cloned()
        .unwrap_or_else(|| Json::Array(Vec::new()));
    let body = match root.get("body") {
        Some(Json::Array(stmts)) => parse_block(stmts, "$.body")?,
        _ => return Err(ParseError::new("$.body", "body must be a list")),
    };
    tracing::debug!(%version, statements = body.len(), "parsed document");
    Ok(Document {
        version,
        ambiguities,
        body,
    })
}

/// Parse a single expression node.
pub fn parse_expr(node: &Json, path: &str) -> ParseResult<Expr> {
    let (tag, obj) = node_parts(node, path)?;
    check_role(tag, obj, Role::Expr, path)?;
    let n = Node { obj, path };

    Ok(match tag {
        "Literal" => Expr::Literal {
            value: n.literal("value")?,
        },
        "Var" => Expr::Var {
            name: n.name("name")?,
        },
        "Binary" => {
            let op = n
                .str("op")
                .and_then(BinaryOp::from_symbol)
                .ok_or_else(|| n.invalid("op"))?;
            Expr::Binary {
                op,
                left: n.boxed("left")?,
                right: n.boxed("right")?,
            }
        }
        "Not" => Expr::Not {
            arg: n.boxed("arg")?,
        },
        "Call" => Expr::Call {
            name: n.name("name")?,
            args: n.exprs("args")?,
        },
        "Array" => Expr::Array {
            items: n.exprs("items")?,
        },
        "Tuple" => Expr::Tuple {
            items: n.exprs("items")?,
        },
        "Index" => Expr::Index {
            base: n.boxed("base")?,
            index: n.boxed("index")?,
        },
        "Slice" => Expr::Slice {
            base: n.boxed("base")?,
            start: n.boxed("start")?,
            end: n.boxed("end")?,
        },
        "Length" => Expr::Length {
            base: n.boxed("base")?,
        },
        "Map" => Expr::Map {
            items: n.map_items()?,
        },
        "Get" => Expr::Get {
            base: n.boxed("base")?,
            key: n.boxed("key")?,
        },
        "GetDefault" => Expr::GetDefault {
            base: n.boxed("base")?,
            key: n.boxed("key")?,
            default: n.boxed("default")?,
        },
        "Keys" => Expr::Keys {
            base: n.boxed("base")?,
        },
        "Record" => Expr::Record {
            fields: n.record_fields()?,
        },
        "GetField" => Expr::GetField {
            base: n.boxed("base")?,
            name: n.field_name()?,
        },
        "StringLength" => Expr::StringLength {
            base: n.boxed("base")?,
        },
        "Substring" => Expr::Substring {
            base: n.boxed("base")?,
            start: n.boxed("start")?,
            end: n.boxed("end")?,
        },
        "CharAt" => Expr::CharAt {
            base: n.boxed("base")?,
            index: n.boxed("index")?,
        },
        "Join" => Expr::Join {
            sep: n.boxed("sep")?,
            items: n.boxed("items")?,
        },
        "StringSplit" => Expr::StringSplit {
            base: n.boxed("base")?,
            delimiter: n.boxed("delimiter")?,
        },
        "StringTrim" => Expr::StringTrim {
            base: n.boxed("base")?,
        },
        "StringUpper" => Expr::StringUpper {
            base: n.boxed("base")?,
        },
        "StringLower" => Expr::StringLower {
            base: n.boxed("base")?,
        },
        "StringStartsWith" => Expr::StringStartsWith {
            base: n.boxed("base")?,
            prefix: n.boxed("prefix")?,
        },
        "StringEndsWith" => Expr::StringEndsWith {
            base: n.boxed("base")?,
            suffix: n.boxed("suffix")?,
        },
        "StringContains" => Expr::StringContains {
            base: n.boxed("base")?,
            substring: n.boxed("substring")?,
        },
        "StringReplace" => Expr::StringReplace {
            base: n.boxed("base")?,
            old: n.boxed("old")?,
            new: n.boxed("new")?,
        },
        "Set" => Expr::SetLiteral {
            items: n.exprs("items")?,
        },
        "SetHas" => Expr::SetHas {
            base: n.boxed("base")?,
            value: n.boxed("value")?,
        },
        "SetSize" => Expr::SetSize {
            base: n.boxed("base")?,
        },
        "DequeNew" => Expr::DequeNew,
        "DequeSize" => Expr::DequeSize {
            base: n.boxed("base")?,
        },
        "HeapNew" => Expr::HeapNew,
        "HeapSize" => Expr::HeapSize {
            base: n.boxed("base")?,
        },
        "HeapPeek" => Expr::HeapPeek {
            base: n.boxed("base")?,
        },
        "Math" => {
            let op = n
                .str("op")
                .and_then(MathOp::from_name)
                .ok_or_else(|| n.invalid("op"))?;
            Expr::Math {
                op,
                arg: n.boxed("arg")?,
            }
        }
        "MathPow" => Expr::MathPow {
            base: n.boxed("base")?,
            exponent: n.boxed("exponent")?,
        },
        "MathConst" => Expr::MathConst {
            name: n
                .str("name")
                .and_then(MathConst::from_name)
                .ok_or_else(|| n.invalid("name"))?,
        },
        "JsonParse" => Expr::JsonParse {
            source: n.boxed("source")?,
        },
        "JsonStringify" => Expr::JsonStringify {
            value: n.boxed("value")?,
            pretty: n.opt_expr("pretty")?.map(Box::new),
        },
        "RegexMatch" => Expr::RegexMatch {
            string: n.boxed("string")?,
            pattern: n.boxed("pattern")?,
            flags: n.opt_expr("flags")?.map(Box::new),
        },
        "RegexFindAll" => Expr::RegexFindAll {
            string: n.boxed("string")?,
            pattern: n.boxed("pattern")?,
            flags: n.opt_expr("flags")?.map(Box::new),
        },
        "RegexReplace" => Expr::RegexReplace {
            string: n.boxed("string")?,
            pattern: n.boxed("pattern")?,
            replacement: n.boxed("replacement")?,
            flags: n.opt_expr("flags")?.map(Box::new),
        },
        "RegexSplit" => Expr::RegexSplit {
            string: n.boxed("string")?,
            pattern: n.boxed("pattern")?,
            flags: n.opt_expr("flags")?.map(Box::new),
            maxsplit: n.opt_expr("maxsplit")?.map(Box::new),
        },
        "ToInt" => Expr::ToInt {
            value: n.boxed("value")?,
        },
        "ToFloat" => Expr::ToFloat {
            value: n.boxed("value")?,
        },
        "ToString" => Expr::ToString {
            value: n.boxed("value")?,
        },
        other => {
            return Err(ParseError::new(
                path,
                format!("unexpected expression type '{other}'"),
            ))
        }
    })
}

/// Parse a single statement node.
pub fn parse_stmt(node: &Json, path: &str) -> ParseResult<Stmt> {
    let (tag, obj) = node_parts(node, path)?;
    check_role(tag, obj, Role::Stmt, path)?;
    let n = Node { obj, path };

    Ok(match tag {
        "Let" => Stmt::Let {
            name: n.name("name")?,
            value: n.expr("value")?,
        },
        "Assign" => Stmt::Assign {
            name: n.name("name")?,
            value: n.expr("value")?,
        },
        "If" => Stmt::If {
            test: n.expr("test")?,
            then: n.block("then")?,
            else_body: n.opt_block("else")?,
        },
        "While" => Stmt::While {
            test: n.expr("test")?,
            body: n.block("body")?,
            update: n.opt_block("update")?.unwrap_or_default(),
        },
        "Print" => Stmt::Print {
            args: n.exprs("args")?,
        },
        "Call" => Stmt::Call {
            name: n.name("name")?,
            args: n.exprs("args")?,
        },
        "SetIndex" => Stmt::SetIndex {
            base: n.expr("base")?,
            index: n.expr("index")?,
            value: n.expr("value")?,
        },
        "Set" => Stmt::MapSet {
            base: n.expr("base")?,
            key: n.expr("key")?,
            value: n.expr("value")?,
        },
        "Push" => Stmt::Push {
            base: n.expr("base")?,
            value: n.expr("value")?,
        },
        "SetField" => Stmt::SetField {
            base: n.expr("base")?,
            name: n.field_name()?,
            value: n.expr("value")?,
        },
        "SetAdd" => Stmt::SetAdd {
            base: n.expr("base")?,
            value: n.expr("value")?,
        },
        "SetRemove" => Stmt::SetRemove {
            base: n.expr("base")?,
            value: n.expr("value")?,
        },
        "PushBack" => Stmt::PushBack {
            base: n.expr("base")?,
            value: n.expr("value")?,
        },
        "PushFront" => Stmt::PushFront {
            base: n.expr("base")?,
            value: n.expr("value")?,
        },
        "PopFront" => Stmt::PopFront {
            base: n.expr("base")?,
            target: n.name("target")?,
        },
        "PopBack" => Stmt::PopBack {
            base: n.expr("base")?,
            target: n.name("target")?,
        },
        "HeapPush" => Stmt::HeapPush {
            base: n.expr("base")?,
            priority: n.expr("priority")?,
            value: n.expr("value")?,
        },
        "HeapPop" => Stmt::HeapPop {
            base: n.expr("base")?,
            target: n.name("target")?,
        },
        "FuncDef" => Stmt::FuncDef(FuncDef {
            name: n.name("name")?,
            params: n.params()?,
            body: n.block("body")?,
        }),
        "Return" => Stmt::Return {
            value: n.opt_expr("value")?,
        },
        "For" => Stmt::For {
            var: n.name("var")?,
            iter: n.range("iter")?,
            body: n.block("body")?,
        },
        "ForEach" => Stmt::ForEach {
            var: n.name("var")?,
            iter: n.expr("iter")?,
            body: n.block("body")?,
        },
        "Break" => Stmt::Break,
        "Continue" => Stmt::Continue,
        "Throw" => Stmt::Throw {
            message: n.expr("message")?,
        },
        "TryCatch" => Stmt::TryCatch {
            body: n.block("body")?,
            catch_var: n.name("catch_var")?,
            catch_body: n.block("catch_body")?,
            finally_body: n.opt_block("finally_body")?,
        },
        "Switch" => Stmt::Switch {
            test: n.expr("test")?,
            cases: n.cases()?,
            default: n.opt_block("default")?,
        },
        // Imports are flattened away before a document is parsed.
        "Import" => {
            return Err(ParseError::new(
                path,
                format!("unresolved Import of '{}'", n.str("path").unwrap_or_default()),
            ))
        }
        other => {
            return Err(ParseError::new(
                path,
                format!("unexpected statement type '{other}'"),
            ))
        }
    })
}

fn parse_block(stmts: &[Json], path: &str) -> ParseResult<Vec<Stmt>> {
    stmts
        .iter()
        .enumerate()
        .map(|(i, s)| parse_stmt(s, &format!("{path}[{i}]")))
        .collect()
}

fn node_parts<'a>(node: &'a Json, path: &str) -> ParseResult<(&'a str, &'a Map<String, Json>)> {
    let Json::Object(obj) = node else {
        return Err(ParseError::new(path, "node must be an object"));
    };
    match obj.get("type") {
        Some(Json::String(tag)) => Ok((tag.as_str(), obj)),
        _ => Err(ParseError::new(&format!("{path}.type"), "missing type")),
    }
}

/// Reject tags that are unknown or cannot appear at `position`.
fn check_role(tag: &str, obj: &Map<String, Json>, position: Role, path: &str) -> ParseResult<()> {
    let Some(spec) = registry::lookup(tag) else {
        return Err(ParseError::new(
            &format!("{path}.type"),
            format!("unknown type '{tag}'"),
        ));
    };
    if let Some((role, field)) = spec.role_by_fields(|f| obj.contains_key(f)) {
        if role != position {
            return Err(ParseError::new(
                path,
                format!(
                    "'{tag}' with {field} is {}, not {}",
                    role.describe(),
                    position.describe()
                ),
            ));
        }
    }
    if spec.role(position).is_none() {
        let message = match position {
            Role::Expr => format!("unexpected expression type '{tag}'"),
            Role::Stmt => format!("unexpected statement type '{tag}'"),
            Role::Iter => "For iter must be a Range".to_string(),
        };
        return Err(ParseError::new(path, message));
    }
    Ok(())
}

/// Field accessors for one JSON object node.
struct Node<'a> {
    obj: &'a Map<String, Json>,
    path: &'a str,
}

impl Node<'_> {
    fn at(&self, field: &str) -> String {
        format!("{}.{field}", self.path)
    }

    fn invalid(&self, field: &str) -> ParseError {
        ParseError::new(&self.at(field), format!("missing or invalid {field}"))
    }

    fn present(&self, field: &str) -> Option<&Json> {
        self.obj.get(field).filter(|v| !v.is_null())
    }

    fn str(&self, field: &str) -> Option<&str> {
        self.obj.get(field).and_then(Json::as_str)
    }

    fn expr(&self, field: &str) -> ParseResult<Expr> {
        match self.obj.get(field) {
            Some(node) => parse_expr(node, &self.at(field)),
            None => Err(ParseError::new(&self.at(field), format!("missing {field}"))),
        }
    }

    fn boxed(&self, field: &str) -> ParseResult<Box<Expr>> {
        self.expr(field).map(Box::new)
    }

    fn opt_expr(&self, field: &str) -> ParseResult<Option<Expr>> {
        self.present(field)
            .map(|node| parse_expr(node, &self.at(field)))
            .transpose()
    }

    fn exprs(&self, field: &str) -> ParseResult<Vec<Expr>> {
        let Some(Json::Array(items)) = self.obj.get(field) else {
            return Err(self.invalid(field));
        };
        let path = self.at(field);
        items
            .iter()
            .enumerate()
            .map(|(i, item)| parse_expr(item, &format!("{path}[{i}]")))
            .collect()
    }

    fn block(&self, field: &str) -> ParseResult<Vec<Stmt>> {
        match self.obj.get(field) {
            Some(Json::Array(stmts)) => parse_block(stmts, &self.at(field)),
            _ => Err(self.invalid(field)),
        }
    }

    fn opt_block(&self, field: &str) -> ParseResult<Option<Vec<Stmt>>> {
        match self.present(field) {
            None => Ok(None),
            Some(Json::Array(stmts)) => parse_block(stmts, &self.at(field)).map(Some),
            Some(_) => Err(ParseError::new(&self.at(field), format!("invalid {field}"))),
        }
    }

    fn name(&self, field: &str) -> ParseResult<String> {
        match self.str(field) {
            Some(name) if !name.is_empty() => Ok(name.to_string()),
            _ => Err(self.invalid(field)),
        }
    }

    fn field_name(&self) -> ParseResult<String> {
        match self.str("name") {
            Some(name) if !name.is_empty() => Ok(name.to_string()),
            _ => Err(ParseError::new(
                &self.at("name"),
                "missing or invalid field name",
            )),
        }
    }

    fn params(&self) -> ParseResult<Vec<String>> {
        let Some(Json::Array(params)) = self.obj.get("params") else {
            return Err(self.invalid("params"));
        };
        params
            .iter()
            .enumerate()
            .map(|(i, p)| match p.as_str() {
                Some(name) if !name.is_empty() => Ok(name.to_string()),
                _ => Err(ParseError::new(
                    &format!("{}.params[{i}]", self.path),
                    "param must be a non-empty string",
                )),
            })
            .collect()
    }

    fn literal(&self, field: &str) -> ParseResult<Literal> {
        let Some(value) = self.obj.get(field) else {
            return Err(ParseError::new(&self.at(field), "missing value"));
        };
        literal_from_json(value).ok_or_else(|| {
            ParseError::new(
                &self.at(field),
                "literal value must be null, a boolean, a number, or a string",
            )
        })
    }

    fn range(&self, field: &str) -> ParseResult<RangeIter> {
        let path = self.at(field);
        let Some(node) = self.obj.get(field) else {
            return Err(ParseError::new(&path, format!("missing {field}")));
        };
        let (tag, obj) = node_parts(node, &path)?;
        if tag != "Range" {
            return Err(ParseError::new(&path, "For iter must be a Range"));
        }
        let n = Node { obj, path: &path };
        let inclusive = match n.present("inclusive") {
            None => false,
            Some(Json::Bool(b)) => *b,
            Some(_) => {
                return Err(ParseError::new(
                    &n.at("inclusive"),
                    "inclusive must be a boolean",
                ))
            }
        };
        Ok(RangeIter {
            from: n.expr("from")?,
            to: n.expr("to")?,
            inclusive,
        })
    }

    /// Iterate the objects of a list-of-objects field.
    fn entries(
        &self,
        field: &str,
        not_object: &'static str,
    ) -> ParseResult<Vec<(String, &Map<String, Json>)>> {
        let Some(Json::Array(items)) = self.obj.get(field) else {
            return Err(self.invalid(field));
        };
        items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let path = format!("{}.{field}[{i}]", self.path);
                match item {
                    Json::Object(obj) => Ok((path, obj)),
                    _ => Err(ParseError::new(&path, not_object)),
                }
            })
            .collect()
    }

    fn map_items(&self) -> ParseResult<Vec<MapItem>> {
        self.entries("items", "item must be an object")?
            .into_iter()
            .map(|(path, obj)| {
                let n = Node { obj, path: &path };
                Ok(MapItem {
                    key: n.expr("key")?,
                    value: n.expr("value")?,
                })
            })
            .collect()
    }

    fn record_fields(&self) -> ParseResult<Vec<RecordField>> {
        self.entries("fields", "field must be an object")?
            .into_iter()
            .map(|(path, obj)| {
                let n = Node { obj, path: &path };
                Ok(RecordField {
                    name: n.field_name()?,
                    value: n.expr("value")?,
                })
            })
            .collect()
    }

    fn cases(&self) -> ParseResult<Vec<SwitchCase>> {
        self.entries("cases", "case must be an object")?
            .into_iter()
            .map(|(path, obj)| {
                let n = Node { obj, path: &path };
                Ok(SwitchCase {
                    value: n.expr("value")?,
                    body: n.block("body")?,
                })
            })
            .collect()
    }
}

/// Convert a JSON scalar into a literal. Objects, arrays and integers
/// outside the signed 64-bit range are not literals.
pub fn literal_from_json(value: &Json) -> Option<Literal> {
    match value {
        Json::Null => Some(Literal::Null),
        Json::Bool(b) => Some(Literal::Bool(*b)),
        Json::String(s) => Some(Literal::Str(s.clone())),
        Json::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(Literal::Int(i))
            } else if n.is_f64() {
                n.as_f64().map(Literal::Float)
            } else {
                None
            }
        }
        Json::Array(_) | Json::Object(_) => None,
    }
}
