//! Typed Core IL nodes.
//!
//! The node catalog is closed: every expression and statement kind is a
//! variant here, so adding a kind is a compile-time obligation for every
//! stage that matches on these enums.
//!
//! Dual-role tags are already split. The JSON tag `Set` becomes either
//! [`Expr::SetLiteral`] or [`Stmt::MapSet`], and `Call` becomes either
//! [`Expr::Call`] or [`Stmt::Call`]. Serialization restores the original tag
//! names, so a lowered document is written back in the same wire format.

use serde::Serialize;

use crate::version::Version;

/// A complete document: version, opaque ambiguity notes and a body.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Document {
    pub version: Version,
    /// Producer notes. Carried through untouched.
    pub ambiguities: serde_json::Value,
    pub body: Vec<Stmt>,
}

/// Scalar literal payload.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Literal {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

/// Binary operators, including the short-circuit pair.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum BinaryOp {
    #[serde(rename = "+")]
    Add,
    #[serde(rename = "-")]
    Sub,
    #[serde(rename = "*")]
    Mul,
    #[serde(rename = "/")]
    Div,
    #[serde(rename = "%")]
    Mod,
    #[serde(rename = "==")]
    Eq,
    #[serde(rename = "!=")]
    NotEq,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = "<=")]
    LtEq,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = ">=")]
    GtEq,
    #[serde(rename = "and")]
    And,
    #[serde(rename = "or")]
    Or,
}

impl BinaryOp {
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        Some(match symbol {
            "+" => BinaryOp::Add,
            "-" => BinaryOp::Sub,
            "*" => BinaryOp::Mul,
            "/" => BinaryOp::Div,
            "%" => BinaryOp::Mod,
            "==" => BinaryOp::Eq,
            "!=" => BinaryOp::NotEq,
            "<" => BinaryOp::Lt,
            "<=" => BinaryOp::LtEq,
            ">" => BinaryOp::Gt,
            ">=" => BinaryOp::GtEq,
            "and" => BinaryOp::And,
            "or" => BinaryOp::Or,
            _ => return None,
        })
    }

    pub fn as_symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
            BinaryOp::Eq => "==",
            BinaryOp::NotEq => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::LtEq => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::GtEq => ">=",
            BinaryOp::And => "and",
            BinaryOp::Or => "or",
        }
    }

    /// `and`/`or` evaluate their right operand lazily.
    pub fn is_short_circuit(self) -> bool {
        matches!(self, BinaryOp::And | BinaryOp::Or)
    }
}

/// Unary functions of the `Math` node.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MathOp {
    Sin,
    Cos,
    Tan,
    Sqrt,
    Floor,
    Ceil,
    Abs,
    Log,
    Exp,
}

impl MathOp {
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "sin" => MathOp::Sin,
            "cos" => MathOp::Cos,
            "tan" => MathOp::Tan,
            "sqrt" => MathOp::Sqrt,
            "floor" => MathOp::Floor,
            "ceil" => MathOp::Ceil,
            "abs" => MathOp::Abs,
            "log" => MathOp::Log,
            "exp" => MathOp::Exp,
            _ => return None,
        })
    }
}

/// Named constants of the `MathConst` node.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MathConst {
    Pi,
    E,
}

impl MathConst {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "pi" => Some(MathConst::Pi),
            "e" => Some(MathConst::E),
            _ => None,
        }
    }
}

/// One `{key, value}` entry of a `Map` constructor.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MapItem {
    pub key: Expr,
    pub value: Expr,
}

/// One `{name, value}` entry of a `Record` constructor.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RecordField {
    pub name: String,
    pub value: Expr,
}

/// The integer range iterated by a counted `For` loop.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename = "Range")]
pub struct RangeIter {
    pub from: Expr,
    pub to: Expr,
    pub inclusive: bool,
}

/// One arm of a `Switch`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SwitchCase {
    pub value: Expr,
    pub body: Vec<Stmt>,
}

/// A function definition. Registered globally before execution starts.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FuncDef {
    pub name: String,
    pub params: Vec<String>,
    pub body: Vec<Stmt>,
}

/// Expression nodes.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum Expr {
    Literal {
        value: Literal,
    },
    Var {
        name: String,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Not {
        arg: Box<Expr>,
    },
    Call {
        name: String,
        args: Vec<Expr>,
    },

    // Sequences
    Array {
        items: Vec<Expr>,
    },
    Tuple {
        items: Vec<Expr>,
    },
    Index {
        base: Box<Expr>,
        index: Box<Expr>,
    },
    Slice {
        base: Box<Expr>,
        start: Box<Expr>,
        end: Box<Expr>,
    },
    Length {
        base: Box<Expr>,
    },

    // Maps and records
    Map {
        items: Vec<MapItem>,
    },
    Get {
        base: Box<Expr>,
        key: Box<Expr>,
    },
    GetDefault {
        base: Box<Expr>,
        key: Box<Expr>,
        default: Box<Expr>,
    },
    Keys {
        base: Box<Expr>,
    },
    Record {
        fields: Vec<RecordField>,
    },
    GetField {
        base: Box<Expr>,
        name: String,
    },

    // Text
    StringLength {
        base: Box<Expr>,
    },
    Substring {
        base: Box<Expr>,
        start: Box<Expr>,
        end: Box<Expr>,
    },
    CharAt {
        base: Box<Expr>,
        index: Box<Expr>,
    },
    Join {
        sep: Box<Expr>,
        items: Box<Expr>,
    },
    StringSplit {
        base: Box<Expr>,
        delimiter: Box<Expr>,
    },
    StringTrim {
        base: Box<Expr>,
    },
    StringUpper {
        base: Box<Expr>,
    },
    StringLower {
        base: Box<Expr>,
    },
    StringStartsWith {
        base: Box<Expr>,
        prefix: Box<Expr>,
    },
    StringEndsWith {
        base: Box<Expr>,
        suffix: Box<Expr>,
    },
    StringContains {
        base: Box<Expr>,
        substring: Box<Expr>,
    },
    StringReplace {
        base: Box<Expr>,
        old: Box<Expr>,
        new: Box<Expr>,
    },

    // Sets, deques, heaps
    #[serde(rename = "Set")]
    SetLiteral {
        items: Vec<Expr>,
    },
    SetHas {
        base: Box<Expr>,
        value: Box<Expr>,
    },
    SetSize {
        base: Box<Expr>,
    },
    DequeNew,
    DequeSize {
        base: Box<Expr>,
    },
    HeapNew,
    HeapSize {
        base: Box<Expr>,
    },
    HeapPeek {
        base: Box<Expr>,
    },

    // Math
    Math {
        op: MathOp,
        arg: Box<Expr>,
    },
    MathPow {
        base: Box<Expr>,
        exponent: Box<Expr>,
    },
    MathConst {
        name: MathConst,
    },

    // JSON
    JsonParse {
        source: Box<Expr>,
    },
    JsonStringify {
        value: Box<Expr>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pretty: Option<Box<Expr>>,
    },

    // Regular expressions
    RegexMatch {
        string: Box<Expr>,
        pattern: Box<Expr>,
        #[serde(skip_serializing_if = "Option::is_none")]
        flags: Option<Box<Expr>>,
    },
    RegexFindAll {
        string: Box<Expr>,
        pattern: Box<Expr>,
        #[serde(skip_serializing_if = "Option::is_none")]
        flags: Option<Box<Expr>>,
    },
    RegexReplace {
        string: Box<Expr>,
        pattern: Box<Expr>,
        replacement: Box<Expr>,
        #[serde(skip_serializing_if = "Option::is_none")]
        flags: Option<Box<Expr>>,
    },
    /// `maxsplit` of zero or absent splits at every match.
    RegexSplit {
        string: Box<Expr>,
        pattern: Box<Expr>,
        #[serde(skip_serializing_if = "Option::is_none")]
        flags: Option<Box<Expr>>,
        #[serde(skip_serializing_if = "Option::is_none")]
        maxsplit: Option<Box<Expr>>,
    },

    // Conversions
    ToInt {
        value: Box<Expr>,
    },
    ToFloat {
        value: Box<Expr>,
    },
    ToString {
        value: Box<Expr>,
    },
}

impl Expr {
    pub fn literal(value: Literal) -> Self {
        Expr::Literal { value }
    }

    pub fn var(name: impl Into<String>) -> Self {
        Expr::Var { name: name.into() }
    }

    pub fn binary(op: BinaryOp, left: Expr, right: Expr) -> Self {
        Expr::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }
}

/// Statement nodes.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum Stmt {
    Let {
        name: String,
        value: Expr,
    },
    Assign {
        name: String,
        value: Expr,
    },
    If {
        test: Expr,
        then: Vec<Stmt>,
        #[serde(rename = "else", skip_serializing_if = "Option::is_none")]
        else_body: Option<Vec<Stmt>>,
    },
    /// The one loop primitive. `update` runs after every iteration whose
    /// body completed normally or through `Continue`.
    While {
        test: Expr,
        body: Vec<Stmt>,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        update: Vec<Stmt>,
    },
    Print {
        args: Vec<Expr>,
    },
    Call {
        name: String,
        args: Vec<Expr>,
    },
    SetIndex {
        base: Expr,
        index: Expr,
        value: Expr,
    },
    #[serde(rename = "Set")]
    MapSet {
        base: Expr,
        key: Expr,
        value: Expr,
    },
    Push {
        base: Expr,
        value: Expr,
    },
    SetField {
        base: Expr,
        name: String,
        value: Expr,
    },
    SetAdd {
        base: Expr,
        value: Expr,
    },
    SetRemove {
        base: Expr,
        value: Expr,
    },
    PushBack {
        base: Expr,
        value: Expr,
    },
    PushFront {
        base: Expr,
        value: Expr,
    },
    PopFront {
        base: Expr,
        target: String,
    },
    PopBack {
        base: Expr,
        target: String,
    },
    HeapPush {
        base: Expr,
        priority: Expr,
        value: Expr,
    },
    HeapPop {
        base: Expr,
        target: String,
    },
    FuncDef(FuncDef),
    Return {
        #[serde(skip_serializing_if = "Option::is_none")]
        value: Option<Expr>,
    },
    /// Counted loop. Removed by lowering.
    For {
        var: String,
        iter: RangeIter,
        body: Vec<Stmt>,
    },
    /// Collection loop. Removed by lowering.
    ForEach {
        var: String,
        iter: Expr,
        body: Vec<Stmt>,
    },
    Break,
    Continue,
    Throw {
        message: Expr,
    },
    TryCatch {
        body: Vec<Stmt>,
        catch_var: String,
        catch_body: Vec<Stmt>,
        #[serde(skip_serializing_if = "Option::is_none")]
        finally_body: Option<Vec<Stmt>>,
    },
    Switch {
        test: Expr,
        cases: Vec<SwitchCase>,
        #[serde(skip_serializing_if = "Option::is_none")]
        default: Option<Vec<Stmt>>,
    },
}
