//! The node registry: the closed catalog of node kinds.
//!
//! Every tag maps to one [`NodeSpec`] listing the roles the tag can play,
//! the version that introduced each role, and the ordered field list of
//! that role. The registry is purely declarative. The validator walks
//! documents by following these tables, and the parser uses the same
//! tables to split dual-role tags.

use crate::version::Version;

/// The syntactic position a node occupies.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Role {
    Expr,
    Stmt,
    /// Only `Range`, only as the `iter` of a `For`.
    Iter,
}

impl Role {
    pub fn describe(self) -> &'static str {
        match self {
            Role::Expr => "an expression",
            Role::Stmt => "a statement",
            Role::Iter => "an iterator",
        }
    }
}

/// How a nested statement list relates to the enclosing context.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BlockScope {
    /// Same function and loop context as the parent.
    Inherit,
    /// A loop body: `Break`/`Continue` become legal.
    Loop,
    /// A function body: `Return` becomes legal, loop context is cleared.
    Function,
    /// Runs between loop iterations: `Break`/`Continue` are not legal.
    Detached,
}

/// The shape a field must have.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FieldKind {
    /// A required expression.
    Expr,
    /// An expression that may be absent.
    OptionalExpr,
    /// A required list of expressions.
    ExprList,
    /// A required list of statements.
    Block(BlockScope),
    /// A list of statements that may be absent.
    OptionalBlock(BlockScope),
    /// A non-empty name referring to something already in scope.
    Ident,
    /// A non-empty name that this node binds.
    Binder,
    /// A record field name.
    FieldName,
    /// A list of parameter names.
    Params,
    /// A boolean that may be absent.
    OptionalBool,
    BinaryOp,
    MathOp,
    MathConst,
    /// The scalar payload of `Literal`.
    LiteralValue,
    /// `[{key, value}]` entries of a map constructor.
    MapItems,
    /// `[{name, value}]` entries of a record constructor.
    RecordFields,
    /// `[{value, body}]` arms of a switch.
    Cases,
    /// A `Range` node in iterator position.
    Range,
    /// A dotted module path such as `lib.math`.
    ModulePath,
    /// A non-empty name without dots that may be absent.
    OptionalAlias,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
}

/// One role of a tag: its introduction version and field list.
#[derive(Debug)]
pub struct RoleSpec {
    pub role: Role,
    pub since: Version,
    pub fields: &'static [FieldSpec],
}

/// A catalog entry.
#[derive(Debug)]
pub struct NodeSpec {
    pub tag: &'static str,
    pub roles: &'static [RoleSpec],
}

impl NodeSpec {
    /// The role spec for `role`, if this tag can play it.
    pub fn role(&self, role: Role) -> Option<&'static RoleSpec> {
        self.roles.iter().find(|r| r.role == role)
    }

    pub fn is_dual_role(&self) -> bool {
        self.roles.len() > 1
    }

    /// Decide a dual-role tag's role from the fields that are present.
    ///
    /// Returns the role owning the first present field that the other role
    /// does not have, together with that field's name. Tags whose roles
    /// share one field set (`Call`) never discriminate: their role is their
    /// position.
    pub fn role_by_fields(
        &self,
        has_field: impl Fn(&str) -> bool,
    ) -> Option<(Role, &'static str)> {
        if !self.is_dual_role() {
            return None;
        }
        for spec in self.roles {
            for field in spec.fields {
                let shared = self
                    .roles
                    .iter()
                    .filter(|other| other.role != spec.role)
                    .any(|other| other.fields.iter().any(|f| f.name == field.name));
                if !shared && has_field(field.name) {
                    return Some((spec.role, field.name));
                }
            }
        }
        None
    }
}

/// Look up a tag in the catalog.
pub fn lookup(tag: &str) -> Option<&'static NodeSpec> {
    CATALOG.iter().find(|spec| spec.tag == tag)
}

/// Every catalog entry, in catalog order.
pub fn catalog() -> &'static [NodeSpec] {
    CATALOG
}

/// Legacy helper names that sealed documents must not call.
pub const SEALED_HELPER_NAMES: &[&str] = &["get_or_default", "keys", "append", "entries"];

const fn f(name: &'static str, kind: FieldKind) -> FieldSpec {
    FieldSpec { name, kind }
}

const fn expr(since: Version, fields: &'static [FieldSpec]) -> RoleSpec {
    RoleSpec {
        role: Role::Expr,
        since,
        fields,
    }
}

const fn stmt(since: Version, fields: &'static [FieldSpec]) -> RoleSpec {
    RoleSpec {
        role: Role::Stmt,
        since,
        fields,
    }
}

use BlockScope::{Detached, Function, Inherit, Loop};
use FieldKind as K;

const BASE: FieldSpec = f("base", K::Expr);
const BASE_ONLY: &[FieldSpec] = &[BASE];
const BASE_VALUE: &[FieldSpec] = &[BASE, f("value", K::Expr)];
const BASE_TARGET: &[FieldSpec] = &[BASE, f("target", K::Binder)];
const ITEMS: &[FieldSpec] = &[f("items", K::ExprList)];
const NAME_VALUE: &[FieldSpec] = &[f("name", K::Binder), f("value", K::Expr)];
const CALL: &[FieldSpec] = &[f("name", K::Ident), f("args", K::ExprList)];
const CONVERSION: &[FieldSpec] = &[f("value", K::Expr)];
const REGEX: &[FieldSpec] = &[
    f("string", K::Expr),
    f("pattern", K::Expr),
    f("flags", K::OptionalExpr),
];
const EMPTY: &[FieldSpec] = &[];

static CATALOG: &[NodeSpec] = &[
    // Core
    NodeSpec {
        tag: "Literal",
        roles: &[expr(Version::V0_1, &[f("value", K::LiteralValue)])],
    },
    NodeSpec {
        tag: "Var",
        roles: &[expr(Version::V0_1, &[f("name", K::Ident)])],
    },
    NodeSpec {
        tag: "Binary",
        roles: &[expr(
            Version::V0_1,
            &[
                f("op", K::BinaryOp),
                f("left", K::Expr),
                f("right", K::Expr),
            ],
        )],
    },
    NodeSpec {
        tag: "Not",
        roles: &[expr(Version::V1_5, &[f("arg", K::Expr)])],
    },
    NodeSpec {
        tag: "Call",
        roles: &[expr(Version::V0_1, CALL), stmt(Version::V0_1, CALL)],
    },
    NodeSpec {
        tag: "Let",
        roles: &[stmt(Version::V0_1, NAME_VALUE)],
    },
    NodeSpec {
        tag: "Assign",
        roles: &[stmt(Version::V0_1, NAME_VALUE)],
    },
    NodeSpec {
        tag: "If",
        roles: &[stmt(
            Version::V0_1,
            &[
                f("test", K::Expr),
                f("then", K::Block(Inherit)),
                f("else", K::OptionalBlock(Inherit)),
            ],
        )],
    },
    NodeSpec {
        tag: "While",
        roles: &[stmt(
            Version::V0_1,
            &[
                f("test", K::Expr),
                f("body", K::Block(Loop)),
                f("update", K::OptionalBlock(Detached)),
            ],
        )],
    },
    NodeSpec {
        tag: "Print",
        roles: &[stmt(Version::V0_1, &[f("args", K::ExprList)])],
    },
    // Sequences
    NodeSpec {
        tag: "Array",
        roles: &[expr(Version::V0_2, ITEMS)],
    },
    NodeSpec {
        tag: "Index",
        roles: &[expr(Version::V0_2, &[BASE, f("index", K::Expr)])],
    },
    NodeSpec {
        tag: "Length",
        roles: &[expr(Version::V0_2, BASE_ONLY)],
    },
    NodeSpec {
        tag: "SetIndex",
        roles: &[stmt(
            Version::V0_2,
            &[BASE, f("index", K::Expr), f("value", K::Expr)],
        )],
    },
    // Functions and sugared loops
    NodeSpec {
        tag: "FuncDef",
        roles: &[stmt(
            Version::V0_3,
            &[
                f("name", K::Ident),
                f("params", K::Params),
                f("body", K::Block(Function)),
            ],
        )],
    },
    NodeSpec {
        tag: "Return",
        roles: &[stmt(Version::V0_3, &[f("value", K::OptionalExpr)])],
    },
    NodeSpec {
        tag: "For",
        roles: &[stmt(
            Version::V0_3,
            &[
                f("var", K::Binder),
                f("iter", K::Range),
                f("body", K::Block(Loop)),
            ],
        )],
    },
    NodeSpec {
        tag: "ForEach",
        roles: &[stmt(
            Version::V0_3,
            &[
                f("var", K::Binder),
                f("iter", K::Expr),
                f("body", K::Block(Loop)),
            ],
        )],
    },
    NodeSpec {
        tag: "Range",
        roles: &[RoleSpec {
            role: Role::Iter,
            since: Version::V0_3,
            fields: &[
                f("from", K::Expr),
                f("to", K::Expr),
                f("inclusive", K::OptionalBool),
            ],
        }],
    },
    // Maps and tuples
    NodeSpec {
        tag: "Map",
        roles: &[expr(Version::V0_4, &[f("items", K::MapItems)])],
    },
    NodeSpec {
        tag: "Get",
        roles: &[expr(Version::V0_4, &[BASE, f("key", K::Expr)])],
    },
    NodeSpec {
        tag: "Set",
        roles: &[
            expr(Version::V1_1, ITEMS),
            stmt(
                Version::V0_4,
                &[BASE, f("key", K::Expr), f("value", K::Expr)],
            ),
        ],
    },
    NodeSpec {
        tag: "GetDefault",
        roles: &[expr(
            Version::V0_5,
            &[BASE, f("key", K::Expr), f("default", K::Expr)],
        )],
    },
    NodeSpec {
        tag: "Keys",
        roles: &[expr(Version::V0_5, BASE_ONLY)],
    },
    NodeSpec {
        tag: "Tuple",
        roles: &[expr(Version::V0_5, ITEMS)],
    },
    NodeSpec {
        tag: "Push",
        roles: &[stmt(Version::V0_5, BASE_VALUE)],
    },
    // Records
    NodeSpec {
        tag: "Record",
        roles: &[expr(Version::V1_1, &[f("fields", K::RecordFields)])],
    },
    NodeSpec {
        tag: "GetField",
        roles: &[expr(Version::V1_1, &[BASE, f("name", K::FieldName)])],
    },
    NodeSpec {
        tag: "SetField",
        roles: &[stmt(
            Version::V1_1,
            &[BASE, f("name", K::FieldName), f("value", K::Expr)],
        )],
    },
    // Text
    NodeSpec {
        tag: "StringLength",
        roles: &[expr(Version::V1_1, BASE_ONLY)],
    },
    NodeSpec {
        tag: "Substring",
        roles: &[expr(
            Version::V1_1,
            &[BASE, f("start", K::Expr), f("end", K::Expr)],
        )],
    },
    NodeSpec {
        tag: "CharAt",
        roles: &[expr(Version::V1_1, &[BASE, f("index", K::Expr)])],
    },
    NodeSpec {
        tag: "Join",
        roles: &[expr(Version::V1_1, &[f("sep", K::Expr), f("items", K::Expr)])],
    },
    // Sets, deques, heaps
    NodeSpec {
        tag: "SetHas",
        roles: &[expr(Version::V1_1, BASE_VALUE)],
    },
    NodeSpec {
        tag: "SetSize",
        roles: &[expr(Version::V1_1, BASE_ONLY)],
    },
    NodeSpec {
        tag: "SetAdd",
        roles: &[stmt(Version::V1_1, BASE_VALUE)],
    },
    NodeSpec {
        tag: "SetRemove",
        roles: &[stmt(Version::V1_1, BASE_VALUE)],
    },
    NodeSpec {
        tag: "DequeNew",
        roles: &[expr(Version::V1_1, EMPTY)],
    },
    NodeSpec {
        tag: "DequeSize",
        roles: &[expr(Version::V1_1, BASE_ONLY)],
    },
    NodeSpec {
        tag: "PushBack",
        roles: &[stmt(Version::V1_1, BASE_VALUE)],
    },
    NodeSpec {
        tag: "PushFront",
        roles: &[stmt(Version::V1_1, BASE_VALUE)],
    },
    NodeSpec {
        tag: "PopFront",
        roles: &[stmt(Version::V1_1, BASE_TARGET)],
    },
    NodeSpec {
        tag: "PopBack",
        roles: &[stmt(Version::V1_1, BASE_TARGET)],
    },
    NodeSpec {
        tag: "HeapNew",
        roles: &[expr(Version::V1_1, EMPTY)],
    },
    NodeSpec {
        tag: "HeapSize",
        roles: &[expr(Version::V1_1, BASE_ONLY)],
    },
    NodeSpec {
        tag: "HeapPeek",
        roles: &[expr(Version::V1_1, BASE_ONLY)],
    },
    NodeSpec {
        tag: "HeapPush",
        roles: &[stmt(
            Version::V1_1,
            &[BASE, f("priority", K::Expr), f("value", K::Expr)],
        )],
    },
    NodeSpec {
        tag: "HeapPop",
        roles: &[stmt(Version::V1_1, BASE_TARGET)],
    },
    // Math
    NodeSpec {
        tag: "Math",
        roles: &[expr(Version::V1_2, &[f("op", K::MathOp), f("arg", K::Expr)])],
    },
    NodeSpec {
        tag: "MathPow",
        roles: &[expr(Version::V1_2, &[BASE, f("exponent", K::Expr)])],
    },
    NodeSpec {
        tag: "MathConst",
        roles: &[expr(Version::V1_2, &[f("name", K::MathConst)])],
    },
    // JSON
    NodeSpec {
        tag: "JsonParse",
        roles: &[expr(Version::V1_3, &[f("source", K::Expr)])],
    },
    NodeSpec {
        tag: "JsonStringify",
        roles: &[expr(
            Version::V1_3,
            &[f("value", K::Expr), f("pretty", K::OptionalExpr)],
        )],
    },
    // Regular expressions
    NodeSpec {
        tag: "RegexMatch",
        roles: &[expr(Version::V1_3, REGEX)],
    },
    NodeSpec {
        tag: "RegexFindAll",
        roles: &[expr(Version::V1_3, REGEX)],
    },
    NodeSpec {
        tag: "RegexReplace",
        roles: &[expr(
            Version::V1_3,
            &[
                f("string", K::Expr),
                f("pattern", K::Expr),
                f("replacement", K::Expr),
                f("flags", K::OptionalExpr),
            ],
        )],
    },
    NodeSpec {
        tag: "RegexSplit",
        roles: &[expr(
            Version::V1_3,
            &[
                f("string", K::Expr),
                f("pattern", K::Expr),
                f("flags", K::OptionalExpr),
                f("maxsplit", K::OptionalExpr),
            ],
        )],
    },
    // Text, continued
    NodeSpec {
        tag: "StringSplit",
        roles: &[expr(Version::V1_4, &[BASE, f("delimiter", K::Expr)])],
    },
    NodeSpec {
        tag: "StringTrim",
        roles: &[expr(Version::V1_4, BASE_ONLY)],
    },
    NodeSpec {
        tag: "StringUpper",
        roles: &[expr(Version::V1_4, BASE_ONLY)],
    },
    NodeSpec {
        tag: "StringLower",
        roles: &[expr(Version::V1_4, BASE_ONLY)],
    },
    NodeSpec {
        tag: "StringStartsWith",
        roles: &[expr(Version::V1_4, &[BASE, f("prefix", K::Expr)])],
    },
    NodeSpec {
        tag: "StringEndsWith",
        roles: &[expr(Version::V1_4, &[BASE, f("suffix", K::Expr)])],
    },
    NodeSpec {
        tag: "StringContains",
        roles: &[expr(Version::V1_4, &[BASE, f("substring", K::Expr)])],
    },
    NodeSpec {
        tag: "StringReplace",
        roles: &[expr(
            Version::V1_4,
            &[BASE, f("old", K::Expr), f("new", K::Expr)],
        )],
    },
    NodeSpec {
        tag: "Slice",
        roles: &[expr(
            Version::V1_5,
            &[BASE, f("start", K::Expr), f("end", K::Expr)],
        )],
    },
    // Control flow
    NodeSpec {
        tag: "Break",
        roles: &[stmt(Version::V1_7, EMPTY)],
    },
    NodeSpec {
        tag: "Continue",
        roles: &[stmt(Version::V1_7, EMPTY)],
    },
    NodeSpec {
        tag: "Throw",
        roles: &[stmt(Version::V1_8, &[f("message", K::Expr)])],
    },
    NodeSpec {
        tag: "TryCatch",
        roles: &[stmt(
            Version::V1_8,
            &[
                f("body", K::Block(Inherit)),
                f("catch_var", K::Binder),
                f("catch_body", K::Block(Inherit)),
                f("finally_body", K::OptionalBlock(Inherit)),
            ],
        )],
    },
    // Conversions
    NodeSpec {
        tag: "ToInt",
        roles: &[expr(Version::V1_9, CONVERSION)],
    },
    NodeSpec {
        tag: "ToFloat",
        roles: &[expr(Version::V1_9, CONVERSION)],
    },
    NodeSpec {
        tag: "ToString",
        roles: &[expr(Version::V1_9, CONVERSION)],
    },
    NodeSpec {
        tag: "Switch",
        roles: &[stmt(
            Version::V1_10,
            &[
                f("test", K::Expr),
                f("cases", K::Cases),
                f("default", K::OptionalBlock(Inherit)),
            ],
        )],
    },
    // Modules
    NodeSpec {
        tag: "Import",
        roles: &[stmt(
            Version::V1_10_5,
            &[f("path", K::ModulePath), f("alias", K::OptionalAlias)],
        )],
    },
];
