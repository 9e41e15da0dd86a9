//! Read-only traversal of the typed IR.
//!
//! Override `visit_*` methods to react to particular nodes and call the
//! matching `walk_*` function to continue into children. The visitor may
//! mutate its own state; the IR stays immutable.
//!
//! ```text
//! struct CountCalls(usize);
//!
//! impl<'ast> Visitor<'ast> for CountCalls {
//!     fn visit_expr(&mut self, expr: &'ast Expr) {
//!         if let Expr::Call { .. } = expr {
//!             self.0 += 1;
//!         }
//!         walk_expr(self, expr);
//!     }
//! }
//! ```

use crate::ast::{Expr, FuncDef, Stmt};

pub trait Visitor<'ast> {
    fn visit_block(&mut self, block: &'ast [Stmt]) {
        walk_block(self, block);
    }

    fn visit_stmt(&mut self, stmt: &'ast Stmt) {
        walk_stmt(self, stmt);
    }

    fn visit_expr(&mut self, expr: &'ast Expr) {
        walk_expr(self, expr);
    }

    fn visit_func_def(&mut self, func: &'ast FuncDef) {
        self.visit_block(&func.body);
    }

    /// Called for every name a statement binds or assigns.
    fn visit_binding(&mut self, name: &'ast str) {
        let _ = name;
    }
}

pub fn walk_block<'ast, V: Visitor<'ast> + ?Sized>(visitor: &mut V, block: &'ast [Stmt]) {
    for stmt in block {
        visitor.visit_stmt(stmt);
    }
}

pub fn walk_stmt<'ast, V: Visitor<'ast> + ?Sized>(visitor: &mut V, stmt: &'ast Stmt) {
    match stmt {
        Stmt::Let { name, value } | Stmt::Assign { name, value } => {
            visitor.visit_expr(value);
            visitor.visit_binding(name);
        }
        Stmt::If {
            test,
            then,
            else_body,
        } => {
            visitor.visit_expr(test);
            visitor.visit_block(then);
            if let Some(else_body) = else_body {
                visitor.visit_block(else_body);
            }
        }
        Stmt::While { test, body, update } => {
            visitor.visit_expr(test);
            visitor.visit_block(body);
            visitor.visit_block(update);
        }
        Stmt::Print { args } | Stmt::Call { args, .. } => {
            for arg in args {
                visitor.visit_expr(arg);
            }
        }
        Stmt::SetIndex { base, index, value }
        | Stmt::MapSet {
            base,
            key: index,
            value,
        }
        | Stmt::HeapPush {
            base,
            priority: index,
            value,
        } => {
            visitor.visit_expr(base);
            visitor.visit_expr(index);
            visitor.visit_expr(value);
        }
        Stmt::Push { base, value }
        | Stmt::SetField { base, value, .. }
        | Stmt::SetAdd { base, value }
        | Stmt::SetRemove { base, value }
        | Stmt::PushBack { base, value }
        | Stmt::PushFront { base, value } => {
            visitor.visit_expr(base);
            visitor.visit_expr(value);
        }
        Stmt::PopFront { base, target }
        | Stmt::PopBack { base, target }
        | Stmt::HeapPop { base, target } => {
            visitor.visit_expr(base);
            visitor.visit_binding(target);
        }
        Stmt::FuncDef(func) => {
            for param in &func.params {
                visitor.visit_binding(param);
            }
            visitor.visit_func_def(func);
        }
        Stmt::Return { value } => {
            if let Some(value) = value {
                visitor.visit_expr(value);
            }
        }
        Stmt::For { var, iter, body } => {
            visitor.visit_expr(&iter.from);
            visitor.visit_expr(&iter.to);
            visitor.visit_binding(var);
            visitor.visit_block(body);
        }
        Stmt::ForEach { var, iter, body } => {
            visitor.visit_expr(iter);
            visitor.visit_binding(var);
            visitor.visit_block(body);
        }
        Stmt::Break | Stmt::Continue => {}
        Stmt::Throw { message } => visitor.visit_expr(message),
        Stmt::TryCatch {
            body,
            catch_var,
            catch_body,
            finally_body,
        } => {
            visitor.visit_block(body);
            visitor.visit_binding(catch_var);
            visitor.visit_block(catch_body);
            if let Some(finally_body) = finally_body {
                visitor.visit_block(finally_body);
            }
        }
        Stmt::Switch {
            test,
            cases,
            default,
        } => {
            visitor.visit_expr(test);
            for case in cases {
                visitor.visit_expr(&case.value);
                visitor.visit_block(&case.body);
            }
            if let Some(default) = default {
                visitor.visit_block(default);
            }
        }
    }
}

pub fn walk_expr<'ast, V: Visitor<'ast> + ?Sized>(visitor: &mut V, expr: &'ast Expr) {
    match expr {
        Expr::Literal { .. }
        | Expr::Var { .. }
        | Expr::DequeNew
        | Expr::HeapNew
        | Expr::MathConst { .. } => {}
        Expr::Binary { left, right, .. } => {
            visitor.visit_expr(left);
            visitor.visit_expr(right);
        }
        Expr::Call { args: items, .. }
        | Expr::Array { items }
        | Expr::Tuple { items }
        | Expr::SetLiteral { items } => {
            for item in items {
                visitor.visit_expr(item);
            }
        }
        Expr::Map { items } => {
            for item in items {
                visitor.visit_expr(&item.key);
                visitor.visit_expr(&item.value);
            }
        }
        Expr::Record { fields } => {
            for field in fields {
                visitor.visit_expr(&field.value);
            }
        }
        Expr::Not { arg: a }
        | Expr::Math { arg: a, .. }
        | Expr::Length { base: a }
        | Expr::Keys { base: a }
        | Expr::GetField { base: a, .. }
        | Expr::StringLength { base: a }
        | Expr::StringTrim { base: a }
        | Expr::StringUpper { base: a }
        | Expr::StringLower { base: a }
        | Expr::SetSize { base: a }
        | Expr::DequeSize { base: a }
        | Expr::HeapSize { base: a }
        | Expr::HeapPeek { base: a }
        | Expr::JsonParse { source: a }
        | Expr::ToInt { value: a }
        | Expr::ToFloat { value: a }
        | Expr::ToString { value: a } => visitor.visit_expr(a),
        Expr::Index { base: a, index: b }
        | Expr::Get { base: a, key: b }
        | Expr::CharAt { base: a, index: b }
        | Expr::Join { sep: a, items: b }
        | Expr::StringSplit {
            base: a,
            delimiter: b,
        }
        | Expr::StringStartsWith { base: a, prefix: b }
        | Expr::StringEndsWith { base: a, suffix: b }
        | Expr::StringContains {
            base: a,
            substring: b,
        }
        | Expr::SetHas { base: a, value: b }
        | Expr::MathPow {
            base: a,
            exponent: b,
        } => {
            visitor.visit_expr(a);
            visitor.visit_expr(b);
        }
        Expr::Slice {
            base: a,
            start: b,
            end: c,
        }
        | Expr::Substring {
            base: a,
            start: b,
            end: c,
        }
        | Expr::GetDefault {
            base: a,
            key: b,
            default: c,
        }
        | Expr::StringReplace {
            base: a,
            old: b,
            new: c,
        } => {
            visitor.visit_expr(a);
            visitor.visit_expr(b);
            visitor.visit_expr(c);
        }
        Expr::JsonStringify { value, pretty } => {
            visitor.visit_expr(value);
            if let Some(pretty) = pretty {
                visitor.visit_expr(pretty);
            }
        }
        Expr::RegexMatch {
            string,
            pattern,
            flags,
        }
        | Expr::RegexFindAll {
            string,
            pattern,
            flags,
        } => {
            visitor.visit_expr(string);
            visitor.visit_expr(pattern);
            if let Some(flags) = flags {
                visitor.visit_expr(flags);
            }
        }
        Expr::RegexReplace {
            string,
            pattern,
            replacement,
            flags,
        } => {
            visitor.visit_expr(string);
            visitor.visit_expr(pattern);
            visitor.visit_expr(replacement);
            if let Some(flags) = flags {
                visitor.visit_expr(flags);
            }
        }
        Expr::RegexSplit {
            string,
            pattern,
            flags,
            maxsplit,
        } => {
            visitor.visit_expr(string);
            visitor.visit_expr(pattern);
            for extra in [flags, maxsplit].into_iter().flatten() {
                visitor.visit_expr(extra);
            }
        }
    }
}
