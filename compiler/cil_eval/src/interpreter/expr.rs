//! Expression evaluation.
//!
//! Operands are evaluated left to right, each exactly once, before the
//! node's own semantics run. The only exceptions are `and`/`or`, whose
//! right operand is skipped when the left one decides the result.

use std::collections::VecDeque;

use cil_ir::{BinaryOp, Expr, Literal};
use cil_value::errors::undefined_variable;
use cil_value::{EvalError, EvalResult, OrderedMap, OrderedSet, Record, Value};

use super::Interpreter;
use crate::methods::{collections, convert, json, maps, numeric, queues, regex, strings};
use crate::operators::{evaluate_binary, evaluate_not};

impl Interpreter<'_> {
    pub(super) fn eval(&mut self, expr: &Expr) -> EvalResult {
        match expr {
            Expr::Literal { value } => Ok(literal(value)),
            Expr::Var { name } => self.env.lookup(name).ok_or_else(|| undefined_variable(name)),
            Expr::Binary { op, left, right } => self.eval_binary(*op, left, right),
            Expr::Not { arg } => Ok(evaluate_not(&self.eval(arg)?)),
            Expr::Call { name, args } => {
                let args = self.eval_all(args)?;
                self.call_function(name, args)
            }

            // Sequences
            Expr::Array { items } => Ok(Value::array(self.eval_all(items)?)),
            Expr::Tuple { items } => Ok(Value::tuple(self.eval_all(items)?)),
            Expr::Index { base, index } => {
                let (base, index) = self.eval_pair(base, index)?;
                collections::index(&base, &index)
            }
            Expr::Slice { base, start, end } => {
                let (base, start) = self.eval_pair(base, start)?;
                let end = self.eval(end)?;
                collections::slice(&base, &start, &end)
            }
            Expr::Length { base } => collections::length(&self.eval(base)?),

            // Maps and records
            Expr::Map { items } => {
                let mut map = OrderedMap::new();
                for item in items {
                    let (key, value) = self.eval_pair(&item.key, &item.value)?;
                    map.insert(key, value)?;
                }
                Ok(Value::map(map))
            }
            Expr::Get { base, key } => {
                let (base, key) = self.eval_pair(base, key)?;
                maps::get(&base, &key)
            }
            Expr::GetDefault { base, key, default } => {
                let (base, key) = self.eval_pair(base, key)?;
                let default = self.eval(default)?;
                maps::get_default(&base, &key, &default)
            }
            Expr::Keys { base } => maps::keys(&self.eval(base)?),
            Expr::Record { fields } => {
                let mut record = Record::new();
                for field in fields {
                    let value = self.eval(&field.value)?;
                    record.set(&field.name, value);
                }
                Ok(Value::record(record))
            }
            Expr::GetField { base, name } => maps::get_field(&self.eval(base)?, name),

            // Text
            Expr::StringLength { base } => strings::string_length(&self.eval(base)?),
            Expr::Substring { base, start, end } => {
                let (base, start) = self.eval_pair(base, start)?;
                let end = self.eval(end)?;
                strings::substring(&base, &start, &end)
            }
            Expr::CharAt { base, index } => {
                let (base, index) = self.eval_pair(base, index)?;
                strings::char_at_index(&base, &index)
            }
            Expr::Join { sep, items } => {
                let (sep, items) = self.eval_pair(sep, items)?;
                collections::join(&sep, &items)
            }
            Expr::StringSplit { base, delimiter } => {
                let (base, delimiter) = self.eval_pair(base, delimiter)?;
                strings::split(&base, &delimiter)
            }
            Expr::StringTrim { base } => strings::trim(&self.eval(base)?),
            Expr::StringUpper { base } => strings::upper(&self.eval(base)?),
            Expr::StringLower { base } => strings::lower(&self.eval(base)?),
            Expr::StringStartsWith { base, prefix } => {
                let (base, prefix) = self.eval_pair(base, prefix)?;
                strings::starts_with(&base, &prefix)
            }
            Expr::StringEndsWith { base, suffix } => {
                let (base, suffix) = self.eval_pair(base, suffix)?;
                strings::ends_with(&base, &suffix)
            }
            Expr::StringContains { base, substring } => {
                let (base, needle) = self.eval_pair(base, substring)?;
                strings::contains(&base, &needle)
            }
            Expr::StringReplace { base, old, new } => {
                let (base, old) = self.eval_pair(base, old)?;
                let new = self.eval(new)?;
                strings::replace(&base, &old, &new)
            }

            // Sets, deques, heaps
            Expr::SetLiteral { items } => {
                let mut set = OrderedSet::new();
                for item in items {
                    set.insert(self.eval(item)?)?;
                }
                Ok(Value::set(set))
            }
            Expr::SetHas { base, value } => {
                let (base, value) = self.eval_pair(base, value)?;
                maps::set_has(&base, &value)
            }
            Expr::SetSize { base } => maps::set_size(&self.eval(base)?),
            Expr::DequeNew => Ok(Value::deque(VecDeque::new())),
            Expr::DequeSize { base } => queues::deque_size(&self.eval(base)?),
            Expr::HeapNew => Ok(Value::heap()),
            Expr::HeapSize { base } => queues::heap_size(&self.eval(base)?),
            Expr::HeapPeek { base } => queues::heap_peek(&self.eval(base)?),

            // Math
            Expr::Math { op, arg } => numeric::math(*op, &self.eval(arg)?),
            Expr::MathPow { base, exponent } => {
                let (base, exponent) = self.eval_pair(base, exponent)?;
                numeric::pow(&base, &exponent)
            }
            Expr::MathConst { name } => Ok(numeric::constant(*name)),

            // JSON
            Expr::JsonParse { source } => json::parse(&self.eval(source)?),
            Expr::JsonStringify { value, pretty } => {
                let value = self.eval(value)?;
                let pretty = match pretty {
                    Some(pretty) => self.eval(pretty)?.is_truthy(),
                    None => false,
                };
                json::stringify(&value, pretty)
            }

            // Regular expressions
            Expr::RegexMatch {
                string,
                pattern,
                flags,
            } => {
                let (string, pattern) = self.eval_pair(string, pattern)?;
                let flags = self.eval_opt(flags.as_deref())?;
                regex::is_match(&string, &pattern, flags.as_ref())
            }
            Expr::RegexFindAll {
                string,
                pattern,
                flags,
            } => {
                let (string, pattern) = self.eval_pair(string, pattern)?;
                let flags = self.eval_opt(flags.as_deref())?;
                regex::find_all(&string, &pattern, flags.as_ref())
            }
            Expr::RegexReplace {
                string,
                pattern,
                replacement,
                flags,
            } => {
                let (string, pattern) = self.eval_pair(string, pattern)?;
                let replacement = self.eval(replacement)?;
                let flags = self.eval_opt(flags.as_deref())?;
                regex::replace(&string, &pattern, &replacement, flags.as_ref())
            }
            Expr::RegexSplit {
                string,
                pattern,
                flags,
                maxsplit,
            } => {
                let (string, pattern) = self.eval_pair(string, pattern)?;
                let flags = self.eval_opt(flags.as_deref())?;
                let maxsplit = self.eval_opt(maxsplit.as_deref())?;
                regex::split(&string, &pattern, flags.as_ref(), maxsplit.as_ref())
            }

            // Conversions
            Expr::ToInt { value } => convert::to_int(&self.eval(value)?),
            Expr::ToFloat { value } => convert::to_float(&self.eval(value)?),
            Expr::ToString { value } => Ok(convert::to_string(&self.eval(value)?)),
        }
    }

    pub(super) fn eval_all(&mut self, exprs: &[Expr]) -> Result<Vec<Value>, EvalError> {
        exprs.iter().map(|expr| self.eval(expr)).collect()
    }

    fn eval_opt(&mut self, expr: Option<&Expr>) -> Result<Option<Value>, EvalError> {
        expr.map(|expr| self.eval(expr)).transpose()
    }

    fn eval_pair(&mut self, first: &Expr, second: &Expr) -> Result<(Value, Value), EvalError> {
        let first = self.eval(first)?;
        let second = self.eval(second)?;
        Ok((first, second))
    }

    fn eval_binary(&mut self, op: BinaryOp, left: &Expr, right: &Expr) -> EvalResult {
        let left = self.eval(left)?;
        match op {
            BinaryOp::And if !left.is_truthy() => Ok(left),
            BinaryOp::Or if left.is_truthy() => Ok(left),
            BinaryOp::And | BinaryOp::Or => self.eval(right),
            _ => {
                let right = self.eval(right)?;
                evaluate_binary(op, &left, &right)
            }
        }
    }
}

fn literal(value: &Literal) -> Value {
    match value {
        Literal::Null => Value::Null,
        Literal::Bool(b) => Value::Bool(*b),
        Literal::Int(n) => Value::Int(*n),
        Literal::Float(x) => Value::Float(*x),
        Literal::Str(s) => Value::string(s),
    }
}
