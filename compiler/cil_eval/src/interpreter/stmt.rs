//! Statement execution.

use cil_ir::{Expr, Stmt, SwitchCase};
use cil_value::errors::{malformed, throw_requires_text, thrown};
use cil_value::{ErrorKind, Value};

use super::Interpreter;
use crate::exec::{ExecResult, Flow};
use crate::methods::queues::End;
use crate::methods::{collections, maps, queues};

impl Interpreter<'_> {
    /// Run statements in order until one finishes with anything other than
    /// [`Flow::Normal`].
    pub(super) fn exec_block(&mut self, block: &[Stmt]) -> ExecResult {
        for stmt in block {
            match self.exec(stmt)? {
                Flow::Normal => {}
                flow => return Ok(flow),
            }
        }
        Ok(Flow::Normal)
    }

    fn exec(&mut self, stmt: &Stmt) -> ExecResult {
        match stmt {
            Stmt::Let { name, value } | Stmt::Assign { name, value } => {
                let value = self.eval(value)?;
                self.env.bind(name, value);
            }
            Stmt::If {
                test,
                then,
                else_body,
            } => {
                if self.eval(test)?.is_truthy() {
                    return self.exec_block(then);
                }
                if let Some(else_body) = else_body {
                    return self.exec_block(else_body);
                }
            }
            Stmt::While { test, body, update } => return self.exec_while(test, body, update),
            Stmt::Print { args } => {
                let line = self
                    .eval_all(args)?
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(" ");
                self.print_handler.println(&line);
            }
            Stmt::Call { name, args } => {
                let args = self.eval_all(args)?;
                self.call_function(name, args)?;
            }

            // Mutation
            Stmt::SetIndex { base, index, value } => {
                let base = self.eval(base)?;
                let index = self.eval(index)?;
                let value = self.eval(value)?;
                collections::set_index(&base, &index, value)?;
            }
            Stmt::MapSet { base, key, value } => {
                let base = self.eval(base)?;
                let key = self.eval(key)?;
                let value = self.eval(value)?;
                maps::insert(&base, key, value)?;
            }
            Stmt::Push { base, value } => {
                let base = self.eval(base)?;
                collections::push(&base, self.eval(value)?)?;
            }
            Stmt::SetField { base, name, value } => {
                let base = self.eval(base)?;
                maps::set_field(&base, name, self.eval(value)?)?;
            }
            Stmt::SetAdd { base, value } => {
                let base = self.eval(base)?;
                maps::set_add(&base, self.eval(value)?)?;
            }
            Stmt::SetRemove { base, value } => {
                let base = self.eval(base)?;
                let value = self.eval(value)?;
                maps::set_remove(&base, &value)?;
            }
            Stmt::PushBack { base, value } => {
                let base = self.eval(base)?;
                queues::deque_push(&base, End::Back, self.eval(value)?)?;
            }
            Stmt::PushFront { base, value } => {
                let base = self.eval(base)?;
                queues::deque_push(&base, End::Front, self.eval(value)?)?;
            }
            Stmt::PopFront { base, target } => {
                let popped = queues::deque_pop(&self.eval(base)?, End::Front)?;
                self.env.bind(target, popped);
            }
            Stmt::PopBack { base, target } => {
                let popped = queues::deque_pop(&self.eval(base)?, End::Back)?;
                self.env.bind(target, popped);
            }
            Stmt::HeapPush {
                base,
                priority,
                value,
            } => {
                let base = self.eval(base)?;
                let priority = self.eval(priority)?;
                queues::heap_push(&base, &priority, self.eval(value)?)?;
            }
            Stmt::HeapPop { base, target } => {
                let popped = queues::heap_pop(&self.eval(base)?)?;
                self.env.bind(target, popped);
            }

            // Registered before execution starts.
            Stmt::FuncDef(_) => {}

            // Control
            Stmt::Return { value } => {
                let value = match value {
                    Some(value) => self.eval(value)?,
                    None => Value::Null,
                };
                return Ok(Flow::Return(value));
            }
            Stmt::Break => return Ok(Flow::Break),
            Stmt::Continue => return Ok(Flow::Continue),
            Stmt::Throw { message } => {
                let message = self.eval(message)?;
                let Value::Str(text) = &message else {
                    return Err(throw_requires_text(&message));
                };
                return Err(thrown(text));
            }
            Stmt::TryCatch {
                body,
                catch_var,
                catch_body,
                finally_body,
            } => return self.exec_try(body, catch_var, catch_body, finally_body.as_deref()),
            Stmt::Switch {
                test,
                cases,
                default,
            } => return self.exec_switch(test, cases, default.as_deref()),

            Stmt::For { .. } => return Err(malformed("'For' must be lowered before execution")),
            Stmt::ForEach { .. } => {
                return Err(malformed("'ForEach' must be lowered before execution"));
            }
        }
        Ok(Flow::Normal)
    }

    /// The update block runs after a body that finished normally or with
    /// `Continue`, never after `Break`, `Return` or an error.
    fn exec_while(&mut self, test: &Expr, body: &[Stmt], update: &[Stmt]) -> ExecResult {
        while self.eval(test)?.is_truthy() {
            match self.exec_block(body)? {
                Flow::Normal | Flow::Continue => {}
                Flow::Break => break,
                flow @ Flow::Return(_) => return Ok(flow),
            }
            match self.exec_block(update)? {
                Flow::Normal => {}
                flow @ Flow::Return(_) => return Ok(flow),
                Flow::Break | Flow::Continue => {
                    return Err(malformed("loop control inside a 'While' update"));
                }
            }
        }
        Ok(Flow::Normal)
    }

    /// Runtime errors, thrown ones included, are caught; malformed input is
    /// not. `finally_body` always runs, and a non-normal outcome from it
    /// replaces whatever the body or handler produced.
    fn exec_try(
        &mut self,
        body: &[Stmt],
        catch_var: &str,
        catch_body: &[Stmt],
        finally_body: Option<&[Stmt]>,
    ) -> ExecResult {
        let outcome = match self.exec_block(body) {
            Err(err) if err.kind != ErrorKind::Validation => {
                tracing::debug!(kind = %err.kind, message = %err.message, "caught error");
                self.env.bind(catch_var, Value::string(&err.message));
                self.exec_block(catch_body)
            }
            outcome => outcome,
        };
        if let Some(finally_body) = finally_body {
            match self.exec_block(finally_body)? {
                Flow::Normal => {}
                flow => return Ok(flow),
            }
        }
        outcome
    }

    /// `test` is evaluated once; the first case equal to it runs, with no
    /// fallthrough.
    fn exec_switch(
        &mut self,
        test: &Expr,
        cases: &[SwitchCase],
        default: Option<&[Stmt]>,
    ) -> ExecResult {
        let value = self.eval(test)?;
        for case in cases {
            if value.equals(&self.eval(&case.value)?) {
                return self.exec_block(&case.body);
            }
        }
        match default {
            Some(body) => self.exec_block(body),
            None => Ok(Flow::Normal),
        }
    }
}
