//! Tree-walking interpreter for lowered Core IL.
//!
//! # Architecture
//!
//! - `stmt.rs`: statement execution; each statement reports a [`Flow`]
//! - `expr.rs`: expression evaluation, including `and`/`or` short-circuit
//! - `function_call.rs`: call frames, arity and the recursion limit
//!
//! Execution is fail-closed. A node the interpreter cannot run as written,
//! such as an unlowered `For` or a `Return` at the top level, stops the
//! program with a `ValidationError` instead of being guessed at.
//!
//! Every `FuncDef` in the document, at any depth, is registered before the
//! first statement runs, so a function may be called above its definition.

mod builder;
mod expr;
mod function_call;
mod stmt;

pub use builder::InterpreterBuilder;

use rustc_hash::FxHashMap;

use cil_ir::visitor::{walk_stmt, Visitor};
use cil_ir::{Document, FuncDef, Stmt};
use cil_value::errors::malformed;
use cil_value::{EvalError, Value};

use crate::call_stack::CallStack;
use crate::exec::Flow;
use crate::print_handler::SharedPrintHandler;
use crate::Environment;

/// Runs one document at a time against its own global bindings.
pub struct Interpreter<'a> {
    env: Environment,
    /// Registered functions by name. The last definition of a name wins.
    functions: FxHashMap<&'a str, &'a FuncDef>,
    call_stack: CallStack,
    print_handler: SharedPrintHandler,
}

impl<'a> Interpreter<'a> {
    /// An interpreter with stdout output and the default recursion limit.
    pub fn new() -> Self {
        InterpreterBuilder::new().build()
    }

    /// Execute `doc`, which must already be validated and lowered.
    ///
    /// Output printed before an uncaught error stays printed.
    pub fn run(&mut self, doc: &'a Document) -> Result<(), EvalError> {
        self.functions = collect_functions(&doc.body);
        tracing::debug!(
            statements = doc.body.len(),
            functions = self.functions.len(),
            "running document"
        );
        match self.exec_block(&doc.body)? {
            Flow::Normal => Ok(()),
            Flow::Return(_) => Err(malformed("'Return' outside a function")),
            Flow::Break => Err(malformed("'Break' outside a loop")),
            Flow::Continue => Err(malformed("'Continue' outside a loop")),
        }
    }

    /// Current binding of `name`, as a read inside the program would see it.
    pub fn lookup(&self, name: &str) -> Option<Value> {
        self.env.lookup(name)
    }

    pub fn print_handler(&self) -> &SharedPrintHandler {
        &self.print_handler
    }
}

impl Default for Interpreter<'_> {
    fn default() -> Self {
        Self::new()
    }
}

struct FunctionCollector<'a> {
    functions: FxHashMap<&'a str, &'a FuncDef>,
}

impl<'a> Visitor<'a> for FunctionCollector<'a> {
    fn visit_stmt(&mut self, stmt: &'a Stmt) {
        if let Stmt::FuncDef(func) = stmt {
            self.functions.insert(&func.name, func);
        }
        walk_stmt(self, stmt);
    }
}

fn collect_functions(body: &[Stmt]) -> FxHashMap<&str, &FuncDef> {
    let mut collector = FunctionCollector {
        functions: FxHashMap::default(),
    };
    collector.visit_block(body);
    collector.functions
}
