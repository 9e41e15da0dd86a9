//! Statement-list rewriting.

use cil_ir::{BinaryOp, Document, Expr, FuncDef, Literal, RangeIter, Stmt, SwitchCase};

use crate::fresh::FreshNames;

/// Lower every `For` and `ForEach` in `doc`, at any depth.
///
/// The result contains no sugared loop. Lowering an already lowered
/// document returns it unchanged.
pub fn lower(doc: Document) -> Document {
    let mut lowerer = Lowerer {
        fresh: FreshNames::for_body(&doc.body),
        counted: 0,
        collection: 0,
    };
    let body = lowerer.block(doc.body);
    tracing::debug!(
        counted = lowerer.counted,
        collection = lowerer.collection,
        "lowered loops"
    );
    Document { body, ..doc }
}

// ── Lowerer ─────────────────────────────────────────────────────────

struct Lowerer {
    fresh: FreshNames,
    counted: usize,
    collection: usize,
}

impl Lowerer {
    fn block(&mut self, stmts: Vec<Stmt>) -> Vec<Stmt> {
        let mut out = Vec::with_capacity(stmts.len());
        for stmt in stmts {
            self.stmt(stmt, &mut out);
        }
        out
    }

    fn opt_block(&mut self, stmts: Option<Vec<Stmt>>) -> Option<Vec<Stmt>> {
        stmts.map(|stmts| self.block(stmts))
    }

    /// Lower one statement, appending its replacement to `out`.
    fn stmt(&mut self, stmt: Stmt, out: &mut Vec<Stmt>) {
        let lowered = match stmt {
            Stmt::For { var, iter, body } => {
                self.counted_loop(var, iter, body, out);
                return;
            }
            Stmt::ForEach { var, iter, body } => {
                self.collection_loop(var, iter, body, out);
                return;
            }
            Stmt::If {
                test,
                then,
                else_body,
            } => Stmt::If {
                test,
                then: self.block(then),
                else_body: self.opt_block(else_body),
            },
            Stmt::While { test, body, update } => Stmt::While {
                test,
                body: self.block(body),
                update: self.block(update),
            },
            Stmt::FuncDef(FuncDef { name, params, body }) => Stmt::FuncDef(FuncDef {
                name,
                params,
                body: self.block(body),
            }),
            Stmt::TryCatch {
                body,
                catch_var,
                catch_body,
                finally_body,
            } => Stmt::TryCatch {
                body: self.block(body),
                catch_var,
                catch_body: self.block(catch_body),
                finally_body: self.opt_block(finally_body),
            },
            Stmt::Switch {
                test,
                cases,
                default,
            } => Stmt::Switch {
                test,
                cases: cases
                    .into_iter()
                    .map(|case| SwitchCase {
                        value: case.value,
                        body: self.block(case.body),
                    })
                    .collect(),
                default: self.opt_block(default),
            },
            other => other,
        };
        out.push(lowered);
    }

    /// ```text
    /// Let c = from; Let e = to
    /// While c < e (or <=) { Let var = c; body } update { Assign c = c + 1 }
    /// ```
    fn counted_loop(&mut self, var: String, iter: RangeIter, body: Vec<Stmt>, out: &mut Vec<Stmt>) {
        let (counter, end) = self.fresh.pair("__for_i", "__for_end");
        self.counted += 1;
        let body = self.block(body);

        let cmp = if iter.inclusive {
            BinaryOp::LtEq
        } else {
            BinaryOp::Lt
        };
        out.push(Stmt::Let {
            name: counter.clone(),
            value: iter.from,
        });
        out.push(Stmt::Let {
            name: end.clone(),
            value: iter.to,
        });
        out.push(Stmt::While {
            test: Expr::binary(cmp, Expr::var(&counter), Expr::var(end)),
            body: bind_then(var, Expr::var(&counter), body),
            update: vec![increment(counter)],
        });
    }

    /// ```text
    /// Let s = iter; Let i = 0
    /// While i < Length(s) { Let var = Index(s, i); body } update { Assign i = i + 1 }
    /// ```
    fn collection_loop(&mut self, var: String, iter: Expr, body: Vec<Stmt>, out: &mut Vec<Stmt>) {
        let (seq, index) = self.fresh.pair("__each_seq", "__each_idx");
        self.collection += 1;
        let body = self.block(body);

        out.push(Stmt::Let {
            name: seq.clone(),
            value: iter,
        });
        out.push(Stmt::Let {
            name: index.clone(),
            value: Expr::literal(Literal::Int(0)),
        });
        let length = Expr::Length {
            base: Box::new(Expr::var(&seq)),
        };
        let element = Expr::Index {
            base: Box::new(Expr::var(seq)),
            index: Box::new(Expr::var(&index)),
        };
        out.push(Stmt::While {
            test: Expr::binary(BinaryOp::Lt, Expr::var(&index), length),
            body: bind_then(var, element, body),
            update: vec![increment(index)],
        });
    }
}

fn bind_then(var: String, value: Expr, body: Vec<Stmt>) -> Vec<Stmt> {
    let mut stmts = Vec::with_capacity(body.len() + 1);
    stmts.push(Stmt::Let { name: var, value });
    stmts.extend(body);
    stmts
}

fn increment(name: String) -> Stmt {
    Stmt::Assign {
        value: Expr::binary(
            BinaryOp::Add,
            Expr::var(&name),
            Expr::literal(Literal::Int(1)),
        ),
        name,
    }
}

#[cfg(test)]
mod tests;
