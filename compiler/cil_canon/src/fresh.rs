//! Collision-free names for lowering temporaries.

use cil_ir::visitor::{walk_expr, walk_stmt, Visitor};
use cil_ir::{Expr, Stmt};
use rustc_hash::FxHashSet;

/// Hands out numbered temporaries that no name in the document uses.
pub(crate) struct FreshNames {
    taken: FxHashSet<String>,
    next: usize,
}

impl FreshNames {
    pub(crate) fn for_body(body: &[Stmt]) -> Self {
        let mut collector = NameCollector::default();
        collector.visit_block(body);
        FreshNames {
            taken: collector.names,
            next: 0,
        }
    }

    /// The next pair `{first}{n}`, `{second}{n}` where neither name is taken.
    pub(crate) fn pair(&mut self, first: &str, second: &str) -> (String, String) {
        loop {
            let n = self.next;
            self.next += 1;
            let a = format!("{first}{n}");
            let b = format!("{second}{n}");
            if !self.taken.contains(&a) && !self.taken.contains(&b) {
                self.taken.insert(a.clone());
                self.taken.insert(b.clone());
                return (a, b);
            }
        }
    }
}

#[derive(Default)]
struct NameCollector {
    names: FxHashSet<String>,
}

impl<'ast> Visitor<'ast> for NameCollector {
    fn visit_stmt(&mut self, stmt: &'ast Stmt) {
        match stmt {
            Stmt::FuncDef(func) => {
                self.names.insert(func.name.clone());
            }
            Stmt::Call { name, .. } => {
                self.names.insert(name.clone());
            }
            _ => {}
        }
        walk_stmt(self, stmt);
    }

    fn visit_expr(&mut self, expr: &'ast Expr) {
        match expr {
            Expr::Var { name } | Expr::Call { name, .. } => {
                self.names.insert(name.clone());
            }
            _ => {}
        }
        walk_expr(self, expr);
    }

    fn visit_binding(&mut self, name: &'ast str) {
        self.names.insert(name.to_string());
    }
}
