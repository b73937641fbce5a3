//! Fixtures shared by unit tests.

use crate::diagnostics::Diagnostics;
use crate::pipeline::{Analyzed, Session};
use crate::syntax::{NodeId, SyntaxTree, TreeBuilder};

/// Run the whole pipeline with default settings.
pub fn analyze(tree: SyntaxTree) -> Analyzed {
    match Session::new(tree).declare().resolve().analyze() {
        Ok(analyzed) => analyzed,
        Err(err) => panic!("analysis aborted: {err}"),
    }
}

/// One `severity: message` line per diagnostic, in display order.
pub fn messages(diag: &Diagnostics) -> String {
    diag.sorted()
        .iter()
        .map(|m| format!("{}: {}", m.severity(), m.text()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// File `g.gram` in package `p` holding grammar `G` with the members
/// returned by `members`.
pub fn grammar_g(members: impl FnOnce(&mut TreeBuilder) -> Vec<NodeId>) -> SyntaxTree {
    let mut b = TreeBuilder::new();
    let members = members(&mut b);
    let g = b.grammar("G", &[], members);
    b.file("g.gram", Some("p"), vec![g]);
    b.finish()
}

/// Grammar `G` with a single non-terminal `A = rhs`, where `rhs` is built
/// by the closure. Non-terminals `B`, `C`, `E` exist and derive `"b"`,
/// `"c"` and `"e"`.
pub fn nonterm_a(rhs: impl FnOnce(&mut TreeBuilder) -> NodeId) -> SyntaxTree {
    grammar_g(|b| {
        let body = rhs(b);
        let a = b.nonterm("A", body);
        let mut members = vec![a];
        for (name, text) in [("B", "b"), ("C", "c"), ("E", "e")] {
            let lit = b.lit(text);
            let body = b.seq(vec![lit]);
            members.push(b.nonterm(name, body));
        }
        members
    })
}

/// `A { x = "a"; }`, `B extends A { x = "b"; y = x; }` and
/// `C extends A { x = "c"; y = x; }` in package `p`.
pub fn diamond() -> SyntaxTree {
    let mut b = TreeBuilder::new();
    let a = grammar_with_x(&mut b, "A", None, "a");
    let bb = grammar_with_x(&mut b, "B", Some("A"), "b");
    let c = grammar_with_x(&mut b, "C", Some("A"), "c");
    b.file("g.gram", Some("p"), vec![a, bb, c]);
    b.finish()
}

fn grammar_with_x(b: &mut TreeBuilder, name: &str, parent: Option<&str>, text: &str) -> NodeId {
    let lit = b.lit(text);
    let body = b.seq(vec![lit]);
    let x = b.nonterm("x", body);
    let mut members = vec![x];
    if parent.is_some() {
        let r = b.nt("x");
        let body = b.seq(vec![r]);
        members.push(b.nonterm("y", body));
    }
    let extends: Vec<&str> = parent.into_iter().collect();
    b.grammar(name, &extends, members)
}
