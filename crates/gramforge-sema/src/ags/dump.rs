//! Text rendering of AGS graphs, for tests and debugging.

use std::fmt::Write;

use super::arena::AgsArena;
use super::graph::NontermGraph;
use super::node::{ActionKind, AgsId, Atom, Decoration};
use crate::syntax::{NodeKind, SyntaxTree};

/// Render the graph rooted at `root`, one node per line.
///
/// ```text
/// UNION
///   CONCAT
///     ITEM "x"
///     ITEM B @b *
///   ITEM {code}
/// ```
pub fn dump(arena: &AgsArena, tree: &SyntaxTree, root: AgsId) -> String {
    let mut out = String::new();
    Dumper { arena, tree }.node(&mut out, root, 0);
    out
}

/// Render every member of a non-terminal graph.
pub fn dump_graph(arena: &AgsArena, tree: &SyntaxTree, graph: &NontermGraph) -> String {
    let mut out = String::new();
    let dumper = Dumper { arena, tree };
    match graph {
        NontermGraph::Single(root) => dumper.node(&mut out, *root, 0),
        NontermGraph::Multi(members) => {
            for (i, &member) in members.iter().enumerate() {
                let _ = writeln!(out, "MEMBER {i}");
                dumper.node(&mut out, member, 1);
            }
        }
    }
    out
}

struct Dumper<'a> {
    arena: &'a AgsArena,
    tree: &'a SyntaxTree,
}

impl Dumper<'_> {
    fn node(&self, out: &mut String, id: AgsId, depth: usize) {
        let node = self.arena.node(id);
        let indent = "  ".repeat(depth);
        let _ = write!(out, "{indent}{}", node.kind().as_str());

        if let Some(atom) = node.atom() {
            out.push(' ');
            self.atom(out, atom);
        }
        for decoration in node.decorations() {
            match decoration {
                Decoration::Label { name, .. } => {
                    let _ = write!(out, " @{}", self.tree.text(*name));
                }
                Decoration::Quantifier(q) => {
                    let _ = write!(out, " {q}");
                }
            }
        }
        out.push('\n');

        if let Some(Atom::Alternation {
            element, separator, ..
        }) = node.atom()
        {
            self.node(out, *element, depth + 1);
            self.node(out, *separator, depth + 1);
            return;
        }
        for child in self.arena.children(id) {
            self.node(out, child, depth + 1);
        }
    }

    fn atom(&self, out: &mut String, atom: &Atom) {
        match atom {
            Atom::Reference { node } => {
                if let NodeKind::NontermRef { path } = self.tree.kind(*node) {
                    out.push_str(&path.render(self.tree.interner()));
                }
            }
            Atom::Literal { text } => {
                let _ = write!(out, "{text:?}");
            }
            Atom::Alternation { repeat, .. } => {
                out.push_str("[,]");
                if let Some(q) = repeat {
                    out.push_str(q.as_str());
                }
            }
            Atom::Action { kind, code, .. } => {
                let _ = match kind {
                    ActionKind::Action => write!(out, "{{{code}}}"),
                    ActionKind::Guard => write!(out, "%guard{{{code}}}"),
                    ActionKind::Placeholder => write!(out, "%placeholder"),
                };
            }
        }
    }
}
