use gramforge_core::Symbol;
use indexmap::IndexMap;

use super::symbol::{SymbolArena, SymbolId};
use crate::ags::{AgsArena, AgsId, AgsKind, Atom, Decoration};
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::syntax::SyntaxTree;

/// Labels in definition order.
pub type SymbolMap = IndexMap<Symbol, SymbolId>;

/// Labels visible to an action.
///
/// `preceding` holds labels bound before the enclosing nesting level was
/// entered, `local` those bound inside it so far.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Snapshot {
    pub preceding: SymbolMap,
    pub local: SymbolMap,
}

impl Snapshot {
    /// Symbol bound to `label`; local bindings shadow preceding ones.
    pub fn get(&self, label: Symbol) -> Option<SymbolId> {
        self.local
            .get(&label)
            .or_else(|| self.preceding.get(&label))
            .copied()
    }

    /// Every visible label, preceding ones first.
    pub fn labels(&self) -> Vec<Symbol> {
        let mut out: Vec<Symbol> = self.preceding.keys().copied().collect();
        out.extend(self.local.keys().filter(|l| !self.preceding.contains_key(*l)));
        out
    }

    pub fn is_empty(&self) -> bool {
        self.preceding.is_empty() && self.local.is_empty()
    }
}

#[derive(Default)]
struct Frame {
    preceding: SymbolMap,
    current: SymbolMap,
}

/// Walk the member rooted at `root`, record a snapshot on every action and
/// return the labels the member exposes.
pub fn collect_member_symbols(
    arena: &AgsArena,
    symbols: &mut SymbolArena,
    tree: &SyntaxTree,
    diag: &Diagnostics,
    root: AgsId,
) -> SymbolMap {
    let mut walker = Walker {
        arena,
        symbols,
        tree,
        diag,
        frames: vec![Frame::default()],
    };
    walker.visit(root);
    walker
        .frames
        .pop()
        .map(|frame| frame.current)
        .unwrap_or_default()
}

/// Labels of a non-terminal with several members: a label bound in more
/// than one member becomes a union symbol over its occurrences.
pub fn merge_members(symbols: &mut SymbolArena, members: &[SymbolMap]) -> SymbolMap {
    if let [only] = members {
        return only.clone();
    }
    let mut occurrences: IndexMap<Symbol, Vec<SymbolId>> = IndexMap::new();
    for member in members {
        for (&label, &sym) in member {
            occurrences.entry(label).or_default().push(sym);
        }
    }
    occurrences
        .into_iter()
        .map(|(label, syms)| match syms.as_slice() {
            [only] => (label, *only),
            _ => (label, symbols.alloc_union(label, syms)),
        })
        .collect()
}

struct Walker<'a> {
    arena: &'a AgsArena,
    symbols: &'a mut SymbolArena,
    tree: &'a SyntaxTree,
    diag: &'a Diagnostics,
    frames: Vec<Frame>,
}

impl Walker<'_> {
    fn top(&mut self) -> &mut Frame {
        let last = self.frames.len() - 1;
        &mut self.frames[last]
    }

    /// Open a nesting level. Everything visible so far becomes preceding.
    fn push(&mut self) {
        let top = self.top();
        let mut preceding = top.preceding.clone();
        for (&label, &sym) in &top.current {
            preceding.insert(label, sym);
        }
        self.frames.push(Frame {
            preceding,
            current: SymbolMap::new(),
        });
    }

    /// Close a nesting level and hand its labels to the enclosing one.
    /// Duplicates were already checked when the labels were defined.
    fn pop_promote(&mut self) {
        let Some(frame) = self.frames.pop() else {
            return;
        };
        let top = self.top();
        for (label, sym) in frame.current {
            top.current.insert(label, sym);
        }
    }

    fn visit(&mut self, id: AgsId) {
        let arena = self.arena;
        let node = arena.node(id);
        let decorated = node.is_decorated();
        if decorated {
            self.push();
        }

        match node.kind() {
            AgsKind::Concat => {
                for child in arena.children(id) {
                    self.visit(child);
                }
            }
            AgsKind::Union => {
                let branches: Vec<AgsId> = arena.children(id).collect();
                self.visit_branches(&branches);
            }
            AgsKind::Item => self.visit_atom(id),
        }

        if decorated {
            self.apply_decorations(id);
            self.pop_promote();
        }
    }

    /// Alternatives see the same preceding labels, not each other's. A
    /// label bound in any branch is exposed as a union symbol.
    fn visit_branches(&mut self, branches: &[AgsId]) {
        self.push();
        let mut merged: IndexMap<Symbol, Vec<SymbolId>> = IndexMap::new();
        for &branch in branches {
            self.push();
            self.visit(branch);
            if let Some(frame) = self.frames.pop() {
                for (label, sym) in frame.current {
                    merged.entry(label).or_default().push(sym);
                }
            }
        }
        self.frames.pop();

        for (label, occurrences) in merged {
            let sym = self.symbols.alloc_union(label, occurrences);
            self.top().current.insert(label, sym);
        }
    }

    fn visit_atom(&mut self, id: AgsId) {
        let arena = self.arena;
        match arena.node(id).atom() {
            Some(Atom::Alternation {
                element, separator, ..
            }) => {
                let (element, separator) = (*element, *separator);
                self.push();
                self.visit_branches(&[element, separator]);
                self.iterate_current();
                self.pop_promote();
            }
            Some(Atom::Action { snapshot, .. }) => {
                let top = self.top();
                let captured = Snapshot {
                    preceding: top.preceding.clone(),
                    local: top.current.clone(),
                };
                snapshot.set(captured);
            }
            Some(Atom::Reference { .. } | Atom::Literal { .. }) | None => {}
        }
    }

    fn apply_decorations(&mut self, id: AgsId) {
        let arena = self.arena;
        let node = arena.node(id);
        for decoration in node.decorations() {
            match decoration {
                Decoration::Label { name, ty, span } => {
                    let sym = self.symbols.alloc_original(*name, id, *span, *ty);
                    self.define(*name, sym, id);
                }
                Decoration::Quantifier(_) => self.iterate_current(),
            }
        }
    }

    /// Bind `label` in the current level, reporting a clash with any label
    /// already visible. The new symbol replaces the old one either way.
    fn define(&mut self, label: Symbol, sym: SymbolId, at: AgsId) {
        let top = self.top();
        let duplicate = top.current.contains_key(&label) || top.preceding.contains_key(&label);
        top.current.insert(label, sym);

        if duplicate {
            let origin = self.arena.node(at).origin();
            self.diag
                .report(DiagnosticKind::DuplicateLabel, self.symbols.get(sym).span())
                .file(self.tree.file_name(origin))
                .arg(self.tree.text(label))
                .emit();
        }
    }

    /// Every label of the current level now stands for many values.
    fn iterate_current(&mut self) {
        let current = std::mem::take(&mut self.top().current);
        let iterated = current
            .into_iter()
            .map(|(label, sym)| (label, self.symbols.alloc_iterated(sym)))
            .collect();
        self.top().current = iterated;
    }
}
