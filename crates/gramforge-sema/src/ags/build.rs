use super::arena::AgsArena;
use super::node::{ActionKind, AgsId, AgsKind, Atom, Decoration};
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::syntax::{NodeId, NodeKind, SyntaxTree};
use crate::{Error, Result};

/// Lowers non-terminal bodies from the syntax tree into an [`AgsArena`].
///
/// Lists of the same kind are flattened into their parent, one-element
/// lists collapse into the element, and a union keeps at most one empty
/// alternative, placed last.
pub struct AgsBuilder<'a> {
    tree: &'a SyntaxTree,
    arena: &'a mut AgsArena,
    diag: &'a Diagnostics,
    fuel: u32,
    depth: u32,
}

impl<'a> AgsBuilder<'a> {
    pub fn new(tree: &'a SyntaxTree, arena: &'a mut AgsArena, diag: &'a Diagnostics, fuel: u32) -> Self {
        Self {
            tree,
            arena,
            diag,
            fuel,
            depth: 0,
        }
    }

    /// Build one non-terminal member from the bodies of all of its
    /// declarations. Several bodies become alternatives of one union.
    pub fn build_nonterminal_member(&mut self, decl: NodeId, bodies: &[NodeId]) -> Result<AgsId> {
        let mut parts = Vec::with_capacity(bodies.len());
        for &body in bodies {
            parts.push(self.build_union(body)?);
        }
        Ok(self.flatten(AgsKind::Union, parts, decl))
    }

    fn build_union(&mut self, union: NodeId) -> Result<AgsId> {
        self.enter()?;
        let mut parts = Vec::new();
        for &alt in self.tree.children(union) {
            parts.push(self.build_concat(alt)?);
        }
        self.depth -= 1;
        Ok(self.flatten(AgsKind::Union, parts, union))
    }

    fn build_concat(&mut self, concat: NodeId) -> Result<AgsId> {
        let mut parts = Vec::new();
        for &item in self.tree.children(concat) {
            parts.push(self.build_item(item)?);
        }
        Ok(self.flatten(AgsKind::Concat, parts, concat))
    }

    fn build_item(&mut self, item: NodeId) -> Result<AgsId> {
        let (label, quantifier) = match self.tree.kind(item) {
            NodeKind::Item { label, quantifier } => (*label, *quantifier),
            _ => (None, None),
        };
        let span = self.tree.span(item);
        let Some(atom) = self.tree.item_atom(item) else {
            return Ok(self.arena.alloc_list(AgsKind::Concat, span, item));
        };

        let built = match self.tree.kind(atom) {
            NodeKind::NontermRef { .. } => {
                self.arena
                    .alloc_item(Atom::Reference { node: atom }, span, item)
            }
            NodeKind::Literal { text } => {
                self.arena
                    .alloc_item(Atom::Literal { text: text.clone() }, span, item)
            }
            NodeKind::Group => match self.tree.children(atom).first() {
                Some(&body) => self.build_union(body)?,
                None => self.arena.alloc_list(AgsKind::Concat, span, item),
            },
            NodeKind::Alternation => {
                let children = self.tree.children(atom);
                let (Some(&element), Some(&separator)) = (children.first(), children.get(1)) else {
                    return Ok(self.arena.alloc_list(AgsKind::Concat, span, item));
                };
                let element = self.build_union(element)?;
                let separator = self.build_union(separator)?;
                let id = self.arena.alloc_item(
                    Atom::Alternation {
                        element,
                        separator,
                        repeat: quantifier,
                    },
                    span,
                    item,
                );
                self.arena.adopt(id, element);
                self.arena.adopt(id, separator);
                id
            }
            NodeKind::Action { code } => self.action(ActionKind::Action, code, item),
            NodeKind::Guard { code } => self.action(ActionKind::Guard, code, item),
            NodeKind::Placeholder => self.action(ActionKind::Placeholder, "", item),
            _ => self.arena.alloc_list(AgsKind::Concat, span, item),
        };

        // Checked on the built node: a group around a lone action collapses into it.
        if let Some(Atom::Action { kind, .. }) = self.arena.node(built).atom() {
            if label.is_some() || quantifier.is_some() {
                self.diag
                    .report(DiagnosticKind::IllegalActionDecoration, span)
                    .file(self.tree.file_name(item))
                    .arg(kind.name())
                    .emit();
            }
            return Ok(built);
        }

        // An alternation carries its repetition marker in the atom.
        let is_alternation = matches!(self.tree.kind(atom), NodeKind::Alternation);
        if let Some(q) = quantifier.filter(|_| !is_alternation) {
            self.arena.decorate(built, Decoration::Quantifier(q));
        }
        if let Some(name) = label {
            self.arena.decorate(
                built,
                Decoration::Label {
                    name,
                    ty: self.tree.item_label_type(item),
                    span,
                },
            );
        }
        Ok(built)
    }

    fn action(&mut self, kind: ActionKind, code: &str, item: NodeId) -> AgsId {
        self.arena.alloc_item(
            Atom::Action {
                kind,
                code: code.into(),
                snapshot: Default::default(),
            },
            self.tree.span(item),
            item,
        )
    }

    /// Combine built parts into one node of `kind`.
    fn flatten(&mut self, kind: AgsKind, parts: Vec<AgsId>, origin: NodeId) -> AgsId {
        let list = self.arena.alloc_list(kind, self.tree.span(origin), origin);
        let mut empty: Option<AgsId> = None;

        for part in parts {
            if kind == AgsKind::Union && self.arena.is_empty_concat(part) {
                self.keep_one_empty(&mut empty, part);
                continue;
            }
            if self.arena.is_atomic(part) || self.arena.node(part).kind() != kind {
                self.arena.append(list, part);
                continue;
            }
            if kind == AgsKind::Union {
                let empties: Vec<AgsId> = self
                    .arena
                    .children(part)
                    .filter(|&c| self.arena.is_empty_concat(c))
                    .collect();
                for e in empties {
                    self.arena.unlink(e);
                    self.keep_one_empty(&mut empty, e);
                }
            }
            self.arena.splice(list, part);
        }

        if let Some(empty) = empty {
            if self.arena.node(list).is_empty() {
                self.arena.kill(list);
                return empty;
            }
            self.arena.append(list, empty);
        }

        if self.arena.node(list).len() == 1
            && let Some(only) = self.arena.children(list).next()
        {
            self.arena.unlink(only);
            self.arena.kill(list);
            return only;
        }
        list
    }

    fn keep_one_empty(&mut self, slot: &mut Option<AgsId>, candidate: AgsId) {
        match slot {
            Some(_) => self.arena.kill(candidate),
            None => *slot = Some(candidate),
        }
    }

    fn enter(&mut self) -> Result<()> {
        self.depth += 1;
        if self.depth > self.fuel {
            return Err(Error::RecursionLimitExceeded);
        }
        Ok(())
    }
}
