use super::arena::AgsArena;
use super::node::{AgsId, AgsKind};

/// Logical graph of one non-terminal inside one grammar.
///
/// A non-terminal declared in several grammars of an inheritance chain has
/// one member per declaring grammar. Members are not spliced together, so
/// the same member can take part in every descendant grammar.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NontermGraph {
    Single(AgsId),
    /// Members ordered from the farthest ancestor to the grammar itself.
    Multi(Vec<AgsId>),
}

impl NontermGraph {
    pub fn from_members(mut members: Vec<AgsId>) -> Self {
        if members.len() == 1 {
            return NontermGraph::Single(members.remove(0));
        }
        NontermGraph::Multi(members)
    }

    pub fn members(&self) -> &[AgsId] {
        match self {
            NontermGraph::Single(id) => std::slice::from_ref(id),
            NontermGraph::Multi(ids) => ids,
        }
    }

    /// Iterate the graph as a list of `kind`, members in order.
    pub fn iter_as<'a>(&'a self, arena: &'a AgsArena, kind: AgsKind) -> impl Iterator<Item = AgsId> + 'a {
        self.members()
            .iter()
            .flat_map(move |&member| arena.iter_as(member, kind))
    }

    /// Whether every member derives only the empty string.
    pub fn is_empty_language(&self, arena: &AgsArena) -> bool {
        self.members().iter().all(|&m| arena.is_empty_concat(m))
    }
}
