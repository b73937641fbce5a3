use std::fmt;
use std::ops::BitOr;

/// Kind of a namespace node.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum NsKind {
    Root,
    Package,
    Grammar,
    Class,
    Nonterminal,
}

impl NsKind {
    pub const ALL: [NsKind; 5] = [
        NsKind::Root,
        NsKind::Package,
        NsKind::Grammar,
        NsKind::Class,
        NsKind::Nonterminal,
    ];

    /// Open kinds merge same-named declarations into a single node.
    pub fn is_open(self) -> bool {
        matches!(self, NsKind::Root | NsKind::Package | NsKind::Nonterminal)
    }

    pub fn is_sealed(self) -> bool {
        !self.is_open()
    }

    /// Kinds a node of this kind may hold as children.
    pub fn allowed_children(self) -> KindSet {
        match self {
            NsKind::Root | NsKind::Package => {
                KindSet::of(&[NsKind::Package, NsKind::Grammar, NsKind::Class])
            }
            NsKind::Grammar => KindSet::of(&[NsKind::Nonterminal, NsKind::Class]),
            NsKind::Class | NsKind::Nonterminal => KindSet::EMPTY,
        }
    }

    pub fn can_contain(self, child: NsKind) -> bool {
        self.allowed_children().contains(child)
    }

    /// Whether siblings of these two kinds may not share a name.
    pub fn clashes_with(self, other: NsKind) -> bool {
        const CLASHING: KindSet = KindSet::of(&[NsKind::Package, NsKind::Grammar, NsKind::Class]);
        self != other && CLASHING.contains(self) && CLASHING.contains(other)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            NsKind::Root => "root",
            NsKind::Package => "package",
            NsKind::Grammar => "grammar",
            NsKind::Class => "class",
            NsKind::Nonterminal => "non-terminal",
        }
    }

    const fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

impl fmt::Display for NsKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Small bit set of [`NsKind`]s, used to filter lookups.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct KindSet(u8);

impl KindSet {
    pub const EMPTY: KindSet = KindSet(0);

    /// Kinds that may appear before the last segment of a path.
    pub const CONTAINERS: KindSet = KindSet::of(&[NsKind::Package, NsKind::Grammar, NsKind::Class]);

    pub const fn of(kinds: &[NsKind]) -> Self {
        let mut bits = 0;
        let mut i = 0;
        while i < kinds.len() {
            bits |= kinds[i].bit();
            i += 1;
        }
        KindSet(bits)
    }

    pub const fn with(self, kind: NsKind) -> Self {
        KindSet(self.0 | kind.bit())
    }

    pub const fn contains(self, kind: NsKind) -> bool {
        self.0 & kind.bit() != 0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn iter(self) -> impl Iterator<Item = NsKind> {
        NsKind::ALL.into_iter().filter(move |k| self.contains(*k))
    }
}

impl From<NsKind> for KindSet {
    fn from(kind: NsKind) -> Self {
        KindSet(kind.bit())
    }
}

impl BitOr for KindSet {
    type Output = KindSet;

    fn bitor(self, rhs: KindSet) -> KindSet {
        KindSet(self.0 | rhs.0)
    }
}

impl fmt::Debug for KindSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}
