use gramforge_core::{Interner, Symbol};

/// One component of a dotted reference path.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Segment {
    /// `*`. As the first segment it anchors the path at the outermost scope.
    Wildcard,
    Name(Symbol),
}

/// Dotted name as written in source: `a.b.C`, `*.a.B`.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Default)]
pub struct Path {
    segments: Vec<Segment>,
}

impl Path {
    pub fn new(segments: Vec<Segment>) -> Self {
        Self { segments }
    }

    pub fn single(name: Symbol) -> Self {
        Self {
            segments: vec![Segment::Name(name)],
        }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Whether the path starts with `*` and skips the lexical scope chain.
    pub fn is_anchored(&self) -> bool {
        matches!(self.segments.first(), Some(Segment::Wildcard))
    }

    /// Segments after the anchor, if any.
    pub fn names(&self) -> &[Segment] {
        if self.is_anchored() {
            &self.segments[1..]
        } else {
            &self.segments
        }
    }

    pub fn last_name(&self) -> Option<Symbol> {
        match self.segments.last() {
            Some(Segment::Name(sym)) => Some(*sym),
            _ => None,
        }
    }

    pub fn render(&self, interner: &Interner) -> String {
        let mut out = String::new();
        for (i, seg) in self.segments.iter().enumerate() {
            if i > 0 {
                out.push('.');
            }
            match seg {
                Segment::Wildcard => out.push('*'),
                Segment::Name(sym) => out.push_str(interner.resolve(*sym)),
            }
        }
        out
    }

    /// Text of the first `len` segments, for "no `b` in `a`" style messages.
    pub fn render_prefix(&self, len: usize, interner: &Interner) -> String {
        Path::new(self.segments[..len.min(self.segments.len())].to_vec()).render(interner)
    }
}
