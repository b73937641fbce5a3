use gramforge_core::{Interner, Symbol};

use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::namespace::{KindSet, NamespaceTree, NsId, NsKind};
use crate::syntax::{NodeId, Path, Segment, SyntaxTree};

use super::table::{ScopeId, ScopeTree};

/// Result of resolving a path: the kind it names and the matching nodes.
///
/// More than one node only happens for open kinds, whose declarations
/// merge (a non-terminal extended across grammars, for instance).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Resolution {
    pub kind: NsKind,
    pub nodes: Vec<NsId>,
}

impl Resolution {
    /// The node, when exactly one was found.
    pub fn single(&self) -> Option<NsId> {
        match self.nodes.as_slice() {
            [only] => Some(*only),
            _ => None,
        }
    }
}

/// Whether a failed lookup should be reported.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ResolveMode {
    /// Emit a diagnostic on failure and mark used imports on success.
    Reporting,
    /// Probe only. Never emits and leaves no trace.
    Speculative,
}

/// Why a lookup failed. `segment` indexes into the full path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResolveError {
    Unresolved { segment: usize },
    Ambiguous { segment: usize, kinds: Vec<NsKind>, count: usize },
    EmptyPath,
}

struct Found {
    resolution: Resolution,
    import_sites: Vec<NodeId>,
}

/// Path lookup over a populated [`ScopeTree`].
pub struct Resolver<'a> {
    tree: &'a SyntaxTree,
    names: &'a NamespaceTree,
    scopes: &'a ScopeTree,
    diag: &'a Diagnostics,
}

impl<'a> Resolver<'a> {
    pub fn new(
        tree: &'a SyntaxTree,
        names: &'a NamespaceTree,
        scopes: &'a ScopeTree,
        diag: &'a Diagnostics,
    ) -> Self {
        Self {
            tree,
            names,
            scopes,
            diag,
        }
    }

    /// Resolve `path` as written at `site`, starting from scope `from`.
    ///
    /// Every segment but the last must name one of `path_kinds`; the last
    /// must name one of `target_kinds`.
    pub fn resolve(
        &self,
        site: NodeId,
        from: ScopeId,
        path: &Path,
        path_kinds: KindSet,
        target_kinds: KindSet,
        mode: ResolveMode,
    ) -> Option<Resolution> {
        match self.find(from, path, path_kinds, target_kinds) {
            Ok(found) => {
                if mode == ResolveMode::Reporting {
                    self.scopes.mark_used(&found.import_sites);
                }
                Some(found.resolution)
            }
            Err(err) => {
                if mode == ResolveMode::Reporting {
                    self.report(site, path, &err);
                }
                None
            }
        }
    }

    /// Side-effect free lookup.
    pub fn lookup(
        &self,
        from: ScopeId,
        path: &Path,
        path_kinds: KindSet,
        target_kinds: KindSet,
    ) -> Result<Resolution, ResolveError> {
        self.find(from, path, path_kinds, target_kinds)
            .map(|found| found.resolution)
    }

    fn find(
        &self,
        from: ScopeId,
        path: &Path,
        path_kinds: KindSet,
        target_kinds: KindSet,
    ) -> Result<Found, ResolveError> {
        let offset = path.len() - path.names().len();
        let names = path.names();
        if names.is_empty() {
            return Err(ResolveError::EmptyPath);
        }
        let start = if path.is_anchored() {
            self.scopes.outermost(from)
        } else {
            from
        };

        let mut import_sites = Vec::new();
        let mut current: Option<NsId> = None;

        for (i, segment) in names.iter().enumerate() {
            let index = offset + i;
            let last = i + 1 == names.len();
            let kinds = if last { target_kinds } else { path_kinds };
            let Segment::Name(name) = *segment else {
                return Err(ResolveError::Unresolved { segment: index });
            };

            let candidates = match current {
                None => self.search_scopes(start, name, kinds, &mut import_sites),
                Some(ns) => self.names.lookup_child(ns, name, kinds),
            };

            let (kind, nodes) = match candidates.as_slice() {
                [] => return Err(ResolveError::Unresolved { segment: index }),
                [(kind, nodes)] => (*kind, nodes.clone()),
                many => {
                    return Err(ResolveError::Ambiguous {
                        segment: index,
                        kinds: many.iter().map(|(k, _)| *k).collect(),
                        count: many.iter().map(|(_, n)| n.len()).sum(),
                    });
                }
            };

            let must_be_single = !last || kind.is_sealed();
            if must_be_single && nodes.len() > 1 {
                return Err(ResolveError::Ambiguous {
                    segment: index,
                    kinds: vec![kind],
                    count: nodes.len(),
                });
            }

            if last {
                return Ok(Found {
                    resolution: Resolution { kind, nodes },
                    import_sites,
                });
            }
            current = nodes.first().copied();
        }

        Err(ResolveError::EmptyPath)
    }

    /// Innermost-first scope walk. The first scope with any binding for
    /// `name` in `kinds` decides, even if that binding turns out ambiguous.
    fn search_scopes(
        &self,
        start: ScopeId,
        name: Symbol,
        kinds: KindSet,
        import_sites: &mut Vec<NodeId>,
    ) -> Vec<(NsKind, Vec<NsId>)> {
        for scope in self.scopes.chain(start) {
            let bindings = self.scopes.lookup_in(scope, name, kinds);
            if bindings.is_empty() {
                continue;
            }
            return bindings
                .into_iter()
                .map(|(kind, binding)| {
                    import_sites.extend_from_slice(binding.import_sites());
                    (kind, binding.nodes().collect())
                })
                .collect();
        }
        Vec::new()
    }

    fn report(&self, site: NodeId, path: &Path, err: &ResolveError) {
        let interner = self.tree.interner();
        let (kind, hint) = match err {
            ResolveError::Unresolved { segment } => (
                DiagnosticKind::UnresolvedReference,
                missing_segment(path, *segment, interner),
            ),
            ResolveError::Ambiguous {
                segment,
                kinds,
                count,
            } => {
                let kinds: Vec<&str> = kinds.iter().map(|k| k.as_str()).collect();
                let hint = format!(
                    "`{}` matches {count} declarations ({})",
                    path.render_prefix(segment + 1, interner),
                    kinds.join(", ")
                );
                (DiagnosticKind::AmbiguousReference, Some(hint))
            }
            ResolveError::EmptyPath => (DiagnosticKind::UnresolvedReference, None),
        };

        let mut builder = self
            .diag
            .report(kind, self.tree.span(site))
            .file(self.tree.file_name(site))
            .arg(path.render(interner));
        if let Some(hint) = hint {
            builder = builder.hint(hint);
        }
        builder.emit();
    }
}

/// "no `b` in `a`" for a failure past the first named segment.
fn missing_segment(path: &Path, segment: usize, interner: &Interner) -> Option<String> {
    let first_name = path.len() - path.names().len();
    match path.segments().get(segment) {
        Some(Segment::Name(name)) if segment > first_name => Some(format!(
            "no `{}` in `{}`",
            interner.resolve(*name),
            path.render_prefix(segment, interner)
        )),
        _ => None,
    }
}
