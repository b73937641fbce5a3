use std::ops::Deref;
use std::sync::Arc;

use crate::ags::{self, AgsArena, GrammarSet, GrammarSpec, NontermSpec, dump};
use crate::ags::symbols::SymbolArena;
use crate::analyze::extends::{self, CycleReport, InheritanceGraph};
use crate::analyze::{Context, declare, imports, refs, types_init, validate};
use crate::diagnostics::Diagnostics;
use crate::namespace::{NamespaceTree, NsKind};
use crate::scope::ScopeTree;
use crate::syntax::SyntaxTree;
use crate::types::{HostResolver, Lattice, NoHost, TypeTable};
use crate::{Error, Result};

use super::config::AnalysisConfig;

/// Entry point of an analysis run: a syntax tree plus settings.
pub struct Session {
    tree: SyntaxTree,
    config: AnalysisConfig,
    host: Arc<dyn HostResolver>,
    diag: Diagnostics,
}

impl Session {
    pub fn new(tree: SyntaxTree) -> Self {
        Self {
            tree,
            config: AnalysisConfig::default(),
            host: Arc::new(NoHost),
            diag: Diagnostics::new(),
        }
    }

    pub fn with_config(mut self, config: AnalysisConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_recursion_fuel(mut self, fuel: u32) -> Self {
        self.config.recursion_fuel = fuel;
        self
    }

    pub fn with_parallel_collect(mut self, parallel: bool) -> Self {
        self.config.parallel_collect = parallel;
        self
    }

    pub fn with_unused_import_warnings(mut self, enabled: bool) -> Self {
        self.config.report_unused_imports = enabled;
        self
    }

    /// Environment used for type names not declared in the grammar sources.
    pub fn with_host(mut self, host: Arc<dyn HostResolver>) -> Self {
        self.host = host;
        self
    }

    /// Create scopes, collect declarations and validate the namespace.
    pub fn declare(self) -> Declared {
        let scopes = declare::build_scopes(&self.tree);
        let names = NamespaceTree::new();
        {
            let ctx = Context::new(&self.tree, &names, &scopes, &self.diag);
            declare::collect_declarations(&ctx, self.config.parallel_collect);
            validate::validate_namespace(&ctx);
        }
        Declared {
            session: self,
            names,
            scopes,
        }
    }

    pub fn tree(&self) -> &SyntaxTree {
        &self.tree
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn host(&self) -> &dyn HostResolver {
        &*self.host
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diag
    }
}

/// Declarations are collected; nothing is resolved yet.
pub struct Declared {
    session: Session,
    names: NamespaceTree,
    scopes: ScopeTree,
}

impl Declared {
    /// Fill scopes with imports and resolve every non-terminal reference.
    pub fn resolve(self) -> Resolved {
        let grammars = {
            let ctx = self.context();
            let grammars = imports::resolve_imports(&ctx);
            refs::resolve_references(&ctx);
            grammars
        };
        Resolved {
            declared: self,
            grammars,
        }
    }

    pub fn context(&self) -> Context<'_> {
        Context::new(&self.session.tree, &self.names, &self.scopes, &self.session.diag)
    }

    pub fn names(&self) -> &NamespaceTree {
        &self.names
    }

    pub fn scopes(&self) -> &ScopeTree {
        &self.scopes
    }
}

impl Deref for Declared {
    type Target = Session;

    fn deref(&self) -> &Self::Target {
        &self.session
    }
}

/// Every name is resolved.
pub struct Resolved {
    declared: Declared,
    grammars: InheritanceGraph,
}

impl Resolved {
    /// Check inheritance cycles, evaluate types and build the grammar
    /// graphs.
    ///
    /// Fails only when a grammar body is nested deeper than the recursion
    /// fuel; problems in the grammar itself end up in the diagnostics.
    pub fn analyze(self) -> Result<Analyzed> {
        let mut types = TypeTable::new();
        let (classes, cycles, set) = {
            let ctx = self.context();
            let classes = InheritanceGraph::collect(&ctx, NsKind::Class);
            let cycles = extends::check_cycles(&ctx, &[&self.grammars, &classes]);
            types_init::init_types(&ctx, &mut types, self.host(), &classes, &cycles);

            let mut lattice = Lattice::new(&mut types, ctx.tree.interner(), self.host());
            let set = ags::build_grammars(
                &ctx,
                &self.grammars,
                &mut lattice,
                self.config().recursion_fuel,
            )?;

            if self.config().report_unused_imports {
                imports::report_unused_imports(&ctx);
            }
            (classes, cycles, set)
        };

        Ok(Analyzed {
            resolved: self,
            classes,
            cycles,
            types,
            set,
        })
    }

    /// Resolved `extends` relation between grammars.
    pub fn grammar_graph(&self) -> &InheritanceGraph {
        &self.grammars
    }
}

impl Deref for Resolved {
    type Target = Declared;

    fn deref(&self) -> &Self::Target {
        &self.declared
    }
}

/// Final stage: grammar graphs, label symbols and types.
pub struct Analyzed {
    resolved: Resolved,
    classes: InheritanceGraph,
    cycles: CycleReport,
    types: TypeTable,
    set: GrammarSet,
}

impl Analyzed {
    /// True when no error was reported. Warnings do not count.
    pub fn is_valid(&self) -> bool {
        !self.diagnostics().has_errors()
    }

    pub fn into_result(self) -> Result<Self> {
        if self.is_valid() {
            return Ok(self);
        }
        Err(Error::AnalysisFailed(self.diagnostics().clone()))
    }

    pub fn class_graph(&self) -> &InheritanceGraph {
        &self.classes
    }

    pub fn cycles(&self) -> &CycleReport {
        &self.cycles
    }

    pub fn types(&self) -> &TypeTable {
        &self.types
    }

    pub fn grammar_set(&self) -> &GrammarSet {
        &self.set
    }

    pub fn arena(&self) -> &AgsArena {
        self.set.arena()
    }

    pub fn symbols(&self) -> &SymbolArena {
        self.set.symbols()
    }

    pub fn grammars(&self) -> &[GrammarSpec] {
        self.set.grammars()
    }

    /// Grammar by qualified name (`pkg.G`) or, when unambiguous, by simple
    /// name.
    pub fn grammar_named(&self, name: &str) -> Option<&GrammarSpec> {
        let interner = self.tree().interner();
        let qualified = self
            .grammars()
            .iter()
            .find(|g| self.names().qualified_name(g.grammar, interner) == name);
        if qualified.is_some() {
            return qualified;
        }
        let mut simple = self
            .grammars()
            .iter()
            .filter(|g| interner.resolve(g.name) == name);
        match (simple.next(), simple.next()) {
            (Some(only), None) => Some(only),
            _ => None,
        }
    }

    pub fn nonterminal(&self, grammar: &str, name: &str) -> Option<&NontermSpec> {
        let spec = self.grammar_named(grammar)?;
        let sym = self.tree().interner().get(name)?;
        spec.nonterminal(sym)
    }

    /// Text dump of a non-terminal's graph as seen from `grammar`.
    pub fn dump_nonterminal(&self, grammar: &str, name: &str) -> Option<String> {
        let spec = self.nonterminal(grammar, name)?;
        Some(dump::dump_graph(self.arena(), self.tree(), &spec.graph))
    }
}

impl Deref for Analyzed {
    type Target = Resolved;

    fn deref(&self) -> &Self::Target {
        &self.resolved
    }
}
