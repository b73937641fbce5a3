use crate::diagnostics::DiagnosticKind;
use crate::namespace::NsKind;
use crate::syntax::{NodeId, TreeBuilder};
use crate::test_utils::{analyze, diamond, messages};

/// `lib.Base` with non-terminal `x`, plus a file in package `app` whose
/// body comes from `app`.
fn with_library(app: impl FnOnce(&mut TreeBuilder) -> Vec<NodeId>) -> crate::Analyzed {
    let mut b = TreeBuilder::new();
    let lit = b.lit("x");
    let body = b.seq(vec![lit]);
    let x = b.nonterm("x", body);
    let base = b.grammar("Base", &[], vec![x]);
    b.file("lib.gram", Some("lib"), vec![base]);
    let body = app(&mut b);
    b.file("app.gram", Some("app"), body);
    analyze(b.finish())
}

fn extended_by(analyzed: &crate::Analyzed, clause: NodeId) -> String {
    let resolution = analyzed.tree().node(clause).referenced().unwrap();
    let interner = analyzed.tree().interner();
    analyzed.names().qualified_name(resolution.single().unwrap(), interner)
}

#[test]
fn explicit_import_binds_grammar() {
    let mut grammar = None;
    let analyzed = with_library(|b| {
        let import = b.import("lib.Base");
        let g = b.grammar("G", &["Base"], vec![]);
        grammar = Some(g);
        vec![import, g]
    });
    assert!(analyzed.diagnostics().is_empty(), "{}", messages(analyzed.diagnostics()));

    let extends = analyzed.tree().extends_clauses(grammar.unwrap()).next().unwrap();
    insta::assert_snapshot!(extended_by(&analyzed, extends), @"lib.Base");
}

#[test]
fn wildcard_import_binds_every_child() {
    let mut grammar = None;
    let analyzed = with_library(|b| {
        let import = b.import("lib.*");
        let g = b.grammar("G", &["Base"], vec![]);
        grammar = Some(g);
        vec![import, g]
    });
    assert!(analyzed.is_valid());
    assert!(!analyzed.diagnostics().has_warnings());

    let extends = analyzed.tree().extends_clauses(grammar.unwrap()).next().unwrap();
    insta::assert_snapshot!(extended_by(&analyzed, extends), @"lib.Base");
}

#[test]
fn aliased_import() {
    let mut grammar = None;
    let analyzed = with_library(|b| {
        let import = b.import_as("lib.Base", "Core");
        let g = b.grammar("G", &["Core"], vec![]);
        grammar = Some(g);
        vec![import, g]
    });
    assert!(analyzed.diagnostics().is_empty());

    let extends = analyzed.tree().extends_clauses(grammar.unwrap()).next().unwrap();
    insta::assert_snapshot!(extended_by(&analyzed, extends), @"lib.Base");
}

#[test]
fn fully_qualified_reference_needs_no_import() {
    let analyzed = with_library(|b| vec![b.grammar("G", &["lib.Base"], vec![])]);
    assert!(analyzed.diagnostics().is_empty());
}

#[test]
fn unused_import_is_a_warning() {
    let analyzed = with_library(|b| {
        let import = b.import("lib.Base");
        let g = b.grammar("G", &[], vec![]);
        vec![import, g]
    });

    insta::assert_snapshot!(messages(analyzed.diagnostics()), @"warning: import `lib.Base` is never used");
    assert!(analyzed.is_valid());
}

#[test]
fn import_read_by_a_type_name_is_used() {
    let mut b = TreeBuilder::new();
    let expr = b.class("Expr", None);
    b.file("lib.gram", Some("lib"), vec![expr]);
    let import = b.import("lib.Expr");
    let ty = b.type_name("Expr");
    let lit = b.lit("a");
    let body = b.seq(vec![lit]);
    let a = b.nonterm_typed("A", ty, body);
    let g = b.grammar("G", &[], vec![a]);
    b.file("app.gram", Some("app"), vec![import, g]);
    let analyzed = analyze(b.finish());

    assert!(analyzed.diagnostics().is_empty(), "{}", messages(analyzed.diagnostics()));
    assert!(analyzed.scopes().is_import_used(import));
    let spec = analyzed.nonterminal("G", "A").unwrap();
    assert_eq!(analyzed.types().render(spec.ty.unwrap()), "Expr");
}

#[test]
fn unresolved_import() {
    let analyzed = with_library(|b| vec![b.import("lib.Nope")]);

    insta::assert_snapshot!(messages(analyzed.diagnostics()), @"error: cannot resolve `lib.Nope`");
    assert_eq!(analyzed.diagnostics().count_of(DiagnosticKind::UnusedImport), 0);
}

#[test]
fn later_wildcard_import_wins() {
    let mut b = TreeBuilder::new();
    for pkg in ["p", "q"] {
        let g = b.grammar("G", &[], vec![]);
        b.file(&format!("{pkg}.gram"), Some(pkg), vec![g]);
    }
    let from_p = b.import("p.*");
    let from_q = b.import("q.*");
    let h = b.grammar("H", &["G"], vec![]);
    b.file("app.gram", Some("app"), vec![from_p, from_q, h]);
    let analyzed = analyze(b.finish());

    let extends = analyzed.tree().extends_clauses(h).next().unwrap();
    insta::assert_snapshot!(extended_by(&analyzed, extends), @"q.G");
    insta::assert_snapshot!(messages(analyzed.diagnostics()), @"warning: import `p.*` is never used");
    assert!(analyzed.scopes().is_import_used(from_q));
    assert!(!analyzed.scopes().is_import_used(from_p));
}

#[test]
fn local_declaration_beats_import() {
    let mut b = TreeBuilder::new();
    let imported = b.grammar("G", &[], vec![]);
    b.file("lib.gram", Some("lib"), vec![imported]);
    let import = b.import("lib.*");
    let local = b.grammar("G", &[], vec![]);
    let h = b.grammar("H", &["G"], vec![]);
    b.file("app.gram", Some("app"), vec![import, local, h]);
    let analyzed = analyze(b.finish());

    let extends = analyzed.tree().extends_clauses(h).next().unwrap();
    insta::assert_snapshot!(extended_by(&analyzed, extends), @"app.G");
    insta::assert_snapshot!(messages(analyzed.diagnostics()), @"warning: import `lib.*` is never used");
}

#[test]
fn derived_grammars_see_inherited_nonterminals() {
    let analyzed = analyze(diamond());
    let tree = analyzed.tree();
    let names = analyzed.names();
    let interner = tree.interner();
    let id = |path: &str| names.find_qualified(interner, path)[0];

    let mut seen = Vec::new();
    for (grammar, own) in [("p.B", "p.B.x"), ("p.C", "p.C.x")] {
        let g = id(grammar);
        let y = names
            .lookup_child(g, interner.get("y").unwrap(), NsKind::Nonterminal.into())[0]
            .1[0];
        let decl = names.first_site(y).unwrap().node;
        let reference = tree
            .descendants(decl)
            .find(|&n| tree.node(n).referenced().is_some())
            .unwrap();
        let resolution = tree.node(reference).referenced().unwrap();

        let mut found = resolution.nodes.clone();
        found.sort();
        let mut expected = vec![id("p.A.x"), id(own)];
        expected.sort();
        assert_eq!(found, expected);
        seen.push(found);
    }
    assert_ne!(seen[0], seen[1]);
    assert!(analyzed.is_valid());
}
