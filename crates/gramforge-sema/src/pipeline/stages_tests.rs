use super::{AnalysisConfig, Session};
use crate::Error;
use crate::syntax::{SyntaxTree, TreeBuilder};
use crate::test_utils::{analyze, diamond, messages, nonterm_a};

fn two_packages() -> SyntaxTree {
    let mut b = TreeBuilder::new();
    for pkg in ["p", "q"] {
        let lit = b.lit(pkg);
        let body = b.seq(vec![lit]);
        let x = b.nonterm("x", body);
        let g = b.grammar("G", &[], vec![x]);
        b.file(&format!("{pkg}.gram"), Some(pkg), vec![g]);
    }
    b.finish()
}

#[test]
fn builders_fill_the_config() {
    let session = Session::new(diamond())
        .with_recursion_fuel(16)
        .with_parallel_collect(true)
        .with_unused_import_warnings(false);

    assert_eq!(
        session.config(),
        &AnalysisConfig {
            recursion_fuel: 16,
            parallel_collect: true,
            report_unused_imports: false,
        }
    );
}

#[test]
fn later_stages_expose_earlier_ones() {
    let analyzed = analyze(diamond());

    assert_eq!(analyzed.tree().files().len(), 1);
    assert!(analyzed.names().len() > 1);
    assert_eq!(analyzed.grammar_graph().nodes().count(), 3);
    assert_eq!(analyzed.grammars().len(), 3);
    assert!(analyzed.cycles().is_empty());
    assert!(analyzed.class_graph().nodes().next().is_none());
}

#[test]
fn stages_share_one_diagnostics_sink() {
    let tree = nonterm_a(|b| {
        let r = b.nt("Missing");
        b.seq(vec![r])
    });
    let resolved = Session::new(tree).declare().resolve();
    assert_eq!(resolved.diagnostics().error_count(), 1);

    let analyzed = resolved.analyze().unwrap();
    insta::assert_snapshot!(messages(analyzed.diagnostics()), @"error: cannot resolve `Missing`");
}

#[test]
fn into_result_fails_on_errors() {
    let tree = nonterm_a(|b| {
        let r = b.nt("Missing");
        b.seq(vec![r])
    });
    let analyzed = analyze(tree);
    assert!(!analyzed.is_valid());

    let Err(err) = analyzed.into_result() else {
        panic!("expected a failed analysis");
    };
    insta::assert_snapshot!(err.to_string(), @"grammar analysis failed with 1 errors");
    assert!(matches!(err, Error::AnalysisFailed(diag) if diag.error_count() == 1));
}

#[test]
fn warnings_do_not_fail_the_run() {
    let analyzed = analyze(nonterm_a(|b| b.empty()));

    assert!(analyzed.diagnostics().has_warnings());
    assert!(analyzed.into_result().is_ok());
}

#[test]
fn grammar_lookup_by_qualified_or_unique_name() {
    let analyzed = analyze(two_packages());

    assert!(analyzed.grammar_named("G").is_none());
    let p = analyzed.grammar_named("p.G").unwrap();
    let q = analyzed.grammar_named("q.G").unwrap();
    assert_ne!(p.grammar, q.grammar);
    insta::assert_snapshot!(analyzed.dump_nonterminal("q.G", "x").unwrap(), @r#"ITEM "q""#);

    let single = analyze(diamond());
    assert_eq!(
        single.grammar_named("B").map(|g| g.grammar),
        single.grammar_named("p.B").map(|g| g.grammar)
    );
}

#[test]
fn unknown_names_yield_nothing() {
    let analyzed = analyze(diamond());

    assert!(analyzed.grammar_named("p.Z").is_none());
    assert!(analyzed.nonterminal("A", "y").is_none());
    assert!(analyzed.dump_nonterminal("A", "never_interned").is_none());
}

#[test]
fn unused_import_warnings_can_be_disabled() {
    let build = || {
        let mut b = TreeBuilder::new();
        let base = b.grammar("Base", &[], vec![]);
        b.file("lib.gram", Some("lib"), vec![base]);
        let import = b.import("lib.Base");
        let g = b.grammar("G", &[], vec![]);
        b.file("app.gram", Some("app"), vec![import, g]);
        b.finish()
    };

    let quiet = Session::new(build())
        .with_unused_import_warnings(false)
        .declare()
        .resolve()
        .analyze()
        .unwrap();
    assert!(quiet.diagnostics().is_empty());

    let loud = analyze(build());
    insta::assert_snapshot!(messages(loud.diagnostics()), @"warning: import `lib.Base` is never used");
}

#[test]
fn parallel_collection_gives_the_same_result() {
    let sequential = analyze(diamond());
    let parallel = Session::new(diamond())
        .with_parallel_collect(true)
        .declare()
        .resolve()
        .analyze()
        .unwrap();

    for grammar in ["A", "B", "C"] {
        assert_eq!(
            sequential.dump_nonterminal(grammar, "x"),
            parallel.dump_nonterminal(grammar, "x")
        );
    }
    assert_eq!(sequential.names().len(), parallel.names().len());
}

#[test]
fn rendered_diagnostics_name_the_file() {
    let tree = nonterm_a(|b| {
        let r = b.nt("Missing");
        b.seq(vec![r])
    });
    let analyzed = analyze(tree);
    let rendered = analyzed.diagnostics().render();

    assert!(rendered.contains("cannot resolve `Missing`"), "{rendered}");
    assert!(rendered.contains("g.gram"), "{rendered}");
}

#[test]
fn config_reads_partial_json() {
    let config: AnalysisConfig = serde_json::from_str(r#"{"parallel_collect": true}"#).unwrap();

    assert!(config.parallel_collect);
    assert_eq!(config.recursion_fuel, AnalysisConfig::default().recursion_fuel);
    assert!(config.report_unused_imports);
    insta::assert_snapshot!(
        serde_json::to_string(&config).unwrap(),
        @r#"{"recursion_fuel":4096,"parallel_collect":true,"report_unused_imports":true}"#
    );
}
