use std::sync::Arc;

use crate::Session;
use crate::diagnostics::DiagnosticKind;
use crate::pipeline::Analyzed;
use crate::syntax::{NodeId, Quantifier, SyntaxTree, TreeBuilder};
use crate::test_utils::{analyze, grammar_g, messages};
use crate::types::StaticHost;

/// Grammar `G` with classes `Expr`, `Num extends Expr`, `Str extends Expr`
/// and `Other`, typed non-terminals `num: Num`, `str: Str`, `other: Other`
/// and `A = rhs`.
fn typed(rhs: impl FnOnce(&mut TreeBuilder) -> NodeId) -> SyntaxTree {
    grammar_g(|b| {
        let mut members = vec![
            b.class("Expr", None),
            b.class("Num", Some("Expr")),
            b.class("Str", Some("Expr")),
            b.class("Other", None),
        ];
        for (name, class) in [("num", "Num"), ("str", "Str"), ("other", "Other")] {
            let ty = b.type_name(class);
            let lit = b.lit(name);
            let body = b.seq(vec![lit]);
            members.push(b.nonterm_typed(name, ty, body));
        }
        let body = rhs(b);
        members.push(b.nonterm("A", body));
        members
    })
}

fn actual(analyzed: &Analyzed, label: &str) -> String {
    let spec = analyzed.nonterminal("G", "A").unwrap();
    let label = analyzed.tree().interner().get(label).unwrap();
    let ty = analyzed.symbols().get(spec.symbols[&label]).actual().unwrap();
    analyzed.types().render(ty).to_string()
}

#[test]
fn label_takes_the_referenced_type() {
    let analyzed = analyze(typed(|b| {
        let r = b.nt("num");
        let n = b.labeled(r, "n");
        b.seq(vec![n])
    }));

    insta::assert_snapshot!(actual(&analyzed, "n"), @"Num");
    assert!(analyzed.diagnostics().is_empty());
}

#[test]
fn alternatives_join_to_common_superclass() {
    let analyzed = analyze(typed(|b| {
        let r = b.nt("num");
        let left = b.labeled(r, "n");
        let r = b.nt("str");
        let right = b.labeled(r, "n");
        b.alts(vec![vec![left], vec![right]])
    }));

    insta::assert_snapshot!(actual(&analyzed, "n"), @"Expr");
    assert!(analyzed.diagnostics().is_empty());
}

#[test]
fn unrelated_alternatives_conflict() {
    let analyzed = analyze(typed(|b| {
        let r = b.nt("num");
        let left = b.labeled(r, "n");
        let r = b.nt("other");
        let right = b.labeled(r, "n");
        b.alts(vec![vec![left], vec![right]])
    }));

    insta::assert_snapshot!(
        messages(analyzed.diagnostics()),
        @"error: label `n` has incompatible types `Num` and `Other`"
    );
    insta::assert_snapshot!(actual(&analyzed, "n"), @"<none>");
}

#[test]
fn repeated_group_yields_a_list() {
    let analyzed = analyze(typed(|b| {
        let r = b.nt("num");
        let r = b.labeled(r, "n");
        let r = b.quantified(r, Quantifier::Star);
        b.seq(vec![r])
    }));

    insta::assert_snapshot!(actual(&analyzed, "n"), @"Num[]");
}

#[test]
fn label_on_repeated_item_is_a_list() {
    let analyzed = analyze(typed(|b| {
        let r = b.nt("num");
        let r = b.quantified(r, Quantifier::Star);
        let r = b.labeled(r, "n");
        b.seq(vec![r])
    }));
    let spec = analyzed.nonterminal("G", "A").unwrap();
    let n = analyzed.tree().interner().get("n").unwrap();

    insta::assert_snapshot!(actual(&analyzed, "n"), @"Num[]");
    assert!(!analyzed.symbols().get(spec.symbols[&n]).is_iterated());
}

#[test]
fn nested_repetition_nests_lists() {
    let analyzed = analyze(typed(|b| {
        let r = b.nt("num");
        let r = b.labeled(r, "n");
        let r = b.quantified(r, Quantifier::Plus);
        let body = b.seq(vec![r]);
        let group = b.group(body);
        let group = b.quantified(group, Quantifier::Optional);
        b.seq(vec![group])
    }));

    insta::assert_snapshot!(actual(&analyzed, "n"), @"Num[][]");
}

#[test]
fn declared_type_must_accept_the_capture() {
    let analyzed = analyze(typed(|b| {
        let r = b.nt("num");
        let ty = b.type_name("Str");
        let n = b.typed_label(r, "n", ty);
        b.seq(vec![n])
    }));

    insta::assert_snapshot!(
        messages(analyzed.diagnostics()),
        @"error: label `n` is declared as `Str` but holds `Num`"
    );
    insta::assert_snapshot!(actual(&analyzed, "n"), @"Str");
}

#[test]
fn declared_supertype_wins_over_deduced_type() {
    let analyzed = analyze(typed(|b| {
        let r = b.nt("num");
        let ty = b.type_name("Expr");
        let n = b.typed_label(r, "n", ty);
        b.seq(vec![n])
    }));
    let spec = analyzed.nonterminal("G", "A").unwrap();
    let n = analyzed.tree().interner().get("n").unwrap();
    let symbol = analyzed.symbols().get(spec.symbols[&n]);
    let types = analyzed.types();

    assert!(analyzed.diagnostics().is_empty());
    assert_eq!(types.render(symbol.expected().unwrap()), "Expr");
    assert_eq!(types.render(symbol.deducted().unwrap()), "Num");
    assert_eq!(types.render(symbol.actual().unwrap()), "Expr");
}

#[test]
fn untyped_reference_has_no_type() {
    let analyzed = analyze(typed(|b| {
        let r = b.nt("A");
        let lit = b.lit("x");
        let rec = b.labeled(r, "rec");
        b.alts(vec![vec![rec], vec![lit]])
    }));

    insta::assert_snapshot!(actual(&analyzed, "rec"), @"<none>");
    assert_eq!(analyzed.diagnostics().count_of(DiagnosticKind::LubConflict), 0);
}

#[test]
fn host_types_follow_host_subtyping() {
    let tree = grammar_g(|b| {
        let ty = b.type_name("Token");
        let lit = b.lit("t");
        let body = b.seq(vec![lit]);
        let tok = b.nonterm_typed("tok", ty, body);

        let r = b.nt("tok");
        let ty = b.type_name("Node");
        let n = b.typed_label(r, "n", ty);
        let body = b.seq(vec![n]);
        vec![tok, b.nonterm("A", body)]
    });
    let host = StaticHost::new()
        .with_type("Node", None, &[])
        .with_type("Token", Some("Node"), &[]);
    let analyzed = Session::new(tree)
        .with_host(Arc::new(host))
        .declare()
        .resolve()
        .analyze()
        .unwrap();

    assert!(analyzed.diagnostics().is_empty(), "{}", messages(analyzed.diagnostics()));
    insta::assert_snapshot!(actual(&analyzed, "n"), @"Node");
}

#[test]
fn nonterminal_type_is_its_declared_type() {
    let analyzed = analyze(typed(|b| b.empty()));
    let types = analyzed.types();

    let num = analyzed.nonterminal("G", "num").unwrap();
    assert_eq!(types.render(num.ty.unwrap()), "Num");
    assert_eq!(analyzed.nonterminal("G", "A").unwrap().ty, None);
}
