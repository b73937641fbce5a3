use super::{Snapshot, SymbolOrigin};
use crate::ags::{AgsId, Atom};
use crate::diagnostics::DiagnosticKind;
use crate::pipeline::Analyzed;
use crate::syntax::Quantifier;
use crate::test_utils::{analyze, diamond, messages, nonterm_a};

fn root_of_a(analyzed: &Analyzed) -> AgsId {
    analyzed.nonterminal("G", "A").unwrap().graph.members()[0]
}

fn snapshot_at(analyzed: &Analyzed, action: AgsId) -> &Snapshot {
    match analyzed.arena().node(action).atom() {
        Some(Atom::Action { snapshot, .. }) => snapshot.get().unwrap(),
        other => panic!("expected an action, found {other:?}"),
    }
}

fn labels(analyzed: &Analyzed, map: &super::SymbolMap) -> Vec<String> {
    map.keys()
        .map(|&l| analyzed.tree().text(l).to_string())
        .collect()
}

#[test]
fn action_sees_preceding_labels_in_order() {
    let analyzed = analyze(nonterm_a(|b| {
        let r = b.nt("B");
        let first = b.labeled(r, "b");
        let r = b.nt("C");
        let second = b.labeled(r, "c");
        let act = b.action("act");
        b.seq(vec![first, second, act])
    }));
    let arena = analyzed.arena();
    let root = root_of_a(&analyzed);
    let children: Vec<AgsId> = arena.children(root).collect();
    let snapshot = snapshot_at(&analyzed, children[2]);

    assert!(snapshot.preceding.is_empty());
    assert_eq!(labels(&analyzed, &snapshot.local), ["b", "c"]);
    for (i, label) in ["b", "c"].into_iter().enumerate() {
        let sym = analyzed.tree().interner().get(label).unwrap();
        let symbol = analyzed.symbols().get(snapshot.get(sym).unwrap());
        assert_eq!(symbol.origin(), &SymbolOrigin::Original { node: children[i] });
    }
    assert!(analyzed.is_valid());
}

#[test]
fn action_sees_nothing_defined_after_it() {
    let analyzed = analyze(nonterm_a(|b| {
        let act = b.action("early");
        let r = b.nt("B");
        let later = b.labeled(r, "b");
        b.seq(vec![act, later])
    }));
    let first = analyzed.arena().children(root_of_a(&analyzed)).next().unwrap();

    assert!(snapshot_at(&analyzed, first).is_empty());
}

#[test]
fn quantified_group_iterates_its_labels() {
    let analyzed = analyze(nonterm_a(|b| {
        let r = b.nt("B");
        let r = b.labeled(r, "b");
        let r = b.quantified(r, Quantifier::Star);
        b.seq(vec![r])
    }));
    let spec = analyzed.nonterminal("G", "A").unwrap();
    let b = analyzed.tree().interner().get("b").unwrap();
    let symbols = analyzed.symbols();
    let exposed = symbols.get(spec.symbols[&b]);

    assert!(exposed.is_iterated());
    let SymbolOrigin::Iterated { source } = exposed.origin() else {
        panic!("expected an iterated symbol");
    };
    assert_eq!(
        symbols.get(*source).origin(),
        &SymbolOrigin::Original {
            node: root_of_a(&analyzed)
        }
    );
    assert_eq!(symbols.iteration_depth(spec.symbols[&b]), 1);
    assert_eq!(symbols.base(spec.symbols[&b]), *source);
}

#[test]
fn label_on_quantified_item_is_not_iterated() {
    let analyzed = analyze(nonterm_a(|b| {
        let r = b.nt("B");
        let r = b.quantified(r, Quantifier::Plus);
        let r = b.labeled(r, "bs");
        b.seq(vec![r])
    }));
    let spec = analyzed.nonterminal("G", "A").unwrap();
    let bs = analyzed.tree().interner().get("bs").unwrap();

    assert!(!analyzed.symbols().get(spec.symbols[&bs]).is_iterated());
}

#[test]
fn same_label_in_alternatives_becomes_a_union() {
    let analyzed = analyze(nonterm_a(|b| {
        let r = b.nt("B");
        let left = b.labeled(r, "v");
        let r = b.nt("C");
        let right = b.labeled(r, "v");
        let lit = b.lit("z");
        b.alts(vec![vec![left], vec![right], vec![lit]])
    }));
    let spec = analyzed.nonterminal("G", "A").unwrap();
    let v = analyzed.tree().interner().get("v").unwrap();
    let symbol = analyzed.symbols().get(spec.symbols[&v]);

    assert!(symbol.is_union());
    let SymbolOrigin::Union { branches } = symbol.origin() else {
        panic!("expected a union symbol");
    };
    assert_eq!(branches.len(), 2);
    assert_eq!(analyzed.diagnostics().count_of(DiagnosticKind::DuplicateLabel), 0);
}

#[test]
fn duplicate_label_is_reported_and_last_wins() {
    let analyzed = analyze(nonterm_a(|b| {
        let r = b.nt("B");
        let first = b.labeled(r, "v");
        let r = b.nt("C");
        let second = b.labeled(r, "v");
        let act = b.action("use(v)");
        b.seq(vec![first, second, act])
    }));

    insta::assert_snapshot!(messages(analyzed.diagnostics()), @"error: label `v` is already defined");

    let children: Vec<AgsId> = analyzed.arena().children(root_of_a(&analyzed)).collect();
    let v = analyzed.tree().interner().get("v").unwrap();
    let seen = snapshot_at(&analyzed, children[2]).get(v).unwrap();
    assert_eq!(
        analyzed.symbols().get(seen).origin(),
        &SymbolOrigin::Original { node: children[1] }
    );
}

#[test]
fn label_shadowing_an_outer_label_is_a_duplicate() {
    let analyzed = analyze(nonterm_a(|b| {
        let r = b.nt("B");
        let outer = b.labeled(r, "v");
        let r = b.nt("C");
        let inner = b.labeled(r, "v");
        let lit = b.lit(";");
        let body = b.seq(vec![inner, lit]);
        let group = b.group(body);
        let group = b.quantified(group, Quantifier::Optional);
        b.seq(vec![outer, group])
    }));

    assert_eq!(analyzed.diagnostics().count_of(DiagnosticKind::DuplicateLabel), 1);
}

#[test]
fn nested_level_splits_preceding_from_local() {
    let analyzed = analyze(nonterm_a(|b| {
        let r = b.nt("B");
        let outer = b.labeled(r, "a");
        let r = b.nt("C");
        let inner = b.labeled(r, "b");
        let act = b.action("act");
        let body = b.seq(vec![inner, act]);
        let group = b.group(body);
        let group = b.labeled(group, "g");
        b.seq(vec![outer, group])
    }));
    let arena = analyzed.arena();
    let root = root_of_a(&analyzed);
    let group = arena.children(root).nth(1).unwrap();
    let action = arena.children(group).nth(1).unwrap();
    let snapshot = snapshot_at(&analyzed, action);

    assert_eq!(labels(&analyzed, &snapshot.preceding), ["a"]);
    assert_eq!(labels(&analyzed, &snapshot.local), ["b"]);
    let all: Vec<&str> = snapshot
        .labels()
        .into_iter()
        .map(|l| analyzed.tree().text(l))
        .collect();
    assert_eq!(all, ["a", "b"]);

    let spec = analyzed.nonterminal("G", "A").unwrap();
    assert_eq!(labels(&analyzed, &spec.symbols), ["a", "b", "g"]);
}

#[test]
fn alternation_iterates_element_labels() {
    let analyzed = analyze(nonterm_a(|b| {
        let r = b.nt("E");
        let e = b.labeled(r, "e");
        let element = b.seq(vec![e]);
        let comma = b.lit(",");
        let separator = b.seq(vec![comma]);
        let alt = b.alternation(element, separator, None);
        b.seq(vec![alt])
    }));
    let spec = analyzed.nonterminal("G", "A").unwrap();
    let e = analyzed.tree().interner().get("e").unwrap();
    let symbols = analyzed.symbols();
    let exposed = symbols.get(spec.symbols[&e]);

    assert!(exposed.is_iterated());
    let SymbolOrigin::Iterated { source } = exposed.origin() else {
        panic!("expected an iterated symbol");
    };
    assert!(symbols.get(*source).is_union());
}

#[test]
fn members_sharing_a_label_merge_into_a_union() {
    let mut b = crate::syntax::TreeBuilder::new();
    let mut grammars = Vec::new();
    for (name, parent) in [("A", None), ("B", Some("A"))] {
        let lit = b.lit(name);
        let lit = b.labeled(lit, "tok");
        let body = b.seq(vec![lit]);
        let x = b.nonterm("x", body);
        let extends: Vec<&str> = parent.into_iter().collect();
        grammars.push(b.grammar(name, &extends, vec![x]));
    }
    b.file("g.gram", Some("p"), grammars);
    let analyzed = analyze(b.finish());

    let tok = analyzed.tree().interner().get("tok").unwrap();
    let in_a = analyzed.nonterminal("A", "x").unwrap();
    let in_b = analyzed.nonterminal("B", "x").unwrap();
    assert!(!analyzed.symbols().get(in_a.symbols[&tok]).is_union());
    assert!(analyzed.symbols().get(in_b.symbols[&tok]).is_union());
}

#[test]
fn unlabeled_members_expose_no_symbols() {
    let analyzed = analyze(diamond());
    for (ns, member) in analyzed.grammar_set().members() {
        assert!(member.symbols.is_empty(), "{ns:?}");
    }
}
