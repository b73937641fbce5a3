use std::collections::BTreeMap;

use gramforge_core::Interner;

use super::*;
use crate::namespace::{DeclSite, NamespaceTree, NsKind};
use crate::syntax::{NodeId, Span};

fn site() -> DeclSite {
    DeclSite {
        node: NodeId::from_index(0),
        span: Span::default(),
        file: None,
    }
}

/// `Node <- Expr <- {Binary, Unary}` as grammar classes.
struct Classes {
    interner: Interner,
    table: TypeTable,
    node: TypeId,
    expr: TypeId,
    binary: TypeId,
    unary: TypeId,
    other: TypeId,
}

fn classes() -> Classes {
    let mut interner = Interner::new();
    let names = NamespaceTree::new();
    let mut table = TypeTable::new();

    let mut nominal = |name: &str, parent: Option<TypeId>, table: &mut TypeTable| {
        let sym = interner.intern(name);
        let decl = names.declare_child(names.root(), sym, NsKind::Class, site());
        table.intern(
            TypeShape::Nominal {
                name: sym,
                decl,
                parent,
            },
            &interner,
        )
    };

    let node = nominal("Node", None, &mut table);
    let expr = nominal("Expr", Some(node), &mut table);
    let binary = nominal("Binary", Some(expr), &mut table);
    let unary = nominal("Unary", Some(expr), &mut table);
    let other = nominal("Other", None, &mut table);

    Classes {
        interner,
        table,
        node,
        expr,
        binary,
        unary,
        other,
    }
}

#[test]
fn nominal_subtyping_follows_parents() {
    let mut c = classes();
    let lattice = Lattice::new(&mut c.table, &c.interner, &NoHost);

    assert!(lattice.assignable_from(c.node, c.binary));
    assert!(lattice.assignable_from(c.expr, c.unary));
    assert!(!lattice.assignable_from(c.binary, c.expr));
    assert!(!lattice.assignable_from(c.other, c.binary));
    assert_eq!(lattice.ancestors(c.binary), vec![c.binary, c.expr, c.node]);
}

#[test]
fn lub_of_siblings_is_their_parent() {
    let mut c = classes();
    let mut lattice = Lattice::new(&mut c.table, &c.interner, &NoHost);

    assert_eq!(lattice.lub(c.binary, c.unary), c.expr);
    assert_eq!(lattice.lub(c.binary, c.node), c.node);
    assert_eq!(lattice.lub(c.binary, c.other), TYPE_NONE);
    assert_eq!(lattice.lub_all([c.binary, c.unary, c.expr]), Some(c.expr));
    assert_eq!(lattice.lub_all([]), None);
}

#[test]
fn none_absorbs_and_accepts() {
    let mut c = classes();
    let mut lattice = Lattice::new(&mut c.table, &c.interner, &NoHost);

    assert_eq!(lattice.lub(TYPE_NONE, c.expr), TYPE_NONE);
    assert!(lattice.assignable_from(TYPE_NONE, c.expr));
    assert!(!lattice.assignable_from(c.expr, TYPE_NONE));
}

#[test]
fn arrays_are_covariant() {
    let mut c = classes();
    let (binary, unary, expr) = (c.binary, c.unary, c.expr);
    let interner = c.interner.clone();
    let binaries = c.table.array(binary, &interner);
    let unaries = c.table.array(unary, &interner);
    let exprs = c.table.array(expr, &interner);
    let mut lattice = Lattice::new(&mut c.table, &interner, &NoHost);

    assert!(lattice.assignable_from(exprs, binaries));
    assert_eq!(lattice.lub(binaries, unaries), exprs);
}

#[test]
fn objects_merge_fieldwise() {
    let mut c = classes();
    let mut interner = c.interner.clone();
    let lhs = interner.intern("lhs");
    let rhs = interner.intern("rhs");
    let (binary, unary, expr) = (c.binary, c.unary, c.expr);
    let left = c.table.object(BTreeMap::from([(lhs, binary)]), &interner);
    let right = c
        .table
        .object(BTreeMap::from([(lhs, unary), (rhs, binary)]), &interner);
    let expected = c
        .table
        .object(BTreeMap::from([(lhs, expr), (rhs, binary)]), &interner);
    let mut lattice = Lattice::new(&mut c.table, &interner, &NoHost);

    assert_eq!(lattice.lub(left, right), expected);
    assert!(!lattice.assignable_from(left, right));
    assert!(lattice.assignable_from(expected, right));
}

#[test]
fn foreign_types_use_host_hierarchy() {
    let host = StaticHost::new()
        .with_type("Object", None, &[])
        .with_type("Number", Some("Object"), &["Comparable"])
        .with_type("Integer", Some("Number"), &[])
        .with_type("Double", Some("Number"), &[])
        .with_type("Comparable", None, &[]);
    let interner = Interner::new();
    let mut table = TypeTable::new();
    let integer = table.foreign("Integer", &interner);
    let double = table.foreign("Double", &interner);
    let number = table.foreign("Number", &interner);
    let comparable = table.foreign("Comparable", &interner);
    let mut lattice = Lattice::new(&mut table, &interner, &host);

    assert_eq!(lattice.lub(integer, double), number);
    assert!(lattice.assignable_from(number, integer));
    assert!(lattice.assignable_from(comparable, integer));
    assert!(!lattice.assignable_from(integer, number));
}
