use std::sync::Arc;

use super::{AgsArena, AgsId, AgsKind, Atom, Decoration};
use crate::syntax::{NodeId, Quantifier, Span};

fn origin() -> NodeId {
    NodeId::from_index(0)
}

fn lit(arena: &mut AgsArena, text: &str) -> AgsId {
    arena.alloc_item(
        Atom::Literal {
            text: Arc::from(text),
        },
        Span::default(),
        origin(),
    )
}

fn list(arena: &mut AgsArena, kind: AgsKind, children: &[AgsId]) -> AgsId {
    let id = arena.alloc_list(kind, Span::default(), origin());
    for &child in children {
        arena.append(id, child);
    }
    id
}

fn texts(arena: &AgsArena, ids: impl Iterator<Item = AgsId>) -> Vec<String> {
    ids.map(|id| match arena.node(id).atom() {
        Some(Atom::Literal { text }) => text.to_string(),
        _ => arena.node(id).kind().as_str().to_string(),
    })
    .collect()
}

#[test]
fn append_links_siblings() {
    let mut arena = AgsArena::new();
    let a = lit(&mut arena, "a");
    let b = lit(&mut arena, "b");
    let concat = list(&mut arena, AgsKind::Concat, &[a, b]);

    assert_eq!(texts(&arena, arena.children(concat)), ["a", "b"]);
    assert_eq!(arena.node(concat).len(), 2);
    assert_eq!(arena.node(a).parent(), Some(concat));
    assert!(arena.is_attached(b));
}

#[test]
fn splice_moves_children_and_kills_source() {
    let mut arena = AgsArena::new();
    let a = lit(&mut arena, "a");
    let b = lit(&mut arena, "b");
    let c = lit(&mut arena, "c");
    let inner = list(&mut arena, AgsKind::Union, &[a, b]);
    let outer = list(&mut arena, AgsKind::Union, &[c]);

    arena.splice(outer, inner);

    assert_eq!(texts(&arena, arena.children(outer)), ["c", "a", "b"]);
    assert_eq!(arena.node(outer).len(), 3);
    assert_eq!(arena.node(a).parent(), Some(outer));
    assert!(!arena.node(inner).is_live());
    assert!(arena.node(inner).is_empty());
}

#[test]
fn unlink_detaches() {
    let mut arena = AgsArena::new();
    let a = lit(&mut arena, "a");
    let b = lit(&mut arena, "b");
    let c = lit(&mut arena, "c");
    let concat = list(&mut arena, AgsKind::Concat, &[a, b, c]);

    arena.unlink(b);

    assert_eq!(texts(&arena, arena.children(concat)), ["a", "c"]);
    assert!(!arena.is_attached(b));
    let other = list(&mut arena, AgsKind::Concat, &[b]);
    assert_eq!(arena.node(b).parent(), Some(other));
}

#[test]
#[should_panic(expected = "already attached")]
fn appending_attached_node_panics() {
    let mut arena = AgsArena::new();
    let a = lit(&mut arena, "a");
    list(&mut arena, AgsKind::Concat, &[a]);
    list(&mut arena, AgsKind::Concat, &[a]);
}

#[test]
#[should_panic(expected = "spliced away")]
fn reusing_spliced_list_panics() {
    let mut arena = AgsArena::new();
    let a = lit(&mut arena, "a");
    let inner = list(&mut arena, AgsKind::Concat, &[a]);
    let outer = list(&mut arena, AgsKind::Concat, &[]);
    arena.splice(outer, inner);
    let other = list(&mut arena, AgsKind::Union, &[]);
    arena.append(other, inner);
}

#[test]
fn iter_as_matching_kind_yields_children() {
    let mut arena = AgsArena::new();
    let a = lit(&mut arena, "a");
    let b = lit(&mut arena, "b");
    let union = list(&mut arena, AgsKind::Union, &[a, b]);

    assert_eq!(texts(&arena, arena.iter_as(union, AgsKind::Union)), ["a", "b"]);
    assert_eq!(texts(&arena, arena.iter_as(union, AgsKind::Concat)), ["UNION"]);
    assert_eq!(texts(&arena, arena.iter_as(a, AgsKind::Union)), ["a"]);
}

#[test]
fn iter_as_is_repeatable() {
    let mut arena = AgsArena::new();
    let a = lit(&mut arena, "a");
    let b = lit(&mut arena, "b");
    let concat = list(&mut arena, AgsKind::Concat, &[a, b]);

    let first: Vec<AgsId> = arena.iter_as(concat, AgsKind::Concat).collect();
    let second: Vec<AgsId> = arena.iter_as(concat, AgsKind::Concat).collect();
    assert_eq!(first, second);
    assert_eq!(first, [a, b]);
}

#[test]
fn decorated_list_is_atomic() {
    let mut arena = AgsArena::new();
    let a = lit(&mut arena, "a");
    let concat = list(&mut arena, AgsKind::Concat, &[a]);
    assert!(!arena.is_atomic(concat));

    arena.decorate(concat, Decoration::Quantifier(Quantifier::Star));

    assert!(arena.is_atomic(concat));
    assert_eq!(texts(&arena, arena.iter_as(concat, AgsKind::Concat)), ["CONCAT"]);
}

#[test]
fn empty_concat_detection() {
    let mut arena = AgsArena::new();
    let empty = list(&mut arena, AgsKind::Concat, &[]);
    let union = list(&mut arena, AgsKind::Union, &[]);
    assert!(arena.is_empty_concat(empty));
    assert!(!arena.is_empty_concat(union));
}
