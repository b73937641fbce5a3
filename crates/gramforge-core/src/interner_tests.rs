use crate::Interner;

#[test]
fn intern_deduplicates() {
    let mut interner = Interner::new();

    let a = interner.intern("expr");
    let b = interner.intern("expr");
    let c = interner.intern("stmt");

    assert_eq!(a, b);
    assert_ne!(a, c);
    assert_eq!(interner.len(), 2);
}

#[test]
fn resolve_round_trips() {
    let mut interner = Interner::new();
    let sym = interner.intern("Grammar");

    assert_eq!(interner.resolve(sym), "Grammar");
    assert_eq!(interner.try_resolve(sym), Some("Grammar"));
}

#[test]
fn get_does_not_intern() {
    let mut interner = Interner::new();
    interner.intern("a");

    assert!(interner.get("a").is_some());
    assert!(interner.get("b").is_none());
    assert_eq!(interner.len(), 1);
}

#[test]
fn symbols_follow_insertion_order() {
    let mut interner = Interner::new();
    let z = interner.intern("z");
    let a = interner.intern("a");

    assert!(z < a);
    let names: Vec<_> = interner.iter().map(|(_, s)| s).collect();
    assert_eq!(names, ["z", "a"]);
}

#[test]
#[should_panic(expected = "was not created by this interner")]
fn foreign_symbol_panics() {
    let mut big = Interner::new();
    big.intern("a");
    let foreign = big.intern("b");

    let small = Interner::new();
    small.resolve(foreign);
}
