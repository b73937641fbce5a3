use std::collections::BTreeMap;

use gramforge_core::Interner;

use super::host::HostResolver;
use super::shape::{TYPE_NONE, TypeId, TypeShape};
use super::table::TypeTable;

/// Subtyping and least upper bounds over a [`TypeTable`].
pub struct Lattice<'a> {
    table: &'a mut TypeTable,
    interner: &'a Interner,
    host: &'a dyn HostResolver,
}

impl<'a> Lattice<'a> {
    pub fn new(table: &'a mut TypeTable, interner: &'a Interner, host: &'a dyn HostResolver) -> Self {
        Self {
            table,
            interner,
            host,
        }
    }

    pub fn table(&self) -> &TypeTable {
        &*self.table
    }

    pub fn table_mut(&mut self) -> &mut TypeTable {
        &mut *self.table
    }

    /// Whether a value of `source` may be stored where `target` is expected.
    pub fn assignable_from(&self, target: TypeId, source: TypeId) -> bool {
        if target == TYPE_NONE || target == source {
            return true;
        }
        if source == TYPE_NONE {
            return false;
        }
        match (self.table.get(target), self.table.get(source)) {
            (TypeShape::Array(t), TypeShape::Array(s)) => self.assignable_from(*t, *s),
            (TypeShape::Object(expected), TypeShape::Object(actual)) => {
                expected.iter().all(|(field, t)| {
                    actual
                        .get(field)
                        .is_some_and(|s| self.assignable_from(*t, *s))
                })
            }
            (TypeShape::Nominal { .. }, TypeShape::Nominal { .. }) => {
                self.ancestors(source).contains(&target)
            }
            (TypeShape::Foreign { name: t }, TypeShape::Foreign { name: s }) => {
                let t: &str = t;
                self.host.superclasses(s).iter().any(|sup| sup == t)
                    || self.host.interfaces(s).iter().any(|i| i == t)
            }
            _ => false,
        }
    }

    /// Least upper bound of two types; [`TYPE_NONE`] when there is none.
    pub fn lub(&mut self, a: TypeId, b: TypeId) -> TypeId {
        if a == TYPE_NONE || b == TYPE_NONE {
            return TYPE_NONE;
        }
        if a == b {
            return a;
        }
        match (self.table.get(a).clone(), self.table.get(b).clone()) {
            (TypeShape::Array(x), TypeShape::Array(y)) => {
                let element = self.lub(x, y);
                if element == TYPE_NONE {
                    return TYPE_NONE;
                }
                self.table.array(element, self.interner)
            }
            (TypeShape::Object(left), TypeShape::Object(right)) => {
                let mut fields: BTreeMap<_, _> = left;
                for (field, ty) in right {
                    let merged = match fields.get(&field) {
                        Some(&existing) => self.lub(existing, ty),
                        None => ty,
                    };
                    if merged == TYPE_NONE {
                        return TYPE_NONE;
                    }
                    fields.insert(field, merged);
                }
                self.table.object(fields, self.interner)
            }
            (TypeShape::Nominal { .. }, TypeShape::Nominal { .. }) => {
                let left = self.ancestors(a);
                let right = self.ancestors(b);
                common_root_prefix(&left, &right).unwrap_or(TYPE_NONE)
            }
            (TypeShape::Foreign { name: x }, TypeShape::Foreign { name: y }) => {
                let left = self.host_lineage(&x);
                let right = self.host_lineage(&y);
                match common_root_prefix(&left, &right) {
                    Some(name) => self.table.foreign(&name, self.interner),
                    None => TYPE_NONE,
                }
            }
            _ => TYPE_NONE,
        }
    }

    /// LUB of all `types`; `None` when there are none.
    pub fn lub_all(&mut self, types: impl IntoIterator<Item = TypeId>) -> Option<TypeId> {
        let mut iter = types.into_iter();
        let first = iter.next()?;
        Some(iter.fold(first, |acc, ty| self.lub(acc, ty)))
    }

    /// `id` followed by its nominal parents, nearest first.
    pub fn ancestors(&self, id: TypeId) -> Vec<TypeId> {
        let mut out = vec![id];
        let mut cur = id;
        while let TypeShape::Nominal {
            parent: Some(parent),
            ..
        } = self.table.get(cur)
        {
            if out.contains(parent) {
                break;
            }
            out.push(*parent);
            cur = *parent;
        }
        out
    }

    fn host_lineage(&self, name: &str) -> Vec<String> {
        let mut out = vec![name.to_string()];
        out.extend(self.host.superclasses(name));
        out
    }
}

/// Deepest common element of two nearest-first ancestor chains, compared
/// from the root end.
fn common_root_prefix<T: PartialEq + Clone>(left: &[T], right: &[T]) -> Option<T> {
    left.iter()
        .rev()
        .zip(right.iter().rev())
        .take_while(|(l, r)| l == r)
        .last()
        .map(|(l, _)| l.clone())
}
