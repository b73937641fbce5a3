use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use gramforge_core::{Interner, Symbol};

use super::shape::{TYPE_NONE, TypeId, TypeShape};

/// Interning table for types, with a cached rendering per type.
#[derive(Debug, Clone)]
pub struct TypeTable {
    shapes: Vec<TypeShape>,
    rendered: Vec<Arc<str>>,
    ids: HashMap<TypeShape, TypeId>,
}

impl Default for TypeTable {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeTable {
    /// Table holding only [`TYPE_NONE`].
    pub fn new() -> Self {
        let mut ids = HashMap::new();
        ids.insert(TypeShape::NoType, TYPE_NONE);
        Self {
            shapes: vec![TypeShape::NoType],
            rendered: vec![Arc::from("<none>")],
            ids,
        }
    }

    pub fn intern(&mut self, shape: TypeShape, interner: &Interner) -> TypeId {
        if let Some(&id) = self.ids.get(&shape) {
            return id;
        }
        let id = TypeId(self.shapes.len() as u32);
        let text = self.render_shape(&shape, interner);
        self.shapes.push(shape.clone());
        self.rendered.push(Arc::from(text));
        self.ids.insert(shape, id);
        id
    }

    pub fn array(&mut self, element: TypeId, interner: &Interner) -> TypeId {
        self.intern(TypeShape::Array(element), interner)
    }

    pub fn object(&mut self, fields: BTreeMap<Symbol, TypeId>, interner: &Interner) -> TypeId {
        self.intern(TypeShape::Object(fields), interner)
    }

    pub fn foreign(&mut self, name: &str, interner: &Interner) -> TypeId {
        self.intern(
            TypeShape::Foreign {
                name: Arc::from(name),
            },
            interner,
        )
    }

    #[inline]
    pub fn get(&self, id: TypeId) -> &TypeShape {
        &self.shapes[id.index()]
    }

    /// Cached display form, e.g. `Expr[]` or `{lhs: Expr, op: Token}`.
    #[inline]
    pub fn render(&self, id: TypeId) -> &str {
        &self.rendered[id.index()]
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (TypeId, &TypeShape)> {
        self.shapes
            .iter()
            .enumerate()
            .map(|(i, s)| (TypeId(i as u32), s))
    }

    fn render_shape(&self, shape: &TypeShape, interner: &Interner) -> String {
        match shape {
            TypeShape::NoType => "<none>".to_string(),
            TypeShape::Array(element) => format!("{}[]", self.render(*element)),
            TypeShape::Object(fields) => {
                let fields: Vec<String> = fields
                    .iter()
                    .map(|(name, ty)| format!("{}: {}", interner.resolve(*name), self.render(*ty)))
                    .collect();
                format!("{{{}}}", fields.join(", "))
            }
            TypeShape::Nominal { name, .. } => interner.resolve(*name).to_string(),
            TypeShape::Foreign { name } => name.to_string(),
        }
    }
}
