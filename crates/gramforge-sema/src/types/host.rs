use indexmap::{IndexMap, IndexSet};

/// Host-language type information used when a type name is not declared
/// in the grammar.
pub trait HostResolver: Send + Sync {
    /// Canonical name of `name`, if the host knows it.
    fn resolve_type(&self, name: &str) -> Option<String>;

    /// Superclasses of `name`, nearest first.
    fn superclasses(&self, _name: &str) -> Vec<String> {
        Vec::new()
    }

    /// Every interface `name` implements, directly or through a superclass.
    fn interfaces(&self, _name: &str) -> Vec<String> {
        Vec::new()
    }
}

/// Host that knows no types.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHost;

impl HostResolver for NoHost {
    fn resolve_type(&self, _name: &str) -> Option<String> {
        None
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostType {
    pub superclass: Option<String>,
    pub interfaces: Vec<String>,
}

/// Host backed by a fixed table of types.
#[derive(Debug, Clone, Default)]
pub struct StaticHost {
    types: IndexMap<String, HostType>,
}

impl StaticHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_type(mut self, name: &str, superclass: Option<&str>, interfaces: &[&str]) -> Self {
        self.types.insert(
            name.to_string(),
            HostType {
                superclass: superclass.map(str::to_string),
                interfaces: interfaces.iter().map(|i| i.to_string()).collect(),
            },
        );
        self
    }
}

impl HostResolver for StaticHost {
    fn resolve_type(&self, name: &str) -> Option<String> {
        self.types.contains_key(name).then(|| name.to_string())
    }

    fn superclasses(&self, name: &str) -> Vec<String> {
        let mut seen = IndexSet::new();
        let mut cur = self.types.get(name).and_then(|t| t.superclass.clone());
        while let Some(parent) = cur {
            if parent == name || !seen.insert(parent.clone()) {
                break;
            }
            cur = self.types.get(&parent).and_then(|t| t.superclass.clone());
        }
        seen.into_iter().collect()
    }

    fn interfaces(&self, name: &str) -> Vec<String> {
        let mut out = IndexSet::new();
        let lineage = std::iter::once(name.to_string()).chain(self.superclasses(name));
        for ty in lineage {
            if let Some(info) = self.types.get(&ty) {
                out.extend(info.interfaces.iter().cloned());
            }
        }
        out.into_iter().collect()
    }
}
