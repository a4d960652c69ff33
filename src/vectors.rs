//! Vectors: named alternatives a module can be told to use.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// A named item a bound argument may reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vector {
    pub name: String,
    /// Opaque data the owning module interprets.
    #[serde(default)]
    pub payload: String,
}

impl Vector {
    pub fn new(name: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            payload: payload.into(),
        }
    }
}

/// Source of the vector names a module validates against.
pub trait VectorProvider: Send + Sync {
    /// Names of all known vectors.
    fn names(&self) -> BTreeSet<String>;

    /// Add vectors. A vector whose name is already known replaces the old one.
    fn extend(&mut self, items: Vec<Vector>);

    fn get(&self, name: &str) -> Option<&Vector>;
}

/// Ordered in-memory vector list.
#[derive(Debug, Clone, Default)]
pub struct VectorList {
    items: Vec<Vector>,
}

impl VectorList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Vector> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl VectorProvider for VectorList {
    fn names(&self) -> BTreeSet<String> {
        self.items.iter().map(|v| v.name.clone()).collect()
    }

    fn extend(&mut self, items: Vec<Vector>) {
        for item in items {
            match self.items.iter_mut().find(|v| v.name == item.name) {
                Some(existing) => *existing = item,
                None => self.items.push(item),
            }
        }
    }

    fn get(&self, name: &str) -> Option<&Vector> {
        self.items.iter().find(|v| v.name == name)
    }
}
