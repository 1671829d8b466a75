//! Named instances of a type node

use std::fmt;

use super::registry::NodeIndex;

/// A concrete, named member of a type, e.g. one brand of lager
///
/// Created only through [`TypeRegistry::instance`](super::TypeRegistry::instance),
/// which hands out one shared instance per `(type, name)` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeInstance {
    id: u64,
    name: String,
    type_index: NodeIndex,
    type_name: String,
}

impl TypeInstance {
    pub(crate) fn new(id: u64, name: String, type_index: NodeIndex, type_name: String) -> Self {
        Self {
            id,
            name,
            type_index,
            type_name,
        }
    }

    /// Registry-wide unique id, assigned on first creation
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Arena index of the instance's type
    pub fn type_index(&self) -> NodeIndex {
        self.type_index
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }
}

impl fmt::Display for TypeInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.type_name)
    }
}
