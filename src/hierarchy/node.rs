//! Handles to nodes of a type hierarchy
//!
//! A [`TypeNode`] is a lightweight handle: the registry it came from, the
//! node's arena index, and the node's immutable identity (name and
//! attributes). Structural state, the parent and children links, stays in
//! the registry and is read under its lock on every query.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use super::instance::TypeInstance;
use super::registry::{NodeIndex, TypeRegistry};
use crate::{GeoError, Result};

/// Write-once identity of a type node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeInfo {
    name: String,
    attributes: BTreeSet<String>,
}

impl TypeInfo {
    pub(crate) fn new(name: String, attributes: BTreeSet<String>) -> Self {
        Self { name, attributes }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attributes(&self) -> &BTreeSet<String> {
        &self.attributes
    }
}

/// Handle to a canonical type node owned by a [`TypeRegistry`]
///
/// Two handles are equal when they refer to the same node of the same
/// registry.
#[derive(Clone)]
pub struct TypeNode<'r> {
    registry: &'r TypeRegistry,
    index: NodeIndex,
    info: Arc<TypeInfo>,
}

impl<'r> TypeNode<'r> {
    pub(crate) fn new(registry: &'r TypeRegistry, index: NodeIndex, info: Arc<TypeInfo>) -> Self {
        Self {
            registry,
            index,
            info,
        }
    }

    /// Arena index of this node
    pub fn index(&self) -> NodeIndex {
        self.index
    }

    /// Type name, unique within the registry
    pub fn name(&self) -> &str {
        self.info.name()
    }

    /// Attribute set the type was registered with
    pub fn attributes(&self) -> &BTreeSet<String> {
        self.info.attributes()
    }

    fn same_registry(&self, other: &TypeNode<'_>) -> Result<()> {
        if std::ptr::eq(self.registry, other.registry) {
            Ok(())
        } else {
            Err(GeoError::InvalidArgument(format!(
                "Types {} and {} belong to different registries",
                self.name(),
                other.name()
            )))
        }
    }

    /// Attach this node under `parent`
    ///
    /// A node that already has a parent is moved. Fails with
    /// [`GeoError::InvalidArgument`] if `parent` is this node or one of its
    /// descendants.
    pub fn attach(&self, parent: &TypeNode<'_>) -> Result<()> {
        self.same_registry(parent)?;
        self.registry.attach(self.index, parent.index)
    }

    /// Attach `child` under this node
    pub fn add_subtype(&self, child: &TypeNode<'_>) -> Result<()> {
        child.attach(self)
    }

    /// Remove this node from its parent, if any
    pub fn detach(&self) -> Result<()> {
        self.registry.detach(self.index).map(|_| ())
    }

    /// Direct parent, or `None` for an unattached node
    pub fn parent(&self) -> Result<Option<TypeNode<'r>>> {
        self.registry.parent_of(self.index)
    }

    /// True if this node has no parent
    pub fn is_root(&self) -> Result<bool> {
        Ok(self.parent()?.is_none())
    }

    /// Direct children in attachment order
    pub fn children(&self) -> Result<std::vec::IntoIter<TypeNode<'r>>> {
        Ok(self.registry.children_of(self.index)?.into_iter())
    }

    /// True if `ancestor` is reachable by following parent links upward
    ///
    /// The walk starts at the parent, so a node is never a subtype of itself.
    pub fn is_subtype_of(&self, ancestor: &TypeNode<'_>) -> Result<bool> {
        if !std::ptr::eq(self.registry, ancestor.registry) {
            return Ok(false);
        }
        self.registry.is_subtype_of(self.index, ancestor.index)
    }

    /// Canonical instance of this type called `name`
    pub fn create_instance(&self, name: &str) -> Result<Arc<TypeInstance>> {
        self.registry.instance(self.index, name)
    }
}

impl PartialEq for TypeNode<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.registry, other.registry) && self.index == other.index
    }
}

impl Eq for TypeNode<'_> {}

impl fmt::Debug for TypeNode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeNode")
            .field("index", &self.index)
            .field("name", &self.info.name)
            .field("attributes", &self.info.attributes)
            .finish()
    }
}

impl fmt::Display for TypeNode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
