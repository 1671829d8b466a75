//! Arena-backed store of type nodes
//!
//! All nodes of a registry live in one indexed arena guarded by a single
//! mutex. Parent and child links are plain indices: a child records its
//! parent's index and the parent lists its children's indices, so there are
//! no ownership cycles. Every structural change runs under the lock from
//! validation to mutation.

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use lazy_static::lazy_static;
use log::{debug, warn};

use super::instance::TypeInstance;
use super::node::{TypeInfo, TypeNode};
use crate::cache::FlyweightCache;
use crate::{GeoError, Result};

lazy_static! {
    /// Process-wide type registry
    static ref GLOBAL_REGISTRY: TypeRegistry = TypeRegistry::new();
}

static NEXT_REGISTRY_ID: AtomicU64 = AtomicU64::new(1);

/// Position of a node inside its registry's arena
///
/// An index carries the id of the registry that issued it, and any other
/// registry rejects it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeIndex {
    registry: u64,
    slot: usize,
}

impl NodeIndex {
    /// Raw arena slot
    pub fn as_usize(self) -> usize {
        self.slot
    }
}

impl fmt::Display for NodeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.slot)
    }
}

#[derive(Debug)]
struct NodeData {
    info: Arc<TypeInfo>,
    parent: Option<NodeIndex>,
    children: Vec<NodeIndex>,
}

#[derive(Debug)]
struct Arena {
    registry: u64,
    nodes: Vec<NodeData>,
    by_name: HashMap<String, NodeIndex>,
}

impl Arena {
    fn new(registry: u64) -> Self {
        Self {
            registry,
            nodes: Vec::new(),
            by_name: HashMap::new(),
        }
    }

    fn slot(&self, index: NodeIndex) -> Result<usize> {
        if index.registry != self.registry {
            return Err(GeoError::InvalidArgument(format!(
                "Type node index {} was issued by another registry",
                index
            )));
        }
        Ok(index.slot)
    }

    fn node(&self, index: NodeIndex) -> Result<&NodeData> {
        self.nodes
            .get(self.slot(index)?)
            .ok_or_else(|| GeoError::NotFound(format!("No type node at index {}", index)))
    }

    fn node_mut(&mut self, index: NodeIndex) -> Result<&mut NodeData> {
        let slot = self.slot(index)?;
        self.nodes
            .get_mut(slot)
            .ok_or_else(|| GeoError::NotFound(format!("No type node at index {}", index)))
    }

    /// Walk the parent chain starting above `from`, looking for `target`
    fn has_ancestor(&self, from: NodeIndex, target: NodeIndex) -> Result<bool> {
        let mut current = self.node(from)?.parent;
        let mut steps = 0;
        while let Some(index) = current {
            if index == target {
                return Ok(true);
            }
            steps += 1;
            if steps > self.nodes.len() {
                return Err(GeoError::ConsistencyViolation(format!(
                    "Cycle detected above type node {}",
                    from
                )));
            }
            current = self.node(index)?.parent;
        }
        Ok(false)
    }

    fn unlink(&mut self, child: NodeIndex) -> Result<Option<NodeIndex>> {
        let old_parent = self.node_mut(child)?.parent.take();
        if let Some(parent) = old_parent {
            self.node_mut(parent)?.children.retain(|&c| c != child);
        }
        Ok(old_parent)
    }
}

/// Canonicalizing registry of type nodes and their instances
///
/// Construct one per application (or use [`TypeRegistry::global`]) and hand
/// it to the code that classifies entities. Nodes obtained from a registry
/// borrow it, and can only be linked to nodes of the same registry.
#[derive(Debug)]
pub struct TypeRegistry {
    arena: Mutex<Arena>,
    instances: FlyweightCache<(NodeIndex, String), Arc<TypeInstance>>,
    instance_counter: AtomicU64,
}

impl TypeRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            arena: Mutex::new(Arena::new(NEXT_REGISTRY_ID.fetch_add(1, Ordering::Relaxed))),
            instances: FlyweightCache::new(),
            instance_counter: AtomicU64::new(0),
        }
    }

    /// The process-wide registry, created on first use
    pub fn global() -> &'static TypeRegistry {
        &GLOBAL_REGISTRY
    }

    fn lock(&self) -> Result<MutexGuard<'_, Arena>> {
        self.arena
            .lock()
            .map_err(|_| GeoError::LockPoisoned("Failed to lock type registry".to_string()))
    }

    /// Canonical type node for `name` with the given attribute set
    ///
    /// The first request for a name creates an unattached node. Later
    /// requests return the same node, provided they name the same attribute
    /// set (order and duplicates do not matter).
    ///
    /// # Errors
    ///
    /// - [`GeoError::InvalidArgument`] for an empty name
    /// - [`GeoError::ConsistencyViolation`] if `name` is already registered
    ///   with different attributes
    pub fn get_type<I, S>(&self, name: &str, attributes: I) -> Result<TypeNode<'_>>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if name.is_empty() {
            return Err(GeoError::InvalidArgument(
                "Type name may not be empty".to_string(),
            ));
        }
        let attributes: BTreeSet<String> = attributes.into_iter().map(Into::into).collect();

        let mut arena = self.lock()?;
        if let Some(&index) = arena.by_name.get(name) {
            let info = Arc::clone(&arena.node(index)?.info);
            if info.attributes() != &attributes {
                warn!("type {:?} requested with conflicting attributes", name);
                return Err(GeoError::ConsistencyViolation(format!(
                    "Type {} already exists with attributes {:?}",
                    name,
                    info.attributes()
                )));
            }
            return Ok(TypeNode::new(self, index, info));
        }

        let index = NodeIndex {
            registry: arena.registry,
            slot: arena.nodes.len(),
        };
        let info = Arc::new(TypeInfo::new(name.to_string(), attributes));
        arena.nodes.push(NodeData {
            info: Arc::clone(&info),
            parent: None,
            children: Vec::new(),
        });
        arena.by_name.insert(name.to_string(), index);
        debug!("registered type {:?} at {}", name, index);
        Ok(TypeNode::new(self, index, info))
    }

    /// Registered node called `name`
    pub fn lookup(&self, name: &str) -> Result<TypeNode<'_>> {
        let arena = self.lock()?;
        let index = *arena
            .by_name
            .get(name)
            .ok_or_else(|| GeoError::NotFound(format!("Type not found: {}", name)))?;
        let info = Arc::clone(&arena.node(index)?.info);
        Ok(TypeNode::new(self, index, info))
    }

    /// Node stored at `index`
    ///
    /// # Errors
    ///
    /// - [`GeoError::InvalidArgument`] if `index` came from another registry
    /// - [`GeoError::NotFound`] if no node sits at `index`
    pub fn node(&self, index: NodeIndex) -> Result<TypeNode<'_>> {
        let arena = self.lock()?;
        let info = Arc::clone(&arena.node(index)?.info);
        Ok(TypeNode::new(self, index, info))
    }

    /// Number of registered types
    pub fn len(&self) -> Result<usize> {
        Ok(self.lock()?.nodes.len())
    }

    /// Check if no type has been registered
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Make `parent` the parent of `child`
    ///
    /// Rejects self-attachment and any link that would make `child` its own
    /// ancestor. A child that already has a parent is detached from it first.
    pub(crate) fn attach(&self, child: NodeIndex, parent: NodeIndex) -> Result<()> {
        if child == parent {
            return Err(GeoError::InvalidArgument(format!(
                "Type node {} cannot be attached to itself",
                child
            )));
        }

        let mut arena = self.lock()?;
        arena.node(child)?;
        if arena.has_ancestor(parent, child)? {
            return Err(GeoError::InvalidArgument(format!(
                "Attaching {} under {} would create a cycle",
                arena.node(child)?.info.name(),
                arena.node(parent)?.info.name()
            )));
        }

        if let Some(old_parent) = arena.unlink(child)? {
            debug!("detached type {} from {}", child, old_parent);
        }
        arena.node_mut(child)?.parent = Some(parent);
        arena.node_mut(parent)?.children.push(child);
        debug!("attached type {} under {}", child, parent);
        Ok(())
    }

    /// Return `child` to the unattached state; returns the former parent
    pub(crate) fn detach(&self, child: NodeIndex) -> Result<Option<NodeIndex>> {
        let old_parent = self.lock()?.unlink(child)?;
        if let Some(parent) = old_parent {
            debug!("detached type {} from {}", child, parent);
        }
        Ok(old_parent)
    }

    /// True if `ancestor` lies strictly above `node`
    pub(crate) fn is_subtype_of(&self, node: NodeIndex, ancestor: NodeIndex) -> Result<bool> {
        let arena = self.lock()?;
        arena.node(ancestor)?;
        arena.has_ancestor(node, ancestor)
    }

    pub(crate) fn parent_of(&self, node: NodeIndex) -> Result<Option<TypeNode<'_>>> {
        let arena = self.lock()?;
        match arena.node(node)?.parent {
            Some(parent) => {
                let info = Arc::clone(&arena.node(parent)?.info);
                Ok(Some(TypeNode::new(self, parent, info)))
            }
            None => Ok(None),
        }
    }

    pub(crate) fn children_of(&self, node: NodeIndex) -> Result<Vec<TypeNode<'_>>> {
        let arena = self.lock()?;
        arena
            .node(node)?
            .children
            .iter()
            .map(|&child| {
                let info = Arc::clone(&arena.node(child)?.info);
                Ok(TypeNode::new(self, child, info))
            })
            .collect()
    }

    /// Canonical instance called `name` of the type at `node`
    ///
    /// Ids are assigned in creation order, starting at 1, and never reused.
    /// An index issued by another registry is rejected with
    /// [`GeoError::InvalidArgument`].
    pub fn instance(&self, node: NodeIndex, name: &str) -> Result<Arc<TypeInstance>> {
        if name.is_empty() {
            return Err(GeoError::InvalidArgument(
                "Instance name may not be empty".to_string(),
            ));
        }
        let type_name = self.node(node)?.name().to_string();
        self.instances
            .get_or_insert_with((node, name.to_string()), || {
                let id = self.instance_counter.fetch_add(1, Ordering::SeqCst) + 1;
                debug!("new instance {:?} of type {:?} with id {}", name, type_name, id);
                Ok(Arc::new(TypeInstance::new(id, name.to_string(), node, type_name)))
            })
    }

    /// Number of distinct instances created through this registry
    pub fn instance_count(&self) -> Result<usize> {
        self.instances.len()
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}
