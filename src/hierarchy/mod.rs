//! Type hierarchy for classifying domain entities
//!
//! Types form a forest: each node has at most one parent and any number of
//! children, and links that would close a cycle are rejected. Nodes and
//! their named instances are canonicalized by a [`TypeRegistry`].
//!
//! # Main Components
//!
//! - `registry`: arena storage, canonicalization and the attach state machine
//! - `node`: the [`TypeNode`] handle used by callers
//! - `instance`: named members of a type

pub mod instance;
pub mod node;
pub mod registry;

pub use self::instance::TypeInstance;
pub use self::node::{TypeInfo, TypeNode};
pub use self::registry::{NodeIndex, TypeRegistry};
