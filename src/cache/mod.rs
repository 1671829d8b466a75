//! Caches used by the value-object factories
//!
//! - `flyweight`: unbounded, canonicalizing; one shared value per key
//! - `bounded`: fixed capacity with least-recently-used eviction

pub mod bounded;
pub mod flyweight;

pub use self::bounded::BoundedCache;
pub use self::flyweight::FlyweightCache;
