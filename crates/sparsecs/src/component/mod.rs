use std::any::Any;

use crate::entity::EntityId;

pub mod sparse_set;

/// A trait for types that can be used as components in the registry.
///
/// Components must be:
/// - Send: Can be transferred across thread boundaries
/// - Sync: Can be shared between threads
/// - 'static: Have a static lifetime
///
/// Components are pure data containers that can be attached to entities.
/// They should not contain any behavior - that belongs in the surrounding
/// application.
pub trait Component: Send + Sync + 'static {}

/// Type-erased handle to a component store.
///
/// Implemented by [`sparse_set::SparseSet`]. Lets the registry purge every
/// component of a killed entity without knowing any of the concrete
/// component types it holds.
pub trait ComponentStorage: Any {
    /// Removes and drops `id`'s component, if present. No-op otherwise.
    fn purge(&mut self, id: EntityId);
}
