//! A sparse-set entity-component registry core.
//!
//! See [`registry::Registry`] for the main entry point: it owns the entity
//! allocator and one [`component::sparse_set::SparseSet`] per component type
//! ever bound.

pub use sparsecs_macros::Component;

pub mod component;
pub mod entity;
pub mod error;
pub mod query;
pub mod registry;

pub use entity::EntityId;
pub use error::BindError;
pub use registry::Registry;
