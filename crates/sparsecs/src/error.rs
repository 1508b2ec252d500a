use crate::entity::EntityId;

/// Failure modes for [`crate::registry::Registry::bind`] and
/// [`crate::component::sparse_set::SparseSet::bind`].
///
/// Every other registry operation is infallible: absence is represented by
/// `Option`/empty sequences rather than an error variant here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum BindError {
    /// `bind` was called with the reserved null id.
    #[error("cannot bind a component to the null entity id")]
    InvalidKey,
    /// `bind` was called with an id that is not currently alive.
    #[error("entity {0} is not alive")]
    DeadEntity(EntityId),
}
