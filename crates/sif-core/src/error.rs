use crate::entity::EntityId;

/// Alias for `Result<T, CoreError>`.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur when manipulating actor documents.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// The requested item ID is not owned by the actor.
    #[error("item not found: {0}")]
    ItemNotFound(EntityId),

    /// An item with the same ID is already owned by the actor.
    #[error("item already owned: {0}")]
    DuplicateItem(EntityId),

    /// The item exists but is not of the kind the caller asked for.
    #[error("item \"{name}\" is not a {expected}")]
    WrongItemKind {
        /// Display name of the item.
        name: String,
        /// The item kind the caller expected.
        expected: &'static str,
    },

    /// The document could not be encoded or decoded as JSON.
    #[error("document serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}
