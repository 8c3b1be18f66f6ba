//! Error types for dynatable.
//!
//! Validation errors are returned before any store request is issued; errors
//! reported by the injected store client are propagated verbatim, boxed but
//! never translated.

use thiserror::Error;

/// Boxed error produced by a [`StoreClient`](crate::client::StoreClient)
/// implementation.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors surfaced by table operations.
#[derive(Debug, Error)]
pub enum TableError {
    /// Create on a versioned table with a sort key that is not a version tag.
    #[error("sort key '{sort_key}' doesn't match expected version pattern 'v<digits>'")]
    InvalidVersionTag {
        /// The offending sort-key value.
        sort_key: String,
    },

    /// Update on a versioned table targeting anything but the head version.
    #[error(
        "only records with version 'v0' can be updated on a versioned table, got '{sort_key}'"
    )]
    ImmutableVersion {
        /// The offending sort-key value.
        sort_key: String,
    },

    /// Query against an index name the schema does not declare.
    #[error("unknown secondary index '{name}'")]
    UnknownIndex {
        /// The requested index name.
        name: String,
    },

    /// A sort-key value was supplied where the schema defines no sort key.
    #[error("sort key value supplied but {scope} does not define a sort key")]
    MissingSortKey {
        /// The table or index the query was addressed to.
        scope: String,
    },

    /// A filter attribute key would shadow a key-condition placeholder.
    #[error("filter attribute ':{key}' collides with a key-condition placeholder")]
    FilterPlaceholderCollision {
        /// The colliding attribute key.
        key: String,
    },

    /// A store payload could not be mapped back to a JSON value.
    #[error("value conversion failed: {0}")]
    Value(String),

    /// Error reported by the injected store client, unchanged.
    #[error("{0}")]
    Store(BoxError),
}

impl From<BoxError> for TableError {
    fn from(err: BoxError) -> Self {
        Self::Store(err)
    }
}
