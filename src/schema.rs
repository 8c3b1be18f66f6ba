//! Table schema descriptors and the versioning convention.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Attribute stamped with the creation timestamp on non-versioned tables.
pub const CREATED_AT: &str = "CreatedAt";
/// Attribute stamped with the last-write timestamp on every table.
pub const UPDATED_AT: &str = "UpdatedAt";
/// Update counter carried by records on versioned tables.
pub const LATEST: &str = "Latest";

/// Sort-key tag of the mutable head record on a versioned table.
pub const HEAD_VERSION: &str = "v0";

/// Key attributes of a secondary index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexSchema {
    /// Name of the index's partition-key attribute.
    pub hash_key: String,
    /// Name of the index's sort-key attribute, if it has one.
    #[serde(default)]
    pub sort_key: Option<String>,
}

impl IndexSchema {
    /// Create an index schema with a hash key only.
    pub fn new(hash_key: impl Into<String>) -> Self {
        Self {
            hash_key: hash_key.into(),
            sort_key: None,
        }
    }

    /// Set the index's sort-key attribute name.
    pub fn sort_key(mut self, name: impl Into<String>) -> Self {
        self.sort_key = Some(name.into());
        self
    }
}

/// Whether a table stores versioned records.
///
/// On an [`Optimistic`](VersioningPolicy::Optimistic) table the sort key is a
/// version tag (`v0`, `v1`, ...), `v0` is the only mutable record, and every
/// update bumps the `Latest` counter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VersioningPolicy {
    /// Plain table: records carry `CreatedAt`/`UpdatedAt` timestamps.
    #[default]
    None,
    /// Versioned table: records carry a `Latest` update counter.
    Optimistic,
}

impl VersioningPolicy {
    /// Resolve the legacy naming convention: tables whose name ends with
    /// `_versions` use optimistic versioning.
    pub fn infer(table_name: &str) -> Self {
        if table_name.ends_with("_versions") {
            Self::Optimistic
        } else {
            Self::None
        }
    }

    /// True when the policy is [`Optimistic`](VersioningPolicy::Optimistic).
    pub fn is_optimistic(self) -> bool {
        matches!(self, Self::Optimistic)
    }
}

/// Parse a version tag of the form `v<digits>`.
///
/// Returns the numeric version, or `None` when the tag is malformed.
pub fn parse_version_tag(tag: &str) -> Option<u64> {
    let digits = tag.strip_prefix('v')?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Key layout of one table, supplied by the caller and immutable for the
/// lifetime of a [`Table`](crate::table::Table).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableSchema {
    /// Table name.
    pub table_name: String,
    /// Name of the partition-key attribute.
    pub hash_key: String,
    /// Name of the sort-key attribute. A table may have only a hash key.
    #[serde(default)]
    pub sort_key: Option<String>,
    /// Secondary indexes by name.
    #[serde(default)]
    pub indexes: HashMap<String, IndexSchema>,
    /// Versioning policy, resolved once at configuration time.
    #[serde(default)]
    pub versioning: VersioningPolicy,
}

impl TableSchema {
    /// Create a schema for a hash-key-only table.
    ///
    /// The versioning policy is inferred from the table name (`_versions`
    /// suffix); override it with [`versioning`](Self::versioning) when the
    /// convention does not apply.
    pub fn new(table_name: impl Into<String>, hash_key: impl Into<String>) -> Self {
        let table_name = table_name.into();
        let versioning = VersioningPolicy::infer(&table_name);
        Self {
            table_name,
            hash_key: hash_key.into(),
            sort_key: None,
            indexes: HashMap::new(),
            versioning,
        }
    }

    /// Set the table's sort-key attribute name.
    pub fn sort_key(mut self, name: impl Into<String>) -> Self {
        self.sort_key = Some(name.into());
        self
    }

    /// Declare a secondary index.
    pub fn index(mut self, name: impl Into<String>, index: IndexSchema) -> Self {
        self.indexes.insert(name.into(), index);
        self
    }

    /// Override the versioning policy.
    pub fn versioning(mut self, policy: VersioningPolicy) -> Self {
        self.versioning = policy;
        self
    }

    /// True when the table stores versioned records.
    pub fn is_versioned(&self) -> bool {
        self.versioning.is_optimistic()
    }
}
