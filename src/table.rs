//! Per-table accessor.

use chrono::Utc;
use serde_json::Value;
use tracing::debug;

use crate::client::StoreClient;
use crate::errors::TableError;
use crate::operations::{
    prepare_key_params, prepare_put_params, prepare_query_params, prepare_update_params,
};
use crate::params::{Filter, Item};
use crate::schema::TableSchema;

/// Arguments for [`Table::query`].
#[derive(Debug, Clone, Default)]
pub struct QueryRequest {
    /// Hash-key value to match.
    pub hash_key: Value,
    /// Sort-key value to match, when querying within a partition.
    pub sort_key: Option<Value>,
    /// Secondary index to query instead of the base table.
    pub index_name: Option<String>,
    /// Post-condition applied to matched items.
    pub filter: Option<Filter>,
}

impl QueryRequest {
    /// Query a partition by hash-key value.
    pub fn new(hash_key: impl Into<Value>) -> Self {
        Self {
            hash_key: hash_key.into(),
            ..Self::default()
        }
    }

    /// Match a sort-key value within the partition.
    pub fn sort_key(mut self, value: impl Into<Value>) -> Self {
        self.sort_key = Some(value.into());
        self
    }

    /// Query the named secondary index.
    pub fn index(mut self, name: impl Into<String>) -> Self {
        self.index_name = Some(name.into());
        self
    }

    /// Apply a filter to matched items.
    pub fn filter(mut self, filter: Filter) -> Self {
        self.filter = Some(filter);
        self
    }
}

/// A per-table accessor bound to an injected store client.
///
/// Stateless across calls: the only held state is the schema and the client
/// handle, both read-only after construction, so concurrent calls on the same
/// instance are independent. Retries, timeouts, and backpressure belong to
/// the injected client.
#[derive(Debug, Clone)]
pub struct Table<C> {
    schema: TableSchema,
    client: C,
}

impl<C> Table<C> {
    /// Bind a schema to a store client.
    pub fn new(schema: TableSchema, client: C) -> Self {
        Self { schema, client }
    }

    /// The schema this table was constructed with.
    pub fn config(&self) -> &TableSchema {
        &self.schema
    }
}

impl<C: StoreClient> Table<C> {
    /// Fetch a single record by primary key.
    pub async fn get(
        &self,
        hash_key: impl Into<Value>,
        sort_key: Option<Value>,
    ) -> Result<Option<Item>, TableError> {
        let params = prepare_key_params(&self.schema, hash_key.into(), sort_key);
        debug!(table = %params.table_name, "get item");
        self.client.get_item(params).await
    }

    /// Query records by hash key, optionally narrowed by sort key, index,
    /// and filter.
    pub async fn query(&self, request: QueryRequest) -> Result<Vec<Item>, TableError> {
        let params = prepare_query_params(
            &self.schema,
            request.index_name.as_deref(),
            request.hash_key,
            request.sort_key,
            request.filter,
        )?;
        debug!(table = %params.table_name, index = ?params.index_name, "query");
        self.client.query(params).await
    }

    /// Create a record.
    ///
    /// Stamps `UpdatedAt`, plus `Latest = 0` on versioned tables or
    /// `CreatedAt` otherwise, and injects the key attributes over any
    /// caller-supplied values. On versioned tables the sort key must be a
    /// `v<digits>` tag; violations fail before any store request is issued.
    pub async fn create(
        &self,
        hash_key: impl Into<Value>,
        sort_key: Option<Value>,
        record: Item,
    ) -> Result<Option<Item>, TableError> {
        let params =
            prepare_put_params(&self.schema, hash_key.into(), sort_key, record, Utc::now())?;
        debug!(table = %params.table_name, "put item");
        self.client.put_item(params).await
    }

    /// Update fields of a record.
    ///
    /// `updated_fields` is an ordered sequence: value placeholders (`:f0`,
    /// `:f1`, ...) follow its order. Caller-supplied `CreatedAt`/`UpdatedAt`
    /// entries are stripped. On versioned tables only `v0` is mutable;
    /// violations fail before any store request is issued.
    pub async fn update(
        &self,
        hash_key: impl Into<Value>,
        sort_key: Option<Value>,
        updated_fields: Vec<(String, Value)>,
    ) -> Result<Option<Item>, TableError> {
        let params = prepare_update_params(
            &self.schema,
            hash_key.into(),
            sort_key,
            updated_fields,
            Utc::now(),
        )?;
        debug!(table = %params.table_name, "update item");
        self.client.update_item(params).await
    }

    /// Delete a single record by primary key.
    pub async fn delete(
        &self,
        hash_key: impl Into<Value>,
        sort_key: Option<Value>,
    ) -> Result<Option<Item>, TableError> {
        let params = prepare_key_params(&self.schema, hash_key.into(), sort_key);
        debug!(table = %params.table_name, "delete item");
        self.client.delete_item(params).await
    }
}
