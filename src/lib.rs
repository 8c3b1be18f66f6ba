//! # dynatable
//!
//! A lightweight single-table data-access layer for DynamoDB.
//!
//! One [`Table`] per logical table, bound to a schema descriptor and an
//! injected [`StoreClient`]:
//! - `get` / `query` / `create` / `update` / `delete` record operations
//! - key-condition, filter, and update expression construction with
//!   placeholder-based name/value maps
//! - optimistic versioning for tables that store `v0`, `v1`, ... snapshots
//!
//! The production client ([`DynamoDbStoreClient`]) runs on aws-sdk-dynamodb
//! and supports a localstack endpoint override for local development. Any
//! other backend can be injected through the [`StoreClient`] trait.
//!
//! ```no_run
//! use dynatable::{DynamoDbStoreClient, QueryRequest, Table, TableSchema};
//!
//! # async fn example() -> Result<(), dynatable::TableError> {
//! let schema = TableSchema::new("articles", "ArticleId").sort_key("Revision");
//! let table = Table::new(schema, DynamoDbStoreClient::from_env().await);
//!
//! let head = table.get("a-1", Some("r-1".into())).await?;
//! let drafts = table.query(QueryRequest::new("a-1")).await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod conversions;
pub mod errors;
pub mod operations;
pub mod params;
pub mod schema;
pub mod table;

pub use client::{DynamoDbStoreClient, EndpointConfig, StoreClient};
pub use errors::{BoxError, TableError};
pub use params::{Filter, Item, KeyParams, PutParams, QueryParams, ReturnValues, UpdateParams};
pub use schema::{IndexSchema, TableSchema, VersioningPolicy};
pub use table::{QueryRequest, Table};
