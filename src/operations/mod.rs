//! Per-operation request builders.
//!
//! Each builder is a pure, synchronous function from schema + caller input to
//! a request descriptor, so validation fails before any store request is
//! issued:
//! - `key` - single-item addressing shared by get, create, update, delete
//! - `query` - key-condition and filter construction
//! - `create` - item payload synthesis with timestamp/version stamping
//! - `update` - `SET` expression synthesis with the versioned increment

mod create;
mod key;
mod query;
mod update;

pub use create::prepare_put_params;
pub use key::prepare_key_params;
pub use query::prepare_query_params;
pub use update::prepare_update_params;

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value;

/// Timestamp format stamped into `CreatedAt`/`UpdatedAt`: ISO-8601 UTC with
/// millisecond precision (`2024-01-01T00:00:00.000Z`).
pub(crate) fn iso_timestamp(now: DateTime<Utc>) -> String {
    now.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Render a sort-key value for error messages.
pub(crate) fn sort_key_display(sort_key: Option<&Value>) -> String {
    match sort_key {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => "<none>".to_string(),
    }
}
