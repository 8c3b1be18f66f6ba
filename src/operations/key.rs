//! Key Params Builder: the single-item addressing shape.

use serde_json::Value;

use crate::params::{Item, KeyParams};
use crate::schema::TableSchema;

/// Build the request shape addressing exactly one item.
///
/// The key map carries exactly the schema's hash/sort attribute names. Value
/// types are not validated; a missing sort value on a sort-keyed table passes
/// through as JSON null, and a table without a sort key produces a hash-only
/// key map.
pub fn prepare_key_params(
    schema: &TableSchema,
    hash_key: Value,
    sort_key: Option<Value>,
) -> KeyParams {
    let mut key = Item::new();
    key.insert(schema.hash_key.clone(), hash_key);
    if let Some(name) = &schema.sort_key {
        key.insert(name.clone(), sort_key.unwrap_or(Value::Null));
    }

    KeyParams {
        table_name: schema.table_name.clone(),
        key,
    }
}
