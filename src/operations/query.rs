//! Query Params Builder: key-condition and filter construction.

use serde_json::Value;
use std::collections::HashMap;

use crate::errors::TableError;
use crate::params::{Filter, QueryParams};
use crate::schema::TableSchema;

/// Build the request shape for a range query.
///
/// The key condition is always `#pk = :pkv`, with `#pk` bound to the hash-key
/// attribute of the base table or of the named index. When a sort-key value
/// is supplied the condition is extended with ` and #skv = :skv`; when it is
/// absent no sort bindings are emitted at all, whether or not a sort key is
/// defined. Filter attributes are merged into the value bindings under
/// `:<key>`.
pub fn prepare_query_params(
    schema: &TableSchema,
    index_name: Option<&str>,
    hash_key: Value,
    sort_key: Option<Value>,
    filter: Option<Filter>,
) -> Result<QueryParams, TableError> {
    let (hash_attr, sort_attr) = match index_name {
        Some(name) => {
            let index = schema
                .indexes
                .get(name)
                .ok_or_else(|| TableError::UnknownIndex {
                    name: name.to_string(),
                })?;
            (index.hash_key.as_str(), index.sort_key.as_deref())
        }
        None => (schema.hash_key.as_str(), schema.sort_key.as_deref()),
    };

    let mut key_condition_expression = String::from("#pk = :pkv");
    let mut names = HashMap::from([("#pk".to_string(), hash_attr.to_string())]);
    let mut values = HashMap::from([(":pkv".to_string(), hash_key)]);

    if let Some(sort_key) = sort_key {
        let sort_attr = sort_attr.ok_or_else(|| TableError::MissingSortKey {
            scope: match index_name {
                Some(name) => format!("index '{name}'"),
                None => format!("table '{}'", schema.table_name),
            },
        })?;
        key_condition_expression.push_str(" and #skv = :skv");
        names.insert("#skv".to_string(), sort_attr.to_string());
        values.insert(":skv".to_string(), sort_key);
    }

    let filter_expression = match filter {
        Some(filter) => {
            for (key, value) in filter.attributes {
                if key == "pkv" || key == "skv" {
                    return Err(TableError::FilterPlaceholderCollision { key });
                }
                values.insert(format!(":{key}"), value);
            }
            Some(filter.expression)
        }
        None => None,
    };

    Ok(QueryParams {
        table_name: schema.table_name.clone(),
        index_name: index_name.map(str::to_string),
        key_condition_expression,
        expression_attribute_names: names,
        expression_attribute_values: values,
        filter_expression,
    })
}
