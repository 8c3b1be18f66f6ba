//! Update operation: `SET` expression synthesis.

use chrono::{DateTime, Utc};
use serde_json::Value;
use std::collections::HashMap;

use super::key::prepare_key_params;
use super::{iso_timestamp, sort_key_display};
use crate::errors::TableError;
use crate::params::{ReturnValues, UpdateParams};
use crate::schema::{CREATED_AT, HEAD_VERSION, LATEST, TableSchema, UPDATED_AT};

/// Build the update request for an existing record.
///
/// On a versioned table only the head version (`v0`) is mutable. The
/// expression starts with the idempotent `Latest` increment (versioned
/// tables only), then the unconditional `UpdatedAt` stamp, then one
/// `<field> = :f<i>` assignment per remaining field in the order the caller
/// supplied them. Caller-supplied `CreatedAt`/`UpdatedAt` entries are
/// server-managed and stripped before placeholders are assigned.
pub fn prepare_update_params(
    schema: &TableSchema,
    hash_key: Value,
    sort_key: Option<Value>,
    updated_fields: Vec<(String, Value)>,
    now: DateTime<Utc>,
) -> Result<UpdateParams, TableError> {
    let versioned = schema.is_versioned();
    if versioned && sort_key.as_ref().and_then(Value::as_str) != Some(HEAD_VERSION) {
        return Err(TableError::ImmutableVersion {
            sort_key: sort_key_display(sort_key.as_ref()),
        });
    }

    let key_params = prepare_key_params(schema, hash_key, sort_key);

    let mut expression = String::from("SET ");
    let mut values: HashMap<String, Value> = HashMap::new();

    if versioned {
        expression.push_str(&format!(
            "{LATEST} = if_not_exists({LATEST}, :zero) + :one, "
        ));
        values.insert(":zero".to_string(), Value::from(0));
        values.insert(":one".to_string(), Value::from(1));
    }

    expression.push_str(&format!("{UPDATED_AT} = :updatedAt"));
    values.insert(":updatedAt".to_string(), Value::String(iso_timestamp(now)));

    let fields = updated_fields
        .into_iter()
        .filter(|(name, _)| name != CREATED_AT && name != UPDATED_AT);
    for (index, (field, value)) in fields.enumerate() {
        let placeholder = format!(":f{index}");
        expression.push_str(&format!(", {field} = {placeholder}"));
        values.insert(placeholder, value);
    }

    Ok(UpdateParams {
        table_name: key_params.table_name,
        key: key_params.key,
        update_expression: expression,
        expression_attribute_values: values,
        return_values: ReturnValues::AllNew,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 30, 45).unwrap()
    }

    fn plain_schema() -> TableSchema {
        TableSchema::new("articles", "ArticleId").sort_key("Revision")
    }

    fn versioned_schema() -> TableSchema {
        TableSchema::new("articles_versions", "ArticleId").sort_key("Version")
    }

    #[test]
    fn non_versioned_update_has_no_latest_term() {
        let params = prepare_update_params(
            &plain_schema(),
            json!("a-1"),
            Some(json!("r-1")),
            vec![("Title".to_string(), json!("new"))],
            now(),
        )
        .unwrap();

        assert_eq!(
            params.update_expression,
            "SET UpdatedAt = :updatedAt, Title = :f0"
        );
        assert_eq!(params.expression_attribute_values[":f0"], json!("new"));
        assert_eq!(
            params.expression_attribute_values[":updatedAt"],
            json!("2024-06-01T12:30:45.000Z")
        );
        assert!(!params.expression_attribute_values.contains_key(":zero"));
        assert_eq!(params.return_values, ReturnValues::AllNew);
    }

    #[test]
    fn versioned_update_starts_with_the_latest_increment() {
        let params = prepare_update_params(
            &versioned_schema(),
            json!("a-1"),
            Some(json!("v0")),
            vec![("Title".to_string(), json!("new"))],
            now(),
        )
        .unwrap();

        assert_eq!(
            params.update_expression,
            "SET Latest = if_not_exists(Latest, :zero) + :one, \
             UpdatedAt = :updatedAt, Title = :f0"
        );
        assert_eq!(params.expression_attribute_values[":zero"], json!(0));
        assert_eq!(params.expression_attribute_values[":one"], json!(1));
    }

    #[test]
    fn versioned_update_rejects_non_head_versions() {
        for bad in [json!("v1"), json!("v999"), json!("r-1"), Value::Null] {
            let err = prepare_update_params(
                &versioned_schema(),
                json!("a-1"),
                Some(bad),
                vec![],
                now(),
            )
            .unwrap_err();
            assert!(matches!(err, TableError::ImmutableVersion { .. }));
        }
    }

    #[test]
    fn server_managed_timestamps_are_stripped() {
        let params = prepare_update_params(
            &plain_schema(),
            json!("a-1"),
            Some(json!("r-1")),
            vec![
                ("CreatedAt".to_string(), json!("1970-01-01")),
                ("Title".to_string(), json!("new")),
                ("UpdatedAt".to_string(), json!("1970-01-01")),
                ("Score".to_string(), json!(5)),
            ],
            now(),
        )
        .unwrap();

        // Placeholders are assigned over the remaining fields in order.
        assert_eq!(
            params.update_expression,
            "SET UpdatedAt = :updatedAt, Title = :f0, Score = :f1"
        );
        assert_eq!(params.expression_attribute_values[":f0"], json!("new"));
        assert_eq!(params.expression_attribute_values[":f1"], json!(5));
        assert!(!params.expression_attribute_values.contains_key(":f2"));
    }

    #[test]
    fn placeholders_follow_caller_field_order() {
        let params = prepare_update_params(
            &plain_schema(),
            json!("a-1"),
            Some(json!("r-1")),
            vec![
                ("Zeta".to_string(), json!(1)),
                ("Alpha".to_string(), json!(2)),
                ("Mid".to_string(), json!(3)),
            ],
            now(),
        )
        .unwrap();

        assert_eq!(
            params.update_expression,
            "SET UpdatedAt = :updatedAt, Zeta = :f0, Alpha = :f1, Mid = :f2"
        );
        assert_eq!(params.expression_attribute_values[":f0"], json!(1));
        assert_eq!(params.expression_attribute_values[":f1"], json!(2));
        assert_eq!(params.expression_attribute_values[":f2"], json!(3));
    }

    #[test]
    fn empty_field_list_still_stamps_updated_at() {
        let params = prepare_update_params(
            &plain_schema(),
            json!("a-1"),
            Some(json!("r-1")),
            vec![],
            now(),
        )
        .unwrap();

        assert_eq!(params.update_expression, "SET UpdatedAt = :updatedAt");
    }

    #[test]
    fn update_targets_the_key_built_from_the_schema() {
        let params = prepare_update_params(
            &plain_schema(),
            json!("a-1"),
            Some(json!("r-1")),
            vec![],
            now(),
        )
        .unwrap();

        assert_eq!(params.table_name, "articles");
        assert_eq!(params.key.len(), 2);
        assert_eq!(params.key["ArticleId"], json!("a-1"));
        assert_eq!(params.key["Revision"], json!("r-1"));
    }
}
