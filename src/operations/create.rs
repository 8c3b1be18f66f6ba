//! Create operation: item payload synthesis.

use chrono::{DateTime, Utc};
use serde_json::Value;

use super::key::prepare_key_params;
use super::{iso_timestamp, sort_key_display};
use crate::errors::TableError;
use crate::params::{Item, PutParams, ReturnValues};
use crate::schema::{CREATED_AT, LATEST, TableSchema, UPDATED_AT, parse_version_tag};

/// Build the put request for a new record.
///
/// On a versioned table the sort key must be a `v<digits>` tag. The item is
/// the caller's record with `UpdatedAt` stamped, then `Latest = 0`
/// (versioned) or `CreatedAt` (non-versioned), and finally the key attributes
/// injected last so they overwrite anything the caller supplied under those
/// names.
pub fn prepare_put_params(
    schema: &TableSchema,
    hash_key: Value,
    sort_key: Option<Value>,
    record: Item,
    now: DateTime<Utc>,
) -> Result<PutParams, TableError> {
    let versioned = schema.is_versioned();
    if versioned {
        let tag = sort_key.as_ref().and_then(Value::as_str);
        if tag.and_then(parse_version_tag).is_none() {
            return Err(TableError::InvalidVersionTag {
                sort_key: sort_key_display(sort_key.as_ref()),
            });
        }
    }

    let key_params = prepare_key_params(schema, hash_key, sort_key);
    let timestamp = Value::String(iso_timestamp(now));

    let mut item = record;
    item.insert(UPDATED_AT.to_string(), timestamp.clone());
    if versioned {
        item.insert(LATEST.to_string(), Value::from(0));
    } else {
        item.insert(CREATED_AT.to_string(), timestamp);
    }
    // Key attributes win over caller-supplied values under the same names.
    for (name, value) in key_params.key {
        item.insert(name, value);
    }

    Ok(PutParams {
        table_name: key_params.table_name,
        item,
        return_values: ReturnValues::AllOld,
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

    fn record() -> Item {
        let mut record = Item::new();
        record.insert("Title".to_string(), json!("hello"));
        record
    }

    #[test]
    fn non_versioned_create_stamps_both_timestamps() {
        let params =
            prepare_put_params(&plain_schema(), json!("a-1"), Some(json!("r-1")), record(), now())
                .unwrap();

        assert_eq!(params.item["CreatedAt"], params.item["UpdatedAt"]);
        assert_eq!(params.item["UpdatedAt"], json!("2024-06-01T12:30:45.000Z"));
        assert!(!params.item.contains_key("Latest"));
        assert_eq!(params.return_values, ReturnValues::AllOld);
    }

    #[test]
    fn versioned_create_sets_latest_and_no_created_at() {
        let params = prepare_put_params(
            &versioned_schema(),
            json!("a-1"),
            Some(json!("v0")),
            record(),
            now(),
        )
        .unwrap();

        assert_eq!(params.item["Latest"], json!(0));
        assert!(params.item.contains_key("UpdatedAt"));
        assert!(!params.item.contains_key("CreatedAt"));
    }

    #[test]
    fn key_attributes_overwrite_caller_values() {
        let mut record = record();
        record.insert("ArticleId".to_string(), json!("spoofed"));
        record.insert("Revision".to_string(), json!("spoofed"));

        let params =
            prepare_put_params(&plain_schema(), json!("a-1"), Some(json!("r-1")), record, now())
                .unwrap();

        assert_eq!(params.item["ArticleId"], json!("a-1"));
        assert_eq!(params.item["Revision"], json!("r-1"));
        assert_eq!(params.item["Title"], json!("hello"));
    }

    #[test]
    fn versioned_create_rejects_malformed_tags() {
        for bad in [json!("vA"), json!("0"), json!(3), Value::Null] {
            let err = prepare_put_params(
                &versioned_schema(),
                json!("a-1"),
                Some(bad),
                record(),
                now(),
            )
            .unwrap_err();
            assert!(matches!(err, TableError::InvalidVersionTag { .. }));
        }

        let err =
            prepare_put_params(&versioned_schema(), json!("a-1"), None, record(), now())
                .unwrap_err();
        assert!(matches!(err, TableError::InvalidVersionTag { .. }));
    }

    #[test]
    fn versioned_create_accepts_any_numeric_tag() {
        let params = prepare_put_params(
            &versioned_schema(),
            json!("a-1"),
            Some(json!("v999")),
            record(),
            now(),
        )
        .unwrap();

        assert_eq!(params.item["Version"], json!("v999"));
    }

    #[test]
    fn invalid_tag_error_names_the_offending_value() {
        let err = prepare_put_params(
            &versioned_schema(),
            json!("a-1"),
            Some(json!("vA")),
            record(),
            now(),
        )
        .unwrap_err();

        let message = err.to_string();
        assert!(message.contains("vA"));
        assert!(message.contains("v<digits>"));
    }

    #[test]
    fn missing_sort_key_is_named_explicitly_in_the_error() {
        let err =
            prepare_put_params(&versioned_schema(), json!("a-1"), None, record(), now())
                .unwrap_err();

        assert!(err.to_string().contains("'<none>'"));
    }
}
