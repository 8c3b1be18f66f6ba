//! Type conversions between JSON values and DynamoDB AttributeValue.

use aws_sdk_dynamodb::types::AttributeValue;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde_json::{Number, Value};
use std::collections::HashMap;

use crate::errors::TableError;
use crate::params::Item;

/// Convert a JSON value to a DynamoDB AttributeValue.
///
/// Total: every JSON value has a DynamoDB representation. Numbers go through
/// their decimal string form (DynamoDB `N` values are strings).
pub fn json_to_attribute_value(value: &Value) -> AttributeValue {
    match value {
        Value::Null => AttributeValue::Null(true),
        Value::Bool(b) => AttributeValue::Bool(*b),
        Value::Number(n) => AttributeValue::N(n.to_string()),
        Value::String(s) => AttributeValue::S(s.clone()),
        Value::Array(items) => {
            AttributeValue::L(items.iter().map(json_to_attribute_value).collect())
        }
        Value::Object(map) => AttributeValue::M(
            map.iter()
                .map(|(k, v)| (k.clone(), json_to_attribute_value(v)))
                .collect(),
        ),
    }
}

/// Convert an item (attribute name to JSON value) to the SDK's key/item map.
pub fn item_to_attribute_values(item: &Item) -> HashMap<String, AttributeValue> {
    item.iter()
        .map(|(k, v)| (k.clone(), json_to_attribute_value(v)))
        .collect()
}

/// Convert placeholder value bindings to the SDK's expression value map.
pub fn value_map_to_attribute_values(
    values: &HashMap<String, Value>,
) -> HashMap<String, AttributeValue> {
    values
        .iter()
        .map(|(k, v)| (k.clone(), json_to_attribute_value(v)))
        .collect()
}

/// Convert a DynamoDB AttributeValue back to a JSON value.
///
/// Binary values (`B`, `BS`) come back as base64 strings; string/number sets
/// come back as arrays.
pub fn attribute_value_to_json(value: AttributeValue) -> Result<Value, TableError> {
    match value {
        AttributeValue::S(s) => Ok(Value::String(s)),
        AttributeValue::N(n) => parse_number(&n),
        AttributeValue::Bool(b) => Ok(Value::Bool(b)),
        AttributeValue::Null(_) => Ok(Value::Null),
        AttributeValue::B(b) => Ok(Value::String(BASE64.encode(b.as_ref()))),
        AttributeValue::L(list) => Ok(Value::Array(
            list.into_iter()
                .map(attribute_value_to_json)
                .collect::<Result<Vec<_>, _>>()?,
        )),
        AttributeValue::M(map) => {
            let mut object = Item::new();
            for (k, v) in map {
                object.insert(k, attribute_value_to_json(v)?);
            }
            Ok(Value::Object(object))
        }
        AttributeValue::Ss(ss) => Ok(Value::Array(ss.into_iter().map(Value::String).collect())),
        AttributeValue::Ns(ns) => Ok(Value::Array(
            ns.iter()
                .map(|n| parse_number(n))
                .collect::<Result<Vec<_>, _>>()?,
        )),
        AttributeValue::Bs(bs) => Ok(Value::Array(
            bs.into_iter()
                .map(|b| Value::String(BASE64.encode(b.as_ref())))
                .collect(),
        )),
        other => Err(TableError::Value(format!(
            "unknown DynamoDB attribute value: {other:?}"
        ))),
    }
}

/// Convert the SDK's item map back to a JSON item.
pub fn attribute_values_to_item(
    attrs: HashMap<String, AttributeValue>,
) -> Result<Item, TableError> {
    let mut item = Item::new();
    for (key, value) in attrs {
        item.insert(key, attribute_value_to_json(value)?);
    }
    Ok(item)
}

/// Parse a DynamoDB number string as a JSON number, integer when possible.
fn parse_number(n: &str) -> Result<Value, TableError> {
    if n.contains('.') || n.contains('e') || n.contains('E') {
        let f: f64 = n
            .parse()
            .map_err(|_| TableError::Value(format!("invalid number: {n}")))?;
        Number::from_f64(f)
            .map(Value::Number)
            .ok_or_else(|| TableError::Value(format!("invalid number: {n}")))
    } else if let Ok(i) = n.parse::<i64>() {
        Ok(Value::Number(i.into()))
    } else if let Ok(u) = n.parse::<u64>() {
        Ok(Value::Number(u.into()))
    } else {
        Err(TableError::Value(format!("invalid number: {n}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn json_scalars_map_to_attribute_values() {
        assert_eq!(
            json_to_attribute_value(&json!("hello")),
            AttributeValue::S("hello".to_string())
        );
        assert_eq!(
            json_to_attribute_value(&json!(42)),
            AttributeValue::N("42".to_string())
        );
        assert_eq!(
            json_to_attribute_value(&json!(1.5)),
            AttributeValue::N("1.5".to_string())
        );
        assert_eq!(
            json_to_attribute_value(&json!(true)),
            AttributeValue::Bool(true)
        );
        assert_eq!(
            json_to_attribute_value(&Value::Null),
            AttributeValue::Null(true)
        );
    }

    #[test]
    fn nested_structures_round_trip() {
        let value = json!({
            "Tags": ["a", "b"],
            "Meta": { "Count": 3, "Active": false }
        });
        let attr = json_to_attribute_value(&value);
        assert_eq!(attribute_value_to_json(attr).unwrap(), value);
    }

    #[test]
    fn number_strings_parse_as_integers_when_possible() {
        assert_eq!(parse_number("42").unwrap(), json!(42));
        assert_eq!(parse_number("-7").unwrap(), json!(-7));
        assert_eq!(parse_number("1.25").unwrap(), json!(1.25));
        assert_eq!(parse_number("1e2").unwrap(), json!(100.0));
        assert!(parse_number("not-a-number").is_err());
    }

    #[test]
    fn sets_come_back_as_arrays() {
        let ss = AttributeValue::Ss(vec!["x".to_string(), "y".to_string()]);
        assert_eq!(attribute_value_to_json(ss).unwrap(), json!(["x", "y"]));

        let ns = AttributeValue::Ns(vec!["1".to_string(), "2".to_string()]);
        assert_eq!(attribute_value_to_json(ns).unwrap(), json!([1, 2]));
    }
}
