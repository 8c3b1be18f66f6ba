//! Request descriptors handed to the injected store client.
//!
//! These are the structured parameter shapes the builders in
//! [`operations`](crate::operations) produce: table name, key maps, and
//! placeholder-based expression fragments. Attribute values stay as JSON
//! here; the production client converts them at the SDK boundary.

use serde_json::Value;
use std::collections::HashMap;

/// One stored item: attribute name to JSON value.
pub type Item = serde_json::Map<String, Value>;

/// Which item state a write operation asks the store to return.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReturnValues {
    /// No item state.
    #[default]
    None,
    /// The item state before the write.
    AllOld,
    /// The item state after the write.
    AllNew,
}

/// Single-item addressing shape shared by get and delete.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyParams {
    /// Target table.
    pub table_name: String,
    /// Primary key: exactly the schema's hash/sort attribute names.
    pub key: Item,
}

/// Range-query request shape.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryParams {
    /// Target table.
    pub table_name: String,
    /// Secondary index selector, set only for indexed queries.
    pub index_name: Option<String>,
    /// Key condition: `#pk = :pkv`, optionally extended with the sort term.
    pub key_condition_expression: String,
    /// `#`-placeholder to attribute-name bindings.
    pub expression_attribute_names: HashMap<String, String>,
    /// `:`-placeholder to value bindings.
    pub expression_attribute_values: HashMap<String, Value>,
    /// User-supplied filter expression, attached verbatim.
    pub filter_expression: Option<String>,
}

/// Put request shape produced by create.
#[derive(Debug, Clone, PartialEq)]
pub struct PutParams {
    /// Target table.
    pub table_name: String,
    /// Full item payload, key attributes included.
    pub item: Item,
    /// Requested return-value policy.
    pub return_values: ReturnValues,
}

/// Update request shape.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateParams {
    /// Target table.
    pub table_name: String,
    /// Primary key of the item to update.
    pub key: Item,
    /// `SET ...` update expression.
    pub update_expression: String,
    /// `:`-placeholder to value bindings.
    pub expression_attribute_values: HashMap<String, Value>,
    /// Requested return-value policy.
    pub return_values: ReturnValues,
}

/// User-supplied filter fragment: a condition expression plus the named
/// values it references.
///
/// The expression uses `:name` placeholder tokens; each attribute is bound
/// verbatim under `:<key>`, so two different attributes must use distinct
/// keys.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    /// Filter condition expression, e.g. `Active = :active`.
    pub expression: String,
    /// Named values referenced by the expression.
    pub attributes: Vec<(String, Value)>,
}

impl Filter {
    /// Create a filter with no attribute bindings.
    pub fn new(expression: impl Into<String>) -> Self {
        Self {
            expression: expression.into(),
            attributes: Vec::new(),
        }
    }

    /// Bind a named value referenced by the expression.
    pub fn attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.push((key.into(), value.into()));
        self
    }
}
