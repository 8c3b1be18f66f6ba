//! Store client boundary.
//!
//! [`StoreClient`] is the injected capability a [`Table`](crate::table::Table)
//! issues requests against. [`DynamoDbStoreClient`] is the production
//! implementation backed by aws-sdk-dynamodb; local development (localstack)
//! is selected through an environment-derived [`EndpointConfig`].

use std::env;
use std::future::Future;

use aws_config::BehaviorVersion;
use aws_config::meta::region::RegionProviderChain;
use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::types::ReturnValue;
use tracing::debug;

use crate::conversions::{
    attribute_values_to_item, item_to_attribute_values, value_map_to_attribute_values,
};
use crate::errors::TableError;
use crate::params::{Item, KeyParams, PutParams, QueryParams, ReturnValues, UpdateParams};

/// Port localstack exposes DynamoDB on.
pub const LOCAL_PORT: u16 = 4566;

/// Environment variable selecting the operating mode.
pub const MODE_VAR: &str = "env";
/// Environment variable naming the local endpoint host.
pub const LOCAL_HOST_VAR: &str = "LOCALSTACK_HOSTNAME";

/// The store capability a table issues requests against.
///
/// Each method accepts one of the request descriptors built by
/// [`operations`](crate::operations) and settles exactly once. Store errors
/// come back as [`TableError::Store`] carrying the implementation's error
/// verbatim.
pub trait StoreClient {
    /// Fetch a single item by primary key.
    fn get_item(
        &self,
        params: KeyParams,
    ) -> impl Future<Output = Result<Option<Item>, TableError>> + Send;

    /// Run a range query.
    fn query(
        &self,
        params: QueryParams,
    ) -> impl Future<Output = Result<Vec<Item>, TableError>> + Send;

    /// Write a full item.
    fn put_item(
        &self,
        params: PutParams,
    ) -> impl Future<Output = Result<Option<Item>, TableError>> + Send;

    /// Apply an update expression to one item.
    fn update_item(
        &self,
        params: UpdateParams,
    ) -> impl Future<Output = Result<Option<Item>, TableError>> + Send;

    /// Delete a single item by primary key.
    fn delete_item(
        &self,
        params: KeyParams,
    ) -> impl Future<Output = Result<Option<Item>, TableError>> + Send;
}

/// Endpoint selection resolved from the process environment.
///
/// Local mode is enabled when the `env` variable equals `"local"`; the host
/// comes from `LOCALSTACK_HOSTNAME`. Resolution never fails: a missing or
/// unreadable variable selects production mode.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EndpointConfig {
    /// True when the local endpoint override applies.
    pub local_mode: bool,
    /// Hostname for the local endpoint.
    pub local_host: Option<String>,
}

impl EndpointConfig {
    /// Resolve from the process environment.
    pub fn from_env() -> Self {
        Self {
            local_mode: env::var(MODE_VAR).map(|v| v == "local").unwrap_or(false),
            local_host: env::var(LOCAL_HOST_VAR).ok(),
        }
    }

    /// Endpoint override URL, present only in local mode.
    pub fn endpoint_url(&self) -> Option<String> {
        if !self.local_mode {
            return None;
        }
        let host = self.local_host.as_deref().unwrap_or("localhost");
        Some(format!("http://{host}:{LOCAL_PORT}"))
    }
}

/// Production store client backed by aws-sdk-dynamodb.
#[derive(Debug, Clone)]
pub struct DynamoDbStoreClient {
    client: Client,
}

impl DynamoDbStoreClient {
    /// Build a client with endpoint selection from the process environment.
    pub async fn from_env() -> Self {
        Self::from_endpoint_config(EndpointConfig::from_env()).await
    }

    /// Build a client from an explicit endpoint configuration.
    ///
    /// Prefer this over [`from_env`](Self::from_env) when the bootstrap layer
    /// owns environment lookup.
    pub async fn from_endpoint_config(config: EndpointConfig) -> Self {
        let region_provider = RegionProviderChain::default_provider().or_else("us-east-1");
        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .region(region_provider)
            .load()
            .await;

        let mut builder = aws_sdk_dynamodb::config::Builder::from(&sdk_config);
        if let Some(url) = config.endpoint_url() {
            debug!(endpoint = %url, "using local endpoint override");
            builder = builder.endpoint_url(url);
        }

        Self {
            client: Client::from_conf(builder.build()),
        }
    }

    /// Wrap an already-configured SDK client.
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

fn sdk_return_values(rv: ReturnValues) -> Option<ReturnValue> {
    match rv {
        ReturnValues::None => None,
        ReturnValues::AllOld => Some(ReturnValue::AllOld),
        ReturnValues::AllNew => Some(ReturnValue::AllNew),
    }
}

impl StoreClient for DynamoDbStoreClient {
    async fn get_item(&self, params: KeyParams) -> Result<Option<Item>, TableError> {
        let output = self
            .client
            .get_item()
            .table_name(&params.table_name)
            .set_key(Some(item_to_attribute_values(&params.key)))
            .send()
            .await
            .map_err(|e| TableError::Store(e.into()))?;

        output.item.map(attribute_values_to_item).transpose()
    }

    async fn query(&self, params: QueryParams) -> Result<Vec<Item>, TableError> {
        let output = self
            .client
            .query()
            .table_name(&params.table_name)
            .set_index_name(params.index_name)
            .key_condition_expression(params.key_condition_expression)
            .set_expression_attribute_names(Some(params.expression_attribute_names))
            .set_expression_attribute_values(Some(value_map_to_attribute_values(
                &params.expression_attribute_values,
            )))
            .set_filter_expression(params.filter_expression)
            .send()
            .await
            .map_err(|e| TableError::Store(e.into()))?;

        output
            .items
            .unwrap_or_default()
            .into_iter()
            .map(attribute_values_to_item)
            .collect()
    }

    async fn put_item(&self, params: PutParams) -> Result<Option<Item>, TableError> {
        let output = self
            .client
            .put_item()
            .table_name(&params.table_name)
            .set_item(Some(item_to_attribute_values(&params.item)))
            .set_return_values(sdk_return_values(params.return_values))
            .send()
            .await
            .map_err(|e| TableError::Store(e.into()))?;

        output.attributes.map(attribute_values_to_item).transpose()
    }

    async fn update_item(&self, params: UpdateParams) -> Result<Option<Item>, TableError> {
        let output = self
            .client
            .update_item()
            .table_name(&params.table_name)
            .set_key(Some(item_to_attribute_values(&params.key)))
            .update_expression(params.update_expression)
            .set_expression_attribute_values(Some(value_map_to_attribute_values(
                &params.expression_attribute_values,
            )))
            .set_return_values(sdk_return_values(params.return_values))
            .send()
            .await
            .map_err(|e| TableError::Store(e.into()))?;

        output.attributes.map(attribute_values_to_item).transpose()
    }

    async fn delete_item(&self, params: KeyParams) -> Result<Option<Item>, TableError> {
        let output = self
            .client
            .delete_item()
            .table_name(&params.table_name)
            .set_key(Some(item_to_attribute_values(&params.key)))
            .send()
            .await
            .map_err(|e| TableError::Store(e.into()))?;

        output.attributes.map(attribute_values_to_item).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_url_only_in_local_mode() {
        let config = EndpointConfig {
            local_mode: true,
            local_host: Some("dynamo.internal".to_string()),
        };
        assert_eq!(
            config.endpoint_url().as_deref(),
            Some("http://dynamo.internal:4566")
        );

        let config = EndpointConfig {
            local_mode: false,
            local_host: Some("dynamo.internal".to_string()),
        };
        assert_eq!(config.endpoint_url(), None);
    }

    #[test]
    fn local_mode_without_host_falls_back_to_localhost() {
        let config = EndpointConfig {
            local_mode: true,
            local_host: None,
        };
        assert_eq!(config.endpoint_url().as_deref(), Some("http://localhost:4566"));
    }

    #[test]
    fn default_config_is_production_mode() {
        assert_eq!(EndpointConfig::default().endpoint_url(), None);
    }
}
