//! Convenience calls that unwrap the API's `data` envelope.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::client::{ApiClient, RequestOptions};
use crate::config::ApiConfig;
use crate::error::Result;
use crate::types::ModelAvailabilityRow;

/// Outer JSON object carrying the payload under `data`.
///
/// A missing or `null` `data` field means "no results", not an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    /// The payload, if any.
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    /// Wrap a payload.
    pub const fn new(data: T) -> Self {
        Self { data: Some(data) }
    }

    /// An envelope without payload.
    pub const fn empty() -> Self {
        Self { data: None }
    }

    /// Payload of a single-item response; absent stays absent.
    pub fn into_item(self) -> Option<T> {
        self.data
    }
}

impl<T> Envelope<Vec<T>> {
    /// Payload of a list response; absent becomes an empty list.
    pub fn into_items(self) -> Vec<T> {
        self.data.unwrap_or_default()
    }
}

/// List and item calls on top of [`ApiClient`].
#[derive(Debug, Clone)]
pub struct ApiWrapper {
    client: ApiClient,
    availability_path: String,
}

impl ApiWrapper {
    /// Build a wrapper and its client from configuration.
    pub fn new(config: &ApiConfig) -> Result<Self> {
        Ok(Self {
            client: ApiClient::new(config)?,
            availability_path: config.availability_path.clone(),
        })
    }

    /// Wrap an existing client, using the default availability path.
    #[must_use]
    pub fn from_client(client: ApiClient) -> Self {
        Self {
            client,
            availability_path: crate::config::DEFAULT_AVAILABILITY_PATH.to_string(),
        }
    }

    /// Underlying client.
    #[must_use]
    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// Fetch a list; an empty or `null` body, or one without `data`, yields an empty list.
    ///
    /// Transport and status failures are returned unchanged.
    pub async fn get_items<T: DeserializeOwned>(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<Vec<T>> {
        let envelope: Option<Envelope<Vec<T>>> = self.client.fetch(path, options).await?;
        Ok(envelope.map(Envelope::into_items).unwrap_or_default())
    }

    /// Fetch one item at `path` followed directly by `id`.
    ///
    /// An empty or `null` body, or one without `data`, yields `None`.
    pub async fn get_item<T: DeserializeOwned>(
        &self,
        path: &str,
        id: impl fmt::Display,
        options: RequestOptions,
    ) -> Result<Option<T>> {
        let item_path = format!("{path}{id}");
        let envelope: Option<Envelope<T>> = self.client.fetch(&item_path, options).await?;
        Ok(envelope.and_then(Envelope::into_item))
    }

    /// Fetch every monitored model/provider row.
    ///
    /// Rows whose sample views are misaligned are dropped with a warning.
    pub async fn model_availability(&self) -> Result<Vec<ModelAvailabilityRow>> {
        let rows: Vec<ModelAvailabilityRow> = self
            .get_items(&self.availability_path, RequestOptions::default())
            .await?;
        let total = rows.len();

        let rows: Vec<_> = rows
            .into_iter()
            .filter(|row| match row.validate() {
                Ok(()) => true,
                Err(e) => {
                    warn!(model = %row.model, provider = %row.provider, error = %e, "dropping row");
                    false
                }
            })
            .collect();

        debug!(total, kept = rows.len(), "model availability fetched");
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_missing_data_field() {
        let items: Envelope<Vec<u32>> = serde_json::from_str("{}").unwrap();
        assert!(items.into_items().is_empty());

        let item: Envelope<u32> = serde_json::from_str("{}").unwrap();
        assert_eq!(item.into_item(), None);
    }

    #[test]
    fn test_envelope_null_data_field() {
        let items: Envelope<Vec<u32>> = serde_json::from_str(r#"{"data": null}"#).unwrap();
        assert_eq!(items.into_items(), Vec::<u32>::new());
    }

    #[test]
    fn test_envelope_with_payload() {
        let items: Envelope<Vec<u32>> =
            serde_json::from_str(r#"{"data": [1, 2, 3], "meta": {}}"#).unwrap();
        assert_eq!(items.into_items(), vec![1, 2, 3]);

        assert_eq!(Envelope::new(7).into_item(), Some(7));
        assert_eq!(Envelope::<u8>::empty().into_item(), None);
    }

    #[test]
    fn test_wrapper_uses_configured_path() {
        let config = ApiConfig::new("http://localhost:8080").with_availability_path("v2/models");
        let wrapper = ApiWrapper::new(&config).unwrap();

        assert_eq!(wrapper.availability_path, "v2/models");
        assert_eq!(wrapper.client().base_url(), "http://localhost:8080");
    }
}
