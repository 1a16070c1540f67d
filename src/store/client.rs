use super::{ListingStore, PhotoRow, PriceRow};
use crate::models::{ListingKind, PriceRange};
use crate::{Error, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use uuid::Uuid;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Thin client for the marketplace backend's REST surface.
///
/// Filters are expressed as PostgREST-style query parameters; the
/// service key is sent on every request, so the backend's row-level
/// security treats the sweeps as privileged operations.
pub struct RestStore {
    client: Client,
    base_url: String,
    service_key: String,
    timeout: Duration,
}

#[derive(Debug, Deserialize)]
struct PhotoRowWire {
    id: Uuid,
    photo_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PriceRowWire {
    id: Uuid,
    price: Option<String>,
}

impl RestStore {
    pub fn new(base_url: String, service_key: String) -> Self {
        Self::new_with_client(base_url, service_key, Client::new())
    }

    pub fn new_with_client(base_url: String, service_key: String, client: Client) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            service_key,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    fn table_url(&self, kind: ListingKind) -> String {
        format!("{}/rest/v1/{}", self.base_url, kind.table())
    }

    async fn check_status(response: reqwest::Response, table: &str) -> Result<reqwest::Response> {
        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!(
                "Marketplace API error on {} (status {}): {}",
                table,
                status,
                error_text
            );
            return Err(Error::Store(format!(
                "{} request failed (status {}): {}",
                table, status, error_text
            )));
        }
        Ok(response)
    }

    async fn fetch_rows<T: serde::de::DeserializeOwned>(
        &self,
        kind: ListingKind,
        query: &[(&str, String)],
    ) -> Result<Vec<T>> {
        let response = self
            .client
            .get(self.table_url(kind))
            .timeout(self.timeout)
            .header("apikey", &self.service_key)
            .header("Authorization", format!("Bearer {}", self.service_key))
            .query(query)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to reach marketplace API: {}", e);
                e
            })?;

        let response = Self::check_status(response, kind.table()).await?;
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            tracing::error!("Failed to parse {} rows: {}\nBody: {}", kind.table(), e, body);
            Error::Store(format!("Failed to parse {} rows: {}", kind.table(), e))
        })
    }

    async fn patch_row(
        &self,
        kind: ListingKind,
        id: Uuid,
        body: serde_json::Value,
    ) -> Result<()> {
        let response = self
            .client
            .patch(self.table_url(kind))
            .timeout(self.timeout)
            .header("apikey", &self.service_key)
            .header("Authorization", format!("Bearer {}", self.service_key))
            .header("Prefer", "return=minimal")
            .query(&[("id", format!("eq.{}", id))])
            .json(&body)
            .send()
            .await?;

        Self::check_status(response, kind.table()).await?;
        Ok(())
    }
}

#[async_trait]
impl ListingStore for RestStore {
    async fn fetch_unoptimized_photos(
        &self,
        kind: ListingKind,
        limit: usize,
    ) -> Result<Vec<PhotoRow>> {
        let query = [
            ("select", "id,photo_url".to_string()),
            ("photo_url", "not.is.null".to_string()),
            ("photo_url", "not.like.data:image/webp*".to_string()),
            ("limit", limit.to_string()),
        ];

        let rows: Vec<PhotoRowWire> = self.fetch_rows(kind, &query).await?;
        Ok(rows
            .into_iter()
            .filter_map(|row| {
                row.photo_url.map(|photo_url| PhotoRow {
                    id: row.id,
                    photo_url,
                })
            })
            .collect())
    }

    async fn update_photo(&self, kind: ListingKind, id: Uuid, data_url: &str) -> Result<()> {
        self.patch_row(kind, id, serde_json::json!({ "photo_url": data_url }))
            .await
    }

    async fn fetch_legacy_prices(
        &self,
        kind: ListingKind,
        limit: usize,
    ) -> Result<Vec<PriceRow>> {
        let query = [
            ("select", "id,price".to_string()),
            ("price", "not.is.null".to_string()),
            ("price_min", "is.null".to_string()),
            ("limit", limit.to_string()),
        ];

        let rows: Vec<PriceRowWire> = self.fetch_rows(kind, &query).await?;
        Ok(rows
            .into_iter()
            .filter_map(|row| row.price.map(|price| PriceRow { id: row.id, price }))
            .collect())
    }

    async fn update_price(&self, kind: ListingKind, id: Uuid, range: PriceRange) -> Result<()> {
        self.patch_row(
            kind,
            id,
            serde_json::json!({ "price_min": range.min, "price_max": range.max }),
        )
        .await
    }
}
