//! Marketplace data access
//!
//! Every read and write goes through the [`ListingStore`] trait so the
//! batch sweeps can run against the hosted REST backend in production
//! and an in-memory store in tests.

pub mod client;
pub mod mock;

pub use client::RestStore;
pub use mock::MockStore;

use crate::models::{ListingKind, PriceRange};
use crate::Result;
use async_trait::async_trait;
use uuid::Uuid;

/// One listing row's inline photo column.
#[derive(Debug, Clone)]
pub struct PhotoRow {
    pub id: Uuid,
    pub photo_url: String,
}

/// One listing row still carrying a free-text price.
#[derive(Debug, Clone)]
pub struct PriceRow {
    pub id: Uuid,
    pub price: String,
}

#[async_trait]
pub trait ListingStore: Send + Sync {
    /// Up to `limit` rows whose photo is present and not yet a WebP
    /// data URL.
    async fn fetch_unoptimized_photos(
        &self,
        kind: ListingKind,
        limit: usize,
    ) -> Result<Vec<PhotoRow>>;

    async fn update_photo(&self, kind: ListingKind, id: Uuid, data_url: &str) -> Result<()>;

    /// Up to `limit` rows with a legacy price string and no structured
    /// range yet.
    async fn fetch_legacy_prices(&self, kind: ListingKind, limit: usize)
        -> Result<Vec<PriceRow>>;

    async fn update_price(&self, kind: ListingKind, id: Uuid, range: PriceRange) -> Result<()>;
}
