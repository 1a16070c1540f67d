use super::{ListingStore, PhotoRow, PriceRow};
use crate::models::{ListingKind, PriceRange};
use crate::Result;
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

#[derive(Debug, Clone, Default)]
struct MockRow {
    photo_url: Option<String>,
    price: Option<String>,
    price_range: Option<PriceRange>,
}

/// In-memory stand-in for the marketplace backend, applying the same
/// row filters as the REST queries.
#[derive(Clone, Default)]
pub struct MockStore {
    rows: Arc<Mutex<HashMap<ListingKind, BTreeMap<Uuid, MockRow>>>>,
    fetch_count: Arc<Mutex<usize>>,
    update_count: Arc<Mutex<usize>>,
    fail_updates: Arc<Mutex<bool>>,
}

impl MockStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_photo(self, kind: ListingKind, id: Uuid, photo_url: &str) -> Self {
        self.rows
            .lock()
            .unwrap()
            .entry(kind)
            .or_default()
            .entry(id)
            .or_default()
            .photo_url = Some(photo_url.to_string());
        self
    }

    pub fn with_price(self, kind: ListingKind, id: Uuid, price: &str) -> Self {
        self.rows
            .lock()
            .unwrap()
            .entry(kind)
            .or_default()
            .entry(id)
            .or_default()
            .price = Some(price.to_string());
        self
    }

    pub fn with_failing_updates(self, fail: bool) -> Self {
        *self.fail_updates.lock().unwrap() = fail;
        self
    }

    pub fn photo(&self, kind: ListingKind, id: Uuid) -> Option<String> {
        self.rows
            .lock()
            .unwrap()
            .get(&kind)
            .and_then(|table| table.get(&id))
            .and_then(|row| row.photo_url.clone())
    }

    pub fn price_range(&self, kind: ListingKind, id: Uuid) -> Option<PriceRange> {
        self.rows
            .lock()
            .unwrap()
            .get(&kind)
            .and_then(|table| table.get(&id))
            .and_then(|row| row.price_range)
    }

    pub fn get_fetch_count(&self) -> usize {
        *self.fetch_count.lock().unwrap()
    }

    pub fn get_update_count(&self) -> usize {
        *self.update_count.lock().unwrap()
    }

    fn check_update(&self) -> Result<()> {
        if *self.fail_updates.lock().unwrap() {
            return Err(crate::Error::Store("Mock update failure".to_string()));
        }
        *self.update_count.lock().unwrap() += 1;
        Ok(())
    }
}

#[async_trait]
impl ListingStore for MockStore {
    async fn fetch_unoptimized_photos(
        &self,
        kind: ListingKind,
        limit: usize,
    ) -> Result<Vec<PhotoRow>> {
        *self.fetch_count.lock().unwrap() += 1;

        let rows = self.rows.lock().unwrap();
        let table = match rows.get(&kind) {
            Some(table) => table,
            None => return Ok(Vec::new()),
        };

        Ok(table
            .iter()
            .filter_map(|(id, row)| {
                row.photo_url.as_ref().and_then(|url| {
                    if url.starts_with("data:image/webp") {
                        None
                    } else {
                        Some(PhotoRow {
                            id: *id,
                            photo_url: url.clone(),
                        })
                    }
                })
            })
            .take(limit)
            .collect())
    }

    async fn update_photo(&self, kind: ListingKind, id: Uuid, data_url: &str) -> Result<()> {
        self.check_update()?;

        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .get_mut(&kind)
            .and_then(|table| table.get_mut(&id))
            .ok_or_else(|| crate::Error::Store(format!("Row not found: {}", id)))?;
        row.photo_url = Some(data_url.to_string());
        Ok(())
    }

    async fn fetch_legacy_prices(
        &self,
        kind: ListingKind,
        limit: usize,
    ) -> Result<Vec<PriceRow>> {
        *self.fetch_count.lock().unwrap() += 1;

        let rows = self.rows.lock().unwrap();
        let table = match rows.get(&kind) {
            Some(table) => table,
            None => return Ok(Vec::new()),
        };

        Ok(table
            .iter()
            .filter(|(_, row)| row.price_range.is_none())
            .filter_map(|(id, row)| {
                row.price.as_ref().map(|price| PriceRow {
                    id: *id,
                    price: price.clone(),
                })
            })
            .take(limit)
            .collect())
    }

    async fn update_price(&self, kind: ListingKind, id: Uuid, range: PriceRange) -> Result<()> {
        self.check_update()?;

        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .get_mut(&kind)
            .and_then(|table| table.get_mut(&id))
            .ok_or_else(|| crate::Error::Store(format!("Row not found: {}", id)))?;
        row.price_range = Some(range);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_store_filters_webp_rows() {
        let pending = Uuid::new_v4();
        let done = Uuid::new_v4();
        let store = MockStore::new()
            .with_photo(ListingKind::Product, pending, "data:image/png;base64,AAAA")
            .with_photo(ListingKind::Product, done, "data:image/webp;base64,BBBB");

        let rows = store
            .fetch_unoptimized_photos(ListingKind::Product, 10)
            .await
            .unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, pending);
        assert_eq!(store.get_fetch_count(), 1);
    }

    #[tokio::test]
    async fn test_mock_store_respects_limit() {
        let mut store = MockStore::new();
        for _ in 0..5 {
            store = store.with_photo(
                ListingKind::House,
                Uuid::new_v4(),
                "data:image/jpeg;base64,AAAA",
            );
        }

        let rows = store
            .fetch_unoptimized_photos(ListingKind::House, 3)
            .await
            .unwrap();
        assert_eq!(rows.len(), 3);
    }

    #[tokio::test]
    async fn test_mock_store_update_round_trip() {
        let id = Uuid::new_v4();
        let store = MockStore::new().with_photo(
            ListingKind::Service,
            id,
            "data:image/png;base64,AAAA",
        );

        store
            .update_photo(ListingKind::Service, id, "data:image/webp;base64,BBBB")
            .await
            .unwrap();

        assert_eq!(
            store.photo(ListingKind::Service, id).unwrap(),
            "data:image/webp;base64,BBBB"
        );
        assert_eq!(store.get_update_count(), 1);

        // The row no longer matches the unoptimized filter.
        let rows = store
            .fetch_unoptimized_photos(ListingKind::Service, 10)
            .await
            .unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn test_mock_store_price_migration_filter() {
        let id = Uuid::new_v4();
        let store = MockStore::new().with_price(ListingKind::House, id, "KSh 5000-7000");

        let rows = store
            .fetch_legacy_prices(ListingKind::House, 10)
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);

        let range = PriceRange::new(5000.0, 7000.0).unwrap();
        store
            .update_price(ListingKind::House, id, range)
            .await
            .unwrap();

        assert_eq!(store.price_range(ListingKind::House, id), Some(range));
        let rows = store
            .fetch_legacy_prices(ListingKind::House, 10)
            .await
            .unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn test_mock_store_failing_updates() {
        let id = Uuid::new_v4();
        let store = MockStore::new()
            .with_photo(ListingKind::Product, id, "data:image/png;base64,AAAA")
            .with_failing_updates(true);

        let result = store
            .update_photo(ListingKind::Product, id, "data:image/webp;base64,BBBB")
            .await;
        assert!(result.is_err());
        assert_eq!(store.get_update_count(), 0);
    }
}
