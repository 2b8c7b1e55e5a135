//! # Inventory Repository
//!
//! Per-shop stock levels, keyed by `(shop_id, product_id)`.
//!
//! ## Rules
//! - One entry per shop/product pair; upsert is last-write-wins on
//!   `quantity`, never additive.
//! - A first upsert creates the entry lazily with the default minimum
//!   stock level.
//! - Quantities are clamped at a floor of 0.
//! - Referential checks are the caller's job: an upsert against an unknown
//!   shop or product id is accepted.

use std::sync::Arc;

use chrono::Utc;
use tracing::debug;

use crate::error::StoreResult;
use crate::ledger::LedgerInner;
use crate::persistence::Collection;
use ledger_core::{InventoryEntry, DEFAULT_MIN_STOCK_LEVEL};

/// Repository for per-shop inventory operations.
#[derive(Clone)]
pub struct InventoryRepository {
    inner: Arc<LedgerInner>,
}

impl InventoryRepository {
    pub(crate) fn new(inner: Arc<LedgerInner>) -> Self {
        InventoryRepository { inner }
    }

    /// Sets the stock level for a shop/product pair.
    ///
    /// Creates the entry if absent (with `min_stock_level = 5`), otherwise
    /// replaces `quantity` outright and refreshes `last_updated`. Negative
    /// quantities are clamped to 0.
    pub async fn upsert(
        &self,
        shop_id: &str,
        product_id: &str,
        quantity: i64,
    ) -> StoreResult<InventoryEntry> {
        let quantity = quantity.max(0);
        let now = Utc::now();

        let mut state = self.inner.state.lock().await;

        let position = state
            .inventory
            .iter()
            .position(|e| e.shop_id == shop_id && e.product_id == product_id);

        let entry = match position {
            Some(index) => {
                let existing = &mut state.inventory[index];
                existing.quantity = quantity;
                existing.last_updated = now;
                existing.clone()
            }
            None => {
                let entry = InventoryEntry {
                    shop_id: shop_id.to_string(),
                    product_id: product_id.to_string(),
                    quantity,
                    min_stock_level: DEFAULT_MIN_STOCK_LEVEL,
                    last_updated: now,
                };
                state.inventory.push(entry.clone());
                entry
            }
        };

        debug!(shop_id, product_id, quantity, "Upserted inventory entry");

        self.inner.flush(&state, &[Collection::Inventory])?;

        Ok(entry)
    }

    /// Removes a shop/product entry. `Ok(false)` if there was none.
    pub async fn remove(&self, shop_id: &str, product_id: &str) -> StoreResult<bool> {
        let mut state = self.inner.state.lock().await;

        let before = state.inventory.len();
        state
            .inventory
            .retain(|e| !(e.shop_id == shop_id && e.product_id == product_id));
        if state.inventory.len() == before {
            return Ok(false);
        }

        debug!(shop_id, product_id, "Removed inventory entry");

        self.inner.flush(&state, &[Collection::Inventory])?;

        Ok(true)
    }

    /// Looks up a single shop/product entry.
    pub async fn get(&self, shop_id: &str, product_id: &str) -> StoreResult<Option<InventoryEntry>> {
        let state = self.inner.state.lock().await;
        Ok(state
            .inventory
            .iter()
            .find(|e| e.shop_id == shop_id && e.product_id == product_id)
            .cloned())
    }

    /// All entries for a shop, in insertion order.
    pub async fn list_for_shop(&self, shop_id: &str) -> StoreResult<Vec<InventoryEntry>> {
        let state = self.inner.state.lock().await;
        Ok(state
            .inventory
            .iter()
            .filter(|e| e.shop_id == shop_id)
            .cloned()
            .collect())
    }

    /// All entries for a product across shops, in insertion order.
    pub async fn list_for_product(&self, product_id: &str) -> StoreResult<Vec<InventoryEntry>> {
        let state = self.inner.state.lock().await;
        Ok(state
            .inventory
            .iter()
            .filter(|e| e.product_id == product_id)
            .cloned()
            .collect())
    }

    /// Entries at or below their minimum stock level (the low-stock
    /// warnings feed).
    pub async fn low_stock(&self, shop_id: &str) -> StoreResult<Vec<InventoryEntry>> {
        let state = self.inner.state.lock().await;
        Ok(state
            .inventory
            .iter()
            .filter(|e| e.shop_id == shop_id && e.is_low())
            .cloned()
            .collect())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
