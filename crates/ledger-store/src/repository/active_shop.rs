//! # Active Shop Selector
//!
//! The host UI's "which shop am I looking at" pointer. Pure pointer
//! semantics: the id is not checked against live shops and survives the
//! shop's deletion, so a host restoring a stale pointer gets its last
//! selection back and decides for itself what to do with it.

use std::sync::Arc;

use tracing::debug;

use crate::error::StoreResult;
use crate::ledger::LedgerInner;
use crate::persistence::Collection;

/// Accessor for the persisted active-shop pointer.
#[derive(Clone)]
pub struct ActiveShopSelector {
    inner: Arc<LedgerInner>,
}

impl ActiveShopSelector {
    pub(crate) fn new(inner: Arc<LedgerInner>) -> Self {
        ActiveShopSelector { inner }
    }

    /// Sets the pointer and persists it.
    pub async fn set(&self, shop_id: &str) -> StoreResult<()> {
        let mut state = self.inner.state.lock().await;
        state.active_shop = Some(shop_id.to_string());
        debug!(shop_id, "Set active shop");
        self.inner.flush(&state, &[Collection::ActiveShop])
    }

    /// The current pointer, if any.
    pub async fn get(&self) -> StoreResult<Option<String>> {
        let state = self.inner.state.lock().await;
        Ok(state.active_shop.clone())
    }

    /// Clears the pointer (the stored entry is removed, not nulled).
    pub async fn clear(&self) -> StoreResult<()> {
        let mut state = self.inner.state.lock().await;
        state.active_shop = None;
        debug!("Cleared active shop");
        self.inner.flush(&state, &[Collection::ActiveShop])
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
