//! # Shop Repository
//!
//! CRUD for shops, plus the cascade rules that keep the rest of the ledger
//! consistent when a shop goes away.
//!
//! ## Rules
//! - `name` is unique case-insensitively; `store_number` is unique too.
//! - A shop with recorded sales cannot be deleted (sales are an audit log).
//! - Deleting a shop removes its inventory rows and purges its user
//!   accounts through the injected [`UserDirectory`](crate::UserDirectory).

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{StoreError, StoreResult};
use crate::ledger::LedgerInner;
use crate::persistence::Collection;
use ledger_core::{
    validation::{validate_address, validate_shop_name, validate_store_number},
    Shop, ValidationError,
};

/// Input for [`ShopRepository::create`]. The ledger assigns `id` and
/// `created_at`.
#[derive(Debug, Clone)]
pub struct ShopDraft {
    pub name: String,
    pub store_number: String,
    pub address: String,
    pub manager_id: Option<String>,
    pub super_admin_id: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

/// Partial update for [`ShopRepository::update`]. `None` fields are left
/// unchanged; optional shop fields are patched with a nested `Option`
/// (`Some(None)` clears the field).
#[derive(Debug, Clone, Default)]
pub struct ShopPatch {
    pub name: Option<String>,
    pub store_number: Option<String>,
    pub address: Option<String>,
    pub manager_id: Option<Option<String>>,
    pub super_admin_id: Option<Option<String>>,
    pub phone: Option<Option<String>>,
    pub email: Option<Option<String>>,
}

/// Repository for shop operations.
#[derive(Clone)]
pub struct ShopRepository {
    inner: Arc<LedgerInner>,
}

impl ShopRepository {
    pub(crate) fn new(inner: Arc<LedgerInner>) -> Self {
        ShopRepository { inner }
    }

    /// Creates a shop.
    ///
    /// ## Rules
    /// - `name`, `store_number`, `address` must be non-empty.
    /// - `name` must not collide with an existing shop, ignoring case.
    /// - `store_number` must not collide with an existing shop.
    ///
    /// On violation nothing is written.
    pub async fn create(&self, draft: ShopDraft) -> StoreResult<Shop> {
        validate_shop_name(&draft.name)?;
        validate_store_number(&draft.store_number)?;
        validate_address(&draft.address)?;

        let mut state = self.inner.state.lock().await;

        check_uniqueness(&state.shops, &draft.name, &draft.store_number, None)?;

        let shop = Shop {
            id: Uuid::new_v4().to_string(),
            name: draft.name,
            store_number: draft.store_number,
            address: draft.address,
            manager_id: draft.manager_id,
            super_admin_id: draft.super_admin_id,
            phone: draft.phone,
            email: draft.email,
            created_at: Utc::now(),
        };

        debug!(shop_id = %shop.id, name = %shop.name, "Creating shop");

        state.shops.push(shop.clone());
        self.inner.flush(&state, &[Collection::Shops])?;

        Ok(shop)
    }

    /// Applies a partial update to a shop.
    ///
    /// Uniqueness checks exclude the shop itself, so re-submitting a shop's
    /// own name is not a collision.
    pub async fn update(&self, id: &str, patch: ShopPatch) -> StoreResult<Shop> {
        if let Some(name) = &patch.name {
            validate_shop_name(name)?;
        }
        if let Some(store_number) = &patch.store_number {
            validate_store_number(store_number)?;
        }
        if let Some(address) = &patch.address {
            validate_address(address)?;
        }

        let mut state = self.inner.state.lock().await;

        let index = state
            .shops
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| StoreError::not_found("Shop", id))?;

        let name = patch
            .name
            .as_deref()
            .unwrap_or_else(|| state.shops[index].name.as_str());
        let store_number = patch
            .store_number
            .as_deref()
            .unwrap_or_else(|| state.shops[index].store_number.as_str());
        check_uniqueness(&state.shops, name, store_number, Some(id))?;

        let shop = &mut state.shops[index];
        if let Some(name) = patch.name {
            shop.name = name;
        }
        if let Some(store_number) = patch.store_number {
            shop.store_number = store_number;
        }
        if let Some(address) = patch.address {
            shop.address = address;
        }
        if let Some(manager_id) = patch.manager_id {
            shop.manager_id = manager_id;
        }
        if let Some(super_admin_id) = patch.super_admin_id {
            shop.super_admin_id = super_admin_id;
        }
        if let Some(phone) = patch.phone {
            shop.phone = phone;
        }
        if let Some(email) = patch.email {
            shop.email = email;
        }
        let updated = shop.clone();

        debug!(shop_id = %id, "Updated shop");

        self.inner.flush(&state, &[Collection::Shops])?;

        Ok(updated)
    }

    /// Deletes a shop and everything that hangs off it.
    ///
    /// ## Returns
    /// * `Ok(true)` - shop removed, its inventory rows cascaded, its user
    ///   accounts purged
    /// * `Ok(false)` - no such shop
    /// * `Err(Conflict)` - the shop has recorded sales; nothing changed
    pub async fn delete(&self, id: &str) -> StoreResult<bool> {
        let mut state = self.inner.state.lock().await;

        let Some(index) = state.shops.iter().position(|s| s.id == id) else {
            return Ok(false);
        };

        let sale_count = state.sales.iter().filter(|s| s.shop_id == id).count();
        if sale_count > 0 {
            return Err(StoreError::conflict(format!(
                "Cannot delete shop '{}': {} recorded sale(s) reference it",
                state.shops[index].name, sale_count
            )));
        }

        let removed = state.shops.remove(index);
        state.inventory.retain(|e| e.shop_id != id);
        let purged = self.inner.users.remove_users_by_shop(id);

        info!(
            shop_id = %id,
            name = %removed.name,
            users_purged = purged,
            "Deleted shop"
        );

        self.inner
            .flush(&state, &[Collection::Shops, Collection::Inventory])?;

        Ok(true)
    }

    /// Looks up a shop by id.
    pub async fn get(&self, id: &str) -> StoreResult<Option<Shop>> {
        let state = self.inner.state.lock().await;
        Ok(state.shops.iter().find(|s| s.id == id).cloned())
    }

    /// All shops, in insertion order.
    pub async fn list(&self) -> StoreResult<Vec<Shop>> {
        let state = self.inner.state.lock().await;
        Ok(state.shops.clone())
    }
}

/// Uniqueness of `name` (case-insensitive) and `store_number` against every
/// shop except `exclude_id`.
fn check_uniqueness(
    shops: &[Shop],
    name: &str,
    store_number: &str,
    exclude_id: Option<&str>,
) -> Result<(), ValidationError> {
    let name_lower = name.to_lowercase();
    for shop in shops {
        if exclude_id == Some(shop.id.as_str()) {
            continue;
        }
        if shop.name.to_lowercase() == name_lower {
            return Err(ValidationError::duplicate("name", name));
        }
        if shop.store_number == store_number {
            return Err(ValidationError::duplicate("storeNumber", store_number));
        }
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
