//! # Product Repository
//!
//! CRUD for the global product catalog.
//!
//! ## Rules
//! - `price`, `cost` must be non-negative and finite; `stock >= 0`.
//! - A product past its `expiry_date` is deactivated; reads surface the
//!   flip without waiting for a mutation.
//! - Deleting a product cascades its inventory rows. Sales that reference
//!   it are left untouched: sales are an immutable audit log, and a
//!   dangling product id in an old sale is the recorded history, not a
//!   consistency bug.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{StoreError, StoreResult};
use crate::ledger::LedgerInner;
use crate::persistence::Collection;
use ledger_core::{
    validation::{
        validate_amount, validate_category, validate_product_name, validate_sku, validate_stock,
    },
    Product,
};

/// Input for [`ProductRepository::create`]. The ledger assigns `id`.
#[derive(Debug, Clone)]
pub struct ProductDraft {
    pub name: String,
    pub sku: String,
    pub category: String,
    pub price: f64,
    pub cost: f64,
    pub description: Option<String>,
    pub image: Option<String>,
    pub expiry_date: Option<DateTime<Utc>>,
    pub stock: i64,
}

/// Partial update for [`ProductRepository::update`].
#[derive(Debug, Clone, Default)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub sku: Option<String>,
    pub category: Option<String>,
    pub price: Option<f64>,
    pub cost: Option<f64>,
    pub description: Option<Option<String>>,
    pub image: Option<Option<String>>,
    pub is_active: Option<bool>,
    pub expiry_date: Option<Option<DateTime<Utc>>>,
    pub stock: Option<i64>,
}

/// Repository for product operations.
#[derive(Clone)]
pub struct ProductRepository {
    inner: Arc<LedgerInner>,
}

impl ProductRepository {
    pub(crate) fn new(inner: Arc<LedgerInner>) -> Self {
        ProductRepository { inner }
    }

    /// Creates a product.
    ///
    /// `is_active` starts true unless the draft is already expired.
    pub async fn create(&self, draft: ProductDraft) -> StoreResult<Product> {
        validate_product_name(&draft.name)?;
        validate_sku(&draft.sku)?;
        validate_category(&draft.category)?;
        validate_amount("price", draft.price)?;
        validate_amount("cost", draft.cost)?;
        validate_stock(draft.stock)?;

        let mut product = Product {
            id: Uuid::new_v4().to_string(),
            name: draft.name,
            sku: draft.sku,
            category: draft.category,
            price: draft.price,
            cost: draft.cost,
            description: draft.description,
            image: draft.image,
            is_active: true,
            expiry_date: draft.expiry_date,
            stock: draft.stock,
        };
        product.refresh_active(Utc::now());

        debug!(product_id = %product.id, sku = %product.sku, "Creating product");

        let mut state = self.inner.state.lock().await;
        state.products.push(product.clone());
        self.inner.flush(&state, &[Collection::Products])?;

        Ok(product)
    }

    /// Applies a partial update to a product.
    ///
    /// The expiry flip is re-evaluated after the patch, so setting an
    /// already-past `expiry_date` deactivates the product immediately even
    /// if the patch also set `is_active: true`.
    pub async fn update(&self, id: &str, patch: ProductPatch) -> StoreResult<Product> {
        if let Some(name) = &patch.name {
            validate_product_name(name)?;
        }
        if let Some(sku) = &patch.sku {
            validate_sku(sku)?;
        }
        if let Some(category) = &patch.category {
            validate_category(category)?;
        }
        if let Some(price) = patch.price {
            validate_amount("price", price)?;
        }
        if let Some(cost) = patch.cost {
            validate_amount("cost", cost)?;
        }
        if let Some(stock) = patch.stock {
            validate_stock(stock)?;
        }

        let mut state = self.inner.state.lock().await;

        let product = state
            .products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| StoreError::not_found("Product", id))?;

        if let Some(name) = patch.name {
            product.name = name;
        }
        if let Some(sku) = patch.sku {
            product.sku = sku;
        }
        if let Some(category) = patch.category {
            product.category = category;
        }
        if let Some(price) = patch.price {
            product.price = price;
        }
        if let Some(cost) = patch.cost {
            product.cost = cost;
        }
        if let Some(description) = patch.description {
            product.description = description;
        }
        if let Some(image) = patch.image {
            product.image = image;
        }
        if let Some(is_active) = patch.is_active {
            product.is_active = is_active;
        }
        if let Some(expiry_date) = patch.expiry_date {
            product.expiry_date = expiry_date;
        }
        if let Some(stock) = patch.stock {
            product.stock = stock;
        }
        product.refresh_active(Utc::now());
        let updated = product.clone();

        debug!(product_id = %id, "Updated product");

        self.inner.flush(&state, &[Collection::Products])?;

        Ok(updated)
    }

    /// Deletes a product, cascading its inventory rows.
    ///
    /// Sales referencing the product are kept as-is; a `warn!` notes how
    /// many now carry a dangling product id.
    pub async fn delete(&self, id: &str) -> StoreResult<bool> {
        let mut state = self.inner.state.lock().await;

        let Some(index) = state.products.iter().position(|p| p.id == id) else {
            return Ok(false);
        };

        let referencing_sales = state
            .sales
            .iter()
            .filter(|s| s.items.iter().any(|i| i.product_id == id))
            .count();
        if referencing_sales > 0 {
            warn!(
                product_id = %id,
                sales = referencing_sales,
                "Deleting product still referenced by recorded sales"
            );
        }

        let removed = state.products.remove(index);
        state.inventory.retain(|e| e.product_id != id);

        info!(product_id = %id, sku = %removed.sku, "Deleted product");

        self.inner
            .flush(&state, &[Collection::Products, Collection::Inventory])?;

        Ok(true)
    }

    /// Looks up a product by id, surfacing the expiry flip.
    pub async fn get(&self, id: &str) -> StoreResult<Option<Product>> {
        let now = Utc::now();
        let mut state = self.inner.state.lock().await;
        Ok(state.products.iter_mut().find(|p| p.id == id).map(|p| {
            p.refresh_active(now);
            p.clone()
        }))
    }

    /// All products, in insertion order, with expiry flips applied.
    pub async fn list(&self) -> StoreResult<Vec<Product>> {
        let now = Utc::now();
        let mut state = self.inner.state.lock().await;
        for product in &mut state.products {
            product.refresh_active(now);
        }
        Ok(state.products.clone())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::Ledger;
    use crate::persistence::{LedgerStore, StoreConfig};
    use chrono::Duration;

    async fn empty_ledger() -> Ledger {
        let store =
            LedgerStore::open_in_memory_with(StoreConfig::new(":memory:").seed_on_empty(false))
                .unwrap();
        Ledger::open(store).await.unwrap()
    }

    async fn seeded_ledger() -> Ledger {
        let store = LedgerStore::open_in_memory().unwrap();
        Ledger::open(store).await.unwrap()
    }

    fn draft(name: &str, sku: &str) -> ProductDraft {
        ProductDraft {
            name: name.to_string(),
            sku: sku.to_string(),
            category: "Dairy".to_string(),
            price: 4.99,
            cost: 3.50,
            description: None,
            image: None,
            expiry_date: None,
            stock: 10,
        }
    }

    #[tokio::test]
    async fn test_create_starts_active() {
        let ledger = empty_ledger().await;
        let product = ledger
            .products()
            .create(draft("Organic Milk", "OM001"))
            .await
            .unwrap();
        assert!(product.is_active);
        assert_eq!(product.stock, 10);
    }

    #[tokio::test]
    async fn test_create_with_past_expiry_starts_inactive() {
        let ledger = empty_ledger().await;
        let mut d = draft("Old Milk", "OM002");
        d.expiry_date = Some(Utc::now() - Duration::days(1));

        let product = ledger.products().create(d).await.unwrap();
        assert!(!product.is_active);
    }

    #[tokio::test]
    async fn test_create_rejects_negative_price() {
        let ledger = empty_ledger().await;
        let mut d = draft("Organic Milk", "OM001");
        d.price = -1.0;

        let err = ledger.products().create(d).await.unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
        assert!(ledger.products().list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_reapplies_expiry_flip() {
        let ledger = empty_ledger().await;
        let product = ledger
            .products()
            .create(draft("Organic Milk", "OM001"))
            .await
            .unwrap();

        // Force-reactivating an expired product must not stick.
        let updated = ledger
            .products()
            .update(
                &product.id,
                ProductPatch {
                    is_active: Some(true),
                    expiry_date: Some(Some(Utc::now() - Duration::hours(1))),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(!updated.is_active);
    }

    #[tokio::test]
    async fn test_list_surfaces_expiry_flip() {
        let ledger = empty_ledger().await;
        let product = ledger
            .products()
            .create(draft("Organic Milk", "OM001"))
            .await
            .unwrap();
        // Expire it behind the read path's back.
        ledger
            .products()
            .update(
                &product.id,
                ProductPatch {
                    expiry_date: Some(Some(Utc::now() - Duration::minutes(5))),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let listed = ledger.products().list().await.unwrap();
        assert!(!listed[0].is_active);

        let fetched = ledger.products().get(&product.id).await.unwrap().unwrap();
        assert!(!fetched.is_active);
    }

    #[tokio::test]
    async fn test_delete_cascades_inventory_but_keeps_sales() {
        let ledger = seeded_ledger().await;

        // prod1 appears in seeded inventory (3 rows) and a seeded sale.
        assert!(ledger.products().delete("prod1").await.unwrap());

        assert!(ledger
            .inventory()
            .list_for_product("prod1")
            .await
            .unwrap()
            .is_empty());

        // The sale survives with its original line item intact.
        let sale = ledger.sales().get("INV-202403-001").await.unwrap().unwrap();
        assert!(sale.items.iter().any(|i| i.product_id == "prod1"));
    }

    #[tokio::test]
    async fn test_delete_unknown_returns_false() {
        let ledger = empty_ledger().await;
        assert!(!ledger.products().delete("nope").await.unwrap());
    }
}
