//! # Sale Repository
//!
//! Records sales and the stock movements they cause. Sales are append-only:
//! once recorded they are never updated or deleted, which is what makes
//! them safe to treat as the audit log the shop-deletion rule leans on.
//!
//! ## Invoice Numbers
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                   Invoice Number Derivation                             │
//! │                                                                         │
//! │  record(draft) at 2024-04-02 09:15 UTC                                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  count sales with created_at in 2024-04  →  0                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  id = "INV-202404-001"   (one counter per month, shared by all shops)  │
//! │                                                                         │
//! │  The count runs under the same lock that appends the sale, so two      │
//! │  concurrent callers can never derive the same number.                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use crate::error::StoreResult;
use crate::ledger::LedgerInner;
use crate::persistence::Collection;
use ledger_core::{
    invoice,
    validation::{validate_amount, validate_line_quantity, validate_required_text},
    Sale, SaleItem, SaleStatus, SaleType,
};

/// Input for [`SaleRepository::record`]. The ledger assigns `id`,
/// `created_at`, and `status`.
#[derive(Debug, Clone)]
pub struct SaleDraft {
    pub shop_id: String,
    pub sale_type: SaleType,
    pub items: Vec<SaleItem>,
    pub total: f64,
    pub paid: f64,
    pub balance: f64,
    /// Id of the acting user, from the host's auth layer.
    pub created_by: String,
}

/// Repository for sale operations.
#[derive(Clone)]
pub struct SaleRepository {
    inner: Arc<LedgerInner>,
}

impl SaleRepository {
    pub(crate) fn new(inner: Arc<LedgerInner>) -> Self {
        SaleRepository { inner }
    }

    /// Records a sale.
    ///
    /// ## What This Does
    /// 1. Derives the next invoice number for the current calendar month.
    /// 2. Stamps `created_at = now` and `status = Completed`.
    /// 3. Depletes each line item's product stock globally, floored at 0.
    ///    A line naming an unknown product is kept on the sale but moves no
    ///    stock (logged).
    /// 4. Appends the sale and flushes sales + products in one storage
    ///    transaction.
    ///
    /// The whole sequence runs under the state lock, so invoice numbers
    /// stay gapless and duplicate-free under concurrent callers.
    pub async fn record(&self, draft: SaleDraft) -> StoreResult<Sale> {
        validate_required_text("shopId", &draft.shop_id, 100)?;
        validate_required_text("createdBy", &draft.created_by, 100)?;
        validate_amount("total", draft.total)?;
        validate_amount("paid", draft.paid)?;
        validate_amount("balance", draft.balance)?;
        for item in &draft.items {
            validate_required_text("productId", &item.product_id, 100)?;
            validate_line_quantity(item.quantity)?;
            validate_amount("price", item.price)?;
            validate_amount("total", item.total)?;
        }

        let now = Utc::now();
        let mut state = self.inner.state.lock().await;

        let id = invoice::next_invoice_number(&state.sales, now);

        for item in &draft.items {
            match state.products.iter_mut().find(|p| p.id == item.product_id) {
                Some(product) => {
                    product.stock = (product.stock - item.quantity).max(0);
                }
                None => {
                    warn!(
                        product_id = %item.product_id,
                        sale_id = %id,
                        "Sale line references unknown product, no stock moved"
                    );
                }
            }
        }

        let sale = Sale {
            id,
            shop_id: draft.shop_id,
            sale_type: draft.sale_type,
            items: draft.items,
            total: draft.total,
            paid: draft.paid,
            balance: draft.balance,
            created_by: draft.created_by,
            created_at: now,
            status: SaleStatus::Completed,
        };

        info!(sale_id = %sale.id, shop_id = %sale.shop_id, total = sale.total, "Recorded sale");

        state.sales.push(sale.clone());
        self.inner
            .flush(&state, &[Collection::Sales, Collection::Products])?;

        Ok(sale)
    }

    /// Looks up a sale by invoice number.
    pub async fn get(&self, id: &str) -> StoreResult<Option<Sale>> {
        let state = self.inner.state.lock().await;
        Ok(state.sales.iter().find(|s| s.id == id).cloned())
    }

    /// All sales, in recording order.
    pub async fn list(&self) -> StoreResult<Vec<Sale>> {
        let state = self.inner.state.lock().await;
        Ok(state.sales.clone())
    }

    /// Sales recorded at a given shop.
    pub async fn list_by_shop(&self, shop_id: &str) -> StoreResult<Vec<Sale>> {
        let state = self.inner.state.lock().await;
        Ok(state
            .sales
            .iter()
            .filter(|s| s.shop_id == shop_id)
            .cloned()
            .collect())
    }

    /// Sales of a given type (cash or online).
    pub async fn list_by_type(&self, sale_type: SaleType) -> StoreResult<Vec<Sale>> {
        let state = self.inner.state.lock().await;
        Ok(state
            .sales
            .iter()
            .filter(|s| s.sale_type == sale_type)
            .cloned()
            .collect())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::ledger::Ledger;
    use crate::persistence::{LedgerStore, StoreConfig};
    use chrono::Datelike;

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

    fn line(product_id: &str, quantity: i64, price: f64) -> SaleItem {
        SaleItem {
            product_id: product_id.to_string(),
            quantity,
            price,
            total: price * quantity as f64,
        }
    }

    fn draft(shop_id: &str, items: Vec<SaleItem>) -> SaleDraft {
        let total: f64 = items.iter().map(|i| i.total).sum();
        SaleDraft {
            shop_id: shop_id.to_string(),
            sale_type: SaleType::Cash,
            items,
            total,
            paid: total,
            balance: 0.0,
            created_by: "user1".to_string(),
        }
    }

    #[tokio::test]
    async fn test_record_stamps_id_status_and_timestamp() {
        let ledger = seeded_ledger().await;

        let sale = ledger
            .sales()
            .record(draft("shop1", vec![line("prod1", 2, 4.99)]))
            .await
            .unwrap();

        let now = Utc::now();
        let expected_prefix = format!("INV-{}{:02}-", now.year(), now.month());
        assert!(sale.id.starts_with(&expected_prefix), "got {}", sale.id);
        assert!(sale.id.ends_with("-001"));
        assert_eq!(sale.status, SaleStatus::Completed);
    }

    #[tokio::test]
    async fn test_sequence_increments_within_month_across_shops() {
        let ledger = empty_ledger().await;

        let first = ledger
            .sales()
            .record(draft("shop1", vec![line("p", 1, 1.0)]))
            .await
            .unwrap();
        let second = ledger
            .sales()
            .record(draft("shop2", vec![line("p", 1, 1.0)]))
            .await
            .unwrap();

        // One monthly counter shared by every shop.
        assert!(first.id.ends_with("-001"));
        assert!(second.id.ends_with("-002"));
    }

    #[tokio::test]
    async fn test_record_depletes_global_stock() {
        let ledger = seeded_ledger().await;
        // Seeded prod1 stock is 100.
        ledger
            .sales()
            .record(draft("shop1", vec![line("prod1", 3, 4.99)]))
            .await
            .unwrap();

        let product = ledger.products().get("prod1").await.unwrap().unwrap();
        assert_eq!(product.stock, 97);
    }

    #[tokio::test]
    async fn test_stock_depletion_floors_at_zero() {
        let ledger = seeded_ledger().await;
        // Demand beyond seeded prod5 stock (85).
        ledger
            .sales()
            .record(draft("shop1", vec![line("prod5", 500, 11.99)]))
            .await
            .unwrap();

        let product = ledger.products().get("prod5").await.unwrap().unwrap();
        assert_eq!(product.stock, 0);
    }

    #[tokio::test]
    async fn test_unknown_product_line_is_kept_without_stock_movement() {
        let ledger = seeded_ledger().await;

        let sale = ledger
            .sales()
            .record(draft(
                "shop1",
                vec![line("ghost-product", 2, 1.00), line("prod1", 1, 4.99)],
            ))
            .await
            .unwrap();

        assert_eq!(sale.items.len(), 2);
        let product = ledger.products().get("prod1").await.unwrap().unwrap();
        assert_eq!(product.stock, 99);
    }

    #[tokio::test]
    async fn test_record_rejects_non_positive_line_quantity() {
        let ledger = seeded_ledger().await;

        let err = ledger
            .sales()
            .record(draft("shop1", vec![line("prod1", 0, 4.99)]))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));

        // Nothing recorded, no stock moved.
        assert_eq!(ledger.sales().list().await.unwrap().len(), 3);
        let product = ledger.products().get("prod1").await.unwrap().unwrap();
        assert_eq!(product.stock, 100);
    }

    #[tokio::test]
    async fn test_record_rejects_negative_total() {
        let ledger = seeded_ledger().await;
        let mut d = draft("shop1", vec![line("prod1", 1, 4.99)]);
        d.total = -1.0;

        let err = ledger.sales().record(d).await.unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
    }

    #[tokio::test]
    async fn test_filters_by_shop_and_type() {
        let ledger = seeded_ledger().await;

        let shop1 = ledger.sales().list_by_shop("shop1").await.unwrap();
        assert_eq!(shop1.len(), 1);
        assert_eq!(shop1[0].id, "INV-202403-001");

        let online = ledger.sales().list_by_type(SaleType::Online).await.unwrap();
        assert_eq!(online.len(), 1);
        assert_eq!(online[0].id, "INV-202403-002");
    }

    #[tokio::test]
    async fn test_sale_and_stock_flush_together() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.redb");

        {
            let store = LedgerStore::open(StoreConfig::new(&path)).unwrap();
            let ledger = Ledger::open(store).await.unwrap();
            ledger
                .sales()
                .record(draft("shop1", vec![line("prod1", 10, 4.99)]))
                .await
                .unwrap();
        }

        // Reopen: both the sale and the stock movement must have survived.
        let store = LedgerStore::open(StoreConfig::new(&path)).unwrap();
        let ledger = Ledger::open(store).await.unwrap();
        assert_eq!(ledger.sales().list().await.unwrap().len(), 4);
        let product = ledger.products().get("prod1").await.unwrap().unwrap();
        assert_eq!(product.stock, 90);
    }
}
