//! # Ledger Handle
//!
//! The main entry point: opens the store, hydrates (or seeds) the in-memory
//! state, and hands out repositories.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Ledger Data Flow                                │
//! │                                                                         │
//! │  Host application call (ledger.sales().record(...))                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  ledger-store (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │    Ledger     │    │  Repositories │    │ LedgerStore  │  │   │
//! │  │   │  (ledger.rs)  │    │ (shop.rs ...) │    │(persistence) │  │   │
//! │  │   │               │    │               │    │              │  │   │
//! │  │   │ Mutex<State>  │◄───│ ShopRepo      │───►│ redb file    │  │   │
//! │  │   │ hydrate/seed  │    │ SaleRepo ...  │    │ JSON entries │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                                                         │
//! │  Invariant checks run against in-memory state; every mutation          │
//! │  flushes its touched collections before returning.                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Concurrency
//! One `tokio::sync::Mutex` guards the whole state. Every operation takes
//! the lock for its full read-check-write (and flush) span, so invariant
//! checks can never interleave with a competing mutation. Throughput is
//! bounded by the single writer, which matches the workload: this is a
//! per-process storefront ledger, not a server fleet.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::error::StoreResult;
use crate::persistence::{Collection, LedgerState, LedgerStore, PersistenceResult};
use crate::repository::active_shop::ActiveShopSelector;
use crate::repository::inventory::InventoryRepository;
use crate::repository::product::ProductRepository;
use crate::repository::sale::SaleRepository;
use crate::repository::shop::ShopRepository;
use crate::seed;
use crate::users::{NullUserDirectory, UserDirectory};

/// Shared internals behind every repository handle.
pub(crate) struct LedgerInner {
    pub(crate) state: Mutex<LedgerState>,
    pub(crate) store: LedgerStore,
    pub(crate) users: Arc<dyn UserDirectory>,
}

impl LedgerInner {
    /// Flushes the named collections from the given (already locked) state.
    pub(crate) fn flush(
        &self,
        state: &LedgerState,
        collections: &[Collection],
    ) -> StoreResult<()> {
        self.store.save(state, collections)?;
        Ok(())
    }
}

/// Main ledger handle providing repository access.
///
/// Cheap to clone; all clones share the same state and database.
///
/// ## Usage
/// ```rust,ignore
/// let store = LedgerStore::open(StoreConfig::new("./ledger.redb"))?;
/// let ledger = Ledger::open(store).await?;
///
/// let shop = ledger.shops().create(new_shop).await?;
/// ledger.active_shop().set(&shop.id).await?;
/// ```
#[derive(Clone)]
pub struct Ledger {
    inner: Arc<LedgerInner>,
}

impl Ledger {
    /// Opens a ledger over the given store with no user directory.
    pub async fn open(store: LedgerStore) -> PersistenceResult<Self> {
        Self::open_with_users(store, Arc::new(NullUserDirectory)).await
    }

    /// Opens a ledger over the given store.
    ///
    /// ## Hydration
    /// * Stored data found: loaded, then product expiry flags are refreshed
    ///   against the current clock.
    /// * First run: the demo dataset is seeded and persisted (or an empty
    ///   state, when the config disables seeding).
    /// * Load failure: logged; the ledger starts from the demo dataset in
    ///   memory so the host stays usable. Writes keep trying the store.
    pub async fn open_with_users(
        store: LedgerStore,
        users: Arc<dyn UserDirectory>,
    ) -> PersistenceResult<Self> {
        let state = match store.load_state() {
            Ok(Some(mut state)) => {
                let now = Utc::now();
                for product in &mut state.products {
                    product.refresh_active(now);
                }
                info!(
                    shops = state.shops.len(),
                    sales = state.sales.len(),
                    "Hydrated ledger from store"
                );
                state
            }
            Ok(None) => {
                let state = if store.config().seed_on_empty {
                    info!("First run, seeding demo dataset");
                    seed::demo_dataset()
                } else {
                    info!("First run, starting empty");
                    LedgerState::default()
                };
                store.save_all(&state)?;
                state
            }
            Err(err) => {
                warn!(error = %err, "Failed to load stored state, starting from demo dataset");
                seed::demo_dataset()
            }
        };

        Ok(Ledger {
            inner: Arc::new(LedgerInner {
                state: Mutex::new(state),
                store,
                users,
            }),
        })
    }

    // =========================================================================
    // Repository Accessors
    // =========================================================================

    /// Returns the shop repository.
    pub fn shops(&self) -> ShopRepository {
        ShopRepository::new(Arc::clone(&self.inner))
    }

    /// Returns the product repository.
    pub fn products(&self) -> ProductRepository {
        ProductRepository::new(Arc::clone(&self.inner))
    }

    /// Returns the per-shop inventory repository.
    pub fn inventory(&self) -> InventoryRepository {
        InventoryRepository::new(Arc::clone(&self.inner))
    }

    /// Returns the sale repository.
    pub fn sales(&self) -> SaleRepository {
        SaleRepository::new(Arc::clone(&self.inner))
    }

    /// Returns the active-shop selector.
    pub fn active_shop(&self) -> ActiveShopSelector {
        ActiveShopSelector::new(Arc::clone(&self.inner))
    }

    /// Snapshot of the full in-memory state (for diagnostics and tests).
    pub async fn snapshot(&self) -> LedgerState {
        self.inner.state.lock().await.clone()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
