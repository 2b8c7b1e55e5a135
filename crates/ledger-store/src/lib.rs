//! # ledger-store: Storage Layer for the Store Ledger
//!
//! This crate provides the transactional data layer for the storefront
//! ledger. It holds the live collections in memory behind a single lock
//! and keeps a redb file in sync with every mutation.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Store Ledger Data Flow                            │
//! │                                                                         │
//! │  Host application (UI, CLI, service)                                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  ledger-store (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │    Ledger     │    │  Repositories │    │ LedgerStore  │  │   │
//! │  │   │  (ledger.rs)  │    │ (repository/) │    │(persistence) │  │   │
//! │  │   │               │    │               │    │              │  │   │
//! │  │   │ Mutex<State>  │◄───│ ShopRepo      │───►│ redb + JSON  │  │   │
//! │  │   │ seed/hydrate  │    │ SaleRepo ...  │    │ entries      │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ledger.redb  (five named JSON entries + schema version)               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Domain types and pure rules (validation, invoice numbering) live in
//! `ledger-core`; this crate adds state, concurrency, and durability.
//!
//! ## Module Organization
//!
//! - [`persistence`] - redb-backed load/save of the five collections
//! - [`ledger`] - the `Ledger` handle: hydration, seeding, accessors
//! - [`repository`] - per-collection operations (shop, product, ...)
//! - [`error`] - the `StoreError` surface
//! - [`users`] - collaborator hook for user-account purges
//! - [`seed`] - the fixed demo dataset
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ledger_store::{Ledger, LedgerStore, StoreConfig};
//!
//! let store = LedgerStore::open(StoreConfig::new("./ledger.redb"))?;
//! let ledger = Ledger::open(store).await?;
//!
//! let shops = ledger.shops().list().await?;
//! let sale = ledger.sales().record(draft).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod ledger;
pub mod persistence;
pub mod repository;
pub mod seed;
pub mod users;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{StoreError, StoreResult};
pub use ledger::Ledger;
pub use persistence::{
    Collection, LedgerState, LedgerStore, PersistenceError, StoreConfig, SCHEMA_VERSION,
};
pub use users::{NullUserDirectory, UserDirectory};

// Repository re-exports for convenience
pub use repository::active_shop::ActiveShopSelector;
pub use repository::inventory::InventoryRepository;
pub use repository::product::{ProductDraft, ProductPatch, ProductRepository};
pub use repository::sale::{SaleDraft, SaleRepository};
pub use repository::shop::{ShopDraft, ShopPatch, ShopRepository};
