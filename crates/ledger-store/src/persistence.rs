//! # Persistence Adapter
//!
//! redb-backed durable storage for the ledger's collections.
//!
//! ## Storage Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        ledger.redb (one file)                           │
//! │                                                                         │
//! │  "state" table (&str -> &[u8], values are JSON)                        │
//! │  ├── "shops"      → [ {id, name, storeNumber, ...}, ... ]             │
//! │  ├── "products"   → [ {id, name, sku, stock, ...}, ... ]              │
//! │  ├── "inventory"  → [ {shopId, productId, quantity, ...}, ... ]       │
//! │  ├── "sales"      → [ {id, shopId, items, ...}, ... ]                 │
//! │  └── "activeShop" → "shop-uuid"          (absent when cleared)         │
//! │                                                                         │
//! │  "meta" table (&str -> u32)                                            │
//! │  └── "schemaVersion" → 1                                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each entry holds a whole collection; a mutation rewrites the touched
//! collections inside one write transaction and commits before the calling
//! repository operation returns. A crash immediately after a successful call
//! therefore cannot silently lose the mutation.
//!
//! ## Schema Versioning
//! Every write stamps `schemaVersion`. Data written without a version
//! (legacy v0) is accepted and stamped at load; data from a *newer* schema
//! is rejected rather than misread.

use std::path::PathBuf;
use std::sync::Arc;

use redb::{Database, ReadableDatabase, TableDefinition};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, info};

use ledger_core::{InventoryEntry, Product, Sale, Shop};

/// Collection entries, keyed by name. Values are JSON.
const STATE_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("state");

/// Storage metadata (currently just the schema version).
const META_TABLE: TableDefinition<&str, u32> = TableDefinition::new("meta");

const KEY_SHOPS: &str = "shops";
const KEY_PRODUCTS: &str = "products";
const KEY_INVENTORY: &str = "inventory";
const KEY_SALES: &str = "sales";
const KEY_ACTIVE_SHOP: &str = "activeShop";
const KEY_SCHEMA_VERSION: &str = "schemaVersion";

/// Version of the durable collection format this build reads and writes.
pub const SCHEMA_VERSION: u32 = 1;

// =============================================================================
// Errors
// =============================================================================

/// Storage-level failures. Surfaced to ledger callers as `StoreError::Io`.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Unsupported schema version {found} (this build supports up to {supported})")]
    UnsupportedVersion { found: u32, supported: u32 },
}

pub type PersistenceResult<T> = Result<T, PersistenceError>;

// =============================================================================
// Collections
// =============================================================================

/// The five named entries of the durable format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Shops,
    Products,
    Inventory,
    Sales,
    ActiveShop,
}

impl Collection {
    /// All five entries, in storage order.
    pub const ALL: [Collection; 5] = [
        Collection::Shops,
        Collection::Products,
        Collection::Inventory,
        Collection::Sales,
        Collection::ActiveShop,
    ];

    /// The entry's key in the state table.
    pub fn key(self) -> &'static str {
        match self {
            Collection::Shops => KEY_SHOPS,
            Collection::Products => KEY_PRODUCTS,
            Collection::Inventory => KEY_INVENTORY,
            Collection::Sales => KEY_SALES,
            Collection::ActiveShop => KEY_ACTIVE_SHOP,
        }
    }
}

// =============================================================================
// Ledger State
// =============================================================================

/// The full in-memory state of the ledger: four collections plus the
/// active-shop pointer. This is the only shared mutable state in the system.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LedgerState {
    pub shops: Vec<Shop>,
    pub products: Vec<Product>,
    pub inventory: Vec<InventoryEntry>,
    pub sales: Vec<Sale>,
    pub active_shop: Option<String>,
}

// =============================================================================
// Configuration
// =============================================================================

/// Storage configuration.
///
/// ## Example
/// ```rust,ignore
/// let config = StoreConfig::new("/path/to/ledger.redb").seed_on_empty(false);
/// let store = LedgerStore::open(config)?;
/// ```
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Path to the database file. Created if it doesn't exist.
    pub path: PathBuf,

    /// Whether a first run (no stored collections) gets the fixed demo
    /// dataset instead of starting empty. Default: true.
    pub seed_on_empty: bool,
}

impl StoreConfig {
    /// Creates a configuration with the given database path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        StoreConfig {
            path: path.into(),
            seed_on_empty: true,
        }
    }

    /// Sets whether to seed the demo dataset on first run.
    pub fn seed_on_empty(mut self, seed: bool) -> Self {
        self.seed_on_empty = seed;
        self
    }

    fn in_memory() -> Self {
        StoreConfig::new(":memory:")
    }
}

// =============================================================================
// Ledger Store
// =============================================================================

/// Durable load/save of the ledger's collections.
///
/// Cheap to clone; all clones share one underlying database.
#[derive(Clone)]
pub struct LedgerStore {
    db: Arc<Database>,
    config: StoreConfig,
}

impl LedgerStore {
    /// Opens (or creates) the database file and initialises its tables.
    pub fn open(config: StoreConfig) -> PersistenceResult<Self> {
        info!(path = %config.path.display(), "Opening ledger store");
        let db = Database::create(&config.path)?;
        Self::init(db, config)
    }

    /// Opens an isolated in-memory database (for tests and demos).
    pub fn open_in_memory() -> PersistenceResult<Self> {
        let db =
            Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
        Self::init(db, StoreConfig::in_memory())
    }

    /// Like [`open_in_memory`](Self::open_in_memory), with a custom config
    /// (the path field is ignored).
    pub fn open_in_memory_with(config: StoreConfig) -> PersistenceResult<Self> {
        let db =
            Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
        Self::init(db, config)
    }

    fn init(db: Database, config: StoreConfig) -> PersistenceResult<Self> {
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(STATE_TABLE)?;
            let _ = write_txn.open_table(META_TABLE)?;
        }
        write_txn.commit()?;

        Ok(LedgerStore {
            db: Arc::new(db),
            config,
        })
    }

    /// This store's configuration.
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    // =========================================================================
    // Save
    // =========================================================================

    /// Writes the named collections from `state` in one transaction.
    ///
    /// The commit is synchronous: when this returns `Ok`, the mutation is
    /// durable. Untouched entries keep their previous value; the schema
    /// version is (re)stamped on every write.
    pub fn save(&self, state: &LedgerState, collections: &[Collection]) -> PersistenceResult<()> {
        debug!(count = collections.len(), "Flushing collections");

        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(STATE_TABLE)?;
            for collection in collections {
                match collection {
                    Collection::Shops => {
                        let bytes = serde_json::to_vec(&state.shops)?;
                        table.insert(KEY_SHOPS, bytes.as_slice())?;
                    }
                    Collection::Products => {
                        let bytes = serde_json::to_vec(&state.products)?;
                        table.insert(KEY_PRODUCTS, bytes.as_slice())?;
                    }
                    Collection::Inventory => {
                        let bytes = serde_json::to_vec(&state.inventory)?;
                        table.insert(KEY_INVENTORY, bytes.as_slice())?;
                    }
                    Collection::Sales => {
                        let bytes = serde_json::to_vec(&state.sales)?;
                        table.insert(KEY_SALES, bytes.as_slice())?;
                    }
                    // A cleared pointer is an absent key, not a stored null.
                    Collection::ActiveShop => match &state.active_shop {
                        Some(shop_id) => {
                            let bytes = serde_json::to_vec(shop_id)?;
                            table.insert(KEY_ACTIVE_SHOP, bytes.as_slice())?;
                        }
                        None => {
                            table.remove(KEY_ACTIVE_SHOP)?;
                        }
                    },
                }
            }

            let mut meta = write_txn.open_table(META_TABLE)?;
            meta.insert(KEY_SCHEMA_VERSION, SCHEMA_VERSION)?;
        }
        write_txn.commit()?;

        Ok(())
    }

    /// Writes all five entries.
    pub fn save_all(&self, state: &LedgerState) -> PersistenceResult<()> {
        self.save(state, &Collection::ALL)
    }

    // =========================================================================
    // Load
    // =========================================================================

    /// Loads the full ledger state.
    ///
    /// ## Returns
    /// * `Ok(Some(state))` - stored collections found (and, for legacy v0
    ///   data, stamped to the current schema version)
    /// * `Ok(None)` - first run: nothing stored yet
    /// * `Err(_)` - storage failure or a newer, unsupported schema
    pub fn load_state(&self) -> PersistenceResult<Option<LedgerState>> {
        let read_txn = self.db.begin_read()?;

        let version = {
            let meta = read_txn.open_table(META_TABLE)?;
            meta.get(KEY_SCHEMA_VERSION)?.map(|guard| guard.value())
        };
        if let Some(found) = version {
            if found > SCHEMA_VERSION {
                return Err(PersistenceError::UnsupportedVersion {
                    found,
                    supported: SCHEMA_VERSION,
                });
            }
        }

        let table = read_txn.open_table(STATE_TABLE)?;

        // The shops entry doubles as the first-run marker: the seeded demo
        // dataset always writes it, so its absence means a fresh store.
        let shops: Option<Vec<Shop>> = read_json(&table, KEY_SHOPS)?;
        let Some(shops) = shops else {
            return Ok(None);
        };

        let state = LedgerState {
            shops,
            products: read_json(&table, KEY_PRODUCTS)?.unwrap_or_default(),
            inventory: read_json(&table, KEY_INVENTORY)?.unwrap_or_default(),
            sales: read_json(&table, KEY_SALES)?.unwrap_or_default(),
            active_shop: read_json(&table, KEY_ACTIVE_SHOP)?,
        };

        if version.is_none() {
            // Legacy v0 data (written before the version field existed).
            // The v0 → v1 upgrade changes nothing structurally; stamping the
            // version is the whole migration.
            info!("Migrating unversioned ledger data to schema v{SCHEMA_VERSION}");
            let write_txn = self.db.begin_write()?;
            {
                let mut meta = write_txn.open_table(META_TABLE)?;
                meta.insert(KEY_SCHEMA_VERSION, SCHEMA_VERSION)?;
            }
            write_txn.commit()?;
        }

        debug!(
            shops = state.shops.len(),
            products = state.products.len(),
            inventory = state.inventory.len(),
            sales = state.sales.len(),
            "Loaded ledger state"
        );

        Ok(Some(state))
    }

    /// Stamps an arbitrary schema version, bypassing the save path. Lets
    /// version-handling tests simulate a file written by a different build.
    #[cfg(test)]
    pub(crate) fn force_schema_version(&self, version: u32) -> PersistenceResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let mut meta = write_txn.open_table(META_TABLE)?;
            meta.insert(KEY_SCHEMA_VERSION, version)?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Reads the stored schema version, if any.
    pub fn schema_version(&self) -> PersistenceResult<Option<u32>> {
        let read_txn = self.db.begin_read()?;
        let meta = read_txn.open_table(META_TABLE)?;
        Ok(meta.get(KEY_SCHEMA_VERSION)?.map(|guard| guard.value()))
    }
}

fn read_json<T: DeserializeOwned>(
    table: &redb::ReadOnlyTable<&'static str, &'static [u8]>,
    key: &str,
) -> PersistenceResult<Option<T>> {
    match table.get(key)? {
        Some(guard) => Ok(Some(serde_json::from_slice(guard.value())?)),
        None => Ok(None),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn shop(name: &str, store_number: &str) -> Shop {
        Shop {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.to_string(),
            store_number: store_number.to_string(),
            address: "1 Test Way".to_string(),
            manager_id: None,
            super_admin_id: None,
            phone: None,
            email: None,
            created_at: Utc.with_ymd_and_hms(2023, 1, 15, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_first_run_loads_none() {
        let store = LedgerStore::open_in_memory().unwrap();
        assert!(store.load_state().unwrap().is_none());
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let store = LedgerStore::open_in_memory().unwrap();

        let state = LedgerState {
            shops: vec![shop("Downtown Grocery", "DT001"), shop("Uptown", "UT002")],
            active_shop: Some("shop-a".to_string()),
            ..Default::default()
        };
        store.save_all(&state).unwrap();

        let loaded = store.load_state().unwrap().unwrap();
        assert_eq!(loaded.shops, state.shops);
        assert_eq!(loaded.active_shop, Some("shop-a".to_string()));
        assert_eq!(store.schema_version().unwrap(), Some(SCHEMA_VERSION));
    }

    #[test]
    fn test_partial_save_leaves_other_entries_untouched() {
        let store = LedgerStore::open_in_memory().unwrap();

        let mut state = LedgerState {
            shops: vec![shop("Downtown Grocery", "DT001")],
            ..Default::default()
        };
        store.save_all(&state).unwrap();

        state.shops.push(shop("Westside Mart", "WS003"));
        state.active_shop = Some("late".to_string());
        // Only shops flushed; the pointer change must NOT be persisted.
        store.save(&state, &[Collection::Shops]).unwrap();

        let loaded = store.load_state().unwrap().unwrap();
        assert_eq!(loaded.shops.len(), 2);
        assert_eq!(loaded.active_shop, None);
    }

    #[test]
    fn test_clearing_active_shop_removes_entry() {
        let store = LedgerStore::open_in_memory().unwrap();

        let mut state = LedgerState {
            shops: vec![shop("Downtown Grocery", "DT001")],
            active_shop: Some("shop-a".to_string()),
            ..Default::default()
        };
        store.save_all(&state).unwrap();

        state.active_shop = None;
        store.save(&state, &[Collection::ActiveShop]).unwrap();

        let loaded = store.load_state().unwrap().unwrap();
        assert_eq!(loaded.active_shop, None);
    }

    #[test]
    fn test_on_disk_round_trip_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.redb");

        let state = LedgerState {
            shops: vec![shop("Downtown Grocery", "DT001")],
            ..Default::default()
        };

        {
            let store = LedgerStore::open(StoreConfig::new(&path)).unwrap();
            store.save_all(&state).unwrap();
        }

        let store = LedgerStore::open(StoreConfig::new(&path)).unwrap();
        let loaded = store.load_state().unwrap().unwrap();
        assert_eq!(loaded.shops, state.shops);
        assert_eq!(store.schema_version().unwrap(), Some(SCHEMA_VERSION));
    }

    #[test]
    fn test_newer_schema_version_is_rejected() {
        let store = LedgerStore::open_in_memory().unwrap();
        let state = LedgerState {
            shops: vec![shop("Downtown Grocery", "DT001")],
            ..Default::default()
        };
        store.save_all(&state).unwrap();

        // Simulate a file written by a future build.
        store.force_schema_version(SCHEMA_VERSION + 1).unwrap();

        let err = store.load_state().unwrap_err();
        assert!(matches!(
            err,
            PersistenceError::UnsupportedVersion { .. }
        ));
    }

    #[test]
    fn test_unversioned_data_is_stamped_at_load() {
        let store = LedgerStore::open_in_memory().unwrap();

        // Write v0-style data: collection entries, no version stamp.
        {
            let write_txn = store.db.begin_write().unwrap();
            {
                let mut table = write_txn.open_table(STATE_TABLE).unwrap();
                let bytes = serde_json::to_vec(&vec![shop("Legacy", "LG001")]).unwrap();
                table.insert(KEY_SHOPS, bytes.as_slice()).unwrap();
            }
            write_txn.commit().unwrap();
        }
        assert_eq!(store.schema_version().unwrap(), None);

        let loaded = store.load_state().unwrap().unwrap();
        assert_eq!(loaded.shops.len(), 1);
        assert_eq!(store.schema_version().unwrap(), Some(SCHEMA_VERSION));
    }
}
