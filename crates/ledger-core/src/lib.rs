//! # ledger-core: Pure Business Logic for the Store Ledger
//!
//! This crate is the **heart** of the Store Ledger. It contains the domain
//! types and business rules as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Store Ledger Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     Host (UI shell / HTTP port)                 │   │
//! │  │    Shop screens ──► Product forms ──► Sale entry ──► Reports   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ ledger-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐                  │   │
//! │  │   │   types   │  │  invoice  │  │ validation│                  │   │
//! │  │   │   Shop    │  │ INV-numbs │  │   rules   │                  │   │
//! │  │   │   Sale    │  │ per month │  │  checks   │                  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘                  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                  ledger-store (Storage Layer)                   │   │
//! │  │          redb key-value persistence, repositories, seed         │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Shop, Product, InventoryEntry, Sale, ...)
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//! - [`invoice`] - Sequential monthly invoice-number derivation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Injected Clocks**: Anything time-dependent takes `now` as a parameter
//! 4. **Explicit Errors**: All errors are typed, never strings or panics

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod invoice;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use ledger_core::Shop` instead of
// `use ledger_core::types::Shop`

pub use error::ValidationError;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Default minimum stock level for lazily-created inventory entries.
///
/// ## Business Reason
/// When a shop first receives stock of a product, no replenishment threshold
/// has been configured yet; 5 units is the storewide default until a manager
/// adjusts it.
pub const DEFAULT_MIN_STOCK_LEVEL: i64 = 5;

/// Prefix of every sale identifier (`INV-YYYYMM-NNN`).
pub const INVOICE_PREFIX: &str = "INV";
