//! # Domain Types
//!
//! Core domain types used throughout the Store Ledger.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │      Shop       │   │    Product      │   │      Sale       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  id (INV-...)   │       │
//! │  │  store_number   │   │  sku (business) │   │  shop_id (FK)   │       │
//! │  │  name (unique)  │   │  stock (global) │   │  items[]        │       │
//! │  │  created_at     │   │  expiry_date    │   │  total/paid     │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │ InventoryEntry  │   │    SaleType     │   │   SaleStatus    │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  (shop,product) │   │  Cash           │   │  Completed      │       │
//! │  │  composite key  │   │  Online         │   │  Pending        │       │
//! │  │  quantity       │   └─────────────────┘   │  Cancelled      │       │
//! │  └─────────────────┘                         └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! Shops and products have:
//! - `id`: UUID v4 - immutable, used for relations
//! - Business ID: (store_number, sku) - human-readable, potentially mutable
//!
//! Sales are the exception: their business identifier (`INV-YYYYMM-NNN`) *is*
//! the primary key, because the monthly sequence is the identity callers and
//! printed receipts use.
//!
//! ## Wire Format
//! Every struct serializes with camelCase field names; the serialized shape
//! is also the durable collection format, so renames here are storage-format
//! changes and need a schema-version bump.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

// =============================================================================
// Shop
// =============================================================================

/// A sales location with a unique name and store number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Shop {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name. Unique case-insensitively across all shops.
    pub name: String,

    /// Business identifier (e.g., "DT001"). Unique across all shops.
    pub store_number: String,

    /// Street address.
    pub address: String,

    /// The manager's user id, if one is assigned.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manager_id: Option<String>,

    /// The super-admin's user id, if the shop belongs to a chain account.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub super_admin_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// When the shop was created.
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Product
// =============================================================================

/// A catalog item with a price, cost, and a single global stock count.
///
/// Stock is tracked globally, not per shop: per-shop quantities live in
/// [`InventoryEntry`] and are a display/replenishment ledger only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name shown on listings and receipts.
    pub name: String,

    /// Stock Keeping Unit - business identifier.
    pub sku: String,

    /// Category label (e.g., "Dairy", "Beverages").
    pub category: String,

    /// Selling price, decimal currency units.
    pub price: f64,

    /// Acquisition cost, decimal currency units.
    pub cost: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Optional image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    /// Whether the product can be sold. Auto-flips to false once
    /// `expiry_date` is in the past.
    pub is_active: bool,

    /// Expiry date, if the product is perishable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(as = "Option<String>")]
    pub expiry_date: Option<DateTime<Utc>>,

    /// Global stock level. Never negative; sales clamp depletion at 0.
    pub stock: i64,
}

impl Product {
    /// Checks whether the product's expiry date (if any) has passed.
    #[inline]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expiry_date.is_some_and(|d| d < now)
    }

    /// Applies the expiry rule: an expired product is never active.
    ///
    /// Called on load and on every product write so stale `is_active` flags
    /// cannot survive a restart or an edit.
    pub fn refresh_active(&mut self, now: DateTime<Utc>) {
        if self.is_expired(now) {
            self.is_active = false;
        }
    }
}

// =============================================================================
// Inventory Entry
// =============================================================================

/// The quantity of one Product held at one Shop.
///
/// Keyed by the `(shop_id, product_id)` composite; created lazily by the
/// first stock assignment for the pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct InventoryEntry {
    pub shop_id: String,
    pub product_id: String,

    /// Units on hand at this shop. Never negative.
    pub quantity: i64,

    /// Replenishment threshold; defaults to 5 on lazy creation.
    pub min_stock_level: i64,

    /// When the quantity was last assigned.
    #[ts(as = "String")]
    pub last_updated: DateTime<Utc>,
}

impl InventoryEntry {
    /// True when the on-hand quantity has fallen to or below the threshold.
    #[inline]
    pub fn is_low(&self) -> bool {
        self.quantity <= self.min_stock_level
    }
}

// =============================================================================
// Sale Type
// =============================================================================

/// How a sale was tendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum SaleType {
    /// Over-the-counter cash payment.
    Cash,
    /// Online/remote payment.
    Online,
}

// =============================================================================
// Sale Status
// =============================================================================

/// The status of a sale record.
///
/// The processor only ever writes `Completed`; `Pending` and `Cancelled`
/// exist in the stored vocabulary for forward compatibility with hosts that
/// import historical data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum SaleStatus {
    Completed,
    Pending,
    Cancelled,
}

impl Default for SaleStatus {
    fn default() -> Self {
        SaleStatus::Completed
    }
}

// =============================================================================
// Sale
// =============================================================================

/// An immutable record of items sold.
///
/// ## Immutability
/// Once persisted a sale is never mutated or deleted by any ledger
/// operation: sales are the audit log. Product deletion may leave dangling
/// `product_id` references inside `items`; readers must not assume the
/// referenced product still exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    /// Business identifier and primary key: `INV-YYYYMM-NNN`, monotonically
    /// increasing within a calendar month across all shops.
    pub id: String,

    /// The shop the sale was made at.
    pub shop_id: String,

    pub sale_type: SaleType,

    /// Line items, embedded and owned by the sale.
    pub items: Vec<SaleItem>,

    /// Caller-supplied grand total. Not re-derived from `items`.
    pub total: f64,

    /// Amount tendered so far.
    pub paid: f64,

    /// Outstanding balance.
    pub balance: f64,

    /// Id of the acting user that recorded the sale.
    pub created_by: String,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    pub status: SaleStatus,
}

// =============================================================================
// Sale Item
// =============================================================================

/// A line item in a sale.
///
/// Prices are frozen at time of sale; later catalog edits never rewrite a
/// persisted item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SaleItem {
    pub product_id: String,

    /// Units sold.
    pub quantity: i64,

    /// Unit price at time of sale.
    pub price: f64,

    /// Line total (`price × quantity`), caller-supplied.
    pub total: f64,
}

// =============================================================================
// Acting User (auth collaborator shape)
// =============================================================================

/// Role of the acting caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Manager,
    Staff,
}

/// The caller shape supplied by the auth collaborator.
///
/// The ledger consumes only this: `id` becomes `Sale::created_by`, `role`
/// and `shop_id` let hosts scope queries. Session mechanics live entirely
/// outside the ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ActingUser {
    pub id: String,
    pub role: UserRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shop_id: Option<String>,
}

// =============================================================================
// Unit Tests
// =============================================================================
