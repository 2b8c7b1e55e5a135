//! # Repository Implementations
//!
//! One repository per collection, handed out by [`Ledger`](crate::Ledger).
//! Each holds a clone of the shared ledger internals; all clones operate on
//! the same state and database.

pub mod active_shop;
pub mod inventory;
pub mod product;
pub mod sale;
pub mod shop;
