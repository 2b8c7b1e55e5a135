//! # User Directory
//!
//! The ledger doesn't own user accounts; an embedding application does.
//! Deleting a shop must still purge that shop's staff accounts, so the
//! ledger calls out through this trait at deletion time.

/// Host-application hook for user-account bookkeeping.
pub trait UserDirectory: Send + Sync {
    /// Removes every user account assigned to `shop_id`.
    ///
    /// Returns the number of accounts removed. Called while a shop deletion
    /// is in flight; implementations should not call back into the ledger.
    fn remove_users_by_shop(&self, shop_id: &str) -> usize;
}

/// A directory with no users. The default when the host doesn't manage
/// accounts.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullUserDirectory;

impl UserDirectory for NullUserDirectory {
    fn remove_users_by_shop(&self, _shop_id: &str) -> usize {
        0
    }
}
