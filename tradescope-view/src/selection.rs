//! Default account policy and refresh tickets.

use serde::{Deserialize, Serialize};

use tradescope_core::{Account, AccountId};

/// Pick the account selected at startup.
///
/// Takes the entry at `index` in directory order. A shorter directory falls back
/// to its first entry; an empty one selects nothing.
pub fn default_account(accounts: &[Account], index: usize) -> Option<&Account> {
    accounts.get(index).or_else(|| accounts.first())
}

/// Monotonic counter bumped on every account selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Generation(pub u64);

impl Generation {
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

/// Identifies one point-catalog refresh.
///
/// A completion is applied only while its ticket matches the coordinator's
/// current generation and selected account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RefreshTicket {
    pub account_id: AccountId,
    pub generation: Generation,
}

impl RefreshTicket {
    pub fn is_current(&self, generation: Generation, selected: Option<&Account>) -> bool {
        self.generation == generation && selected.is_some_and(|a| a.id == self.account_id)
    }
}
