use std::collections::{BTreeSet, HashMap};

use crate::model::{Account, AccountId, OwnershipType};

/// One player's account ids, split by ownership.
/// Derived once from the player's account listing and left untouched for the
/// rest of the run.
#[derive(Debug, PartialEq, Eq, Clone, Default)]
pub struct PlayerAccountIds {
    pub individual_accounts: Vec<AccountId>,
    pub joint_accounts: Vec<AccountId>,
}

impl PlayerAccountIds {
    /// Partitions the listing, keeping the listing's order inside each half.
    pub fn classify(accounts: &[Account]) -> Self {
        let (joint, individual): (Vec<&Account>, Vec<&Account>) = accounts
            .iter()
            .partition(|account| account.ownership_type == OwnershipType::Joint);
        Self {
            individual_accounts: individual.into_iter().map(|a| a.id.clone()).collect(),
            joint_accounts: joint.into_iter().map(|a| a.id.clone()).collect(),
        }
    }

    pub fn owns_individually(&self, account_id: &str) -> bool {
        self.individual_accounts.iter().any(|id| id == account_id)
    }

    pub fn shares(&self, account_id: &str) -> bool {
        self.joint_accounts.iter().any(|id| id == account_id)
    }

    /// Individual account ids that both players claim.
    pub fn overlapping_individual_accounts(&self, other: &PlayerAccountIds) -> BTreeSet<AccountId> {
        self.individual_accounts
            .iter()
            .filter(|id| other.owns_individually(id))
            .cloned()
            .collect()
    }
}

/// Maps every account id in the listing to its display name.
pub fn name_lookup(accounts: &[Account]) -> HashMap<AccountId, String> {
    accounts
        .iter()
        .map(|account| (account.id.clone(), account.display_name.clone()))
        .collect()
}
