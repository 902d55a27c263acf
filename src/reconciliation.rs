use std::{collections::HashMap, fmt, str::FromStr};

use serde::Deserialize;
use thiserror::Error;

use crate::{
    account::{name_lookup, PlayerAccountIds},
    attribution::{AccountByPlayer, Attribution},
    cashflow::{Cashflow, CashflowOverflow},
    model::{Account, AccountId, TransactionId},
    source::{BankingApi, Credential, SourceError, TransactionPages},
};

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Player {
    One,
    Two,
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Player::One => f.write_str("player 1"),
            Player::Two => f.write_str("player 2"),
        }
    }
}

/// How both players' joint account listings are compared.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JointAccountCheck {
    /// Same ids in the same positions.
    #[default]
    Ordered,
    /// Same ids with the same multiplicity, in any order.
    Unordered,
}

impl JointAccountCheck {
    pub fn matches(&self, player_1: &[AccountId], player_2: &[AccountId]) -> bool {
        match self {
            JointAccountCheck::Ordered => player_1 == player_2,
            JointAccountCheck::Unordered => {
                let mut player_1 = player_1.to_vec();
                let mut player_2 = player_2.to_vec();
                player_1.sort();
                player_2.sort();
                player_1 == player_2
            }
        }
    }
}

impl FromStr for JointAccountCheck {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ordered" => Ok(Self::Ordered),
            "unordered" => Ok(Self::Unordered),
            other => Err(format!("unknown joint account check: {other}")),
        }
    }
}

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ReconcileError {
    #[error("The credential of {player} was rejected.")]
    AuthFailure { player: Player },
    #[error("Fetching data with the credential of {player} failed: {reason}")]
    FetchFailure { player: Player, reason: String },
    #[error("Joint accounts do not match: player 1 has {player_1:?}, player 2 has {player_2:?}")]
    JointAccountMismatch {
        player_1: Vec<AccountId>,
        player_2: Vec<AccountId>,
    },
    #[error("Transaction {transaction_id} of account {account_id} is malformed: {reason}")]
    MalformedTransaction {
        account_id: AccountId,
        transaction_id: TransactionId,
        reason: String,
    },
    #[error("Totals overflow 64-bit minor units while adding account {account_id}")]
    Overflow { account_id: AccountId },
}

impl ReconcileError {
    fn from_source(player: Player, account_id: Option<&str>, err: SourceError) -> Self {
        match err {
            SourceError::Unauthorized => Self::AuthFailure { player },
            SourceError::MalformedTransaction {
                transaction_id,
                reason,
            } => Self::MalformedTransaction {
                account_id: account_id.unwrap_or_default().to_string(),
                transaction_id,
                reason,
            },
            other => Self::FetchFailure {
                player,
                reason: other.to_string(),
            },
        }
    }
}

/// One joint account's attribution under its display name.
#[derive(Debug, PartialEq, Clone)]
pub struct AccountReport {
    pub name: String,
    pub attribution: AccountByPlayer,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub struct GrandTotals {
    pub player_1: Cashflow,
    pub player_2: Cashflow,
    pub unaccounted: Cashflow,
}

impl GrandTotals {
    /// Adds one account's player buckets. On overflow the totals are left
    /// unchanged.
    pub fn fold(&mut self, attribution: &AccountByPlayer) -> Result<(), CashflowOverflow> {
        *self = GrandTotals {
            player_1: self.player_1.merge(&attribution.player_1)?,
            player_2: self.player_2.merge(&attribution.player_2)?,
            unaccounted: self.unaccounted.merge(&attribution.unaccounted)?,
        };
        Ok(())
    }
}

/// The complete result of a run: every joint account in player 1's order,
/// then the grand totals.
#[derive(Debug, PartialEq, Clone, Default)]
pub struct Reconciliation {
    pub accounts: Vec<AccountReport>,
    pub totals: GrandTotals,
    /// Display names of player 1's accounts.
    pub names: HashMap<AccountId, String>,
}

impl Reconciliation {
    /// Display name of an account id, the id itself when unknown.
    pub fn name_of<'a>(&'a self, account_id: &'a str) -> &'a str {
        self.names
            .get(account_id)
            .map(String::as_str)
            .unwrap_or(account_id)
    }
}

/// Drives a reconciliation run against a [`BankingApi`].
/// Every await happens in sequence, one request in flight at a time.
pub struct Reconciler {
    api: Box<dyn BankingApi + Send + Sync>,
    joint_account_check: JointAccountCheck,
}

impl Reconciler {
    pub fn new(
        api: Box<dyn BankingApi + Send + Sync>,
        joint_account_check: JointAccountCheck,
    ) -> Self {
        Self {
            api,
            joint_account_check,
        }
    }

    pub async fn reconcile(
        &self,
        player_1: &Credential,
        player_2: &Credential,
    ) -> Result<Reconciliation, ReconcileError> {
        let player_1_accounts = self.list_accounts(Player::One, player_1).await?;
        let player_2_accounts = self.list_accounts(Player::Two, player_2).await?;
        self.reconcile_accounts(&player_1_accounts, &player_2_accounts, player_1)
            .await
    }

    /// Reconciles already fetched listings. Transactions are read with
    /// `credential`, which must see every joint account of player 1.
    pub async fn reconcile_accounts(
        &self,
        player_1_accounts: &[Account],
        player_2_accounts: &[Account],
        credential: &Credential,
    ) -> Result<Reconciliation, ReconcileError> {
        let player_1 = PlayerAccountIds::classify(player_1_accounts);
        let player_2 = PlayerAccountIds::classify(player_2_accounts);
        tracing::info!(
            player_1 = ?player_1.individual_accounts,
            player_2 = ?player_2.individual_accounts,
            "individual accounts"
        );

        if !self
            .joint_account_check
            .matches(&player_1.joint_accounts, &player_2.joint_accounts)
        {
            return Err(ReconcileError::JointAccountMismatch {
                player_1: player_1.joint_accounts,
                player_2: player_2.joint_accounts,
            });
        }
        tracing::info!(joint_accounts = ?player_1.joint_accounts, "joint accounts match");

        let overlap = player_1.overlapping_individual_accounts(&player_2);
        if !overlap.is_empty() {
            tracing::warn!(
                accounts = ?overlap,
                "both players list these individual accounts, transfers with them count for player 1"
            );
        }

        let mut reconciliation = Reconciliation {
            names: name_lookup(player_1_accounts),
            ..Reconciliation::default()
        };
        for account_id in &player_1.joint_accounts {
            let attribution = self
                .attribute_account(account_id, &player_1, &player_2, credential)
                .await?;
            reconciliation
                .totals
                .fold(&attribution)
                .map_err(|_| ReconcileError::Overflow {
                    account_id: account_id.clone(),
                })?;
            let name = reconciliation.name_of(account_id).to_string();
            reconciliation
                .accounts
                .push(AccountReport { name, attribution });
        }
        Ok(reconciliation)
    }

    async fn list_accounts(
        &self,
        player: Player,
        credential: &Credential,
    ) -> Result<Vec<Account>, ReconcileError> {
        let accounts = self
            .api
            .list_accounts(credential)
            .await
            .map_err(|err| ReconcileError::from_source(player, None, err))?;
        tracing::debug!(%player, count = accounts.len(), "accounts listed");
        Ok(accounts)
    }

    async fn attribute_account(
        &self,
        account_id: &str,
        player_1: &PlayerAccountIds,
        player_2: &PlayerAccountIds,
        credential: &Credential,
    ) -> Result<AccountByPlayer, ReconcileError> {
        let mut attribution = Attribution::new(account_id, player_1, player_2);
        let mut pages = TransactionPages::new(self.api.as_ref(), account_id, credential);
        while let Some(page) = pages
            .next_page()
            .await
            .map_err(|err| ReconcileError::from_source(Player::One, Some(account_id), err))?
        {
            tracing::debug!(account_id, transactions = page.len(), "page fetched");
            attribution
                .record_all(&page)
                .map_err(|_| ReconcileError::Overflow {
                    account_id: account_id.to_string(),
                })?;
        }
        let attribution = attribution.finish();
        tracing::info!(
            account_id,
            transactions = attribution.transaction_count,
            "joint account attributed"
        );
        Ok(attribution)
    }
}
