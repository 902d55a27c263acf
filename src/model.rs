mod amount;

pub use amount::MinorUnits;

pub type AccountId = String;
pub type TransactionId = String;
pub type Amount = MinorUnits;

/// The ownership of an account as reported by the banking API.
/// Only [`OwnershipType::Joint`] is treated specially, every other tag is
/// considered individually owned.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum OwnershipType {
    Individual,
    Joint,
    Other(String),
}

impl OwnershipType {
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "INDIVIDUAL" => Self::Individual,
            "JOINT" => Self::Joint,
            other => Self::Other(other.to_string()),
        }
    }
}

/// An account from one player's account listing.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Account {
    pub id: AccountId,
    pub ownership_type: OwnershipType,
    pub display_name: String,
}

/// The transaction structure consumed by the attribution engine.
/// A transaction without a counterparty is a valid state, e.g. a card
/// payment to a merchant or a cash movement.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Transaction {
    pub amount: Amount,
    pub counterparty: Option<AccountId>,
}

impl Transaction {
    pub fn new(amount: i64, counterparty: Option<&str>) -> Self {
        Self {
            amount: MinorUnits(amount),
            counterparty: counterparty.map(str::to_string),
        }
    }
}
