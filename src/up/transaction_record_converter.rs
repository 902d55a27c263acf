use crate::{
    model::{Account, OwnershipType, Transaction},
    source::SourceError,
};

use super::resource::{AccountResource, TransactionResource};

pub(super) fn to_account(resource: AccountResource) -> Account {
    let AccountResource { id, attributes } = resource;
    Account {
        id,
        ownership_type: OwnershipType::from_tag(&attributes.ownership_type),
        display_name: attributes.display_name,
    }
}

pub(super) fn to_transaction(resource: TransactionResource) -> Result<Transaction, SourceError> {
    let TransactionResource {
        id,
        attributes,
        relationships,
    } = resource;
    let malformed = |reason: &str| SourceError::MalformedTransaction {
        transaction_id: id.clone(),
        reason: reason.to_string(),
    };

    let amount = match attributes
        .and_then(|attributes| attributes.amount)
        .and_then(|amount| amount.value_in_base_units)
    {
        Some(amount) => amount,
        None => return Err(malformed("amount not found")),
    };
    let transfer_account = match relationships.and_then(|r| r.transfer_account) {
        Some(relationship) => relationship,
        None => return Err(malformed("transferAccount relationship not found")),
    };

    Ok(Transaction {
        amount: amount.into(),
        counterparty: transfer_account.data.map(|data| data.id),
    })
}
