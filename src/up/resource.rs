//! JSON:API documents returned by the Up banking API.
//!
//! Only the fields the reconciliation reads are declared. Fields whose absence
//! means the record is malformed are kept optional here and checked by the
//! converter, so one bad record is reported by id instead of failing the
//! whole page's decoding.

use serde::Deserialize;

#[derive(Debug, Deserialize, PartialEq)]
pub struct Document<T> {
    pub data: Vec<T>,
    #[serde(default)]
    pub links: Links,
}

#[derive(Debug, Deserialize, PartialEq, Default)]
pub struct Links {
    pub next: Option<String>,
}

#[derive(Debug, Deserialize, PartialEq)]
pub struct AccountResource {
    pub id: String,
    pub attributes: AccountAttributes,
}

#[derive(Debug, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AccountAttributes {
    pub display_name: String,
    pub ownership_type: String,
}

#[derive(Debug, Deserialize, PartialEq)]
pub struct TransactionResource {
    pub id: String,
    pub attributes: Option<TransactionAttributes>,
    pub relationships: Option<TransactionRelationships>,
}

#[derive(Debug, Deserialize, PartialEq)]
pub struct TransactionAttributes {
    pub amount: Option<MoneyObject>,
}

#[derive(Debug, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MoneyObject {
    pub value_in_base_units: Option<i64>,
}

#[derive(Debug, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRelationships {
    pub transfer_account: Option<Relationship>,
}

/// `data` is null when the transaction has no counterparty account.
#[derive(Debug, Deserialize, PartialEq)]
pub struct Relationship {
    pub data: Option<ResourceIdentifier>,
}

#[derive(Debug, Deserialize, PartialEq)]
pub struct ResourceIdentifier {
    pub id: String,
}

/// Body of a non-success response.
#[derive(Debug, Deserialize)]
pub struct ErrorDocument {
    pub errors: Vec<ErrorObject>,
}

#[derive(Debug, Deserialize)]
pub struct ErrorObject {
    pub title: String,
    #[serde(default)]
    pub detail: String,
}
