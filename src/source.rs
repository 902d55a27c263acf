use std::fmt;

use async_trait::async_trait;
use thiserror::Error;

use crate::model::{Account, AccountId, Transaction, TransactionId};

/// A bearer token for one player.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn token(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(..)")
    }
}

/// Where the next page of transactions is read from.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum PageCursor {
    First(AccountId),
    Next(String),
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct TransactionPage {
    pub transactions: Vec<Transaction>,
    pub next: Option<PageCursor>,
}

/// The banking API the reconciliation reads from.
#[async_trait]
pub trait BankingApi {
    /// Every account visible to the credential, pagination already followed.
    async fn list_accounts(&self, credential: &Credential) -> Result<Vec<Account>, SourceError>;

    async fn transactions_page(
        &self,
        cursor: &PageCursor,
        credential: &Credential,
    ) -> Result<TransactionPage, SourceError>;
}

#[derive(Debug, Error, PartialEq, Clone)]
pub enum SourceError {
    #[error("The credential was rejected.")]
    Unauthorized,
    #[error("Unexpected response status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Request failed: {0}")]
    Transport(String),
    #[error("The response could not be decoded: {0}")]
    MalformedResponse(String),
    #[error("Transaction {transaction_id} is malformed: {reason}")]
    MalformedTransaction {
        transaction_id: TransactionId,
        reason: String,
    },
    #[error("Invalid url: {0}")]
    InvalidUrl(String),
}

/// A forward-only walk over one account's transaction pages.
/// Once the last page has been returned the walk is exhausted and cannot be
/// restarted.
pub struct TransactionPages<'a> {
    api: &'a (dyn BankingApi + Send + Sync),
    credential: &'a Credential,
    cursor: Option<PageCursor>,
}

impl<'a> TransactionPages<'a> {
    pub fn new(
        api: &'a (dyn BankingApi + Send + Sync),
        account_id: &str,
        credential: &'a Credential,
    ) -> Self {
        Self {
            api,
            credential,
            cursor: Some(PageCursor::First(account_id.to_string())),
        }
    }

    pub async fn next_page(&mut self) -> Result<Option<Vec<Transaction>>, SourceError> {
        let Some(cursor) = self.cursor.take() else {
            return Ok(None);
        };
        let page = self.api.transactions_page(&cursor, self.credential).await?;
        self.cursor = page.next;
        Ok(Some(page.transactions))
    }
}

#[cfg(test)]
pub(crate) mod mock {
    use std::{
        collections::HashMap,
        sync::{Arc, Mutex},
    };

    use async_trait::async_trait;

    use crate::model::{Account, AccountId, Transaction};

    use super::{BankingApi, Credential, PageCursor, SourceError, TransactionPage};

    /// Serves canned listings and splits each account's transactions into
    /// pages of `page_size`, recording every request it receives.
    pub(crate) struct MockBankingApi {
        accounts: HashMap<String, Result<Vec<Account>, SourceError>>,
        transactions: HashMap<AccountId, Result<Vec<Transaction>, SourceError>>,
        page_size: usize,
        pub(crate) requests: Arc<Mutex<Vec<(PageCursor, String)>>>,
    }

    impl MockBankingApi {
        pub(crate) fn new(page_size: usize) -> Self {
            Self {
                accounts: HashMap::new(),
                transactions: HashMap::new(),
                page_size,
                requests: Arc::new(Mutex::new(Vec::new())),
            }
        }

        pub(crate) fn with_accounts(
            mut self,
            token: &str,
            accounts: Result<Vec<Account>, SourceError>,
        ) -> Self {
            self.accounts.insert(token.to_string(), accounts);
            self
        }

        pub(crate) fn with_transactions(
            mut self,
            account_id: &str,
            transactions: Result<Vec<Transaction>, SourceError>,
        ) -> Self {
            self.transactions.insert(account_id.to_string(), transactions);
            self
        }

        fn page(&self, account_id: &str, offset: usize) -> Result<TransactionPage, SourceError> {
            let all = match self.transactions.get(account_id) {
                Some(transactions) => transactions.clone()?,
                None => Vec::new(),
            };
            let end = (offset + self.page_size).min(all.len());
            let next = (end < all.len()).then(|| PageCursor::Next(format!("{account_id}@{end}")));
            Ok(TransactionPage {
                transactions: all[offset.min(end)..end].to_vec(),
                next,
            })
        }
    }

    #[async_trait]
    impl BankingApi for MockBankingApi {
        async fn list_accounts(
            &self,
            credential: &Credential,
        ) -> Result<Vec<Account>, SourceError> {
            self.accounts
                .get(credential.token())
                .cloned()
                .unwrap_or(Err(SourceError::Unauthorized))
        }

        async fn transactions_page(
            &self,
            cursor: &PageCursor,
            credential: &Credential,
        ) -> Result<TransactionPage, SourceError> {
            self.requests
                .lock()
                .unwrap()
                .push((cursor.clone(), credential.token().to_string()));
            match cursor {
                PageCursor::First(account_id) => self.page(account_id, 0),
                PageCursor::Next(link) => {
                    let (account_id, offset) = link.split_once('@').unwrap();
                    self.page(account_id, offset.parse().unwrap())
                }
            }
        }
    }
}
