mod resource;
mod transaction_record_converter;

use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;

use crate::{
    model::{Account, Transaction},
    source::{BankingApi, Credential, PageCursor, SourceError, TransactionPage},
};

use resource::{AccountResource, Document, ErrorDocument, TransactionResource};
use transaction_record_converter::{to_account, to_transaction};

pub const DEFAULT_BASE_URL: &str = "https://api.up.com.au/api/v1";

/// [`BankingApi`] over the Up banking REST API.
#[derive(Debug, Clone)]
pub struct UpClient {
    base_url: Url,
    page_size: u32,
    http: reqwest::Client,
}

impl UpClient {
    pub fn new(base_url: &str, page_size: u32) -> Result<Self, SourceError> {
        // `Url::join` drops the last segment unless the base ends with '/'.
        let base_url = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{base_url}/")
        };
        let base_url =
            Url::parse(&base_url).map_err(|err| SourceError::InvalidUrl(err.to_string()))?;
        Ok(Self {
            base_url,
            page_size,
            http: reqwest::Client::new(),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, SourceError> {
        let mut url = self
            .base_url
            .join(path)
            .map_err(|err| SourceError::InvalidUrl(err.to_string()))?;
        url.query_pairs_mut()
            .append_pair("page[size]", &self.page_size.to_string());
        Ok(url)
    }

    async fn get<T: DeserializeOwned>(
        &self,
        url: Url,
        credential: &Credential,
    ) -> Result<T, SourceError> {
        tracing::debug!(%url, "GET");
        let res = self
            .http
            .get(url)
            .bearer_auth(credential.token())
            .send()
            .await
            .map_err(|err| SourceError::Transport(err.to_string()))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|err| SourceError::Transport(err.to_string()))?;

        if status.is_success() {
            return serde_json::from_str(&body)
                .map_err(|err| SourceError::MalformedResponse(err.to_string()));
        }

        Err(match status {
            StatusCode::UNAUTHORIZED => SourceError::Unauthorized,
            _ => SourceError::Status {
                status: status.as_u16(),
                body: error_summary(&body),
            },
        })
    }
}

fn error_summary(body: &str) -> String {
    match serde_json::from_str::<ErrorDocument>(body) {
        Ok(document) if !document.errors.is_empty() => document
            .errors
            .iter()
            .map(|err| format!("{}: {}", err.title, err.detail))
            .collect::<Vec<_>>()
            .join("; "),
        _ => "unknown error".to_string(),
    }
}

fn parse_link(link: &str) -> Result<Url, SourceError> {
    Url::parse(link).map_err(|err| SourceError::InvalidUrl(err.to_string()))
}

#[async_trait]
impl BankingApi for UpClient {
    async fn list_accounts(&self, credential: &Credential) -> Result<Vec<Account>, SourceError> {
        let mut accounts = Vec::new();
        let mut url = Some(self.endpoint("accounts")?);
        while let Some(current) = url.take() {
            let document: Document<AccountResource> = self.get(current, credential).await?;
            accounts.extend(document.data.into_iter().map(to_account));
            url = document.links.next.as_deref().map(parse_link).transpose()?;
        }
        Ok(accounts)
    }

    async fn transactions_page(
        &self,
        cursor: &PageCursor,
        credential: &Credential,
    ) -> Result<TransactionPage, SourceError> {
        let url = match cursor {
            PageCursor::First(account_id) => {
                self.endpoint(&format!("accounts/{account_id}/transactions"))?
            }
            PageCursor::Next(link) => parse_link(link)?,
        };
        let document: Document<TransactionResource> = self.get(url, credential).await?;
        let transactions = document
            .data
            .into_iter()
            .map(to_transaction)
            .collect::<Result<Vec<Transaction>, SourceError>>()?;
        Ok(TransactionPage {
            transactions,
            next: document.links.next.map(PageCursor::Next),
        })
    }
}
