//! HTTP client for the document management service.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::Url;
use serde::de::DeserializeOwned;

use super::types::{DocumentDetail, DocumentPage, DocumentQuery};
use crate::config::DownstreamConfig;
use crate::delegation::{format_reqwest_error, DownstreamToken};
use crate::error::{FirmError, Result};
use crate::outcome::Outcome;

pub const LIST_DENIED: &str = "Access denied by the document management system.";
pub const DOCUMENT_DENIED: &str = "Access denied: you do not have access to this document.";

/// The downstream document service. Only ever sees exchanged tokens.
pub trait DocumentService: Send + Sync {
    fn search(&self, token: &DownstreamToken, query: &DocumentQuery) -> Result<Outcome<DocumentPage>>;

    fn get(&self, token: &DownstreamToken, document_id: u64) -> Result<Outcome<DocumentDetail>>;
}

pub struct HttpDocumentService {
    client: Client,
    base_url: String,
}

impl HttpDocumentService {
    pub fn new(config: &DownstreamConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| FirmError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn fetch<T: DeserializeOwned>(
        &self,
        token: &DownstreamToken,
        url: Url,
        denied: &str,
        missing: impl FnOnce() -> String,
    ) -> Result<Outcome<T>> {
        log::debug!("GET {}", url.path());
        let response = self
            .client
            .get(url)
            .header(AUTHORIZATION, token.authorization())
            .header(ACCEPT, "application/json")
            .send()
            .map_err(transport_error)?;

        let status = response.status();
        match status.as_u16() {
            403 => return Ok(Outcome::denied(denied)),
            404 => return Ok(Outcome::not_found(missing())),
            _ if !status.is_success() => {
                log::warn!("document service returned {status}");
                return Err(FirmError::Downstream {
                    message: format!("document service returned {status}"),
                    retryable: status.is_server_error(),
                });
            }
            _ => {}
        }

        let body = response.text().map_err(transport_error)?;
        let parsed = serde_json::from_str(&body).map_err(|e| FirmError::Downstream {
            message: format!("malformed document service response: {e}"),
            retryable: false,
        })?;
        Ok(Outcome::Ok(parsed))
    }
}

fn transport_error(e: reqwest::Error) -> FirmError {
    FirmError::Downstream {
        retryable: e.is_connect() || e.is_timeout(),
        message: format_reqwest_error(&e),
    }
}

impl DocumentService for HttpDocumentService {
    fn search(&self, token: &DownstreamToken, query: &DocumentQuery) -> Result<Outcome<DocumentPage>> {
        let url = Url::parse_with_params(&format!("{}/api/documents", self.base_url), query.params())
            .map_err(|e| FirmError::Config(format!("invalid document service url: {e}")))?;
        self.fetch(token, url, LIST_DENIED, || "Documents not found.".to_string())
    }

    fn get(&self, token: &DownstreamToken, document_id: u64) -> Result<Outcome<DocumentDetail>> {
        let url = Url::parse(&format!("{}/api/documents/{document_id}", self.base_url))
            .map_err(|e| FirmError::Config(format!("invalid document service url: {e}")))?;
        self.fetch(token, url, DOCUMENT_DENIED, || {
            format!("Document {document_id} not found.")
        })
    }
}
