// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Safe Transaction Service HTTP client.
//!
//! Implements [`RelayApi`] against the public transaction service REST API.
//! Addresses are sent checksummed, as the service requires.

use std::{sync::Arc, time::Duration};

use alloy::primitives::{Address, Bytes, B256};
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;
use url::Url;

use super::auth::AuthSession;
use super::relay::{RelayApi, RelayConnector};
use crate::config::{env_optional, TX_SERVICE_TIMEOUT_ENV};
use crate::error::{CollaboratorError, CollaboratorResult, PluginError, PluginResult};
use crate::models::{
    AllTransactionsList, OwnerResponse, ProposeTransactionProps, SafeInfo,
    SafeMultisigTransaction, SafeMultisigTransactionList, SafeTransactionData, SignatureResponse,
};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Longest error body echoed into [`CollaboratorError::Relay`].
const MAX_ERROR_BODY: usize = 512;

/// Body of `POST /api/v1/safes/{safe}/multisig-transactions/`.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ProposalBody<'a> {
    #[serde(flatten)]
    data: &'a SafeTransactionData,
    contract_transaction_hash: B256,
    sender: String,
    signature: &'a Bytes,
    #[serde(skip_serializing_if = "Option::is_none")]
    origin: Option<&'a str>,
}

#[derive(Serialize)]
struct ConfirmationBody<'a> {
    signature: &'a Bytes,
}

/// Transaction service client bound to one base URL.
#[derive(Debug, Clone)]
pub struct TxServiceClient {
    base_url: Url,
    http: Client,
}

impl TxServiceClient {
    /// Create a client with its own HTTP connection pool.
    pub fn new(base_url: Url, timeout: Duration) -> CollaboratorResult<Self> {
        let http = build_http_client(timeout)?;
        Ok(Self::with_http(base_url, http))
    }

    /// Create a client that shares an existing HTTP connection pool.
    pub fn with_http(mut base_url: Url, http: Client) -> Self {
        // Relative joins replace the last segment unless the path ends in '/'
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Self { base_url, http }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Current nonce, threshold and owners of a Safe.
    pub async fn get_safe_info(&self, safe_address: Address) -> CollaboratorResult<SafeInfo> {
        let url = self.endpoint(&format!("api/v1/safes/{}/", checksum(safe_address)))?;
        self.get_json(url).await
    }

    fn endpoint(&self, path: &str) -> CollaboratorResult<Url> {
        self.base_url
            .join(path)
            .map_err(|e| CollaboratorError::Transport(format!("invalid endpoint {path}: {e}")))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> CollaboratorResult<T> {
        debug!(%url, "GET transaction service");
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| CollaboratorError::Transport(e.to_string()))?;
        decode_json(ensure_success(response).await?).await
    }

    async fn post_json<B: Serialize + ?Sized>(
        &self,
        url: Url,
        body: &B,
    ) -> CollaboratorResult<Response> {
        debug!(%url, "POST transaction service");
        let response = self
            .http
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| CollaboratorError::Transport(e.to_string()))?;
        ensure_success(response).await
    }
}

#[async_trait]
impl RelayApi for TxServiceClient {
    async fn propose_transaction(
        &self,
        proposal: ProposeTransactionProps,
    ) -> CollaboratorResult<()> {
        let url = self.endpoint(&format!(
            "api/v1/safes/{}/multisig-transactions/",
            checksum(proposal.safe_address)
        ))?;
        let body = ProposalBody {
            data: &proposal.safe_transaction_data,
            contract_transaction_hash: proposal.safe_tx_hash,
            sender: checksum(proposal.sender_address),
            signature: &proposal.sender_signature,
            origin: proposal.origin.as_deref(),
        };
        self.post_json(url, &body).await?;
        Ok(())
    }

    async fn confirm_transaction(
        &self,
        safe_tx_hash: B256,
        signature: &Bytes,
    ) -> CollaboratorResult<SignatureResponse> {
        let url = self.endpoint(&format!(
            "api/v1/multisig-transactions/{}/confirmations/",
            alloy::hex::encode_prefixed(safe_tx_hash)
        ))?;
        let response = self
            .post_json(url, &ConfirmationBody { signature })
            .await?;
        decode_json(response).await
    }

    async fn get_pending_transactions(
        &self,
        safe_address: Address,
    ) -> CollaboratorResult<SafeMultisigTransactionList> {
        let nonce = self.get_safe_info(safe_address).await?.nonce;
        let mut url = self.endpoint(&format!(
            "api/v1/safes/{}/multisig-transactions/",
            checksum(safe_address)
        ))?;
        url.query_pairs_mut()
            .append_pair("executed", "false")
            .append_pair("nonce__gte", &nonce.to_string());
        self.get_json(url).await
    }

    async fn get_all_transactions(
        &self,
        safe_address: Address,
    ) -> CollaboratorResult<AllTransactionsList> {
        let mut url = self.endpoint(&format!(
            "api/v1/safes/{}/all-transactions/",
            checksum(safe_address)
        ))?;
        url.query_pairs_mut()
            .append_pair("trusted", "true")
            .append_pair("queued", "true")
            .append_pair("executed", "false");
        self.get_json(url).await
    }

    async fn get_transaction(
        &self,
        safe_tx_hash: B256,
    ) -> CollaboratorResult<SafeMultisigTransaction> {
        let url = self.endpoint(&format!(
            "api/v1/multisig-transactions/{}/",
            alloy::hex::encode_prefixed(safe_tx_hash)
        ))?;
        self.get_json(url).await
    }

    async fn get_safes_by_owner(&self, owner: Address) -> CollaboratorResult<OwnerResponse> {
        let url = self.endpoint(&format!("api/v1/owners/{}/safes/", checksum(owner)))?;
        self.get_json(url).await
    }
}

/// [`RelayConnector`] producing [`TxServiceClient`]s that share one HTTP pool.
#[derive(Debug, Clone)]
pub struct TxServiceConnector {
    http: Client,
}

impl TxServiceConnector {
    pub fn new(timeout: Duration) -> CollaboratorResult<Self> {
        Ok(Self {
            http: build_http_client(timeout)?,
        })
    }

    /// Read the request timeout from `SAFE_TX_SERVICE_TIMEOUT_SECS`.
    ///
    /// The value must be a whole number of seconds greater than zero.
    pub fn from_env() -> PluginResult<Self> {
        let timeout = match env_optional(TX_SERVICE_TIMEOUT_ENV) {
            Some(raw) => parse_timeout(&raw)?,
            None => DEFAULT_TIMEOUT,
        };
        Ok(Self::new(timeout)?)
    }
}

impl RelayConnector for TxServiceConnector {
    fn connect(
        &self,
        service_url: &Url,
        _session: Arc<dyn AuthSession>,
    ) -> CollaboratorResult<Arc<dyn RelayApi>> {
        Ok(Arc::new(TxServiceClient::with_http(
            service_url.clone(),
            self.http.clone(),
        )))
    }
}

fn parse_timeout(raw: &str) -> PluginResult<Duration> {
    match raw.parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(PluginError::InvalidConfig(format!(
            "{TX_SERVICE_TIMEOUT_ENV} must be a positive number of seconds, got `{raw}`"
        ))),
    }
}

fn build_http_client(timeout: Duration) -> CollaboratorResult<Client> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| CollaboratorError::Transport(format!("failed to build HTTP client: {e}")))
}

fn checksum(address: Address) -> String {
    address.to_checksum(None)
}

async fn ensure_success(response: Response) -> CollaboratorResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let mut message = body.trim().to_string();
    if message.is_empty() {
        message = status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string();
    }
    if message.len() > MAX_ERROR_BODY {
        let mut cut = MAX_ERROR_BODY;
        while !message.is_char_boundary(cut) {
            cut -= 1;
        }
        message.truncate(cut);
    }

    Err(CollaboratorError::Relay {
        status: status.as_u16(),
        message,
    })
}

async fn decode_json<T: DeserializeOwned>(response: Response) -> CollaboratorResult<T> {
    let bytes = response
        .bytes()
        .await
        .map_err(|e| CollaboratorError::Transport(e.to_string()))?;
    serde_json::from_slice(&bytes).map_err(|e| CollaboratorError::InvalidResponse(e.to_string()))
}
