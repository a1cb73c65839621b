// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Transaction service port.

use std::sync::Arc;

use alloy::primitives::{Address, Bytes, B256};
use async_trait::async_trait;
use url::Url;

use super::auth::AuthSession;
use crate::error::CollaboratorResult;
use crate::models::{
    AllTransactionsList, OwnerResponse, ProposeTransactionProps, SafeMultisigTransaction,
    SafeMultisigTransactionList, SignatureResponse,
};

/// Client for the service that stores pending multisig transactions and
/// collects owner signatures.
#[async_trait]
pub trait RelayApi: Send + Sync {
    async fn propose_transaction(&self, proposal: ProposeTransactionProps)
        -> CollaboratorResult<()>;

    async fn confirm_transaction(
        &self,
        safe_tx_hash: B256,
        signature: &Bytes,
    ) -> CollaboratorResult<SignatureResponse>;

    async fn get_pending_transactions(
        &self,
        safe_address: Address,
    ) -> CollaboratorResult<SafeMultisigTransactionList>;

    async fn get_all_transactions(
        &self,
        safe_address: Address,
    ) -> CollaboratorResult<AllTransactionsList>;

    async fn get_transaction(&self, safe_tx_hash: B256)
        -> CollaboratorResult<SafeMultisigTransaction>;

    async fn get_safes_by_owner(&self, owner: Address) -> CollaboratorResult<OwnerResponse>;
}

/// Builds a [`RelayApi`] client for a service URL and session.
pub trait RelayConnector: Send + Sync {
    fn connect(
        &self,
        service_url: &Url,
        session: Arc<dyn AuthSession>,
    ) -> CollaboratorResult<Arc<dyn RelayApi>>;
}
