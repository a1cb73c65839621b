// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Safe protocol kit port.
//!
//! Transaction construction, hashing, owner signatures, threshold checks,
//! execution and deployment all happen behind these traits.

use std::sync::Arc;

use alloy::primitives::{Address, B256};
use async_trait::async_trait;

use super::auth::AuthSession;
use crate::error::CollaboratorResult;
use crate::models::{
    SafeAccountConfig, SafeMultisigTransaction, SafeSignature, SafeTransaction,
    SafeTransactionDataPartial, TxReceipt,
};

/// An Ethereum transaction that has been broadcast but not yet mined.
#[async_trait]
pub trait PendingTransaction: Send + Sync {
    fn tx_hash(&self) -> B256;

    /// Wait for the transaction to be mined.
    async fn wait(&self) -> CollaboratorResult<TxReceipt>;
}

/// Outcome of [`SafeProtocol::execute_transaction`].
#[derive(Default)]
pub struct ExecutionResult {
    /// Absent when the kit did not broadcast anything it can track
    pub transaction_response: Option<Box<dyn PendingTransaction>>,
}

/// Protocol kit instance bound to one Safe and one signer.
#[async_trait]
pub trait SafeProtocol: Send + Sync {
    fn safe_address(&self) -> Address;

    async fn create_transaction(
        &self,
        data: SafeTransactionDataPartial,
    ) -> CollaboratorResult<SafeTransaction>;

    async fn get_transaction_hash(&self, transaction: &SafeTransaction) -> CollaboratorResult<B256>;

    async fn sign_transaction_hash(&self, safe_tx_hash: B256) -> CollaboratorResult<SafeSignature>;

    /// Whether the transaction can be executed (threshold met, nonce current).
    async fn is_valid_transaction(
        &self,
        transaction: &SafeMultisigTransaction,
    ) -> CollaboratorResult<bool>;

    async fn execute_transaction(
        &self,
        transaction: &SafeMultisigTransaction,
    ) -> CollaboratorResult<ExecutionResult>;
}

/// Creates protocol kit instances and deploys new Safes.
#[async_trait]
pub trait ProtocolConnector: Send + Sync {
    /// Bind a protocol kit instance to `safe_address` using the session signer.
    async fn connect(
        &self,
        session: Arc<dyn AuthSession>,
        safe_address: Address,
    ) -> CollaboratorResult<Arc<dyn SafeProtocol>>;

    /// Deploy a new Safe and return its address.
    async fn deploy_safe(
        &self,
        session: Arc<dyn AuthSession>,
        config: SafeAccountConfig,
    ) -> CollaboratorResult<Address>;
}
