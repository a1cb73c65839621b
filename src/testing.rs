// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Recording fakes for the collaborator ports.
//!
//! Each fake counts its calls and captures arguments so tests can assert on
//! what the plugin delegated. Results are scripted through public fields.

use std::env;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use alloy::primitives::{Address, Bytes, B256, U256};
use async_trait::async_trait;
use tokio::sync::Notify;
use url::Url;

use crate::error::{CollaboratorError, CollaboratorResult};
use crate::models::{
    AllTransactionsList, ListResponse, OwnerResponse, ProposeTransactionProps,
    SafeAccountConfig, SafeMultisigTransaction, SafeMultisigTransactionList, SafeSignature,
    SafeTransaction, SafeTransactionData, SafeTransactionDataPartial, SignatureResponse,
    TxReceipt,
};
use crate::providers::{
    AuthConnector, AuthProvider, AuthProviderConfig, AuthSession, AuthSignIn, Collaborators,
    ExecutionResult, PendingTransaction, ProtocolConnector, RelayApi, RelayConnector,
    SafeProtocol, SignInInfo, UserInfo, PRIVATE_KEY_METHOD,
};

pub const SAFE_TX_HASH: B256 = B256::repeat_byte(0x11);
pub const EXECUTION_TX_HASH: B256 = B256::repeat_byte(0x22);
pub const DEPLOYED_SAFE: Address = Address::repeat_byte(0xd0);
pub const PRIVATE_KEY: &str = "4c0883a69102937d6231471b5dbb6204fe512961708279f2e3e8a5d4b8e3e2a1";

/// Serialises tests that touch process environment variables.
static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Exclusive view of a set of environment variables.
///
/// The variables are cleared on creation and again on drop, so every test
/// starts from an empty slate even when a previous one panicked.
pub struct ScopedEnv {
    names: &'static [&'static str],
    _guard: MutexGuard<'static, ()>,
}

impl ScopedEnv {
    pub fn new(names: &'static [&'static str]) -> Self {
        let guard = ENV_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
        for name in names {
            env::remove_var(name);
        }
        Self {
            names,
            _guard: guard,
        }
    }

    pub fn set(&self, name: &str, value: &str) {
        assert!(self.names.contains(&name), "{name} is not scoped");
        env::set_var(name, value);
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        for name in self.names {
            env::remove_var(name);
        }
    }
}

pub fn addr(byte: u8) -> Address {
    Address::repeat_byte(byte)
}

pub fn signature_bytes() -> Bytes {
    Bytes::from(vec![0xab; 65])
}

fn count(counter: &AtomicUsize) {
    counter.fetch_add(1, Ordering::SeqCst);
}

// =============================================================================
// Auth
// =============================================================================

pub struct FakeSession {
    pub eoa: Address,
    pub private_key: Mutex<serde_json::Value>,
    pub requests: Mutex<Vec<String>>,
}

impl FakeSession {
    pub fn new(eoa: Address) -> Self {
        Self {
            eoa,
            private_key: Mutex::new(serde_json::Value::String(PRIVATE_KEY.to_string())),
            requests: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl AuthSession for FakeSession {
    async fn address(&self) -> CollaboratorResult<Address> {
        Ok(self.eoa)
    }

    async fn request(&self, method: &str) -> CollaboratorResult<serde_json::Value> {
        self.requests.lock().unwrap().push(method.to_string());
        if method == PRIVATE_KEY_METHOD {
            Ok(self.private_key.lock().unwrap().clone())
        } else {
            Err(CollaboratorError::Auth(format!("unsupported method {method}")))
        }
    }
}

pub struct FakeAuthProvider {
    pub session: Arc<FakeSession>,
    pub safes: Mutex<Vec<Address>>,
    pub sign_in_error: Mutex<Option<CollaboratorError>>,
    pub init_urls: Mutex<Vec<Url>>,
    pub sign_in_calls: AtomicUsize,
    pub sign_out_calls: AtomicUsize,
}

impl FakeAuthProvider {
    pub fn new(eoa: Address, safes: Vec<Address>) -> Self {
        Self {
            session: Arc::new(FakeSession::new(eoa)),
            safes: Mutex::new(safes),
            sign_in_error: Mutex::new(None),
            init_urls: Mutex::new(Vec::new()),
            sign_in_calls: AtomicUsize::new(0),
            sign_out_calls: AtomicUsize::new(0),
        }
    }

    fn user_info_sample() -> UserInfo {
        UserInfo {
            email: Some("owner@example.org".to_string()),
            name: Some("Safe Owner".to_string()),
            type_of_login: Some("google".to_string()),
            ..UserInfo::default()
        }
    }
}

#[async_trait]
impl AuthProvider for FakeAuthProvider {
    async fn init(&self, tx_service_url: &Url) -> CollaboratorResult<()> {
        self.init_urls.lock().unwrap().push(tx_service_url.clone());
        Ok(())
    }

    async fn sign_in(&self) -> CollaboratorResult<AuthSignIn> {
        count(&self.sign_in_calls);
        if let Some(err) = self.sign_in_error.lock().unwrap().clone() {
            return Err(err);
        }
        Ok(AuthSignIn {
            session: self.session.clone(),
            info: SignInInfo {
                eoa: self.session.eoa,
                safes: self.safes.lock().unwrap().clone(),
                user_info: Some(Self::user_info_sample()),
            },
        })
    }

    async fn sign_out(&self) -> CollaboratorResult<()> {
        count(&self.sign_out_calls);
        Ok(())
    }

    async fn user_info(&self) -> CollaboratorResult<UserInfo> {
        Ok(Self::user_info_sample())
    }
}

pub struct FakeAuthConnector {
    pub provider: Arc<FakeAuthProvider>,
    pub configured: Mutex<Vec<AuthProviderConfig>>,
}

impl AuthConnector for FakeAuthConnector {
    fn configure(&self, config: AuthProviderConfig) -> CollaboratorResult<Arc<dyn AuthProvider>> {
        self.configured.lock().unwrap().push(config);
        Ok(self.provider.clone() as Arc<dyn AuthProvider>)
    }
}

// =============================================================================
// Protocol
// =============================================================================

pub struct FakePending {
    receipt: TxReceipt,
}

#[async_trait]
impl PendingTransaction for FakePending {
    fn tx_hash(&self) -> B256 {
        self.receipt.tx_hash
    }

    async fn wait(&self) -> CollaboratorResult<TxReceipt> {
        Ok(self.receipt.clone())
    }
}

pub struct FakeSafeProtocol {
    pub safe: Address,
    pub signer: Address,
    pub valid: AtomicBool,
    /// `None` makes execution report no transaction response
    pub receipt: Mutex<Option<TxReceipt>>,
    pub created: Mutex<Vec<SafeTransactionDataPartial>>,
    pub signed: Mutex<Vec<B256>>,
    pub validated: Mutex<Vec<B256>>,
    pub execute_calls: AtomicUsize,
}

impl FakeSafeProtocol {
    pub fn new(safe: Address, signer: Address) -> Self {
        Self {
            safe,
            signer,
            valid: AtomicBool::new(true),
            receipt: Mutex::new(Some(TxReceipt {
                tx_hash: EXECUTION_TX_HASH,
                block_number: 8_600_000,
                gas_used: 84_000,
                success: true,
            })),
            created: Mutex::new(Vec::new()),
            signed: Mutex::new(Vec::new()),
            validated: Mutex::new(Vec::new()),
            execute_calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl SafeProtocol for FakeSafeProtocol {
    fn safe_address(&self) -> Address {
        self.safe
    }

    async fn create_transaction(
        &self,
        data: SafeTransactionDataPartial,
    ) -> CollaboratorResult<SafeTransaction> {
        self.created.lock().unwrap().push(data.clone());
        Ok(SafeTransaction {
            data: SafeTransactionData {
                to: data.to,
                value: data.value,
                data: data.data,
                operation: data.operation.unwrap_or_default(),
                safe_tx_gas: U256::ZERO,
                base_gas: U256::ZERO,
                gas_price: U256::ZERO,
                gas_token: Address::ZERO,
                refund_receiver: Address::ZERO,
                nonce: data.nonce.unwrap_or(3),
            },
            signatures: Vec::new(),
        })
    }

    async fn get_transaction_hash(&self, _transaction: &SafeTransaction) -> CollaboratorResult<B256> {
        Ok(SAFE_TX_HASH)
    }

    async fn sign_transaction_hash(&self, safe_tx_hash: B256) -> CollaboratorResult<SafeSignature> {
        self.signed.lock().unwrap().push(safe_tx_hash);
        Ok(SafeSignature {
            signer: self.signer,
            data: signature_bytes(),
        })
    }

    async fn is_valid_transaction(
        &self,
        transaction: &SafeMultisigTransaction,
    ) -> CollaboratorResult<bool> {
        self.validated.lock().unwrap().push(transaction.safe_tx_hash);
        Ok(self.valid.load(Ordering::SeqCst))
    }

    async fn execute_transaction(
        &self,
        _transaction: &SafeMultisigTransaction,
    ) -> CollaboratorResult<ExecutionResult> {
        count(&self.execute_calls);
        let transaction_response = self
            .receipt
            .lock()
            .unwrap()
            .clone()
            .map(|receipt| Box::new(FakePending { receipt }) as Box<dyn PendingTransaction>);
        Ok(ExecutionResult {
            transaction_response,
        })
    }
}

pub struct FakeProtocolConnector {
    pub kit: Arc<FakeSafeProtocol>,
    pub connected: Mutex<Vec<Address>>,
    pub deployed: Mutex<Vec<SafeAccountConfig>>,
    pub deploy_calls: AtomicUsize,
}

#[async_trait]
impl ProtocolConnector for FakeProtocolConnector {
    async fn connect(
        &self,
        _session: Arc<dyn AuthSession>,
        safe_address: Address,
    ) -> CollaboratorResult<Arc<dyn SafeProtocol>> {
        self.connected.lock().unwrap().push(safe_address);
        Ok(self.kit.clone() as Arc<dyn SafeProtocol>)
    }

    async fn deploy_safe(
        &self,
        _session: Arc<dyn AuthSession>,
        config: SafeAccountConfig,
    ) -> CollaboratorResult<Address> {
        count(&self.deploy_calls);
        self.deployed.lock().unwrap().push(config);
        Ok(DEPLOYED_SAFE)
    }
}

// =============================================================================
// Relay
// =============================================================================

/// Pauses `get_safes_by_owner` until released.
pub struct OwnerLookupGate {
    pub entered: Notify,
    pub release: Notify,
}

pub struct FakeRelay {
    pub owned: Mutex<Vec<Address>>,
    pub record: Mutex<Option<SafeMultisigTransaction>>,
    pub proposals: Mutex<Vec<ProposeTransactionProps>>,
    pub confirmations: Mutex<Vec<(B256, Bytes)>>,
    pub owner_queries: Mutex<Vec<Address>>,
    pub pending_queries: Mutex<Vec<Address>>,
    pub all_queries: Mutex<Vec<Address>>,
    pub owner_gate: Mutex<Option<Arc<OwnerLookupGate>>>,
}

impl FakeRelay {
    pub fn new(owned: Vec<Address>) -> Self {
        Self {
            owned: Mutex::new(owned),
            record: Mutex::new(None),
            proposals: Mutex::new(Vec::new()),
            confirmations: Mutex::new(Vec::new()),
            owner_queries: Mutex::new(Vec::new()),
            pending_queries: Mutex::new(Vec::new()),
            all_queries: Mutex::new(Vec::new()),
            owner_gate: Mutex::new(None),
        }
    }

    fn not_found() -> CollaboratorError {
        CollaboratorError::Relay {
            status: 404,
            message: "No MultisigTransaction matches the given query.".to_string(),
        }
    }
}

#[async_trait]
impl RelayApi for FakeRelay {
    async fn propose_transaction(
        &self,
        proposal: ProposeTransactionProps,
    ) -> CollaboratorResult<()> {
        self.proposals.lock().unwrap().push(proposal);
        Ok(())
    }

    async fn confirm_transaction(
        &self,
        safe_tx_hash: B256,
        signature: &Bytes,
    ) -> CollaboratorResult<SignatureResponse> {
        self.confirmations
            .lock()
            .unwrap()
            .push((safe_tx_hash, signature.clone()));
        Ok(SignatureResponse {
            signature: signature.clone(),
        })
    }

    async fn get_pending_transactions(
        &self,
        safe_address: Address,
    ) -> CollaboratorResult<SafeMultisigTransactionList> {
        self.pending_queries.lock().unwrap().push(safe_address);
        let results: Vec<_> = self.record.lock().unwrap().iter().cloned().collect();
        Ok(ListResponse {
            count: results.len() as u64,
            next: None,
            previous: None,
            results,
        })
    }

    async fn get_all_transactions(
        &self,
        safe_address: Address,
    ) -> CollaboratorResult<AllTransactionsList> {
        self.all_queries.lock().unwrap().push(safe_address);
        Ok(ListResponse {
            count: 1,
            next: None,
            previous: None,
            results: vec![serde_json::json!({
                "txType": "ETHEREUM_TRANSACTION",
                "txHash": EXECUTION_TX_HASH.to_string(),
            })],
        })
    }

    async fn get_transaction(
        &self,
        safe_tx_hash: B256,
    ) -> CollaboratorResult<SafeMultisigTransaction> {
        self.record
            .lock()
            .unwrap()
            .clone()
            .filter(|record| record.safe_tx_hash == safe_tx_hash)
            .ok_or_else(Self::not_found)
    }

    async fn get_safes_by_owner(&self, owner: Address) -> CollaboratorResult<OwnerResponse> {
        self.owner_queries.lock().unwrap().push(owner);
        let gate = self.owner_gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.entered.notify_one();
            gate.release.notified().await;
        }
        Ok(OwnerResponse {
            safes: self.owned.lock().unwrap().clone(),
        })
    }
}

pub struct FakeRelayConnector {
    pub api: Arc<FakeRelay>,
    pub service_urls: Mutex<Vec<Url>>,
}

impl RelayConnector for FakeRelayConnector {
    fn connect(
        &self,
        service_url: &Url,
        _session: Arc<dyn AuthSession>,
    ) -> CollaboratorResult<Arc<dyn RelayApi>> {
        self.service_urls.lock().unwrap().push(service_url.clone());
        Ok(self.api.clone() as Arc<dyn RelayApi>)
    }
}

// =============================================================================
// Harness
// =============================================================================

/// All three fakes wired together.
///
/// The auth provider and the relay report the same owned Safes unless a test
/// changes one of them.
pub struct Harness {
    pub auth: Arc<FakeAuthConnector>,
    pub protocol: Arc<FakeProtocolConnector>,
    pub relay: Arc<FakeRelayConnector>,
}

impl Harness {
    pub fn new(eoa: Address, safes: Vec<Address>) -> Self {
        let provider = Arc::new(FakeAuthProvider::new(eoa, safes.clone()));
        let kit_safe = safes.first().copied().unwrap_or(Address::ZERO);
        Self {
            auth: Arc::new(FakeAuthConnector {
                provider,
                configured: Mutex::new(Vec::new()),
            }),
            protocol: Arc::new(FakeProtocolConnector {
                kit: Arc::new(FakeSafeProtocol::new(kit_safe, eoa)),
                connected: Mutex::new(Vec::new()),
                deployed: Mutex::new(Vec::new()),
                deploy_calls: AtomicUsize::new(0),
            }),
            relay: Arc::new(FakeRelayConnector {
                api: Arc::new(FakeRelay::new(safes)),
                service_urls: Mutex::new(Vec::new()),
            }),
        }
    }

    pub fn collaborators(&self) -> Collaborators {
        Collaborators::new(self.auth.clone(), self.protocol.clone(), self.relay.clone())
    }

    pub fn provider(&self) -> &FakeAuthProvider {
        &self.auth.provider
    }

    pub fn kit(&self) -> &FakeSafeProtocol {
        &self.protocol.kit
    }

    pub fn relay_api(&self) -> &FakeRelay {
        &self.relay.api
    }

    /// Make the relay return a stored record for [`SAFE_TX_HASH`].
    pub fn store_record(&self, safe: Address) {
        let record: SafeMultisigTransaction = serde_json::from_value(serde_json::json!({
            "safe": safe,
            "to": addr(0xbe),
            "value": "5000000000000000",
            "data": null,
            "operation": 0,
            "safeTxGas": "0",
            "baseGas": "0",
            "gasPrice": "0",
            "nonce": 3,
            "submissionDate": "2023-03-01T10:00:00Z",
            "safeTxHash": SAFE_TX_HASH,
            "isExecuted": false,
            "confirmationsRequired": 2,
            "confirmations": []
        }))
        .unwrap();
        *self.relay_api().record.lock().unwrap() = Some(record);
    }
}
