// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Safe Plugin Facade
//!
//! [`SafePlugin`] owns the session state and turns each wallet action into a
//! single call: it checks preconditions, then delegates to the auth provider,
//! the protocol kit and the transaction service.
//!
//! ## Usage
//!
//! ```rust,ignore
//! let plugin = Arc::new(SafePlugin::new(options, collaborators)?);
//! plugin.init_session().await?;
//! let signed_in = plugin.sign_in().await?;
//!
//! let created = plugin.create_transaction(destination, "0.005").await?;
//! plugin
//!     .propose_transaction(created.safe_tx_hash, &created.transaction)
//!     .await?;
//! ```
//!
//! ## Concurrency
//!
//! The plugin is `Send + Sync` and meant to be shared behind an `Arc`.
//! `init_session`, `sign_in` and `sign_out` are serialized by a session gate.
//! Other operations snapshot the session under a short read lock and never
//! hold a lock across collaborator I/O.

use std::sync::Arc;

use alloy::primitives::{Address, B256};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::blockchain::{format_amount, parse_ether, SelectedNetwork, NATIVE_DECIMALS};
use crate::cache::ProtocolCache;
use crate::config::{resolve_login_methods, LoginMethod, PluginOptions};
use crate::error::{CollaboratorError, PluginError, PluginResult};
use crate::models::{
    AllTransactionsList, CreatedTransaction, PrivateKey, ProposeTransactionProps,
    SafeAccountConfig, SafeMultisigTransaction, SafeMultisigTransactionList, SafeTransaction,
    SafeTransactionDataPartial, SignatureResponse, TxReceipt,
};
use crate::providers::auth::{ChainConfig, OpenloginSettings, UiConfig, EIP155_NAMESPACE};
use crate::providers::{
    AuthProvider, AuthProviderConfig, AuthSession, Collaborators, ProtocolConnector, RelayApi,
    RelayConnector, SafeProtocol, SignInInfo, UserInfo, PRIVATE_KEY_METHOD,
};
use crate::state::{ConnectedSafe, PluginState, SessionState};

/// Wallet session facade over the auth provider, protocol kit and
/// transaction service.
pub struct SafePlugin {
    id: Uuid,
    options: PluginOptions,
    network: SelectedNetwork,
    login_methods: Vec<LoginMethod>,
    auth: Arc<dyn AuthProvider>,
    protocol: Arc<dyn ProtocolConnector>,
    relay: Arc<dyn RelayConnector>,
    state: RwLock<SessionState>,
    session_gate: Mutex<()>,
    kits: ProtocolCache,
}

impl SafePlugin {
    /// Validate `options` and configure the auth provider.
    ///
    /// Fails before touching any collaborator when the network is unknown,
    /// the login-method list is empty or names an unknown method, or the
    /// client ID is blank. Performs no network I/O.
    pub fn new(options: PluginOptions, collaborators: Collaborators) -> PluginResult<Self> {
        let network = SelectedNetwork::resolve(&options.network, options.custom_rpc_url.as_deref())?;
        let login_methods = resolve_login_methods(&options.login_methods)?;

        if options.auth_client_id.trim().is_empty() {
            return Err(PluginError::MissingConfig(
                "auth provider client ID is empty".to_string(),
            ));
        }

        let auth = collaborators
            .auth
            .configure(auth_provider_config(&options, &network, &login_methods))?;

        let id = Uuid::new_v4();
        info!(
            plugin = %id,
            network = network.id(),
            chain_id = network.chain_id(),
            custom_rpc = network.rpc_url().is_some(),
            login_methods = login_methods.len(),
            "Safe plugin configured"
        );

        Ok(Self {
            id,
            options,
            network,
            login_methods,
            auth,
            protocol: collaborators.protocol,
            relay: collaborators.relay,
            state: RwLock::new(SessionState::default()),
            session_gate: Mutex::new(()),
            kits: ProtocolCache::default(),
        })
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Instance ID recorded on every log event of this plugin.
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn options(&self) -> &PluginOptions {
        &self.options
    }

    pub fn network(&self) -> &SelectedNetwork {
        &self.network
    }

    /// Login methods in modal display order.
    pub fn login_methods(&self) -> &[LoginMethod] {
        &self.login_methods
    }

    pub async fn state(&self) -> PluginState {
        self.state.read().await.phase()
    }

    /// Sign-in result of the live session, if any.
    pub async fn sign_in_info(&self) -> Option<SignInInfo> {
        self.state.read().await.sign_in_info().cloned()
    }

    // =========================================================================
    // Session Lifecycle
    // =========================================================================

    /// Bind the auth provider to the selected network's transaction service.
    pub async fn init_session(&self) -> PluginResult<()> {
        let _gate = self.session_gate.lock().await;

        self.auth.init(self.network.tx_service_url()).await?;
        self.state.write().await.mark_initialized();

        info!(
            plugin = %self.id,
            tx_service = %self.network.tx_service_url(),
            "Session initialised"
        );
        Ok(())
    }

    /// Run the login flow and select the first owned Safe, if any.
    pub async fn sign_in(&self) -> PluginResult<SignInInfo> {
        let _gate = self.session_gate.lock().await;

        if !self.state.read().await.is_initialized() {
            return Err(PluginError::NotInitialized);
        }

        let signed_in = self.auth.sign_in().await?;
        let info = signed_in.info.clone();

        let connected = {
            let mut state = self.state.write().await;
            state.begin_session(signed_in);
            state.connected_safe()
        };
        self.kits.clear();

        info!(
            plugin = %self.id,
            owner = %info.eoa,
            safes = info.safes.len(),
            safe = ?connected,
            "Signed in"
        );
        Ok(info)
    }

    /// End the session at the auth provider and drop it locally.
    ///
    /// The connected Safe is cleared unless `keep_safe_on_sign_out` is set.
    /// Signing out without a session is a no-op.
    pub async fn sign_out(&self) -> PluginResult<()> {
        let _gate = self.session_gate.lock().await;

        if self.state.read().await.active_session().is_err() {
            debug!(plugin = %self.id, "Sign-out requested without a session");
            return Ok(());
        }

        self.auth.sign_out().await?;

        let keep_safe = self.options.keep_safe_on_sign_out;
        self.state.write().await.end_session(keep_safe);
        self.kits.clear();

        info!(plugin = %self.id, keep_safe, "Signed out");
        Ok(())
    }

    // =========================================================================
    // Connected Safe
    // =========================================================================

    pub async fn connected_safe_address(&self) -> Option<Address> {
        self.state.read().await.connected_safe()
    }

    /// Select a Safe owned by the signed-in address.
    ///
    /// The owned set is fetched from the transaction service. On
    /// [`PluginError::SafeNotOwned`] or [`PluginError::SessionChanged`] the
    /// previous selection is kept.
    pub async fn set_connected_safe_address(&self, safe: Address) -> PluginResult<()> {
        let (session, generation) = self.state.read().await.active_session()?;

        let owned = self.owned_safes(session).await?;
        if !owned.contains(&safe) {
            warn!(
                plugin = %self.id,
                safe = %safe,
                owned = owned.len(),
                "Safe is not owned by the signed-in address"
            );
            return Err(PluginError::SafeNotOwned(safe));
        }

        self.state.write().await.commit_safe(generation, safe)?;

        info!(plugin = %self.id, safe = %safe, "Connected Safe changed");
        Ok(())
    }

    // =========================================================================
    // Transactions
    // =========================================================================

    /// Build a native transfer of `amount` ether from the connected Safe.
    ///
    /// A zero amount is rejected with [`PluginError::InvalidAmount`].
    pub async fn create_transaction(
        &self,
        destination: Address,
        amount: &str,
    ) -> PluginResult<CreatedTransaction> {
        let connected = self.connected().await?;
        let value = parse_ether(amount)?;
        if value.is_zero() {
            return Err(PluginError::InvalidAmount(format!(
                "{amount}: amount must be greater than zero"
            )));
        }

        let kit = self.kit_for(&connected).await?;
        let transaction = kit
            .create_transaction(SafeTransactionDataPartial::native_transfer(destination, value))
            .await?;
        let safe_tx_hash = kit.get_transaction_hash(&transaction).await?;

        info!(
            plugin = %self.id,
            safe = %connected.safe,
            to = %destination,
            value = %format_amount(value, NATIVE_DECIMALS),
            safe_tx_hash = %safe_tx_hash,
            "Created Safe transaction"
        );
        Ok(CreatedTransaction {
            transaction,
            safe_tx_hash,
        })
    }

    /// Sign `safe_tx_hash` and submit the transaction to the service.
    pub async fn propose_transaction(
        &self,
        safe_tx_hash: B256,
        transaction: &SafeTransaction,
    ) -> PluginResult<()> {
        let connected = self.connected().await?;
        let sender = connected.session.address().await?;

        let kit = self.kit_for(&connected).await?;
        let signature = kit.sign_transaction_hash(safe_tx_hash).await?;

        self.relay_for(connected.session.clone())?
            .propose_transaction(ProposeTransactionProps {
                safe_address: connected.safe,
                safe_transaction_data: transaction.data.clone(),
                safe_tx_hash,
                sender_address: sender,
                sender_signature: signature.data,
                origin: None,
            })
            .await?;

        info!(
            plugin = %self.id,
            safe = %connected.safe,
            safe_tx_hash = %safe_tx_hash,
            sender = %sender,
            "Proposed Safe transaction"
        );
        Ok(())
    }

    /// Add the session signer's confirmation to a pending transaction.
    pub async fn confirm_transaction(&self, safe_tx_hash: B256) -> PluginResult<SignatureResponse> {
        let connected = self.connected().await?;

        let kit = self.kit_for(&connected).await?;
        let signature = kit.sign_transaction_hash(safe_tx_hash).await?;

        let response = self
            .relay_for(connected.session.clone())?
            .confirm_transaction(safe_tx_hash, &signature.data)
            .await?;

        info!(
            plugin = %self.id,
            safe = %connected.safe,
            safe_tx_hash = %safe_tx_hash,
            "Confirmed Safe transaction"
        );
        Ok(response)
    }

    /// Execute a transaction that has collected enough confirmations.
    ///
    /// Returns the mined receipt, or `None` when the protocol kit did not
    /// broadcast anything it can track. Fails with
    /// [`PluginError::InvalidTransaction`] without executing when the kit
    /// reports the transaction as not executable.
    pub async fn execute_transaction(&self, safe_tx_hash: B256) -> PluginResult<Option<TxReceipt>> {
        let connected = self.connected().await?;

        let record = self
            .relay_for(connected.session.clone())?
            .get_transaction(safe_tx_hash)
            .await?;

        let kit = self.kit_for(&connected).await?;
        if !kit.is_valid_transaction(&record).await? {
            warn!(
                plugin = %self.id,
                safe = %connected.safe,
                safe_tx_hash = %safe_tx_hash,
                confirmations = record.confirmations.len(),
                required = ?record.confirmations_required,
                "Transaction is not executable"
            );
            return Err(PluginError::InvalidTransaction(safe_tx_hash));
        }

        let result = kit.execute_transaction(&record).await?;
        let Some(pending) = result.transaction_response else {
            info!(
                plugin = %self.id,
                safe_tx_hash = %safe_tx_hash,
                "Executed Safe transaction without a trackable response"
            );
            return Ok(None);
        };

        let tx_hash = pending.tx_hash();
        debug!(plugin = %self.id, tx_hash = %tx_hash, "Waiting for execution receipt");
        let receipt = pending.wait().await?;

        info!(
            plugin = %self.id,
            safe = %connected.safe,
            safe_tx_hash = %safe_tx_hash,
            tx_hash = %receipt.tx_hash,
            block_number = receipt.block_number,
            success = receipt.success,
            "Executed Safe transaction"
        );
        Ok(Some(receipt))
    }

    // =========================================================================
    // Safe Deployment
    // =========================================================================

    /// Deploy a new Safe owned by `owners` plus the session signer.
    ///
    /// `threshold` must lie in `1..=owners.len() + 1`; this is checked before
    /// any collaborator call. The signer is appended only when not already
    /// listed, and duplicate owners are dropped; the threshold is then checked
    /// again against the final owner count.
    pub async fn create_safe(&self, owners: Vec<Address>, threshold: usize) -> PluginResult<Address> {
        let (session, _) = self.state.read().await.active_session()?;

        let max = owners.len() + 1;
        if threshold == 0 || threshold > max {
            return Err(PluginError::InvalidThreshold { threshold, max });
        }

        let signer = session.address().await?;
        let owners = owner_set(owners, signer);
        if threshold > owners.len() {
            return Err(PluginError::InvalidThreshold {
                threshold,
                max: owners.len(),
            });
        }

        let owner_count = owners.len();
        let safe = self
            .protocol
            .deploy_safe(session, SafeAccountConfig { owners, threshold })
            .await?;

        info!(
            plugin = %self.id,
            safe = %safe,
            owners = owner_count,
            threshold,
            "Deployed Safe"
        );
        Ok(safe)
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Transactions of the connected Safe still waiting for execution.
    pub async fn get_pending_transactions(&self) -> PluginResult<SafeMultisigTransactionList> {
        let connected = self.connected().await?;
        let list = self
            .relay_for(connected.session)?
            .get_pending_transactions(connected.safe)
            .await?;

        debug!(
            plugin = %self.id,
            safe = %connected.safe,
            count = list.count,
            "Fetched pending transactions"
        );
        Ok(list)
    }

    pub async fn get_all_transactions(&self) -> PluginResult<AllTransactionsList> {
        let connected = self.connected().await?;
        let list = self
            .relay_for(connected.session)?
            .get_all_transactions(connected.safe)
            .await?;

        debug!(
            plugin = %self.id,
            safe = %connected.safe,
            count = list.count,
            "Fetched all transactions"
        );
        Ok(list)
    }

    pub async fn get_transaction(&self, safe_tx_hash: B256) -> PluginResult<SafeMultisigTransaction> {
        let (session, _) = self.state.read().await.active_session()?;
        Ok(self.relay_for(session)?.get_transaction(safe_tx_hash).await?)
    }

    /// Every Safe owned by the signed-in address.
    pub async fn get_all_safes(&self) -> PluginResult<Vec<Address>> {
        let (session, _) = self.state.read().await.active_session()?;
        self.owned_safes(session).await
    }

    /// Raw private key of the session signer.
    pub async fn get_private_key(&self) -> PluginResult<PrivateKey> {
        let (session, _) = self.state.read().await.active_session()?;

        match session.request(PRIVATE_KEY_METHOD).await? {
            serde_json::Value::String(key) => {
                debug!(plugin = %self.id, "Exported session private key");
                Ok(PrivateKey::new(key))
            }
            other => Err(CollaboratorError::InvalidResponse(format!(
                "expected a string private key, got {}",
                json_type(&other)
            ))
            .into()),
        }
    }

    pub async fn get_user_info(&self) -> PluginResult<UserInfo> {
        self.state.read().await.active_session()?;
        Ok(self.auth.user_info().await?)
    }

    // =========================================================================
    // Internal
    // =========================================================================

    async fn connected(&self) -> PluginResult<ConnectedSafe> {
        self.state.read().await.connected()
    }

    fn relay_for(&self, session: Arc<dyn AuthSession>) -> PluginResult<Arc<dyn RelayApi>> {
        Ok(self.relay.connect(self.network.tx_service_url(), session)?)
    }

    async fn owned_safes(&self, session: Arc<dyn AuthSession>) -> PluginResult<Vec<Address>> {
        let owner = session.address().await?;
        let response = self.relay_for(session)?.get_safes_by_owner(owner).await?;
        Ok(response.safes)
    }

    /// Protocol kit bound to the connected Safe, built once per session.
    async fn kit_for(&self, connected: &ConnectedSafe) -> PluginResult<Arc<dyn SafeProtocol>> {
        if let Some(kit) = self.kits.get(connected.generation, connected.safe) {
            return Ok(kit);
        }

        let kit = self
            .protocol
            .connect(connected.session.clone(), connected.safe)
            .await?;
        self.kits.put(connected.generation, connected.safe, kit.clone());

        debug!(plugin = %self.id, safe = %connected.safe, "Protocol kit connected");
        Ok(kit)
    }
}

/// Auth provider configuration derived from validated options.
fn auth_provider_config(
    options: &PluginOptions,
    network: &SelectedNetwork,
    login_methods: &[LoginMethod],
) -> AuthProviderConfig {
    AuthProviderConfig {
        client_id: options.auth_client_id.trim().to_string(),
        auth_network: options.auth_network.clone(),
        chain_config: ChainConfig {
            chain_namespace: EIP155_NAMESPACE.to_string(),
            chain_id: network.config().chain_id_hex(),
            rpc_target: network.rpc_url().cloned(),
        },
        ui_config: UiConfig {
            theme: options.theme,
            login_methods_order: login_methods.to_vec(),
        },
        external_wallets: AuthProviderConfig::default_external_wallets(),
        openlogin: OpenloginSettings::default(),
    }
}

/// `owners` without duplicates, followed by `signer` unless already listed.
fn owner_set(owners: Vec<Address>, signer: Address) -> Vec<Address> {
    let mut set: Vec<Address> = Vec::with_capacity(owners.len() + 1);
    for owner in owners.into_iter().chain(std::iter::once(signer)) {
        if !set.contains(&owner) {
            set.push(owner);
        }
    }
    set
}

fn json_type(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
