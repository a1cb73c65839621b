// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Auth provider port.
//!
//! The auth provider is the social-login wallet service: it shows the login
//! modal, owns the resulting key session and reports which Safes the signed-in
//! address owns. The plugin configures it once at construction
//! ([`AuthConnector::configure`], no I/O), binds it to the transaction
//! service on [`AuthProvider::init`], and then drives sign-in and sign-out.

use std::sync::Arc;

use alloy::primitives::Address;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::config::{LoginMethod, Theme};
use crate::error::CollaboratorResult;

/// Session request method returning the raw private key.
///
/// Fixed wire string understood by the auth provider.
pub const PRIVATE_KEY_METHOD: &str = "private_key";

/// Chain namespace for EVM chains.
pub const EIP155_NAMESPACE: &str = "eip155";

/// Chain settings handed to the auth provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainConfig {
    pub chain_namespace: String,
    /// Hex chain ID (e.g. "0x5")
    pub chain_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rpc_target: Option<Url>,
}

/// Modal look and login method ordering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiConfig {
    pub theme: Theme,
    pub login_methods_order: Vec<LoginMethod>,
}

/// An external wallet adapter listed in the modal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalWalletConfig {
    pub adapter: String,
    pub label: String,
    pub show_on_desktop: bool,
    pub show_on_mobile: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MfaLevel {
    Default,
    Optional,
    Mandatory,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UxMode {
    Popup,
    Redirect,
}

/// Settings for the social login adapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenloginSettings {
    pub mfa_level: MfaLevel,
    pub ux_mode: UxMode,
    /// Name shown in the white-labelled login screens
    pub white_label_name: String,
}

impl Default for OpenloginSettings {
    fn default() -> Self {
        Self {
            mfa_level: MfaLevel::Mandatory,
            ux_mode: UxMode::Popup,
            white_label_name: "Safe".to_string(),
        }
    }
}

/// Everything the auth provider needs to be configured.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthProviderConfig {
    pub client_id: String,
    /// Auth provider environment tag (e.g. "testnet")
    pub auth_network: String,
    pub chain_config: ChainConfig,
    pub ui_config: UiConfig,
    pub external_wallets: Vec<ExternalWalletConfig>,
    pub openlogin: OpenloginSettings,
}

impl AuthProviderConfig {
    /// MetaMask entry shown on desktop and mobile.
    pub fn default_external_wallets() -> Vec<ExternalWalletConfig> {
        vec![ExternalWalletConfig {
            adapter: "metamask".to_string(),
            label: "metamask".to_string(),
            show_on_desktop: true,
            show_on_mobile: true,
        }]
    }
}

/// Identity metadata of the signed-in user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verifier: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verifier_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_of_login: Option<String>,
}

/// Raw sign-in result returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInInfo {
    /// Externally owned account controlled by the session
    pub eoa: Address,
    /// Safes owned by `eoa`
    pub safes: Vec<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_info: Option<UserInfo>,
}

/// A live authenticated session.
///
/// This is the signer handle the protocol kit and transaction service
/// adapters are built from.
#[async_trait]
pub trait AuthSession: Send + Sync {
    /// Address of the session signer.
    async fn address(&self) -> CollaboratorResult<Address>;

    /// Raw provider request (e.g. [`PRIVATE_KEY_METHOD`]).
    async fn request(&self, method: &str) -> CollaboratorResult<serde_json::Value>;
}

/// Outcome of [`AuthProvider::sign_in`].
#[derive(Clone)]
pub struct AuthSignIn {
    pub session: Arc<dyn AuthSession>,
    pub info: SignInInfo,
}

impl std::fmt::Debug for AuthSignIn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSignIn")
            .field("info", &self.info)
            .finish_non_exhaustive()
    }
}

/// A configured auth provider.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Bind the provider to the transaction service used to look up owned Safes.
    async fn init(&self, tx_service_url: &Url) -> CollaboratorResult<()>;

    /// Run the login flow.
    async fn sign_in(&self) -> CollaboratorResult<AuthSignIn>;

    /// Terminate the current session.
    async fn sign_out(&self) -> CollaboratorResult<()>;

    /// Identity metadata for the current session.
    async fn user_info(&self) -> CollaboratorResult<UserInfo>;
}

/// Builds an [`AuthProvider`] from configuration. Must not perform I/O.
pub trait AuthConnector: Send + Sync {
    fn configure(&self, config: AuthProviderConfig) -> CollaboratorResult<Arc<dyn AuthProvider>>;
}
