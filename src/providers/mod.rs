// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Collaborator Ports
//!
//! The plugin delegates every non-trivial action to three external
//! collaborators. Each one is a trait here so hosts can plug in their own
//! adapters (and tests can plug in fakes):
//!
//! - [`auth`] - social-login auth provider and its session signer
//! - [`protocol`] - Safe protocol kit (transactions, signatures, deployment)
//! - [`relay`] - Safe Transaction Service client
//!
//! [`tx_service`] ships the HTTP implementation of the relay port.

pub mod auth;
pub mod protocol;
pub mod relay;
pub mod tx_service;

pub use auth::{
    AuthConnector, AuthProvider, AuthProviderConfig, AuthSession, AuthSignIn, SignInInfo,
    UserInfo, PRIVATE_KEY_METHOD,
};
pub use protocol::{ExecutionResult, PendingTransaction, ProtocolConnector, SafeProtocol};
pub use relay::{RelayApi, RelayConnector};
pub use tx_service::{TxServiceClient, TxServiceConnector};

use std::sync::Arc;

/// The three collaborator entry points a plugin is built from.
#[derive(Clone)]
pub struct Collaborators {
    pub auth: Arc<dyn AuthConnector>,
    pub protocol: Arc<dyn ProtocolConnector>,
    pub relay: Arc<dyn RelayConnector>,
}

impl Collaborators {
    pub fn new(
        auth: Arc<dyn AuthConnector>,
        protocol: Arc<dyn ProtocolConnector>,
        relay: Arc<dyn RelayConnector>,
    ) -> Self {
        Self {
            auth,
            protocol,
            relay,
        }
    }
}
