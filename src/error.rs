// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Error types for the plugin facade and its collaborators.
//!
//! Collaborators (auth provider, protocol kit, transaction service) report
//! failures as [`CollaboratorError`]. The facade wraps those unchanged in
//! [`PluginError::Collaborator`] and adds its own configuration, precondition
//! and validation variants. [`PluginError::kind`] groups every variant into
//! an [`ErrorKind`] so callers can branch on the category without matching
//! each variant.

use alloy::primitives::{Address, B256};

/// Result alias for facade operations.
pub type PluginResult<T> = Result<T, PluginError>;

/// Result alias for collaborator (port) operations.
pub type CollaboratorResult<T> = Result<T, CollaboratorError>;

/// Error category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Invalid construction or initialisation input. Never retried.
    Configuration,
    /// Operation called in the wrong state or with invalid arguments.
    Precondition,
    /// The collaborator refused the transaction (e.g. missing signatures).
    Validation,
    /// A looked-up item does not belong to the signed-in identity.
    NotFound,
    /// Failure surfaced by an external collaborator.
    Delegation,
}

impl ErrorKind {
    /// Stable snake_case code for logs and host bindings.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Configuration => "configuration",
            ErrorKind::Precondition => "precondition",
            ErrorKind::Validation => "validation",
            ErrorKind::NotFound => "not_found",
            ErrorKind::Delegation => "delegation",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors reported by collaborator adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CollaboratorError {
    #[error("Auth provider error: {0}")]
    Auth(String),

    /// The user closed or declined the login flow.
    #[error("Sign-in rejected: {0}")]
    Rejected(String),

    #[error("Protocol kit error: {0}")]
    Protocol(String),

    #[error("Transaction service returned {status}: {message}")]
    Relay { status: u16, message: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Errors returned by [`SafePlugin`](crate::plugin::SafePlugin).
#[derive(Debug, thiserror::Error)]
pub enum PluginError {
    #[error("Network not supported: {0}")]
    UnsupportedNetwork(String),

    #[error("At least one login method must be provided")]
    NoLoginMethods,

    #[error("Login method {0} is not supported")]
    UnsupportedLoginMethod(String),

    #[error("Invalid RPC URL: {0}")]
    InvalidRpcUrl(String),

    #[error("Missing configuration: {0}")]
    MissingConfig(String),

    /// A configuration value is present but cannot be parsed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Session has not been initialised")]
    NotInitialized,

    #[error("You are not connected to a wallet")]
    NotConnected,

    #[error("No Safe wallet is connected")]
    NoSafeConnected,

    #[error("Threshold is not valid: {threshold} (expected 1..={max})")]
    InvalidThreshold { threshold: usize, max: usize },

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Session changed while the request was in flight")]
    SessionChanged,

    #[error("Safe wallet address not found: {0}")]
    SafeNotOwned(Address),

    #[error("Transaction is not valid: {0}")]
    InvalidTransaction(B256),

    #[error(transparent)]
    Collaborator(#[from] CollaboratorError),
}

impl PluginError {
    /// Category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            PluginError::UnsupportedNetwork(_)
            | PluginError::NoLoginMethods
            | PluginError::UnsupportedLoginMethod(_)
            | PluginError::InvalidRpcUrl(_)
            | PluginError::MissingConfig(_)
            | PluginError::InvalidConfig(_) => ErrorKind::Configuration,
            PluginError::NotInitialized
            | PluginError::NotConnected
            | PluginError::NoSafeConnected
            | PluginError::InvalidThreshold { .. }
            | PluginError::InvalidAmount(_)
            | PluginError::SessionChanged => ErrorKind::Precondition,
            PluginError::SafeNotOwned(_) => ErrorKind::NotFound,
            PluginError::InvalidTransaction(_) => ErrorKind::Validation,
            PluginError::Collaborator(_) => ErrorKind::Delegation,
        }
    }
}
