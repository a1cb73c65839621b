// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Relational Safe Plugin - Social Login Sessions for Safe Multisig Wallets
//!
//! This crate wraps a social-login auth provider, the Safe protocol kit and
//! the Safe Transaction Service behind one facade, [`SafePlugin`], that
//! exposes sign-in, Safe creation and the propose / confirm / execute
//! transaction flow as single calls.
//!
//! ## Modules
//!
//! - `plugin` - The facade and its session lifecycle
//! - `providers` - Collaborator ports and the transaction service HTTP client
//! - `blockchain` - Supported networks and amount parsing
//! - `models` - Safe transaction and listing types
//! - `config` - Plugin options and environment loading
//! - `logging` - Tracing subscriber setup

pub mod blockchain;
pub mod cache;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod plugin;
pub mod providers;
pub mod state;

#[cfg(test)]
pub(crate) mod testing;

pub use config::{LoginMethod, PluginOptions, Theme};
pub use error::{CollaboratorError, ErrorKind, PluginError, PluginResult};
pub use plugin::SafePlugin;
pub use providers::Collaborators;
pub use state::PluginState;
