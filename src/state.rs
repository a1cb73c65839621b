// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Session state owned by the plugin.
//!
//! ## Lifecycle
//!
//! ```text
//! Configured --init_session--> SessionReady --sign_in--> SignedIn
//!                                   ^                        |
//!                                   +-------- sign_out ------+
//! ```
//!
//! Every sign-in and sign-out bumps `generation`. Operations that read the
//! state, perform I/O and then write back compare the generation they started
//! with, so a sign-out that happens while a request is in flight is never
//! overwritten by the stale result.

use std::sync::Arc;

use alloy::primitives::Address;
use serde::Serialize;

use crate::error::{PluginError, PluginResult};
use crate::providers::{AuthSession, AuthSignIn, SignInInfo};

/// Externally visible lifecycle phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PluginState {
    /// Constructed; the auth provider is configured but not bound yet
    Configured,
    /// Bound to the transaction service; nobody signed in
    SessionReady,
    /// A session is live
    SignedIn,
}

/// The active session and the Safe it is connected to.
#[derive(Clone)]
pub(crate) struct ConnectedSafe {
    pub session: Arc<dyn AuthSession>,
    pub safe: Address,
    pub generation: u64,
}

#[derive(Default)]
pub(crate) struct SessionState {
    initialized: bool,
    session: Option<Arc<dyn AuthSession>>,
    sign_in: Option<SignInInfo>,
    connected_safe: Option<Address>,
    generation: u64,
}

impl SessionState {
    pub fn phase(&self) -> PluginState {
        match (self.initialized, self.session.is_some()) {
            (_, true) => PluginState::SignedIn,
            (true, false) => PluginState::SessionReady,
            (false, false) => PluginState::Configured,
        }
    }

    pub fn mark_initialized(&mut self) {
        self.initialized = true;
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn connected_safe(&self) -> Option<Address> {
        self.connected_safe
    }

    pub fn sign_in_info(&self) -> Option<&SignInInfo> {
        self.sign_in.as_ref()
    }

    /// Store a fresh session and auto-select its first Safe.
    pub fn begin_session(&mut self, sign_in: AuthSignIn) {
        self.generation += 1;
        self.connected_safe = sign_in.info.safes.first().copied();
        self.session = Some(sign_in.session);
        self.sign_in = Some(sign_in.info);
    }

    /// Drop the session, optionally keeping the Safe selection.
    pub fn end_session(&mut self, keep_safe: bool) {
        self.generation += 1;
        self.session = None;
        self.sign_in = None;
        if !keep_safe {
            self.connected_safe = None;
        }
    }

    /// The live session, with the generation it belongs to.
    pub fn active_session(&self) -> PluginResult<(Arc<dyn AuthSession>, u64)> {
        self.session
            .clone()
            .map(|session| (session, self.generation))
            .ok_or(PluginError::NotConnected)
    }

    /// The live session together with the connected Safe.
    pub fn connected(&self) -> PluginResult<ConnectedSafe> {
        let (session, generation) = self.active_session()?;
        let safe = self.connected_safe.ok_or(PluginError::NoSafeConnected)?;
        Ok(ConnectedSafe {
            session,
            safe,
            generation,
        })
    }

    /// Select `safe` if the session has not changed since `generation`.
    pub fn commit_safe(&mut self, generation: u64, safe: Address) -> PluginResult<()> {
        if self.generation != generation || self.session.is_none() {
            return Err(PluginError::SessionChanged);
        }
        self.connected_safe = Some(safe);
        Ok(())
    }
}
