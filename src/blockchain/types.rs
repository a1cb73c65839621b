// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Network configuration table.

use url::Url;

use crate::error::{PluginError, PluginResult};

/// Static configuration for one supported network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkConfig {
    /// Network identifier accepted by the plugin options (e.g. "5")
    pub id: &'static str,
    /// Network name for display
    pub name: &'static str,
    /// Chain ID
    pub chain_id: u64,
    /// Safe Transaction Service base URL
    pub tx_service_url: &'static str,
}

impl NetworkConfig {
    /// Chain ID as a `0x`-prefixed hex string, the form the auth provider expects.
    pub fn chain_id_hex(&self) -> String {
        format!("{:#x}", self.chain_id)
    }
}

/// Ethereum mainnet.
pub const ETHEREUM_MAINNET: NetworkConfig = NetworkConfig {
    id: "1",
    name: "Ethereum Mainnet",
    chain_id: 1,
    tx_service_url: "https://safe-transaction.mainnet.gnosis.io",
};

/// Goerli testnet.
pub const GOERLI: NetworkConfig = NetworkConfig {
    id: "5",
    name: "Goerli Testnet",
    chain_id: 5,
    tx_service_url: "https://safe-transaction.goerli.gnosis.io",
};

/// Gnosis Chain (formerly xDai).
pub const GNOSIS_CHAIN: NetworkConfig = NetworkConfig {
    id: "100",
    name: "Gnosis Chain",
    chain_id: 100,
    tx_service_url: "https://safe-transaction.xdai.gnosis.io",
};

/// Every network the plugin can be constructed for.
pub const SUPPORTED_NETWORKS: [NetworkConfig; 3] = [ETHEREUM_MAINNET, GOERLI, GNOSIS_CHAIN];

/// Network selected when the options do not name one.
pub const DEFAULT_NETWORK_ID: &str = "5";

/// Look up a network by identifier.
pub fn network_by_id(id: &str) -> Option<&'static NetworkConfig> {
    SUPPORTED_NETWORKS.iter().find(|n| n.id == id.trim())
}

/// A network from the table together with the caller's RPC override.
#[derive(Debug, Clone)]
pub struct SelectedNetwork {
    config: &'static NetworkConfig,
    rpc_url: Option<Url>,
    tx_service_url: Url,
}

impl SelectedNetwork {
    /// Resolve a network identifier and optional RPC override.
    pub fn resolve(id: &str, rpc_url: Option<&str>) -> PluginResult<Self> {
        let config =
            network_by_id(id).ok_or_else(|| PluginError::UnsupportedNetwork(id.to_string()))?;

        let rpc_url = rpc_url
            .map(str::trim)
            .filter(|raw| !raw.is_empty())
            .map(|raw| {
                Url::parse(raw).map_err(|e| PluginError::InvalidRpcUrl(format!("{raw}: {e}")))
            })
            .transpose()?;

        let tx_service_url = Url::parse(config.tx_service_url)
            .map_err(|e| PluginError::MissingConfig(format!("transaction service URL: {e}")))?;

        Ok(Self {
            config,
            rpc_url,
            tx_service_url,
        })
    }

    pub fn config(&self) -> &'static NetworkConfig {
        self.config
    }

    pub fn id(&self) -> &'static str {
        self.config.id
    }

    pub fn chain_id(&self) -> u64 {
        self.config.chain_id
    }

    /// Custom RPC endpoint, if one was configured.
    pub fn rpc_url(&self) -> Option<&Url> {
        self.rpc_url.as_ref()
    }

    pub fn tx_service_url(&self) -> &Url {
        &self.tx_service_url
    }
}
