// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Safe Data Models
//!
//! Transaction, signature and listing types exchanged between the facade,
//! the protocol kit and the Safe Transaction Service. Field names follow the
//! transaction service JSON (camelCase) so the same types serve both the
//! collaborator ports and the HTTP client.
//!
//! Amounts and gas values travel as decimal strings on the wire; the service
//! has returned some of them as JSON numbers in older versions, so the
//! deserializers here accept both.

use alloy::primitives::{Address, Bytes, B256, U256};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// Transaction Data
// =============================================================================

/// Safe operation type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum OperationType {
    #[default]
    Call,
    DelegateCall,
}

impl From<OperationType> for u8 {
    fn from(value: OperationType) -> Self {
        match value {
            OperationType::Call => 0,
            OperationType::DelegateCall => 1,
        }
    }
}

impl TryFrom<u8> for OperationType {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(OperationType::Call),
            1 => Ok(OperationType::DelegateCall),
            other => Err(format!("unknown operation type {other}")),
        }
    }
}

/// Caller-supplied transaction fields; the protocol kit fills in the rest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SafeTransactionDataPartial {
    pub to: Address,
    #[serde(with = "decimal_u256")]
    pub value: U256,
    pub data: Bytes,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation: Option<OperationType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nonce: Option<u64>,
}

impl SafeTransactionDataPartial {
    /// Plain value transfer with an empty payload.
    pub fn native_transfer(to: Address, value: U256) -> Self {
        Self {
            to,
            value,
            data: Bytes::new(),
            operation: None,
            nonce: None,
        }
    }
}

/// Complete Safe transaction fields, as hashed and signed by owners.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SafeTransactionData {
    pub to: Address,
    #[serde(with = "decimal_u256")]
    pub value: U256,
    pub data: Bytes,
    pub operation: OperationType,
    #[serde(with = "decimal_u256")]
    pub safe_tx_gas: U256,
    #[serde(with = "decimal_u256")]
    pub base_gas: U256,
    #[serde(with = "decimal_u256")]
    pub gas_price: U256,
    pub gas_token: Address,
    pub refund_receiver: Address,
    #[serde(with = "flexible_u64")]
    pub nonce: u64,
}

/// An owner signature over a Safe transaction hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafeSignature {
    pub signer: Address,
    pub data: Bytes,
}

/// Transaction object produced by the protocol kit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafeTransaction {
    pub data: SafeTransactionData,
    #[serde(default)]
    pub signatures: Vec<SafeSignature>,
}

/// Result of [`SafePlugin::create_transaction`](crate::plugin::SafePlugin::create_transaction).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedTransaction {
    pub transaction: SafeTransaction,
    pub safe_tx_hash: B256,
}

// =============================================================================
// Transaction Service Records
// =============================================================================

/// One owner confirmation attached to a multisig transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SafeMultisigConfirmation {
    pub owner: Address,
    pub submission_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_hash: Option<B256>,
    pub signature: Bytes,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature_type: Option<String>,
}

/// Multisig transaction record as stored by the transaction service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SafeMultisigTransaction {
    pub safe: Address,
    pub to: Address,
    #[serde(with = "decimal_u256")]
    pub value: U256,
    #[serde(default)]
    pub data: Option<Bytes>,
    pub operation: OperationType,
    #[serde(default)]
    pub gas_token: Option<Address>,
    #[serde(with = "decimal_u256")]
    pub safe_tx_gas: U256,
    #[serde(with = "decimal_u256")]
    pub base_gas: U256,
    #[serde(with = "decimal_u256")]
    pub gas_price: U256,
    #[serde(default)]
    pub refund_receiver: Option<Address>,
    #[serde(with = "flexible_u64")]
    pub nonce: u64,
    #[serde(default)]
    pub execution_date: Option<DateTime<Utc>>,
    pub submission_date: DateTime<Utc>,
    #[serde(default)]
    pub modified: Option<DateTime<Utc>>,
    #[serde(default)]
    pub block_number: Option<u64>,
    #[serde(default)]
    pub transaction_hash: Option<B256>,
    pub safe_tx_hash: B256,
    #[serde(default)]
    pub executor: Option<Address>,
    #[serde(default)]
    pub is_executed: bool,
    #[serde(default)]
    pub is_successful: Option<bool>,
    #[serde(default)]
    pub origin: Option<String>,
    #[serde(default)]
    pub data_decoded: Option<serde_json::Value>,
    #[serde(default)]
    pub confirmations_required: Option<u64>,
    #[serde(default)]
    pub confirmations: Vec<SafeMultisigConfirmation>,
    #[serde(default)]
    pub trusted: bool,
    #[serde(default)]
    pub signatures: Option<Bytes>,
}

impl SafeMultisigTransaction {
    /// Transaction fields in the form the protocol kit hashes.
    pub fn transaction_data(&self) -> SafeTransactionData {
        SafeTransactionData {
            to: self.to,
            value: self.value,
            data: self.data.clone().unwrap_or_default(),
            operation: self.operation,
            safe_tx_gas: self.safe_tx_gas,
            base_gas: self.base_gas,
            gas_price: self.gas_price,
            gas_token: self.gas_token.unwrap_or(Address::ZERO),
            refund_receiver: self.refund_receiver.unwrap_or(Address::ZERO),
            nonce: self.nonce,
        }
    }
}

/// Paginated listing returned by the transaction service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListResponse<T> {
    pub count: u64,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
    pub results: Vec<T>,
}

pub type SafeMultisigTransactionList = ListResponse<SafeMultisigTransaction>;

/// Mixed listing of multisig, module and incoming transfers.
///
/// Entries are discriminated by `txType` and passed through as JSON.
pub type AllTransactionsList = ListResponse<serde_json::Value>;

/// Safes owned by an address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerResponse {
    pub safes: Vec<Address>,
}

/// Current on-chain view of a Safe as indexed by the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SafeInfo {
    pub address: Address,
    #[serde(with = "flexible_u64")]
    pub nonce: u64,
    pub threshold: u64,
    pub owners: Vec<Address>,
    #[serde(default)]
    pub master_copy: Option<Address>,
    #[serde(default)]
    pub version: Option<String>,
}

/// Transaction proposal submitted to the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposeTransactionProps {
    pub safe_address: Address,
    pub safe_transaction_data: SafeTransactionData,
    pub safe_tx_hash: B256,
    pub sender_address: Address,
    pub sender_signature: Bytes,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
}

/// Signature echoed back by the confirmation endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureResponse {
    pub signature: Bytes,
}

/// Parameters for deploying a new Safe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafeAccountConfig {
    pub owners: Vec<Address>,
    pub threshold: usize,
}

/// Receipt of an executed Safe transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxReceipt {
    /// Ethereum transaction hash
    pub tx_hash: B256,
    /// Block number where transaction was included
    pub block_number: u64,
    /// Gas actually used
    pub gas_used: u64,
    /// Whether the transaction was successful
    pub success: bool,
}

/// Raw private key of the session signer.
///
/// `Debug` is redacted; use [`PrivateKey::expose`] to read the value.
#[derive(Clone, PartialEq, Eq)]
pub struct PrivateKey(String);

impl PrivateKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("PrivateKey(<redacted>)")
    }
}

// =============================================================================
// Serde Helpers
// =============================================================================

/// Untagged helper accepting either a JSON string or a JSON number.
#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    String(String),
    Number(serde_json::Number),
}

impl StringOrNumber {
    fn into_decimal(self) -> String {
        match self {
            StringOrNumber::String(s) => s,
            StringOrNumber::Number(n) => n.to_string(),
        }
    }
}

/// `U256` as a base-10 string.
mod decimal_u256 {
    use alloy::primitives::U256;
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    use super::StringOrNumber;

    pub fn serialize<S: Serializer>(value: &U256, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<U256, D::Error> {
        let raw = StringOrNumber::deserialize(deserializer)?.into_decimal();
        if let Some(hex) = raw.strip_prefix("0x") {
            return U256::from_str_radix(hex, 16).map_err(D::Error::custom);
        }
        U256::from_str_radix(&raw, 10).map_err(D::Error::custom)
    }
}

/// `u64` accepted from a string or a number, written as a number.
mod flexible_u64 {
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    use super::StringOrNumber;

    pub fn serialize<S: Serializer>(value: &u64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(*value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
        StringOrNumber::deserialize(deserializer)?
            .into_decimal()
            .parse()
            .map_err(D::Error::custom)
    }
}
