// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Fixed-point conversion between decimal amounts and base units.
//!
//! [`parse_amount`] validates caller input. [`format_amount`] only renders
//! values for log fields and is never parsed back.

use alloy::primitives::U256;

use crate::error::{PluginError, PluginResult};

/// Decimals of the native token on every supported network.
pub const NATIVE_DECIMALS: u8 = 18;

/// Parse a human-readable amount to base units (wei for native transfers).
///
/// # Arguments
/// * `amount` - Amount as a string (e.g., "0.005")
/// * `decimals` - Number of decimals (18 for ether)
///
/// # Returns
/// * `Ok(U256)` - Amount in smallest unit
/// * `Err(PluginError::InvalidAmount)` - If the string is not a non-negative
///   decimal or carries more fractional digits than `decimals`
pub fn parse_amount(amount: &str, decimals: u8) -> PluginResult<U256> {
    let amount = amount.trim();
    if amount.is_empty() {
        return Err(PluginError::InvalidAmount("amount is empty".to_string()));
    }

    let (whole, fraction) = match amount.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (amount, ""),
    };

    if whole.is_empty() && fraction.is_empty() {
        return Err(PluginError::InvalidAmount(format!("`{amount}` has no digits")));
    }
    if !whole.chars().all(|c| c.is_ascii_digit()) || !fraction.chars().all(|c| c.is_ascii_digit())
    {
        return Err(PluginError::InvalidAmount(format!(
            "`{amount}` is not a decimal number"
        )));
    }
    if fraction.len() > decimals as usize {
        return Err(PluginError::InvalidAmount(format!(
            "Too many decimal places (max {decimals})"
        )));
    }

    let whole = if whole.is_empty() {
        U256::ZERO
    } else {
        U256::from_str_radix(whole, 10)
            .map_err(|_| PluginError::InvalidAmount("Amount overflow".to_string()))?
    };

    // Pad with zeros to match decimals
    let padded = format!("{:0<width$}", fraction, width = decimals as usize);
    let fraction = if padded.is_empty() {
        U256::ZERO
    } else {
        U256::from_str_radix(&padded, 10)
            .map_err(|_| PluginError::InvalidAmount("Invalid decimal".to_string()))?
    };

    let multiplier = U256::from(10u64).pow(U256::from(decimals));
    whole
        .checked_mul(multiplier)
        .and_then(|w| w.checked_add(fraction))
        .ok_or_else(|| PluginError::InvalidAmount("Amount overflow".to_string()))
}

/// Parse an amount of the native token (18 decimals).
pub fn parse_ether(amount: &str) -> PluginResult<U256> {
    parse_amount(amount, NATIVE_DECIMALS)
}

/// Format base units to a human-readable amount for log output.
///
/// Whole values print without a decimal point and trailing zeros are dropped.
pub fn format_amount(amount: U256, decimals: u8) -> String {
    if amount.is_zero() {
        return "0".to_string();
    }

    let divisor = U256::from(10u64).pow(U256::from(decimals));
    let whole = amount / divisor;
    let remainder = amount % divisor;

    if remainder.is_zero() {
        whole.to_string()
    } else {
        let decimal_str = format!("{:0>width$}", remainder, width = decimals as usize);
        let trimmed = decimal_str.trim_end_matches('0');
        format!("{whole}.{trimmed}")
    }
}
