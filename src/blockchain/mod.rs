// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Chain-level building blocks shared by the facade.
//!
//! This module provides:
//! - The supported network table and RPC override resolution
//! - Decimal amount parsing for native transfers

pub mod types;
pub mod units;

pub use types::*;
pub use units::{format_amount, parse_amount, parse_ether, NATIVE_DECIMALS};
