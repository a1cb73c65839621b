// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Plugin Configuration
//!
//! This module defines the plugin options, the login methods and themes the
//! auth provider understands, and the environment variables used to load
//! options outside of code.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `SAFE_PLUGIN_AUTH_CLIENT_ID` | Auth provider client ID | Required |
//! | `SAFE_PLUGIN_NETWORK` | Network identifier (`1`, `5`, `100`) | `5` |
//! | `SAFE_PLUGIN_RPC_URL` | Custom RPC endpoint override | None |
//! | `SAFE_PLUGIN_AUTH_NETWORK` | Auth provider environment tag | `testnet` |
//! | `SAFE_PLUGIN_LOGIN_METHODS` | Comma separated login methods, in display order | `google,twitter,facebook` |
//! | `SAFE_PLUGIN_THEME` | Modal theme (`light` or `dark`) | `dark` |
//! | `SAFE_PLUGIN_KEEP_SAFE_ON_SIGN_OUT` | Keep the connected Safe after sign-out | `false` |
//! | `SAFE_TX_SERVICE_TIMEOUT_SECS` | Transaction service request timeout | `15` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info` |

use std::{env, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::blockchain::DEFAULT_NETWORK_ID;
use crate::error::{PluginError, PluginResult};

pub const AUTH_CLIENT_ID_ENV: &str = "SAFE_PLUGIN_AUTH_CLIENT_ID";
pub const NETWORK_ENV: &str = "SAFE_PLUGIN_NETWORK";
pub const RPC_URL_ENV: &str = "SAFE_PLUGIN_RPC_URL";
pub const AUTH_NETWORK_ENV: &str = "SAFE_PLUGIN_AUTH_NETWORK";
pub const LOGIN_METHODS_ENV: &str = "SAFE_PLUGIN_LOGIN_METHODS";
pub const THEME_ENV: &str = "SAFE_PLUGIN_THEME";
pub const KEEP_SAFE_ON_SIGN_OUT_ENV: &str = "SAFE_PLUGIN_KEEP_SAFE_ON_SIGN_OUT";
pub const TX_SERVICE_TIMEOUT_ENV: &str = "SAFE_TX_SERVICE_TIMEOUT_SECS";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

/// Auth provider environment used when none is configured.
pub const DEFAULT_AUTH_NETWORK: &str = "testnet";

/// Social login methods offered by the auth provider modal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoginMethod {
    Google,
    Facebook,
    Twitter,
    Reddit,
    Discord,
    Twitch,
    Apple,
    Line,
    Github,
    Kakao,
    Linkedin,
    Weibo,
    Wechat,
    EmailPasswordless,
}

impl LoginMethod {
    pub const ALL: [LoginMethod; 14] = [
        LoginMethod::Google,
        LoginMethod::Facebook,
        LoginMethod::Twitter,
        LoginMethod::Reddit,
        LoginMethod::Discord,
        LoginMethod::Twitch,
        LoginMethod::Apple,
        LoginMethod::Line,
        LoginMethod::Github,
        LoginMethod::Kakao,
        LoginMethod::Linkedin,
        LoginMethod::Weibo,
        LoginMethod::Wechat,
        LoginMethod::EmailPasswordless,
    ];

    /// Methods shown when the options leave the list out.
    pub const DEFAULTS: [LoginMethod; 3] =
        [LoginMethod::Google, LoginMethod::Twitter, LoginMethod::Facebook];

    pub fn as_str(&self) -> &'static str {
        match self {
            LoginMethod::Google => "google",
            LoginMethod::Facebook => "facebook",
            LoginMethod::Twitter => "twitter",
            LoginMethod::Reddit => "reddit",
            LoginMethod::Discord => "discord",
            LoginMethod::Twitch => "twitch",
            LoginMethod::Apple => "apple",
            LoginMethod::Line => "line",
            LoginMethod::Github => "github",
            LoginMethod::Kakao => "kakao",
            LoginMethod::Linkedin => "linkedin",
            LoginMethod::Weibo => "weibo",
            LoginMethod::Wechat => "wechat",
            LoginMethod::EmailPasswordless => "email_passwordless",
        }
    }
}

impl fmt::Display for LoginMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LoginMethod {
    type Err = PluginError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LoginMethod::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| PluginError::UnsupportedLoginMethod(s.to_string()))
    }
}

/// Validate a login-method list, keeping its order.
///
/// The list must be non-empty and every entry must name a known method.
pub fn resolve_login_methods(raw: &[String]) -> PluginResult<Vec<LoginMethod>> {
    if raw.is_empty() {
        return Err(PluginError::NoLoginMethods);
    }
    raw.iter().map(|m| m.parse()).collect()
}

/// Auth modal colour scheme.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

impl FromStr for Theme {
    type Err = PluginError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(PluginError::InvalidConfig(format!(
                "{THEME_ENV} must be `light` or `dark`, got `{other}`"
            ))),
        }
    }
}

/// Options accepted by [`SafePlugin::new`](crate::plugin::SafePlugin::new).
///
/// Login methods are kept as raw strings so that unknown entries coming from
/// a host (JSON, environment) are rejected by the plugin constructor with a
/// configuration error rather than silently dropped by deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PluginOptions {
    /// Auth provider client ID
    #[serde(alias = "web3AuthClientId")]
    pub auth_client_id: String,
    /// Network identifier from the network table
    #[serde(alias = "chainId")]
    pub network: String,
    /// Optional RPC endpoint override
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_rpc_url: Option<String>,
    /// Auth provider environment tag
    #[serde(alias = "web3AuthNetwork")]
    pub auth_network: String,
    /// Login methods in modal display order
    pub login_methods: Vec<String>,
    /// Modal theme
    pub theme: Theme,
    /// Keep the connected Safe selected after sign-out
    pub keep_safe_on_sign_out: bool,
}

impl Default for PluginOptions {
    fn default() -> Self {
        Self {
            auth_client_id: String::new(),
            network: DEFAULT_NETWORK_ID.to_string(),
            custom_rpc_url: None,
            auth_network: DEFAULT_AUTH_NETWORK.to_string(),
            login_methods: LoginMethod::DEFAULTS
                .iter()
                .map(|m| m.as_str().to_string())
                .collect(),
            theme: Theme::default(),
            keep_safe_on_sign_out: false,
        }
    }
}

impl PluginOptions {
    /// Options with defaults for everything but the client ID.
    pub fn new(auth_client_id: impl Into<String>) -> Self {
        Self {
            auth_client_id: auth_client_id.into(),
            ..Self::default()
        }
    }

    pub fn with_network(mut self, network: impl Into<String>) -> Self {
        self.network = network.into();
        self
    }

    pub fn with_rpc_url(mut self, rpc_url: impl Into<String>) -> Self {
        self.custom_rpc_url = Some(rpc_url.into());
        self
    }

    pub fn with_login_methods<I, S>(mut self, methods: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.login_methods = methods.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    /// Load options from the environment (see the module docs for names).
    pub fn from_env() -> PluginResult<Self> {
        let defaults = Self::default();

        let auth_client_id = env_required(AUTH_CLIENT_ID_ENV)?;
        let network = env_or(NETWORK_ENV, defaults.network);
        let custom_rpc_url = env_optional(RPC_URL_ENV);
        let auth_network = env_or(AUTH_NETWORK_ENV, defaults.auth_network);
        let login_methods = match env_optional(LOGIN_METHODS_ENV) {
            Some(raw) => split_list(&raw),
            None => defaults.login_methods,
        };
        let theme = match env_optional(THEME_ENV) {
            Some(raw) => raw.parse()?,
            None => defaults.theme,
        };
        let keep_safe_on_sign_out = match env_optional(KEEP_SAFE_ON_SIGN_OUT_ENV) {
            Some(raw) => parse_flag(KEEP_SAFE_ON_SIGN_OUT_ENV, &raw)?,
            None => defaults.keep_safe_on_sign_out,
        };

        Ok(Self {
            auth_client_id,
            network,
            custom_rpc_url,
            auth_network,
            login_methods,
            theme,
            keep_safe_on_sign_out,
        })
    }
}

/// Split a comma separated list, dropping blanks.
///
/// Entries are not lowercased: login method names are matched exactly.
fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse a boolean flag. Unrecognised values are an error, never `false`.
fn parse_flag(name: &str, raw: &str) -> PluginResult<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" => Ok(false),
        _ => Err(PluginError::InvalidConfig(format!(
            "{name} must be true or false, got `{raw}`"
        ))),
    }
}

pub(crate) fn env_optional(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn env_or(name: &str, default: String) -> String {
    env_optional(name).unwrap_or(default)
}

fn env_required(name: &str) -> PluginResult<String> {
    env_optional(name).ok_or_else(|| PluginError::MissingConfig(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::testing::ScopedEnv;

    #[test]
    fn login_methods_round_trip_through_strings() {
        for method in LoginMethod::ALL {
            assert_eq!(method.as_str().parse::<LoginMethod>().unwrap(), method);
        }
        assert_eq!(
            serde_json::to_string(&LoginMethod::EmailPasswordless).unwrap(),
            r#""email_passwordless""#
        );
    }

    #[test]
    fn resolve_keeps_order() {
        let raw = vec!["twitter".to_string(), "google".to_string()];
        assert_eq!(
            resolve_login_methods(&raw).unwrap(),
            vec![LoginMethod::Twitter, LoginMethod::Google]
        );
    }

    #[test]
    fn resolve_rejects_empty_and_unknown() {
        assert!(matches!(
            resolve_login_methods(&[]),
            Err(PluginError::NoLoginMethods)
        ));

        let raw = vec!["google".to_string(), "myspace".to_string()];
        assert!(matches!(
            resolve_login_methods(&raw),
            Err(PluginError::UnsupportedLoginMethod(m)) if m == "myspace"
        ));

        // Matching is exact, like the enum values the modal understands
        let raw = vec!["Google".to_string()];
        assert!(resolve_login_methods(&raw).is_err());
    }

    #[test]
    fn defaults_match_legacy_plugin() {
        let options = PluginOptions::new("client");
        assert_eq!(options.network, "5");
        assert_eq!(options.auth_network, "testnet");
        assert_eq!(options.theme, Theme::Dark);
        assert_eq!(options.login_methods, vec!["google", "twitter", "facebook"]);
        assert!(options.custom_rpc_url.is_none());
        assert!(!options.keep_safe_on_sign_out);
    }

    #[test]
    fn options_deserialize_from_host_json() {
        let options: PluginOptions = serde_json::from_value(serde_json::json!({
            "web3AuthClientId": "BIV9",
            "chainId": "100",
            "customRpcUrl": "https://rpc.gnosischain.com",
            "loginMethods": ["github", "discord"],
            "theme": "light"
        }))
        .unwrap();

        assert_eq!(options.auth_client_id, "BIV9");
        assert_eq!(options.network, "100");
        assert_eq!(
            options.custom_rpc_url.as_deref(),
            Some("https://rpc.gnosischain.com")
        );
        assert_eq!(options.login_methods, vec!["github", "discord"]);
        assert_eq!(options.theme, Theme::Light);
        assert_eq!(options.auth_network, "testnet");
    }

    #[test]
    fn theme_parsing() {
        assert_eq!("LIGHT".parse::<Theme>().unwrap(), Theme::Light);
        assert_eq!("dark".parse::<Theme>().unwrap(), Theme::Dark);
        assert!(matches!(
            "sepia".parse::<Theme>(),
            Err(PluginError::InvalidConfig(msg)) if msg.contains("sepia")
        ));
    }

    #[test]
    fn split_list_drops_blanks() {
        assert_eq!(
            split_list(" google, ,twitter ,"),
            vec!["google".to_string(), "twitter".to_string()]
        );
    }

    const OPTION_VARS: &[&str] = &[
        AUTH_CLIENT_ID_ENV,
        NETWORK_ENV,
        RPC_URL_ENV,
        AUTH_NETWORK_ENV,
        LOGIN_METHODS_ENV,
        THEME_ENV,
        KEEP_SAFE_ON_SIGN_OUT_ENV,
    ];

    #[test]
    fn from_env_requires_client_id() {
        let env = ScopedEnv::new(OPTION_VARS);
        assert!(matches!(
            PluginOptions::from_env(),
            Err(PluginError::MissingConfig(name)) if name == AUTH_CLIENT_ID_ENV
        ));

        // Whitespace only counts as unset
        env.set(AUTH_CLIENT_ID_ENV, "   ");
        assert!(matches!(
            PluginOptions::from_env(),
            Err(PluginError::MissingConfig(_))
        ));
    }

    #[test]
    fn from_env_applies_defaults() {
        let env = ScopedEnv::new(OPTION_VARS);
        env.set(AUTH_CLIENT_ID_ENV, "BIV9");

        let options = PluginOptions::from_env().unwrap();
        assert_eq!(options, PluginOptions::new("BIV9"));
    }

    #[test]
    fn from_env_reads_every_option() {
        let env = ScopedEnv::new(OPTION_VARS);
        env.set(AUTH_CLIENT_ID_ENV, " BIV9 ");
        env.set(NETWORK_ENV, "100");
        env.set(RPC_URL_ENV, "https://rpc.gnosischain.com");
        env.set(AUTH_NETWORK_ENV, "mainnet");
        env.set(LOGIN_METHODS_ENV, "github, ,discord,");
        env.set(THEME_ENV, "Light");
        env.set(KEEP_SAFE_ON_SIGN_OUT_ENV, "TRUE");

        let options = PluginOptions::from_env().unwrap();
        assert_eq!(options.auth_client_id, "BIV9");
        assert_eq!(options.network, "100");
        assert_eq!(
            options.custom_rpc_url.as_deref(),
            Some("https://rpc.gnosischain.com")
        );
        assert_eq!(options.auth_network, "mainnet");
        assert_eq!(options.login_methods, vec!["github", "discord"]);
        assert_eq!(options.theme, Theme::Light);
        assert!(options.keep_safe_on_sign_out);
    }

    #[test]
    fn from_env_rejects_invalid_theme() {
        let env = ScopedEnv::new(OPTION_VARS);
        env.set(AUTH_CLIENT_ID_ENV, "BIV9");
        env.set(THEME_ENV, "sepia");

        let err = PluginOptions::from_env().unwrap_err();
        assert!(matches!(err, PluginError::InvalidConfig(_)));
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn from_env_keep_flag_is_strict() {
        let env = ScopedEnv::new(OPTION_VARS);
        env.set(AUTH_CLIENT_ID_ENV, "BIV9");

        for (raw, expected) in [("1", true), ("yes", true), ("0", false), ("No", false)] {
            env.set(KEEP_SAFE_ON_SIGN_OUT_ENV, raw);
            assert_eq!(
                PluginOptions::from_env().unwrap().keep_safe_on_sign_out,
                expected,
                "{raw}"
            );
        }

        env.set(KEEP_SAFE_ON_SIGN_OUT_ENV, "on");
        assert!(matches!(
            PluginOptions::from_env(),
            Err(PluginError::InvalidConfig(msg)) if msg.contains(KEEP_SAFE_ON_SIGN_OUT_ENV)
        ));
    }
}
