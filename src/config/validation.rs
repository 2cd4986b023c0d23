//! Configuration validation.
//!
//! Semantic checks on top of serde's syntactic ones: addresses must parse,
//! URLs must be well-formed, numbers must be in range. Every problem found
//! is reported, not just the first.

use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;

use solana_sdk::pubkey::Pubkey;
use url::Url;

use crate::chain::Cluster;
use crate::config::schema::MintlyConfig;

/// A single configuration problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: String,

    /// What is wrong with it.
    pub message: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a configuration, collecting all errors.
pub fn validate_config(config: &MintlyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.server.bind_address.parse::<SocketAddr>().is_err() {
        push(
            &mut errors,
            "server.bind_address",
            format!("not a valid socket address: '{}'", config.server.bind_address),
        );
    }
    if let Some(tls) = &config.server.tls {
        if tls.cert_path.is_empty() {
            push(&mut errors, "server.tls.cert_path", "must not be empty");
        }
        if tls.key_path.is_empty() {
            push(&mut errors, "server.tls.key_path", "must not be empty");
        }
    }
    if config.server.request_timeout_secs == 0 {
        push(&mut errors, "server.request_timeout_secs", "must be greater than zero");
    }

    if Cluster::from_str(&config.cluster.default_network).is_err() {
        push(
            &mut errors,
            "cluster.default_network",
            format!("unknown network '{}'", config.cluster.default_network),
        );
    }
    for (network, urls) in &config.cluster.rpc_urls {
        if Cluster::from_str(network).is_err() {
            push(
                &mut errors,
                "cluster.rpc_urls",
                format!("unknown network '{}'", network),
            );
        }
        for url in urls {
            if Url::parse(url).is_err() {
                push(
                    &mut errors,
                    "cluster.rpc_urls",
                    format!("invalid endpoint URL '{}' for '{}'", url, network),
                );
            }
        }
    }
    if config.cluster.rpc_timeout_secs == 0 {
        push(&mut errors, "cluster.rpc_timeout_secs", "must be greater than zero");
    }

    if Url::parse(&config.storage.api_url).is_err() {
        push(
            &mut errors,
            "storage.api_url",
            format!("invalid URL '{}'", config.storage.api_url),
        );
    }
    if Url::parse(&config.storage.gateway_url).is_err() {
        push(
            &mut errors,
            "storage.gateway_url",
            format!("invalid URL '{}'", config.storage.gateway_url),
        );
    }
    if config.storage.upload_timeout_secs == 0 {
        push(&mut errors, "storage.upload_timeout_secs", "must be greater than zero");
    }

    if config.mint.default_decimals > 9 {
        push(&mut errors, "mint.default_decimals", "must be at most 9");
    }
    if config.mint.default_mint_amount == 0 {
        push(&mut errors, "mint.default_mint_amount", "must be at least 1");
    }
    if config.mint.max_image_bytes == 0 {
        push(&mut errors, "mint.max_image_bytes", "must be greater than zero");
    }
    // The negated comparisons also catch NaN.
    if !(config.mint.min_balance_sol >= 0.0) {
        push(&mut errors, "mint.min_balance_sol", "must be a non-negative number");
    }
    if !(config.mint.fee_sol >= 0.0) {
        push(&mut errors, "mint.fee_sol", "must be a non-negative number");
    }
    if let Some(recipient) = &config.mint.fee_recipient {
        if Pubkey::from_str(recipient).is_err() {
            push(
                &mut errors,
                "mint.fee_recipient",
                format!("not a valid base58 address: '{}'", recipient),
            );
        }
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        push(
            &mut errors,
            "observability.metrics_address",
            format!(
                "not a valid socket address: '{}'",
                config.observability.metrics_address
            ),
        );
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn push(errors: &mut Vec<ValidationError>, field: &str, message: impl Into<String>) {
    errors.push(ValidationError {
        field: field.to_string(),
        message: message.into(),
    });
}
