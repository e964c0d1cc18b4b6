//! # DTLS PSK Core
//!
//! Pre-shared key credential resolution for DTLS 1.2 handshakes.
//!
//! A client that selects a PSK cipher suite must decide which identity to
//! announce and which key to feed into the key exchange. This crate makes that
//! decision from:
//! - the peer address and requested virtual host of the session
//!   ([`session::SessionContext`])
//! - a credential store with a default namespace and per-host namespaces
//!   ([`store::PskStore`])
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │      Handshake / key exchange (dtls-psk) │
//! └─────────────────┬───────────────────────┘
//!                   │ resolve()
//! ┌─────────────────▼───────────────────────┐
//! │       dtls-psk-core (this crate)        │
//! │  ┌──────────────────────────────────┐   │
//! │  │   Credential resolver            │   │
//! │  ├──────────────────────────────────┤   │
//! │  │   Session context / SNI          │   │
//! │  ├──────────────────────────────────┤   │
//! │  │   Alerts and errors              │   │
//! │  └──────────────────────────────────┘   │
//! └─────────────────┬───────────────────────┘
//!                   │ lookups
//! ┌─────────────────▼───────────────────────┐
//! │       PskStore (embedder supplied)      │
//! └─────────────────────────────────────────┘
//! ```

#![warn(
    missing_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub,
    unused_qualifications
)]
#![forbid(unsafe_code)]

pub mod alert;
pub mod error;
pub mod identity;
pub mod key;
pub mod resolver;
pub mod server_names;
pub mod session;
pub mod store;

// Re-exports
pub use error::{Error, Result};
pub use identity::PskIdentity;
pub use key::PreSharedKey;
pub use resolver::{resolve, ResolutionFailure, ResolvedCredential};

/// Identity length every implementation must accept (RFC 4279 Section 5.3).
pub const MIN_PSK_IDENTITY_LENGTH: usize = 128;

/// Longest identity the ClientKeyExchange can carry.
pub const MAX_PSK_IDENTITY_LENGTH: usize = u16::MAX as usize;

/// Base PSK configuration shared by client and server.
///
/// # Example
///
/// ```rust
/// use dtls_psk_core::Config;
///
/// let config = Config::builder()
///     .with_max_psk_identity_length(256)
///     .build()
///     .unwrap();
/// assert_eq!(config.max_psk_identity_length, 256);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Longest PSK identity, in bytes, that will be sent or accepted
    pub max_psk_identity_length: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_psk_identity_length: MIN_PSK_IDENTITY_LENGTH,
        }
    }
}

impl Config {
    /// Create a new configuration builder.
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// Configuration builder.
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the longest PSK identity that will be sent or accepted.
    pub fn with_max_psk_identity_length(mut self, length: usize) -> Self {
        self.config.max_psk_identity_length = length;
        self
    }

    /// Build the configuration.
    pub fn build(self) -> Result<Config> {
        let length = self.config.max_psk_identity_length;
        if length == 0 {
            return Err(Error::InvalidConfig(
                "Max PSK identity length must not be zero".into(),
            ));
        }
        if length > MAX_PSK_IDENTITY_LENGTH {
            return Err(Error::InvalidConfig(format!(
                "Max PSK identity length {} exceeds {}",
                length, MAX_PSK_IDENTITY_LENGTH
            )));
        }

        Ok(self.config)
    }
}
