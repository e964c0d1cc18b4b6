//! PSK client configuration.

use dtls_psk_core::{Config, Error, Result};

/// Client-specific configuration for PSK handshakes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base PSK configuration
    pub config: Config,

    /// Resolve credentials in the namespace of the requested virtual host
    pub enable_sni: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            config: Config::default(),
            enable_sni: false,
        }
    }
}

impl ClientConfig {
    /// Create a new configuration builder.
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }
}

/// Builder for client configuration.
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    /// Replace the base configuration.
    pub fn with_config(mut self, config: Config) -> Self {
        self.config.config = config;
        self
    }

    /// Enable or disable SNI-scoped credential resolution.
    pub fn with_sni(mut self, enable: bool) -> Self {
        self.config.enable_sni = enable;
        self
    }

    /// Set the longest PSK identity the client will send.
    pub fn with_max_psk_identity_length(mut self, length: usize) -> Self {
        self.config.config.max_psk_identity_length = length;
        self
    }

    /// Build the client configuration.
    pub fn build(self) -> Result<ClientConfig> {
        let config = Config::builder()
            .with_max_psk_identity_length(self.config.config.max_psk_identity_length)
            .build()
            .map_err(|e| match e {
                Error::InvalidConfig(msg) => Error::InvalidConfig(format!("client: {}", msg)),
                other => other,
            })?;

        Ok(ClientConfig {
            config,
            enable_sni: self.config.enable_sni,
        })
    }
}
