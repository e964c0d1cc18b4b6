//! # DTLS PSK
//!
//! Pre-shared key authentication for DTLS 1.2 clients, with credentials
//! scoped per virtual host when Server Name Indication is enabled.
//!
//! ## Quick Start
//!
//! ```rust
//! use dtls_psk::key_exchange::{ClientPskKeyExchange, OtherSecret};
//! use dtls_psk::session::DtlsSession;
//! use dtls_psk::store::InMemoryPskStore;
//! use dtls_psk::ClientConfig;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ClientConfig::builder().with_sni(true).build()?;
//!
//! let peer = "10.0.0.5:5684".parse()?;
//! let store = InMemoryPskStore::new();
//! store.add_known_peer_for_host(peer, "coap.example.com", "device-17");
//! store.set_key_for_host("coap.example.com", "device-17", b"secretPSK".to_vec());
//!
//! let session = DtlsSession::new(peer).with_virtual_host("coap.example.com")?;
//!
//! match ClientPskKeyExchange::new(&config).negotiate(&session, &store, OtherSecret::Zeros) {
//!     Ok(exchange) => {
//!         assert_eq!(exchange.principal().name(), "coap.example.com:device-17");
//!         // send exchange.client_key_exchange(), derive the master secret
//!         // from exchange.premaster_secret()
//!     },
//!     Err(abort) => {
//!         // send abort.wire_alert() and terminate the handshake
//!         return Err(abort.into());
//!     },
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Feature Flags
//!
//! - `log` (default): Forward `tracing` events to `log` when no subscriber is set

#![warn(
    missing_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub,
    unused_qualifications
)]
#![forbid(unsafe_code)]

// Re-export core types
pub use dtls_psk_core::{
    self, alert, error, identity, resolver, server_names, session, store, Config, Error,
    PreSharedKey, PskIdentity, Result,
};

// Public modules
pub mod client;
pub mod key_exchange;

// Re-exports
pub use client::ClientConfig;
pub use key_exchange::{ClientPskKeyExchange, HandshakeAbort, PskKeyExchange};

/// Crate version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get the crate version.
pub fn version() -> &'static str {
    VERSION
}
