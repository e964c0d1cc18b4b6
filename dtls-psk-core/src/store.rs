//! PSK credential stores.
//!
//! A store maps peers to identities and identities to keys, either in its
//! default namespace or in the namespace of a virtual host. Absence is an
//! ordinary answer: unknown peers and identities are expected during normal
//! operation and are reported as `None`.
//!
//! # Example
//!
//! ```rust
//! use dtls_psk_core::server_names::ServerNames;
//! use dtls_psk_core::store::{InMemoryPskStore, PskStore};
//!
//! let store = InMemoryPskStore::new();
//! let peer = "10.0.0.5:5684".parse().unwrap();
//! store.add_known_peer(peer, "client1");
//! store.set_key("client1", vec![0xAA, 0xBB]);
//!
//! assert_eq!(store.identity(peer).as_deref(), Some("client1"));
//! assert!(store.key("client1").is_some());
//!
//! let host = ServerNames::from_host_name("a.example.com").unwrap();
//! assert!(store.key_for_host(&host, "client1").is_none());
//! ```

use crate::key::PreSharedKey;
use crate::server_names::ServerNames;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use zeroize::Zeroizing;

/// Lookup contract used by PSK resolution.
///
/// Implementations are shared between concurrent handshakes. Lookups may
/// block; callers that need bounded latency enforce it around the handshake.
pub trait PskStore: Send + Sync {
    /// Identity to use towards `peer` in the default namespace.
    fn identity(&self, peer: SocketAddr) -> Option<String>;

    /// Identity to use towards `peer` for the given virtual host.
    fn identity_for_host(&self, peer: SocketAddr, server_names: &ServerNames) -> Option<String>;

    /// Key for `identity` in the default namespace.
    fn key(&self, identity: &str) -> Option<PreSharedKey>;

    /// Key for `identity` in the namespace of the given virtual host.
    fn key_for_host(&self, server_names: &ServerNames, identity: &str) -> Option<PreSharedKey>;
}

impl<S: PskStore + ?Sized> PskStore for Arc<S> {
    fn identity(&self, peer: SocketAddr) -> Option<String> {
        (**self).identity(peer)
    }

    fn identity_for_host(&self, peer: SocketAddr, server_names: &ServerNames) -> Option<String> {
        (**self).identity_for_host(peer, server_names)
    }

    fn key(&self, identity: &str) -> Option<PreSharedKey> {
        (**self).key(identity)
    }

    fn key_for_host(&self, server_names: &ServerNames, identity: &str) -> Option<PreSharedKey> {
        (**self).key_for_host(server_names, identity)
    }
}

#[derive(Default)]
struct Tables {
    /// identity -> key, default namespace
    keys: HashMap<String, Zeroizing<Vec<u8>>>,
    /// (host, identity) -> key
    host_keys: HashMap<(String, String), Zeroizing<Vec<u8>>>,
    /// peer -> identity, default namespace
    peers: HashMap<SocketAddr, String>,
    /// (peer, host) -> identity
    host_peers: HashMap<(SocketAddr, String), String>,
}

/// Thread-safe in-memory store with per-host namespaces.
///
/// Host names are matched case-insensitively.
#[derive(Default)]
pub struct InMemoryPskStore {
    tables: RwLock<Tables>,
}

impl core::fmt::Debug for InMemoryPskStore {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let tables = self.read();
        f.debug_struct("InMemoryPskStore")
            .field("keys", &(tables.keys.len() + tables.host_keys.len()))
            .field("known_peers", &(tables.peers.len() + tables.host_peers.len()))
            .finish()
    }
}

impl InMemoryPskStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    // Every write replaces a single entry, so a panicking writer cannot leave
    // the tables half-updated.
    fn read(&self) -> RwLockReadGuard<'_, Tables> {
        self.tables.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Tables> {
        self.tables.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Set the key of `identity` in the default namespace.
    pub fn set_key(&self, identity: impl Into<String>, key: Vec<u8>) {
        self.write()
            .keys
            .insert(identity.into(), Zeroizing::new(key));
    }

    /// Set the key of `identity` for `host_name`.
    pub fn set_key_for_host(&self, host_name: &str, identity: impl Into<String>, key: Vec<u8>) {
        self.write().host_keys.insert(
            (host_name.to_ascii_lowercase(), identity.into()),
            Zeroizing::new(key),
        );
    }

    /// Remove the key of `identity` from the default namespace.
    ///
    /// Returns whether a key was present.
    pub fn remove_key(&self, identity: &str) -> bool {
        self.write().keys.remove(identity).is_some()
    }

    /// Remove the key of `identity` for `host_name`.
    pub fn remove_key_for_host(&self, host_name: &str, identity: &str) -> bool {
        self.write()
            .host_keys
            .remove(&(host_name.to_ascii_lowercase(), identity.to_owned()))
            .is_some()
    }

    /// Use `identity` when connecting to `peer`.
    pub fn add_known_peer(&self, peer: SocketAddr, identity: impl Into<String>) {
        self.write().peers.insert(peer, identity.into());
    }

    /// Use `identity` when connecting to `host_name` at `peer`.
    pub fn add_known_peer_for_host(
        &self,
        peer: SocketAddr,
        host_name: &str,
        identity: impl Into<String>,
    ) {
        self.write()
            .host_peers
            .insert((peer, host_name.to_ascii_lowercase()), identity.into());
    }
}

impl PskStore for InMemoryPskStore {
    fn identity(&self, peer: SocketAddr) -> Option<String> {
        self.read().peers.get(&peer).cloned()
    }

    fn identity_for_host(&self, peer: SocketAddr, server_names: &ServerNames) -> Option<String> {
        // ServerNames keeps host names lowercased
        let host = server_names.host_name()?;
        self.read()
            .host_peers
            .get(&(peer, host.to_owned()))
            .cloned()
    }

    fn key(&self, identity: &str) -> Option<PreSharedKey> {
        self.read()
            .keys
            .get(identity)
            .map(|key| PreSharedKey::from_slice(key))
    }

    fn key_for_host(&self, server_names: &ServerNames, identity: &str) -> Option<PreSharedKey> {
        let host = server_names.host_name()?;
        self.read()
            .host_keys
            .get(&(host.to_owned(), identity.to_owned()))
            .map(|key| PreSharedKey::from_slice(key))
    }
}

/// Store holding a single identity and key, used for every peer and host.
pub struct StaticPskStore {
    identity: String,
    key: Zeroizing<Vec<u8>>,
}

impl StaticPskStore {
    /// Create a store answering every lookup with `identity` and `key`.
    pub fn new(identity: impl Into<String>, key: Vec<u8>) -> Self {
        Self {
            identity: identity.into(),
            key: Zeroizing::new(key),
        }
    }

    fn key_of(&self, identity: &str) -> Option<PreSharedKey> {
        (identity == self.identity).then(|| PreSharedKey::from_slice(&self.key))
    }
}

impl core::fmt::Debug for StaticPskStore {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("StaticPskStore")
            .field("identity", &self.identity)
            .finish_non_exhaustive()
    }
}

impl PskStore for StaticPskStore {
    fn identity(&self, _peer: SocketAddr) -> Option<String> {
        Some(self.identity.clone())
    }

    fn identity_for_host(&self, _peer: SocketAddr, _server_names: &ServerNames) -> Option<String> {
        Some(self.identity.clone())
    }

    fn key(&self, identity: &str) -> Option<PreSharedKey> {
        self.key_of(identity)
    }

    fn key_for_host(&self, _server_names: &ServerNames, identity: &str) -> Option<PreSharedKey> {
        self.key_of(identity)
    }
}
