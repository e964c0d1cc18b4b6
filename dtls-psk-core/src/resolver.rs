//! PSK credential resolution.
//!
//! Picks the identity and key a client uses for a PSK handshake.
//!
//! # Resolution paths
//!
//! ```text
//! sni_enabled && server names requested
//!     identity_for_host(peer, names) --none--> fail [peer, host]
//!     key_for_host(names, identity)  --none--> fail [host, identity]
//!     => host-scoped identity (host)
//!
//! otherwise
//!     identity(peer)                 --none--> fail [peer]
//!     key(identity)                  --none--> fail [identity]
//!     => host-scoped identity (no host)   if sni_enabled
//!     => host-agnostic identity           otherwise
//! ```
//!
//! The path is fixed by the inputs. There is no fallback from one path to the
//! other, and a key is never looked up for an identity the store did not
//! return. Every failure maps to the same fatal `handshake_failure` alert, so
//! a peer cannot tell which lookup failed; the diagnostic text is for local
//! logs only.
//!
//! # Example
//!
//! ```rust
//! use dtls_psk_core::resolver::resolve;
//! use dtls_psk_core::session::DtlsSession;
//! use dtls_psk_core::store::InMemoryPskStore;
//!
//! let peer = "10.0.0.5:5684".parse().unwrap();
//! let store = InMemoryPskStore::new();
//! store.add_known_peer(peer, "client1");
//! store.set_key("client1", vec![0xAA, 0xBB]);
//!
//! let credential = resolve(false, &DtlsSession::new(peer), &store).unwrap();
//! assert_eq!(credential.identity().name(), "client1");
//! assert_eq!(credential.key().expose_secret(), &[0xAA, 0xBB]);
//! ```

use crate::alert::Alert;
use crate::error::Error;
use crate::identity::PskIdentity;
use crate::key::PreSharedKey;
use crate::session::SessionContext;
use crate::store::PskStore;
use core::fmt;
use std::net::SocketAddr;

/// Identity and key to use for one PSK handshake.
///
/// If the identity is scoped to a virtual host, the key was looked up in that
/// same host's namespace.
#[derive(Debug, PartialEq, Eq)]
pub struct ResolvedCredential {
    identity: PskIdentity,
    key: PreSharedKey,
}

impl ResolvedCredential {
    /// The resolved identity; becomes the session principal.
    pub fn identity(&self) -> &PskIdentity {
        &self.identity
    }

    /// The resolved key.
    pub fn key(&self) -> &PreSharedKey {
        &self.key
    }

    /// Split into identity and key, handing the key to the key exchange.
    pub fn into_parts(self) -> (PskIdentity, PreSharedKey) {
        (self.identity, self.key)
    }
}

/// Store lookup that came back empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LookupStep {
    /// No identity for the peer
    Identity,
    /// No key for the identity
    Key,
}

/// Why PSK credentials could not be resolved.
///
/// Terminal for the handshake attempt: the caller aborts and sends
/// [`ResolutionFailure::alert`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionFailure {
    step: LookupStep,
    peer: SocketAddr,
    host_scoped: bool,
    virtual_host: Option<String>,
    identity: Option<String>,
}

impl ResolutionFailure {
    fn identity_not_found(peer: SocketAddr, scope: Option<Option<&str>>) -> Self {
        Self {
            step: LookupStep::Identity,
            peer,
            host_scoped: scope.is_some(),
            virtual_host: scope.flatten().map(str::to_owned),
            identity: None,
        }
    }

    fn key_not_found(peer: SocketAddr, scope: Option<Option<&str>>, identity: String) -> Self {
        Self {
            step: LookupStep::Key,
            peer,
            host_scoped: scope.is_some(),
            virtual_host: scope.flatten().map(str::to_owned),
            identity: Some(identity),
        }
    }

    /// Which lookup failed.
    pub fn step(&self) -> LookupStep {
        self.step
    }

    /// Peer the handshake was with; the alert is addressed to it.
    pub fn peer(&self) -> SocketAddr {
        self.peer
    }

    /// Whether resolution ran in a virtual host's namespace.
    pub fn is_host_scoped(&self) -> bool {
        self.host_scoped
    }

    /// Host name the lookup was scoped to.
    pub fn virtual_host(&self) -> Option<&str> {
        self.virtual_host.as_deref()
    }

    /// Identity whose key was missing.
    pub fn identity(&self) -> Option<&str> {
        self.identity.as_deref()
    }

    /// The alert to send to the peer.
    pub fn alert(&self) -> Alert {
        Alert::handshake_failure()
    }

    /// Local diagnostic. Never sent to the peer.
    pub fn diagnostic(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ResolutionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let host = self.virtual_host.as_deref().unwrap_or("none");
        let identity = self.identity.as_deref().unwrap_or_default();
        match (self.step, self.host_scoped) {
            (LookupStep::Identity, true) => write!(
                f,
                "No Identity found for peer [address: {}, virtual host: {}]",
                self.peer, host
            ),
            (LookupStep::Identity, false) => {
                write!(f, "No Identity found for peer [address: {}]", self.peer)
            },
            // key failures name the identity, not the peer
            (LookupStep::Key, true) => write!(
                f,
                "No pre-shared key found for [virtual host: {}, identity: {}]",
                host, identity
            ),
            (LookupStep::Key, false) => {
                write!(f, "No pre-shared key found for [identity: {}]", identity)
            },
        }
    }
}

impl std::error::Error for ResolutionFailure {}

impl From<ResolutionFailure> for Error {
    fn from(failure: ResolutionFailure) -> Self {
        Error::HandshakeFailure(failure.to_string())
    }
}

/// Resolve the PSK identity and key for `session`.
///
/// With `sni_enabled` and server names present in the session, the identity
/// and key come from the requested virtual host's namespace; otherwise from
/// the store's default namespace. The store is consulted at most twice and
/// nothing is cached between calls.
///
/// A session that requested a virtual host without supporting SNI only
/// produces a warning; resolution still runs in the host's namespace.
pub fn resolve<C, S>(
    sni_enabled: bool,
    session: &C,
    store: &S,
) -> core::result::Result<ResolvedCredential, ResolutionFailure>
where
    C: SessionContext + ?Sized,
    S: PskStore + ?Sized,
{
    let peer = session.peer();

    match session.server_names() {
        Some(server_names) if sni_enabled => {
            if !session.is_sni_supported() {
                tracing::warn!(
                    %peer,
                    "client is configured to use SNI but server does not support it, \
                     PSK authentication is likely to fail"
                );
            }

            let host = server_names.host_name();
            tracing::trace!(%peer, virtual_host = ?host, "Resolving host-scoped PSK identity");

            let identity = store
                .identity_for_host(peer, server_names)
                .ok_or_else(|| ResolutionFailure::identity_not_found(peer, Some(host)))?;
            let key = store
                .key_for_host(server_names, &identity)
                .ok_or_else(|| ResolutionFailure::key_not_found(peer, Some(host), identity.clone()))?;

            Ok(ResolvedCredential {
                identity: PskIdentity::host_scoped(host, identity),
                key,
            })
        },
        _ => {
            tracing::trace!(%peer, "Resolving PSK identity");

            let identity = store
                .identity(peer)
                .ok_or_else(|| ResolutionFailure::identity_not_found(peer, None))?;
            let key = store
                .key(&identity)
                .ok_or_else(|| ResolutionFailure::key_not_found(peer, None, identity.clone()))?;

            let identity = if sni_enabled {
                PskIdentity::host_scoped(None, identity)
            } else {
                PskIdentity::host_agnostic(identity)
            };
            Ok(ResolvedCredential { identity, key })
        },
    }
}
