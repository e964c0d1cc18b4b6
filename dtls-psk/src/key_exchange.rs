//! Client side of the DTLS 1.2 PSK key exchange (RFC 4279, RFC 5489).
//!
//! Resolves the credentials for a session, encodes the identity for the
//! ClientKeyExchange message and turns the key into the premaster secret.
//!
//! ```text
//! struct {
//!     opaque psk_identity<0..2^16-1>;
//! } ClientKeyExchange;                       (PSK)
//!
//! premaster_secret = uint16 N || other_secret[N] || uint16 M || psk[M]
//!     other_secret = N zero bytes, N = M     (PSK)
//!     other_secret = ECDH shared secret      (ECDHE_PSK)
//! ```
//!
//! The key is consumed by the premaster computation; only the zeroizing
//! premaster secret leaves this module.

use crate::client::ClientConfig;
use bytes::{BufMut, BytesMut};
use core::fmt;
use dtls_psk_core::alert::Alert;
use dtls_psk_core::resolver::{resolve, ResolutionFailure};
use dtls_psk_core::session::SessionContext;
use dtls_psk_core::store::PskStore;
use dtls_psk_core::{Error, PreSharedKey, PskIdentity, Result};
use zeroize::Zeroizing;

/// Source of the `other_secret` half of the premaster secret.
#[derive(Clone, Copy)]
pub enum OtherSecret<'a> {
    /// Plain PSK: zeros of the key's length
    Zeros,
    /// ECDHE_PSK: the ECDH shared secret
    Ecdhe(&'a [u8]),
}

impl fmt::Debug for OtherSecret<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OtherSecret::Zeros => f.write_str("Zeros"),
            OtherSecret::Ecdhe(secret) => write!(f, "Ecdhe({} bytes)", secret.len()),
        }
    }
}

/// Build the premaster secret, consuming `psk`.
pub fn compute_premaster_secret(
    psk: PreSharedKey,
    other_secret: OtherSecret<'_>,
) -> Result<Zeroizing<Vec<u8>>> {
    let psk = psk.into_secret();
    if psk.len() > u16::MAX as usize {
        return Err(Error::InternalError("PSK longer than 65535 bytes".into()));
    }

    let zeros;
    let other = match other_secret {
        OtherSecret::Zeros => {
            zeros = vec![0u8; psk.len()];
            zeros.as_slice()
        },
        OtherSecret::Ecdhe(secret) => {
            if secret.len() > u16::MAX as usize {
                return Err(Error::InternalError(
                    "ECDH shared secret longer than 65535 bytes".into(),
                ));
            }
            secret
        },
    };

    // exact capacity: a reallocation would leave an unzeroized copy behind
    let mut premaster = Zeroizing::new(Vec::with_capacity(4 + other.len() + psk.len()));
    premaster.put_u16(other.len() as u16);
    premaster.put_slice(other);
    premaster.put_u16(psk.len() as u16);
    premaster.put_slice(&psk);

    Ok(premaster)
}

/// Encode `identity` as the ClientKeyExchange `psk_identity` field.
pub fn encode_psk_identity(identity: &str, max_length: usize) -> Result<Vec<u8>> {
    let length = identity.len();
    if length > max_length || length > u16::MAX as usize {
        return Err(Error::InvalidConfig(format!(
            "PSK identity of {} bytes exceeds limit of {}",
            length, max_length
        )));
    }

    let mut buf = BytesMut::with_capacity(2 + length);
    buf.put_u16(length as u16);
    buf.put_slice(identity.as_bytes());
    Ok(buf.to_vec())
}

/// Decode the `psk_identity` field of a ClientKeyExchange.
pub fn decode_psk_identity(data: &[u8], max_length: usize) -> Result<String> {
    if data.len() < 2 {
        return Err(Error::InvalidMessage("PSK identity too short".into()));
    }
    let length = u16::from_be_bytes([data[0], data[1]]) as usize;
    if data.len() != 2 + length {
        return Err(Error::InvalidMessage("PSK identity length mismatch".into()));
    }
    if length > max_length {
        return Err(Error::InvalidMessage(format!(
            "PSK identity of {} bytes exceeds limit of {}",
            length, max_length
        )));
    }

    String::from_utf8(data[2..].to_vec())
        .map_err(|_| Error::InvalidMessage("Invalid UTF-8 in PSK identity".into()))
}

/// Why a PSK handshake has to be aborted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandshakeAbort {
    /// No credentials for this session
    Resolution(ResolutionFailure),
    /// Credentials resolved but unusable locally
    Local(Error),
}

impl HandshakeAbort {
    /// Fatal alert to send before terminating the handshake.
    pub fn alert(&self) -> Alert {
        match self {
            HandshakeAbort::Resolution(failure) => failure.alert(),
            HandshakeAbort::Local(_) => Alert::internal_error(),
        }
    }

    /// The alert as sent on the wire.
    pub fn wire_alert(&self) -> [u8; 2] {
        self.alert().encode()
    }
}

impl fmt::Display for HandshakeAbort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandshakeAbort::Resolution(failure) => write!(f, "{}", failure),
            HandshakeAbort::Local(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for HandshakeAbort {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            HandshakeAbort::Resolution(failure) => Some(failure),
            HandshakeAbort::Local(err) => Some(err),
        }
    }
}

impl From<ResolutionFailure> for HandshakeAbort {
    fn from(failure: ResolutionFailure) -> Self {
        HandshakeAbort::Resolution(failure)
    }
}

impl From<Error> for HandshakeAbort {
    fn from(err: Error) -> Self {
        HandshakeAbort::Local(err)
    }
}

/// Outcome of a successful client PSK key exchange.
pub struct PskKeyExchange {
    principal: PskIdentity,
    client_key_exchange: Vec<u8>,
    premaster_secret: Zeroizing<Vec<u8>>,
}

impl fmt::Debug for PskKeyExchange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PskKeyExchange")
            .field("principal", &self.principal)
            .field("client_key_exchange", &self.client_key_exchange)
            .finish_non_exhaustive()
    }
}

impl PskKeyExchange {
    /// Principal of the session.
    pub fn principal(&self) -> &PskIdentity {
        &self.principal
    }

    /// Encoded `psk_identity` for the ClientKeyExchange.
    pub fn client_key_exchange(&self) -> &[u8] {
        &self.client_key_exchange
    }

    /// Premaster secret for the master secret derivation.
    pub fn premaster_secret(&self) -> &[u8] {
        &self.premaster_secret
    }

    /// Take the premaster secret, dropping the rest.
    pub fn into_premaster_secret(self) -> Zeroizing<Vec<u8>> {
        self.premaster_secret
    }
}

/// Client PSK key exchange for one handshake.
#[derive(Debug, Clone, Copy)]
pub struct ClientPskKeyExchange<'a> {
    config: &'a ClientConfig,
}

impl<'a> ClientPskKeyExchange<'a> {
    /// Create a key exchange using `config`.
    pub fn new(config: &'a ClientConfig) -> Self {
        Self { config }
    }

    /// Resolve credentials for `session` and derive the premaster secret.
    ///
    /// On error the handshake must be terminated with
    /// [`HandshakeAbort::alert`]; the diagnostic is only logged locally.
    pub fn negotiate<C, S>(
        &self,
        session: &C,
        store: &S,
        other_secret: OtherSecret<'_>,
    ) -> core::result::Result<PskKeyExchange, HandshakeAbort>
    where
        C: SessionContext + ?Sized,
        S: PskStore + ?Sized,
    {
        let result = self.run(session, store, other_secret);
        match &result {
            Ok(exchange) => {
                tracing::debug!(
                    peer = %session.peer(),
                    principal = %exchange.principal.name(),
                    "Resolved PSK credentials"
                );
            },
            Err(abort) => {
                tracing::debug!(
                    peer = %session.peer(),
                    alert = ?abort.alert().description,
                    "Aborting PSK handshake: {}",
                    abort
                );
            },
        }
        result
    }

    fn run<C, S>(
        &self,
        session: &C,
        store: &S,
        other_secret: OtherSecret<'_>,
    ) -> core::result::Result<PskKeyExchange, HandshakeAbort>
    where
        C: SessionContext + ?Sized,
        S: PskStore + ?Sized,
    {
        let (principal, key) = resolve(self.config.enable_sni, session, store)?.into_parts();
        let client_key_exchange =
            encode_psk_identity(principal.identity(), self.config.config.max_psk_identity_length)?;
        let premaster_secret = compute_premaster_secret(key, other_secret)?;

        Ok(PskKeyExchange {
            principal,
            client_key_exchange,
            premaster_secret,
        })
    }
}
