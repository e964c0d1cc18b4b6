//! The handshake session as seen by PSK resolution.

use crate::error::Result;
use crate::server_names::ServerNames;
use std::net::SocketAddr;

/// Read-only view of the session a PSK handshake runs in.
pub trait SessionContext {
    /// Address of the handshake peer.
    fn peer(&self) -> SocketAddr;

    /// Server names requested for this session, if any.
    fn server_names(&self) -> Option<&ServerNames>;

    /// Whether the negotiated session supports server name indication.
    fn is_sni_supported(&self) -> bool;

    /// Host name of the requested virtual host.
    fn virtual_host(&self) -> Option<&str> {
        self.server_names().and_then(ServerNames::host_name)
    }
}

/// Session state held by a DTLS 1.2 handshake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DtlsSession {
    peer: SocketAddr,
    server_names: Option<ServerNames>,
    sni_supported: bool,
}

impl DtlsSession {
    /// Create a session for `peer` without server names.
    ///
    /// SNI is considered supported until the peer's hello says otherwise.
    pub fn new(peer: SocketAddr) -> Self {
        Self {
            peer,
            server_names: None,
            sni_supported: true,
        }
    }

    /// Set the requested server names.
    pub fn with_server_names(mut self, server_names: ServerNames) -> Self {
        self.server_names = Some(server_names);
        self
    }

    /// Request a single virtual host by name.
    pub fn with_virtual_host(self, host_name: &str) -> Result<Self> {
        Ok(self.with_server_names(ServerNames::from_host_name(host_name)?))
    }

    /// Record whether the negotiated session supports SNI.
    pub fn with_sni_supported(mut self, supported: bool) -> Self {
        self.sni_supported = supported;
        self
    }
}

impl SessionContext for DtlsSession {
    fn peer(&self) -> SocketAddr {
        self.peer
    }

    fn server_names(&self) -> Option<&ServerNames> {
        self.server_names.as_ref()
    }

    fn is_sni_supported(&self) -> bool {
        self.sni_supported
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_defaults() {
        let peer: SocketAddr = "10.0.0.5:5684".parse().unwrap();
        let session = DtlsSession::new(peer);

        assert_eq!(session.peer(), peer);
        assert!(session.server_names().is_none());
        assert_eq!(session.virtual_host(), None);
        assert!(session.is_sni_supported());
    }

    #[test]
    fn test_virtual_host() {
        let session = DtlsSession::new("[::1]:5684".parse().unwrap())
            .with_virtual_host("a.example.com")
            .unwrap()
            .with_sni_supported(false);

        assert_eq!(session.virtual_host(), Some("a.example.com"));
        assert!(!session.is_sni_supported());
    }
}
