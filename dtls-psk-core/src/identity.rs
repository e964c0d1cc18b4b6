//! Resolved PSK identities and the principal names derived from them.

use core::fmt;

/// A PSK identity together with the namespace it was resolved in.
///
/// `HostScoped` with no host is the identity of a session that had server
/// name indication enabled but did not request a host; it yields a different
/// principal name than a `HostAgnostic` identity with the same string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PskIdentity {
    /// Identity from the store's default namespace, SNI not in use.
    HostAgnostic {
        /// Identity string
        identity: String,
    },

    /// Identity resolved with SNI enabled.
    ///
    /// `virtual_host` is `None` both when no server names were requested,
    /// so the default namespace was used, and when the requested server
    /// names carry no `host_name` entry. The two share the `:identity`
    /// principal name.
    HostScoped {
        /// Virtual host the identity belongs to
        virtual_host: Option<String>,
        /// Identity string
        identity: String,
    },
}

impl PskIdentity {
    /// Identity from the default namespace.
    pub fn host_agnostic(identity: impl Into<String>) -> Self {
        PskIdentity::HostAgnostic {
            identity: identity.into(),
        }
    }

    /// Identity within the namespace of `virtual_host`.
    pub fn host_scoped(virtual_host: Option<&str>, identity: impl Into<String>) -> Self {
        PskIdentity::HostScoped {
            virtual_host: virtual_host.map(str::to_owned),
            identity: identity.into(),
        }
    }

    /// The identity string as sent in the ClientKeyExchange.
    pub fn identity(&self) -> &str {
        match self {
            PskIdentity::HostAgnostic { identity } | PskIdentity::HostScoped { identity, .. } => {
                identity.as_str()
            },
        }
    }

    /// Virtual host of a host-scoped identity.
    pub fn virtual_host(&self) -> Option<&str> {
        match self {
            PskIdentity::HostAgnostic { .. } => None,
            PskIdentity::HostScoped { virtual_host, .. } => virtual_host.as_deref(),
        }
    }

    /// Whether the identity was resolved with SNI enabled.
    pub fn is_host_scoped(&self) -> bool {
        matches!(self, PskIdentity::HostScoped { .. })
    }

    /// Principal name: `identity` for host-agnostic identities,
    /// `virtual_host:identity` for host-scoped ones (empty host if none).
    pub fn name(&self) -> String {
        match self {
            PskIdentity::HostAgnostic { identity } => identity.clone(),
            PskIdentity::HostScoped {
                virtual_host,
                identity,
            } => format!("{}:{}", virtual_host.as_deref().unwrap_or(""), identity),
        }
    }
}

impl fmt::Display for PskIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PreSharedKey Identity [{}]", self.name())
    }
}
