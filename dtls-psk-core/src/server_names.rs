//! Server Name Indication (RFC 6066 Section 3).
//!
//! A client names the virtual host it wants to reach in the `server_name`
//! extension. The decoded list is what scopes PSK lookups to a host.
//!
//! ```text
//! struct {
//!     NameType name_type;
//!     select (name_type) {
//!         case host_name: HostName;
//!     } name;
//! } ServerName;
//!
//! enum { host_name(0), (255) } NameType;
//! opaque HostName<1..2^16-1>;
//!
//! struct {
//!     ServerName server_name_list<1..2^16-1>
//! } ServerNameList;
//! ```
//!
//! Host names are further limited to [`MAX_HOST_NAME_LENGTH`] bytes, the
//! longest name DNS can carry.

use crate::error::{Error, Result};
use bytes::{BufMut, BytesMut};
use std::net::IpAddr;

/// Longest DNS host name, without the trailing dot (RFC 1035).
pub const MAX_HOST_NAME_LENGTH: usize = 253;

/// Upper bound of the encoded `server_name_list`.
const MAX_LIST_LENGTH: usize = u16::MAX as usize;

/// Type byte and length prefix of one entry.
const ENTRY_HEADER_LENGTH: usize = 3;

/// Name type of a `ServerName` entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NameType {
    /// DNS host name (0)
    HostName,
    /// Name type this implementation does not interpret
    Unknown(u8),
}

impl NameType {
    /// Convert from wire format (u8).
    pub const fn from_u8(value: u8) -> Self {
        match value {
            0 => NameType::HostName,
            other => NameType::Unknown(other),
        }
    }

    /// Convert to wire format (u8).
    pub const fn to_u8(self) -> u8 {
        match self {
            NameType::HostName => 0,
            NameType::Unknown(value) => value,
        }
    }
}

/// A single entry of the server name list.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ServerName {
    name_type: NameType,
    name: Vec<u8>,
}

impl ServerName {
    /// Create a `host_name` entry.
    ///
    /// Host names are DNS names and are stored lowercased. IP literals and
    /// names with a trailing dot are rejected, as RFC 6066 requires.
    pub fn host_name(name: &str) -> Result<Self> {
        validate_host_name(name.as_bytes())?;
        Ok(Self {
            name_type: NameType::HostName,
            name: name.to_ascii_lowercase().into_bytes(),
        })
    }

    /// Create an entry of a name type that is carried but not interpreted.
    pub fn opaque(name_type: u8, name: Vec<u8>) -> Result<Self> {
        let name_type = NameType::from_u8(name_type);
        if name_type == NameType::HostName {
            return Err(Error::InvalidMessage(
                "host_name entries must be created with ServerName::host_name".into(),
            ));
        }
        if name.is_empty() || name.len() > MAX_LIST_LENGTH - ENTRY_HEADER_LENGTH {
            return Err(Error::InvalidMessage("ServerName length out of range".into()));
        }
        Ok(Self { name_type, name })
    }

    fn encoded_len(&self) -> usize {
        ENTRY_HEADER_LENGTH + self.name.len()
    }

    /// Name type of this entry.
    pub fn name_type(&self) -> NameType {
        self.name_type
    }

    /// Raw name bytes.
    pub fn name(&self) -> &[u8] {
        &self.name
    }

    /// Name as a string, if this is a `host_name` entry.
    pub fn as_host_name(&self) -> Option<&str> {
        match self.name_type {
            // validated ASCII on construction
            NameType::HostName => core::str::from_utf8(&self.name).ok(),
            NameType::Unknown(_) => None,
        }
    }
}

fn validate_host_name(name: &[u8]) -> Result<()> {
    if name.is_empty() || name.len() > MAX_HOST_NAME_LENGTH {
        return Err(Error::InvalidMessage("HostName length out of range".into()));
    }
    if !name.is_ascii() {
        return Err(Error::InvalidMessage("HostName must be ASCII".into()));
    }
    if name.ends_with(b".") {
        return Err(Error::InvalidMessage(
            "HostName must not end with a dot".into(),
        ));
    }
    let text = core::str::from_utf8(name)
        .map_err(|_| Error::InvalidMessage("HostName must be ASCII".into()))?;
    if text.parse::<IpAddr>().is_ok() {
        return Err(Error::InvalidMessage(
            "HostName must not be an IP literal".into(),
        ));
    }
    Ok(())
}

/// The server name list sent in the `server_name` extension.
///
/// A list never holds two entries of the same [`NameType`], and its entries
/// always fit in the 16-bit list length.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ServerNames {
    names: Vec<ServerName>,
}

impl ServerNames {
    /// Create a list with a single `host_name` entry.
    pub fn from_host_name(host_name: &str) -> Result<Self> {
        Ok(Self {
            names: vec![ServerName::host_name(host_name)?],
        })
    }

    /// Add an entry to the list.
    pub fn add(&mut self, name: ServerName) -> Result<()> {
        if self.get(name.name_type).is_some() {
            return Err(Error::InvalidMessage(format!(
                "Duplicate ServerName of type {}",
                name.name_type.to_u8()
            )));
        }
        if self.list_len() + name.encoded_len() > MAX_LIST_LENGTH {
            return Err(Error::InvalidMessage(
                "ServerName list exceeds 65535 bytes".into(),
            ));
        }
        self.names.push(name);
        Ok(())
    }

    /// Entry of the given type, if present.
    pub fn get(&self, name_type: NameType) -> Option<&ServerName> {
        self.names.iter().find(|n| n.name_type == name_type)
    }

    /// The requested host name, if the list carries one.
    pub fn host_name(&self) -> Option<&str> {
        self.get(NameType::HostName).and_then(ServerName::as_host_name)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// A decoded list is never empty; a list built by hand may be.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    fn list_len(&self) -> usize {
        self.names.iter().map(ServerName::encoded_len).sum()
    }

    /// Iterate over the entries.
    pub fn iter(&self) -> impl Iterator<Item = &ServerName> {
        self.names.iter()
    }

    /// Encode as the `server_name` extension body.
    pub fn encode(&self) -> Vec<u8> {
        // bounded by `add`
        let list_len = self.list_len();
        let mut buf = BytesMut::with_capacity(2 + list_len);
        buf.put_u16(list_len as u16);
        for entry in &self.names {
            buf.put_u8(entry.name_type.to_u8());
            buf.put_u16(entry.name.len() as u16);
            buf.put_slice(&entry.name);
        }
        buf.to_vec()
    }

    /// Decode a `server_name` extension body.
    pub fn decode(data: &[u8]) -> Result<Self> {
        if data.len() < 2 {
            return Err(Error::InvalidMessage(
                "ServerName extension too short".into(),
            ));
        }
        let list_len = u16::from_be_bytes([data[0], data[1]]) as usize;
        if data.len() != 2 + list_len {
            return Err(Error::InvalidMessage(
                "ServerName list length mismatch".into(),
            ));
        }
        if list_len == 0 {
            return Err(Error::InvalidMessage("ServerName list is empty".into()));
        }

        let mut names = Self { names: Vec::new() };
        let mut rest = &data[2..];
        while !rest.is_empty() {
            if rest.len() < 3 {
                return Err(Error::InvalidMessage("ServerName entry too short".into()));
            }
            let name_type = rest[0];
            let name_len = u16::from_be_bytes([rest[1], rest[2]]) as usize;
            if rest.len() < 3 + name_len {
                return Err(Error::InvalidMessage("ServerName data truncated".into()));
            }
            let name = &rest[3..3 + name_len];

            let entry = match NameType::from_u8(name_type) {
                NameType::HostName => {
                    validate_host_name(name)?;
                    ServerName {
                        name_type: NameType::HostName,
                        name: name.to_ascii_lowercase(),
                    }
                },
                NameType::Unknown(_) => ServerName::opaque(name_type, name.to_vec())?,
            };
            names.add(entry)?;
            rest = &rest[3 + name_len..];
        }

        Ok(names)
    }
}
