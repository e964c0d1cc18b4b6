//! Error types for DTLS PSK credential handling.

use core::fmt;

/// Result type for DTLS PSK operations.
pub type Result<T> = core::result::Result<T, Error>;

/// Errors that can occur outside of credential resolution itself.
///
/// A failed resolution is reported as a
/// [`ResolutionFailure`](crate::resolver::ResolutionFailure), which converts
/// into [`Error::HandshakeFailure`] when a caller wants a single error type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Invalid configuration
    InvalidConfig(String),

    /// Invalid message format
    InvalidMessage(String),

    /// Handshake failure
    HandshakeFailure(String),

    /// Internal error
    InternalError(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidConfig(msg) => write!(f, "Invalid configuration: {}", msg),
            Error::InvalidMessage(msg) => write!(f, "Invalid message: {}", msg),
            Error::HandshakeFailure(msg) => write!(f, "Handshake failure: {}", msg),
            Error::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

/// Alert descriptions used by DTLS 1.2 (RFC 5246 Section 7.2, RFC 4279,
/// RFC 6066).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum AlertDescription {
    /// Close notify
    CloseNotify = 0,
    /// Unexpected message
    UnexpectedMessage = 10,
    /// Bad record MAC
    BadRecordMac = 20,
    /// Decryption failed (reserved, never sent)
    DecryptionFailed = 21,
    /// Record overflow
    RecordOverflow = 22,
    /// Decompression failure
    DecompressionFailure = 30,
    /// Handshake failure
    HandshakeFailure = 40,
    /// Bad certificate
    BadCertificate = 42,
    /// Unsupported certificate
    UnsupportedCertificate = 43,
    /// Certificate revoked
    CertificateRevoked = 44,
    /// Certificate expired
    CertificateExpired = 45,
    /// Certificate unknown
    CertificateUnknown = 46,
    /// Illegal parameter
    IllegalParameter = 47,
    /// Unknown CA
    UnknownCa = 48,
    /// Access denied
    AccessDenied = 49,
    /// Decode error
    DecodeError = 50,
    /// Decrypt error
    DecryptError = 51,
    /// Protocol version
    ProtocolVersion = 70,
    /// Insufficient security
    InsufficientSecurity = 71,
    /// Internal error
    InternalError = 80,
    /// User canceled
    UserCanceled = 90,
    /// No renegotiation
    NoRenegotiation = 100,
    /// Unsupported extension
    UnsupportedExtension = 110,
    /// Unrecognized name (SNI)
    UnrecognizedName = 112,
    /// Unknown PSK identity
    UnknownPskIdentity = 115,
}

impl AlertDescription {
    /// Convert from wire format (u8).
    pub const fn from_u8(value: u8) -> Option<Self> {
        Some(match value {
            0 => AlertDescription::CloseNotify,
            10 => AlertDescription::UnexpectedMessage,
            20 => AlertDescription::BadRecordMac,
            21 => AlertDescription::DecryptionFailed,
            22 => AlertDescription::RecordOverflow,
            30 => AlertDescription::DecompressionFailure,
            40 => AlertDescription::HandshakeFailure,
            42 => AlertDescription::BadCertificate,
            43 => AlertDescription::UnsupportedCertificate,
            44 => AlertDescription::CertificateRevoked,
            45 => AlertDescription::CertificateExpired,
            46 => AlertDescription::CertificateUnknown,
            47 => AlertDescription::IllegalParameter,
            48 => AlertDescription::UnknownCa,
            49 => AlertDescription::AccessDenied,
            50 => AlertDescription::DecodeError,
            51 => AlertDescription::DecryptError,
            70 => AlertDescription::ProtocolVersion,
            71 => AlertDescription::InsufficientSecurity,
            80 => AlertDescription::InternalError,
            90 => AlertDescription::UserCanceled,
            100 => AlertDescription::NoRenegotiation,
            110 => AlertDescription::UnsupportedExtension,
            112 => AlertDescription::UnrecognizedName,
            115 => AlertDescription::UnknownPskIdentity,
            _ => return None,
        })
    }

    /// Convert to wire format (u8).
    pub const fn to_u8(self) -> u8 {
        self as u8
    }

    /// Whether this description always terminates the connection.
    ///
    /// Only close_notify, user_canceled and no_renegotiation may be sent at
    /// warning level in DTLS 1.2.
    pub const fn is_fatal(self) -> bool {
        !matches!(
            self,
            AlertDescription::CloseNotify
                | AlertDescription::UserCanceled
                | AlertDescription::NoRenegotiation
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alert_description_conversion() {
        assert_eq!(
            AlertDescription::from_u8(40),
            Some(AlertDescription::HandshakeFailure)
        );
        assert_eq!(
            AlertDescription::from_u8(115),
            Some(AlertDescription::UnknownPskIdentity)
        );
        assert_eq!(AlertDescription::from_u8(41), None);
        assert_eq!(AlertDescription::from_u8(255), None);

        assert_eq!(AlertDescription::HandshakeFailure.to_u8(), 40);
        assert_eq!(AlertDescription::InternalError.to_u8(), 80);
    }

    #[test]
    fn test_alert_fatality() {
        assert!(!AlertDescription::CloseNotify.is_fatal());
        assert!(!AlertDescription::NoRenegotiation.is_fatal());
        assert!(AlertDescription::HandshakeFailure.is_fatal());
        assert!(AlertDescription::UnknownPskIdentity.is_fatal());
    }

    #[test]
    fn test_error_display() {
        let err = Error::InvalidMessage("ServerName list truncated".into());
        assert_eq!(err.to_string(), "Invalid message: ServerName list truncated");
    }
}
