//! Alerts sent when a PSK handshake is aborted.
//!
//! Only the alert kind ever crosses the wire. Diagnostics that explain why a
//! handshake was aborted stay local.

use crate::error::AlertDescription;

/// Alert level (RFC 5246 Section 7.2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum AlertLevel {
    /// Warning (1)
    Warning = 1,

    /// Fatal (2)
    Fatal = 2,
}

/// A fatal alert that terminates the handshake.
///
/// Aborting a PSK negotiation never produces a warning-level alert, so the
/// level is fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Alert {
    /// Alert description
    pub description: AlertDescription,
}

impl Alert {
    /// Create a fatal alert.
    pub const fn fatal(description: AlertDescription) -> Self {
        Self { description }
    }

    /// Sent for every PSK credential resolution failure.
    pub const fn handshake_failure() -> Self {
        Self::fatal(AlertDescription::HandshakeFailure)
    }

    /// Sent when resolved credentials cannot be used locally.
    pub const fn internal_error() -> Self {
        Self::fatal(AlertDescription::InternalError)
    }

    /// Always [`AlertLevel::Fatal`].
    pub const fn level(&self) -> AlertLevel {
        AlertLevel::Fatal
    }

    /// Level and description bytes as written to the alert record.
    pub const fn encode(&self) -> [u8; 2] {
        [self.level() as u8, self.description.to_u8()]
    }
}
