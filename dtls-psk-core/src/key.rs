//! Pre-shared key material.

use core::fmt;
use subtle::ConstantTimeEq;
use zeroize::Zeroizing;

/// Secret key material resolved for one handshake.
///
/// The bytes are wiped when the value is dropped. The type is deliberately
/// not `Clone` and has no `Display`; `Debug` only reports the length.
pub struct PreSharedKey {
    secret: Zeroizing<Vec<u8>>,
}

impl PreSharedKey {
    /// Take ownership of `secret`.
    pub fn new(secret: Vec<u8>) -> Self {
        Self {
            secret: Zeroizing::new(secret),
        }
    }

    /// Copy `secret` into a fresh key.
    pub fn from_slice(secret: &[u8]) -> Self {
        Self::new(secret.to_vec())
    }

    /// Key length in bytes.
    pub fn len(&self) -> usize {
        self.secret.len()
    }

    /// Whether the key is empty.
    pub fn is_empty(&self) -> bool {
        self.secret.is_empty()
    }

    /// Borrow the secret bytes.
    pub fn expose_secret(&self) -> &[u8] {
        &self.secret
    }

    /// Consume the key, keeping the zeroize-on-drop guarantee.
    pub fn into_secret(self) -> Zeroizing<Vec<u8>> {
        self.secret
    }
}

impl From<Vec<u8>> for PreSharedKey {
    fn from(secret: Vec<u8>) -> Self {
        Self::new(secret)
    }
}

impl PartialEq for PreSharedKey {
    fn eq(&self, other: &Self) -> bool {
        self.secret.as_slice().ct_eq(other.secret.as_slice()).into()
    }
}

impl Eq for PreSharedKey {}

impl fmt::Debug for PreSharedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PreSharedKey")
            .field("len", &self.secret.len())
            .finish_non_exhaustive()
    }
}
