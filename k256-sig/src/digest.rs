//! Message digests.

use crate::{Error, Result};
use core::fmt;
use k256::FieldBytes;
use sha2::{Digest as _, Sha256};

/// Size of a message digest in bytes.
pub const DIGEST_SIZE: usize = 32;

/// 32-byte hash of the signed content.
///
/// The value is opaque to this crate: signing and verification reduce it
/// modulo the curve order. Use [`Digest::sha256`] to hash arbitrary input,
/// or bring the output of any 256-bit hash function.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct Digest([u8; DIGEST_SIZE]);

impl Digest {
    /// Wrap an existing 32-byte digest.
    pub const fn new(bytes: [u8; DIGEST_SIZE]) -> Self {
        Self(bytes)
    }

    /// Parse a digest from a slice, which must be exactly 32 bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        bytes
            .try_into()
            .map(Self)
            .map_err(|_| Error::InvalidDigestSize(bytes.len()))
    }

    /// SHA-256 of `data`.
    pub fn sha256(data: impl AsRef<[u8]>) -> Self {
        Self(Sha256::digest(data.as_ref()).into())
    }

    /// Borrow the digest bytes.
    pub fn as_bytes(&self) -> &[u8; DIGEST_SIZE] {
        &self.0
    }

    pub(crate) fn to_field_bytes(self) -> FieldBytes {
        self.0.into()
    }
}

impl From<[u8; DIGEST_SIZE]> for Digest {
    fn from(bytes: [u8; DIGEST_SIZE]) -> Self {
        Self(bytes)
    }
}

impl From<Digest> for [u8; DIGEST_SIZE] {
    fn from(digest: Digest) -> Self {
        digest.0
    }
}

impl TryFrom<&[u8]> for Digest {
    type Error = Error;

    fn try_from(bytes: &[u8]) -> Result<Self> {
        Self::from_slice(bytes)
    }
}

impl AsRef<[u8]> for Digest {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest(")?;

        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }

        write!(f, ")")
    }
}

#[cfg(feature = "serde")]
impl serdect::serde::Serialize for Digest {
    fn serialize<S>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error>
    where
        S: serdect::serde::Serializer,
    {
        serdect::array::serialize_hex_lower_or_bin(&self.0, serializer)
    }
}

#[cfg(feature = "serde")]
impl<'de> serdect::serde::Deserialize<'de> for Digest {
    fn deserialize<D>(deserializer: D) -> core::result::Result<Self, D::Error>
    where
        D: serdect::serde::Deserializer<'de>,
    {
        let mut bytes = [0u8; DIGEST_SIZE];
        serdect::array::deserialize_hex_or_bin(&mut bytes, deserializer)?;
        Ok(Self(bytes))
    }
}
