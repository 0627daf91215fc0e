//! Elliptic Curve Digital Signature Algorithm (ECDSA).
//!
//! A [`Signature`] is the pair `(r, s)`, each stored as 32 big endian bytes.
//! It converts losslessly between the wire encodings found in the wild:
//!
//! - raw: 64 bytes `r || s`, only the length is checked
//! - compact: 64 bytes `r || s`, both components must lie in `[1, n-1]`
//! - DER: ASN.1 `SEQUENCE { r INTEGER, s INTEGER }`, see [`DerSignature`]
//! - recoverable: compact plus a recovery id byte, see
//!   [`RecoverableSignature`]
//!
//! Signing, verification and recovery are methods on
//! [`Context`][crate::Context]:
//!
//! ```
//! # #[cfg(feature = "getrandom")]
//! # {
//! use k256_sig::{All, Context, Digest, PrivateKey};
//!
//! let ctx = Context::<All>::new()?;
//! let private_key = PrivateKey::generate()?;
//! let public_key = private_key.public_key(&ctx);
//!
//! let digest = Digest::sha256(b"ECDSA proves knowledge of a secret number");
//! let signature = ctx.sign_ecdsa(&digest, &private_key)?;
//! assert!(signature.is_low_s());
//! assert!(ctx.verify_ecdsa(&signature, &digest, &public_key));
//!
//! let der = signature.to_der()?;
//! assert_eq!(k256_sig::ecdsa::Signature::from_der(der.as_bytes())?, signature);
//! # }
//! # Ok::<(), k256_sig::Error>(())
//! ```

mod der;
mod recoverable;
mod sign;
mod verify;

pub use self::{
    der::{DerSignature, MAX_DER_SIZE},
    recoverable::{RecoverableSignature, RecoveryId, RECOVERABLE_SIGNATURE_SIZE},
    verify::LowS,
};

use crate::{Error, Result};
use core::fmt;
use elliptic_curve::{scalar::IsHigh, PrimeField};
use k256::{FieldBytes, Scalar};

/// Size of a raw or compact signature: `r || s`.
pub const SIGNATURE_SIZE: usize = 64;

/// Size of each signature component.
const COMPONENT_SIZE: usize = 32;

/// ECDSA/secp256k1 signature `(r, s)`.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct Signature {
    r: [u8; COMPONENT_SIZE],
    s: [u8; COMPONENT_SIZE],
}

impl Signature {
    /// Create a signature from big endian `r` and `s` without validating them.
    pub const fn from_scalars(r: [u8; COMPONENT_SIZE], s: [u8; COMPONENT_SIZE]) -> Self {
        Self { r, s }
    }

    /// The `r` component.
    pub fn r(&self) -> &[u8; COMPONENT_SIZE] {
        &self.r
    }

    /// The `s` component.
    pub fn s(&self) -> &[u8; COMPONENT_SIZE] {
        &self.s
    }

    /// Parse 64 raw bytes `r || s`. Only the length is validated.
    pub fn from_raw(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != SIGNATURE_SIZE {
            return Err(Error::InvalidSignatureSize(bytes.len()));
        }

        let (r, s) = bytes.split_at(COMPONENT_SIZE);
        let mut signature = Self::from_scalars([0u8; COMPONENT_SIZE], [0u8; COMPONENT_SIZE]);
        signature.r.copy_from_slice(r);
        signature.s.copy_from_slice(s);
        Ok(signature)
    }

    /// Serialize as 64 raw bytes `r || s`.
    pub fn to_raw(&self) -> [u8; SIGNATURE_SIZE] {
        let mut bytes = [0u8; SIGNATURE_SIZE];
        bytes[..COMPONENT_SIZE].copy_from_slice(&self.r);
        bytes[COMPONENT_SIZE..].copy_from_slice(&self.s);
        bytes
    }

    /// Parse the 64-byte compact encoding.
    ///
    /// The length is checked first. Both `r` and `s` must then be non-zero
    /// scalars below the curve order, otherwise [`Error::MalformedEncoding`]
    /// is returned. High-S values are accepted here; the verification policy
    /// decides what to do with them.
    pub fn from_compact(bytes: &[u8]) -> Result<Self> {
        let signature = Self::from_raw(bytes)?;

        if signature.scalars().is_none() {
            return Err(Error::MalformedEncoding);
        }

        Ok(signature)
    }

    /// Serialize in the 64-byte compact encoding.
    pub fn to_compact(&self) -> [u8; SIGNATURE_SIZE] {
        self.to_raw()
    }

    /// Parse a strict ASN.1 DER encoding.
    pub fn from_der(bytes: &[u8]) -> Result<Self> {
        let (r, s) = der::decode(bytes)?;
        Ok(Self::from_scalars(r, s))
    }

    /// Serialize as ASN.1 DER with minimally encoded integers.
    pub fn to_der(&self) -> Result<DerSignature> {
        der::encode(&self.r, &self.s)
    }

    /// Is `s` at most half the curve order?
    ///
    /// Returns `false` if `s` is not a valid scalar.
    pub fn is_low_s(&self) -> bool {
        scalar_from_bytes(&self.s)
            .map(|s| !bool::from(s.is_high()))
            .unwrap_or(false)
    }

    /// Replace a high `s` with `n - s`.
    ///
    /// Both forms verify under the raw ECDSA equation. Signatures whose `s`
    /// is already low, or is not a valid scalar, are returned unchanged.
    pub fn normalize_s(&self) -> Self {
        match scalar_from_bytes(&self.s) {
            Some(s) if bool::from(s.is_high()) => Self {
                r: self.r,
                s: (-s).to_bytes().into(),
            },
            _ => *self,
        }
    }

    /// `r` and `s` as scalars, if both are in `[1, n-1]`.
    pub(crate) fn scalars(&self) -> Option<(Scalar, Scalar)> {
        let r = scalar_from_bytes(&self.r)?;
        let s = scalar_from_bytes(&self.s)?;

        if bool::from(r.is_zero() | s.is_zero()) {
            None
        } else {
            Some((r, s))
        }
    }

    pub(crate) fn from_scalar_pair(r: &Scalar, s: &Scalar) -> Self {
        Self::from_scalars(r.to_bytes().into(), s.to_bytes().into())
    }
}

fn scalar_from_bytes(bytes: &[u8; COMPONENT_SIZE]) -> Option<Scalar> {
    Scalar::from_repr(FieldBytes::from(*bytes)).into()
}

impl From<k256::ecdsa::Signature> for Signature {
    fn from(signature: k256::ecdsa::Signature) -> Self {
        let (r, s) = signature.split_bytes();
        Self::from_scalars(r.into(), s.into())
    }
}

impl TryFrom<Signature> for k256::ecdsa::Signature {
    type Error = Error;

    fn try_from(signature: Signature) -> Result<Self> {
        k256::ecdsa::Signature::from_scalars(
            FieldBytes::from(signature.r),
            FieldBytes::from(signature.s),
        )
        .map_err(|_| Error::MalformedEncoding)
    }
}

impl TryFrom<&[u8]> for Signature {
    type Error = Error;

    fn try_from(bytes: &[u8]) -> Result<Self> {
        Self::from_compact(bytes)
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ecdsa::Signature(")?;

        for byte in self.to_raw() {
            write!(f, "{byte:02x}")?;
        }

        write!(f, ")")
    }
}

#[cfg(feature = "serde")]
impl serdect::serde::Serialize for Signature {
    fn serialize<S>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error>
    where
        S: serdect::serde::Serializer,
    {
        serdect::array::serialize_hex_lower_or_bin(&self.to_compact(), serializer)
    }
}

#[cfg(feature = "serde")]
impl<'de> serdect::serde::Deserialize<'de> for Signature {
    fn deserialize<D>(deserializer: D) -> core::result::Result<Self, D::Error>
    where
        D: serdect::serde::Deserializer<'de>,
    {
        let mut bytes = [0u8; SIGNATURE_SIZE];
        serdect::array::deserialize_hex_or_bin(&mut bytes, deserializer)?;
        Self::from_compact(&bytes).map_err(serdect::serde::de::Error::custom)
    }
}
