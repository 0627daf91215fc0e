//! Key tweaks.

use crate::{Error, Result};
use core::fmt;
use elliptic_curve::PrimeField;
use k256::{FieldBytes, Scalar};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// 32-byte big endian scalar used to derive a related key by addition or
/// multiplication modulo the curve order.
///
/// Applying the same tweak to a [`PrivateKey`][crate::PrivateKey] and its
/// [`PublicKey`][crate::PublicKey] keeps the two paired.
#[derive(Clone)]
pub struct Tweak {
    scalar: Scalar,
}

impl Tweak {
    /// Parse a tweak, which must be 32 bytes and below the curve order.
    ///
    /// Zero is accepted here (it is a valid additive tweak) and rejected by
    /// the multiplicative operations.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let bytes: [u8; 32] = bytes.try_into().map_err(|_| Error::InvalidTweak)?;
        Self::from_bytes(&bytes)
    }

    /// Parse a tweak from a 32-byte array.
    pub fn from_bytes(bytes: &[u8; 32]) -> Result<Self> {
        Option::<Scalar>::from(Scalar::from_repr(FieldBytes::from(*bytes)))
            .map(|scalar| Self { scalar })
            .ok_or(Error::InvalidTweak)
    }

    pub(crate) fn as_scalar(&self) -> &Scalar {
        &self.scalar
    }

    /// Scalar for multiplicative tweaks, which must be non-zero.
    pub(crate) fn multiplier(&self) -> Result<&Scalar> {
        if bool::from(self.scalar.is_zero()) {
            Err(Error::InvalidTweak)
        } else {
            Ok(&self.scalar)
        }
    }
}

impl TryFrom<&[u8]> for Tweak {
    type Error = Error;

    fn try_from(bytes: &[u8]) -> Result<Self> {
        Self::from_slice(bytes)
    }
}

impl Drop for Tweak {
    fn drop(&mut self) {
        self.scalar.zeroize();
    }
}

impl ZeroizeOnDrop for Tweak {}

impl fmt::Debug for Tweak {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tweak").finish_non_exhaustive()
    }
}
