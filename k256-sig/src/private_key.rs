//! Private keys: secret scalars in `(0, n)`.

use crate::{
    context::{Context, Signing},
    Error, PublicKey, Result, Tweak,
};
use core::fmt;
use elliptic_curve::rand_core::CryptoRngCore;
use k256::{FieldBytes, NonZeroScalar, SecretKey};
use subtle::{Choice, ConstantTimeEq};
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

#[cfg(feature = "getrandom")]
use rand_core::{OsRng, RngCore};

/// Size of a serialized private key in bytes.
pub const PRIVATE_KEY_SIZE: usize = 32;

/// secp256k1 private key.
///
/// The scalar is erased when the key is dropped. Comparisons are constant
/// time and the `Debug` output never includes key material.
#[derive(Clone)]
pub struct PrivateKey {
    inner: SecretKey,
}

impl PrivateKey {
    /// Parse a 32-byte big endian scalar.
    ///
    /// Fails with [`Error::InvalidKeySize`] if the input is not 32 bytes and
    /// with [`Error::InvalidKeyValue`] if it is zero or not below the curve
    /// order.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != PRIVATE_KEY_SIZE {
            return Err(Error::InvalidKeySize(bytes.len()));
        }

        SecretKey::from_bytes(&FieldBytes::clone_from_slice(bytes))
            .map(|inner| Self { inner })
            .map_err(|_| Error::InvalidKeyValue)
    }

    /// Generate a key using the provided RNG.
    pub fn random(rng: &mut impl CryptoRngCore) -> Self {
        Self {
            inner: SecretKey::random(rng),
        }
    }

    /// Generate a key from the operating system RNG, retrying until the
    /// candidate lands in `(0, n)`.
    #[cfg(feature = "getrandom")]
    pub fn generate() -> Result<Self> {
        let mut bytes = Zeroizing::new([0u8; PRIVATE_KEY_SIZE]);

        loop {
            OsRng.try_fill_bytes(&mut bytes[..]).map_err(|_| {
                tracing::warn!("operating system RNG failed");
                Error::EntropyUnavailable
            })?;

            if let Ok(key) = Self::from_slice(&bytes[..]) {
                return Ok(key);
            }
        }
    }

    /// Serialize as a 32-byte big endian scalar.
    pub fn to_bytes(&self) -> Zeroizing<[u8; PRIVATE_KEY_SIZE]> {
        Zeroizing::new(self.inner.to_bytes().into())
    }

    /// Derive the public key `d×G`.
    pub fn public_key<C: Signing>(&self, ctx: &Context<C>) -> PublicKey {
        let secret = self.secret_scalar();
        let point = ctx.mul_generator(&secret).to_affine();

        // `d` is non-zero and the group has prime order, so `d×G` is never
        // the identity.
        k256::PublicKey::from_affine(point)
            .unwrap_or_else(|_| self.inner.public_key())
            .into()
    }

    /// Add `tweak` to the key modulo the curve order.
    pub fn tweak_add(&self, tweak: &Tweak) -> Result<Self> {
        let secret = self.secret_scalar();
        let mut sum = **secret + tweak.as_scalar();
        let result = Option::<NonZeroScalar>::from(NonZeroScalar::new(sum));
        sum.zeroize();

        result
            .map(Self::from)
            .ok_or(Error::ResultingKeyInvalid)
    }

    /// Multiply the key by `tweak` modulo the curve order.
    pub fn tweak_mul(&self, tweak: &Tweak) -> Result<Self> {
        let secret = self.secret_scalar();
        let mut product = **secret * tweak.multiplier()?;
        let result = Option::<NonZeroScalar>::from(NonZeroScalar::new(product));
        product.zeroize();

        result
            .map(Self::from)
            .ok_or(Error::ResultingKeyInvalid)
    }

    /// Negate the key modulo the curve order.
    pub fn negate(&self) -> Self {
        Self::from(-*self.secret_scalar())
    }

    /// Borrow the underlying `k256` secret key.
    pub fn as_secret_key(&self) -> &SecretKey {
        &self.inner
    }

    pub(crate) fn secret_scalar(&self) -> Zeroizing<NonZeroScalar> {
        Zeroizing::new(self.inner.to_nonzero_scalar())
    }
}

impl From<SecretKey> for PrivateKey {
    fn from(inner: SecretKey) -> Self {
        Self { inner }
    }
}

impl From<NonZeroScalar> for PrivateKey {
    fn from(scalar: NonZeroScalar) -> Self {
        Self {
            inner: SecretKey::from(scalar),
        }
    }
}

impl TryFrom<&[u8]> for PrivateKey {
    type Error = Error;

    fn try_from(bytes: &[u8]) -> Result<Self> {
        Self::from_slice(bytes)
    }
}

impl ConstantTimeEq for PrivateKey {
    fn ct_eq(&self, other: &Self) -> Choice {
        self.inner.ct_eq(&other.inner)
    }
}

impl PartialEq for PrivateKey {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other).into()
    }
}

impl Eq for PrivateKey {}

impl ZeroizeOnDrop for PrivateKey {}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKey").finish_non_exhaustive()
    }
}
