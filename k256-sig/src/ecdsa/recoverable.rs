//! Recoverable signatures.
//!
//! A [`RecoverableSignature`] carries a [`RecoveryId`] next to `(r, s)`
//! which identifies the signer's public key among the (up to four) points
//! consistent with the signature. This lets a verifier recompute the public
//! key from the signature and digest alone, as Bitcoin message signing and
//! Ethereum transactions do.

use super::Signature;
use crate::{
    context::{Context, Verification},
    Digest, Error, PublicKey, Result,
};
use core::fmt;
use elliptic_curve::{
    bigint::{ArrayEncoding, U256},
    ops::{LinearCombination, Reduce},
    point::DecompressPoint,
    subtle::Choice,
    Curve,
};
use k256::{AffinePoint, ProjectivePoint, Scalar, Secp256k1};

/// Size of a recoverable signature: `r || s || v`.
pub const RECOVERABLE_SIGNATURE_SIZE: usize = 65;

/// Recovery id in `0..=3`.
///
/// Bit 0 is the parity of the `y` coordinate of the nonce point `R`; bit 1
/// is set when the `x` coordinate of `R` was at least the curve order and
/// had to be reduced to obtain `r`.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct RecoveryId(u8);

impl RecoveryId {
    /// Maximum recovery id.
    pub const MAX: u8 = 3;

    /// Validate a recovery id.
    pub const fn new(id: u8) -> Result<Self> {
        if id <= Self::MAX {
            Ok(Self(id))
        } else {
            Err(Error::InvalidRecoveryId(id))
        }
    }

    pub(crate) const fn from_parts(is_y_odd: bool, is_x_reduced: bool) -> Self {
        Self(((is_x_reduced as u8) << 1) | (is_y_odd as u8))
    }

    /// Serialize as a single byte.
    pub const fn to_byte(self) -> u8 {
        self.0
    }

    /// Is the `y` coordinate of `R` odd?
    pub const fn is_y_odd(self) -> bool {
        self.0 & 1 != 0
    }

    /// Was the `x` coordinate of `R` reduced modulo the curve order?
    pub const fn is_x_reduced(self) -> bool {
        self.0 & 2 != 0
    }

    /// Same point with the opposite `y` parity, which corresponds to `n - s`.
    pub(crate) const fn flip_y(self) -> Self {
        Self(self.0 ^ 1)
    }
}

impl TryFrom<u8> for RecoveryId {
    type Error = Error;

    fn try_from(id: u8) -> Result<Self> {
        Self::new(id)
    }
}

impl From<RecoveryId> for u8 {
    fn from(id: RecoveryId) -> u8 {
        id.0
    }
}

impl From<ecdsa_core::RecoveryId> for RecoveryId {
    fn from(id: ecdsa_core::RecoveryId) -> Self {
        Self::from_parts(id.is_y_odd(), id.is_x_reduced())
    }
}

impl From<RecoveryId> for ecdsa_core::RecoveryId {
    fn from(id: RecoveryId) -> Self {
        ecdsa_core::RecoveryId::new(id.is_y_odd(), id.is_x_reduced())
    }
}

/// ECDSA signature plus the [`RecoveryId`] of the signer's public key.
///
/// Serialized as 65 bytes: the compact signature followed by the id.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct RecoverableSignature {
    signature: Signature,
    recovery_id: RecoveryId,
}

impl RecoverableSignature {
    /// Attach a recovery id to a signature.
    ///
    /// The pairing is not checked. Use [`Self::from_trial_recovery`] to
    /// compute the id for a known public key.
    pub const fn new(signature: Signature, recovery_id: RecoveryId) -> Self {
        Self {
            signature,
            recovery_id,
        }
    }

    /// Parse `r || s || v`.
    ///
    /// The length is checked before anything else, then the id, then the
    /// compact signature.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != RECOVERABLE_SIGNATURE_SIZE {
            return Err(Error::InvalidSignatureSize(bytes.len()));
        }

        let (signature, id) = bytes.split_at(super::SIGNATURE_SIZE);
        let recovery_id = RecoveryId::new(id[0])?;
        Ok(Self::new(Signature::from_compact(signature)?, recovery_id))
    }

    /// Serialize as `r || s || v`.
    pub fn to_bytes(&self) -> [u8; RECOVERABLE_SIGNATURE_SIZE] {
        let mut bytes = [0u8; RECOVERABLE_SIGNATURE_SIZE];
        bytes[..super::SIGNATURE_SIZE].copy_from_slice(&self.signature.to_compact());
        bytes[super::SIGNATURE_SIZE] = self.recovery_id.to_byte();
        bytes
    }

    /// Borrow the signature without its recovery id.
    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// Recovery id.
    pub fn recovery_id(&self) -> RecoveryId {
        self.recovery_id
    }

    /// Drop the recovery id.
    pub fn to_signature(&self) -> Signature {
        self.signature
    }

    /// Find the recovery id under which `signature` recovers `public_key`.
    ///
    /// The signature is attached as given, high-S included. Fails with
    /// [`Error::RecoveryFailed`] if no id matches, which means the signature
    /// was not produced by `public_key` over `digest`.
    pub fn from_trial_recovery<C: Verification>(
        ctx: &Context<C>,
        signature: &Signature,
        digest: &Digest,
        public_key: &PublicKey,
    ) -> Result<Self> {
        for id in 0..=RecoveryId::MAX {
            let candidate = Self::new(*signature, RecoveryId(id));

            if ctx.recover_ecdsa(&candidate, digest).ok().as_ref() == Some(public_key) {
                return Ok(candidate);
            }
        }

        Err(Error::RecoveryFailed)
    }
}

impl TryFrom<&[u8]> for RecoverableSignature {
    type Error = Error;

    fn try_from(bytes: &[u8]) -> Result<Self> {
        Self::from_bytes(bytes)
    }
}

impl From<RecoverableSignature> for Signature {
    fn from(signature: RecoverableSignature) -> Signature {
        signature.signature
    }
}

impl fmt::Debug for RecoverableSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecoverableSignature")
            .field("signature", &self.signature)
            .field("recovery_id", &self.recovery_id.0)
            .finish()
    }
}

#[cfg(feature = "serde")]
impl serdect::serde::Serialize for RecoverableSignature {
    fn serialize<S>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error>
    where
        S: serdect::serde::Serializer,
    {
        serdect::array::serialize_hex_lower_or_bin(&self.to_bytes(), serializer)
    }
}

#[cfg(feature = "serde")]
impl<'de> serdect::serde::Deserialize<'de> for RecoverableSignature {
    fn deserialize<D>(deserializer: D) -> core::result::Result<Self, D::Error>
    where
        D: serdect::serde::Deserializer<'de>,
    {
        let mut bytes = [0u8; RECOVERABLE_SIGNATURE_SIZE];
        serdect::array::deserialize_hex_or_bin(&mut bytes, deserializer)?;
        Self::from_bytes(&bytes).map_err(serdect::serde::de::Error::custom)
    }
}

impl<C: Verification> Context<C> {
    /// Recover the public key which produced `signature` over `digest`.
    ///
    /// The candidate key is checked against the signature before being
    /// returned. High-S signatures are accepted; recovery does not apply the
    /// verification low-S policy.
    #[allow(non_snake_case)]
    pub fn recover_ecdsa(
        &self,
        signature: &RecoverableSignature,
        digest: &Digest,
    ) -> Result<PublicKey> {
        let (r, s) = signature
            .signature
            .scalars()
            .ok_or(Error::RecoveryFailed)?;
        let recovery_id = signature.recovery_id;

        let R = nonce_point(&r, recovery_id).ok_or_else(|| {
            tracing::debug!(id = recovery_id.0, "no curve point for recovery id");
            Error::RecoveryFailed
        })?;

        let z = <Scalar as Reduce<U256>>::reduce_bytes(&digest.to_field_bytes());
        let r_inv = Option::<Scalar>::from(r.invert()).ok_or(Error::RecoveryFailed)?;
        let u1 = -(r_inv * z);
        let u2 = r_inv * s;
        let point = ProjectivePoint::lincomb(
            &ProjectivePoint::GENERATOR,
            &u1,
            &ProjectivePoint::from(R),
            &u2,
        );

        let public_key = k256::PublicKey::from_affine(point.to_affine())
            .map(PublicKey::from)
            .map_err(|_| Error::RecoveryFailed)?;

        if super::verify::verify_prehashed(&public_key, digest, &signature.signature) {
            Ok(public_key)
        } else {
            tracing::debug!(id = recovery_id.0, "recovered key does not verify");
            Err(Error::RecoveryFailed)
        }
    }
}

/// Reconstruct `R` from `r` and the recovery id.
fn nonce_point(r: &Scalar, recovery_id: RecoveryId) -> Option<AffinePoint> {
    let mut x = r.to_bytes();

    if recovery_id.is_x_reduced() {
        let r = U256::from_be_byte_array(x);
        let reduced = r.wrapping_add(&Secp256k1::ORDER);

        // `x = r + n` must not wrap around 2^256
        if reduced < r {
            return None;
        }

        x = reduced.to_be_byte_array();
    }

    AffinePoint::decompress(&x, Choice::from(recovery_id.is_y_odd() as u8)).into()
}
