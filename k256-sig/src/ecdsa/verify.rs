//! ECDSA verification.

use super::Signature;
use crate::{
    context::{Context, Verification},
    Digest, PublicKey,
};
use elliptic_curve::{
    bigint::U256,
    ops::{LinearCombination, Reduce},
    point::AffineCoordinates,
};
use k256::{ProjectivePoint, Scalar};

/// Treatment of signatures whose `s` exceeds half the curve order.
///
/// `(r, s)` and `(r, n - s)` both satisfy the ECDSA equation. Accepting both
/// makes signatures malleable, so [`Context::verify_ecdsa`] uses
/// [`LowS::Require`].
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum LowS {
    /// Reject high-S signatures.
    #[default]
    Require,

    /// Normalize high-S signatures to `n - s` before verifying.
    Normalize,
}

impl<C: Verification> Context<C> {
    /// Verify `signature` over `digest`, rejecting high-S signatures.
    ///
    /// Returns `false` for any signature that does not verify. Malformed
    /// encodings are rejected earlier, when the signature and key are
    /// parsed.
    pub fn verify_ecdsa(
        &self,
        signature: &Signature,
        digest: &Digest,
        public_key: &PublicKey,
    ) -> bool {
        self.verify_ecdsa_with(LowS::Require, signature, digest, public_key)
    }

    /// Verify `signature` over `digest` with an explicit low-S policy.
    pub fn verify_ecdsa_with(
        &self,
        policy: LowS,
        signature: &Signature,
        digest: &Digest,
        public_key: &PublicKey,
    ) -> bool {
        let signature = match policy {
            LowS::Require if !signature.is_low_s() => {
                tracing::trace!("rejecting high-S signature");
                return false;
            }
            LowS::Require => *signature,
            LowS::Normalize => signature.normalize_s(),
        };

        verify_prehashed(public_key, digest, &signature)
    }
}

/// Check the raw ECDSA equation `x(u1×G + u2×Q) ≡ r (mod n)`.
pub(super) fn verify_prehashed(public_key: &PublicKey, digest: &Digest, signature: &Signature) -> bool {
    let Some((r, s)) = signature.scalars() else {
        return false;
    };

    let Some(s_inv) = Option::<Scalar>::from(s.invert()) else {
        return false;
    };

    let z = <Scalar as Reduce<U256>>::reduce_bytes(&digest.to_field_bytes());
    let u1 = z * s_inv;
    let u2 = r * s_inv;

    let point = ProjectivePoint::lincomb(
        &ProjectivePoint::GENERATOR,
        &u1,
        &public_key.to_projective(),
        &u2,
    )
    .to_affine();

    <Scalar as Reduce<U256>>::reduce_bytes(&point.x()) == r
}
