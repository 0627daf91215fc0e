//! ECDSA signing with RFC 6979 deterministic nonces.

use super::{RecoverableSignature, RecoveryId, Signature};
use crate::{
    context::{Context, Signing},
    Digest, Error, PrivateKey, Result,
};
use elliptic_curve::{
    bigint::{ArrayEncoding, U256},
    ops::Reduce,
    point::AffineCoordinates,
    Curve, PrimeField,
};
use k256::{FieldBytes, Scalar, Secp256k1};
use sha2::Sha256;
use zeroize::{Zeroize, Zeroizing};

/// Number of nonces tried before giving up.
const MAX_ATTEMPTS: u32 = 16;

/// Size of the auxiliary randomness mixed into the nonce.
const AUX_RAND_SIZE: usize = 32;

impl<C: Signing> Context<C> {
    /// Sign a 32-byte digest.
    ///
    /// The nonce is derived deterministically from the key and digest, so
    /// signing the same digest twice yields the same signature. The result
    /// is always low-S.
    pub fn sign_ecdsa(&self, digest: &Digest, private_key: &PrivateKey) -> Result<Signature> {
        sign(self, digest, private_key, &[]).map(|signature| signature.to_signature())
    }

    /// Sign a 32-byte digest, keeping the recovery id of the signer's key.
    pub fn sign_ecdsa_recoverable(
        &self,
        digest: &Digest,
        private_key: &PrivateKey,
    ) -> Result<RecoverableSignature> {
        sign(self, digest, private_key, &[])
    }

    /// Sign a 32-byte digest, mixing `aux_rand` into the nonce derivation.
    ///
    /// The nonce remains a function of the key and digest; the extra input
    /// only hardens against side channels and fault attacks.
    pub fn sign_ecdsa_with_aux_rand(
        &self,
        digest: &Digest,
        private_key: &PrivateKey,
        aux_rand: &[u8; AUX_RAND_SIZE],
    ) -> Result<Signature> {
        sign(self, digest, private_key, aux_rand).map(|signature| signature.to_signature())
    }

    /// Recoverable variant of [`Context::sign_ecdsa_with_aux_rand`].
    pub fn sign_ecdsa_recoverable_with_aux_rand(
        &self,
        digest: &Digest,
        private_key: &PrivateKey,
        aux_rand: &[u8; AUX_RAND_SIZE],
    ) -> Result<RecoverableSignature> {
        sign(self, digest, private_key, aux_rand)
    }
}

/// Retry with a counter appended to the additional data until a nonce
/// yields non-zero `r` and `s`.
fn sign<C: Signing>(
    ctx: &Context<C>,
    digest: &Digest,
    private_key: &PrivateKey,
    aux_rand: &[u8],
) -> Result<RecoverableSignature> {
    let mut data = [0u8; AUX_RAND_SIZE + 4];
    data[..aux_rand.len()].copy_from_slice(aux_rand);

    for attempt in 0..MAX_ATTEMPTS {
        let len = if attempt == 0 {
            aux_rand.len()
        } else {
            data[aux_rand.len()..][..4].copy_from_slice(&attempt.to_be_bytes());
            aux_rand.len() + 4
        };

        if let Some(signature) = sign_prehash_rfc6979(ctx, digest, private_key, &data[..len]) {
            data.zeroize();
            return Ok(signature);
        }

        tracing::trace!(attempt, "nonce rejected");
    }

    data.zeroize();
    tracing::warn!(attempts = MAX_ATTEMPTS, "nonce generation exhausted");
    Err(Error::SigningFailed)
}

/// Compute a signature using RFC6979 to deterministically derive `k`.
///
/// Returns `None` when `k`, `r` or `s` is zero.
#[allow(non_snake_case)]
fn sign_prehash_rfc6979<C: Signing>(
    ctx: &Context<C>,
    digest: &Digest,
    private_key: &PrivateKey,
    data: &[u8],
) -> Option<RecoverableSignature> {
    let d = private_key.secret_scalar();
    let z = <Scalar as Reduce<U256>>::reduce_bytes(&digest.to_field_bytes());

    let d_bytes = Zeroizing::new(<[u8; 32]>::from(d.to_repr()));
    let k = Zeroizing::new(<[u8; 32]>::from(rfc6979::generate_k::<Sha256, _>(
        &FieldBytes::from(*d_bytes),
        &Secp256k1::ORDER.to_be_byte_array(),
        &z.to_bytes(),
        data,
    )));
    let k = Zeroizing::new(Option::<Scalar>::from(Scalar::from_repr(FieldBytes::from(*k)))?);
    let k_inv = Zeroizing::new(Option::<Scalar>::from(k.invert())?);

    // Compute 𝐑 = 𝑘×𝑮
    let R = ctx.mul_generator(&k).to_affine();

    // Lift x-coordinate of 𝐑 (element of base field) into a serialized big
    // integer, then reduce it into an element of the scalar field
    let x: FieldBytes = R.x();
    let r = <Scalar as Reduce<U256>>::reduce_bytes(&x);

    if bool::from(r.is_zero()) {
        return None;
    }

    // Compute `s` as a signature over `r` and `z`.
    let s = *k_inv * (z + r * **d);

    if bool::from(s.is_zero()) {
        return None;
    }

    let signature = Signature::from_scalar_pair(&r, &s);
    let recovery_id = RecoveryId::from_parts(bool::from(R.y_is_odd()), r.to_bytes() != x);

    // `n - s` pairs with `-R`, which has the opposite `y` parity
    let low = signature.normalize_s();
    let recovery_id = if low == signature {
        recovery_id
    } else {
        recovery_id.flip_y()
    };

    Some(RecoverableSignature::new(low, recovery_id))
}
