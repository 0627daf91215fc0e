//! Elliptic Curve Diffie-Hellman key agreement.
//!
//! The shared point `d×Q` is never handed out directly. By default it is
//! hashed as SHA-256 of its compressed encoding; [`Context::ecdh_with`]
//! substitutes a protocol-specific key derivation over the affine
//! coordinates.
//!
//! ```
//! use k256_sig::{Context, PrivateKey, SignOnly};
//!
//! let ctx = Context::<SignOnly>::with_seed(&[0x42; 32]);
//!
//! // Alice
//! let alice = PrivateKey::from_slice(&[0x11; 32])?;
//! let alice_public = alice.public_key(&ctx);
//!
//! // Bob
//! let bob = PrivateKey::from_slice(&[0x22; 32])?;
//! let bob_public = bob.public_key(&ctx);
//!
//! // Both participants arrive on the same shared secret
//! let alice_shared = ctx.ecdh(&alice, &bob_public)?;
//! let bob_shared = ctx.ecdh(&bob, &alice_public)?;
//! assert_eq!(alice_shared, bob_shared);
//! # Ok::<(), k256_sig::Error>(())
//! ```

use crate::{
    context::{Capability, Context},
    Error, PrivateKey, PublicKey, Result,
};
use core::fmt;
use elliptic_curve::sec1::ToEncodedPoint;
use sha2::{Digest as _, Sha256};
use subtle::{Choice, ConstantTimeEq};
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

/// Size of a shared secret in bytes.
pub const SHARED_SECRET_SIZE: usize = 32;

/// Size of an affine coordinate in bytes.
const COORDINATE_SIZE: usize = 32;

/// Output of ECDH key agreement.
///
/// Erased on drop and compared in constant time.
#[derive(Clone)]
pub struct SharedSecret {
    bytes: [u8; SHARED_SECRET_SIZE],
}

impl SharedSecret {
    /// Borrow the secret bytes.
    pub fn as_bytes(&self) -> &[u8; SHARED_SECRET_SIZE] {
        &self.bytes
    }

    /// Copy the secret into a buffer which is erased on drop.
    pub fn to_bytes(&self) -> Zeroizing<[u8; SHARED_SECRET_SIZE]> {
        Zeroizing::new(self.bytes)
    }
}

impl AsRef<[u8]> for SharedSecret {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl ConstantTimeEq for SharedSecret {
    fn ct_eq(&self, other: &Self) -> Choice {
        self.bytes[..].ct_eq(&other.bytes[..])
    }
}

impl PartialEq for SharedSecret {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other).into()
    }
}

impl Eq for SharedSecret {}

impl Drop for SharedSecret {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}

impl ZeroizeOnDrop for SharedSecret {}

impl fmt::Debug for SharedSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedSecret").finish_non_exhaustive()
    }
}

impl<C: Capability> Context<C> {
    /// Derive a shared secret as SHA-256 of the compressed shared point.
    pub fn ecdh(&self, private_key: &PrivateKey, public_key: &PublicKey) -> Result<SharedSecret> {
        self.ecdh_with(private_key, public_key, |x, y| {
            let tag = 0x02 | (y[COORDINATE_SIZE - 1] & 1);
            Sha256::new()
                .chain_update([tag])
                .chain_update(x)
                .finalize()
                .into()
        })
    }

    /// Derive a shared secret by passing the affine `x` and `y` coordinates
    /// of the shared point to `hash`.
    ///
    /// Fails with [`Error::AgreementFailed`] if the shared point is the
    /// identity.
    pub fn ecdh_with<F>(
        &self,
        private_key: &PrivateKey,
        public_key: &PublicKey,
        hash: F,
    ) -> Result<SharedSecret>
    where
        F: FnOnce(&[u8; COORDINATE_SIZE], &[u8; COORDINATE_SIZE]) -> [u8; SHARED_SECRET_SIZE],
    {
        let secret = private_key.secret_scalar();
        let shared = (public_key.to_projective() * **secret).to_affine();
        let encoded = shared.to_encoded_point(false);

        let (Some(x), Some(y)) = (encoded.x(), encoded.y()) else {
            tracing::debug!(capability = C::DESCRIPTION, "shared point is the identity");
            return Err(Error::AgreementFailed);
        };

        let x = Zeroizing::new(<[u8; COORDINATE_SIZE]>::from(*x));
        let y = Zeroizing::new(<[u8; COORDINATE_SIZE]>::from(*y));

        Ok(SharedSecret {
            bytes: hash(&*x, &*y),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{All, VerifyOnly};
    use hex_literal::hex;
    use sha2::Digest as _;
    use std::format;

    fn scalar(n: u8) -> [u8; 32] {
        let mut bytes = [0u8; 32];
        bytes[31] = n;
        bytes
    }

    #[test]
    fn agreement_is_symmetric() {
        let ctx = Context::<All>::with_seed(&[8u8; 32]);
        let alice = PrivateKey::from_slice(&[0x11; 32]).unwrap();
        let bob = PrivateKey::from_slice(&[0x22; 32]).unwrap();

        let a = ctx.ecdh(&alice, &bob.public_key(&ctx)).unwrap();
        let b = ctx.ecdh(&bob, &alice.public_key(&ctx)).unwrap();
        assert_eq!(a, b);

        let verifier = Context::<VerifyOnly>::verification_only();
        assert_eq!(verifier.ecdh(&alice, &bob.public_key(&ctx)).unwrap(), a);
    }

    #[test]
    fn default_hash_is_sha256_of_compressed_point() {
        let ctx = Context::<All>::with_seed(&[9u8; 32]);
        let one = PrivateKey::from_slice(&scalar(1)).unwrap();
        let two = PrivateKey::from_slice(&scalar(2)).unwrap();

        // 1 × (2×G) is 2×G
        let shared = ctx.ecdh(&one, &two.public_key(&ctx)).unwrap();
        let expected = Sha256::digest(two.public_key(&ctx).serialize());
        assert_eq!(shared.as_bytes()[..], expected[..]);
    }

    #[test]
    fn custom_hash_receives_coordinates() {
        let ctx = Context::<All>::with_seed(&[10u8; 32]);
        let one = PrivateKey::from_slice(&scalar(1)).unwrap();
        let generator = one.public_key(&ctx);

        let shared = ctx.ecdh_with(&one, &generator, |x, y| {
            assert_eq!(
                y,
                &hex!("483ada7726a3c4655da4fbfc0e1108a8fd17b448a68554199c47d08ffb10d4b8")
            );
            *x
        });
        assert_eq!(
            shared.unwrap().as_bytes(),
            &hex!("79be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798")
        );
    }

    #[test]
    fn debug_is_redacted() {
        let ctx = Context::<All>::with_seed(&[11u8; 32]);
        let key = PrivateKey::from_slice(&[0x33; 32]).unwrap();
        let shared = ctx.ecdh(&key, &key.public_key(&ctx)).unwrap();
        assert_eq!(format!("{shared:?}"), "SharedSecret { .. }");
    }
}
