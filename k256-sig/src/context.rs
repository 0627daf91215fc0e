//! Computation contexts.
//!
//! Every curve operation borrows a [`Context`]. The context's capability
//! parameter decides which operations it can be handed to:
//!
//! | Capability   | Signing | Verification / recovery | ECDH |
//! |--------------|---------|-------------------------|------|
//! | [`SignOnly`] | yes     | no                      | yes  |
//! | [`VerifyOnly`] | no    | yes                     | yes  |
//! | [`All`]      | yes     | yes                     | yes  |
//!
//! Signing-capable contexts hold a blinding scalar `b` together with
//! `B = b×G`. Generator multiplications of secret scalars are computed as
//! `(k + b)×G - B`, which yields the same point while keeping `k` itself out
//! of the multiplication. [`Context::randomize`] replaces the blinding pair
//! and takes `&mut self`: a context shared behind an `Arc` can be used for
//! concurrent signing and verification, but refreshing its blinding needs
//! exclusive access.

use crate::{Error, Result};
use core::{fmt, marker::PhantomData};
use elliptic_curve::ops::Reduce;
use k256::{FieldBytes, ProjectivePoint, Scalar, U256};
use sha2::{Digest as _, Sha256};
use zeroize::{Zeroize, Zeroizing};

#[cfg(feature = "getrandom")]
use rand_core::{OsRng, RngCore};

/// Domain separator for deriving blinding scalars from seeds.
const BLINDING_TAG: &[u8] = b"k256-sig/context-blinding";

mod sealed {
    pub trait Sealed {}
}

/// Capability set of a [`Context`].
///
/// This trait is sealed: the only implementors are [`SignOnly`],
/// [`VerifyOnly`] and [`All`].
pub trait Capability: sealed::Sealed {
    /// Human readable capability name.
    const DESCRIPTION: &'static str;

    /// Whether contexts with this capability carry blinding state.
    const BLINDED: bool;
}

/// Capabilities which permit signing and secret-key generator
/// multiplication.
pub trait Signing: Capability {}

/// Capabilities which permit verification, recovery and public key tweaks.
pub trait Verification: Capability {}

/// Signing-only capability.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct SignOnly;

/// Verification-only capability.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct VerifyOnly;

/// Signing and verification capability.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct All;

impl sealed::Sealed for SignOnly {}
impl sealed::Sealed for VerifyOnly {}
impl sealed::Sealed for All {}

impl Capability for SignOnly {
    const DESCRIPTION: &'static str = "sign";
    const BLINDED: bool = true;
}

impl Capability for VerifyOnly {
    const DESCRIPTION: &'static str = "verify";
    const BLINDED: bool = false;
}

impl Capability for All {
    const DESCRIPTION: &'static str = "sign+verify";
    const BLINDED: bool = true;
}

impl Signing for SignOnly {}
impl Signing for All {}
impl Verification for VerifyOnly {}
impl Verification for All {}

/// Blinding pair `(b, b×G)`.
#[derive(Clone)]
struct Blinding {
    scalar: Scalar,
    point: ProjectivePoint,
}

impl Blinding {
    fn from_seed(seed: &[u8; 32]) -> Self {
        let mut bytes: FieldBytes = Sha256::new()
            .chain_update(BLINDING_TAG)
            .chain_update(seed)
            .finalize();
        let scalar = <Scalar as Reduce<U256>>::reduce_bytes(&bytes);
        bytes.zeroize();

        Self {
            scalar,
            point: ProjectivePoint::GENERATOR * scalar,
        }
    }
}

impl Drop for Blinding {
    fn drop(&mut self) {
        self.scalar.zeroize();
        self.point = ProjectivePoint::IDENTITY;
    }
}

/// Opaque computation context parameterized by its [`Capability`].
pub struct Context<C: Capability> {
    blinding: Option<Blinding>,
    capability: PhantomData<C>,
}

impl<C: Capability> Context<C> {
    /// Create a context, seeding its blinding from the operating system RNG.
    ///
    /// Verification-only contexts carry no blinding and never fail.
    #[cfg(feature = "getrandom")]
    pub fn new() -> Result<Self> {
        let blinding = if C::BLINDED {
            let seed = os_seed().map_err(|_| {
                tracing::warn!(capability = C::DESCRIPTION, "no entropy for context blinding");
                Error::ContextCreationFailed
            })?;
            Some(Blinding::from_seed(&seed))
        } else {
            None
        };

        tracing::debug!(capability = C::DESCRIPTION, "context created");
        Ok(Self {
            blinding,
            capability: PhantomData,
        })
    }

    /// Create a context whose blinding is derived from `seed`.
    ///
    /// The seed only affects side-channel blinding; every operation returns
    /// the same result regardless of it.
    pub fn with_seed(seed: &[u8; 32]) -> Self {
        tracing::debug!(capability = C::DESCRIPTION, "context created from seed");
        Self {
            blinding: C::BLINDED.then(|| Blinding::from_seed(seed)),
            capability: PhantomData,
        }
    }

    /// Capability name of this context.
    pub fn capability(&self) -> &'static str {
        C::DESCRIPTION
    }

    /// Compute `k×G` for a secret scalar, blinded when the context carries
    /// blinding state.
    pub(crate) fn mul_generator(&self, k: &Scalar) -> ProjectivePoint {
        match &self.blinding {
            Some(blinding) => {
                let mut blinded = *k + blinding.scalar;
                let point = ProjectivePoint::GENERATOR * blinded - blinding.point;
                blinded.zeroize();
                point
            }
            None => ProjectivePoint::GENERATOR * k,
        }
    }
}

impl Context<VerifyOnly> {
    /// Create a verification-only context.
    pub const fn verification_only() -> Self {
        Self {
            blinding: None,
            capability: PhantomData,
        }
    }
}

impl<C: Signing> Context<C> {
    /// Replace the blinding state.
    ///
    /// With `Some(seed)` the new blinding is derived from the seed; with
    /// `None` fresh entropy is drawn from the operating system. On failure
    /// the context keeps its previous blinding and stays usable.
    pub fn randomize(&mut self, seed: Option<&[u8; 32]>) -> Result<()> {
        let blinding = match seed {
            Some(seed) => Blinding::from_seed(seed),
            None => {
                let seed = fresh_seed()?;
                Blinding::from_seed(&seed)
            }
        };

        self.blinding = Some(blinding);
        tracing::debug!(capability = C::DESCRIPTION, seeded = seed.is_some(), "context randomized");
        Ok(())
    }
}

#[cfg(feature = "getrandom")]
fn fresh_seed() -> Result<Zeroizing<[u8; 32]>> {
    os_seed().map_err(|_| {
        tracing::warn!("no entropy for context randomization");
        Error::RandomizationFailed
    })
}

#[cfg(not(feature = "getrandom"))]
fn fresh_seed() -> Result<Zeroizing<[u8; 32]>> {
    tracing::warn!("context randomization requested without an entropy source");
    Err(Error::RandomizationFailed)
}

#[cfg(feature = "getrandom")]
fn os_seed() -> core::result::Result<Zeroizing<[u8; 32]>, rand_core::Error> {
    let mut seed = Zeroizing::new([0u8; 32]);
    OsRng.try_fill_bytes(&mut seed[..])?;
    Ok(seed)
}

impl<C: Capability> Clone for Context<C> {
    fn clone(&self) -> Self {
        Self {
            blinding: self.blinding.clone(),
            capability: PhantomData,
        }
    }
}

impl<C: Capability> fmt::Debug for Context<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("capability", &C::DESCRIPTION)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;
    use std::format;

    const SEED_A: [u8; 32] = [0x11; 32];
    const SEED_B: [u8; 32] = [0x22; 32];

    fn scalar() -> Scalar {
        <Scalar as Reduce<U256>>::reduce_bytes(&FieldBytes::from(hex!(
            "ebb2c082fd7727890a28ac82f6bdf97bad8de9f5d7c9028692de1a255cad3e0f"
        )))
    }

    #[test]
    fn blinding_does_not_change_result() {
        let k = scalar();
        let expected = (ProjectivePoint::GENERATOR * k).to_affine();

        let a = Context::<All>::with_seed(&SEED_A);
        let b = Context::<SignOnly>::with_seed(&SEED_B);
        let v = Context::verification_only();

        assert_eq!(a.mul_generator(&k).to_affine(), expected);
        assert_eq!(b.mul_generator(&k).to_affine(), expected);
        assert_eq!(v.mul_generator(&k).to_affine(), expected);
    }

    #[test]
    fn randomize_with_seed() {
        let k = scalar();
        let mut ctx = Context::<All>::with_seed(&SEED_A);
        let before = ctx.mul_generator(&k).to_affine();

        ctx.randomize(Some(&SEED_B)).unwrap();
        assert_eq!(ctx.mul_generator(&k).to_affine(), before);
    }

    #[cfg(feature = "getrandom")]
    #[test]
    fn randomize_from_os() {
        let k = scalar();
        let mut ctx = Context::<SignOnly>::new().unwrap();
        let before = ctx.mul_generator(&k).to_affine();

        ctx.randomize(None).unwrap();
        assert_eq!(ctx.mul_generator(&k).to_affine(), before);
    }

    #[cfg(not(feature = "getrandom"))]
    #[test]
    fn failed_randomize_keeps_blinding() {
        let k = scalar();
        let mut ctx = Context::<All>::with_seed(&SEED_A);
        let key = crate::PrivateKey::from_slice(&[0x5a; 32]).unwrap();
        let digest = crate::Digest::sha256(b"randomize");

        let blinding = ctx.blinding.as_ref().map(|blinding| blinding.scalar);
        let point = ctx.mul_generator(&k).to_affine();
        let signature = ctx.sign_ecdsa(&digest, &key).unwrap();

        assert_eq!(ctx.randomize(None), Err(Error::RandomizationFailed));
        assert_eq!(ctx.blinding.as_ref().map(|blinding| blinding.scalar), blinding);
        assert_eq!(ctx.mul_generator(&k).to_affine(), point);
        assert_eq!(ctx.sign_ecdsa(&digest, &key).unwrap(), signature);
    }

    #[test]
    fn verification_only_is_unblinded() {
        assert!(Context::verification_only().blinding.is_none());
        assert!(Context::<VerifyOnly>::with_seed(&SEED_A).blinding.is_none());
        assert!(Context::<SignOnly>::with_seed(&SEED_A).blinding.is_some());
    }

    #[test]
    fn debug_hides_blinding() {
        let ctx = Context::<All>::with_seed(&SEED_A);
        assert_eq!(format!("{ctx:?}"), "Context { capability: \"sign+verify\", .. }");
    }

    #[test]
    fn contexts_are_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Context<All>>();
        assert_send_sync::<Context<SignOnly>>();
        assert_send_sync::<Context<VerifyOnly>>();
    }
}
