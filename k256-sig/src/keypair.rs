//! Private key together with its public key.

use crate::{
    context::{Context, Signing, Verification},
    PrivateKey, PublicKey, Result, Tweak,
};

/// A [`PrivateKey`] and the [`PublicKey`] derived from it.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct KeyPair {
    private_key: PrivateKey,
    public_key: PublicKey,
}

impl KeyPair {
    /// Derive the public half of `private_key`.
    pub fn new<C: Signing>(ctx: &Context<C>, private_key: PrivateKey) -> Self {
        let public_key = private_key.public_key(ctx);
        Self {
            private_key,
            public_key,
        }
    }

    /// Generate a fresh key pair from the operating system RNG.
    #[cfg(feature = "getrandom")]
    pub fn generate<C: Signing>(ctx: &Context<C>) -> Result<Self> {
        PrivateKey::generate().map(|private_key| Self::new(ctx, private_key))
    }

    /// Borrow the private key.
    pub fn private_key(&self) -> &PrivateKey {
        &self.private_key
    }

    /// Borrow the public key.
    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    /// Split into private and public halves.
    pub fn into_parts(self) -> (PrivateKey, PublicKey) {
        (self.private_key, self.public_key)
    }

    /// Apply an additive tweak to both halves.
    pub fn tweak_add<C>(&self, ctx: &Context<C>, tweak: &Tweak) -> Result<Self>
    where
        C: Signing + Verification,
    {
        Ok(Self {
            private_key: self.private_key.tweak_add(tweak)?,
            public_key: self.public_key.tweak_add(ctx, tweak)?,
        })
    }

    /// Apply a multiplicative tweak to both halves.
    pub fn tweak_mul<C>(&self, ctx: &Context<C>, tweak: &Tweak) -> Result<Self>
    where
        C: Signing + Verification,
    {
        Ok(Self {
            private_key: self.private_key.tweak_mul(tweak)?,
            public_key: self.public_key.tweak_mul(ctx, tweak)?,
        })
    }
}

impl From<KeyPair> for PublicKey {
    fn from(keypair: KeyPair) -> PublicKey {
        keypair.public_key
    }
}
