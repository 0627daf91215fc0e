//! Public keys: non-identity curve points.

use crate::{
    context::{Context, Verification},
    Error, Result, Tweak,
};
use core::{
    cmp::Ordering,
    fmt,
    hash::{Hash, Hasher},
};
use k256::{
    ecdsa::VerifyingKey,
    elliptic_curve::sec1::ToEncodedPoint,
    AffinePoint, EncodedPoint, ProjectivePoint, Secp256k1,
};

/// Size of a compressed SEC1 public key: tag byte plus `x`.
pub const COMPRESSED_PUBLIC_KEY_SIZE: usize = 33;

/// Size of an uncompressed SEC1 public key: `0x04` plus `x` and `y`.
pub const UNCOMPRESSED_PUBLIC_KEY_SIZE: usize = 65;

/// secp256k1 public key.
///
/// Always a valid point on the curve other than the identity. The compressed
/// and uncompressed encodings of the same point compare equal.
#[derive(Copy, Clone, Eq, PartialEq)]
pub struct PublicKey {
    inner: k256::PublicKey,
}

impl PublicKey {
    /// Parse a SEC1 encoded point.
    ///
    /// Accepts 33-byte compressed (`0x02`/`0x03` tag) and 65-byte uncompressed
    /// (`0x04` tag) encodings. The length is checked before any point
    /// decoding; a wrong tag or a point that fails the curve equation yields
    /// [`Error::PointNotOnCurve`].
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let expected_tag = match bytes.len() {
            COMPRESSED_PUBLIC_KEY_SIZE => matches!(bytes[0], 0x02 | 0x03),
            UNCOMPRESSED_PUBLIC_KEY_SIZE => bytes[0] == 0x04,
            len => return Err(Error::InvalidKeySize(len)),
        };

        if !expected_tag {
            return Err(Error::PointNotOnCurve);
        }

        k256::PublicKey::from_sec1_bytes(bytes)
            .map(|inner| Self { inner })
            .map_err(|_| Error::PointNotOnCurve)
    }

    /// Serialize as a 33-byte compressed point.
    pub fn serialize(&self) -> [u8; COMPRESSED_PUBLIC_KEY_SIZE] {
        let mut bytes = [0u8; COMPRESSED_PUBLIC_KEY_SIZE];
        bytes.copy_from_slice(self.inner.to_encoded_point(true).as_bytes());
        bytes
    }

    /// Serialize as a 65-byte uncompressed point.
    pub fn serialize_uncompressed(&self) -> [u8; UNCOMPRESSED_PUBLIC_KEY_SIZE] {
        let mut bytes = [0u8; UNCOMPRESSED_PUBLIC_KEY_SIZE];
        bytes.copy_from_slice(self.inner.to_encoded_point(false).as_bytes());
        bytes
    }

    /// Compute `P + t×G`.
    pub fn tweak_add<C: Verification>(&self, ctx: &Context<C>, tweak: &Tweak) -> Result<Self> {
        let point = self.to_projective() + ctx.mul_generator(tweak.as_scalar());
        Self::from_projective(point)
    }

    /// Compute `t×P`. The tweak must be non-zero.
    pub fn tweak_mul<C: Verification>(&self, _ctx: &Context<C>, tweak: &Tweak) -> Result<Self> {
        let point = self.to_projective() * tweak.multiplier()?;
        Self::from_projective(point)
    }

    /// Compute `-P`.
    pub fn negate(&self) -> Self {
        // `-P` is the identity only if `P` is.
        k256::PublicKey::from_affine(-*self.as_affine())
            .map(|inner| Self { inner })
            .unwrap_or(*self)
    }

    /// Sum a set of public keys.
    ///
    /// Fails with [`Error::ResultingKeyInvalid`] if `keys` is empty or the sum
    /// is the identity.
    pub fn combine(keys: &[PublicKey]) -> Result<Self> {
        let sum = keys
            .iter()
            .fold(ProjectivePoint::IDENTITY, |acc, key| acc + key.to_projective());
        Self::from_projective(sum)
    }

    /// Borrow the affine point.
    pub fn as_affine(&self) -> &AffinePoint {
        self.inner.as_affine()
    }

    pub(crate) fn to_projective(self) -> ProjectivePoint {
        self.inner.to_projective()
    }

    fn from_projective(point: ProjectivePoint) -> Result<Self> {
        k256::PublicKey::from_affine(point.to_affine())
            .map(|inner| Self { inner })
            .map_err(|_| Error::ResultingKeyInvalid)
    }
}

impl From<k256::PublicKey> for PublicKey {
    fn from(inner: k256::PublicKey) -> Self {
        Self { inner }
    }
}

impl From<PublicKey> for k256::PublicKey {
    fn from(public_key: PublicKey) -> Self {
        public_key.inner
    }
}

impl From<PublicKey> for VerifyingKey {
    fn from(public_key: PublicKey) -> Self {
        VerifyingKey::from(public_key.inner)
    }
}

impl From<VerifyingKey> for PublicKey {
    fn from(verifying_key: VerifyingKey) -> Self {
        Self {
            inner: verifying_key.into(),
        }
    }
}

impl TryFrom<&[u8]> for PublicKey {
    type Error = Error;

    fn try_from(bytes: &[u8]) -> Result<Self> {
        Self::from_slice(bytes)
    }
}

impl ToEncodedPoint<Secp256k1> for PublicKey {
    fn to_encoded_point(&self, compress: bool) -> EncodedPoint {
        self.inner.to_encoded_point(compress)
    }
}

impl PartialOrd for PublicKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PublicKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.serialize().cmp(&other.serialize())
    }
}

impl Hash for PublicKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.serialize().hash(state);
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey(")?;

        for byte in self.serialize() {
            write!(f, "{byte:02x}")?;
        }

        write!(f, ")")
    }
}

#[cfg(feature = "serde")]
impl serdect::serde::Serialize for PublicKey {
    fn serialize<S>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error>
    where
        S: serdect::serde::Serializer,
    {
        serdect::array::serialize_hex_lower_or_bin(&PublicKey::serialize(self), serializer)
    }
}

#[cfg(feature = "serde")]
impl<'de> serdect::serde::Deserialize<'de> for PublicKey {
    fn deserialize<D>(deserializer: D) -> core::result::Result<Self, D::Error>
    where
        D: serdect::serde::Deserializer<'de>,
    {
        let mut buf = [0u8; UNCOMPRESSED_PUBLIC_KEY_SIZE];
        let bytes = serdect::slice::deserialize_hex_or_bin(&mut buf, deserializer)?;
        Self::from_slice(bytes).map_err(serdect::serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{context::All, PrivateKey};
    use hex_literal::hex;

    const GENERATOR_COMPRESSED: [u8; 33] =
        hex!("0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798");
    const GENERATOR_UNCOMPRESSED: [u8; 65] = hex!(
        "0479be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798"
        "483ada7726a3c4655da4fbfc0e1108a8fd17b448a68554199c47d08ffb10d4b8"
    );

    /// Key pair from the ECDSA test vector in `test_vectors.rs`
    const D: [u8; 32] = hex!("ebb2c082fd7727890a28ac82f6bdf97bad8de9f5d7c9028692de1a255cad3e0f");
    const Q: [u8; 65] = hex!(
        "04779dd197a5df977ed2cf6cb31d82d43328b790dc6b3b7d4437a427bd5847dfcd"
        "e94b724a555b6d017bb7607c3e3281daf5b1699d6ef4124975c9237b917d426f"
    );

    fn ctx() -> Context<All> {
        Context::with_seed(&[0x01; 32])
    }

    fn scalar(n: u8) -> [u8; 32] {
        let mut bytes = [0u8; 32];
        bytes[31] = n;
        bytes
    }

    #[test]
    fn compressed_and_uncompressed_agree() {
        let a = PublicKey::from_slice(&GENERATOR_COMPRESSED).unwrap();
        let b = PublicKey::from_slice(&GENERATOR_UNCOMPRESSED).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.serialize(), GENERATOR_COMPRESSED);
        assert_eq!(a.serialize_uncompressed(), GENERATOR_UNCOMPRESSED);
    }

    #[test]
    fn derives_vector_public_key() {
        let key = PrivateKey::from_slice(&D).unwrap().public_key(&ctx());
        assert_eq!(key.serialize_uncompressed(), Q);
    }

    #[test]
    fn rejects_wrong_length() {
        assert_eq!(PublicKey::from_slice(&[]), Err(Error::InvalidKeySize(0)));
        assert_eq!(
            PublicKey::from_slice(&GENERATOR_COMPRESSED[..32]),
            Err(Error::InvalidKeySize(32))
        );
        assert_eq!(
            PublicKey::from_slice(&[0x04; 64]),
            Err(Error::InvalidKeySize(64))
        );
    }

    #[test]
    fn rejects_bad_tag() {
        let mut bytes = GENERATOR_COMPRESSED;
        bytes[0] = 0x04;
        assert_eq!(PublicKey::from_slice(&bytes), Err(Error::PointNotOnCurve));

        let mut bytes = GENERATOR_UNCOMPRESSED;
        bytes[0] = 0x06;
        assert_eq!(PublicKey::from_slice(&bytes), Err(Error::PointNotOnCurve));
    }

    #[test]
    fn rejects_point_off_curve() {
        let mut bytes = GENERATOR_UNCOMPRESSED;
        bytes[64] ^= 1;
        assert_eq!(PublicKey::from_slice(&bytes), Err(Error::PointNotOnCurve));
    }

    #[test]
    fn tweaks_track_private_key() {
        let ctx = ctx();
        let one = PrivateKey::from_slice(&scalar(1)).unwrap();
        let tweak = Tweak::from_bytes(&scalar(6)).unwrap();
        let g = one.public_key(&ctx);

        let seven = PrivateKey::from_slice(&scalar(7)).unwrap().public_key(&ctx);
        assert_eq!(g.tweak_add(&ctx, &tweak).unwrap(), seven);

        let six = PrivateKey::from_slice(&scalar(6)).unwrap().public_key(&ctx);
        assert_eq!(g.tweak_mul(&ctx, &tweak).unwrap(), six);
    }

    #[test]
    fn tweak_add_to_identity_fails() {
        let ctx = ctx();
        let g = PublicKey::from_slice(&GENERATOR_COMPRESSED).unwrap();
        let minus_one = Tweak::from_bytes(&hex!(
            "fffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364140"
        ))
        .unwrap();
        assert_eq!(g.tweak_add(&ctx, &minus_one), Err(Error::ResultingKeyInvalid));
    }

    #[test]
    fn combine_and_negate() {
        let ctx = ctx();
        let g = PublicKey::from_slice(&GENERATOR_COMPRESSED).unwrap();
        let three = PrivateKey::from_slice(&scalar(3)).unwrap().public_key(&ctx);

        assert_eq!(PublicKey::combine(&[g, g, g]).unwrap(), three);
        assert_eq!(PublicKey::combine(&[g, g.negate()]), Err(Error::ResultingKeyInvalid));
        assert_eq!(PublicKey::combine(&[]), Err(Error::ResultingKeyInvalid));
    }
}
