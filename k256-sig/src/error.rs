//! Error type

use thiserror::Error;

/// Result type with the `k256-sig` crate's [`Error`] type.
pub type Result<T> = core::result::Result<T, Error>;

/// Errors surfaced at the boundary where malformed input is first observed.
///
/// A signature that fails to verify is *not* an error: verification returns
/// `false`. Variants here describe inputs that could not be decoded or
/// operations that could not produce a valid result.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Error)]
#[non_exhaustive]
pub enum Error {
    /// Key encoding has the wrong length (32 for private keys, 33 or 65 for
    /// public keys).
    #[error("invalid key size: {0} bytes")]
    InvalidKeySize(usize),

    /// Private scalar is zero or not below the curve order.
    #[error("invalid key value")]
    InvalidKeyValue,

    /// SEC1 bytes do not decode to a point on the curve.
    #[error("point not on curve")]
    PointNotOnCurve,

    /// Signature encoding has the wrong length.
    #[error("invalid signature size: {0} bytes")]
    InvalidSignatureSize(usize),

    /// Message digest is not 32 bytes.
    #[error("invalid digest size: {0} bytes")]
    InvalidDigestSize(usize),

    /// Malformed DER, or compact `r`/`s` outside `[1, n-1]`.
    #[error("malformed signature encoding")]
    MalformedEncoding,

    /// Recovery id outside `0..=3`.
    #[error("invalid recovery id: {0}")]
    InvalidRecoveryId(u8),

    /// Tweak is not a valid scalar for the requested operation.
    #[error("invalid tweak")]
    InvalidTweak,

    /// Key derivation produced the zero scalar or the point at infinity.
    #[error("resulting key is invalid")]
    ResultingKeyInvalid,

    /// Signing context could not be created.
    #[error("context creation failed")]
    ContextCreationFailed,

    /// Context blinding could not be refreshed. The previous blinding is
    /// still in force.
    #[error("context randomization failed")]
    RandomizationFailed,

    /// The operating system RNG failed.
    #[error("entropy source unavailable")]
    EntropyUnavailable,

    /// Nonce generation retries were exhausted.
    #[error("signing failed")]
    SigningFailed,

    /// No valid public key could be recovered from the signature.
    #[error("public key recovery failed")]
    RecoveryFailed,

    /// Key agreement produced the point at infinity.
    #[error("key agreement failed")]
    AgreementFailed,
}
