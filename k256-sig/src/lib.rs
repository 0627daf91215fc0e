#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![doc = include_str!("../README.md")]
#![doc(
    html_logo_url = "https://raw.githubusercontent.com/RustCrypto/meta/master/logo.svg",
    html_favicon_url = "https://raw.githubusercontent.com/RustCrypto/meta/master/logo.svg"
)]
#![forbid(unsafe_code)]
#![warn(
    clippy::mod_module_files,
    clippy::unwrap_used,
    missing_docs,
    rust_2018_idioms,
    unused_lifetimes,
    unused_qualifications
)]

//! ## Usage
//!
//! ```
//! use k256_sig::{All, Context, Digest, PrivateKey};
//!
//! let ctx = Context::<All>::with_seed(&[0x5a; 32]);
//! let private_key = PrivateKey::from_slice(&[0x01; 32])?;
//! let public_key = private_key.public_key(&ctx);
//!
//! let digest = Digest::sha256(b"hello");
//! let signature = ctx.sign_ecdsa_recoverable(&digest, &private_key)?;
//!
//! assert!(ctx.verify_ecdsa(signature.signature(), &digest, &public_key));
//! assert_eq!(ctx.recover_ecdsa(&signature, &digest)?, public_key);
//! # Ok::<(), k256_sig::Error>(())
//! ```

#[cfg(any(feature = "std", test))]
extern crate std;

pub mod context;
pub mod ecdh;
pub mod ecdsa;

mod digest;
mod error;
mod keypair;
mod private_key;
mod public_key;
mod tweak;

#[cfg(test)]
mod test_vectors;

pub use crate::{
    context::{All, Context, SignOnly, VerifyOnly},
    digest::{Digest, DIGEST_SIZE},
    ecdh::SharedSecret,
    ecdsa::{LowS, RecoverableSignature, RecoveryId, Signature},
    error::{Error, Result},
    keypair::KeyPair,
    private_key::{PrivateKey, PRIVATE_KEY_SIZE},
    public_key::{PublicKey, COMPRESSED_PUBLIC_KEY_SIZE, UNCOMPRESSED_PUBLIC_KEY_SIZE},
    tweak::Tweak,
};
pub use k256;
