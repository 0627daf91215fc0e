//! ASN.1 DER encoding for ECDSA signatures.
//!
//! ```text
//! ECDSA-Sig-Value ::= SEQUENCE {
//!     r  INTEGER,
//!     s  INTEGER
//! }
//! ```

use crate::{Error, Result};
use core::fmt;
use der::{
    asn1::UintRef, Decode, DecodeValue, Encode, EncodeValue, Header, Length, Reader, Sequence,
    Writer,
};

/// Maximum size of a DER encoded secp256k1 signature.
///
/// Two 33-byte integers (a leading zero keeps the value positive), each with
/// a 2-byte tag and length, inside a 2-byte sequence header.
pub const MAX_DER_SIZE: usize = 72;

/// Smallest well-formed encoding: `30 06 02 01 rr 02 01 ss`.
const MIN_DER_SIZE: usize = 8;

/// Size of a scalar in bytes.
const SCALAR_SIZE: usize = 32;

/// ASN.1 DER encoded signature held in a fixed-size buffer.
#[derive(Copy, Clone, Eq, PartialEq)]
pub struct DerSignature {
    bytes: [u8; MAX_DER_SIZE],
    len: usize,
}

#[allow(clippy::len_without_is_empty)]
impl DerSignature {
    /// Borrow the encoded bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len]
    }

    /// Length of the encoding in bytes.
    pub fn len(&self) -> usize {
        self.len
    }
}

impl AsRef<[u8]> for DerSignature {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl fmt::Debug for DerSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DerSignature(")?;

        for byte in self.as_bytes() {
            write!(f, "{byte:02x}")?;
        }

        write!(f, ")")
    }
}

/// Borrowed `r` and `s` integers of a signature.
struct SignatureRef<'a> {
    r: UintRef<'a>,
    s: UintRef<'a>,
}

impl<'a> DecodeValue<'a> for SignatureRef<'a> {
    fn decode_value<R: Reader<'a>>(reader: &mut R, header: Header) -> der::Result<Self> {
        reader.read_nested(header.length, |reader| {
            Ok(Self {
                r: UintRef::decode(reader)?,
                s: UintRef::decode(reader)?,
            })
        })
    }
}

impl EncodeValue for SignatureRef<'_> {
    fn value_len(&self) -> der::Result<Length> {
        self.r.encoded_len()? + self.s.encoded_len()?
    }

    fn encode_value(&self, writer: &mut impl Writer) -> der::Result<()> {
        self.r.encode(writer)?;
        self.s.encode(writer)
    }
}

impl<'a> Sequence<'a> for SignatureRef<'a> {}

pub(super) fn encode(r: &[u8; SCALAR_SIZE], s: &[u8; SCALAR_SIZE]) -> Result<DerSignature> {
    let signature = SignatureRef {
        r: UintRef::new(r).map_err(|_| Error::MalformedEncoding)?,
        s: UintRef::new(s).map_err(|_| Error::MalformedEncoding)?,
    };

    let mut bytes = [0u8; MAX_DER_SIZE];
    let len = signature
        .encode_to_slice(&mut bytes)
        .map_err(|_| Error::MalformedEncoding)?
        .len();

    Ok(DerSignature { bytes, len })
}

/// Decode `r` and `s`, left padded to 32 bytes.
///
/// Only the canonical encoding is accepted: minimal integers, minimal
/// lengths and no trailing data.
pub(super) fn decode(input: &[u8]) -> Result<([u8; SCALAR_SIZE], [u8; SCALAR_SIZE])> {
    if !(MIN_DER_SIZE..=MAX_DER_SIZE).contains(&input.len()) {
        return Err(Error::InvalidSignatureSize(input.len()));
    }

    let signature = SignatureRef::from_der(input).map_err(|_| Error::MalformedEncoding)?;
    let r = left_pad(signature.r.as_bytes())?;
    let s = left_pad(signature.s.as_bytes())?;

    // Re-encoding must reproduce the input byte for byte
    if encode(&r, &s)?.as_bytes() != input {
        tracing::trace!("rejecting non-canonical DER signature");
        return Err(Error::MalformedEncoding);
    }

    Ok((r, s))
}

fn left_pad(bytes: &[u8]) -> Result<[u8; SCALAR_SIZE]> {
    let offset = SCALAR_SIZE
        .checked_sub(bytes.len())
        .ok_or(Error::MalformedEncoding)?;

    let mut padded = [0u8; SCALAR_SIZE];
    padded[offset..].copy_from_slice(bytes);
    Ok(padded)
}
