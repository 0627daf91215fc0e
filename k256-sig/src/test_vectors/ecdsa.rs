//! ECDSA/secp256k1 test vectors

use hex_literal::hex;

/// Signature over a prehashed message with a known key pair.
pub struct TestVector {
    /// Private scalar
    pub d: &'static [u8; 32],
    /// Public key `x` coordinate
    pub q_x: &'static [u8; 32],
    /// Public key `y` coordinate
    pub q_y: &'static [u8; 32],
    /// Message digest
    pub m: &'static [u8; 32],
    /// Signature `r`
    pub r: &'static [u8; 32],
    /// Signature `s`
    pub s: &'static [u8; 32],
}

/// Fixed-nonce vector, usable for verification only
pub const ECDSA_TEST_VECTORS: &[TestVector] = &[TestVector {
    d: &hex!("ebb2c082fd7727890a28ac82f6bdf97bad8de9f5d7c9028692de1a255cad3e0f"),
    q_x: &hex!("779dd197a5df977ed2cf6cb31d82d43328b790dc6b3b7d4437a427bd5847dfcd"),
    q_y: &hex!("e94b724a555b6d017bb7607c3e3281daf5b1699d6ef4124975c9237b917d426f"),
    m: &hex!("4b688df40bcedbe641ddb16ff0a1842d9c67ea1c3bf63f3e0471baa664531d1a"),
    r: &hex!("241097efbf8b63bf145c8961dbdf10c310efbb3b2676bbc0f8b08505c9e2f795"),
    s: &hex!("021006b7838609339e8b415a7f9acb1b661828131aef1ecbc7955dfb01f3ca0e"),
}];

/// RFC 6979 deterministic signature: private key, message, `r || s`
pub struct Rfc6979Vector {
    /// Private scalar
    pub d: &'static [u8; 32],
    /// Message, hashed with SHA-256 before signing
    pub msg: &'static [u8],
    /// Expected low-S signature
    pub sig: &'static [u8; 64],
}

/// Deterministic signatures produced by libsecp256k1
pub const RFC6979_TEST_VECTORS: &[Rfc6979Vector] = &[
    Rfc6979Vector {
        d: &hex!("0000000000000000000000000000000000000000000000000000000000000001"),
        msg: b"Satoshi Nakamoto",
        sig: &hex!(
            "934b1ea10a4b3c1757e2b0c017d0b6143ce3c9a7e6a4a49860d7a6ab210ee3d8"
            "2442ce9d2b916064108014783e923ec36b49743e2ffa1c4496f01a512aafd9e5"
        ),
    },
    Rfc6979Vector {
        d: &hex!("0000000000000000000000000000000000000000000000000000000000000001"),
        msg: b"All those moments will be lost in time, like tears in rain. Time to die...",
        sig: &hex!(
            "8600dbd41e348fe5c9465ab92d23e3db8b98b873beecd930736488696438cb6b"
            "547fe64427496db33bf66019dacbf0039c04199abb0122918601db38a72cfc21"
        ),
    },
];

/// Recoverable signature over `SHA-256(msg)`: signer key and `r || s || v`
pub struct RecoveryVector {
    /// Compressed public key of the signer
    pub pk: &'static [u8; 33],
    /// Message, hashed with SHA-256 before signing
    pub msg: &'static [u8],
    /// Signature with trailing recovery id
    pub sig: &'static [u8; 65],
}

/// Recovery vectors covering both `y` parities
pub const RECOVERY_TEST_VECTORS: &[RecoveryVector] = &[
    RecoveryVector {
        pk: &hex!("021a7a569e91dbf60581509c7fc946d1003b60c7dee85299538db6353538d59574"),
        msg: b"example message",
        sig: &hex!(
            "ce53abb3721bafc561408ce8ff99c909f7f0b18a2f788649d6470162ab1aa032"
            "3971edc523a6d6453f3fb6128d318d9db1a5ff3386feb1047d9816e780039d52"
            "00"
        ),
    },
    RecoveryVector {
        pk: &hex!("036d6caac248af96f6afa7f904f550253a0f3ef3f5aa2fe6838a95b216691468e2"),
        msg: b"example message",
        sig: &hex!(
            "46c05b6368a44b8810d79859441d819b8e7cdc8bfd371e35c53196f4bcacdb51"
            "35c7facce2a97b95eacba8a586d87b7958aaf8368ab29cee481f76e871dbd9cb"
            "01"
        ),
    },
];
