#![no_main]
use k256_sig::{All, Context, Digest, PublicKey, RecoverableSignature, Signature};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // DER decoding is strict, so anything accepted re-encodes byte for byte
    if let Ok(signature) = Signature::from_der(data) {
        assert_eq!(signature.to_der().unwrap().as_bytes(), data);
        assert_eq!(Signature::from_raw(&signature.to_raw()), Ok(signature));
    }

    if let Ok(signature) = Signature::from_compact(data) {
        assert_eq!(&signature.to_compact()[..], data);
        let der = signature.to_der().unwrap();
        assert_eq!(Signature::from_der(der.as_bytes()), Ok(signature));
        assert!(signature.normalize_s().is_low_s());
    }

    if let Ok(signature) = Signature::from_raw(data) {
        assert_eq!(&signature.to_raw()[..], data);
    }

    if data.len() < 33 {
        return;
    }

    let (digest, rest) = data.split_at(32);
    let Ok(recoverable) = RecoverableSignature::from_bytes(rest) else {
        return;
    };
    assert_eq!(&recoverable.to_bytes()[..], rest);

    let ctx = Context::<All>::with_seed(&[0u8; 32]);
    let digest = Digest::from_slice(digest).unwrap();

    // A recovered key always verifies the signature it came from
    if let Ok(public_key) = ctx.recover_ecdsa(&recoverable, &digest) {
        let signature = recoverable.signature();
        assert!(ctx.verify_ecdsa_with(
            k256_sig::LowS::Normalize,
            signature,
            &digest,
            &public_key
        ));
        assert_eq!(
            PublicKey::from_slice(&public_key.serialize()).unwrap(),
            public_key
        );
    }
});
