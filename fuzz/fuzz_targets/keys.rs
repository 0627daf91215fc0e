#![no_main]
use k256_sig::{PrivateKey, PublicKey, Tweak};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(public_key) = PublicKey::from_slice(data) {
        let compressed = public_key.serialize();
        let uncompressed = public_key.serialize_uncompressed();
        assert_eq!(PublicKey::from_slice(&compressed).unwrap(), public_key);
        assert_eq!(PublicKey::from_slice(&uncompressed).unwrap(), public_key);
        assert_eq!(public_key.negate().negate(), public_key);
    }

    if let Ok(private_key) = PrivateKey::from_slice(data) {
        assert_eq!(&private_key.to_bytes()[..], data);
        assert_eq!(private_key.negate().negate(), private_key);
    }

    if let Ok(tweak) = Tweak::from_slice(data) {
        let one = PrivateKey::from_slice(&[1u8; 32]).unwrap();
        if let Ok(tweaked) = one.tweak_mul(&tweak) {
            assert_ne!(tweaked.to_bytes()[..], [0u8; 32][..]);
        }
    }
});
