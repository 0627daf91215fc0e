//! ECDH tests.

use k256_sig::{
    k256::{elliptic_curve::ops::Reduce, NonZeroScalar, U256},
    Context, PrivateKey, PublicKey, SignOnly, VerifyOnly,
};
use proptest::prelude::*;

prop_compose! {
    fn private_key()(bytes in any::<[u8; 32]>()) -> PrivateKey {
        <NonZeroScalar as Reduce<U256>>::reduce_bytes(&bytes.into()).into()
    }
}

proptest! {
    #[test]
    fn agreement_is_symmetric(alice in private_key(), bob in private_key()) {
        let ctx = Context::<SignOnly>::with_seed(&[0x42; 32]);
        let alice_public = alice.public_key(&ctx);
        let bob_public = bob.public_key(&ctx);

        let alice_shared = ctx.ecdh(&alice, &bob_public).unwrap();
        let bob_shared = ctx.ecdh(&bob, &alice_public).unwrap();
        prop_assert_eq!(&alice_shared, &bob_shared);

        let verifier = Context::<VerifyOnly>::verification_only();
        prop_assert_eq!(verifier.ecdh(&alice, &bob_public).unwrap(), alice_shared);
    }

    #[test]
    fn custom_hash_sees_the_same_point(alice in private_key(), bob in private_key()) {
        let ctx = Context::<SignOnly>::with_seed(&[0x43; 32]);
        let concat = |x: &[u8; 32], y: &[u8; 32]| {
            let mut out = [0u8; 32];
            for (i, byte) in out.iter_mut().enumerate() {
                *byte = x[i] ^ y[31 - i];
            }
            out
        };

        let a = ctx.ecdh_with(&alice, &bob.public_key(&ctx), concat).unwrap();
        let b = ctx.ecdh_with(&bob, &alice.public_key(&ctx), concat).unwrap();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn shared_secret_depends_on_peer(alice in private_key(), bob in private_key()) {
        prop_assume!(alice != bob);
        let ctx = Context::<SignOnly>::with_seed(&[0x44; 32]);
        let alice_public: PublicKey = alice.public_key(&ctx);

        let with_bob = ctx.ecdh(&alice, &bob.public_key(&ctx)).unwrap();
        let with_self = ctx.ecdh(&alice, &alice_public).unwrap();
        prop_assert_ne!(with_bob, with_self);
    }
}
