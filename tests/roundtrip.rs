use knapsack::{BigUint, BitString, KeyMaterial, KeyParams, KnapsackCipher, KnapsackError};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::OnceLock;

fn shared_cipher() -> &'static KnapsackCipher {
    static CIPHER: OnceLock<KnapsackCipher> = OnceLock::new();
    CIPHER.get_or_init(|| {
        let mut rng = StdRng::seed_from_u64(2024);
        KnapsackCipher::with_rng(&KeyParams::default(), &mut rng).unwrap()
    })
}

proptest! {
    #[test]
    fn roundtrip_latin1_text(text in "[\\x01-\\xff]{0,80}") {
        let cipher = shared_cipher();
        let ciphertext = cipher.encrypt(&text).unwrap();
        prop_assert_eq!(cipher.decrypt(&ciphertext), text.clone());
        prop_assert_eq!(cipher.decrypt_verified(&ciphertext).unwrap(), text);
    }

    #[test]
    fn roundtrip_raw_bits(bits in proptest::collection::vec(any::<bool>(), 640)) {
        let cipher = shared_cipher();
        let bits = BitString::from(bits);
        let ciphertext = cipher.encrypt_bits(&bits).unwrap();
        prop_assert_eq!(cipher.decrypt_bits(&ciphertext), bits);
    }
}

#[test]
fn eighty_characters_fill_the_default_key() {
    let cipher = shared_cipher();
    let text = "K".repeat(80);
    let ciphertext = cipher.encrypt(&text).unwrap();
    assert_eq!(cipher.decrypt(&ciphertext), text);

    let err = cipher.encrypt(&"K".repeat(81)).unwrap_err();
    assert!(matches!(
        err,
        KnapsackError::LengthExceeded { bits: 648, capacity: 640 }
    ));
}

#[test]
fn fixed_key_scenario() {
    let w = [2u32, 3, 6, 13, 27, 52].iter().map(|&v| BigUint::from(v)).collect();
    let key = KeyMaterial::from_parts(w, BigUint::from(107u32), BigUint::from(31u32)).unwrap();
    let cipher = KnapsackCipher::from_key(key);

    let bits: BitString = "101101".parse().unwrap();
    let ciphertext = cipher.encrypt_bits(&bits).unwrap();
    assert_eq!(ciphertext, BigUint::from(230u32));
    assert_eq!(cipher.decrypt_bits(&ciphertext).to_string(), "101101");
}
