use crate::codec::{from_bits, to_bits, BitString};
use crate::error::{KnapsackError, Result};
use crate::keys::{KeyMaterial, PublicKey};
use crate::params::KeyParams;
use num_bigint::BigUint;
use num_traits::Zero;
use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};

/// Merkle-Hellman knapsack cipher over one immutable key
///
/// Encryption sums the public elements selected by the message bits.
/// Decryption unmasks with r^-1 mod q and decomposes the result greedily
/// against the private superincreasing sequence.
#[derive(Debug, Clone)]
pub struct KnapsackCipher {
    key: KeyMaterial,
}

impl KnapsackCipher {
    /// Fresh key sized for `max_bits` bits of plaintext, drawn from OS randomness
    pub fn new(max_bits: usize) -> Result<Self> {
        Self::with_params(&KeyParams::with_capacity(max_bits))
    }

    pub fn with_params(params: &KeyParams) -> Result<Self> {
        Self::with_rng(params, &mut OsRng)
    }

    pub fn with_rng<R: RngCore + CryptoRng + ?Sized>(
        params: &KeyParams,
        rng: &mut R,
    ) -> Result<Self> {
        let key = KeyMaterial::generate(params, rng)?;
        tracing::debug!(capacity = key.len(), "cipher ready");
        Ok(Self::from_key(key))
    }

    pub fn from_key(key: KeyMaterial) -> Self {
        Self { key }
    }

    /// Plaintext capacity N in bits
    pub fn capacity(&self) -> usize {
        self.key.len()
    }

    pub fn key(&self) -> &KeyMaterial {
        &self.key
    }

    pub fn public_key(&self) -> &PublicKey {
        self.key.public()
    }

    /// Encrypt text into a single integer
    pub fn encrypt(&self, plaintext: &str) -> Result<BigUint> {
        let bits = to_bits(plaintext)?;
        self.encrypt_bits(&bits)
    }

    /// Subset sum of the public sequence selected by `bits`; no modular reduction
    pub fn encrypt_bits(&self, bits: &BitString) -> Result<BigUint> {
        if bits.len() > self.capacity() {
            return Err(KnapsackError::LengthExceeded {
                bits: bits.len(),
                capacity: self.capacity(),
            });
        }
        Ok(bits
            .iter()
            .zip(self.key.public())
            .filter(|(bit, _)| *bit)
            .map(|(_, b)| b)
            .sum())
    }

    /// Decrypt to text; stops at the first all-zero byte
    pub fn decrypt(&self, ciphertext: &BigUint) -> String {
        from_bits(&self.decrypt_bits(ciphertext))
    }

    /// Recover all N message bits from a ciphertext
    pub fn decrypt_bits(&self, ciphertext: &BigUint) -> BitString {
        self.decompose(ciphertext).0
    }

    /// Decrypt, rejecting ciphertexts that are not a subset sum of the public key
    pub fn decrypt_verified(&self, ciphertext: &BigUint) -> Result<String> {
        let (bits, residue) = self.decompose(ciphertext);
        if !residue.is_zero() {
            return Err(KnapsackError::InvalidCiphertext(format!(
                "residue {} left after decomposition",
                residue
            )));
        }
        if &self.encrypt_bits(&bits)? != ciphertext {
            return Err(KnapsackError::InvalidCiphertext(
                "recovered bits do not re-encrypt to the ciphertext".into(),
            ));
        }
        Ok(from_bits(&bits))
    }

    /// Greedy decomposition of r^-1 * c mod q, highest element first
    ///
    /// Returns the bits in message order and whatever could not be covered.
    fn decompose(&self, ciphertext: &BigUint) -> (BitString, BigUint) {
        let target = self.key.unmask(ciphertext);
        let (mut bits, residue) = self.key.private().iter().rev().fold(
            (Vec::with_capacity(self.capacity()), target),
            |(mut bits, remaining), w| {
                let take = &remaining >= w;
                bits.push(take);
                let remaining = if take { remaining - w } else { remaining };
                (bits, remaining)
            },
        );
        bits.reverse();
        (BitString::from(bits), residue)
    }
}
