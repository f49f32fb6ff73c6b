//! Key material: the private superincreasing sequence, the modulus and
//! multiplier that disguise it, and the public sequence derived from them.
//!
//! ```text
//! w[i] = sum(w[0..i]) + 1 + random(0, K)
//! q    = next prime after sum(w)
//! r    : 1 < r < q, gcd(r, q) = 1
//! b[i] = w[i] * r mod q
//! ```

use crate::arith::{is_probable_prime, next_prime, odd_candidate_below, prime_candidate_bound};
use crate::error::{KnapsackError, Result};
use crate::params::{KeyParams, MultiplierPolicy};
use num_bigint::{BigUint, RandBigInt};
use num_integer::Integer;
use num_traits::{One, ToPrimitive, Zero};
use rand::{CryptoRng, Rng, RngCore};
use sha3::{Digest, Sha3_256};

/// Private sequence where every element exceeds the sum of those before it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuperincreasingSequence {
    elements: Vec<BigUint>,
    total: BigUint,
}

impl SuperincreasingSequence {
    /// Build a fresh sequence of `len` elements with increments drawn from `[0, amplitude)`
    pub fn generate<R: RngCore + ?Sized>(len: usize, amplitude: u32, rng: &mut R) -> Self {
        let mut elements = Vec::with_capacity(len);
        let mut total = BigUint::zero();
        for _ in 0..len {
            let increment = rng.gen_range(0..amplitude);
            let element = &total + 1u32 + increment;
            total += &element;
            elements.push(element);
        }
        Self { elements, total }
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, BigUint> {
        self.elements.iter()
    }

    /// Sum of all elements
    pub fn total(&self) -> &BigUint {
        &self.total
    }
}

impl TryFrom<Vec<BigUint>> for SuperincreasingSequence {
    type Error = KnapsackError;

    fn try_from(elements: Vec<BigUint>) -> Result<Self> {
        let mut total = BigUint::zero();
        for (i, element) in elements.iter().enumerate() {
            if element <= &total {
                return Err(KnapsackError::InvalidKey(format!(
                    "element {} ({}) does not exceed the sum of its predecessors ({})",
                    i, element, total
                )));
            }
            total += element;
        }
        Ok(Self { elements, total })
    }
}

impl<'a> IntoIterator for &'a SuperincreasingSequence {
    type Item = &'a BigUint;
    type IntoIter = std::slice::Iter<'a, BigUint>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Public sequence `b`, the only key material needed to encrypt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicKey {
    elements: Vec<BigUint>,
}

impl PublicKey {
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, BigUint> {
        self.elements.iter()
    }

    /// SHA3-256 over the length-prefixed big-endian encoding of every element
    pub fn fingerprint(&self) -> [u8; 32] {
        let mut hasher = Sha3_256::new();
        hasher.update(b"knapsack_public_key_v1");
        hasher.update((self.elements.len() as u64).to_be_bytes());
        for element in &self.elements {
            let bytes = element.to_bytes_be();
            hasher.update((bytes.len() as u64).to_be_bytes());
            hasher.update(&bytes);
        }
        hasher.finalize().into()
    }

    /// Knapsack density: N / log2(max b)
    pub fn density(&self) -> f64 {
        let max_bits = self.elements.iter().map(|b| b.bits()).max().unwrap_or(0);
        if max_bits == 0 {
            return 0.0;
        }
        self.elements.len() as f64 / max_bits as f64
    }
}

impl<'a> IntoIterator for &'a PublicKey {
    type Item = &'a BigUint;
    type IntoIter = std::slice::Iter<'a, BigUint>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Complete key: private (w, q, r), cached r^-1 mod q, and public b
///
/// Immutable after construction.
#[derive(Debug, Clone)]
pub struct KeyMaterial {
    private: SuperincreasingSequence,
    modulus: BigUint,
    multiplier: BigUint,
    inverse: BigUint,
    public: PublicKey,
}

impl KeyMaterial {
    /// Generate fresh key material according to `params`
    pub fn generate<R: RngCore + CryptoRng + ?Sized>(
        params: &KeyParams,
        rng: &mut R,
    ) -> Result<Self> {
        params.validate()?;

        let private = SuperincreasingSequence::generate(params.max_bits, params.amplitude, rng);
        tracing::debug!(
            elements = private.len(),
            total_bits = private.total().bits(),
            "built superincreasing sequence"
        );

        let modulus = next_prime(private.total(), params.max_attempts, rng)?;
        tracing::debug!(modulus_bits = modulus.bits(), "selected modulus");

        let multiplier =
            choose_multiplier(&modulus, params.multiplier, params.max_attempts, rng)?;
        tracing::debug!(
            policy = %params.multiplier,
            multiplier_bits = multiplier.bits(),
            "selected multiplier"
        );

        Self::assemble(private, modulus, multiplier)
    }

    /// Build key material from explicit values, checking every key invariant
    pub fn from_parts(
        private: Vec<BigUint>,
        modulus: BigUint,
        multiplier: BigUint,
    ) -> Result<Self> {
        let private = SuperincreasingSequence::try_from(private)?;
        if private.is_empty() {
            return Err(KnapsackError::InvalidKey("private sequence is empty".into()));
        }
        if &modulus <= private.total() {
            return Err(KnapsackError::InvalidKey(format!(
                "modulus {} does not exceed the private sum {}",
                modulus,
                private.total()
            )));
        }
        if !is_probable_prime(&modulus, &mut rand::thread_rng()) {
            return Err(KnapsackError::InvalidKey(format!(
                "modulus {} is not prime",
                modulus
            )));
        }
        if multiplier <= BigUint::one() || multiplier >= modulus {
            return Err(KnapsackError::InvalidKey(format!(
                "multiplier {} is outside (1, {})",
                multiplier, modulus
            )));
        }
        Self::assemble(private, modulus, multiplier)
    }

    fn assemble(
        private: SuperincreasingSequence,
        modulus: BigUint,
        multiplier: BigUint,
    ) -> Result<Self> {
        let inverse = multiplier.modinv(&modulus).ok_or_else(|| {
            KnapsackError::InvalidKey(format!(
                "multiplier {} is not coprime to modulus {}",
                multiplier, modulus
            ))
        })?;
        let public = PublicKey {
            elements: private
                .iter()
                .map(|w| (w * &multiplier) % &modulus)
                .collect(),
        };
        Ok(Self {
            private,
            modulus,
            multiplier,
            inverse,
            public,
        })
    }

    /// Key length N
    pub fn len(&self) -> usize {
        self.private.len()
    }

    pub fn is_empty(&self) -> bool {
        self.private.is_empty()
    }

    pub fn private(&self) -> &SuperincreasingSequence {
        &self.private
    }

    pub fn modulus(&self) -> &BigUint {
        &self.modulus
    }

    pub fn multiplier(&self) -> &BigUint {
        &self.multiplier
    }

    /// r^-1 mod q
    pub fn inverse(&self) -> &BigUint {
        &self.inverse
    }

    pub fn public(&self) -> &PublicKey {
        &self.public
    }

    /// Undo the disguise: r^-1 * c mod q
    pub fn unmask(&self, ciphertext: &BigUint) -> BigUint {
        (&self.inverse * ciphertext) % &self.modulus
    }
}

fn choose_multiplier<R: RngCore + CryptoRng + ?Sized>(
    modulus: &BigUint,
    policy: MultiplierPolicy,
    budget: usize,
    rng: &mut R,
) -> Result<BigUint> {
    let two = BigUint::from(2u32);
    let prime_bound = prime_candidate_bound(modulus);
    if policy == MultiplierPolicy::Prime && &prime_bound != modulus {
        tracing::debug!(
            candidate_bits = prime_bound.bits(),
            "modulus is 2^k + 1; drawing a shorter prime multiplier"
        );
    }
    for attempt in 1..=budget {
        let candidate = match policy {
            MultiplierPolicy::Prime => {
                odd_candidate_below(&prime_bound, rng).filter(|c| is_probable_prime(c, rng))
            }
            MultiplierPolicy::Coprime if modulus > &two => {
                Some(rng.gen_biguint_range(&two, modulus)).filter(|c| c.gcd(modulus).is_one())
            }
            MultiplierPolicy::Coprime => None,
        };
        if let Some(r) = candidate {
            tracing::trace!(attempt, "multiplier candidate accepted");
            return Ok(r);
        }
    }
    Err(KnapsackError::KeyGenerationExhausted {
        stage: "multiplier",
        attempts: budget,
    })
}

/// Approximate key size in bytes, for reporting
pub fn public_key_bytes(public: &PublicKey) -> usize {
    public
        .iter()
        .map(|b| b.bits().div_ceil(8).to_usize().unwrap_or(usize::MAX))
        .sum()
}
