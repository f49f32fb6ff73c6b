//! Big-integer helpers for key generation: probable-prime testing and
//! bounded prime searches over `BigUint`.

use crate::error::{KnapsackError, Result};
use num_bigint::{BigUint, RandBigInt};
use num_integer::Integer;
use num_traits::{One, Zero};
use rand::RngCore;

/// Miller-Rabin rounds per primality test (error bound 4^-32)
pub const MILLER_RABIN_ROUNDS: usize = 32;

const SMALL_PRIMES: [u32; 25] = [
    2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59, 61, 67, 71, 73, 79, 83, 89, 97,
];

/// Probabilistic primality test: trial division, then Miller-Rabin with random bases
pub fn is_probable_prime<R: RngCore + ?Sized>(n: &BigUint, rng: &mut R) -> bool {
    let two = BigUint::from(2u32);
    if n < &two {
        return false;
    }
    for &p in SMALL_PRIMES.iter() {
        let p = BigUint::from(p);
        if n == &p {
            return true;
        }
        if (n % &p).is_zero() {
            return false;
        }
    }

    let one = BigUint::one();
    let n_minus_one = n - &one;
    // n is odd and > 97 here, so n - 1 has at least one trailing zero
    let s = n_minus_one.trailing_zeros().unwrap_or(0);
    let d = &n_minus_one >> s;

    'witness: for _ in 0..MILLER_RABIN_ROUNDS {
        let a = rng.gen_biguint_range(&two, &n_minus_one);
        let mut x = a.modpow(&d, n);
        if x == one || x == n_minus_one {
            continue;
        }
        for _ in 1..s {
            x = (&x * &x) % n;
            if x == n_minus_one {
                continue 'witness;
            }
            if x == one {
                return false;
            }
        }
        return false;
    }
    true
}

/// Smallest probable prime strictly greater than `n`, examining at most `budget` candidates
pub fn next_prime<R: RngCore + ?Sized>(n: &BigUint, budget: usize, rng: &mut R) -> Result<BigUint> {
    let two = BigUint::from(2u32);
    if n < &two {
        return Ok(two);
    }

    let mut candidate = n + 1u32;
    if candidate.is_even() {
        candidate += 1u32;
    }
    for _ in 0..budget {
        if is_probable_prime(&candidate, rng) {
            return Ok(candidate);
        }
        candidate += 2u32;
    }

    Err(KnapsackError::KeyGenerationExhausted {
        stage: "modulus",
        attempts: budget,
    })
}

/// Uniform odd candidate in `[2^(bits-1), bound)`, i.e. with exactly `bits` bits and below `bound`
///
/// Returns `None` when no such odd value exists.
pub fn odd_candidate_below<R: RngCore + ?Sized>(bound: &BigUint, rng: &mut R) -> Option<BigUint> {
    let bits = bound.bits();
    if bits < 2 {
        return None;
    }
    let low = BigUint::one() << (bits - 1);
    if &low >= bound {
        return None;
    }
    let candidate = rng.gen_biguint_range(&low, bound) | BigUint::one();
    if &candidate < bound {
        return Some(candidate);
    }
    // Rounding up hit the bound; step back to the previous odd value
    let previous = candidate - 2u32;
    if previous >= low {
        Some(previous)
    } else {
        None
    }
}

/// Exclusive upper bound for prime multiplier candidates below `modulus`
///
/// Normally the modulus itself, so candidates share its bit length. When
/// `modulus` is `2^k + 1` the only value of its length below it is the even
/// `2^k`, so candidates drop to `k` bits instead.
pub fn prime_candidate_bound(modulus: &BigUint) -> BigUint {
    let bits = modulus.bits();
    if bits < 2 {
        return modulus.clone();
    }
    let low = BigUint::one() << (bits - 1);
    if modulus - &low >= BigUint::from(2u32) {
        modulus.clone()
    } else {
        low
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    #[test]
    fn test_small_values() {
        let mut rng = rng();
        let primes: Vec<u32> = (0..200u32)
            .filter(|&n| is_probable_prime(&BigUint::from(n), &mut rng))
            .collect();
        assert_eq!(&primes[..10], &[2, 3, 5, 7, 11, 13, 17, 19, 23, 29]);
        assert!(primes.contains(&101));
        assert!(primes.contains(&199));
        assert!(!primes.contains(&121));
        assert!(!primes.contains(&169));
        assert_eq!(primes.len(), 46);
    }

    #[test]
    fn test_known_large_prime_and_composites() {
        let mut rng = rng();
        // 2^127 - 1 is a Mersenne prime
        let m127 = (BigUint::one() << 127u32) - 1u32;
        assert!(is_probable_prime(&m127, &mut rng));

        // Carmichael number 561 = 3 * 11 * 17
        assert!(!is_probable_prime(&BigUint::from(561u32), &mut rng));
        let composite = &m127 * BigUint::from(1_000_003u32);
        assert!(!is_probable_prime(&composite, &mut rng));
    }

    #[test]
    fn test_next_prime_is_strictly_greater() {
        let mut rng = rng();
        let mut next = |n: u32| next_prime(&BigUint::from(n), 10, &mut rng).unwrap();
        assert_eq!(next(0), BigUint::from(2u32));
        assert_eq!(next(2), BigUint::from(3u32));
        assert_eq!(next(103), BigUint::from(107u32));
        assert_eq!(next(107), BigUint::from(109u32));
    }

    #[test]
    fn test_prime_candidate_bound() {
        // Ordinary modulus keeps its own bit length
        assert_eq!(prime_candidate_bound(&BigUint::from(107u32)), BigUint::from(107u32));
        // Fermat primes 2^k + 1 fall back to k bits
        assert_eq!(prime_candidate_bound(&BigUint::from(257u32)), BigUint::from(256u32));
        assert_eq!(prime_candidate_bound(&BigUint::from(65537u32)), BigUint::from(65536u32));

        let mut rng = rng();
        let bound = prime_candidate_bound(&BigUint::from(257u32));
        let c = odd_candidate_below(&bound, &mut rng).unwrap();
        assert!(c < BigUint::from(257u32));
        assert_eq!(c.bits(), 8);
    }

    #[test]
    fn test_next_prime_respects_budget() {
        let mut rng = rng();
        // The gap after 113 runs to 127: candidates 115..=125 are all composite
        let err = next_prime(&BigUint::from(114u32), 3, &mut rng).unwrap_err();
        assert!(matches!(
            err,
            KnapsackError::KeyGenerationExhausted { stage: "modulus", attempts: 3 }
        ));
    }

    #[test]
    fn test_odd_candidate_below_bound() {
        let mut rng = rng();
        let bound = BigUint::from(107u32);
        for _ in 0..200 {
            let c = odd_candidate_below(&bound, &mut rng).unwrap();
            assert!(c.is_odd());
            assert!(c < bound);
            assert_eq!(c.bits(), bound.bits());
        }
        assert!(odd_candidate_below(&BigUint::one(), &mut rng).is_none());
        // Only 2 has the bit length of 3 below it
        assert!(odd_candidate_below(&BigUint::from(3u32), &mut rng).is_none());
    }
}
