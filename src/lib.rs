//! Knapsack - Merkle-Hellman public-key cryptosystem
//!
//! A faithful rendition of the textbook scheme: a private superincreasing
//! sequence is disguised by modular multiplication into a public sequence,
//! messages are encrypted as subset sums of that public sequence, and the
//! private trapdoor turns each sum back into message bits.
//!
//! ## Layers
//!
//! ```text
//! arith (BigUint primes) → keys (w, q, r, b) → cipher (encrypt / decrypt)
//!                                 codec (text ⇄ bits) ┘
//! ```
//!
//! - **Encrypt**: `c = Σ bits[i] · b[i]`, no reduction
//! - **Decrypt**: `s = r⁻¹ · c mod q`, then greedy decomposition of `s` against `w`
//!
//! The scheme falls to lattice reduction and must not protect real data.
//!
//! ## Example
//!
//! ```
//! use knapsack::KnapsackCipher;
//!
//! let cipher = KnapsackCipher::new(128).unwrap();
//! let ciphertext = cipher.encrypt("attack at dawn").unwrap();
//! assert_eq!(cipher.decrypt(&ciphertext), "attack at dawn");
//! ```

pub mod arith;
pub mod cipher;
pub mod cli;
pub mod codec;
pub mod error;
pub mod keys;
pub mod params;

pub use cipher::KnapsackCipher;
pub use codec::BitString;
pub use error::{KnapsackError, Result};
pub use keys::{KeyMaterial, PublicKey, SuperincreasingSequence};
pub use params::{KeyParams, MultiplierPolicy};
pub use num_bigint::BigUint;
