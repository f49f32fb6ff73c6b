use crate::error::{KnapsackError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default plaintext capacity: 80 characters of 8 bits each
pub const DEFAULT_MAX_BITS: usize = 640;

/// Smallest capacity that holds one character
pub const MIN_MAX_BITS: usize = 8;

/// Default exclusive upper bound for the random increment of each private element
pub const DEFAULT_AMPLITUDE: u32 = 10;

/// Default candidate budget for each prime search
pub const DEFAULT_MAX_ATTEMPTS: usize = 10_000;

/// How the multiplier `r` is chosen once the modulus is known
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MultiplierPolicy {
    /// Probable prime with the same bit length as the modulus, below it
    #[default]
    Prime,
    /// Any value in `[2, q)` coprime to the modulus
    Coprime,
}

impl MultiplierPolicy {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Prime => "prime",
            Self::Coprime => "coprime",
        }
    }
}

impl std::str::FromStr for MultiplierPolicy {
    type Err = KnapsackError;
    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "prime" => Ok(Self::Prime),
            "coprime" => Ok(Self::Coprime),
            _ => Err(KnapsackError::UnsupportedPolicy(s.to_string())),
        }
    }
}

impl std::fmt::Display for MultiplierPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Parameters controlling key generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyParams {
    /// Key length N, the plaintext capacity in bits
    pub max_bits: usize,
    /// Randomness amplitude K; increments are drawn from `[0, K)`
    pub amplitude: u32,
    /// Candidates examined per prime search before giving up
    pub max_attempts: usize,
    pub multiplier: MultiplierPolicy,
}

impl Default for KeyParams {
    fn default() -> Self {
        Self {
            max_bits: DEFAULT_MAX_BITS,
            amplitude: DEFAULT_AMPLITUDE,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            multiplier: MultiplierPolicy::default(),
        }
    }
}

impl KeyParams {
    /// Parameters with the given capacity and defaults elsewhere
    pub fn with_capacity(max_bits: usize) -> Self {
        Self {
            max_bits,
            ..Default::default()
        }
    }

    /// Maximum number of whole characters that fit in the key
    pub fn max_chars(&self) -> usize {
        self.max_bits / 8
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_bits < MIN_MAX_BITS {
            return Err(KnapsackError::InvalidCapacity(self.max_bits));
        }
        if self.amplitude == 0 {
            return Err(KnapsackError::InvalidParameter(
                "amplitude must be at least 1".into(),
            ));
        }
        if self.max_attempts == 0 {
            return Err(KnapsackError::InvalidParameter(
                "max_attempts must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Load parameters from a JSON file; missing fields keep their defaults
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let params: KeyParams = serde_json::from_str(&text)?;
        params.validate()?;
        Ok(params)
    }
}
