use thiserror::Error;

#[derive(Error, Debug)]
pub enum KnapsackError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Message too long: {bits} bits exceeds key capacity of {capacity} bits")]
    LengthExceeded { bits: usize, capacity: usize },

    #[error("Input too long: {chars} characters exceeds the limit of {max_chars}")]
    InputTooLong { chars: usize, max_chars: usize },

    #[error("Key generation exhausted: no {stage} found after {attempts} candidates")]
    KeyGenerationExhausted { stage: &'static str, attempts: usize },

    #[error("Unsupported character {ch:?} at position {index}: code point does not fit in 8 bits")]
    UnsupportedCharacter { ch: char, index: usize },

    #[error("Invalid ciphertext: {0}")]
    InvalidCiphertext(String),

    #[error("Invalid key material: {0}")]
    InvalidKey(String),

    #[error("Invalid capacity: {0}. Must be at least 8 bits")]
    InvalidCapacity(usize),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Invalid bit string: {0}")]
    InvalidBits(String),

    #[error("Unsupported multiplier policy: {0}")]
    UnsupportedPolicy(String),
}

pub type Result<T> = std::result::Result<T, KnapsackError>;
