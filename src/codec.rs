//! Text to bit-sequence conversion.
//!
//! Each character is one byte (its Latin-1 code point), written as eight
//! bits most-significant first. Decoding stops at the first all-zero byte.

use crate::error::{KnapsackError, Result};
use std::fmt;

/// Bits per encoded character
pub const BITS_PER_CHAR: usize = 8;

/// Ordered sequence of bits; index 0 is the first (most significant) bit
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BitString(Vec<bool>);

impl BitString {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        self.0.iter().copied()
    }

    pub fn as_slice(&self) -> &[bool] {
        &self.0
    }
}

impl From<Vec<bool>> for BitString {
    fn from(bits: Vec<bool>) -> Self {
        Self(bits)
    }
}

impl FromIterator<bool> for BitString {
    fn from_iter<I: IntoIterator<Item = bool>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for BitString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &bit in &self.0 {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

impl std::str::FromStr for BitString {
    type Err = KnapsackError;
    fn from_str(s: &str) -> Result<Self> {
        s.chars()
            .enumerate()
            .map(|(index, c)| match c {
                '0' => Ok(false),
                '1' => Ok(true),
                other => Err(KnapsackError::InvalidBits(format!(
                    "unexpected {:?} at position {}",
                    other, index
                ))),
            })
            .collect()
    }
}

/// Encode text as 8 bits per character, most significant bit first
pub fn to_bits(text: &str) -> Result<BitString> {
    let mut bits = Vec::with_capacity(text.chars().count() * BITS_PER_CHAR);
    for (index, ch) in text.chars().enumerate() {
        let byte = u8::try_from(u32::from(ch))
            .map_err(|_| KnapsackError::UnsupportedCharacter { ch, index })?;
        bits.extend((0..BITS_PER_CHAR).rev().map(|shift| (byte >> shift) & 1 == 1));
    }
    Ok(BitString(bits))
}

/// Number of bits `text` encodes to, or the first character that cannot be encoded
pub fn encoded_len(text: &str) -> Result<usize> {
    let mut count = 0;
    for (index, ch) in text.chars().enumerate() {
        if u32::from(ch) > 0xFF {
            return Err(KnapsackError::UnsupportedCharacter { ch, index });
        }
        count += 1;
    }
    Ok(count * BITS_PER_CHAR)
}

/// Decode 8-bit groups back into text, stopping at the first all-zero group
///
/// A trailing group shorter than 8 bits is ignored.
pub fn from_bits(bits: &BitString) -> String {
    bits.as_slice()
        .chunks_exact(BITS_PER_CHAR)
        .map(|group| group.iter().fold(0u8, |acc, &bit| (acc << 1) | u8::from(bit)))
        .take_while(|&byte| byte != 0)
        .map(char::from)
        .collect()
}
