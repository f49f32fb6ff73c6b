use crate::cipher::KnapsackCipher;
use crate::codec::{encoded_len, BITS_PER_CHAR};
use crate::error::{KnapsackError, Result};
use crate::params::KeyParams;
use num_bigint::BigUint;
use std::io::{BufRead, Write};
use std::time::{Duration, Instant};

/// Prompt shown when no text is given on the command line
pub const PROMPT: &str = "Enter a string and I will encrypt it as single large integer.";

/// Options for an encrypt/decrypt session
#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub params: KeyParams,
    /// Longest accepted input, in characters
    pub max_chars: usize,
    /// Render the ciphertext in hex instead of decimal
    pub hex: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        let params = KeyParams::default();
        Self {
            max_chars: params.max_chars(),
            params,
            hex: false,
        }
    }
}

/// Outcome of one session
#[derive(Debug, Clone)]
pub struct SessionReport {
    pub plaintext: String,
    pub ciphertext: BigUint,
    pub decrypted: String,
    pub key_time: Duration,
    pub hex: bool,
}

impl SessionReport {
    pub fn ciphertext_text(&self) -> String {
        if self.hex {
            format!("0x{}", hex::encode(self.ciphertext.to_bytes_be()))
        } else {
            self.ciphertext.to_string()
        }
    }

    pub fn render(&self) -> String {
        let mut output = String::new();
        output.push_str("Clear Text:\n");
        output.push_str(&format!("{}\n", self.plaintext));
        output.push_str(&format!(
            "Number of clear text bytes = {}\n",
            self.plaintext.chars().count()
        ));
        output.push_str(&format!("{} is encrypted as\n", self.plaintext));
        output.push_str(&format!("{}\n", self.ciphertext_text()));
        output.push_str(&format!("Result of decryption: {}\n", self.decrypted));
        output.push_str(&format!("Key generated in: {:?}\n", self.key_time));
        output
    }
}

/// Generate a key, encrypt `text`, and decrypt it again
pub fn run_session(text: &str, options: &SessionOptions) -> Result<SessionReport> {
    let bits = encoded_len(text)?;
    let chars = bits / BITS_PER_CHAR;
    if chars > options.max_chars {
        return Err(KnapsackError::InputTooLong {
            chars,
            max_chars: options.max_chars,
        });
    }
    if bits > options.params.max_bits {
        return Err(KnapsackError::LengthExceeded {
            bits,
            capacity: options.params.max_bits,
        });
    }

    let start = Instant::now();
    let cipher = KnapsackCipher::with_params(&options.params)?;
    let key_time = start.elapsed();
    tracing::info!(?key_time, capacity = cipher.capacity(), "generated key");

    let ciphertext = cipher.encrypt(text)?;
    let decrypted = cipher.decrypt(&ciphertext);

    Ok(SessionReport {
        plaintext: text.to_string(),
        ciphertext,
        decrypted,
        key_time,
        hex: options.hex,
    })
}

/// Prompt on `output` and read one line from `input`, re-prompting while it is too long
pub fn read_plaintext<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    max_chars: usize,
) -> Result<String> {
    writeln!(output, "{}", PROMPT)?;
    loop {
        output.flush()?;
        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Err(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                "no input provided",
            )
            .into());
        }
        let line = line.trim_end_matches(['\r', '\n']);
        if line.chars().count() <= max_chars {
            return Ok(line.to_string());
        }
        writeln!(
            output,
            "the String is too long,please input a string less than {} characters",
            max_chars
        )?;
    }
}
