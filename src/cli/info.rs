use crate::cipher::KnapsackCipher;
use crate::error::Result;
use crate::keys::public_key_bytes;
use crate::params::KeyParams;
use std::time::Instant;

/// Generate a key with `params` and describe it
pub fn show_key_info(params: &KeyParams) -> Result<String> {
    let start = Instant::now();
    let cipher = KnapsackCipher::with_params(params)?;
    let elapsed = start.elapsed();

    let key = cipher.key();
    let public = cipher.public_key();

    let mut output = String::new();

    output.push_str("Merkle-Hellman Knapsack Key\n");
    output.push_str("===========================\n\n");

    output.push_str("Parameters:\n");
    output.push_str(&format!(
        "  Capacity: {} bits ({} characters)\n",
        params.max_bits,
        params.max_chars()
    ));
    output.push_str(&format!("  Amplitude: {}\n", params.amplitude));
    output.push_str(&format!("  Multiplier policy: {}\n", params.multiplier));
    output.push_str(&format!("  Max attempts: {}\n", params.max_attempts));
    output.push('\n');

    output.push_str("Key:\n");
    output.push_str(&format!("  Private sum bits: {}\n", key.private().total().bits()));
    output.push_str(&format!("  Modulus bits: {}\n", key.modulus().bits()));
    output.push_str(&format!("  Multiplier bits: {}\n", key.multiplier().bits()));
    let public_size = format_size(public_key_bytes(public) as u64);
    output.push_str(&format!("  Public key size: {}\n", public_size));
    output.push_str(&format!("  Density: {:.4}\n", public.density()));
    output.push_str(&format!("  Fingerprint: {}\n", hex::encode(public.fingerprint())));
    output.push_str(&format!("  Generated in: {:?}\n", elapsed));
    output.push('\n');

    output.push_str("Security Model:\n");
    output.push_str("  Textbook Merkle-Hellman; broken by lattice reduction.\n");
    output.push_str("  Keys are generated per run and never stored.\n");

    Ok(output)
}

fn format_size(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}
