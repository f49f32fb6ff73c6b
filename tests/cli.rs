use std::error::Error;
use std::fs;
use std::io::Write;
use std::process::{Command, Output, Stdio};
use tempfile::tempdir;

fn knapsack_command() -> Command {
    Command::new(env!("CARGO_BIN_EXE_knapsack"))
}

fn run(args: &[&str]) -> Result<Output, Box<dyn Error>> {
    Ok(knapsack_command().args(args).output()?)
}

#[test]
fn cli_run_with_argument() -> Result<(), Box<dyn Error>> {
    let out = run(&["run", "--bits", "128", "Knapsack!"])?;
    assert!(
        out.status.success(),
        "run command failed: {}",
        String::from_utf8_lossy(&out.stderr)
    );

    let stdout = String::from_utf8(out.stdout)?;
    assert!(stdout.contains("Clear Text:\nKnapsack!\n"));
    assert!(stdout.contains("Number of clear text bytes = 9"));
    assert!(stdout.contains("Knapsack! is encrypted as"));
    assert!(stdout.contains("Result of decryption: Knapsack!"));
    Ok(())
}

#[test]
fn cli_run_prompts_on_stdin() -> Result<(), Box<dyn Error>> {
    let mut child = knapsack_command()
        .args(["run", "--bits", "64", "--hex"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()?;
    child
        .stdin
        .take()
        .ok_or("stdin not captured")?
        .write_all(b"way too long for eight\nshort\n")?;
    let out = child.wait_with_output()?;
    assert!(
        out.status.success(),
        "run command failed: {}",
        String::from_utf8_lossy(&out.stderr)
    );

    let stdout = String::from_utf8(out.stdout)?;
    assert!(stdout.starts_with("Enter a string and I will encrypt it as single large integer."));
    assert!(stdout.contains("less than 8 characters"));
    assert!(stdout.contains("short is encrypted as\n0x"));
    assert!(stdout.contains("Result of decryption: short"));
    Ok(())
}

#[test]
fn cli_rejects_oversized_text() -> Result<(), Box<dyn Error>> {
    let out = run(&["run", "--bits", "16", "abc"])?;
    assert!(!out.status.success());
    assert!(String::from_utf8(out.stderr)?.contains("Error: Input too long: 3 characters"));

    // A character limit above the key reports the key's bit capacity
    let out = run(&["run", "--bits", "16", "--max-chars", "5", "abc"])?;
    assert!(!out.status.success());
    assert!(String::from_utf8(out.stderr)?
        .contains("Error: Message too long: 24 bits exceeds key capacity of 16 bits"));
    Ok(())
}

#[test]
fn cli_info_reads_config() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let config = dir.path().join("params.json");
    fs::write(&config, r#"{"max_bits": 96, "multiplier": "coprime"}"#)?;

    let out = run(&["info", "--config", config.to_str().unwrap()])?;
    assert!(
        out.status.success(),
        "info command failed: {}",
        String::from_utf8_lossy(&out.stderr)
    );
    let stdout = String::from_utf8(out.stdout)?;
    assert!(stdout.contains("Capacity: 96 bits (12 characters)"));
    assert!(stdout.contains("Multiplier policy: coprime"));

    // Flags override the file
    let out = run(&["info", "--config", config.to_str().unwrap(), "--policy", "prime"])?;
    assert!(String::from_utf8(out.stdout)?.contains("Multiplier policy: prime"));
    Ok(())
}

#[test]
fn cli_info_with_unit_amplitude() -> Result<(), Box<dyn Error>> {
    for bits in ["8", "16"] {
        let out = run(&["info", "--bits", bits, "--amplitude", "1"])?;
        assert!(
            out.status.success(),
            "info --bits {} --amplitude 1 failed: {}",
            bits,
            String::from_utf8_lossy(&out.stderr)
        );
    }
    Ok(())
}

#[test]
fn cli_rejects_unknown_policy() -> Result<(), Box<dyn Error>> {
    let out = run(&["info", "--policy", "lucky"])?;
    assert!(!out.status.success());
    Ok(())
}

#[test]
fn cli_prints_version() -> Result<(), Box<dyn Error>> {
    let out = run(&["--version"])?;
    assert!(out.status.success());
    assert!(String::from_utf8(out.stdout)?.starts_with("knapsack "));
    Ok(())
}
