use clap::{Args, Parser, Subcommand};
use knapsack::cli::{read_plaintext, run_session, show_key_info, SessionOptions};
use knapsack::{KeyParams, MultiplierPolicy, Result};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Version info from build.rs
const VERSION: &str = env!("KNAPSACK_VERSION");
const BUILD: &str = env!("KNAPSACK_BUILD");
const PROFILE: &str = env!("KNAPSACK_PROFILE");
const GIT_HASH: &str = env!("KNAPSACK_GIT_HASH");

fn get_version() -> &'static str {
    use std::sync::OnceLock;
    static VERSION_STRING: OnceLock<String> = OnceLock::new();
    VERSION_STRING.get_or_init(|| format!("{} {} build {} ({})", PROFILE, VERSION, BUILD, GIT_HASH))
}

#[derive(Parser)]
#[command(name = "knapsack")]
#[command(author, about = "Merkle-Hellman knapsack public-key cryptosystem", long_about = None)]
struct Cli {
    /// Print version
    #[arg(short = 'V', long)]
    version: bool,

    /// Log key generation details to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Encrypt a line of text under a fresh key and decrypt it again
    #[command(alias = "r")]
    Run {
        /// Text to encrypt (prompts on stdin when omitted)
        text: Option<String>,

        /// Longest accepted input in characters (defaults to the key capacity)
        #[arg(long)]
        max_chars: Option<usize>,

        /// Print the ciphertext in hex
        #[arg(long)]
        hex: bool,

        #[command(flatten)]
        key: KeyArgs,
    },

    /// Generate a key and describe it
    #[command(alias = "i")]
    Info {
        #[command(flatten)]
        key: KeyArgs,
    },
}

#[derive(Args)]
struct KeyArgs {
    /// Key capacity in bits
    #[arg(long)]
    bits: Option<usize>,

    /// Randomness amplitude for the private sequence
    #[arg(long)]
    amplitude: Option<u32>,

    /// Multiplier policy (prime or coprime)
    #[arg(long, value_parser = parse_policy)]
    policy: Option<MultiplierPolicy>,

    /// Candidate budget per prime search
    #[arg(long)]
    max_attempts: Option<usize>,

    /// JSON file with key parameters; flags override its values
    #[arg(long)]
    config: Option<PathBuf>,
}

impl KeyArgs {
    fn resolve(&self) -> Result<KeyParams> {
        let mut params = match &self.config {
            Some(path) => KeyParams::from_json_file(path)?,
            None => KeyParams::default(),
        };
        if let Some(bits) = self.bits {
            params.max_bits = bits;
        }
        if let Some(amplitude) = self.amplitude {
            params.amplitude = amplitude;
        }
        if let Some(policy) = self.policy {
            params.multiplier = policy;
        }
        if let Some(max_attempts) = self.max_attempts {
            params.max_attempts = max_attempts;
        }
        params.validate()?;
        Ok(params)
    }
}

fn parse_policy(s: &str) -> std::result::Result<MultiplierPolicy, String> {
    s.parse().map_err(|e| format!("{}", e))
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(text: Option<String>, max_chars: Option<usize>, hex: bool, key: &KeyArgs) -> Result<()> {
    let params = key.resolve()?;
    let options = SessionOptions {
        max_chars: max_chars.unwrap_or_else(|| params.max_chars()),
        params,
        hex,
    };

    let text = match text {
        Some(text) => text,
        None => {
            let stdin = std::io::stdin();
            let mut stdout = std::io::stdout();
            read_plaintext(&mut stdin.lock(), &mut stdout, options.max_chars)?
        }
    };

    let report = run_session(&text, &options)?;
    print!("{}", report.render());
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.version {
        println!("knapsack {}", get_version());
        return ExitCode::SUCCESS;
    }

    init_tracing(cli.verbose);

    let command = match cli.command {
        Some(cmd) => cmd,
        None => {
            use clap::CommandFactory;
            let _ = Cli::command().print_help();
            println!();
            return ExitCode::SUCCESS;
        }
    };

    let result = match command {
        Commands::Run {
            text,
            max_chars,
            hex,
            key,
        } => run(text, max_chars, hex, &key),

        Commands::Info { key } => key
            .resolve()
            .and_then(|params| show_key_info(&params))
            .map(|info| print!("{}", info)),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
