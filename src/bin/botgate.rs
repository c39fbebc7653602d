//! botgate: CLI tool for checking crawler requests against the bot data.

use clap::{Parser, Subcommand};
use botgate::{BotVerifier, VerifierConfig};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "botgate")]
#[command(author = "Kaitu.io")]
#[command(version = "0.1.0")]
#[command(about = "Verify crawler requests by user agent and published IP ranges", long_about = None)]
struct Cli {
    /// Data directory holding user-agents.json and bots/
    #[arg(short, long, default_value = "data")]
    data_dir: PathBuf,

    /// Configuration file (YAML, or JSON with a .json extension); overrides --data-dir
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Verify a request; exits with 1 unless it is a verified bot
    Verify {
        /// User-Agent header value
        #[arg(short, long)]
        user_agent: String,

        /// Client IP or X-Forwarded-For value
        #[arg(short, long)]
        ip: String,

        /// Only accept these bots (repeatable)
        #[arg(short, long)]
        allow: Vec<String>,
    },

    /// Match a user agent against the bot table
    Detect {
        /// User-Agent header value
        user_agent: String,
    },

    /// List the supported bots
    Bots,

    /// Show the IP ranges loaded for a bot
    Inspect {
        /// Bot name
        bot: String,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(2);
        }
    }
}

fn run(cli: Cli) -> Result<bool, Box<dyn std::error::Error>> {
    let config = match &cli.config {
        Some(path) => VerifierConfig::load(path)?,
        None => VerifierConfig::with_data_dir(&cli.data_dir),
    };
    // One-shot process: no background sweep
    let verifier = BotVerifier::new(&config.without_sweep())?;

    let report = verifier.load_report();
    for issue in &report.issues {
        log::warn!("{}", issue);
    }

    match cli.command {
        Commands::Verify {
            user_agent,
            ip,
            allow,
        } => {
            let report = verifier.debug_verify(Some(&user_agent), Some(&ip));
            let allowed: Vec<&str> = allow.iter().map(String::as_str).collect();
            let accepted = verifier.is_allowed_bot(Some(&user_agent), Some(&ip), &allowed);
            print_json(&report)?;
            Ok(accepted)
        }
        Commands::Detect { user_agent } => {
            let detection = verifier.detect_bot(&user_agent);
            print_json(&detection)?;
            Ok(detection.is_some())
        }
        Commands::Bots => {
            print_json(&verifier.list_supported_bots())?;
            Ok(true)
        }
        Commands::Inspect { bot } => {
            let inspection = verifier.inspect(&bot);
            print_json(&inspection)?;
            Ok(inspection.error.is_none())
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
