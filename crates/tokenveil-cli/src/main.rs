//! Tokenveil CLI - tokenize sample values through a DLP service
//!
//! Tokenizes each given value (or a built-in sample list) with
//! deterministic format-preserving encryption performed remotely, and
//! optionally reverses each token again to verify the round trip.
use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use log::debug;

use tokenveil::{
    Config, DetokenizeRequest, DlpHttpClient, InfoType, InfoTypes, KeyMaterial, SurrogateType,
    TokenizeRequest, Tokenizer,
};

/// Demo rows used when no values are given on the command line.
const SAMPLE_ROWS: &[&str] = &[
    "Ainsley Wilson",
    "Colby Morin",
    "Cherokee Vinson",
    "Ferdinand Gilmore",
    "Mia Robbins",
];

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Cloud project id (or set TOKENVEIL_PROJECT env var)
    #[arg(long)]
    project: Option<String>,

    /// KMS key resource name that wraps the data key
    /// (or set TOKENVEIL_KEY_NAME env var)
    #[arg(long)]
    key_name: Option<String>,

    /// Base64-encoded wrapped data key
    /// (or set TOKENVEIL_WRAPPED_KEY env var)
    #[arg(long)]
    wrapped_key: Option<String>,

    /// OAuth bearer token (or set TOKENVEIL_AUTH_TOKEN env var)
    #[arg(long)]
    auth_token: Option<String>,

    /// Base URL override for the DLP endpoint
    #[arg(long)]
    base_url: Option<String>,

    /// Info type to detect; repeatable, defaults to PERSON_NAME
    #[arg(long = "info-type")]
    info_types: Vec<String>,

    /// Surrogate marker attached to tokens so they stay reversible
    #[arg(long, default_value = "NAME_TOKEN")]
    surrogate: String,

    /// Request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Detokenize each token again and verify the round trip
    #[arg(long)]
    round_trip: bool,

    /// Values to tokenize; defaults to a built-in sample list
    values: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let project = args
        .project
        .or_else(|| std::env::var("TOKENVEIL_PROJECT").ok())
        .context("project must be provided via --project or TOKENVEIL_PROJECT env var")?;
    let key_name = args
        .key_name
        .or_else(|| std::env::var("TOKENVEIL_KEY_NAME").ok())
        .context("KMS key name must be provided via --key-name or TOKENVEIL_KEY_NAME env var")?;
    let wrapped_key = args
        .wrapped_key
        .or_else(|| std::env::var("TOKENVEIL_WRAPPED_KEY").ok())
        .context(
            "wrapped key must be provided via --wrapped-key or TOKENVEIL_WRAPPED_KEY env var",
        )?;

    let mut config = Config::new();
    if let Some(token) = args
        .auth_token
        .or_else(|| std::env::var("TOKENVEIL_AUTH_TOKEN").ok())
    {
        config = config.with_auth_token(token);
    }
    if let Some(base_url) = args.base_url {
        config = config.with_base_url(base_url);
    }
    if let Some(timeout) = args.timeout {
        config = config.with_timeout_seconds(timeout);
    }

    let tokenizer = Tokenizer::new(DlpHttpClient::new(config)?);
    let key = KeyMaterial::new(key_name, wrapped_key);

    let info_types: InfoTypes = if args.info_types.is_empty() {
        [InfoType::new("PERSON_NAME")].into_iter().collect()
    } else {
        args.info_types.iter().map(InfoType::new).collect()
    };
    let surrogate = SurrogateType::new(args.surrogate.as_str());

    let rows: Vec<String> = if args.values.is_empty() {
        SAMPLE_ROWS.iter().map(ToString::to_string).collect()
    } else {
        args.values
    };
    debug!("tokenizing {} value(s) in project {project}", rows.len());

    for row in &rows {
        println!("{} {row}", "NAME      =".bold());

        let request = TokenizeRequest::builder()
            .project(project.clone())
            .text(row.clone())
            .info_types(info_types.clone())
            .surrogate_type(Some(surrogate.clone()))
            .key(key.clone())
            .build();
        let token = tokenizer.tokenize(&request).await?;
        println!("{} {}", "TOKEN     =".bold(), token.text.cyan());

        if args.round_trip {
            let request = DetokenizeRequest::builder()
                .project(project.clone())
                .text(token.text.clone())
                .surrogate_info_types([InfoType::new(surrogate.as_str())].into_iter().collect())
                .surrogate_type(surrogate.clone())
                .key(key.clone())
                .build();
            let recovered = tokenizer.detokenize(&request).await?;

            let verdict = if recovered.text == *row {
                "ok".green()
            } else {
                "MISMATCH".red()
            };
            println!("{} {} [{verdict}]", "RECOVERED =".bold(), recovered.text);
        }
    }

    Ok(())
}
