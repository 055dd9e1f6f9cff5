//! Command-line interface definition.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use teger_core::{Evidence, Platform};

use crate::models::settings::SettingsUpdate;

#[derive(Parser, Debug)]
#[command(
    name = "teger",
    version,
    about = "Forensic assistant for social-engineering detection"
)]
pub struct Cli {
    #[arg(long, global = true, help = "Output machine-readable JSON")]
    pub json: bool,
    #[arg(long, global = true, help = "Config file (default ~/.teger/config.json)")]
    pub config: Option<PathBuf>,
    #[arg(long, global = true, help = "Hand-off store (default ~/.teger/capture.json)")]
    pub store: Option<PathBuf>,
    #[arg(short, long, global = true, help = "Enable debug logging")]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyze a message for manipulation tactics
    Scan {
        #[command(flatten)]
        evidence: EvidenceArgs,
        #[arg(
            long,
            conflicts_with = "text",
            help = "Read the message body from a file ('-' for stdin)"
        )]
        file: Option<PathBuf>,
        #[arg(
            long,
            conflicts_with_all = ["text", "file"],
            help = "Scan the capture left by `teger capture`"
        )]
        pending: bool,
        #[arg(long, help = "Popup-style short report")]
        compact: bool,
        #[arg(long, help = "Append the engine's raw payload to the report")]
        raw: bool,
        #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
        api_key: Option<String>,
    },
    /// Store a message for a later `scan --pending`
    Capture {
        #[command(flatten)]
        evidence: EvidenceArgs,
        #[arg(long, help = "Show the pending capture instead of storing one")]
        show: bool,
    },
    /// Show or change settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    /// Check that the reasoning engine is reachable
    Health {
        #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
        api_key: Option<String>,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct EvidenceArgs {
    #[arg(long, help = "Message body")]
    pub text: Option<String>,
    #[arg(long, default_value = "", help = "Claimed sender identity")]
    pub sender: String,
    #[arg(
        long,
        default_value = "Email",
        help = "Source platform (Email, Slack, Teams, SMS/WhatsApp, Gmail)"
    )]
    pub platform: String,
    #[arg(long = "meta", value_parser = parse_key_val, help = "Extra context as key=value")]
    pub metadata: Vec<(String, String)>,
}

impl EvidenceArgs {
    /// Build evidence with the given body
    pub fn into_evidence(self, text: String) -> Evidence {
        self.metadata.into_iter().fold(
            Evidence::new(text, self.sender, Platform::from_label(&self.platform)),
            |evidence, (key, value)| evidence.with_metadata(key, value),
        )
    }
}

fn parse_key_val(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected key=value, got '{}'", raw)),
    }
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print the current settings
    Show,
    /// Change one or more settings
    Set(SetArgs),
    /// Restore defaults
    Reset,
}

#[derive(Args, Debug, Default)]
pub struct SetArgs {
    #[arg(long)]
    pub endpoint: Option<String>,
    #[arg(long)]
    pub model: Option<String>,
    #[arg(long)]
    pub max_retries: Option<u32>,
    #[arg(long)]
    pub initial_backoff_ms: Option<u64>,
    #[arg(long, help = "Backoff ceiling; 0 removes it")]
    pub max_backoff_ms: Option<u64>,
    #[arg(long)]
    pub request_timeout_secs: Option<u64>,
    #[arg(long, help = "Proxy URL; empty string removes it")]
    pub proxy_url: Option<String>,
}

impl From<SetArgs> for SettingsUpdate {
    fn from(args: SetArgs) -> Self {
        SettingsUpdate {
            endpoint: args.endpoint,
            model: args.model,
            max_retries: args.max_retries,
            initial_backoff_ms: args.initial_backoff_ms,
            max_backoff_ms: args.max_backoff_ms,
            request_timeout_secs: args.request_timeout_secs,
            proxy_url: args.proxy_url,
        }
    }
}
