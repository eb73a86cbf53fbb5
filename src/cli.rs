//! Command-line interface for hifitts
//!
//! Provides argument parsing using clap derive macros.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;
use std::time::Duration;

/// Speech synthesis through an HTTP TTS provider
#[derive(Parser, Debug)]
#[command(name = "hifitts", version, about = "Speech synthesis through an HTTP TTS provider")]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose logging (-v: debug, -vv: trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Synthesize text and write the frames to a WAV file
    Speak(SpeakArgs),

    /// Inspect configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

#[derive(clap::Args, Debug, Default)]
pub struct SpeakArgs {
    /// Text to speak (read from stdin when omitted)
    pub text: Option<String>,

    /// Output WAV file
    #[arg(short, long, value_name = "FILE")]
    pub output: PathBuf,

    /// Voice override (e.g. af_heart, bf_emma)
    #[arg(long, value_name = "VOICE")]
    pub voice: Option<String>,

    /// Model override
    #[arg(long, value_name = "MODEL")]
    pub model: Option<String>,

    /// Speaking speed multiplier
    #[arg(long, value_name = "FACTOR")]
    pub speed: Option<f32>,

    /// Language hint forwarded to the provider
    #[arg(long, value_name = "LANG")]
    pub lang: Option<String>,

    /// Output sample rate in Hz
    #[arg(long, short = 'r', value_name = "HZ")]
    pub sample_rate: Option<u32>,

    /// Output channel count (1 or 2)
    #[arg(long, value_name = "N")]
    pub channels: Option<u16>,

    /// Request timeout (e.g. 10s, 1m30s)
    #[arg(long, value_name = "DURATION", value_parser = parse_timeout)]
    pub timeout: Option<Duration>,
}

/// Parse a timeout string.
///
/// Supports bare numbers (seconds) and anything `humantime` accepts
/// (`500ms`, `30s`, `1m30s`).
fn parse_timeout(s: &str) -> Result<Duration, String> {
    let s = s.trim();
    if let Ok(secs) = s.parse::<u64>() {
        return Ok(Duration::from_secs(secs));
    }
    humantime::parse_duration(s).map_err(|e| e.to_string())
}

/// Configuration inspection actions
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum ConfigAction {
    /// Show the effective configuration (file + environment overrides)
    Show,
    /// Print the configuration file path
    Path,
    /// Dump the default configuration as TOML
    Dump,
}
