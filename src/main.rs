use anyhow::{Context, Result, bail};
use clap::{CommandFactory, Parser};
use hifitts::cli::{Cli, Commands, ConfigAction, SpeakArgs};
use hifitts::{
    Config, FrameEmitter, HifiError, HttpSynthesizer, SynthesisError, WavFileSink, spawn_sink,
};
use std::io::Read;
use std::path::Path;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.quiet, cli.verbose);

    match cli.command {
        Commands::Speak(args) => {
            let config = load_config(cli.config.as_deref())?;
            run_speak(config, args).await?;
        }
        Commands::Config { action } => {
            handle_config_command(action, cli.config.as_deref())?;
        }
        Commands::Completions { shell } => {
            clap_complete::generate(
                shell,
                &mut Cli::command(),
                "hifitts",
                &mut std::io::stdout(),
            );
        }
    }

    Ok(())
}

/// Install the stderr subscriber.
///
/// `RUST_LOG` wins when set; otherwise the level follows `-q`/`-v`.
fn init_tracing(quiet: bool, verbose: u8) {
    let level = match (quiet, verbose) {
        (true, _) => "warn",
        (false, 0) => "info",
        (false, 1) => "debug",
        (false, _) => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("hifitts={level}")));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

/// Load configuration from file or use defaults.
///
/// Priority order:
/// 1. Custom config path from CLI (--config), which must exist
/// 2. Default config path (~/.config/hifitts/config.toml)
/// 3. Built-in defaults
///
/// Environment variable overrides are applied last.
fn load_config(custom_path: Option<&Path>) -> Result<Config> {
    let config = if let Some(path) = custom_path {
        if !path.exists() {
            return Err(HifiError::ConfigFileNotFound {
                path: path.display().to_string(),
            }
            .into());
        }
        Config::load(path).with_context(|| format!("Failed to load {}", path.display()))?
    } else {
        Config::load_or_default(&Config::default_path())?
    };

    Ok(config.with_env_overrides())
}

/// Fold command-line overrides into the loaded configuration.
fn apply_overrides(mut config: Config, args: &SpeakArgs) -> Config {
    if let Some(voice) = &args.voice {
        config.provider.voice = voice.clone();
    }
    if let Some(model) = &args.model {
        config.provider.model = model.clone();
    }
    if let Some(speed) = args.speed {
        config.provider.speed = speed;
    }
    if let Some(lang) = &args.lang {
        config.provider.lang_code = Some(lang.clone());
    }
    if let Some(rate) = args.sample_rate {
        config.output.sample_rate = rate;
    }
    if let Some(channels) = args.channels {
        config.output.channels = channels;
    }
    config
}

fn read_text(arg: Option<String>) -> Result<String> {
    let text = match arg {
        Some(text) => text,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read text from stdin")?;
            buf
        }
    };
    let text = text.trim().to_string();
    if text.is_empty() {
        bail!("No text to synthesize");
    }
    Ok(text)
}

async fn run_speak(config: Config, args: SpeakArgs) -> Result<()> {
    let config = apply_overrides(config, &args);
    let mut options = config.to_options()?;
    if let Some(timeout) = args.timeout {
        options = options.with_request_timeout(timeout);
    }
    let text = read_text(args.text)?;

    let (emitter, rx) = FrameEmitter::channel();
    let sink = spawn_sink(rx, WavFileSink::new(&args.output));
    let synthesizer = HttpSynthesizer::new(options, emitter)?;

    let cancel = CancellationToken::new();
    let ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            debug!("interrupt received");
            ctrl_c.cancel();
        }
    });

    let result = synthesizer.synthesize_cancellable(&text, &cancel).await;

    // Dropping the adapter drops the last sender, which lets the sink finish.
    drop(synthesizer);
    let (sink, frames) = sink.join()?;

    match result {
        Ok(event) => {
            info!(
                request_id = %event.request_id,
                frames,
                duration_ms = event.frame.duration_ms(),
                path = %sink.path().display(),
                "wrote audio"
            );
            Ok(())
        }
        Err(SynthesisError::Cancelled) => {
            warn!("synthesis cancelled, nothing written");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

fn handle_config_command(action: ConfigAction, custom_path: Option<&Path>) -> Result<()> {
    let config_path = custom_path
        .map(Path::to_path_buf)
        .unwrap_or_else(Config::default_path);

    match action {
        ConfigAction::Show => {
            let config = Config::load_or_default(&config_path)?.with_env_overrides();
            print!("{}", config.to_toml()?);
        }
        ConfigAction::Path => {
            println!("{}", config_path.display());
        }
        ConfigAction::Dump => {
            print!("{}", Config::default().to_toml()?);
        }
    }

    Ok(())
}
