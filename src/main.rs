// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{anyhow, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::PathBuf;

use crate::app_config::{Config, LogLevel, RenderProvider};
use crate::app_controller::Controller;
use crate::credentials::CredentialStore;
use crate::pipeline::RunInput;

mod app_config;
mod app_controller;
mod credentials;
mod errors;
mod gloss;
mod pipeline;
mod providers;
mod render;
mod transcribe;

/// CLI Wrapper for RenderProvider to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliRenderProvider {
    Veo,
    Runway,
    Fal,
}

impl From<CliRenderProvider> for RenderProvider {
    fn from(cli_provider: CliRenderProvider) -> Self {
        match cli_provider {
            CliRenderProvider::Veo => RenderProvider::Veo,
            CliRenderProvider::Runway => RenderProvider::Runway,
            CliRenderProvider::Fal => RenderProvider::Fal,
        }
    }
}

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => LogLevel::Error,
            CliLogLevel::Warn => LogLevel::Warn,
            CliLogLevel::Info => LogLevel::Info,
            CliLogLevel::Debug => LogLevel::Debug,
            CliLogLevel::Trace => LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the sign production pipeline (default command)
    Run(RunArgs),

    /// Generate shell completions for signwave
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct RunArgs {
    /// English text to translate; omit for an interactive session
    #[arg(value_name = "TEXT")]
    text: Option<String>,

    /// Audio file to transcribe instead of text input
    #[arg(short, long, conflicts_with = "text")]
    audio: Option<PathBuf>,

    /// Trigger video rendering once the gloss document is ready
    #[arg(short, long)]
    render: bool,

    /// Render backend to use
    #[arg(short, long, value_enum)]
    backend: Option<CliRenderProvider>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Resolve credentials from the environment only, never prompt
    #[arg(long)]
    no_prompt: bool,
}

/// signwave - speech to Indian Sign Language production pipeline
///
/// Transcribes English speech, translates it into ISL gloss through a
/// hosted reasoning model, and optionally renders a video of the signed
/// sequence through a hosted video-generation backend.
#[derive(Parser, Debug)]
#[command(name = "signwave")]
#[command(version = "1.0.0")]
#[command(about = "AI-backed speech to sign-language pipeline")]
#[command(long_about = "signwave translates English speech or text into Indian Sign Language \
gloss and optionally renders a signed video through a hosted backend.

EXAMPLES:
    signwave                                   # Interactive session
    signwave \"open the book\"                   # One-shot text translation
    signwave -a clip.wav                       # Transcribe then translate
    signwave -r \"open the book\"                # Translate and render video
    signwave -b runway -r \"hello\"              # Render through Runway
    signwave --log-level debug \"hello\"         # Verbose logging
    signwave completions bash > signwave.bash  # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a
    different file with --config-path. If the file doesn't exist, a default
    one is created automatically.

CREDENTIALS:
    GROQ_API_KEY    transcription and gloss translation
    GEMINI_API_KEY  Veo render backend
    RUNWAY_API_KEY  Runway render backend
    FAL_KEY         fal.ai render backend
    Keys missing from the environment are requested with a masked prompt
    unless --no-prompt is given.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// English text to translate; omit for an interactive session
    #[arg(value_name = "TEXT")]
    text: Option<String>,

    /// Audio file to transcribe instead of text input
    #[arg(short, long, conflicts_with = "text")]
    audio: Option<PathBuf>,

    /// Trigger video rendering once the gloss document is ready
    #[arg(short, long)]
    render: bool,

    /// Render backend to use
    #[arg(short, long, value_enum)]
    backend: Option<CliRenderProvider>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Resolve credentials from the environment only, never prompt
    #[arg(long)]
    no_prompt: bool,
}

// @struct: Custom logger implementation
// The active level lives in log::max_level so it can be raised or lowered
// after the config file is loaded.
struct CustomLogger;

impl CustomLogger {
    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        log::set_boxed_logger(Box::new(CustomLogger))?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color code for log level
    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let mut stderr = std::io::stderr();
            let color = Self::color_for_level(record.level());
            let _ = writeln!(
                stderr,
                "{}{} {:5} {}\x1B[0m",
                color,
                now,
                record.level(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn level_filter(level: &LogLevel) -> LevelFilter {
    match level {
        LogLevel::Error => LevelFilter::Error,
        LogLevel::Warn => LevelFilter::Warn,
        LogLevel::Info => LevelFilter::Info,
        LogLevel::Debug => LevelFilter::Debug,
        LogLevel::Trace => LevelFilter::Trace,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the logger once with info level by default
    // We'll update the level after loading the config if needed
    CustomLogger::init(LevelFilter::Info).map_err(|e| anyhow!("Logger init failed: {}", e))?;

    let cli = CommandLineOptions::parse();

    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "signwave", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Run(args)) => run_pipeline(args).await,
        None => {
            // Default behavior - use top-level args
            run_pipeline(RunArgs {
                text: cli.text,
                audio: cli.audio,
                render: cli.render,
                backend: cli.backend,
                config_path: cli.config_path,
                log_level: cli.log_level,
                no_prompt: cli.no_prompt,
            })
            .await
        }
    }
}

async fn run_pipeline(args: RunArgs) -> Result<()> {
    let mut config = Config::load_or_create(std::path::Path::new(&args.config_path))?;

    if let Some(backend) = args.backend {
        config.render.provider = backend.into();
    }
    if let Some(level) = args.log_level {
        config.log_level = level.into();
    }
    log::set_max_level(level_filter(&config.log_level));

    let services = [
        crate::credentials::Service::Groq,
        render::service_for(config.render.provider),
    ];
    let credentials = if args.no_prompt {
        CredentialStore::from_env(&services)
    } else {
        CredentialStore::resolve_interactive(&services)
    };

    let controller = Controller::with_config(config, &credentials)?;

    match (args.text, args.audio) {
        (Some(text), None) => {
            controller
                .run_once(RunInput::Text(text), args.render)
                .await
        }
        (None, Some(path)) => {
            let audio = std::fs::read(&path)
                .map_err(|e| anyhow!("Could not read audio file {}: {}", path.display(), e))?;
            controller
                .run_once(RunInput::Audio(audio), args.render)
                .await
        }
        (None, None) => controller.run_interactive().await,
        (Some(_), Some(_)) => {
            // clap's conflicts_with already rejects this combination
            Err(anyhow!("Provide either text or --audio, not both"))
        }
    }
}
