use clap::{Parser, Subcommand, ValueEnum};
use parley_config::LlmProviderType;
use std::path::PathBuf;
use tracing_subscriber::filter::LevelFilter;

/// Log level options for CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// No logging output
    Off,
    /// Error messages only
    Error,
    /// Warnings and errors
    Warn,
    /// Informational messages
    Info,
    /// Debug messages
    Debug,
    /// Trace-level messages, including every frame
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::OFF,
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Trace => LevelFilter::TRACE,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "parley")]
#[command(about = "parley - streaming chat relay and terminal client for the SDE Abroad assistant")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Set log level (off, error, warn, info, debug, trace)
    /// If not specified, `serve` logs at info and chat commands at warn
    #[arg(short = 'l', long, global = true, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Enable verbose logging (shortcut for --log-level=debug)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file path (defaults to ~/.config/parley/config.toml)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Commands {
    /// Run the relay endpoint
    Serve {
        /// Bind address (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Bind port (overrides config)
        #[arg(short, long)]
        port: Option<u16>,

        /// Generation provider: gemini, openai, ollama or mock
        #[arg(long)]
        provider: Option<LlmProviderType>,

        /// Model name (overrides config)
        #[arg(short, long)]
        model: Option<String>,
    },

    /// Interactive chat against a running relay
    Chat {
        /// Relay chat URL (overrides config)
        #[arg(short, long)]
        url: Option<String>,
    },

    /// Ask a single question and print the reply
    Ask {
        /// Question text
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,

        /// Relay chat URL (overrides config)
        #[arg(short, long)]
        url: Option<String>,
    },

    /// Print the effective configuration as TOML
    Config,
}

impl Cli {
    /// Level used when `--log-level` and `RUST_LOG` are both absent
    pub fn log_filter(&self) -> LevelFilter {
        if let Some(level) = self.log_level {
            return level.into();
        }
        if self.verbose {
            return LevelFilter::DEBUG;
        }
        match self.command {
            Commands::Serve { .. } => LevelFilter::INFO,
            _ => LevelFilter::WARN,
        }
    }
}
