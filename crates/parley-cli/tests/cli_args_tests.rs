//! Argument parsing and config layering for the `parley` binary

use clap::Parser;
use parley_cli::cli::{Cli, Commands, LogLevel};
use parley_cli::config;
use parley_config::LlmProviderType;
use std::io::Write;
use tracing_subscriber::filter::LevelFilter;

#[test]
fn test_serve_flags() {
    let cli = Cli::try_parse_from([
        "parley", "serve", "--port", "8080", "--provider", "mock", "-m", "scripted",
    ])
    .unwrap();

    assert_eq!(
        cli.command,
        Commands::Serve {
            host: None,
            port: Some(8080),
            provider: Some(LlmProviderType::Mock),
            model: Some("scripted".into()),
        }
    );
    assert_eq!(cli.log_filter(), LevelFilter::INFO);
}

#[test]
fn test_unknown_provider_rejected() {
    assert!(Cli::try_parse_from(["parley", "serve", "--provider", "claude"]).is_err());
}

#[test]
fn test_ask_joins_words() {
    let cli = Cli::try_parse_from(["parley", "ask", "what", "is", "the", "price?"]).unwrap();
    match cli.command {
        Commands::Ask { text, url } => {
            assert_eq!(text.join(" "), "what is the price?");
            assert_eq!(url, None);
        }
        other => panic!("unexpected command {other:?}"),
    }
}

#[test]
fn test_ask_requires_text() {
    assert!(Cli::try_parse_from(["parley", "ask"]).is_err());
}

#[test]
fn test_global_log_flags() {
    let cli = Cli::try_parse_from(["parley", "chat", "--verbose"]).unwrap();
    assert_eq!(cli.log_filter(), LevelFilter::DEBUG);

    let cli = Cli::try_parse_from(["parley", "-l", "trace", "chat"]).unwrap();
    assert_eq!(cli.log_level, Some(LogLevel::Trace));
    assert_eq!(cli.log_filter(), LevelFilter::TRACE);

    let cli = Cli::try_parse_from(["parley", "chat"]).unwrap();
    assert_eq!(cli.log_filter(), LevelFilter::WARN);
}

#[test]
fn test_flags_override_config_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[web]\nport = 4000\n\n[chat]\nprovider = \"ollama\"").unwrap();

    let cli = Cli::try_parse_from([
        "parley",
        "--config",
        file.path().to_str().unwrap(),
        "serve",
        "--port",
        "5000",
    ])
    .unwrap();
    let config = config::load(cli.config.clone(), &cli.command).unwrap();

    assert_eq!(config.web.port, 5000);
    assert_eq!(config.chat.provider, LlmProviderType::Ollama);
}

#[test]
fn test_bad_url_override_rejected() {
    let file = tempfile::NamedTempFile::new().unwrap();
    let cli = Cli::try_parse_from([
        "parley",
        "--config",
        file.path().to_str().unwrap(),
        "chat",
        "--url",
        "relay.local/api/chat",
    ])
    .unwrap();

    assert!(config::load(cli.config.clone(), &cli.command).is_err());
}
