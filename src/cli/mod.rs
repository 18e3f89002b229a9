//! Command-line interface parsing and handling
//!
//! This module handles parsing command-line arguments and executing the appropriate commands.

pub mod chat;
pub mod say;

use std::error::Error;
use std::io;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::cli::chat::run_chat;
use crate::cli::say::run_say;
use crate::core::config::data::{mask_secret, path_display};
use crate::core::config::{Config, ConfigKey, Settings};
use crate::utils::logging::TranscriptLog;

pub const LOG_FILTER_ENV_VAR: &str = "FINCHAT_LOG";

#[derive(Parser)]
#[command(name = "finchat")]
#[command(about = "A terminal client for an AI financial assistant")]
#[command(
    long_about = "Finchat is a terminal chat client for an AI financial assistant. \
Replies are formatted with emphasis, bullets and numbered lists, and each one \
comes with follow-up suggestions you can pick by number.\n\n\
Environment Variables:\n\
  FINCHAT_API_KEY   API key for the generative language endpoint\n\
  GEMINI_API_KEY    Fallback API key\n\
  FINCHAT_BASE_URL  Custom API base URL\n\
  FINCHAT_LOG       Diagnostic log filter (default: warn), written to stderr\n\n\
Commands inside the chat:\n\
  <text>            Send a message\n\
  (empty line)      Send the staged suggestion or quick action\n\
  /s <n>            Stage suggestion n of the latest reply\n\
  /q <n>            Stage quick action n\n\
  /dismiss          Hide the current error banner\n\
  /help             Show this list\n\
  /quit             Leave the chat"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Model to use for this session, overriding the configured one
    #[arg(short = 'm', long, global = true, value_name = "MODEL")]
    pub model: Option<String>,

    /// Append the transcript to the specified file
    #[arg(short = 'l', long, global = true, value_name = "FILE")]
    pub log: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the interactive chat (default)
    Chat,
    /// Send a single prompt and print the reply
    Say {
        /// Prompt text; multiple words are joined with spaces
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        prompt: Vec<String>,
    },
    /// Show the configuration file and the effective settings
    Config,
    /// Set configuration values
    Set {
        /// Configuration key to set (api-key, model, base-url, request-timeout)
        key: String,
        /// Value to set for the key
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        value: Vec<String>,
    },
    /// Unset configuration values
    Unset {
        /// Configuration key to unset
        key: String,
    },
}

pub fn main() -> Result<(), Box<dyn Error>> {
    init_tracing();
    tokio::runtime::Runtime::new()?.block_on(async_main())
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_env(LOG_FILTER_ENV_VAR).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

async fn async_main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    match args.command.unwrap_or(Commands::Chat) {
        Commands::Chat => {
            let settings = load_settings(args.model)?;
            let log = open_log(args.log)?;
            run_chat(settings, log).await
        }
        Commands::Say { prompt } => {
            let settings = load_settings(args.model)?;
            let log = open_log(args.log)?;
            run_say(prompt, settings, log).await
        }
        Commands::Config => {
            let config = Config::load()?;
            println!("Config file: {}", path_display(Config::config_path()?));
            config.print_all();
            println!();
            Settings::from_env(&config).print_effective();
            Ok(())
        }
        Commands::Set { key, value } => {
            let key = parse_key_or_exit(&key);
            let value = value.join(" ");
            if value.trim().is_empty() {
                eprintln!("⚠️  Missing value. Example: finchat set {key} <value>");
                std::process::exit(1);
            }

            let mut config = Config::load()?;
            if let Err(err) = config.set(key, &value) {
                eprintln!("❌ {err}");
                std::process::exit(1);
            }
            config.save()?;

            let shown = match key {
                ConfigKey::ApiKey => mask_secret(value.trim()),
                _ => value.trim().to_string(),
            };
            println!("✅ Set {key} to: {shown}");
            Ok(())
        }
        Commands::Unset { key } => {
            let key = parse_key_or_exit(&key);
            let mut config = Config::load()?;
            config.unset(key);
            config.save()?;
            println!("✅ Unset {key}");
            Ok(())
        }
    }
}

fn load_settings(model: Option<String>) -> Result<Settings, Box<dyn Error>> {
    let config = Config::load()?;
    let mut settings = Settings::from_env(&config);
    if let Some(model) = model.filter(|m| !m.trim().is_empty()) {
        settings.model = model.trim().to_string();
    }
    Ok(settings)
}

fn open_log(path: Option<PathBuf>) -> Result<TranscriptLog, Box<dyn Error>> {
    match path {
        Some(path) => TranscriptLog::open(path),
        None => Ok(TranscriptLog::disabled()),
    }
}

fn parse_key_or_exit(key: &str) -> ConfigKey {
    match ConfigKey::parse(key) {
        Some(key) => key,
        None => {
            let valid: Vec<&str> = ConfigKey::ALL.iter().map(|k| k.as_str()).collect();
            eprintln!("❌ Unknown config key: {key}");
            eprintln!("Valid keys: {}", valid.join(", "));
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_subcommand_defaults_to_chat() {
        let args = Args::try_parse_from(["finchat"]).expect("parse");
        assert!(args.command.is_none());
        assert!(args.log.is_none());
    }

    #[test]
    fn say_collects_prompt_words() {
        let args = Args::try_parse_from(["finchat", "say", "How", "is", "-my", "portfolio?"])
            .expect("parse");
        match args.command {
            Some(Commands::Say { prompt }) => {
                assert_eq!(prompt.join(" "), "How is -my portfolio?");
            }
            _ => panic!("expected say"),
        }
    }

    #[test]
    fn global_flags_apply_to_subcommands() {
        let args = Args::try_parse_from([
            "finchat",
            "say",
            "--model",
            "gemini-1.5-pro",
            "--log",
            "chat.log",
            "hello",
        ])
        .expect("parse");
        assert_eq!(args.model.as_deref(), Some("gemini-1.5-pro"));
        assert_eq!(args.log, Some(PathBuf::from("chat.log")));
    }

    #[test]
    fn set_joins_multi_word_values() {
        let args =
            Args::try_parse_from(["finchat", "set", "model", "gemini-1.5-flash"]).expect("parse");
        match args.command {
            Some(Commands::Set { key, value }) => {
                assert_eq!(key, "model");
                assert_eq!(value, vec!["gemini-1.5-flash".to_string()]);
            }
            _ => panic!("expected set"),
        }
    }

    #[test]
    fn args_definition_is_consistent() {
        use clap::CommandFactory;
        Args::command().debug_assert();
    }
}
