//! VoiceDesk CLI
//!
//! Voice or text support conversations with automatic provider failover.

#![allow(clippy::print_stdout)]

mod session;

use ai_core::InferenceEngine;
use anyhow::Context;
use application::ProcessMessageInput;
use clap::{Parser, Subcommand};
use infrastructure::{AppConfig, Components, LogConfig, init_logging};
use tokio::io::BufReader;

use crate::session::{Session, SessionOptions};

/// VoiceDesk CLI
#[derive(Debug, Parser)]
#[command(name = "voicedesk")]
#[command(author, version, about = "Voice support assistant with provider fallback", long_about = None)]
struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Start an interactive session (default)
    Chat {
        /// Do not record or speak; type messages only
        #[arg(long)]
        text_only: bool,
    },

    /// Send one message and print the answer
    Ask {
        /// Message to send
        message: String,
    },

    /// Show provider status and the local server's models
    Status,

    /// Print the effective settings with credentials masked
    Config,
}

/// Verbosity count, raised to debug level when `app.debug` is set
const fn effective_verbosity(verbose: u8, debug: bool) -> u8 {
    if debug && verbose < 2 { 2 } else { verbose }
}

async fn chat(config: &AppConfig, text_only: bool) -> anyhow::Result<()> {
    let components = Components::build(config, !text_only)?;
    let mut session = Session::new(
        components.conversation,
        components.voice_input,
        components.voice_output,
        SessionOptions {
            app_name: config.app.name.clone(),
            max_history_turns: config.conversation.max_history_turns,
            debug: config.app.debug,
        },
    );

    let stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = std::io::stdout();
    session.run(stdin, &mut stdout).await
}

async fn ask(config: &AppConfig, message: &str) -> anyhow::Result<()> {
    let components = Components::build(config, false)?;
    let output = components
        .conversation
        .process(
            ProcessMessageInput::new(message, &[])
                .with_max_history_turns(config.conversation.max_history_turns),
        )
        .await?;

    println!("{}", output.response);
    if config.app.debug {
        println!("[{} / {}]", output.provider, output.model);
    }
    Ok(())
}

async fn status(config: &AppConfig) -> anyhow::Result<()> {
    let components = Components::build(config, false)?;

    println!("Mode: {}", config.mode);
    println!("{}", components.conversation.status());

    let local = &components.local;
    if local.is_available().await {
        println!("Local server: available at {}", config.ollama.base_url);
        let models = local.list_models().await;
        if models.is_empty() {
            println!("No local models installed");
        } else {
            println!("Local models:");
            for model in models {
                println!("  - {model}");
            }
        }
    } else {
        println!("Local server: not reachable at {}", config.ollama.base_url);
    }
    Ok(())
}

fn print_config(config: &AppConfig) {
    for (key, value) in config.to_redacted_map() {
        println!("{key} = {value}");
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load().context("Failed to load configuration")?;

    let verbosity = effective_verbosity(cli.verbose, config.app.debug);
    init_logging(&LogConfig::from_verbosity(verbosity, config.app.log_format))?;

    match cli.command.unwrap_or(Commands::Chat { text_only: false }) {
        Commands::Chat { text_only } => chat(&config, text_only).await,
        Commands::Ask { message } => ask(&config, &message).await,
        Commands::Status => status(&config).await,
        Commands::Config => {
            print_config(&config);
            Ok(())
        },
    }
}
