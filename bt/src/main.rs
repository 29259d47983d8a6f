//! BotTurn - console host for the dialog turn engine
//!
//! CLI entry point: validates configuration, eagerly builds the template
//! store (startup errors refuse to serve), and drives the engine from an
//! interactive console session.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use colored::Colorize;
use eyre::{Context, Result};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::{info, warn};

use botstate::{MemoryStore, SqliteStore, StateStore};
use botturn::activity::{GeneratedActivity, TurnMessage};
use botturn::bot;
use botturn::cli::{Cli, Command};
use botturn::config::{Config, StorageBackend};
use botturn::dialog::{DialogEngine, TurnStatus};
use botturn::lg::{Generator, TemplateStore};
use botturn::session::SessionManager;

fn setup_logging(cli_log_level: Option<&str>) -> Result<()> {
    // Note: Can't log here since logging isn't initialized yet
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("botturn")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let level = match cli_log_level.map(str::to_uppercase).as_deref() {
        Some("TRACE") => tracing::Level::TRACE,
        Some("DEBUG") => tracing::Level::DEBUG,
        Some("INFO") | None => tracing::Level::INFO,
        Some("WARN") | Some("WARNING") => tracing::Level::WARN,
        Some("ERROR") => tracing::Level::ERROR,
        Some(other) => {
            eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", other);
            tracing::Level::INFO
        }
    };

    let log_file = fs::File::create(log_dir.join("botturn.log")).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (level: {:?})", level);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.log_level.as_deref()).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    match cli.command {
        Some(Command::Check) => cmd_check(&config),
        Some(Command::Render { template, data, locale }) => cmd_render(&config, &template, data.as_deref(), &locale),
        Some(Command::Locales) => cmd_locales(&config),
        Some(Command::Chat { locale, conversation }) => cmd_chat(&config, locale, conversation).await,
        None => cmd_chat(&config, String::new(), None).await,
    }
}

/// Eagerly build every configured template set
///
/// This is the startup gate: any resource or syntax problem surfaces here
/// and the process refuses to serve.
fn build_generator(config: &Config) -> Result<Generator> {
    config.validate()?;
    let store = TemplateStore::build(&config.lg.root, &config.lg.locales)
        .with_context(|| format!("Failed to build template store from {}", config.lg.root.display()))?;
    Ok(Generator::new(Arc::new(store)))
}

fn cmd_check(config: &Config) -> Result<()> {
    let generator = build_generator(config)?;
    for (locale, set) in generator.store().iter() {
        let shown = if locale.is_empty() { "(root)" } else { locale };
        println!("  {}: {} templates", shown.bold(), set.template_names().count());
    }
    println!("{}", "Configuration OK".green());
    Ok(())
}

fn cmd_render(config: &Config, template: &str, data: Option<&str>, locale: &str) -> Result<()> {
    let generator = build_generator(config)?;
    let data = data
        .map(serde_json::from_str)
        .transpose()
        .context("Failed to parse --data as JSON")?;
    let activity = generator
        .generate(template, data.as_ref(), locale)
        .with_context(|| format!("Failed to render template '{template}'"))?;
    print_activity(&activity);
    Ok(())
}

fn cmd_locales(config: &Config) -> Result<()> {
    let generator = build_generator(config)?;
    for (locale, set) in generator.store().iter() {
        let shown = if locale.is_empty() { "(root)" } else { locale };
        println!("{}", shown.bold());
        for name in set.template_names() {
            println!("  {name}");
        }
    }
    Ok(())
}

async fn cmd_chat(config: &Config, locale: String, conversation: Option<String>) -> Result<()> {
    let generator = build_generator(config)?;
    let engine = DialogEngine::new(bot::demo_dialogs(), generator, &config.dialog.root_dialog);

    let store: Box<dyn StateStore> = match config.storage.backend {
        StorageBackend::Memory => Box::new(MemoryStore::new()),
        StorageBackend::Sqlite => {
            let path = config.storage.database_path();
            Box::new(SqliteStore::open(&path).with_context(|| format!("Failed to open state store at {}", path.display()))?)
        }
    };
    let manager = SessionManager::spawn(engine, store);

    let conversation_id = conversation.unwrap_or_else(|| uuid::Uuid::now_v7().to_string());
    let shown_locale = if locale.is_empty() { "(root)" } else { locale.as_str() };
    println!(
        "{} conversation {} (locale: {})",
        "Starting".bright_green(),
        conversation_id.bold(),
        shown_locale
    );
    println!("Type /quit to exit, /reset to restart the conversation.");

    let timeout_secs = config.dialog.turn_timeout_secs;
    let mut rl = DefaultEditor::new().map_err(|e| eyre::eyre!("Failed to initialize readline: {}", e))?;

    loop {
        let readline = rl.readline(&format!("{} ", ">".bright_green()));

        match readline {
            Ok(line) => {
                let input = line.trim();
                if !input.is_empty() {
                    let _ = rl.add_history_entry(input);
                }

                match input {
                    "/quit" | "/exit" => break,
                    "/reset" => {
                        manager.end_conversation(conversation_id.as_str()).await?;
                        println!("{}", "Conversation reset.".yellow());
                        continue;
                    }
                    _ => {}
                }

                // Blank input is still a turn: prompts use it to re-ask.
                let turn = TurnMessage::new(conversation_id.as_str(), input, locale.as_str());
                run_one_turn(&manager, turn, timeout_secs).await;
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => return Err(eyre::eyre!("Readline error: {}", e)),
        }
    }

    manager.shutdown().await;
    Ok(())
}

/// Process one turn with the configured deadline and print the result
///
/// Runtime rendering errors degrade to a generic reply; the conversation
/// itself stays resumable because failed turns never commit.
async fn run_one_turn(manager: &SessionManager, turn: TurnMessage, timeout_secs: u64) {
    let conversation = turn.conversation_id.clone();
    let processed = if timeout_secs > 0 {
        match tokio::time::timeout(Duration::from_secs(timeout_secs), manager.process_turn(turn)).await {
            Ok(result) => result,
            Err(_) => {
                warn!(%conversation, "Turn exceeded its deadline");
                println!("{}", "That took too long; please try again.".red());
                return;
            }
        }
    } else {
        manager.process_turn(turn).await
    };

    match processed {
        Ok(outcome) => {
            for activity in &outcome.replies {
                print_activity(activity);
            }
            if outcome.status == TurnStatus::Complete {
                println!("{}", "(conversation complete - your next message starts over)".dimmed());
            }
        }
        Err(e) if e.is_degradable() => {
            warn!(%conversation, error = %e, "Degrading render error to fallback reply");
            println!("{} Sorry - I couldn't put that answer together. Please try again.", "bot:".cyan());
        }
        Err(e) => {
            warn!(%conversation, error = %e, "Turn failed");
            println!("{} {}", "Turn failed:".red(), e);
        }
    }
}

fn print_activity(activity: &GeneratedActivity) {
    match activity {
        GeneratedActivity::Text(text) => println!("{} {}", "bot:".cyan(), text),
        GeneratedActivity::Structured(value) => {
            let pretty = serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string());
            println!("{}\n{}", "bot (structured):".cyan(), pretty.dimmed());
        }
    }
}
