//! CLI command definitions and subcommands

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// BotTurn - locale-aware dialog turn engine
#[derive(Parser)]
#[command(
    name = "bt",
    about = "Locale-aware dialog turn engine with multilingual language generation",
    version
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(
        short = 'l',
        long = "log-level",
        global = true,
        help = "Log level (TRACE, DEBUG, INFO, WARN, ERROR)"
    )]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// CLI subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Chat with the built-in bot on the console
    Chat {
        /// Locale negotiated for the conversation ("" = root)
        #[arg(short = 'L', long, default_value = "")]
        locale: String,

        /// Conversation id to resume (defaults to a fresh one)
        #[arg(short = 'k', long)]
        conversation: Option<String>,
    },

    /// Validate configuration and eagerly build every template set
    Check,

    /// Render one template and print the resulting activity
    Render {
        /// Template name
        template: String,

        /// JSON data binding
        #[arg(short, long)]
        data: Option<String>,

        /// Locale to render for ("" = root)
        #[arg(short = 'L', long, default_value = "")]
        locale: String,
    },

    /// List compiled locales and their template names
    Locales,
}
