mod commands;
mod config;
mod logging;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::config::TavernConfig;

#[derive(Parser)]
#[command(name = "tavern", about = "Quest ledger and werewolf moderator for agent games")]
pub struct Cli {
    /// Path to the TOML config file
    #[arg(long, global = true, default_value = "tavern.toml")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a quest against scripted submissions
    Quest {
        /// Quest definition (TOML); defaults to the built-in lumber hunt
        #[arg(long)]
        quest: Option<PathBuf>,
        /// Owner of the built-in quest
        #[arg(long, default_value = "npc1")]
        agent: String,
        /// Submissions, one JSON record per line
        #[arg(long)]
        script: PathBuf,
    },
    /// Tally votes and print the majority winner
    Tally {
        /// Candidate names, one per voter; "" abstains
        votes: Vec<String>,
    },
    /// Simulate a werewolf game with random players
    Werewolf {
        /// Seed for the random players
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Write a default config file
    Init,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = TavernConfig::load(&cli.config)?;
    logging::init_logging(&config.log_level, config.log_json);

    match cli.command {
        Commands::Quest {
            quest,
            agent,
            script,
        } => commands::quest::handle(quest.as_deref(), &agent, &script, &config).await,
        Commands::Tally { votes } => commands::tally::handle(&votes),
        Commands::Werewolf { seed } => commands::werewolf::handle(seed, &config).await,
        Commands::Config { action } => commands::config::handle(action, &cli.config),
    }
}
