//! Command-line interface for strictly_ledger.

use clap::{Parser, Subcommand};

/// Strictly Ledger - Connect Four against a ledger-hosted game
#[derive(Parser, Debug)]
#[command(name = "strictly_ledger")]
#[command(about = "Play and watch ledger-hosted Connect Four games", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to the ledger configuration file
    #[arg(short, long, global = true, default_value = "ledger.toml")]
    pub config: std::path::PathBuf,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Watch a game until it ends or Ctrl-C
    Watch {
        /// Game number
        game_id: u64,
    },

    /// List games waiting for an opponent
    Lobby,

    /// Show the ledger's summary of a game
    Info {
        /// Game number
        game_id: u64,
    },

    /// Create a new game
    Create {
        /// Move allowance in seconds (minimum 60)
        #[arg(short, long)]
        timeout: Option<i64>,
    },

    /// Join a waiting game
    Join {
        /// Game number
        game_id: u64,
    },

    /// Join any waiting game, or create one
    AutoMatch {
        /// Move allowance in seconds (minimum 60)
        #[arg(short, long)]
        timeout: Option<i64>,
    },

    /// Drop a piece into a column
    Move {
        /// Game number
        game_id: u64,

        /// Column, 0 (left) to 6 (right)
        #[arg(value_parser = clap::value_parser!(u8).range(0..7))]
        column: u8,
    },

    /// Claim the win after the opponent's deadline passed
    ClaimTimeout {
        /// Game number
        game_id: u64,
    },

    /// Settle every game whose deadline passed unclaimed
    Cleanup,
}
