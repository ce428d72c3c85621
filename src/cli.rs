//! Command-line interface for tictactoe_gateway.

use clap::{Parser, Subcommand};

/// Tic-tac-toe services and gateway
#[derive(Parser, Debug)]
#[command(name = "tictactoe_gateway")]
#[command(about = "Tic-tac-toe game and ranking services behind a HATEOAS gateway", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the game-state service
    Games {
        /// Port to bind to
        #[arg(short, long, default_value = "8081")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
    },

    /// Run the player-ranking service
    Players {
        /// Port to bind to
        #[arg(short, long, default_value = "8082")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// JSON file holding player records (created if it doesn't exist)
        #[arg(long, default_value = "players.json")]
        data_file: std::path::PathBuf,
    },

    /// Run the gateway against remote game and player services
    Gateway {
        /// Port to bind to
        #[arg(short, long, default_value = "8080")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Path to gateway config (defaults apply if missing)
        #[arg(short, long, default_value = "gateway.toml")]
        config: std::path::PathBuf,
    },

    /// Run the gateway with both services in-process
    Standalone {
        /// Port to bind to
        #[arg(short, long, default_value = "8080")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Path to gateway config (defaults apply if missing)
        #[arg(short, long, default_value = "gateway.toml")]
        config: std::path::PathBuf,
    },
}
