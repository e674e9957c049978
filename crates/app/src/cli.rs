//! Command-line interface definition.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "sessiongate")]
#[command(about = "Session and authorization gate for RealWorld-style APIs")]
#[command(version)]
pub struct Cli {
    /// Config file (default: ./sessiongate.toml)
    #[arg(short, long, env = "SESSIONGATE_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Path the client is considered to be on, for redirect decisions
    #[arg(long, default_value = "/", global = true)]
    pub at: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Log in with email and password
    Login {
        /// Account email
        #[arg(long)]
        email: String,

        /// Account password
        #[arg(long, env = "SESSIONGATE_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Create an account and log in
    Register {
        /// Username
        #[arg(long)]
        username: String,

        /// Account email
        #[arg(long)]
        email: String,

        /// Account password
        #[arg(long, env = "SESSIONGATE_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Show the current session
    Whoami,

    /// Drop the current session
    Logout,

    /// Check whether the current user may perform an action
    Can {
        /// create, update, delete, follow, unfollow, like or dislike
        #[arg(index = 1)]
        action: String,

        /// article, profile or comment
        #[arg(index = 2)]
        resource: String,

        /// Author of the article or comment
        #[arg(long)]
        author: Option<String>,

        /// Owner of the profile
        #[arg(long)]
        owner: Option<String>,

        /// The current user already follows the profile
        #[arg(long)]
        following: bool,
    },

    /// GET an API path through the gate and print the JSON body
    Get {
        /// Path relative to the API base URL, e.g. /articles/feed
        #[arg(index = 1)]
        path: String,
    },

    /// Print gate and session status as JSON
    Status,
}
