//! Command-line argument parsing for Leadbook.
//!
//! Uses clap to parse the subcommands mirroring the web client's pages:
//! dashboard (list/export), add-lead, lead detail, and auth.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// A lightweight CLI for tracking sales leads.
#[derive(Parser, Debug)]
#[command(name = "leadbook")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Config file path
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Store base URL (overrides config and environment)
    #[arg(long, value_name = "URL")]
    pub store_url: Option<String>,

    /// Store anon key (overrides config and environment)
    #[arg(long, value_name = "KEY")]
    pub anon_key: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List leads
    List {
        /// Filter leads whose name, business, email, or Instagram handle
        /// contains the term (case-insensitive)
        #[arg(short, long, value_name = "TERM", default_value = "")]
        search: String,

        /// Sort order: date (most recent first) or status (pipeline order)
        #[arg(long, value_name = "MODE", default_value = "date")]
        sort: String,
    },

    /// Add a new lead
    Add {
        /// Lead name (required)
        #[arg(long, value_name = "NAME")]
        name: String,

        #[arg(long, value_name = "BUSINESS")]
        business: Option<String>,

        /// Instagram handle, without the leading @
        #[arg(long, value_name = "HANDLE")]
        instagram: Option<String>,

        #[arg(long, value_name = "EMAIL")]
        email: Option<String>,

        /// Initial status (new, contacted, replied, demo_booked, closed)
        #[arg(long, value_name = "STATUS")]
        status: Option<String>,

        #[arg(long, value_name = "NOTES")]
        notes: Option<String>,
    },

    /// Show a single lead
    Show {
        /// Lead id
        id: String,
    },

    /// Edit fields on a lead
    Edit {
        /// Lead id
        id: String,

        #[arg(long, value_name = "NAME")]
        name: Option<String>,

        #[arg(long, value_name = "BUSINESS")]
        business: Option<String>,

        #[arg(long, value_name = "HANDLE")]
        instagram: Option<String>,

        #[arg(long, value_name = "EMAIL")]
        email: Option<String>,

        #[arg(long, value_name = "STATUS")]
        status: Option<String>,

        #[arg(long, value_name = "NOTES")]
        notes: Option<String>,
    },

    /// Update just the status of a lead
    Status {
        /// Lead id
        id: String,

        /// New status (new, contacted, replied, demo_booked, closed)
        status: String,
    },

    /// Update just the notes of a lead
    Notes {
        /// Lead id
        id: String,

        /// New notes text
        notes: String,
    },

    /// Delete a lead
    Delete {
        /// Lead id
        id: String,

        /// Skip the confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Export leads to a CSV file
    Export {
        /// Filter term, as for list
        #[arg(short, long, value_name = "TERM", default_value = "")]
        search: String,

        /// Sort order, as for list
        #[arg(long, value_name = "MODE", default_value = "date")]
        sort: String,

        /// Output file path
        #[arg(short, long, value_name = "PATH", default_value = "leads.csv")]
        output: PathBuf,
    },

    /// Sign in to the store
    Login {
        /// Account email; the password is prompted
        #[arg(long, value_name = "EMAIL")]
        email: String,
    },

    /// Sign out and clear the cached session
    Logout,

    /// Show the signed-in user
    Whoami,
}

impl Cli {
    /// Parses command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Returns the config file path to use.
    ///
    /// Uses the --config argument if provided, otherwise the default path.
    pub fn config_path(&self) -> PathBuf {
        self.config
            .clone()
            .unwrap_or_else(crate::config::Config::default_path)
    }
}
