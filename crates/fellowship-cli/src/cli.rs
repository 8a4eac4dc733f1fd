use std::time::Duration;

use clap::{Parser, Subcommand};

use fellowship_accounting::dues::DEFAULT_DUE_AMOUNT;

use crate::commands::{
    Announcements,
    Dues,
    Finance,
    FindMembers,
    Members,
    SearchMembers,
};

#[derive(Parser, Debug)]
#[clap(name = "fellowship", version=env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    #[clap(long, env = "FELLOWSHIP_DB", default_value = "fellowship.sqlite3")]
    pub db: String,

    /// Quiet interval before a search runs while typing
    #[clap(long, env = "FELLOWSHIP_DEBOUNCE_MS", default_value_t = 300)]
    pub debounce_ms: u64,

    /// Amount recorded for a paid month
    #[clap(long, env = "FELLOWSHIP_DUE_AMOUNT", default_value_t = DEFAULT_DUE_AMOUNT)]
    pub due_amount: f64,

    #[clap(subcommand)]
    pub command: Command,
}

impl Cli {
    pub fn init() -> Self {
        Self::parse()
    }

    pub fn settings(&self) -> Settings {
        Settings {
            debounce: Duration::from_millis(self.debounce_ms),
            due_amount: self.due_amount,
        }
    }
}

/// Options shared by the commands
#[derive(Debug, Clone)]
pub struct Settings {
    pub debounce: Duration,
    pub due_amount: f64,
}


#[derive(Subcommand, Debug)]
pub enum Command {
    /// Manage the member roster
    #[clap(subcommand)]
    Members(Members),
    /// Monthly dues record
    #[clap(subcommand)]
    Dues(Dues),
    /// Contributions, donations and expenses
    #[clap(subcommand)]
    Finance(Finance),
    /// Search members and show their financial history
    #[clap(name = "search")]
    Search(SearchMembers),
    /// Search as you type, one line per edit
    #[clap(name = "find")]
    Find(FindMembers),
    /// The announcement board
    #[clap(subcommand)]
    Announcements(Announcements),
}
