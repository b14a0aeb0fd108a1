//! CLI entry point for the concierge assistants.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::planner::WeddingState;

/// Concierge CLI
#[derive(Parser, Debug)]
#[command(name = "concierge", version, about = "Chef and wedding-planner assistants")]
pub struct Cli {
    /// Model to use (format: provider:model, e.g. ollama:llama3.2)
    #[arg(short, long, global = true)]
    pub model: Option<String>,

    /// Config file (defaults to the platform config directory)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Ask the chef assistant a cooking question
    Chef(ChefArgs),
    /// Talk to the wedding coordinator
    Wedding(WeddingArgs),
}

/// Arguments for the `chef` subcommand.
#[derive(Parser, Debug)]
pub struct ChefArgs {
    /// Conversation thread id (a fresh one is generated when omitted)
    #[arg(short, long)]
    pub thread_id: Option<String>,

    /// The question to ask
    pub prompt: String,
}

/// Arguments for the `wedding` subcommand.
#[derive(Parser, Debug)]
pub struct WeddingArgs {
    /// Conversation thread id (a fresh one is generated when omitted)
    #[arg(short, long)]
    pub thread_id: Option<String>,

    #[command(flatten)]
    pub state: StateArgs,

    /// Message for the coordinator. Without one, every specialist runs on
    /// the fields given as flags.
    #[arg(required_unless_present_any = ["origin", "destination", "guest_count", "music_genre"])]
    pub prompt: Option<String>,
}

impl WeddingArgs {
    /// No prompt means the direct fan-out.
    pub fn is_direct(&self) -> bool {
        self.prompt.is_none()
    }
}

/// Wedding fields supplied on the command line.
#[derive(Args, Debug, Default)]
pub struct StateArgs {
    /// City or airport the guests fly from
    #[arg(long)]
    pub origin: Option<String>,

    /// Wedding location
    #[arg(long)]
    pub destination: Option<String>,

    /// Number of guests
    #[arg(long = "guests")]
    pub guest_count: Option<String>,

    /// Music genre for the playlist
    #[arg(long = "genre")]
    pub music_genre: Option<String>,
}

impl StateArgs {
    pub fn into_state(self) -> WeddingState {
        WeddingState {
            origin: self.origin,
            destination: self.destination,
            guest_count: self.guest_count,
            music_genre: self.music_genre,
        }
    }
}

impl Cli {
    /// Parse CLI arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
