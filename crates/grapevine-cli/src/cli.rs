use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "grapevine",
    about = "Grapevine, a telephone-game experiment platform",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Base URL of a running server, used by the admin commands.
    #[arg(long, global = true, default_value = "http://127.0.0.1:8070")]
    pub server: String,
}

#[derive(Subcommand)]
pub enum Command {
    /// Start the Grapevine server
    Serve(ServeArgs),
    /// Create a game with freshly seeded chains
    NewGame(NewGameArgs),
    /// List active games, newest first
    Games,
    /// Show a game's chains as trees
    Inspect(InspectArgs),
}

#[derive(Args)]
pub struct ServeArgs {
    /// TOML config file; flags below override it.
    #[arg(long)]
    pub config: Option<PathBuf>,
    #[arg(long)]
    pub bind: Option<SocketAddr>,
    #[arg(long)]
    pub media_root: Option<PathBuf>,
}

#[derive(Args)]
pub struct NewGameArgs {
    /// Display name shown to players.
    #[arg(long)]
    pub name: Option<String>,
    /// Number of chains to seed the game with.
    #[arg(long, default_value = "1")]
    pub chains: u32,
    /// Chain hand-out order: sequential or random.
    #[arg(long, value_enum, default_value = "sequential")]
    pub order: OrderArg,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OrderArg {
    Sequential,
    Random,
}

impl From<OrderArg> for grapevine_types::ChainOrder {
    fn from(order: OrderArg) -> Self {
        match order {
            OrderArg::Sequential => Self::Sequential,
            OrderArg::Random => Self::Random,
        }
    }
}

#[derive(Args)]
pub struct InspectArgs {
    /// Game id to inspect.
    pub game: u64,
}
