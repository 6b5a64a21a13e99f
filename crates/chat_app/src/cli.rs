use std::net::SocketAddr;
use std::path::PathBuf;

use chat_logging::LogDestination;
use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "chat_app",
    version,
    about = "Document chat client with a same-origin upload relay"
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Default, Args)]
pub struct GlobalArgs {
    /// RON configuration file (defaults to ./chat_relay.ron when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Base URL of the document backend
    #[arg(long, global = true, env = "CHAT_BACKEND_URL")]
    pub backend_url: Option<String>,

    /// Base URL of the relay the chat client talks to
    #[arg(long, global = true, env = "CHAT_RELAY_URL")]
    pub relay_url: Option<String>,

    /// Address the relay listens on
    #[arg(long, global = true, env = "CHAT_BIND")]
    pub bind: Option<SocketAddr>,

    /// Where log output goes: file, terminal or both
    #[arg(long, global = true)]
    pub log: Option<LogDestination>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the relay in front of the document backend
    Serve,
    /// Interactive chat in the terminal
    Chat {
        /// Talk to the backend directly instead of through the relay
        #[arg(long)]
        direct: bool,
    },
    /// Print the backend greeting
    Info {
        /// Ask the backend directly instead of through the relay
        #[arg(long)]
        direct: bool,
    },
}

impl Command {
    pub fn default_log_destination(&self) -> LogDestination {
        match self {
            // Keep the transcript free of log lines.
            Command::Chat { .. } => LogDestination::File,
            Command::Serve | Command::Info { .. } => LogDestination::Terminal,
        }
    }
}
