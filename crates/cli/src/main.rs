//! GreenMow CLI — the main entry point.
//!
//! Commands:
//! - `gateway` — Start the HTTP API server
//! - `chat`    — Send a single message from the terminal
//! - `init-db` — Create the fleet database and seed demo data
//! - `init`    — Print a default config file

use clap::{Parser, Subcommand};

mod bootstrap;
mod commands;

#[derive(Parser)]
#[command(
    name = "greenmow",
    about = "GreenMow — retrieval-augmented fleet assistant",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP gateway server
    Gateway {
        /// Override the port
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Send a single chat message
    Chat {
        /// The message to send
        message: String,

        /// Enable knowledge base retrieval
        #[arg(long)]
        rag: bool,

        /// Number of chunks to retrieve (1..8)
        #[arg(long, default_value_t = 4)]
        top_k: usize,

        /// Session id to continue an earlier conversation
        #[arg(long)]
        session: Option<String>,
    },

    /// Create the fleet database and seed demo data
    InitDb,

    /// Print a default config file to stdout
    Init,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    match cli.command {
        Commands::Gateway { port } => commands::gateway::run(port).await?,
        Commands::Chat {
            message,
            rag,
            top_k,
            session,
        } => commands::chat::run(message, rag, top_k, session).await?,
        Commands::InitDb => commands::init_db::run().await?,
        Commands::Init => {
            print!("{}", greenmow_config::AppConfig::default_toml());
        }
    }

    Ok(())
}
