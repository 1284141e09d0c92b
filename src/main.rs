//! Redstone CLI entry point.

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use redstone::cli::{Cli, Commands};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Chat(args) => redstone::cli::commands::chat::execute(args, cli.json).await,
        Commands::Workflow(args) => {
            redstone::cli::commands::workflow::execute(args, cli.json).await
        }
        Commands::Stack(args) => redstone::cli::commands::stack::execute(args, cli.json).await,
    };

    if let Err(err) = result {
        redstone::cli::handle_error(&err, cli.json);
    }
}
