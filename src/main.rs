use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use flaskr::cli::{self, Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "flaskr=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Init => cli::commands::init(&cli.instance).await,
        Commands::InitDb => cli::commands::init_db(&cli.config()?).await,
        Commands::Serve { host, port } => {
            cli::commands::serve(cli.config()?, host.clone(), *port).await
        }
    }
}
