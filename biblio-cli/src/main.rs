//! Library catalog console.
//!
//! Usage:
//!   biblio books list --title dune --available
//!   biblio authors add --name "Ursula K. Le Guin" --nationality USA
//!   biblio books delete 64f1c2 --yes
//!   biblio report --output informe.pdf
//!
//! The API base URL defaults to http://localhost:5000/api and can be set
//! with `--api-url` or `BIBLIO_API_URL`.

use anyhow::Result;
use biblio_cli::{Cli, execute};
use clap::Parser;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let mut stdout = std::io::stdout().lock();
    execute(cli, &mut stdout).await
}
