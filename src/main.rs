//! archlens CLI entry point

use std::process::ExitCode;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use archlens::{AnalysisSession, Cli, LocalProvider};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse_args();
    init_tracing(cli.verbose);

    match run(&cli).await {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            // Same text the session shows as its status line
            eprintln!("Error: {}", e);
            e.exit_code()
        }
    }
}

/// Logs go to stderr so stdout carries only the requested artifact
fn init_tracing(verbose: bool) {
    let default = if verbose { "archlens=debug" } else { "archlens=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: &Cli) -> archlens::Result<String> {
    let config = cli.resolve_config()?;

    let provider = Arc::new(LocalProvider::new(&cli.path, config.clone()));
    let mut session = AnalysisSession::new(config);
    session.start(provider).await;
    session.wait().await?;

    let corpus = session.corpus()?;
    cli.render(&corpus)
}
