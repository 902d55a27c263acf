use std::{io::Write, process::ExitCode};

use compte_joint::{
    config::{self, AppConfig},
    error::Result,
    reconciliation::Reconciler,
    report,
    up::UpClient,
};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let config = match config::load() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(format!("compte_joint={}", config.log_level))),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{err}");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: AppConfig) -> Result<()> {
    let (player_1, player_2) = config.credentials()?;
    let client = UpClient::new(&config.base_url, config.page_size)?;
    let reconciler = Reconciler::new(Box::new(client), config.joint_match);

    let reconciliation = reconciler.reconcile(&player_1, &player_2).await?;
    tracing::info!(
        joint_accounts = reconciliation.accounts.len(),
        "reconciliation complete"
    );

    let report = report::render(&reconciliation, config.format)?;
    std::io::stdout().write_all(&report)?;
    Ok(())
}
