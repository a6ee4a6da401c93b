//! Lottery agency client entry point.
//!
//! Resolves the configuration, opens the bets file, connects to the server,
//! and runs [`SubmitBetsUseCase`] to completion.
//!
//! # Architecture
//!
//! ```text
//! main()
//!  └─ Cli::parse() + load_config()   -- flags > CLI_* env > TOML file > defaults
//!  └─ CsvBetSource::open()           -- lazy bet iterator
//!  └─ connect()                      -- FrameTransport<TcpStream>
//!  └─ SubmitBetsUseCase::run()
//!       ├─ BET_BATCH / CONFIRMATION   -- once per batch
//!       ├─ FINALIZATION
//!       └─ WINNER_QUERY / WINNERS
//! ```
//!
//! # Shutdown (for beginners)
//!
//! Ctrl+C or SIGTERM cancels a [`CancellationToken`].  The use case checks it
//! between batches only, so a batch that is already on the wire still gets
//! its confirmation.  A cancelled run skips finalization and the winner query
//! and the process exits successfully.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use lottery_client::application::submit_bets::{SubmitBetsUseCase, SubmitConfig};
use lottery_client::infrastructure::{
    network::connect,
    observer::TracingObserver,
    record_source::CsvBetSource,
    storage::config::{default_data_file, load_config, ClientConfig},
};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Lottery agency client.
///
/// Every option can also be set through its `CLI_*` environment variable or
/// the `[client]` / `[batch]` sections of the TOML file given by `--config`.
#[derive(Debug, Parser)]
#[command(
    name = "lottery-client",
    about = "Submits an agency's bets in batches and queries its winners",
    version
)]
struct Cli {
    /// Agency id of this client.
    #[arg(long, env = "CLI_ID")]
    id: Option<u8>,

    /// Server address as `host:port`.
    #[arg(long, env = "CLI_SERVER_ADDRESS")]
    server_address: Option<String>,

    /// Maximum size in bytes of one bet-batch message, header included.
    #[arg(long, env = "CLI_BATCH_MAX_BYTES")]
    batch_max_bytes: Option<usize>,

    /// Maximum number of bets in one batch (1 to 255).
    #[arg(long, env = "CLI_BATCH_MAX_AMOUNT")]
    batch_max_amount: Option<usize>,

    /// Headerless CSV file with the agency's bets.
    #[arg(long, env = "CLI_DATA_FILE")]
    data_file: Option<PathBuf>,

    /// Log level used when `RUST_LOG` is not set.
    #[arg(long, env = "CLI_LOG_LEVEL")]
    log_level: Option<String>,

    /// Optional TOML configuration file.
    #[arg(long, env = "CLI_CONFIG")]
    config: Option<PathBuf>,
}

/// Fully resolved settings for one run.
#[derive(Debug, PartialEq, Eq)]
struct Settings {
    server_address: String,
    data_file: PathBuf,
    log_level: String,
    submit: SubmitConfig,
}

impl Cli {
    /// Merges the parsed arguments over the file configuration.
    fn into_settings(self, file: ClientConfig) -> Settings {
        let agency = self.id.unwrap_or(file.client.id);
        Settings {
            server_address: self.server_address.unwrap_or(file.client.server_address),
            data_file: self
                .data_file
                .or(file.client.data_file)
                .unwrap_or_else(|| default_data_file(agency)),
            log_level: self.log_level.unwrap_or(file.client.log_level),
            submit: SubmitConfig {
                agency,
                batch_ceiling: self.batch_max_bytes.unwrap_or(file.batch.max_bytes),
                max_batch_records: self.batch_max_amount.unwrap_or(file.batch.max_amount),
            },
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let file_config = match &cli.config {
        Some(path) => load_config(path)
            .with_context(|| format!("failed to load config file {}", path.display()))?,
        None => ClientConfig::default(),
    };
    let settings = cli.into_settings(file_config);

    // `RUST_LOG` wins over the configured level.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&settings.log_level)),
        )
        .init();

    let agency = settings.submit.agency;
    info!(
        agency,
        server = %settings.server_address,
        data_file = %settings.data_file.display(),
        max_bytes = settings.submit.batch_ceiling,
        max_amount = settings.submit.max_batch_records,
        "lottery client starting"
    );

    // Reject bad limits before touching the network.
    settings
        .submit
        .builder()
        .context("invalid batch configuration")?;

    let source = CsvBetSource::open(&settings.data_file, agency)
        .context("failed to open bets file")?;

    // ── Shutdown signal ───────────────────────────────────────────────────────
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        info!("shutdown requested; stopping at the next batch boundary");
        trigger.cancel();
    });

    // ── Run ───────────────────────────────────────────────────────────────────
    let mut channel = connect(&settings.server_address)
        .await
        .with_context(|| format!("failed to connect to {}", settings.server_address))?;

    let use_case = SubmitBetsUseCase::new(settings.submit, Arc::new(TracingObserver::new(agency)));
    let report = use_case
        .run(&mut channel, source, &cancel)
        .await
        .context("bet submission failed")?;

    if report.cancelled {
        warn!(
            agency,
            batches = report.batches_sent,
            bets = report.bets_sent,
            "submission cancelled before finalization"
        );
    } else {
        info!(
            agency,
            batches = report.batches_sent,
            rejected = report.batches_rejected,
            bets = report.bets_sent,
            winners = report.winners.len(),
            "submission finished"
        );
    }

    Ok(())
}

/// Resolves on Ctrl+C or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("failed to listen for Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("received Ctrl+C"),
        _ = terminate => info!("received SIGTERM"),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
