//! Book Catalog - interactive library catalog manager

use std::{io, path::PathBuf};

use anyhow::Context;
use clap::Parser;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt::writer::BoxMakeWriter, layer::SubscriberExt, util::SubscriberInitExt};

use book_catalog::{config::LoggingConfig, repl::Repl, AppConfig, AppState};

#[derive(Debug, Parser)]
#[command(version, about = "Personal library catalog manager")]
struct Cli {
    /// Extra configuration file layered over config/default
    #[arg(short, long)]
    config: Option<String>,

    /// Books JSON file
    #[arg(long)]
    books: Option<PathBuf>,

    /// Checkout history JSON file
    #[arg(long)]
    checkouts: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let mut config =
        AppConfig::load_from(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(books) = cli.books {
        config.storage.books_path = books;
    }
    if let Some(checkouts) = cli.checkouts {
        config.storage.checkouts_path = checkouts;
    }

    let _guard = init_tracing(&config.logging)?;

    tracing::info!("Starting book catalog v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        books = %config.storage.books_path.display(),
        checkouts = %config.storage.checkouts_path.display(),
        "Opening data files"
    );

    let state = AppState::open(config).context("Failed to open data files")?;

    let stdin = io::stdin();
    let mut repl = Repl::new(&state.services, stdin.lock(), io::stdout());
    repl.run()?;

    tracing::info!("Book catalog stopped");
    Ok(())
}

/// Logs go to the configured file, or stderr, so they stay out of the REPL's stdout
fn init_tracing(logging: &LoggingConfig) -> anyhow::Result<Option<WorkerGuard>> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("book_catalog={}", logging.level).into());

    let (writer, guard) = match &logging.file {
        Some(path) => {
            let file_name = path
                .file_name()
                .with_context(|| format!("Invalid log file path {}", path.display()))?;
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| std::path::Path::new("."));
            let appender = tracing_appender::rolling::never(dir, file_name);
            let (non_blocking, guard) = tracing_appender::non_blocking(appender);
            (BoxMakeWriter::new(non_blocking), Some(guard))
        }
        None => (BoxMakeWriter::new(io::stderr), None),
    };

    let registry = tracing_subscriber::registry().with(filter);
    if logging.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(writer))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(writer))
            .init();
    }

    Ok(guard)
}
