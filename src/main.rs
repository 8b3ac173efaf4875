use anyhow::Context;
use clap::Parser;
use scorer_etl::api::{self, AppState};
use scorer_etl::domain::ports::ConfigProvider;
use scorer_etl::utils::error::ErrorSeverity;
use scorer_etl::utils::{logger, validation::Validate};
use scorer_etl::{AnyStore, CliConfig, ScorerError, ScorerService, ServerSettings};
use tokio::io::BufReader;
use tokio::signal;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    let settings = match cli.resolve() {
        Ok(settings) => settings,
        Err(e) => exit_with(&e),
    };

    if settings.log_json {
        logger::init_json_logger(&settings.log_level);
    } else {
        logger::init_cli_logger(&settings.log_level);
    }

    tracing::info!("Starting scorer-etl server");
    tracing::debug!("Resolved settings: {:?}", settings);

    if let Err(e) = settings.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        exit_with(&e);
    }

    let store = match AnyStore::open(settings.database_path()) {
        Ok(store) => store,
        Err(e) => exit_with(&e),
    };
    tracing::info!("Using {} scorer store", store.backend_name());

    let service = ScorerService::from_config(store, &settings);
    let shutdown = CancellationToken::new();

    if let Some(seed) = &settings.seed_file {
        seed_from_file(&service, seed, &shutdown).await?;
    }

    serve(service, &settings, shutdown).await
}

async fn seed_from_file(
    service: &ScorerService<AnyStore>,
    path: &str,
    cancel: &CancellationToken,
) -> anyhow::Result<()> {
    tracing::info!("📁 Seeding scorers from {}", path);
    let file = tokio::fs::File::open(path)
        .await
        .with_context(|| format!("failed to open seed file {}", path))?;

    match service.ingest_stream(BufReader::new(file), cancel).await {
        Ok(summary) => {
            tracing::info!(
                "✅ Seeded {} scorers ({} lines skipped)",
                summary.persisted.len(),
                summary.skipped.len()
            );
            Ok(())
        }
        Err(e) => exit_with(&e),
    }
}

async fn serve(
    service: ScorerService<AnyStore>,
    settings: &ServerSettings,
    shutdown: CancellationToken,
) -> anyhow::Result<()> {
    let app = api::router(
        AppState::new(service, shutdown.clone()),
        settings.max_upload_bytes(),
    );

    let listener = tokio::net::TcpListener::bind(settings.bind_address())
        .await
        .with_context(|| format!("failed to bind {}", settings.bind_address()))?;
    tracing::info!("🚀 Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown))
        .await
        .context("server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM and cancels every in-flight request token.
async fn shutdown_signal(shutdown: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl+C, shutting down gracefully"),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down gracefully"),
    }

    shutdown.cancel();
}

fn exit_with(e: &ScorerError) -> ! {
    tracing::error!(
        "❌ {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

    let exit_code = match e.severity() {
        ErrorSeverity::Low | ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}
