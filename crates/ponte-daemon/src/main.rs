use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use ponte_core::engine::{CancelToken, Forwarder, RunObserver, RunSummary};
use ponte_core::{
    EngineError, MessageSource, PonteConfig, RocksDbStorage, SpoolSource, TelegramTransport,
    Transport,
};
use tracing::{info, warn};

fn load_config() -> PonteConfig {
    let paths = ["ponte.toml", "/etc/ponte/ponte.toml"];

    for path in &paths {
        if Path::new(path).exists() {
            match std::fs::read_to_string(path) {
                Ok(contents) => match toml::from_str(&contents) {
                    Ok(config) => {
                        info!(path, "loaded configuration");
                        return config;
                    }
                    Err(e) => {
                        eprintln!("error parsing {path}: {e}");
                        std::process::exit(1);
                    }
                },
                Err(e) => {
                    eprintln!("error reading {path}: {e}");
                    std::process::exit(1);
                }
            }
        }
    }

    info!("no config file found, using defaults");
    PonteConfig::default()
}

/// Observer for manual (SIGUSR1) runs. Progress lands in the log.
struct LogObserver;

impl RunObserver for LogObserver {
    fn on_progress(&self, current: usize, total: usize) {
        info!(current, total, "sending");
    }

    fn on_complete(&self, summary: &RunSummary) {
        info!(
            sent = summary.sent,
            failed = summary.failed,
            candidates = summary.total_candidates,
            cancelled = summary.cancelled,
            "manual run finished"
        );
    }
}

// Setup stays off the async runtime: the transport's blocking HTTP client
// must be built outside of it, and sends run on the worker OS thread.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    ponte_core::telemetry::init_tracing();

    let config = load_config();

    let data_dir = std::env::var("PONTE_DATA_DIR").unwrap_or_else(|_| "data".to_string());
    let storage = Arc::new(RocksDbStorage::open(&data_dir)?);

    let source: Arc<dyn MessageSource> = Arc::new(SpoolSource::new(config.spool.path.clone()));

    let transport: Option<Arc<dyn Transport>> = if config.telegram.is_configured() {
        Some(Arc::new(TelegramTransport::new(&config.telegram)?))
    } else {
        warn!("telegram destination not configured, forwarding is idle");
        None
    };

    let forwarder = Forwarder::new(config.forwarder.clone(), storage, source, transport)?;

    info!(
        spool = %config.spool.path.display(),
        check_interval_secs = config.forwarder.check_interval_secs,
        "ponted started"
    );

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    let live = runtime.block_on(run_loop(&forwarder, config.forwarder.check_interval_secs));

    info!("shutdown signal received");
    live.cancel();
    forwarder.shutdown()?;

    Ok(())
}

/// Drive the engine until a shutdown signal arrives. Returns the token of
/// the most recently triggered run so the caller can cancel it.
#[cfg(unix)]
async fn run_loop(forwarder: &Forwarder, check_interval_secs: u64) -> CancelToken {
    use tokio::signal::unix::{signal, SignalKind};

    let mut ticker = tokio::time::interval(Duration::from_secs(check_interval_secs));
    let mut manual = signal(SignalKind::user_defined1()).expect("install SIGUSR1 handler");
    let mut terminate = signal(SignalKind::terminate()).expect("install SIGTERM handler");

    // A fresh token per trigger; only the latest can still be in flight.
    let mut live = CancelToken::new();
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                live = CancelToken::new();
                if let Err(e) = forwarder.run_scheduled(live.clone()) {
                    warn!(error = %e, "failed to trigger scheduled run");
                }
            }
            _ = manual.recv() => {
                live = CancelToken::new();
                match forwarder.run_manual(live.clone(), Some(Arc::new(LogObserver))) {
                    Ok(_reply) => info!("manual run triggered"),
                    Err(EngineError::RunInProgress) => warn!("a run is already in progress"),
                    Err(e) => warn!(error = %e, "failed to trigger manual run"),
                }
            }
            _ = tokio::signal::ctrl_c() => break,
            _ = terminate.recv() => break,
        }
    }
    live
}

#[cfg(not(unix))]
async fn run_loop(forwarder: &Forwarder, check_interval_secs: u64) -> CancelToken {
    let mut ticker = tokio::time::interval(Duration::from_secs(check_interval_secs));

    let mut live = CancelToken::new();
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                live = CancelToken::new();
                if let Err(e) = forwarder.run_scheduled(live.clone()) {
                    warn!(error = %e, "failed to trigger scheduled run");
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }
    live
}
