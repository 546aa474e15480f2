use booking_lifecycle::config::Config;
use booking_lifecycle::domain::ports::{EventVerifierRef, NotificationSinkRef, PaymentProviderRef};
use booking_lifecycle::infrastructure::Stores;
use booking_lifecycle::infrastructure::notifier::LogNotificationSink;
use booking_lifecycle::infrastructure::signature::StripeSignatureVerifier;
use booking_lifecycle::infrastructure::stripe::StripeClient;
use booking_lifecycle::interfaces::csv::profile_reader::seed_profiles;
use booking_lifecycle::interfaces::http::{self, AppState};
use clap::Parser;
use miette::{IntoDiagnostic, Result, WrapErr};
use std::fs::File;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let config = Config::parse();

    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let stores = open_stores(&config)?;

    let provider: Option<PaymentProviderRef> = match &config.stripe_secret_key {
        Some(key) => Some(Arc::new(
            StripeClient::new(key.clone(), config.stripe_api_base.clone()).into_diagnostic()?,
        )),
        None => {
            warn!("STRIPE_SECRET_KEY is not set, checkout is disabled");
            None
        }
    };
    let verifier: Option<EventVerifierRef> = match &config.stripe_webhook_secret {
        Some(secret) => Some(Arc::new(StripeSignatureVerifier::new(secret.clone()))),
        None => {
            warn!("STRIPE_WEBHOOK_SECRET is not set, webhooks will be rejected");
            None
        }
    };

    let admins = config.admin_policy();
    if admins.emails().is_empty() {
        warn!("ADMIN_EMAILS is empty, admin endpoints are unreachable");
    }
    let notifier: NotificationSinkRef = Arc::new(LogNotificationSink::new(admins.emails().to_vec()));

    let state = AppState::new(
        stores,
        provider,
        verifier,
        notifier,
        admins,
        config.settings().into_diagnostic()?,
    );

    if let Some(path) = &config.seed_profiles {
        let file = File::open(path)
            .into_diagnostic()
            .wrap_err_with(|| format!("Failed to open seed file {}", path.display()))?;
        let loaded = seed_profiles(&state.directory, file).await.into_diagnostic()?;
        info!(loaded, "Seeded profiles from {}", path.display());
    }

    let address = format!("0.0.0.0:{}", config.port);
    let listener = TcpListener::bind(&address)
        .await
        .into_diagnostic()
        .wrap_err_with(|| format!("Failed to bind {address}"))?;

    http::serve(listener, state).await.into_diagnostic()
}

#[cfg(feature = "storage-rocksdb")]
fn open_stores(config: &Config) -> Result<Stores> {
    use booking_lifecycle::infrastructure::rocksdb::RocksDBStore;

    match &config.db_path {
        Some(db_path) => {
            info!("Using RocksDB storage at {}", db_path.display());
            let store = RocksDBStore::open(db_path).into_diagnostic()?;
            Ok(Stores::rocksdb(store))
        }
        None => Ok(Stores::in_memory()),
    }
}

#[cfg(not(feature = "storage-rocksdb"))]
fn open_stores(config: &Config) -> Result<Stores> {
    if config.db_path.is_some() {
        warn!(
            "WARNING: Persistent storage requested via --db-path, but 'storage-rocksdb' feature is not enabled. Falling back to In-Memory storage."
        );
    }
    Ok(Stores::in_memory())
}
