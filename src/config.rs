use crate::application::AdminPolicy;
use crate::application::waitlist::DEFAULT_ELIGIBLE_UNIVERSITY;
use crate::error::{MarketError, Result};
use crate::infrastructure::stripe::DEFAULT_API_BASE;
use crate::interfaces::http::Settings;
use axum::http::HeaderName;
use clap::{ArgAction, Parser};
use std::path::PathBuf;

/// Booking and payment lifecycle service for an advice-session marketplace.
///
/// Every option can also be set through the environment (or a `.env` file).
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Port to listen on.
    #[arg(long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// Payment provider API key. Checkout and session lookup fail until set.
    #[arg(long, env = "STRIPE_SECRET_KEY", hide_env_values = true)]
    pub stripe_secret_key: Option<String>,

    /// Webhook signing secret. Webhook deliveries fail until set.
    #[arg(long, env = "STRIPE_WEBHOOK_SECRET", hide_env_values = true)]
    pub stripe_webhook_secret: Option<String>,

    /// Payment provider API base URL.
    #[arg(long, env = "STRIPE_API_BASE", default_value = DEFAULT_API_BASE)]
    pub stripe_api_base: String,

    /// Public URL of the site, used in checkout redirects and emails.
    #[arg(long, env = "PUBLIC_BASE_URL", default_value = "http://localhost:3000")]
    pub base_url: String,

    /// Comma-separated admin email allow-list.
    #[arg(long, env = "ADMIN_EMAILS", default_value = "")]
    pub admin_emails: String,

    /// Open the gated page namespaces to everyone. Only the exact value
    /// `true` opens them.
    #[arg(
        long,
        env = "PUBLIC_BETA",
        action = ArgAction::Set,
        num_args = 0..=1,
        default_value = "false",
        default_missing_value = "true",
        value_parser = exactly_true
    )]
    pub public_beta: bool,

    /// Request header carrying the authenticated caller's email.
    #[arg(long, env = "IDENTITY_HEADER", default_value = "x-authenticated-email")]
    pub identity_header: String,

    /// University whose students may join the waitlist.
    #[arg(long, env = "ELIGIBLE_UNIVERSITY", default_value = DEFAULT_ELIGIBLE_UNIVERSITY)]
    pub eligible_university: String,

    /// Path to persistent database (optional). Requires the `storage-rocksdb` feature.
    #[arg(long, env = "DB_PATH")]
    pub db_path: Option<PathBuf>,

    /// CSV file of profiles to load at startup.
    #[arg(long, env = "SEED_PROFILES")]
    pub seed_profiles: Option<PathBuf>,
}

impl Config {
    pub fn admin_policy(&self) -> AdminPolicy {
        AdminPolicy::from_csv(&self.admin_emails)
    }

    pub fn settings(&self) -> Result<Settings> {
        let identity_header = HeaderName::try_from(self.identity_header.trim()).map_err(|e| {
            MarketError::Configuration(format!(
                "invalid identity header {:?}: {e}",
                self.identity_header
            ))
        })?;
        Ok(Settings {
            base_url: self.base_url.clone(),
            public_beta: self.public_beta,
            identity_header,
            eligible_university: self.eligible_university.clone(),
        })
    }
}

fn exactly_true(value: &str) -> std::result::Result<bool, String> {
    Ok(value == "true")
}
