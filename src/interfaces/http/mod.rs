//! The JSON API served over axum.
//!
//! Handlers are thin: they extract, call one application service and render.
//! All error rendering goes through `MarketError`'s `IntoResponse`.

pub mod admin;
pub mod error;
pub mod gate;
pub mod identity;
pub mod public;
pub mod webhook;

use crate::application::{
    AdminPolicy, BookingRequestTracker, CheckoutOrchestrator, PaymentWebhookHandler,
    ProfileDirectory, SessionTracker, WaitlistService,
};
use crate::domain::ports::{EventVerifierRef, NotificationSinkRef, PaymentProviderRef};
use crate::infrastructure::Stores;
use axum::http::{HeaderName, Method, header::CONTENT_TYPE};
use axum::routing::{get, post, put};
use axum::{Router, middleware};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::signal::ctrl_c;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

/// Process-wide settings the HTTP layer needs beyond the services.
#[derive(Debug, Clone)]
pub struct Settings {
    pub base_url: String,
    pub public_beta: bool,
    pub identity_header: HeaderName,
    pub eligible_university: String,
}

/// Everything a handler can reach. Built once at startup.
pub struct AppState {
    pub directory: ProfileDirectory,
    pub bookings: BookingRequestTracker,
    pub checkout: CheckoutOrchestrator,
    pub webhooks: PaymentWebhookHandler,
    pub sessions: SessionTracker,
    pub waitlist: WaitlistService,
    pub admins: AdminPolicy,
    pub identity_header: HeaderName,
    pub public_beta: bool,
}

impl AppState {
    /// Wires the services over a set of stores and adapters.
    ///
    /// `provider` and `verifier` are optional so the server can start without
    /// payment credentials; the operations that need them then fail with a
    /// configuration error.
    pub fn new(
        stores: Stores,
        provider: Option<PaymentProviderRef>,
        verifier: Option<EventVerifierRef>,
        notifier: NotificationSinkRef,
        admins: AdminPolicy,
        settings: Settings,
    ) -> Arc<Self> {
        let directory = ProfileDirectory::new(stores.profiles);
        Arc::new(Self {
            bookings: BookingRequestTracker::new(
                stores.booking_requests,
                directory.clone(),
                notifier.clone(),
            ),
            checkout: CheckoutOrchestrator::new(
                directory.clone(),
                provider.clone(),
                settings.base_url.clone(),
            ),
            webhooks: PaymentWebhookHandler::new(
                verifier,
                stores.sessions.clone(),
                directory.clone(),
                notifier,
                settings.base_url,
            ),
            sessions: SessionTracker::new(stores.sessions, directory.clone(), provider),
            waitlist: WaitlistService::new(stores.waitlist, settings.eligible_university),
            directory,
            admins,
            identity_header: settings.identity_header,
            public_beta: settings.public_beta,
        })
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    let api = Router::new()
        .route("/professionals", get(public::list_professionals))
        .route("/professionals/facets", get(public::professional_facets))
        .route("/professionals/{id}", get(public::get_professional))
        .route("/booking-requests", post(public::create_booking_request))
        .route(
            "/create-checkout-session",
            post(public::create_checkout_session),
        )
        .route("/sessions/{checkout_id}", get(public::get_session))
        .route("/webhooks/stripe", post(webhook::stripe_webhook))
        .route("/waitlist", post(public::join_waitlist))
        .route("/admin/check", get(admin::check))
        .route(
            "/admin/professionals",
            get(admin::list_profiles).post(admin::create_profile),
        )
        .route(
            "/admin/professionals/{id}",
            put(admin::update_profile).delete(admin::delete_profile),
        )
        .route("/admin/booking-requests", get(admin::list_booking_requests))
        .route(
            "/admin/booking-requests/{id}",
            put(admin::update_booking_request),
        )
        .route("/admin/sessions", get(admin::list_sessions))
        .route("/admin/sessions/{id}", put(admin::update_session))
        .route("/admin/waitlist", get(admin::list_waitlist));

    Router::new()
        .route("/health", get(public::health))
        .nest("/api", api)
        .fallback(public::not_found)
        .layer(middleware::from_fn_with_state(state.clone(), gate::beta_gate))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serves until Ctrl+C or SIGTERM, then drains in-flight requests.
pub async fn serve(listener: TcpListener, state: Arc<AppState>) -> std::io::Result<()> {
    let address = listener.local_addr()?;
    info!("Server running on {address}");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                error!(error = %e, "Failed to install Ctrl+C handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                error!(error = %e, "Failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
