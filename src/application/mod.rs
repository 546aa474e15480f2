//! Application layer: the lifecycle services.
//!
//! Each service owns the store handles it needs as `Arc<dyn ...>` ports and
//! is cheap to clone into request handlers. Services never talk to each
//! other's stores directly; profile access goes through [`ProfileDirectory`].

pub mod auth;
pub mod booking;
pub mod checkout;
pub mod directory;
pub mod sessions;
pub mod waitlist;
pub mod webhook;

pub use auth::AdminPolicy;
pub use booking::BookingRequestTracker;
pub use checkout::CheckoutOrchestrator;
pub use directory::ProfileDirectory;
pub use sessions::SessionTracker;
pub use waitlist::WaitlistService;
pub use webhook::{PaymentWebhookHandler, WebhookOutcome};
