//! Inbound adapters: the HTTP API and CSV seeding.

pub mod csv;
pub mod http;
