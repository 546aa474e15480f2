use crate::domain::ports::EventVerifier;
use crate::error::{MarketError, Result};
use chrono::Utc;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

/// Maximum age of a signed payload, in seconds.
pub const DEFAULT_TOLERANCE_SECS: i64 = 300;

/// Verifies `Stripe-Signature` headers.
///
/// The header has the form `t=<unix seconds>,v1=<hex>[,v1=<hex>...]`; each
/// `v1` is an HMAC-SHA256 of `"{t}.{payload}"` keyed with the endpoint
/// secret. Any matching `v1` within the tolerance window is accepted.
#[derive(Clone)]
pub struct StripeSignatureVerifier {
    secret: String,
    tolerance_secs: i64,
}

impl StripeSignatureVerifier {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            tolerance_secs: DEFAULT_TOLERANCE_SECS,
        }
    }

    /// Hex HMAC of a payload at a timestamp.
    pub fn compute_signature(&self, timestamp: i64, payload: &[u8]) -> Result<String> {
        let mut mac = HmacSha256::new_from_slice(self.secret.as_bytes())
            .map_err(|e| MarketError::Configuration(format!("invalid webhook secret: {e}")))?;
        mac.update(timestamp.to_string().as_bytes());
        mac.update(b".");
        mac.update(payload);
        Ok(hex::encode(mac.finalize().into_bytes()))
    }

    /// Builds a complete header value, as the provider would send it.
    pub fn sign(&self, timestamp: i64, payload: &[u8]) -> Result<String> {
        Ok(format!(
            "t={timestamp},v1={}",
            self.compute_signature(timestamp, payload)?
        ))
    }

    fn verify_at(&self, payload: &[u8], header: &str, now: i64) -> Result<()> {
        let mut timestamp = None;
        let mut candidates = Vec::new();
        for part in header.split(',') {
            match part.trim().split_once('=') {
                Some(("t", value)) => timestamp = value.parse::<i64>().ok(),
                Some(("v1", value)) => candidates.push(value),
                _ => {}
            }
        }

        let timestamp = timestamp
            .ok_or_else(|| MarketError::Signature("missing timestamp".to_string()))?;
        if candidates.is_empty() {
            return Err(MarketError::Signature("no v1 signature".to_string()));
        }
        // Only stale deliveries are rejected; a clock running behind the
        // provider's must not drop fresh ones.
        if timestamp < now - self.tolerance_secs {
            return Err(MarketError::Signature(
                "timestamp outside the tolerance zone".to_string(),
            ));
        }

        let expected = hex::decode(self.compute_signature(timestamp, payload)?)
            .map_err(|e| MarketError::Signature(e.to_string()))?;
        let matched = candidates.iter().any(|candidate| {
            hex::decode(candidate)
                .map(|actual| {
                    actual.len() == expected.len() && bool::from(actual.ct_eq(expected.as_slice()))
                })
                .unwrap_or(false)
        });

        if matched {
            Ok(())
        } else {
            Err(MarketError::Signature(
                "no signature matches the payload".to_string(),
            ))
        }
    }
}

impl EventVerifier for StripeSignatureVerifier {
    fn verify(&self, payload: &[u8], signature_header: &str) -> Result<()> {
        self.verify_at(payload, signature_header, Utc::now().timestamp())
    }
}
