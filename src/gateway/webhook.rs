use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::Sha256;
use subtle::ConstantTimeEq;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

/// Errors raised while authenticating or parsing a webhook delivery.
#[derive(Debug, Error)]
pub enum WebhookError {
    #[error("webhook signature invalid")]
    SignatureInvalid,
    #[error("webhook payload malformed: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Signed batch of events delivered by the gateway.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookBatch {
    pub events: Vec<WebhookEvent>,
}

/// One event inside a webhook batch.
///
/// `id` is the gateway's own event identifier and the idempotency key for
/// applying the event.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookEvent {
    pub id: String,
    pub resource_type: String,
    pub action: String,
    #[serde(default)]
    pub links: EventLinks,
}

/// Resource references carried by an event.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventLinks {
    pub mandate: Option<String>,
    pub payment: Option<String>,
    pub subscription: Option<String>,
}

/// Verify the gateway's HMAC-SHA256 signature over the raw request body.
///
/// The signature header carries the hex digest; comparison is constant time.
pub fn verify_signature(payload: &[u8], signature: &str, secret: &str) -> Result<(), WebhookError> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|_| WebhookError::SignatureInvalid)?;
    mac.update(payload);

    let expected = hex::encode(mac.finalize().into_bytes());

    if expected.as_bytes().ct_eq(signature.as_bytes()).into() {
        Ok(())
    } else {
        Err(WebhookError::SignatureInvalid)
    }
}

/// Parse a verified webhook body into its event batch.
pub fn parse_batch(payload: &[u8]) -> Result<WebhookBatch, WebhookError> {
    Ok(serde_json::from_slice(payload)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sign(payload: &[u8], secret: &str) -> String {
        let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).unwrap();
        mac.update(payload);
        hex::encode(mac.finalize().into_bytes())
    }

    #[test]
    fn accepts_a_valid_signature() {
        let payload = br#"{"events":[]}"#;
        let signature = sign(payload, "secret");

        assert!(verify_signature(payload, &signature, "secret").is_ok());
    }

    #[test]
    fn rejects_a_tampered_body() {
        let signature = sign(br#"{"events":[]}"#, "secret");

        let result = verify_signature(br#"{"events":[{}]}"#, &signature, "secret");
        assert!(matches!(result, Err(WebhookError::SignatureInvalid)));
    }

    #[test]
    fn rejects_the_wrong_secret() {
        let payload = br#"{"events":[]}"#;
        let signature = sign(payload, "other");

        let result = verify_signature(payload, &signature, "secret");
        assert!(matches!(result, Err(WebhookError::SignatureInvalid)));
    }

    #[test]
    fn parses_a_batch_with_links() {
        let payload = br#"{
            "events": [
                {
                    "id": "EV123",
                    "resource_type": "payments",
                    "action": "confirmed",
                    "links": {"payment": "PM123", "mandate": "MD123"}
                }
            ]
        }"#;

        let batch = parse_batch(payload).expect("expected batch to parse");
        assert_eq!(batch.events.len(), 1);
        assert_eq!(batch.events[0].id, "EV123");
        assert_eq!(batch.events[0].links.payment.as_deref(), Some("PM123"));
        assert!(batch.events[0].links.subscription.is_none());
    }
}
