use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::error;

type HmacSha256 = Hmac<Sha256>;

/// Requests older than this are treated as replays.
const MAX_REQUEST_AGE_SECS: u64 = 300;
const MAX_CLOCK_SKEW_SECS: u64 = 60;

/// Verifies Slack's `X-Slack-Signature` for a request body.
pub fn verify_slack_signature(
    request_body: &str,
    timestamp: &str,
    signature: &str,
    signing_secret: &str,
) -> bool {
    let Ok(ts) = timestamp.parse::<u64>() else {
        error!("Malformed X-Slack-Request-Timestamp: {}", timestamp);
        return false;
    };
    if let Ok(now) = SystemTime::now().duration_since(UNIX_EPOCH) {
        let now_secs = now.as_secs();
        if now_secs.saturating_sub(ts) > MAX_REQUEST_AGE_SECS || ts > now_secs + MAX_CLOCK_SKEW_SECS
        {
            error!("Timestamp out of range, potential replay attack");
            return false;
        }
    }

    let Some(received) = signature
        .strip_prefix("v0=")
        .and_then(|hex_sig| hex::decode(hex_sig).ok())
    else {
        error!("Malformed X-Slack-Signature header");
        return false;
    };

    let mut mac = match HmacSha256::new_from_slice(signing_secret.as_bytes()) {
        Ok(mac) => mac,
        Err(e) => {
            error!("Failed to create HMAC: {}", e);
            return false;
        }
    };
    mac.update(format!("v0:{timestamp}:{request_body}").as_bytes());

    if mac.verify_slice(&received).is_ok() {
        true
    } else {
        error!("Slack signature verification failed");
        false
    }
}

/// Computes the `v0=` signature Slack would send for `request_body`.
pub fn compute_signature(timestamp: &str, request_body: &str, signing_secret: &str) -> String {
    let base_string = format!("v0:{timestamp}:{request_body}");
    let mut mac = match HmacSha256::new_from_slice(signing_secret.as_bytes()) {
        Ok(mac) => mac,
        Err(e) => {
            error!("Failed to create HMAC: {}", e);
            return String::new();
        }
    };
    mac.update(base_string.as_bytes());
    format!("v0={}", hex::encode(mac.finalize().into_bytes()))
}
