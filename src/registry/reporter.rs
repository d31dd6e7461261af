//! Best-effort self-registration with a discovery service.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Bound on the full registration round trip, so an unresponsive
/// discovery service cannot block startup indefinitely.
const REPORT_TIMEOUT: Duration = Duration::from_secs(10);

/// Payload announcing this process's reachable address.
#[derive(Debug, Serialize)]
struct RegistrationRequest {
    endpoints: Vec<String>,
}

/// Discovery service reply; an empty `err` means the registration was
/// accepted.
#[derive(Debug, Default, Deserialize)]
struct RegistrationResponse {
    #[serde(default)]
    err: String,
}

/// Failure modes of a registration attempt.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("registration request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("registration rejected: {0}")]
    Rejected(String),
}

/// Announce `self_address` to the discovery service at `url`.
///
/// Fire-and-forget: exactly one POST, no retry. Any failure is logged
/// once and swallowed; the service keeps running either way.
pub async fn report(url: &str, self_address: &str, username: &str, password: &str) {
    if let Err(err) = try_report(url, self_address, username, password).await {
        tracing::error!(
            url,
            endpoint = self_address,
            error = %err,
            "failed to register endpoint"
        );
    }
}

/// Typed variant of [`report`] for callers that want to decide on a
/// failure policy themselves.
pub async fn try_report(
    url: &str,
    self_address: &str,
    username: &str,
    password: &str,
) -> Result<(), ReportError> {
    let client = reqwest::Client::builder().timeout(REPORT_TIMEOUT).build()?;

    let request = RegistrationRequest {
        endpoints: vec![self_address.to_string()],
    };

    // `json()` consumes the body, releasing the connection on every
    // exit path.
    let response: RegistrationResponse = client
        .post(url)
        .basic_auth(username, Some(password))
        .json(&request)
        .send()
        .await?
        .json()
        .await?;

    if !response.err.is_empty() {
        return Err(ReportError::Rejected(response.err));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_body_wire_format_is_exact() {
        let request = RegistrationRequest {
            endpoints: vec!["1.2.3.4:9000".to_string()],
        };
        assert_eq!(
            serde_json::to_string(&request).unwrap(),
            r#"{"endpoints":["1.2.3.4:9000"]}"#
        );
    }

    #[test]
    fn empty_err_field_means_success() {
        let response: RegistrationResponse = serde_json::from_str(r#"{"err":""}"#).unwrap();
        assert!(response.err.is_empty());
    }

    #[test]
    fn missing_err_field_defaults_to_success() {
        let response: RegistrationResponse = serde_json::from_str("{}").unwrap();
        assert!(response.err.is_empty());
    }

    #[test]
    fn rejection_message_is_preserved() {
        let response: RegistrationResponse =
            serde_json::from_str(r#"{"err":"already registered"}"#).unwrap();
        assert_eq!(response.err, "already registered");
    }
}
