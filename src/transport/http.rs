use std::time::Duration;

use tracing::debug;

use crate::constants::directory::LOOKUP_TIMEOUT_SECS;
use crate::constants::transport::USER_AGENT;
use crate::errors::ConvertError;

/// Build a blocking HTTP agent with the crate's timeout and user agent.
pub fn agent_with_timeout(timeout: Duration) -> ureq::Agent {
    ureq::Agent::config_builder()
        .timeout_global(Some(timeout))
        .build()
        .into()
}

/// Agent with the default lookup timeout.
pub fn default_agent() -> ureq::Agent {
    agent_with_timeout(Duration::from_secs(LOOKUP_TIMEOUT_SECS))
}

/// GET `url` and return the body as text.
///
/// Transport errors, non-2xx statuses, and unreadable bodies map to
/// `SourceUnavailable` tagged with `source_id`.
pub fn fetch_text(agent: &ureq::Agent, source_id: &str, url: &str) -> Result<String, ConvertError> {
    debug!("[cubostats:http] GET {url}");
    let response = agent
        .get(url)
        .header("User-Agent", USER_AGENT)
        .call()
        .map_err(|err| ConvertError::SourceUnavailable {
            source_id: source_id.to_string(),
            reason: format!("request to '{url}' failed: {err}"),
        })?;
    response
        .into_body()
        .read_to_string()
        .map_err(|err| ConvertError::SourceUnavailable {
            source_id: source_id.to_string(),
            reason: format!("failed reading response body from '{url}': {err}"),
        })
}

/// GET `url` and return the raw body bytes.
pub fn fetch_bytes(
    agent: &ureq::Agent,
    source_id: &str,
    url: &str,
) -> Result<Vec<u8>, ConvertError> {
    debug!("[cubostats:http] GET {url}");
    let response = agent
        .get(url)
        .header("User-Agent", USER_AGENT)
        .call()
        .map_err(|err| ConvertError::SourceUnavailable {
            source_id: source_id.to_string(),
            reason: format!("request to '{url}' failed: {err}"),
        })?;
    response
        .into_body()
        .read_to_vec()
        .map_err(|err| ConvertError::SourceUnavailable {
            source_id: source_id.to_string(),
            reason: format!("failed reading response body from '{url}': {err}"),
        })
}

/// True when `location` looks like an HTTP(S) URL rather than a path.
pub fn is_http_url(location: &str) -> bool {
    let lower = location.trim().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}


#[cfg(test)]
mod tests {
    use super::test_server::spawn_one_shot_http;
    use super::*;

    #[test]
    fn fetch_text_returns_body() {
        let (base, handle) = spawn_one_shot_http("200 OK", b"hello".to_vec());
        let body = fetch_text(&default_agent(), "test", &format!("{base}/greeting")).unwrap();
        assert_eq!(body, "hello");
        assert_eq!(handle.join().unwrap(), "GET /greeting HTTP/1.1");
    }

    #[test]
    fn non_success_status_is_source_unavailable() {
        let (base, handle) = spawn_one_shot_http("404 Not Found", b"missing".to_vec());
        let err = fetch_bytes(&default_agent(), "test", &base).unwrap_err();
        handle.join().unwrap();
        assert!(matches!(
            err,
            ConvertError::SourceUnavailable { ref source_id, .. } if source_id == "test"
        ));
    }

    #[test]
    fn recognizes_http_locations() {
        assert!(is_http_url("https://example.com/mapping.txt"));
        assert!(is_http_url("HTTP://example.com"));
        assert!(!is_http_url("cubostats_mapping.txt"));
        assert!(!is_http_url("/srv/http/mapping.txt"));
    }
}
