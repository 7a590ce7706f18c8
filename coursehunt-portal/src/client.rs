//! HTTP client and response classification for the registration portal.

use std::time::Duration;

use coursehunt_core::{PortalError, SessionCredential};
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE, COOKIE, USER_AGENT};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

/// Registration host all catalog and claim endpoints live under.
pub(crate) const DEFAULT_BASE_URL: &str = "http://jw.hitsz.edu.cn";

/// The portal rejects requests without a browser User-Agent.
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36 Edg/131.0.0.0";

/// Client for the registration portal's catalog and claim endpoints.
///
/// Stateless with respect to authentication: the session credential is
/// attached explicitly to every request and never stored here, so a
/// wholesale credential replacement between attempts needs no client
/// rebuild.
#[derive(Debug, Clone)]
pub struct PortalClient {
    http: reqwest::Client,
    base_url: String,
}

impl PortalClient {
    /// Creates a client against the real portal with the given per-call
    /// timeout.
    pub fn new(timeout: Duration) -> Result<Self, PortalError> {
        Self::with_base_url(DEFAULT_BASE_URL, timeout)
    }

    /// Creates a client against a custom base URL (mock servers in tests).
    pub fn with_base_url(base_url: &str, timeout: Duration) -> Result<Self, PortalError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(PortalError::transport)?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn headers(session: &SessionCredential) -> Result<HeaderMap, PortalError> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
        headers.insert(
            COOKIE,
            HeaderValue::from_str(session.as_str()).map_err(PortalError::transport)?,
        );
        Ok(headers)
    }

    /// POSTs a form and classifies the response.
    pub(crate) async fn post_form<T: Serialize + ?Sized>(
        &self,
        path: &str,
        session: &SessionCredential,
        form: &T,
    ) -> Result<Value, PortalError> {
        let url = format!("{}{path}", self.base_url);
        debug!(%url, "portal form request");

        let response = self
            .http
            .post(&url)
            .headers(Self::headers(session)?)
            .form(form)
            .send()
            .await
            .map_err(PortalError::transport)?;

        Self::classify(response).await
    }

    /// POSTs a JSON body and classifies the response.
    pub(crate) async fn post_json<T: Serialize + ?Sized>(
        &self,
        path: &str,
        session: &SessionCredential,
        body: &T,
    ) -> Result<Value, PortalError> {
        let url = format!("{}{path}", self.base_url);
        debug!(%url, "portal json request");

        let response = self
            .http
            .post(&url)
            .headers(Self::headers(session)?)
            .json(body)
            .send()
            .await
            .map_err(PortalError::transport)?;

        Self::classify(response).await
    }

    /// The three-way classification every portal response goes through:
    /// JSON payload, login page standing in for data (expired session), or
    /// a transport failure.
    async fn classify(response: reqwest::Response) -> Result<Value, PortalError> {
        let status = response.status();
        if !status.is_success() {
            warn!(%status, "portal request failed");
            return Err(PortalError::Transport(format!("HTTP {status}")));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();

        if content_type.contains("application/json") {
            response.json::<Value>().await.map_err(PortalError::transport)
        } else if content_type.contains("text/html") {
            Err(PortalError::SessionExpired)
        } else {
            Err(PortalError::Transport(
                "response is not valid JSON".to_string(),
            ))
        }
    }
}

/// Turns an unexpectedly-shaped payload into a remote error, surfacing the
/// portal's own `message`/`msg` field verbatim when one is present.
pub(crate) fn remote_error(value: &Value) -> PortalError {
    value
        .get("message")
        .or_else(|| value.get("msg"))
        .and_then(Value::as_str)
        .map_or_else(
            || PortalError::Transport("unexpected response shape".to_string()),
            |message| PortalError::Remote(message.to_string()),
        )
}

// ============================================================================
// Tests
// ============================================================================
