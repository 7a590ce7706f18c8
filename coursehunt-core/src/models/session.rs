//! Authentication state shared by all portal-calling components.

use serde::{Deserialize, Serialize};

/// Opaque authentication state required by the portal for any request.
///
/// The contents are an implementation detail of the remote (a cookie
/// bundle today). The credential is replaced wholesale on refresh, never
/// mutated in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionCredential(String);

impl SessionCredential {
    /// Wraps the opaque credential string.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// The raw value, for attaching to outgoing requests.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Campus account credentials used to obtain a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Account username.
    pub username: String,
    /// Account password.
    pub password: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credential_is_transparent_in_json() {
        let cred = SessionCredential::new("route=abc; JSESSIONID=def");
        let json = serde_json::to_string(&cred).unwrap();
        assert_eq!(json, r#""route=abc; JSESSIONID=def""#);

        let back: SessionCredential = serde_json::from_str(&json).unwrap();
        assert_eq!(back.as_str(), "route=abc; JSESSIONID=def");
    }
}
