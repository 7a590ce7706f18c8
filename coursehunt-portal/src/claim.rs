//! Claim submission.

use coursehunt_core::{ClaimClient, Course, PortalError, SessionCredential};
use serde::Deserialize;
use tracing::{debug, info};

use crate::client::{remote_error, PortalClient};

const CLAIM_ENDPOINT: &str = "/Xsxk/addGouwuche";

/// Fixed submission-type code the portal expects with every claim.
const CLAIM_SUBMIT_TYPE: &str = "rwtjzyx";

/// The portal's literal success message for a claim.
const CLAIM_SUCCESS_MESSAGE: &str = "操作成功";

#[derive(Debug, Deserialize)]
struct ClaimReply {
    message: String,
}

impl ClaimClient for PortalClient {
    async fn claim(
        &self,
        session: &SessionCredential,
        course: &Course,
    ) -> Result<(), PortalError> {
        debug!(course = %course.name, "submitting claim");
        let form = [
            ("p_xktjz", CLAIM_SUBMIT_TYPE),
            ("p_xn", course.academic_year.as_str()),
            ("p_xq", course.term.as_str()),
            ("p_xkfsdm", course.claim_code.as_str()),
            ("p_id", course.id.as_str()),
        ];
        let value = self.post_form(CLAIM_ENDPOINT, session, &form).await?;

        let reply: ClaimReply =
            serde_json::from_value(value.clone()).map_err(|_| remote_error(&value))?;
        if reply.message == CLAIM_SUCCESS_MESSAGE {
            info!(course = %course.name, "claim accepted");
            Ok(())
        } else {
            Err(PortalError::Remote(reply.message))
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn session() -> SessionCredential {
        SessionCredential::new("route=r1; JSESSIONID=j1")
    }

    fn course() -> Course {
        Course {
            id: "1001".to_string(),
            name: "Linear Algebra".to_string(),
            info: String::new(),
            claim_code: "bxxk".to_string(),
            academic_year: "2025-2026".to_string(),
            term: "1".to_string(),
            capacity: "120".to_string(),
            enrolled: "119".to_string(),
            claimed_at: None,
        }
    }

    async fn client(server: &MockServer) -> PortalClient {
        PortalClient::with_base_url(&server.uri(), Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_success_message_claims_the_seat() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(CLAIM_ENDPOINT))
            .and(body_string_contains("p_id=1001"))
            .and(body_string_contains("p_xkfsdm=bxxk"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                r#"{"message":"操作成功"}"#,
                "application/json",
            ))
            .mount(&server)
            .await;

        client(&server)
            .await
            .claim(&session(), &course())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_other_message_is_rejection_with_reason() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(CLAIM_ENDPOINT))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                r#"{"message":"课容量已满"}"#,
                "application/json",
            ))
            .mount(&server)
            .await;

        let err = client(&server)
            .await
            .claim(&session(), &course())
            .await
            .unwrap_err();
        assert!(matches!(err, PortalError::Remote(m) if m == "课容量已满"));
    }

    #[tokio::test]
    async fn test_login_page_means_expired_session() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(CLAIM_ENDPOINT))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_raw("<html>sign in</html>", "text/html; charset=utf-8"),
            )
            .mount(&server)
            .await;

        let err = client(&server)
            .await
            .claim(&session(), &course())
            .await
            .unwrap_err();
        assert!(matches!(err, PortalError::SessionExpired));
    }
}
