//! CAS single-sign-on login.
//!
//! The flow mirrors what a browser does on the identity server's login
//! page: fetch the form, read its hidden fields and encryption salt,
//! post the AES-encrypted password, and capture the session cookies the
//! registration host hands back through the service redirect.

use std::sync::Arc;
use std::time::Duration;

use coursehunt_core::{AuthError, Credentials, SessionCredential, SessionProvider};
use reqwest::cookie::{CookieStore, Jar};
use scraper::{Html, Selector};
use tracing::{debug, info};

use crate::crypto;

const LOGIN_URL: &str = "https://ids.hit.edu.cn/authserver/login";
const SERVICE_URL: &str = "http://jw.hitsz.edu.cn/casLogin";
const REGISTRATION_URL: &str = "http://jw.hitsz.edu.cn";

const FORM_SELECTOR: &str = "div#pwdLoginDiv";

/// Session provider backed by the campus CAS identity server.
#[derive(Debug, Clone)]
pub struct SsoLogin {
    login_url: String,
    service_url: String,
    registration_url: String,
    timeout: Duration,
}

impl SsoLogin {
    /// Creates a provider against the real identity server.
    pub fn new(timeout: Duration) -> Self {
        Self::with_urls(LOGIN_URL, SERVICE_URL, REGISTRATION_URL, timeout)
    }

    /// Creates a provider against custom URLs (mock servers in tests).
    pub fn with_urls(
        login_url: &str,
        service_url: &str,
        registration_url: &str,
        timeout: Duration,
    ) -> Self {
        Self {
            login_url: login_url.to_string(),
            service_url: service_url.to_string(),
            registration_url: registration_url.to_string(),
            timeout,
        }
    }
}

/// Hidden fields scraped off the password login form.
#[derive(Debug)]
struct LoginForm {
    event_id: String,
    cllt: String,
    dllt: String,
    lt: String,
    salt: String,
    execution: String,
}

fn selector(css: &str) -> Result<Selector, AuthError> {
    Selector::parse(css).map_err(|e| AuthError::Transport(format!("selector '{css}': {e}")))
}

fn scrape_login_form(page: &str) -> Result<LoginForm, AuthError> {
    let document = Html::parse_document(page);
    let form = document
        .select(&selector(FORM_SELECTOR)?)
        .next()
        .ok_or_else(|| AuthError::MarkupMissing(FORM_SELECTOR.to_string()))?;

    let field = |id: &str| -> Result<String, AuthError> {
        let css = format!("input#{id}");
        let node = form
            .select(&selector(&css)?)
            .next()
            .ok_or_else(|| AuthError::MarkupMissing(css.clone()))?;
        node.value()
            .attr("value")
            .map(ToString::to_string)
            .ok_or(AuthError::ValueMissing(css))
    };

    Ok(LoginForm {
        event_id: field("_eventId")?,
        cllt: field("cllt")?,
        dllt: field("dllt")?,
        lt: field("lt")?,
        salt: field("pwdEncryptSalt")?,
        execution: field("execution")?,
    })
}

impl SessionProvider for SsoLogin {
    async fn obtain(&self, credentials: &Credentials) -> Result<SessionCredential, AuthError> {
        let jar = Arc::new(Jar::default());
        let http = reqwest::Client::builder()
            .cookie_provider(Arc::clone(&jar))
            .timeout(self.timeout)
            .build()
            .map_err(AuthError::transport)?;

        debug!("fetching login form");
        let page = http
            .get(&self.login_url)
            .query(&[("service", self.service_url.as_str())])
            .send()
            .await
            .map_err(AuthError::transport)?
            .text()
            .await
            .map_err(AuthError::transport)?;

        let form = scrape_login_form(&page)?;
        let encrypted = crypto::encrypt_password(&credentials.password, &form.salt)?;

        debug!(username = %credentials.username, "posting login form");
        http.post(&self.login_url)
            .query(&[("service", self.service_url.as_str())])
            .form(&[
                ("username", credentials.username.as_str()),
                ("password", encrypted.as_str()),
                ("captcha", ""),
                ("_eventId", form.event_id.as_str()),
                ("cllt", form.cllt.as_str()),
                ("dllt", form.dllt.as_str()),
                ("lt", form.lt.as_str()),
                ("execution", form.execution.as_str()),
            ])
            .send()
            .await
            .map_err(AuthError::transport)?;

        // A granted login leaves the registration host's cookies in the
        // jar via the service redirect; their absence means rejection.
        let url = reqwest::Url::parse(&self.registration_url).map_err(AuthError::transport)?;
        let cookie = jar
            .cookies(&url)
            .and_then(|header| header.to_str().map(ToString::to_string).ok())
            .ok_or(AuthError::CredentialsRejected)?;

        if !cookie.contains("JSESSIONID=") || !cookie.contains("route=") {
            return Err(AuthError::CredentialsRejected);
        }

        info!("session credential obtained");
        Ok(SessionCredential::new(cookie))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_string_contains, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const FORM_PAGE: &str = r#"
        <html><body>
        <div id="pwdLoginDiv">
            <input id="_eventId" value="submit">
            <input id="cllt" value="userNameLogin">
            <input id="dllt" value="generalLogin">
            <input id="lt" value="">
            <input id="pwdEncryptSalt" value="aBcDeFgHjKmNpQrS">
            <input id="execution" value="e1s1">
        </div>
        </body></html>
    "#;

    fn credentials() -> Credentials {
        Credentials {
            username: "student".to_string(),
            password: "secret".to_string(),
        }
    }

    #[test]
    fn test_scrape_reads_all_fields() {
        let form = scrape_login_form(FORM_PAGE).unwrap();
        assert_eq!(form.event_id, "submit");
        assert_eq!(form.salt, "aBcDeFgHjKmNpQrS");
        assert_eq!(form.lt, "");
        assert_eq!(form.execution, "e1s1");
    }

    #[test]
    fn test_scrape_rejects_unknown_markup() {
        let err = scrape_login_form("<html><body>maintenance</body></html>").unwrap_err();
        assert!(matches!(err, AuthError::MarkupMissing(sel) if sel == FORM_SELECTOR));
    }

    #[test]
    fn test_scrape_rejects_missing_field() {
        let page = r#"<div id="pwdLoginDiv"><input id="_eventId" value="submit"></div>"#;
        let err = scrape_login_form(page).unwrap_err();
        assert!(matches!(err, AuthError::MarkupMissing(sel) if sel == "input#cllt"));
    }

    #[test]
    fn test_scrape_rejects_valueless_field() {
        let page = r#"
            <div id="pwdLoginDiv">
                <input id="_eventId">
            </div>
        "#;
        let err = scrape_login_form(page).unwrap_err();
        assert!(matches!(err, AuthError::ValueMissing(sel) if sel == "input#_eventId"));
    }

    #[tokio::test]
    async fn test_obtain_captures_session_cookies() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/authserver/login"))
            .and(query_param("service", "http://example.invalid/casLogin"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(FORM_PAGE, "text/html"))
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/authserver/login"))
            .and(body_string_contains("username=student"))
            .and(body_string_contains("captcha="))
            .respond_with(
                ResponseTemplate::new(200)
                    .append_header("Set-Cookie", "route=r1; Path=/")
                    .append_header("Set-Cookie", "JSESSIONID=j1; Path=/"),
            )
            .mount(&server)
            .await;

        let provider = SsoLogin::with_urls(
            &format!("{}/authserver/login", server.uri()),
            "http://example.invalid/casLogin",
            &server.uri(),
            Duration::from_secs(5),
        );

        let session = provider.obtain(&credentials()).await.unwrap();
        assert!(session.as_str().contains("route=r1"));
        assert!(session.as_str().contains("JSESSIONID=j1"));
    }

    #[tokio::test]
    async fn test_obtain_without_granted_cookies_is_rejected() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/authserver/login"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(FORM_PAGE, "text/html"))
            .mount(&server)
            .await;

        // The identity server answers but never grants the service cookies.
        Mock::given(method("POST"))
            .and(path("/authserver/login"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let provider = SsoLogin::with_urls(
            &format!("{}/authserver/login", server.uri()),
            "http://example.invalid/casLogin",
            &server.uri(),
            Duration::from_secs(5),
        );

        let err = provider.obtain(&credentials()).await.unwrap_err();
        assert!(matches!(err, AuthError::CredentialsRejected));
    }
}
