//! Catalog discovery: term window, categories, course search, claimed
//! courses, and grades.

use chrono::{DateTime, Local, NaiveDateTime, Utc};
use coursehunt_core::{
    CatalogClient, Category, Course, Grade, PortalError, SessionCredential, TermWindow,
};
use serde::Deserialize;
use tracing::{debug, info};

use crate::client::{remote_error, PortalClient};

const TERM_WINDOW_ENDPOINT: &str = "/Xsxk/queryXkdqXnxq";
const CATEGORIES_ENDPOINT: &str = "/Xsxk/queryYxkc";
const SEARCH_ENDPOINT: &str = "/Xsxk/queryKxrw";
const CLAIMED_ENDPOINT: &str = "/Xsxk/queryYxkc";
const GRADES_ENDPOINT: &str = "/cjgl/grcjcx/grcjcx";

/// Method code the portal uses for the "already claimed" listing.
const CLAIMED_METHOD_CODE: &str = "yixuan";

/// Timestamp format of the portal's claim times.
const CLAIM_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// ============================================================================
// Reply shapes
// ============================================================================

/// The portal is inconsistent about numbers vs. strings in list payloads.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StrOrNum {
    Text(String),
    Number(serde_json::Number),
}

impl StrOrNum {
    fn into_string(self) -> String {
        match self {
            Self::Text(s) => s,
            Self::Number(n) => n.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct TermWindowReply {
    #[serde(rename = "p_xn")]
    academic_year: String,
    #[serde(rename = "p_xq")]
    term: String,
    #[serde(rename = "p_dqxn")]
    current_academic_year: String,
    #[serde(rename = "p_dqxq")]
    current_term: String,
}

#[derive(Debug, Deserialize)]
struct CategoriesReply {
    #[serde(rename = "xkgzszList")]
    list: Vec<CategoryEntry>,
}

#[derive(Debug, Deserialize)]
struct CategoryEntry {
    #[serde(rename = "xkfsdm")]
    code: String,
    #[serde(rename = "xkfsmc")]
    name: String,
}

#[derive(Debug, Deserialize)]
struct SearchReply {
    #[serde(rename = "kxrwList")]
    page: SearchPage,
}

#[derive(Debug, Deserialize)]
struct SearchPage {
    list: Vec<CourseEntry>,
}

#[derive(Debug, Deserialize)]
struct CourseEntry {
    id: String,
    #[serde(rename = "kcmc")]
    name: String,
    #[serde(rename = "tyxmmc", default)]
    sub_name: String,
    #[serde(rename = "kcxx", default)]
    info_html: String,
    #[serde(rename = "zrl")]
    capacity: StrOrNum,
    #[serde(rename = "yxzrs")]
    enrolled: StrOrNum,
}

#[derive(Debug, Deserialize)]
struct ClaimedReply {
    #[serde(rename = "yxkcList")]
    list: Vec<ClaimedEntry>,
}

#[derive(Debug, Deserialize)]
struct ClaimedEntry {
    id: String,
    #[serde(rename = "kcmc")]
    name: String,
    #[serde(rename = "tyxmmc", default)]
    sub_name: String,
    #[serde(rename = "kcxx", default)]
    info_html: String,
    #[serde(rename = "zrl")]
    capacity: StrOrNum,
    #[serde(rename = "yxzrs")]
    enrolled: StrOrNum,
    #[serde(rename = "xkfsdm")]
    claim_code: String,
    #[serde(rename = "xksj", default)]
    claimed_at: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GradesReply {
    content: GradesPage,
}

#[derive(Debug, Deserialize)]
struct GradesPage {
    list: Vec<GradeEntry>,
}

#[derive(Debug, Deserialize)]
struct GradeEntry {
    #[serde(rename = "kcmc")]
    course_name: String,
    #[serde(rename = "khfs", default)]
    course_type: Option<String>,
    #[serde(rename = "zzcj")]
    score: StrOrNum,
    #[serde(rename = "pm")]
    rank: StrOrNum,
    #[serde(rename = "zrs")]
    total_students: StrOrNum,
}

impl CourseEntry {
    fn into_course(self, claim_code: &str, window: &TermWindow) -> Course {
        Course {
            id: self.id,
            name: format!("{}{}", self.name.trim(), self.sub_name.trim()),
            info: flatten_html(&self.info_html),
            claim_code: claim_code.to_string(),
            academic_year: window.academic_year.clone(),
            term: window.term.clone(),
            capacity: self.capacity.into_string(),
            enrolled: self.enrolled.into_string(),
            claimed_at: None,
        }
    }
}

/// Flattens the portal's HTML course-info cell into plain text lines.
fn flatten_html(html: &str) -> String {
    let fragment = scraper::Html::parse_fragment(html);
    fragment
        .root_element()
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn parse_claim_time(raw: &str) -> Option<DateTime<Utc>> {
    let naive = NaiveDateTime::parse_from_str(raw, CLAIM_TIME_FORMAT).ok()?;
    naive
        .and_local_timezone(Local)
        .single()
        .map(|local| local.with_timezone(&Utc))
}

// ============================================================================
// CatalogClient implementation
// ============================================================================

impl CatalogClient for PortalClient {
    async fn term_window(
        &self,
        session: &SessionCredential,
    ) -> Result<TermWindow, PortalError> {
        let value = self
            .post_form(TERM_WINDOW_ENDPOINT, session, &[("mxpylx", "1")])
            .await?;

        let reply: TermWindowReply =
            serde_json::from_value(value.clone()).map_err(|_| remote_error(&value))?;
        info!(
            academic_year = %reply.academic_year,
            term = %reply.term,
            "registration window discovered"
        );
        Ok(TermWindow {
            academic_year: reply.academic_year,
            term: reply.term,
            current_academic_year: reply.current_academic_year,
            current_term: reply.current_term,
        })
    }

    async fn categories(
        &self,
        session: &SessionCredential,
        window: &TermWindow,
    ) -> Result<Vec<Category>, PortalError> {
        let form = [
            ("p_xn", window.academic_year.as_str()),
            ("p_xq", window.term.as_str()),
        ];
        let value = self.post_form(CATEGORIES_ENDPOINT, session, &form).await?;

        let reply: CategoriesReply =
            serde_json::from_value(value.clone()).map_err(|_| remote_error(&value))?;
        debug!(count = reply.list.len(), "categories listed");
        Ok(reply
            .list
            .into_iter()
            .map(|entry| Category {
                code: entry.code,
                name: entry.name,
            })
            .collect())
    }

    async fn search(
        &self,
        session: &SessionCredential,
        category: &Category,
        window: &TermWindow,
        keyword: &str,
    ) -> Result<Vec<Course>, PortalError> {
        let form = [
            ("p_pylx", "1"),
            ("p_gjz", keyword),
            ("p_xn", window.academic_year.as_str()),
            ("p_xq", window.term.as_str()),
            ("p_dqxn", window.current_academic_year.as_str()),
            ("p_dqxq", window.current_term.as_str()),
            ("p_xkfsdm", category.code.as_str()),
        ];
        let value = self.post_form(SEARCH_ENDPOINT, session, &form).await?;

        let reply: SearchReply =
            serde_json::from_value(value.clone()).map_err(|_| remote_error(&value))?;
        debug!(count = reply.page.list.len(), %keyword, "courses found");
        Ok(reply
            .page
            .list
            .into_iter()
            .map(|entry| entry.into_course(&category.code, window))
            .collect())
    }

    async fn claimed_courses(
        &self,
        session: &SessionCredential,
        window: &TermWindow,
    ) -> Result<Vec<Course>, PortalError> {
        let form = [
            ("p_pylx", "1"),
            ("p_xn", window.academic_year.as_str()),
            ("p_xq", window.term.as_str()),
            ("p_dqxn", window.current_academic_year.as_str()),
            ("p_dqxq", window.current_term.as_str()),
            ("p_xkfsdm", CLAIMED_METHOD_CODE),
        ];
        let value = self.post_form(CLAIMED_ENDPOINT, session, &form).await?;

        let reply: ClaimedReply =
            serde_json::from_value(value.clone()).map_err(|_| remote_error(&value))?;
        Ok(reply
            .list
            .into_iter()
            .map(|entry| Course {
                id: entry.id,
                name: format!("{}{}", entry.name.trim(), entry.sub_name.trim()),
                info: flatten_html(&entry.info_html),
                claim_code: entry.claim_code,
                academic_year: window.academic_year.clone(),
                term: window.term.clone(),
                capacity: entry.capacity.into_string(),
                enrolled: entry.enrolled.into_string(),
                claimed_at: entry.claimed_at.as_deref().and_then(parse_claim_time),
            })
            .collect())
    }

    async fn grades(&self, session: &SessionCredential) -> Result<Vec<Grade>, PortalError> {
        let body = serde_json::json!({
            "pylx": "1",
            "current": 1,
            "pageSize": 100,
        });
        let value = self.post_json(GRADES_ENDPOINT, session, &body).await?;

        let reply: GradesReply =
            serde_json::from_value(value.clone()).map_err(|_| remote_error(&value))?;
        Ok(reply
            .content
            .list
            .into_iter()
            .map(|entry| Grade {
                course_name: entry.course_name,
                course_type: entry.course_type,
                score: entry.score.into_string(),
                rank: entry.rank.into_string(),
                total_students: entry.total_students.into_string(),
            })
            .collect())
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

    fn window() -> TermWindow {
        TermWindow {
            academic_year: "2025-2026".to_string(),
            term: "1".to_string(),
            current_academic_year: "2025-2026".to_string(),
            current_term: "1".to_string(),
        }
    }

    async fn client(server: &MockServer) -> PortalClient {
        PortalClient::with_base_url(&server.uri(), Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_flatten_html_keeps_text_lines() {
        let html = "<div><p>Mon 8:30</p><span> Room T2 </span></div>";
        assert_eq!(flatten_html(html), "Mon 8:30\nRoom T2");
    }

    #[test]
    fn test_parse_claim_time() {
        assert!(parse_claim_time("2026-01-10 09:00:00").is_some());
        assert!(parse_claim_time("not a time").is_none());
    }

    #[tokio::test]
    async fn test_term_window_parses_reply() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(TERM_WINDOW_ENDPOINT))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                r#"{"p_xn":"2025-2026","p_xq":"2","p_dqxn":"2025-2026","p_dqxq":"1"}"#,
                "application/json",
            ))
            .mount(&server)
            .await;

        let window = client(&server).await.term_window(&session()).await.unwrap();
        assert_eq!(window.academic_year, "2025-2026");
        assert_eq!(window.term, "2");
        assert_eq!(window.current_term, "1");
    }

    #[tokio::test]
    async fn test_term_window_surfaces_remote_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(TERM_WINDOW_ENDPOINT))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                r#"{"message":"选课未开放"}"#,
                "application/json",
            ))
            .mount(&server)
            .await;

        let err = client(&server)
            .await
            .term_window(&session())
            .await
            .unwrap_err();
        assert!(matches!(err, PortalError::Remote(m) if m == "选课未开放"));
    }

    #[tokio::test]
    async fn test_categories_parse() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(CATEGORIES_ENDPOINT))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                r#"{"xkgzszList":[
                    {"xkfsdm":"bxxk","xkfsmc":"Required"},
                    {"xkfsdm":"xxxk","xkfsmc":"Elective"}
                ]}"#,
                "application/json",
            ))
            .mount(&server)
            .await;

        let categories = client(&server)
            .await
            .categories(&session(), &window())
            .await
            .unwrap();
        assert_eq!(categories.len(), 2);
        assert_eq!(categories[0].code, "bxxk");
        assert_eq!(categories[1].name, "Elective");
    }

    #[tokio::test]
    async fn test_search_builds_courses() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(SEARCH_ENDPOINT))
            .and(body_string_contains("p_gjz=algebra"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                r#"{"kxrwList":{"list":[{
                    "id":"1001",
                    "kcmc":"Linear Algebra ",
                    "tyxmmc":"",
                    "kcxx":"<p>Mon 8:30</p><p>Room T2</p>",
                    "zrl":120,
                    "yxzrs":"119"
                }]}}"#,
                "application/json",
            ))
            .mount(&server)
            .await;

        let category = Category {
            code: "bxxk".to_string(),
            name: "Required".to_string(),
        };
        let courses = client(&server)
            .await
            .search(&session(), &category, &window(), "algebra")
            .await
            .unwrap();

        assert_eq!(courses.len(), 1);
        let course = &courses[0];
        assert_eq!(course.id, "1001");
        assert_eq!(course.name, "Linear Algebra");
        assert_eq!(course.info, "Mon 8:30\nRoom T2");
        assert_eq!(course.claim_code, "bxxk");
        // Numeric and string capacities both normalize to strings.
        assert_eq!(course.capacity, "120");
        assert_eq!(course.enrolled, "119");
        assert!(course.claimed_at.is_none());
    }

    #[tokio::test]
    async fn test_claimed_courses_carry_claim_time() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(CLAIMED_ENDPOINT))
            .and(body_string_contains("p_xkfsdm=yixuan"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                r#"{"yxkcList":[{
                    "id":"1001",
                    "kcmc":"Linear Algebra",
                    "tyxmmc":"",
                    "kcxx":"<p>Mon 8:30</p>",
                    "xkfsdm":"bxxk",
                    "zrl":"120",
                    "yxzrs":"120",
                    "xksj":"2026-01-10 09:00:00"
                }]}"#,
                "application/json",
            ))
            .mount(&server)
            .await;

        let courses = client(&server)
            .await
            .claimed_courses(&session(), &window())
            .await
            .unwrap();
        assert_eq!(courses.len(), 1);
        assert!(courses[0].claimed_at.is_some());
        assert_eq!(courses[0].claim_code, "bxxk");
    }

    #[tokio::test]
    async fn test_grades_parse() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(GRADES_ENDPOINT))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                r#"{"content":{"list":[
                    {"kcmc":"Linear Algebra","khfs":"Exam","zzcj":92,"pm":"5","zrs":120},
                    {"kcmc":"PE","khfs":null,"zzcj":"A","pm":1,"zrs":"40"}
                ]}}"#,
                "application/json",
            ))
            .mount(&server)
            .await;

        let grades = client(&server).await.grades(&session()).await.unwrap();
        assert_eq!(grades.len(), 2);
        assert_eq!(grades[0].score, "92");
        assert_eq!(grades[0].standing(), "5/120");
        assert_eq!(grades[1].course_type, None);
        assert_eq!(grades[1].score, "A");
    }

    #[tokio::test]
    async fn test_grades_error_uses_msg_field() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(GRADES_ENDPOINT))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                r#"{"content":null,"msg":"no records"}"#,
                "application/json",
            ))
            .mount(&server)
            .await;

        let err = client(&server).await.grades(&session()).await.unwrap_err();
        assert!(matches!(err, PortalError::Remote(m) if m == "no records"));
    }
}
