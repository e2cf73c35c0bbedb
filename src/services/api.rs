// src/services/api.rs

//! Scheduler backend API client.
//!
//! Thin wrappers over the backend's JSON-over-HTTPS contract. All endpoints
//! are POST; state-mutating calls additionally carry the CSRF token the
//! backend expects in an `X-CSRFToken` header next to the `csrftoken`
//! cookie.

use reqwest::Client;
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

use crate::error::{AppError, Result};
use crate::models::{ApiConfig, CourseSelection, Credentials, Schedule, SchedulePage};
use crate::utils::http::create_async_client;

const OFFERED_TERMS: &str = "/api/scheduler/offered_terms/";
const COURSE_TYPES: &str = "/api/scheduler/course_types/";
const COURSE_CODES: &str = "/api/scheduler/course_codes/";
const SECTION_NUMBERS: &str = "/api/scheduler/section_numbers/";
const CONFLICT_FREE_SCHEDULE: &str = "/api/scheduler/conflict_free_schedule/";
const EXPORT_EVENTS: &str = "/api/scheduler/export_events/";
const SUBMIT_SUGGESTION: &str = "/api/scheduler/submit_suggestion/";

/// Client for the scheduler backend.
pub struct SchedulerApi {
    client: Client,
    base_url: Url,
    credentials: Credentials,
}

#[derive(Serialize)]
struct TermsRequest {
    has_events: bool,
}

#[derive(Serialize)]
struct CourseTypesRequest<'a> {
    offered_term: &'a str,
    has_events: bool,
}

#[derive(Serialize)]
struct CourseCodesRequest<'a> {
    offered_term: &'a str,
    course_type: &'a str,
    has_events: bool,
}

#[derive(Serialize)]
struct SectionNumbersRequest<'a> {
    offered_term: &'a str,
    course_type: &'a str,
    course_code: &'a str,
    has_events: bool,
}

#[derive(Serialize)]
struct ScheduleRequest<'a> {
    courses: &'a [CourseSelection],
    offered_term: &'a str,
    offset: usize,
    limit: usize,
}

#[derive(Serialize)]
struct SuggestionRequest<'a> {
    suggestion: &'a str,
}

impl SchedulerApi {
    /// Create an API client from configuration.
    pub fn new(config: &ApiConfig) -> Result<Self> {
        Ok(Self {
            client: create_async_client(config)?,
            base_url: Url::parse(&config.base_url)?,
            credentials: config.credentials.clone(),
        })
    }

    /// Attach the session cookie and CSRF header when credentials are
    /// configured.
    fn with_credentials(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let mut request = request;
        let mut cookies = Vec::new();

        if let Some(session) = &self.credentials.session_id {
            cookies.push(format!("sessionid={session}"));
        }
        if let Some(csrf) = &self.credentials.csrf_token {
            cookies.push(format!("csrftoken={csrf}"));
            request = request.header("X-CSRFToken", csrf);
        }
        if !cookies.is_empty() {
            request = request.header(reqwest::header::COOKIE, cookies.join("; "));
        }
        request
    }

    /// POST a JSON body and decode a JSON response.
    async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let url = self.base_url.join(path)?;
        let request = self.with_credentials(self.client.post(url).json(body));
        let response = request.send().await?;

        let status = response.status();
        let text = response.text().await?;
        decode_payload(path, status.is_success(), status.as_u16(), &text)
    }

    /// Term labels the backend has schedules for.
    pub async fn offered_terms(&self, has_events: bool) -> Result<Vec<String>> {
        self.post_json(OFFERED_TERMS, &TermsRequest { has_events }).await
    }

    /// Subject codes offered in a term.
    pub async fn course_types(&self, offered_term: &str, has_events: bool) -> Result<Vec<String>> {
        self.post_json(
            COURSE_TYPES,
            &CourseTypesRequest {
                offered_term,
                has_events,
            },
        )
        .await
    }

    /// Catalog numbers for a subject in a term.
    pub async fn course_codes(
        &self,
        offered_term: &str,
        course_type: &str,
        has_events: bool,
    ) -> Result<Vec<String>> {
        self.post_json(
            COURSE_CODES,
            &CourseCodesRequest {
                offered_term,
                course_type,
                has_events,
            },
        )
        .await
    }

    /// Section numbers for a course in a term.
    pub async fn section_numbers(
        &self,
        offered_term: &str,
        course_type: &str,
        course_code: &str,
        has_events: bool,
    ) -> Result<Vec<String>> {
        self.post_json(
            SECTION_NUMBERS,
            &SectionNumbersRequest {
                offered_term,
                course_type,
                course_code,
                has_events,
            },
        )
        .await
    }

    /// One batch of the conflict-free schedule stream.
    pub async fn conflict_free_schedule(
        &self,
        courses: &[CourseSelection],
        offered_term: &str,
        offset: usize,
        limit: usize,
    ) -> Result<SchedulePage> {
        self.post_json(
            CONFLICT_FREE_SCHEDULE,
            &ScheduleRequest {
                courses,
                offered_term,
                offset,
                limit,
            },
        )
        .await
    }

    /// Download the `.ics` calendar export for one schedule.
    pub async fn export_events(&self, schedule: &Schedule) -> Result<Vec<u8>> {
        let url = self.base_url.join(EXPORT_EVENTS)?;
        let request = self.with_credentials(self.client.post(url).json(schedule));
        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(AppError::api(
                EXPORT_EVENTS,
                format!("HTTP {}: {}", status.as_u16(), truncate(&text)),
            ));
        }
        Ok(response.bytes().await?.to_vec())
    }

    /// Submit a free-text suggestion. Returns the server's message.
    pub async fn submit_suggestion(&self, suggestion: &str) -> Result<String> {
        #[derive(serde::Deserialize)]
        struct SuggestionResponse {
            message: String,
        }

        let response: SuggestionResponse = self
            .post_json(SUBMIT_SUGGESTION, &SuggestionRequest { suggestion })
            .await?;
        Ok(response.message)
    }
}

/// Decode a backend response body, mapping error payloads and non-2xx
/// statuses to `AppError::Api`.
fn decode_payload<T: DeserializeOwned>(
    path: &str,
    success: bool,
    status: u16,
    text: &str,
) -> Result<T> {
    if !success {
        return Err(AppError::api(
            path,
            format!("HTTP {status}: {}", truncate(text)),
        ));
    }

    let value: serde_json::Value = serde_json::from_str(text)
        .map_err(|e| AppError::api(path, format!("invalid JSON response: {e}")))?;

    if let Some(message) = value.get("error").and_then(|v| v.as_str()) {
        return Err(AppError::api(path, message));
    }

    serde_json::from_value(value)
        .map_err(|e| AppError::api(path, format!("unexpected response shape: {e}")))
}

/// Keep error bodies short enough for a log line.
fn truncate(text: &str) -> &str {
    let end = text
        .char_indices()
        .nth(200)
        .map(|(i, _)| i)
        .unwrap_or(text.len());
    text[..end].trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_success_list() {
        let terms: Vec<String> =
            decode_payload(OFFERED_TERMS, true, 200, r#"["Fall 2025", "Winter 2026"]"#).unwrap();
        assert_eq!(terms, vec!["Fall 2025", "Winter 2026"]);
    }

    #[test]
    fn test_decode_error_payload() {
        let result: Result<Vec<String>> =
            decode_payload(OFFERED_TERMS, true, 200, r#"{"error": "term required"}"#);
        let err = result.unwrap_err();
        assert!(matches!(err, AppError::Api { .. }));
        assert!(err.to_string().contains("term required"));
    }

    #[test]
    fn test_decode_http_failure() {
        let result: Result<Vec<String>> = decode_payload(OFFERED_TERMS, false, 502, "Bad Gateway");
        assert!(result.unwrap_err().to_string().contains("502"));
    }

    #[test]
    fn test_decode_schedule_page() {
        let body = r#"{
            "schedules": [{"CIS*1500*01": [{"days": "MWF", "times": "9:00AM-9:50AM"}]}],
            "has_more": true,
            "offset": 0,
            "limit": 100
        }"#;
        let page: SchedulePage = decode_payload(CONFLICT_FREE_SCHEDULE, true, 200, body).unwrap();
        assert_eq!(page.schedules.len(), 1);
        assert!(page.has_more);
        assert_eq!(page.limit, 100);
    }

    #[test]
    fn test_decode_invalid_json() {
        let result: Result<Vec<String>> = decode_payload(OFFERED_TERMS, true, 200, "<html>");
        assert!(result.is_err());
    }

    #[test]
    fn test_truncate_long_body() {
        let long = "x".repeat(500);
        assert_eq!(truncate(&long).len(), 200);
        assert_eq!(truncate("short"), "short");
    }
}
