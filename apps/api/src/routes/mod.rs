pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::otpm::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        // Normalization
        .route("/api/v1/jobs/normalize", post(handlers::handle_normalize_job))
        .route(
            "/api/v1/resumes/normalize",
            post(handlers::handle_normalize_resume),
        )
        .route(
            "/api/v1/resumes/upload",
            post(handlers::handle_upload_resume).layer(DefaultBodyLimit::max(upload_limit)),
        )
        // Scoring
        .route("/api/v1/otpm/score", post(handlers::handle_score))
        .route("/api/v1/otpm/batch", post(handlers::handle_batch))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::config::Config;

    fn app() -> Router {
        build_router(AppState::new(Config::default()))
    }

    async fn post_json(uri: &str, body: Value) -> (StatusCode, Value) {
        let response = app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn multipart_body(boundary: &str, parts: &[(&str, Option<&str>, &[u8])]) -> Vec<u8> {
        let mut body = Vec::new();
        for (name, file_name, data) in parts {
            body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
            match file_name {
                Some(f) => body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{f}\"\r\n\r\n"
                    )
                    .as_bytes(),
                ),
                None => body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                ),
            }
            body.extend_from_slice(data);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());
        body
    }

    async fn upload(parts: &[(&str, Option<&str>, &[u8])]) -> (StatusCode, Value) {
        let boundary = "XBOUNDARYX";
        let response = app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/resumes/upload")
                    .header(
                        header::CONTENT_TYPE,
                        format!("multipart/form-data; boundary={boundary}"),
                    )
                    .body(Body::from(multipart_body(boundary, parts)))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_health() {
        let response = app()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_normalize_job_endpoint() {
        let (status, body) = post_json(
            "/api/v1/jobs/normalize",
            json!({
                "id": "li-42",
                "title": "Backend Engineer",
                "company": "Acme",
                "location": "Remote",
                "description": "We require 2-4 years experience with Python. No sponsorship available.",
                "url": "https://example.com/li-42",
                "source": "linkedin",
                "ignored_extra": true
            }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["job_id"], "li-42");
        assert_eq!(body["required_skills"], json!(["python"]));
        assert_eq!(body["experience_years"], 2.0);
        assert_eq!(body["visa_sponsorship"], "UNLIKELY");
    }

    #[tokio::test]
    async fn test_normalize_resume_endpoint_with_overrides() {
        let (status, body) = post_json(
            "/api/v1/resumes/normalize",
            json!({
                "text": "EXPERIENCE\n- Built Rust services for 3 years\n",
                "overrides": {"visa_status": "Visa Required", "role": "Backend"}
            }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["skills"], json!(["rust"]));
        assert_eq!(body["years_of_experience"], 3.0);
        assert_eq!(body["visa_status"], "Visa Required");
        assert_eq!(body["role_family"], "Backend");
        assert_eq!(body["experience_bullets"], json!(["- Built Rust services for 3 years"]));
    }

    #[tokio::test]
    async fn test_normalize_resume_rejects_empty_text() {
        let (status, body) = post_json("/api/v1/resumes/normalize", json!({"text": "   "})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_normalize_resume_malformed_override() {
        let (status, body) = post_json(
            "/api/v1/resumes/normalize",
            json!({"text": "python", "overrides": {"years_of_experience": "lots"}}),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "MALFORMED_OVERRIDE");
    }

    #[tokio::test]
    async fn test_score_endpoint() {
        let (status, body) = post_json(
            "/api/v1/otpm/score",
            json!({
                "job": {
                    "job_id": "j1",
                    "required_skills": [],
                    "experience_years": 0.0,
                    "visa_sponsorship": "UNCLEAR",
                    "keywords": []
                },
                "resume": {"skills": ["python"], "years_of_experience": 1.0}
            }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["score"]["probability"], 1.0);
        assert_eq!(body["score"]["recommendation"], "STRONG APPLY");
        assert_eq!(body["breakdown"]["entry_level"], 0.1);
    }

    #[tokio::test]
    async fn test_batch_endpoint() {
        let (status, body) = post_json(
            "/api/v1/otpm/batch",
            json!({
                "postings": [{
                    "id": "1",
                    "title": "Engineer",
                    "company": "Acme",
                    "location": "Remote",
                    "description": "5+ years Go and Kafka. H1B sponsor.",
                    "url": "https://example.com/1",
                    "source": "jobright",
                    "raw_data": {"posted_text": "Reposted 1 day ago"}
                }],
                "resume": {"skills": ["go"], "years_of_experience": 6.0, "visa_status": "Visa Required"}
            }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        // 0.5 + 0.2 + 0.1 (coverage 0.5) + 0.1 (sponsor)
        assert_eq!(body["jobs"][0]["score"]["probability"], 0.9);
        assert_eq!(body["rows"][0]["status"], "Repost");
        assert_eq!(body["summary"]["reposts"], 1);
    }

    #[tokio::test]
    async fn test_upload_text_resume_with_override_fields() {
        let (status, body) = upload(&[
            (
                "file",
                Some("resume.txt"),
                b"Education\n- B.S. Computer Science, 2020\n4+ years of Python".as_slice(),
            ),
            ("role", None, b"Data Engineer".as_slice()),
        ])
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["skills"], json!(["python"]));
        assert_eq!(body["years_of_experience"], 4.0);
        assert_eq!(body["role_family"], "Data Engineer");
        assert_eq!(body["education"][0], "- B.S. Computer Science, 2020");
    }

    #[tokio::test]
    async fn test_upload_unreadable_pdf_degrades_to_defaults() {
        let (status, body) = upload(&[("file", Some("cv.pdf"), b"not a pdf".as_slice())]).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["skills"], json!([]));
        assert_eq!(body["visa_status"], "US Citizen");
    }

    #[tokio::test]
    async fn test_upload_without_file_is_rejected() {
        let (status, _) = upload(&[("role", None, b"SRE".as_slice())]).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
