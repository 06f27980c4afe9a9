pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::analysis::handlers as analysis;
use crate::assistant::handlers as assistant;
use crate::extraction::handlers as extraction;
use crate::session::handlers as session;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.config.max_upload_bytes;
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/assistant/status", get(assistant::handle_status))
        // Stateless pipeline
        .route("/api/v1/extract", post(extraction::handle_extract))
        .route("/api/v1/score", post(analysis::handle_score))
        // Sessions
        .route("/api/v1/sessions", post(session::handle_create_session))
        .route(
            "/api/v1/sessions/:id",
            get(session::handle_get_session).delete(session::handle_delete_session),
        )
        .route("/api/v1/sessions/:id/analyze", post(session::handle_analyze))
        .route("/api/v1/sessions/:id/report", get(session::handle_get_report))
        .route("/api/v1/sessions/:id/history", get(session::handle_get_history))
        .route(
            "/api/v1/sessions/:id/history/suggestions",
            post(session::handle_save_suggestions),
        )
        // Assistant
        .route(
            "/api/v1/sessions/:id/suggestions",
            post(assistant::handle_suggestions),
        )
        .route(
            "/api/v1/sessions/:id/suggestions/help",
            post(assistant::handle_suggestion_help),
        )
        .route("/api/v1/sessions/:id/advice", post(assistant::handle_advice))
        .route(
            "/api/v1/sessions/:id/chat",
            post(assistant::handle_chat)
                .get(session::handle_get_chat)
                .delete(session::handle_clear_chat),
        )
        .route("/api/v1/sessions/:id/enhance", post(assistant::handle_enhance))
        .route(
            "/api/v1/sessions/:id/cover-letter",
            post(assistant::handle_cover_letter),
        )
        .layer(DefaultBodyLimit::max(upload_limit))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::assistant::{Assistant, AssistantError, AssistantStatus, GenerationOptions};
    use crate::config::{AnalysisSettings, Config};
    use crate::extraction::build_docx;
    use crate::session::SessionStore;

    const BOUNDARY: &str = "dianelle-test-boundary";
    const JOB: &str = "Requirements:\n- Python and SQL in production\n- Docker, Kubernetes";

    /// Canned model backend: a fixed reply, or unreachable when `reply` is `None`.
    struct StubAssistant {
        reply: Option<String>,
    }

    #[async_trait]
    impl Assistant for StubAssistant {
        async fn complete(
            &self,
            _prompt: &str,
            _options: &GenerationOptions,
        ) -> Result<String, AssistantError> {
            self.reply
                .clone()
                .ok_or_else(|| AssistantError::Unreachable("stub offline".to_string()))
        }

        async fn status(&self) -> AssistantStatus {
            AssistantStatus {
                connected: self.reply.is_some(),
                model: "stub".to_string(),
                available_models: vec![],
            }
        }
    }

    fn app(reply: Option<&str>) -> Router {
        let config = Config {
            port: 0,
            rust_log: "debug".to_string(),
            ollama_url: "http://localhost:11434".to_string(),
            ollama_model: "llama3.2:3b".to_string(),
            assistant_timeout_secs: 1,
            scoring_weights: "35,25,20,15,5".to_string(),
            stopwords: None,
            keyword_limit: 20,
            max_upload_bytes: 1024 * 1024,
        };
        build_router(AppState {
            config,
            settings: AnalysisSettings::default(),
            assistant: Arc::new(StubAssistant {
                reply: reply.map(str::to_string),
            }),
            sessions: SessionStore::default(),
        })
    }

    fn cv_docx() -> Vec<u8> {
        let paragraphs = [
            "Jane Doe",
            "jane@example.com",
            "Summary",
            "Backend engineer building data products.",
            "Experience",
            "• Reduced query latency by 40% with Python and SQL",
            "• Led a team of 4 engineers",
            "Education",
            "BSc Computer Science",
            "Skills",
            "Python, SQL, Docker",
        ];
        let body: String = paragraphs
            .iter()
            .map(|p| format!("<w:p><w:r><w:t>{p}</w:t></w:r></w:p>"))
            .collect();
        build_docx(&format!("<w:document><w:body>{body}</w:body></w:document>"))
    }

    fn multipart(uri: &str, file_name: &str, file: &[u8], job_description: &str) -> Request<Body> {
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"job_description\"\r\n\r\n{job_description}\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(file);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

        Request::builder()
            .method("POST")
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = app.clone().oneshot(req).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, bytes.to_vec())
    }

    async fn send_json(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
        let (status, bytes) = send(app, req).await;
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    async fn analysed_session(app: &Router) -> String {
        let (status, created) =
            send_json(app, json_request("POST", "/api/v1/sessions", json!({}))).await;
        assert_eq!(status, StatusCode::CREATED);
        let id = created["id"].as_str().unwrap().to_string();

        let req = multipart(
            &format!("/api/v1/sessions/{id}/analyze"),
            "cv.docx",
            &cv_docx(),
            JOB,
        );
        let (status, report) = send_json(app, req).await;
        assert_eq!(status, StatusCode::OK, "{report}");
        id
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = send_json(&app(None), get("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_score_two_of_three_keywords() {
        let req = json_request(
            "POST",
            "/api/v1/score",
            json!({
                "cv_text": "Python, SQL, data analysis",
                "job_description": "Requirements: Python, SQL, machine learning"
            }),
        );
        let (status, body) = send_json(&app(None), req).await;
        assert_eq!(status, StatusCode::OK);
        let keyword_match = body["breakdown"]["keyword_match"].as_f64().unwrap();
        assert!((keyword_match - 66.67).abs() < 0.01);
    }

    #[tokio::test]
    async fn test_session_rejects_weights_not_summing_to_100() {
        let req = json_request(
            "POST",
            "/api/v1/sessions",
            json!({ "scoring_weights": {
                "keyword_match": 50, "structure": 25, "content_quality": 20,
                "technical_skills": 15, "ats_formatting": 5
            }}),
        );
        let (status, body) = send_json(&app(None), req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "INVALID_CONFIGURATION");
    }

    #[tokio::test]
    async fn test_analyze_records_history_and_renders_text_report() {
        let app = app(None);
        let id = analysed_session(&app).await;

        let (status, history) = send_json(&app, get(&format!("/api/v1/sessions/{id}/history"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(history["entries"].as_array().unwrap().len(), 1);
        assert_eq!(history["trend"]["count"], 1);

        let (status, text) = send(&app, get(&format!("/api/v1/sessions/{id}/report?format=text"))).await;
        assert_eq!(status, StatusCode::OK);
        assert!(String::from_utf8(text).unwrap().starts_with("CV ASSESSMENT REPORT"));
    }

    #[tokio::test]
    async fn test_unsupported_format_is_rejected() {
        let app = app(None);
        let (_, created) = send_json(&app, json_request("POST", "/api/v1/sessions", json!({}))).await;
        let id = created["id"].as_str().unwrap();
        let req = multipart(
            &format!("/api/v1/sessions/{id}/analyze"),
            "cv.txt",
            b"plain text cv",
            JOB,
        );
        let (status, body) = send_json(&app, req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "INVALID_CONFIGURATION");
    }

    #[tokio::test]
    async fn test_empty_upload_is_extraction_failure() {
        let req = multipart("/api/v1/extract", "cv.pdf", b"", JOB);
        let (status, body) = send_json(&app(None), req).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"]["code"], "EXTRACTION_FAILED");
    }

    #[tokio::test]
    async fn test_assistant_outage_keeps_report_and_history() {
        let app = app(None);
        let id = analysed_session(&app).await;
        let (_, before) = send_json(&app, get(&format!("/api/v1/sessions/{id}/report"))).await;

        let (status, body) = send_json(
            &app,
            json_request("POST", &format!("/api/v1/sessions/{id}/suggestions"), json!({})),
        )
        .await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["error"]["code"], "ASSISTANT_UNAVAILABLE");
        assert!(body["error"]["fallback"].is_string());

        let (status, chat) = send_json(
            &app,
            json_request("POST", &format!("/api/v1/sessions/{id}/chat"), json!({ "message": "Explain my score" })),
        )
        .await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert!(chat["error"]["fallback"].as_str().unwrap().contains("ATS score"));

        let (_, after) = send_json(&app, get(&format!("/api/v1/sessions/{id}/report"))).await;
        assert_eq!(before, after);
        let (_, history) = send_json(&app, get(&format!("/api/v1/sessions/{id}/history"))).await;
        assert_eq!(history["entries"].as_array().unwrap().len(), 1);
        let (_, transcript) = send_json(&app, get(&format!("/api/v1/sessions/{id}/chat"))).await;
        assert!(transcript.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_suggestions_and_chat_with_assistant() {
        let app = app(Some("SCORE: 70\nAREAS FOR IMPROVEMENT:\n- Add Kubernetes projects"));
        let id = analysed_session(&app).await;

        let (status, body) = send_json(
            &app,
            json_request("POST", &format!("/api/v1/sessions/{id}/suggestions"), json!({})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["score"], 70);
        assert_eq!(body["suggestions"][0]["priority"], "high");
        assert_eq!(body["suggestions"][0]["origin"], "assistant");

        let (status, body) = send_json(
            &app,
            json_request("POST", &format!("/api/v1/sessions/{id}/chat"), json!({ "quick_prompt": "keyword_help" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["transcript_len"], 2);

        let (_, transcript) = send_json(&app, get(&format!("/api/v1/sessions/{id}/chat"))).await;
        assert_eq!(transcript[0]["content"], "Help with keywords");
        assert_eq!(transcript[0]["role"], "user");
    }

    #[tokio::test]
    async fn test_enhance_uses_uploaded_section() {
        let app = app(Some("• Cut query latency 40% using Python and SQL"));
        let id = analysed_session(&app).await;
        let (status, body) = send_json(
            &app,
            json_request("POST", &format!("/api/v1/sessions/{id}/enhance"), json!({ "section": "skills" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["original"], "Python, SQL, Docker");
    }

    #[tokio::test]
    async fn test_session_rejects_oversized_weight() {
        let req = json_request(
            "POST",
            "/api/v1/sessions",
            json!({ "scoring_weights": {
                "keyword_match": u32::MAX, "structure": 101, "content_quality": 0,
                "technical_skills": 0, "ats_formatting": 0
            }}),
        );
        let (status, body) = send_json(&app(None), req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "INVALID_CONFIGURATION");
    }

    #[tokio::test]
    async fn test_report_carries_industry_benchmark() {
        let app = app(None);
        let id = analysed_session(&app).await;
        let (_, report) = send_json(&app, get(&format!("/api/v1/sessions/{id}/report"))).await;
        let benchmark = &report["summary"]["benchmark"];
        assert_eq!(benchmark["industry_average"], 65);
        assert_eq!(benchmark["top_quartile"], 80);
        assert_eq!(benchmark["top_decile"], 90);
        assert_eq!(benchmark["score"], report["breakdown"]["total"]);

        let (_, history) = send_json(&app, get(&format!("/api/v1/sessions/{id}/history"))).await;
        assert_eq!(history["trend"]["benchmark"], *benchmark);
    }

    #[tokio::test]
    async fn test_saved_suggestions_appear_in_history() {
        let app = app(None);
        let (_, created) = send_json(&app, json_request("POST", "/api/v1/sessions", json!({}))).await;
        let fresh = created["id"].as_str().unwrap().to_string();
        let suggestion = json!({
            "title": "Add Technical Skills",
            "text": "Include these technical skills if you have experience: kubernetes",
            "priority": "high",
            "category": "technical_skills",
            "origin": "rules"
        });

        let (status, _) = send_json(
            &app,
            json_request(
                "POST",
                &format!("/api/v1/sessions/{fresh}/history/suggestions"),
                json!({ "suggestions": [suggestion.clone()] }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let id = analysed_session(&app).await;
        let (_, history) = send_json(&app, get(&format!("/api/v1/sessions/{id}/history"))).await;
        assert!(history["saved_suggestions"].as_array().unwrap().is_empty());
        let entry_id = history["entries"][0]["id"].clone();

        let (status, body) = send_json(
            &app,
            json_request(
                "POST",
                &format!("/api/v1/sessions/{id}/history/suggestions"),
                json!({ "suggestions": [suggestion.clone()] }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["saved"], 1);
        assert_eq!(body["entry_id"], entry_id);

        let (_, history) = send_json(&app, get(&format!("/api/v1/sessions/{id}/history"))).await;
        assert_eq!(history["entries"].as_array().unwrap().len(), 1);
        assert_eq!(history["saved_suggestions"][0]["suggestion"], suggestion);
        assert_eq!(history["saved_suggestions"][0]["entry_id"], entry_id);
    }

    #[tokio::test]
    async fn test_suggestion_help_falls_back_by_category() {
        let app = app(None);
        let id = analysed_session(&app).await;
        let (status, body) = send_json(
            &app,
            json_request(
                "POST",
                &format!("/api/v1/sessions/{id}/suggestions/help"),
                json!({
                    "title": "Use Bullet Points",
                    "text": "Format your experience using bullet points",
                    "priority": "medium",
                    "category": "formatting",
                    "origin": "rules"
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert!(body["error"]["fallback"].as_str().unwrap().contains("ATS-friendly"));
    }

    #[tokio::test]
    async fn test_advice_joins_the_chat_transcript() {
        let app = app(Some("1. Add kubernetes to your skills"));
        let id = analysed_session(&app).await;
        let (status, body) = send_json(
            &app,
            json_request(
                "POST",
                &format!("/api/v1/sessions/{id}/advice"),
                json!({ "topic": "keyword_optimization" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["topic"], "keyword_optimization");
        assert_eq!(body["advice"]["content"], "1. Add kubernetes to your skills");
        assert_eq!(body["transcript_len"], 2);

        let (_, transcript) = send_json(&app, get(&format!("/api/v1/sessions/{id}/chat"))).await;
        assert_eq!(transcript[0]["content"], "Advice request: Keyword optimization");
    }

    #[tokio::test]
    async fn test_advice_outage_returns_canned_plan() {
        let app = app(None);
        let id = analysed_session(&app).await;
        let (status, body) = send_json(
            &app,
            json_request(
                "POST",
                &format!("/api/v1/sessions/{id}/advice"),
                json!({ "topic": "overall_strategy" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert!(body["error"]["fallback"].as_str().unwrap().starts_with("Priority action plan"));
        let (_, transcript) = send_json(&app, get(&format!("/api/v1/sessions/{id}/chat"))).await;
        assert!(transcript.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_deleted_session_is_gone() {
        let app = app(None);
        let id = analysed_session(&app).await;
        let req = Request::builder()
            .method("DELETE")
            .uri(format!("/api/v1/sessions/{id}"))
            .body(Body::empty())
            .unwrap();
        let (status, _) = send(&app, req).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, body) = send_json(&app, get(&format!("/api/v1/sessions/{id}/history"))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }
}
