use axum::{
    extract::{
        multipart::MultipartRejection, rejection::JsonRejection, Multipart, Path, State,
    },
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::analysis::{build_request, AnalysisClient, AnalysisInput};
use crate::errors::AppError;
use crate::extract::{extract_text, ExtractedText, UploadedFile};
use crate::models::headline::HeadlineAnalysis;
use crate::models::suitability::JobSuitabilityAnalysis;
use crate::models::swot::SwotAnalysis;
use crate::panels::view::{HeadlineView, SuitabilityView, SwotView};
use crate::panels::PanelId;
use crate::state::AppState;

const EMPTY_HEADLINE: &str = "Please enter a headline to analyze.";
const EMPTY_SWOT_INPUT: &str = "Please enter some information to generate a SWOT analysis.";
const MISSING_RESUME_OR_JD: &str = "Please upload your resume and paste the job description.";
const MISSING_FILE: &str = "Please upload a PDF or DOCX file.";

#[derive(Deserialize)]
pub struct HeadlineRequest {
    #[serde(default)]
    pub headline: String,
    #[serde(default)]
    pub job_description: Option<String>,
}

#[derive(Deserialize)]
pub struct SwotRequest {
    #[serde(default)]
    pub user_info: String,
}

#[derive(Serialize)]
pub struct ExtractResponse {
    pub file_name: String,
    #[serde(flatten)]
    pub extracted: ExtractedText,
}

/// POST /api/v1/headline
pub async fn handle_headline(
    State(state): State<AppState>,
    payload: Result<Json<HeadlineRequest>, JsonRejection>,
) -> Result<Json<HeadlineView>, AppError> {
    let Json(req) = payload?;
    if req.headline.trim().is_empty() {
        return Err(AppError::Validation(EMPTY_HEADLINE.to_string()));
    }

    let run = state.panels.headline.begin()?;
    let request = build_request(AnalysisInput::Headline {
        headline: req.headline,
        job_description: req.job_description,
    });
    let outcome = state
        .analysis
        .analyze::<HeadlineAnalysis>(&request)
        .await
        .map(HeadlineView::from)
        .map_err(AppError::from);

    run.finish(outcome).map(Json)
}

/// POST /api/v1/swot
pub async fn handle_swot(
    State(state): State<AppState>,
    payload: Result<Json<SwotRequest>, JsonRejection>,
) -> Result<Json<SwotView>, AppError> {
    let Json(req) = payload?;
    if req.user_info.trim().is_empty() {
        return Err(AppError::Validation(EMPTY_SWOT_INPUT.to_string()));
    }

    let run = state.panels.swot.begin()?;
    let request = build_request(AnalysisInput::Swot {
        user_info: req.user_info,
    });
    let outcome = state
        .analysis
        .analyze::<SwotAnalysis>(&request)
        .await
        .map(SwotView::from)
        .map_err(AppError::from);

    run.finish(outcome).map(Json)
}

/// POST /api/v1/suitability (multipart: `file`, `job_description`)
pub async fn handle_suitability(
    State(state): State<AppState>,
    upload: Result<Multipart, MultipartRejection>,
) -> Result<Json<SuitabilityView>, AppError> {
    let form = read_upload_form(upload?).await?;
    let (file, job_description) = match (form.file, form.job_description) {
        (Some(file), jd) if !jd.trim().is_empty() => (file, jd),
        _ => return Err(AppError::Validation(MISSING_RESUME_OR_JD.to_string())),
    };

    let run = state.panels.suitability.begin()?;
    debug!(run_id = %run.run_id(), file_name = %file.file_name, "Extracting resume");
    let outcome = analyze_suitability(&state.analysis, &file, job_description).await;
    run.finish(outcome).map(Json)
}

/// Extraction first, then build + analyze. Any failure lands on the panel.
async fn analyze_suitability(
    client: &AnalysisClient,
    file: &UploadedFile,
    job_description: String,
) -> Result<SuitabilityView, AppError> {
    let extracted = extract_text(file).await?;
    let request = build_request(AnalysisInput::Suitability {
        resume_text: extracted.text,
        job_description,
    });
    let result = client.analyze::<JobSuitabilityAnalysis>(&request).await?;
    Ok(SuitabilityView::from(result))
}

/// POST /api/v1/extract (multipart: `file`)
/// Text preview of an upload. Touches no panel.
pub async fn handle_extract(
    upload: Result<Multipart, MultipartRejection>,
) -> Result<Json<ExtractResponse>, AppError> {
    let file = read_upload_form(upload?)
        .await?
        .file
        .ok_or_else(|| AppError::Validation(MISSING_FILE.to_string()))?;

    let extracted = extract_text(&file).await?;
    Ok(Json(ExtractResponse {
        file_name: file.file_name,
        extracted,
    }))
}

/// GET /api/v1/panels/:panel
pub async fn handle_get_panel(
    State(state): State<AppState>,
    Path(panel): Path<String>,
) -> Result<Response, AppError> {
    let response = match panel.parse::<PanelId>()? {
        PanelId::Headline => Json(state.panels.headline.snapshot()).into_response(),
        PanelId::Swot => Json(state.panels.swot.snapshot()).into_response(),
        PanelId::Suitability => Json(state.panels.suitability.snapshot()).into_response(),
    };
    Ok(response)
}

/// GET /api/v1/panels/:panel/report
/// Plain-text rendering of the panel's last successful result.
pub async fn handle_panel_report(
    State(state): State<AppState>,
    Path(panel): Path<String>,
) -> Result<String, AppError> {
    let id = panel.parse::<PanelId>()?;
    let report = match id {
        PanelId::Headline => state.panels.headline.last_success().map(|v| v.render_text()),
        PanelId::Swot => state.panels.swot.last_success().map(|v| v.render_text()),
        PanelId::Suitability => state
            .panels
            .suitability
            .last_success()
            .map(|v| v.render_text()),
    };

    report.ok_or_else(|| {
        AppError::NotFound(format!("No completed {} analysis yet", id.as_str()))
    })
}

#[derive(Default)]
struct UploadForm {
    file: Option<UploadedFile>,
    job_description: String,
}

/// Reads the `file` and `job_description` fields. An empty file part counts
/// as no file; unknown fields are skipped.
async fn read_upload_form(mut multipart: Multipart) -> Result<UploadForm, AppError> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let content_type = field.content_type().map(str::to_string);
                let bytes = field.bytes().await?;
                if !bytes.is_empty() {
                    form.file = Some(UploadedFile {
                        file_name,
                        content_type,
                        bytes,
                    });
                }
            }
            "job_description" => {
                form.job_description = field.text().await?;
            }
            other => debug!(field = other, "Ignoring unknown form field"),
        }
    }

    Ok(form)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use axum::response::Response;
    use axum::Router;
    use docx_rs::{Docx, Paragraph, Run};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::{EMPTY_HEADLINE, EMPTY_SWOT_INPUT, MISSING_RESUME_OR_JD};
    use crate::analysis::testing::StubBackend;
    use crate::analysis::AnalysisClient;
    use crate::config::Config;
    use crate::extract::DOCX_MIME;
    use crate::panels::{PanelStatus, Panels};
    use crate::routes::build_router;
    use crate::state::AppState;

    const BOUNDARY: &str = "career-optimizer-test-boundary";

    fn setup_test_app(backend: StubBackend) -> (Router, Arc<Panels>, Arc<StubBackend>) {
        let backend = Arc::new(backend);
        let panels = Arc::new(Panels::new());
        let state = AppState {
            analysis: AnalysisClient::new(backend.clone()),
            panels: panels.clone(),
            config: Config {
                api_key: "test-key".to_string(),
                gemini_base_url: "http://127.0.0.1:9".to_string(),
                port: 0,
                rust_log: "debug".to_string(),
                max_upload_bytes: 1024 * 1024,
            },
        };
        (build_router(state), panels, backend)
    }

    fn json_request(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    enum Part<'a> {
        Text(&'a str, &'a str),
        File {
            file_name: &'a str,
            content_type: &'a str,
            bytes: &'a [u8],
        },
    }

    fn multipart_request(uri: &str, parts: &[Part<'_>]) -> Request<Body> {
        let mut body = Vec::new();
        for part in parts {
            body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
            match part {
                Part::Text(name, value) => {
                    body.extend_from_slice(
                        format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n")
                            .as_bytes(),
                    );
                    body.extend_from_slice(value.as_bytes());
                }
                Part::File {
                    file_name,
                    content_type,
                    bytes,
                } => {
                    body.extend_from_slice(
                        format!(
                            "Content-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\n\
                             Content-Type: {content_type}\r\n\r\n"
                        )
                        .as_bytes(),
                    );
                    body.extend_from_slice(bytes);
                }
            }
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

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

    async fn read_json(response: Response) -> Value {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    async fn read_text(response: Response) -> String {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(body.to_vec()).unwrap()
    }

    fn resume_docx() -> Vec<u8> {
        let docx = Docx::new()
            .add_paragraph(Paragraph::new().add_run(Run::new().add_text("Jane Doe")))
            .add_paragraph(Paragraph::new().add_run(Run::new().add_text("Rust, Tokio, Axum")));
        let mut cursor = Cursor::new(Vec::new());
        docx.build().pack(&mut cursor).unwrap();
        cursor.into_inner()
    }

    fn headline_reply() -> String {
        json!({
            "quality": "Medium",
            "analysis": "Clear, but lacks cloud keywords.",
            "missingSkills": ["AWS"],
            "suggestions": ["Backend Engineer | AWS", "Rust Engineer", "Platform Engineer"]
        })
        .to_string()
    }

    #[tokio::test]
    async fn test_empty_headline_is_rejected_without_model_call() {
        let (app, panels, backend) = setup_test_app(StubBackend::replying(headline_reply()));

        let response = app
            .oneshot(json_request("/api/v1/headline", json!({"headline": "   "})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = read_json(response).await;
        assert_eq!(json["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(json["error"]["message"], EMPTY_HEADLINE);
        assert_eq!(backend.calls(), 0);
        assert_eq!(panels.headline.snapshot().status, PanelStatus::Idle);
    }

    #[tokio::test]
    async fn test_headline_success_updates_panel() {
        let (app, _, backend) = setup_test_app(StubBackend::replying(headline_reply()));

        let response = app
            .clone()
            .oneshot(json_request(
                "/api/v1/headline",
                json!({"headline": "Backend Engineer", "job_description": "AWS heavy role"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = read_json(response).await;
        assert_eq!(json["result"]["quality"], "Medium");
        assert_eq!(json["quality_accent"], "yellow");
        assert_eq!(json["result"]["missingSkills"], json!(["AWS"]));
        assert_eq!(backend.calls(), 1);

        let response = app.oneshot(get("/api/v1/panels/headline")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let snapshot = read_json(response).await;
        assert_eq!(snapshot["status"], "success");
        assert_eq!(snapshot["panel"], "headline");
        assert!(snapshot["run_id"].is_string());
    }

    #[tokio::test]
    async fn test_trigger_while_loading_is_conflict() {
        let (app, panels, backend) = setup_test_app(StubBackend::replying(headline_reply()));
        let _in_flight = panels.headline.begin().unwrap();

        let response = app
            .oneshot(json_request(
                "/api/v1/headline",
                json!({"headline": "Backend Engineer"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CONFLICT);
        assert_eq!(backend.calls(), 0);
        assert_eq!(panels.headline.snapshot().status, PanelStatus::Loading);
    }

    #[tokio::test]
    async fn test_swot_model_failure_sets_panel_error() {
        let (app, panels, _) = setup_test_app(StubBackend::failing(500, "upstream exploded"));

        let response = app
            .oneshot(json_request(
                "/api/v1/swot",
                json!({"user_info": "Proficient in React, want to lead teams"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let json = read_json(response).await;
        assert_eq!(json["error"]["code"], "ANALYSIS_FAILED");
        assert_eq!(
            json["error"]["message"],
            "Failed to generate SWOT analysis. Please try again."
        );

        let snapshot = panels.swot.snapshot();
        assert_eq!(snapshot.status, PanelStatus::Error);
        assert_eq!(
            snapshot.error.as_deref(),
            Some("Failed to generate SWOT analysis. Please try again.")
        );
    }

    #[tokio::test]
    async fn test_empty_swot_input_is_validation_error() {
        let (app, _, _) = setup_test_app(StubBackend::replying("{}"));

        let response = app
            .oneshot(json_request("/api/v1/swot", json!({})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(read_json(response).await["error"]["message"], EMPTY_SWOT_INPUT);
    }

    #[tokio::test]
    async fn test_suitability_requires_file_and_job_description() {
        let (app, panels, _) = setup_test_app(StubBackend::replying("{}"));

        let response = app
            .oneshot(multipart_request(
                "/api/v1/suitability",
                &[Part::Text("job_description", "Senior Rust role")],
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            read_json(response).await["error"]["message"],
            MISSING_RESUME_OR_JD
        );
        assert_eq!(panels.suitability.snapshot().status, PanelStatus::Idle);
    }

    #[tokio::test]
    async fn test_suitability_unsupported_file_fails_the_run() {
        let (app, panels, backend) = setup_test_app(StubBackend::replying("{}"));

        let response = app
            .oneshot(multipart_request(
                "/api/v1/suitability",
                &[
                    Part::File {
                        file_name: "resume.txt",
                        content_type: "text/plain",
                        bytes: b"Jane Doe, Rust",
                    },
                    Part::Text("job_description", "Senior Rust role"),
                ],
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
        let json = read_json(response).await;
        assert_eq!(
            json["error"]["message"],
            "Unsupported file type. Please upload a PDF or DOCX file."
        );
        assert_eq!(backend.calls(), 0);
        assert_eq!(panels.suitability.snapshot().status, PanelStatus::Error);
    }

    #[tokio::test]
    async fn test_suitability_docx_end_to_end() {
        let reply = json!({
            "suitabilityScore": 75,
            "summary": "Strong backend fit.",
            "matchingSkills": ["Rust", "Tokio"],
            "missingSkills": []
        });
        let (app, _, backend) = setup_test_app(StubBackend::replying(reply.to_string()));
        let docx = resume_docx();

        let response = app
            .clone()
            .oneshot(multipart_request(
                "/api/v1/suitability",
                &[
                    Part::File {
                        file_name: "resume.docx",
                        content_type: DOCX_MIME,
                        bytes: &docx,
                    },
                    Part::Text("job_description", "Rust and Tokio services"),
                ],
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = read_json(response).await;
        assert_eq!(json["band"], "high");
        assert_eq!(json["missing_placeholder"], "No critical missing skills identified.");

        let prompt = backend.last_prompt.lock().unwrap().clone().unwrap();
        assert!(prompt.contains("- Resume: \"Jane Doe\nRust, Tokio, Axum\""));

        let response = app
            .oneshot(get("/api/v1/panels/suitability/report"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let report = read_text(response).await;
        assert!(report.starts_with("Suitability: 75% (high)"));
    }

    #[tokio::test]
    async fn test_extract_returns_text_preview() {
        let (app, _, backend) = setup_test_app(StubBackend::replying("{}"));
        let docx = resume_docx();

        let response = app
            .oneshot(multipart_request(
                "/api/v1/extract",
                &[Part::File {
                    file_name: "cv.docx",
                    content_type: "application/octet-stream",
                    bytes: &docx,
                }],
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = read_json(response).await;
        assert_eq!(json["file_name"], "cv.docx");
        assert_eq!(json["kind"], "docx");
        assert_eq!(json["text"], "Jane Doe\nRust, Tokio, Axum");
        assert!(json["page_count"].is_null());
        assert_eq!(backend.calls(), 0);
    }

    #[tokio::test]
    async fn test_mistyped_json_field_is_json_validation_error() {
        let (app, panels, backend) = setup_test_app(StubBackend::replying(headline_reply()));

        let response = app
            .oneshot(json_request("/api/v1/headline", json!({"headline": 5})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/json"
        );
        let json = read_json(response).await;
        assert_eq!(json["error"]["code"], "VALIDATION_ERROR");
        let message = json["error"]["message"].as_str().unwrap();
        assert!(!message.contains("invalid type"));
        assert!(!message.contains('\n'));
        assert_eq!(backend.calls(), 0);
        assert_eq!(panels.headline.snapshot().status, PanelStatus::Idle);
    }

    #[tokio::test]
    async fn test_non_multipart_upload_is_json_validation_error() {
        let (app, panels, _) = setup_test_app(StubBackend::replying("{}"));

        let response = app
            .oneshot(json_request(
                "/api/v1/suitability",
                json!({"job_description": "Senior Rust role"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = read_json(response).await;
        assert_eq!(json["error"]["code"], "VALIDATION_ERROR");
        assert!(!json["error"]["message"]
            .as_str()
            .unwrap()
            .contains("boundary"));
        assert_eq!(panels.suitability.snapshot().status, PanelStatus::Idle);
    }

    #[tokio::test]
    async fn test_oversized_upload_is_payload_too_large() {
        let (app, _, _) = setup_test_app(StubBackend::replying("{}"));
        let oversized = vec![b'a'; 2 * 1024 * 1024];

        let response = app
            .oneshot(multipart_request(
                "/api/v1/extract",
                &[Part::File {
                    file_name: "resume.pdf",
                    content_type: "application/pdf",
                    bytes: &oversized,
                }],
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        let json = read_json(response).await;
        assert_eq!(json["error"]["code"], "PAYLOAD_TOO_LARGE");
        assert_eq!(json["error"]["message"], "The uploaded file is too large.");
    }

    #[tokio::test]
    async fn test_unknown_panel_and_missing_report_are_not_found() {
        let (app, _, _) = setup_test_app(StubBackend::replying("{}"));

        let response = app.clone().oneshot(get("/api/v1/panels/resume")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = app.oneshot(get("/api/v1/panels/swot/report")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(read_json(response).await["error"]["code"], "NOT_FOUND");
    }
}
