// tests/common/mod.rs
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use actix_web::{
    dev::ServerHandle,
    http::StatusCode,
    web::{self, Bytes, Data},
    App, HttpRequest, HttpResponse, HttpServer,
};
use parking_lot::Mutex;
use serde_json::{json, Value};

use finguard_kyc::{
    core::identity::{
        session::VerificationStep,
        types::{FaceComparisonResult, ImageBlob, OcrResult},
    },
    presentation::{Presenter, Severity},
};

/// Canned reply for one route.
#[derive(Clone)]
pub enum Reply {
    Json(u16, Value),
    Text(u16, String),
}

impl Reply {
    pub fn ok(data: Value) -> Self {
        Reply::Json(200, json!({ "success": true, "data": data }))
    }

    pub fn refused(status: u16, error: &str) -> Self {
        Reply::Json(status, json!({ "success": false, "error": error }))
    }
}

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub path: String,
    pub query: String,
    pub content_type: String,
    pub body: Vec<u8>,
}

impl RecordedRequest {
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

#[derive(Default)]
struct BackendState {
    replies: HashMap<String, Reply>,
    requests: Mutex<Vec<RecordedRequest>>,
}

/// Local stand-in for the FinGuard backend, bound to an ephemeral port.
pub struct FakeBackend {
    pub base_url: String,
    state: Data<BackendState>,
    handle: ServerHandle,
}

impl FakeBackend {
    /// `routes` maps paths below `/api` (e.g. `kyc/ocr`) to replies. Unknown
    /// paths answer 404 with a plain-text body.
    pub async fn start(routes: Vec<(&str, Reply)>) -> Self {
        let state = Data::new(BackendState {
            replies: routes
                .into_iter()
                .map(|(path, reply)| (format!("/api/{}", path), reply))
                .collect(),
            requests: Mutex::new(Vec::new()),
        });

        let app_state = state.clone();
        let server = HttpServer::new(move || {
            App::new()
                .app_data(app_state.clone())
                .app_data(web::PayloadConfig::new(4 * 1024 * 1024))
                .default_service(web::to(respond))
        })
        .workers(1)
        .bind(("127.0.0.1", 0))
        .expect("bind fake backend");

        let addr = server.addrs()[0];
        let server = server.run();
        let handle = server.handle();
        actix_web::rt::spawn(server);

        Self {
            base_url: format!("http://{}/api", addr),
            state,
            handle,
        }
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().clone()
    }

    pub fn requests_to(&self, path: &str) -> Vec<RecordedRequest> {
        let full = format!("/api/{}", path);
        self.requests().into_iter().filter(|r| r.path == full).collect()
    }

    pub async fn stop(self) {
        self.handle.stop(true).await;
    }
}

async fn respond(req: HttpRequest, body: Bytes, state: Data<BackendState>) -> HttpResponse {
    let content_type = req
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();

    state.requests.lock().push(RecordedRequest {
        path: req.path().to_string(),
        query: req.query_string().to_string(),
        content_type,
        body: body.to_vec(),
    });

    match state.replies.get(req.path()) {
        Some(Reply::Json(status, value)) => {
            HttpResponse::build(StatusCode::from_u16(*status).unwrap()).json(value)
        }
        Some(Reply::Text(status, text)) => HttpResponse::build(StatusCode::from_u16(*status).unwrap())
            .content_type("text/html")
            .body(text.clone()),
        None => HttpResponse::NotFound().body("not found"),
    }
}

/// Everything the controller asked the presentation layer to do, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    Step(VerificationStep),
    Loading(bool),
    Notification(Severity, String),
    OcrRendered(String),
    CombinedRendered { document_type: String, is_match: bool },
}

#[derive(Default)]
pub struct RecordingPresenter {
    events: Mutex<Vec<UiEvent>>,
}

impl RecordingPresenter {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn events(&self) -> Vec<UiEvent> {
        self.events.lock().clone()
    }

    pub fn notifications(&self) -> Vec<(Severity, String)> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                UiEvent::Notification(severity, message) => Some((severity, message)),
                _ => None,
            })
            .collect()
    }

    pub fn loading_transitions(&self) -> Vec<bool> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                UiEvent::Loading(active) => Some(active),
                _ => None,
            })
            .collect()
    }
}

impl Presenter for RecordingPresenter {
    fn show_step(&self, step: VerificationStep) {
        self.events.lock().push(UiEvent::Step(step));
    }

    fn show_loading_indicator(&self, active: bool, _message: &str) {
        self.events.lock().push(UiEvent::Loading(active));
    }

    fn emit_notification(&self, message: &str, severity: Severity) {
        self.events.lock().push(UiEvent::Notification(severity, message.to_string()));
    }

    fn render_ocr_result(&self, data: &OcrResult) {
        self.events.lock().push(UiEvent::OcrRendered(data.document_type.clone()));
    }

    fn render_combined_result(&self, ocr: &OcrResult, face: &FaceComparisonResult) {
        self.events.lock().push(UiEvent::CombinedRendered {
            document_type: ocr.document_type.clone(),
            is_match: face.is_match(),
        });
    }
}

pub fn document_image() -> ImageBlob {
    ImageBlob::new("id_123.jpg", "image/jpeg", vec![0xff, 0xd8, 0xff, 0xe0, 0x00, 0x10])
}

pub fn selfie_image() -> ImageBlob {
    ImageBlob::new("selfie.png", "image/png", vec![0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a])
}

pub fn ocr_data() -> Value {
    json!({
        "document_type": "passport",
        "extracted_details": {
            "document_type": "PASSPORT",
            "passport_number": "K1234567",
            "name": "JANE DOE",
            "nationality": "INDIAN",
            "date_of_expiry": null
        },
        "raw_text": "REPUBLIC OF INDIA\nPASSPORT\nK1234567",
        "ocr_confidence": 84.3,
        "preprocessed_image": "uploads/20240101_120000_id_123_processed.jpg",
        "timestamp": "2024-01-01T12:00:00",
        "validation": { "is_valid": true, "issues": [], "confidence_level": "high" },
        "uploaded_file": "20240101_120000_id_123.jpg",
        "file_size": 6
    })
}

pub fn face_data(is_match: bool) -> Value {
    json!({
        "success": true,
        "comparison": {
            "similarity": 0.87,
            "similarity_percentage": 87.0,
            "is_match": is_match,
            "match_level": if is_match { "STRONG_MATCH" } else { "MISMATCH" },
            "confidence": if is_match { 95 } else { 30 }
        },
        "face1_info": { "num_faces": 1, "estimated_age": 31, "image_quality": 72.5 },
        "face2_info": { "num_faces": 1, "estimated_age": 33, "image_quality": 80.1 },
        "age_analysis": { "age_gap": 2, "significant_gap": false, "threshold_adjusted": false },
        "feature_comparison": {
            "eye_region": { "similarity": 91.2, "match": true },
            "nose_region": { "similarity": 88.0, "match": true },
            "mouth_region": { "similarity": 79.5, "match": true },
            "face_shape": { "similarity": 84.1, "match": true },
            "overall_structure": { "similarity": 86.7, "match": true }
        },
        "verification": {
            "verdict": if is_match { "PERFECT MATCH" } else { "MISMATCH" },
            "message": "All facial features align perfectly",
            "recommendation": "AUTO-APPROVE - Definite same person"
        },
        "warnings": [],
        "timestamp": "2024-01-01T12:00:05",
        "files": { "document": "a.jpg", "selfie": "b.png", "comparison": null }
    })
}
