// tests/integration/flow_tests.rs
use finguard_kyc::{
    core::{
        identity::{session::VerificationStep, types::DocumentType},
        services::verification::SubmissionOutcome,
    },
    presentation::Severity,
    utils::{config::Config, error::ClientError},
    Application,
};

use crate::common::{
    document_image, face_data, ocr_data, selfie_image, FakeBackend, RecordingPresenter, Reply, UiEvent,
};

fn application(backend: &FakeBackend) -> Application {
    Application::new(Config::with_base_url(&backend.base_url).unwrap()).unwrap()
}

#[actix_web::test]
async fn test_passport_document_advances_to_selfie_step() {
    let backend = FakeBackend::start(vec![("kyc/ocr", Reply::ok(ocr_data()))]).await;
    let app = application(&backend);
    let presenter = RecordingPresenter::new();
    let flow = app.verification_flow(presenter.clone());

    let outcome = flow
        .submit_document(document_image(), DocumentType::new("passport"))
        .await;

    assert!(matches!(outcome, SubmissionOutcome::Advanced(VerificationStep::SelfieCapture)));
    assert_eq!(flow.current_step(), VerificationStep::SelfieCapture);

    let ocr = flow.ocr_result().expect("OCR result stored");
    assert_eq!(ocr.document_type, "passport");
    assert_eq!(ocr.extracted_details["passport_number"].as_deref(), Some("K1234567"));
    assert_eq!(ocr.uploaded_file.as_deref(), Some("20240101_120000_id_123.jpg"));

    assert_eq!(presenter.loading_transitions(), vec![true, false]);
    assert_eq!(
        presenter.events(),
        vec![
            UiEvent::Loading(true),
            UiEvent::Loading(false),
            UiEvent::OcrRendered("passport".into()),
            UiEvent::Step(VerificationStep::SelfieCapture),
            UiEvent::Notification(Severity::Success, "Document processed successfully".into()),
        ]
    );

    let requests = backend.requests_to("kyc/ocr");
    assert_eq!(requests.len(), 1);
    let body = requests[0].body_text();
    assert!(requests[0].content_type.starts_with("multipart/form-data"));
    assert!(body.contains("name=\"document\"; filename=\"id_123.jpg\""));
    assert!(body.contains("name=\"document_type\""));
    assert!(body.contains("passport"));

    backend.stop().await;
}

#[actix_web::test]
async fn test_full_verification_reaches_result() {
    let backend = FakeBackend::start(vec![
        ("kyc/ocr", Reply::ok(ocr_data())),
        ("kyc/face-compare", Reply::ok(face_data(true))),
    ])
    .await;
    let app = application(&backend);
    let presenter = RecordingPresenter::new();
    let flow = app.verification_flow(presenter.clone());

    assert!(flow.submit_document(document_image(), "passport".into()).await.is_advanced());
    let outcome = flow.submit_selfie(selfie_image()).await;

    assert!(matches!(outcome, SubmissionOutcome::Advanced(VerificationStep::Result)));
    assert_eq!(flow.current_step(), VerificationStep::Result);

    let face = flow.face_comparison().expect("comparison stored");
    assert!(face.is_match());
    assert_eq!(face.feature_comparison.len(), 5);
    let files = face.files.as_ref().expect("stored file names");
    assert_eq!(files.document.as_deref(), Some("a.jpg"));
    assert_eq!(files.selfie.as_deref(), Some("b.png"));

    assert!(presenter.events().contains(&UiEvent::CombinedRendered {
        document_type: "passport".into(),
        is_match: true,
    }));
    assert_eq!(presenter.loading_transitions(), vec![true, false, true, false]);

    let compare = backend.requests_to("kyc/face-compare");
    assert_eq!(compare.len(), 1);
    let body = compare[0].body_text();
    assert!(body.contains("name=\"document_image\"; filename=\"id_123.jpg\""));
    assert!(body.contains("name=\"selfie_image\"; filename=\"selfie.png\""));

    assert_eq!(app.metrics().requests_total, 2);
    assert_eq!(app.metrics().requests_failed, 0);

    backend.stop().await;
}

#[actix_web::test]
async fn test_face_not_detected_keeps_selfie_step() {
    let backend = FakeBackend::start(vec![
        ("kyc/ocr", Reply::ok(ocr_data())),
        ("kyc/face-compare", Reply::refused(400, "face not detected")),
    ])
    .await;
    let app = application(&backend);
    let presenter = RecordingPresenter::new();
    let flow = app.verification_flow(presenter.clone());

    flow.submit_document(document_image(), "passport".into()).await;
    let outcome = flow.submit_selfie(selfie_image()).await;

    assert!(matches!(outcome, SubmissionOutcome::Failed(ClientError::Api(ref msg)) if msg == "face not detected"));
    assert_eq!(flow.current_step(), VerificationStep::SelfieCapture);
    assert!(flow.face_comparison().is_none());
    assert_eq!(
        presenter.notifications().last(),
        Some(&(Severity::Error, "face not detected".to_string()))
    );

    // The document is kept, so the user can retry the selfie.
    let retry = flow.submit_selfie(selfie_image()).await;
    assert!(matches!(retry, SubmissionOutcome::Failed(_)));
    assert_eq!(backend.requests_to("kyc/face-compare").len(), 2);

    backend.stop().await;
}

#[actix_web::test]
async fn test_selfie_before_document_makes_no_request() {
    let backend = FakeBackend::start(vec![("kyc/face-compare", Reply::ok(face_data(true)))]).await;
    let app = application(&backend);
    let presenter = RecordingPresenter::new();
    let flow = app.verification_flow(presenter.clone());

    let outcome = flow.submit_selfie(selfie_image()).await;

    assert!(matches!(outcome, SubmissionOutcome::Restarted(ClientError::MissingDocument)));
    assert_eq!(flow.current_step(), VerificationStep::DocumentUpload);
    assert!(backend.requests().is_empty());
    assert!(presenter.loading_transitions().is_empty());

    let notifications = presenter.notifications();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].0, Severity::Error);

    backend.stop().await;
}

#[actix_web::test]
async fn test_backend_outage_is_a_step_local_failure() {
    let backend = FakeBackend::start(vec![(
        "kyc/ocr",
        Reply::Text(502, "<html><body>502 Bad Gateway</body></html>".into()),
    )])
    .await;
    let app = application(&backend);
    let presenter = RecordingPresenter::new();
    let flow = app.verification_flow(presenter.clone());

    let outcome = flow.submit_document(document_image(), "auto".into()).await;

    match outcome {
        SubmissionOutcome::Failed(ClientError::Transport(msg)) => assert!(msg.contains("502")),
        other => panic!("unexpected outcome: {:?}", other),
    }
    assert_eq!(flow.current_step(), VerificationStep::DocumentUpload);
    assert!(flow.ocr_result().is_none());
    assert_eq!(presenter.loading_transitions(), vec![true, false]);
    assert_eq!(app.metrics().requests_failed, 1);

    backend.stop().await;
}

#[actix_web::test]
async fn test_unreachable_backend() {
    let config = Config::with_base_url("http://127.0.0.1:9/api").unwrap();
    let app = Application::new(config).unwrap();
    let presenter = RecordingPresenter::new();
    let flow = app.verification_flow(presenter.clone());

    let outcome = flow.submit_document(document_image(), "auto".into()).await;

    assert!(matches!(outcome, SubmissionOutcome::Failed(ClientError::Transport(_))));
    assert_eq!(flow.current_step(), VerificationStep::DocumentUpload);
    assert_eq!(presenter.notifications().len(), 1);
}

#[actix_web::test]
async fn test_restart_after_result_allows_new_attempt() {
    let backend = FakeBackend::start(vec![
        ("kyc/ocr", Reply::ok(ocr_data())),
        ("kyc/face-compare", Reply::ok(face_data(false))),
    ])
    .await;
    let app = application(&backend);
    let presenter = RecordingPresenter::new();
    let flow = app.verification_flow(presenter.clone());

    flow.submit_document(document_image(), "passport".into()).await;
    flow.submit_selfie(selfie_image()).await;
    assert_eq!(flow.current_step(), VerificationStep::Result);
    assert_eq!(
        presenter.notifications().last().map(|(severity, _)| *severity),
        Some(Severity::Warning)
    );

    flow.reset();
    assert_eq!(flow.current_step(), VerificationStep::DocumentUpload);
    assert!(flow.ocr_result().is_none());
    assert!(flow.face_comparison().is_none());
    assert!(!flow.has_document());

    let outcome = flow.submit_document(document_image(), "passport".into()).await;
    assert!(outcome.is_advanced());
    assert_eq!(backend.requests_to("kyc/ocr").len(), 2);

    backend.stop().await;
}
