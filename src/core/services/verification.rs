// src/core/services/verification.rs
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{info, warn, error};
use uuid::Uuid;

use crate::{
    api::verification::VerificationApi,
    core::identity::{
        session::{Ticket, VerificationSession, VerificationStep},
        types::{DocumentType, FaceComparisonResult, ImageBlob, OcrResult},
    },
    presentation::{Presenter, Severity},
    utils::error::ClientError,
};

/// What a submission did to the session.
#[derive(Debug)]
pub enum SubmissionOutcome {
    /// Remote call succeeded; the session moved to this step.
    Advanced(VerificationStep),
    /// Guard or remote call failed; the session is unchanged.
    Failed(ClientError),
    /// The session was unusable and was sent back to step 1.
    Restarted(ClientError),
    /// Another submission for this session is still outstanding.
    Busy,
    /// The session was reset while the call was in flight; result dropped.
    Discarded,
}

impl SubmissionOutcome {
    pub fn is_advanced(&self) -> bool {
        matches!(self, SubmissionOutcome::Advanced(_))
    }
}

/// Drives the three-step KYC wizard: document → OCR → selfie → face
/// comparison → combined result.
///
/// The session lock is never held across an await or while calling the
/// presenter, so presenters may read the controller's accessors freely.
pub struct VerificationFlowController {
    api: Arc<dyn VerificationApi>,
    presenter: Arc<dyn Presenter>,
    session: Mutex<VerificationSession>,
    max_image_bytes: usize,
}

impl VerificationFlowController {
    pub fn new(api: Arc<dyn VerificationApi>, presenter: Arc<dyn Presenter>, max_image_bytes: usize) -> Self {
        Self {
            api,
            presenter,
            session: Mutex::new(VerificationSession::new()),
            max_image_bytes,
        }
    }

    pub fn current_step(&self) -> VerificationStep {
        self.session.lock().step()
    }

    pub fn session_id(&self) -> Uuid {
        self.session.lock().id()
    }

    pub fn ocr_result(&self) -> Option<OcrResult> {
        self.session.lock().ocr_result().cloned()
    }

    pub fn face_comparison(&self) -> Option<FaceComparisonResult> {
        self.session.lock().face_comparison().cloned()
    }

    pub fn has_document(&self) -> bool {
        self.session.lock().document_image().is_some()
    }

    pub fn is_busy(&self) -> bool {
        self.session.lock().is_busy()
    }

    pub fn snapshot(&self) -> VerificationSession {
        self.session.lock().clone()
    }

    pub async fn submit_document(&self, image: ImageBlob, document_type: DocumentType) -> SubmissionOutcome {
        let (session_id, claimed) = {
            let mut session = self.session.lock();
            let claimed = session.begin(VerificationStep::DocumentUpload).and_then(|ticket| {
                if let Err(e) = image.validate(self.max_image_bytes) {
                    session.abandon(&ticket);
                    return Err(e);
                }
                Ok(ticket)
            });
            (session.id(), claimed)
        };

        let ticket = match claimed {
            Ok(ticket) => ticket,
            Err(ClientError::Busy) => {
                warn!(session = %session_id, "Document submitted while a request is outstanding");
                return SubmissionOutcome::Busy;
            }
            Err(e) => return self.fail(e),
        };

        info!(
            session = %session_id,
            document = %image.fingerprint(),
            document_type = %document_type,
            "Requesting OCR"
        );

        let pending = PendingRequest::new(self, ticket, "Extracting document details...");
        let result = self.api.extract_document(&image, &document_type).await;

        let applied = {
            let mut session = self.session.lock();
            if !pending.settle(&mut session) {
                None
            } else {
                Some(result.map(|ocr| {
                    session.complete_document(image, ocr.clone());
                    ocr
                }))
            }
        };

        let outcome = match applied {
            None => {
                info!(session = %session_id, "Session reset during OCR; discarding response");
                return SubmissionOutcome::Discarded;
            }
            Some(outcome) => outcome,
        };

        self.presenter.show_loading_indicator(false, "");
        match outcome {
            Ok(ocr) => {
                info!(
                    session = %session_id,
                    document_type = %ocr.document_type,
                    confidence = ocr.ocr_confidence,
                    "OCR complete"
                );
                self.presenter.render_ocr_result(&ocr);
                self.presenter.show_step(VerificationStep::SelfieCapture);
                self.presenter
                    .emit_notification("Document processed successfully", Severity::Success);
                SubmissionOutcome::Advanced(VerificationStep::SelfieCapture)
            }
            Err(e) => self.fail(e),
        }
    }

    pub async fn submit_selfie(&self, image: ImageBlob) -> SubmissionOutcome {
        let (session_id, claimed) = {
            let mut session = self.session.lock();
            let claimed = match session.begin(VerificationStep::SelfieCapture) {
                Err(ClientError::InvalidTransition(VerificationStep::DocumentUpload)) => {
                    Err(ClientError::MissingDocument)
                }
                Err(e) => Err(e),
                Ok(ticket) => {
                    let checked = match session.document_image().cloned() {
                        Some(document) if session.has_document() => {
                            image.validate(self.max_image_bytes).map(|_| document)
                        }
                        _ => Err(ClientError::MissingDocument),
                    };
                    match checked {
                        Ok(document) => {
                            session.attach_selfie(image.clone());
                            Ok((ticket, document))
                        }
                        Err(e) => {
                            session.abandon(&ticket);
                            Err(e)
                        }
                    }
                }
            };

            if matches!(claimed, Err(ClientError::MissingDocument)) {
                error!(session = %session.id(), "Selfie submitted without a document image; restarting");
                session.reset();
            }
            (session.id(), claimed)
        };

        let (ticket, document) = match claimed {
            Ok(claimed) => claimed,
            Err(ClientError::Busy) => {
                warn!(session = %session_id, "Selfie submitted while a request is outstanding");
                return SubmissionOutcome::Busy;
            }
            Err(ClientError::MissingDocument) => return self.restart(ClientError::MissingDocument),
            Err(e) => return self.fail(e),
        };

        info!(
            session = %session_id,
            document = %document.fingerprint(),
            selfie = %image.fingerprint(),
            "Requesting face comparison"
        );

        let pending = PendingRequest::new(self, ticket, "Comparing faces...");
        let result = self.api.compare_faces(&document, &image).await;

        let applied = {
            let mut session = self.session.lock();
            if !pending.settle(&mut session) {
                None
            } else {
                match result {
                    Ok(face) => {
                        session.complete_face_comparison(face.clone());
                        session.ocr_result().cloned().map(|ocr| Ok((ocr, face)))
                    }
                    Err(e) => {
                        session.release_selfie();
                        Some(Err(e))
                    }
                }
            }
        };

        let outcome = match applied {
            None => {
                info!(session = %session_id, "Session reset during face comparison; discarding response");
                return SubmissionOutcome::Discarded;
            }
            Some(outcome) => outcome,
        };

        self.presenter.show_loading_indicator(false, "");
        match outcome {
            Ok((ocr, face)) => {
                info!(
                    session = %session_id,
                    similarity = face.comparison.similarity_percentage,
                    is_match = face.is_match(),
                    "Face comparison complete"
                );
                self.presenter.render_combined_result(&ocr, &face);
                self.presenter.show_step(VerificationStep::Result);

                let severity = if face.is_match() { Severity::Success } else { Severity::Warning };
                self.presenter.emit_notification(
                    &format!("{}: {}", face.verification.verdict, face.verification.message),
                    severity,
                );
                SubmissionOutcome::Advanced(VerificationStep::Result)
            }
            Err(e) => self.fail(e),
        }
    }

    /// Clears the session and shows step 1. Safe to call at any time; an
    /// outstanding request will have its response discarded.
    pub fn reset(&self) {
        let (session_id, interrupted) = {
            let mut session = self.session.lock();
            let interrupted = session.is_busy();
            session.reset();
            (session.id(), interrupted)
        };
        info!(session = %session_id, interrupted, "Verification session reset");

        // The abandoned request no longer owns the indicator.
        if interrupted {
            self.presenter.show_loading_indicator(false, "");
        }
        self.presenter.show_step(VerificationStep::DocumentUpload);
    }

    fn fail(&self, error: ClientError) -> SubmissionOutcome {
        warn!(kind = ?error.kind(), "Verification step failed: {}", error);
        self.presenter.emit_notification(&error.to_string(), Severity::Error);
        SubmissionOutcome::Failed(error)
    }

    fn restart(&self, error: ClientError) -> SubmissionOutcome {
        self.presenter.show_step(VerificationStep::DocumentUpload);
        self.presenter.emit_notification(&error.to_string(), Severity::Error);
        SubmissionOutcome::Restarted(error)
    }
}

/// Holds the session claim for one remote call and shows the loading
/// indicator while it is out. If the submitting future is dropped before
/// the call returns, the claim is released so later submissions are not
/// stuck on `Busy`.
struct PendingRequest<'a> {
    controller: &'a VerificationFlowController,
    ticket: Option<Ticket>,
}

impl<'a> PendingRequest<'a> {
    fn new(controller: &'a VerificationFlowController, ticket: Ticket, message: &str) -> Self {
        controller.presenter.show_loading_indicator(true, message);
        Self {
            controller,
            ticket: Some(ticket),
        }
    }

    /// Hands the claim back to `session`. False means the session was reset
    /// meanwhile and the response must be dropped.
    fn settle(mut self, session: &mut VerificationSession) -> bool {
        match self.ticket.take() {
            Some(ticket) => session.finish(&ticket),
            None => false,
        }
    }
}

impl Drop for PendingRequest<'_> {
    fn drop(&mut self) {
        let Some(ticket) = self.ticket.take() else {
            return;
        };
        if !self.controller.session.lock().abandon(&ticket) {
            return;
        }

        warn!(step = %ticket.step(), "Request cancelled before a response arrived");
        let presenter = &self.controller.presenter;
        presenter.show_loading_indicator(false, "");
        presenter.emit_notification("Request was cancelled. Please try again.", Severity::Warning);
    }
}
