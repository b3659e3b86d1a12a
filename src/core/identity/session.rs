// src/core/identity/session.rs
use std::fmt;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::types::{FaceComparisonResult, ImageBlob, OcrResult};
use crate::utils::error::{ClientError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum VerificationStep {
    DocumentUpload = 1,
    SelfieCapture = 2,
    Result = 3,
}

impl VerificationStep {
    pub fn number(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for VerificationStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

/// Identifies one outstanding remote call. A ticket stops being current once
/// the session is reset, so late responses can be recognised and dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    generation: u64,
    step: VerificationStep,
}

impl Ticket {
    pub fn step(&self) -> VerificationStep {
        self.step
    }
}

/// State of a single verification attempt.
#[derive(Debug, Clone)]
pub struct VerificationSession {
    id: Uuid,
    started_at: DateTime<Utc>,
    step: VerificationStep,
    document_image: Option<ImageBlob>,
    ocr_result: Option<OcrResult>,
    selfie_image: Option<ImageBlob>,
    face_comparison: Option<FaceComparisonResult>,
    generation: u64,
    in_flight: Option<Ticket>,
}

impl VerificationSession {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
            step: VerificationStep::DocumentUpload,
            document_image: None,
            ocr_result: None,
            selfie_image: None,
            face_comparison: None,
            generation: 0,
            in_flight: None,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn step(&self) -> VerificationStep {
        self.step
    }

    pub fn document_image(&self) -> Option<&ImageBlob> {
        self.document_image.as_ref()
    }

    pub fn ocr_result(&self) -> Option<&OcrResult> {
        self.ocr_result.as_ref()
    }

    pub fn selfie_image(&self) -> Option<&ImageBlob> {
        self.selfie_image.as_ref()
    }

    pub fn face_comparison(&self) -> Option<&FaceComparisonResult> {
        self.face_comparison.as_ref()
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    /// True when a face comparison may be requested: both the document image
    /// and its OCR result are held.
    pub fn has_document(&self) -> bool {
        self.document_image.is_some() && self.ocr_result.is_some()
    }

    /// Claims the session for a remote call made from `expected`.
    pub(crate) fn begin(&mut self, expected: VerificationStep) -> Result<Ticket> {
        if self.in_flight.is_some() {
            return Err(ClientError::Busy);
        }
        if self.step != expected {
            return Err(ClientError::InvalidTransition(self.step));
        }

        let ticket = Ticket {
            generation: self.generation,
            step: expected,
        };
        self.in_flight = Some(ticket);
        Ok(ticket)
    }

    /// Releases `ticket`. Returns false if the session was reset since the
    /// ticket was issued, in which case the caller must not apply its result.
    pub(crate) fn finish(&mut self, ticket: &Ticket) -> bool {
        if self.in_flight != Some(*ticket) {
            return false;
        }
        self.in_flight = None;
        true
    }

    /// Releases `ticket` without a result, dropping any selfie attached for
    /// it. Returns false if the ticket was already stale.
    pub(crate) fn abandon(&mut self, ticket: &Ticket) -> bool {
        if !self.finish(ticket) {
            return false;
        }
        if ticket.step == VerificationStep::SelfieCapture {
            self.selfie_image = None;
        }
        true
    }

    pub(crate) fn complete_document(&mut self, image: ImageBlob, ocr: OcrResult) {
        self.document_image = Some(image);
        self.ocr_result = Some(ocr);
        self.step = VerificationStep::SelfieCapture;
    }

    pub(crate) fn attach_selfie(&mut self, image: ImageBlob) {
        self.selfie_image = Some(image);
    }

    pub(crate) fn release_selfie(&mut self) {
        self.selfie_image = None;
    }

    pub(crate) fn complete_face_comparison(&mut self, result: FaceComparisonResult) {
        self.selfie_image = None;
        self.face_comparison = Some(result);
        self.step = VerificationStep::Result;
    }

    /// Clears every field and returns to step 1. Any outstanding ticket is
    /// invalidated.
    pub fn reset(&mut self) {
        self.step = VerificationStep::DocumentUpload;
        self.document_image = None;
        self.ocr_result = None;
        self.selfie_image = None;
        self.face_comparison = None;
        self.in_flight = None;
        self.generation = self.generation.wrapping_add(1);
    }
}

impl Default for VerificationSession {
    fn default() -> Self {
        Self::new()
    }
}
