// src/presentation/console.rs
use std::io::{self, Write};

use parking_lot::Mutex;
use tracing::warn;

use super::{Presenter, Severity};
use crate::core::identity::{
    session::VerificationStep,
    types::{FaceComparisonResult, OcrResult},
};

/// Plain-text presenter for terminals and log capture.
pub struct ConsolePresenter<W: Write + Send> {
    out: Mutex<W>,
}

impl ConsolePresenter<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> ConsolePresenter<W> {
    pub fn new(out: W) -> Self {
        Self { out: Mutex::new(out) }
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner()
    }

    fn write(&self, text: &str) {
        let mut out = self.out.lock();
        if let Err(e) = out.write_all(text.as_bytes()).and_then(|_| out.flush()) {
            warn!("Failed to write to console: {}", e);
        }
    }
}

fn step_title(step: VerificationStep) -> &'static str {
    match step {
        VerificationStep::DocumentUpload => "Upload identity document",
        VerificationStep::SelfieCapture => "Capture selfie",
        VerificationStep::Result => "Verification result",
    }
}

fn format_ocr(data: &OcrResult) -> String {
    let mut text = format!(
        "Document type: {}\nOCR confidence: {:.1}%\nValidation: {} ({:?} confidence)\n",
        data.document_type,
        data.ocr_confidence,
        if data.validation.is_valid { "valid" } else { "invalid" },
        data.validation.confidence_level,
    );
    for (name, value) in data.present_fields() {
        text.push_str(&format!("  {}: {}\n", name, value));
    }
    for issue in &data.validation.issues {
        text.push_str(&format!("  ! {}\n", issue));
    }
    text
}

impl<W: Write + Send> Presenter for ConsolePresenter<W> {
    fn show_step(&self, step: VerificationStep) {
        self.write(&format!("\n== Step {}/3: {} ==\n", step.number(), step_title(step)));
    }

    fn show_loading_indicator(&self, active: bool, message: &str) {
        if active {
            self.write(&format!("... {}\n", message));
        }
    }

    fn emit_notification(&self, message: &str, severity: Severity) {
        self.write(&format!("[{}] {}\n", severity, message));
    }

    fn render_ocr_result(&self, data: &OcrResult) {
        self.write(&format_ocr(data));
    }

    fn render_combined_result(&self, ocr: &OcrResult, face: &FaceComparisonResult) {
        let mut text = format_ocr(ocr);
        text.push_str(&format!(
            "Face similarity: {:.1}% (confidence {:.0}%)\nVerdict: {}\n{}\nRecommendation: {}\n",
            face.comparison.similarity_percentage,
            face.comparison.confidence,
            face.verification.verdict,
            face.verification.message,
            face.verification.recommendation,
        ));
        if face.age_analysis.significant_gap {
            text.push_str(&format!(
                "Age gap of about {:.0} years detected; thresholds adjusted\n",
                face.age_analysis.age_gap
            ));
        }
        for (region, feature) in &face.feature_comparison {
            text.push_str(&format!(
                "  {:<18} {:>5.1}% {}\n",
                region,
                feature.similarity,
                if feature.is_match { "match" } else { "differs" }
            ));
        }
        for warning in &face.warnings {
            text.push_str(&format!("  ! {}\n", warning));
        }
        self.write(&text);
    }
}
