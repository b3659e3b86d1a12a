// src/presentation/mod.rs
pub mod console;

use std::fmt;

use crate::core::identity::{
    session::VerificationStep,
    types::{FaceComparisonResult, OcrResult},
};

pub use console::ConsolePresenter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Info,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Severity::Success => "success",
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        f.write_str(label)
    }
}

/// Rendering surface driven by the verification controller. Implementations
/// only display what they are given and never hold session state.
#[cfg_attr(test, mockall::automock)]
pub trait Presenter: Send + Sync {
    fn show_step(&self, step: VerificationStep);

    fn show_loading_indicator(&self, active: bool, message: &str);

    fn emit_notification(&self, message: &str, severity: Severity);

    fn render_ocr_result(&self, data: &OcrResult);

    fn render_combined_result(&self, ocr: &OcrResult, face: &FaceComparisonResult);
}
