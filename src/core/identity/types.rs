// src/core/identity/types.rs
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use sha3::{Digest, Sha3_256};

use crate::utils::error::{ClientError, Result};

/// An uploaded image held in memory. Construction does not validate; the
/// verification controller checks [`ImageBlob::validate`] before any upload.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageBlob {
    pub file_name: String,
    pub media_type: String,
    pub data: Vec<u8>,
}

impl ImageBlob {
    pub fn new(file_name: impl Into<String>, media_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            media_type: media_type.into(),
            data,
        }
    }

    pub async fn from_path(path: &Path) -> Result<Self> {
        let data = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        let media_type = media_type_for(path).to_string();

        Ok(Self::new(file_name, media_type, data))
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn validate(&self, max_bytes: usize) -> Result<()> {
        if self.data.is_empty() {
            return Err(ClientError::InvalidImage(format!("{} is empty", self.file_name)));
        }
        if !self.media_type.starts_with("image/") {
            return Err(ClientError::InvalidImage(format!(
                "{} has media type {}, expected an image",
                self.file_name, self.media_type
            )));
        }
        if self.data.len() > max_bytes {
            return Err(ClientError::InvalidImage(format!(
                "{} is {} bytes, limit is {}",
                self.file_name,
                self.data.len(),
                max_bytes
            )));
        }
        Ok(())
    }

    /// Short content hash for log lines.
    pub fn fingerprint(&self) -> String {
        let digest = Sha3_256::digest(&self.data);
        hex::encode(&digest[..8])
    }
}

impl fmt::Debug for ImageBlob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageBlob")
            .field("file_name", &self.file_name)
            .field("media_type", &self.media_type)
            .field("len", &self.data.len())
            .finish()
    }
}

fn media_type_for(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "bmp" => "image/bmp",
        "tif" | "tiff" => "image/tiff",
        _ => "application/octet-stream",
    }
}

/// Caller-chosen document label forwarded to OCR. Not validated here; the
/// backend understands `auto`, `pan`, `aadhaar`, `passport`,
/// `drivers_license` and `voter_id`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentType(String);

impl DocumentType {
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for DocumentType {
    fn default() -> Self {
        Self::new("auto")
    }
}

impl From<&str> for DocumentType {
    fn from(label: &str) -> Self {
        Self::new(label)
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceLevel {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentValidation {
    pub is_valid: bool,
    pub confidence_level: ConfidenceLevel,
    #[serde(default)]
    pub issues: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OcrResult {
    pub document_type: String,
    /// Field name to extracted value; fields the OCR could not find are null.
    #[serde(default)]
    pub extracted_details: BTreeMap<String, Option<String>>,
    pub ocr_confidence: f64,
    pub validation: DocumentValidation,
    #[serde(default)]
    pub raw_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uploaded_file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl OcrResult {
    /// Extracted fields that carry a value, in name order.
    pub fn present_fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.extracted_details
            .iter()
            .filter_map(|(name, value)| value.as_deref().map(|v| (name.as_str(), v)))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaceComparison {
    pub similarity_percentage: f64,
    pub is_match: bool,
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub similarity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_level: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaceVerdict {
    pub verdict: String,
    pub message: String,
    pub recommendation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgeAnalysis {
    pub significant_gap: bool,
    pub age_gap: f64,
    #[serde(default)]
    pub threshold_adjusted: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureMatch {
    pub similarity: f64,
    #[serde(rename = "match")]
    pub is_match: bool,
}

/// Names under which the backend stored the compared images.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComparisonFiles {
    #[serde(default)]
    pub document: Option<String>,
    #[serde(default)]
    pub selfie: Option<String>,
    #[serde(default)]
    pub comparison: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaceComparisonResult {
    pub comparison: FaceComparison,
    pub verification: FaceVerdict,
    pub age_analysis: AgeAnalysis,
    /// Per facial region (eye_region, nose_region, ...).
    #[serde(default)]
    pub feature_comparison: BTreeMap<String, FeatureMatch>,
    #[serde(default)]
    pub warnings: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub files: Option<ComparisonFiles>,
}

impl FaceComparisonResult {
    pub fn is_match(&self) -> bool {
        self.comparison.is_match
    }
}
