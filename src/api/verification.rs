// src/api/verification.rs
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use tracing::info;

use super::http::ApiTransport;
use crate::{
    core::identity::types::{DocumentType, FaceComparisonResult, ImageBlob, OcrResult},
    utils::error::{ClientError, Result},
};

pub const OCR_PATH: &str = "kyc/ocr";
pub const FACE_COMPARE_PATH: &str = "kyc/face-compare";

/// Remote OCR and face-comparison service.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VerificationApi: Send + Sync {
    async fn extract_document(&self, document: &ImageBlob, document_type: &DocumentType) -> Result<OcrResult>;

    async fn compare_faces(&self, document: &ImageBlob, selfie: &ImageBlob) -> Result<FaceComparisonResult>;
}

pub struct HttpVerificationApi {
    transport: ApiTransport,
}

impl HttpVerificationApi {
    pub fn new(transport: ApiTransport) -> Self {
        Self { transport }
    }
}

fn image_part(image: &ImageBlob) -> Result<Part> {
    Part::bytes(image.data.clone())
        .file_name(image.file_name.clone())
        .mime_str(&image.media_type)
        .map_err(|e| ClientError::InvalidImage(format!("{}: {}", image.file_name, e)))
}

#[async_trait]
impl VerificationApi for HttpVerificationApi {
    async fn extract_document(&self, document: &ImageBlob, document_type: &DocumentType) -> Result<OcrResult> {
        info!(
            document = %document.fingerprint(),
            document_type = %document_type,
            bytes = document.len(),
            "Submitting document for OCR"
        );

        let form = Form::new()
            .part("document", image_part(document)?)
            .text("document_type", document_type.as_str().to_string());

        self.transport.post_multipart(OCR_PATH, form).await
    }

    async fn compare_faces(&self, document: &ImageBlob, selfie: &ImageBlob) -> Result<FaceComparisonResult> {
        info!(
            document = %document.fingerprint(),
            selfie = %selfie.fingerprint(),
            "Submitting images for face comparison"
        );

        let form = Form::new()
            .part("document_image", image_part(document)?)
            .part("selfie_image", image_part(selfie)?);

        self.transport.post_multipart(FACE_COMPARE_PATH, form).await
    }
}
