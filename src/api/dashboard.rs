// src/api/dashboard.rs
use tracing::info;

use super::{
    http::ApiTransport,
    types::{
        AlertRecord, AmlCheckRequest, AmlCheckResult, AuditTrail, ChatReply, ChatRequest, DashboardStats,
        DocumentCheckRequest, DocumentCheckResult, ReportSummary, TransactionRecord,
    },
};
use crate::utils::error::{ClientError, Result};

/// Dashboard, compliance and lookup endpoints of the backend.
#[derive(Clone)]
pub struct DashboardClient {
    transport: ApiTransport,
    default_limit: usize,
}

impl DashboardClient {
    pub fn new(transport: ApiTransport, default_limit: usize) -> Self {
        Self { transport, default_limit }
    }

    pub async fn stats(&self) -> Result<DashboardStats> {
        self.transport.get_json("dashboard/stats", &[]).await
    }

    pub async fn recent_transactions(&self, limit: Option<usize>) -> Result<Vec<TransactionRecord>> {
        let limit = limit.unwrap_or(self.default_limit);
        self.transport
            .get_json("transactions/recent", &[("limit", limit.to_string())])
            .await
    }

    pub async fn recent_alerts(&self, limit: Option<usize>) -> Result<Vec<AlertRecord>> {
        let limit = limit.unwrap_or(self.default_limit);
        self.transport
            .get_json("alerts/recent", &[("limit", limit.to_string())])
            .await
    }

    pub async fn check_transaction(&self, request: &AmlCheckRequest) -> Result<AmlCheckResult> {
        request.validate()?;

        let result: AmlCheckResult = self.transport.post_json("aml/check", request).await?;
        info!(
            user_id = %request.user_id,
            risk_score = result.combined_risk_score,
            decision = ?result.decision,
            "AML check complete"
        );
        Ok(result)
    }

    /// Asks the backend to render a compliance report over its current data.
    pub async fn generate_report(&self) -> Result<ReportSummary> {
        let report: ReportSummary = self.transport.post_json("reports/generate", &serde_json::json!({})).await?;
        info!(filename = %report.filename, "Compliance report generated");
        Ok(report)
    }

    /// Latest audit entries, optionally restricted to one event type.
    pub async fn audit_trail(&self, event_type: Option<&str>) -> Result<AuditTrail> {
        let query: Vec<(&str, String)> = event_type
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(|t| vec![("event_type", t.to_string())])
            .unwrap_or_default();
        self.transport.get_json("audit/trail", &query).await
    }

    pub async fn verify_document(&self, request: &DocumentCheckRequest) -> Result<DocumentCheckResult> {
        request.validate()?;

        let result: DocumentCheckResult = self.transport.post_json("kyc/verify", request).await?;
        info!(
            document_type = %request.document_type,
            valid = result.valid,
            "Document number checked"
        );
        Ok(result)
    }

    pub async fn chat(&self, message: &str) -> Result<ChatReply> {
        let message = message.trim();
        if message.is_empty() {
            return Err(ClientError::InvalidRequest("Message cannot be empty".into()));
        }

        let request = ChatRequest { message: message.to_string() };
        self.transport.post_json("chat", &request).await
    }
}
