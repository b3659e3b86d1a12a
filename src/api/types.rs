// src/api/types.rs
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::utils::error::{ClientError, Result};

/// `{ success, data?, error? }` wrapper used by every backend endpoint.
#[derive(Debug, Deserialize)]
pub struct ApiEnvelope<T> {
    pub success: bool,
    #[serde(default = "Option::default")]
    pub data: Option<T>,
    #[serde(default)]
    pub error: Option<String>,
}

impl<T> ApiEnvelope<T> {
    pub fn into_result(self) -> Result<T> {
        if !self.success {
            return Err(ClientError::Api(
                self.error.unwrap_or_else(|| "Unknown error".to_string()),
            ));
        }
        self.data
            .ok_or_else(|| ClientError::Decode("successful response without data".into()))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardStats {
    pub total_transactions: u64,
    pub flagged_transactions: u64,
    pub total_volume: f64,
    pub open_alerts: u64,
    pub average_risk_score: f64,
    pub flagging_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub amount: f64,
    #[serde(default)]
    pub risk_score: f64,
    #[serde(default)]
    pub flagged: bool,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertRecord {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub transaction_id: Option<String>,
    #[serde(default)]
    pub severity: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmlCheckRequest {
    pub user_id: String,
    pub amount: f64,
    pub transaction_type: String,
    pub recipient: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub description: String,
}

impl AmlCheckRequest {
    pub fn new(user_id: impl Into<String>, amount: f64, recipient: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            amount,
            transaction_type: "transfer".to_string(),
            recipient: recipient.into(),
            location: String::new(),
            description: String::new(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.amount.is_finite() || self.amount <= 0.0 {
            return Err(ClientError::InvalidRequest(format!(
                "amount must be a positive number, got {}",
                self.amount
            )));
        }
        if self.user_id.trim().is_empty() {
            return Err(ClientError::InvalidRequest("user_id must be set".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AmlDecision {
    Flagged,
    Approved,
}

/// Outcome of an AML check. Scoring is done remotely; the analysis sections
/// are passed through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmlCheckResult {
    pub combined_risk_score: i64,
    pub decision: AmlDecision,
    #[serde(default)]
    pub transaction: Value,
    #[serde(default)]
    pub rule_analysis: Value,
    #[serde(default)]
    pub ml_analysis: Value,
    #[serde(default)]
    pub ml_explanation: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatReply {
    pub response: String,
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// Compliance report written by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub report_path: String,
    pub filename: String,
    #[serde(default)]
    pub timestamp: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub event_type: String,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub event_data: Value,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub ip_address: Option<String>,
}

/// The most recent audit entries plus the size of the whole trail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditTrail {
    #[serde(default)]
    pub entries: Vec<AuditEntry>,
    pub total_count: u64,
}

/// Format check of a PAN or Aadhaar number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentCheckRequest {
    pub document_type: String,
    pub document_number: String,
    #[serde(default)]
    pub full_name: String,
}

impl DocumentCheckRequest {
    pub fn new(
        document_type: impl Into<String>,
        document_number: impl Into<String>,
        full_name: impl Into<String>,
    ) -> Self {
        Self {
            document_type: document_type.into(),
            document_number: document_number.into(),
            full_name: full_name.into(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.document_type.trim().is_empty() {
            return Err(ClientError::InvalidRequest("document_type must be set".into()));
        }
        if self.document_number.trim().is_empty() {
            return Err(ClientError::InvalidRequest("document_number must be set".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentCheckResult {
    pub valid: bool,
    pub message: String,
    #[serde(default)]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub document_type: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
}
