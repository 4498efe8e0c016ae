use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 解碼後的原始列，尚未映射到具體欄位
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawRow {
    pub data: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub order_number: String,
    pub delivery_person_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InvalidReason {
    MissingOrderNumber,
    MissingDeliveryPersonId,
}

impl std::fmt::Display for InvalidReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InvalidReason::MissingOrderNumber => write!(f, "missing order number"),
            InvalidReason::MissingDeliveryPersonId => write!(f, "missing delivery person id"),
        }
    }
}

/// 無效列：position 為解碼序列中的 1-based 位置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvalidRow {
    pub position: usize,
    pub reason: InvalidReason,
}

#[derive(Debug, Clone, Default)]
pub struct ValidationOutcome {
    pub valid: Vec<Assignment>,
    pub invalid: Vec<InvalidRow>,
}

/// 外部訂單存儲中的訂單引用；version 由存儲端管理
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRef {
    pub id: String,
    pub order_number: String,
    pub version: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentOutcome {
    pub order_number: String,
    pub delivery_person_id: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchReport {
    pub total_processed: usize,
    pub successful: usize,
    pub failed: usize,
    pub details: Vec<AssignmentOutcome>,
    pub invalid_rows: Vec<InvalidRow>,
}

impl BatchReport {
    /// 組裝報告並計算統計數字
    pub fn new(details: Vec<AssignmentOutcome>, invalid_rows: Vec<InvalidRow>) -> Self {
        let successful = details.iter().filter(|d| d.success).count();
        let failed = details.len() - successful;
        Self {
            total_processed: details.len() + invalid_rows.len(),
            successful,
            failed,
            details,
            invalid_rows,
        }
    }
}
