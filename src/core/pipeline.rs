use crate::core::decode::decode_spreadsheet;
use crate::core::normalize::normalize_rows;
use crate::core::validate::validate_assignments;
use crate::domain::model::{Assignment, AssignmentOutcome, BatchReport, ValidationOutcome};
use crate::domain::ports::{BatchPipeline, OrderStore};
use crate::utils::error::Result;

/// 訂單上被改寫的欄位鍵
pub const DELIVERY_PERSON_FIELD: &str = "deliveryPersonId";

pub struct AssignmentPipeline<S: OrderStore> {
    store: S,
}

impl<S: OrderStore> AssignmentPipeline<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// 單筆套用：查找訂單，再以樂觀並發提交欄位變更。
    /// 任何失敗都轉成 outcome，不會中斷後續記錄。
    async fn apply_one(&self, record: &Assignment) -> AssignmentOutcome {
        let looked_up = self
            .store
            .lookup_order_by_number(&record.order_number)
            .await;

        let order = match looked_up {
            Ok(Some(order)) => order,
            Ok(None) => {
                return AssignmentOutcome {
                    order_number: record.order_number.clone(),
                    delivery_person_id: record.delivery_person_id.clone(),
                    success: false,
                    error: Some(format!("Order not found: {}", record.order_number)),
                };
            }
            Err(e) => {
                return AssignmentOutcome {
                    order_number: record.order_number.clone(),
                    delivery_person_id: record.delivery_person_id.clone(),
                    success: false,
                    error: Some(e.to_string()),
                };
            }
        };

        tracing::debug!(
            "Updating order {} (version {}) -> {}",
            order.id,
            order.version,
            record.delivery_person_id
        );

        // 提交查找時讀到的版本；版本過期由存儲端拒絕，不重試
        let mutated = self
            .store
            .set_order_field(
                &order.id,
                order.version,
                DELIVERY_PERSON_FIELD,
                &record.delivery_person_id,
            )
            .await;

        match mutated {
            Ok(_) => AssignmentOutcome {
                order_number: record.order_number.clone(),
                delivery_person_id: record.delivery_person_id.clone(),
                success: true,
                error: None,
            },
            Err(e) => AssignmentOutcome {
                order_number: record.order_number.clone(),
                delivery_person_id: record.delivery_person_id.clone(),
                success: false,
                error: Some(e.to_string()),
            },
        }
    }
}

#[async_trait::async_trait]
impl<S: OrderStore> BatchPipeline for AssignmentPipeline<S> {
    async fn parse(&self, bytes: &[u8]) -> Result<Vec<Assignment>> {
        let rows = decode_spreadsheet(bytes)?;
        tracing::info!("📋 Decoded {} rows from spreadsheet", rows.len());
        Ok(normalize_rows(rows))
    }

    async fn validate(&self, records: Vec<Assignment>) -> Result<ValidationOutcome> {
        let outcome = validate_assignments(&records);
        if !outcome.invalid.is_empty() {
            tracing::warn!(
                "⚠️ {} of {} rows failed validation",
                outcome.invalid.len(),
                records.len()
            );
        }
        Ok(outcome)
    }

    async fn apply(&self, outcome: ValidationOutcome) -> Result<BatchReport> {
        let mut details = Vec::with_capacity(outcome.valid.len());

        // 逐筆套用，每筆完整結束（查找 + 變更）後才開始下一筆
        for record in &outcome.valid {
            let result = self.apply_one(record).await;
            if let Some(error) = &result.error {
                tracing::warn!("⚠️ {}: {}", record.order_number, error);
            }
            details.push(result);
        }

        Ok(BatchReport::new(details, outcome.invalid))
    }
}
