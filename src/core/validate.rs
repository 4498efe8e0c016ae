use crate::domain::model::{Assignment, InvalidReason, InvalidRow, ValidationOutcome};

/// 將記錄序列劃分為有效/無效兩組；每條記錄獨立判定，不提前中止。
///
/// 檢查順序固定：先訂單號後配送員，兩者皆缺時只報 MissingOrderNumber。
pub fn validate_assignments(records: &[Assignment]) -> ValidationOutcome {
    let mut outcome = ValidationOutcome::default();

    for (index, record) in records.iter().enumerate() {
        let position = index + 1;

        if record.order_number.trim().is_empty() {
            outcome.invalid.push(InvalidRow {
                position,
                reason: InvalidReason::MissingOrderNumber,
            });
        } else if record.delivery_person_id.trim().is_empty() {
            outcome.invalid.push(InvalidRow {
                position,
                reason: InvalidReason::MissingDeliveryPersonId,
            });
        } else {
            outcome.valid.push(record.clone());
        }
    }

    outcome
}
