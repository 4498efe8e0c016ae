use crate::domain::model::{Assignment, RawRow};

/// 欄位別名按順序嘗試，第一個存在的鍵生效
const ORDER_NUMBER_KEYS: [&str; 2] = ["orderNumber", "Order Number"];
const DELIVERY_PERSON_KEYS: [&str; 2] = ["deliveryPersonId", "Delivery Person Id"];

/// 每個原始列恰好產生一個 Assignment，順序不變；此階段不會失敗
pub fn normalize_rows(rows: Vec<RawRow>) -> Vec<Assignment> {
    rows.iter().map(normalize_row).collect()
}

pub fn normalize_row(row: &RawRow) -> Assignment {
    Assignment {
        order_number: resolve_field(row, &ORDER_NUMBER_KEYS),
        delivery_person_id: resolve_field(row, &DELIVERY_PERSON_KEYS),
    }
}

/// 缺失或 null 的鍵解析為空字串，交由驗證階段判定
fn resolve_field(row: &RawRow, candidate_keys: &[&str]) -> String {
    for key in candidate_keys {
        if let Some(value) = row.data.get(*key) {
            return scalar_to_string(value).trim().to_string();
        }
    }
    String::new()
}

fn scalar_to_string(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::Bool(b) => b.to_string(),
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}
