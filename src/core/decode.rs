use crate::domain::model::RawRow;
use crate::utils::error::{DispatchError, Result};
use calamine::{Data, Reader, Xlsx};
use std::collections::HashMap;
use std::io::Cursor;

/// XLSX 工作簿以 ZIP 容器開頭
const ZIP_MAGIC: &[u8] = b"PK\x03\x04";

/// 將上傳的字節緩衝解碼為有序的原始列序列。
///
/// ZIP 開頭視為 XLSX 工作簿（只讀第一個工作表），其餘內容必須是
/// UTF-8 的 CSV 文本；兩者都不是時整批失敗。
pub fn decode_spreadsheet(bytes: &[u8]) -> Result<Vec<RawRow>> {
    if bytes.starts_with(ZIP_MAGIC) {
        decode_workbook(bytes)
    } else {
        let text = std::str::from_utf8(bytes).map_err(|_| DispatchError::DecodeError {
            message: "input is neither an XLSX workbook nor UTF-8 CSV text".to_string(),
        })?;
        decode_csv(text)
    }
}

fn decode_workbook(bytes: &[u8]) -> Result<Vec<RawRow>> {
    let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes))?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| DispatchError::DecodeError {
            message: "workbook contains no sheets".to_string(),
        })?;

    tracing::debug!("Decoding first sheet: {}", sheet_name);
    let range = workbook.worksheet_range(&sheet_name)?;

    let mut row_iter = range.rows();
    let headers: Vec<String> = match row_iter.next() {
        Some(header_row) => header_row
            .iter()
            .map(|c| match c {
                Data::String(s) => s.clone(),
                Data::Empty => String::new(),
                other => other.to_string(),
            })
            .collect(),
        None => return Ok(Vec::new()),
    };

    let mut rows = Vec::new();
    for row in row_iter {
        let mut data = HashMap::new();

        for (col_idx, cell) in row.iter().enumerate() {
            let header = headers.get(col_idx).map(|s| s.as_str()).unwrap_or("");
            if header.is_empty() {
                continue;
            }

            let value = cell_to_value(cell);
            if value.is_null() {
                continue;
            }

            data.insert(header.to_string(), value);
        }

        // 略過完全空白的列
        if data.is_empty() {
            continue;
        }

        rows.push(RawRow { data });
    }

    Ok(rows)
}

fn decode_csv(text: &str) -> Result<Vec<RawRow>> {
    let mut reader = csv::Reader::from_reader(text.as_bytes());
    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let mut data = HashMap::new();

        for (col_idx, field) in record.iter().enumerate() {
            let header = headers.get(col_idx).map(|s| s.as_str()).unwrap_or("");
            if header.is_empty() || field.is_empty() {
                continue;
            }
            data.insert(
                header.to_string(),
                serde_json::Value::String(field.to_string()),
            );
        }

        if data.is_empty() {
            continue;
        }

        rows.push(RawRow { data });
    }

    Ok(rows)
}

/// 儲存格轉成 JSON 值；空白儲存格視為缺失
fn cell_to_value(cell: &Data) -> serde_json::Value {
    match cell {
        Data::Empty => serde_json::Value::Null,
        Data::String(s) if s.is_empty() => serde_json::Value::Null,
        Data::String(s) => serde_json::Value::String(s.clone()),
        Data::Int(i) => serde_json::json!(*i),
        Data::Float(f) => {
            // 整數值的浮點數以整數表示
            if f.fract() == 0.0 && *f >= i64::MIN as f64 && *f <= i64::MAX as f64 {
                serde_json::json!(*f as i64)
            } else {
                serde_json::json!(*f)
            }
        }
        Data::Bool(b) => serde_json::Value::Bool(*b),
        Data::DateTime(dt) => serde_json::Value::String(format!("{}", dt)),
        Data::DateTimeIso(s) => serde_json::Value::String(s.clone()),
        Data::DurationIso(s) => serde_json::Value::String(s.clone()),
        Data::Error(_) => serde_json::Value::Null,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_xlsxwriter::Workbook;

    fn workbook_bytes(rows: &[&[&str]]) -> Vec<u8> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        for (r, row) in rows.iter().enumerate() {
            for (c, value) in row.iter().enumerate() {
                worksheet
                    .write_string(r as u32, c as u16, *value)
                    .unwrap();
            }
        }
        workbook.save_to_buffer().unwrap()
    }

    #[test]
    fn test_decode_workbook_rows_in_order() {
        let bytes = workbook_bytes(&[
            &["orderNumber", "deliveryPersonId"],
            &["ORD-1", "D-1"],
            &["ORD-2", "D-2"],
        ]);

        let rows = decode_spreadsheet(&bytes).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(
            rows[0].data.get("orderNumber").unwrap().as_str().unwrap(),
            "ORD-1"
        );
        assert_eq!(
            rows[1].data.get("deliveryPersonId").unwrap().as_str().unwrap(),
            "D-2"
        );
    }

    #[test]
    fn test_decode_workbook_skips_blank_rows() {
        let bytes = workbook_bytes(&[
            &["orderNumber", "deliveryPersonId"],
            &["ORD-1", "D-1"],
            &["", ""],
            &["ORD-2", "D-2"],
        ]);

        let rows = decode_spreadsheet(&bytes).unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_decode_csv_text() {
        let csv = "orderNumber,deliveryPersonId\nORD-1,D-1\nORD-2,D-2\n";

        let rows = decode_spreadsheet(csv.as_bytes()).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(
            rows[0].data.get("orderNumber").unwrap().as_str().unwrap(),
            "ORD-1"
        );
    }

    #[test]
    fn test_decode_rejects_binary_garbage() {
        let garbage = [0xFFu8, 0xFE, 0x00, 0x01, 0x80, 0x81];
        let result = decode_spreadsheet(&garbage);
        assert!(matches!(result, Err(DispatchError::DecodeError { .. })));
    }

    #[test]
    fn test_decode_rejects_corrupt_workbook() {
        // ZIP 開頭但內容損壞
        let mut bytes = b"PK\x03\x04".to_vec();
        bytes.extend_from_slice(&[0u8; 32]);
        assert!(decode_spreadsheet(&bytes).is_err());
    }

    #[test]
    fn test_decode_numeric_cells_become_integers() {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.write_string(0, 0, "orderNumber").unwrap();
        worksheet.write_string(0, 1, "deliveryPersonId").unwrap();
        worksheet.write_number(1, 0, 1001.0).unwrap();
        worksheet.write_string(1, 1, "D-1").unwrap();
        let bytes = workbook.save_to_buffer().unwrap();

        let rows = decode_spreadsheet(&bytes).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(
            rows[0].data.get("orderNumber").unwrap().as_i64().unwrap(),
            1001
        );
    }
}
