use crate::domain::model::BatchReport;
use crate::domain::ports::Storage;
use crate::utils::error::Result;
use std::io::Write;
use zip::write::{FileOptions, ZipWriter};

/// 把批處理報告打包成 ZIP（JSON 全量 + 兩張 CSV 明細）寫入存儲，
/// 返回存檔名稱。
pub async fn write_report_bundle<S: Storage>(storage: &S, report: &BatchReport) -> Result<String> {
    let archive_name = format!(
        "batch_report_{}.zip",
        chrono::Utc::now().format("%Y%m%d_%H%M%S")
    );

    let zip_data = {
        let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));

        zip.start_file::<_, ()>("report.json", FileOptions::default())?;
        let json_data = serde_json::to_string_pretty(report)?;
        zip.write_all(json_data.as_bytes())?;

        zip.start_file::<_, ()>("outcomes.csv", FileOptions::default())?;
        zip.write_all(&outcomes_csv(report)?)?;

        zip.start_file::<_, ()>("invalid_rows.csv", FileOptions::default())?;
        zip.write_all(&invalid_rows_csv(report)?)?;

        let cursor = zip.finish()?;
        cursor.into_inner()
    };

    tracing::debug!(
        "Writing report bundle ({} bytes) to storage",
        zip_data.len()
    );
    storage.write_file(&archive_name, &zip_data).await?;

    tracing::info!("📦 Report bundle saved: {}", archive_name);
    Ok(archive_name)
}

fn outcomes_csv(report: &BatchReport) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["orderNumber", "deliveryPersonId", "success", "error"])?;

    for outcome in &report.details {
        writer.write_record([
            outcome.order_number.as_str(),
            outcome.delivery_person_id.as_str(),
            if outcome.success { "true" } else { "false" },
            outcome.error.as_deref().unwrap_or(""),
        ])?;
    }

    writer
        .into_inner()
        .map_err(|e| crate::utils::error::DispatchError::ProcessingError {
            message: format!("CSV buffer flush failed: {}", e),
        })
}

fn invalid_rows_csv(report: &BatchReport) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["position", "reason"])?;

    for row in &report.invalid_rows {
        writer.write_record([row.position.to_string(), row.reason.to_string()])?;
    }

    writer
        .into_inner()
        .map_err(|e| crate::utils::error::DispatchError::ProcessingError {
            message: format!("CSV buffer flush failed: {}", e),
        })
}
