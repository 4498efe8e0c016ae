use crate::domain::model::BatchReport;
use crate::domain::ports::BatchPipeline;
use crate::utils::error::Result;

pub struct BatchRunner<P: BatchPipeline> {
    pipeline: P,
}

impl<P: BatchPipeline> BatchRunner<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    /// 單次批處理：parse → validate → apply。
    /// 只有解碼失敗會向上拋出；之後任何單筆問題都收進報告。
    pub async fn run(&self, bytes: &[u8]) -> Result<BatchReport> {
        tracing::info!("🚀 Starting assignment batch ({} bytes)", bytes.len());

        let records = self.pipeline.parse(bytes).await?;
        tracing::info!("📊 Parsed {} assignment records", records.len());

        let outcome = self.pipeline.validate(records).await?;
        tracing::info!(
            "🔎 Validation: {} valid, {} invalid",
            outcome.valid.len(),
            outcome.invalid.len()
        );

        let report = self.pipeline.apply(outcome).await?;
        tracing::info!(
            "✅ Batch complete: {} processed, {} successful, {} failed, {} invalid",
            report.total_processed,
            report.successful,
            report.failed,
            report.invalid_rows.len()
        );

        Ok(report)
    }
}
