use crate::domain::model::{Assignment, BatchReport, OrderRef, ValidationOutcome};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn store_endpoint(&self) -> &str;
    fn report_path(&self) -> &str;
    fn auth_token(&self) -> Option<&str>;
    fn extra_headers(&self) -> Option<&HashMap<String, String>>;
    fn timeout_seconds(&self) -> Option<u64>;
}

/// 外部訂單存儲能力；版本遞增由存儲端負責
#[async_trait]
pub trait OrderStore: Send + Sync {
    async fn lookup_order_by_number(&self, order_number: &str) -> Result<Option<OrderRef>>;

    async fn set_order_field(
        &self,
        order_id: &str,
        expected_version: u64,
        field: &str,
        value: &str,
    ) -> Result<OrderRef>;
}

#[async_trait]
pub trait BatchPipeline: Send + Sync {
    async fn parse(&self, bytes: &[u8]) -> Result<Vec<Assignment>>;
    async fn validate(&self, records: Vec<Assignment>) -> Result<ValidationOutcome>;
    async fn apply(&self, outcome: ValidationOutcome) -> Result<BatchReport>;
}
