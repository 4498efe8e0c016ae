use crate::domain::model::OrderRef;
use crate::domain::ports::{ConfigProvider, OrderStore};
use crate::utils::error::{DispatchError, Result};
use reqwest::Client;
use std::collections::HashMap;

/// 基於 HTTP JSON API 的訂單存儲客戶端。
///
/// 查找：`GET {endpoint}/orders?orderNumber=...`（404 視為不存在）。
/// 變更：`PATCH {endpoint}/orders/{id}`，請求體帶 expectedVersion，
/// 版本過期時存儲端以 409 拒絕。
pub struct HttpOrderStore {
    endpoint: String,
    client: Client,
    auth_token: Option<String>,
    extra_headers: Option<HashMap<String, String>>,
    timeout_seconds: Option<u64>,
}

impl HttpOrderStore {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            client: Client::new(),
            auth_token: None,
            extra_headers: None,
            timeout_seconds: None,
        }
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Self {
        Self {
            endpoint: config.store_endpoint().trim_end_matches('/').to_string(),
            client: Client::new(),
            auth_token: config.auth_token().map(str::to_string),
            extra_headers: config.extra_headers().cloned(),
            timeout_seconds: config.timeout_seconds(),
        }
    }

    /// 套用認證、自定義標頭與超時
    fn prepare(&self, mut request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        if let Some(token) = &self.auth_token {
            request = request.header("Authorization", format!("Bearer {}", token));
        }

        if let Some(headers) = &self.extra_headers {
            for (key, value) in headers {
                request = request.header(key, value);
            }
        }

        if let Some(timeout) = self.timeout_seconds {
            request = request.timeout(std::time::Duration::from_secs(timeout));
        }

        request
    }
}

#[async_trait::async_trait]
impl OrderStore for HttpOrderStore {
    async fn lookup_order_by_number(&self, order_number: &str) -> Result<Option<OrderRef>> {
        let url = format!("{}/orders", self.endpoint);
        tracing::debug!("Looking up order {} at {}", order_number, url);

        let request = self
            .prepare(self.client.get(&url))
            .query(&[("orderNumber", order_number)]);

        let response = request.send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }

        if !status.is_success() {
            return Err(DispatchError::StoreError {
                message: format!(
                    "Order lookup for {} failed with status {}",
                    order_number, status
                ),
            });
        }

        let order: OrderRef = response.json().await?;
        Ok(Some(order))
    }

    async fn set_order_field(
        &self,
        order_id: &str,
        expected_version: u64,
        field: &str,
        value: &str,
    ) -> Result<OrderRef> {
        let url = format!("{}/orders/{}", self.endpoint, order_id);
        tracing::debug!("Patching {} on order {} at {}", field, order_id, url);

        let body = serde_json::json!({
            "field": field,
            "value": value,
            "expectedVersion": expected_version,
        });

        let request = self.prepare(self.client.patch(&url)).json(&body);
        let response = request.send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::CONFLICT {
            return Err(DispatchError::StoreError {
                message: format!(
                    "Version conflict for order {}: expected version {}",
                    order_id, expected_version
                ),
            });
        }

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(DispatchError::StoreError {
                message: format!("Order {} no longer exists", order_id),
            });
        }

        if !status.is_success() {
            return Err(DispatchError::StoreError {
                message: format!(
                    "Field update on order {} failed with status {}",
                    order_id, status
                ),
            });
        }

        let order: OrderRef = response.json().await?;
        Ok(order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use httpmock::Method::PATCH;

    #[tokio::test]
    async fn test_lookup_returns_order_ref() {
        let server = MockServer::start();
        let lookup_mock = server.mock(|when, then| {
            when.method(GET)
                .path("/orders")
                .query_param("orderNumber", "ORD-1");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({
                    "id": "id-1",
                    "orderNumber": "ORD-1",
                    "version": 4
                }));
        });

        let store = HttpOrderStore::new(server.base_url());
        let order = store.lookup_order_by_number("ORD-1").await.unwrap();

        lookup_mock.assert();
        let order = order.unwrap();
        assert_eq!(order.id, "id-1");
        assert_eq!(order.order_number, "ORD-1");
        assert_eq!(order.version, 4);
    }

    #[tokio::test]
    async fn test_lookup_miss_returns_none() {
        let server = MockServer::start();
        let lookup_mock = server.mock(|when, then| {
            when.method(GET).path("/orders");
            then.status(404);
        });

        let store = HttpOrderStore::new(server.base_url());
        let order = store.lookup_order_by_number("ORD-404").await.unwrap();

        lookup_mock.assert();
        assert!(order.is_none());
    }

    #[tokio::test]
    async fn test_lookup_server_error_is_store_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/orders");
            then.status(500);
        });

        let store = HttpOrderStore::new(server.base_url());
        let result = store.lookup_order_by_number("ORD-1").await;

        assert!(matches!(result, Err(DispatchError::StoreError { .. })));
    }

    #[tokio::test]
    async fn test_set_field_sends_expected_version() {
        let server = MockServer::start();
        let patch_mock = server.mock(|when, then| {
            when.method(PATCH)
                .path("/orders/id-1")
                .json_body(serde_json::json!({
                    "field": "deliveryPersonId",
                    "value": "D-1",
                    "expectedVersion": 4
                }));
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({
                    "id": "id-1",
                    "orderNumber": "ORD-1",
                    "version": 5
                }));
        });

        let store = HttpOrderStore::new(server.base_url());
        let updated = store
            .set_order_field("id-1", 4, "deliveryPersonId", "D-1")
            .await
            .unwrap();

        patch_mock.assert();
        assert_eq!(updated.version, 5);
    }

    #[tokio::test]
    async fn test_set_field_version_conflict() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(PATCH).path("/orders/id-1");
            then.status(409);
        });

        let store = HttpOrderStore::new(server.base_url());
        let result = store
            .set_order_field("id-1", 2, "deliveryPersonId", "D-1")
            .await;

        let error = result.unwrap_err();
        assert!(error.to_string().contains("Version conflict"));
        assert!(error.to_string().contains("id-1"));
    }

    #[tokio::test]
    async fn test_auth_token_and_headers_are_forwarded() {
        let server = MockServer::start();
        let lookup_mock = server.mock(|when, then| {
            when.method(GET)
                .path("/orders")
                .header("Authorization", "Bearer secret-token")
                .header("X-Tenant", "shop-1");
            then.status(404);
        });

        let mut store = HttpOrderStore::new(server.base_url());
        store.auth_token = Some("secret-token".to_string());
        store.extra_headers = Some(HashMap::from([(
            "X-Tenant".to_string(),
            "shop-1".to_string(),
        )]));

        let order = store.lookup_order_by_number("ORD-1").await.unwrap();

        lookup_mock.assert();
        assert!(order.is_none());
    }
}
