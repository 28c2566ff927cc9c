use async_trait::async_trait;
use reqwest::{Client, Response};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::infra::backend::{BackendError, QueryTransport, SchemaProvider};
use crate::models::query::{PreviewResult, QueryRequest};
use crate::models::schema::{ColumnDescriptor, SchemaCatalog};

/// 通过 REST 接口访问查询后端
pub struct HttpBackend {
    base_url: String,
    client: Client,
}

impl HttpBackend {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, BackendError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn fetch_catalog(&self) -> Result<SchemaCatalog, BackendError> {
        let url = self.url("/api/schema");
        debug!("请求表结构: {}", url);
        let resp = check_status(self.client.get(&url).send().await?).await?;
        Ok(resp.json::<SchemaCatalog>().await?)
    }
}

// 非 2xx 响应携带状态码与响应体返回
async fn check_status(resp: Response) -> Result<Response, BackendError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let message = match resp.text().await {
        Ok(body) if !body.trim().is_empty() => body,
        Ok(_) => status.canonical_reason().unwrap_or_default().to_string(),
        Err(e) => {
            warn!("读取错误响应体失败: {}", e);
            status.canonical_reason().unwrap_or_default().to_string()
        }
    };
    Err(BackendError::Status { status, message })
}

#[async_trait]
impl SchemaProvider for HttpBackend {
    async fn list_tables(&self) -> Result<Vec<String>, BackendError> {
        let catalog = self.fetch_catalog().await?;
        Ok(catalog.into_keys().collect())
    }

    async fn table_columns(&self, table: &str) -> Result<Vec<ColumnDescriptor>, BackendError> {
        let mut catalog = self.fetch_catalog().await?;
        catalog
            .shift_remove(table)
            .ok_or_else(|| BackendError::TableNotFound(table.to_string()))
    }
}

#[async_trait]
impl QueryTransport for HttpBackend {
    async fn preview(&self, request: &QueryRequest) -> Result<PreviewResult, BackendError> {
        let resp = self
            .client
            .post(self.url("/api/query"))
            .json(request)
            .send()
            .await?;
        let result = check_status(resp).await?.json::<PreviewResult>().await?;
        info!(
            "预览完成: table={}, 总数={}, 返回 {} 行",
            request.table,
            result.total_count,
            result.preview_data.len()
        );
        Ok(result)
    }

    async fn download(&self, request: &QueryRequest) -> Result<Vec<u8>, BackendError> {
        let resp = self
            .client
            .post(self.url("/api/download"))
            .json(request)
            .send()
            .await?;
        let bytes = check_status(resp).await?.bytes().await?;
        info!("下载完成: table={}, {} 字节", request.table, bytes.len());
        Ok(bytes.to_vec())
    }
}
