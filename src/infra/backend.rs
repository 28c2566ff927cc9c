use async_trait::async_trait;

use crate::models::query::{PreviewResult, QueryRequest};
use crate::models::schema::ColumnDescriptor;

#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("could not reach the backend: {0}")]
    Http(#[from] reqwest::Error),
    #[error("backend answered {status}: {message}")]
    Status {
        status: reqwest::StatusCode,
        message: String,
    },
    #[error("table '{0}' is not known to the backend")]
    TableNotFound(String),
}

/// 表结构来源
#[async_trait]
pub trait SchemaProvider {
    async fn list_tables(&self) -> Result<Vec<String>, BackendError>;

    async fn table_columns(&self, table: &str) -> Result<Vec<ColumnDescriptor>, BackendError>;
}

/// 查询提交通道：预览返回行集，下载返回文件字节
#[async_trait]
pub trait QueryTransport {
    async fn preview(&self, request: &QueryRequest) -> Result<PreviewResult, BackendError>;

    async fn download(&self, request: &QueryRequest) -> Result<Vec<u8>, BackendError>;
}
