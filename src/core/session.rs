use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::core::filter_store::{FilterClause, FilterStore, StoreError};
use crate::core::operators::operators_for;
use crate::core::serializer::serialize;
use crate::infra::backend::{BackendError, QueryTransport, SchemaProvider};
use crate::models::query::{FileType, Logical, Operator, PreviewResult, QueryRequest};
use crate::models::schema::{ColumnDescriptor, TableColumns};

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("please select a table first")]
    NoTableSelected,
    #[error("unknown table '{0}'")]
    UnknownTable(String),
    #[error("table '{table}' has no column '{column}'")]
    UnknownColumn { table: String, column: String },
    #[error("no filter at position {0}")]
    NoSuchPosition(usize),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// 一次交互式建查询的全部状态：可选表、当前表的列目录、选中列与过滤子句
#[derive(Debug, Default)]
pub struct QuerySession {
    tables: Vec<String>,
    current: Option<TableColumns>,
    selected_columns: Vec<String>,
    filters: FilterStore,
}

impl QuerySession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tables(&self) -> &[String] {
        &self.tables
    }

    pub fn selected_table(&self) -> Option<&str> {
        self.current.as_ref().map(|t| t.table())
    }

    pub fn columns(&self) -> &[ColumnDescriptor] {
        self.current.as_ref().map(|t| t.columns()).unwrap_or(&[])
    }

    pub fn selected_columns(&self) -> &[String] {
        &self.selected_columns
    }

    pub fn filters(&self) -> &FilterStore {
        &self.filters
    }

    #[instrument(skip_all)]
    pub async fn load_tables<P>(&mut self, provider: &P) -> Result<&[String], SessionError>
    where
        P: SchemaProvider + Sync + ?Sized,
    {
        let tables = provider.list_tables().await?;
        info!("已加载 {} 张表", tables.len());
        self.tables = tables;
        Ok(&self.tables)
    }

    /// 换表时整体替换列目录，并清空选中列与全部过滤子句；拉取失败则状态不变
    #[instrument(skip(self, provider))]
    pub async fn select_table<P>(&mut self, provider: &P, table: &str) -> Result<(), SessionError>
    where
        P: SchemaProvider + Sync + ?Sized,
    {
        if !self.tables.iter().any(|t| t == table) {
            return Err(SessionError::UnknownTable(table.to_string()));
        }
        let columns = provider.table_columns(table).await?;
        info!("选中表 {}，共 {} 列", table, columns.len());

        self.current = Some(TableColumns::new(table, columns));
        self.selected_columns.clear();
        self.filters.clear();
        Ok(())
    }

    /// 空列表表示全部列；重复项只保留首次出现
    pub fn select_columns<I, S>(&mut self, names: I) -> Result<(), SessionError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let current = self.current.as_ref().ok_or(SessionError::NoTableSelected)?;
        let mut picked: Vec<String> = Vec::new();
        for name in names {
            let name = name.into();
            if current.find(&name).is_none() {
                return Err(SessionError::UnknownColumn {
                    table: current.table().to_string(),
                    column: name,
                });
            }
            if !picked.contains(&name) {
                picked.push(name);
            }
        }
        self.selected_columns = picked;
        Ok(())
    }

    /// 1 起始的位置换成子句 id
    pub fn clause_id_at(&self, position: usize) -> Result<Uuid, SessionError> {
        position
            .checked_sub(1)
            .and_then(|i| self.filters.clauses().get(i))
            .map(FilterClause::id)
            .ok_or(SessionError::NoSuchPosition(position))
    }

    pub fn add_filter(&mut self) -> Result<Uuid, SessionError> {
        if self.current.is_none() {
            return Err(SessionError::NoTableSelected);
        }
        Ok(self.filters.add_clause())
    }

    pub fn remove_filter(&mut self, id: Uuid) -> Result<(), SessionError> {
        self.filters.remove_clause(id)?;
        Ok(())
    }

    pub fn set_filter_column(&mut self, id: Uuid, column: &str) -> Result<(), SessionError> {
        let current = self.current.as_ref().ok_or(SessionError::NoTableSelected)?;
        let descriptor = current
            .find(column)
            .cloned()
            .ok_or_else(|| SessionError::UnknownColumn {
                table: current.table().to_string(),
                column: column.to_string(),
            })?;
        self.filters.set_column(id, descriptor)?;
        Ok(())
    }

    pub fn set_filter_operator(&mut self, id: Uuid, operator: Operator) -> Result<(), SessionError> {
        self.filters.set_operator(id, operator).map_err(|e| {
            warn!("拒绝算子变更: {}", e);
            SessionError::from(e)
        })
    }

    pub fn set_filter_value(&mut self, id: Uuid, value: &str) -> Result<(), SessionError> {
        self.filters.set_value(id, value)?;
        Ok(())
    }

    pub fn set_filter_range_value(
        &mut self,
        id: Uuid,
        index: usize,
        value: &str,
    ) -> Result<(), SessionError> {
        self.filters.set_range_value(id, index, value)?;
        Ok(())
    }

    pub fn set_filter_logical(&mut self, id: Uuid, logical: Logical) -> Result<(), SessionError> {
        self.filters.set_logical(id, logical)?;
        Ok(())
    }

    pub fn clear_filters(&mut self) {
        self.filters.clear();
    }

    /// 子句当前可选的算子，随列类型实时推导
    pub fn operators_for_filter(&self, id: Uuid) -> Result<&'static [Operator], SessionError> {
        let clause = self
            .filters
            .get(id)
            .ok_or(StoreError::ClauseNotFound(id))?;
        Ok(operators_for(clause.category()))
    }

    pub fn build_request(&self, file_type: Option<FileType>) -> Result<QueryRequest, SessionError> {
        let current = self.current.as_ref().ok_or(SessionError::NoTableSelected)?;
        Ok(serialize(
            current.table(),
            &self.selected_columns,
            self.filters.clauses(),
            file_type,
        ))
    }

    #[instrument(skip_all)]
    pub async fn preview<T>(&mut self, transport: &T) -> Result<PreviewResult, SessionError>
    where
        T: QueryTransport + Sync + ?Sized,
    {
        let request = self.build_request(None)?;
        info!(
            "提交预览: table={}, 过滤条件 {} 条",
            request.table,
            request.filters.len()
        );
        Ok(transport.preview(&request).await?)
    }

    #[instrument(skip(self, transport))]
    pub async fn download<T>(
        &mut self,
        transport: &T,
        file_type: FileType,
    ) -> Result<Vec<u8>, SessionError>
    where
        T: QueryTransport + Sync + ?Sized,
    {
        let request = self.build_request(Some(file_type))?;
        Ok(transport.download(&request).await?)
    }
}
