use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::core::classifier::{classify, DataCategory};

/// 后端 information_schema 中的一列
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ColumnDescriptor {
    #[serde(rename = "column_name", alias = "name")]
    pub name: String,
    pub data_type: String,
}

impl ColumnDescriptor {
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
        }
    }

    /// 每次读取时重新推导，不缓存
    pub fn category(&self) -> DataCategory {
        classify(&self.data_type)
    }
}

/// `/api/schema` 的完整响应：表名 -> 有序列清单，表的顺序与后端返回一致
pub type SchemaCatalog = IndexMap<String, Vec<ColumnDescriptor>>;

/// 当前选中表的列目录，每次选表时整体替换
#[derive(Debug, Default, Clone)]
pub struct TableColumns {
    table: String,
    columns: Vec<ColumnDescriptor>,
}

impl TableColumns {
    pub fn new(table: impl Into<String>, columns: Vec<ColumnDescriptor>) -> Self {
        Self {
            table: table.into(),
            columns,
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn columns(&self) -> &[ColumnDescriptor] {
        &self.columns
    }

    pub fn find(&self, name: &str) -> Option<&ColumnDescriptor> {
        self.columns.iter().find(|c| c.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn catalog_keeps_backend_table_order() {
        let body = json!({
            "principal": [{"column_name": "FOLIO", "data_type": "integer"}],
            "corporaciones": [{"column_name": "CORPORACION", "data_type": "text"}],
            "comentarios": [{"name": "FECHA", "data_type": "date"}]
        });
        let catalog: SchemaCatalog = serde_json::from_value(body).unwrap();
        let tables: Vec<&str> = catalog.keys().map(String::as_str).collect();
        assert_eq!(tables, vec!["principal", "corporaciones", "comentarios"]);
        assert_eq!(catalog["comentarios"][0], ColumnDescriptor::new("FECHA", "date"));
    }
}
