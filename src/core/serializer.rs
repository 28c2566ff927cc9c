use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::core::classifier::DataCategory;
use crate::core::filter_store::FilterClause;
use crate::models::query::{FileType, FilterCondition, FilterValue, QueryRequest};

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%d/%m/%Y", "%Y/%m/%d"];
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];

/// 列与值（区间两端）都已填写的子句才会被提交
pub fn is_complete(clause: &FilterClause) -> bool {
    !clause.column_name().is_empty() && clause.value().is_filled()
}

/// 日期统一为 YYYY-MM-DD；无法识别的写法原样交给后端校验
pub fn normalize_date(raw: &str) -> String {
    let s = raw.trim();
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return d.format("%Y-%m-%d").to_string();
        }
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return dt.date().format("%Y-%m-%d").to_string();
        }
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return dt.date_naive().format("%Y-%m-%d").to_string();
    }
    raw.to_string()
}

fn format_value(category: DataCategory, value: &FilterValue) -> FilterValue {
    match (category, value) {
        (DataCategory::Date, FilterValue::Scalar(v)) => FilterValue::Scalar(normalize_date(v)),
        (DataCategory::Date, FilterValue::Range(lo, hi)) => {
            FilterValue::Range(normalize_date(lo), normalize_date(hi))
        }
        // 数值与文本原样透传，不在客户端解析
        _ => value.clone(),
    }
}

/// 把当前选择序列化为后端请求。空的 `columns` 表示全部列
pub fn serialize(
    table: &str,
    selected_columns: &[String],
    clauses: &[FilterClause],
    file_type: Option<FileType>,
) -> QueryRequest {
    let filters = clauses
        .iter()
        .filter(|c| is_complete(c))
        .map(|c| FilterCondition {
            column: c.column_name().to_string(),
            operator: c.operator(),
            value: format_value(c.category(), c.value()),
            logical: c.logical(),
        })
        .collect();

    QueryRequest {
        table: table.to_string(),
        columns: selected_columns.to_vec(),
        filters,
        file_type,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::filter_store::FilterStore;
    use crate::models::query::{Logical, Operator};
    use crate::models::schema::ColumnDescriptor;
    use serde_json::json;

    fn employees_store() -> FilterStore {
        let mut store = FilterStore::new();
        let c1 = store.add_clause();
        store.set_column(c1, ColumnDescriptor::new("name", "varchar")).unwrap();
        store.set_operator(c1, Operator::Contains).unwrap();
        store.set_value(c1, "an").unwrap();

        let c2 = store.add_clause();
        store.set_column(c2, ColumnDescriptor::new("hired", "date")).unwrap();
        store.set_operator(c2, Operator::Between).unwrap();
        store.set_range_value(c2, 0, "2020-01-01").unwrap();
        store.set_range_value(c2, 1, "2020-12-31").unwrap();
        store.set_logical(c2, Logical::And).unwrap();
        store
    }

    #[test]
    fn employees_scenario() {
        let store = employees_store();
        let req = serialize("employees", &[], store.clauses(), None);
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({
                "table": "employees",
                "columns": [],
                "filters": [
                    {"column": "name", "operator": "contains", "value": "an", "logical": "AND"},
                    {"column": "hired", "operator": "between", "value": ["2020-01-01", "2020-12-31"], "logical": "AND"}
                ]
            })
        );
    }

    #[test]
    fn clause_without_value_is_dropped() {
        let mut store = FilterStore::new();
        let id = store.add_clause();
        store.set_column(id, ColumnDescriptor::new("name", "varchar")).unwrap();
        let req = serialize("employees", &[], store.clauses(), None);
        assert!(req.filters.is_empty());
    }

    #[test]
    fn incomplete_clauses_dropped_in_any_position() {
        let mut store = FilterStore::new();
        store.add_clause();

        let a = store.add_clause();
        store.set_column(a, ColumnDescriptor::new("id", "int4")).unwrap();
        store.set_value(a, "7").unwrap();

        let half_range = store.add_clause();
        store.set_column(half_range, ColumnDescriptor::new("id", "int4")).unwrap();
        store.set_operator(half_range, Operator::Between).unwrap();
        store.set_range_value(half_range, 0, "1").unwrap();

        let b = store.add_clause();
        store.set_column(b, ColumnDescriptor::new("name", "text")).unwrap();
        store.set_value(b, "Ana").unwrap();
        store.set_logical(b, Logical::Or).unwrap();

        let no_column = store.add_clause();
        store.set_value(no_column, "orphan").unwrap();

        let req = serialize("employees", &["id".into()], store.clauses(), None);
        let cols: Vec<_> = req.filters.iter().map(|f| f.column.as_str()).collect();
        assert_eq!(cols, vec!["id", "name"]);
        assert_eq!(req.filters[0].value, FilterValue::Scalar("7".into()));
        assert_eq!(req.filters[1].logical, Logical::Or);
        assert_eq!(req.columns, vec!["id".to_string()]);
    }

    #[test]
    fn serialize_is_idempotent() {
        let store = employees_store();
        let first = serialize("employees", &[], store.clauses(), Some(FileType::Csv));
        let second = serialize("employees", &[], store.clauses(), Some(FileType::Csv));
        assert_eq!(first, second);
    }

    #[test]
    fn date_values_are_normalized() {
        let mut store = FilterStore::new();
        let id = store.add_clause();
        store.set_column(id, ColumnDescriptor::new("hired", "timestamp")).unwrap();
        store.set_value(id, "31/12/2020").unwrap();

        let t = store.add_clause();
        store.set_column(t, ColumnDescriptor::new("code", "varchar")).unwrap();
        store.set_value(t, "31/12/2020").unwrap();

        let req = serialize("employees", &[], store.clauses(), None);
        assert_eq!(req.filters[0].value, FilterValue::Scalar("2020-12-31".into()));
        assert_eq!(req.filters[1].value, FilterValue::Scalar("31/12/2020".into()));
    }

    #[test]
    fn normalize_date_variants() {
        assert_eq!(normalize_date("2021-03-04"), "2021-03-04");
        assert_eq!(normalize_date("2021/03/04"), "2021-03-04");
        assert_eq!(normalize_date("2021-03-04 10:11:12"), "2021-03-04");
        assert_eq!(normalize_date("2021-03-04T10:11:12"), "2021-03-04");
        assert_eq!(normalize_date("2021-03-04T10:11:12+02:00"), "2021-03-04");
        assert_eq!(normalize_date("yesterday"), "yesterday");
    }
}
