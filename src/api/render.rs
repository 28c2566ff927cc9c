use serde_json::Value;

use crate::core::filter_store::FilterStore;
use crate::core::serializer::is_complete;
use crate::models::query::{Operator, PreviewResult};
use crate::models::schema::ColumnDescriptor;

pub fn render_tables(tables: &[String]) -> String {
    if tables.is_empty() {
        return "no tables available".to_string();
    }
    tables.join("\n")
}

pub fn render_columns(columns: &[ColumnDescriptor]) -> String {
    columns
        .iter()
        .map(|c| format!("{} ({}, {})", c.name, c.data_type, c.category()))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_operators(ops: &[Operator]) -> String {
    ops.iter().map(|o| o.token()).collect::<Vec<_>>().join(" ")
}

/// 首条子句不显示连接词；未填完整的子句标记为 incomplete，提交时会被忽略
pub fn render_filters(store: &FilterStore) -> String {
    if store.is_empty() {
        return "no filters".to_string();
    }
    store
        .clauses()
        .iter()
        .enumerate()
        .map(|(i, c)| {
            let joiner = if i == 0 {
                "    ".to_string()
            } else {
                format!("{:<4}", c.logical().to_string())
            };
            let column = if c.column_name().is_empty() {
                "<column>"
            } else {
                c.column_name()
            };
            let mark = if is_complete(c) { "" } else { "  (incomplete)" };
            format!(
                "{:>2}. {}{} {} {}{}",
                i + 1,
                joiner,
                column,
                c.operator(),
                c.value(),
                mark
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn cell(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// 表头取首行的键，保持后端返回的列顺序
pub fn render_preview(result: &PreviewResult) -> String {
    let Some(first) = result.preview_data.first() else {
        return format!("total rows: {}\n(no rows)", result.total_count);
    };
    let headers: Vec<&String> = first.keys().collect();
    let rows: Vec<Vec<String>> = result
        .preview_data
        .iter()
        .map(|row| {
            headers
                .iter()
                .map(|h| row.get(h.as_str()).map(cell).unwrap_or_default())
                .collect()
        })
        .collect();

    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (w, v) in widths.iter_mut().zip(row) {
            *w = (*w).max(v.chars().count());
        }
    }

    let line = |cells: Vec<&str>| {
        cells
            .iter()
            .zip(&widths)
            .map(|(c, w)| format!("{:<width$}", c, width = *w))
            .collect::<Vec<_>>()
            .join(" | ")
            .trim_end()
            .to_string()
    };

    let mut out = Vec::with_capacity(rows.len() + 3);
    out.push(format!(
        "total rows: {} (showing {})",
        result.total_count,
        rows.len()
    ));
    out.push(line(headers.iter().map(|h| h.as_str()).collect()));
    out.push(
        widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("-+-"),
    );
    for row in &rows {
        out.push(line(row.iter().map(String::as_str).collect()));
    }
    out.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn preview_keeps_backend_column_order() {
        let result: PreviewResult = serde_json::from_value(json!({
            "totalCount": 2,
            "previewData": [
                {"name": "Ana", "id": 1, "hired": null},
                {"name": "Juan", "id": 22, "hired": "2020-05-01"}
            ]
        }))
        .unwrap();
        let out = render_preview(&result);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "total rows: 2 (showing 2)");
        assert_eq!(lines[1], "name | id | hired");
        assert_eq!(lines[3], "Ana  | 1  | null");
        assert_eq!(lines[4], "Juan | 22 | 2020-05-01");
    }

    #[test]
    fn empty_preview() {
        let out = render_preview(&PreviewResult::default());
        assert!(out.contains("(no rows)"));
    }

    #[test]
    fn filters_mark_incomplete_clauses() {
        let mut store = FilterStore::new();
        let a = store.add_clause();
        store
            .set_column(a, ColumnDescriptor::new("name", "varchar"))
            .unwrap();
        store.set_value(a, "Ana").unwrap();
        store.add_clause();

        let out = render_filters(&store);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], " 1.     name = \"Ana\"");
        assert!(lines[1].ends_with("(incomplete)"));
        assert!(lines[1].contains("AND"));
    }
}
