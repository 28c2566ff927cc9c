use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// 算子消费一个值还是一对值
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Scalar,
    Range,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    #[serde(rename = "=")]
    Equals,
    #[serde(rename = "!=")]
    NotEquals,
    #[serde(rename = ">")]
    GreaterThan,
    #[serde(rename = ">=")]
    GreaterOrEqual,
    #[serde(rename = "<")]
    LessThan,
    #[serde(rename = "<=")]
    LessOrEqual,
    #[serde(rename = "startswith")]
    StartsWith,
    #[serde(rename = "endswith")]
    EndsWith,
    #[serde(rename = "contains")]
    Contains,
    #[serde(rename = "between")]
    Between,
}

impl Operator {
    pub fn arity(self) -> Arity {
        match self {
            Operator::Between => Arity::Range,
            _ => Arity::Scalar,
        }
    }

    /// 与后端约定的线上记号
    pub fn token(self) -> &'static str {
        match self {
            Operator::Equals => "=",
            Operator::NotEquals => "!=",
            Operator::GreaterThan => ">",
            Operator::GreaterOrEqual => ">=",
            Operator::LessThan => "<",
            Operator::LessOrEqual => "<=",
            Operator::StartsWith => "startswith",
            Operator::EndsWith => "endswith",
            Operator::Contains => "contains",
            Operator::Between => "between",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown operator '{0}'")]
pub struct ParseOperatorError(String);

impl FromStr for Operator {
    type Err = ParseOperatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let op = match s.trim().to_lowercase().as_str() {
            "=" | "==" | "eq" => Operator::Equals,
            "!=" | "<>" | "ne" => Operator::NotEquals,
            ">" | "gt" => Operator::GreaterThan,
            ">=" | "gte" => Operator::GreaterOrEqual,
            "<" | "lt" => Operator::LessThan,
            "<=" | "lte" => Operator::LessOrEqual,
            "startswith" => Operator::StartsWith,
            "endswith" => Operator::EndsWith,
            "contains" => Operator::Contains,
            "between" => Operator::Between,
            _ => return Err(ParseOperatorError(s.to_string())),
        };
        Ok(op)
    }
}

/// 与前一条子句的连接词
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Logical {
    #[default]
    And,
    Or,
}

impl fmt::Display for Logical {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Logical::And => f.write_str("AND"),
            Logical::Or => f.write_str("OR"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown connective '{0}', expected AND or OR")]
pub struct ParseLogicalError(String);

impl FromStr for Logical {
    type Err = ParseLogicalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "AND" => Ok(Logical::And),
            "OR" => Ok(Logical::Or),
            _ => Err(ParseLogicalError(s.to_string())),
        }
    }
}

/// 值的形状与算子的 arity 一一对应：标量为字符串，区间为二元数组
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum FilterValue {
    Scalar(String),
    Range(String, String),
}

impl FilterValue {
    pub fn empty_for(arity: Arity) -> Self {
        match arity {
            Arity::Scalar => FilterValue::Scalar(String::new()),
            Arity::Range => FilterValue::Range(String::new(), String::new()),
        }
    }

    pub fn arity(&self) -> Arity {
        match self {
            FilterValue::Scalar(_) => Arity::Scalar,
            FilterValue::Range(..) => Arity::Range,
        }
    }

    /// 区间要求两端都非空
    pub fn is_filled(&self) -> bool {
        match self {
            FilterValue::Scalar(v) => !v.is_empty(),
            FilterValue::Range(lo, hi) => !lo.is_empty() && !hi.is_empty(),
        }
    }
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterValue::Scalar(v) => write!(f, "{:?}", v),
            FilterValue::Range(lo, hi) => write!(f, "{:?} .. {:?}", lo, hi),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct FilterCondition {
    pub column: String,
    pub operator: Operator,
    pub value: FilterValue,
    pub logical: Logical,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    Csv,
    Xlsx,
}

impl FileType {
    /// 下载时固定的保存文件名
    pub fn file_name(self) -> &'static str {
        match self {
            FileType::Csv => "resultado.csv",
            FileType::Xlsx => "resultado.xlsx",
        }
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileType::Csv => f.write_str("csv"),
            FileType::Xlsx => f.write_str("xlsx"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown file type '{0}', expected csv or xlsx")]
pub struct ParseFileTypeError(String);

impl FromStr for FileType {
    type Err = ParseFileTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "csv" => Ok(FileType::Csv),
            "xlsx" => Ok(FileType::Xlsx),
            _ => Err(ParseFileTypeError(s.to_string())),
        }
    }
}

/// 提交给后端 `/api/query` 与 `/api/download` 的请求体
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct QueryRequest {
    pub table: String,
    #[serde(default)]
    pub columns: Vec<String>,
    #[serde(default)]
    pub filters: Vec<FilterCondition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_type: Option<FileType>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct PreviewResult {
    pub total_count: u64,
    #[serde(default)]
    pub preview_data: Vec<Map<String, Value>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn range_value_serializes_as_array() {
        let cond = FilterCondition {
            column: "hired".into(),
            operator: Operator::Between,
            value: FilterValue::Range("2020-01-01".into(), "2020-12-31".into()),
            logical: Logical::Or,
        };
        assert_eq!(
            serde_json::to_value(&cond).unwrap(),
            json!({
                "column": "hired",
                "operator": "between",
                "value": ["2020-01-01", "2020-12-31"],
                "logical": "OR"
            })
        );
    }

    #[test]
    fn preview_request_omits_file_type() {
        let req = QueryRequest {
            table: "employees".into(),
            columns: vec![],
            filters: vec![],
            file_type: None,
        };
        let v = serde_json::to_value(&req).unwrap();
        assert!(v.get("file_type").is_none());

        let req = QueryRequest {
            file_type: Some(FileType::Xlsx),
            ..req
        };
        assert_eq!(serde_json::to_value(&req).unwrap()["file_type"], "xlsx");
    }

    #[test]
    fn operator_parses_tokens_and_names() {
        assert_eq!(">=".parse::<Operator>().unwrap(), Operator::GreaterOrEqual);
        assert_eq!("Between".parse::<Operator>().unwrap(), Operator::Between);
        assert_eq!("contains".parse::<Operator>().unwrap(), Operator::Contains);
        assert!("like".parse::<Operator>().is_err());
        assert_eq!("or".parse::<Logical>().unwrap(), Logical::Or);
    }

    #[test]
    fn preview_result_reads_camel_case() {
        let body = json!({
            "totalCount": 42,
            "previewData": [{"id": 1, "name": "Ana"}]
        });
        let res: PreviewResult = serde_json::from_value(body).unwrap();
        assert_eq!(res.total_count, 42);
        assert_eq!(res.preview_data.len(), 1);
        assert_eq!(res.preview_data[0]["name"], "Ana");
    }
}
