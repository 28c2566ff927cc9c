use std::fmt;

/// 列的语义类别，决定可用的算子集合
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataCategory {
    Numeric,
    Date,
    Text,
}

impl fmt::Display for DataCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataCategory::Numeric => f.write_str("numeric"),
            DataCategory::Date => f.write_str("date"),
            DataCategory::Text => f.write_str("text"),
        }
    }
}

const NUMERIC_MARKERS: [&str; 3] = ["int", "numeric", "double"];
const DATE_MARKERS: [&str; 2] = ["date", "timestamp"];

/// 按子串标记（不区分大小写）把数据库类型名归类，空串与未知类型归为 Text
pub fn classify(data_type: &str) -> DataCategory {
    let t = data_type.to_lowercase();
    if NUMERIC_MARKERS.iter().any(|m| t.contains(m)) {
        DataCategory::Numeric
    } else if DATE_MARKERS.iter().any(|m| t.contains(m)) {
        DataCategory::Date
    } else {
        DataCategory::Text
    }
}
