use crate::core::classifier::DataCategory;
use crate::models::query::Operator;

// 顺序即展示顺序，首项是重置时的默认算子
const COMPARABLE: [Operator; 7] = [
    Operator::Equals,
    Operator::NotEquals,
    Operator::GreaterThan,
    Operator::LessThan,
    Operator::GreaterOrEqual,
    Operator::LessOrEqual,
    Operator::Between,
];

const TEXTUAL: [Operator; 5] = [
    Operator::Equals,
    Operator::NotEquals,
    Operator::StartsWith,
    Operator::EndsWith,
    Operator::Contains,
];

/// 某类别下合法的算子，按规范顺序返回
pub fn operators_for(category: DataCategory) -> &'static [Operator] {
    match category {
        DataCategory::Numeric | DataCategory::Date => &COMPARABLE,
        DataCategory::Text => &TEXTUAL,
    }
}

pub fn default_operator(category: DataCategory) -> Operator {
    operators_for(category)[0]
}

pub fn is_allowed(category: DataCategory, operator: Operator) -> bool {
    operators_for(category).contains(&operator)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::query::Arity;

    const ALL: [DataCategory; 3] = [DataCategory::Numeric, DataCategory::Date, DataCategory::Text];

    #[test]
    fn every_category_starts_with_equals() {
        for c in ALL {
            assert!(!operators_for(c).is_empty());
            assert_eq!(operators_for(c)[0], Operator::Equals);
            assert_eq!(default_operator(c), Operator::Equals);
        }
    }

    #[test]
    fn dates_share_the_numeric_set() {
        assert_eq!(
            operators_for(DataCategory::Date),
            operators_for(DataCategory::Numeric)
        );
    }

    #[test]
    fn text_has_no_range_or_ordering() {
        let text = operators_for(DataCategory::Text);
        assert!(text.iter().all(|op| op.arity() == Arity::Scalar));
        assert!(!is_allowed(DataCategory::Text, Operator::Between));
        assert!(!is_allowed(DataCategory::Text, Operator::GreaterThan));
        assert!(is_allowed(DataCategory::Text, Operator::Contains));
        assert!(!is_allowed(DataCategory::Numeric, Operator::Contains));
    }
}
