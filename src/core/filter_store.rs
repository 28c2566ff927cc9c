use tracing::debug;
use uuid::Uuid;

use crate::core::classifier::{classify, DataCategory};
use crate::core::operators::{default_operator, is_allowed};
use crate::models::query::{FilterValue, Logical, Operator};
use crate::models::schema::ColumnDescriptor;

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("filter {0} not found")]
    ClauseNotFound(Uuid),
    #[error("operator '{operator}' is not available for {category} columns")]
    OperatorNotAllowed {
        operator: Operator,
        category: DataCategory,
    },
    #[error("operator '{operator}' expects a {expected} value")]
    ArityMismatch { operator: Operator, expected: &'static str },
    #[error("range index {0} out of bounds, expected 0 or 1")]
    RangeIndexOutOfBounds(usize),
}

/// 一条过滤子句。字段只能经由 `FilterStore` 修改，以保证值的形状始终与算子匹配
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterClause {
    id: Uuid,
    column: Option<ColumnDescriptor>,
    operator: Operator,
    value: FilterValue,
    logical: Logical,
}

impl FilterClause {
    fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            column: None,
            operator: Operator::Equals,
            value: FilterValue::Scalar(String::new()),
            logical: Logical::And,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn column(&self) -> Option<&ColumnDescriptor> {
        self.column.as_ref()
    }

    pub fn column_name(&self) -> &str {
        self.column.as_ref().map(|c| c.name.as_str()).unwrap_or("")
    }

    pub fn operator(&self) -> Operator {
        self.operator
    }

    pub fn value(&self) -> &FilterValue {
        &self.value
    }

    pub fn logical(&self) -> Logical {
        self.logical
    }

    /// 未选列时按空类型归类（Text）
    pub fn category(&self) -> DataCategory {
        classify(self.column.as_ref().map(|c| c.data_type.as_str()).unwrap_or(""))
    }

    fn reset(&mut self, operator: Operator) {
        self.operator = operator;
        self.value = FilterValue::empty_for(operator.arity());
    }
}

/// 有序的过滤子句集合
#[derive(Debug, Default)]
pub struct FilterStore {
    clauses: Vec<FilterClause>,
}

impl FilterStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clauses(&self) -> &[FilterClause] {
        &self.clauses
    }

    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn get(&self, id: Uuid) -> Option<&FilterClause> {
        self.clauses.iter().find(|c| c.id == id)
    }

    fn get_mut(&mut self, id: Uuid) -> Result<&mut FilterClause, StoreError> {
        self.clauses
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(StoreError::ClauseNotFound(id))
    }

    pub fn add_clause(&mut self) -> Uuid {
        let clause = FilterClause::new();
        let id = clause.id;
        self.clauses.push(clause);
        debug!("新增过滤子句: id={}, 共 {} 条", id, self.clauses.len());
        id
    }

    pub fn remove_clause(&mut self, id: Uuid) -> Result<FilterClause, StoreError> {
        let idx = self
            .clauses
            .iter()
            .position(|c| c.id == id)
            .ok_or(StoreError::ClauseNotFound(id))?;
        Ok(self.clauses.remove(idx))
    }

    /// 换列后若类别改变，算子回到该类别默认值且值清空；类别不变则保留原算子与值
    pub fn set_column(&mut self, id: Uuid, column: ColumnDescriptor) -> Result<(), StoreError> {
        let clause = self.get_mut(id)?;
        let before = clause.category();
        let after = column.category();
        clause.column = Some(column);

        if before != after || !is_allowed(after, clause.operator) {
            debug!("子句 {} 类别 {} -> {}，重置算子", id, before, after);
            clause.reset(default_operator(after));
        } else if clause.value.arity() != clause.operator.arity() {
            clause.value = FilterValue::empty_for(clause.operator.arity());
        }
        Ok(())
    }

    /// 任何算子变化都会清空值，并按新算子的 arity 重塑
    pub fn set_operator(&mut self, id: Uuid, operator: Operator) -> Result<(), StoreError> {
        let clause = self.get_mut(id)?;
        let category = clause.category();
        if !is_allowed(category, operator) {
            return Err(StoreError::OperatorNotAllowed { operator, category });
        }
        if clause.operator != operator {
            clause.reset(operator);
        }
        Ok(())
    }

    pub fn set_value(&mut self, id: Uuid, value: impl Into<String>) -> Result<(), StoreError> {
        let clause = self.get_mut(id)?;
        match &mut clause.value {
            FilterValue::Scalar(v) => {
                *v = value.into();
                Ok(())
            }
            FilterValue::Range(..) => Err(StoreError::ArityMismatch {
                operator: clause.operator,
                expected: "range",
            }),
        }
    }

    pub fn set_range_value(
        &mut self,
        id: Uuid,
        index: usize,
        value: impl Into<String>,
    ) -> Result<(), StoreError> {
        let clause = self.get_mut(id)?;
        let FilterValue::Range(lo, hi) = &mut clause.value else {
            return Err(StoreError::ArityMismatch {
                operator: clause.operator,
                expected: "scalar",
            });
        };
        match index {
            0 => *lo = value.into(),
            1 => *hi = value.into(),
            other => return Err(StoreError::RangeIndexOutOfBounds(other)),
        }
        Ok(())
    }

    pub fn set_logical(&mut self, id: Uuid, logical: Logical) -> Result<(), StoreError> {
        self.get_mut(id)?.logical = logical;
        Ok(())
    }

    pub fn clear(&mut self) {
        self.clauses.clear();
    }
}
