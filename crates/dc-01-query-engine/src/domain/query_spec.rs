//! # Query Specification
//!
//! Filter, paging window and single-field sort for store queries.

use super::criterion::Criterion;
use serde::{Deserialize, Serialize};

/// Page size used when a query does not ask for one.
pub const DEFAULT_LIMIT: usize = 50;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct QuerySpec {
    pub filter: Vec<Criterion>,
    pub offset: usize,
    pub limit: usize,
    pub sort_field: Option<String>,
    pub sort_order: SortOrder,
}

impl Default for QuerySpec {
    fn default() -> Self {
        Self {
            filter: Vec::new(),
            offset: 0,
            limit: DEFAULT_LIMIT,
            sort_field: None,
            sort_order: SortOrder::Asc,
        }
    }
}

impl QuerySpec {
    pub fn builder() -> QuerySpecBuilder {
        QuerySpecBuilder::default()
    }

    /// Unpaged query over everything matching `filter`.
    pub fn unbounded(filter: Vec<Criterion>) -> Self {
        Self {
            filter,
            limit: usize::MAX,
            ..Self::default()
        }
    }
}

/// Builder for [`QuerySpec`].
#[derive(Debug, Clone, Default)]
pub struct QuerySpecBuilder {
    spec: QuerySpec,
}

impl QuerySpecBuilder {
    pub fn filter(mut self, criterion: Criterion) -> Self {
        self.spec.filter.push(criterion);
        self
    }

    pub fn filters(mut self, criteria: impl IntoIterator<Item = Criterion>) -> Self {
        self.spec.filter.extend(criteria);
        self
    }

    pub fn offset(mut self, offset: usize) -> Self {
        self.spec.offset = offset;
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.spec.limit = limit;
        self
    }

    pub fn sort(mut self, field: impl Into<String>, order: SortOrder) -> Self {
        self.spec.sort_field = Some(field.into());
        self.spec.sort_order = order;
        self
    }

    pub fn build(self) -> QuerySpec {
        self.spec
    }
}
