//! Compiled queries.
//!
//! A [`QuerySpec`] is validated once against the target type's registry and
//! turned into a [`CompiledQuery`] that can be evaluated repeatedly. Unknown
//! filter paths compile to a criterion that never matches; unknown sort
//! fields are rejected here.

use super::like::compile_like;
use crate::domain::{
    Criterion, FieldRef, FieldValue, Operand, Operator, QueryError, QuerySpec, Queryable,
    SortOrder,
};
use regex::Regex;
use std::cmp::Ordering;

enum Predicate<T> {
    /// Path not exposed by the type.
    Never,
    Eq(FieldRef<T>, FieldValue),
    Like(FieldRef<T>, Regex),
    In(FieldRef<T>, Vec<FieldValue>),
}

impl<T> Predicate<T> {
    fn compile(
        criterion: &Criterion,
        resolve: impl Fn(&str) -> Option<FieldRef<T>>,
    ) -> Result<Self, QueryError> {
        criterion.validate()?;
        let Some(field) = resolve(&criterion.left_operand) else {
            return Ok(Self::Never);
        };

        let predicate = match (criterion.operator, &criterion.right_operand) {
            (Operator::Eq, Operand::Value(value)) => Self::Eq(field, value.clone()),
            (Operator::Like, Operand::Value(FieldValue::Str(pattern))) => {
                Self::Like(field, compile_like(pattern)?)
            }
            (Operator::In, Operand::List(values)) => Self::In(field, values.clone()),
            // validate() rejects every other shape
            _ => {
                return Err(QueryError::InvalidOperand {
                    operator: criterion.operator,
                    reason: "operand does not fit operator",
                })
            }
        };
        Ok(predicate)
    }

    fn test(&self, item: &T) -> bool {
        match self {
            Self::Never => false,
            Self::Eq(field, expected) => field
                .values(item)
                .iter()
                .any(|v| v.loosely_equals(expected)),
            Self::Like(field, regex) => field
                .values(item)
                .iter()
                .filter(|v| !matches!(v, FieldValue::Null))
                .any(|v| regex.is_match(&v.canonical())),
            Self::In(field, allowed) => field
                .values(item)
                .iter()
                .any(|v| allowed.iter().any(|a| v.loosely_equals(a))),
        }
    }
}

pub struct CompiledQuery<T> {
    predicates: Vec<Predicate<T>>,
    sort: Option<(FieldRef<T>, SortOrder)>,
    offset: usize,
    limit: usize,
}

impl<T: Queryable> CompiledQuery<T> {
    /// Compiles a full query against `T`'s registry.
    pub fn compile(spec: &QuerySpec) -> Result<Self, QueryError> {
        let registry = T::registry();
        let predicates = spec
            .filter
            .iter()
            .map(|c| Predicate::compile(c, |path| registry.resolve(path)))
            .collect::<Result<Vec<_>, _>>()?;

        let sort = match &spec.sort_field {
            Some(field) => {
                let resolved =
                    registry
                        .resolve(field)
                        .ok_or_else(|| QueryError::UnsupportedSortField {
                            field: field.clone(),
                        })?;
                Some((resolved, spec.sort_order))
            }
            None => None,
        };

        Ok(Self {
            predicates,
            sort,
            offset: spec.offset,
            limit: spec.limit,
        })
    }

    /// Compiles a filter without paging or sorting.
    pub fn filter(criteria: &[Criterion]) -> Result<Self, QueryError> {
        Self::compile(&QuerySpec::unbounded(criteria.to_vec()))
    }
}

impl<T> CompiledQuery<T> {
    /// All criteria hold (an empty filter matches everything).
    pub fn matches(&self, item: &T) -> bool {
        self.predicates.iter().all(|p| p.test(item))
    }

    /// Stable sort by the compiled sort field, if any.
    pub fn sort<'a>(&self, items: &mut [&'a T]) {
        let Some((field, order)) = &self.sort else {
            return;
        };
        items.sort_by(|a, b| {
            let ordering = compare_keys(field.first(a), field.first(b));
            match order {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            }
        });
    }

    /// Filter, sort, then cut the `[offset, offset + limit)` window.
    pub fn apply<'a, I>(&self, items: I) -> Vec<&'a T>
    where
        I: IntoIterator<Item = &'a T>,
        T: 'a,
    {
        let mut matching: Vec<&'a T> = items.into_iter().filter(|i| self.matches(i)).collect();
        self.sort(&mut matching);
        matching
            .into_iter()
            .skip(self.offset)
            .take(self.limit)
            .collect()
    }
}

fn compare_keys(a: Option<FieldValue>, b: Option<FieldValue>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a), Some(b)) => a.compare(&b),
    }
}

/// Runs `spec` over `items`.
pub fn execute<'a, T, I>(items: I, spec: &QuerySpec) -> Result<Vec<&'a T>, QueryError>
where
    T: Queryable,
    I: IntoIterator<Item = &'a T>,
{
    Ok(CompiledQuery::<T>::compile(spec)?.apply(items))
}

/// Number of `items` matching every criterion.
pub fn count<'a, T, I>(items: I, criteria: &[Criterion]) -> Result<usize, QueryError>
where
    T: Queryable,
    I: IntoIterator<Item = &'a T>,
{
    let query = CompiledQuery::<T>::filter(criteria)?;
    Ok(items.into_iter().filter(|i| query.matches(i)).count())
}
