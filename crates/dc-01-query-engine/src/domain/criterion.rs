//! # Criterion
//!
//! A single filter predicate `(left_operand, operator, right_operand)` over a
//! dotted field path.

use super::errors::QueryError;
use super::value::FieldValue;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    /// Equality (`=`).
    #[serde(rename = "=")]
    Eq,
    /// SQL-style pattern match (`like`).
    #[serde(rename = "like")]
    Like,
    /// Membership in a list (`in`).
    #[serde(rename = "in")]
    In,
}

impl Operator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Like => "like",
            Self::In => "in",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operator {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "=" => Ok(Self::Eq),
            "like" => Ok(Self::Like),
            "in" => Ok(Self::In),
            _ => Err(QueryError::UnsupportedOperator(s.to_string())),
        }
    }
}

/// Right-hand side of a criterion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Operand {
    Value(FieldValue),
    List(Vec<FieldValue>),
}

macro_rules! operand_from_scalar {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Operand {
                fn from(value: $ty) -> Self {
                    Self::Value(value.into())
                }
            }
        )*
    };
}

operand_from_scalar!(FieldValue, &str, String, bool, i32, i64, u32, u64);

impl From<Vec<FieldValue>> for Operand {
    fn from(values: Vec<FieldValue>) -> Self {
        Self::List(values)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Criterion {
    pub left_operand: String,
    pub operator: Operator,
    pub right_operand: Operand,
}

impl Criterion {
    /// Builds a criterion from an operator string, rejecting unknown
    /// operators and operands of the wrong shape.
    pub fn new(
        left_operand: impl Into<String>,
        operator: &str,
        right_operand: Operand,
    ) -> Result<Self, QueryError> {
        let operator = operator.parse::<Operator>()?;
        let criterion = Self {
            left_operand: left_operand.into(),
            operator,
            right_operand,
        };
        criterion.validate()?;
        Ok(criterion)
    }

    pub fn eq(left_operand: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        Self {
            left_operand: left_operand.into(),
            operator: Operator::Eq,
            right_operand: Operand::Value(value.into()),
        }
    }

    pub fn like(left_operand: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self {
            left_operand: left_operand.into(),
            operator: Operator::Like,
            right_operand: Operand::Value(FieldValue::Str(pattern.into())),
        }
    }

    pub fn is_in<I, V>(left_operand: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<FieldValue>,
    {
        Self {
            left_operand: left_operand.into(),
            operator: Operator::In,
            right_operand: Operand::List(values.into_iter().map(Into::into).collect()),
        }
    }

    /// Checks that the operand shape fits the operator.
    pub fn validate(&self) -> Result<(), QueryError> {
        match (self.operator, &self.right_operand) {
            (Operator::Eq, Operand::Value(_)) => Ok(()),
            (Operator::Eq, Operand::List(_)) => Err(QueryError::InvalidOperand {
                operator: self.operator,
                reason: "expected a single value",
            }),
            (Operator::Like, Operand::Value(FieldValue::Str(_))) => Ok(()),
            (Operator::Like, _) => Err(QueryError::InvalidOperand {
                operator: self.operator,
                reason: "expected a string pattern",
            }),
            (Operator::In, Operand::List(_)) => Ok(()),
            (Operator::In, Operand::Value(_)) => Err(QueryError::InvalidOperand {
                operator: self.operator,
                reason: "expected a list",
            }),
        }
    }
}

impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.right_operand {
            Operand::Value(v) => write!(f, "{} {} {}", self.left_operand, self.operator, v),
            Operand::List(values) => {
                let joined: Vec<String> = values.iter().map(ToString::to_string).collect();
                write!(
                    f,
                    "{} {} ({})",
                    self.left_operand,
                    self.operator,
                    joined.join(", ")
                )
            }
        }
    }
}
