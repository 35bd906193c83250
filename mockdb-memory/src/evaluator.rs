//! Query evaluation for in-memory record filtering.
//!
//! This module decides whether a stored record matches a [`Where`] query. Attribute
//! maps and filter expressions share one notion of equality, implemented by
//! [`Comparable`]: JSON equality, except that a number and a string are equal when the
//! string is the number's decimal form. That keeps `{ "id": 1 }` matching a record
//! stored with the id `"1"`.

use std::{cmp::Ordering, collections::HashMap};

use serde_json::{Number, Value};

use mockdb_core::{
    error::DbError,
    query::{Expr, FieldOp, QueryVisitor, Where},
    record::{Attrs, Record},
};

/// Comparable view of a JSON value.
///
/// Integers compare exactly; a float on either side falls back to `f64`.
#[derive(Debug)]
pub(crate) enum Comparable<'a> {
    /// Null value
    Null,
    /// Boolean value
    Bool(bool),
    /// Numeric value
    Number(&'a Number),
    /// String value
    String(&'a str),
    /// Array of comparable values
    Array(Vec<Comparable<'a>>),
    /// Map/Object of comparable values
    Map(HashMap<&'a str, Comparable<'a>>),
}

impl<'a> From<&'a Value> for Comparable<'a> {
    fn from(value: &'a Value) -> Self {
        match value {
            Value::Null => Comparable::Null,
            Value::Bool(value) => Comparable::Bool(*value),
            Value::Number(value) => Comparable::Number(value),
            Value::String(value) => Comparable::String(value),
            Value::Array(arr) => Comparable::Array(
                arr
                    .iter()
                    .map(Comparable::from)
                    .collect::<Vec<_>>()
            ),
            Value::Object(map) => Comparable::Map(
                map
                    .iter()
                    .map(|(k, v)| (k.as_str(), Comparable::from(v)))
                    .collect::<HashMap<_, _>>()
            ),
        }
    }
}

impl<'a> PartialEq for Comparable<'a> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Comparable::Null, Comparable::Null) => true,
            (Comparable::Bool(a), Comparable::Bool(b)) => a == b,
            (Comparable::Number(a), Comparable::Number(b)) => {
                compare_numbers(a, b) == Some(Ordering::Equal)
            }
            (Comparable::String(a), Comparable::String(b)) => a == b,
            (Comparable::Number(n), Comparable::String(s))
            | (Comparable::String(s), Comparable::Number(n)) => number_matches_str(n, s),
            (Comparable::Array(a), Comparable::Array(b)) => a == b,
            (Comparable::Map(a), Comparable::Map(b)) => a == b,
            _ => false,
        }
    }
}

impl<'a> PartialOrd for Comparable<'a> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Comparable::Bool(a), Comparable::Bool(b)) => a.partial_cmp(b),
            (Comparable::Number(a), Comparable::Number(b)) => compare_numbers(a, b),
            (Comparable::String(a), Comparable::String(b)) => a.partial_cmp(b),
            _ => None,
        }
    }
}

fn compare_numbers(left: &Number, right: &Number) -> Option<Ordering> {
    if let (Some(left), Some(right)) = (as_integer(left), as_integer(right)) {
        return Some(left.cmp(&right));
    }

    left.as_f64()?.partial_cmp(&right.as_f64()?)
}

fn as_integer(number: &Number) -> Option<i128> {
    number
        .as_i64()
        .map(i128::from)
        .or_else(|| number.as_u64().map(i128::from))
}

/// A number matches its exact decimal form; floats also match their shortest `f64` form
/// (`1.0` matches `"1"`).
fn number_matches_str(number: &Number, s: &str) -> bool {
    if number.to_string() == s {
        return true;
    }

    number.is_f64() && number.as_f64().is_some_and(|value| value.to_string() == s)
}

/// Returns whether two attribute values are equal under query semantics.
pub(crate) fn values_match(left: &Value, right: &Value) -> bool {
    Comparable::from(left) == Comparable::from(right)
}

pub(crate) struct RecordEvaluator<'a> {
    record: &'a Record,
}

impl<'a> RecordEvaluator<'a> {
    pub fn new(record: &'a Record) -> Self {
        Self { record }
    }

    /// Returns whether the record matches the query.
    pub fn matches(&mut self, query: &Where) -> bool {
        match query {
            Where::Attrs(attrs) => self.matches_attrs(attrs),
            Where::Predicate(predicate) => predicate(self.record),
            Where::Expr(expr) => self.visit_expr(expr).unwrap_or(false),
        }
    }

    fn matches_attrs(&self, attrs: &Attrs) -> bool {
        attrs
            .iter()
            .all(|(name, expected)| values_match(&self.record[name.as_str()], expected))
    }

    /// Returns the positions of every record matching the query, in store order.
    pub fn matching_positions(records: &'a [Record], query: &Where) -> Vec<usize> {
        records
            .iter()
            .enumerate()
            .filter(|(_, record)| RecordEvaluator::new(record).matches(query))
            .map(|(position, _)| position)
            .collect()
    }
}

impl<'a> QueryVisitor for RecordEvaluator<'a> {
    type Output = bool;
    type Error = DbError;

    fn visit_and(&mut self, exprs: &[Expr]) -> Result<Self::Output, Self::Error> {
        for expr in exprs {
            if !self.visit_expr(expr)? {
                return Ok(false);
            }
        }

        Ok(true)
    }

    fn visit_or(&mut self, exprs: &[Expr]) -> Result<Self::Output, Self::Error> {
        for expr in exprs {
            if self.visit_expr(expr)? {
                return Ok(true);
            }
        }

        Ok(false)
    }

    fn visit_not(&mut self, expr: &Expr) -> Result<Self::Output, Self::Error> {
        Ok(!self.visit_expr(expr)?)
    }

    fn visit_exists(&mut self, field: &str, should_exist: bool) -> Result<Self::Output, Self::Error> {
        let exists = !matches!(self.record.get(field), None | Some(Value::Null));

        Ok(exists == should_exist)
    }

    fn visit_field(&mut self, field: &str, op: &FieldOp, value: &Value) -> Result<Self::Output, Self::Error> {
        let Some(field_value) = self.record.get(field) else {
            return Ok(matches!(op, FieldOp::Ne) && !value.is_null());
        };

        let left = Comparable::from(field_value);
        let right = Comparable::from(value);

        Ok(match op {
            FieldOp::Eq => left == right,
            FieldOp::Ne => left != right,
            FieldOp::Gt => left.partial_cmp(&right) == Some(Ordering::Greater),
            FieldOp::Gte => matches!(left.partial_cmp(&right), Some(Ordering::Greater | Ordering::Equal)),
            FieldOp::Lt => left.partial_cmp(&right) == Some(Ordering::Less),
            FieldOp::Lte => matches!(left.partial_cmp(&right), Some(Ordering::Less | Ordering::Equal)),
            FieldOp::Contains => match (left, right) {
                (Comparable::Array(array), item) => array.iter().any(|candidate| candidate == &item),
                (Comparable::String(haystack), Comparable::String(needle)) => haystack.contains(needle),
                _ => false,
            },
            FieldOp::StartsWith => match (left, right) {
                (Comparable::String(left), Comparable::String(right)) => left.starts_with(right),
                _ => false,
            },
            FieldOp::EndsWith => match (left, right) {
                (Comparable::String(left), Comparable::String(right)) => left.ends_with(right),
                _ => false,
            },
            FieldOp::AnyOf => match right {
                Comparable::Array(values) => values.iter().any(|candidate| candidate == &left),
                single_value => single_value == left,
            },
        })
    }
}
