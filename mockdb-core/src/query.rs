//! Query construction for record stores.
//!
//! A [`Where`] selects records from a single collection. It comes in three forms:
//!
//! - **Attribute equality** ([`Where::Attrs`]) - every given attribute must match
//! - **Predicate** ([`Where::Predicate`]) - an arbitrary function over a stored record
//! - **Filter expression** ([`Where::Expr`]) - a structured [`Expr`] built with [`Filter`]
//!
//! ```ignore
//! use mockdb_core::query::{Where, Filter};
//! use serde_json::json;
//!
//! let good = Where::attrs([("good", true)]);
//! let evil = Where::predicate(|rec| rec["good"] == json!(false));
//! let adults = Where::from(Filter::gte("age", 18).and(Filter::exists("email")));
//! ```
//!
//! # Filter Expression API
//!
//! The [`Filter`] struct provides static methods for building filter expressions:
//!
//! - Comparison: `eq`, `ne`, `gt`, `gte`, `lt`, `lte`
//! - String: `starts_with`, `ends_with`, `contains`
//! - Existence: `exists`, `not_exists`
//! - Array: `any_of`
//! - Logical: `and`, `or`

use std::fmt;

use serde_json::Value;

use crate::{
    error::{DbError, DbResult},
    record::{Attrs, Record},
};

/// Field comparison operators for filter expressions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldOp {
    /// Equal to (ids and numeric strings compare equal to numbers).
    Eq,
    /// Not equal to.
    Ne,
    /// Greater than.
    Gt,
    /// Greater than or equal to.
    Gte,
    /// Less than.
    Lt,
    /// Less than or equal to.
    Lte,
    /// String or array contains value.
    Contains,
    /// String starts with value.
    StartsWith,
    /// String ends with value.
    EndsWith,
    /// Field equals any of the values in the given array.
    AnyOf,
}

/// A filter expression for selecting records.
///
/// Expressions can be combined using logical operators (`And`, `Or`, `Not`)
/// to build complex filter predicates.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Logical AND of multiple expressions (all must match).
    And(Vec<Expr>),
    /// Logical OR of multiple expressions (any must match).
    Or(Vec<Expr>),
    /// Logical NOT of an expression (inverts the result).
    Not(Box<Expr>),
    /// Checks if a field exists (and is not null) or doesn't.
    Exists(String, bool),
    /// Field comparison expression.
    Field {
        /// The field name to compare.
        field: String,
        /// The comparison operator.
        op: FieldOp,
        /// The value to compare against.
        value: Value,
    },
}

impl Expr {
    /// Creates a field comparison expression.
    pub fn field(field: String, op: FieldOp, value: Value) -> Self {
        Expr::Field { field, op, value }
    }

    /// Combines this expression with another using logical AND.
    ///
    /// If this expression is already an AND, the other expression is appended
    /// to the list. Otherwise, a new AND expression is created.
    pub fn and(self, other: Expr) -> Self {
        match self {
            Expr::And(mut list) => {
                list.push(other);
                Expr::And(list)
            }
            _ => Expr::And(vec![self, other]),
        }
    }

    /// Combines this expression with another using logical OR.
    pub fn or(self, other: Expr) -> Self {
        match self {
            Expr::Or(mut list) => {
                list.push(other);
                Expr::Or(list)
            }
            _ => Expr::Or(vec![self, other]),
        }
    }

    /// Negates this expression (logical NOT).
    pub fn not(self) -> Self {
        Expr::Not(Box::new(self))
    }
}

/// Helper struct for constructing filter expressions.
///
/// All methods accept field names as `Into<String>` and values as `Into<Value>`.
///
/// ```ignore
/// use mockdb_core::query::Filter;
///
/// let expr = Filter::eq("name", "Link").and(Filter::gt("level", 3));
/// ```
pub struct Filter;

impl Filter {
    /// Matches records where the field equals the value.
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Expr {
        Expr::field(field.into(), FieldOp::Eq, value.into())
    }

    /// Matches records where the field does not equal the value.
    pub fn ne(field: impl Into<String>, value: impl Into<Value>) -> Expr {
        Expr::field(field.into(), FieldOp::Ne, value.into())
    }

    /// Matches records where the field is greater than the value.
    pub fn gt(field: impl Into<String>, value: impl Into<Value>) -> Expr {
        Expr::field(field.into(), FieldOp::Gt, value.into())
    }

    /// Matches records where the field is greater than or equal to the value.
    pub fn gte(field: impl Into<String>, value: impl Into<Value>) -> Expr {
        Expr::field(field.into(), FieldOp::Gte, value.into())
    }

    /// Matches records where the field is less than the value.
    pub fn lt(field: impl Into<String>, value: impl Into<Value>) -> Expr {
        Expr::field(field.into(), FieldOp::Lt, value.into())
    }

    /// Matches records where the field is less than or equal to the value.
    pub fn lte(field: impl Into<String>, value: impl Into<Value>) -> Expr {
        Expr::field(field.into(), FieldOp::Lte, value.into())
    }

    /// Matches records where the string field starts with the value.
    pub fn starts_with(field: impl Into<String>, value: impl Into<Value>) -> Expr {
        Expr::field(field.into(), FieldOp::StartsWith, value.into())
    }

    /// Matches records where the string field ends with the value.
    pub fn ends_with(field: impl Into<String>, value: impl Into<Value>) -> Expr {
        Expr::field(field.into(), FieldOp::EndsWith, value.into())
    }

    /// Matches records where the field (string or array) contains the value.
    pub fn contains(field: impl Into<String>, value: impl Into<Value>) -> Expr {
        Expr::field(field.into(), FieldOp::Contains, value.into())
    }

    /// Matches records where the field is present and not null.
    pub fn exists(field: impl Into<String>) -> Expr {
        Expr::Exists(field.into(), true)
    }

    /// Matches records where the field is missing or null.
    pub fn not_exists(field: impl Into<String>) -> Expr {
        Expr::Exists(field.into(), false)
    }

    /// Combines expressions such that all must match.
    pub fn and(exprs: impl IntoIterator<Item = Expr>) -> Expr {
        Expr::And(exprs.into_iter().collect())
    }

    /// Combines expressions such that any can match.
    pub fn or(exprs: impl IntoIterator<Item = Expr>) -> Expr {
        Expr::Or(exprs.into_iter().collect())
    }

    /// Matches records where the field equals one of the given values.
    pub fn any_of<V: Into<Value>>(field: impl Into<String>, values: impl IntoIterator<Item = V>) -> Expr {
        Expr::field(
            field.into(),
            FieldOp::AnyOf,
            Value::Array(values.into_iter().map(Into::into).collect()),
        )
    }
}

/// Predicate over a read-only view of a stored record.
pub type Predicate = Box<dyn Fn(&Record) -> bool>;

/// Selects records from a collection.
pub enum Where {
    /// Attribute-equality map; every key must match (AND semantics).
    Attrs(Attrs),
    /// Arbitrary predicate over a single record.
    Predicate(Predicate),
    /// Structured filter expression.
    Expr(Expr),
}

impl Where {
    /// Builds an attribute-equality query from name/value pairs.
    ///
    /// ```ignore
    /// let query = Where::attrs([("name", "Link")]);
    /// ```
    pub fn attrs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        Where::Attrs(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Builds an attribute-equality query on a single attribute.
    pub fn eq(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Where::attrs([(name.into(), value.into())])
    }

    /// Builds a predicate query.
    pub fn predicate<F>(predicate: F) -> Self
    where
        F: Fn(&Record) -> bool + 'static,
    {
        Where::Predicate(Box::new(predicate))
    }

    /// Builds an attribute-equality query from a JSON object.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::InvalidRecord`] if the value is not a JSON object.
    pub fn from_json(value: Value) -> DbResult<Self> {
        match value {
            Value::Object(attrs) => Ok(Where::Attrs(attrs)),
            other => Err(DbError::InvalidRecord(format!(
                "attribute queries must be JSON objects, got {other}"
            ))),
        }
    }
}

impl fmt::Debug for Where {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Where::Attrs(attrs) => f.debug_tuple("Attrs").field(attrs).finish(),
            Where::Predicate(_) => f.write_str("Predicate(..)"),
            Where::Expr(expr) => f.debug_tuple("Expr").field(expr).finish(),
        }
    }
}

impl From<Attrs> for Where {
    fn from(attrs: Attrs) -> Self {
        Where::Attrs(attrs)
    }
}

impl From<Expr> for Where {
    fn from(expr: Expr) -> Self {
        Where::Expr(expr)
    }
}

impl TryFrom<Value> for Where {
    type Error = DbError;

    fn try_from(value: Value) -> DbResult<Self> {
        Where::from_json(value)
    }
}

/// Walks a filter expression.
///
/// Backends implement this to evaluate an [`Expr`] against their own representation
/// of a record.
pub trait QueryVisitor {
    type Output;
    type Error: Into<DbError>;

    fn visit_and(&mut self, exprs: &[Expr]) -> Result<Self::Output, Self::Error>;
    fn visit_or(&mut self, exprs: &[Expr]) -> Result<Self::Output, Self::Error>;
    fn visit_not(&mut self, expr: &Expr) -> Result<Self::Output, Self::Error>;
    fn visit_exists(
        &mut self,
        field: &str,
        should_exist: bool,
    ) -> Result<Self::Output, Self::Error>;
    fn visit_field(
        &mut self,
        field: &str,
        op: &FieldOp,
        value: &Value,
    ) -> Result<Self::Output, Self::Error>;

    fn visit_expr(&mut self, expr: &Expr) -> Result<Self::Output, Self::Error> {
        match expr {
            Expr::And(exprs) => self.visit_and(exprs),
            Expr::Or(exprs) => self.visit_or(exprs),
            Expr::Not(expr) => self.visit_not(expr),
            Expr::Exists(field, should_exist) => self.visit_exists(field, *should_exist),
            Expr::Field { field, op, value } => self.visit_field(field, op, value),
        }
    }
}
