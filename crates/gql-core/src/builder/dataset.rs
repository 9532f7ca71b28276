//! Immutable dataset.

use super::expr::{i, Expr, Ident};

/// Creates a dataset targeting `table`.
#[must_use]
pub fn from(table: &str) -> Dataset {
    Dataset::new(table)
}

/// Immutable query descriptor.
///
/// Every clause setter returns a new dataset and leaves the receiver
/// untouched, so one base dataset can be reused as a template:
///
/// ```rust
/// use gql_core::builder::i;
///
/// let items = gql_core::from("items");
/// let unnamed = items.where_clause(i("name").is_null());
///
/// assert!(items.where_expr().is_none());
/// assert!(unnamed.where_expr().is_some());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    table: Ident,
    where_clause: Option<Expr>,
    returning: Option<Vec<Expr>>,
}

impl Dataset {
    /// Creates a dataset targeting `table`.
    #[must_use]
    pub fn new(table: &str) -> Self {
        Self {
            table: i(table),
            where_clause: None,
            returning: None,
        }
    }

    /// Returns a copy targeting another table.
    #[must_use]
    pub fn from(&self, table: &str) -> Self {
        Self {
            table: i(table),
            ..self.clone()
        }
    }

    /// Returns a copy with `expr` added to the WHERE clause.
    ///
    /// Repeated calls are combined with AND. Empty groups are ignored.
    #[must_use]
    pub fn where_clause(&self, expr: impl Into<Expr>) -> Self {
        let expr = expr.into();
        if expr.is_empty_group() {
            return self.clone();
        }
        let where_clause = match &self.where_clause {
            Some(existing) => existing.clone().and(expr),
            None => expr,
        };
        Self {
            where_clause: Some(where_clause),
            ..self.clone()
        }
    }

    /// Returns a copy without a WHERE clause.
    #[must_use]
    pub fn clear_where(&self) -> Self {
        Self {
            where_clause: None,
            ..self.clone()
        }
    }

    /// Returns a copy with the RETURNING list replaced by `columns`.
    ///
    /// An empty list removes the clause.
    #[must_use]
    pub fn returning<E: Into<Expr>>(&self, columns: impl IntoIterator<Item = E>) -> Self {
        let columns: Vec<Expr> = columns.into_iter().map(Into::into).collect();
        Self {
            returning: (!columns.is_empty()).then_some(columns),
            ..self.clone()
        }
    }

    /// Returns a copy without a RETURNING clause.
    #[must_use]
    pub fn clear_returning(&self) -> Self {
        Self {
            returning: None,
            ..self.clone()
        }
    }

    /// Returns the target table.
    #[must_use]
    pub const fn table(&self) -> &Ident {
        &self.table
    }

    /// Returns the WHERE predicate, if any.
    #[must_use]
    pub const fn where_expr(&self) -> Option<&Expr> {
        self.where_clause.as_ref()
    }

    /// Returns the RETURNING list, if any.
    #[must_use]
    pub fn returning_exprs(&self) -> Option<&[Expr]> {
        self.returning.as_deref()
    }
}
