//! UPDATE statement compilation.

use tracing::{debug, trace};

use super::dataset::Dataset;
use super::expr::Expr;
use super::payload::{ColumnValue, UpdatePayload};
use crate::dialect::{Dialect, GenericDialect};
use crate::error::Result;

impl Dataset {
    /// Compiles an UPDATE statement for `payload`.
    ///
    /// Clause order is fixed: `UPDATE "table" SET ...`, then ` WHERE (...)`
    /// and ` RETURNING ...` when configured. SET assignments are sorted by
    /// column name.
    ///
    /// ```rust
    /// use std::collections::HashMap;
    ///
    /// let payload = HashMap::from([("name", "Test"), ("address", "111 Test Addr")]);
    /// let sql = gql_core::from("items").update_sql(&payload).unwrap();
    /// assert_eq!(sql, r#"UPDATE "items" SET "address"='111 Test Addr',"name"='Test'"#);
    /// ```
    ///
    /// # Errors
    ///
    /// Returns an error if the payload is neither a mapping nor a record, or
    /// if a value fails to encode. No partial statement is produced.
    pub fn update_sql<P: UpdatePayload + ?Sized>(&self, payload: &P) -> Result<String> {
        let dialect = GenericDialect::new();
        let payload = payload.payload();
        let kind = payload.kind();
        let pairs = payload.flatten().inspect_err(|err| {
            debug!(kind, error = %err, "update payload rejected");
        })?;
        trace!(kind, columns = pairs.len(), "flattened update payload");

        let sql = self.assemble_update(&dialect, &pairs);
        debug!(table = %self.table().to_sql(&dialect), sql = %sql, "compiled update");
        Ok(sql)
    }

    fn assemble_update<D: Dialect + ?Sized>(&self, dialect: &D, pairs: &[ColumnValue<'_>]) -> String {
        let mut sql = String::from("UPDATE ");
        sql.push_str(&self.table().to_sql(dialect));
        sql.push_str(" SET ");

        let set_parts: Vec<String> = pairs
            .iter()
            .map(|p| format!("{}={}", dialect.quote_identifier(p.column), p.literal))
            .collect();
        sql.push_str(&set_parts.join(","));

        sql.push_str(&where_fragment(dialect, self.where_expr()));
        sql.push_str(&returning_fragment(dialect, self.returning_exprs()));
        sql
    }
}

/// Renders ` WHERE (<predicate>)`, or nothing without a predicate.
fn where_fragment<D: Dialect + ?Sized>(dialect: &D, expr: Option<&Expr>) -> String {
    expr.map_or_else(String::new, |expr| {
        format!(" WHERE ({})", expr.to_sql(dialect))
    })
}

/// Renders ` RETURNING <columns>`, or nothing without a target.
fn returning_fragment<D: Dialect + ?Sized>(dialect: &D, exprs: Option<&[Expr]>) -> String {
    match exprs {
        Some(exprs) if !exprs.is_empty() => {
            let columns: Vec<String> = exprs.iter().map(|e| e.to_sql(dialect)).collect();
            format!(" RETURNING {}", columns.join(", "))
        }
        _ => String::new(),
    }
}
