//! Dataset builder and UPDATE compiler.
//!
//! A [`Dataset`] holds the target table and the WHERE / RETURNING clauses.
//! [`Dataset::update_sql`] flattens an [`UpdatePayload`] into sorted
//! column/value pairs and renders the statement with every value inlined.
//!
//! # Example
//!
//! ```rust
//! use gql_core::builder::{from, i, Record};
//!
//! #[derive(Record)]
//! struct Item {
//!     #[db(name = "address")]
//!     address: String,
//!     #[db(name = "name")]
//!     name: String,
//! }
//!
//! let sql = from("items")
//!     .where_clause(i("name").is_null())
//!     .update_sql(&Item {
//!         address: String::from("111 Test Addr"),
//!         name: String::from("Test"),
//!     })
//!     .unwrap();
//!
//! assert_eq!(
//!     sql,
//!     r#"UPDATE "items" SET "address"='111 Test Addr',"name"='Test' WHERE ("name" IS NULL)"#
//! );
//! ```

mod dataset;
mod expr;
#[cfg(feature = "json")]
mod json;
mod payload;
mod record;
mod update;
pub mod value;

pub use dataset::{from, Dataset};
pub use expr::{and, i, literal, or, val, CompareOp, Expr, GroupOp, Ident, IsOp};
pub use payload::{ColumnValue, Payload, RecordField, ShapeName, UpdatePayload};
pub use record::{FieldDescriptor, Record};
pub use value::{encode, SqlValue, ToSqlValue, Valuer};

#[cfg(feature = "derive")]
pub use gql_derive::Record;
