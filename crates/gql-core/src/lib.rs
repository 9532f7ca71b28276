//! # gql-core
//!
//! A fluent SQL builder that compiles immutable datasets into literal
//! UPDATE statements.
//!
//! This crate provides:
//! - An immutable [`Dataset`] with copy-on-write clause setters
//! - A statement compiler that accepts maps or tagged records as payloads
//! - Value encoding with a [`Valuer`](builder::Valuer) hook for custom types
//! - `#[derive(Record)]` for column names and skip markers (feature `derive`)
//!
//! ## Updating from a record
//!
//! ```rust
//! use gql_core::{from, Record};
//!
//! #[derive(Record)]
//! struct Item {
//!     #[db(name = "address")]
//!     #[gql(skip_update)]
//!     address: String,
//!     #[db(name = "name")]
//!     name: String,
//! }
//!
//! let item = Item {
//!     address: String::from("111 Test Addr"),
//!     name: String::from("Test"),
//! };
//! let sql = from("items").update_sql(&item).unwrap();
//! assert_eq!(sql, r#"UPDATE "items" SET "name"='Test'"#);
//! ```
//!
//! ## Updating from a map
//!
//! Map entries are written in column-name order, whatever the map's own
//! iteration order:
//!
//! ```rust
//! use std::collections::HashMap;
//!
//! use gql_core::builder::i;
//!
//! let payload = HashMap::from([("name", "Test"), ("address", "111 Test Addr")]);
//! let sql = gql_core::from("items")
//!     .returning([i("items").all()])
//!     .update_sql(&payload)
//!     .unwrap();
//! assert_eq!(
//!     sql,
//!     r#"UPDATE "items" SET "address"='111 Test Addr',"name"='Test' RETURNING "items".*"#
//! );
//! ```
//!
//! Values are inlined as literals, not bound as parameters, and text is
//! quoted without escaping embedded quotes. Do not pass untrusted input.

extern crate self as gql_core;

pub mod builder;
pub mod dialect;
pub mod error;

pub use builder::{from, Dataset, Record};
pub use dialect::{Dialect, GenericDialect};
pub use error::{BoxError, GqlError, Result};
