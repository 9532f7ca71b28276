//! Tagged records.
//!
//! A record describes its fields once, as a static table of
//! [`FieldDescriptor`]s, and hands out the value behind each descriptor on
//! request. `#[derive(Record)]` generates both halves:
//!
//! ```rust
//! use gql_core::Record;
//!
//! #[derive(Record)]
//! struct Item {
//!     #[db(name = "address")]
//!     #[gql(skip_update)]
//!     address: String,
//!     name: String,
//! }
//!
//! let skipped: Vec<&str> = Item::FIELDS
//!     .iter()
//!     .filter(|f| f.skip_update)
//!     .map(|f| f.column)
//!     .collect();
//! assert_eq!(skipped, ["address"]);
//! ```
//!
//! Hand-written tables work the same way:
//!
//! ```rust
//! use gql_core::builder::{FieldDescriptor, Payload, Record, UpdatePayload, Valuer};
//!
//! struct Tag {
//!     label: String,
//! }
//!
//! impl Record for Tag {
//!     const FIELDS: &'static [FieldDescriptor] = &[FieldDescriptor::new("label", "tag_label")];
//!
//!     fn field(&self, index: usize) -> Option<&dyn Valuer> {
//!         match index {
//!             0 => Some(&self.label),
//!             _ => None,
//!         }
//!     }
//! }
//!
//! impl UpdatePayload for Tag {
//!     fn payload(&self) -> Payload<'_> {
//!         Payload::record(self)
//!     }
//! }
//!
//! let sql = gql_core::from("tags")
//!     .update_sql(&Tag { label: String::from("new") })
//!     .unwrap();
//! assert_eq!(sql, r#"UPDATE "tags" SET "tag_label"='new'"#);
//! ```

use super::value::Valuer;

/// Static description of one record field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// The field's own identifier.
    pub name: &'static str,
    /// Resolved column name.
    pub column: &'static str,
    /// Whether the field is left out of UPDATE statements.
    pub skip_update: bool,
}

impl FieldDescriptor {
    /// Creates a descriptor for a field that takes part in updates.
    #[must_use]
    pub const fn new(name: &'static str, column: &'static str) -> Self {
        Self {
            name,
            column,
            skip_update: false,
        }
    }

    /// Marks the field as excluded from UPDATE statements.
    #[must_use]
    pub const fn skip_update(mut self) -> Self {
        self.skip_update = true;
        self
    }
}

/// A fixed-shape aggregate whose fields map to columns.
pub trait Record {
    /// Field descriptors in declaration order.
    const FIELDS: &'static [FieldDescriptor];

    /// Returns the value of the field described by `FIELDS[index]`.
    ///
    /// Fields marked `skip_update` may return `None`.
    fn field(&self, index: usize) -> Option<&dyn Valuer>;
}
