//! SQL values and literal encoding.
//!
//! Every value that ends up in a compiled statement passes through
//! [`Valuer::value`] and is then rendered by [`SqlValue::to_sql_inline`].
//! Types with a built-in [`ToSqlValue`] conversion get a [`Valuer`] impl for
//! free; types that need custom storage implement [`Valuer`] themselves.

use std::borrow::Cow;

use crate::error::BoxError;

/// A driver-level value that can be inlined into a statement.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    /// NULL value.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Int(i64),
    /// Float value.
    Float(f64),
    /// Text value.
    Text(String),
    /// Binary value.
    Blob(Vec<u8>),
}

impl SqlValue {
    /// Returns the SQL literal for this value.
    ///
    /// Text and binary values are wrapped in single quotes as-is. Embedded
    /// quote characters are not doubled.
    #[must_use]
    pub fn to_sql_inline(&self) -> String {
        match self {
            Self::Null => String::from("NULL"),
            Self::Bool(b) => {
                if *b {
                    String::from("TRUE")
                } else {
                    String::from("FALSE")
                }
            }
            Self::Int(n) => format!("{n}"),
            Self::Float(f) => format!("{f}"),
            Self::Text(s) => quoted(s),
            Self::Blob(b) => quoted(&String::from_utf8_lossy(b)),
        }
    }
}

fn quoted(s: &str) -> String {
    format!("'{s}'")
}

/// Trait for types that convert directly to SQL values.
pub trait ToSqlValue {
    /// Converts the value to a `SqlValue`.
    fn to_sql_value(self) -> SqlValue;
}

/// Custom value-encoding hook.
///
/// Implement this for types whose stored form differs from their in-memory
/// form. The returned value is what gets inlined.
///
/// ```rust
/// use gql_core::builder::{SqlValue, Valuer};
/// use gql_core::BoxError;
///
/// struct Upper(String);
///
/// impl Valuer for Upper {
///     fn value(&self) -> Result<SqlValue, BoxError> {
///         Ok(SqlValue::Text(self.0.to_uppercase()))
///     }
/// }
///
/// assert_eq!(
///     gql_core::builder::encode(&Upper(String::from("abc"))).unwrap(),
///     "'ABC'"
/// );
/// ```
pub trait Valuer {
    /// Returns the value to store.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be represented.
    fn value(&self) -> Result<SqlValue, BoxError>;
}

impl<T: ToSqlValue + Clone> Valuer for T {
    fn value(&self) -> Result<SqlValue, BoxError> {
        Ok(self.clone().to_sql_value())
    }
}

/// Encodes a single value into its SQL literal.
///
/// # Errors
///
/// Returns the hook's error unchanged if [`Valuer::value`] fails, and an
/// error for NaN or infinite floats, which have no SQL literal.
pub fn encode(value: &dyn Valuer) -> Result<String, BoxError> {
    match value.value()? {
        SqlValue::Float(f) if !f.is_finite() => {
            Err(format!("gql: float {f} has no SQL literal").into())
        }
        v => Ok(v.to_sql_inline()),
    }
}

impl ToSqlValue for SqlValue {
    fn to_sql_value(self) -> SqlValue {
        self
    }
}

impl ToSqlValue for bool {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Bool(self)
    }
}

macro_rules! impl_int {
    ($($ty:ty),+) => {
        $(
            impl ToSqlValue for $ty {
                fn to_sql_value(self) -> SqlValue {
                    SqlValue::Int(i64::from(self))
                }
            }
        )+
    };
}

impl_int!(i64, i32, i16, i8, u32, u16, u8);

impl ToSqlValue for f64 {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Float(self)
    }
}

impl ToSqlValue for f32 {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Float(f64::from(self))
    }
}

impl ToSqlValue for String {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Text(self)
    }
}

impl ToSqlValue for &str {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Text(String::from(self))
    }
}

impl ToSqlValue for Cow<'_, str> {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Text(self.into_owned())
    }
}

impl<T: ToSqlValue> ToSqlValue for Option<T> {
    fn to_sql_value(self) -> SqlValue {
        match self {
            Some(v) => v.to_sql_value(),
            None => SqlValue::Null,
        }
    }
}

impl ToSqlValue for Vec<u8> {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Blob(self)
    }
}

impl ToSqlValue for &[u8] {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Blob(self.to_vec())
    }
}

#[cfg(feature = "chrono")]
mod temporal {
    use super::{SqlValue, ToSqlValue};

    impl<Tz: chrono::TimeZone> ToSqlValue for chrono::DateTime<Tz>
    where
        Tz::Offset: std::fmt::Display,
    {
        fn to_sql_value(self) -> SqlValue {
            SqlValue::Text(self.to_rfc3339())
        }
    }

    impl ToSqlValue for chrono::NaiveDateTime {
        fn to_sql_value(self) -> SqlValue {
            SqlValue::Text(self.format("%Y-%m-%dT%H:%M:%S%.f").to_string())
        }
    }

    impl ToSqlValue for chrono::NaiveDate {
        fn to_sql_value(self) -> SqlValue {
            SqlValue::Text(self.format("%Y-%m-%d").to_string())
        }
    }
}
