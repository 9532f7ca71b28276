//! Update payloads and their flattening into column/value pairs.

use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

use super::record::{FieldDescriptor, Record};
use super::value::{encode, SqlValue, Valuer};
use crate::error::{GqlError, Result};

/// The two payload shapes an UPDATE accepts, plus everything else.
pub enum Payload<'a> {
    /// Column name to value entries. Every entry is written.
    Mapping(Vec<(&'a str, &'a dyn Valuer)>),
    /// Record fields in declaration order.
    Record(Vec<RecordField<'a>>),
    /// Any other shape, named for the error message.
    Unsupported(String),
}

/// A record field paired with its value.
pub struct RecordField<'a> {
    /// Static description of the field.
    pub descriptor: &'static FieldDescriptor,
    /// The field's value, if the record exposes one.
    pub value: Option<&'a dyn Valuer>,
}

/// An encoded SET assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnValue<'a> {
    /// Column name, unquoted.
    pub column: &'a str,
    /// Encoded SQL literal.
    pub literal: String,
}

impl<'a> Payload<'a> {
    /// Builds a record payload from a [`Record`] implementation.
    pub fn record<R: Record>(record: &'a R) -> Self {
        Self::Record(
            R::FIELDS
                .iter()
                .enumerate()
                .map(|(index, descriptor)| RecordField {
                    descriptor,
                    value: record.field(index),
                })
                .collect(),
        )
    }

    /// Builds a mapping payload from key/value entries.
    pub fn mapping<K, V, I>(entries: I) -> Self
    where
        K: AsRef<str> + 'a,
        V: Valuer + 'a,
        I: IntoIterator<Item = (&'a K, &'a V)>,
    {
        Self::Mapping(
            entries
                .into_iter()
                .map(|(k, v)| (k.as_ref(), v as &dyn Valuer))
                .collect(),
        )
    }

    /// Builds a payload that always fails with the given shape name.
    pub fn unsupported(shape: impl Into<String>) -> Self {
        Self::Unsupported(shape.into())
    }

    /// Short name of the payload kind.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Mapping(_) => "mapping",
            Self::Record(_) => "record",
            Self::Unsupported(_) => "unsupported",
        }
    }

    /// Encodes every participating entry and sorts the result by column.
    ///
    /// # Errors
    ///
    /// Returns [`GqlError::UnsupportedPayload`] for unsupported shapes,
    /// [`GqlError::Encode`] if a value hook fails and
    /// [`GqlError::MissingField`] if a record hides a non-skipped field and
    /// [`GqlError::DuplicateColumn`] if two entries share a column.
    pub fn flatten(self) -> Result<Vec<ColumnValue<'a>>> {
        let mut pairs = match self {
            Self::Mapping(entries) => entries
                .into_iter()
                .map(|(column, value)| encode_column(column, value))
                .collect::<Result<Vec<_>>>()?,
            Self::Record(fields) => fields
                .into_iter()
                .filter(|field| !field.descriptor.skip_update)
                .map(|field| {
                    let column = field.descriptor.column;
                    let value = field.value.ok_or_else(|| GqlError::MissingField {
                        column: String::from(column),
                    })?;
                    encode_column(column, value)
                })
                .collect::<Result<Vec<_>>>()?,
            Self::Unsupported(shape) => return Err(GqlError::UnsupportedPayload(shape)),
        };
        pairs.sort_by(|a, b| a.column.cmp(b.column));
        if let Some(dup) = pairs.windows(2).find(|w| w[0].column == w[1].column) {
            return Err(GqlError::DuplicateColumn {
                column: String::from(dup[0].column),
            });
        }
        Ok(pairs)
    }
}

fn encode_column<'a>(column: &'a str, value: &dyn Valuer) -> Result<ColumnValue<'a>> {
    let literal = encode(value).map_err(|source| GqlError::Encode {
        column: String::from(column),
        source,
    })?;
    Ok(ColumnValue { column, literal })
}

/// Types that can be passed to [`Dataset::update_sql`](super::Dataset::update_sql).
///
/// Maps and records produce a usable payload; lists and scalars are
/// accepted by the type system but always fail at compile time of the
/// statement with an unsupported-shape error.
pub trait UpdatePayload {
    /// Classifies this value as a payload.
    fn payload(&self) -> Payload<'_>;
}

impl<K: AsRef<str>, V: Valuer, S: BuildHasher> UpdatePayload for HashMap<K, V, S> {
    fn payload(&self) -> Payload<'_> {
        Payload::mapping(self.iter())
    }
}

impl<K: AsRef<str>, V: Valuer> UpdatePayload for BTreeMap<K, V> {
    fn payload(&self) -> Payload<'_> {
        Payload::mapping(self.iter())
    }
}

impl<T: ShapeName> UpdatePayload for Vec<T> {
    fn payload(&self) -> Payload<'_> {
        Payload::unsupported(Self::shape_name())
    }
}

impl<T: ShapeName> UpdatePayload for [T] {
    fn payload(&self) -> Payload<'_> {
        Payload::unsupported(Self::shape_name())
    }
}

impl<T: ShapeName, const N: usize> UpdatePayload for [T; N] {
    fn payload(&self) -> Payload<'_> {
        Payload::unsupported(Self::shape_name())
    }
}

/// Names a type's shape in unsupported-payload errors.
pub trait ShapeName {
    /// Returns the shape name, e.g. `string` or `[]int64`.
    fn shape_name() -> String;
}

macro_rules! impl_scalar_shape {
    ($($ty:ty => $name:literal),+ $(,)?) => {
        $(
            impl ShapeName for $ty {
                fn shape_name() -> String {
                    String::from($name)
                }
            }

            impl UpdatePayload for $ty {
                fn payload(&self) -> Payload<'_> {
                    Payload::unsupported(Self::shape_name())
                }
            }
        )+
    };
}

impl_scalar_shape!(
    String => "string",
    &str => "string",
    bool => "bool",
    i8 => "int8",
    i16 => "int16",
    i32 => "int32",
    i64 => "int64",
    u8 => "uint8",
    u16 => "uint16",
    u32 => "uint32",
    f32 => "float32",
    f64 => "float64",
    SqlValue => "interface {}",
);

impl<T: ShapeName> ShapeName for Vec<T> {
    fn shape_name() -> String {
        format!("[]{}", T::shape_name())
    }
}

impl<T: ShapeName> ShapeName for [T] {
    fn shape_name() -> String {
        format!("[]{}", T::shape_name())
    }
}

impl<T: ShapeName, const N: usize> ShapeName for [T; N] {
    fn shape_name() -> String {
        format!("[{N}]{}", T::shape_name())
    }
}

impl<T: ShapeName> ShapeName for Option<T> {
    fn shape_name() -> String {
        format!("*{}", T::shape_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mapping_sorted_by_column() {
        let mut map = HashMap::new();
        map.insert("name", "Test");
        map.insert("address", "111 Test Addr");
        map.insert("city", "Paris");

        let pairs = map.payload().flatten().unwrap();
        let columns: Vec<&str> = pairs.iter().map(|p| p.column).collect();
        assert_eq!(columns, ["address", "city", "name"]);
        assert_eq!(pairs[0].literal, "'111 Test Addr'");
    }

    #[test]
    fn test_mapping_with_mixed_values() {
        let mut map = BTreeMap::new();
        map.insert(String::from("count"), SqlValue::Int(3));
        map.insert(String::from("active"), SqlValue::Bool(false));
        map.insert(String::from("deleted_at"), SqlValue::Null);

        let pairs = map.payload().flatten().unwrap();
        let rendered: Vec<(&str, &str)> = pairs
            .iter()
            .map(|p| (p.column, p.literal.as_str()))
            .collect();
        assert_eq!(
            rendered,
            [("active", "FALSE"), ("count", "3"), ("deleted_at", "NULL")]
        );
    }

    #[test]
    fn test_empty_mapping() {
        let map: HashMap<String, String> = HashMap::new();
        assert!(map.payload().flatten().unwrap().is_empty());
    }

    #[test]
    fn test_record_payload_skips_and_sorts() {
        static FIELDS: [FieldDescriptor; 3] = [
            FieldDescriptor::new("title", "title"),
            FieldDescriptor::new("secret", "secret").skip_update(),
            FieldDescriptor::new("body", "body"),
        ];
        let title = String::from("Hi");
        let body = String::from("Text");
        let payload = Payload::Record(vec![
            RecordField {
                descriptor: &FIELDS[0],
                value: Some(&title),
            },
            RecordField {
                descriptor: &FIELDS[1],
                value: None,
            },
            RecordField {
                descriptor: &FIELDS[2],
                value: Some(&body),
            },
        ]);

        let pairs = payload.flatten().unwrap();
        assert_eq!(
            pairs,
            [
                ColumnValue {
                    column: "body",
                    literal: String::from("'Text'"),
                },
                ColumnValue {
                    column: "title",
                    literal: String::from("'Hi'"),
                },
            ]
        );
    }

    #[test]
    fn test_record_missing_value() {
        static FIELD: FieldDescriptor = FieldDescriptor::new("title", "title");
        let payload = Payload::Record(vec![RecordField {
            descriptor: &FIELD,
            value: None,
        }]);
        let err = payload.flatten().unwrap_err();
        assert!(matches!(err, GqlError::MissingField { ref column } if column == "title"));
    }

    #[test]
    fn test_duplicate_record_column() {
        static FIELDS: [FieldDescriptor; 2] = [
            FieldDescriptor::new("a", "x"),
            FieldDescriptor::new("b", "x"),
        ];
        let payload = Payload::Record(vec![
            RecordField {
                descriptor: &FIELDS[0],
                value: Some(&1_i64),
            },
            RecordField {
                descriptor: &FIELDS[1],
                value: Some(&2_i64),
            },
        ]);
        let err = payload.flatten().unwrap_err();
        assert!(matches!(err, GqlError::DuplicateColumn { ref column } if column == "x"));
        assert_eq!(err.to_string(), "gql: duplicate column x");
    }

    #[test]
    fn test_duplicate_mapping_column() {
        let (a, b) = ("a", "b");
        let payload = Payload::Mapping(vec![("name", &a as &dyn Valuer), ("name", &b)]);
        assert!(matches!(
            payload.flatten(),
            Err(GqlError::DuplicateColumn { ref column }) if column == "name"
        ));
    }

    #[test]
    fn test_non_finite_float_is_rejected() {
        let map = BTreeMap::from([("f", f64::NAN)]);
        let err = map.payload().flatten().unwrap_err();
        assert!(matches!(err, GqlError::Encode { ref column, .. } if column == "f"));

        let map = BTreeMap::from([("g", f64::INFINITY)]);
        assert!(matches!(
            map.payload().flatten(),
            Err(GqlError::Encode { ref column, .. }) if column == "g"
        ));
    }

    #[test]
    fn test_list_payload_is_unsupported() {
        let err = vec![String::from("HELLO")].payload().flatten().unwrap_err();
        assert_eq!(
            err.to_string(),
            "gql: Unsupported update interface type []string"
        );
    }

    #[test]
    fn test_shape_names() {
        assert_eq!(<Vec<i64>>::shape_name(), "[]int64");
        assert_eq!(<[&str; 2]>::shape_name(), "[2]string");
        assert_eq!(<Option<f64>>::shape_name(), "*float64");
        assert_eq!(<Vec<Vec<u8>>>::shape_name(), "[][]uint8");
        assert_eq!(String::shape_name(), "string");
    }

    #[test]
    fn test_scalar_payload_is_unsupported() {
        let err = 42_i64.payload().flatten().unwrap_err();
        assert_eq!(err.to_string(), "gql: Unsupported update interface type int64");
    }

    #[test]
    fn test_payload_kind() {
        let map: BTreeMap<String, i64> = BTreeMap::new();
        assert_eq!(map.payload().kind(), "mapping");
        assert_eq!([1_u8].payload().kind(), "unsupported");
    }
}
