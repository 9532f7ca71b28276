//! `serde_json` payloads and values.

use serde_json::{Map, Value};

use super::payload::{Payload, ShapeName, UpdatePayload};
use super::value::{SqlValue, Valuer};
use crate::error::BoxError;

impl UpdatePayload for Map<String, Value> {
    fn payload(&self) -> Payload<'_> {
        Payload::mapping(self.iter())
    }
}

impl UpdatePayload for Value {
    fn payload(&self) -> Payload<'_> {
        match self {
            Self::Object(map) => map.payload(),
            Self::Array(_) => Payload::unsupported(format!("[]{}", Self::shape_name())),
            Self::String(_) => Payload::unsupported("string"),
            Self::Number(_) => Payload::unsupported("float64"),
            Self::Bool(_) => Payload::unsupported("bool"),
            Self::Null => Payload::unsupported("<nil>"),
        }
    }
}

impl ShapeName for Value {
    fn shape_name() -> String {
        String::from("interface {}")
    }
}

impl Valuer for Value {
    fn value(&self) -> Result<SqlValue, BoxError> {
        match self {
            Self::Null => Ok(SqlValue::Null),
            Self::Bool(b) => Ok(SqlValue::Bool(*b)),
            Self::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(SqlValue::Int(i))
                } else if n.is_u64() {
                    Err(format!("gql: integer {n} is out of range").into())
                } else {
                    n.as_f64()
                        .map(SqlValue::Float)
                        .ok_or_else(|| format!("gql: number {n} is not representable").into())
                }
            }
            Self::String(s) => Ok(SqlValue::Text(s.clone())),
            Self::Array(_) => Err("gql: cannot encode a JSON array as a column value".into()),
            Self::Object(_) => Err("gql: cannot encode a JSON object as a column value".into()),
        }
    }
}
