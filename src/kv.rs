// Copyright 2024 FastLabs Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Key-value pairs attached to log records.

use std::borrow::Cow;
use std::fmt;

/// A typed value of a [`Field`].
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Str(Cow<'static, str>),
    I64(i64),
    U64(u64),
    F64(f64),
    Bool(bool),
}

impl Value {
    /// Captures any displayable value as a string value.
    pub fn display(value: impl fmt::Display) -> Self {
        Value::Str(Cow::Owned(value.to_string()))
    }

    pub(crate) fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Str(s) => serde_json::Value::String(s.to_string()),
            Value::I64(n) => serde_json::Value::from(*n),
            Value::U64(n) => serde_json::Value::from(*n),
            // non-finite floats have no JSON representation
            Value::F64(n) => serde_json::Number::from_f64(*n)
                .map(serde_json::Value::Number)
                .unwrap_or_else(|| serde_json::Value::String(n.to_string())),
            Value::Bool(b) => serde_json::Value::Bool(*b),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(s) => f.write_str(s),
            Value::I64(n) => write!(f, "{n}"),
            Value::U64(n) => write!(f, "{n}"),
            Value::F64(n) => write!(f, "{n}"),
            Value::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl From<&'static str> for Value {
    fn from(value: &'static str) -> Self {
        Value::Str(Cow::Borrowed(value))
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(Cow::Owned(value))
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::F64(value.into())
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::F64(value)
    }
}

macro_rules! impl_from_int {
    ($variant:ident: $target:ty => $($ty:ty),+) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::$variant(value as $target)
                }
            }
        )+
    };
}

impl_from_int!(I64: i64 => i8, i16, i32, i64, isize);
impl_from_int!(U64: u64 => u8, u16, u32, u64, usize);

/// A key-value pair attached to a logger with [`Logger::with`](crate::Logger::with).
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    key: Cow<'static, str>,
    value: Value,
}

impl Field {
    /// Creates a new field.
    pub fn new(key: impl Into<Cow<'static, str>>, value: impl Into<Value>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// The key of this field.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The value of this field.
    pub fn value(&self) -> &Value {
        &self.value
    }
}

impl<K, V> From<(K, V)> for Field
where
    K: Into<Cow<'static, str>>,
    V: Into<Value>,
{
    fn from((key, value): (K, V)) -> Self {
        Field::new(key, value)
    }
}

/// Renders fields as a JSON object, preserving their order.
pub(crate) fn fields_to_json(fields: &[Field]) -> serde_json::Map<String, serde_json::Value> {
    let mut map = serde_json::Map::new();
    for field in fields {
        map.insert(field.key().to_string(), field.value().to_json());
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_from_tuple() {
        let field = Field::from(("user", 42));
        assert_eq!(field.key(), "user");
        assert_eq!(field.value(), &Value::I64(42));

        let field = Field::from(("ok".to_string(), true));
        assert_eq!(field.value().to_string(), "true");
    }

    #[test]
    fn test_fields_to_json_keeps_order() {
        let fields = [
            Field::new("zeta", "z"),
            Field::new("alpha", 1u8),
            Field::new("ratio", 0.5),
            Field::new("nan", f64::NAN),
        ];
        let json = serde_json::Value::Object(fields_to_json(&fields)).to_string();
        assert_eq!(json, r#"{"zeta":"z","alpha":1,"ratio":0.5,"nan":"NaN"}"#);
    }
}
