// SPDX-License-Identifier: MIT OR Apache-2.0

//! Soft-typed setting values.
//!
//! Settings hold arbitrary JSON scalars. Callers ask for the scalar type they expect
//! and always get an answer: a stored value of another type decodes to the type's
//! zero value (`""`, `0`, `false`). [`ConfigValue::decode`] additionally reports
//! whether the stored type actually matched.

use serde_json::Value;
use std::fmt;

/// Result of decoding a value into a requested scalar type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Decoded<T> {
    /// The coerced value, or the zero value on mismatch
    pub value: T,
    /// Whether the stored value had the requested type
    pub matched: bool,
}

impl<T> Decoded<T> {
    fn matched(value: T) -> Self {
        Decoded {
            value,
            matched: true,
        }
    }

    /// Discards the match flag.
    pub fn into_inner(self) -> T {
        self.value
    }
}

impl<T: Default> Decoded<T> {
    fn mismatch() -> Self {
        Decoded {
            value: T::default(),
            matched: false,
        }
    }
}

/// Scalar types a setting can be projected onto.
pub trait FromConfigValue: Sized + Default {
    /// Decodes `value`, falling back to `Self::default()` on mismatch.
    fn decode(value: Option<&Value>) -> Decoded<Self>;
}

impl FromConfigValue for String {
    fn decode(value: Option<&Value>) -> Decoded<Self> {
        match value {
            Some(Value::String(s)) => Decoded::matched(s.clone()),
            _ => Decoded::mismatch(),
        }
    }
}

impl FromConfigValue for i64 {
    fn decode(value: Option<&Value>) -> Decoded<Self> {
        let Some(Value::Number(n)) = value else {
            return Decoded::mismatch();
        };
        if let Some(i) = n.as_i64() {
            Decoded::matched(i)
        } else if n.is_u64() {
            // Above i64::MAX
            Decoded::mismatch()
        } else {
            // Floats truncate toward zero, saturating at the i64 bounds
            Decoded::matched(n.as_f64().map_or(0, |f| f as i64))
        }
    }
}

impl FromConfigValue for bool {
    fn decode(value: Option<&Value>) -> Decoded<Self> {
        match value {
            Some(Value::Bool(b)) => Decoded::matched(*b),
            _ => Decoded::mismatch(),
        }
    }
}

/// The effective value of a setting: its `value` if set, else its `default`.
///
/// # Examples
///
/// ```
/// use formcfg::domain::config_value::ConfigValue;
/// use serde_json::json;
///
/// let value = ConfigValue::new(Some(json!(8334)));
/// assert_eq!(value.as_int(), 8334);
/// assert_eq!(value.as_string(), "");
/// assert!(!value.decode::<String>().matched);
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ConfigValue(Option<Value>);

impl ConfigValue {
    /// Creates a new `ConfigValue`. JSON `null` is treated as unset.
    pub fn new(value: Option<Value>) -> Self {
        ConfigValue(value.filter(|v| !v.is_null()))
    }

    /// Returns `true` if neither a value nor a default is set.
    pub fn is_unset(&self) -> bool {
        self.0.is_none()
    }

    /// Returns the raw JSON value, if any.
    pub fn raw(&self) -> Option<&Value> {
        self.0.as_ref()
    }

    /// Consumes the wrapper and returns the raw JSON value.
    pub fn into_raw(self) -> Option<Value> {
        self.0
    }

    /// Decodes the value into `T`, reporting whether the stored type matched.
    pub fn decode<T: FromConfigValue>(&self) -> Decoded<T> {
        T::decode(self.0.as_ref())
    }

    /// Returns the value as a string, or `""` if it is not a string.
    pub fn as_string(&self) -> String {
        self.decode::<String>().into_inner()
    }

    /// Returns the value as an integer, or `0` if it is not a number.
    pub fn as_int(&self) -> i64 {
        self.decode::<i64>().into_inner()
    }

    /// Returns the value as a boolean, or `false` if it is not a boolean.
    pub fn as_bool(&self) -> bool {
        self.decode::<bool>().into_inner()
    }
}

impl From<Value> for ConfigValue {
    fn from(value: Value) -> Self {
        ConfigValue::new(Some(value))
    }
}

impl From<Option<Value>> for ConfigValue {
    fn from(value: Option<Value>) -> Self {
        ConfigValue::new(value)
    }
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Some(Value::String(s)) => write!(f, "{}", s),
            Some(v) => write!(f, "{}", v),
            None => write!(f, "null"),
        }
    }
}
