//! Represents a value in a spec record's data tree.
//!
//! Spec data is arbitrarily nested YAML; the harness normalizes it into this
//! tagged union so the lambda binder can walk and rebuild it exhaustively.
//! The [`Value::Lambda`] variant never appears in freshly loaded records; it
//! is introduced only by the binder when it substitutes a prebuilt callable
//! for a fixture.
//!
//! Maps preserve insertion order. The binder's shape-preservation guarantee
//! covers key order, so an association list is used rather than a hash map.

use std::fmt;
use std::sync::Arc;

use crate::errors::HarnessError;

/// The callable form a lambda fixture resolves to. The optional argument is
/// the literal inner text of a section tag, absent for plain interpolation.
pub type LambdaFn = Arc<dyn Fn(Option<&str>) -> Value + Send + Sync>;

/// A resolved lambda: the fragment source it was registered under, plus the
/// prebuilt callable implementing it. Equality is by fragment source, since
/// the registry guarantees one callable per fragment.
#[derive(Clone)]
pub struct Lambda {
    source: String,
    func: LambdaFn,
}

impl Lambda {
    pub fn new(source: impl Into<String>, func: LambdaFn) -> Self {
        Self {
            source: source.into(),
            func,
        }
    }

    /// The fragment source text this lambda was registered under.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Invokes the callable. `text` is the section's literal inner text when
    /// the engine invokes the lambda as a section tag, `None` for plain
    /// interpolation.
    pub fn call(&self, text: Option<&str>) -> Value {
        (self.func)(text)
    }
}

impl fmt::Debug for Lambda {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Lambda({})", self.source)
    }
}

impl PartialEq for Lambda {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

/// A value in a spec record's data tree.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Nil,
    Bool(bool),
    Number(f64),
    String(String),
    List(Vec<Value>),
    Map(Vec<(String, Value)>),
    Lambda(Lambda),
}

impl Value {
    /// Returns the type name of the value as a string.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Nil => "Nil",
            Value::Bool(_) => "Bool",
            Value::Number(_) => "Number",
            Value::String(_) => "String",
            Value::List(_) => "List",
            Value::Map(_) => "Map",
            Value::Lambda(_) => "Lambda",
        }
    }

    /// Returns true if the value is Nil.
    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    /// Returns the contained string if this is a String value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the contained bool if this is a Bool value.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Looks up a key if this is a Map value. First match wins; spec records
    /// never carry duplicate keys.
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Map(entries) => entries.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }

    /// Normalizes a parsed YAML value into a harness value, preserving
    /// mapping key order and sequence order.
    pub fn from_yaml(yaml: &serde_yaml::Value) -> Result<Self, HarnessError> {
        match yaml {
            serde_yaml::Value::Null => Ok(Value::Nil),
            serde_yaml::Value::Bool(b) => Ok(Value::Bool(*b)),
            serde_yaml::Value::Number(n) => number_value(n),
            serde_yaml::Value::String(s) => Ok(Value::String(s.clone())),
            serde_yaml::Value::Sequence(items) => items
                .iter()
                .map(Value::from_yaml)
                .collect::<Result<Vec<_>, _>>()
                .map(Value::List),
            serde_yaml::Value::Mapping(mapping) => {
                let mut entries = Vec::with_capacity(mapping.len());
                for (key, val) in mapping {
                    let key = key.as_str().ok_or_else(|| HarnessError::InvalidData {
                        detail: format!("non-string mapping key: {key:?}"),
                    })?;
                    entries.push((key.to_string(), Value::from_yaml(val)?));
                }
                Ok(Value::Map(entries))
            }
            // Tags are stripped from the lambda group before parsing; any
            // tag that survives is treated as its inner value.
            serde_yaml::Value::Tagged(tagged) => Value::from_yaml(&tagged.value),
        }
    }
}

/// Widens a YAML number to the harness's f64 representation. Integers are
/// exact in f64 only up to 2^53; anything beyond is rejected rather than
/// silently rounded.
fn number_value(n: &serde_yaml::Number) -> Result<Value, HarnessError> {
    const MAX_EXACT: u64 = 1 << 53;
    if let Some(i) = n.as_i64() {
        if i.unsigned_abs() > MAX_EXACT {
            return Err(HarnessError::InvalidData {
                detail: format!("integer '{i}' exceeds the exactly representable f64 range"),
            });
        }
        Ok(Value::Number(i as f64))
    } else if let Some(u) = n.as_u64() {
        if u > MAX_EXACT {
            return Err(HarnessError::InvalidData {
                detail: format!("integer '{u}' exceeds the exactly representable f64 range"),
            });
        }
        Ok(Value::Number(u as f64))
    } else {
        // The only remaining storage class is f64 itself.
        Ok(Value::Number(n.as_f64().unwrap_or(f64::NAN)))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yaml_mapping_order_is_preserved() {
        let yaml: serde_yaml::Value = serde_yaml::from_str("z: 1\na: 2\nm: 3\n").unwrap();
        let value = Value::from_yaml(&yaml).unwrap();
        let Value::Map(entries) = value else {
            panic!("expected a map");
        };
        let keys: Vec<_> = entries.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, ["z", "a", "m"]);
    }

    #[test]
    fn yaml_scalars_normalize() {
        let yaml: serde_yaml::Value =
            serde_yaml::from_str("[~, true, 3, 'three', [1, 2]]").unwrap();
        let value = Value::from_yaml(&yaml).unwrap();
        assert_eq!(
            value,
            Value::List(vec![
                Value::Nil,
                Value::Bool(true),
                Value::Number(3.0),
                Value::String("three".to_string()),
                Value::List(vec![Value::Number(1.0), Value::Number(2.0)]),
            ])
        );
    }

    #[test]
    fn integers_beyond_f64_exact_range_are_rejected() {
        for raw in ["9007199254740993", "-9007199254740993", "18446744073709551615"] {
            let yaml: serde_yaml::Value = serde_yaml::from_str(raw).unwrap();
            let err = Value::from_yaml(&yaml).unwrap_err();
            assert!(
                matches!(err, HarnessError::InvalidData { .. }),
                "'{raw}' should be rejected"
            );
        }
        // 2^53 itself is exact and widens cleanly.
        let yaml: serde_yaml::Value = serde_yaml::from_str("9007199254740992").unwrap();
        assert_eq!(
            Value::from_yaml(&yaml).unwrap(),
            Value::Number(9_007_199_254_740_992.0)
        );
    }

    #[test]
    fn nil_and_bool_accessors() {
        assert!(Value::Nil.is_nil());
        assert!(!Value::Bool(false).is_nil());
        assert_eq!(Value::Bool(false).as_bool(), Some(false));
        assert_eq!(Value::Nil.as_bool(), None);
        assert_eq!(Value::from("x").as_bool(), None);
    }

    #[test]
    fn non_string_mapping_key_is_rejected() {
        let yaml: serde_yaml::Value = serde_yaml::from_str("1: one").unwrap();
        let err = Value::from_yaml(&yaml).unwrap_err();
        assert!(matches!(err, HarnessError::InvalidData { .. }));
    }

    #[test]
    fn map_lookup_finds_nested_values() {
        let value = Value::Map(vec![
            ("a".to_string(), Value::Number(1.0)),
            ("b".to_string(), Value::String("two".to_string())),
        ]);
        assert_eq!(value.get("b").and_then(Value::as_str), Some("two"));
        assert!(value.get("missing").is_none());
    }

    #[test]
    fn lambda_equality_is_by_source() {
        let a = Lambda::new("frag", Arc::new(|_| Value::Nil));
        let b = Lambda::new("frag", Arc::new(|_| Value::Bool(true)));
        let c = Lambda::new("other", Arc::new(|_| Value::Nil));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
