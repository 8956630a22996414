//! Dynamic value model inspected by validators.
//!
//! Targets are arbitrary structured data, so the value model is an enum
//! covering the shapes a contract can talk about:
//! - Absence (`Undefined`) and explicit nothing (`Null`)
//! - Scalars (booleans, numbers, strings)
//! - Sequences and ordered objects
//! - Callables, so specs can carry predicates and wrapped functions

use crate::core::error::ContractResult;
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::Arc;

static UNDEFINED: Value = Value::Undefined;

/// A value that can be validated against a specification.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// Missing value (a field that does not exist)
    #[default]
    Undefined,
    /// Explicit null
    Null,
    /// Boolean value
    Boolean(bool),
    /// 64-bit floating point number (may be NaN)
    Number(f64),
    /// UTF-8 string
    String(String),
    /// Ordered sequence of values
    Array(Vec<Value>),
    /// Field map with an optional contract type tag
    Object(Object),
    /// Named callable
    Function(Callable),
}

/// Structured value: ordered fields plus the contract type that built it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Object {
    /// Name of the contract type this object was created by, if any.
    pub type_tag: Option<String>,
    /// Fields in insertion order.
    pub fields: IndexMap<String, Value>,
}

/// Signature of the function behind a [`Callable`].
pub type CallableFn = dyn Fn(&[Value]) -> ContractResult<Value> + Send + Sync;

/// A named function value with a declared parameter count.
///
/// Equality is identity: two callables are equal only if they share the
/// same underlying function.
#[derive(Clone)]
pub struct Callable {
    name: String,
    arity: usize,
    func: Arc<CallableFn>,
}

/// Kind names understood by the `type` validator.
///
/// These mirror a dynamic language's `typeof` results, plus `array` as a
/// pseudo-kind checked with the sequence predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    /// `undefined`
    Undefined,
    /// `null`
    Null,
    /// `boolean`
    Boolean,
    /// `number`
    Number,
    /// `string`
    String,
    /// `object` (includes sequences)
    Object,
    /// `function`
    Function,
    /// Pseudo-kind: any sequence.
    Array,
}

// ============================================================================
// Value Implementation
// ============================================================================

impl Value {
    /// Create an empty object.
    pub fn object() -> Self {
        Value::Object(Object::default())
    }

    /// Create an object from `(key, value)` pairs.
    pub fn from_fields<K, I>(fields: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        Value::Object(Object {
            type_tag: None,
            fields: fields.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        })
    }

    /// Whether the value is present (neither undefined nor null).
    pub fn is_existing(&self) -> bool {
        !matches!(self, Value::Undefined | Value::Null)
    }

    /// The `typeof`-equivalent kind of this value.
    ///
    /// Sequences report [`Kind::Object`]; use [`Value::is_array`] for the
    /// sequence check.
    pub fn kind(&self) -> Kind {
        match self {
            Value::Undefined => Kind::Undefined,
            Value::Null => Kind::Null,
            Value::Boolean(_) => Kind::Boolean,
            Value::Number(_) => Kind::Number,
            Value::String(_) => Kind::String,
            Value::Array(_) | Value::Object(_) => Kind::Object,
            Value::Function(_) => Kind::Function,
        }
    }

    /// Name of the value's kind as used in messages.
    pub fn type_name(&self) -> &'static str {
        self.kind().name()
    }

    /// Whether this value is a sequence.
    pub fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    /// Whether this value can be iterated element by element.
    pub fn is_enumerable(&self) -> bool {
        self.is_array()
    }

    /// Whether this value is a callable.
    pub fn is_function(&self) -> bool {
        matches!(self, Value::Function(_))
    }

    /// Length of the value, if it has one.
    ///
    /// Sequences and strings report their element count, functions their
    /// arity, and objects a numeric `length` field.
    pub fn length(&self) -> Option<f64> {
        match self {
            Value::Array(items) => Some(items.len() as f64),
            Value::String(s) => Some(s.chars().count() as f64),
            Value::Function(f) => Some(f.arity() as f64),
            Value::Object(obj) => obj.fields.get("length").and_then(Value::as_number),
            _ => None,
        }
    }

    /// Truthiness as a dynamic language would see it.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Undefined | Value::Null => false,
            Value::Boolean(b) => *b,
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::String(s) => !s.is_empty(),
            Value::Array(_) | Value::Object(_) | Value::Function(_) => true,
        }
    }

    /// Strict equality: scalars by value (NaN never equal), functions by
    /// identity, sequences and objects structurally.
    pub fn strict_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.strict_eq(y))
            }
            (Value::Object(a), Value::Object(b)) => {
                a.type_tag == b.type_tag
                    && a.fields.len() == b.fields.len()
                    && a.fields
                        .iter()
                        .all(|(k, v)| b.fields.get(k).is_some_and(|w| v.strict_eq(w)))
            }
            _ => self == other,
        }
    }

    /// Whether this value is an instance of the given type tag.
    ///
    /// Objects match their own contract type tag. The built-in tags
    /// `Object`, `Array` and `Function` match the corresponding shapes.
    pub fn is_instance_of(&self, tag: &str) -> bool {
        match (self, tag) {
            (Value::Object(_) | Value::Array(_) | Value::Function(_), "Object") => true,
            (Value::Array(_), "Array") => true,
            (Value::Function(_), "Function") => true,
            (Value::Object(obj), tag) => obj.type_tag.as_deref() == Some(tag),
            _ => false,
        }
    }

    /// Look up a field by name.
    ///
    /// Objects look up the field, sequences parse the key as an index.
    /// Everything else (and any miss) yields `Undefined`.
    pub fn get_field(&self, key: &str) -> &Value {
        match self {
            Value::Object(obj) => obj.fields.get(key).unwrap_or(&UNDEFINED),
            Value::Array(items) => array_index(key)
                .and_then(|i| items.get(i))
                .unwrap_or(&UNDEFINED),
            _ => &UNDEFINED,
        }
    }

    /// Try to get this value as a number.
    pub fn as_number(&self) -> Option<f64> {
        if let Value::Number(n) = self {
            Some(*n)
        } else {
            None
        }
    }

    /// Try to get this value as a string slice.
    pub fn as_str(&self) -> Option<&str> {
        if let Value::String(s) = self {
            Some(s)
        } else {
            None
        }
    }

    /// Try to get this value as a sequence.
    pub fn as_array(&self) -> Option<&[Value]> {
        if let Value::Array(items) = self {
            Some(items)
        } else {
            None
        }
    }

    /// Try to get this value as an object.
    pub fn as_object(&self) -> Option<&Object> {
        if let Value::Object(obj) = self {
            Some(obj)
        } else {
            None
        }
    }

    /// Try to get this value as a callable.
    pub fn as_function(&self) -> Option<&Callable> {
        if let Value::Function(f) = self {
            Some(f)
        } else {
            None
        }
    }

    /// Convert to JSON. Undefined becomes null and functions become their
    /// display string.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Undefined | Value::Null => serde_json::Value::Null,
            Value::Boolean(b) => serde_json::Value::Bool(*b),
            Value::Number(n) if n.fract() == 0.0 && n.abs() < 9.0e15 => {
                serde_json::Value::from(*n as i64)
            }
            Value::Number(n) => serde_json::Number::from_f64(*n)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Array(items) => {
                serde_json::Value::Array(items.iter().map(Value::to_json).collect())
            }
            Value::Object(obj) => serde_json::Value::Object(
                obj.fields
                    .iter()
                    .filter(|(_, v)| !matches!(v, Value::Undefined))
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
            Value::Function(f) => serde_json::Value::String(f.to_string()),
        }
    }
}

/// Parse a canonical array index: decimal digits with no sign and no
/// leading zero (other than `"0"` itself).
fn array_index(key: &str) -> Option<usize> {
    let canonical = !key.is_empty()
        && key.bytes().all(|b| b.is_ascii_digit())
        && (key == "0" || !key.starts_with('0'));
    if canonical {
        key.parse().ok()
    } else {
        None
    }
}

impl Object {
    /// Create an empty object tagged with a contract type name.
    pub fn tagged(type_tag: impl Into<String>) -> Self {
        Self {
            type_tag: Some(type_tag.into()),
            fields: IndexMap::new(),
        }
    }

    /// Insert a field, replacing any previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.fields.insert(key.into(), value);
    }

    /// Look up a field.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }
}

// ============================================================================
// Callable Implementation
// ============================================================================

impl Callable {
    /// Create a callable from a fallible function.
    pub fn new<F>(name: impl Into<String>, arity: usize, func: F) -> Self
    where
        F: Fn(&[Value]) -> ContractResult<Value> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            arity,
            func: Arc::new(func),
        }
    }

    /// Create a callable from a function that cannot fail.
    pub fn from_fn<F>(name: impl Into<String>, arity: usize, func: F) -> Self
    where
        F: Fn(&[Value]) -> Value + Send + Sync + 'static,
    {
        Self::new(name, arity, move |args| Ok(func(args)))
    }

    /// Create a one-argument predicate.
    pub fn predicate<F>(name: impl Into<String>, test: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Self::from_fn(name, 1, move |args| {
            Value::Boolean(test(args.first().unwrap_or(&Value::Undefined)))
        })
    }

    /// Function name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared number of parameters.
    pub fn arity(&self) -> usize {
        self.arity
    }

    /// Invoke the function.
    pub fn call(&self, args: &[Value]) -> ContractResult<Value> {
        (self.func)(args)
    }
}

impl PartialEq for Callable {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.func, &other.func)
    }
}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callable")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "function {}", self.name)
    }
}

// ============================================================================
// Kind Implementation
// ============================================================================

impl Kind {
    /// Parse a kind name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "undefined" => Some(Kind::Undefined),
            "null" => Some(Kind::Null),
            "boolean" => Some(Kind::Boolean),
            "number" => Some(Kind::Number),
            "string" => Some(Kind::String),
            "object" => Some(Kind::Object),
            "function" => Some(Kind::Function),
            "array" => Some(Kind::Array),
            _ => None,
        }
    }

    /// The kind's name.
    pub fn name(&self) -> &'static str {
        match self {
            Kind::Undefined => "undefined",
            Kind::Null => "null",
            Kind::Boolean => "boolean",
            Kind::Number => "number",
            Kind::String => "string",
            Kind::Object => "object",
            Kind::Function => "function",
            Kind::Array => "array",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// Display
// ============================================================================

fn fmt_number(n: f64, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if n.is_nan() {
        f.write_str("NaN")
    } else if n.is_infinite() {
        f.write_str(if n > 0.0 { "Infinity" } else { "-Infinity" })
    } else if n == 0.0 {
        f.write_str("0")
    } else if n.fract() == 0.0 && n.abs() < 1e21 {
        write!(f, "{:.0}", n)
    } else {
        write!(f, "{}", n)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => f.write_str("undefined"),
            Value::Null => f.write_str("null"),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Number(n) => fmt_number(*n, f),
            Value::String(s) => f.write_str(s),
            Value::Array(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    if item.is_existing() {
                        write!(f, "{}", item)?;
                    }
                }
                Ok(())
            }
            Value::Object(obj) => {
                write!(f, "[object {}]", obj.type_tag.as_deref().unwrap_or("Object"))
            }
            Value::Function(func) => write!(f, "{}", func),
        }
    }
}

// ============================================================================
// Conversions
// ============================================================================

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Boolean(b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Array(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => Value::Object(Object {
                type_tag: None,
                fields: map.into_iter().map(|(k, v)| (k, Value::from(v))).collect(),
            }),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(n as f64)
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

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

impl From<Object> for Value {
    fn from(obj: Object) -> Self {
        Value::Object(obj)
    }
}

impl From<Callable> for Value {
    fn from(f: Callable) -> Self {
        Value::Function(f)
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        serde_json::Value::deserialize(deserializer).map(Value::from)
    }
}
