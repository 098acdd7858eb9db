use super::*;

/// An ordered mapping, keys are arbitrary values and insertion order is kept.
pub type Map = Vec<(Value, Value)>;

/// Marker for containers that were (or must be) encoded with an
/// indefinite-length header and a closing break byte.
#[derive(Debug, Clone, PartialEq)]
pub enum Indefinite {
    Array(Vec<Value>),
    Map(Map),
}

impl Indefinite {
    pub fn is_array(&self) -> bool {
        matches!(self, Self::Array(_))
    }

    pub fn is_map(&self) -> bool {
        matches!(self, Self::Map(_))
    }

    /// Number of items (or key/value pairs)
    pub fn len(&self) -> usize {
        match self {
            Self::Array(items) => items.len(),
            Self::Map(pairs) => pairs.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A simple value with no dedicated [`Value`] variant.
///
/// Codes 20 to 23 are `false`, `true`, `null` and `undefined`, and 24 to 31
/// are reserved, so only 0..=19 and 32..=255 can be held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SimpleCode(u8);

impl SimpleCode {
    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for SimpleCode {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            20..=31 => Err(value),
            _ => Ok(Self(value)),
        }
    }
}

impl From<SimpleCode> for u8 {
    fn from(value: SimpleCode) -> Self {
        value.0
    }
}

impl core::fmt::Display for SimpleCode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        self.0.fmt(f)
    }
}

/// A decoded CBOR data item.
#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Undefined,
    Bool(bool),
    /// Covers the full native range -2^64..2^64-1, larger magnitudes are
    /// written as bignums.
    Integer(i128),
    Float(f64),
    Simple(SimpleCode),
    Text(String),
    Bytes(Vec<u8>),
    Array(Vec<Value>),
    Map(Map),
    Indefinite(Indefinite),
    Tagged(u64, Box<Value>),
}

impl Value {
    pub fn tagged(tag: impl Into<u64>, value: Value) -> Self {
        Self::Tagged(tag.into(), Box::new(value))
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Undefined => "undefined",
            Self::Bool(_) => "boolean",
            Self::Integer(_) => "integer",
            Self::Float(_) => "float",
            Self::Simple(_) => "simple value",
            Self::Text(_) => "text string",
            Self::Bytes(_) => "byte string",
            Self::Array(_) | Self::Indefinite(Indefinite::Array(_)) => "array",
            Self::Map(_) | Self::Indefinite(Indefinite::Map(_)) => "map",
            Self::Tagged(..) => "tagged value",
        }
    }

    pub fn as_integer(&self) -> Option<i128> {
        match self {
            Self::Integer(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(b) => Some(b),
            _ => None,
        }
    }

    /// Items of a definite or indefinite array
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Self::Array(items) | Self::Indefinite(Indefinite::Array(items)) => Some(items),
            _ => None,
        }
    }

    /// Pairs of a definite or indefinite map
    pub fn as_map(&self) -> Option<&[(Value, Value)]> {
        match self {
            Self::Map(pairs) | Self::Indefinite(Indefinite::Map(pairs)) => Some(pairs),
            _ => None,
        }
    }

    /// Looks up the first entry whose key equals `key`
    pub fn get(&self, key: &Value) -> Option<&Value> {
        self.as_map()?
            .iter()
            .find_map(|(k, v)| (k == key).then_some(v))
    }
}

// Floats compare by bit pattern, except that every NaN equals every other NaN,
// so that a decoded tree always equals the tree it was encoded from.
fn float_eq(lhs: f64, rhs: f64) -> bool {
    (lhs.is_nan() && rhs.is_nan()) || lhs.to_bits() == rhs.to_bits()
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) | (Self::Undefined, Self::Undefined) => true,
            (Self::Bool(l), Self::Bool(r)) => l == r,
            (Self::Integer(l), Self::Integer(r)) => l == r,
            (Self::Float(l), Self::Float(r)) => float_eq(*l, *r),
            (Self::Simple(l), Self::Simple(r)) => l == r,
            (Self::Text(l), Self::Text(r)) => l == r,
            (Self::Bytes(l), Self::Bytes(r)) => l == r,
            (Self::Array(l), Self::Array(r)) => l == r,
            (Self::Map(l), Self::Map(r)) => l == r,
            (Self::Indefinite(l), Self::Indefinite(r)) => l == r,
            (Self::Tagged(lt, lv), Self::Tagged(rt, rv)) => lt == rt && lv == rv,
            _ => false,
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

macro_rules! impl_integer_from {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Self::Integer(value as i128)
                }
            }
        )*
    };
}

impl_integer_from!(u8, u16, u32, u64, usize, i8, i16, i32, i64, isize, i128);

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Self::Float(value.into())
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.into())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&[u8]> for Value {
    fn from(value: &[u8]) -> Self {
        Self::Bytes(value.to_vec())
    }
}

impl From<Vec<u8>> for Value {
    fn from(value: Vec<u8>) -> Self {
        Self::Bytes(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Self::Array(value)
    }
}

impl From<SimpleCode> for Value {
    fn from(value: SimpleCode) -> Self {
        Self::Simple(value)
    }
}

impl From<Indefinite> for Value {
    fn from(value: Indefinite) -> Self {
        Self::Indefinite(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => v.into(),
            None => Self::Null,
        }
    }
}
