use std::fmt;
use std::hash::{Hash, Hasher};

use compact_str::CompactString;

/// A facet bucket key.
///
/// Equality follows SameValueZero: every `NaN` equals every other `NaN`, and
/// `-0.0` equals `0.0`. `Hash` agrees with that equality, so keys can index a
/// `HashMap` directly.
#[derive(Debug, Clone, Default)]
pub enum Key {
    /// No value at all (the facet did not apply).
    #[default]
    Undefined,
    /// An explicit missing value.
    Null,
    Number(f64),
    String(CompactString),
}

impl Key {
    /// Whether this key is `Undefined` or `Null`.
    pub fn is_absent(&self) -> bool {
        matches!(self, Key::Undefined | Key::Null)
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Key::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Key::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Bit pattern used for hashing and equality of numbers.
    fn number_bits(n: f64) -> u64 {
        if n.is_nan() {
            f64::NAN.to_bits()
        } else if n == 0.0 {
            0.0f64.to_bits()
        } else {
            n.to_bits()
        }
    }
}

impl PartialEq for Key {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Key::Undefined, Key::Undefined) | (Key::Null, Key::Null) => true,
            (Key::Number(a), Key::Number(b)) => Key::number_bits(*a) == Key::number_bits(*b),
            (Key::String(a), Key::String(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Key {}

impl Hash for Key {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Key::Undefined | Key::Null => {}
            Key::Number(n) => Key::number_bits(*n).hash(state),
            Key::String(s) => s.hash(state),
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Undefined => f.write_str("undefined"),
            Key::Null => f.write_str("null"),
            Key::Number(n) => write!(f, "{n}"),
            Key::String(s) => f.write_str(s),
        }
    }
}

impl From<f64> for Key {
    fn from(n: f64) -> Self {
        Key::Number(n)
    }
}

impl From<f32> for Key {
    fn from(n: f32) -> Self {
        Key::Number(n as f64)
    }
}

impl From<i32> for Key {
    fn from(n: i32) -> Self {
        Key::Number(n as f64)
    }
}

impl From<i64> for Key {
    fn from(n: i64) -> Self {
        Key::Number(n as f64)
    }
}

impl From<u32> for Key {
    fn from(n: u32) -> Self {
        Key::Number(n as f64)
    }
}

impl From<usize> for Key {
    fn from(n: usize) -> Self {
        Key::Number(n as f64)
    }
}

impl From<&str> for Key {
    fn from(s: &str) -> Self {
        Key::String(CompactString::new(s))
    }
}

impl From<String> for Key {
    fn from(s: String) -> Self {
        Key::String(CompactString::from(s))
    }
}

impl From<CompactString> for Key {
    fn from(s: CompactString) -> Self {
        Key::String(s)
    }
}

/// `None` maps to `Null`: an explicitly missing value.
impl<V: Into<Key>> From<Option<V>> for Key {
    fn from(value: Option<V>) -> Self {
        value.map_or(Key::Null, Into::into)
    }
}
