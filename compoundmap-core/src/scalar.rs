use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::token::Token;

/// Error for scalar operations.
#[derive(Debug, thiserror::Error)]
pub enum ScalarError {
    /// A value outside the scalar vocabulary was handed to the comparator.
    #[error("non-scalar value cannot be ordered: {0}")]
    NonScalar(String),
}

/// Ordering class of a scalar, consulted before any same-class rule.
///
/// Values of different ranks compare by rank alone; the variant order here
/// is the documented total order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Rank {
    Absent,
    Null,
    Numeric,
    Textual,
    Token,
}

/// A field value of a compound key.
///
/// All variants except [`Value::List`] are scalars. `List` is representable
/// so that callers can attempt nested keys, but it has no rank: asking the
/// comparator to order one is the single error of this crate. Exact-match
/// trie lookup still works for it.
#[derive(Debug, Clone)]
pub enum Value {
    /// Absent marker. Also what field access yields for a selector the key
    /// does not define.
    Absent,
    /// Null marker.
    Null,
    /// Boolean. Ranks as numeric and compares as 0/1.
    Bool(bool),
    /// Numeric value. For lookup purposes all NaNs are one value and
    /// `-0.0 == 0.0`; for ordering, NaN ties NaN and sorts after every
    /// other number.
    Number(f64),
    /// Textual value.
    Text(String),
    /// Unique-identity token (see [`Token`]).
    Token(Token),
    /// Nested sequence. Not a scalar.
    List(Vec<Value>),
}

impl Value {
    /// Returns the ordering class of this value.
    ///
    /// Fails with [`ScalarError::NonScalar`] for [`Value::List`].
    pub fn rank(&self) -> Result<Rank, ScalarError> {
        match self {
            Value::Absent => Ok(Rank::Absent),
            Value::Null => Ok(Rank::Null),
            Value::Bool(_) | Value::Number(_) => Ok(Rank::Numeric),
            Value::Text(_) => Ok(Rank::Textual),
            Value::Token(_) => Ok(Rank::Token),
            Value::List(_) => Err(ScalarError::NonScalar(self.to_string())),
        }
    }

    /// Numeric reading of this value, if it has one (booleans read as 0/1).
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }
}

/// Compares two scalars in the documented total order.
///
/// Rank decides first; within a rank: absent/null always tie, numerics
/// compare by value, text lexicographically, and tokens by their printable
/// rendering. Two distinct tokens with equal descriptions therefore tie -
/// an accepted limitation, identity is still distinguished by lookup.
pub fn compare(a: &Value, b: &Value) -> Result<Ordering, ScalarError> {
    let ra = a.rank()?;
    let rb = b.rank()?;
    Ok(if ra != rb {
        ra.cmp(&rb)
    } else {
        match (a, b) {
            (Value::Text(x), Value::Text(y)) => x.cmp(y),
            (Value::Token(x), Value::Token(y)) => x.description().cmp(y.description()),
            (x, y) => match (x.as_number(), y.as_number()) {
                (Some(m), Some(n)) => cmp_numbers(m, n),
                // Same-rank pairs without a numeric reading are absent/null.
                _ => Ordering::Equal,
            },
        }
    })
}

fn cmp_numbers(a: f64, b: f64) -> Ordering {
    if a.is_nan() || b.is_nan() {
        // NaN ties with NaN and sorts after every other number.
        return a.is_nan().cmp(&b.is_nan());
    }
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

/// Folds the float representations that lookup treats as one value.
fn canonical_bits(n: f64) -> u64 {
    if n.is_nan() {
        f64::NAN.to_bits()
    } else if n == 0.0 {
        0f64.to_bits()
    } else {
        n.to_bits()
    }
}

// Manual PartialEq/Hash: derived float semantics (NaN != NaN, -0.0 vs 0.0)
// would make a stored key unreachable.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Absent, Value::Absent) => true,
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => canonical_bits(*a) == canonical_bits(*b),
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::Token(a), Value::Token(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::Absent | Value::Null => {}
            Value::Bool(b) => b.hash(state),
            Value::Number(n) => canonical_bits(*n).hash(state),
            Value::Text(s) => s.hash(state),
            Value::Token(t) => t.hash(state),
            Value::List(items) => items.hash(state),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Absent => write!(f, "absent"),
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Number(n) => write!(f, "{n}"),
            Value::Text(s) => write!(f, "{s:?}"),
            Value::Token(t) => write!(f, "{t}"),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
        }
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

impl From<f32> for Value {
    fn from(n: f32) -> Self {
        Value::Number(n.into())
    }
}

macro_rules! impl_value_from_int {
    ($($t:ty),*) => {$(
        impl From<$t> for Value {
            fn from(n: $t) -> Self {
                Value::Number(n.into())
            }
        }
    )*};
}

impl_value_from_int!(u8, u16, u32, i8, i16, i32);

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<Token> for Value {
    fn from(t: Token) -> Self {
        Value::Token(t)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(v) => v.into(),
            None => Value::Null,
        }
    }
}
