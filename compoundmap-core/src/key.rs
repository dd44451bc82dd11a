use std::fmt;

use indexmap::IndexMap;

use crate::scalar::Value;
use crate::token::Token;

/// The name or token identifying one field of a compound key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Selector {
    /// Textual field name.
    Name(String),
    /// Token-identified field (see [`Token`]).
    Token(Token),
}

impl Selector {
    /// Views this selector as a scalar [`Value`], for ordering purposes.
    pub fn to_value(&self) -> Value {
        match self {
            Selector::Name(s) => Value::Text(s.clone()),
            Selector::Token(t) => Value::Token(t.clone()),
        }
    }
}

impl From<&str> for Selector {
    fn from(s: &str) -> Self {
        Selector::Name(s.to_string())
    }
}

impl From<String> for Selector {
    fn from(s: String) -> Self {
        Selector::Name(s)
    }
}

impl From<Token> for Selector {
    fn from(t: Token) -> Self {
        Selector::Token(t)
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::Name(s) => write!(f, "{s}"),
            Selector::Token(t) => write!(f, "{t}"),
        }
    }
}

/// A structured key: a collection of (selector, value) fields.
///
/// Field definition order is preserved and observable through the
/// insertion-order strategy, but equality is order-independent: two keys
/// with the same fields in different order are equal.
///
/// Map operations never mutate the keys they are given.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompoundKey {
    fields: IndexMap<Selector, Value>,
}

impl CompoundKey {
    /// Creates an empty key (the root of the trie).
    pub fn new() -> Self {
        CompoundKey {
            fields: IndexMap::new(),
        }
    }

    /// Adds a field, builder-style. A repeated selector overwrites the
    /// earlier value but keeps its original position.
    pub fn field(mut self, selector: impl Into<Selector>, value: impl Into<Value>) -> Self {
        self.insert(selector, value);
        self
    }

    /// Adds or replaces a field in place.
    pub fn insert(&mut self, selector: impl Into<Selector>, value: impl Into<Value>) {
        self.fields.insert(selector.into(), value.into());
    }

    /// Reads a field. Yields [`Value::Absent`] for a selector this key does
    /// not define, mirroring an undefined host read.
    pub fn get(&self, selector: &Selector) -> Value {
        self.fields
            .get(selector)
            .cloned()
            .unwrap_or(Value::Absent)
    }

    /// Whether the key defines the given selector.
    pub fn defines(&self, selector: &Selector) -> bool {
        self.fields.contains_key(selector)
    }

    /// Selectors in definition order.
    pub fn selectors(&self) -> impl Iterator<Item = &Selector> {
        self.fields.keys()
    }

    /// (selector, value) pairs in definition order.
    pub fn fields(&self) -> impl Iterator<Item = (&Selector, &Value)> {
        self.fields.iter()
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether this is the empty key.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<S: Into<Selector>, V: Into<Value>> FromIterator<(S, V)> for CompoundKey {
    fn from_iter<I: IntoIterator<Item = (S, V)>>(iter: I) -> Self {
        CompoundKey {
            fields: iter
                .into_iter()
                .map(|(s, v)| (s.into(), v.into()))
                .collect(),
        }
    }
}

/// Conversion of an arbitrary record into its compound key.
///
/// Derivable for named-field structs via `#[derive(AsCompoundKey)]` when the
/// `derive` feature is enabled: each field becomes a named selector holding
/// the field's value.
pub trait AsCompoundKey {
    /// Builds the compound key describing this record.
    fn as_compound_key(&self) -> CompoundKey;
}

impl AsCompoundKey for CompoundKey {
    fn as_compound_key(&self) -> CompoundKey {
        self.clone()
    }
}
