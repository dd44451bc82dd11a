//! Compoundmap is a map container keyed by compound values - structured
//! records of named fields - with pluggable key-identity semantics.
//!
//! Core concepts:
//! - **Value**: A scalar field value (numbers, text, booleans, null/absent
//!   markers, identity tokens)
//! - **Token**: A value compared only by identity, never by content
//! - **CompoundKey**: A record of (selector, value) fields usable as a map key
//! - **KeyOrder**: The strategy linearizing a key into its trie walk order
//! - **CompoundMap**: The container, a trie over linearized field sequences
//!
//! Under the default [`SortedOrder`] strategy, two keys with the same fields
//! are the same key regardless of field declaration order:
//!
//! ```
//! use compoundmap_core::{CompoundKey, CompoundMap};
//!
//! let mut map: CompoundMap<u32> = CompoundMap::new();
//! let ab = CompoundKey::new().field("a", 1).field("b", 2);
//! let ba = CompoundKey::new().field("b", 2).field("a", 1);
//!
//! map.set(&ab, 7)?;
//! assert_eq!(map.get(&ba)?, Some(&7));
//! assert_eq!(map.len(), 1);
//! # Ok::<(), compoundmap_core::ScalarError>(())
//! ```
//!
//! The container is single-threaded and synchronous; wrap it in a lock for
//! shared mutation. The only fallible path is the comparator refusing a
//! non-scalar value, surfaced as [`ScalarError::NonScalar`].

mod key;
mod map;
mod node;
mod order;
mod scalar;
mod token;

pub use key::{AsCompoundKey, CompoundKey, Selector};
pub use map::{CompoundMap, Iter, Keys, Values};
pub use order::{InsertionOrder, KeyOrder, SortedOrder};
pub use scalar::{Rank, ScalarError, Value, compare};
pub use token::Token;

#[cfg(feature = "derive")]
pub use compoundmap_derive::AsCompoundKey;
