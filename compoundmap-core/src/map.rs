use indexmap::IndexMap;

use crate::key::{CompoundKey, Selector};
use crate::node::{Node, Step};
use crate::order::{KeyOrder, SortedOrder};
use crate::scalar::{ScalarError, Value};

/// A map keyed by compound values.
///
/// Key identity is decided by the configured [`KeyOrder`] strategy: under
/// the default [`SortedOrder`], two keys with the same (selector, value)
/// fields are the same key no matter how their fields were declared.
/// Storage is a trie over the linearized field sequence, so keys sharing a
/// structural prefix coexist without interference.
///
/// Operations are fallible only through the strategy: linearization happens
/// before any node is touched, so a strategy error leaves the map
/// unmodified. The built-in strategies never fail for keys built through
/// [`CompoundKey`].
///
/// # Example
///
/// ```
/// use compoundmap_core::{CompoundKey, CompoundMap};
///
/// let mut map: CompoundMap<&str> = CompoundMap::new();
/// let declared = CompoundKey::new().field("a", 1).field("b", 2);
/// let reordered = CompoundKey::new().field("b", 2).field("a", 1);
///
/// map.set(&declared, "hit")?;
/// assert_eq!(map.get(&reordered)?, Some(&"hit"));
/// # Ok::<(), compoundmap_core::ScalarError>(())
/// ```
#[derive(Debug)]
pub struct CompoundMap<V, S = SortedOrder> {
    root: Node<V>,
    order: S,
    len: usize,
}

impl<V> CompoundMap<V> {
    /// Creates an empty map using the default sorted strategy.
    pub fn new() -> Self {
        CompoundMap::with_order(SortedOrder)
    }
}

impl<V, S: KeyOrder> CompoundMap<V, S> {
    /// Creates an empty map using the given linearization strategy.
    pub fn with_order(order: S) -> Self {
        CompoundMap {
            root: Node::new(),
            order,
            len: 0,
        }
    }

    /// Linearizes a key into its (selector, value) walk steps.
    fn steps(&self, key: &CompoundKey) -> Result<Vec<Step>, ScalarError> {
        Ok(self
            .order
            .order(key)?
            .into_iter()
            .map(|selector| {
                let value = key.get(&selector);
                (selector, value)
            })
            .collect())
    }

    /// Returns the value stored under `key`, if any.
    pub fn get(&self, key: &CompoundKey) -> Result<Option<&V>, ScalarError> {
        let steps = self.steps(key)?;
        Ok(self.root.find(&steps).and_then(|node| node.value.as_ref()))
    }

    /// Mutable access to the value stored under `key`, if any.
    pub fn get_mut(&mut self, key: &CompoundKey) -> Result<Option<&mut V>, ScalarError> {
        let steps = self.steps(key)?;
        Ok(self
            .root
            .find_mut(&steps)
            .and_then(|node| node.value.as_mut()))
    }

    /// Whether `key` currently holds a value.
    pub fn has(&self, key: &CompoundKey) -> Result<bool, ScalarError> {
        Ok(self.get(key)?.is_some())
    }

    /// Stores `value` under `key`, overwriting any previous value.
    ///
    /// Returns the map itself so calls chain through `?`:
    ///
    /// ```
    /// # use compoundmap_core::{CompoundKey, CompoundMap};
    /// # let mut map: CompoundMap<u32> = CompoundMap::new();
    /// let a = CompoundKey::new().field("a", 1);
    /// let b = CompoundKey::new().field("b", 2);
    /// map.set(&a, 1)?.set(&b, 2)?;
    /// # Ok::<(), compoundmap_core::ScalarError>(())
    /// ```
    pub fn set(&mut self, key: &CompoundKey, value: V) -> Result<&mut Self, ScalarError> {
        let steps = self.steps(key)?;
        let node = self.root.ensure(steps);
        if node.value.is_none() {
            self.len += 1;
        }
        node.value = Some(value);
        Ok(self)
    }

    /// Removes `key` and its value. Returns whether anything was removed;
    /// an absent key is a no-op. Nodes and branch entries left empty by the
    /// removal are pruned.
    pub fn delete(&mut self, key: &CompoundKey) -> Result<bool, ScalarError> {
        let steps = self.steps(key)?;
        match self.root.remove(&steps) {
            Some(_) => {
                self.len -= 1;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Drops every entry, resetting to a fresh empty trie.
    pub fn clear(&mut self) {
        self.root = Node::new();
        self.len = 0;
    }

    /// Number of keys currently holding a value.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the map holds no values.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Iterates over (key, value) entries.
    ///
    /// The traversal is depth-first pre-order over the trie: a node's own
    /// value is visited before its branches, branches in first-insertion
    /// order at both table levels. This is **not** insertion order of the
    /// map - a shorter-prefix key inserted late is still visited before the
    /// longer keys sharing its prefix. Each call starts a fresh walk over
    /// live state; the borrow rules prevent mutation while one is held.
    ///
    /// Yielded keys carry their fields in traversal order; key equality is
    /// order-independent, so they compare equal to the keys that were
    /// inserted.
    pub fn iter(&self) -> Iter<'_, V> {
        Iter::new(&self.root)
    }

    /// Iterates over the keys, in [`CompoundMap::iter`] order.
    pub fn keys(&self) -> Keys<'_, V> {
        Keys(self.iter())
    }

    /// Iterates over the values, in [`CompoundMap::iter`] order.
    pub fn values(&self) -> Values<'_, V> {
        Values(self.iter())
    }
}

impl<V, S: KeyOrder + Default> Default for CompoundMap<V, S> {
    fn default() -> Self {
        CompoundMap::with_order(S::default())
    }
}

impl<'a, V, S: KeyOrder> IntoIterator for &'a CompoundMap<V, S> {
    type Item = (CompoundKey, &'a V);
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// One level of the depth-first walk: the node's not-yet-yielded value plus
/// cursors into its two-level branch table.
struct Frame<'a, V> {
    value: Option<&'a V>,
    outer: indexmap::map::Iter<'a, Selector, IndexMap<Value, Node<V>>>,
    inner: Option<(&'a Selector, indexmap::map::Iter<'a, Value, Node<V>>)>,
}

impl<'a, V> Frame<'a, V> {
    fn new(node: &'a Node<V>) -> Self {
        Frame {
            value: node.value.as_ref(),
            outer: node.branches.iter(),
            inner: None,
        }
    }
}

/// Lazy entry iterator, see [`CompoundMap::iter`].
pub struct Iter<'a, V> {
    stack: Vec<Frame<'a, V>>,
    /// (selector, value) steps leading to the frame on top of the stack.
    path: Vec<(&'a Selector, &'a Value)>,
}

impl<'a, V> Iter<'a, V> {
    fn new(root: &'a Node<V>) -> Self {
        Iter {
            stack: vec![Frame::new(root)],
            path: Vec::new(),
        }
    }

    fn current_key(&self) -> CompoundKey {
        self.path
            .iter()
            .map(|(selector, value)| ((*selector).clone(), (*value).clone()))
            .collect()
    }

    /// Advances to the next stored value, leaving `path` positioned at the
    /// node that holds it.
    fn next_value(&mut self) -> Option<&'a V> {
        loop {
            let frame = self.stack.last_mut()?;
            if let Some(value) = frame.value.take() {
                return Some(value);
            }
            if let Some((selector, values)) = frame.inner.as_mut() {
                if let Some((value, child)) = values.next() {
                    let selector = *selector;
                    self.path.push((selector, value));
                    self.stack.push(Frame::new(child));
                    continue;
                }
                frame.inner = None;
            }
            if let Some((selector, table)) = frame.outer.next() {
                frame.inner = Some((selector, table.iter()));
                continue;
            }
            self.stack.pop();
            self.path.pop();
        }
    }
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (CompoundKey, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let value = self.next_value()?;
        Some((self.current_key(), value))
    }
}

/// Lazy key iterator, see [`CompoundMap::keys`].
pub struct Keys<'a, V>(Iter<'a, V>);

impl<V> Iterator for Keys<'_, V> {
    type Item = CompoundKey;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next_value()?;
        Some(self.0.current_key())
    }
}

/// Lazy value iterator, see [`CompoundMap::values`].
pub struct Values<'a, V>(Iter<'a, V>);

impl<'a, V> Iterator for Values<'a, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next_value()
    }
}
