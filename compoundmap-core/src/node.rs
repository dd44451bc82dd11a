use indexmap::IndexMap;

use crate::key::Selector;
use crate::scalar::Value;

/// One (selector, value) step of a linearized key.
pub(crate) type Step = (Selector, Value);

/// Recursive storage unit of the trie: an optional stored value plus a
/// two-level branch table, selector first, then that selector's value.
///
/// Both table levels keep first-insertion order, which is the canonical
/// internal ordering traversal exposes. Invariant: apart from the root,
/// a node with no value and no branches is never left in the tree -
/// [`Node::remove`] prunes it on unwind.
#[derive(Debug, Clone)]
pub(crate) struct Node<V> {
    pub(crate) value: Option<V>,
    pub(crate) branches: IndexMap<Selector, IndexMap<Value, Node<V>>>,
}

impl<V> Node<V> {
    pub(crate) fn new() -> Self {
        Node {
            value: None,
            branches: IndexMap::new(),
        }
    }

    /// Dead-weight predicate: nothing stored here or below.
    pub(crate) fn is_empty(&self) -> bool {
        self.value.is_none() && self.branches.is_empty()
    }

    /// Walks the steps by exact match. Never creates nodes; the first
    /// missing step means "not found".
    pub(crate) fn find(&self, steps: &[Step]) -> Option<&Node<V>> {
        let mut node = self;
        for (selector, value) in steps {
            node = node.branches.get(selector)?.get(value)?;
        }
        Some(node)
    }

    pub(crate) fn find_mut(&mut self, steps: &[Step]) -> Option<&mut Node<V>> {
        let mut node = self;
        for (selector, value) in steps {
            node = node.branches.get_mut(selector)?.get_mut(value)?;
        }
        Some(node)
    }

    /// The same walk as [`Node::find`], creating every missing table entry
    /// and child along the way. The terminal node starts with a vacant
    /// value slot when freshly created.
    pub(crate) fn ensure(&mut self, steps: Vec<Step>) -> &mut Node<V> {
        let mut node = self;
        for (selector, value) in steps {
            node = node
                .branches
                .entry(selector)
                .or_default()
                .entry(value)
                .or_insert_with(Node::new);
        }
        node
    }

    /// Clears the value slot at the end of the walk, pruning emptied nodes
    /// and table entries on the way back up. Returns the removed value, or
    /// `None` when any step was missing or the slot was already vacant -
    /// in which case nothing is mutated.
    ///
    /// Pruning stops at the first node that still carries a value or a
    /// populated branch, so a key that is a structural prefix of another
    /// survives the other's removal (and vice versa). The node `remove` is
    /// called on is never pruned itself.
    pub(crate) fn remove(&mut self, steps: &[Step]) -> Option<V> {
        let Some(((selector, value), rest)) = steps.split_first() else {
            return self.value.take();
        };
        let table = self.branches.get_mut(selector)?;
        let child = table.get_mut(value)?;
        let removed = child.remove(rest);
        if removed.is_some() {
            if child.is_empty() {
                table.shift_remove(value);
            }
            if table.is_empty() {
                self.branches.shift_remove(selector);
            }
        }
        removed
    }
}

impl<V> Default for Node<V> {
    fn default() -> Self {
        Node::new()
    }
}
