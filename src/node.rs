//! Arena storage for map nodes.
//!
//! Every live entry and both order-list sentinels occupy one slot of a
//! `SlotMap`. Links between nodes are generational `NodeKey`s rather than
//! pointers, so a key to an erased node stops resolving instead of aliasing
//! whatever reuses its slot.

use slotmap::{new_key_type, Key, SlotMap};

new_key_type! {
    /// Generational index of a node in the arena.
    pub(crate) struct NodeKey;
}

pub(crate) type Nodes<K, V> = SlotMap<NodeKey, Node<K, V>>;

#[cold]
#[inline(never)]
fn sentinel_access() -> ! {
    panic!("attempted to access the entry of an order-list sentinel");
}

#[derive(Debug)]
pub(crate) struct Node<K, V> {
    /// `None` only for the two sentinels.
    entry: Option<(K, V)>,
    /// Hash of the key, computed once at insertion.
    pub(crate) hash: u64,
    /// Next node in the same bucket chain.
    pub(crate) chain_next: Option<NodeKey>,
    pub(crate) prev: NodeKey,
    pub(crate) next: NodeKey,
}

impl<K, V> Node<K, V> {
    pub(crate) fn sentinel() -> Self {
        Node {
            entry: None,
            hash: 0,
            chain_next: None,
            prev: NodeKey::null(),
            next: NodeKey::null(),
        }
    }

    pub(crate) fn new(key: K, value: V, hash: u64) -> Self {
        Node {
            entry: Some((key, value)),
            hash,
            chain_next: None,
            prev: NodeKey::null(),
            next: NodeKey::null(),
        }
    }

    #[inline]
    pub(crate) fn is_sentinel(&self) -> bool {
        self.entry.is_none()
    }

    #[inline]
    pub(crate) fn key(&self) -> &K {
        match &self.entry {
            Some((k, _)) => k,
            None => sentinel_access(),
        }
    }

    #[inline]
    pub(crate) fn entry(&self) -> (&K, &V) {
        match &self.entry {
            Some((k, v)) => (k, v),
            None => sentinel_access(),
        }
    }

    #[inline]
    pub(crate) fn entry_mut(&mut self) -> (&K, &mut V) {
        match &mut self.entry {
            Some((k, v)) => (&*k, v),
            None => sentinel_access(),
        }
    }

    pub(crate) fn into_entry(self) -> (K, V) {
        match self.entry {
            Some(kv) => kv,
            None => sentinel_access(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinel_has_no_entry() {
        let s: Node<u32, u32> = Node::sentinel();
        assert!(s.is_sentinel());
        assert!(s.prev.is_null() && s.next.is_null());
        assert!(s.chain_next.is_none());
    }

    #[test]
    fn entry_value_is_mutable_in_place() {
        let mut n = Node::new("k", 1, 7);
        assert!(!n.is_sentinel());
        *n.entry_mut().1 += 1;
        assert_eq!(n.entry(), (&"k", &2));
        assert_eq!(n.key(), &"k");
        assert_eq!(n.into_entry(), ("k", 2));
    }

    #[test]
    #[should_panic(expected = "sentinel")]
    fn reading_sentinel_panics() {
        let s: Node<u32, u32> = Node::sentinel();
        let _ = s.entry();
    }

    #[test]
    fn removed_key_does_not_resolve_after_slot_reuse() {
        let mut nodes: Nodes<u32, u32> = SlotMap::with_key();
        let a = nodes.insert(Node::new(1, 1, 1));
        nodes.remove(a);
        let b = nodes.insert(Node::new(2, 2, 2));
        assert_ne!(a, b);
        assert!(nodes.get(a).is_none());
        assert_eq!(nodes[b].key(), &2);
    }
}
