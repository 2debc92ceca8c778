//! Table: the node arena, order list and hash index kept in lockstep.
//!
//! Every method that adds or drops a node updates the hash index and the
//! order list before returning, so callers never observe a node reachable
//! from one structure but not the other. This layer never hashes keys;
//! hashes arrive precomputed and are stored in the node.

use crate::hash_index::HashIndex;
use crate::node::{Node, NodeKey, Nodes};
use crate::order_list::OrderList;
use core::borrow::Borrow;
use slotmap::SlotMap;

#[derive(Debug)]
pub(crate) struct Table<K, V> {
    pub(crate) nodes: Nodes<K, V>,
    pub(crate) order: OrderList,
    pub(crate) index: HashIndex,
    len: usize,
}

impl<K, V> Table<K, V> {
    pub(crate) fn new(index: HashIndex) -> Self {
        let mut nodes = SlotMap::with_key();
        let order = OrderList::new(&mut nodes);
        Table {
            nodes,
            order,
            index,
            len: 0,
        }
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        let mut nodes = SlotMap::with_capacity_and_key(capacity.saturating_add(2));
        let order = OrderList::new(&mut nodes);
        Table {
            nodes,
            order,
            index: HashIndex::for_capacity(capacity),
            len: 0,
        }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub(crate) fn node(&self, k: NodeKey) -> Option<&Node<K, V>> {
        self.nodes.get(k)
    }

    #[inline]
    pub(crate) fn node_mut(&mut self, k: NodeKey) -> Option<&mut Node<K, V>> {
        self.nodes.get_mut(k)
    }

    pub(crate) fn locate<Q>(&self, hash: u64, q: &Q) -> Option<NodeKey>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
    {
        self.index.locate(&self.nodes, hash, q)
    }

    /// Add an entry whose key is known to be absent. Grows the index first
    /// if needed, then links the node into its bucket and the back of the
    /// order list.
    pub(crate) fn push_new(&mut self, hash: u64, key: K, value: V) -> NodeKey {
        self.index.grow_if_needed(&mut self.nodes, &self.order, self.len);
        let k = self.nodes.insert(Node::new(key, value, hash));
        self.index.insert_node(&mut self.nodes, k);
        self.order.append_before_back(&mut self.nodes, k);
        self.len += 1;
        k
    }

    /// Drop a live, non-sentinel node from both structures and the arena.
    pub(crate) fn unlink_node(&mut self, k: NodeKey) -> (K, V) {
        debug_assert!(!self.order.is_sentinel(k));
        self.index.remove_node(&mut self.nodes, k);
        self.order.unlink(&mut self.nodes, k);
        self.len -= 1;
        match self.nodes.remove(k) {
            Some(node) => node.into_entry(),
            None => unreachable!("unlinked node missing from arena"),
        }
    }

    /// Free every entry. Sentinels and bucket count survive.
    pub(crate) fn clear(&mut self) {
        let (front, back) = (self.order.front(), self.order.back());
        self.nodes.retain(|k, _| k == front || k == back);
        self.order.reset(&mut self.nodes);
        self.index.clear();
        self.len = 0;
    }

    /// Free every entry and replace the bucket array with a fresh one of
    /// `buckets` buckets. Sentinels survive.
    pub(crate) fn reset(&mut self, buckets: usize) {
        self.clear();
        self.index = HashIndex::with_buckets(buckets);
    }

    pub(crate) fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&K, &mut V) -> bool,
    {
        let back = self.order.back();
        let mut k = self.order.first(&self.nodes);
        while k != back {
            let node = &mut self.nodes[k];
            let next = node.next;
            let (key, value) = node.entry_mut();
            if !keep(key, value) {
                let _ = self.unlink_node(k);
            }
            k = next;
        }
    }

    /// Append clones of `other`'s entries, front to back. The hasher that
    /// produced `other`'s stored hashes must be the one used with `self`.
    pub(crate) fn replay_from(&mut self, other: &Table<K, V>)
    where
        K: Clone,
        V: Clone,
    {
        for k in other.order.keys(&other.nodes) {
            let node = &other.nodes[k];
            let (key, value) = node.entry();
            self.push_new(node.hash, key.clone(), value.clone());
        }
    }

    /// Panic unless every structural invariant holds.
    #[cfg(test)]
    pub(crate) fn assert_invariants<S>(&self, hasher: &S)
    where
        K: core::hash::Hash + Eq,
        S: core::hash::BuildHasher,
    {
        use slotmap::Key;

        let front = self.order.front();
        let back = self.order.back();
        assert!(self.nodes[front].is_sentinel() && self.nodes[back].is_sentinel());
        assert!(self.nodes[front].prev.is_null());
        assert!(self.nodes[back].next.is_null());

        // Order list visits every live node once, with consistent back links.
        let mut seen = 0usize;
        let mut prev = front;
        let mut k = self.nodes[front].next;
        while k != back {
            let node = &self.nodes[k];
            assert!(!node.is_sentinel());
            assert_eq!(node.prev, prev, "broken back link");
            seen += 1;
            assert!(seen <= self.len, "order list longer than len");
            prev = k;
            k = node.next;
        }
        assert_eq!(self.nodes[back].prev, prev);
        assert_eq!(seen, self.len);
        assert_eq!(self.nodes.len(), self.len + 2);

        // Each live node sits exactly once in the chain its key hashes to,
        // and its key is unique.
        assert_eq!(self.index.chained_len(&self.nodes), self.len);
        for k in self.order.keys(&self.nodes) {
            let node = &self.nodes[k];
            assert_eq!(hasher.hash_one(node.key()), node.hash, "stale stored hash");
            let chain = self.index.chain_for(&self.nodes, node.hash);
            assert_eq!(chain.iter().filter(|&&c| c == k).count(), 1);
            assert_eq!(self.locate(node.hash, node.key()), Some(k));
        }

        // Load-factor bound.
        assert!(self.len * 4 <= self.index.bucket_count() * 3);
    }
}
