//! Separate-chaining hash index over arena nodes.
//!
//! Buckets hold the head of a singly-linked chain; the chain link itself
//! lives in each node (`Node::chain_next`). Chain order carries no meaning.
//! The index never touches the order-list links, so rehashing cannot
//! disturb iteration order.

use crate::node::{NodeKey, Nodes};
use crate::order_list::OrderList;
use core::borrow::Borrow;

/// Bucket count of a fresh map.
pub(crate) const INITIAL_BUCKETS: usize = 16;

// Load-factor bound of 3/4, kept in integer arithmetic.
const LOAD_NUM: usize = 3;
const LOAD_DEN: usize = 4;

#[derive(Debug, Clone)]
pub(crate) struct HashIndex {
    buckets: Vec<Option<NodeKey>>,
}

impl HashIndex {
    pub(crate) fn new() -> Self {
        Self::with_buckets(INITIAL_BUCKETS)
    }

    /// `n` must be a power of two.
    pub(crate) fn with_buckets(n: usize) -> Self {
        debug_assert!(n.is_power_of_two());
        HashIndex {
            buckets: vec![None; n],
        }
    }

    /// Smallest index that holds `capacity` entries without rehashing.
    pub(crate) fn for_capacity(capacity: usize) -> Self {
        let mut n = INITIAL_BUCKETS;
        while Self::exceeds_bound(capacity, n) {
            n *= 2;
        }
        if n != INITIAL_BUCKETS {
            log::debug!("presizing hash index to {n} buckets for {capacity} entries");
        }
        Self::with_buckets(n)
    }

    #[inline]
    pub(crate) fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Entries the current bucket array holds without doubling.
    pub(crate) fn capacity(&self) -> usize {
        self.buckets.len() / LOAD_DEN * LOAD_NUM
    }

    #[inline]
    fn exceeds_bound(len: usize, buckets: usize) -> bool {
        len.saturating_mul(LOAD_DEN) > buckets.saturating_mul(LOAD_NUM)
    }

    #[inline]
    fn bucket_of(hash: u64, buckets: usize) -> usize {
        // Same as `hash % buckets` for a power-of-two bucket count.
        (hash as usize) & (buckets - 1)
    }

    pub(crate) fn locate<K, V, Q>(&self, nodes: &Nodes<K, V>, hash: u64, q: &Q) -> Option<NodeKey>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
    {
        let mut cur = self.buckets[Self::bucket_of(hash, self.buckets.len())];
        while let Some(k) = cur {
            let node = &nodes[k];
            if node.hash == hash && node.key().borrow() == q {
                return Some(k);
            }
            cur = node.chain_next;
        }
        None
    }

    /// Push `k` onto the head of its bucket's chain.
    pub(crate) fn insert_node<K, V>(&mut self, nodes: &mut Nodes<K, V>, k: NodeKey) {
        let node = &mut nodes[k];
        let b = Self::bucket_of(node.hash, self.buckets.len());
        node.chain_next = self.buckets[b];
        self.buckets[b] = Some(k);
    }

    pub(crate) fn remove_node<K, V>(&mut self, nodes: &mut Nodes<K, V>, k: NodeKey) {
        let (b, after) = {
            let node = &mut nodes[k];
            (
                Self::bucket_of(node.hash, self.buckets.len()),
                node.chain_next.take(),
            )
        };
        if self.buckets[b] == Some(k) {
            self.buckets[b] = after;
            return;
        }
        let mut cur = self.buckets[b];
        while let Some(c) = cur {
            let node = &mut nodes[c];
            if node.chain_next == Some(k) {
                node.chain_next = after;
                return;
            }
            cur = node.chain_next;
        }
        debug_assert!(false, "node missing from its bucket chain");
    }

    /// Double the bucket array if one more entry would break the load-factor
    /// bound. Returns whether a rehash happened.
    pub(crate) fn grow_if_needed<K, V>(
        &mut self,
        nodes: &mut Nodes<K, V>,
        order: &OrderList,
        len: usize,
    ) -> bool {
        if !Self::exceeds_bound(len + 1, self.buckets.len()) {
            return false;
        }
        let n = self.buckets.len() * 2;
        log::trace!("rehash: {} -> {n} buckets ({len} entries)", self.buckets.len());
        let mut buckets = vec![None; n];
        // Walk the order list, not the old buckets.
        let mut k = order.first(nodes);
        while k != order.back() {
            let node = &mut nodes[k];
            let b = Self::bucket_of(node.hash, n);
            node.chain_next = buckets[b];
            buckets[b] = Some(k);
            k = node.next;
        }
        self.buckets = buckets;
        true
    }

    /// Empty every chain, keeping the bucket count.
    pub(crate) fn clear(&mut self) {
        self.buckets.fill(None);
    }

    /// Nodes chained in the bucket `hash` maps to.
    #[cfg(test)]
    pub(crate) fn chain_for<K, V>(&self, nodes: &Nodes<K, V>, hash: u64) -> Vec<NodeKey> {
        let mut out = Vec::new();
        let mut cur = self.buckets[Self::bucket_of(hash, self.buckets.len())];
        while let Some(k) = cur {
            out.push(k);
            cur = nodes[k].chain_next;
        }
        out
    }

    /// Total number of chained nodes across all buckets.
    #[cfg(test)]
    pub(crate) fn chained_len<K, V>(&self, nodes: &Nodes<K, V>) -> usize {
        let mut n = 0;
        for head in &self.buckets {
            let mut cur = *head;
            while let Some(k) = cur {
                n += 1;
                cur = nodes[k].chain_next;
            }
        }
        n
    }
}
