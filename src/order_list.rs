//! Insertion-order list threaded through the arena.
//!
//! Two permanent sentinel nodes bound the list. Real nodes are only ever
//! appended just before the back sentinel and unlinked from wherever they
//! sit; nothing else reorders the list.

use crate::node::{Node, NodeKey, Nodes};

#[derive(Debug, Clone, Copy)]
pub(crate) struct OrderList {
    front: NodeKey,
    back: NodeKey,
}

impl OrderList {
    /// Allocate both sentinels in `nodes` and link them to each other.
    pub(crate) fn new<K, V>(nodes: &mut Nodes<K, V>) -> Self {
        let front = nodes.insert(Node::sentinel());
        let back = nodes.insert(Node::sentinel());
        let list = OrderList { front, back };
        list.reset(nodes);
        list
    }

    #[inline]
    pub(crate) fn front(&self) -> NodeKey {
        self.front
    }

    #[inline]
    pub(crate) fn back(&self) -> NodeKey {
        self.back
    }

    #[inline]
    pub(crate) fn is_sentinel(&self, k: NodeKey) -> bool {
        k == self.front || k == self.back
    }

    /// First live node, or the back sentinel when empty.
    #[inline]
    pub(crate) fn first<K, V>(&self, nodes: &Nodes<K, V>) -> NodeKey {
        nodes[self.front].next
    }

    /// Last live node, or the front sentinel when empty.
    #[inline]
    pub(crate) fn last<K, V>(&self, nodes: &Nodes<K, V>) -> NodeKey {
        nodes[self.back].prev
    }

    pub(crate) fn append_before_back<K, V>(&self, nodes: &mut Nodes<K, V>, k: NodeKey) {
        debug_assert!(!self.is_sentinel(k));
        let last = nodes[self.back].prev;
        {
            let node = &mut nodes[k];
            node.prev = last;
            node.next = self.back;
        }
        nodes[last].next = k;
        nodes[self.back].prev = k;
    }

    pub(crate) fn unlink<K, V>(&self, nodes: &mut Nodes<K, V>, k: NodeKey) {
        debug_assert!(!self.is_sentinel(k));
        let (prev, next) = {
            let node = &nodes[k];
            (node.prev, node.next)
        };
        nodes[prev].next = next;
        nodes[next].prev = prev;
    }

    /// Back to the sentinel-only state. Does not free any node.
    pub(crate) fn reset<K, V>(&self, nodes: &mut Nodes<K, V>) {
        nodes[self.front].next = self.back;
        nodes[self.back].prev = self.front;
    }

    /// Keys of the live nodes, front to back.
    pub(crate) fn keys<'a, K, V>(&self, nodes: &'a Nodes<K, V>) -> OrderKeys<'a, K, V> {
        OrderKeys {
            nodes,
            cur: self.first(nodes),
            back: self.back,
        }
    }
}

pub(crate) struct OrderKeys<'a, K, V> {
    nodes: &'a Nodes<K, V>,
    cur: NodeKey,
    back: NodeKey,
}

impl<K, V> Iterator for OrderKeys<'_, K, V> {
    type Item = NodeKey;

    fn next(&mut self) -> Option<NodeKey> {
        if self.cur == self.back {
            return None;
        }
        let k = self.cur;
        self.cur = self.nodes[k].next;
        Some(k)
    }
}
