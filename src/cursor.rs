//! Cursors: `Copy` positions in a map's insertion order.
//!
//! A `Cursor` owns nothing. It records which map minted it and which node
//! it denotes, and every operation takes the map so ownership and
//! generation can be checked. A cursor keeps working across rehashes and
//! across inserts and erases of other entries; it goes stale once its own
//! entry is erased or the map is cleared.

use crate::error::Result;
use crate::linked_hash_map::LinkedHashMap;
use crate::node::NodeKey;
use core::sync::atomic::{AtomicU64, Ordering};

/// Opaque identity of a map instance. Never reused within a process.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub(crate) struct MapId(u64);

impl MapId {
    pub(crate) fn fresh() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        MapId(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// A bidirectional position in a [`LinkedHashMap`].
///
/// Positions range over every entry plus the end position returned by
/// [`LinkedHashMap::end`]. Two cursors are equal iff they were minted by the
/// same map and denote the same position.
///
/// ```
/// use linked_hashmap::LinkedHashMap;
///
/// let mut map = LinkedHashMap::new();
/// map.insert("a", 1);
/// map.insert("b", 2);
///
/// let mut c = map.begin();
/// assert_eq!(c.get(&map), Ok((&"a", &1)));
/// c.advance(&map).unwrap();
/// *c.value_mut(&mut map).unwrap() += 10;
/// c.advance(&map).unwrap();
/// assert_eq!(c, map.end());
/// assert_eq!(map.at(&"b"), Ok(&12));
/// ```
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Cursor {
    pub(crate) owner: MapId,
    pub(crate) node: NodeKey,
}

impl Cursor {
    pub(crate) fn new(owner: MapId, node: NodeKey) -> Self {
        Cursor { owner, node }
    }

    /// Step to the next entry, or to the end position from the last entry.
    /// Fails with `PastEnd` at the end position; the cursor is unchanged on
    /// error.
    pub fn advance<K, V, S>(&mut self, map: &LinkedHashMap<K, V, S>) -> Result<()> {
        *self = map.cursor_next(*self)?;
        Ok(())
    }

    /// Step to the previous entry. Fails with `BeforeFirst` at the first
    /// entry (and at the end position of an empty map).
    pub fn retreat<K, V, S>(&mut self, map: &LinkedHashMap<K, V, S>) -> Result<()> {
        *self = map.cursor_prev(*self)?;
        Ok(())
    }

    /// Borrow the key and value at this position.
    pub fn get<'a, K, V, S>(&self, map: &'a LinkedHashMap<K, V, S>) -> Result<(&'a K, &'a V)> {
        map.cursor_entry(*self)
    }

    pub fn key<'a, K, V, S>(&self, map: &'a LinkedHashMap<K, V, S>) -> Result<&'a K> {
        map.cursor_entry(*self).map(|(k, _)| k)
    }

    pub fn value<'a, K, V, S>(&self, map: &'a LinkedHashMap<K, V, S>) -> Result<&'a V> {
        map.cursor_entry(*self).map(|(_, v)| v)
    }

    /// Mutably borrow the value at this position. The key stays immutable.
    pub fn value_mut<'a, K, V, S>(&self, map: &'a mut LinkedHashMap<K, V, S>) -> Result<&'a mut V> {
        map.cursor_entry_mut(*self).map(|(_, v)| v)
    }

    /// Whether this is `map`'s end position.
    pub fn is_end<K, V, S>(&self, map: &LinkedHashMap<K, V, S>) -> bool {
        *self == map.end()
    }
}
