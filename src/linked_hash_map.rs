//! LinkedHashMap: public facade over the table, with cursors and a debug
//! reentrancy guard.

use crate::cursor::{Cursor, MapId};
use crate::error::{CursorFault, Error, Result};
use crate::hash_index::HashIndex;
use crate::iter::{IntoIter, Iter, IterMut, Keys, Values, ValuesMut};
use crate::node::{Node, NodeKey};
use crate::reentrancy::DebugReentrancy;
use crate::table::Table;
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use core::ops::Index;
use std::collections::hash_map::RandomState;

/// A hash map that iterates in insertion order.
///
/// Lookups go through a separate-chaining hash index; iteration follows a
/// doubly-linked list that records the order in which keys were first
/// inserted. Re-inserting a present key changes nothing: neither its value
/// nor its position.
///
/// The map is single-threaded (`!Send`, `!Sync`).
///
/// ```
/// use linked_hashmap::LinkedHashMap;
///
/// let mut map = LinkedHashMap::new();
/// map.insert(3, "c");
/// map.insert(1, "a");
/// let (_, inserted) = map.insert(3, "z");
/// assert!(!inserted);
///
/// let entries: Vec<_> = map.iter().collect();
/// assert_eq!(entries, [(&3, &"c"), (&1, &"a")]);
/// ```
pub struct LinkedHashMap<K, V, S = RandomState> {
    hasher: S,
    id: MapId,
    table: Table<K, V>,
    reentrancy: DebugReentrancy,
}

impl<K, V> LinkedHashMap<K, V> {
    pub fn new() -> Self {
        Self::with_hasher(RandomState::new())
    }

    /// A map whose hash index holds `capacity` entries before its first
    /// rehash.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_hasher(capacity, RandomState::new())
    }
}

impl<K, V, S> LinkedHashMap<K, V, S> {
    pub fn with_hasher(hasher: S) -> Self {
        Self {
            hasher,
            id: MapId::fresh(),
            table: Table::new(HashIndex::new()),
            reentrancy: DebugReentrancy::new(),
        }
    }

    pub fn with_capacity_and_hasher(capacity: usize, hasher: S) -> Self {
        Self {
            hasher,
            id: MapId::fresh(),
            table: Table::with_capacity(capacity),
            reentrancy: DebugReentrancy::new(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.table.len() == 0
    }

    /// Current size of the hash index. Starts at 16 and doubles whenever an
    /// insert would push the load factor above 3/4.
    #[inline]
    pub fn bucket_count(&self) -> usize {
        self.table.index.bucket_count()
    }

    /// Number of entries the map holds before the next rehash.
    pub fn capacity(&self) -> usize {
        self.table.index.capacity()
    }

    pub fn hasher(&self) -> &S {
        &self.hasher
    }

    /// Cursor at the first entry, or [`end`](Self::end) when empty.
    pub fn begin(&self) -> Cursor {
        self.cursor_at(self.table.order.first(&self.table.nodes))
    }

    /// The past-the-end cursor. Stays valid for the life of the map.
    pub fn end(&self) -> Cursor {
        self.cursor_at(self.table.order.back())
    }

    /// Remove the entry at `cursor` and return it. Other cursors are
    /// unaffected; `cursor` itself goes stale.
    ///
    /// Rejects the end position, cursors from another map and stale cursors
    /// without modifying the map.
    pub fn erase(&mut self, cursor: Cursor) -> Result<(K, V)> {
        let _g = self.reentrancy.enter();
        if cursor.owner != self.id {
            return Err(CursorFault::ForeignMap.into());
        }
        let sentinel = match self.table.node(cursor.node) {
            Some(node) => node.is_sentinel(),
            None => return Err(CursorFault::Stale.into()),
        };
        if sentinel {
            return Err(CursorFault::Sentinel.into());
        }
        Ok(self.table.unlink_node(cursor.node))
    }

    /// Drop every entry. The bucket count is kept; every cursor except
    /// [`end`](Self::end) goes stale.
    pub fn clear(&mut self) {
        let _g = self.reentrancy.enter();
        log::debug!(
            "clearing {} entries ({} buckets kept)",
            self.table.len(),
            self.table.index.bucket_count()
        );
        self.table.clear();
    }

    /// Keep only the entries for which `keep` returns true. Survivors keep
    /// their relative order.
    pub fn retain<F>(&mut self, keep: F)
    where
        F: FnMut(&K, &mut V) -> bool,
    {
        let _g = self.reentrancy.enter();
        self.table.retain(keep);
    }

    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(&self.table)
    }

    /// Mutable iteration in insertion order.
    ///
    /// Setup walks the whole arena and allocates a side table indexed by slot,
    /// so it costs O(slots ever allocated), not O(len). A map presized with
    /// `with_capacity` or emptied after growth pays for its peak size here.
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut::new(&mut self.table)
    }

    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { inner: self.iter() }
    }

    pub fn values(&self) -> Values<'_, K, V> {
        Values { inner: self.iter() }
    }

    /// Same setup cost as [`iter_mut`](Self::iter_mut).
    pub fn values_mut(&mut self) -> ValuesMut<'_, K, V> {
        ValuesMut {
            inner: self.iter_mut(),
        }
    }

    #[inline]
    fn cursor_at(&self, k: NodeKey) -> Cursor {
        Cursor::new(self.id, k)
    }

    fn resolve(&self, c: Cursor) -> core::result::Result<&Node<K, V>, CursorFault> {
        if c.owner != self.id {
            return Err(CursorFault::ForeignMap);
        }
        self.table.node(c.node).ok_or(CursorFault::Stale)
    }

    pub(crate) fn cursor_next(&self, c: Cursor) -> Result<Cursor> {
        let node = self.resolve(c)?;
        if c.node == self.table.order.back() {
            return Err(CursorFault::PastEnd.into());
        }
        Ok(self.cursor_at(node.next))
    }

    pub(crate) fn cursor_prev(&self, c: Cursor) -> Result<Cursor> {
        let node = self.resolve(c)?;
        let front = self.table.order.front();
        if c.node == front || node.prev == front {
            return Err(CursorFault::BeforeFirst.into());
        }
        Ok(self.cursor_at(node.prev))
    }

    pub(crate) fn cursor_entry(&self, c: Cursor) -> Result<(&K, &V)> {
        let node = self.resolve(c)?;
        if node.is_sentinel() {
            return Err(CursorFault::Sentinel.into());
        }
        Ok(node.entry())
    }

    pub(crate) fn cursor_entry_mut(&mut self, c: Cursor) -> Result<(&K, &mut V)> {
        if c.owner != self.id {
            return Err(CursorFault::ForeignMap.into());
        }
        let node = self.table.node_mut(c.node).ok_or(CursorFault::Stale)?;
        if node.is_sentinel() {
            return Err(CursorFault::Sentinel.into());
        }
        Ok(node.entry_mut())
    }
}

impl<K, V, S> LinkedHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    #[inline]
    fn make_hash<Q>(&self, q: &Q) -> u64
    where
        Q: ?Sized + Hash,
    {
        self.hasher.hash_one(q)
    }

    /// Insert `key` with `value` at the end of the order.
    ///
    /// If `key` is already present nothing changes: the stored value and its
    /// position are kept, `value` is dropped, and the cursor to the existing
    /// entry is returned with `false`.
    pub fn insert(&mut self, key: K, value: V) -> (Cursor, bool) {
        let _g = self.reentrancy.enter();
        let hash = self.make_hash(&key);
        if let Some(k) = self.table.locate(hash, &key) {
            return (Cursor::new(self.id, k), false);
        }
        let k = self.table.push_new(hash, key, value);
        (Cursor::new(self.id, k), true)
    }

    /// Cursor at `q`'s entry, or [`end`](Self::end) if absent.
    pub fn find<Q>(&self, q: &Q) -> Cursor
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let _g = self.reentrancy.enter();
        let hash = self.make_hash(q);
        let k = self
            .table
            .locate(hash, q)
            .unwrap_or_else(|| self.table.order.back());
        self.cursor_at(k)
    }

    /// 1 if `q` has an entry, else 0.
    pub fn count<Q>(&self, q: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        usize::from(self.contains_key(q))
    }

    pub fn contains_key<Q>(&self, q: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let _g = self.reentrancy.enter();
        let hash = self.make_hash(q);
        self.table.locate(hash, q).is_some()
    }

    pub fn get<Q>(&self, q: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let _g = self.reentrancy.enter();
        let hash = self.make_hash(q);
        let k = self.table.locate(hash, q)?;
        self.table.node(k).map(|n| n.entry().1)
    }

    pub fn get_mut<Q>(&mut self, q: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let _g = self.reentrancy.enter();
        let hash = self.make_hash(q);
        let k = self.table.locate(hash, q)?;
        self.table.node_mut(k).map(|n| n.entry_mut().1)
    }

    /// Like [`get`](Self::get), but a missing key is `Error::KeyNotFound`.
    pub fn at<Q>(&self, q: &Q) -> Result<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.get(q).ok_or(Error::KeyNotFound)
    }

    pub fn at_mut<Q>(&mut self, q: &Q) -> Result<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.get_mut(q).ok_or(Error::KeyNotFound)
    }

    /// Mutable access to `key`'s value, inserting `V::default()` at the end
    /// of the order first if the key is absent.
    pub fn get_or_insert_default(&mut self, key: K) -> &mut V
    where
        V: Default,
    {
        let _g = self.reentrancy.enter();
        let hash = self.make_hash(&key);
        let k = match self.table.locate(hash, &key) {
            Some(k) => k,
            None => self.table.push_new(hash, key, V::default()),
        };
        match self.table.node_mut(k) {
            Some(node) => node.entry_mut().1,
            None => unreachable!("located node missing from arena"),
        }
    }

    /// Erase `q`'s entry if present and return its value.
    pub fn remove<Q>(&mut self, q: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let _g = self.reentrancy.enter();
        let hash = self.make_hash(q);
        let k = self.table.locate(hash, q)?;
        Some(self.table.unlink_node(k).1)
    }

    #[cfg(test)]
    pub(crate) fn assert_invariants(&self) {
        self.table.assert_invariants(&self.hasher);
    }
}

impl<K, V, S: Default> Default for LinkedHashMap<K, V, S> {
    fn default() -> Self {
        Self::with_hasher(S::default())
    }
}

/// Deep copy: a new map instance holding clones of every entry in the same
/// order. Cursors into `self` do not work with the copy.
impl<K, V, S> Clone for LinkedHashMap<K, V, S>
where
    K: Clone,
    V: Clone,
    S: Clone,
{
    fn clone(&self) -> Self {
        let mut table = Table::new(HashIndex::with_buckets(self.bucket_count()));
        table.replay_from(&self.table);
        Self {
            hasher: self.hasher.clone(),
            id: MapId::fresh(),
            table,
            reentrancy: DebugReentrancy::new(),
        }
    }

    /// Drops `self`'s entries and bucket array, then copies `source` into a
    /// bucket array of `source`'s size. `self` keeps its identity, so its end
    /// cursor stays valid.
    fn clone_from(&mut self, source: &Self) {
        let _g = self.reentrancy.enter();
        self.table.reset(source.bucket_count());
        self.hasher = source.hasher.clone();
        self.table.replay_from(&source.table);
    }
}

impl<K, V, S> fmt::Debug for LinkedHashMap<K, V, S>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// Equal when both maps hold equal entries in the same order.
impl<K, V, S> PartialEq for LinkedHashMap<K, V, S>
where
    K: PartialEq,
    V: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<K: Eq, V: Eq, S> Eq for LinkedHashMap<K, V, S> {}

/// Panics if the key is absent; [`LinkedHashMap::at`] is the fallible form.
impl<K, Q, V, S> Index<&Q> for LinkedHashMap<K, V, S>
where
    K: Eq + Hash + Borrow<Q>,
    Q: ?Sized + Eq + Hash,
    S: BuildHasher,
{
    type Output = V;

    fn index(&self, key: &Q) -> &V {
        match self.get(key) {
            Some(v) => v,
            None => panic!("no entry found for key"),
        }
    }
}

impl<K, V, S> Extend<(K, V)> for LinkedHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    /// Keys already present keep their first value.
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<K, V, S> FromIterator<(K, V)> for LinkedHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut map = Self::with_capacity_and_hasher(iter.size_hint().0, S::default());
        map.extend(iter);
        map
    }
}

impl<'a, K, V, S> IntoIterator for &'a LinkedHashMap<K, V, S> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, K, V, S> IntoIterator for &'a mut LinkedHashMap<K, V, S> {
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<K, V, S> IntoIterator for LinkedHashMap<K, V, S> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter::new(self.table)
    }
}
