//! linked-hashmap: a single-threaded hash map that iterates in insertion
//! order and hands out checked, `Copy` cursors.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: O(1) average keyed lookup plus deterministic insertion-order
//!   iteration, with cursors that fail loudly instead of dangling.
//! - Layers:
//!   - `node`: arena of nodes in a `SlotMap`. Each node holds the entry,
//!     its stored hash, one bucket-chain link and two order links. Two
//!     entry-less sentinel nodes bound the order list.
//!   - `order_list`: doubly-linked insertion order. Nodes are only
//!     appended before the back sentinel and unlinked in place.
//!   - `hash_index`: bucket array of chain heads, separate chaining,
//!     doubling at a 3/4 load factor. Rehash walks the order list and
//!     never touches order links.
//!   - `table`: owns the three above and keeps them in lockstep; every
//!     add/drop updates index and order list before returning.
//!   - `LinkedHashMap`: public facade. Hashes keys, checks cursors, and
//!     guards entry points with a debug-only reentrancy check.
//!
//! Constraints
//! - Single-threaded: the map is `!Send`/`!Sync`. No atomics on the hot
//!   path; the only atomic hands out map identities.
//! - Unique keys. Re-inserting a present key is a no-op: the old value
//!   and position win.
//! - Keys are immutable post-insert; there is no `key_mut`.
//!
//! Cursors
//! - A `Cursor` is `(map identity, generational node key)`. Using it with
//!   another map is `CursorFault::ForeignMap`; using it after its entry
//!   was erased or the map cleared is `CursorFault::Stale`, because the
//!   arena bumps a slot's generation when it is freed.
//! - Rehashing and inserts/erases of other entries never invalidate a
//!   cursor. The end cursor lives as long as the map.
//!
//! Hasher and rehashing invariants
//! - Each node stores the `u64` hash computed at insertion; bucket
//!   selection always uses the stored hash, so `K: Hash` is never invoked
//!   after insertion, including during rehash and erase.
//! - Copies (`Clone`, `clone_from`) reuse stored hashes and therefore
//!   clone the hasher along with the entries.
//!
//! Reentrancy policy
//! - Map operations that may call user code (`K: Hash`, `K: Eq`,
//!   `V: Default`) enter a `DebugReentrancy` guard; nested entry panics in
//!   debug builds. Release builds compile the guard away.
//!
//! Errors
//! - Misuse is reported as `Error::KeyNotFound` or
//!   `Error::InvalidCursor(fault)`; the failing call leaves the map
//!   unchanged. Allocation failure aborts as usual.

mod cursor;
mod error;
mod hash_index;
pub mod iter;
mod linked_hash_map;
#[cfg(test)]
mod linked_hash_map_proptest;
mod node;
mod order_list;
mod reentrancy;
mod table;

// Public surface
pub use cursor::Cursor;
pub use error::{CursorFault, Error, Result};
pub use linked_hash_map::LinkedHashMap;
