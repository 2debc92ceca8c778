//! Debug-only reentrancy guard for `LinkedHashMap`.
//!
//! A guarded section spans every map operation that runs user code while a
//! chain or the order list may be half-walked or half-relinked:
//! - `find`, `contains_key`, `get`, `get_mut` and `remove` call `K: Hash` on
//!   the lookup key and `K: Eq` against each chain entry with a matching hash;
//! - `insert` and `get_or_insert_default` do the same, plus `V: Default` or a
//!   drop of the rejected value;
//! - `erase`, `clear`, `retain` and `clone_from` drop entries (and run the
//!   retain predicate or `Clone`) between relinks.
//!
//! Cursor moves, `len`, `begin`/`end` and the iterators only read links and
//! never call user code, so they do not enter. `count`, `at` and `at_mut`
//! delegate to a guarded lookup.
//!
//! Nested entry panics in debug builds. Release builds drop the counter, and
//! the guard is a zero-sized value.

use core::cell::Cell;
use core::marker::PhantomData;

/// Per-map reentrancy tracker. Public operations open a section with
/// `let _g = self.reentrancy.enter();`.
#[derive(Debug)]
pub(crate) struct DebugReentrancy {
    #[cfg(debug_assertions)]
    depth: Cell<u32>,
    // !Send + !Sync in every profile, not only when the Cell is present.
    _nosend: PhantomData<*mut ()>,
}

impl DebugReentrancy {
    pub(crate) const fn new() -> Self {
        Self {
            #[cfg(debug_assertions)]
            depth: Cell::new(0),
            _nosend: PhantomData,
        }
    }

    /// Enter a guarded section. In debug builds, panics if already entered.
    #[inline]
    pub(crate) fn enter(&self) -> ReentrancyGuard<'_> {
        #[cfg(debug_assertions)]
        {
            let d = self.depth.get();
            assert!(d == 0, "reentrancy detected: nested entry into LinkedHashMap");
            self.depth.set(d + 1);
            ReentrancyGuard { owner: self }
        }

        #[cfg(not(debug_assertions))]
        {
            ReentrancyGuard { _z: PhantomData }
        }
    }
}

impl Default for DebugReentrancy {
    fn default() -> Self {
        Self::new()
    }
}

/// RAII guard returned by `DebugReentrancy::enter`.
pub(crate) struct ReentrancyGuard<'a> {
    #[cfg(debug_assertions)]
    owner: &'a DebugReentrancy,
    #[cfg(not(debug_assertions))]
    _z: PhantomData<&'a ()>,
}

impl Drop for ReentrancyGuard<'_> {
    fn drop(&mut self) {
        #[cfg(debug_assertions)]
        {
            let d = self.owner.depth.get();
            debug_assert!(d > 0);
            self.owner.depth.set(d - 1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::DebugReentrancy;

    #[test]
    fn sequential_sections_are_ok() {
        let r = DebugReentrancy::new();
        {
            let _g = r.enter();
        }
        let _g = r.enter();
    }

    #[cfg(debug_assertions)]
    #[test]
    fn nested_section_panics_in_debug() {
        let r = DebugReentrancy::new();
        let res = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _g1 = r.enter();
            let _g2 = r.enter();
        }));
        assert!(res.is_err(), "expected reentrancy to panic in debug builds");
    }

    #[cfg(debug_assertions)]
    #[test]
    fn guard_released_after_panic_unwind() {
        let r = DebugReentrancy::new();
        let _ = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _g = r.enter();
            panic!("user code failed");
        }));
        // Unwinding dropped the guard.
        let _g = r.enter();
    }

    #[cfg(not(debug_assertions))]
    #[test]
    fn nested_section_is_noop_in_release() {
        let r = DebugReentrancy::new();
        let _g1 = r.enter();
        let _g2 = r.enter();
    }
}
