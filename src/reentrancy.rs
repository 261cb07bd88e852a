//! Debug-only reentrancy detection.
//!
//! The set runs user code (`K: Hash`, `K: Eq`) while hashing a query and
//! while probing a bucket. In debug builds this tracker panics if that user
//! code calls back into the same set, which could otherwise observe the
//! structure mid-split. Release builds compile it down to nothing.
//!
//! The `*mut ()` marker also keeps any embedding structure `!Send + !Sync`,
//! in line with the single-threaded design.

use core::cell::Cell;
use core::marker::PhantomData;

/// Per-set tracker. Entry points that can run user code take a guard with
/// `let _g = self.reentrancy.enter();`.
pub(crate) struct NotReentrant {
    #[cfg(debug_assertions)]
    entered: Cell<bool>,
    _nosend: PhantomData<*mut ()>,
}

impl NotReentrant {
    pub(crate) const fn new() -> Self {
        Self {
            #[cfg(debug_assertions)]
            entered: Cell::new(false),
            _nosend: PhantomData,
        }
    }

    /// Enter a guarded section. Panics in debug builds if already entered.
    #[inline]
    pub(crate) fn enter(&self) -> EntryGuard<'_> {
        #[cfg(debug_assertions)]
        {
            assert!(
                !self.entered.replace(true),
                "reentrant call into ExtendibleSet from key Hash/Eq code"
            );
            return EntryGuard { owner: self };
        }

        #[cfg(not(debug_assertions))]
        {
            return EntryGuard { _pd: PhantomData };
        }
    }
}

impl core::fmt::Debug for NotReentrant {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("NotReentrant")
    }
}

/// RAII guard returned by [`NotReentrant::enter`].
pub(crate) struct EntryGuard<'a> {
    #[cfg(debug_assertions)]
    owner: &'a NotReentrant,
    #[cfg(not(debug_assertions))]
    _pd: PhantomData<&'a ()>,
}

impl Drop for EntryGuard<'_> {
    fn drop(&mut self) {
        #[cfg(debug_assertions)]
        self.owner.entered.set(false);
    }
}
