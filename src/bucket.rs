//! Bucket records stored in the slotmap arena.

use slotmap::DefaultKey;

/// Identity of a bucket in the arena. Directory slots hold copies of this;
/// several slots may reference the same bucket.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub(crate) struct BucketId(pub(crate) DefaultKey);

/// A stored key together with its full hash. Addressing always works off
/// the cached hash, so `K: Hash` is never re-invoked during splits.
#[derive(Debug)]
pub(crate) struct Elem<K> {
    pub(crate) key: K,
    pub(crate) hash: u64,
}

/// Fixed-capacity bucket: up to `N` keys sharing the same low hash bits up
/// to `local_depth`, plus the enumeration-chain link.
#[derive(Debug)]
pub(crate) struct Bucket<K, const N: usize> {
    /// Number of low hash bits that identify this bucket uniquely among
    /// the directory slots referencing it. Always <= the global depth.
    pub(crate) local_depth: usize,
    pub(crate) elems: Vec<Elem<K>>,
    /// Next bucket in enumeration order. `None` only for the bucket
    /// allocated at construction, which terminates the chain.
    pub(crate) next: Option<BucketId>,
}

impl<K, const N: usize> Bucket<K, N> {
    pub(crate) fn new(local_depth: usize, next: Option<BucketId>) -> Self {
        Self {
            local_depth,
            elems: Vec::with_capacity(N),
            next,
        }
    }

    pub(crate) fn is_full(&self) -> bool {
        self.elems.len() == N
    }
}
