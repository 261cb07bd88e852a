//! `ExtendibleSet`: the extendible-hashing engine.
//!
//! Three structures are kept mutually consistent across splits:
//! - the directory, a `Vec<BucketId>` of length `2^global_depth` indexed by
//!   the low bits of a key's hash, where several slots may alias one bucket;
//! - the buckets themselves, fixed-capacity records in a slotmap arena;
//! - the enumeration chain, a singly-linked list through every bucket ever
//!   created, rooted at the most recent one, used only by iteration.
//!
//! A full bucket splits on insert, doubling the directory first when the
//! bucket already uses every addressing bit. Buckets are never freed or
//! merged while the set lives; deletion only empties slots.

use crate::bucket::{Bucket, BucketId, Elem};
use crate::reentrancy::NotReentrant;
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use core::iter::FusedIterator;
use core::mem;
use slotmap::{DefaultKey, SlotMap};
use std::collections::hash_map::RandomState;
use std::io;

/// Bucket capacity used when none is specified.
pub const DEFAULT_BUCKET_CAPACITY: usize = 9;

/// A hash set built on extendible hashing.
///
/// `N` is the bucket capacity: the maximum number of keys a bucket holds
/// before an insert into it forces a split. Lookup and insert are O(1) on
/// average; a single insert may trigger several consecutive splits when many
/// keys share low hash bits.
///
/// The set is single-threaded (`!Send + !Sync`) and never shrinks: erasing
/// keys frees bucket slots for future inserts but releases no memory, and
/// the directory only ever grows. Iteration order is an artifact of split
/// history, not a contract.
///
/// ```
/// use extendible_set::ExtendibleSet;
///
/// let mut set: ExtendibleSet<u64> = ExtendibleSet::new();
/// assert!(set.insert(7));
/// assert!(!set.insert(7));
/// assert!(set.contains(&7));
/// assert!(set.remove(&7));
/// assert!(set.is_empty());
/// ```
pub struct ExtendibleSet<K, const N: usize = DEFAULT_BUCKET_CAPACITY, S = RandomState> {
    hasher: S,
    /// `2^global_depth` slots, each referencing a bucket in the arena.
    directory: Vec<BucketId>,
    /// Number of low hash bits used to address the directory.
    global_depth: usize,
    /// Bucket storage. Splits only ever add buckets; none are freed before
    /// the whole set goes down.
    buckets: SlotMap<DefaultKey, Bucket<K, N>>,
    /// Head of the enumeration chain: the most recently created bucket.
    head: BucketId,
    /// Live element count across all buckets.
    len: usize,
    reentrancy: NotReentrant,
}

impl<K, const N: usize> ExtendibleSet<K, N>
where
    K: Eq + Hash,
{
    /// Creates an empty set with a randomly seeded hasher.
    pub fn new() -> Self {
        Self::with_hasher(Default::default())
    }
}

impl<K, const N: usize> Default for ExtendibleSet<K, N>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, const N: usize, S> ExtendibleSet<K, N, S> {
    /// Number of live elements.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Read-only iterator over all elements, in chain order: the most
    /// recently split-off bucket first, the original bucket last.
    pub fn iter(&self) -> Iter<'_, K, N> {
        Iter {
            buckets: &self.buckets,
            cursor: self.head,
            pos: 0,
            remaining: self.len,
        }
    }

    /// Writes a diagnostic snapshot of the directory and buckets.
    ///
    /// Debugging aid only; the layout it shows is not part of the
    /// functional contract.
    pub fn dump<W: io::Write>(&self, w: &mut W) -> io::Result<()>
    where
        K: fmt::Debug,
    {
        writeln!(
            w,
            "len {}  global_depth {}  directory_len {}  buckets {}",
            self.len,
            self.global_depth,
            self.directory.len(),
            self.buckets.len()
        )?;
        for (i, id) in self.directory.iter().enumerate() {
            let bucket = &self.buckets[id.0];
            let keys: Vec<&K> = bucket.elems.iter().map(|e| &e.key).collect();
            writeln!(
                w,
                "[{i:>4}] bucket {:?}  local_depth {}  keys {}/{N}: {:?}",
                id.0,
                bucket.local_depth,
                bucket.elems.len(),
                keys
            )?;
        }
        Ok(())
    }
}

impl<K, const N: usize, S> ExtendibleSet<K, N, S>
where
    K: Eq + Hash,
    S: BuildHasher + Clone + Default,
{
    /// Creates an empty set using `hasher` for key hashing.
    ///
    /// The directory starts at global depth 0: one slot, one empty bucket.
    /// That bucket terminates the enumeration chain for the set's lifetime.
    pub fn with_hasher(hasher: S) -> Self {
        assert!(N > 0, "bucket capacity N must be at least 1");
        let mut buckets = SlotMap::with_key();
        let origin = BucketId(buckets.insert(Bucket::new(0, None)));
        Self {
            hasher,
            directory: vec![origin],
            global_depth: 0,
            buckets,
            head: origin,
            len: 0,
            reentrancy: NotReentrant::new(),
        }
    }

    fn make_hash<Q>(&self, q: &Q) -> u64
    where
        Q: ?Sized + Hash,
    {
        self.hasher.hash_one(q)
    }

    /// Directory index for a hash under the current global depth. Always
    /// recomputed from the full hash; the depth changes across splits.
    fn address(&self, hash: u64) -> usize {
        (hash as usize) & ((1usize << self.global_depth) - 1)
    }

    /// Adds a key not already present, growing the structure as needed.
    /// Returns `true` if the key was inserted, `false` if it was already in
    /// the set.
    pub fn insert(&mut self, key: K) -> bool {
        let hash;
        {
            let _g = self.reentrancy.enter();
            hash = self.make_hash(&key);
            let bucket = &self.buckets[self.directory[self.address(hash)].0];
            if bucket.elems.iter().any(|e| e.hash == hash && e.key == key) {
                return false;
            }
        }
        self.place(Elem { key, hash });
        self.len += 1;
        true
    }

    /// Returns a reference to the stored key equal to `q`, if any.
    pub fn get<Q>(&self, q: &Q) -> Option<&K>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let _g = self.reentrancy.enter();
        let hash = self.make_hash(q);
        let bucket = &self.buckets[self.directory[self.address(hash)].0];
        bucket
            .elems
            .iter()
            .find(|e| e.hash == hash && e.key.borrow() == q)
            .map(|e| &e.key)
    }

    pub fn contains<Q>(&self, q: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.get(q).is_some()
    }

    /// Removes the key equal to `q`. Returns whether it was present.
    ///
    /// The hole is filled by the bucket's last element. Nothing merges or
    /// shrinks: the freed slot is reclaimed only by a future insert into
    /// the same bucket.
    pub fn remove<Q>(&mut self, q: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let (adr, hit) = {
            let _g = self.reentrancy.enter();
            let hash = self.make_hash(q);
            let adr = self.address(hash);
            let bucket = &self.buckets[self.directory[adr].0];
            let hit = bucket
                .elems
                .iter()
                .position(|e| e.hash == hash && e.key.borrow() == q);
            (adr, hit)
        };
        match hit {
            Some(i) => {
                let id = self.directory[adr];
                // Keep the structure consistent before the removed key
                // drops; its Drop may look back into the set.
                let removed = self.buckets[id.0].elems.swap_remove(i);
                self.len -= 1;
                drop(removed);
                true
            }
            None => false,
        }
    }

    /// Drops every element and resets to a freshly constructed state, as if
    /// assigned from an empty set. The hasher is kept.
    pub fn clear(&mut self) {
        *self = Self::with_hasher(self.hasher.clone());
    }

    /// Normal placement path for a key known to be absent: split until the
    /// target bucket has room, then append. Several consecutive splits may
    /// be needed when the bucket's keys share many low hash bits.
    ///
    /// Runs no user code; addressing uses the element's cached hash.
    fn place(&mut self, elem: Elem<K>) {
        loop {
            let adr = self.address(elem.hash);
            let id = self.directory[adr];
            let bucket = &mut self.buckets[id.0];
            if !bucket.is_full() {
                bucket.elems.push(elem);
                return;
            }
            self.split(elem.hash);
        }
    }

    /// Splits the full bucket addressed by `hash`, doubling the directory
    /// first when the bucket already uses every addressing bit. The split
    /// bucket survives and keeps the slots whose new bit is 0; a fresh
    /// bucket takes the slots whose new bit is 1 and becomes the chain
    /// head. The displaced elements re-enter through [`Self::place`], which
    /// may split again.
    fn split(&mut self, hash: u64) {
        let mut adr = self.address(hash);
        if self.buckets[self.directory[adr].0].local_depth >= self.global_depth {
            self.double_directory();
            adr = self.address(hash);
        }

        let surviving = self.directory[adr];
        let (depth, displaced) = {
            let bucket = &mut self.buckets[surviving.0];
            bucket.local_depth += 1;
            let displaced = mem::replace(&mut bucket.elems, Vec::with_capacity(N));
            (bucket.local_depth, displaced)
        };

        // Stride between directory slots of the new bucket, and the first
        // slot it owns: the address restricted to the old local depth, plus
        // half the stride (the slot whose newly significant bit is 1).
        let distance = 1usize << depth;
        let pos = (adr & (distance / 2 - 1)) + distance / 2;

        let fresh = BucketId(self.buckets.insert(Bucket::new(depth, Some(self.head))));
        self.head = fresh;
        for slot in (pos..self.directory.len()).step_by(distance) {
            self.directory[slot] = fresh;
        }

        for elem in displaced {
            self.place(elem);
        }
    }

    /// Doubles the directory by self-appending: slots `i` and
    /// `i + old_len` both reference the bucket old slot `i` did, so every
    /// bucket keeps its local-depth/slot-count relationship.
    fn double_directory(&mut self) {
        self.global_depth += 1;
        self.directory.extend_from_within(..);
    }
}

impl<K, const N: usize, S> Clone for ExtendibleSet<K, N, S>
where
    K: Clone + Eq + Hash,
    S: BuildHasher + Clone + Default,
{
    fn clone(&self) -> Self {
        // The source holds no duplicates, so elements go straight through
        // the placement path; cached hashes stay valid because the hasher
        // is cloned along with them.
        let mut fresh = Self::with_hasher(self.hasher.clone());
        for bucket in self.buckets.values() {
            for e in &bucket.elems {
                fresh.place(Elem {
                    key: e.key.clone(),
                    hash: e.hash,
                });
            }
        }
        fresh.len = self.len;
        fresh
    }
}

impl<K, const N: usize, S> PartialEq for ExtendibleSet<K, N, S>
where
    K: Eq + Hash,
    S: BuildHasher + Clone + Default,
{
    /// Layout-independent equality: equal sizes and mutual membership.
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().all(|k| other.contains(k))
    }
}

impl<K, const N: usize, S> Eq for ExtendibleSet<K, N, S>
where
    K: Eq + Hash,
    S: BuildHasher + Clone + Default,
{
}

impl<K, const N: usize, S> fmt::Debug for ExtendibleSet<K, N, S>
where
    K: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<K, const N: usize, S> Extend<K> for ExtendibleSet<K, N, S>
where
    K: Eq + Hash,
    S: BuildHasher + Clone + Default,
{
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for key in iter {
            self.insert(key);
        }
    }
}

impl<K, const N: usize, S> FromIterator<K> for ExtendibleSet<K, N, S>
where
    K: Eq + Hash,
    S: BuildHasher + Clone + Default,
{
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut set = Self::with_hasher(S::default());
        set.extend(iter);
        set
    }
}

impl<K, const N: usize, const M: usize> From<[K; M]> for ExtendibleSet<K, N>
where
    K: Eq + Hash,
{
    fn from(keys: [K; M]) -> Self {
        keys.into_iter().collect()
    }
}

impl<'a, K, const N: usize, S> IntoIterator for &'a ExtendibleSet<K, N, S> {
    type Item = &'a K;
    type IntoIter = Iter<'a, K, N>;

    fn into_iter(self) -> Iter<'a, K, N> {
        self.iter()
    }
}

/// Read-only forward iterator over a set's elements.
///
/// A position is a (bucket, in-bucket index) pair. Advancing walks the
/// enumeration chain from the newest bucket back to the original one,
/// skipping exhausted buckets; the order is an artifact of split history.
pub struct Iter<'a, K, const N: usize> {
    buckets: &'a SlotMap<DefaultKey, Bucket<K, N>>,
    cursor: BucketId,
    pos: usize,
    remaining: usize,
}

impl<'a, K, const N: usize> Iterator for Iter<'a, K, N> {
    type Item = &'a K;

    fn next(&mut self) -> Option<&'a K> {
        let buckets = self.buckets;
        loop {
            let bucket = &buckets[self.cursor.0];
            if self.pos < bucket.elems.len() {
                let key = &bucket.elems[self.pos].key;
                self.pos += 1;
                self.remaining -= 1;
                return Some(key);
            }
            match bucket.next {
                Some(next) => {
                    self.cursor = next;
                    self.pos = 0;
                }
                None => return None,
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, const N: usize> ExactSizeIterator for Iter<'_, K, N> {}
impl<K, const N: usize> FusedIterator for Iter<'_, K, N> {}

impl<K, const N: usize> Clone for Iter<'_, K, N> {
    fn clone(&self) -> Self {
        Self { ..*self }
    }
}

/// Asserts every structural invariant: directory length vs global depth,
/// slot aliasing per local depth (membership, count, and stride), element
/// placement, chain completeness and termination, and the element count.
#[cfg(test)]
pub(crate) fn check_invariants<K, const N: usize, S>(set: &ExtendibleSet<K, N, S>) {
    use std::collections::{HashMap, HashSet};

    assert_eq!(set.directory.len(), 1usize << set.global_depth);

    let mut slots_of: HashMap<BucketId, Vec<usize>> = HashMap::new();
    for (i, id) in set.directory.iter().enumerate() {
        assert!(set.buckets.contains_key(id.0), "dangling directory slot {i}");
        slots_of.entry(*id).or_default().push(i);
    }

    for (id, slots) in &slots_of {
        let bucket = &set.buckets[id.0];
        let d = bucket.local_depth;
        assert!(d <= set.global_depth);
        let mask = (1usize << d) - 1;
        // The slots referencing a bucket of local depth d are exactly the
        // directory indices sharing its low d bits, evenly spaced by 2^d.
        let pattern = slots[0] & mask;
        assert_eq!(slots[0], pattern);
        assert_eq!(slots.len(), 1usize << (set.global_depth - d));
        for (j, slot) in slots.iter().enumerate() {
            assert_eq!(*slot, pattern + (j << d));
        }
        assert!(bucket.elems.len() <= N);
        for e in &bucket.elems {
            assert_eq!(
                (e.hash as usize) & mask,
                pattern,
                "element stored in a bucket its hash does not address"
            );
        }
    }

    // The chain starting at head visits every bucket in the arena exactly
    // once and terminates at the construction-time bucket.
    let mut seen = HashSet::new();
    let mut cursor = set.head;
    loop {
        assert!(seen.insert(cursor), "cycle in enumeration chain");
        match set.buckets[cursor.0].next {
            Some(next) => cursor = next,
            None => break,
        }
    }
    assert_eq!(seen.len(), set.buckets.len(), "chain misses buckets");

    let total: usize = set.buckets.values().map(|b| b.elems.len()).sum();
    assert_eq!(total, set.len);
}
