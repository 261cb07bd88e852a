//! extendible-set: a single-threaded hash set built on extendible hashing.
//!
//! Internal design:
//!
//! Summary
//! - Goal: an O(1)-average set whose per-bucket memory is bounded by a
//!   compile-time capacity `N`, grown by splitting buckets instead of
//!   rehashing the whole table.
//! - Structures, kept mutually consistent across arbitrarily many splits:
//!   - Directory: `Vec` of bucket ids, length `2^global_depth`, indexed by
//!     the low `global_depth` bits of a key's hash. Several slots may alias
//!     one bucket; aliasing is what keeps the directory flat while buckets
//!     vary in depth.
//!   - Buckets: fixed-capacity records in a `slotmap` arena. The arena's
//!     generational keys model "many directory entries referencing one
//!     shared bucket" with single ownership and no raw pointers.
//!   - Enumeration chain: a singly-linked list through every bucket ever
//!     created, rooted at the newest, used only by iteration. The bucket
//!     allocated at construction terminates it for the set's lifetime.
//! - Growth: an insert into a full bucket splits it, doubling the directory
//!   first when the bucket's local depth already equals the global depth.
//!   Splitting repeats until the target bucket has room.
//!
//! Constraints
//! - Single-threaded: `!Send`/`!Sync` by design.
//! - Monotonically non-shrinking: removal frees bucket slots for later
//!   inserts but never merges buckets or contracts the directory.
//! - Each element stores its full `u64` hash; `K: Hash` is never re-invoked
//!   during splits, so splits run no user code.
//! - Reentrancy from key `Hash`/`Eq` code is disallowed while probing and
//!   caught by a debug-only guard; the structure is never observable
//!   mid-split.
//! - Iteration order is an implementation artifact (split history), not a
//!   contract.
//!
//! Failure model
//! - No recoverable errors in the functional path: duplicate insert and
//!   absent-key removal are ordinary `false` outcomes. Allocation failure
//!   aborts, as for the std collections.
//!
//! Non-goals
//! - Not a map (no mapped values), not sorted, not thread-safe, no
//!   persistence, no bucket merging on deletion.

mod bucket;
mod ext_hash_set;
mod reentrancy;
mod set_proptest;

// Public surface
pub use ext_hash_set::{ExtendibleSet, Iter, DEFAULT_BUCKET_CAPACITY};
