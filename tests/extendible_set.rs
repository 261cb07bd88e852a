// ExtendibleSet black-box test suite.
//
// Each test documents the behavior it verifies through the public API
// alone. The core invariants exercised:
// - Set semantics: duplicate inserts are no-ops, count is 0 or 1.
// - Membership: everything inserted is found; everything removed is not.
// - Iteration: exactly len() elements, each once, layout-independent.
// - Equality and clone: independent of bucket layout and split history.
// - Growth: low-bit collisions force splits without losing members.
use extendible_set::ExtendibleSet;
use std::collections::HashSet;

// Test: basic membership round trip.
// Verifies: insert reports true once, contains/get agree, len tracks.
#[test]
fn insert_contains_get_parity() {
    let mut set: ExtendibleSet<String> = ExtendibleSet::new();
    assert!(set.insert("alpha".to_string()));
    assert!(set.insert("beta".to_string()));
    assert_eq!(set.len(), 2);

    assert!(set.contains("alpha"));
    assert_eq!(set.get("alpha").map(String::as_str), Some("alpha"));
    assert!(!set.contains("gamma"));
    assert!(set.get("gamma").is_none());
}

// Test: set idempotence.
// Verifies: inserting the same sequence twice yields the same size as once.
#[test]
fn duplicate_insert_is_noop() {
    let mut set: ExtendibleSet<u64> = ExtendibleSet::new();
    for k in 0..40 {
        assert!(set.insert(k));
    }
    for k in 0..40 {
        assert!(!set.insert(k));
    }
    assert_eq!(set.len(), 40);
}

// Test: erase-then-find.
// Verifies: a successful remove makes the key absent; removing an absent
// key returns false and changes nothing.
#[test]
fn remove_then_contains() {
    let mut set: ExtendibleSet<u64> = ExtendibleSet::new();
    for k in 0..10 {
        set.insert(k);
    }
    assert!(set.remove(&3));
    assert!(!set.contains(&3));
    assert_eq!(set.len(), 9);

    assert!(!set.remove(&3));
    assert!(!set.remove(&99));
    assert_eq!(set.len(), 9);
    for k in (0..10).filter(|k| *k != 3) {
        assert!(set.contains(&k));
    }
}

// Test: a hundred keys at the default capacity of 9.
// Verifies: inserting 0..100 then erasing 0..50 leaves exactly the upper
// half present.
#[test]
fn hundred_keys_insert_then_erase_half() {
    let mut set: ExtendibleSet<u64> = ExtendibleSet::new();
    for k in 0..100 {
        assert!(set.insert(k));
    }
    assert_eq!(set.len(), 100);
    for k in 0..100 {
        assert!(set.contains(&k));
    }

    for k in 0..50 {
        assert!(set.remove(&k));
    }
    assert_eq!(set.len(), 50);
    for k in 0..50 {
        assert!(!set.contains(&k));
    }
    for k in 50..100 {
        assert!(set.contains(&k));
    }
}

// Test: iteration completeness.
// Verifies: begin-to-end visits exactly len() elements, each exactly once,
// and the visited set equals the inserted set.
#[test]
fn iteration_visits_each_element_exactly_once() {
    let mut set: ExtendibleSet<u64> = ExtendibleSet::new();
    let inserted: HashSet<u64> = (0..500).map(|k| k * 7).collect();
    for &k in &inserted {
        set.insert(k);
    }

    let visited: Vec<u64> = set.iter().copied().collect();
    assert_eq!(visited.len(), set.len());
    let distinct: HashSet<u64> = visited.into_iter().collect();
    assert_eq!(distinct, inserted);

    // The iterator knows how many elements remain.
    assert_eq!(set.iter().len(), 500);
    let mut it = set.iter();
    it.next();
    assert_eq!(it.len(), 499);
}

// Test: equality is layout-independent.
// Verifies: sets built in different orders, and with different erase
// histories, compare equal iff they hold the same elements.
#[test]
fn equality_ignores_split_history() {
    let mut forward: ExtendibleSet<u64> = ExtendibleSet::new();
    let mut backward: ExtendibleSet<u64> = ExtendibleSet::new();
    for k in 0..64 {
        forward.insert(k);
        backward.insert(63 - k);
    }
    assert_eq!(forward, backward);

    // Same members, noisier history: extra keys inserted then removed.
    let mut churned: ExtendibleSet<u64> = ExtendibleSet::new();
    for k in 0..128 {
        churned.insert(k);
    }
    for k in 64..128 {
        churned.remove(&k);
    }
    assert_eq!(forward, churned);

    churned.remove(&0);
    assert_ne!(forward, churned);
}

// Test: clone equality.
// Verifies: a clone compares equal to the original and evolves
// independently afterward.
#[test]
fn clone_produces_equal_independent_set() {
    let mut set: ExtendibleSet<String> = (0..50).map(|k| format!("key-{k}")).collect();
    let copy = set.clone();
    assert_eq!(copy, set);
    assert_eq!(copy.len(), 50);

    set.remove("key-0");
    assert_ne!(copy, set);
    assert!(copy.contains("key-0"));
}

// Test: clear.
// Verifies: a cleared set is empty, reports size 0, and accepts inserts
// again.
#[test]
fn clear_then_reuse() {
    let mut set: ExtendibleSet<u64> = (0..100).collect();
    assert!(!set.is_empty());
    set.clear();
    assert!(set.is_empty());
    assert_eq!(set.len(), 0);
    assert_eq!(set.iter().count(), 0);

    assert!(set.insert(1));
    assert!(set.contains(&1));
    assert_eq!(set.len(), 1);
}

// Test: whole-state exchange.
// Verifies: mem::swap exchanges two sets' entire contents in one step.
#[test]
fn whole_state_swap() {
    let mut a: ExtendibleSet<u64> = (0..10).collect();
    let mut b: ExtendibleSet<u64> = (100..105).collect();
    std::mem::swap(&mut a, &mut b);

    assert_eq!(a.len(), 5);
    assert!(a.contains(&100) && !a.contains(&0));
    assert_eq!(b.len(), 10);
    assert!(b.contains(&0) && !b.contains(&100));
}

// Test: bulk construction surfaces.
// Verifies: From<[K; M]>, FromIterator, and Extend agree with repeated
// insert, including duplicates in the source.
#[test]
fn bulk_construction() {
    let from_array: ExtendibleSet<u64> = ExtendibleSet::from([3, 1, 4, 1, 5, 9, 2, 6]);
    assert_eq!(from_array.len(), 7); // the duplicate 1 collapses

    let from_range: ExtendibleSet<u64> = (0..20).collect();
    assert_eq!(from_range.len(), 20);

    let mut extended: ExtendibleSet<u64> = ExtendibleSet::new();
    extended.extend(0..10);
    extended.extend(5..15);
    assert_eq!(extended.len(), 15);
}

// Test: growth under adversarial low-bit collisions.
// Verifies: with bucket capacity 1, keys forced into the same low bits
// split repeatedly without losing any member.
#[test]
fn tiny_capacity_forces_splits() {
    let mut set: ExtendibleSet<u64, 1> = ExtendibleSet::new();
    for k in 0..64 {
        assert!(set.insert(k));
    }
    assert_eq!(set.len(), 64);
    for k in 0..64 {
        assert!(set.contains(&k));
    }
    let visited: HashSet<u64> = set.iter().copied().collect();
    assert_eq!(visited.len(), 64);
}

// Test: diagnostic dump.
// Verifies: dump writes a directory snapshot without erroring; contents are
// informational only.
#[test]
fn dump_writes_snapshot() {
    let set: ExtendibleSet<u64> = (0..30).collect();
    let mut out = Vec::new();
    set.dump(&mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("len 30"));
    assert!(text.contains("global_depth"));
}

// Test: Debug formatting renders the elements as a set.
#[test]
fn debug_formats_as_set() {
    let mut set: ExtendibleSet<u64> = ExtendibleSet::new();
    set.insert(42);
    assert_eq!(format!("{set:?}"), "{42}");

    let empty: ExtendibleSet<u64> = ExtendibleSet::new();
    assert_eq!(format!("{empty:?}"), "{}");
}
