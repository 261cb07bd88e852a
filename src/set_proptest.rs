#![cfg(test)]

// Property tests for ExtendibleSet kept inside the crate so the structural
// invariant checker can see the directory, arena, and chain.

use crate::ext_hash_set::{check_invariants, ExtendibleSet};
use proptest::prelude::*;
use std::collections::HashSet;

// Keys drawn from a small range so buckets collide and split often; the
// set under test uses a tiny bucket capacity for the same reason.
#[derive(Clone, Debug)]
enum Op {
    Insert(u64),
    Remove(u64),
    Contains(u64),
    Iterate,
    Clear,
    CloneEq,
}

fn arb_ops() -> impl Strategy<Value = Vec<Op>> {
    let key = 0u64..64;
    let op = prop_oneof![
        4 => key.clone().prop_map(Op::Insert),
        2 => key.clone().prop_map(Op::Remove),
        2 => key.prop_map(Op::Contains),
        1 => Just(Op::Iterate),
        1 => Just(Op::CloneEq),
        1 => Just(Op::Clear),
    ];
    proptest::collection::vec(op, 1..200)
}

// Property: state-machine equivalence against std::collections::HashSet.
// After every operation the structural invariants hold and len/is_empty
// match the model; insert/remove/contains return what the model returns;
// iteration visits exactly the model's elements; clones compare equal.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine(ops in arb_ops()) {
        let mut sut: ExtendibleSet<u64, 3> = ExtendibleSet::new();
        let mut model: HashSet<u64> = HashSet::new();

        for op in ops {
            match op {
                Op::Insert(k) => prop_assert_eq!(sut.insert(k), model.insert(k)),
                Op::Remove(k) => prop_assert_eq!(sut.remove(&k), model.remove(&k)),
                Op::Contains(k) => {
                    prop_assert_eq!(sut.contains(&k), model.contains(&k));
                    prop_assert_eq!(sut.get(&k).is_some(), model.contains(&k));
                }
                Op::Iterate => {
                    let visited: Vec<u64> = sut.iter().copied().collect();
                    prop_assert_eq!(visited.len(), sut.len(), "each element exactly once");
                    let seen: HashSet<u64> = visited.into_iter().collect();
                    prop_assert_eq!(&seen, &model);
                }
                Op::Clear => {
                    sut.clear();
                    model.clear();
                }
                Op::CloneEq => {
                    let copy = sut.clone();
                    prop_assert!(copy == sut);
                    prop_assert_eq!(copy.len(), sut.len());
                }
            }
            check_invariants(&sut);
            prop_assert_eq!(sut.len(), model.len());
            prop_assert_eq!(sut.is_empty(), model.is_empty());
        }
    }

    // Property: inserting a sequence twice yields the same set as once, and
    // the size equals the number of distinct keys.
    #[test]
    fn prop_insert_idempotent(keys in proptest::collection::vec(any::<u64>(), 0..100)) {
        let mut sut: ExtendibleSet<u64, 4> = ExtendibleSet::new();
        for &k in &keys {
            sut.insert(k);
        }
        let distinct: HashSet<u64> = keys.iter().copied().collect();
        prop_assert_eq!(sut.len(), distinct.len());

        for &k in &keys {
            prop_assert!(!sut.insert(k), "reinsert must be a no-op");
        }
        prop_assert_eq!(sut.len(), distinct.len());
        check_invariants(&sut);
    }

    // Property: erase-then-find. Removing each key once empties the set;
    // a second removal pass finds nothing and changes nothing.
    #[test]
    fn prop_remove_all(keys in proptest::collection::hash_set(any::<u64>(), 0..80)) {
        let mut sut: ExtendibleSet<u64, 4> = keys.iter().copied().collect();
        prop_assert_eq!(sut.iter().len(), keys.len());

        for k in &keys {
            prop_assert!(sut.remove(k));
            prop_assert!(!sut.contains(k));
            check_invariants(&sut);
        }
        prop_assert!(sut.is_empty());
        for k in &keys {
            prop_assert!(!sut.remove(k));
        }
        prop_assert_eq!(sut.len(), 0);
    }
}
