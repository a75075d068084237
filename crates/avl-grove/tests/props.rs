use std::collections::BTreeSet;

use avl_grove::AvlSet;
use proptest::prelude::*;

#[derive(Clone, Debug)]
enum Op {
    Insert(i16),
    Remove(i16),
}

fn op() -> impl Strategy<Value = Op> {
    // A narrow value range so removals actually hit.
    prop_oneof![
        (0i16..64).prop_map(Op::Insert),
        (0i16..64).prop_map(Op::Remove),
    ]
}

proptest! {
    #[test]
    fn agrees_with_btree_set_model(ops in proptest::collection::vec(op(), 1..400)) {
        let mut set = AvlSet::<i16>::new();
        let mut model = BTreeSet::new();

        for op in ops {
            match op {
                Op::Insert(v) => {
                    set.insert(v);
                    model.insert(v);
                }
                Op::Remove(v) => {
                    prop_assert_eq!(set.remove(&v), model.remove(&v));
                }
            }
            set.assert_valid().unwrap();
            prop_assert_eq!(set.len(), model.len());
        }

        let values: Vec<i16> = set.iter().copied().collect();
        let expected: Vec<i16> = model.iter().copied().collect();
        prop_assert_eq!(values, expected);
        prop_assert_eq!(set.min(), model.first());
        prop_assert_eq!(set.max(), model.last());
    }

    #[test]
    fn in_order_is_strictly_ascending(values in proptest::collection::vec(any::<i32>(), 0..300)) {
        let distinct: BTreeSet<i32> = values.iter().copied().collect();
        let set: AvlSet<i32> = values.into_iter().collect();
        set.assert_valid().unwrap();
        prop_assert_eq!(set.len(), distinct.len());

        let collected: Vec<i32> = set.iter().copied().collect();
        for pair in collected.windows(2) {
            prop_assert!(pair[0] < pair[1]);
        }
    }
}
