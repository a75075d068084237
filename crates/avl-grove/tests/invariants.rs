use std::collections::BTreeSet;

use avl_grove::AvlSet;
use rand::prelude::*;

#[test]
fn ladder_insert_delete_keeps_invariants() {
    let mut set = AvlSet::<i32>::new();

    for i in 0..300 {
        set.insert(i);
        set.assert_valid().unwrap();
    }
    assert_eq!(set.len(), 300);

    for i in (0..300).step_by(3) {
        assert!(set.remove(&i));
        set.assert_valid().unwrap();
    }

    for i in 0..300 {
        assert_eq!(set.contains(&i), i % 3 != 0);
    }
}

#[test]
fn randomized_mixed_operations_keep_invariants() {
    let mut rng = StdRng::seed_from_u64(0x5eed);

    for _ in 0..8 {
        let mut set = AvlSet::<i32>::new();
        let mut model = BTreeSet::new();

        for _ in 0..600 {
            let v = rng.gen_range(0..200);
            if rng.gen_bool(0.6) {
                set.insert(v);
                model.insert(v);
            } else {
                assert_eq!(set.remove(&v), model.remove(&v));
            }
            set.assert_valid().unwrap();
            assert_eq!(set.len(), model.len());
        }

        let values: Vec<i32> = set.iter().copied().collect();
        let expected: Vec<i32> = model.iter().copied().collect();
        assert_eq!(values, expected);
        assert_eq!(set.min(), model.first());
        assert_eq!(set.max(), model.last());
    }
}

fn assert_height_bound(set: &AvlSet<i32>) {
    let n = set.len() as f64;
    let bound = 1.4405 * (n + 2.0).log2();
    assert!(
        (set.height() as f64) <= bound,
        "height {} exceeds AVL bound {bound:.3} for {} nodes",
        set.height(),
        set.len()
    );
}

#[test]
fn height_stays_within_avl_bound_for_shuffled_inserts() {
    let mut rng = StdRng::seed_from_u64(42);
    let mut values: Vec<i32> = (0..4096).collect();
    values.shuffle(&mut rng);

    let mut set = AvlSet::<i32>::new();
    for v in values {
        set.insert(v);
        assert_height_bound(&set);
    }
    set.assert_valid().unwrap();
}

#[test]
fn height_stays_within_avl_bound_for_sorted_inserts() {
    // Ascending insertion degenerates an unbalanced BST to a list; the
    // rebalancer must keep the height logarithmic throughout.
    let mut set = AvlSet::<i32>::new();
    for v in 0..2048 {
        set.insert(v);
        assert_height_bound(&set);
        if v % 64 == 0 {
            set.assert_valid().unwrap();
        }
    }
    set.assert_valid().unwrap();
    assert_eq!(set.min(), Some(&0));
    assert_eq!(set.max(), Some(&2047));
}

#[test]
fn insert_set_then_remove_set_leaves_empty_tree() {
    let mut rng = StdRng::seed_from_u64(7);
    let values: Vec<i32> = {
        let mut v: Vec<i32> = (0..500).map(|_| rng.gen_range(-1000..1000)).collect();
        v.sort_unstable();
        v.dedup();
        v
    };

    // Ascending, descending, and shuffled removal orders.
    for order in 0..3 {
        let mut insert_order = values.clone();
        insert_order.shuffle(&mut rng);
        let mut set: AvlSet<i32> = insert_order.into_iter().collect();
        assert_eq!(set.len(), values.len());
        set.assert_valid().unwrap();

        let mut remove_order = values.clone();
        match order {
            0 => {}
            1 => remove_order.reverse(),
            _ => remove_order.shuffle(&mut rng),
        }
        for v in &remove_order {
            assert!(set.remove(v));
            set.assert_valid().unwrap();
        }
        assert!(set.is_empty());
        assert_eq!(set.len(), 0);
        assert_eq!(set.in_order_values(), Vec::<i32>::new());
    }
}

#[test]
fn random_stress_mirrors_membership() {
    let mut rng = StdRng::seed_from_u64(0xabcd);
    let case: BTreeSet<i32> = (0..900).map(|_| rng.gen_range(1..20_000)).collect();

    let mut set = AvlSet::<i32>::new();
    for &v in &case {
        set.insert(v);
    }
    set.assert_valid().unwrap();

    for (i, &v) in case.iter().enumerate() {
        if i % 2 == 0 {
            assert!(set.remove(&v));
        }
    }
    set.assert_valid().unwrap();

    for (i, &v) in case.iter().enumerate() {
        assert_eq!(set.contains(&v), i % 2 != 0);
    }
}
