use proptest::prelude::*;
use std::collections::HashSet;
use velocity::ShardedSet;

#[derive(Debug, Clone)]
enum Operation {
    Insert(i16),
    Remove(i16),
    Contains(i16),
    Clear,
}

fn operation() -> impl Strategy<Value = Operation> {
    prop_oneof![
        4 => any::<i16>().prop_map(Operation::Insert),
        2 => any::<i16>().prop_map(Operation::Remove),
        3 => any::<i16>().prop_map(Operation::Contains),
        1 => Just(Operation::Clear),
    ]
}

proptest! {
    #[test]
    fn test_sharded_set_matches_std_set(
        shift in 0u32..8,
        ops in proptest::collection::vec(operation(), 1..200),
    ) {
        let set = ShardedSet::with_bucket_count(1 << shift).unwrap();
        let mut model = HashSet::new();

        for op in ops {
            match op {
                Operation::Insert(k) => {
                    set.insert(k);
                    model.insert(k);
                }
                Operation::Remove(k) => {
                    set.remove(&k);
                    model.remove(&k);
                }
                Operation::Contains(k) => {
                    prop_assert_eq!(
                        set.contains(&k),
                        model.contains(&k),
                        "contains mismatch for {}",
                        k
                    );
                }
                Operation::Clear => {
                    set.clear();
                    model.clear();
                }
            }
        }

        prop_assert_eq!(set.approximate_size(), model.len());
        for k in &model {
            prop_assert!(set.contains(k));
        }
    }

    #[test]
    fn test_routing_uses_low_bits(key in any::<i64>(), shift in 0u32..12) {
        let set = ShardedSet::<i64>::with_bucket_count(1 << shift).unwrap();
        let index = set.bucket_index(&key);
        prop_assert!(index < set.bucket_count());
        prop_assert_eq!(index, (key as u64 as usize) & ((1usize << shift) - 1));
    }

    #[test]
    fn test_non_power_of_two_rejected(n in 1usize..100_000) {
        prop_assume!(!n.is_power_of_two());
        prop_assert!(ShardedSet::<u32>::with_bucket_count(n).is_err());
    }
}
