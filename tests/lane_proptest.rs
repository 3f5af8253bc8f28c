use lane_tree::{Lane, LaneElement};
use proptest::prelude::*;

const N_VALUES: usize = 200;

#[derive(Debug, Clone)]
enum Op {
    Insert(i16),
    Erase(i16),
}

fn arbitrary_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (-50_i16..50).prop_map(Op::Insert),
        (-50_i16..50).prop_map(Op::Erase),
    ]
}

/// Build a lane from `values`, asserting the structure after every insert.
fn checked_lane(values: &[i32]) -> Lane<i32> {
    let mut lane = Lane::new();
    for &v in values {
        lane.insert(v);
        assert_eq!(lane.validate(), Ok(()));
    }
    lane
}

proptest! {
    /// The insertion order does not change what a lane holds, only the
    /// shape of its tree.
    #[test]
    fn prop_insertion_order_is_irrelevant(
        (values, shuffled) in prop::collection::vec(any::<i32>(), 0..N_VALUES)
            .prop_flat_map(|values| (Just(values.clone()), Just(values).prop_shuffle()))
    ) {
        let a = checked_lane(&values);
        let b = checked_lane(&shuffled);

        let mut sorted = values.clone();
        sorted.sort();
        prop_assert_eq!(Vec::from_iter(a.iter().copied()), sorted);
        prop_assert_eq!(&a, &b);
        prop_assert_eq!(a.len(), values.len());
        prop_assert_eq!(a.front(), a.iter().next());
        prop_assert_eq!(a.back(), a.iter().next_back());
    }

    /// Random inserts and erasures agree with a sorted `Vec`, and the lane
    /// stays balanced and threaded throughout.
    #[test]
    fn prop_insert_erase_against_vec(ops in prop::collection::vec(arbitrary_op(), 0..N_VALUES)) {
        let mut lane = Lane::new();
        let mut control: Vec<i16> = Vec::new();

        for op in ops {
            match op {
                Op::Insert(v) => {
                    let at = control.partition_point(|&x| x <= v);
                    control.insert(at, v);
                    let cursor = lane.insert(v);
                    prop_assert_eq!(cursor.current(), Some(&v));
                }
                Op::Erase(v) => {
                    let at = control.partition_point(|&x| x < v);
                    let expected = match control.get(at) {
                        Some(&x) if x == v => Some(control.remove(at)),
                        _ => None,
                    };
                    prop_assert_eq!(lane.erase(&v), expected);
                }
            }
            prop_assert_eq!(lane.validate(), Ok(()));
            prop_assert_eq!(lane.len(), control.len());
        }

        prop_assert_eq!(Vec::from_iter(lane.iter().copied()), control.clone());
        let reversed: Vec<i16> = control.iter().rev().copied().collect();
        prop_assert_eq!(Vec::from_iter(lane.iter().rev().copied()), reversed);
    }

    /// Searches by position agree with a linear scan.
    #[test]
    fn prop_search_against_scan(
        values in prop::collection::vec(-100_i32..100, 0..N_VALUES),
        key in -110.0_f64..110.0,
    ) {
        let lane = Lane::from_iter(values.iter().copied());
        let mut sorted = values;
        sorted.sort();

        let lower = sorted.iter().find(|&&x| f64::from(x) >= key);
        let upper = sorted.iter().find(|&&x| f64::from(x) > key);
        let equal = sorted.iter().filter(|&&x| f64::from(x) == key).count();

        prop_assert_eq!(lane.lower_bound(key).current(), lower);
        prop_assert_eq!(lane.upper_bound(key).current(), upper);
        prop_assert_eq!(lane.count(key), equal);
        prop_assert_eq!(lane.contains(key), equal > 0);
        prop_assert_eq!(lane.find(key).is_end(), equal == 0);

        // Searching twice without a mutation in between lands on the same node.
        prop_assert_eq!(lane.lower_bound(key), lane.lower_bound(key));
        prop_assert_eq!(lane.upper_bound(key), lane.upper_bound(key));
        prop_assert_eq!(lane.find(key), lane.find(key));
        if let Some(element) = lane.cursor_start().current() {
            prop_assert_eq!(lane.lower_bound(element), lane.lower_bound(element));
        }

        // Neighbours of the lower bound are its neighbours in sorted order.
        let cursor = lane.lower_bound(key);
        let rank = sorted.partition_point(|&x| f64::from(x) < key);
        prop_assert_eq!(cursor.peek_prev(), rank.checked_sub(1).and_then(|r| sorted.get(r)));
    }

    /// A clone has the same shape, and is fully detached from the original.
    #[test]
    fn prop_clone_is_isolated(
        values in prop::collection::vec(any::<i32>(), 1..N_VALUES),
        extra in any::<i32>(),
    ) {
        let original = Lane::from_iter(values.iter().copied());
        let mut copy = original.clone();
        prop_assert!(copy.strict_eq(&original));

        copy.insert(extra);
        copy.pop_front();
        copy.pop_back();
        prop_assert_eq!(copy.validate(), Ok(()));
        prop_assert_eq!(original.validate(), Ok(()));

        let mut sorted = values;
        sorted.sort();
        prop_assert_eq!(Vec::from_iter(original.iter().copied()), sorted);
    }

    /// Ordering against elements and against positions agree.
    #[test]
    fn prop_transitivity(a in -1e6_f64..1e6, b in -1e6_f64..1e6, p in -1e6_f64..1e6) {
        if a.less_than_position(p) && !b.less_than_position(p) {
            prop_assert!(a.less_than(&b));
        }
        if a.equals_position(p) && b.equals_position(p) {
            prop_assert!(a.equals(&b));
        }
        prop_assert_eq!(a.less_than(&b), a.less_than_position(b));
    }

    /// The same law holds for wide integers, whose positions do not all fit
    /// in an `f64` exactly.
    #[test]
    fn prop_transitivity_wide_integers(
        base in any::<i64>(),
        a_offset in -4_i64..4,
        b_offset in -4_i64..4,
        fraction in prop_oneof![Just(0.0_f64), -0.75_f64..0.75],
    ) {
        let a = base.saturating_add(a_offset);
        let b = base.saturating_add(b_offset);
        let p = base as f64 + fraction;
        if a.less_than_position(p) && !b.less_than_position(p) {
            prop_assert!(a.less_than(&b));
        }
        if a.equals_position(p) && b.equals_position(p) {
            prop_assert!(a.equals(&b));
        }

        let lane = Lane::from([a, b]);
        let equal = [a, b].iter().filter(|x| x.equals_position(p)).count();
        prop_assert_eq!(lane.count(p), equal);
        prop_assert!(equal <= 1 || a == b);
    }
}
