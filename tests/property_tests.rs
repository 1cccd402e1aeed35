use proptest::prelude::*;
use dbits::bitvec::BitVector;
use dbits::naive::NaiveBitVector;

/// One public operation of the dynamic bit vector, applied to both the
/// tree and the naive model.
#[derive(Debug, Clone)]
enum Action {
    Insert(usize, bool),
    Remove(usize),
    Set(usize),
    Unset(usize),
    Flip(usize),
    Complement,
}

fn action_strategy() -> impl Strategy<Value = Action> {
    prop_oneof![
        4 => (0usize..1024, any::<bool>()).prop_map(|(i, b)| Action::Insert(i, b)),
        3 => (0usize..1024).prop_map(Action::Remove),
        1 => (0usize..1024).prop_map(Action::Set),
        1 => (0usize..1024).prop_map(Action::Unset),
        1 => (0usize..1024).prop_map(Action::Flip),
        1 => Just(Action::Complement),
    ]
}

fn apply(bv: &mut BitVector, model: &mut NaiveBitVector, action: &Action) {
    // clamp positions into the valid range so most operations land;
    // the raw position exercises the out-of-range paths when it misses
    match *action {
        Action::Insert(i, b) => {
            let i = if bv.is_empty() { 0 } else { i % (bv.len() + 1) };
            assert_eq!(bv.insert(i, b), model.insert(i, b));
        }
        Action::Remove(i) => {
            assert_eq!(bv.remove(i), model.remove(i));
        }
        Action::Set(i) => {
            assert_eq!(bv.set(i), model.set(i));
        }
        Action::Unset(i) => {
            assert_eq!(bv.unset(i), model.unset(i));
        }
        Action::Flip(i) => {
            assert_eq!(bv.flip(i), model.flip(i));
        }
        Action::Complement => {
            bv.complement();
            model.complement();
        }
    }
}

proptest! {
    #[test]
    fn test_random_ops_match_naive_model(
        actions in prop::collection::vec(action_strategy(), 1..200),
        block_size in prop::sample::select(vec![8usize, 16, 64]),
    ) {
        let mut bv = BitVector::with_block_size(block_size);
        let mut model = NaiveBitVector::new();
        for action in &actions {
            apply(&mut bv, &mut model, action);
            prop_assert!(bv.validate());
            // built from empty by inserts and deletes, so the occupancy
            // band holds at every quiescent point
            prop_assert!(bv.validate_occupancy());
            prop_assert_eq!(bv.len(), model.len());
        }
        prop_assert_eq!(bv.extract(), model.extract());

        // spot-check every query against the model in the final state
        for i in 0..=bv.len() {
            prop_assert_eq!(bv.rank(i, true), model.rank(i, true));
            prop_assert_eq!(bv.rank(i, false), model.rank(i, false));
        }
        for i in 0..bv.len() {
            prop_assert_eq!(bv.get(i).unwrap(), model.get(i).unwrap());
        }
        for k in 1..=bv.count_ones() {
            prop_assert_eq!(bv.select(k, true), model.select(k, true));
        }
        for k in 1..=bv.count_zeros() {
            prop_assert_eq!(bv.select(k, false), model.select(k, false));
        }
    }

    #[test]
    fn test_insert_then_reverse_delete_is_identity(
        base in prop::collection::vec(any::<bool>(), 0..300),
        inserts in prop::collection::vec((0usize..1000, any::<bool>()), 1..100),
        block_size in prop::sample::select(vec![8usize, 32]),
    ) {
        let mut bv = BitVector::from_bits_with_block_size(&base, block_size);
        let mut positions = Vec::with_capacity(inserts.len());
        for &(i, b) in &inserts {
            let i = i % (bv.len() + 1);
            bv.insert(i, b).unwrap();
            positions.push(i);
        }
        prop_assert!(bv.validate());
        for &i in positions.iter().rev() {
            bv.remove(i).unwrap();
        }
        prop_assert!(bv.validate());
        prop_assert_eq!(bv.extract(), base);
    }

    #[test]
    fn test_rank_select_duality(
        bits in prop::collection::vec(any::<bool>(), 1..600),
        block_size in prop::sample::select(vec![8usize, 64, 512]),
    ) {
        let bv = BitVector::from_bits_with_block_size(&bits, block_size);
        for &bit in &[false, true] {
            let total = bv.rank(bv.len(), bit);
            for k in 1..=total {
                let pos = bv.select(k, bit).unwrap();
                prop_assert_eq!(bv.rank(pos + 1, bit), k);
                prop_assert_eq!(bv.get(pos).unwrap(), bit);
            }
        }
        for (i, &bit) in bits.iter().enumerate() {
            let k = bv.rank(i, bit) + 1;
            prop_assert_eq!(bv.select(k, bit).unwrap(), i);
        }
    }

    #[test]
    fn test_complement_law(
        bits in prop::collection::vec(any::<bool>(), 0..600),
        block_size in prop::sample::select(vec![8usize, 64]),
    ) {
        let mut bv = BitVector::from_bits_with_block_size(&bits, block_size);
        let ranks_before: Vec<usize> = (0..=bits.len()).map(|i| bv.rank1(i)).collect();
        bv.complement();
        prop_assert!(bv.validate());
        for (i, &bit) in bits.iter().enumerate() {
            prop_assert_eq!(bv.get(i).unwrap(), !bit);
        }
        for (i, &before) in ranks_before.iter().enumerate() {
            prop_assert_eq!(bv.rank1(i), i - before);
        }
        bv.complement();
        prop_assert_eq!(bv.extract(), bits);
    }

    #[test]
    fn test_extract_roundtrip(
        bits in prop::collection::vec(any::<bool>(), 0..2000),
        block_size in prop::sample::select(vec![8usize, 16, 64, 512]),
    ) {
        let bv = BitVector::from_bits_with_block_size(&bits, block_size);
        prop_assert!(bv.validate());
        prop_assert_eq!(bv.extract(), bits);
    }
}

/// Insert 100k bits at pseudo-random positions, then delete them in
/// reverse order of insertion: the vector must come back to the empty
/// single-leaf tree with every invariant intact along the way.
#[test]
fn test_random_insert_delete_returns_to_empty() {
    let mut seed = 0x2545f4914f6cdd1du64;
    let mut rng = move || {
        seed ^= seed << 13;
        seed ^= seed >> 7;
        seed ^= seed << 17;
        seed
    };

    let count = 100_000;
    let mut bv = BitVector::with_block_size(64);
    let mut positions = Vec::with_capacity(count);
    for i in 0..count {
        let pos = (rng() as usize) % (i + 1);
        bv.insert(pos, i % 2 == 0).unwrap();
        positions.push(pos);
        if i % 10_000 == 0 {
            assert!(bv.validate());
        }
    }
    assert_eq!(bv.len(), count);
    assert!(bv.validate());

    for (i, &pos) in positions.iter().enumerate().rev() {
        bv.remove(pos).unwrap();
        if i % 10_000 == 0 {
            assert!(bv.validate());
            assert!(bv.validate_occupancy());
        }
    }
    assert!(bv.is_empty());
    assert_eq!(bv.tree_size(), 1);
    assert!(bv.validate());
    assert!(bv.validate_occupancy());
}

/// The block-size-8 stress of the design: drive a vector through enough
/// front inserts to split every block many times, checking rank and select
/// against the naive model at sampled points, then drain it back to a
/// single empty leaf.
#[test]
fn test_block_size_8_stress() {
    let count = 1 << 14;
    let mut bv = BitVector::with_block_size(8);
    let mut model = NaiveBitVector::new();
    for i in 0..count {
        bv.insert(0, i % 2 == 0).unwrap();
        model.insert(0, i % 2 == 0).unwrap();
        if i % 1024 == 0 {
            assert!(bv.validate());
            let probe = (i * 7 + 3) % (i + 1);
            assert_eq!(bv.rank(probe, true), model.rank(probe, true));
        }
    }
    assert_eq!(bv.len(), count);
    for k in (1..=count / 2).step_by(257) {
        assert_eq!(
            bv.select(k, true).unwrap(),
            model.select(k, true).unwrap()
        );
        assert_eq!(
            bv.select(k, false).unwrap(),
            model.select(k, false).unwrap()
        );
    }
    for i in 0..count {
        bv.remove(0).unwrap();
        if i % 1024 == 0 {
            assert!(bv.validate_occupancy());
        }
    }
    assert!(bv.is_empty());
    assert!(bv.validate());
}
