#![no_main]
use libfuzzer_sys::fuzz_target;
use dbits::bitvec::BitVector;
use dbits::naive::NaiveBitVector;

// Decode the byte stream as an operation tape and replay it against the
// tree (at the smallest interesting block size) and the naive model; any
// divergence or invariant break is a finding.
fuzz_target!(|data: Vec<(u8, u16)>| {
    let mut bv = BitVector::with_block_size(8);
    let mut model = NaiveBitVector::new();

    for (op, raw) in data {
        let pos = raw as usize;
        match op % 8 {
            0 | 1 => {
                let i = if model.is_empty() { 0 } else { pos % (model.len() + 1) };
                let bit = op % 8 == 0;
                assert_eq!(bv.insert(i, bit), model.insert(i, bit));
            }
            2 => {
                assert_eq!(bv.remove(pos), model.remove(pos));
            }
            3 => {
                assert_eq!(bv.set(pos), model.set(pos));
            }
            4 => {
                assert_eq!(bv.unset(pos), model.unset(pos));
            }
            5 => {
                assert_eq!(bv.flip(pos), model.flip(pos));
            }
            6 => {
                bv.complement();
                model.complement();
            }
            _ => {
                assert_eq!(bv.get(pos).ok(), model.get(pos).ok());
                assert_eq!(bv.rank(pos, true), model.rank(pos, true));
                assert_eq!(bv.rank(pos, false), model.rank(pos, false));
                let k = pos.max(1);
                assert_eq!(bv.select(k, true).ok(), model.select(k, true).ok());
                assert_eq!(bv.select(k, false).ok(), model.select(k, false).ok());
            }
        }
        assert!(bv.validate());
        assert_eq!(bv.len(), model.len());
    }

    assert_eq!(bv.extract(), model.extract());
});
