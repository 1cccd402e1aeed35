//! Dynamic bit vector with logarithmic-time positional edits and queries.
//!
//! The vector is an AVL tree whose leaves hold packed bit blocks of a fixed
//! capacity `S`. Every internal node stores the number of bits and the
//! number of set bits in its left subtree, which routes any positional
//! operation to the right leaf in $O(\log n)$ and answers rank and select
//! along the way.
//!
//! # Occupancy band
//!
//! Leaves are kept between `S/4` and `S` bits. A leaf that overflows on
//! insert splits into two half-full leaves; a leaf that drains to `S/4` on
//! delete either steals bits from a neighbor holding at least `3S/4` or
//! merges with it. The band keeps storage within a constant factor of the
//! raw bit count while bounding the tree's leaf count, and the AVL
//! rotations bound its depth.
//!
//! # Counter maintenance
//!
//! Every mutation touches one leaf and then climbs to the root once,
//! applying its `(bits, ones)` delta at each ancestor entered from the
//! left. Splits, steals, merges and rotations preserve the counters by
//! construction; `validate` checks the whole invariant set on demand.

use std::ops::Index;

use crate::block::Block;
use crate::error::{Error, Result};
use crate::tree::{NodeId, Tree};

/// Default leaf block capacity in bits.
const DEFAULT_BLOCK_SIZE: usize = 512;

/// A dynamic bit vector supporting insert, delete, in-place mutation,
/// access, rank and select, all in time logarithmic in its length.
pub struct BitVector {
    tree: Tree,
    len: u32,
    block_size: u32,
    target: u32,
    split_bound: u32,
    lower_bound: u32,
}

impl std::fmt::Debug for BitVector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BitVector")
            .field("len", &self.len)
            .field("ones", &self.count_ones())
            .field("block_size", &self.block_size)
            .finish()
    }
}

impl Default for BitVector {
    fn default() -> Self {
        Self::new()
    }
}

impl BitVector {
    /// Create an empty bit vector with the default block size.
    pub fn new() -> Self {
        Self::with_block_size(DEFAULT_BLOCK_SIZE)
    }

    /// Create an empty bit vector whose leaves hold up to `block_size`
    /// bits.
    ///
    /// # Panics
    ///
    /// Panics if `block_size` is odd or below 4.
    pub fn with_block_size(block_size: usize) -> Self {
        assert!(
            block_size >= 4 && block_size % 2 == 0 && block_size <= u32::MAX as usize,
            "block size must be even and at least 4"
        );
        let s = block_size as u32;
        Self {
            tree: Tree::new(Block::new(s)),
            len: 0,
            block_size: s,
            target: s / 2,
            split_bound: (block_size * 3 / 4) as u32,
            lower_bound: s / 4,
        }
    }

    /// Build a bit vector holding `bits` in order, with the default block
    /// size.
    pub fn from_bits(bits: &[bool]) -> Self {
        Self::from_bits_with_block_size(bits, DEFAULT_BLOCK_SIZE)
    }

    /// Build a bit vector holding `bits` in order.
    ///
    /// Lays out a balanced shape with one leaf per half block of input and
    /// fills the leaves left to right, so construction is linear instead of
    /// paying the insert path per bit.
    ///
    /// # Panics
    ///
    /// Panics if `block_size` is odd or below 4, or if `bits` is longer
    /// than `u32::MAX`.
    pub fn from_bits_with_block_size(bits: &[bool], block_size: usize) -> Self {
        let mut bv = Self::with_block_size(block_size);
        assert!(
            bits.len() <= u32::MAX as usize,
            "bit vector length limit exceeded"
        );
        if bits.is_empty() {
            return bv;
        }
        let target = bv.target as usize;
        let num_leaves = bits.len().div_ceil(target) as u32;
        bv.tree.build_balanced(None, num_leaves, bv.block_size);
        let mut leaf = Some(bv.tree.leftmost_leaf());
        for chunk in bits.chunks(target) {
            let id = leaf.expect("the balanced shape has one leaf per chunk");
            let block = bv
                .tree
                .node_mut(id)
                .block
                .as_mut()
                .expect("leaves carry a block");
            for (j, &bit) in chunk.iter().enumerate() {
                if bit {
                    block.set(j as u32);
                }
            }
            let ones = block.count();
            bv.tree.propagate(id, chunk.len() as i32, ones as i32);
            leaf = bv.tree.next_leaf(id);
        }
        bv.len = bits.len() as u32;
        bv
    }

    /// Total number of bits.
    pub fn len(&self) -> usize {
        self.len as usize
    }

    /// Return true if the vector holds no bits.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Total number of set bits.
    pub fn count_ones(&self) -> usize {
        let mut acc = 0u32;
        let mut cur = Some(self.tree.root);
        while let Some(id) = cur {
            let node = self.tree.node(id);
            acc += node.ones;
            cur = node.right;
        }
        acc as usize
    }

    /// Total number of unset bits.
    pub fn count_zeros(&self) -> usize {
        self.len() - self.count_ones()
    }

    /// Approximate heap memory usage in bytes.
    pub fn heap_bytes(&self) -> usize {
        self.tree.heap_bytes()
    }

    /// Number of tree nodes currently backing the vector; useful for space
    /// accounting. A vector holding `n` bits has at most `2 * (4n / S) - 1`
    /// of them once deletions have settled.
    pub fn tree_size(&self) -> usize {
        self.tree.size()
    }

    /// Descend from `start`, peeling off left-subtree bit counts, until a
    /// leaf is reached; returns the leaf and the offset within it.
    fn descend_from(&self, start: NodeId, mut i: u32) -> (NodeId, u32) {
        let mut id = start;
        loop {
            let node = self.tree.node(id);
            match (node.left, node.right) {
                (Some(l), Some(r)) => {
                    if i < node.nums {
                        id = l;
                    } else {
                        i -= node.nums;
                        id = r;
                    }
                }
                _ => return (id, i),
            }
        }
    }

    fn find_block(&self, i: u32) -> (NodeId, u32) {
        self.descend_from(self.tree.root, i)
    }

    /// Insert `bit` at position `index`, shifting every later bit one
    /// position up. `index` may equal the current length to append.
    ///
    /// An out-of-range `index` reports a diagnostic on stderr and leaves
    /// the vector untouched.
    pub fn insert(&mut self, index: usize, bit: bool) -> Result<()> {
        if index > self.len as usize {
            let err = Error::IndexOutOfBounds(index, self.len as usize);
            eprintln!("insert skipped: {err}");
            return Err(err);
        }
        let (mut leaf, mut offset) = self.find_block(index as u32);
        if self.tree.node(leaf).nums >= self.block_size {
            self.split_block(leaf);
            let (l, o) = self.descend_from(leaf, offset);
            leaf = l;
            offset = o;
            self.tree.root = self.tree.fix_tree(leaf);
        }
        let node = self.tree.node_mut(leaf);
        let nums = node.nums;
        node.block
            .as_mut()
            .expect("leaves carry a block")
            .insert(offset, nums, bit);
        self.tree.propagate(leaf, 1, i32::from(bit));
        self.len += 1;
        Ok(())
    }

    /// Remove the bit at position `index`, shifting every later bit one
    /// position down. A leaf left at or below the lower occupancy bound
    /// refills itself from a neighbor, by stealing or merging.
    ///
    /// An out-of-range `index` reports a diagnostic on stderr and leaves
    /// the vector untouched.
    pub fn remove(&mut self, index: usize) -> Result<()> {
        if index >= self.len as usize {
            let err = Error::IndexOutOfBounds(index, self.len as usize);
            eprintln!("remove skipped: {err}");
            return Err(err);
        }
        let (leaf, offset) = self.find_block(index as u32);
        let node = self.tree.node_mut(leaf);
        let nums = node.nums;
        let block = node.block.as_mut().expect("leaves carry a block");
        let removed = block.get(offset);
        block.remove(offset, nums);
        self.tree.propagate(leaf, -1, if removed { -1 } else { 0 });
        self.len -= 1;

        if self.tree.node(leaf).nums > self.lower_bound {
            return Ok(());
        }
        let prev = self.tree.prev_leaf(leaf);
        let next = self.tree.next_leaf(leaf);
        match (prev, next) {
            (None, None) => {}
            (Some(p), None) => {
                if self.tree.node(p).nums >= self.split_bound {
                    self.steal_left(leaf, p);
                } else {
                    self.merge_left(leaf, p);
                }
            }
            (None, Some(n)) => {
                if self.tree.node(n).nums >= self.split_bound {
                    self.steal_right(leaf, n);
                } else {
                    self.merge_right(leaf, n);
                }
            }
            (Some(p), Some(n)) => {
                let prev_nums = self.tree.node(p).nums;
                let next_nums = self.tree.node(n).nums;
                if prev_nums >= self.split_bound || next_nums >= self.split_bound {
                    // steal from the larger neighbor, ties to the right
                    if prev_nums > next_nums {
                        self.steal_left(leaf, p);
                    } else {
                        self.steal_right(leaf, n);
                    }
                } else if prev_nums < next_nums {
                    // both neighbors are low; merge with the smaller one
                    self.merge_left(leaf, p);
                } else {
                    self.merge_right(leaf, n);
                }
            }
        }
        Ok(())
    }

    /// Return the bit at position `index`.
    pub fn get(&self, index: usize) -> Result<bool> {
        if index >= self.len as usize {
            return Err(Error::IndexOutOfBounds(index, self.len as usize));
        }
        let (leaf, offset) = self.find_block(index as u32);
        Ok(self
            .tree
            .node(leaf)
            .block
            .as_ref()
            .expect("leaves carry a block")
            .get(offset))
    }

    /// Set the bit at position `index` to 1.
    pub fn set(&mut self, index: usize) -> Result<()> {
        self.mutate(index, |block, offset| {
            let delta = if block.get(offset) { 0 } else { 1 };
            block.set(offset);
            delta
        })
    }

    /// Clear the bit at position `index` to 0.
    pub fn unset(&mut self, index: usize) -> Result<()> {
        self.mutate(index, |block, offset| {
            let delta = if block.get(offset) { -1 } else { 0 };
            block.unset(offset);
            delta
        })
    }

    /// Toggle the bit at position `index`.
    pub fn flip(&mut self, index: usize) -> Result<()> {
        self.mutate(index, |block, offset| {
            let delta = if block.get(offset) { -1 } else { 1 };
            block.flip(offset);
            delta
        })
    }

    fn mutate(&mut self, index: usize, op: impl FnOnce(&mut Block, u32) -> i32) -> Result<()> {
        if index >= self.len as usize {
            return Err(Error::IndexOutOfBounds(index, self.len as usize));
        }
        let (leaf, offset) = self.find_block(index as u32);
        let block = self
            .tree
            .node_mut(leaf)
            .block
            .as_mut()
            .expect("leaves carry a block");
        let delta = op(block, offset);
        self.tree.propagate(leaf, 0, delta);
        Ok(())
    }

    /// Count the occurrences of `bit` in positions `[0, index)`.
    ///
    /// An `index` beyond the current length is clamped to it, so
    /// `rank(len, bit)` and above return the total occurrence count.
    pub fn rank(&self, index: usize, bit: bool) -> usize {
        let mut i = index.min(self.len as usize) as u32;
        let mut acc = 0u32;
        let mut id = self.tree.root;
        loop {
            let node = self.tree.node(id);
            match (node.left, node.right) {
                (Some(l), Some(r)) => {
                    if i < node.nums {
                        id = l;
                    } else {
                        acc += if bit { node.ones } else { node.nums - node.ones };
                        i -= node.nums;
                        id = r;
                    }
                }
                _ => {
                    let prefix = i.min(node.nums);
                    let ones = node
                        .block
                        .as_ref()
                        .expect("leaves carry a block")
                        .rank1(prefix);
                    acc += if bit { ones } else { prefix - ones };
                    return acc as usize;
                }
            }
        }
    }

    /// Count the set bits in positions `[0, index)`.
    pub fn rank1(&self, index: usize) -> usize {
        self.rank(index, true)
    }

    /// Count the unset bits in positions `[0, index)`.
    pub fn rank0(&self, index: usize) -> usize {
        self.rank(index, false)
    }

    /// Return the position of the `k`-th (1-based) occurrence of `bit`.
    ///
    /// `k == 0` and `k` beyond the total occurrence count print a
    /// diagnostic on stderr and are reported as
    /// [`Error::InvalidSelection`].
    pub fn select(&self, k: usize, bit: bool) -> Result<usize> {
        let total = if bit {
            self.count_ones()
        } else {
            self.count_zeros()
        };
        if k == 0 || k > total {
            let err = Error::InvalidSelection(k);
            eprintln!("select failed: {err}");
            return Err(err);
        }
        let mut k = k as u32;
        let mut pos = 0u32;
        let mut id = self.tree.root;
        loop {
            let node = self.tree.node(id);
            match (node.left, node.right) {
                (Some(l), Some(r)) => {
                    let in_left = if bit { node.ones } else { node.nums - node.ones };
                    if k <= in_left {
                        id = l;
                    } else {
                        k -= in_left;
                        pos += node.nums;
                        id = r;
                    }
                }
                _ => {
                    let offset = node
                        .block
                        .as_ref()
                        .expect("leaves carry a block")
                        .select(k, bit, node.nums)
                        .expect("counters route select to a leaf holding the occurrence");
                    return Ok((pos + offset) as usize);
                }
            }
        }
    }

    /// Return the position of the `k`-th (1-based) set bit.
    pub fn select1(&self, k: usize) -> Result<usize> {
        self.select(k, true)
    }

    /// Return the position of the `k`-th (1-based) unset bit.
    pub fn select0(&self, k: usize) -> Result<usize> {
        self.select(k, false)
    }

    /// Flip every bit in the vector.
    pub fn complement(&mut self) {
        self.complement_rec(self.tree.root);
    }

    fn complement_rec(&mut self, id: NodeId) {
        let (left, right, nums) = {
            let node = self.tree.node(id);
            (node.left, node.right, node.nums)
        };
        {
            let node = self.tree.node_mut(id);
            node.ones = node.nums - node.ones;
        }
        match (left, right) {
            (Some(l), Some(r)) => {
                self.complement_rec(l);
                self.complement_rec(r);
            }
            _ => {
                let block = self
                    .tree
                    .node_mut(id)
                    .block
                    .as_mut()
                    .expect("leaves carry a block");
                block.flip_all();
                block.clear_from(nums);
            }
        }
    }

    /// Collect the vector's contents as one boolean sequence in logical
    /// order.
    pub fn extract(&self) -> Vec<bool> {
        let mut bits = Vec::with_capacity(self.len as usize);
        let mut leaf = Some(self.tree.leftmost_leaf());
        while let Some(id) = leaf {
            let node = self.tree.node(id);
            let block = node.block.as_ref().expect("leaves carry a block");
            for i in 0..node.nums {
                bits.push(block.get(i));
            }
            leaf = self.tree.next_leaf(id);
        }
        bits
    }

    /// Check the structural invariants: counter soundness at every internal
    /// node, height soundness and AVL balance, per-leaf popcounts, clean
    /// block tails and occupancy within capacity. Intended for tests and
    /// debugging; runs in linear time.
    pub fn validate(&self) -> bool {
        let (total, _) = self.subtree_totals(self.tree.root);
        total == self.len && self.validate_rec(self.tree.root)
    }

    /// Check the leaf occupancy band: unless the tree is a single leaf,
    /// every leaf holds more than `S/4` bits.
    ///
    /// Holds at every quiescent point of a vector built through inserts
    /// and deletes. Bulk construction may leave a shorter trailing leaf,
    /// which stays short until a delete first touches its block, so this
    /// check is separate from [`BitVector::validate`].
    pub fn validate_occupancy(&self) -> bool {
        let mut leaf = self.tree.leftmost_leaf();
        if self.tree.next_leaf(leaf).is_none() {
            return true;
        }
        loop {
            if self.tree.node(leaf).nums <= self.lower_bound {
                return false;
            }
            match self.tree.next_leaf(leaf) {
                Some(next) => leaf = next,
                None => return true,
            }
        }
    }

    fn subtree_totals(&self, id: NodeId) -> (u32, u32) {
        let mut nums = 0;
        let mut ones = 0;
        let mut cur = Some(id);
        while let Some(n) = cur {
            let node = self.tree.node(n);
            nums += node.nums;
            ones += node.ones;
            cur = node.right;
        }
        (nums, ones)
    }

    fn validate_rec(&self, id: NodeId) -> bool {
        let node = self.tree.node(id);
        match (node.left, node.right) {
            (None, None) => {
                let block = match node.block.as_ref() {
                    Some(b) => b,
                    None => return false,
                };
                node.nums <= self.block_size
                    && node.ones == block.count()
                    && block.rank1(node.nums) == block.count()
                    && node.height == 1
            }
            (Some(l), Some(r)) => {
                let (nums, ones) = self.subtree_totals(l);
                let hl = self.tree.node(l).height;
                let hr = self.tree.node(r).height;
                node.block.is_none()
                    && node.nums == nums
                    && node.ones == ones
                    && node.height == 1 + hl.max(hr)
                    && (i32::from(hl) - i32::from(hr)).abs() <= 1
                    && self.tree.node(l).parent == Some(id)
                    && self.tree.node(r).parent == Some(id)
                    && self.validate_rec(l)
                    && self.validate_rec(r)
            }
            _ => false,
        }
    }

    /// Split a full leaf into an internal node over two half-full leaves.
    /// The top half of the block stays in the left child; the bottom half
    /// shifts down into the right child so both are left-justified again.
    fn split_block(&mut self, id: NodeId) {
        let mut bottom = self
            .tree
            .node_mut(id)
            .block
            .take()
            .expect("split target is a leaf");
        let mut top = bottom.clone();
        top.clear_from(self.target);
        bottom.shl(self.target);
        let top_ones = top.count();
        let bottom_ones = bottom.count();

        let left = self.tree.alloc(Some(top));
        let right = self.tree.alloc(Some(bottom));
        self.tree.attach_children(id, left, right);
        {
            let n = self.tree.node_mut(left);
            n.nums = self.target;
            n.ones = top_ones;
        }
        {
            let n = self.tree.node_mut(right);
            n.nums = self.target;
            n.ones = bottom_ones;
        }
        {
            let n = self.tree.node_mut(id);
            n.nums = self.target;
            n.ones = top_ones;
        }
        self.tree.propagate(id, 0, 0);
    }

    /// Move bits from the tail of the predecessor leaf to the front of an
    /// underfull leaf, halving the occupancy gap between them.
    fn steal_left(&mut self, leaf: NodeId, prev: NodeId) {
        let prev_nums = self.tree.node(prev).nums;
        let leaf_nums = self.tree.node(leaf).nums;
        let steal = (prev_nums - leaf_nums) / 2;

        let mut moved = self
            .tree
            .node(prev)
            .block
            .as_ref()
            .expect("leaves carry a block")
            .clone();
        moved.shl(prev_nums - steal);
        let ones = moved.count();

        {
            let block = self
                .tree
                .node_mut(leaf)
                .block
                .as_mut()
                .expect("leaves carry a block");
            block.shr(steal);
            block.or(&moved);
        }
        self.tree
            .node_mut(prev)
            .block
            .as_mut()
            .expect("leaves carry a block")
            .clear_from(prev_nums - steal);

        self.tree.propagate(leaf, steal as i32, ones as i32);
        self.tree.propagate(prev, -(steal as i32), -(ones as i32));
    }

    /// Mirror of [`BitVector::steal_left`]: move bits from the front of the
    /// successor leaf to the tail of an underfull leaf.
    fn steal_right(&mut self, leaf: NodeId, next: NodeId) {
        let next_nums = self.tree.node(next).nums;
        let leaf_nums = self.tree.node(leaf).nums;
        let steal = (next_nums - leaf_nums) / 2;

        let mut moved = self
            .tree
            .node(next)
            .block
            .as_ref()
            .expect("leaves carry a block")
            .clone();
        moved.clear_from(steal);
        moved.shr(leaf_nums);
        let ones = moved.count();

        self.tree
            .node_mut(leaf)
            .block
            .as_mut()
            .expect("leaves carry a block")
            .or(&moved);
        self.tree
            .node_mut(next)
            .block
            .as_mut()
            .expect("leaves carry a block")
            .shl(steal);

        self.tree.propagate(leaf, steal as i32, ones as i32);
        self.tree.propagate(next, -(steal as i32), -(ones as i32));
    }

    /// Absorb the whole predecessor leaf at the front of `leaf`, then
    /// splice the empty donor out of the tree.
    fn merge_left(&mut self, leaf: NodeId, prev: NodeId) {
        let (prev_nums, prev_ones) = {
            let p = self.tree.node(prev);
            (p.nums, p.ones)
        };
        let donor = self
            .tree
            .node_mut(prev)
            .block
            .take()
            .expect("leaves carry a block");
        {
            let block = self
                .tree
                .node_mut(leaf)
                .block
                .as_mut()
                .expect("leaves carry a block");
            block.shr(prev_nums);
            block.or(&donor);
        }
        self.tree
            .propagate(leaf, prev_nums as i32, prev_ones as i32);
        self.tree
            .propagate(prev, -(prev_nums as i32), -(prev_ones as i32));
        self.tree.root = self.tree.merge_left(leaf, prev);
    }

    /// Absorb the whole successor leaf at the tail of `leaf`, then splice
    /// the empty donor out of the tree.
    fn merge_right(&mut self, leaf: NodeId, next: NodeId) {
        let (next_nums, next_ones) = {
            let n = self.tree.node(next);
            (n.nums, n.ones)
        };
        let mut donor = self
            .tree
            .node_mut(next)
            .block
            .take()
            .expect("leaves carry a block");
        let leaf_nums = self.tree.node(leaf).nums;
        donor.shr(leaf_nums);
        self.tree
            .node_mut(leaf)
            .block
            .as_mut()
            .expect("leaves carry a block")
            .or(&donor);
        self.tree
            .propagate(leaf, next_nums as i32, next_ones as i32);
        self.tree
            .propagate(next, -(next_nums as i32), -(next_ones as i32));
        self.tree.root = self.tree.merge_right(leaf, next);
    }
}

impl Index<usize> for BitVector {
    type Output = bool;

    /// Subscript form of [`BitVector::get`]; panics on an out-of-range
    /// index like slice indexing does.
    fn index(&self, index: usize) -> &bool {
        match self.get(index) {
            Ok(true) => &true,
            Ok(false) => &false,
            Err(_) => panic!(
                "index out of bounds: the len is {} but the index is {}",
                self.len(),
                index
            ),
        }
    }
}
