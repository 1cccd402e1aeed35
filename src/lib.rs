//! # Dynamic Succinct Bit Vectors
//!
//! *Edit anywhere, query anywhere, logarithmic everywhere.*
//!
//! ## Intuition First
//!
//! Picture a bookshelf where the books are packed so tightly that sliding a
//! new one into the middle should mean shoving everything after it one slot
//! to the right. A librarian avoids that by grouping books into bins that
//! are each allowed some slack: inserting a book only rearranges one bin,
//! and a small card on every shelf says how many books sit to its left.
//!
//! This crate is that librarian for bits. The bins are fixed-capacity
//! packed blocks, the shelves form a height-balanced binary tree, and the
//! cards are per-node counters of bits and one-bits. Any position can be
//! found, changed, inserted or deleted by touching one bin and one
//! root-to-leaf path.
//!
//! ## The Problem
//!
//! Static succinct bit vectors answer rank and select in constant time,
//! but a single insert invalidates their precomputed index and forces a
//! full rebuild. A plain growable array supports edits, but each one costs
//! $O(n)$ shifting. Dynamic workloads need both at once:
//!
//! - **Positional edits**: insert and delete at arbitrary indices.
//! - **Succinct queries**: `rank(i, v)` and `select(k, v)` on the fly.
//! - **Bounded overhead**: storage within a constant factor of $n$ bits.
//!
//! ## Historical Context
//!
//! ```text
//! 1962  Adelson-Velsky & Landis   height-balanced search trees (AVL)
//! 1972  Bayer-McCreight           B-trees: block occupancy discipline
//! 1989  Jacobson                  the succinct rank/select paradigm
//! 1989  Fredman-Saks              cell-probe lower bounds for dynamic rank
//! 2006  Mäkinen-Navarro           dynamic rank/select via trees of blocks
//! 2016  Navarro                   "Compact Data Structures" consolidates
//! ```
//!
//! Fredman and Saks showed that dynamic rank cannot beat
//! $\Omega(\log n / \log \log n)$ per operation, so the $O(\log n)$ this
//! design achieves with plain word operations is close to the best
//! possible.
//!
//! ## Mathematical Formulation
//!
//! For a bit sequence $B$ of length $n$ and $v \in \{0, 1\}$:
//!
//! - `access(i)`: $B[i]$.
//! - `rank(i, v)`: $|\{j < i : B[j] = v\}|$.
//! - `select(k, v)`: the 0-based position of the $k$-th occurrence of $v$.
//! - `insert(i, v)` / `delete(i)`: splice $B$ at position $i$.
//!
//! All run in $O(\log n)$ for a fixed block capacity $S$: the tree has
//! $O(n / S)$ leaves, each visit costs $O(1)$ counter work, and the final
//! in-block step costs $O(S / 64)$ word operations.
//!
//! ## What Could Go Wrong
//!
//! 1. **Counters vs. rotations**: every rotation moves a whole subtree
//!    across a counter boundary; forget to re-aggregate and rank silently
//!    drifts. The rotations here adjust counters inline.
//! 2. **Occupancy thrashing**: merging eagerly at exactly half-full blocks
//!    makes an insert/delete pair at one position split and merge forever.
//!    The band (merge at $S/4$, steal from $3S/4$, split to $S/2$) leaves
//!    hysteresis between the triggers.
//!
//! ## Implementation Notes
//!
//! This crate provides:
//! - **`BitVector`**: the dynamic tree-of-blocks structure.
//! - **`NaiveBitVector`**: a linear-time oracle for testing and baselines.
//!
//! ## References
//!
//! - Jacobson, G. (1989). "Succinct Static Data Structures."
//! - Fredman, M., & Saks, M. (1989). "The cell probe complexity of dynamic
//!   data structures."
//! - Mäkinen, V., & Navarro, G. (2006). "Dynamic entropy-compressed
//!   sequences and full-text indexes."
//! - Navarro, G. (2016). "Compact Data Structures: A Practical Approach."

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod bitvec;
mod block;
pub mod error;
pub mod naive;
mod tree;

pub use bitvec::BitVector;
pub use error::Error;
pub use naive::NaiveBitVector;
