// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=canopy_tree --heading-base-level=0

//! Canopy Tree: an append-only weighted tree arena with column-oriented attributes.
//!
//! Canopy Tree is the data layer of the Canopy treemap toolkit.
//!
//! - Stores a hierarchy as four parallel index arrays (parent, first child,
//!   next sibling, last child) with an implicit root and a `NIL` sentinel.
//! - Attributes live in named columns addressed by node id, not in the nodes
//!   themselves, so a million-node tree with three attributes is seven flat
//!   vectors.
//! - Provides [`sum_weights`], the post-order pass that makes every internal
//!   node's weight the sum of its children's weights.
//!
//! ## Identifiers are stable
//!
//! [`NodeId`]s are plain indices. Nodes are only ever appended; ids are never
//! recycled within a session, so box lists, filter columns, and pick results
//! keyed by node id stay valid across incremental insertions. The only
//! invalidation point is [`Tree::clear`], which discards everything except a
//! fresh root and bumps the tree's [epoch](Tree::epoch).
//!
//! ## Seams for layout
//!
//! Layout algorithms do not depend on [`Tree`] directly; they are generic
//! over three small capability traits implemented here:
//!
//! - [`TreeView`]: children/parent/is-leaf access.
//! - [`WeightSource`]: per-node weight (implemented by `Column<f64>` and by
//!   closures).
//! - [`FilterPredicate`]: per-node pruning (implemented by `()`, by `[bool]`,
//!   and by closures).
//!
//! ## Example
//!
//! ```rust
//! use canopy_tree::{NodeId, Tree, WeightSource, sum_weights};
//!
//! let mut tree = Tree::new();
//! let size = tree.add_numeric_column("size");
//!
//! let a = tree.add_node(NodeId::ROOT).unwrap();
//! let b = tree.add_node(NodeId::ROOT).unwrap();
//! tree.numeric_mut(size).unwrap().set(a, 1.0);
//! tree.numeric_mut(size).unwrap().set(b, 3.0);
//!
//! let mut weights = tree.numeric(size).unwrap().clone();
//! let total = sum_weights(&tree, &mut weights);
//! assert_eq!(total, 4.0);
//! assert_eq!(weights.weight(NodeId::ROOT), 4.0);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod column;
mod tree;
mod types;
mod weights;

pub use column::{Column, FilterPredicate, NumericColumnId, StrColumnId, WeightSource};
pub use tree::{Children, Descendants, Tree, TreeView};
pub use types::{NodeId, TreeError};
pub use weights::sum_weights;
