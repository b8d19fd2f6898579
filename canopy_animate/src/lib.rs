// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=canopy_animate --heading-base-level=0

//! Canopy Animate: interpolation between captured treemap states.
//!
//! A layout pass captured into a [`BoxList`] is a complete snapshot of one
//! visual state: one box per node id, with [`Rect::ZERO`] meaning "this
//! node is absent here" (filtered out, pruned, or not yet added). A
//! [`Transition`] holds two equal-length snapshots (before and after a
//! filter change, a layout-mode toggle, or a re-weighting) and produces
//! the in-between frames for a time parameter `t ∈ [0, 1]`.
//!
//! Interpolation is per coordinate (an affine blend, not a rigid
//! transform), so boxes change aspect ratio continuously. Absent endpoints
//! get the grow/shrink treatment: a node appearing animates from a
//! degenerate point at the center of its destination box, and a node
//! disappearing shrinks to the center of the box it came from, rather than
//! snapping.
//!
//! Endpoints are exact: `sample(0.0)` returns the `from` boxes and
//! `sample(1.0)` the `to` boxes, bit for bit, including the absent cases.
//!
//! ## Example
//!
//! ```rust
//! use canopy_animate::{BoxList, Transition};
//! use kurbo::Rect;
//!
//! let from = BoxList::new(vec![Rect::new(0.0, 0.0, 10.0, 10.0)], 1);
//! let to = BoxList::new(vec![Rect::new(10.0, 10.0, 30.0, 30.0)], 2);
//! let transition = Transition::new(from, to).unwrap();
//!
//! let mid = transition.sample(0.5);
//! assert_eq!(mid.boxes()[0], Rect::new(5.0, 5.0, 20.0, 20.0));
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

use alloc::vec::Vec;
use kurbo::Rect;

use canopy_layout::BoxListSink;
use canopy_tree::NodeId;

/// One captured layout state: a box per node id, plus an optional parallel
/// texture-coordinate list and the tree epoch the capture was taken at.
///
/// [`Rect::ZERO`] cells mean "absent in this state". The texture list, when
/// present, carries per-node texture coordinates for renderers that warp a
/// snapshot image of the old state while boxes move; this crate only keeps
/// it aligned, it does not interpolate it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BoxList {
    boxes: Vec<Rect>,
    tex: Option<Vec<Rect>>,
    epoch: u64,
}

impl BoxList {
    /// A box list from raw per-id boxes, stamped with the tree epoch they
    /// were captured at.
    pub fn new(boxes: Vec<Rect>, epoch: u64) -> Self {
        Self {
            boxes,
            tex: None,
            epoch,
        }
    }

    /// Take the boxes captured by a [`BoxListSink`] layout pass.
    pub fn from_sink(sink: BoxListSink, epoch: u64) -> Self {
        Self::new(sink.into_boxes(), epoch)
    }

    /// Attach a texture-coordinate list, one rect per node id.
    #[must_use]
    pub fn with_tex(mut self, tex: Vec<Rect>) -> Self {
        self.tex = Some(tex);
        self
    }

    /// The boxes, indexed by node id.
    pub fn boxes(&self) -> &[Rect] {
        &self.boxes
    }

    /// The box for `node`; [`Rect::ZERO`] if absent or out of range.
    pub fn get(&self, node: NodeId) -> Rect {
        self.boxes.get(node.index()).copied().unwrap_or(Rect::ZERO)
    }

    /// The texture-coordinate list, if any.
    pub fn tex(&self) -> Option<&[Rect]> {
        self.tex.as_deref()
    }

    /// The tree epoch this state was captured at. Compare against
    /// `Tree::epoch` to detect staleness before reusing a cached list.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    /// Whether the list has no entries.
    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }
}

/// Errors constructing a [`Transition`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum AnimateError {
    /// The two box lists are not the same length, so they cannot be
    /// interpolated index-by-index.
    LengthMismatch {
        /// Length of the `from` list.
        from: usize,
        /// Length of the `to` list.
        to: usize,
    },
}

impl core::fmt::Display for AnimateError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::LengthMismatch { from, to } => {
                write!(f, "box lists differ in length: {from} vs {to}")
            }
        }
    }
}

impl core::error::Error for AnimateError {}

/// Whether a box is the "absent in this state" sentinel.
fn is_null(rect: Rect) -> bool {
    rect.x0 == 0.0 && rect.y0 == 0.0 && rect.x1 == 0.0 && rect.y1 == 0.0
}

/// The zero-area box at `rect`'s center.
fn center_point(rect: Rect) -> Rect {
    let c = rect.center();
    Rect::new(c.x, c.y, c.x, c.y)
}

/// Interpolate one box pair at `t`.
///
/// Exact at the endpoints: `t <= 0` returns `from` and `t >= 1` returns
/// `to` unchanged. In between, each coordinate blends affinely; a null
/// endpoint is replaced by a degenerate point at the other endpoint's
/// center so appearing/disappearing nodes grow from and shrink to a point.
pub fn lerp_rect(from: Rect, to: Rect, t: f64) -> Rect {
    if t <= 0.0 {
        return from;
    }
    if t >= 1.0 {
        return to;
    }
    let (a, b) = match (is_null(from), is_null(to)) {
        (true, true) => return Rect::ZERO,
        (true, false) => (center_point(to), to),
        (false, true) => (from, center_point(from)),
        (false, false) => (from, to),
    };
    Rect::new(
        a.x0 + (b.x0 - a.x0) * t,
        a.y0 + (b.y0 - a.y0) * t,
        a.x1 + (b.x1 - a.x1) * t,
        a.y1 + (b.y1 - a.y1) * t,
    )
}

/// An animated transition between two captured layout states.
///
/// Owns the two endpoint [`BoxList`]s; rebuilt whenever a new transition
/// begins. Sampling clamps `t` to `[0, 1]`.
#[derive(Clone, Debug)]
pub struct Transition {
    from: BoxList,
    to: BoxList,
}

impl Transition {
    /// Pair two equal-length snapshots.
    pub fn new(from: BoxList, to: BoxList) -> Result<Self, AnimateError> {
        if from.len() != to.len() {
            return Err(AnimateError::LengthMismatch {
                from: from.len(),
                to: to.len(),
            });
        }
        Ok(Self { from, to })
    }

    /// The starting state.
    pub fn from_list(&self) -> &BoxList {
        &self.from
    }

    /// The ending state.
    pub fn to_list(&self) -> &BoxList {
        &self.to
    }

    /// The interpolated state at `t` (clamped to `[0, 1]`).
    ///
    /// The result carries the `to` state's epoch and, for renderers warping
    /// a snapshot of the old state, the `from` state's texture list.
    pub fn sample(&self, t: f64) -> BoxList {
        let mut out = BoxList::new(Vec::with_capacity(self.from.len()), self.to.epoch);
        self.sample_into(t, &mut out);
        out
    }

    /// Like [`Transition::sample`], writing into `out` without
    /// reallocating. Per-frame callers keep one scratch list.
    pub fn sample_into(&self, t: f64, out: &mut BoxList) {
        out.boxes.clear();
        out.boxes.extend(
            self.from
                .boxes
                .iter()
                .zip(&self.to.boxes)
                .map(|(&from, &to)| lerp_rect(from, to, t)),
        );
        out.tex = self.from.tex.clone();
        out.epoch = self.to.epoch;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn r(x0: f64, y0: f64, x1: f64, y1: f64) -> Rect {
        Rect::new(x0, y0, x1, y1)
    }

    #[test]
    fn endpoints_are_exact() {
        let from = BoxList::new(vec![r(0.0, 0.0, 10.0, 10.0), Rect::ZERO], 1);
        let to = BoxList::new(vec![Rect::ZERO, r(3.0, 3.0, 9.0, 9.0)], 2);
        let transition = Transition::new(from.clone(), to.clone()).unwrap();

        assert_eq!(transition.sample(0.0).boxes(), from.boxes());
        assert_eq!(transition.sample(1.0).boxes(), to.boxes());
        // Clamped outside [0, 1] too.
        assert_eq!(transition.sample(-0.5).boxes(), from.boxes());
        assert_eq!(transition.sample(1.5).boxes(), to.boxes());
    }

    #[test]
    fn midpoint_blends_each_coordinate() {
        let from = BoxList::new(vec![r(0.0, 0.0, 10.0, 20.0)], 1);
        let to = BoxList::new(vec![r(10.0, 10.0, 20.0, 30.0)], 1);
        let transition = Transition::new(from, to).unwrap();
        assert_eq!(transition.sample(0.5).boxes()[0], r(5.0, 5.0, 15.0, 25.0));
    }

    #[test]
    fn aspect_ratio_changes_continuously() {
        // A wide box morphing into a tall one passes through intermediate
        // aspect ratios; no rigid-transform shortcuts.
        let from = BoxList::new(vec![r(0.0, 0.0, 40.0, 10.0)], 1);
        let to = BoxList::new(vec![r(0.0, 0.0, 10.0, 40.0)], 1);
        let transition = Transition::new(from, to).unwrap();
        let mid = transition.sample(0.5).boxes()[0];
        assert_eq!(mid, r(0.0, 0.0, 25.0, 25.0));
    }

    #[test]
    fn appearing_node_grows_from_destination_center() {
        let to_box = r(10.0, 10.0, 30.0, 50.0); // center (20, 30)
        let transition = Transition::new(
            BoxList::new(vec![Rect::ZERO], 1),
            BoxList::new(vec![to_box], 2),
        )
        .unwrap();
        let mid = transition.sample(0.5).boxes()[0];
        assert_eq!(mid, r(15.0, 20.0, 25.0, 40.0), "halfway out from the center");
        // Early in the animation it is a near-point at the center.
        let early = transition.sample(0.01).boxes()[0];
        assert!((early.center().x - 20.0).abs() < 1e-9);
        assert!((early.center().y - 30.0).abs() < 1e-9);
        assert!(early.area() < to_box.area() * 0.001);
    }

    #[test]
    fn disappearing_node_shrinks_to_its_own_center() {
        let from_box = r(0.0, 0.0, 40.0, 20.0); // center (20, 10)
        let transition = Transition::new(
            BoxList::new(vec![from_box], 1),
            BoxList::new(vec![Rect::ZERO], 2),
        )
        .unwrap();
        let late = transition.sample(0.99).boxes()[0];
        assert!((late.center().x - 20.0).abs() < 1e-9);
        assert!((late.center().y - 10.0).abs() < 1e-9);
        assert!(late.area() < from_box.area() * 0.001);
        // Exact at the end.
        assert_eq!(transition.sample(1.0).boxes()[0], Rect::ZERO);
    }

    #[test]
    fn absent_in_both_states_stays_null() {
        let transition = Transition::new(
            BoxList::new(vec![Rect::ZERO], 1),
            BoxList::new(vec![Rect::ZERO], 1),
        )
        .unwrap();
        assert_eq!(transition.sample(0.5).boxes()[0], Rect::ZERO);
    }

    #[test]
    fn length_mismatch_is_an_error() {
        let err = Transition::new(
            BoxList::new(vec![Rect::ZERO], 1),
            BoxList::new(vec![Rect::ZERO, Rect::ZERO], 1),
        )
        .unwrap_err();
        assert_eq!(err, AnimateError::LengthMismatch { from: 1, to: 2 });
    }

    #[test]
    fn sample_into_reuses_the_buffer() {
        let transition = Transition::new(
            BoxList::new(vec![r(0.0, 0.0, 2.0, 2.0)], 1),
            BoxList::new(vec![r(2.0, 2.0, 4.0, 4.0)], 7),
        )
        .unwrap();
        let mut out = BoxList::default();
        transition.sample_into(0.5, &mut out);
        assert_eq!(out.boxes()[0], r(1.0, 1.0, 3.0, 3.0));
        assert_eq!(out.epoch(), 7, "samples carry the destination epoch");
        transition.sample_into(1.0, &mut out);
        assert_eq!(out.boxes()[0], r(2.0, 2.0, 4.0, 4.0));
        assert_eq!(out.len(), 1, "buffer does not accumulate");
    }

    #[test]
    fn tex_list_rides_along_from_the_old_state() {
        let tex = vec![r(0.0, 0.0, 1.0, 1.0)];
        let from = BoxList::new(vec![r(0.0, 0.0, 2.0, 2.0)], 1).with_tex(tex.clone());
        let to = BoxList::new(vec![r(4.0, 4.0, 8.0, 8.0)], 2);
        let transition = Transition::new(from, to).unwrap();
        assert_eq!(transition.sample(0.3).tex(), Some(tex.as_slice()));
    }

    #[test]
    fn get_by_node_id_handles_out_of_range() {
        use canopy_tree::Tree;
        let mut tree = Tree::new();
        let late_comer = tree.add_node(NodeId::ROOT).unwrap();
        // Captured before `late_comer` existed: one entry only.
        let list = BoxList::new(vec![r(1.0, 1.0, 2.0, 2.0)], 1);
        assert_eq!(list.get(NodeId::ROOT), r(1.0, 1.0, 2.0, 2.0));
        assert_eq!(list.get(late_comer), Rect::ZERO, "absent, not a panic");
    }
}
