// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A validating sink wrapper enforcing the callback state machine.

use alloc::vec::Vec;
use kurbo::Rect;

use canopy_tree::NodeId;

use crate::direction::Direction;
use crate::sink::LayoutSink;

bitflags::bitflags! {
    /// Set of sink calls, used for the per-state legality table.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    struct CallMask: u16 {
        const START         = 1 << 0;
        const FINISH        = 1 << 1;
        const BEGIN_BOX     = 1 << 2;
        const DRAW_BOX      = 1 << 3;
        const DRAW_BORDER   = 1 << 4;
        const REMOVE_BORDER = 1 << 5;
        const END_BOX       = 1 << 6;
        const BEGIN_STRIP   = 1 << 7;
        const END_STRIP     = 1 << 8;
    }
}

/// A sink callback, named for violation reports.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum SinkCall {
    /// [`LayoutSink::start`].
    Start,
    /// [`LayoutSink::finish`].
    Finish,
    /// [`LayoutSink::begin_box`].
    BeginBox,
    /// [`LayoutSink::draw_box`].
    DrawBox,
    /// [`LayoutSink::draw_border`].
    DrawBorder,
    /// [`LayoutSink::remove_border`].
    RemoveBorder,
    /// [`LayoutSink::end_box`].
    EndBox,
    /// [`LayoutSink::begin_strip`].
    BeginStrip,
    /// [`LayoutSink::end_strip`].
    EndStrip,
}

impl SinkCall {
    fn mask(self) -> CallMask {
        match self {
            Self::Start => CallMask::START,
            Self::Finish => CallMask::FINISH,
            Self::BeginBox => CallMask::BEGIN_BOX,
            Self::DrawBox => CallMask::DRAW_BOX,
            Self::DrawBorder => CallMask::DRAW_BORDER,
            Self::RemoveBorder => CallMask::REMOVE_BORDER,
            Self::EndBox => CallMask::END_BOX,
            Self::BeginStrip => CallMask::BEGIN_STRIP,
            Self::EndStrip => CallMask::END_STRIP,
        }
    }
}

/// Validator state: `Inited → Started ⇄ Visiting → Finished → Started`.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum SinkState {
    /// No pass has begun.
    Inited,
    /// `start` was called; no box is open yet.
    Started,
    /// At least one `begin_box` has been accepted this pass.
    Visiting,
    /// `finish` was called; a new pass may `start`.
    Finished,
}

impl SinkState {
    fn legal(self) -> CallMask {
        match self {
            Self::Inited | Self::Finished => CallMask::START,
            Self::Started => CallMask::BEGIN_BOX | CallMask::FINISH,
            Self::Visiting => CallMask::all().difference(CallMask::START),
        }
    }
}

/// A contract violation observed by [`CheckedSink`].
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Violation {
    /// A call arrived in a state where it is not legal.
    IllegalCall {
        /// The offending call.
        call: SinkCall,
        /// The state it arrived in.
        state: SinkState,
    },
    /// `finish` arrived while boxes were still open.
    UnbalancedFinish {
        /// How many boxes were open.
        open: usize,
    },
    /// `end_box` arrived with no open box.
    UnbalancedEnd,
}

/// Wraps any sink and validates the callback sequence against the state
/// machine, recording [`Violation`]s while forwarding every call unchanged.
///
/// Intended for debug and diagnostic builds: wrap the real sink, run the
/// layout, then inspect [`CheckedSink::violations`] (or call
/// [`CheckedSink::assert_clean`] in tests). Release rendering paths use the
/// bare sink and skip the bookkeeping; the check is a wrapper precisely so
/// that it costs nothing when not in the stack. Pruning (`begin_box`
/// returning `false`) is normal control flow and is never a violation.
#[derive(Clone, Debug)]
pub struct CheckedSink<S> {
    inner: S,
    state: SinkState,
    open: usize,
    violations: Vec<Violation>,
}

impl<S: LayoutSink> CheckedSink<S> {
    /// Wrap `inner`.
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            state: SinkState::Inited,
            open: 0,
            violations: Vec::new(),
        }
    }

    /// Violations recorded so far, in call order.
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// The wrapped sink.
    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Unwrap, discarding the recorded state.
    pub fn into_inner(self) -> S {
        self.inner
    }

    /// Panic if any violation was recorded.
    ///
    /// # Panics
    ///
    /// Panics with the first recorded violation.
    #[track_caller]
    pub fn assert_clean(&self) {
        assert!(
            self.violations.is_empty(),
            "sink contract violated: {:?}",
            self.violations[0]
        );
    }

    fn check(&mut self, call: SinkCall) {
        if !self.state.legal().contains(call.mask()) {
            self.violations.push(Violation::IllegalCall {
                call,
                state: self.state,
            });
        }
    }
}

impl<S: LayoutSink> LayoutSink for CheckedSink<S> {
    fn start(&mut self) {
        self.check(SinkCall::Start);
        self.state = SinkState::Started;
        self.open = 0;
        self.inner.start();
    }

    fn finish(&mut self) {
        self.check(SinkCall::Finish);
        if self.open != 0 {
            self.violations.push(Violation::UnbalancedFinish { open: self.open });
        }
        self.state = SinkState::Finished;
        self.inner.finish();
    }

    fn begin_box(&mut self, rect: Rect, node: NodeId, depth: usize) -> bool {
        self.check(SinkCall::BeginBox);
        let accepted = self.inner.begin_box(rect, node, depth);
        if accepted {
            self.state = SinkState::Visiting;
            self.open += 1;
        }
        accepted
    }

    fn draw_box(&mut self, rect: Rect, node: NodeId, depth: usize) {
        self.check(SinkCall::DrawBox);
        self.inner.draw_box(rect, node, depth);
    }

    fn draw_border(&mut self, rect: Rect, node: NodeId, depth: usize) -> Rect {
        self.check(SinkCall::DrawBorder);
        self.inner.draw_border(rect, node, depth)
    }

    fn remove_border(&mut self, rect: Rect, node: NodeId, depth: usize) -> Rect {
        self.check(SinkCall::RemoveBorder);
        self.inner.remove_border(rect, node, depth)
    }

    fn end_box(&mut self, rect: Rect, node: NodeId, depth: usize) {
        self.check(SinkCall::EndBox);
        if self.open == 0 {
            self.violations.push(Violation::UnbalancedEnd);
        } else {
            self.open -= 1;
        }
        self.inner.end_box(rect, node, depth);
    }

    fn begin_strip(&mut self, rect: Rect, node: NodeId, depth: usize, dir: Direction) {
        self.check(SinkCall::BeginStrip);
        self.inner.begin_strip(rect, node, depth, dir);
    }

    fn end_strip(&mut self, rect: Rect, node: NodeId, depth: usize, dir: Direction) {
        self.check(SinkCall::EndStrip);
        self.inner.end_strip(rect, node, depth, dir);
    }
}
