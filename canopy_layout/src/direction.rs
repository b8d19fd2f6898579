// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Subdivision direction.

/// Axis and order of a proportional subdivision.
///
/// Horizontal directions split a box along the x axis (children side by
/// side); vertical directions split along y (children stacked). Sibling
/// order determines placement from the named edge.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum Direction {
    /// Split horizontally, first sibling at the left edge.
    #[default]
    LeftToRight,
    /// Split horizontally, first sibling at the right edge.
    RightToLeft,
    /// Split vertically, first sibling at the top edge.
    TopToBottom,
    /// Split vertically, first sibling at the bottom edge.
    BottomToTop,
}

impl Direction {
    /// Whether this direction splits along the horizontal axis.
    pub const fn is_horizontal(self) -> bool {
        matches!(self, Self::LeftToRight | Self::RightToLeft)
    }

    /// The direction used one level deeper in slice-and-dice: the axis
    /// flips, the placement order is preserved.
    pub const fn flip(self) -> Self {
        match self {
            Self::LeftToRight => Self::TopToBottom,
            Self::RightToLeft => Self::BottomToTop,
            Self::TopToBottom => Self::LeftToRight,
            Self::BottomToTop => Self::RightToLeft,
        }
    }
}
