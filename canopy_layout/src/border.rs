// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Border styles: how an internal node's box shrinks to its content area.

use kurbo::Rect;

/// The inset applied to an internal node's box before its children are laid
/// out inside it.
///
/// Sinks use this from both [`LayoutSink::draw_border`] (render-time) and
/// [`LayoutSink::remove_border`] (geometry-only) so that drawing, picking,
/// and animation all agree on the same effective content rectangle.
///
/// [`LayoutSink::draw_border`]: crate::LayoutSink::draw_border
/// [`LayoutSink::remove_border`]: crate::LayoutSink::remove_border
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub enum Border {
    /// Children fill the node's box exactly.
    #[default]
    None,
    /// A fixed margin on all four edges.
    Uniform(f64),
    /// A fixed margin on the top and left edges only, leaving room for a
    /// title strip without doubling the gap between adjacent siblings.
    TopLeft {
        /// Inset from the top edge.
        top: f64,
        /// Inset from the left edge.
        left: f64,
    },
}

impl Border {
    /// The content rectangle of `rect` under this border.
    ///
    /// A shrink that would invert the rectangle collapses to a zero-area
    /// rectangle at its center ("not drawn"), never to an inverted one.
    pub fn content(self, rect: Rect) -> Rect {
        let (left, top, right, bottom) = match self {
            Self::None => return rect,
            Self::Uniform(m) => (m, m, m, m),
            Self::TopLeft { top, left } => (left, top, 0.0, 0.0),
        };
        let x0 = rect.x0 + left;
        let y0 = rect.y0 + top;
        let x1 = rect.x1 - right;
        let y1 = rect.y1 - bottom;
        if x0 > x1 || y0 > y1 {
            let c = rect.center();
            return Rect::new(c.x, c.y, c.x, c.y);
        }
        Rect::new(x0, y0, x1, y1)
    }
}
