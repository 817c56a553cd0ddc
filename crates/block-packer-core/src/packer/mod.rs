use std::borrow::Cow;

use crate::config::LayoutStrategy;
use crate::model::Bounds;

pub mod slice;
pub mod squarify;

pub use slice::SliceAndDice;
pub use squarify::Squarify;

/// A partitioner splits one canvas among sibling weights.
///
/// Implementations must return exactly one rectangle per weight, in the order
/// of `weights`. Rectangles must lie within `canvas` and not overlap; when the
/// weights sum to a positive value they must tile `canvas` and have areas
/// proportional to their weights. Weights are already validated (finite, >= 0),
/// but their sum may overflow; implementations rescale with the heaviest weight
/// before summing.
pub trait Partitioner {
    fn partition(&self, canvas: &Bounds, weights: &[f64]) -> Vec<Bounds>;
}

/// Returns the partitioner implementing `strategy`.
pub fn partitioner_for(strategy: LayoutStrategy) -> &'static dyn Partitioner {
    match strategy {
        LayoutStrategy::SliceAndDice => &SliceAndDice,
        LayoutStrategy::Squarify => &Squarify,
    }
}

/// Axis along which strips are laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Strips run left to right; each spans the full height.
    Horizontal,
    /// Strips run top to bottom; each spans the full width.
    Vertical,
}

impl Axis {
    /// The longer side of `b`; a square slices horizontally.
    pub fn longer_of(b: &Bounds) -> Self {
        if b.width >= b.height {
            Axis::Horizontal
        } else {
            Axis::Vertical
        }
    }
}

/// Returns `weights` unchanged when their sum is finite; otherwise rescales
/// them so the heaviest is 1.0, keeping their proportions.
///
/// Finite weights can still overflow when summed; after scaling the sum is at
/// most `weights.len()`. An infinite weight (possible for summed sub-tree
/// totals) takes the whole share: infinite weights become 1.0, the rest 0.0.
pub(crate) fn scaled_weights(weights: &[f64]) -> Cow<'_, [f64]> {
    let sum: f64 = weights.iter().sum();
    if sum.is_finite() {
        return Cow::Borrowed(weights);
    }
    let max = weights.iter().copied().fold(0.0_f64, f64::max);
    if max.is_infinite() {
        weights
            .iter()
            .map(|w| if w.is_infinite() { 1.0 } else { 0.0 })
            .collect()
    } else if max > 0.0 {
        weights.iter().map(|w| w / max).collect()
    } else {
        Cow::Borrowed(weights)
    }
}

/// Splits the span `[start, start + length]` into consecutive `(offset, extent)`
/// pieces proportional to `weights`.
///
/// Edges come from the running sum of weights (`start + length * acc / sum`),
/// so error does not accumulate with the number of pieces, and the last edge
/// is pinned to `start + length`. `sum` must be the positive sum of `weights`.
pub(crate) fn split_span(start: f64, length: f64, weights: &[f64], sum: f64) -> Vec<(f64, f64)> {
    let end = start + length;
    let last = weights.len().saturating_sub(1);
    let mut acc = 0.0;
    let mut edge = start;
    let mut spans = Vec::with_capacity(weights.len());
    for (i, w) in weights.iter().enumerate() {
        acc += w;
        let far = if i == last {
            end
        } else {
            (start + length * (acc / sum)).clamp(edge, end)
        };
        spans.push((edge, far - edge));
        edge = far;
    }
    spans
}
