use super::{Axis, Partitioner, scaled_weights, split_span};
use crate::model::Bounds;

/// Slice-and-dice: one strip per item along the canvas's longer side, in input order.
///
/// When the weights sum to zero every item gets an empty rectangle at the
/// canvas origin.
#[derive(Debug, Clone, Copy, Default)]
pub struct SliceAndDice;

impl Partitioner for SliceAndDice {
    fn partition(&self, canvas: &Bounds, weights: &[f64]) -> Vec<Bounds> {
        let weights: &[f64] = &scaled_weights(weights);
        let sum: f64 = weights.iter().sum();
        if sum <= 0.0 {
            return vec![Bounds::empty_at(canvas.x, canvas.y); weights.len()];
        }

        match Axis::longer_of(canvas) {
            Axis::Horizontal => split_span(canvas.x, canvas.width, weights, sum)
                .into_iter()
                .map(|(x, w)| Bounds::new(x, canvas.y, w, canvas.height))
                .collect(),
            Axis::Vertical => split_span(canvas.y, canvas.height, weights, sum)
                .into_iter()
                .map(|(y, h)| Bounds::new(canvas.x, y, canvas.width, h))
                .collect(),
        }
    }
}
