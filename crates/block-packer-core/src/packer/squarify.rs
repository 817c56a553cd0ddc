use super::{Axis, Partitioner, scaled_weights, split_span};
use crate::model::Bounds;

/// Squarified treemap rows (Bruls, Huizing & van Wijk).
///
/// Positive weights are visited heaviest first (ties by input index). Each row
/// is grown while its worst aspect ratio does not get worse, then laid along
/// the shorter side of the remaining space; the last row takes whatever is
/// left. Zero weights get an empty rectangle at the canvas origin. Output is in
/// input order.
#[derive(Debug, Clone, Copy, Default)]
pub struct Squarify;

impl Partitioner for Squarify {
    fn partition(&self, canvas: &Bounds, weights: &[f64]) -> Vec<Bounds> {
        let weights: &[f64] = &scaled_weights(weights);
        let mut out = vec![Bounds::empty_at(canvas.x, canvas.y); weights.len()];

        let mut order: Vec<usize> = (0..weights.len()).filter(|&i| weights[i] > 0.0).collect();
        if order.is_empty() {
            return out;
        }
        order.sort_by(|&a, &b| weights[b].total_cmp(&weights[a]).then(a.cmp(&b)));

        let mut remaining: f64 = order.iter().map(|&i| weights[i]).sum();
        let scale = canvas.area() / remaining;
        let mut rest = *canvas;
        let mut start = 0;

        while start < order.len() {
            let end = start + row_len(&order[start..], weights, scale, rest.width.min(rest.height));
            let row = &order[start..end];
            let row_weights: Vec<f64> = row.iter().map(|&i| weights[i]).collect();
            let row_weight: f64 = row_weights.iter().sum();
            let last_row = end == order.len();

            match Axis::longer_of(&rest) {
                // Column against the left edge, items stacked top to bottom.
                Axis::Horizontal => {
                    let right = rest.right();
                    let thickness = if last_row {
                        rest.width
                    } else {
                        (rest.width * (row_weight / remaining)).min(rest.width)
                    };
                    let spans = split_span(rest.y, rest.height, &row_weights, row_weight);
                    for (&i, (y, h)) in row.iter().zip(spans) {
                        out[i] = Bounds::new(rest.x, y, thickness, h);
                    }
                    rest.x += thickness;
                    rest.width = (right - rest.x).max(0.0);
                }
                // Row against the top edge, items left to right.
                Axis::Vertical => {
                    let bottom = rest.bottom();
                    let thickness = if last_row {
                        rest.height
                    } else {
                        (rest.height * (row_weight / remaining)).min(rest.height)
                    };
                    let spans = split_span(rest.x, rest.width, &row_weights, row_weight);
                    for (&i, (x, w)) in row.iter().zip(spans) {
                        out[i] = Bounds::new(x, rest.y, w, thickness);
                    }
                    rest.y += thickness;
                    rest.height = (bottom - rest.y).max(0.0);
                }
            }

            remaining -= row_weight;
            start = end;
        }

        out
    }
}

/// How many of `order` (heaviest first) go into the next row laid along `side`.
fn row_len(order: &[usize], weights: &[f64], scale: f64, side: f64) -> usize {
    let first = weights[order[0]] * scale;
    let (mut sum, mut max, mut min) = (first, first, first);
    let mut best = worst_aspect_ratio(max, min, sum, side);
    let mut len = 1;

    while len < order.len() {
        let area = weights[order[len]] * scale;
        let score = worst_aspect_ratio(max.max(area), min.min(area), sum + area, side);
        if score > best {
            break;
        }
        best = score;
        sum += area;
        max = max.max(area);
        min = min.min(area);
        len += 1;
    }
    len
}

/// Worst aspect ratio (>= 1) of a row with total area `sum` laid along `side`.
fn worst_aspect_ratio(max: f64, min: f64, sum: f64, side: f64) -> f64 {
    if sum <= 0.0 || side <= 0.0 || min <= 0.0 {
        return f64::INFINITY;
    }
    let side_sq = side * side;
    let sum_sq = sum * sum;
    let a = (side_sq * max) / sum_sq;
    let b = sum_sq / (side_sq * min);
    a.max(b)
}
