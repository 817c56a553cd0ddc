use crate::config::PackerConfig;
use crate::error::{BlockPackerError, Result};
use crate::model::{Block, BlockInput, Bounds, Layout};
use crate::packer::{Partitioner, partitioner_for};
use tracing::{debug, instrument, trace};

/// Packs `items` into a `canvas_width` x `canvas_height` canvas with the default
/// configuration (slice-and-dice, own totals).
///
/// See [`pack_with`].
pub fn pack<T: Clone>(
    canvas_width: f64,
    canvas_height: f64,
    items: &[BlockInput<T>],
) -> Result<Vec<Block<T>>> {
    pack_with(canvas_width, canvas_height, items, &PackerConfig::default())
}

/// Packs `items` into a canvas anchored at the origin and returns one block per
/// item, in input order, each recursively packed with its sub-tree.
///
/// Notes:
/// - The whole tree is validated before any geometry is computed; an error
///   never comes with partial output.
/// - Empty `items` yields an empty result.
/// - Output depends only on the arguments; repeated calls are bit-identical.
#[instrument(skip_all, fields(width = canvas_width, height = canvas_height, items = items.len(), strategy = %cfg.strategy))]
pub fn pack_with<T: Clone>(
    canvas_width: f64,
    canvas_height: f64,
    items: &[BlockInput<T>],
    cfg: &PackerConfig,
) -> Result<Vec<Block<T>>> {
    validate_canvas(canvas_width, canvas_height)?;
    validate_items(items, &mut Vec::new())?;

    let canvas = Bounds::new(0.0, 0.0, canvas_width, canvas_height);
    let blocks = pack_level(partitioner_for(cfg.strategy), &canvas, items, cfg, 0);
    debug!(blocks = blocks.len(), "packed top level");
    Ok(blocks)
}

/// Like [`pack_with`], but keeps the canvas and strategy alongside the blocks
/// for stats, lookups and export.
pub fn pack_layout<T: Clone>(
    canvas_width: f64,
    canvas_height: f64,
    items: &[BlockInput<T>],
    cfg: &PackerConfig,
) -> Result<Layout<T>> {
    let blocks = pack_with(canvas_width, canvas_height, items, cfg)?;
    Ok(Layout {
        canvas: Bounds::new(0.0, 0.0, canvas_width, canvas_height),
        strategy: cfg.strategy,
        blocks,
    })
}

fn validate_canvas(width: f64, height: f64) -> Result<()> {
    let ok = |v: f64| v.is_finite() && v > 0.0;
    if ok(width) && ok(height) {
        Ok(())
    } else {
        Err(BlockPackerError::InvalidCanvas { width, height })
    }
}

fn validate_items<'a, T>(items: &'a [BlockInput<T>], path: &mut Vec<&'a str>) -> Result<()> {
    for item in items {
        path.push(&item.name);
        if !item.total.is_finite() || item.total < 0.0 {
            return Err(BlockPackerError::InvalidWeight {
                path: path.join("/"),
                total: item.total,
            });
        }
        if let Some(sub) = &item.sub_tree {
            validate_items(sub, path)?;
        }
        path.pop();
    }
    Ok(())
}

fn pack_level<T: Clone>(
    partitioner: &dyn Partitioner,
    canvas: &Bounds,
    items: &[BlockInput<T>],
    cfg: &PackerConfig,
    depth: usize,
) -> Vec<Block<T>> {
    if items.is_empty() {
        return Vec::new();
    }

    let weights: Vec<f64> = items
        .iter()
        .map(|item| item.effective_total(cfg.sum_subtree_totals))
        .collect();
    let rects = partitioner.partition(canvas, &weights);
    debug_assert_eq!(rects.len(), items.len());
    debug!(
        depth,
        count = items.len(),
        x = canvas.x,
        y = canvas.y,
        w = canvas.width,
        h = canvas.height,
        "packing level"
    );

    items
        .iter()
        .zip(weights)
        .zip(rects)
        .map(|((item, total), bounds)| {
            trace!(depth, name = %item.name, total, ?bounds, "placed block");
            // Children are packed before moving on to the next sibling.
            let children = match &item.sub_tree {
                Some(sub) => pack_level(partitioner, &bounds, sub, cfg, depth + 1),
                None => Vec::new(),
            };
            Block {
                name: item.name.clone(),
                total,
                color: item.color.clone(),
                has_breakdown: item.has_breakdown,
                payload: item.payload.clone(),
                bounds,
                children,
            }
        })
        .collect()
}
