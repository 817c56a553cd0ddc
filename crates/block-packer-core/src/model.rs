use crate::config::LayoutStrategy;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in canvas units. `x,y` is top-left; `width,height` are sizes.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
    /// Zero-sized rectangle anchored at `(x, y)`.
    pub fn empty_at(x: f64, y: f64) -> Self {
        Self::new(x, y, 0.0, 0.0)
    }
    pub fn area(&self) -> f64 {
        self.width * self.height
    }
    /// Far edge on the x axis (`x + width`).
    pub fn right(&self) -> f64 {
        self.x + self.width
    }
    /// Far edge on the y axis (`y + height`).
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
    /// Returns true if `r` lies inside `self`, allowing each edge to stray by `tolerance`.
    pub fn contains(&self, r: &Bounds, tolerance: f64) -> bool {
        r.x >= self.x - tolerance
            && r.y >= self.y - tolerance
            && r.right() <= self.right() + tolerance
            && r.bottom() <= self.bottom() + tolerance
    }
    /// Returns true if the intersection of `self` and `r` is thicker than
    /// `tolerance` on both axes.
    pub fn overlaps(&self, r: &Bounds, tolerance: f64) -> bool {
        let w = self.right().min(r.right()) - self.x.max(r.x);
        let h = self.bottom().min(r.bottom()) - self.y.max(r.y);
        w > tolerance && h > tolerance
    }
}

/// A caller-supplied item to lay out.
///
/// `payload` is carried through to the output untouched; the packer never
/// inspects it (nor `color`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BlockInput<T = ()> {
    /// Identifier, unique among siblings.
    pub name: String,
    /// Non-negative weight driving the allocated area.
    pub total: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Detail exists but has not been materialized as `sub_tree` yet.
    /// Such items are packed as leaves.
    #[serde(default)]
    pub has_breakdown: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_tree: Option<Vec<BlockInput<T>>>,
    #[serde(default)]
    pub payload: T,
}

impl<T: Default> BlockInput<T> {
    pub fn new(name: impl Into<String>, total: f64) -> Self {
        Self::with_payload(name, total, T::default())
    }
}

impl<T> BlockInput<T> {
    pub fn with_payload(name: impl Into<String>, total: f64, payload: T) -> Self {
        Self {
            name: name.into(),
            total,
            color: None,
            has_breakdown: false,
            sub_tree: None,
            payload,
        }
    }
    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }
    pub fn breakdown(mut self, v: bool) -> Self {
        self.has_breakdown = v;
        self
    }
    pub fn sub_tree(mut self, items: Vec<BlockInput<T>>) -> Self {
        self.sub_tree = Some(items);
        self
    }

    /// Weight of this item: its own `total`, or the recursive sum of its
    /// leaves when `from_sub_tree` is set and it has a non-empty sub-tree.
    pub fn effective_total(&self, from_sub_tree: bool) -> f64 {
        match &self.sub_tree {
            Some(items) if from_sub_tree && !items.is_empty() => {
                items.iter().map(|i| i.effective_total(true)).sum()
            }
            _ => self.total,
        }
    }
}

/// A packed item: the input fields plus computed geometry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Block<T = ()> {
    pub name: String,
    /// Weight the block was laid out with.
    pub total: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default)]
    pub has_breakdown: bool,
    #[serde(default)]
    pub payload: T,
    pub bounds: Bounds,
    /// Packed sub-tree, in input order. Empty for leaves.
    #[serde(default)]
    pub children: Vec<Block<T>>,
}

impl<T> Block<T> {
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Number of levels in this block's subtree (1 for a leaf).
    pub fn levels(&self) -> usize {
        1 + self.children.iter().map(Block::levels).max().unwrap_or(0)
    }

    /// A breakdown the caller still has to fetch.
    pub fn is_pending_breakdown(&self) -> bool {
        self.has_breakdown && self.children.is_empty()
    }

    /// Pre-order walk over this block and its descendants, with depth (0 = self).
    pub fn walk(&self) -> Walk<'_, T> {
        Walk {
            stack: vec![(0, self)],
        }
    }
}

/// Pre-order iterator over a block forest. See [`walk_blocks`].
pub struct Walk<'a, T> {
    stack: Vec<(usize, &'a Block<T>)>,
}

impl<'a, T> Iterator for Walk<'a, T> {
    type Item = (usize, &'a Block<T>);

    fn next(&mut self) -> Option<Self::Item> {
        let (depth, block) = self.stack.pop()?;
        self.stack
            .extend(block.children.iter().rev().map(|c| (depth + 1, c)));
        Some((depth, block))
    }
}

/// Pre-order walk over sibling blocks and all their descendants (top level = depth 0).
pub fn walk_blocks<T>(blocks: &[Block<T>]) -> Walk<'_, T> {
    Walk {
        stack: blocks.iter().rev().map(|b| (0, b)).collect(),
    }
}

/// Follows `path` one sibling name per level and returns the block it reaches.
///
/// Names are expected to be unique among siblings; if they are not, the first
/// match wins.
pub fn find_path<'a, T, S: AsRef<str>>(blocks: &'a [Block<T>], path: &[S]) -> Option<&'a Block<T>> {
    let (first, rest) = path.split_first()?;
    let block = blocks.iter().find(|b| b.name == first.as_ref())?;
    if rest.is_empty() {
        Some(block)
    } else {
        find_path(&block.children, rest)
    }
}

/// A packed block tree together with the canvas and strategy that produced it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(bound(deserialize = "T: Deserialize<'de> + Default"))]
pub struct Layout<T = ()> {
    pub canvas: Bounds,
    pub strategy: LayoutStrategy,
    pub blocks: Vec<Block<T>>,
}

/// Summary numbers about a packed tree.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct LayoutStats {
    /// Blocks at every depth.
    pub num_blocks: usize,
    /// Blocks without children.
    pub num_leaves: usize,
    /// Leaves flagged `has_breakdown` whose detail is not materialized.
    pub pending_breakdowns: usize,
    /// Number of levels in the tree (0 when empty).
    pub max_depth: usize,
    pub canvas_area: f64,
    /// Sum of top-level block areas.
    pub covered_area: f64,
    /// covered_area / canvas_area (0.0 to 1.0; 0.0 when nothing has weight).
    pub coverage: f64,
}

impl<T> Layout<T> {
    pub fn stats(&self) -> LayoutStats {
        let mut num_blocks = 0;
        let mut num_leaves = 0;
        let mut pending_breakdowns = 0;
        let mut max_depth = 0;

        for (depth, block) in walk_blocks(&self.blocks) {
            num_blocks += 1;
            max_depth = max_depth.max(depth + 1);
            if block.is_leaf() {
                num_leaves += 1;
            }
            if block.is_pending_breakdown() {
                pending_breakdowns += 1;
            }
        }

        let canvas_area = self.canvas.area();
        let covered_area: f64 = self.blocks.iter().map(|b| b.bounds.area()).sum();
        let coverage = if canvas_area > 0.0 {
            (covered_area / canvas_area).clamp(0.0, 1.0)
        } else {
            0.0
        };

        LayoutStats {
            num_blocks,
            num_leaves,
            pending_breakdowns,
            max_depth,
            canvas_area,
            covered_area,
            coverage,
        }
    }

    /// See [`find_path`].
    pub fn find<S: AsRef<str>>(&self, path: &[S]) -> Option<&Block<T>> {
        find_path(&self.blocks, path)
    }
}

impl LayoutStats {
    /// Returns a human-readable summary of the statistics.
    pub fn summary(&self) -> String {
        format!(
            "Blocks: {}, Leaves: {}, Pending breakdowns: {}, Depth: {}, Coverage: {:.2}% of {:.2}",
            self.num_blocks,
            self.num_leaves,
            self.pending_breakdowns,
            self.max_depth,
            self.coverage * 100.0,
            self.canvas_area,
        )
    }
}
