use crate::model::{Block, Layout, walk_blocks};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

/// Layout-level metadata shared by the exporters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Meta {
    /// Schema version of the exported JSON; current: "1".
    pub schema_version: String,
    pub app: String,
    pub version: String,
    pub strategy: String,
    pub canvas: Value,
}

impl Meta {
    pub fn for_layout<T>(layout: &Layout<T>) -> Self {
        Self {
            schema_version: "1".into(),
            app: "block-packer".into(),
            version: env!("CARGO_PKG_VERSION").into(),
            strategy: layout.strategy.to_string(),
            canvas: json!({"width": layout.canvas.width, "height": layout.canvas.height}),
        }
    }
}

/// Serialize the nested block tree as `{ canvas, blocks, meta }`.
pub fn to_json_tree<T: Serialize>(layout: &Layout<T>) -> serde_json::Result<Value> {
    Ok(json!({
        "canvas": serde_json::to_value(layout.canvas)?,
        "blocks": serde_json::to_value(&layout.blocks)?,
        "meta": serde_json::to_value(Meta::for_layout(layout))?,
    }))
}

/// Flatten the tree into `{ blocks: { "parent/child": {...} }, meta }`, keyed by
/// `/`-joined name paths. Keys come out sorted, not in layout order.
///
/// Sibling names are expected to be unique. If two blocks share a path, the one
/// visited last (later in pre-order) replaces the earlier entry.
pub fn to_json_hash<T>(layout: &Layout<T>) -> serde_json::Result<Value> {
    let mut blocks = Map::new();
    let mut path: Vec<&str> = Vec::new();
    for (depth, block) in walk_blocks(&layout.blocks) {
        path.truncate(depth);
        path.push(&block.name);
        blocks.insert(path.join("/"), hash_entry(block, depth));
    }
    Ok(json!({
        "blocks": blocks,
        "meta": serde_json::to_value(Meta::for_layout(layout))?,
    }))
}

fn hash_entry<T>(block: &Block<T>, depth: usize) -> Value {
    let b = &block.bounds;
    json!({
        "bounds": {"x": b.x, "y": b.y, "width": b.width, "height": b.height},
        "total": block.total,
        "color": block.color,
        "depth": depth,
        "hasBreakdown": block.has_breakdown,
        "children": block.children.len(),
    })
}
