//! Core library for laying out weighted, nested items as rectangles.
//!
//! - Strategies: slice-and-dice (default; contiguous strips in input order) and squarify
//! - Pipeline: `pack` / `pack_with` take a canvas and an item tree and return positioned blocks,
//!   recursing into each item's sub-tree within its own rectangle
//! - Data model is serde-serializable; JSON exporters are provided for tree and flat-hash shapes.
//!
//! Quick example:
//! ```
//! use block_packer_core::{BlockInput, pack};
//! # fn main() -> block_packer_core::Result<()> {
//! let items: Vec<BlockInput> = vec![
//!     BlockInput::new("parent", 24.0).sub_tree(vec![
//!         BlockInput::new("A", 8.0),
//!         BlockInput::new("B", 14.0),
//!         BlockInput::new("C", 2.0),
//!     ]),
//!     BlockInput::new("parent2", 36.0).breakdown(true),
//! ];
//! let blocks = pack(10.0, 6.0, &items)?;
//! assert_eq!(blocks[0].bounds.width, 4.0);
//! assert_eq!(blocks[0].children.len(), 3);
//! assert!(blocks[1].children.is_empty());
//! # Ok(()) }
//! ```

pub mod config;
pub mod error;
pub mod export;
pub mod model;
pub mod packer;
pub mod pipeline;

pub use config::*;
pub use error::*;
pub use export::*;
pub use model::*;
pub use packer::*;
pub use pipeline::*;

/// Convenience prelude for common types and functions.
/// Importing `block_packer_core::prelude::*` brings the primary APIs into scope.
pub mod prelude {
    pub use crate::config::{LayoutStrategy, PackerConfig, PackerConfigBuilder};
    pub use crate::error::BlockPackerError;
    pub use crate::model::{Block, BlockInput, Bounds, Layout, LayoutStats, find_path, walk_blocks};
    pub use crate::packer::{Partitioner, SliceAndDice, Squarify};
    pub use crate::{pack, pack_layout, pack_with, to_json_hash, to_json_tree};
}
