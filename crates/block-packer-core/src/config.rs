use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How a single canvas is split among siblings.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LayoutStrategy {
    /// Parallel strips along the longer side, contiguous in input order.
    #[default]
    SliceAndDice,
    /// Squarified rows (heaviest first) that keep aspect ratios close to 1.
    Squarify,
}

impl FromStr for LayoutStrategy {
    type Err = ();
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "slice" | "slice_and_dice" | "slice-and-dice" | "sad" => Ok(Self::SliceAndDice),
            "squarify" | "squarified" => Ok(Self::Squarify),
            _ => Err(()),
        }
    }
}

impl fmt::Display for LayoutStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::SliceAndDice => "slice_and_dice",
            Self::Squarify => "squarify",
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PackerConfig {
    #[serde(default)]
    pub strategy: LayoutStrategy,
    /// Weight items that carry a non-empty sub-tree by the recursive sum of
    /// their leaves instead of their own `total`.
    #[serde(default)]
    pub sum_subtree_totals: bool,
}

/// Builder for `PackerConfig` for ergonomic construction.
#[derive(Debug, Default, Clone)]
pub struct PackerConfigBuilder {
    cfg: PackerConfig,
}

impl PackerConfigBuilder {
    pub fn new() -> Self {
        Self {
            cfg: PackerConfig::default(),
        }
    }
    pub fn strategy(mut self, v: LayoutStrategy) -> Self {
        self.cfg.strategy = v;
        self
    }
    pub fn sum_subtree_totals(mut self, v: bool) -> Self {
        self.cfg.sum_subtree_totals = v;
        self
    }
    pub fn build(self) -> PackerConfig {
        self.cfg
    }
}

impl PackerConfig {
    /// Create a fluent builder for `PackerConfig`.
    pub fn builder() -> PackerConfigBuilder {
        PackerConfigBuilder::new()
    }
}
