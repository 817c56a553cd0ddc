use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum BlockPackerError {
    /// A `total` is negative or not a finite number. `path` is the `/`-joined
    /// chain of names leading to the offending item.
    #[error("Invalid weight {total} for block '{path}': totals must be finite and non-negative")]
    InvalidWeight { path: String, total: f64 },
    #[error("Invalid canvas {width}x{height}: dimensions must be finite positive numbers")]
    InvalidCanvas { width: f64, height: f64 },
}

pub type Result<T> = std::result::Result<T, BlockPackerError>;
