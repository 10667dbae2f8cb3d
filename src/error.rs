use thiserror::Error;

/// Enum with all errors in this crate.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QuadTreeError {
    /// The plane width or height was not strictly positive.
    #[error("Invalid tree dimensions: width {width}, height {height}")]
    InvalidDimensions {
        /// Requested width, formatted for display.
        width: String,
        /// Requested height, formatted for display.
        height: String,
    },

    /// The requested depth would allocate too many nodes.
    #[error("Depth {depth} exceeds the maximum of {max}")]
    DepthTooLarge {
        /// Requested depth.
        depth: usize,
        /// Largest depth accepted.
        max: usize,
    },
}

pub type Result<T> = std::result::Result<T, QuadTreeError>;
