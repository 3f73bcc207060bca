//! Error types for tile grid configuration and the begin/end protocol.

use thiserror::Error;

/// Errors produced by [`TileGrid`](crate::grid::TileGrid) and
/// [`FrameDriver`](crate::driver::FrameDriver) operations.
///
/// Configuration errors reject bad arguments, state errors reject calls made
/// outside the begin/end protocol, and capacity errors report a destination
/// buffer too small for the pending readback. All of them are synchronous
/// and leave the grid in the state it was in before the failing call, except
/// where noted on the operation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TileError {
    /// The tile size leaves no interior once the border is subtracted
    /// on both sides.
    #[error("tile size {width}x{height} leaves no interior with border {border}")]
    InvalidTileSize {
        /// Requested tile width including border.
        width: u32,
        /// Requested tile height including border.
        height: u32,
        /// Requested border in pixels.
        border: u32,
    },

    /// `begin_tile` was called before the image size was set.
    #[error("image size has not been set")]
    ImageSizeNotSet,

    /// `begin_tile` was called before a projection callback was registered.
    #[error("projection callback has not been set")]
    ProjectionCallbackNotSet,

    /// `end_tile` was called without a matching `begin_tile`.
    #[error("no tile is open; begin_tile has not been called")]
    TileNotOpen,

    /// `attach` was called while a frame loop is already attached.
    #[error("a frame loop is already attached")]
    AlreadyAttached,

    /// A driver operation that needs an attached frame loop was called
    /// while detached.
    #[error("no frame loop is attached")]
    NotAttached,

    /// A destination buffer cannot hold the pending readback.
    #[error("destination buffer too small: {required} bytes required, capacity {capacity}")]
    InsufficientCapacity {
        /// Bytes the readback would occupy, including any byte offset
        /// into the destination.
        required: usize,
        /// Capacity of the rejected destination buffer.
        capacity: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_tile_size_message_includes_dimensions() {
        let err = TileError::InvalidTileSize {
            width: 4,
            height: 4,
            border: 2,
        };
        let msg = err.to_string();
        assert!(msg.contains("4x4"));
        assert!(msg.contains("border 2"));
    }

    #[test]
    fn test_insufficient_capacity_message_includes_sizes() {
        let err = TileError::InsufficientCapacity {
            required: 1024,
            capacity: 256,
        };
        let msg = err.to_string();
        assert!(msg.contains("1024"));
        assert!(msg.contains("256"));
    }

    #[test]
    fn test_state_errors_are_comparable() {
        assert_eq!(TileError::TileNotOpen, TileError::TileNotOpen);
        assert_ne!(TileError::TileNotOpen, TileError::ImageSizeNotSet);
    }
}
