//! Tile grid geometry and the begin/end traversal protocol.
//!
//! [`TileGrid`] decomposes an image larger than the rendering surface into
//! a grid of bordered tiles and walks them one at a time. The pure
//! geometry lives in [`TileLayout`]; the grid adds the traversal cursor,
//! the viewport and pixel-store bracketing, and the readback into
//! caller-owned destination buffers.
//!
//! # Architecture
//!
//! ```text
//!        image (width x height)                 one tile
//!  ┌──────┬──────┬──────┬───┐           ┌────────────────────┐
//!  │ r2c0 │ r2c1 │ r2c2 │r2c3           │  border (rendered, │
//!  ├──────┼──────┼──────┼───┤           │   not read back)   │
//!  │ r1c0 │ r1c1 │ r1c2 │r1c3           │  ┌──────────────┐  │
//!  ├──────┼──────┼──────┼───┤           │  │   interior   │  │
//!  │ r0c0 │ r0c1 │ r0c2 │r0c3           │  │  (stitched)  │  │
//!  └──────┴──────┴──────┴───┘           │  └──────────────┘  │
//!   rows x columns, ceil division       └────────────────────┘
//! ```
//!
//! Each cycle: for every tile, [`TileGrid::begin_tile`] sets the viewport
//! to the tile's extent and lets the [`ProjectionCallback`] reshape the
//! projection; the caller renders; [`TileGrid::end_tile`] reads the
//! interior back and advances. The last tile restores the caller's
//! viewport.

mod layout;
mod protocol;
mod view;

pub use layout::{RowOrder, Size, TileLayout};
pub use protocol::TileGrid;
pub use view::{ProjectionCallback, TileView};
