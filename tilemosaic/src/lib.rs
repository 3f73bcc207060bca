//! Tile-based rendering of images larger than the rendering surface.
//!
//! A renderer limited to, say, a 1024x1024 surface can still produce a
//! 16384x16384 image: decompose the image into a grid of tiles, render
//! each tile with a projection covering just that tile's window of the
//! image, read the pixels back, and stitch them into one destination
//! buffer at exact byte offsets. This crate owns that bookkeeping - grid
//! geometry with optional seam-hiding borders, the begin/end traversal
//! protocol, viewport and pixel-store save/restore, and offset-exact
//! readback - while consuming the host's rendering surface through a small
//! trait.
//!
//! # Architecture
//!
//! ```text
//!  ┌─────────────┐  attach/display   ┌────────────┐ begin/end ┌──────────┐
//!  │  FrameLoop   │ ◄──────────────── │ FrameDriver │ ────────► │ TileGrid │
//!  │ (caller's    │   interceptor     │  (driver)   │           │  (grid)  │
//!  │ render loop) │                   └────────────┘           └────┬─────┘
//!  └─────────────┘                                      readback    │
//!         ▲                                   ┌─────────────────────┤
//!         │ viewport/flush/read_pixels        ▼                     ▼
//!  ┌──────┴────────────┐              ┌─────────────┐       ┌─────────────┐
//!  │ dyn RenderContext │              │ PixelBuffer │       │ PixelBuffer │
//!  │    (context)      │              │  (per tile) │       │ (full image)│
//!  └───────────────────┘              └─────────────┘       └─────────────┘
//! ```
//!
//! [`TileGrid`] can be driven directly with its begin/end protocol, or
//! composed into an existing listener-based render loop with
//! [`FrameDriver`], which renders one tile per host frame.
//!
//! # Example
//!
//! ```ignore
//! use tilemosaic::{PixelBuffer, PixelFormat, TileGrid, TileView};
//! use tilemosaic::context::RenderContext;
//!
//! let mut grid = TileGrid::new();
//! grid.set_tile_size(256, 256, 0)?;
//! grid.set_image_size(4096, 4096);
//! grid.set_image_buffer(PixelBuffer::for_image(PixelFormat::Rgba8, 4096, 4096));
//! grid.set_projection_callback(|_ctx: &mut dyn RenderContext, view: &TileView| {
//!     // Reshape the projection to cover [view.x - border, ...) of the image.
//! });
//!
//! loop {
//!     grid.begin_tile(ctx)?;
//!     scene.draw(ctx);
//!     if !grid.end_tile(ctx)? {
//!         break;
//!     }
//! }
//! let image = grid.take_image_buffer();
//! ```

pub mod buffer;
pub mod context;
pub mod driver;
pub mod error;
pub mod grid;

pub use buffer::PixelBuffer;
pub use context::{PixelFormat, PixelStore, PixelStoreState, RenderContext, Viewport};
pub use driver::{FrameDriver, FrameListener, FrameLoop};
pub use error::TileError;
pub use grid::{ProjectionCallback, RowOrder, Size, TileGrid, TileLayout, TileView};
