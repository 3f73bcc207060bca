//! Collaborator interfaces for the rendering surface.
//!
//! The tile protocol does not own a window or a GPU binding. It consumes a
//! small surface abstraction defined here and implemented by the caller:
//! viewport control, command flushing, pixel-store state, and rectangle
//! readback. Everything the protocol needs from the host renderer passes
//! through [`RenderContext`].
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐   viewport / flush / read_pixels   ┌───────────────────┐
//! │  TileGrid    │ ──────────────────────────────────► │ dyn RenderContext │
//! │ (grid module)│ ◄────────────────────────────────── │  (caller-owned)   │
//! └─────────────┘      saved Viewport / PixelStore    └───────────────────┘
//! ```
//!
//! [`PixelStore`] also carries the packed-row arithmetic
//! ([`PixelStore::byte_size`]) used to size readbacks and validate
//! destination capacity, so callers and test doubles can compute the exact
//! byte extents the grid will touch.
//!
//! # Example
//!
//! ```
//! use tilemosaic::context::{PixelFormat, PixelStore};
//!
//! // Stitching readback: rows strided at the image width, tightly packed.
//! let pack = PixelStore {
//!     row_length: 500,
//!     alignment: 1,
//!     ..PixelStore::default()
//! };
//! let bpp = PixelFormat::Rgba8.bytes_per_pixel();
//! assert_eq!(pack.row_stride(254, bpp), 2000);
//! assert_eq!(pack.byte_size(254, 2, bpp), 2000 + 254 * 4);
//! ```

mod format;
mod render;
mod store;

pub use format::PixelFormat;
pub use render::{RenderContext, Viewport};
pub use store::{PixelStore, PixelStoreState};
