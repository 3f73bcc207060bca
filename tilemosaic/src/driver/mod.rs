//! Frame-loop interception for tiled rendering.
//!
//! Rendering loops typically own their listeners and call them once per
//! frame. [`FrameDriver`] slots a [`TileGrid`](crate::grid::TileGrid) into
//! such a loop without the listeners noticing: it moves them into reserve,
//! installs an interceptor in their place, and replays every notification
//! to them with each display bracketed by begin/end tile calls. One host
//! frame renders one tile.
//!
//! # Architecture
//!
//! ```text
//!  FrameLoop (caller's render loop)
//!  │ display()
//!  ▼
//!  TiledListener ──── begin_tile ──► TileGrid
//!  │   reserved listeners' display      │
//!  │◄─── end_tile (readback, advance) ──┘
//!  ▼
//!  FrameDriver::display → Ok(more tiles?)
//! ```

mod frame_driver;
mod listener;

pub use frame_driver::FrameDriver;
pub use listener::{FrameListener, FrameLoop};
