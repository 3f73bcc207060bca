//! The rendering surface consumed by the tile protocol.

use super::format::PixelFormat;
use super::store::PixelStoreState;

/// A rectangular viewport in surface coordinates.
///
/// The origin may be negative, matching the underlying viewport convention;
/// extents are unsigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    /// Left edge in surface coordinates.
    pub x: i32,
    /// Bottom edge in surface coordinates.
    pub y: i32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Viewport {
    /// Creates a viewport from origin and extent.
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

impl std::fmt::Display for Viewport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}+{}+{}", self.width, self.height, self.x, self.y)
    }
}

/// Surface operations the tile protocol needs from its host renderer.
///
/// This is the complete consumed interface: viewport control, command
/// flushing, pixel-store state, and rectangle readback. The grid drives it
/// through `&mut dyn RenderContext`, so implementations must be
/// object-safe; they are not required to be `Send`, matching the
/// single-threaded protocol.
///
/// # Readback contract
///
/// [`read_pixels`](RenderContext::read_pixels) must honor the pack
/// parameters in effect at call time: consecutive rows of the rectangle are
/// written `pack.row_stride(width, bytes_per_pixel)` bytes apart (see
/// [`PixelStore::row_stride`](super::PixelStore::row_stride)), and the
/// destination slice is guaranteed by the caller to hold at least
/// `pack.byte_size(width, height, bytes_per_pixel)` bytes. The final row is
/// written unpadded.
pub trait RenderContext {
    /// Returns the current viewport.
    fn viewport(&self) -> Viewport;

    /// Replaces the current viewport.
    fn set_viewport(&mut self, viewport: Viewport);

    /// Flushes pending rendering commands so a subsequent readback
    /// observes them.
    fn flush(&mut self);

    /// Returns the current pixel-store state for both directions.
    fn pixel_store(&self) -> PixelStoreState;

    /// Replaces the pixel-store state for both directions.
    fn set_pixel_store(&mut self, state: PixelStoreState);

    /// Sets the pack row length in pixels; 0 means the rectangle width.
    fn set_pack_row_length(&mut self, row_length: u32);

    /// Sets the pack row alignment in bytes.
    fn set_pack_alignment(&mut self, alignment: u32);

    /// Reads the rectangle at (`x`, `y`) of `width` x `height` pixels from
    /// the surface into `dest` under the current pack state.
    fn read_pixels(
        &mut self,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        format: PixelFormat,
        dest: &mut [u8],
    );
}
