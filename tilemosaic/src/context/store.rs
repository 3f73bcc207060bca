//! Pixel-store state and packed row arithmetic.
//!
//! Readback writes rows into client memory governed by the pack parameters:
//! an optional row length overriding the rectangle width, a row alignment,
//! and skip offsets. The grid saves the caller's state, resets it to the
//! defaults, reconfigures the pack direction for stitching, and restores the
//! caller's state when the readback completes or fails.

/// Pixel-store parameters for one transfer direction.
///
/// Field meanings follow the usual client-memory conventions: `row_length`
/// of zero means rows are as wide as the transferred rectangle, `alignment`
/// rounds each row start up to a byte multiple, and the skip values offset
/// the first pixel written. The defaults are the conventional GL defaults
/// (row length 0, alignment 4, no skip).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelStore {
    /// Row width in pixels used for stride computation; 0 means the
    /// rectangle width.
    pub row_length: u32,
    /// Byte alignment of each row start.
    pub alignment: u32,
    /// Pixels skipped at the start of each row.
    pub skip_pixels: u32,
    /// Rows skipped at the start of the transfer.
    pub skip_rows: u32,
}

impl Default for PixelStore {
    fn default() -> Self {
        Self {
            row_length: 0,
            alignment: 4,
            skip_pixels: 0,
            skip_rows: 0,
        }
    }
}

impl PixelStore {
    /// Returns the byte stride between consecutive rows for a rectangle of
    /// the given width under this pack state.
    pub fn row_stride(&self, width: u32, bytes_per_pixel: usize) -> usize {
        let row_pixels = if self.row_length > 0 {
            self.row_length
        } else {
            width
        };
        let raw = row_pixels as usize * bytes_per_pixel;
        let alignment = self.alignment.max(1) as usize;
        raw.div_ceil(alignment) * alignment
    }

    /// Returns the total bytes a `width` x `height` rectangle occupies in
    /// client memory under this pack state.
    ///
    /// The final row is not padded out to the stride, so the result is the
    /// exact extent touched by a readback, not a stride multiple.
    pub fn byte_size(&self, width: u32, height: u32, bytes_per_pixel: usize) -> usize {
        if width == 0 || height == 0 {
            return 0;
        }
        let stride = self.row_stride(width, bytes_per_pixel);
        stride * (height as usize - 1) + width as usize * bytes_per_pixel
    }
}

/// Complete pixel-store state: pack (readback) and unpack (upload)
/// directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PixelStoreState {
    /// Parameters governing reads from the framebuffer into client memory.
    pub pack: PixelStore,
    /// Parameters governing writes from client memory.
    pub unpack: PixelStore,
}
