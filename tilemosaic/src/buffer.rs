//! Caller-owned destination buffers for tile readback.

use crate::context::PixelFormat;

/// A pixel destination buffer with a position/limit cursor.
///
/// The grid never allocates or resizes one of these. Callers allocate a
/// buffer sized for the expected readback, hand it to the grid, and reclaim
/// it afterwards. The cursor follows the classic flip protocol:
/// [`clear`](PixelBuffer::clear) resets position and limit without touching
/// contents, writes advance the position, and [`flip`](PixelBuffer::flip)
/// marks the written extent so consumers can see exactly which bytes the
/// last readback produced.
///
/// # Example
///
/// ```
/// use tilemosaic::buffer::PixelBuffer;
/// use tilemosaic::context::PixelFormat;
///
/// let mut buffer = PixelBuffer::for_image(PixelFormat::Rgba8, 16, 16);
/// assert_eq!(buffer.capacity(), 16 * 16 * 4);
///
/// buffer.clear();
/// buffer.set_position(64);
/// buffer.flip();
/// assert_eq!(buffer.written().len(), 64);
/// ```
#[derive(Debug, Clone)]
pub struct PixelBuffer {
    format: PixelFormat,
    data: Vec<u8>,
    position: usize,
    limit: usize,
}

impl PixelBuffer {
    /// Allocates a zero-filled buffer with the given byte capacity.
    ///
    /// Position starts at 0 and the limit at the capacity.
    pub fn allocate(format: PixelFormat, capacity: usize) -> Self {
        Self {
            format,
            data: vec![0; capacity],
            position: 0,
            limit: capacity,
        }
    }

    /// Allocates a buffer sized for a tightly packed `width` x `height`
    /// image in `format`.
    ///
    /// This capacity is sufficient for the grid's image-destination
    /// readback, which packs rows at the image width with alignment 1.
    pub fn for_image(format: PixelFormat, width: u32, height: u32) -> Self {
        let capacity = width as usize * height as usize * format.bytes_per_pixel();
        Self::allocate(format, capacity)
    }

    /// Returns the pixel format readbacks into this buffer use.
    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// Returns the per-pixel byte count of the buffer's format.
    pub fn bytes_per_pixel(&self) -> usize {
        self.format.bytes_per_pixel()
    }

    /// Returns the total byte capacity.
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Returns the current cursor position.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Returns the current limit.
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Resets position to 0 and the limit to the capacity.
    ///
    /// Contents are not erased; this only rewinds the cursor for a new
    /// readback.
    pub fn clear(&mut self) {
        self.position = 0;
        self.limit = self.data.len();
    }

    /// Moves the cursor to `position`.
    ///
    /// # Panics
    ///
    /// Panics if `position` exceeds the current limit.
    pub fn set_position(&mut self, position: usize) {
        assert!(
            position <= self.limit,
            "position {} exceeds limit {}",
            position,
            self.limit
        );
        self.position = position;
    }

    /// Flips the buffer: the limit becomes the current position and the
    /// position rewinds to 0, marking the extent written so far.
    pub fn flip(&mut self) {
        self.limit = self.position;
        self.position = 0;
    }

    /// Returns whether the buffer can hold `required` bytes.
    pub fn has_capacity(&self, required: usize) -> bool {
        required <= self.data.len()
    }

    /// Returns the bytes between the position and the limit, the written
    /// extent after a [`flip`](PixelBuffer::flip).
    pub fn written(&self) -> &[u8] {
        &self.data[self.position..self.limit]
    }

    /// Returns the full backing storage.
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Returns the full backing storage mutably.
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocate_zero_filled_with_full_limit() {
        let buffer = PixelBuffer::allocate(PixelFormat::Rgba8, 64);
        assert_eq!(buffer.capacity(), 64);
        assert_eq!(buffer.position(), 0);
        assert_eq!(buffer.limit(), 64);
        assert!(buffer.as_slice().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_for_image_sizes_from_format() {
        let buffer = PixelBuffer::for_image(PixelFormat::Rgb8, 5, 4);
        assert_eq!(buffer.capacity(), 60);
        assert_eq!(buffer.bytes_per_pixel(), 3);
    }

    #[test]
    fn test_clear_rewinds_without_erasing() {
        let mut buffer = PixelBuffer::allocate(PixelFormat::Gray8, 8);
        buffer.as_mut_slice()[0] = 0xFF;
        buffer.set_position(4);
        buffer.flip();
        buffer.clear();
        assert_eq!(buffer.position(), 0);
        assert_eq!(buffer.limit(), 8);
        assert_eq!(buffer.as_slice()[0], 0xFF);
    }

    #[test]
    fn test_flip_marks_written_extent() {
        let mut buffer = PixelBuffer::allocate(PixelFormat::Rgba8, 32);
        buffer.set_position(12);
        buffer.flip();
        assert_eq!(buffer.position(), 0);
        assert_eq!(buffer.limit(), 12);
        assert_eq!(buffer.written().len(), 12);
    }

    #[test]
    fn test_written_respects_position_after_flip() {
        let mut buffer = PixelBuffer::allocate(PixelFormat::Rgba8, 16);
        for (i, byte) in buffer.as_mut_slice().iter_mut().enumerate() {
            *byte = i as u8;
        }
        buffer.set_position(8);
        buffer.flip();
        assert_eq!(buffer.written(), &[0, 1, 2, 3, 4, 5, 6, 7]);
    }

    #[test]
    fn test_has_capacity_boundary() {
        let buffer = PixelBuffer::allocate(PixelFormat::Rgba8, 64);
        assert!(buffer.has_capacity(64));
        assert!(!buffer.has_capacity(65));
    }

    #[test]
    #[should_panic(expected = "exceeds limit")]
    fn test_set_position_past_limit_panics() {
        let mut buffer = PixelBuffer::allocate(PixelFormat::Rgba8, 16);
        buffer.set_position(17);
    }
}
