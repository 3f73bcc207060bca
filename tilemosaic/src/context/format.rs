//! Pixel format descriptors for readback destinations.

/// Client-memory pixel formats supported for tile readback.
///
/// The format determines the per-pixel byte count used in all destination
/// offset and capacity arithmetic. Component ordering is as named; every
/// format stores 8 bits per component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    /// Single 8-bit channel.
    Gray8,
    /// Red, green, blue. Rows may need alignment padding since the pixel
    /// size is not a multiple of the common 4-byte alignment.
    Rgb8,
    /// Red, green, blue, alpha.
    Rgba8,
    /// Blue, green, red, alpha.
    Bgra8,
}

impl PixelFormat {
    /// Returns the number of bytes one pixel occupies in client memory.
    pub fn bytes_per_pixel(&self) -> usize {
        match self {
            PixelFormat::Gray8 => 1,
            PixelFormat::Rgb8 => 3,
            PixelFormat::Rgba8 | PixelFormat::Bgra8 => 4,
        }
    }

    /// Returns the number of color components in the format.
    pub fn component_count(&self) -> usize {
        match self {
            PixelFormat::Gray8 => 1,
            PixelFormat::Rgb8 => 3,
            PixelFormat::Rgba8 | PixelFormat::Bgra8 => 4,
        }
    }
}

impl std::fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PixelFormat::Gray8 => "Gray8",
            PixelFormat::Rgb8 => "Rgb8",
            PixelFormat::Rgba8 => "Rgba8",
            PixelFormat::Bgra8 => "Bgra8",
        };
        write!(f, "{}", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bytes_per_pixel() {
        assert_eq!(PixelFormat::Gray8.bytes_per_pixel(), 1);
        assert_eq!(PixelFormat::Rgb8.bytes_per_pixel(), 3);
        assert_eq!(PixelFormat::Rgba8.bytes_per_pixel(), 4);
        assert_eq!(PixelFormat::Bgra8.bytes_per_pixel(), 4);
    }

    #[test]
    fn test_component_count_matches_byte_size_for_8bit_formats() {
        for format in [
            PixelFormat::Gray8,
            PixelFormat::Rgb8,
            PixelFormat::Rgba8,
            PixelFormat::Bgra8,
        ] {
            assert_eq!(format.component_count(), format.bytes_per_pixel());
        }
    }

    #[test]
    fn test_display_names() {
        assert_eq!(PixelFormat::Rgba8.to_string(), "Rgba8");
        assert_eq!(PixelFormat::Gray8.to_string(), "Gray8");
    }
}
