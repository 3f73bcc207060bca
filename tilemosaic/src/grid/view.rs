//! Per-tile geometry handed to the projection callback.

use crate::context::RenderContext;

/// Geometry of the tile about to be rendered.
///
/// Passed to the [`ProjectionCallback`] at the start of every tile so the
/// projection can be adjusted to render exactly this window of the full
/// image. `x`/`y` give the image-space origin of the tile's interior; with
/// a border, window pixel (border, border) corresponds to image pixel
/// (`x`, `y`), so a projection covering image region
/// `[x - border, x - border + width)` renders the tile seamlessly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileView {
    /// Linear index of the tile within the cycle.
    pub index: u32,
    /// Grid column, 0 at the left edge.
    pub column: u32,
    /// Grid row, 0 at the bottom edge.
    pub row: u32,
    /// Image-space x of the tile's interior origin.
    pub x: u32,
    /// Image-space y of the tile's interior origin.
    pub y: u32,
    /// Bordered tile width, the current viewport width.
    pub width: u32,
    /// Bordered tile height, the current viewport height.
    pub height: u32,
    /// Full image width.
    pub image_width: u32,
    /// Full image height.
    pub image_height: u32,
}

/// Adjusts the host's projection for one tile.
///
/// Invoked once per [`begin_tile`](super::TileGrid::begin_tile) after the
/// viewport has been set to the tile's bordered extent. Implemented for any
/// `FnMut(&mut dyn RenderContext, &TileView)` closure, so most callers
/// register a closure rather than a named type.
pub trait ProjectionCallback {
    /// Reshapes the projection so rendering covers the given tile's window
    /// of the image.
    fn reshape_projection(&mut self, ctx: &mut dyn RenderContext, view: &TileView);
}

impl<F> ProjectionCallback for F
where
    F: FnMut(&mut dyn RenderContext, &TileView),
{
    fn reshape_projection(&mut self, ctx: &mut dyn RenderContext, view: &TileView) {
        self(ctx, view)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{PixelFormat, PixelStoreState, Viewport};

    struct NullContext;

    impl RenderContext for NullContext {
        fn viewport(&self) -> Viewport {
            Viewport::new(0, 0, 0, 0)
        }
        fn set_viewport(&mut self, _viewport: Viewport) {}
        fn flush(&mut self) {}
        fn pixel_store(&self) -> PixelStoreState {
            PixelStoreState::default()
        }
        fn set_pixel_store(&mut self, _state: PixelStoreState) {}
        fn set_pack_row_length(&mut self, _row_length: u32) {}
        fn set_pack_alignment(&mut self, _alignment: u32) {}
        fn read_pixels(
            &mut self,
            _x: u32,
            _y: u32,
            _width: u32,
            _height: u32,
            _format: PixelFormat,
            _dest: &mut [u8],
        ) {
        }
    }

    #[test]
    fn test_closures_implement_projection_callback() {
        let mut seen = Vec::new();
        let mut callback = |_ctx: &mut dyn RenderContext, view: &TileView| {
            seen.push((view.index, view.x, view.y));
        };

        let view = TileView {
            index: 3,
            column: 1,
            row: 1,
            x: 32,
            y: 48,
            width: 34,
            height: 34,
            image_width: 100,
            image_height: 100,
        };
        callback.reshape_projection(&mut NullContext, &view);
        assert_eq!(seen, vec![(3, 32, 48)]);
    }
}
