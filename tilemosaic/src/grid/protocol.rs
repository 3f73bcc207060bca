//! The tile traversal state machine.

use crate::buffer::PixelBuffer;
use crate::context::{PixelStoreState, RenderContext, Viewport};
use crate::error::TileError;

use super::layout::{RowOrder, Size, TileLayout};
use super::view::{ProjectionCallback, TileView};

/// Drives tile-by-tile rendering of an image larger than the surface.
///
/// The grid decomposes the target image into rows x columns tiles of a
/// fixed size (minus an optional border excluded from readback), then walks
/// them with a begin/end protocol: [`begin_tile`](TileGrid::begin_tile)
/// sets the viewport to the tile's extent and asks the registered
/// [`ProjectionCallback`] to reshape the projection, the caller renders the
/// scene, and [`end_tile`](TileGrid::end_tile) reads the tile's interior
/// back into the registered destination buffers and advances. After the
/// last tile the saved viewport is restored and the grid reports finished;
/// beginning again starts a fresh cycle.
///
/// Destination buffers are caller-owned and never resized here: a readback
/// that does not fit fails with
/// [`InsufficientCapacity`](TileError::InsufficientCapacity), leaving the
/// tile open so the caller can swap in a larger buffer and end it again.
///
/// # Example
///
/// ```ignore
/// use tilemosaic::{PixelBuffer, PixelFormat, TileGrid, TileView};
/// use tilemosaic::context::RenderContext;
///
/// let mut grid = TileGrid::new();
/// grid.set_tile_size(256, 256, 0)?;
/// grid.set_image_size(4096, 4096);
/// grid.set_image_buffer(PixelBuffer::for_image(PixelFormat::Rgba8, 4096, 4096));
/// grid.set_projection_callback(|_ctx: &mut dyn RenderContext, view: &TileView| {
///     // Reshape the projection to cover this tile's window of the image.
/// });
///
/// loop {
///     grid.begin_tile(ctx)?;
///     scene.draw(ctx);
///     if !grid.end_tile(ctx)? {
///         break;
///     }
/// }
/// let image = grid.take_image_buffer();
/// ```
pub struct TileGrid {
    layout: TileLayout,
    row_order: RowOrder,
    /// Linear cursor; `None` is the not-started/finished sentinel.
    current_tile: Option<u32>,
    current_row: u32,
    current_column: u32,
    current_tile_size: Size,
    tile_open: bool,
    saved_viewport: Viewport,
    tile_buffer: Option<PixelBuffer>,
    image_buffer: Option<PixelBuffer>,
    callback: Option<Box<dyn ProjectionCallback>>,
}

impl TileGrid {
    /// Creates a grid with the default 256x256 tile, no border, and no
    /// image size.
    ///
    /// The grid reports finished until an image size is set.
    pub fn new() -> Self {
        Self {
            layout: TileLayout::new(),
            row_order: RowOrder::default(),
            current_tile: None,
            current_row: 0,
            current_column: 0,
            current_tile_size: Size::new(0, 0),
            tile_open: false,
            saved_viewport: Viewport::new(0, 0, 0, 0),
            tile_buffer: None,
            image_buffer: None,
            callback: None,
        }
    }

    // ===================
    // Configuration
    // ===================

    /// Sets the tile size including border and resets the traversal,
    /// closing any open tile.
    ///
    /// # Arguments
    ///
    /// * `width`, `height` - tile extent in pixels, border included
    /// * `border` - pixels on each side rendered but excluded from readback
    ///
    /// # Errors
    ///
    /// Returns [`TileError::InvalidTileSize`] if twice the border reaches
    /// either dimension; the previous geometry is kept.
    pub fn set_tile_size(&mut self, width: u32, height: u32, border: u32) -> Result<(), TileError> {
        self.layout.set_tile_size(width, height, border)?;
        self.setup();
        Ok(())
    }

    /// Sets the target image size and resets the traversal, closing any
    /// open tile.
    pub fn set_image_size(&mut self, width: u32, height: u32) {
        self.layout.set_image_size(width, height);
        self.setup();
    }

    /// Sets the row traversal order.
    ///
    /// Takes effect at the next [`begin_tile`](TileGrid::begin_tile); the
    /// grid shape is unaffected.
    pub fn set_row_order(&mut self, order: RowOrder) {
        self.row_order = order;
    }

    /// Registers the projection callback invoked at each tile begin.
    pub fn set_projection_callback(&mut self, callback: impl ProjectionCallback + 'static) {
        self.callback = Some(Box::new(callback));
    }

    /// Removes the projection callback, if any.
    pub fn clear_projection_callback(&mut self) {
        self.callback = None;
    }

    /// Registers a destination receiving each tile's interior pixels.
    pub fn set_tile_buffer(&mut self, buffer: PixelBuffer) {
        self.tile_buffer = Some(buffer);
    }

    /// Returns the registered tile destination, if any.
    pub fn tile_buffer(&self) -> Option<&PixelBuffer> {
        self.tile_buffer.as_ref()
    }

    /// Removes and returns the tile destination.
    pub fn take_tile_buffer(&mut self) -> Option<PixelBuffer> {
        self.tile_buffer.take()
    }

    /// Registers a destination assembling the full image across the cycle.
    pub fn set_image_buffer(&mut self, buffer: PixelBuffer) {
        self.image_buffer = Some(buffer);
    }

    /// Returns the registered image destination, if any.
    pub fn image_buffer(&self) -> Option<&PixelBuffer> {
        self.image_buffer.as_ref()
    }

    /// Removes and returns the image destination.
    pub fn take_image_buffer(&mut self) -> Option<PixelBuffer> {
        self.image_buffer.take()
    }

    // ===================
    // Accessors
    // ===================

    /// Returns the derived grid geometry.
    pub fn layout(&self) -> &TileLayout {
        &self.layout
    }

    /// Returns the tile size including border.
    pub fn tile_size(&self) -> Size {
        self.layout.tile_size()
    }

    /// Returns the tile interior size, tile minus twice the border.
    pub fn interior_size(&self) -> Size {
        self.layout.interior_size()
    }

    /// Returns the border width in pixels.
    pub fn border(&self) -> u32 {
        self.layout.border()
    }

    /// Returns the target image size.
    pub fn image_size(&self) -> Size {
        self.layout.image_size()
    }

    /// Returns the number of tile rows.
    pub fn rows(&self) -> u32 {
        self.layout.rows()
    }

    /// Returns the number of tile columns.
    pub fn columns(&self) -> u32 {
        self.layout.columns()
    }

    /// Returns the number of tiles in one cycle.
    pub fn tile_count(&self) -> u64 {
        self.layout.tile_count()
    }

    /// Returns the row traversal order.
    pub fn row_order(&self) -> RowOrder {
        self.row_order
    }

    /// Returns the cursor position, `None` when not started or finished.
    pub fn current_tile_index(&self) -> Option<u32> {
        self.current_tile
    }

    /// Returns the current tile's row, `None` while the cursor is idle.
    pub fn current_row(&self) -> Option<u32> {
        self.current_tile.map(|_| self.current_row)
    }

    /// Returns the current tile's column, `None` while the cursor is idle.
    pub fn current_column(&self) -> Option<u32> {
        self.current_tile.map(|_| self.current_column)
    }

    /// Returns the bordered extent of the tile most recently begun, 0x0
    /// before the first tile of a cycle.
    pub fn current_tile_size(&self) -> Size {
        self.current_tile_size
    }

    /// Returns true when no cycle is in progress.
    pub fn is_finished(&self) -> bool {
        self.current_tile.is_none()
    }

    /// Returns true between a successful begin and the matching end.
    pub fn is_tile_open(&self) -> bool {
        self.tile_open
    }

    // ===================
    // Tile Protocol
    // ===================

    /// Begins the current tile: derives its geometry, sets the viewport to
    /// the tile extent, and invokes the projection callback.
    ///
    /// The first begin of a cycle re-derives the grid and captures the
    /// caller's viewport for restoration after the last tile. Beginning
    /// again without an intervening [`end_tile`](TileGrid::end_tile)
    /// recomputes the same tile.
    ///
    /// # Errors
    ///
    /// * [`TileError::ImageSizeNotSet`] - either image dimension is zero
    /// * [`TileError::ProjectionCallbackNotSet`] - no callback registered
    pub fn begin_tile(&mut self, ctx: &mut dyn RenderContext) -> Result<(), TileError> {
        if self.layout.image_size().is_empty() {
            return Err(TileError::ImageSizeNotSet);
        }
        if self.callback.is_none() {
            return Err(TileError::ProjectionCallbackNotSet);
        }

        // First tile of a cycle: re-derive the grid and save the caller's
        // viewport until the cycle completes.
        let index = match self.current_tile {
            None | Some(0) => {
                self.setup();
                self.saved_viewport = ctx.viewport();
                0
            }
            Some(index) => index,
        };

        let (row, column) = self.layout.position_of(index, self.row_order);
        let extent = self.layout.bordered_extent(row, column);
        let (x, y) = self.layout.origin_of(row, column);
        let image = self.layout.image_size();

        self.current_row = row;
        self.current_column = column;
        self.current_tile_size = extent;

        tracing::debug!(
            tile = index,
            column = column,
            row = row,
            x = x,
            y = y,
            width = extent.width,
            height = extent.height,
            image = %image,
            "Tile begin"
        );

        ctx.set_viewport(Viewport::new(0, 0, extent.width, extent.height));

        let view = TileView {
            index,
            column,
            row,
            x,
            y,
            width: extent.width,
            height: extent.height,
            image_width: image.width,
            image_height: image.height,
        };
        if let Some(callback) = self.callback.as_mut() {
            callback.reshape_projection(ctx, &view);
        }

        self.tile_open = true;
        Ok(())
    }

    /// Ends the current tile: reads its interior into the registered
    /// destinations and advances the cursor.
    ///
    /// The caller's pixel-store state is saved, reset to the defaults for
    /// the readbacks, and restored on success and failure alike. After the
    /// last tile the saved viewport is restored and the cursor returns to
    /// the sentinel.
    ///
    /// # Returns
    ///
    /// `Ok(true)` while tiles remain, `Ok(false)` once the image is
    /// complete.
    ///
    /// # Errors
    ///
    /// * [`TileError::TileNotOpen`] - no matching begin
    /// * [`TileError::InsufficientCapacity`] - a destination cannot hold
    ///   the readback; the tile stays open and the cursor does not move,
    ///   so the caller can swap buffers and end the tile again
    pub fn end_tile(&mut self, ctx: &mut dyn RenderContext) -> Result<bool, TileError> {
        if !self.tile_open {
            return Err(TileError::TileNotOpen);
        }

        // Make sure rendering commands are finished before reading back.
        ctx.flush();

        let saved_store = ctx.pixel_store();
        ctx.set_pixel_store(PixelStoreState::default());

        let result = self.read_destinations(ctx);
        // Restored on success and failure alike.
        ctx.set_pixel_store(saved_store);
        result?;

        self.tile_open = false;
        Ok(self.advance(ctx))
    }

    /// Re-derives the grid, rewinds the cursor to tile 0, and closes any
    /// open tile. The stale per-tile state is unusable once the geometry
    /// changes, so an interrupted begin/end pair is abandoned here.
    fn setup(&mut self) {
        self.layout.derive();
        self.current_tile = Some(0);
        self.current_row = 0;
        self.current_column = 0;
        self.current_tile_size = Size::new(0, 0);
        self.tile_open = false;
    }

    /// Reads the open tile's interior into the registered destinations
    /// under the default pixel-store state.
    fn read_destinations(&mut self, ctx: &mut dyn RenderContext) -> Result<(), TileError> {
        let border = self.layout.border();
        let interior = self.layout.interior_size();

        if let Some(buffer) = self.tile_buffer.as_mut() {
            let format = buffer.format();
            let required =
                ctx.pixel_store()
                    .pack
                    .byte_size(interior.width, interior.height, format.bytes_per_pixel());
            buffer.clear();
            if !buffer.has_capacity(required) {
                return Err(TileError::InsufficientCapacity {
                    required,
                    capacity: buffer.capacity(),
                });
            }
            let dest = &mut buffer.as_mut_slice()[..required];
            ctx.read_pixels(border, border, interior.width, interior.height, format, dest);
            ctx.flush();
            buffer.set_position(required);
            buffer.flip();
            tracing::trace!(bytes = required, "Tile destination readback");
        }

        if let Some(buffer) = self.image_buffer.as_mut() {
            let format = buffer.format();
            let bpp = format.bytes_per_pixel();
            let image = self.layout.image_size();

            // Pack rows at the image stride so the readback lands directly
            // in the final raster.
            ctx.set_pack_row_length(image.width);
            ctx.set_pack_alignment(1);

            // Actual interior extent; shrinks on the last row and column.
            let source_width = self.current_tile_size.width - 2 * border;
            let source_height = self.current_tile_size.height - 2 * border;
            let required = ctx
                .pixel_store()
                .pack
                .byte_size(source_width, source_height, bpp);

            // The skip offsets use the nominal interior size even though
            // the read rectangle uses the actual extent: edge tiles still
            // land on full-size grid positions.
            let skip_pixels = self.current_column as usize * interior.width as usize;
            let skip_rows = self.current_row as usize * interior.height as usize;
            let offset = (skip_pixels + skip_rows * image.width as usize) * bpp;
            let end = offset + required;

            buffer.clear();
            if !buffer.has_capacity(end) {
                return Err(TileError::InsufficientCapacity {
                    required: end,
                    capacity: buffer.capacity(),
                });
            }
            buffer.set_position(offset);
            let dest = &mut buffer.as_mut_slice()[offset..end];
            ctx.read_pixels(border, border, source_width, source_height, format, dest);
            ctx.flush();
            buffer.set_position(end);
            buffer.flip();
            tracing::trace!(offset = offset, bytes = required, "Image destination readback");
        }

        Ok(())
    }

    /// Advances the cursor, restoring the saved viewport after the last
    /// tile. Returns true while tiles remain.
    fn advance(&mut self, ctx: &mut dyn RenderContext) -> bool {
        match self.current_tile {
            Some(index) if (index as u64 + 1) < self.layout.tile_count() => {
                self.current_tile = Some(index + 1);
                true
            }
            _ => {
                ctx.set_viewport(self.saved_viewport);
                self.current_tile = None;
                tracing::debug!(
                    viewport = %self.saved_viewport,
                    "Tile pass complete, viewport restored"
                );
                false
            }
        }
    }
}

impl Default for TileGrid {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TileGrid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TileGrid")
            .field("layout", &self.layout)
            .field("row_order", &self.row_order)
            .field("current_tile", &self.current_tile)
            .field("tile_open", &self.tile_open)
            .finish_non_exhaustive()
    }
}
