//! Grid geometry: sizes, traversal order, and per-tile arithmetic.

use crate::error::TileError;

/// A width/height pair in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Size {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Size {
    /// Creates a size from width and height.
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Returns true if either dimension is zero.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl std::fmt::Display for Size {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Order in which tile rows are traversed across a cycle.
///
/// Row index 0 is always the bottom row of the image; the order only
/// changes which spatial row the first tile lands on, never the grid
/// shape. An invalid order is unrepresentable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RowOrder {
    /// Tile 0 is in the top row; rows advance downward.
    TopToBottom,
    /// Tile 0 is in the bottom row; rows advance upward.
    #[default]
    BottomToTop,
}

impl std::fmt::Display for RowOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            RowOrder::TopToBottom => "top-to-bottom",
            RowOrder::BottomToTop => "bottom-to-top",
        };
        write!(f, "{}", name)
    }
}

/// Derived grid geometry for one image/tile configuration.
///
/// Holds the image size, the tile size including border, the derived
/// interior size (tile minus twice the border), and the derived row and
/// column counts. The per-tile queries are pure: they map a linear tile
/// index to its grid position, compute each tile's bordered extent with the
/// last row/column reconciled against the image edge, and give the tile's
/// interior origin in image space.
///
/// Obtained from [`TileGrid::layout`](super::TileGrid::layout); mutation
/// goes through the grid so the traversal cursor stays consistent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileLayout {
    image: Size,
    tile: Size,
    interior: Size,
    border: u32,
    rows: u32,
    columns: u32,
}

impl TileLayout {
    /// Default tile extent used until the caller configures one.
    pub const DEFAULT_TILE_SIZE: u32 = 256;

    pub(crate) fn new() -> Self {
        Self {
            image: Size::new(0, 0),
            tile: Size::new(Self::DEFAULT_TILE_SIZE, Self::DEFAULT_TILE_SIZE),
            interior: Size::new(Self::DEFAULT_TILE_SIZE, Self::DEFAULT_TILE_SIZE),
            border: 0,
            rows: 0,
            columns: 0,
        }
    }

    /// Sets the tile size including border and re-derives the grid.
    ///
    /// Fails if twice the border reaches either tile dimension, which
    /// would leave no interior to stitch.
    pub(crate) fn set_tile_size(
        &mut self,
        width: u32,
        height: u32,
        border: u32,
    ) -> Result<(), TileError> {
        // Widened arithmetic: doubling a pathological border must not wrap.
        let doubled = 2 * border as u64;
        if doubled >= width as u64 || doubled >= height as u64 {
            return Err(TileError::InvalidTileSize {
                width,
                height,
                border,
            });
        }
        self.tile = Size::new(width, height);
        self.border = border;
        self.interior = Size::new(width - 2 * border, height - 2 * border);
        self.derive();
        Ok(())
    }

    /// Sets the target image size and re-derives the grid.
    pub(crate) fn set_image_size(&mut self, width: u32, height: u32) {
        self.image = Size::new(width, height);
        self.derive();
    }

    /// Recomputes rows and columns from the image and interior sizes.
    ///
    /// Ceiling division: a partially covered final row or column still
    /// needs a full tile pass.
    pub(crate) fn derive(&mut self) {
        self.columns = self.image.width.div_ceil(self.interior.width);
        self.rows = self.image.height.div_ceil(self.interior.height);
    }

    /// Returns the target image size.
    pub fn image_size(&self) -> Size {
        self.image
    }

    /// Returns the tile size including border.
    pub fn tile_size(&self) -> Size {
        self.tile
    }

    /// Returns the interior size, the tile size minus twice the border.
    pub fn interior_size(&self) -> Size {
        self.interior
    }

    /// Returns the border width in pixels.
    pub fn border(&self) -> u32 {
        self.border
    }

    /// Returns the number of tile rows.
    pub fn rows(&self) -> u32 {
        self.rows
    }

    /// Returns the number of tile columns.
    pub fn columns(&self) -> u32 {
        self.columns
    }

    /// Returns the total number of tiles in one cycle.
    pub fn tile_count(&self) -> u64 {
        self.rows as u64 * self.columns as u64
    }

    /// Maps a linear tile index to its (row, column) grid position under
    /// the given traversal order.
    ///
    /// Row 0 is the bottom row regardless of order.
    ///
    /// # Panics
    ///
    /// Panics if the grid has no tiles. The grid is derived once a tile
    /// size and a non-empty image size are both set; until then
    /// [`tile_count`](TileLayout::tile_count) is 0 and there is no
    /// position to map.
    pub fn position_of(&self, index: u32, order: RowOrder) -> (u32, u32) {
        debug_assert!((index as u64) < self.tile_count());
        let column = index % self.columns;
        let row = match order {
            RowOrder::BottomToTop => index / self.columns,
            RowOrder::TopToBottom => self.rows - (index / self.columns) - 1,
        };
        debug_assert!(row < self.rows);
        debug_assert!(column < self.columns);
        (row, column)
    }

    /// Returns the bordered extent of the tile at (row, column).
    ///
    /// Interior tiles get the full tile size. The last row and column get
    /// the image remainder plus the border on both sides, so cumulative
    /// interior coverage meets the image edge exactly.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if (`row`, `column`) lies outside the
    /// derived grid.
    pub fn bordered_extent(&self, row: u32, column: u32) -> Size {
        debug_assert!(row < self.rows && column < self.columns);
        let width = if column < self.columns - 1 {
            self.tile.width
        } else {
            self.image.width - (self.columns - 1) * self.interior.width + 2 * self.border
        };
        let height = if row < self.rows - 1 {
            self.tile.height
        } else {
            self.image.height - (self.rows - 1) * self.interior.height + 2 * self.border
        };
        Size::new(width, height)
    }

    /// Returns the image-space origin of the tile's interior at
    /// (row, column).
    ///
    /// This is the position handed to the projection callback and the
    /// stitching offset of the tile's contribution; the border ring lies
    /// below and left of it in window space.
    pub fn origin_of(&self, row: u32, column: u32) -> (u32, u32) {
        (
            column * self.interior.width,
            row * self.interior.height,
        )
    }
}
