//! Interception of an external frame loop for tiled rendering.

use std::cell::RefCell;
use std::rc::Rc;

use crate::buffer::PixelBuffer;
use crate::context::RenderContext;
use crate::error::TileError;
use crate::grid::{ProjectionCallback, RowOrder, Size, TileGrid};

use super::listener::{FrameListener, FrameLoop};

/// A listener taken off the host while the driver is attached.
struct ReservedListener {
    listener: Box<dyn FrameListener>,
    initialized: bool,
}

/// State shared between the driver handle and its installed listener.
struct DriverState {
    grid: TileGrid,
    reserved: Vec<ReservedListener>,
    pre: Option<Box<dyn FrameListener>>,
    post: Option<Box<dyn FrameListener>>,
    /// Error raised inside the infallible listener dispatch during the
    /// most recent frame, surfaced by the next [`FrameDriver::display`].
    /// Cleared at the start of every frame so it never reports a frame
    /// that has since been superseded.
    last_error: Option<TileError>,
}

/// Adapts an external frame loop to tile-by-tile rendering.
///
/// [`attach`](FrameDriver::attach) sizes the composed [`TileGrid`] from
/// the host surface, takes the host's listeners into reserve, and installs
/// a single interceptor listener in their place. Each host frame then
/// renders exactly one tile: the interceptor brackets the reserved
/// listeners' display with [`begin_tile`](TileGrid::begin_tile) and
/// [`end_tile`](TileGrid::end_tile). [`detach`](FrameDriver::detach) puts
/// the host back the way it was found, including per-listener init states.
///
/// The handle and the installed interceptor share state through
/// `Rc<RefCell<_>>`, keeping the driver single-threaded by construction.
/// Two contracts follow: the same host must be passed to `attach`,
/// `display`, and `detach`, and neither listeners nor the projection
/// callback may call back into the driver during dispatch.
///
/// # Example
///
/// ```ignore
/// use tilemosaic::{FrameDriver, PixelBuffer, PixelFormat, TileView};
/// use tilemosaic::context::RenderContext;
///
/// let mut driver = FrameDriver::new();
/// driver.attach(&mut host, 0, |_ctx: &mut dyn RenderContext, view: &TileView| {
///     // Reshape the projection for this tile.
/// })?;
/// driver.set_image_size(4096, 4096);
/// driver.set_image_buffer(PixelBuffer::for_image(PixelFormat::Rgba8, 4096, 4096));
///
/// while driver.display(&mut host)? {}
/// let image = driver.take_image_buffer();
/// driver.detach(&mut host);
/// ```
pub struct FrameDriver {
    state: Rc<RefCell<DriverState>>,
    attached: bool,
}

impl FrameDriver {
    /// Creates a detached driver with a default [`TileGrid`].
    pub fn new() -> Self {
        Self {
            state: Rc::new(RefCell::new(DriverState {
                grid: TileGrid::new(),
                reserved: Vec::new(),
                pre: None,
                post: None,
                last_error: None,
            })),
            attached: false,
        }
    }

    /// Attaches to a frame loop: sizes the grid tile to the host surface
    /// with the given border, registers the projection callback, and
    /// installs the interceptor as the host's sole listener.
    ///
    /// The host's existing listeners and their init states go into
    /// reserve; they keep receiving notifications through the interceptor
    /// and are restored on [`detach`](FrameDriver::detach).
    ///
    /// # Errors
    ///
    /// * [`TileError::AlreadyAttached`] - the driver is already attached
    /// * [`TileError::InvalidTileSize`] - the surface cannot accommodate
    ///   the border; the host is left untouched
    pub fn attach(
        &mut self,
        host: &mut dyn FrameLoop,
        border: u32,
        callback: impl ProjectionCallback + 'static,
    ) -> Result<(), TileError> {
        if self.attached {
            return Err(TileError::AlreadyAttached);
        }
        let surface = host.surface_size();
        let drained = {
            let mut state = self.state.borrow_mut();
            state
                .grid
                .set_tile_size(surface.width, surface.height, border)?;
            state.grid.set_projection_callback(callback);

            let count = host.listener_count();
            state.reserved.reserve(count);
            for _ in 0..count {
                let initialized = host.listener_init_state(0);
                if let Some(listener) = host.remove_listener(0) {
                    state.reserved.push(ReservedListener {
                        listener,
                        initialized,
                    });
                }
            }
            state.reserved.len()
        };
        host.add_listener(Box::new(TiledListener {
            state: Rc::clone(&self.state),
        }));
        self.attached = true;
        tracing::debug!(
            listeners = drained,
            surface = %surface,
            border = border,
            "Frame driver attached"
        );
        Ok(())
    }

    /// Detaches from the frame loop, restoring the reserved listeners and
    /// their init states and clearing the projection callback.
    ///
    /// Does nothing when not attached.
    pub fn detach(&mut self, host: &mut dyn FrameLoop) {
        if !self.attached {
            return;
        }
        // The interceptor is the host's only listener while attached.
        let _ = host.remove_listener(0);
        let mut state = self.state.borrow_mut();
        for reserved in state.reserved.drain(..) {
            host.add_listener(reserved.listener);
            host.set_listener_init_state(host.listener_count() - 1, reserved.initialized);
        }
        state.grid.clear_projection_callback();
        self.attached = false;
        tracing::debug!("Frame driver detached");
    }

    /// Renders one tile by driving one host frame.
    ///
    /// # Returns
    ///
    /// `Ok(true)` while tiles remain, `Ok(false)` once the image is
    /// complete.
    ///
    /// # Errors
    ///
    /// * [`TileError::NotAttached`] - no frame loop is attached
    /// * Any error the bracketed begin/end raised during the frame, such
    ///   as [`TileError::ImageSizeNotSet`] or
    ///   [`TileError::InsufficientCapacity`]
    pub fn display(&mut self, host: &mut dyn FrameLoop) -> Result<bool, TileError> {
        if !self.attached {
            return Err(TileError::NotAttached);
        }
        host.display();
        let mut state = self.state.borrow_mut();
        if let Some(error) = state.last_error.take() {
            return Err(error);
        }
        Ok(!state.grid.is_finished())
    }

    /// Sets listeners bracketing every delegated notification: `pre` runs
    /// before the reserved listeners, `post` after them.
    ///
    /// On display, the brackets run outside the begin/end pair, so they
    /// see the surface before the tile viewport is applied and after the
    /// tile has been read back.
    pub fn set_bracket_listeners(
        &mut self,
        pre: Option<Box<dyn FrameListener>>,
        post: Option<Box<dyn FrameListener>>,
    ) {
        let mut state = self.state.borrow_mut();
        state.pre = pre;
        state.post = post;
    }

    /// Returns whether a frame loop is attached.
    pub fn is_attached(&self) -> bool {
        self.attached
    }

    // ===================
    // Grid Delegation
    // ===================

    /// Sets the target image size on the composed grid.
    pub fn set_image_size(&mut self, width: u32, height: u32) {
        self.state.borrow_mut().grid.set_image_size(width, height);
    }

    /// Sets the row traversal order on the composed grid.
    pub fn set_row_order(&mut self, order: RowOrder) {
        self.state.borrow_mut().grid.set_row_order(order);
    }

    /// Registers a per-tile destination on the composed grid.
    pub fn set_tile_buffer(&mut self, buffer: PixelBuffer) {
        self.state.borrow_mut().grid.set_tile_buffer(buffer);
    }

    /// Removes and returns the per-tile destination.
    pub fn take_tile_buffer(&mut self) -> Option<PixelBuffer> {
        self.state.borrow_mut().grid.take_tile_buffer()
    }

    /// Registers a full-image destination on the composed grid.
    pub fn set_image_buffer(&mut self, buffer: PixelBuffer) {
        self.state.borrow_mut().grid.set_image_buffer(buffer);
    }

    /// Removes and returns the full-image destination.
    pub fn take_image_buffer(&mut self) -> Option<PixelBuffer> {
        self.state.borrow_mut().grid.take_image_buffer()
    }

    /// Returns whether the composed grid has no cycle in progress.
    pub fn is_finished(&self) -> bool {
        self.state.borrow().grid.is_finished()
    }

    /// Returns the composed grid's tile size.
    pub fn tile_size(&self) -> Size {
        self.state.borrow().grid.tile_size()
    }

    /// Returns the composed grid's image size.
    pub fn image_size(&self) -> Size {
        self.state.borrow().grid.image_size()
    }

    /// Returns the composed grid's row count.
    pub fn rows(&self) -> u32 {
        self.state.borrow().grid.rows()
    }

    /// Returns the composed grid's column count.
    pub fn columns(&self) -> u32 {
        self.state.borrow().grid.columns()
    }
}

impl Default for FrameDriver {
    fn default() -> Self {
        Self::new()
    }
}

/// The interceptor installed on the host while the driver is attached.
struct TiledListener {
    state: Rc<RefCell<DriverState>>,
}

impl FrameListener for TiledListener {
    fn init(&mut self, ctx: &mut dyn RenderContext) {
        let mut state = self.state.borrow_mut();
        if let Some(pre) = state.pre.as_mut() {
            pre.init(ctx);
        }
        for reserved in state.reserved.iter_mut() {
            reserved.listener.init(ctx);
            reserved.initialized = true;
        }
        if let Some(post) = state.post.as_mut() {
            post.init(ctx);
        }
    }

    fn dispose(&mut self, ctx: &mut dyn RenderContext) {
        let mut state = self.state.borrow_mut();
        if let Some(pre) = state.pre.as_mut() {
            pre.dispose(ctx);
        }
        for reserved in state.reserved.iter_mut() {
            reserved.listener.dispose(ctx);
        }
        if let Some(post) = state.post.as_mut() {
            post.dispose(ctx);
        }
    }

    fn display(&mut self, ctx: &mut dyn RenderContext) {
        let mut state = self.state.borrow_mut();
        // The recorded error always describes the latest frame; a stale
        // failure from an earlier host-driven frame is dropped here.
        state.last_error = None;
        if let Some(pre) = state.pre.as_mut() {
            pre.display(ctx);
        }
        if let Err(error) = state.grid.begin_tile(ctx) {
            tracing::error!(error = %error, "Tile begin failed in frame dispatch");
            state.last_error = Some(error);
            return;
        }
        for reserved in state.reserved.iter_mut() {
            reserved.listener.display(ctx);
        }
        if let Err(error) = state.grid.end_tile(ctx) {
            tracing::error!(error = %error, "Tile end failed in frame dispatch");
            state.last_error = Some(error);
            return;
        }
        if let Some(post) = state.post.as_mut() {
            post.display(ctx);
        }
    }

    fn reshape(&mut self, ctx: &mut dyn RenderContext, x: i32, y: i32, width: u32, height: u32) {
        let mut state = self.state.borrow_mut();
        if let Some(pre) = state.pre.as_mut() {
            pre.reshape(ctx, x, y, width, height);
        }
        for reserved in state.reserved.iter_mut() {
            reserved.listener.reshape(ctx, x, y, width, height);
        }
        if let Some(post) = state.post.as_mut() {
            post.reshape(ctx, x, y, width, height);
        }
    }
}
