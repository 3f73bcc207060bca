//! Listener and frame-loop abstractions consumed by the driver.

use crate::context::RenderContext;
use crate::grid::Size;

/// Notifications a frame loop delivers to a registered listener.
///
/// All methods have empty default bodies, so implementers pick the
/// notifications they care about. The frame loop passes its render context
/// to every notification.
pub trait FrameListener {
    /// Called once before the first frame the listener takes part in.
    fn init(&mut self, ctx: &mut dyn RenderContext) {
        let _ = ctx;
    }

    /// Called when the listener is being torn down.
    fn dispose(&mut self, ctx: &mut dyn RenderContext) {
        let _ = ctx;
    }

    /// Called once per frame to render.
    fn display(&mut self, ctx: &mut dyn RenderContext) {
        let _ = ctx;
    }

    /// Called when the surface geometry changes.
    fn reshape(&mut self, ctx: &mut dyn RenderContext, x: i32, y: i32, width: u32, height: u32) {
        let _ = (ctx, x, y, width, height);
    }
}

/// The external render loop the driver intercepts.
///
/// Listeners are held in registration order and carry an init state: a
/// frame loop initializes a listener before its first display, and the
/// state can be saved and restored so listeners survive being moved between
/// loops without being re-initialized. [`display`](FrameLoop::display)
/// drives exactly one frame through the registered listeners.
pub trait FrameLoop {
    /// Returns the current surface size.
    fn surface_size(&self) -> Size;

    /// Returns the number of registered listeners.
    fn listener_count(&self) -> usize;

    /// Appends a listener.
    fn add_listener(&mut self, listener: Box<dyn FrameListener>);

    /// Removes and returns the listener at `index`, shifting the rest
    /// forward. Returns `None` if the index is out of range.
    fn remove_listener(&mut self, index: usize) -> Option<Box<dyn FrameListener>>;

    /// Returns whether the listener at `index` has been initialized.
    fn listener_init_state(&self, index: usize) -> bool;

    /// Overrides the init state of the listener at `index`.
    fn set_listener_init_state(&mut self, index: usize, initialized: bool);

    /// Renders one frame through the registered listeners.
    fn display(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{PixelFormat, PixelStoreState, Viewport};
    use std::cell::RefCell;
    use std::rc::Rc;

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

    /// Implements only `display`; the other notifications fall back to
    /// the defaults.
    struct DisplayOnly {
        displays: Rc<RefCell<usize>>,
    }

    impl FrameListener for DisplayOnly {
        fn display(&mut self, _ctx: &mut dyn RenderContext) {
            *self.displays.borrow_mut() += 1;
        }
    }

    #[test]
    fn test_default_notifications_are_no_ops() {
        let displays = Rc::new(RefCell::new(0));
        let mut listener: Box<dyn FrameListener> = Box::new(DisplayOnly {
            displays: displays.clone(),
        });
        let mut ctx = NullContext;

        listener.init(&mut ctx);
        listener.reshape(&mut ctx, 0, 0, 64, 64);
        listener.dispose(&mut ctx);
        assert_eq!(*displays.borrow(), 0);

        listener.display(&mut ctx);
        assert_eq!(*displays.borrow(), 1);
    }
}
