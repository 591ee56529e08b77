//! Hosting document
//!
//! The document stands in for the page context: it knows whether it is
//! interactive, owns the live viewport size and the frame loop, and hands
//! out element ids.

use std::cell::Cell;
use std::rc::{Rc, Weak};

use crate::element::{Element, ElementId};
use crate::frame::FrameLoop;
use crate::geometry::Size;

/// Shared, live viewport size
#[derive(Clone, Debug, Default)]
pub struct Viewport {
    size: Rc<Cell<Size>>,
}

/// Non-owning viewport reference
#[derive(Clone, Debug, Default)]
pub struct WeakViewport {
    size: Weak<Cell<Size>>,
}

impl Viewport {
    pub fn new(size: Size) -> Self {
        Self {
            size: Rc::new(Cell::new(size)),
        }
    }

    pub fn size(&self) -> Size {
        self.size.get()
    }

    pub fn set_size(&self, size: Size) {
        self.size.set(size);
    }

    pub fn downgrade(&self) -> WeakViewport {
        WeakViewport {
            size: Rc::downgrade(&self.size),
        }
    }
}

impl WeakViewport {
    /// Current size, or `None` once the document is gone
    pub fn size(&self) -> Option<Size> {
        self.size.upgrade().map(|size| size.get())
    }
}

/// The page context the engine runs inside
pub struct Document {
    interactive: bool,
    viewport: Viewport,
    frames: FrameLoop,
    next_id: Cell<u64>,
}

impl Document {
    /// A live, interactive document
    pub fn interactive(viewport: Size) -> Self {
        Self::with_runtime(true, viewport)
    }

    /// A non-interactive render pass; every engine entry point no-ops
    pub fn headless() -> Self {
        Self::with_runtime(false, Size::ZERO)
    }

    fn with_runtime(interactive: bool, viewport: Size) -> Self {
        Self {
            interactive,
            viewport: Viewport::new(viewport),
            frames: FrameLoop::new(),
            next_id: Cell::new(1),
        }
    }

    pub fn is_interactive(&self) -> bool {
        self.interactive
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn frames(&self) -> &FrameLoop {
        &self.frames
    }

    /// Create a new element with a fresh id
    pub fn create_element(&self) -> Element {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        Element::new(ElementId(id))
    }
}
