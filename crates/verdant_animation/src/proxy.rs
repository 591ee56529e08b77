//! Scroller proxy interface
//!
//! The trigger scheduler never talks to a scroll container directly. It
//! reads and writes scroll offsets, asks for the visible geometry and picks
//! a pinning technique through [`ScrollerProxy`]. Any scroll-virtualization
//! backend can implement it; [`NativeScroller`] is the fallback used when a
//! container has no registered proxy.

use verdant_core::{Rect, WeakElement, WeakViewport};

/// Technique used to keep an element visually anchored while scrolling
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PinStrategy {
    /// The scroller moves content with transforms; pins must counter-translate
    TransformBased,
    /// Pins can use fixed positioning
    FixedPositioned,
}

/// Capability set a scroll backend exposes to the scheduler
pub trait ScrollerProxy {
    /// Current scroll offset in pixels
    fn read(&self) -> f32;

    /// Jump to a scroll offset
    fn write(&self, offset: f32);

    /// Visible region the scroller renders into
    fn geometry(&self) -> Rect;

    /// Pinning technique for this scroller
    fn pin_strategy(&self) -> PinStrategy;
}

/// Proxy over an element's native scroll position
pub struct NativeScroller {
    element: WeakElement,
    viewport: WeakViewport,
}

impl NativeScroller {
    pub fn new(element: WeakElement, viewport: WeakViewport) -> Self {
        Self { element, viewport }
    }
}

impl ScrollerProxy for NativeScroller {
    fn read(&self) -> f32 {
        self.element
            .upgrade()
            .map(|element| element.scroll_top())
            .unwrap_or(0.0)
    }

    fn write(&self, offset: f32) {
        if let Some(element) = self.element.upgrade() {
            element.set_scroll_top(offset.max(0.0));
        }
    }

    fn geometry(&self) -> Rect {
        self.viewport.size().unwrap_or_default().to_rect()
    }

    fn pin_strategy(&self) -> PinStrategy {
        PinStrategy::FixedPositioned
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use verdant_core::{Document, Size};

    #[test]
    fn test_native_scroller_reads_element() {
        let document = Document::interactive(Size::new(800.0, 600.0));
        let container = document.create_element();
        let proxy = NativeScroller::new(container.downgrade(), document.viewport().downgrade());

        proxy.write(250.0);
        assert_eq!(container.scroll_top(), 250.0);
        assert_eq!(proxy.read(), 250.0);
        assert_eq!(proxy.geometry(), Rect::new(0.0, 0.0, 800.0, 600.0));

        proxy.write(-10.0);
        assert_eq!(proxy.read(), 0.0);
    }
}
