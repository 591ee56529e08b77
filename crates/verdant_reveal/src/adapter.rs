//! Scroller proxy backed by the smooth scroll controller
//!
//! Triggers on a smoothed container must measure against the virtual
//! offset, not the native one. The adapter answers the scheduler's proxy
//! queries from the controller's state.

use std::cell::Cell;
use std::rc::{Rc, Weak};

use verdant_animation::{PinStrategy, ScrollerProxy};
use verdant_core::{Element, Rect, Size};

use crate::smooth_scroll::{Controller, ScrollTo};

pub struct ScrollProxyAdapter {
    controller: Weak<Controller>,
    last_viewport: Cell<Size>,
    pin: PinStrategy,
}

impl ScrollProxyAdapter {
    /// The pin strategy is fixed here: transform-positioned containers pin
    /// with transforms, everything else with fixed positioning.
    pub(crate) fn bind(controller: &Rc<Controller>, container: &Element) -> Self {
        let pin = if container.has_transform() {
            PinStrategy::TransformBased
        } else {
            PinStrategy::FixedPositioned
        };
        Self {
            controller: Rc::downgrade(controller),
            last_viewport: Cell::new(controller.viewport().size().unwrap_or_default()),
            pin,
        }
    }

    fn live_controller(&self) -> Option<Rc<Controller>> {
        self.controller
            .upgrade()
            .filter(|controller| !controller.is_disposed())
    }
}

impl ScrollerProxy for ScrollProxyAdapter {
    fn read(&self) -> f32 {
        self.live_controller()
            .map(|controller| controller.state().virtual_offset)
            .unwrap_or(0.0)
    }

    fn write(&self, offset: f32) {
        if let Some(controller) = self.live_controller() {
            controller.scroll_to(offset, ScrollTo::immediate());
        }
    }

    /// Always anchored at the origin; falls back to the last size seen
    /// once the controller or document is gone
    fn geometry(&self) -> Rect {
        let live = self
            .live_controller()
            .and_then(|controller| controller.viewport().size());
        if let Some(size) = live {
            self.last_viewport.set(size);
        }
        self.last_viewport.get().to_rect()
    }

    fn pin_strategy(&self) -> PinStrategy {
        self.pin
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SmoothScrollConfig;
    use verdant_core::{Document, Transform};

    fn setup(document: &Document) -> (Element, Rc<Controller>) {
        let container = document.create_element();
        container.set_content_height(4000.0);
        let controller = Rc::new(Controller::new(
            &container,
            document.viewport().downgrade(),
            SmoothScrollConfig::default(),
        ));
        (container, controller)
    }

    #[test]
    fn test_geometry_tracks_live_viewport() {
        let document = Document::interactive(Size::new(1280.0, 800.0));
        let (container, controller) = setup(&document);
        let adapter = ScrollProxyAdapter::bind(&controller, &container);

        assert_eq!(adapter.geometry(), Rect::new(0.0, 0.0, 1280.0, 800.0));
        document.viewport().set_size(Size::new(390.0, 844.0));
        let geometry = adapter.geometry();
        assert_eq!((geometry.x(), geometry.y()), (0.0, 0.0));
        assert_eq!(geometry.size(), Size::new(390.0, 844.0));
    }

    #[test]
    fn test_geometry_ignores_scroll_position() {
        let document = Document::interactive(Size::new(1280.0, 800.0));
        let (container, controller) = setup(&document);
        let adapter = ScrollProxyAdapter::bind(&controller, &container);

        adapter.write(2400.0);
        assert_eq!(adapter.read(), 2400.0);
        assert_eq!(adapter.geometry(), Rect::new(0.0, 0.0, 1280.0, 800.0));

        // Native scrolling the controller has not caught up with yet
        container.set_scroll_top(3100.0);
        controller.resync();
        let geometry = adapter.geometry();
        assert_eq!((geometry.x(), geometry.y()), (0.0, 0.0));
        assert_eq!(geometry.size(), Size::new(1280.0, 800.0));
    }

    #[test]
    fn test_geometry_after_teardown_returns_last_known() {
        let document = Document::interactive(Size::new(1280.0, 800.0));
        let (container, controller) = setup(&document);
        let adapter = ScrollProxyAdapter::bind(&controller, &container);
        adapter.geometry();

        drop(controller);
        drop(document);
        assert_eq!(adapter.geometry(), Rect::new(0.0, 0.0, 1280.0, 800.0));
        assert_eq!(adapter.read(), 0.0);
        adapter.write(100.0);
    }

    #[test]
    fn test_write_jumps_without_interpolation() {
        let document = Document::interactive(Size::new(1280.0, 800.0));
        let (container, controller) = setup(&document);
        let adapter = ScrollProxyAdapter::bind(&controller, &container);

        adapter.write(900.0);
        assert_eq!(adapter.read(), 900.0);
        assert_eq!(container.scroll_top(), 900.0);
        assert!(controller.state().is_settled());
    }

    #[test]
    fn test_pin_strategy_follows_container_transform() {
        let document = Document::interactive(Size::new(1280.0, 800.0));
        let (container, controller) = setup(&document);
        assert_eq!(
            ScrollProxyAdapter::bind(&controller, &container).pin_strategy(),
            PinStrategy::FixedPositioned
        );

        container.set_transform(Some(Transform::translate(0.0, -120.0)));
        assert_eq!(
            ScrollProxyAdapter::bind(&controller, &container).pin_strategy(),
            PinStrategy::TransformBased
        );
    }
}
