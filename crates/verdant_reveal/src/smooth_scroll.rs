//! Smooth scroll controller
//!
//! Virtualizes a container's scroll position: the native offset becomes the
//! *target* and a *virtual* offset chases it a fixed fraction of the
//! remaining distance every frame. Scroll triggers read the virtual offset
//! through [`ScrollProxyAdapter`], so reveal effects move with what is
//! drawn rather than with the raw wheel position.
//!
//! ```text
//! target  = clamp(native, 0, limit)
//! virtual = virtual + lerp * (target - virtual)
//! ```
//!
//! With `0 < lerp <= 1` the virtual offset approaches the target
//! monotonically and never passes it.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use verdant_animation::{ListenerId, TriggerScheduler};
use verdant_core::{
    Document, Element, ElementId, EngineError, FrameCallbackId, Result, WeakElement, WeakViewport,
};

use crate::adapter::ScrollProxyAdapter;
use crate::config::SmoothScrollConfig;
use crate::page::Page;
use crate::READY_WAIT;

/// Remaining distance (px) below which the virtual offset snaps to target
const SETTLE_EPSILON: f32 = 0.05;

/// Viewport size class
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeviceClass {
    Desktop,
    Tablet,
    Phone,
}

impl DeviceClass {
    /// Classify a viewport width against the configured breakpoints
    pub fn from_width(width: f32, config: &SmoothScrollConfig) -> Self {
        if width < config.phone.breakpoint {
            DeviceClass::Phone
        } else if width < config.tablet.breakpoint {
            DeviceClass::Tablet
        } else {
            DeviceClass::Desktop
        }
    }

    /// Per-frame interpolation factor; 1.0 when smoothing is off
    pub fn interpolation(self, config: &SmoothScrollConfig) -> f32 {
        let smooth = match self {
            DeviceClass::Desktop => config.smooth,
            DeviceClass::Tablet => config.tablet.smooth,
            DeviceClass::Phone => config.phone.smooth,
        };
        if smooth {
            config.lerp
        } else {
            1.0
        }
    }
}

/// Controller bookkeeping
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollState {
    /// Offset that content is rendered at
    pub virtual_offset: f32,
    /// Offset the virtual offset is chasing
    pub target_offset: f32,
    /// Fraction of the remaining distance covered per frame
    pub interpolation: f32,
    pub device: DeviceClass,
    /// Largest reachable offset (content height minus viewport height)
    pub limit: f32,
}

impl ScrollState {
    pub fn new(config: &SmoothScrollConfig, viewport_width: f32) -> Self {
        let device = DeviceClass::from_width(viewport_width, config);
        Self {
            virtual_offset: 0.0,
            target_offset: 0.0,
            interpolation: device.interpolation(config),
            device,
            limit: 0.0,
        }
    }

    /// Set the target, clamped to `[0, limit]`
    pub fn set_target(&mut self, offset: f32) {
        self.target_offset = offset.clamp(0.0, self.limit);
    }

    /// Move target and virtual offset together
    pub fn jump_to(&mut self, offset: f32) {
        self.set_target(offset);
        self.virtual_offset = self.target_offset;
    }

    /// Advance the virtual offset one frame; returns whether it moved
    pub fn step(&mut self) -> bool {
        let remaining = self.target_offset - self.virtual_offset;
        if remaining == 0.0 {
            return false;
        }
        if remaining.abs() < SETTLE_EPSILON {
            self.virtual_offset = self.target_offset;
        } else {
            self.virtual_offset += self.interpolation * remaining;
        }
        true
    }

    /// Whether the virtual offset has reached the target
    pub fn is_settled(&self) -> bool {
        self.virtual_offset == self.target_offset
    }
}

/// Options for [`SmoothScroll::scroll_to_with`]
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScrollTo {
    /// Added to the requested offset (px)
    pub offset: f32,
    /// Skip interpolation and land immediately
    pub immediate: bool,
}

impl ScrollTo {
    pub fn immediate() -> Self {
        Self {
            offset: 0.0,
            immediate: true,
        }
    }
}

/// Shared controller state; the frame callback, the refresh listener and
/// the proxy adapter all point here
pub(crate) struct Controller {
    container: WeakElement,
    viewport: WeakViewport,
    config: SmoothScrollConfig,
    state: Cell<ScrollState>,
    disposed: Cell<bool>,
}

impl Controller {
    pub(crate) fn new(container: &Element, viewport: WeakViewport, config: SmoothScrollConfig) -> Self {
        let width = viewport.size().unwrap_or_default().width;
        let controller = Self {
            container: container.downgrade(),
            state: Cell::new(ScrollState::new(&config, width)),
            viewport,
            config,
            disposed: Cell::new(false),
        };
        controller.resync();
        controller
    }

    pub(crate) fn state(&self) -> ScrollState {
        self.state.get()
    }

    pub(crate) fn viewport(&self) -> &WeakViewport {
        &self.viewport
    }

    pub(crate) fn is_disposed(&self) -> bool {
        self.disposed.get()
    }

    /// Recompute limit and device class from current layout
    pub(crate) fn resync(&self) {
        let (Some(container), Some(viewport)) = (self.container.upgrade(), self.viewport.size())
        else {
            return;
        };

        let mut state = self.state.get();
        state.limit = (container.content_height() - viewport.height).max(0.0);
        state.device = DeviceClass::from_width(viewport.width, &self.config);
        state.interpolation = state.device.interpolation(&self.config);
        state.target_offset = state.target_offset.min(state.limit);
        state.virtual_offset = state.virtual_offset.min(state.limit);
        self.state.set(state);

        tracing::trace!(limit = state.limit, device = ?state.device, "scroll state resynced");
    }

    fn frame(&self) {
        if self.disposed.get() {
            return;
        }
        let Some(container) = self.container.upgrade() else {
            return;
        };
        let mut state = self.state.get();
        state.set_target(container.scroll_top());
        state.step();
        self.state.set(state);
    }

    pub(crate) fn scroll_to(&self, offset: f32, options: ScrollTo) {
        let Some(container) = self.container.upgrade() else {
            return;
        };
        let mut state = self.state.get();
        if options.immediate {
            state.jump_to(offset + options.offset);
        } else {
            state.set_target(offset + options.offset);
        }
        container.set_scroll_top(state.target_offset);
        self.state.set(state);
    }

    fn scroll_by(&self, delta: f32) {
        let Some(container) = self.container.upgrade() else {
            return;
        };
        let limit = self.state.get().limit;
        let next = (container.scroll_top() + delta * self.config.multiplier).clamp(0.0, limit);
        container.set_scroll_top(next);
    }
}

/// Handle to an installed smooth scroll controller
///
/// Call [`dispose`](Self::dispose) to tear it down. Dropping the handle
/// alone leaves the frame callback installed.
pub struct SmoothScroll {
    controller: Rc<Controller>,
    container: ElementId,
    frame: FrameCallbackId,
    listener: Cell<Option<ListenerId>>,
    document: Weak<Document>,
    triggers: Weak<RefCell<TriggerScheduler>>,
}

impl SmoothScroll {
    fn attach(page: &Page, container: &Element, config: SmoothScrollConfig) -> Self {
        let document = page.document();
        let controller = Rc::new(Controller::new(
            container,
            document.viewport().downgrade(),
            config,
        ));

        let frame_controller = controller.clone();
        let frame = document
            .frames()
            .request(move |_dt| frame_controller.frame());

        let handle = Self {
            controller,
            container: container.id(),
            frame,
            listener: Cell::new(None),
            document: Rc::downgrade(page.document_rc()),
            triggers: Rc::downgrade(page.triggers()),
        };
        handle.bind_proxy(container);
        page.refresh();

        tracing::debug!(
            container = ?handle.container,
            device = ?handle.state().device,
            "smooth scroll installed"
        );
        handle
    }

    /// Register the proxy adapter and the refresh listener, replacing any
    /// earlier registration
    fn bind_proxy(&self, container: &Element) {
        let Some(triggers) = self.triggers.upgrade() else {
            return;
        };
        let mut triggers = triggers.borrow_mut();

        let adapter = ScrollProxyAdapter::bind(&self.controller, container);
        triggers.register_proxy(self.container, Rc::new(adapter));

        if let Some(previous) = self.listener.take() {
            triggers.remove_listener(previous);
        }
        let controller = Rc::downgrade(&self.controller);
        let listener = triggers.on_refresh(move || {
            if let Some(controller) = controller.upgrade() {
                controller.resync();
            }
        });
        self.listener.set(Some(listener));
    }

    pub fn container(&self) -> ElementId {
        self.container
    }

    pub fn frame_callback(&self) -> FrameCallbackId {
        self.frame
    }

    pub fn state(&self) -> ScrollState {
        self.controller.state()
    }

    pub fn virtual_offset(&self) -> f32 {
        self.controller.state().virtual_offset
    }

    pub fn is_disposed(&self) -> bool {
        self.controller.is_disposed()
    }

    /// Apply a wheel delta to the native scroll position
    pub fn scroll_by(&self, delta: f32) {
        if !self.is_disposed() {
            self.controller.scroll_by(delta);
        }
    }

    /// Jump to `offset` without interpolating
    pub fn scroll_to(&self, offset: f32) {
        self.scroll_to_with(offset, ScrollTo::immediate());
    }

    pub fn scroll_to_with(&self, offset: f32, options: ScrollTo) {
        if !self.is_disposed() {
            self.controller.scroll_to(offset, options);
        }
    }

    /// Resynchronize the scroll limit after a content change
    pub fn update(&self) {
        self.controller.resync();
    }

    /// Re-register the proxy, re-deciding the pin strategy, and refresh
    pub fn rebind(&self) {
        if self.is_disposed() {
            return;
        }
        let Some(container) = self.controller.container.upgrade() else {
            return;
        };
        self.bind_proxy(&container);
        if let Some(triggers) = self.triggers.upgrade() {
            triggers.borrow_mut().refresh();
        }
    }

    /// Tear the controller down
    ///
    /// Cancels the frame callback, removes the refresh listener, the proxy
    /// and every trigger scrolled by the container. Safe to call repeatedly.
    pub fn dispose(&self) {
        if self.controller.disposed.replace(true) {
            return;
        }

        if let Some(document) = self.document.upgrade() {
            document.frames().cancel(self.frame);
        }
        if let Some(triggers) = self.triggers.upgrade() {
            let mut triggers = triggers.borrow_mut();
            if let Some(listener) = self.listener.take() {
                triggers.remove_listener(listener);
            }
            triggers.unregister_scroller(self.container);
        }

        tracing::debug!(container = ?self.container, "smooth scroll disposed");
    }
}

/// Install smooth scrolling on `container`
///
/// Returns `None` when the container is absent or already has a live
/// controller, when the document is not interactive, or when the engine
/// does not become ready within one bounded wait.
pub async fn setup(page: &Page, container: Option<&Element>) -> Option<SmoothScroll> {
    match try_setup(page, container).await {
        Ok(handle) => Some(handle),
        Err(err) => {
            tracing::debug!(%err, "smooth scroll setup skipped");
            None
        }
    }
}

/// [`setup`] with the failure reason
pub async fn try_setup(page: &Page, container: Option<&Element>) -> Result<SmoothScroll> {
    if !page.document().is_interactive() {
        return Err(EngineError::NoRuntime);
    }
    let container = container.ok_or(EngineError::MissingInput)?;
    let modules = page.gate().wait_ready(READY_WAIT).await?;
    // One controller per container; dispose the live one before re-attaching
    if page.triggers().borrow().has_proxy(container.id()) {
        return Err(EngineError::AlreadyAttached);
    }
    Ok(SmoothScroll::attach(page, container, modules.scroll.clone()))
}
