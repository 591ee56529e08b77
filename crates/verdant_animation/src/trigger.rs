//! Scroll-trigger scheduler
//!
//! Maps scroll positions onto animation progress. Each trigger watches one
//! target element inside one scroller and owns a [`Tween`]; its progress is
//! defined over a window between two viewport fractions:
//!
//! ```text
//! start = target.top - start_fraction * viewport.height
//! end   = target.top - end_fraction   * viewport.height
//! progress = clamp((scroll - start) / (end - start), 0, 1)
//! ```
//!
//! Scrollers are accessed exclusively through [`ScrollerProxy`]. A scroller
//! without a registered proxy falls back to [`NativeScroller`].
//!
//! # Refresh ordering
//!
//! [`TriggerScheduler::refresh`] notifies refresh listeners *before*
//! measuring trigger bounds, so a scroll backend can resynchronize its own
//! bookkeeping first and bounds are never computed against stale geometry.

use std::rc::Rc;

use rustc_hash::FxHashMap;
use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;
use verdant_core::{Element, ElementId, WeakElement, WeakViewport};

use crate::proxy::{NativeScroller, PinStrategy, ScrollerProxy};
use crate::tween::Tween;

new_key_type! {
    pub struct TriggerId;
    pub struct ListenerId;
}

/// Lagged scrub progress snaps to the raw value once this close
const SCRUB_SETTLE: f32 = 1e-4;

/// How trigger progress follows the scroll-derived value
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ScrubMode {
    /// Progress equals the raw value every frame
    Snap,
    /// Progress eases toward the raw value; the factor is the catch-up
    /// time in seconds
    Lag(f32),
}

impl ScrubMode {
    fn step(&self, current: f32, raw: f32, dt: f32) -> f32 {
        match *self {
            ScrubMode::Snap => raw,
            ScrubMode::Lag(lag) if lag <= 0.0 => raw,
            ScrubMode::Lag(lag) => {
                let next = current + (raw - current) * (dt / lag).min(1.0);
                if (raw - next).abs() < SCRUB_SETTLE {
                    raw
                } else {
                    next
                }
            }
        }
    }
}

/// Scroll offsets (pixels) where a trigger's window begins and completes
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TriggerBounds {
    pub start: f32,
    pub end: f32,
}

impl TriggerBounds {
    /// Raw progress at a scroll offset
    pub fn progress_at(&self, scroll: f32) -> f32 {
        let span = self.end - self.start;
        if span.abs() < f32::EPSILON {
            return if scroll >= self.start { 1.0 } else { 0.0 };
        }
        ((scroll - self.start) / span).clamp(0.0, 1.0)
    }
}

/// Everything needed to register a trigger
pub struct TriggerSpec {
    pub target: Element,
    pub scroller: Element,
    /// Viewport fraction where the ramp begins (0.0 = top, 1.0 = bottom)
    pub start: f32,
    /// Viewport fraction where the ramp completes
    pub end: f32,
    pub scrub: ScrubMode,
    pub tween: Tween,
}

struct Trigger {
    target: WeakElement,
    scroller: ElementId,
    generation: u64,
    start_fraction: f32,
    end_fraction: f32,
    scrub: ScrubMode,
    tween: Tween,
    bounds: TriggerBounds,
    progress: f32,
}

impl Trigger {
    /// Compute pixel bounds against the scroller's current geometry
    fn measure(&self, proxy: &dyn ScrollerProxy) -> Option<TriggerBounds> {
        let target = self.target.upgrade()?;
        let top = target.rect().top();
        let height = proxy.geometry().height();
        Some(TriggerBounds {
            start: top - self.start_fraction * height,
            end: top - self.end_fraction * height,
        })
    }

    /// Live target whose tokens still belong to this trigger
    fn current_target(&self) -> Option<Element> {
        self.target
            .upgrade()
            .filter(|target| target.token_generation() == self.generation)
    }
}

struct ScrollerEntry {
    proxy: Rc<dyn ScrollerProxy>,
    native: bool,
}

/// Registry of scroll triggers, scroller proxies and refresh listeners
pub struct TriggerScheduler {
    triggers: SlotMap<TriggerId, Trigger>,
    order: Vec<TriggerId>,
    scrollers: FxHashMap<ElementId, ScrollerEntry>,
    listeners: SlotMap<ListenerId, Box<dyn FnMut()>>,
    viewport: WeakViewport,
}

impl TriggerScheduler {
    /// `viewport` provides geometry for scrollers without a proxy
    pub fn new(viewport: WeakViewport) -> Self {
        Self {
            triggers: SlotMap::with_key(),
            order: Vec::new(),
            scrollers: FxHashMap::default(),
            listeners: SlotMap::with_key(),
            viewport,
        }
    }

    // =========================================================================
    // Scroller proxies
    // =========================================================================

    /// Route a scroller through a proxy, replacing any previous one
    pub fn register_proxy(&mut self, scroller: ElementId, proxy: Rc<dyn ScrollerProxy>) {
        tracing::debug!(?scroller, pin = ?proxy.pin_strategy(), "scroller proxy registered");
        self.scrollers.insert(
            scroller,
            ScrollerEntry {
                proxy,
                native: false,
            },
        );
    }

    /// Drop a scroller's proxy and every trigger scrolled by it
    ///
    /// Returns the number of triggers removed.
    pub fn unregister_scroller(&mut self, scroller: ElementId) -> usize {
        self.scrollers.remove(&scroller);

        let doomed: SmallVec<[TriggerId; 4]> = self
            .order
            .iter()
            .copied()
            .filter(|id| self.triggers.get(*id).map(|t| t.scroller) == Some(scroller))
            .collect();
        for id in &doomed {
            self.kill(*id);
        }

        tracing::debug!(?scroller, removed = doomed.len(), "scroller unregistered");
        doomed.len()
    }

    /// Whether a non-native proxy is registered for the scroller
    pub fn has_proxy(&self, scroller: ElementId) -> bool {
        self.scrollers
            .get(&scroller)
            .is_some_and(|entry| !entry.native)
    }

    pub fn pin_strategy(&self, scroller: ElementId) -> Option<PinStrategy> {
        self.scrollers
            .get(&scroller)
            .map(|entry| entry.proxy.pin_strategy())
    }

    /// Current scroll offset of a scroller
    pub fn scroll_offset(&self, scroller: ElementId) -> Option<f32> {
        self.scrollers.get(&scroller).map(|entry| entry.proxy.read())
    }

    /// Jump a scroller to an offset through its proxy
    pub fn scroll_to(&self, scroller: ElementId, offset: f32) -> bool {
        match self.scrollers.get(&scroller) {
            Some(entry) => {
                entry.proxy.write(offset);
                true
            }
            None => false,
        }
    }

    // =========================================================================
    // Refresh listeners
    // =========================================================================

    /// Run `listener` at the start of every refresh
    pub fn on_refresh(&mut self, listener: impl FnMut() + 'static) -> ListenerId {
        self.listeners.insert(Box::new(listener))
    }

    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(id).is_some()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    // =========================================================================
    // Triggers
    // =========================================================================

    /// Register a trigger and render its tween at the current scroll
    pub fn create(&mut self, spec: TriggerSpec) -> TriggerId {
        let scroller = spec.scroller.id();
        let viewport = &self.viewport;
        let entry = self.scrollers.entry(scroller).or_insert_with(|| ScrollerEntry {
            proxy: Rc::new(NativeScroller::new(
                spec.scroller.downgrade(),
                viewport.clone(),
            )),
            native: true,
        });
        let proxy = entry.proxy.clone();

        let mut trigger = Trigger {
            target: spec.target.downgrade(),
            scroller,
            generation: spec.target.token_generation(),
            start_fraction: spec.start.clamp(0.0, 1.0),
            end_fraction: spec.end.clamp(0.0, 1.0),
            scrub: spec.scrub,
            tween: spec.tween,
            bounds: TriggerBounds::default(),
            progress: 0.0,
        };
        trigger.bounds = trigger.measure(proxy.as_ref()).unwrap_or_default();
        trigger.progress = trigger.bounds.progress_at(proxy.read());
        trigger
            .tween
            .render(&spec.target, trigger.generation, trigger.progress);

        let id = self.triggers.insert(trigger);
        self.order.push(id);

        tracing::debug!(
            target = ?spec.target.id(),
            ?scroller,
            bounds = ?self.triggers[id].bounds,
            "trigger created"
        );
        id
    }

    /// Remove a trigger; its target keeps whatever was last rendered
    pub fn kill(&mut self, id: TriggerId) -> bool {
        let removed = self.triggers.remove(id).is_some();
        if removed {
            self.order.retain(|other| *other != id);
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.triggers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triggers.is_empty()
    }

    pub fn progress(&self, id: TriggerId) -> Option<f32> {
        self.triggers.get(id).map(|t| t.progress)
    }

    pub fn bounds(&self, id: TriggerId) -> Option<TriggerBounds> {
        self.triggers.get(id).map(|t| t.bounds)
    }

    /// Notify listeners, then recompute every trigger's bounds
    pub fn refresh(&mut self) {
        for (_, listener) in self.listeners.iter_mut() {
            listener();
        }

        let mut dead: SmallVec<[TriggerId; 4]> = SmallVec::new();
        for id in &self.order {
            let Some(trigger) = self.triggers.get_mut(*id) else {
                continue;
            };
            let Some(entry) = self.scrollers.get(&trigger.scroller) else {
                continue;
            };
            let Some(target) = trigger.current_target() else {
                dead.push(*id);
                continue;
            };
            if let Some(bounds) = trigger.measure(entry.proxy.as_ref()) {
                trigger.bounds = bounds;
            }
            if trigger.scrub == ScrubMode::Snap {
                trigger.progress = trigger.bounds.progress_at(entry.proxy.read());
            }
            trigger
                .tween
                .render(&target, trigger.generation, trigger.progress);
        }
        self.prune(dead);

        tracing::debug!(
            triggers = self.triggers.len(),
            listeners = self.listeners.len(),
            "triggers refreshed"
        );
    }

    /// Advance every trigger by one frame
    ///
    /// Triggers whose target was dropped or re-split are removed, whether or
    /// not their progress moved this frame.
    pub fn update(&mut self, dt: f32) {
        let mut dead: SmallVec<[TriggerId; 4]> = SmallVec::new();

        for id in &self.order {
            let Some(trigger) = self.triggers.get_mut(*id) else {
                continue;
            };
            let Some(entry) = self.scrollers.get(&trigger.scroller) else {
                continue;
            };
            let Some(target) = trigger.current_target() else {
                dead.push(*id);
                continue;
            };

            let raw = trigger.bounds.progress_at(entry.proxy.read());
            let next = trigger.scrub.step(trigger.progress, raw, dt);
            if (next - trigger.progress).abs() <= f32::EPSILON {
                continue;
            }

            trigger.progress = next;
            if !trigger.tween.render(&target, trigger.generation, next) {
                dead.push(*id);
            }
        }

        self.prune(dead);
    }

    fn prune(&mut self, dead: SmallVec<[TriggerId; 4]>) {
        for id in dead {
            tracing::trace!(?id, "dropping inert trigger");
            self.kill(id);
        }
    }
}
