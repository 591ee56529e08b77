//! Per-frame callback loop
//!
//! The host calls [`FrameLoop::tick`] once per display frame. Callbacks run
//! in registration order. A callback is looked up at the moment it is about
//! to run, so cancelling one (even from inside another callback in the same
//! tick) guarantees it never fires again.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;

new_key_type! {
    pub struct FrameCallbackId;
}

type FrameCallback = Rc<RefCell<dyn FnMut(f32)>>;

/// Registry of per-frame callbacks
#[derive(Default)]
pub struct FrameLoop {
    callbacks: RefCell<SlotMap<FrameCallbackId, FrameCallback>>,
    order: RefCell<Vec<FrameCallbackId>>,
    frame: Cell<u64>,
}

impl FrameLoop {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback; it receives the frame delta in seconds
    pub fn request(&self, callback: impl FnMut(f32) + 'static) -> FrameCallbackId {
        let callback: FrameCallback = Rc::new(RefCell::new(callback));
        let id = self.callbacks.borrow_mut().insert(callback);
        self.order.borrow_mut().push(id);
        id
    }

    /// Remove a callback. Returns false if it was already gone.
    pub fn cancel(&self, id: FrameCallbackId) -> bool {
        let removed = self.callbacks.borrow_mut().remove(id).is_some();
        if removed {
            self.order.borrow_mut().retain(|other| *other != id);
        }
        removed
    }

    pub fn is_scheduled(&self, id: FrameCallbackId) -> bool {
        self.callbacks.borrow().contains_key(id)
    }

    /// Number of registered callbacks
    pub fn len(&self) -> usize {
        self.callbacks.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Frames ticked so far
    pub fn frame_count(&self) -> u64 {
        self.frame.get()
    }

    /// Run every registered callback once
    pub fn tick(&self, dt: f32) {
        let ids: SmallVec<[FrameCallbackId; 8]> = self.order.borrow().iter().copied().collect();

        for id in ids {
            let callback = self.callbacks.borrow().get(id).cloned();
            if let Some(callback) = callback {
                let mut callback = callback.borrow_mut();
                (*callback)(dt);
            }
        }

        self.frame.set(self.frame.get() + 1);
        tracing::trace!(frame = self.frame.get(), dt, "frame ticked");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_callbacks_run_in_registration_order() {
        let frames = FrameLoop::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        for name in ["a", "b", "c"] {
            let log = log.clone();
            frames.request(move |_| log.borrow_mut().push(name));
        }

        frames.tick(1.0 / 60.0);
        assert_eq!(*log.borrow(), vec!["a", "b", "c"]);
        assert_eq!(frames.frame_count(), 1);
    }

    #[test]
    fn test_cancelled_callback_never_fires() {
        let frames = Rc::new(FrameLoop::new());
        let hits = Rc::new(Cell::new(0));

        let victim = {
            let hits = hits.clone();
            // Registered second, cancelled by the first callback during the same tick
            let slot: Rc<Cell<Option<FrameCallbackId>>> = Rc::new(Cell::new(None));
            let slot_clone = slot.clone();
            let frames_clone = frames.clone();
            frames.request(move |_| {
                if let Some(id) = slot_clone.get() {
                    frames_clone.cancel(id);
                }
            });
            let id = frames.request(move |_| hits.set(hits.get() + 1));
            slot.set(Some(id));
            id
        };

        frames.tick(0.016);
        frames.tick(0.016);

        assert_eq!(hits.get(), 0);
        assert!(!frames.is_scheduled(victim));
        assert_eq!(frames.len(), 1);
    }

    #[test]
    fn test_cancel_twice_is_harmless() {
        let frames = FrameLoop::new();
        let id = frames.request(|_| {});
        assert!(frames.cancel(id));
        assert!(!frames.cancel(id));
        assert!(frames.is_empty());
    }
}
