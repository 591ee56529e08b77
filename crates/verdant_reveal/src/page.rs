//! Page host
//!
//! A [`Page`] bundles what the engine entry points share: the document, the
//! trigger scheduler and the readiness gate for engine modules. The host
//! drives it by calling [`Page::tick`] once per frame.

use std::cell::RefCell;
use std::rc::Rc;

use verdant_animation::TriggerScheduler;
use verdant_core::{Document, ReadinessGate, Size};

use crate::config::{ConfigError, EngineConfig};
use crate::modules::EngineModules;
use crate::engine_gate;

pub struct Page {
    document: Rc<Document>,
    triggers: Rc<RefCell<TriggerScheduler>>,
    gate: &'static ReadinessGate<EngineModules>,
}

impl Page {
    /// Host `document` using the process-wide engine gate
    pub fn new(document: Document) -> Self {
        Self::with_gate(document, engine_gate())
    }

    /// Host `document` with an explicit gate
    pub fn with_gate(
        document: Document,
        gate: &'static ReadinessGate<EngineModules>,
    ) -> Self {
        let triggers = TriggerScheduler::new(document.viewport().downgrade());
        Self {
            document: Rc::new(document),
            triggers: Rc::new(RefCell::new(triggers)),
            gate,
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub(crate) fn document_rc(&self) -> &Rc<Document> {
        &self.document
    }

    pub fn triggers(&self) -> &Rc<RefCell<TriggerScheduler>> {
        &self.triggers
    }

    pub fn gate(&self) -> &'static ReadinessGate<EngineModules> {
        self.gate
    }

    /// Compile `config` and publish the engine modules through the gate
    ///
    /// The first successful load wins; later calls return the modules that
    /// are already loaded and ignore their config.
    pub async fn load_modules(
        &self,
        config: &EngineConfig,
    ) -> Result<&'static EngineModules, ConfigError> {
        if let Some(modules) = self.gate.get() {
            return Ok(modules);
        }
        let modules = EngineModules::compile(config)?;
        Ok(self.gate.initialize(|| async move { modules }).await)
    }

    /// Advance one frame
    ///
    /// Frame callbacks (scroll interpolation) run first so triggers read
    /// this frame's scroll offsets.
    pub fn tick(&self, dt: f32) {
        self.document.frames().tick(dt);
        self.triggers.borrow_mut().update(dt);
    }

    /// Recompute every trigger against current layout
    pub fn refresh(&self) {
        self.triggers.borrow_mut().refresh();
    }

    /// Resize the viewport and refresh
    pub fn resize(&self, size: Size) {
        self.document.viewport().set_size(size);
        tracing::debug!(width = size.width, height = size.height, "viewport resized");
        self.refresh();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use verdant_core::Rect;

    fn leaked_gate() -> &'static ReadinessGate<EngineModules> {
        Box::leak(Box::new(ReadinessGate::new()))
    }

    #[test]
    fn test_tick_runs_frames_before_triggers() {
        let page = Page::with_gate(Document::interactive(Size::new(800.0, 600.0)), leaked_gate());
        let ticks = Rc::new(Cell::new(0));
        let counter = ticks.clone();
        page.document().frames().request(move |_| counter.set(counter.get() + 1));

        page.tick(1.0 / 60.0);
        page.tick(1.0 / 60.0);
        assert_eq!(ticks.get(), 2);
        assert_eq!(page.document().frames().frame_count(), 2);
    }

    #[test]
    fn test_resize_refreshes_listeners() {
        let page = Page::with_gate(Document::interactive(Size::new(800.0, 600.0)), leaked_gate());
        let seen = Rc::new(Cell::new(Rect::ZERO));
        let viewport = page.document().viewport().clone();
        let sink = seen.clone();
        page.triggers()
            .borrow_mut()
            .on_refresh(move || sink.set(viewport.size().to_rect()));

        page.resize(Size::new(400.0, 900.0));
        assert_eq!(seen.get(), Rect::new(0.0, 0.0, 400.0, 900.0));
    }

    #[tokio::test]
    async fn test_load_modules_once() {
        let page = Page::with_gate(Document::interactive(Size::new(800.0, 600.0)), leaked_gate());
        assert!(!page.gate().is_ready());

        let mut config = EngineConfig::default();
        config.reveal.accent = "#ff0000".to_string();
        let first = page.load_modules(&config).await.unwrap();
        assert!(page.gate().is_ready());

        let second = page.load_modules(&EngineConfig::default()).await.unwrap();
        assert_eq!(first.accent, second.accent);
    }

    #[tokio::test]
    async fn test_load_modules_rejects_bad_config() {
        let page = Page::with_gate(Document::interactive(Size::new(800.0, 600.0)), leaked_gate());
        let mut config = EngineConfig::default();
        config.reveal.color.ease = "wobble".to_string();

        assert!(page.load_modules(&config).await.is_err());
        assert!(!page.gate().is_ready());
    }
}
