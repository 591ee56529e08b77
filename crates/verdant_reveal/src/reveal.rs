//! Reveal animation binder
//!
//! Splits a text element and wires two independent scroll-scrubbed effects
//! to it:
//!
//! - a color sweep across every glyph, from the inherited text color to the
//!   accent color
//! - a word wave in which each word rises and fades in, trailing the scroll
//!   position slightly

use verdant_animation::TriggerId;
use verdant_core::{Element, EngineError, GlyphColor, Result};

use crate::page::Page;
use crate::splitter::split_element;
use crate::READY_WAIT;

/// Triggers registered by one binding
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RevealBinding {
    pub color_reveal: TriggerId,
    pub word_wave: TriggerId,
}

/// Bind the reveal effects to `text` scrolled by `scroller`
///
/// Does nothing if either element is absent, the document is not
/// interactive, or the engine is not ready after one bounded wait.
pub async fn bind(page: &Page, text: Option<&Element>, scroller: Option<&Element>) {
    if let Err(err) = try_bind(page, text, scroller).await {
        tracing::debug!(%err, "reveal binding skipped");
    }
}

/// [`bind`] returning the registered triggers or the reason it did nothing
pub async fn try_bind(
    page: &Page,
    text: Option<&Element>,
    scroller: Option<&Element>,
) -> Result<RevealBinding> {
    if !page.document().is_interactive() {
        return Err(EngineError::NoRuntime);
    }
    let (Some(text), Some(scroller)) = (text, scroller) else {
        return Err(EngineError::MissingInput);
    };
    let modules = page.gate().wait_ready(READY_WAIT).await?;

    let generation = split_element(text);
    text.with_tokens_mut(generation, |tokens| {
        for glyph in &mut tokens.glyphs {
            glyph.color = GlyphColor::Inherit;
        }
    });

    let mut triggers = page.triggers().borrow_mut();
    let binding = RevealBinding {
        color_reveal: triggers.create(modules.color_reveal.trigger(text, scroller)),
        word_wave: triggers.create(modules.word_wave.trigger(text, scroller)),
    };

    tracing::debug!(
        text = ?text.id(),
        scroller = ?scroller.id(),
        "reveal effects bound"
    );
    Ok(binding)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::EngineModules;
    use verdant_core::{Document, ReadinessGate, Rect, Size};

    async fn ready_page(document: Document) -> Page {
        let gate: &'static ReadinessGate<EngineModules> =
            Box::leak(Box::new(ReadinessGate::new()));
        gate.initialize(|| async { EngineModules::default() }).await;
        Page::with_gate(document, gate)
    }

    #[tokio::test]
    async fn test_bind_registers_two_triggers() {
        let page = ready_page(Document::interactive(Size::new(1280.0, 1000.0))).await;
        let scroller = page.document().create_element();
        let text = page.document().create_element();
        text.set_rect(Rect::new(0.0, 2000.0, 600.0, 40.0));
        text.set_text("go green now");

        let binding = try_bind(&page, Some(&text), Some(&scroller)).await.unwrap();
        assert_ne!(binding.color_reveal, binding.word_wave);
        assert_eq!(page.triggers().borrow().len(), 2);
        assert_eq!(text.tokens().unwrap().word_count(), 3);
        assert!(text
            .glyph_styles()
            .iter()
            .all(|glyph| glyph.color == GlyphColor::Inherit));
    }

    #[tokio::test]
    async fn test_bind_requires_both_elements() {
        let page = ready_page(Document::interactive(Size::new(1280.0, 1000.0))).await;
        let text = page.document().create_element();
        text.set_text("go");

        assert_eq!(
            try_bind(&page, Some(&text), None).await,
            Err(EngineError::MissingInput)
        );
        assert_eq!(
            try_bind(&page, None, Some(&text)).await,
            Err(EngineError::MissingInput)
        );
        assert!(text.tokens().is_none());
        assert!(page.triggers().borrow().is_empty());
    }

    #[tokio::test]
    async fn test_bind_headless_is_noop() {
        let page = ready_page(Document::headless()).await;
        let scroller = page.document().create_element();
        let text = page.document().create_element();
        text.set_text("go green now");

        bind(&page, Some(&text), Some(&scroller)).await;
        assert!(text.tokens().is_none());
        assert!(page.triggers().borrow().is_empty());
    }
}
