//! Element handles
//!
//! An [`Element`] is a cheap, clonable handle onto a node owned by the
//! hosting page. The engine never creates layout; the host sets rects,
//! content heights and native scroll positions, and the engine reads them.
//!
//! Text elements carry an optional [`TokenState`]: the token view-model plus
//! per-token render styles. Replacing tokens bumps a generation counter so
//! that anything still holding the previous generation stops applying.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::color::Color;
use crate::geometry::Rect;
use crate::tokens::{escape_markup, TokenList};

/// Stable element identifier, unique within a document
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub u64);

/// 2D translation applied to an element
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Transform {
    pub translate_x: f32,
    pub translate_y: f32,
}

impl Transform {
    pub fn translate(x: f32, y: f32) -> Self {
        Self {
            translate_x: x,
            translate_y: y,
        }
    }
}

/// Element-level style
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ElementStyle {
    /// Text color inherited by glyphs styled `Inherit`
    pub color: Color,
    /// Active transform-based positioning, if any
    pub transform: Option<Transform>,
}

/// Glyph color: either inherited from the element or explicit
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum GlyphColor {
    #[default]
    Inherit,
    Rgba(Color),
}

/// Render state of one glyph (word character or separator)
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GlyphStyle {
    pub color: GlyphColor,
}

/// Render state of one word wrapper
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WordStyle {
    pub translate_y: f32,
    pub opacity: f32,
}

impl Default for WordStyle {
    fn default() -> Self {
        Self {
            translate_y: 0.0,
            opacity: 1.0,
        }
    }
}

/// Token view-model and the render state keyed by it
#[derive(Clone, Debug)]
pub struct TokenState {
    pub list: Rc<TokenList>,
    pub generation: u64,
    /// One entry per glyph, in `TokenList::glyphs` order
    pub glyphs: Vec<GlyphStyle>,
    /// One entry per word, in `TokenList::words` order
    pub words: Vec<WordStyle>,
}

#[derive(Debug)]
struct ElementData {
    id: ElementId,
    rect: Rect,
    style: ElementStyle,
    scroll_top: f32,
    content_height: f32,
    text: String,
    generation: u64,
    tokens: Option<TokenState>,
}

/// Shared handle to a host element
#[derive(Clone, Debug)]
pub struct Element {
    inner: Rc<RefCell<ElementData>>,
}

/// Non-owning element reference
#[derive(Clone, Debug, Default)]
pub struct WeakElement {
    inner: Weak<RefCell<ElementData>>,
}

impl WeakElement {
    pub fn upgrade(&self) -> Option<Element> {
        self.inner.upgrade().map(|inner| Element { inner })
    }
}

impl PartialEq for Element {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for Element {}

impl Element {
    /// Create a detached element. Hosts normally go through
    /// `Document::create_element` so ids stay unique.
    pub fn new(id: ElementId) -> Self {
        Self {
            inner: Rc::new(RefCell::new(ElementData {
                id,
                rect: Rect::ZERO,
                style: ElementStyle::default(),
                scroll_top: 0.0,
                content_height: 0.0,
                text: String::new(),
                generation: 0,
                tokens: None,
            })),
        }
    }

    pub fn id(&self) -> ElementId {
        self.inner.borrow().id
    }

    pub fn downgrade(&self) -> WeakElement {
        WeakElement {
            inner: Rc::downgrade(&self.inner),
        }
    }

    // =========================================================================
    // Layout
    // =========================================================================

    pub fn rect(&self) -> Rect {
        self.inner.borrow().rect
    }

    pub fn set_rect(&self, rect: Rect) {
        self.inner.borrow_mut().rect = rect;
    }

    /// Native scroll position when this element is a scroll container
    pub fn scroll_top(&self) -> f32 {
        self.inner.borrow().scroll_top
    }

    pub fn set_scroll_top(&self, offset: f32) {
        self.inner.borrow_mut().scroll_top = offset;
    }

    /// Total height of the scrollable content
    pub fn content_height(&self) -> f32 {
        self.inner.borrow().content_height
    }

    pub fn set_content_height(&self, height: f32) {
        self.inner.borrow_mut().content_height = height;
    }

    // =========================================================================
    // Style
    // =========================================================================

    pub fn style(&self) -> ElementStyle {
        self.inner.borrow().style
    }

    pub fn set_color(&self, color: Color) {
        self.inner.borrow_mut().style.color = color;
    }

    pub fn set_transform(&self, transform: Option<Transform>) {
        self.inner.borrow_mut().style.transform = transform;
    }

    /// Whether the element currently uses transform-based positioning
    pub fn has_transform(&self) -> bool {
        self.inner.borrow().style.transform.is_some()
    }

    // =========================================================================
    // Content
    // =========================================================================

    /// Replace content with plain text, discarding any tokens
    pub fn set_text(&self, text: impl Into<String>) {
        let mut data = self.inner.borrow_mut();
        data.text = text.into();
        if data.tokens.take().is_some() {
            data.generation += 1;
        }
    }

    /// Logical text content
    ///
    /// Tokenized elements report their words joined by plain spaces, so the
    /// result is independent of how many times the element was split.
    pub fn text_content(&self) -> String {
        let data = self.inner.borrow();
        match &data.tokens {
            Some(tokens) => tokens.list.logical_text(),
            None => data.text.clone(),
        }
    }

    /// Rendered markup of the element's content
    pub fn markup(&self) -> String {
        let data = self.inner.borrow();
        match &data.tokens {
            Some(tokens) => tokens.list.to_markup(),
            None => escape_markup(&data.text),
        }
    }

    /// Replace the content with a token list
    ///
    /// All previous token render state is dropped and the generation bumps.
    /// Returns the new generation.
    pub fn replace_tokens(&self, list: TokenList) -> u64 {
        let mut data = self.inner.borrow_mut();
        data.generation += 1;
        let generation = data.generation;
        data.text = list.logical_text();
        data.tokens = Some(TokenState {
            glyphs: vec![GlyphStyle::default(); list.glyph_count()],
            words: vec![WordStyle::default(); list.word_count()],
            list: Rc::new(list),
            generation,
        });
        generation
    }

    pub fn tokens(&self) -> Option<Rc<TokenList>> {
        self.inner.borrow().tokens.as_ref().map(|t| t.list.clone())
    }

    /// Current token generation (0 until the first split)
    pub fn token_generation(&self) -> u64 {
        self.inner.borrow().generation
    }

    pub fn glyph_styles(&self) -> Vec<GlyphStyle> {
        self.inner
            .borrow()
            .tokens
            .as_ref()
            .map(|t| t.glyphs.clone())
            .unwrap_or_default()
    }

    pub fn word_styles(&self) -> Vec<WordStyle> {
        self.inner
            .borrow()
            .tokens
            .as_ref()
            .map(|t| t.words.clone())
            .unwrap_or_default()
    }

    /// Mutate token render state if it still belongs to `generation`
    ///
    /// Returns `false` (and does nothing) when the element was re-split or
    /// cleared since the caller captured the generation.
    pub fn with_tokens_mut(&self, generation: u64, f: impl FnOnce(&mut TokenState)) -> bool {
        let mut data = self.inner.borrow_mut();
        match data.tokens.as_mut() {
            Some(tokens) if tokens.generation == generation => {
                f(tokens);
                true
            }
            _ => false,
        }
    }
}
