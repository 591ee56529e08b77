//! Verdant Core
//!
//! Headless scene primitives for the Verdant scroll-reveal engine:
//!
//! - **Elements**: shared handles carrying layout rect, style, native scroll
//!   position and a token view-model
//! - **Tokens**: immutable word/character decomposition of a text block
//! - **Frame Loop**: per-display-frame callbacks driven by the host
//! - **Readiness Gate**: a single async initialization that many callers await
//!
//! # Example
//!
//! ```rust
//! use verdant_core::{Document, Rect, Size};
//!
//! let document = Document::interactive(Size::new(1280.0, 800.0));
//! let heading = document.create_element();
//! heading.set_rect(Rect::new(0.0, 1200.0, 600.0, 48.0));
//! heading.set_text("go green now");
//!
//! assert_eq!(heading.text_content(), "go green now");
//! ```

pub mod color;
pub mod document;
pub mod element;
pub mod error;
pub mod frame;
pub mod gate;
pub mod geometry;
pub mod tokens;

pub use color::Color;
pub use document::{Document, Viewport, WeakViewport};
pub use element::{
    Element, ElementId, ElementStyle, GlyphColor, GlyphStyle, TokenState, Transform, WeakElement,
    WordStyle,
};
pub use error::{EngineError, Result};
pub use frame::{FrameCallbackId, FrameLoop};
pub use gate::ReadinessGate;
pub use geometry::{Point, Rect, Size};
pub use tokens::{Segment, Token, TokenKind, TokenList, WordToken, SEPARATOR};
