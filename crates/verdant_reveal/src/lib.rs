//! Verdant Scroll Reveal
//!
//! Smooth scrolling and scroll-scrubbed text reveals on top of the
//! `verdant_animation` trigger scheduler.
//!
//! # Entry points
//!
//! - [`setup`]: virtualize a container's scroll position
//! - [`bind`]: split a text element and attach the color sweep and word
//!   wave effects
//! - [`split`]: split text into word and character tokens
//!
//! All of them wait at most [`READY_WAIT`] for the engine modules and
//! quietly do nothing when the document is not interactive.
//!
//! # Example
//!
//! ```rust
//! use verdant_core::{Document, Rect, Size};
//! use verdant_reveal::{bind, setup, EngineConfig, Page};
//!
//! # tokio::runtime::Builder::new_current_thread().enable_time().build().unwrap().block_on(async {
//! let page = Page::new(Document::interactive(Size::new(1280.0, 800.0)));
//! page.load_modules(&EngineConfig::default()).await.unwrap();
//!
//! let container = page.document().create_element();
//! container.set_content_height(4000.0);
//! let text = page.document().create_element();
//! text.set_rect(Rect::new(0.0, 1600.0, 800.0, 48.0));
//! text.set_text("go green now");
//!
//! let scroll = setup(&page, Some(&container)).await.unwrap();
//! bind(&page, Some(&text), Some(&container)).await;
//!
//! container.set_scroll_top(1200.0);
//! for _ in 0..120 {
//!     page.tick(1.0 / 60.0);
//! }
//! scroll.dispose();
//! # });
//! ```

use std::sync::OnceLock;
use std::time::Duration;

use verdant_core::ReadinessGate;

pub mod adapter;
pub mod config;
pub mod modules;
pub mod page;
pub mod reveal;
pub mod smooth_scroll;
pub mod splitter;

pub use adapter::ScrollProxyAdapter;
pub use config::{
    ColorRevealConfig, ConfigError, EngineConfig, PhoneConfig, RevealConfig, ScrubSetting,
    SmoothScrollConfig, StaggerOrigin, TabletConfig, WordWaveConfig,
};
pub use modules::{EffectPlan, EngineModules};
pub use page::Page;
pub use reveal::{bind, try_bind, RevealBinding};
pub use smooth_scroll::{setup, try_setup, DeviceClass, ScrollState, ScrollTo, SmoothScroll};
pub use splitter::split;

/// Longest an entry point waits for the engine modules
pub const READY_WAIT: Duration = Duration::from_millis(100);

static ENGINE: OnceLock<ReadinessGate<EngineModules>> = OnceLock::new();

/// Process-wide readiness gate for the engine modules
pub fn engine_gate() -> &'static ReadinessGate<EngineModules> {
    ENGINE.get_or_init(ReadinessGate::new)
}
