//! Verdant Animation System
//!
//! Easing curves, staggered token tweens, and scroll-trigger scheduling.
//!
//! # Features
//!
//! - **Easing**: polynomial, back-overshoot and cubic-bezier curves
//! - **Tweens**: from/to property tweens staggered across word or glyph tokens
//! - **Triggers**: scroll windows mapped to tween progress, with snap or
//!   lagged scrubbing
//! - **Scroller proxies**: any scroll backend plugs in through one trait

pub mod easing;
pub mod proxy;
pub mod trigger;
pub mod tween;

pub use easing::Easing;
pub use proxy::{NativeScroller, PinStrategy, ScrollerProxy};
pub use trigger::{ListenerId, ScrubMode, TriggerBounds, TriggerId, TriggerScheduler, TriggerSpec};
pub use tween::{Stagger, StaggerFrom, Tween, TweenProps, TweenTargets};
