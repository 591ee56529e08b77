//! Staggered token tweens
//!
//! A [`Tween`] animates one property set across every token of a kind
//! (all glyphs or all words) of a split element. Each target starts
//! `stagger` seconds after the previous one, so the tween's total length is
//! the largest stagger delay plus one target's duration.
//!
//! Tweens have no clock of their own: the scheduler maps scroll progress
//! (0.0 to 1.0) onto the tween's timeline and calls [`Tween::render`].

use verdant_core::{Color, Element, GlyphColor};

use crate::easing::Easing;

/// Which tokens of the element a tween animates
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TweenTargets {
    /// Word characters and separators
    Glyphs,
    /// Word wrappers
    Words,
}

/// Direction for stagger delays
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StaggerFrom {
    /// First target starts first
    #[default]
    Start,
    /// Last target starts first
    End,
    /// Middle target starts first, spreading outward
    Center,
}

/// Stagger configuration
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Stagger {
    /// Delay between consecutive targets (seconds)
    pub each: f32,
    pub from: StaggerFrom,
}

impl Stagger {
    pub fn each(each: f32) -> Self {
        Self {
            each,
            from: StaggerFrom::Start,
        }
    }

    pub fn from_end(mut self) -> Self {
        self.from = StaggerFrom::End;
        self
    }

    pub fn from_center(mut self) -> Self {
        self.from = StaggerFrom::Center;
        self
    }

    /// Start delay for a target index (seconds)
    pub fn delay_for_index(&self, index: usize, total: usize) -> f32 {
        let effective_index = match self.from {
            StaggerFrom::Start => index,
            StaggerFrom::End => total.saturating_sub(1).saturating_sub(index),
            StaggerFrom::Center => {
                let center = total / 2;
                center.abs_diff(index)
            }
        };
        self.each * effective_index as f32
    }
}

/// Animatable token properties; `None` leaves a property untouched
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TweenProps {
    pub color: Option<GlyphColor>,
    pub translate_y: Option<f32>,
    pub opacity: Option<f32>,
}

impl TweenProps {
    pub fn color(color: GlyphColor) -> Self {
        Self {
            color: Some(color),
            ..Default::default()
        }
    }

    pub fn with_translate_y(mut self, value: f32) -> Self {
        self.translate_y = Some(value);
        self
    }

    pub fn with_opacity(mut self, value: f32) -> Self {
        self.opacity = Some(value);
        self
    }
}

/// A staggered from/to tween over a token kind
#[derive(Clone, Debug, PartialEq)]
pub struct Tween {
    targets: TweenTargets,
    from: TweenProps,
    to: TweenProps,
    duration: f32,
    stagger: Stagger,
    easing: Easing,
}

impl Tween {
    /// Create a tween with a 0.5 s duration, no stagger and linear easing
    pub fn new(targets: TweenTargets) -> Self {
        Self {
            targets,
            from: TweenProps::default(),
            to: TweenProps::default(),
            duration: 0.5,
            stagger: Stagger::default(),
            easing: Easing::Linear,
        }
    }

    pub fn from(mut self, props: TweenProps) -> Self {
        self.from = props;
        self
    }

    pub fn to(mut self, props: TweenProps) -> Self {
        self.to = props;
        self
    }

    /// Per-target duration (seconds)
    pub fn duration(mut self, seconds: f32) -> Self {
        self.duration = seconds.max(0.0);
        self
    }

    pub fn stagger(mut self, stagger: Stagger) -> Self {
        self.stagger = stagger;
        self
    }

    pub fn ease(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    pub fn targets(&self) -> TweenTargets {
        self.targets
    }

    pub fn easing(&self) -> Easing {
        self.easing
    }

    /// Timeline length for `count` targets (seconds)
    pub fn total_duration(&self, count: usize) -> f32 {
        (0..count)
            .map(|i| self.stagger.delay_for_index(i, count))
            .fold(0.0, f32::max)
            + self.duration
    }

    /// Eased local progress of target `index` at overall `progress`
    pub fn target_progress(&self, index: usize, count: usize, progress: f32) -> f32 {
        if progress >= 1.0 {
            return 1.0;
        }
        let time = progress.max(0.0) * self.total_duration(count);
        let local_time = time - self.stagger.delay_for_index(index, count);

        let local = if self.duration <= 0.0 {
            if local_time >= 0.0 {
                1.0
            } else {
                0.0
            }
        } else {
            (local_time / self.duration).clamp(0.0, 1.0)
        };

        if local <= 0.0 || local >= 1.0 {
            local
        } else {
            self.easing.apply(local)
        }
    }

    /// Apply the tween at `progress` to the element's tokens
    ///
    /// Returns `false` if the element's tokens no longer belong to
    /// `generation` (the element was re-split or cleared).
    pub fn render(&self, element: &Element, generation: u64, progress: f32) -> bool {
        let inherited = element.style().color;

        element.with_tokens_mut(generation, |state| match self.targets {
            TweenTargets::Glyphs => {
                let count = state.glyphs.len();
                for (index, glyph) in state.glyphs.iter_mut().enumerate() {
                    let t = self.target_progress(index, count, progress);
                    if let Some(color) = self.color_at(inherited, t) {
                        glyph.color = color;
                    }
                }
            }
            TweenTargets::Words => {
                let count = state.words.len();
                for (index, word) in state.words.iter_mut().enumerate() {
                    let t = self.target_progress(index, count, progress);
                    if let Some(value) = lerp_opt(self.from.translate_y, self.to.translate_y, t) {
                        word.translate_y = value;
                    }
                    if let Some(value) = lerp_opt(self.from.opacity, self.to.opacity, t) {
                        word.opacity = value.clamp(0.0, 1.0);
                    }
                }
            }
        })
    }

    fn color_at(&self, inherited: Color, t: f32) -> Option<GlyphColor> {
        let (from, to) = match (self.from.color, self.to.color) {
            (None, None) => return None,
            (from, to) => (
                from.unwrap_or(GlyphColor::Inherit),
                to.unwrap_or(GlyphColor::Inherit),
            ),
        };

        if t <= 0.0 {
            return Some(from);
        }
        if t >= 1.0 {
            return Some(to);
        }

        let resolve = |color: GlyphColor| match color {
            GlyphColor::Inherit => inherited,
            GlyphColor::Rgba(color) => color,
        };
        Some(GlyphColor::Rgba(resolve(from).lerp(&resolve(to), t.clamp(0.0, 1.0))))
    }
}

fn lerp_opt(a: Option<f32>, b: Option<f32>, t: f32) -> Option<f32> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a + (b - a) * t),
        (None, Some(b)) => Some(b),
        (Some(a), None) => Some(a),
        (None, None) => None,
    }
}
