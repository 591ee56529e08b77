//! Engine modules
//!
//! The pieces every entry point needs once the engine is ready: smooth
//! scroll settings plus the two reveal effects compiled from config into
//! ready-to-register tweens. They are built once and published through the
//! engine's readiness gate.

use verdant_animation::{
    Easing, ScrubMode, Stagger, TriggerSpec, Tween, TweenProps, TweenTargets,
};
use verdant_core::{Color, Element, GlyphColor};

use crate::config::{
    ConfigError, EngineConfig, ScrubSetting, SmoothScrollConfig, StaggerOrigin,
};

/// A compiled scroll-triggered effect
#[derive(Clone, Debug, PartialEq)]
pub struct EffectPlan {
    pub tween: Tween,
    /// Viewport fraction where the ramp begins
    pub start: f32,
    /// Viewport fraction where the ramp completes
    pub end: f32,
    pub scrub: ScrubMode,
}

impl EffectPlan {
    /// Trigger registration for `target` scrolled by `scroller`
    pub fn trigger(&self, target: &Element, scroller: &Element) -> TriggerSpec {
        TriggerSpec {
            target: target.clone(),
            scroller: scroller.clone(),
            start: self.start,
            end: self.end,
            scrub: self.scrub,
            tween: self.tween.clone(),
        }
    }
}

/// Everything the engine entry points depend on
#[derive(Clone, Debug, PartialEq)]
pub struct EngineModules {
    pub scroll: SmoothScrollConfig,
    pub accent: Color,
    pub color_reveal: EffectPlan,
    pub word_wave: EffectPlan,
}

impl EngineModules {
    /// Validate `config` and build the reveal effects
    pub fn compile(config: &EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let reveal = &config.reveal;

        let accent = Color::parse_hex(&reveal.accent).ok_or_else(|| {
            ConfigError::Invalid(format!("reveal.accent is not a hex color: {}", reveal.accent))
        })?;

        let color = &reveal.color;
        let color_reveal = EffectPlan {
            tween: Tween::new(TweenTargets::Glyphs)
                .from(TweenProps::color(GlyphColor::Inherit))
                .to(TweenProps::color(GlyphColor::Rgba(accent)))
                .duration(color.duration)
                .stagger(stagger(color.stagger, color.stagger_from))
                .ease(easing("reveal.color.ease", &color.ease)?),
            start: color.start,
            end: color.end,
            scrub: scrub_mode(color.scrub),
        };

        let wave = &reveal.wave;
        let word_wave = EffectPlan {
            tween: Tween::new(TweenTargets::Words)
                .from(
                    TweenProps::default()
                        .with_translate_y(wave.from_y)
                        .with_opacity(wave.from_opacity),
                )
                .to(TweenProps::default().with_translate_y(0.0).with_opacity(1.0))
                .duration(wave.duration)
                .stagger(stagger(wave.stagger, wave.stagger_from))
                .ease(easing("reveal.wave.ease", &wave.ease)?),
            start: wave.start,
            end: wave.end,
            scrub: scrub_mode(wave.scrub),
        };

        Ok(Self {
            scroll: config.scroll.clone(),
            accent,
            color_reveal,
            word_wave,
        })
    }
}

impl Default for EngineModules {
    fn default() -> Self {
        Self {
            scroll: SmoothScrollConfig::default(),
            accent: Color::from_hex(0x22c55e),
            color_reveal: EffectPlan {
                tween: Tween::new(TweenTargets::Glyphs)
                    .from(TweenProps::color(GlyphColor::Inherit))
                    .to(TweenProps::color(GlyphColor::Rgba(Color::from_hex(0x22c55e))))
                    .duration(0.2)
                    .stagger(Stagger::each(0.02))
                    .ease(Easing::EaseOutCubic),
                start: 0.8,
                end: 0.2,
                scrub: ScrubMode::Snap,
            },
            word_wave: EffectPlan {
                tween: Tween::new(TweenTargets::Words)
                    .from(TweenProps::default().with_translate_y(10.0).with_opacity(0.3))
                    .to(TweenProps::default().with_translate_y(0.0).with_opacity(1.0))
                    .duration(0.5)
                    .stagger(Stagger::each(0.1))
                    .ease(Easing::EaseOutBack(verdant_animation::easing::BACK_OVERSHOOT)),
                start: 0.8,
                end: 0.4,
                scrub: ScrubMode::Lag(1.0),
            },
        }
    }
}

fn easing(field: &str, name: &str) -> Result<Easing, ConfigError> {
    Easing::from_name(name)
        .ok_or_else(|| ConfigError::Invalid(format!("{field}: unknown easing {name:?}")))
}

fn stagger(each: f32, origin: StaggerOrigin) -> Stagger {
    let stagger = Stagger::each(each);
    match origin {
        StaggerOrigin::Start => stagger,
        StaggerOrigin::End => stagger.from_end(),
        StaggerOrigin::Center => stagger.from_center(),
    }
}

fn scrub_mode(setting: ScrubSetting) -> ScrubMode {
    match setting {
        ScrubSetting::Snap(_) => ScrubMode::Snap,
        ScrubSetting::Lag(lag) => ScrubMode::Lag(lag),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_compiles_to_defaults() {
        let modules = EngineModules::compile(&EngineConfig::default()).unwrap();
        assert_eq!(modules, EngineModules::default());
    }

    #[test]
    fn test_effect_settings() {
        let modules = EngineModules::default();

        let color = &modules.color_reveal;
        assert_eq!(color.tween.targets(), TweenTargets::Glyphs);
        assert_eq!(color.tween.easing(), Easing::EaseOutCubic);
        assert_eq!((color.start, color.end), (0.8, 0.2));
        assert_eq!(color.scrub, ScrubMode::Snap);

        let wave = &modules.word_wave;
        assert_eq!(wave.tween.targets(), TweenTargets::Words);
        assert_eq!(wave.tween.easing(), Easing::EaseOutBack(1.70158));
        assert_eq!((wave.start, wave.end), (0.8, 0.4));
        assert_eq!(wave.scrub, ScrubMode::Lag(1.0));
        // Three words: 0.2s of stagger plus one 0.5s duration
        assert!((wave.tween.total_duration(3) - 0.7).abs() < 1e-6);
    }

    #[test]
    fn test_bad_accent_and_easing() {
        let mut config = EngineConfig::default();
        config.reveal.accent = "green".to_string();
        assert!(matches!(
            EngineModules::compile(&config),
            Err(ConfigError::Invalid(_))
        ));

        let mut config = EngineConfig::default();
        config.reveal.wave.ease = "elastic.out".to_string();
        let err = EngineModules::compile(&config).unwrap_err();
        assert!(err.to_string().contains("reveal.wave.ease"));
    }

    #[test]
    fn test_stagger_origin_reverses_word_order() {
        let mut config = EngineConfig::default();
        config.reveal.wave.stagger_from = StaggerOrigin::End;
        let modules = EngineModules::compile(&config).unwrap();
        let tween = &modules.word_wave.tween;

        // 0.1s into a 0.7s timeline only the last word has started
        let progress = 0.1 / 0.7;
        assert!(tween.target_progress(2, 3, progress) > 0.0);
        assert_eq!(tween.target_progress(0, 3, progress), 0.0);

        config.reveal.wave.stagger_from = StaggerOrigin::Center;
        let modules = EngineModules::compile(&config).unwrap();
        let tween = &modules.word_wave.tween;
        assert!(tween.target_progress(1, 3, progress) > 0.0);
        assert_eq!(tween.target_progress(0, 3, progress), 0.0);
        assert_eq!(tween.target_progress(2, 3, progress), 0.0);
    }

    #[test]
    fn test_cubic_bezier_ease_name() {
        let mut config = EngineConfig::default();
        config.reveal.color.ease = "cubic-bezier(0.25, 0.1, 0.25, 1.0)".to_string();
        let modules = EngineModules::compile(&config).unwrap();
        assert_eq!(
            modules.color_reveal.tween.easing(),
            Easing::CubicBezier(0.25, 0.1, 0.25, 1.0)
        );
    }

    #[test]
    fn test_custom_accent() {
        let mut config = EngineConfig::default();
        config.reveal.accent = "#ff0000".to_string();
        let modules = EngineModules::compile(&config).unwrap();
        assert_eq!(modules.accent, Color::from_hex(0xff0000));
    }
}
