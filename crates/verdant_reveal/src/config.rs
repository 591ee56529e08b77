//! Engine configuration (verdant.toml)
//!
//! Every section and field is optional; a missing file section falls back
//! to the built-in reveal look.
//!
//! ```toml
//! [scroll]
//! smooth = true
//! multiplier = 1.0
//! lerp = 0.1
//!
//! [scroll.phone]
//! smooth = false
//!
//! [reveal]
//! accent = "#22c55e"
//!
//! [reveal.wave]
//! scrub = 1.0
//! stagger_from = "center"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Config loading errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Top-level engine configuration
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub scroll: SmoothScrollConfig,
    #[serde(default)]
    pub reveal: RevealConfig,
}

impl EngineConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let source = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Range-check numeric fields
    ///
    /// Easing names and the accent color are checked when the config is
    /// compiled into engine modules.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let scroll = &self.scroll;
        if !(scroll.lerp > 0.0 && scroll.lerp <= 1.0) {
            return Err(invalid(format!(
                "scroll.lerp must be in (0, 1], got {}",
                scroll.lerp
            )));
        }
        if scroll.multiplier <= 0.0 {
            return Err(invalid(format!(
                "scroll.multiplier must be positive, got {}",
                scroll.multiplier
            )));
        }
        if scroll.phone.breakpoint > scroll.tablet.breakpoint {
            return Err(invalid(format!(
                "scroll.phone.breakpoint ({}) exceeds scroll.tablet.breakpoint ({})",
                scroll.phone.breakpoint, scroll.tablet.breakpoint
            )));
        }

        let color = &self.reveal.color;
        check_effect(
            "reveal.color",
            color.start,
            color.end,
            color.stagger,
            color.duration,
            color.scrub,
        )?;
        let wave = &self.reveal.wave;
        check_effect(
            "reveal.wave",
            wave.start,
            wave.end,
            wave.stagger,
            wave.duration,
            wave.scrub,
        )?;
        if !(0.0..=1.0).contains(&wave.from_opacity) {
            return Err(invalid(format!(
                "reveal.wave.from_opacity must be in [0, 1], got {}",
                wave.from_opacity
            )));
        }
        Ok(())
    }
}

fn invalid(message: String) -> ConfigError {
    ConfigError::Invalid(message)
}

fn check_effect(
    section: &str,
    start: f32,
    end: f32,
    stagger: f32,
    duration: f32,
    scrub: ScrubSetting,
) -> Result<(), ConfigError> {
    for (name, value) in [("start", start), ("end", end)] {
        if !(0.0..=1.0).contains(&value) {
            return Err(invalid(format!(
                "{section}.{name} must be a viewport fraction in [0, 1], got {value}"
            )));
        }
    }
    if stagger < 0.0 || duration < 0.0 {
        return Err(invalid(format!(
            "{section}: stagger and duration must not be negative"
        )));
    }
    match scrub {
        ScrubSetting::Snap(false) => {
            return Err(invalid(format!(
                "{section}.scrub must be true or a lag in seconds"
            )));
        }
        ScrubSetting::Lag(lag) if lag <= 0.0 => {
            return Err(invalid(format!(
                "{section}.scrub lag must be positive, got {lag}"
            )));
        }
        _ => {}
    }
    Ok(())
}

// =============================================================================
// Smooth scrolling
// =============================================================================

/// Smooth scroll controller settings
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SmoothScrollConfig {
    /// Interpolate scrolling on desktop-sized viewports
    #[serde(default = "default_true")]
    pub smooth: bool,
    /// Wheel delta multiplier
    #[serde(default = "default_multiplier")]
    pub multiplier: f32,
    /// Fraction of the remaining distance covered each frame
    #[serde(default = "default_lerp")]
    pub lerp: f32,
    #[serde(default)]
    pub tablet: TabletConfig,
    #[serde(default)]
    pub phone: PhoneConfig,
}

/// Tablet class override
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct TabletConfig {
    #[serde(default = "default_true")]
    pub smooth: bool,
    /// Viewports narrower than this (px) are at most tablets
    #[serde(default = "default_tablet_breakpoint")]
    pub breakpoint: f32,
}

impl Default for TabletConfig {
    fn default() -> Self {
        Self {
            smooth: true,
            breakpoint: default_tablet_breakpoint(),
        }
    }
}

/// Phone class override
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct PhoneConfig {
    #[serde(default = "default_true")]
    pub smooth: bool,
    /// Viewports narrower than this (px) are phones
    #[serde(default = "default_phone_breakpoint")]
    pub breakpoint: f32,
}

impl Default for PhoneConfig {
    fn default() -> Self {
        Self {
            smooth: true,
            breakpoint: default_phone_breakpoint(),
        }
    }
}

fn default_tablet_breakpoint() -> f32 {
    1024.0
}

fn default_phone_breakpoint() -> f32 {
    768.0
}

fn default_true() -> bool {
    true
}

fn default_multiplier() -> f32 {
    1.0
}

fn default_lerp() -> f32 {
    0.1
}

impl Default for SmoothScrollConfig {
    fn default() -> Self {
        Self {
            smooth: true,
            multiplier: default_multiplier(),
            lerp: default_lerp(),
            tablet: TabletConfig::default(),
            phone: PhoneConfig::default(),
        }
    }
}

// =============================================================================
// Reveal effects
// =============================================================================

/// How an effect's progress follows the scroll position
///
/// `scrub = true` follows exactly; `scrub = 1.0` trails by that many
/// seconds.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum ScrubSetting {
    Snap(bool),
    Lag(f32),
}

/// Which token starts a staggered effect first
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StaggerOrigin {
    #[default]
    Start,
    End,
    Center,
}

/// Text reveal settings
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RevealConfig {
    /// Final glyph color, `#rrggbb`
    #[serde(default = "default_accent")]
    pub accent: String,
    #[serde(default)]
    pub color: ColorRevealConfig,
    #[serde(default)]
    pub wave: WordWaveConfig,
}

fn default_accent() -> String {
    "#22c55e".to_string()
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            accent: default_accent(),
            color: ColorRevealConfig::default(),
            wave: WordWaveConfig::default(),
        }
    }
}

/// Glyph color sweep
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ColorRevealConfig {
    #[serde(default = "default_color_stagger")]
    pub stagger: f32,
    #[serde(default)]
    pub stagger_from: StaggerOrigin,
    #[serde(default = "default_color_duration")]
    pub duration: f32,
    #[serde(default = "default_color_ease")]
    pub ease: String,
    #[serde(default = "default_window_start")]
    pub start: f32,
    #[serde(default = "default_color_end")]
    pub end: f32,
    #[serde(default = "default_color_scrub")]
    pub scrub: ScrubSetting,
}

fn default_color_stagger() -> f32 {
    0.02
}

fn default_color_duration() -> f32 {
    0.2
}

fn default_color_ease() -> String {
    "power2.out".to_string()
}

fn default_window_start() -> f32 {
    0.8
}

fn default_color_end() -> f32 {
    0.2
}

fn default_color_scrub() -> ScrubSetting {
    ScrubSetting::Snap(true)
}

impl Default for ColorRevealConfig {
    fn default() -> Self {
        Self {
            stagger: default_color_stagger(),
            stagger_from: StaggerOrigin::Start,
            duration: default_color_duration(),
            ease: default_color_ease(),
            start: default_window_start(),
            end: default_color_end(),
            scrub: default_color_scrub(),
        }
    }
}

/// Per-word rise and fade
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct WordWaveConfig {
    /// Starting downward offset (px)
    #[serde(default = "default_wave_from_y")]
    pub from_y: f32,
    #[serde(default = "default_wave_from_opacity")]
    pub from_opacity: f32,
    #[serde(default = "default_wave_stagger")]
    pub stagger: f32,
    #[serde(default)]
    pub stagger_from: StaggerOrigin,
    #[serde(default = "default_wave_duration")]
    pub duration: f32,
    #[serde(default = "default_wave_ease")]
    pub ease: String,
    #[serde(default = "default_window_start")]
    pub start: f32,
    #[serde(default = "default_wave_end")]
    pub end: f32,
    #[serde(default = "default_wave_scrub")]
    pub scrub: ScrubSetting,
}

fn default_wave_from_y() -> f32 {
    10.0
}

fn default_wave_from_opacity() -> f32 {
    0.3
}

fn default_wave_stagger() -> f32 {
    0.1
}

fn default_wave_duration() -> f32 {
    0.5
}

fn default_wave_ease() -> String {
    "back.out(1.70158)".to_string()
}

fn default_wave_end() -> f32 {
    0.4
}

fn default_wave_scrub() -> ScrubSetting {
    ScrubSetting::Lag(1.0)
}

impl Default for WordWaveConfig {
    fn default() -> Self {
        Self {
            from_y: default_wave_from_y(),
            from_opacity: default_wave_from_opacity(),
            stagger: default_wave_stagger(),
            stagger_from: StaggerOrigin::Start,
            duration: default_wave_duration(),
            ease: default_wave_ease(),
            start: default_window_start(),
            end: default_wave_end(),
            scrub: default_wave_scrub(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = EngineConfig::from_toml_str("").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert!(config.scroll.smooth);
        assert_eq!(config.scroll.lerp, 0.1);
        assert_eq!(config.scroll.phone.breakpoint, 768.0);
        assert_eq!(config.scroll.tablet.breakpoint, 1024.0);
        assert_eq!(config.reveal.accent, "#22c55e");
        assert_eq!(config.reveal.color.scrub, ScrubSetting::Snap(true));
        assert_eq!(config.reveal.wave.scrub, ScrubSetting::Lag(1.0));
    }

    #[test]
    fn test_partial_sections() {
        let config = EngineConfig::from_toml_str(
            r##"
            [scroll]
            lerp = 0.25

            [scroll.phone]
            smooth = false
            breakpoint = 600.0

            [reveal]
            accent = "#ff0000"

            [reveal.wave]
            scrub = 2.5
            "##,
        )
        .unwrap();

        assert_eq!(config.scroll.lerp, 0.25);
        assert_eq!(config.scroll.multiplier, 1.0);
        assert!(!config.scroll.phone.smooth);
        assert_eq!(config.scroll.phone.breakpoint, 600.0);
        assert!(config.scroll.tablet.smooth);
        assert_eq!(config.reveal.accent, "#ff0000");
        assert_eq!(config.reveal.wave.scrub, ScrubSetting::Lag(2.5));
        assert_eq!(config.reveal.wave.duration, 0.5);
        assert_eq!(config.reveal.color, ColorRevealConfig::default());
    }

    #[test]
    fn test_device_sections_default_their_breakpoint() {
        let config = EngineConfig::from_toml_str("[scroll.phone]\nsmooth = false\n").unwrap();
        assert!(!config.scroll.phone.smooth);
        assert_eq!(config.scroll.phone.breakpoint, 768.0);

        let config = EngineConfig::from_toml_str("[scroll.tablet]\nsmooth = false\n").unwrap();
        assert!(!config.scroll.tablet.smooth);
        assert_eq!(config.scroll.tablet.breakpoint, 1024.0);
        assert_eq!(config.scroll.phone, PhoneConfig::default());
    }

    #[test]
    fn test_stagger_origin() {
        let config = EngineConfig::from_toml_str(
            r#"
            [reveal.color]
            stagger_from = "end"

            [reveal.wave]
            stagger_from = "center"
            "#,
        )
        .unwrap();
        assert_eq!(config.reveal.color.stagger_from, StaggerOrigin::End);
        assert_eq!(config.reveal.wave.stagger_from, StaggerOrigin::Center);
        assert_eq!(
            EngineConfig::default().reveal.wave.stagger_from,
            StaggerOrigin::Start
        );

        let err = EngineConfig::from_toml_str("[reveal.wave]\nstagger_from = \"middle\"\n")
            .unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_rejects_out_of_range_values() {
        let err = EngineConfig::from_toml_str("[scroll]\nlerp = 0.0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = EngineConfig::from_toml_str("[reveal.color]\nstart = 1.5\n").unwrap_err();
        assert!(err.to_string().contains("reveal.color.start"));

        let err = EngineConfig::from_toml_str("[reveal.wave]\nscrub = 0.0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_parse_error() {
        let err = EngineConfig::from_toml_str("[scroll\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = EngineConfig::load(Path::new("/nonexistent/verdant.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_to_toml_reparses() {
        let config = EngineConfig::default();
        let text = config.to_toml().unwrap();
        assert!(text.contains("[scroll.tablet]"));
        assert_eq!(EngineConfig::from_toml_str(&text).unwrap(), config);
    }
}
