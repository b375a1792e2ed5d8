//! Application settings read from a TOML file.
//!
//! Every table and key is optional. [`AppConfig::load`] never fails: a
//! missing file gives the defaults, and an unreadable or malformed one is
//! reported with a warning before falling back to the defaults. Values that
//! would break an invariant elsewhere are reset by [`AppConfig::sanitised`].

use crate::controllers::session::presets::{
    DEFAULT_ITERATION_INDEX, DEFAULT_QUALITY_INDEX, IterationPreset, QualityPreset,
    default_iteration_presets, default_quality_presets,
};
use crate::core::colour_mapping::smooth_hsv::ColourSettings;
use crate::core::data::complex::Complex;
use crate::core::data::fractal_params::DEFAULT_JULIA_CONSTANT;
use crate::core::util::display_mapping::FitMode;
use crate::storage::history::DEFAULT_HISTORY_CAPACITY;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_CONFIG_FILE: &str = "config.toml";
const DEFAULT_DATA_DIRECTORY: &str = "fractals";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub default_quality: usize,
    pub max_history_states: usize,
    pub show_panel_on_startup: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            default_quality: DEFAULT_QUALITY_INDEX,
            max_history_states: DEFAULT_HISTORY_CAPACITY,
            show_panel_on_startup: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FractalConfig {
    pub initial_center_x: f64,
    pub initial_center_y: f64,
    pub initial_scale: f64,
    pub zoom_factor: f64,
    pub julia_constant_real: f64,
    pub julia_constant_imag: f64,
}

impl Default for FractalConfig {
    fn default() -> Self {
        Self {
            initial_center_x: -0.5,
            initial_center_y: 0.0,
            initial_scale: 3.0,
            zoom_factor: 3.0,
            julia_constant_real: DEFAULT_JULIA_CONSTANT.real,
            julia_constant_imag: DEFAULT_JULIA_CONSTANT.imag,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct QualityPresetsConfig {
    pub preset: Vec<QualityPreset>,
}

impl Default for QualityPresetsConfig {
    fn default() -> Self {
        Self {
            preset: default_quality_presets(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct IterationPresetsConfig {
    pub default_index: usize,
    pub preset: Vec<IterationPreset>,
}

impl Default for IterationPresetsConfig {
    fn default() -> Self {
        Self {
            default_index: DEFAULT_ITERATION_INDEX,
            preset: default_iteration_presets(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RenderingConfig {
    pub refresh_every_n_lines: u32,
    pub show_progress: bool,
    pub pause_poll_interval_ms: u64,
    pub display_fit: FitMode,
}

impl Default for RenderingConfig {
    fn default() -> Self {
        Self {
            refresh_every_n_lines: 5,
            show_progress: true,
            pause_poll_interval_ms: 100,
            display_fit: FitMode::Fit,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ColorsConfig {
    pub saturation: f64,
    pub value: f64,
    pub hue_multiplier: f64,
}

impl Default for ColorsConfig {
    fn default() -> Self {
        let defaults = ColourSettings::default();
        Self {
            saturation: defaults.saturation,
            value: defaults.value,
            hue_multiplier: defaults.hue_multiplier,
        }
    }
}

/// Empty strings mean "use the default under `./fractals/`".
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub log_directory: String,
    pub history_directory: String,
    pub export_directory: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub enabled: bool,
    pub level: String,
    pub retention_days: u32,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level: "INFO".to_string(),
            retention_days: 30,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub general: GeneralConfig,
    #[serde(alias = "fractale")]
    pub fractal: FractalConfig,
    pub quality_presets: QualityPresetsConfig,
    pub iteration_presets: IterationPresetsConfig,
    pub rendering: RenderingConfig,
    pub colors: ColorsConfig,
    pub paths: PathsConfig,
    pub logging: LoggingConfig,
}

impl AppConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        Ok(config.sanitised())
    }

    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Reads `path`, falling back to the defaults on any problem.
    #[must_use]
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            tracing::info!(path = %path.display(), "no configuration file, using defaults");
            return Self::default();
        }

        match Self::from_toml_file(path) {
            Ok(config) => {
                tracing::info!(path = %path.display(), "configuration loaded");
                config
            }
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "invalid configuration, using defaults");
                Self::default()
            }
        }
    }

    /// Resets values that cannot be used as-is to their defaults.
    #[must_use]
    pub fn sanitised(mut self) -> Self {
        let defaults = Self::default();

        if self.general.max_history_states == 0 {
            self.general.max_history_states = defaults.general.max_history_states;
        }

        let fractal = &mut self.fractal;
        for (value, default) in [
            (&mut fractal.initial_center_x, defaults.fractal.initial_center_x),
            (&mut fractal.initial_center_y, defaults.fractal.initial_center_y),
            (&mut fractal.julia_constant_real, defaults.fractal.julia_constant_real),
            (&mut fractal.julia_constant_imag, defaults.fractal.julia_constant_imag),
        ] {
            if !value.is_finite() {
                *value = default;
            }
        }
        if !is_positive(fractal.initial_scale) {
            fractal.initial_scale = defaults.fractal.initial_scale;
        }
        if !is_positive(fractal.zoom_factor) {
            fractal.zoom_factor = defaults.fractal.zoom_factor;
        }

        self.quality_presets
            .preset
            .retain(|p| p.use_screen_resolution || (p.width > 0 && p.height > 0));
        if self.quality_presets.preset.is_empty() {
            self.quality_presets.preset = defaults.quality_presets.preset;
        }
        self.general.default_quality = self
            .general
            .default_quality
            .min(self.quality_presets.preset.len() - 1);

        self.iteration_presets.preset.retain(|p| p.max_iterations > 0);
        if self.iteration_presets.preset.is_empty() {
            self.iteration_presets.preset = defaults.iteration_presets.preset;
        }
        self.iteration_presets.default_index = self
            .iteration_presets
            .default_index
            .min(self.iteration_presets.preset.len() - 1);

        if self.rendering.refresh_every_n_lines == 0 {
            self.rendering.refresh_every_n_lines = defaults.rendering.refresh_every_n_lines;
        }
        if self.rendering.pause_poll_interval_ms == 0 {
            self.rendering.pause_poll_interval_ms = defaults.rendering.pause_poll_interval_ms;
        }

        let colors = &mut self.colors;
        colors.saturation = unit_or(colors.saturation, defaults.colors.saturation);
        colors.value = unit_or(colors.value, defaults.colors.value);
        if !colors.hue_multiplier.is_finite() {
            colors.hue_multiplier = defaults.colors.hue_multiplier;
        }

        self
    }

    #[must_use]
    pub fn initial_center(&self) -> Complex {
        Complex::new(self.fractal.initial_center_x, self.fractal.initial_center_y)
    }

    #[must_use]
    pub fn julia_constant(&self) -> Complex {
        Complex::new(
            self.fractal.julia_constant_real,
            self.fractal.julia_constant_imag,
        )
    }

    #[must_use]
    pub fn colour_settings(&self) -> ColourSettings {
        ColourSettings {
            saturation: self.colors.saturation,
            value: self.colors.value,
            hue_multiplier: self.colors.hue_multiplier,
        }
    }

    #[must_use]
    pub fn pause_poll_interval(&self) -> Duration {
        Duration::from_millis(self.rendering.pause_poll_interval_ms)
    }

    #[must_use]
    pub fn log_directory(&self) -> PathBuf {
        directory_or_default(&self.paths.log_directory, "logs")
    }

    #[must_use]
    pub fn history_directory(&self) -> PathBuf {
        directory_or_default(&self.paths.history_directory, "history")
    }

    #[must_use]
    pub fn export_directory(&self) -> PathBuf {
        directory_or_default(&self.paths.export_directory, "exports")
    }
}

fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

fn unit_or(value: f64, default: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        default
    }
}

fn directory_or_default(configured: &str, leaf: &str) -> PathBuf {
    let trimmed = configured.trim();
    if trimmed.is_empty() {
        Path::new(DEFAULT_DATA_DIRECTORY).join(leaf)
    } else {
        PathBuf::from(trimmed)
    }
}
