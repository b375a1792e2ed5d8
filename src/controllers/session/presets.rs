use serde::Deserialize;

pub const FALLBACK_DISPLAY_RESOLUTION: (u32, u32) = (1920, 1080);
pub const DEFAULT_QUALITY_INDEX: usize = 1;
pub const DEFAULT_ITERATION_INDEX: usize = 1;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct QualityPreset {
    pub name: String,
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    /// Informational; the iteration preset decides the cap.
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,
    /// Render at the display size instead of `width` x `height`.
    #[serde(default)]
    pub use_screen_resolution: bool,
}

fn default_width() -> u32 {
    FALLBACK_DISPLAY_RESOLUTION.0
}

fn default_height() -> u32 {
    FALLBACK_DISPLAY_RESOLUTION.1
}

fn default_max_iterations() -> u32 {
    300
}

impl QualityPreset {
    #[must_use]
    pub fn new(name: &str, width: u32, height: u32, max_iterations: u32) -> Self {
        Self {
            name: name.to_string(),
            width,
            height,
            max_iterations,
            use_screen_resolution: false,
        }
    }

    #[must_use]
    pub fn resolution(&self, display: (u32, u32)) -> (u32, u32) {
        if self.use_screen_resolution {
            display
        } else {
            (self.width, self.height)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IterationPreset {
    pub name: String,
    pub max_iterations: u32,
}

impl IterationPreset {
    #[must_use]
    pub fn new(name: &str, max_iterations: u32) -> Self {
        Self {
            name: name.to_string(),
            max_iterations,
        }
    }
}

#[must_use]
pub fn default_quality_presets() -> Vec<QualityPreset> {
    vec![
        QualityPreset::new("Fast", 1280, 720, 150),
        QualityPreset {
            use_screen_resolution: true,
            ..QualityPreset::new("Normal", 1920, 1080, 300)
        },
        QualityPreset::new("High", 2560, 1440, 500),
        QualityPreset::new("Ultra", 3840, 2160, 1000),
        QualityPreset::new("Extreme", 7680, 4320, 2000),
    ]
}

#[must_use]
pub fn default_iteration_presets() -> Vec<IterationPreset> {
    vec![
        IterationPreset::new("Very fast", 100),
        IterationPreset::new("Fast", 300),
        IterationPreset::new("Normal", 500),
        IterationPreset::new("Detailed", 1000),
        IterationPreset::new("Very detailed", 2000),
    ]
}

/// Resolution and iteration presets with the currently selected index of each.
#[derive(Debug, Clone, PartialEq)]
pub struct PresetManager {
    quality_presets: Vec<QualityPreset>,
    iteration_presets: Vec<IterationPreset>,
    quality_index: usize,
    iteration_index: usize,
    display: (u32, u32),
}

impl PresetManager {
    /// Empty lists fall back to the built-in presets; out-of-range indices
    /// are clamped to the last preset.
    #[must_use]
    pub fn new(
        quality_presets: Vec<QualityPreset>,
        iteration_presets: Vec<IterationPreset>,
        quality_index: usize,
        iteration_index: usize,
    ) -> Self {
        let quality_presets = if quality_presets.is_empty() {
            default_quality_presets()
        } else {
            quality_presets
        };
        let iteration_presets = if iteration_presets.is_empty() {
            default_iteration_presets()
        } else {
            iteration_presets
        };

        Self {
            quality_index: quality_index.min(quality_presets.len() - 1),
            iteration_index: iteration_index.min(iteration_presets.len() - 1),
            quality_presets,
            iteration_presets,
            display: FALLBACK_DISPLAY_RESOLUTION,
        }
    }

    pub fn set_quality_index(&mut self, index: usize) -> bool {
        if index >= self.quality_presets.len() {
            return false;
        }

        self.quality_index = index;
        true
    }

    pub fn set_iteration_index(&mut self, index: usize) -> bool {
        if index >= self.iteration_presets.len() {
            return false;
        }

        self.iteration_index = index;
        true
    }

    /// Zero-sized displays are ignored.
    pub fn update_display_resolution(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.display = (width, height);
        }
    }

    #[must_use]
    pub fn current_quality(&self) -> &QualityPreset {
        &self.quality_presets[self.quality_index]
    }

    #[must_use]
    pub fn current_iterations(&self) -> &IterationPreset {
        &self.iteration_presets[self.iteration_index]
    }

    /// Frame size of the current quality preset.
    #[must_use]
    pub fn resolution(&self) -> (u32, u32) {
        self.current_quality().resolution(self.display)
    }

    #[must_use]
    pub fn max_iterations(&self) -> u32 {
        self.current_iterations().max_iterations
    }

    #[must_use]
    pub fn quality_index(&self) -> usize {
        self.quality_index
    }

    #[must_use]
    pub fn iteration_index(&self) -> usize {
        self.iteration_index
    }

    #[must_use]
    pub fn quality_presets(&self) -> &[QualityPreset] {
        &self.quality_presets
    }

    #[must_use]
    pub fn iteration_presets(&self) -> &[IterationPreset] {
        &self.iteration_presets
    }

    #[must_use]
    pub fn display_resolution(&self) -> (u32, u32) {
        self.display
    }
}

impl Default for PresetManager {
    fn default() -> Self {
        Self::new(
            default_quality_presets(),
            default_iteration_presets(),
            DEFAULT_QUALITY_INDEX,
            DEFAULT_ITERATION_INDEX,
        )
    }
}
