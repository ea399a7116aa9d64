use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub carousel: CarouselConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Data directory path (log file lives here)
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
        }
    }
}

/// Which axes respond to drag gestures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollDirection {
    #[default]
    Horizontal,
    Vertical,
    /// Dual-axis: each gesture locks onto its dominant axis
    All,
}

impl ScrollDirection {
    /// Cycle horizontal -> vertical -> all -> horizontal
    pub fn next(self) -> Self {
        match self {
            ScrollDirection::Horizontal => ScrollDirection::Vertical,
            ScrollDirection::Vertical => ScrollDirection::All,
            ScrollDirection::All => ScrollDirection::Horizontal,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ScrollDirection::Horizontal => "horizontal",
            ScrollDirection::Vertical => "vertical",
            ScrollDirection::All => "all",
        }
    }
}

impl std::str::FromStr for ScrollDirection {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "horizontal" => Ok(ScrollDirection::Horizontal),
            "vertical" => Ok(ScrollDirection::Vertical),
            "all" => Ok(ScrollDirection::All),
            other => Err(crate::Error::Config(format!(
                "unknown scroll direction '{}', expected horizontal, vertical or all",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CarouselConfig {
    /// Wrap from the last item to the first and back
    #[serde(rename = "loop", default)]
    pub loop_enabled: bool,
    #[serde(default)]
    pub scroll_direction: ScrollDirection,
    /// Item cell width; defaults to the screen width
    #[serde(default)]
    pub custom_width: Option<f64>,
    /// Item cell height; defaults to 80% of the screen height
    #[serde(default)]
    pub custom_height: Option<f64>,
    #[serde(default)]
    pub perspective: PerspectiveConfig,
    #[serde(default)]
    pub fade: FadeConfig,
    #[serde(default)]
    pub spring: SpringConfig,
    /// Movement needed before a dual-axis gesture locks onto an axis
    #[serde(default = "default_axis_lock_slop")]
    pub axis_lock_slop: f64,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            loop_enabled: false,
            scroll_direction: ScrollDirection::default(),
            custom_width: None,
            custom_height: None,
            perspective: PerspectiveConfig::default(),
            fade: FadeConfig::default(),
            spring: SpringConfig::default(),
            axis_lock_slop: default_axis_lock_slop(),
        }
    }
}

impl CarouselConfig {
    pub fn validate(&self) -> crate::Result<()> {
        self.perspective.validate()?;
        self.spring.validate()?;
        for (name, margin) in [
            ("carousel.fade.fade_in_x", self.fade.fade_in_x),
            ("carousel.fade.fade_out_x", self.fade.fade_out_x),
            ("carousel.fade.fade_in_y", self.fade.fade_in_y),
            ("carousel.fade.fade_out_y", self.fade.fade_out_y),
        ] {
            require_non_negative(name, margin)?;
        }
        require_non_negative("carousel.axis_lock_slop", self.axis_lock_slop)
    }
}

/// Named perspective constant sets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PerspectivePreset {
    Ios,
    Android,
}

/// Perspective tuning constants
///
/// `rotation_factor` divides the pre-rotation translate range,
/// `depth_factor` divides the post-rotation hinge breakpoints.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerspectiveConfig {
    #[serde(default = "default_rotation_factor")]
    pub rotation_factor: f64,
    #[serde(default = "default_depth_factor")]
    pub depth_factor: f64,
}

impl PerspectiveConfig {
    pub fn preset(preset: PerspectivePreset) -> Self {
        match preset {
            PerspectivePreset::Ios => Self {
                rotation_factor: 2.0,
                depth_factor: 2.38,
            },
            PerspectivePreset::Android => Self {
                rotation_factor: 1.5,
                depth_factor: 1.95,
            },
        }
    }
}

impl PerspectiveConfig {
    pub fn validate(&self) -> crate::Result<()> {
        require_positive("carousel.perspective.rotation_factor", self.rotation_factor)?;
        require_positive("carousel.perspective.depth_factor", self.depth_factor)
    }
}

impl Default for PerspectiveConfig {
    fn default() -> Self {
        Self::preset(PerspectivePreset::Ios)
    }
}

/// Opacity breakpoint margins, measured inward from each cell edge
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FadeConfig {
    #[serde(default = "default_fade_in_x")]
    pub fade_in_x: f64,
    #[serde(default = "default_fade_out_x")]
    pub fade_out_x: f64,
    #[serde(default = "default_fade_in_y")]
    pub fade_in_y: f64,
    #[serde(default = "default_fade_out_y")]
    pub fade_out_y: f64,
}

impl Default for FadeConfig {
    fn default() -> Self {
        Self {
            fade_in_x: default_fade_in_x(),
            fade_out_x: default_fade_out_x(),
            fade_in_y: default_fade_in_y(),
            fade_out_y: default_fade_out_y(),
        }
    }
}

/// Snap spring parameters in origami (friction/tension) form
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpringConfig {
    #[serde(default = "default_friction")]
    pub friction: f64,
    #[serde(default = "default_tension")]
    pub tension: f64,
    #[serde(default = "default_rest_threshold")]
    pub rest_speed_threshold: f64,
    #[serde(default = "default_rest_threshold")]
    pub rest_displacement_threshold: f64,
}

impl SpringConfig {
    /// Spring constant derived from the origami tension
    #[inline]
    pub fn stiffness(&self) -> f64 {
        (self.tension - 30.0) * 3.62 + 194.0
    }

    /// Damping coefficient derived from the origami friction
    #[inline]
    pub fn damping(&self) -> f64 {
        (self.friction - 8.0) * 3.0 + 25.0
    }
}

impl SpringConfig {
    pub fn validate(&self) -> crate::Result<()> {
        require_positive("carousel.spring stiffness (from tension)", self.stiffness())?;
        require_positive("carousel.spring damping (from friction)", self.damping())?;
        require_non_negative("carousel.spring.rest_speed_threshold", self.rest_speed_threshold)?;
        require_non_negative(
            "carousel.spring.rest_displacement_threshold",
            self.rest_displacement_threshold,
        )
    }
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self {
            friction: default_friction(),
            tension: default_tension(),
            rest_speed_threshold: default_rest_threshold(),
            rest_displacement_threshold: default_rest_threshold(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Idle tick rate in milliseconds
    #[serde(default = "default_tick_rate")]
    pub tick_rate_ms: u64,
    /// Frame rate while a drag or spring is in flight
    #[serde(default = "default_animation_fps")]
    pub animation_fps: u32,
    /// Carousel units per terminal column
    #[serde(default = "default_units_per_column")]
    pub units_per_column: f64,
    /// Carousel units per terminal row
    #[serde(default = "default_units_per_row")]
    pub units_per_row: f64,
}

impl UiConfig {
    pub fn validate(&self) -> crate::Result<()> {
        require_positive("ui.units_per_column", self.units_per_column)?;
        require_positive("ui.units_per_row", self.units_per_row)
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: default_tick_rate(),
            animation_fps: default_animation_fps(),
            units_per_column: default_units_per_column(),
            units_per_row: default_units_per_row(),
        }
    }
}

fn require_positive(name: &str, value: f64) -> crate::Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(crate::Error::Config(format!("{} must be a finite number greater than 0, got {}", name, value)))
    }
}

fn require_non_negative(name: &str, value: f64) -> crate::Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(crate::Error::Config(format!("{} must be a finite number of at least 0, got {}", name, value)))
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("carousel3d")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_axis_lock_slop() -> f64 {
    10.0
}

fn default_rotation_factor() -> f64 {
    2.0
}

fn default_depth_factor() -> f64 {
    2.38
}

fn default_fade_in_x() -> f64 {
    10.0
}

fn default_fade_out_x() -> f64 {
    250.0
}

fn default_fade_in_y() -> f64 {
    30.0
}

fn default_fade_out_y() -> f64 {
    100.0
}

fn default_friction() -> f64 {
    3.0
}

fn default_tension() -> f64 {
    0.6
}

fn default_rest_threshold() -> f64 {
    0.001
}

fn default_tick_rate() -> u64 {
    100
}

fn default_animation_fps() -> u32 {
    60
}

fn default_units_per_column() -> f64 {
    10.0
}

fn default_units_per_row() -> f64 {
    20.0 // terminal cells are roughly twice as tall as wide
}

/// Expand tilde (~) in path to user's home directory
fn expand_tilde(path: &std::path::Path) -> PathBuf {
    if let Some(path_str) = path.to_str() {
        if let Some(stripped) = path_str.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(stripped);
            }
        } else if path_str == "~" {
            if let Some(home) = dirs::home_dir() {
                return home;
            }
        }
    }
    path.to_path_buf()
}

impl AppConfig {
    /// Load configuration from file or return defaults
    pub fn load() -> crate::Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            Self::from_toml(&content)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse and validate configuration from a TOML string
    pub fn from_toml(content: &str) -> crate::Result<Self> {
        let config: Self = toml::from_str(content).map_err(|e| crate::Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would break the transform math or never let a spring settle
    pub fn validate(&self) -> crate::Result<()> {
        self.carousel.validate()?;
        self.ui.validate()
    }

    /// Serialize configuration as pretty TOML
    pub fn to_toml(&self) -> crate::Result<String> {
        toml::to_string_pretty(self).map_err(|e| crate::Error::Config(e.to_string()))
    }

    /// Save configuration to file
    pub fn save(&self) -> crate::Result<()> {
        let config_path = Self::config_path();

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(&config_path, self.to_toml()?)?;

        Ok(())
    }

    /// Get the configuration file path
    /// Always uses ~/.config/carousel3d/config.toml on all platforms
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("carousel3d")
            .join("config.toml")
    }

    /// Get the log file path used by the interactive viewer
    pub fn log_path(&self) -> PathBuf {
        self.data_dir().join("carousel3d.log")
    }

    /// Get the data directory (with tilde expansion)
    pub fn data_dir(&self) -> PathBuf {
        expand_tilde(&self.general.data_dir)
    }
}
