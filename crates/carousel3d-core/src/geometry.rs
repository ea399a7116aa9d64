//! Page geometry for the carousel
//!
//! Every item rests at a fixed offset along each axis. Item `i` is centered
//! when the live offset equals `-size * i`.

use crate::config::CarouselConfig;
use crate::{Error, Result};

/// Share of the screen height used when no custom height is configured
pub const DEFAULT_HEIGHT_RATIO: f64 = 0.8;

/// Size of a single carousel cell
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    /// Validate and build a viewport
    ///
    /// Both sides must exceed 1 unit so the hinge breakpoints (0.1 inside
    /// each cell edge) stay strictly ordered.
    pub fn new(width: f64, height: f64) -> Result<Self> {
        let valid = |v: f64| v.is_finite() && v > 1.0;
        if !valid(width) || !valid(height) {
            return Err(Error::InvalidViewport { width, height });
        }
        Ok(Self { width, height })
    }

    /// Derive the cell size from the screen, honoring custom overrides
    pub fn from_screen(screen_width: f64, screen_height: f64, config: &CarouselConfig) -> Result<Self> {
        let width = config.custom_width.unwrap_or(screen_width);
        let height = config
            .custom_height
            .unwrap_or(screen_height * DEFAULT_HEIGHT_RATIO);
        Self::new(width, height)
    }
}

/// Precomputed resting offsets for every item
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryTable {
    viewport: Viewport,
    pages_x: Vec<f64>,
    pages_y: Vec<f64>,
    full_span_x: f64,
}

impl GeometryTable {
    pub fn new(count: usize, viewport: Viewport) -> Self {
        let pages_x = (0..count).map(|i| -viewport.width * i as f64).collect();
        let pages_y = (0..count).map(|i| -viewport.height * i as f64).collect();
        let full_span_x = count.saturating_sub(1) as f64 * viewport.width;

        Self {
            viewport,
            pages_x,
            pages_y,
            full_span_x,
        }
    }

    #[inline]
    pub fn count(&self) -> usize {
        self.pages_x.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pages_x.is_empty()
    }

    #[inline]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.viewport.width
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.viewport.height
    }

    pub fn pages_x(&self) -> &[f64] {
        &self.pages_x
    }

    pub fn pages_y(&self) -> &[f64] {
        &self.pages_y
    }

    /// Resting X offset of item `index`; also valid for indices past the list
    #[inline]
    pub fn page_x(&self, index: usize) -> f64 {
        -self.viewport.width * index as f64
    }

    /// Resting Y offset of item `index`
    #[inline]
    pub fn page_y(&self, index: usize) -> f64 {
        -self.viewport.height * index as f64
    }

    /// Distance from the first to the last resting X offset
    #[inline]
    pub fn full_span_x(&self) -> f64 {
        self.full_span_x
    }

    /// Period of the horizontal wraparound: one full lap including the seam cell
    #[inline]
    pub fn loop_period_x(&self) -> f64 {
        self.full_span_x + self.viewport.width
    }
}
