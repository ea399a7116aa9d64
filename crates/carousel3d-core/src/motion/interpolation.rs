//! L4 Atomic Layer: Piecewise-linear interpolation with clamped extrapolation
//!
//! Maps an input through a list of breakpoints onto a list of outputs.
//! Inputs outside the breakpoint domain saturate at the nearest end value.

use crate::{Error, Result};

/// Linear interpolation between two values
///
/// # Arguments
/// * `from` - Start value
/// * `to` - End value
/// * `t` - Interpolation factor [0.0, 1.0]
#[inline]
pub fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from + (to - from) * t
}

/// Evaluate borrowed breakpoints with clamped extrapolation
///
/// `input` must be non-empty, ordered, and as long as `output`. When two
/// breakpoints coincide the earlier segment wins, so the value at the shared
/// point is the left-hand output.
pub fn interpolate(input: &[f64], output: &[f64], x: f64) -> f64 {
    let n = input.len();
    if x <= input[0] {
        return output[0];
    }
    if x >= input[n - 1] {
        return output[n - 1];
    }

    let seg = input[1..].iter().position(|&b| b >= x).unwrap_or(n - 2);
    let (x0, x1) = (input[seg], input[seg + 1]);
    if x1 == x0 {
        return output[seg];
    }
    lerp(output[seg], output[seg + 1], (x - x0) / (x1 - x0))
}

/// Evaluate borrowed breakpoints as if tiled every `period` units
///
/// Between the end of one tile and the start of the next the value runs
/// linearly from the last output back to the first. `period` must be at
/// least the span of the domain; anything else falls back to [`interpolate`].
pub fn interpolate_wrapped(input: &[f64], output: &[f64], x: f64, period: f64) -> f64 {
    let first = input[0];
    let last = input[input.len() - 1];
    if !period.is_finite() || period < last - first || period <= 0.0 {
        return interpolate(input, output, x);
    }

    let tile = ((x - first) / period).floor();
    let local = x - tile * period;
    if local <= last {
        return interpolate(input, output, local);
    }

    let seam = first + period - last;
    let t = ((local - last) / seam).clamp(0.0, 1.0);
    lerp(output[output.len() - 1], output[0], t)
}

/// A clamped piecewise-linear function
#[derive(Debug, Clone, PartialEq)]
pub struct Interpolation {
    input: Vec<f64>,
    output: Vec<f64>,
}

impl Interpolation {
    /// Build an interpolation, rejecting malformed breakpoints
    ///
    /// The input domain must hold at least two finite, strictly increasing
    /// values and match the output in length.
    pub fn try_new(input: Vec<f64>, output: Vec<f64>) -> Result<Self> {
        if input.len() != output.len() {
            return Err(Error::InvalidBreakpoints(format!(
                "{} inputs but {} outputs",
                input.len(),
                output.len()
            )));
        }
        if input.len() < 2 {
            return Err(Error::InvalidBreakpoints(
                "at least two breakpoints are required".to_string(),
            ));
        }
        if input.iter().any(|v| !v.is_finite()) {
            return Err(Error::InvalidBreakpoints("non-finite breakpoint".to_string()));
        }
        if let Some(pos) = input.windows(2).position(|w| w[1] <= w[0]) {
            return Err(Error::InvalidBreakpoints(format!(
                "domain not strictly increasing at index {}",
                pos + 1
            )));
        }
        Ok(Self { input, output })
    }

    /// Build from breakpoints the caller already guarantees to be ordered
    pub(crate) fn from_ordered(input: Vec<f64>, output: Vec<f64>) -> Self {
        debug_assert_eq!(input.len(), output.len());
        debug_assert!(input.len() >= 2);
        debug_assert!(input.windows(2).all(|w| w[0] <= w[1]));
        Self { input, output }
    }

    pub fn input(&self) -> &[f64] {
        &self.input
    }

    pub fn output(&self) -> &[f64] {
        &self.output
    }

    /// Evaluate with clamped extrapolation; see [`interpolate`]
    #[inline]
    pub fn evaluate(&self, x: f64) -> f64 {
        interpolate(&self.input, &self.output, x)
    }

    /// Evaluate as if the function were tiled every `period` units; see [`interpolate_wrapped`]
    #[inline]
    pub fn evaluate_wrapped(&self, x: f64, period: f64) -> f64 {
        interpolate_wrapped(&self.input, &self.output, x, period)
    }

    /// Extend the breakpoints with one shifted copy on each side
    ///
    /// The domain gains copies shifted by `-period` and `+period`; the
    /// outputs are repeated unchanged. Within the padded window this agrees
    /// with [`evaluate_wrapped`], past it the ends clamp as usual.
    ///
    /// [`evaluate_wrapped`]: Interpolation::evaluate_wrapped
    pub fn padded(&self, period: f64) -> Self {
        let input = self
            .input
            .iter()
            .map(|v| v - period)
            .chain(self.input.iter().copied())
            .chain(self.input.iter().map(|v| v + period))
            .collect();
        let output = self.output.repeat(3);
        Self::from_ordered(input, output)
    }
}
