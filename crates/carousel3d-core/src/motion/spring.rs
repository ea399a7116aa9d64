//! L4 Atomic Layer: Damped spring integration
//!
//! A mass on a spring pulled toward a target, integrated with fixed
//! millisecond sub-steps so the result does not depend on frame timing.

use crate::config::SpringConfig;

/// Integration sub-step in seconds
const SUB_STEP: f64 = 0.001;

/// Longest interval a single `step` integrates; a stalled frame clock is not replayed
const MAX_STEP_DT: f64 = 1.0;

/// Physical spring constants
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringParams {
    pub stiffness: f64,
    pub damping: f64,
    pub mass: f64,
    pub rest_speed_threshold: f64,
    pub rest_displacement_threshold: f64,
}

impl From<&SpringConfig> for SpringParams {
    fn from(config: &SpringConfig) -> Self {
        Self {
            stiffness: config.stiffness(),
            damping: config.damping(),
            mass: 1.0,
            rest_speed_threshold: config.rest_speed_threshold,
            rest_displacement_threshold: config.rest_displacement_threshold,
        }
    }
}

impl Default for SpringParams {
    fn default() -> Self {
        Self::from(&SpringConfig::default())
    }
}

/// One axis of spring motion
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spring {
    pub position: f64,
    pub velocity: f64,
    pub target: f64,
}

impl Spring {
    pub fn new(position: f64, target: f64) -> Self {
        Self {
            position,
            velocity: 0.0,
            target,
        }
    }

    /// Advance by `dt` seconds, at most [`MAX_STEP_DT`] per call
    pub fn step(&mut self, dt: f64, params: &SpringParams) {
        if dt <= 0.0 || dt.is_nan() {
            return;
        }
        let dt = dt.min(MAX_STEP_DT);
        let steps = (dt / SUB_STEP - 1e-9).ceil().max(1.0) as usize;
        let h = dt / steps as f64;
        let mass = if params.mass > 0.0 { params.mass } else { 1.0 };

        for _ in 0..steps {
            let displacement = self.position - self.target;
            let accel = (-params.stiffness * displacement - params.damping * self.velocity) / mass;
            self.velocity += accel * h;
            self.position += self.velocity * h;
        }
    }

    #[inline]
    pub fn is_at_rest(&self, params: &SpringParams) -> bool {
        self.velocity.abs() <= params.rest_speed_threshold
            && (self.position - self.target).abs() <= params.rest_displacement_threshold
    }

    /// Jump to the target and drop all momentum
    pub fn settle(&mut self) {
        self.position = self.target;
        self.velocity = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spring_converges() {
        let params = SpringParams::default();
        let mut spring = Spring::new(0.0, -400.0);
        let mut elapsed = 0.0;
        while !spring.is_at_rest(&params) && elapsed < 10.0 {
            spring.step(1.0 / 60.0, &params);
            elapsed += 1.0 / 60.0;
        }
        assert!(spring.is_at_rest(&params), "not settled after {}s", elapsed);
        assert!((spring.position + 400.0).abs() < 0.01);
    }

    #[test]
    fn test_huge_dt_is_capped() {
        let params = SpringParams::default();
        let mut capped = Spring::new(0.0, -400.0);
        capped.step(1e12, &params);
        let mut one_second = Spring::new(0.0, -400.0);
        one_second.step(MAX_STEP_DT, &params);
        assert_eq!(capped, one_second);
        assert!(capped.position.is_finite());

        let mut infinite = Spring::new(0.0, -400.0);
        infinite.step(f64::INFINITY, &params);
        assert_eq!(infinite, one_second);
    }

    #[test]
    fn test_underdamped_defaults_overshoot() {
        let params = SpringParams::default();
        let mut spring = Spring::new(0.0, 100.0);
        let mut peak: f64 = 0.0;
        for _ in 0..120 {
            spring.step(1.0 / 60.0, &params);
            peak = peak.max(spring.position);
        }
        assert!(peak > 100.0);
    }

    #[test]
    fn test_zero_dt_is_noop() {
        let params = SpringParams::default();
        let mut spring = Spring::new(5.0, 0.0);
        spring.step(0.0, &params);
        assert_eq!(spring, Spring::new(5.0, 0.0));
    }

    #[test]
    fn test_step_size_independent() {
        let params = SpringParams::default();
        let mut coarse = Spring::new(0.0, 50.0);
        let mut fine = Spring::new(0.0, 50.0);
        coarse.step(0.1, &params);
        for _ in 0..10 {
            fine.step(0.01, &params);
        }
        assert!((coarse.position - fine.position).abs() < 1e-6);
    }
}
