//! Periodic jitter offset layered on top of the reticle position.
//!
//! RANDOM mode intentionally redraws a fresh uniform target every tick and is
//! not waveform-smoothed; only the generator's own (x, y) lerp tames it. The
//! sine modes share the phase accumulator. Inactive, the offsets decay back
//! to exactly zero through the same lerp and the phase resets.

use std::f32::consts::TAU;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::config::{EngineConfig, JitterMode};
use crate::smoothing::{self, REFERENCE_DT};

#[derive(Debug)]
pub struct JitterGenerator {
    phase: f32,
    x: f32,
    y: f32,
    rng: Pcg32,
}

impl JitterGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            phase: 0.0,
            x: 0.0,
            y: 0.0,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn offset(&self) -> (f32, f32) {
        (self.x, self.y)
    }

    /// Advance one tick. `active` is the external trigger condition (an
    /// action button held); jitter also requires its own enabled flag.
    pub fn tick(&mut self, active: bool, config: &EngineConfig, dt: f32) -> (f32, f32) {
        let jitter = &config.jitter;
        if active && jitter.enabled {
            self.phase = (self.phase + jitter.speed * (dt / REFERENCE_DT)) % TAU;

            let amount = jitter.amount;
            let (target_x, target_y) = match jitter.mode {
                JitterMode::Random => (
                    self.rng.random_range(-amount..=amount),
                    self.rng.random_range(-amount..=amount),
                ),
                JitterMode::Vertical => (0.0, amount * self.phase.sin()),
                JitterMode::Horizontal => (amount * self.phase.sin(), 0.0),
            };

            self.x = smoothing::advance(self.x, target_x, config.lerp_rate, dt);
            self.y = smoothing::advance(self.y, target_y, config.lerp_rate, dt);
        } else {
            self.x = smoothing::advance(self.x, 0.0, config.lerp_rate, dt);
            self.y = smoothing::advance(self.y, 0.0, config.lerp_rate, dt);
            if self.x == 0.0 && self.y == 0.0 {
                self.phase = 0.0;
            }
        }
        (self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jitter_config(mode: JitterMode, amount: f32) -> EngineConfig {
        let mut config = EngineConfig::default();
        config.jitter.enabled = true;
        config.jitter.mode = mode;
        config.jitter.amount = amount;
        config.jitter.speed = 0.5;
        config
    }

    #[test]
    fn random_mode_stays_within_amount_every_tick() {
        let config = jitter_config(JitterMode::Random, 4.0);
        let mut generator = JitterGenerator::new(7);
        for _ in 0..500 {
            let (x, y) = generator.tick(true, &config, REFERENCE_DT);
            assert!(x.abs() <= 4.0 + f32::EPSILON, "x out of range: {x}");
            assert!(y.abs() <= 4.0 + f32::EPSILON, "y out of range: {y}");
        }
    }

    #[test]
    fn random_mode_is_deterministic_for_a_seed() {
        let config = jitter_config(JitterMode::Random, 4.0);
        let mut a = JitterGenerator::new(42);
        let mut b = JitterGenerator::new(42);
        for _ in 0..20 {
            assert_eq!(
                a.tick(true, &config, REFERENCE_DT),
                b.tick(true, &config, REFERENCE_DT)
            );
        }
    }

    #[test]
    fn vertical_mode_keeps_x_at_zero() {
        let config = jitter_config(JitterMode::Vertical, 6.0);
        let mut generator = JitterGenerator::new(1);
        let mut saw_motion = false;
        for _ in 0..120 {
            let (x, y) = generator.tick(true, &config, REFERENCE_DT);
            assert_eq!(x, 0.0);
            if y.abs() > 0.5 {
                saw_motion = true;
            }
        }
        assert!(saw_motion);
    }

    #[test]
    fn horizontal_mode_keeps_y_at_zero() {
        let config = jitter_config(JitterMode::Horizontal, 6.0);
        let mut generator = JitterGenerator::new(1);
        for _ in 0..120 {
            let (_, y) = generator.tick(true, &config, REFERENCE_DT);
            assert_eq!(y, 0.0);
        }
    }

    #[test]
    fn decays_to_exactly_zero_after_release() {
        let config = jitter_config(JitterMode::Random, 4.0);
        let mut generator = JitterGenerator::new(3);
        for _ in 0..30 {
            generator.tick(true, &config, REFERENCE_DT);
        }

        let mut ticks = 0;
        loop {
            let (x, y) = generator.tick(false, &config, REFERENCE_DT);
            if x == 0.0 && y == 0.0 {
                break;
            }
            ticks += 1;
            assert!(ticks < 200, "jitter did not decay");
        }
        assert_eq!(generator.phase, 0.0);
    }

    #[test]
    fn disabled_jitter_never_moves() {
        let mut config = jitter_config(JitterMode::Random, 4.0);
        config.jitter.enabled = false;
        let mut generator = JitterGenerator::new(9);
        for _ in 0..30 {
            assert_eq!(generator.tick(true, &config, REFERENCE_DT), (0.0, 0.0));
        }
    }

    #[test]
    fn phase_wraps_at_tau() {
        let mut config = jitter_config(JitterMode::Vertical, 1.0);
        config.jitter.speed = 2.0;
        let mut generator = JitterGenerator::new(0);
        for _ in 0..100 {
            generator.tick(true, &config, REFERENCE_DT);
            assert!(generator.phase >= 0.0 && generator.phase < TAU);
        }
    }
}
