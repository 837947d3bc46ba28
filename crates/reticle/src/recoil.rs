//! Vertical recoil displacement: a fast kick toward the impulse target while
//! the trigger is held, a slower recovery back to zero after release. The
//! direction of travel picks the rate, not the trigger itself.

use crate::config::EngineConfig;
use crate::smoothing;

#[derive(Debug, Default)]
pub struct RecoilSimulator {
    current: f32,
    target: f32,
}

impl RecoilSimulator {
    pub fn offset(&self) -> f32 {
        self.current
    }

    pub fn tick(&mut self, trigger_held: bool, config: &EngineConfig, dt: f32) -> f32 {
        let recoil = &config.recoil;
        self.target = if trigger_held && recoil.enabled {
            -recoil.impulse
        } else {
            0.0
        };

        let rate = if self.target < self.current {
            recoil.kick_rate
        } else {
            recoil.recovery_rate
        };
        self.current = smoothing::advance(self.current, self.target, rate, dt);
        self.current
    }
}
