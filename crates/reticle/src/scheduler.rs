//! Fixed-cadence tick driver. Owns every piece of mutable animation state;
//! the capture context only ever talks to it through the input queue.

use tracing::debug;

use crate::config::EngineConfig;
use crate::input::{InputQueue, InputTracker};
use crate::jitter::JitterGenerator;
use crate::recoil::RecoilSimulator;
use crate::smoothing::Smoothed;
use crate::spread;

/// One immutable snapshot of the reticle geometry, emitted per tick and
/// consumed exactly once by the drawing side. Units are screen pixels
/// relative to screen center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderFrame {
    pub gap: f32,
    pub arm_length: f32,
    pub jitter_x: f32,
    pub jitter_y: f32,
    pub recoil_y: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activity {
    Inactive,
    Active,
}

pub struct FrameScheduler {
    queue: InputQueue,
    tracker: InputTracker,
    config: EngineConfig,
    spread_offset: f32,
    gap: Smoothed,
    length: Smoothed,
    jitter: JitterGenerator,
    recoil: RecoilSimulator,
    activity: Activity,
}

impl FrameScheduler {
    pub fn new(config: EngineConfig, queue: InputQueue, jitter_seed: u64) -> Self {
        let config = config.sanitized();
        Self {
            queue,
            tracker: InputTracker::default(),
            spread_offset: 0.0,
            gap: Smoothed::at(config.base_gap),
            length: Smoothed::at(config.base_length),
            jitter: JitterGenerator::new(jitter_seed),
            recoil: RecoilSimulator::default(),
            activity: Activity::Inactive,
            config,
        }
    }

    pub fn activity(&self) -> Activity {
        self.activity
    }

    /// Idempotent; numeric state is left untouched on either transition, a
    /// stop simply ceases ticking.
    pub fn set_active(&mut self, active: bool) {
        let next = if active {
            Activity::Active
        } else {
            Activity::Inactive
        };
        if next != self.activity {
            self.activity = next;
            debug!(activity = ?next, "scheduler_activity");
        }
    }

    /// Install a wholesale config replacement. Current values are preserved;
    /// targets are re-derived so the next tick animates toward the new
    /// geometry.
    pub fn replace_config(&mut self, config: EngineConfig) {
        self.config = config.sanitized();
        self.spread_offset = spread::arbitrate(self.tracker.state(), &self.config);
        debug!("engine_config_replaced");
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Advance one tick. Returns `None` while inactive; events are still
    /// drained so held state stays fresh and the queue never piles up.
    pub fn tick(&mut self, dt: f32) -> Option<RenderFrame> {
        self.drain_events();

        if self.activity == Activity::Inactive {
            return None;
        }

        let state = self.tracker.state();
        let firing = self.config.click.trigger.held(state);
        let jitter_active = state.any_button_held();
        let rate = spread::active_rule_speed(state, &self.config) * self.config.lerp_rate;

        self.gap.target = self.config.base_gap + self.spread_offset;
        self.length.target = if self.config.dynamic_length {
            self.config.base_length + self.spread_offset
        } else {
            self.config.base_length
        };
        self.gap.advance(rate, dt);
        self.length.advance(rate, dt);

        let (jitter_x, jitter_y) = self.jitter.tick(jitter_active, &self.config, dt);
        let recoil_y = self.recoil.tick(firing, &self.config, dt);

        Some(RenderFrame {
            gap: self.gap.current,
            arm_length: self.length.current,
            jitter_x,
            jitter_y,
            recoil_y,
        })
    }

    /// Apply queued transitions in arrival order, re-arbitrating after each
    /// mutation. Bursts coalesce naturally: only the final held state feeds
    /// the tick that follows.
    fn drain_events(&mut self) {
        while let Some(event) = self.queue.try_next() {
            self.tracker.apply(event);
            self.spread_offset = spread::arbitrate(self.tracker.state(), &self.config);
        }
    }
}
