//! Engine tunables, replaced wholesale whenever the settings layer commits a
//! change. The engine never writes these; it only reads a sanitized snapshot.

use serde::de::Deserializer;
use serde::{Deserialize, Serialize};

use crate::input::{ButtonId, InputState};

/// Waveform selection for the jitter generator. Unknown strings degrade to
/// `Random` rather than failing the whole config load; the legacy names
/// `up` and `sideways` are accepted as aliases.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JitterMode {
    #[default]
    Random,
    Vertical,
    Horizontal,
}

impl<'de> Deserialize<'de> for JitterMode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(match raw.as_str() {
            "random" => JitterMode::Random,
            "vertical" | "up" => JitterMode::Vertical,
            "horizontal" | "sideways" => JitterMode::Horizontal,
            _ => JitterMode::Random,
        })
    }
}

/// Which held mouse button(s) count as the firing trigger.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerButton {
    #[default]
    Left,
    Right,
    Both,
}

impl TriggerButton {
    pub fn held(self, state: &InputState) -> bool {
        match self {
            TriggerButton::Left => state.button_held(ButtonId::Left),
            TriggerButton::Right => state.button_held(ButtonId::Right),
            TriggerButton::Both => {
                state.button_held(ButtonId::Left) || state.button_held(ButtonId::Right)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementSpread {
    pub enabled: bool,
    pub amount: f32,
    pub speed: f32,
}

impl Default for MovementSpread {
    fn default() -> Self {
        Self {
            enabled: false,
            amount: 10.0,
            speed: 2.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CounterStrafe {
    pub enabled: bool,
    /// Subtracted from the movement amount while both ends of an opposing
    /// pair are held; also serves as the smoothing speed during one.
    pub reduction: f32,
    pub min_spread: f32,
}

impl Default for CounterStrafe {
    fn default() -> Self {
        Self {
            enabled: true,
            reduction: 5.0,
            min_spread: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClickSpread {
    pub enabled: bool,
    pub amount: f32,
    pub speed: f32,
    pub trigger: TriggerButton,
}

impl Default for ClickSpread {
    fn default() -> Self {
        Self {
            enabled: false,
            amount: 5.0,
            speed: 3.0,
            trigger: TriggerButton::Left,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrouchSpread {
    pub enabled: bool,
    pub amount: f32,
    pub speed: f32,
}

impl Default for CrouchSpread {
    fn default() -> Self {
        Self {
            enabled: false,
            amount: 5.0,
            speed: 2.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JitterConfig {
    pub enabled: bool,
    /// Maximum offset in pixels on either axis.
    pub amount: f32,
    /// Phase advance per reference tick, radians.
    pub speed: f32,
    pub mode: JitterMode,
}

impl Default for JitterConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            amount: 5.0,
            speed: 1.0,
            mode: JitterMode::Random,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecoilConfig {
    pub enabled: bool,
    /// Upward displacement in pixels while the trigger is held.
    pub impulse: f32,
    pub kick_rate: f32,
    pub recovery_rate: f32,
}

impl Default for RecoilConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            impulse: 10.0,
            kick_rate: 0.5,
            recovery_rate: 0.2,
        }
    }
}

/// Immutable per-load snapshot of every tunable the engine reads.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub base_gap: f32,
    pub base_length: f32,
    pub dynamic_length: bool,
    /// Global smoothing scale; the per-rule speeds multiply into this.
    pub lerp_rate: f32,
    pub movement: MovementSpread,
    pub counter_strafe: CounterStrafe,
    pub click: ClickSpread,
    pub crouch: CrouchSpread,
    pub jitter: JitterConfig,
    pub recoil: RecoilConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            base_gap: 5.0,
            base_length: 40.0,
            dynamic_length: true,
            lerp_rate: 0.2,
            movement: MovementSpread::default(),
            counter_strafe: CounterStrafe::default(),
            click: ClickSpread::default(),
            crouch: CrouchSpread::default(),
            jitter: JitterConfig::default(),
            recoil: RecoilConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Degrade out-of-range values to usable ones instead of failing: a
    /// visually off reticle beats a dead overlay.
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        self.base_gap = sane(self.base_gap, defaults.base_gap);
        self.base_length = sane(self.base_length, defaults.base_length);
        self.lerp_rate = sane(self.lerp_rate, defaults.lerp_rate);
        self.movement.amount = sane(self.movement.amount, defaults.movement.amount);
        self.movement.speed = sane(self.movement.speed, defaults.movement.speed);
        self.counter_strafe.reduction = sane(
            self.counter_strafe.reduction,
            defaults.counter_strafe.reduction,
        );
        self.counter_strafe.min_spread = sane(
            self.counter_strafe.min_spread,
            defaults.counter_strafe.min_spread,
        );
        self.click.amount = sane(self.click.amount, defaults.click.amount);
        self.click.speed = sane(self.click.speed, defaults.click.speed);
        self.crouch.amount = sane(self.crouch.amount, defaults.crouch.amount);
        self.crouch.speed = sane(self.crouch.speed, defaults.crouch.speed);
        self.jitter.amount = sane(self.jitter.amount, defaults.jitter.amount);
        self.jitter.speed = sane(self.jitter.speed, defaults.jitter.speed);
        self.recoil.impulse = sane(self.recoil.impulse, defaults.recoil.impulse);
        self.recoil.kick_rate = sane(self.recoil.kick_rate, defaults.recoil.kick_rate);
        self.recoil.recovery_rate = sane(self.recoil.recovery_rate, defaults.recoil.recovery_rate);
        self
    }
}

fn sane(value: f32, fallback: f32) -> f32 {
    if value.is_finite() && value >= 0.0 {
        value
    } else {
        fallback
    }
}
