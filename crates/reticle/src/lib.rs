//! Reticle simulation engine.
//!
//! Turns asynchronous key/button transitions into a per-tick [`RenderFrame`]
//! describing crosshair geometry: a spread target arbitrated from movement,
//! counter-strafe, click, and crouch rules, smoothed gap/arm-length
//! animation, a jitter waveform, and an asymmetric recoil curve. Everything
//! here is deterministic and free of I/O; the overlay binary supplies the
//! window, the clock, and the input capture.

pub mod config;
pub mod input;
pub mod jitter;
pub mod recoil;
pub mod scheduler;
pub mod smoothing;
pub mod spread;

pub use config::{
    ClickSpread, CounterStrafe, CrouchSpread, EngineConfig, JitterConfig, JitterMode,
    MovementSpread, RecoilConfig, TriggerButton,
};
pub use input::{channel, ButtonId, InputEvent, InputFeed, InputQueue, KeyId, ModifierId};
pub use scheduler::{Activity, FrameScheduler, RenderFrame};
pub use smoothing::{Smoothed, REFERENCE_DT, SNAP_EPSILON};
