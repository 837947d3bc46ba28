//! Overlay visibility gating. The probe is the seam where a real
//! process-presence scanner would plug in; the shipped default keeps the
//! overlay visible unconditionally.

use std::time::{Duration, Instant};

use tracing::info;

pub trait PresenceProbe {
    fn is_present(&mut self) -> bool;
}

/// Default probe: the target is always considered present.
pub struct AlwaysPresent;

impl PresenceProbe for AlwaysPresent {
    fn is_present(&mut self) -> bool {
        true
    }
}

/// Coarse-interval visibility decision. The probe is consulted at most once
/// per interval; between polls the cached answer stands.
pub struct VisibilityGate {
    probe: Box<dyn PresenceProbe>,
    always_visible: bool,
    interval: Duration,
    last_poll: Option<Instant>,
    visible: bool,
}

impl VisibilityGate {
    pub fn new(probe: Box<dyn PresenceProbe>, always_visible: bool, interval: Duration) -> Self {
        Self {
            probe,
            always_visible,
            interval,
            last_poll: None,
            visible: always_visible,
        }
    }

    pub fn set_always_visible(&mut self, always_visible: bool) {
        self.always_visible = always_visible;
    }

    pub fn poll(&mut self, now: Instant) -> bool {
        if self.always_visible {
            self.visible = true;
            return true;
        }

        let due = self
            .last_poll
            .map_or(true, |last| now.saturating_duration_since(last) >= self.interval);
        if due {
            self.last_poll = Some(now);
            let present = self.probe.is_present();
            if present != self.visible {
                info!(visible = present, "overlay_visibility");
            }
            self.visible = present;
        }
        self.visible
    }
}
