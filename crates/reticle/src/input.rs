//! Held-state tracking for keys, buttons, and modifiers, plus the channel
//! that hands capture-thread events to the tick loop.
//!
//! The tracker only ever sees discrete transition events. It keeps no history
//! beyond the current held sets and the last movement key pressed; a repeated
//! press for an already-held identifier is a no-op on the set but still
//! triggers re-arbitration downstream.

use std::collections::HashSet;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyId {
    MoveForward,
    MoveBack,
    MoveLeft,
    MoveRight,
    Jump,
    Other(u16),
}

impl KeyId {
    pub fn is_movement(self) -> bool {
        matches!(
            self,
            KeyId::MoveForward | KeyId::MoveBack | KeyId::MoveLeft | KeyId::MoveRight
        )
    }

    /// The other half of this key's opposing movement pair, if it has one.
    pub fn opposite(self) -> Option<KeyId> {
        match self {
            KeyId::MoveForward => Some(KeyId::MoveBack),
            KeyId::MoveBack => Some(KeyId::MoveForward),
            KeyId::MoveLeft => Some(KeyId::MoveRight),
            KeyId::MoveRight => Some(KeyId::MoveLeft),
            KeyId::Jump | KeyId::Other(_) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ButtonId {
    Left,
    Right,
    Middle,
    Other(u16),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModifierId {
    Control,
    Shift,
    Alt,
}

/// A single discrete transition delivered by an input capture source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    Key { key: KeyId, pressed: bool },
    Button { button: ButtonId, pressed: bool },
    Modifier { modifier: ModifierId, pressed: bool },
    PointerMoved { x: f32, y: f32 },
}

/// The current held sets. Mutated only by [`InputTracker`], read by the
/// spread arbiter.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    held_keys: HashSet<KeyId>,
    held_buttons: HashSet<ButtonId>,
    held_modifiers: HashSet<ModifierId>,
    last_movement_key: Option<KeyId>,
    pointer: Option<(f32, f32)>,
}

impl InputState {
    pub fn key_held(&self, key: KeyId) -> bool {
        self.held_keys.contains(&key)
    }

    pub fn button_held(&self, button: ButtonId) -> bool {
        self.held_buttons.contains(&button)
    }

    pub fn modifier_held(&self, modifier: ModifierId) -> bool {
        self.held_modifiers.contains(&modifier)
    }

    pub fn any_movement_key_held(&self) -> bool {
        self.held_keys.iter().any(|key| key.is_movement())
    }

    pub fn any_button_held(&self) -> bool {
        !self.held_buttons.is_empty()
    }

    /// True while both ends of an opposing movement pair are held. Releasing
    /// either end clears the condition on the very next arbitration.
    pub fn opposing_pair_held(&self) -> bool {
        self.held_keys.iter().any(|key| {
            key.opposite()
                .is_some_and(|opposite| self.held_keys.contains(&opposite))
        })
    }

    pub fn last_movement_key(&self) -> Option<KeyId> {
        self.last_movement_key
    }

    pub fn pointer(&self) -> Option<(f32, f32)> {
        self.pointer
    }
}

/// Applies transition events to an [`InputState`]. Owned by the scheduler;
/// never touched from the capture context.
#[derive(Debug, Default)]
pub struct InputTracker {
    state: InputState,
}

impl InputTracker {
    pub fn state(&self) -> &InputState {
        &self.state
    }

    pub fn apply(&mut self, event: InputEvent) {
        match event {
            InputEvent::Key { key, pressed } => self.on_key(key, pressed),
            InputEvent::Button { button, pressed } => self.on_button(button, pressed),
            InputEvent::Modifier { modifier, pressed } => self.on_modifier(modifier, pressed),
            InputEvent::PointerMoved { x, y } => self.state.pointer = Some((x, y)),
        }
    }

    pub fn on_key(&mut self, key: KeyId, pressed: bool) {
        if pressed {
            self.state.held_keys.insert(key);
            if key.is_movement() {
                self.state.last_movement_key = Some(key);
            }
        } else {
            self.state.held_keys.remove(&key);
        }
    }

    pub fn on_button(&mut self, button: ButtonId, pressed: bool) {
        if pressed {
            self.state.held_buttons.insert(button);
        } else {
            self.state.held_buttons.remove(&button);
        }
    }

    pub fn on_modifier(&mut self, modifier: ModifierId, pressed: bool) {
        if pressed {
            self.state.held_modifiers.insert(modifier);
        } else {
            self.state.held_modifiers.remove(&modifier);
        }
    }
}

/// Create the single-producer/single-consumer handoff between the input
/// capture context and the tick loop.
pub fn channel() -> (InputFeed, InputQueue) {
    let (tx, rx) = mpsc::channel();
    (InputFeed { tx }, InputQueue { rx })
}

/// Cloneable sending half, safe to hand to any capture thread.
#[derive(Debug, Clone)]
pub struct InputFeed {
    tx: Sender<InputEvent>,
}

impl InputFeed {
    /// Sends never block. A disconnected queue means the engine is gone;
    /// the event is dropped silently, matching shutdown semantics.
    pub fn send(&self, event: InputEvent) {
        let _ = self.tx.send(event);
    }
}

/// Receiving half, owned by the scheduler and drained once per tick.
#[derive(Debug)]
pub struct InputQueue {
    rx: Receiver<InputEvent>,
}

impl InputQueue {
    pub(crate) fn try_next(&self) -> Option<InputEvent> {
        match self.rx.try_recv() {
            Ok(event) => Some(event),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_inserts_and_release_removes() {
        let mut tracker = InputTracker::default();
        tracker.on_key(KeyId::MoveForward, true);
        assert!(tracker.state().key_held(KeyId::MoveForward));
        tracker.on_key(KeyId::MoveForward, false);
        assert!(!tracker.state().key_held(KeyId::MoveForward));
    }

    #[test]
    fn repeated_press_is_idempotent_on_the_set() {
        let mut tracker = InputTracker::default();
        tracker.on_key(KeyId::MoveLeft, true);
        tracker.on_key(KeyId::MoveLeft, true);
        tracker.on_key(KeyId::MoveLeft, false);
        assert!(!tracker.state().key_held(KeyId::MoveLeft));
    }

    #[test]
    fn release_without_press_is_a_noop() {
        let mut tracker = InputTracker::default();
        tracker.on_button(ButtonId::Right, false);
        assert!(!tracker.state().any_button_held());
    }

    #[test]
    fn interleaved_sources_keep_sets_consistent() {
        let mut tracker = InputTracker::default();
        tracker.apply(InputEvent::Key {
            key: KeyId::MoveForward,
            pressed: true,
        });
        tracker.apply(InputEvent::Button {
            button: ButtonId::Left,
            pressed: true,
        });
        tracker.apply(InputEvent::Modifier {
            modifier: ModifierId::Control,
            pressed: true,
        });
        tracker.apply(InputEvent::Key {
            key: KeyId::MoveForward,
            pressed: false,
        });
        tracker.apply(InputEvent::Modifier {
            modifier: ModifierId::Control,
            pressed: false,
        });

        let state = tracker.state();
        assert!(!state.key_held(KeyId::MoveForward));
        assert!(state.button_held(ButtonId::Left));
        assert!(!state.modifier_held(ModifierId::Control));
    }

    #[test]
    fn opposing_pair_requires_both_ends() {
        let mut tracker = InputTracker::default();
        tracker.on_key(KeyId::MoveForward, true);
        assert!(!tracker.state().opposing_pair_held());
        tracker.on_key(KeyId::MoveBack, true);
        assert!(tracker.state().opposing_pair_held());
        tracker.on_key(KeyId::MoveForward, false);
        assert!(!tracker.state().opposing_pair_held());
    }

    #[test]
    fn strafe_pair_also_counts_as_opposing() {
        let mut tracker = InputTracker::default();
        tracker.on_key(KeyId::MoveLeft, true);
        tracker.on_key(KeyId::MoveRight, true);
        assert!(tracker.state().opposing_pair_held());
    }

    #[test]
    fn forward_plus_strafe_is_not_opposing() {
        let mut tracker = InputTracker::default();
        tracker.on_key(KeyId::MoveForward, true);
        tracker.on_key(KeyId::MoveLeft, true);
        assert!(!tracker.state().opposing_pair_held());
    }

    #[test]
    fn last_movement_key_tracks_presses_only() {
        let mut tracker = InputTracker::default();
        tracker.on_key(KeyId::MoveForward, true);
        tracker.on_key(KeyId::MoveLeft, true);
        tracker.on_key(KeyId::MoveLeft, false);
        assert_eq!(tracker.state().last_movement_key(), Some(KeyId::MoveLeft));
        tracker.on_key(KeyId::Jump, true);
        assert_eq!(tracker.state().last_movement_key(), Some(KeyId::MoveLeft));
    }

    #[test]
    fn channel_delivers_in_order_and_drains_empty() {
        let (feed, queue) = channel();
        feed.send(InputEvent::Key {
            key: KeyId::MoveForward,
            pressed: true,
        });
        feed.send(InputEvent::Key {
            key: KeyId::MoveForward,
            pressed: false,
        });

        assert_eq!(
            queue.try_next(),
            Some(InputEvent::Key {
                key: KeyId::MoveForward,
                pressed: true,
            })
        );
        assert_eq!(
            queue.try_next(),
            Some(InputEvent::Key {
                key: KeyId::MoveForward,
                pressed: false,
            })
        );
        assert_eq!(queue.try_next(), None);
    }

    #[test]
    fn send_after_queue_drop_does_not_panic() {
        let (feed, queue) = channel();
        drop(queue);
        feed.send(InputEvent::Button {
            button: ButtonId::Left,
            pressed: true,
        });
    }
}
