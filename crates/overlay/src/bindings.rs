//! Translation from winit window events to engine input transitions.
//!
//! Pure mapping, no state: held/released bookkeeping lives in the engine's
//! tracker. OS key auto-repeat is filtered out because a repeat is not a
//! transition.

use reticle::{ButtonId, InputEvent, KeyId, ModifierId};
use winit::event::{ElementState, KeyEvent, MouseButton};
use winit::keyboard::{KeyCode, PhysicalKey};

pub fn key_transition(event: &KeyEvent) -> Option<InputEvent> {
    if event.repeat {
        return None;
    }
    let PhysicalKey::Code(code) = event.physical_key else {
        return None;
    };
    key_code_transition(code, event.state == ElementState::Pressed)
}

pub(crate) fn key_code_transition(code: KeyCode, pressed: bool) -> Option<InputEvent> {
    let event = match code {
        KeyCode::KeyW | KeyCode::ArrowUp => InputEvent::Key {
            key: KeyId::MoveForward,
            pressed,
        },
        KeyCode::KeyS | KeyCode::ArrowDown => InputEvent::Key {
            key: KeyId::MoveBack,
            pressed,
        },
        KeyCode::KeyA | KeyCode::ArrowLeft => InputEvent::Key {
            key: KeyId::MoveLeft,
            pressed,
        },
        KeyCode::KeyD | KeyCode::ArrowRight => InputEvent::Key {
            key: KeyId::MoveRight,
            pressed,
        },
        KeyCode::Space => InputEvent::Key {
            key: KeyId::Jump,
            pressed,
        },
        KeyCode::ControlLeft | KeyCode::ControlRight => InputEvent::Modifier {
            modifier: ModifierId::Control,
            pressed,
        },
        KeyCode::ShiftLeft | KeyCode::ShiftRight => InputEvent::Modifier {
            modifier: ModifierId::Shift,
            pressed,
        },
        KeyCode::AltLeft | KeyCode::AltRight => InputEvent::Modifier {
            modifier: ModifierId::Alt,
            pressed,
        },
        _ => return None,
    };
    Some(event)
}

pub fn button_transition(button: MouseButton, state: ElementState) -> Option<InputEvent> {
    let button = match button {
        MouseButton::Left => ButtonId::Left,
        MouseButton::Right => ButtonId::Right,
        MouseButton::Middle => ButtonId::Middle,
        MouseButton::Back | MouseButton::Forward => return None,
        MouseButton::Other(code) => ButtonId::Other(code),
    };
    Some(InputEvent::Button {
        button,
        pressed: state == ElementState::Pressed,
    })
}
