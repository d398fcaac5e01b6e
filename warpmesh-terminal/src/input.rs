/// Translation of crossterm events into selector input
use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use warpmesh_core::{InputEvent, Key, KeyPress, Modifiers, PointerPress};

fn modifiers(state: KeyModifiers) -> Modifiers {
    Modifiers {
        shift: state.contains(KeyModifiers::SHIFT),
    }
}

fn key(code: KeyCode) -> Key {
    match code {
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::Char(c) => Key::Char(c),
        _ => Key::Other,
    }
}

/// Left-button presses and key presses; releases, drags and repeats are dropped
pub fn to_input_event(event: &Event) -> Option<InputEvent> {
    match *event {
        Event::Key(KeyEvent {
            code,
            modifiers: state,
            kind: KeyEventKind::Press,
            ..
        }) => Some(InputEvent::KeyPressed(KeyPress {
            key: key(code),
            modifiers: modifiers(state),
        })),
        Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: state,
        }) => Some(InputEvent::PointerPressed(PointerPress {
            x: i32::from(column),
            y: i32::from(row),
            modifiers: modifiers(state),
        })),
        _ => None,
    }
}
