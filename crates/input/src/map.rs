//! Mapping from terminal events to puzzle input.
//!
//! Mouse gestures feed the drag controller; the keyboard drives a cursor and
//! taps for the selection controller.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

use crate::types::{Direction, Point};

/// Gesture input, routed to exactly one controller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    PointerDown(Point),
    PointerMove(Point),
    PointerUp(Point),
    /// The pointer source went away mid-gesture (focus lost, device gone).
    PointerCancel,
    /// Tap at a screen point.
    Tap(Point),
    /// Move the keyboard cursor.
    CursorMove(Direction),
    /// Tap the piece under the keyboard cursor.
    Activate,
}

/// Game-level commands that are not gestures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Restart,
    NextLevel,
    ToggleMode,
}

/// A mapped key press.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum KeyAction {
    Input(InputEvent),
    Command(Command),
}

/// Map keyboard input to puzzle input or a command.
pub fn handle_key_event(key: KeyEvent) -> Option<KeyAction> {
    let input = match key.code {
        // Cursor
        KeyCode::Up
        | KeyCode::Char('k')
        | KeyCode::Char('K')
        | KeyCode::Char('w')
        | KeyCode::Char('W') => InputEvent::CursorMove(Direction::Up),
        KeyCode::Down
        | KeyCode::Char('j')
        | KeyCode::Char('J')
        | KeyCode::Char('s')
        | KeyCode::Char('S') => InputEvent::CursorMove(Direction::Down),
        KeyCode::Left
        | KeyCode::Char('h')
        | KeyCode::Char('H')
        | KeyCode::Char('a')
        | KeyCode::Char('A') => InputEvent::CursorMove(Direction::Left),
        KeyCode::Right
        | KeyCode::Char('l')
        | KeyCode::Char('L')
        | KeyCode::Char('d')
        | KeyCode::Char('D') => InputEvent::CursorMove(Direction::Right),

        // Tap
        KeyCode::Enter | KeyCode::Char(' ') => InputEvent::Activate,

        // Commands
        KeyCode::Char('r') | KeyCode::Char('R') => {
            return Some(KeyAction::Command(Command::Restart))
        }
        KeyCode::Char('n') | KeyCode::Char('N') => {
            return Some(KeyAction::Command(Command::NextLevel))
        }
        KeyCode::Tab => return Some(KeyAction::Command(Command::ToggleMode)),

        _ => return None,
    };
    Some(KeyAction::Input(input))
}

/// Map mouse input. Left button drags; right click taps.
pub fn handle_mouse_event(ev: MouseEvent) -> Option<InputEvent> {
    let p = cell_center(ev.column, ev.row);
    match ev.kind {
        MouseEventKind::Down(MouseButton::Left) => Some(InputEvent::PointerDown(p)),
        MouseEventKind::Drag(MouseButton::Left) => Some(InputEvent::PointerMove(p)),
        MouseEventKind::Up(MouseButton::Left) => Some(InputEvent::PointerUp(p)),
        MouseEventKind::Down(MouseButton::Right) => Some(InputEvent::Tap(p)),
        _ => None,
    }
}

/// Terminal cells are addressed by their centers so a click anywhere in a
/// cell lands inside the grid cell drawn there.
pub fn cell_center(column: u16, row: u16) -> Point {
    Point::new(column as f32 + 0.5, row as f32 + 0.5)
}

/// Check if key should quit the game.
pub fn should_quit(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc)
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}
