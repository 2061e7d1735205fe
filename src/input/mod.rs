//! # Input Module
//!
//! Turns terminal events into messages for the session.
//!
//! Translation happens in two steps: [`translate_event`] reduces a raw
//! crossterm event to an [`InputEvent`], and [`InputHandler`] resolves that
//! against the map layout into a [`SessionMessage`]. The [`reader`] module
//! runs both on a background task and delivers the messages over a channel.

pub mod reader;

pub use reader::*;

use crate::game::{Direction, Grid, GridConvention, Position};
use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEventKind,
};

/// A terminal event the game cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// Movement key
    Move(Direction),
    /// Left mouse button pressed at a screen character
    Click { column: u16, row: u16 },
    /// Quit key
    Quit,
}

/// Message sent from the input task to the game loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionMessage {
    /// Walk toward this cell, one step per movement tick
    TargetSelected(Position),
    /// Move one cell right away
    Step(Direction),
    /// End the session
    Quit,
}

/// Maps a crossterm event to an input event.
///
/// Key releases and repeats are ignored, as are mouse events other than a
/// left button press.
pub fn translate_event(event: &Event) -> Option<InputEvent> {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => translate_key(*key),
        Event::Mouse(mouse) => match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => Some(InputEvent::Click {
                column: mouse.column,
                row: mouse.row,
            }),
            _ => None,
        },
        _ => None,
    }
}

/// Maps a key press to an input event.
pub fn translate_key(key: KeyEvent) -> Option<InputEvent> {
    if should_quit(key) {
        return Some(InputEvent::Quit);
    }

    let direction = match key.code {
        KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('k') => Direction::Up,
        KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('j') => Direction::Down,
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('h') => Direction::Left,
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('l') => Direction::Right,
        _ => return None,
    };
    Some(InputEvent::Move(direction))
}

/// Checks if a key should end the session.
pub fn should_quit(key: KeyEvent) -> bool {
    matches!(
        key.code,
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc
    ) || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}

/// Resolves input events against the map layout.
///
/// The map is drawn with its first cell at the top-left corner of the
/// terminal, so a click maps straight through the convention's screen
/// layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputHandler {
    convention: GridConvention,
    width: u32,
    height: u32,
}

impl InputHandler {
    /// Creates a handler for maps of the given size.
    pub fn new(convention: GridConvention, width: u32, height: u32) -> Self {
        Self {
            convention,
            width,
            height,
        }
    }

    /// Creates a handler matching a grid's convention and size.
    pub fn for_grid(grid: &Grid) -> Self {
        Self::new(grid.convention(), grid.width(), grid.height())
    }

    /// Maps a screen character to a cell of the map, if it covers one.
    ///
    /// # Examples
    ///
    /// ```
    /// use hexcrawl::{GridConvention, InputHandler, Position};
    ///
    /// let handler = InputHandler::new(GridConvention::Axial, 20, 20);
    /// assert_eq!(handler.cell_at(7, 3), Some(Position::new(3, 3)));
    /// assert_eq!(handler.cell_at(70, 3), None);
    /// ```
    pub fn cell_at(&self, column: u16, row: u16) -> Option<Position> {
        self.convention
            .screen_to_cell(i32::from(column), i32::from(row))
            .filter(|&pos| self.convention.is_valid(pos, self.width, self.height))
    }

    /// Converts an input event into a session message.
    ///
    /// Clicks that miss the map produce nothing.
    pub fn to_message(&self, event: InputEvent) -> Option<SessionMessage> {
        match event {
            InputEvent::Move(direction) => Some(SessionMessage::Step(direction)),
            InputEvent::Click { column, row } => {
                self.cell_at(column, row).map(SessionMessage::TargetSelected)
            }
            InputEvent::Quit => Some(SessionMessage::Quit),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEventState, MouseEvent};

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> Event {
        Event::Mouse(MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    #[test]
    fn test_movement_keys() {
        assert_eq!(
            translate_key(KeyEvent::from(KeyCode::Left)),
            Some(InputEvent::Move(Direction::Left))
        );
        assert_eq!(
            translate_key(KeyEvent::from(KeyCode::Char('w'))),
            Some(InputEvent::Move(Direction::Up))
        );
        assert_eq!(
            translate_key(KeyEvent::from(KeyCode::Char('j'))),
            Some(InputEvent::Move(Direction::Down))
        );
        assert_eq!(translate_key(KeyEvent::from(KeyCode::Char('x'))), None);
    }

    #[test]
    fn test_quit_keys() {
        assert!(should_quit(KeyEvent::from(KeyCode::Char('q'))));
        assert!(should_quit(KeyEvent::from(KeyCode::Esc)));
        assert!(should_quit(KeyEvent::new(
            KeyCode::Char('c'),
            KeyModifiers::CONTROL
        )));
        assert!(!should_quit(KeyEvent::from(KeyCode::Char('c'))));
    }

    #[test]
    fn test_key_release_is_ignored() {
        let release = KeyEvent {
            code: KeyCode::Left,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        };
        assert_eq!(translate_event(&Event::Key(release)), None);
        assert_eq!(
            translate_event(&Event::Key(KeyEvent::from(KeyCode::Left))),
            Some(InputEvent::Move(Direction::Left))
        );
    }

    #[test]
    fn test_mouse_events() {
        assert_eq!(
            translate_event(&mouse(MouseEventKind::Down(MouseButton::Left), 4, 2)),
            Some(InputEvent::Click { column: 4, row: 2 })
        );
        assert_eq!(
            translate_event(&mouse(MouseEventKind::Down(MouseButton::Right), 4, 2)),
            None
        );
        assert_eq!(translate_event(&mouse(MouseEventKind::Moved, 4, 2)), None);
    }

    #[test]
    fn test_click_maps_to_cell() {
        let handler = InputHandler::new(GridConvention::Axial, 20, 20);
        assert_eq!(
            handler.to_message(InputEvent::Click { column: 5, row: 1 }),
            Some(SessionMessage::TargetSelected(Position::new(2, 1)))
        );
        assert_eq!(
            handler.to_message(InputEvent::Click { column: 0, row: 1 }),
            None
        );
        assert_eq!(
            handler.to_message(InputEvent::Click { column: 5, row: 30 }),
            None
        );
    }

    #[test]
    fn test_click_on_hex_glyph() {
        let handler = InputHandler::new(GridConvention::HexParity, 10, 10);
        // Every character of a glyph resolves to its cell.
        for (column, row) in GridConvention::HexParity.footprint(Position::new(3, 5)) {
            assert_eq!(
                handler.cell_at(column as u16, row as u16),
                Some(Position::new(3, 5))
            );
        }
    }

    #[test]
    fn test_keys_and_quit_pass_through() {
        let handler = InputHandler::new(GridConvention::Axial, 4, 4);
        assert_eq!(
            handler.to_message(InputEvent::Move(Direction::Up)),
            Some(SessionMessage::Step(Direction::Up))
        );
        assert_eq!(
            handler.to_message(InputEvent::Quit),
            Some(SessionMessage::Quit)
        );
    }
}
