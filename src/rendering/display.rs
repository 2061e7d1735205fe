//! Crossterm terminal surface.
//!
//! Drawing goes into a back buffer sized to the terminal. `flush` writes only
//! the characters that changed since the last frame, or the whole screen
//! after a resize.

use crate::rendering::{CellStyle, FrameBuffer, RenderSurface, Tint};
use crate::CrawlResult;
use crossterm::{
    cursor, event,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor},
    terminal, QueueableCommand,
};
use std::io::{self, Write};

/// Maps a tint to a crossterm color.
pub fn tint_to_color(tint: Tint) -> Color {
    match tint {
        Tint::Default => Color::Reset,
        Tint::DarkGrey => Color::DarkGrey,
        Tint::Green => Color::Green,
        Tint::Yellow => Color::Yellow,
        Tint::White => Color::White,
        Tint::Red => Color::Red,
    }
}

/// The real terminal as a render surface.
///
/// Dropping an entered display restores the terminal.
pub struct TerminalDisplay {
    stdout: io::Stdout,
    back: FrameBuffer,
    last: Option<FrameBuffer>,
    active: bool,
}

impl Default for TerminalDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalDisplay {
    pub fn new() -> Self {
        Self {
            stdout: io::stdout(),
            back: FrameBuffer::new(0, 0),
            last: None,
            active: false,
        }
    }

    /// Whether the terminal is currently in raw mode for this display.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Switches the terminal to raw mode on the alternate screen with mouse
    /// capture and a hidden cursor.
    pub fn enter(&mut self) -> CrawlResult<()> {
        terminal::enable_raw_mode()?;
        self.active = true;
        self.stdout.queue(terminal::EnterAlternateScreen)?;
        self.stdout.queue(cursor::Hide)?;
        self.stdout.queue(terminal::DisableLineWrap)?;
        self.stdout.queue(event::EnableMouseCapture)?;
        self.stdout.flush()?;
        self.last = None;
        Ok(())
    }

    /// Restores the terminal to its normal state. Does nothing unless
    /// `enter` succeeded and the terminal has not been restored yet.
    pub fn exit(&mut self) -> CrawlResult<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        self.stdout.queue(event::DisableMouseCapture)?;
        self.stdout.queue(ResetColor)?;
        self.stdout.queue(SetAttribute(Attribute::Reset))?;
        self.stdout.queue(terminal::EnableLineWrap)?;
        self.stdout.queue(cursor::Show)?;
        self.stdout.queue(terminal::LeaveAlternateScreen)?;
        self.stdout.flush()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    fn full_redraw(&mut self) -> CrawlResult<()> {
        self.stdout
            .queue(terminal::Clear(terminal::ClearType::All))?;

        let mut current: Option<CellStyle> = None;
        for y in 0..self.back.height() {
            self.stdout.queue(cursor::MoveTo(0, y))?;
            for x in 0..self.back.width() {
                let cell = self.back.get(i32::from(x), i32::from(y)).unwrap_or_default();
                if current != Some(cell.style) {
                    self.apply_style(cell.style)?;
                    current = Some(cell.style);
                }
                self.stdout.queue(Print(cell.glyph))?;
            }
        }
        Ok(())
    }

    fn diff_redraw(&mut self, prev: &FrameBuffer) -> CrawlResult<()> {
        let mut current: Option<CellStyle> = None;
        for y in 0..i32::from(self.back.height()) {
            for x in 0..i32::from(self.back.width()) {
                let cell = self.back.get(x, y).unwrap_or_default();
                if prev.get(x, y) == Some(cell) {
                    continue;
                }
                self.stdout.queue(cursor::MoveTo(x as u16, y as u16))?;
                if current != Some(cell.style) {
                    self.apply_style(cell.style)?;
                    current = Some(cell.style);
                }
                self.stdout.queue(Print(cell.glyph))?;
            }
        }
        Ok(())
    }

    fn apply_style(&mut self, style: CellStyle) -> CrawlResult<()> {
        self.stdout.queue(SetAttribute(Attribute::Reset))?;
        self.stdout
            .queue(SetForegroundColor(tint_to_color(style.fg)))?;
        if style.bold {
            self.stdout.queue(SetAttribute(Attribute::Bold))?;
        }
        Ok(())
    }
}

impl Drop for TerminalDisplay {
    fn drop(&mut self) {
        let _ = self.exit();
    }
}

impl RenderSurface for TerminalDisplay {
    fn clear(&mut self) -> CrawlResult<()> {
        let (width, height) = terminal::size()?;
        if (width, height) != self.back.size() {
            self.back.resize(width, height);
        } else {
            self.back.clear()?;
        }
        Ok(())
    }

    fn set_cell(&mut self, x: i32, y: i32, glyph: char, style: CellStyle) {
        self.back.set_cell(x, y, glyph, style);
    }

    fn flush(&mut self) -> CrawlResult<()> {
        match self.last.take() {
            Some(prev) if prev.size() == self.back.size() => {
                self.diff_redraw(&prev)?;
            }
            _ => self.full_redraw()?,
        }

        self.stdout.queue(ResetColor)?;
        self.stdout.queue(SetAttribute(Attribute::Reset))?;
        self.stdout.flush()?;
        self.last = Some(self.back.clone());
        Ok(())
    }

    fn size(&self) -> (u16, u16) {
        self.back.size()
    }
}
