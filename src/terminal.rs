use crate::error::{Result, SphereError};
use crate::graphics::Framebuffer;
use crossterm::{
    cursor,
    event::{DisableMouseCapture, EnableMouseCapture},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self, ClearType},
};
use std::io::{self, BufWriter, Stdout, Write};

/// Raw-mode, alternate-screen terminal with mouse capture.
/// Everything is restored when the guard is dropped.
pub struct Terminal {
    out: BufWriter<Stdout>,
}

impl Terminal {
    /// Switches to raw mode and the alternate screen
    pub fn enter() -> Result<Self> {
        terminal::enable_raw_mode()?;
        let mut term = Terminal {
            out: BufWriter::new(io::stdout()),
        };
        execute!(
            term.out,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            EnableMouseCapture,
            terminal::Clear(ClearType::All)
        )?;
        Ok(term)
    }

    /// Writes the whole framebuffer to the screen
    pub fn present(&mut self, fb: &Framebuffer) -> Result<()> {
        let mut current = None;
        for y in 0..fb.height() {
            queue!(self.out, cursor::MoveTo(0, y as u16))?;
            for cell in fb.row(y) {
                if cell.glyph != ' ' {
                    let rgb = cell.rgb8();
                    if current != Some(rgb) {
                        let (r, g, b) = rgb;
                        queue!(self.out, SetForegroundColor(Color::Rgb { r, g, b }))?;
                        current = Some(rgb);
                    }
                }
                queue!(self.out, Print(cell.glyph))?;
            }
        }
        queue!(self.out, ResetColor)?;
        self.out.flush()?;
        Ok(())
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        let restored = execute!(
            self.out,
            ResetColor,
            DisableMouseCapture,
            cursor::Show,
            terminal::LeaveAlternateScreen
        );
        let cooked = terminal::disable_raw_mode();
        for e in [restored.err(), cooked.err()].into_iter().flatten() {
            log::error!("failed to restore terminal: {e}");
        }
    }
}

/// Current terminal size as (columns, rows)
pub fn size() -> Result<(usize, usize)> {
    termsize::get()
        .map(|s| (usize::from(s.cols), usize::from(s.rows)))
        .filter(|&(cols, rows)| cols > 0 && rows > 0)
        .ok_or(SphereError::TerminalSize)
}
