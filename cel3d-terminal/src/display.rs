/// Writes rendered frames to a crossterm terminal
use cel3d_core::{FrameBuffer, FrameStats, Palette};
use crossterm::{
    cursor,
    style::{Print, PrintStyledContent, Stylize},
    terminal::{Clear, ClearType},
    QueueableCommand,
};
use std::io::{self, Write};

/// Queues whole frames line by line.
///
/// Rows are positioned with explicit cursor moves because raw mode does not
/// turn `\n` into a carriage return.
pub struct TerminalDisplay {
    show_status: bool,
}

impl TerminalDisplay {
    pub fn new(show_status: bool) -> Self {
        Self { show_status }
    }

    pub fn draw<W: Write>(
        &self,
        writer: &mut W,
        frame: &FrameBuffer,
        palette: &Palette,
    ) -> io::Result<()> {
        writer.queue(Clear(ClearType::All))?;
        for (y, line) in frame.to_text(palette).lines().enumerate() {
            writer.queue(cursor::MoveTo(0, y as u16))?;
            writer.queue(Print(line))?;
        }
        Ok(())
    }

    /// Overlay a one-line summary on the top row
    pub fn draw_status<W: Write>(
        &self,
        writer: &mut W,
        stats: &FrameStats,
        fps: f32,
    ) -> io::Result<()> {
        if !self.show_status {
            return Ok(());
        }
        let status = format!(
            "cel3d | FPS: {:.1} | drawn {} culled {} | arrows/WASD=camera E/R=roll Q=quit",
            fps, stats.drawn, stats.culled
        );
        writer.queue(cursor::MoveTo(0, 0))?;
        writer.queue(PrintStyledContent(status.yellow()))?;
        Ok(())
    }
}
