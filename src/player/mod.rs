//! Player: the runtime playback controller.
//!
//! Consumes a `PlayablePresentation` and plays it in the terminal at its
//! recorded frame rate. The player does not interpret semantics or make
//! rendering decisions; it treats the presentation as an immutable,
//! authoritative visual script.

use std::io::{self, Write};
use std::time::{Duration, Instant};

use anyhow::{Result, bail};
use crossterm::event::{KeyCode, KeyEventKind};
use crossterm::{cursor, event, execute, queue, style, terminal};

use crate::menubar::{PLAYER_ITEMS, print_menu};
use crate::types::{Cell, Color, Frame, Marker, NamedColor, PlayablePresentation, Style};

/// Rows reserved above the canvas for the menu bar.
const CANVAS_OFFSET: u16 = 1;
/// Input poll interval while paused.
const IDLE_POLL: Duration = Duration::from_millis(250);

pub struct Player {
    presentation: PlayablePresentation,
    title: String,
    current_frame: usize,
    grid: Vec<Vec<Cell>>,
    playing: bool,
}

impl Player {
    pub fn new(presentation: PlayablePresentation, title: impl Into<String>) -> Self {
        let w = presentation.contract.width as usize;
        let h = presentation.contract.height as usize;
        Self {
            presentation,
            title: title.into(),
            current_frame: 0,
            grid: vec![vec![Cell::default(); w]; h],
            playing: true,
        }
    }

    /// Play the presentation in the terminal.
    ///
    /// Sets up the terminal, enters the event loop, and restores the terminal
    /// on exit (even on error).
    pub fn play(&mut self) -> Result<()> {
        if self.presentation.frames.is_empty() {
            bail!("presentation has no frames");
        }
        let (term_w, term_h) = terminal::size()?;
        let need_w = self.presentation.contract.width;
        let need_h = self.presentation.contract.height;
        // +2: one row for menu bar, one row for status bar
        if term_w < need_w || term_h < need_h + 2 {
            bail!(
                "Terminal too small: need {}x{}, have {}x{}",
                need_w,
                need_h + 2,
                term_w,
                term_h,
            );
        }

        let mut stdout = io::stdout();
        terminal::enable_raw_mode()?;
        execute!(
            stdout,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            terminal::Clear(terminal::ClearType::All),
        )?;

        let result = self.run_loop(&mut stdout);

        // Always restore terminal state.
        let _ = execute!(stdout, cursor::Show, terminal::LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();

        result
    }

    fn last_frame(&self) -> usize {
        self.presentation.frames.len().saturating_sub(1)
    }

    fn frame_time(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.presentation.fps.max(1)))
    }

    // -----------------------------------------------------------------------
    // Event loop
    // -----------------------------------------------------------------------

    fn run_loop(&mut self, stdout: &mut io::Stdout) -> Result<()> {
        self.apply_frame(0);
        self.redraw(stdout)?;

        let frame_time = self.frame_time();
        let mut next_tick = Instant::now() + frame_time;
        loop {
            let timeout = if self.playing {
                next_tick.saturating_duration_since(Instant::now())
            } else {
                IDLE_POLL
            };

            if event::poll(timeout)? {
                match event::read()? {
                    event::Event::Key(key) if key.kind == KeyEventKind::Press => {
                        if !self.handle_key(key.code, stdout)? {
                            break;
                        }
                        next_tick = Instant::now() + frame_time;
                    }
                    event::Event::Resize(_, _) => self.redraw(stdout)?,
                    _ => {}
                }
                continue;
            }

            if self.playing {
                if self.current_frame < self.last_frame() {
                    self.seek(self.current_frame + 1, stdout)?;
                } else {
                    self.playing = false;
                    self.render_status(stdout)?;
                }
                next_tick += frame_time;
                let now = Instant::now();
                if next_tick < now {
                    // Fell behind: drop the backlog rather than fast-forwarding.
                    next_tick = now + frame_time;
                }
            }
        }

        Ok(())
    }

    /// Returns `false` when the player should exit.
    fn handle_key(&mut self, code: KeyCode, stdout: &mut io::Stdout) -> Result<bool> {
        let target = match code {
            KeyCode::Char('q') | KeyCode::Esc => return Ok(false),
            KeyCode::Char(' ') => {
                if self.current_frame >= self.last_frame() {
                    self.seek(0, stdout)?;
                }
                self.playing = !self.playing;
                None
            }
            KeyCode::Char('r') => {
                self.playing = true;
                Some(0)
            }
            KeyCode::Right => {
                self.playing = false;
                Some((self.current_frame + 1).min(self.last_frame()))
            }
            KeyCode::Left => {
                self.playing = false;
                Some(self.current_frame.saturating_sub(1))
            }
            KeyCode::Char('n') => next_marker(&self.presentation.markers, self.current_frame),
            KeyCode::Char('p') => prev_marker(&self.presentation.markers, self.current_frame),
            KeyCode::Home => Some(0),
            KeyCode::End => Some(self.last_frame()),
            _ => None,
        };
        if let Some(frame) = target {
            self.seek(frame, stdout)?;
        }
        self.render_status(stdout)?;
        Ok(true)
    }

    // -----------------------------------------------------------------------
    // Grid management
    // -----------------------------------------------------------------------

    /// Move to `target`, drawing a diff when it is the next frame and a full
    /// redraw otherwise.
    fn seek(&mut self, target: usize, stdout: &mut io::Stdout) -> Result<()> {
        let target = target.min(self.last_frame());
        if target == self.current_frame + 1 {
            self.current_frame = target;
            self.apply_frame(target);
            self.render_diff(stdout, target)?;
        } else if target != self.current_frame {
            self.current_frame = target;
            self.rebuild_grid(target);
            self.render_full(stdout)?;
        }
        self.render_status(stdout)
    }

    fn apply_frame(&mut self, index: usize) {
        let Some(frame) = self.presentation.frames.get(index) else {
            return;
        };
        match frame {
            Frame::Full { cells } => {
                self.grid = cells.clone();
            }
            Frame::Diff { changes } => {
                for change in changes {
                    let x = change.x as usize;
                    let y = change.y as usize;
                    if let Some(cell) = self.grid.get_mut(y).and_then(|row| row.get_mut(x)) {
                        *cell = change.cell.clone();
                    }
                }
            }
        }
    }

    fn rebuild_grid(&mut self, target: usize) {
        // Replay from the nearest full frame at or before the target.
        let start = self.presentation.frames[..=target]
            .iter()
            .rposition(|f| matches!(f, Frame::Full { .. }))
            .unwrap_or(0);
        for i in start..=target {
            self.apply_frame(i);
        }
    }

    // -----------------------------------------------------------------------
    // Terminal output
    // -----------------------------------------------------------------------

    fn redraw(&self, stdout: &mut io::Stdout) -> Result<()> {
        print_menu(stdout, PLAYER_ITEMS)?;
        self.render_full(stdout)?;
        self.render_status(stdout)
    }

    fn render_full(&self, stdout: &mut io::Stdout) -> Result<()> {
        for (y, row) in self.grid.iter().enumerate() {
            queue!(stdout, cursor::MoveTo(0, y as u16 + CANVAS_OFFSET))?;
            for cell in row {
                let cs = to_content_style(&cell.style);
                queue!(
                    stdout,
                    style::PrintStyledContent(style::StyledContent::new(cs, cell.ch))
                )?;
            }
        }
        stdout.flush()?;
        Ok(())
    }

    fn render_diff(&self, stdout: &mut io::Stdout, frame_index: usize) -> Result<()> {
        match &self.presentation.frames[frame_index] {
            Frame::Diff { changes } => {
                for change in changes {
                    let cs = to_content_style(&change.cell.style);
                    queue!(
                        stdout,
                        cursor::MoveTo(change.x, change.y + CANVAS_OFFSET),
                        style::PrintStyledContent(style::StyledContent::new(cs, change.cell.ch)),
                    )?;
                }
                stdout.flush()?;
            }
            Frame::Full { .. } => self.render_full(stdout)?,
        }
        Ok(())
    }

    fn render_status(&self, stdout: &mut io::Stdout) -> Result<()> {
        let status_y = self.presentation.contract.height + CANVAS_OFFSET;
        let (_, term_h) = terminal::size()?;
        if status_y >= term_h {
            return Ok(()); // No room for status bar.
        }

        let fps = self.presentation.fps;
        let state = if self.playing { "▶" } else { "❚❚" };
        let step = current_marker(&self.presentation.markers, self.current_frame)
            .map(|m| m.label.as_str())
            .unwrap_or("");
        let status = format!(
            " {state} {} | {} / {} | frame {}/{} | {step} ",
            self.title,
            format_clock(self.current_frame + 1, fps),
            format_clock(self.presentation.frames.len(), fps),
            self.current_frame + 1,
            self.presentation.frames.len(),
        );

        let mut cs = style::ContentStyle::default();
        cs.attributes.set(style::Attribute::Dim);

        queue!(
            stdout,
            cursor::MoveTo(0, status_y),
            terminal::Clear(terminal::ClearType::CurrentLine),
            style::PrintStyledContent(style::StyledContent::new(cs, status)),
        )?;
        stdout.flush()?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Marker navigation
// ---------------------------------------------------------------------------

/// The step marker `frame` falls under.
fn current_marker(markers: &[Marker], frame: usize) -> Option<&Marker> {
    markers.iter().rev().find(|m| m.frame_index <= frame)
}

fn next_marker(markers: &[Marker], frame: usize) -> Option<usize> {
    markers
        .iter()
        .map(|m| m.frame_index)
        .find(|&i| i > frame)
}

/// Start of the current step, or of the previous one when already at a start.
fn prev_marker(markers: &[Marker], frame: usize) -> Option<usize> {
    markers
        .iter()
        .rev()
        .map(|m| m.frame_index)
        .find(|&i| i < frame)
}

/// `m:ss.s` for a frame count at `fps`.
fn format_clock(frames: usize, fps: u32) -> String {
    let secs = frames as f64 / f64::from(fps.max(1));
    let minutes = (secs / 60.0).floor();
    format!("{}:{:04.1}", minutes as u64, secs - minutes * 60.0)
}

// ---------------------------------------------------------------------------
// Style conversion
// ---------------------------------------------------------------------------

pub fn to_content_style(s: &Style) -> style::ContentStyle {
    let mut cs = style::ContentStyle::default();
    if let Some(fg) = s.fg {
        cs.foreground_color = Some(to_ct_color(fg));
    }
    if let Some(bg) = s.bg {
        cs.background_color = Some(to_ct_color(bg));
    }
    if s.bold {
        cs.attributes.set(style::Attribute::Bold);
    }
    if s.dim {
        cs.attributes.set(style::Attribute::Dim);
    }
    cs
}

pub fn to_ct_color(c: Color) -> style::Color {
    match c {
        Color::Named(n) => match n {
            NamedColor::Black => style::Color::Black,
            NamedColor::Red => style::Color::Red,
            NamedColor::Green => style::Color::Green,
            NamedColor::Yellow => style::Color::Yellow,
            NamedColor::Blue => style::Color::Blue,
            NamedColor::Magenta => style::Color::Magenta,
            NamedColor::Cyan => style::Color::Cyan,
            NamedColor::White => style::Color::White,
        },
        Color::Rgb { r, g, b } => style::Color::Rgb { r, g, b },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn markers() -> Vec<Marker> {
        [(0, "write title"), (24, "create axes"), (48, "wait 1.0s")]
            .into_iter()
            .map(|(frame_index, label)| Marker {
                frame_index,
                label: label.to_string(),
            })
            .collect()
    }

    #[test]
    fn marker_navigation() {
        let m = markers();
        assert_eq!(next_marker(&m, 0), Some(24));
        assert_eq!(next_marker(&m, 48), None);
        assert_eq!(prev_marker(&m, 30), Some(24));
        assert_eq!(prev_marker(&m, 24), Some(0));
        assert_eq!(prev_marker(&m, 0), None);
        assert_eq!(current_marker(&m, 30).map(|m| m.label.as_str()), Some("create axes"));
    }

    #[test]
    fn clock_formatting() {
        assert_eq!(format_clock(36, 24), "0:01.5");
        assert_eq!(format_clock(24 * 75, 24), "1:15.0");
    }
}
