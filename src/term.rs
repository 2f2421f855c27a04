//! Terminal host adapter.
//!
//! Development stand-in for the device framework: a 240x240 virtual pixel
//! surface mapped onto terminal character cells, a wall clock backed by
//! `chrono`, and the [`HostContext`] glue the applications run against.

use crate::config::{Config, Theme};
use crate::hal::{
    ClockSource, DisplaySurface, EventMask, Font, HostContext, LocalTime, Rgb565,
};
use chrono::{Datelike, Local};
use std::io;
use std::io::Write;
use std::path::{Path, PathBuf};

pub const DISPLAY_WIDTH: u32 = 240;
pub const DISPLAY_HEIGHT: u32 = 240;

// One character cell stands in for an 8x20 pixel block.
const PX_PER_COL: u32 = 8;
const PX_PER_ROW: u32 = 20;
const COLS: usize = (DISPLAY_WIDTH / PX_PER_COL) as usize;
const ROWS: usize = (DISPLAY_HEIGHT / PX_PER_ROW) as usize;

/// Expand an RGB565 color to 8-bit channels, replicating the high bits so
/// full-scale values map to full-scale.
pub fn rgb565_to_rgb888(color: Rgb565) -> (u8, u8, u8) {
    let r = ((color >> 11) & 0x1f) as u8;
    let g = ((color >> 5) & 0x3f) as u8;
    let b = (color & 0x1f) as u8;
    ((r << 3) | (r >> 2), (g << 2) | (g >> 4), (b << 3) | (b >> 2))
}

pub struct TermClock;

impl ClockSource for TermClock {
    fn localtime(&self) -> LocalTime {
        let now = Local::now();
        LocalTime {
            year: now.year(),
            month: now.month(),
            day: now.day(),
            weekday: now.weekday().num_days_from_monday(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct TermCell {
    ch: char,
    fg: Rgb565,
    bg: Rgb565,
}

impl Default for TermCell {
    fn default() -> TermCell {
        TermCell {
            ch: ' ',
            fg: 0xffff,
            bg: 0x0000,
        }
    }
}

pub struct TermSurface {
    cells: Vec<TermCell>,
    fg: Rgb565,
    bg: Rgb565,
}

impl TermSurface {
    pub fn new() -> TermSurface {
        TermSurface {
            cells: vec![TermCell::default(); COLS * ROWS],
            fg: 0xffff,
            bg: 0x0000,
        }
    }

    fn cell_mut(&mut self, row: usize, col: usize) -> &mut TermCell {
        &mut self.cells[row * COLS + col]
    }

    /// Write the buffer with colors; the caller is responsible for cursor
    /// placement. Rows are terminated `\r\n` for raw-mode terminals.
    pub fn render_to<W: Write>(&self, out: &mut W) -> io::Result<()> {
        for row in 0..ROWS {
            for col in 0..COLS {
                let cell = self.cells[row * COLS + col];
                let (fr, fg, fb) = rgb565_to_rgb888(cell.fg);
                let (br, bg_, bb) = rgb565_to_rgb888(cell.bg);
                write!(
                    out,
                    "{}{}{}",
                    termion::color::Fg(termion::color::Rgb(fr, fg, fb)),
                    termion::color::Bg(termion::color::Rgb(br, bg_, bb)),
                    cell.ch
                )?;
            }
            write!(
                out,
                "{}{}\r\n",
                termion::color::Fg(termion::color::Reset),
                termion::color::Bg(termion::color::Reset)
            )?;
        }
        Ok(())
    }

    /// Colorless rendering for `--show` output and tests.
    pub fn render_plain(&self) -> String {
        let mut text = String::with_capacity(ROWS * (COLS + 1));
        for row in 0..ROWS {
            for col in 0..COLS {
                text.push(self.cells[row * COLS + col].ch);
            }
            while text.ends_with(' ') {
                text.pop();
            }
            text.push('\n');
        }
        text
    }
}

impl Default for TermSurface {
    fn default() -> Self {
        TermSurface::new()
    }
}

impl DisplaySurface for TermSurface {
    fn fill(&mut self, color: Rgb565, from_y: u32) {
        let from_row = (from_y / PX_PER_ROW) as usize;
        for row in from_row..ROWS {
            for col in 0..COLS {
                *self.cell_mut(row, col) = TermCell {
                    ch: ' ',
                    fg: self.fg,
                    bg: color,
                };
            }
        }
    }

    fn set_font(&mut self, _font: Font) {
        // font choice has no effect on the character grid
    }

    fn set_color(&mut self, fg: Rgb565) {
        self.fg = fg;
        self.bg = 0x0000;
    }

    fn set_color_with_bg(&mut self, fg: Rgb565, bg: Rgb565) {
        self.fg = fg;
        self.bg = bg;
    }

    fn string(&mut self, text: &str, x: u32, y: u32, width: u32) {
        let row = (y / PX_PER_ROW) as usize;
        if row >= ROWS {
            return;
        }
        let start_col = (x / PX_PER_COL) as usize;
        let field = ((width / PX_PER_COL) as usize).max(1);

        let (fg, bg) = (self.fg, self.bg);
        for offset in 0..field {
            let col = start_col + offset;
            if col >= COLS {
                break;
            }
            *self.cell_mut(row, col) = TermCell { ch: ' ', fg, bg };
        }

        let chars: Vec<char> = text.chars().collect();
        let pad = field.saturating_sub(chars.len()) / 2;
        for (offset, ch) in chars.into_iter().enumerate() {
            let col = start_col + pad + offset;
            if col >= COLS {
                break;
            }
            *self.cell_mut(row, col) = TermCell { ch, fg, bg };
        }
    }
}

/// Host context driving the applications from a terminal session.
pub struct TermHost {
    clock: TermClock,
    surface: TermSurface,
    theme: Theme,
    data_dir: PathBuf,
    requested: EventMask,
    tick_ms: Option<u32>,
    vibrate_pending: bool,
    switch_pending: bool,
}

impl TermHost {
    pub fn new(config: &Config) -> TermHost {
        TermHost {
            clock: TermClock,
            surface: TermSurface::new(),
            theme: config.theme,
            data_dir: config.data_dir(),
            requested: EventMask::NONE,
            tick_ms: None,
            vibrate_pending: false,
            switch_pending: false,
        }
    }

    pub fn surface(&self) -> &TermSurface {
        &self.surface
    }

    pub fn requested_events(&self) -> EventMask {
        self.requested
    }

    pub fn tick_period(&self) -> Option<u32> {
        self.tick_ms
    }

    /// Drop the outgoing app's event and tick subscriptions; the incoming
    /// app's `foreground` requests its own.
    pub fn clear_subscriptions(&mut self) {
        self.requested = EventMask::NONE;
        self.tick_ms = None;
    }

    pub fn take_vibration(&mut self) -> bool {
        std::mem::replace(&mut self.vibrate_pending, false)
    }

    pub fn take_switch_request(&mut self) -> bool {
        std::mem::replace(&mut self.switch_pending, false)
    }
}

impl HostContext for TermHost {
    fn localtime(&self) -> LocalTime {
        self.clock.localtime()
    }

    fn display(&mut self) -> &mut dyn DisplaySurface {
        &mut self.surface
    }

    fn theme(&self) -> Theme {
        self.theme
    }

    fn request_events(&mut self, mask: EventMask) {
        self.requested = mask;
    }

    fn request_tick(&mut self, period_ms: u32) {
        self.tick_ms = Some(period_ms);
    }

    fn vibrate(&mut self) {
        self.vibrate_pending = true;
    }

    fn switch_app(&mut self) {
        self.switch_pending = true;
    }

    fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
