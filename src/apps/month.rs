//! Monthly calendar viewer.
//!
//! Controls: swipe up shows the next month, swipe down the previous one, a
//! button press returns to the current month.

use crate::apps::App;
use crate::error::Result;
use crate::grid::{CellStyle, MonthGrid, MonthLayout};
use crate::hal::{Event, EventMask, Font, HostContext, LocalTime, SwipeDirection};

const TICK_PERIOD_MS: u32 = 15_000;

// Fixed pixel layout on the 240x240 panel.
const CONTENT_TOP: u32 = 40;
const TITLE_Y: u32 = 50;
const GRID_X: u32 = 13;
const GRID_Y: u32 = 90;
const CELL_PITCH: u32 = 32;
const ROW_PITCH: u32 = 25;
const FIELD_WIDTH: u32 = 20;

pub struct MonthApp {
    grid: MonthGrid,
}

impl MonthApp {
    pub fn new(today: LocalTime) -> Self {
        MonthApp {
            grid: MonthGrid::new(today),
        }
    }

    fn cell_position(index: usize) -> (u32, u32) {
        let col = (index % MonthLayout::COLUMNS) as u32;
        let row = (index / MonthLayout::COLUMNS) as u32;
        (GRID_X + CELL_PITCH * col, GRID_Y + ROW_PITCH * row)
    }

    /// Redraw the view from scratch: title line, 42 day cells, and the
    /// highlight of today when the displayed month is the clock's month.
    fn draw(&self, host: &mut dyn HostContext) {
        let theme = host.theme();
        let now = host.localtime();
        let layout = self.grid.layout();
        let highlight = self.grid.today_index(&now);
        let title = format!("{} {}", self.grid.month_name(), self.grid.year());
        let dim = theme.dim();

        let display = host.display();
        display.fill(0x0000, CONTENT_TOP);

        display.set_font(Font::Sans24);
        display.set_color(theme.bright);
        display.string(&title, 0, TITLE_Y, 240);

        display.set_font(Font::Sans18);
        display.set_color(dim);
        let mut style = CellStyle::AdjacentMonth;
        for (index, cell) in layout.cells().iter().enumerate() {
            if cell.style != style {
                style = cell.style;
                display.set_color(match style {
                    CellStyle::CurrentMonth => theme.bright,
                    CellStyle::AdjacentMonth => dim,
                });
            }
            let (x, y) = Self::cell_position(index);
            display.string(&cell.label.to_string(), x, y, FIELD_WIDTH);
        }

        if let Some(index) = highlight {
            let (x, y) = Self::cell_position(index);
            display.set_color_with_bg(theme.bright, theme.highlight_bg);
            display.string(&now.day.to_string(), x, y, FIELD_WIDTH);
            display.set_color(theme.bright);
        }
    }
}

impl App for MonthApp {
    fn name(&self) -> &'static str {
        "Month"
    }

    fn foreground(&mut self, host: &mut dyn HostContext) -> Result<()> {
        host.request_events(EventMask::SWIPE_UPDOWN | EventMask::BUTTON);
        host.request_tick(TICK_PERIOD_MS);
        self.draw(host);
        Ok(())
    }

    fn handle(&mut self, event: Event, host: &mut dyn HostContext) -> Result<()> {
        match event {
            Event::Swipe(SwipeDirection::Up) => {
                self.grid.advance_month();
                log::debug!("month: advanced to {} {}", self.grid.month_name(), self.grid.year());
                self.draw(host);
            }
            Event::Swipe(SwipeDirection::Down) => {
                self.grid.retreat_month();
                log::debug!("month: retreated to {} {}", self.grid.month_name(), self.grid.year());
                self.draw(host);
            }
            Event::Button(pressed) => {
                if pressed {
                    self.grid.reset(host.localtime());
                    self.draw(host);
                }
            }
            // Periodic refresh is cosmetic only and never touches grid state.
            Event::Tick => {}
            Event::Touch { .. } => {}
        }
        Ok(())
    }
}
