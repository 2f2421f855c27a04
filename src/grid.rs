//! Calendar grid engine.
//!
//! Computes a fixed 6x7 month layout (trailing days of the previous month,
//! the displayed month, leading days of the next) and maintains it
//! incrementally while paging across month and year boundaries. The wall
//! clock is only consulted on [`MonthGrid::reset`]; navigation derives the
//! new weekday anchor from the old one plus the length of the month being
//! left.

use crate::hal::LocalTime;

pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

const MONTH_LENGTHS: [u32; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

pub fn is_leap_year(year: i32) -> bool {
    year % 400 == 0 || (year % 100 != 0 && year % 4 == 0)
}

/// Length of a month, `month0` counted from 0 (January) to 11 (December).
pub fn days_in_month(year: i32, month0: u32) -> u32 {
    if month0 == 1 {
        if is_leap_year(year) {
            29
        } else {
            28
        }
    } else {
        MONTH_LENGTHS[month0 as usize]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellStyle {
    /// Day belongs to the displayed month (drawn bright).
    CurrentMonth,
    /// Trailing/leading day borrowed from a neighboring month (drawn dim).
    AdjacentMonth,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridCell {
    pub label: u8,
    pub style: CellStyle,
}

/// The 42 cells of a month view, row-major with 7 columns.
///
/// Column `k` holds weekday `k` of the host clock's numbering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthLayout {
    cells: [GridCell; MonthLayout::CELLS],
}

impl MonthLayout {
    pub const COLUMNS: usize = 7;
    pub const ROWS: usize = 6;
    pub const CELLS: usize = Self::COLUMNS * Self::ROWS;

    pub fn cells(&self) -> &[GridCell] {
        &self.cells
    }

    pub fn cell(&self, row: usize, col: usize) -> GridCell {
        self.cells[row * Self::COLUMNS + col]
    }
}

/// Incremental month-grid state.
///
/// The anchor is a signed offset in `-6..=0` from which the grid cell of the
/// displayed month's day 1 is derived. `reset` computes it from a clock
/// snapshot; `advance_month`/`retreat_month` shift it by the length of the
/// month being left, modulo 7, so repeated paging never re-samples the clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthGrid {
    year: i32,
    month0: u32,
    anchor: i32,
}

/// Fold the congruent boundary anchor `-7` onto `0` so that `reset`,
/// `advance_month` and `retreat_month` agree on a single anchor window.
fn canonical(anchor: i32) -> i32 {
    if anchor == -7 {
        0
    } else {
        anchor
    }
}

impl MonthGrid {
    pub fn new(today: LocalTime) -> Self {
        let mut grid = MonthGrid {
            year: today.year,
            month0: 0,
            anchor: 0,
        };
        grid.reset(today);
        grid
    }

    /// Resynchronize with a wall-clock snapshot. The only operation that
    /// consults the clock; month is converted to the 0-based internal
    /// representation here and nowhere else.
    pub fn reset(&mut self, today: LocalTime) {
        self.year = today.year;
        self.month0 = today.month - 1;
        self.anchor = canonical((today.day as i32 - today.weekday as i32).rem_euclid(7) - 7);
    }

    /// Page forward one month, wrapping December into January of the next
    /// year.
    pub fn advance_month(&mut self) {
        let leaving = days_in_month(self.year, self.month0) as i32;
        self.anchor = -((-self.anchor + leaving).rem_euclid(7));
        if self.month0 == 11 {
            self.month0 = 0;
            self.year += 1;
        } else {
            self.month0 += 1;
        }
    }

    /// Page backward one month; exact inverse of [`MonthGrid::advance_month`].
    pub fn retreat_month(&mut self) {
        let (prev_year, prev_month0) = self.prev_month();
        let entering = days_in_month(prev_year, prev_month0) as i32;
        self.anchor = canonical((self.anchor + entering).rem_euclid(7) - 7);
        self.year = prev_year;
        self.month0 = prev_month0;
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    /// Displayed month, 0-based.
    pub fn month0(&self) -> u32 {
        self.month0
    }

    /// Displayed month, 1-based as the host clock reports it.
    pub fn month(&self) -> u32 {
        self.month0 + 1
    }

    pub fn month_name(&self) -> &'static str {
        MONTH_NAMES[self.month0 as usize]
    }

    fn prev_month(&self) -> (i32, u32) {
        if self.month0 == 0 {
            (self.year - 1, 11)
        } else {
            (self.year, self.month0 - 1)
        }
    }

    /// Where the day counter starts, one before the first cell's day value.
    /// The `-7` snap keeps a month whose day 1 sits in column 0 from being
    /// pushed down by a full week of trailing days.
    fn start(&self) -> i32 {
        let start = self.anchor - 1;
        if start == -7 {
            0
        } else {
            start
        }
    }

    /// Derive the full 42-cell layout from the current state.
    pub fn layout(&self) -> MonthLayout {
        let mut day = self.start();
        let (prev_year, prev_month0) = self.prev_month();
        let mut cur_len = days_in_month(prev_year, prev_month0) as i32;
        let mut prev_len = cur_len;
        let mut style = CellStyle::AdjacentMonth;

        let mut cells = [GridCell {
            label: 0,
            style: CellStyle::AdjacentMonth,
        }; MonthLayout::CELLS];

        for cell in cells.iter_mut() {
            day += 1;
            if day == 1 {
                prev_len = 0;
                cur_len = days_in_month(self.year, self.month0) as i32;
                style = CellStyle::CurrentMonth;
            }
            if day == cur_len + 1 {
                style = CellStyle::AdjacentMonth;
                day = 1;
            }
            cell.label = ((day + prev_len - 1).rem_euclid(cur_len) + 1) as u8;
            cell.style = style;
        }

        MonthLayout { cells }
    }

    /// Cell index of "today", or `None` when the displayed month is not the
    /// clock's current month. Shares the start normalization with `layout` so
    /// the highlight cannot land on a different row than the drawn day.
    pub fn today_index(&self, today: &LocalTime) -> Option<usize> {
        if self.year != today.year || self.month() != today.month {
            return None;
        }
        Some((today.day as i32 - self.start() - 1) as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, NaiveDate};

    fn snapshot(year: i32, month: u32, day: u32) -> LocalTime {
        let date = NaiveDate::from_ymd_opt(year, month, day).unwrap();
        LocalTime {
            year,
            month,
            day,
            weekday: date.weekday().num_days_from_monday(),
        }
    }

    /// Anchor recomputed from first principles via the weekday of day 1.
    fn anchor_of(year: i32, month0: u32) -> i32 {
        let wd1 = NaiveDate::from_ymd_opt(year, month0 + 1, 1)
            .unwrap()
            .weekday()
            .num_days_from_monday() as i32;
        let anchor = (1 - wd1).rem_euclid(7) - 7;
        if anchor == -7 {
            0
        } else {
            anchor
        }
    }

    #[test]
    fn leap_years() {
        assert!(is_leap_year(2000));
        assert!(!is_leap_year(1900));
        assert!(is_leap_year(2024));
        assert!(!is_leap_year(2023));

        assert_eq!(days_in_month(2000, 1), 29);
        assert_eq!(days_in_month(1900, 1), 28);
        assert_eq!(days_in_month(2024, 1), 29);
        assert_eq!(days_in_month(2023, 1), 28);
    }

    #[test]
    fn month_lengths() {
        let lengths: Vec<u32> = (0..12).map(|m| days_in_month(2023, m)).collect();
        assert_eq!(lengths, [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31]);
    }

    #[test]
    fn round_trip_all_months() {
        for &year in &[1900, 2000, 2023, 2024] {
            for month in 1..=12 {
                let state = MonthGrid::new(snapshot(year, month, 15));

                let mut forward = state;
                forward.advance_month();
                forward.retreat_month();
                assert_eq!(forward, state, "advance/retreat at {}-{}", year, month);

                let mut backward = state;
                backward.retreat_month();
                backward.advance_month();
                assert_eq!(backward, state, "retreat/advance at {}-{}", year, month);
            }
        }
    }

    #[test]
    fn anchor_never_drifts() {
        let mut grid = MonthGrid::new(snapshot(2024, 1, 15));

        for _ in 0..36 {
            grid.advance_month();
            assert_eq!(
                grid.anchor,
                anchor_of(grid.year(), grid.month0()),
                "after advancing to {}-{}",
                grid.year(),
                grid.month()
            );
        }
        for _ in 0..72 {
            grid.retreat_month();
            assert_eq!(
                grid.anchor,
                anchor_of(grid.year(), grid.month0()),
                "after retreating to {}-{}",
                grid.year(),
                grid.month()
            );
        }
    }

    #[test]
    fn layout_is_complete_and_labels_in_range() {
        let mut grid = MonthGrid::new(snapshot(2023, 1, 1));

        for _ in 0..24 {
            let layout = grid.layout();
            assert_eq!(layout.cells().len(), 42);

            let current: Vec<u8> = layout
                .cells()
                .iter()
                .filter(|c| c.style == CellStyle::CurrentMonth)
                .map(|c| c.label)
                .collect();
            let expected: Vec<u8> = (1..=days_in_month(grid.year(), grid.month0()) as u8).collect();
            assert_eq!(current, expected, "{}-{}", grid.year(), grid.month());

            for cell in layout.cells() {
                assert!((1..=31).contains(&cell.label));
            }

            grid.advance_month();
        }
    }

    #[test]
    fn adjacent_cells_continue_neighbor_months() {
        // August 2023 starts on a Tuesday; July has 31 days.
        let grid = MonthGrid::new(snapshot(2023, 8, 10));
        let layout = grid.layout();

        assert_eq!(layout.cell(0, 0).label, 31);
        assert_eq!(layout.cell(0, 0).style, CellStyle::AdjacentMonth);
        assert_eq!(layout.cell(0, 1).label, 1);
        assert_eq!(layout.cell(0, 1).style, CellStyle::CurrentMonth);

        // 31 August lands on cell 31 + 1 - 1 = 31; the remainder is September.
        let trailing: Vec<u8> = layout.cells()[32..]
            .iter()
            .map(|c| {
                assert_eq!(c.style, CellStyle::AdjacentMonth);
                c.label
            })
            .collect();
        assert_eq!(trailing, (1..=10).collect::<Vec<u8>>());
    }

    #[test]
    fn today_highlight_matches_layout() {
        let today = snapshot(2023, 8, 10);
        let grid = MonthGrid::new(today);
        let layout = grid.layout();

        let index = grid.today_index(&today).unwrap();
        assert_eq!(layout.cells()[index].label, today.day as u8);
        assert_eq!(layout.cells()[index].style, CellStyle::CurrentMonth);
    }

    #[test]
    fn today_highlight_when_month_starts_in_first_column() {
        // 1 May 2023 is a Monday, the anchor case normalized by the -7 snap.
        let today = snapshot(2023, 5, 8);
        let grid = MonthGrid::new(today);
        let layout = grid.layout();

        assert_eq!(layout.cell(0, 0).label, 1);
        assert_eq!(layout.cell(0, 0).style, CellStyle::CurrentMonth);

        let index = grid.today_index(&today).unwrap();
        assert_eq!(index, 7);
        assert_eq!(layout.cells()[index].label, 8);
    }

    #[test]
    fn today_highlight_cleared_after_navigation() {
        let today = snapshot(2024, 2, 29);
        let mut grid = MonthGrid::new(today);
        grid.advance_month();

        assert_eq!(grid.today_index(&today), None);
    }

    #[test]
    fn advance_over_leap_february() {
        // Thursday 29 February 2024, in the clock numbering of the scenario
        // (Thursday = 4); March 1 must land in the Friday column (5).
        let mut grid = MonthGrid::new(LocalTime {
            year: 2024,
            month: 2,
            day: 29,
            weekday: 4,
        });
        grid.advance_month();

        assert_eq!(grid.year(), 2024);
        assert_eq!(grid.month(), 3);

        let layout = grid.layout();
        let first_current = layout
            .cells()
            .iter()
            .position(|c| c.style == CellStyle::CurrentMonth)
            .unwrap();
        assert_eq!(layout.cells()[first_current].label, 1);
        assert_eq!(first_current % MonthLayout::COLUMNS, 5);
    }

    #[test]
    fn advance_wraps_year() {
        let mut grid = MonthGrid::new(LocalTime {
            year: 2023,
            month: 12,
            day: 31,
            weekday: 0,
        });
        grid.advance_month();

        assert_eq!(grid.year(), 2024);
        assert_eq!(grid.month(), 1);
        assert_eq!(grid.month_name(), "January");
    }

    #[test]
    fn retreat_wraps_year() {
        let mut grid = MonthGrid::new(snapshot(2024, 1, 15));
        grid.retreat_month();

        assert_eq!(grid.year(), 2023);
        assert_eq!(grid.month(), 12);
        assert_eq!(grid.anchor, anchor_of(2023, 11));
    }
}
