//! Pure calendar-grid generation for the date-selection step.
//!
//! A grid is deterministic given (year, month, subject, today) and carries no
//! behavior of its own; rendering into inline keyboards happens in
//! `bot::keyboards`.

use chrono::{Datelike, NaiveDate};

use super::Subject;

/// Policy knobs for date selectability.
///
/// `allow_today` decides whether a lesson can be booked for the current day.
/// The default is `false`: only strictly future dates are selectable.
#[derive(Debug, Clone, Copy, Default)]
pub struct CalendarPolicy {
    pub allow_today: bool,
}

/// One cell of the 7-column month grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayCell {
    /// Padding before the first or after the last day of the month.
    Blank,
    /// A real day that cannot be booked (wrong weekday or in the past).
    Inert(u32),
    /// A bookable day.
    Selectable(u32),
}

/// A month of the booking calendar for one subject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthGrid {
    pub subject: Subject,
    pub year: i32,
    pub month: u32,
    /// Rows of exactly seven cells, Monday first.
    pub weeks: Vec<[DayCell; 7]>,
    /// Whether "previous month" navigation leads anywhere useful.
    pub prev_enabled: bool,
}

impl MonthGrid {
    pub fn selectable_days(&self) -> Vec<u32> {
        self.weeks
            .iter()
            .flatten()
            .filter_map(|cell| match cell {
                DayCell::Selectable(day) => Some(*day),
                _ => None,
            })
            .collect()
    }
}

/// Generates the grid for `(year, month)` as seen on `today`.
///
/// A day is selectable iff its weekday matches the subject's lesson weekday
/// and it is not in the past relative to `today` (see [`CalendarPolicy`]).
/// Out-of-range `(year, month)` inputs produce an empty grid rather than a
/// fault; callers only ever reach them through month navigation.
pub fn generate(
    year: i32,
    month: u32,
    subject: Subject,
    today: NaiveDate,
    policy: CalendarPolicy,
) -> MonthGrid {
    let first = match NaiveDate::from_ymd_opt(year, month, 1) {
        Some(d) => d,
        None => {
            return MonthGrid {
                subject,
                year,
                month,
                weeks: Vec::new(),
                prev_enabled: false,
            }
        }
    };

    let lesson_weekday = subject.lesson_weekday();
    let leading_blanks = first.weekday().number_from_monday() as usize - 1;

    let mut cells: Vec<DayCell> = vec![DayCell::Blank; leading_blanks];
    for day in 1..=days_in_month(year, month) {
        let cell = match NaiveDate::from_ymd_opt(year, month, day) {
            Some(date) => {
                let future = date > today || (policy.allow_today && date == today);
                if date.weekday() == lesson_weekday && future {
                    DayCell::Selectable(day)
                } else {
                    DayCell::Inert(day)
                }
            }
            None => DayCell::Blank,
        };
        cells.push(cell);
    }
    while cells.len() % 7 != 0 {
        cells.push(DayCell::Blank);
    }

    let weeks = cells
        .chunks_exact(7)
        .map(|chunk| {
            let mut row = [DayCell::Blank; 7];
            row.copy_from_slice(chunk);
            row
        })
        .collect();

    // Going back is pointless once the previous month lies entirely before
    // the first day of the current real month.
    let current_month_start = match NaiveDate::from_ymd_opt(today.year(), today.month(), 1) {
        Some(d) => d,
        None => today,
    };
    let prev_enabled = first > current_month_start;

    MonthGrid {
        subject,
        year,
        month,
        weeks,
        prev_enabled,
    }
}

/// `(year, month)` of the month after the given one.
pub fn next_month(year: i32, month: u32) -> (i32, u32) {
    if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    }
}

/// `(year, month)` of the month before the given one.
pub fn prev_month(year: i32, month: u32) -> (i32, u32) {
    if month == 1 {
        (year - 1, 12)
    } else {
        (year, month - 1)
    }
}

fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_m) = next_month(year, month);
    NaiveDate::from_ymd_opt(next_year, next_m, 1)
        .and_then(|d| d.pred_opt())
        .map(|d| d.day())
        .unwrap_or(28)
}
