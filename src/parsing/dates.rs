//! Calendar arithmetic for deadlines: turning matched date and time text
//! into instants, and deciding how urgent an instant is.

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};

use crate::language::{Settings, Severity};

const SECONDS_PER_MINUTE: i64 = 60;
const SECONDS_PER_HOUR: i64 = 60 * SECONDS_PER_MINUTE;
const SECONDS_PER_DAY: i64 = 24 * SECONDS_PER_HOUR;

/// Things wrong with a date as written. These are detected but, for now,
/// never reported to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateProblem {
    ImpossibleDay(u32),
    ImpossibleMonth(u32),
    PastYear(i32),
}

/// The severity and message computed for a deadline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub severity: Severity,
    pub message: String,
}

fn split_date(text: &str) -> Option<(u32, u32, i32)> {
    let mut parts = text.split('/');
    let day = parts
        .next()?
        .parse()
        .ok()?;
    let month = parts
        .next()?
        .parse()
        .ok()?;
    let year = parts
        .next()?
        .parse()
        .ok()?;
    Some((day, month, year))
}

/// Build a calendar date, letting out of range days and months spill over
/// into the following (or preceding) ones: day 32 of January is the 1st of
/// February, month 13 is January of the next year, day 0 is the last day of
/// the previous month.
pub fn calendar_date(day: u32, month: u32, year: i32) -> Option<NaiveDate> {
    let months = year as i64 * 12 + month as i64 - 1;
    let first = NaiveDate::from_ymd_opt(
        months.div_euclid(12) as i32,
        months.rem_euclid(12) as u32 + 1,
        1,
    )?;
    first.checked_add_signed(TimeDelta::days(day as i64 - 1))
}

/// A `dd/mm/yyyy` date is due at the last moment of that day.
pub fn date_deadline(text: &str) -> Option<NaiveDateTime> {
    let (day, month, year) = split_date(text)?;
    let date = calendar_date(day, month, year)?;
    date.and_hms_opt(23, 59, 59)
}

pub fn date_problems(text: &str, today: NaiveDate) -> Vec<DateProblem> {
    let mut problems = Vec::new();

    if let Some((day, month, year)) = split_date(text) {
        if day == 0 || day > 31 {
            problems.push(DateProblem::ImpossibleDay(day));
        }
        if month == 0 || month > 12 {
            problems.push(DateProblem::ImpossibleMonth(month));
        }
        if year < today.year() {
            problems.push(DateProblem::PastYear(year));
        }
    }

    problems
}

/// Hours and minutes from `hh:mm` or `hhh:mmm` text. Anything unreadable is
/// taken as midnight.
pub fn split_time(text: &str) -> (i64, i64) {
    let parsed = text
        .split_once(':')
        .and_then(|(hours, minutes)| {
            let hours = hours
                .trim_end_matches('h')
                .parse()
                .ok()?;
            let minutes = minutes
                .trim_end_matches('m')
                .parse()
                .ok()?;
            Some((hours, minutes))
        });

    parsed.unwrap_or((0, 0))
}

/// Combine a date with the time of day given by `text`. Hours and minutes
/// beyond their usual range roll over into the next day or hour.
pub fn time_deadline(date: NaiveDate, text: &str) -> NaiveDateTime {
    let (hours, minutes) = split_time(text);

    date.and_time(NaiveTime::MIN) + TimeDelta::hours(hours) + TimeDelta::minutes(minutes)
}

/// Render the remaining (or elapsed) time at its coarsest non-zero unit.
pub fn describe(delta: TimeDelta) -> String {
    let seconds = delta
        .num_seconds()
        .abs();

    let (count, unit) = if seconds > SECONDS_PER_DAY {
        (seconds / SECONDS_PER_DAY, "day")
    } else if seconds >= SECONDS_PER_HOUR {
        (seconds / SECONDS_PER_HOUR, "hour")
    } else if seconds >= SECONDS_PER_MINUTE {
        (seconds / SECONDS_PER_MINUTE, "minute")
    } else {
        (seconds, "second")
    };

    let plural = if count == 1 { "" } else { "s" };

    let suffix = if delta <= TimeDelta::zero() {
        "past deadline"
    } else {
        "remaining"
    };

    format!("{} {}{} {}", count, unit, plural, suffix)
}

/// Compare a deadline against now. Anything at or past the deadline is an
/// error; otherwise severity drops off as the thresholds are crossed, and
/// beyond `deadline_approaching` days there is nothing to say.
pub fn classify(deadline: NaiveDateTime, now: NaiveDateTime, settings: &Settings) -> Option<Verdict> {
    let delta = deadline.signed_duration_since(now);

    let (severity, prefix) = if delta <= TimeDelta::zero() {
        (Severity::Error, "Overdue")
    } else if delta < TimeDelta::days(settings.critical as i64) {
        (Severity::Warning, "Deadline is near")
    } else if delta < TimeDelta::days(settings.deadline_approaching as i64) {
        (Severity::Information, "Deadline approaching")
    } else {
        return None;
    };

    Some(Verdict {
        severity,
        message: format!("{}: {}", prefix, describe(delta)),
    })
}
