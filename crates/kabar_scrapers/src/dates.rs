//! Indonesian date strings to absolute `+07:00` timestamps.
//!
//! Parsing never fails: anything that cannot be read degrades to "now".

use chrono::{DateTime, Duration, FixedOffset};
use kabar_core::now_wib;
use tracing::{debug, warn};

pub const FULL_MONTHS: &[(&str, u32)] = &[
    ("Januari", 1),
    ("Februari", 2),
    ("Maret", 3),
    ("April", 4),
    ("Mei", 5),
    ("Juni", 6),
    ("Juli", 7),
    ("Agustus", 8),
    ("September", 9),
    ("Oktober", 10),
    ("November", 11),
    ("Desember", 12),
];

pub const SHORT_MONTHS: &[(&str, u32)] = &[
    ("Jan", 1),
    ("Feb", 2),
    ("Mar", 3),
    ("Apr", 4),
    ("Mei", 5),
    ("Jun", 6),
    ("Jul", 7),
    ("Agu", 8),
    ("Sep", 9),
    ("Okt", 10),
    ("Nov", 11),
    ("Des", 12),
];

const RELATIVE_MARKER: &str = "yang lalu";
/// Relative offsets beyond a year are treated as unparseable.
const MAX_RELATIVE_MINUTES: i64 = 366 * 24 * 60;
const TIMEZONE_SUFFIX: &str = "WIB";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelativeUnit {
    Minutes,
    Hours,
    Days,
}

impl RelativeUnit {
    fn word(&self) -> &'static str {
        match self {
            RelativeUnit::Minutes => "menit",
            RelativeUnit::Hours => "jam",
            RelativeUnit::Days => "hari",
        }
    }

    fn duration(&self, amount: i64) -> Option<Duration> {
        match self {
            RelativeUnit::Minutes => Duration::try_minutes(amount),
            RelativeUnit::Hours => Duration::try_hours(amount),
            RelativeUnit::Days => Duration::try_days(amount),
        }
    }
}

/// The date dialect of one source: its month-name table and the relative
/// units it writes.
#[derive(Debug, Clone, Copy)]
pub struct DateGrammar {
    pub months: &'static [(&'static str, u32)],
    pub relative_units: &'static [RelativeUnit],
}

impl DateGrammar {
    pub const fn new(
        months: &'static [(&'static str, u32)],
        relative_units: &'static [RelativeUnit],
    ) -> Self {
        Self {
            months,
            relative_units,
        }
    }

    pub fn parse(&self, raw: &str) -> DateTime<FixedOffset> {
        self.parse_at(raw, now_wib())
    }

    /// Parses `raw` relative to `now`, returning `now` when it cannot.
    pub fn parse_at(&self, raw: &str, now: DateTime<FixedOffset>) -> DateTime<FixedOffset> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            debug!("Empty date string, using current time");
            return now;
        }

        let parsed = if trimmed.to_lowercase().contains(RELATIVE_MARKER) {
            self.parse_relative(trimmed, now)
        } else {
            self.parse_absolute(trimmed)
        };

        parsed.unwrap_or_else(|| {
            warn!(raw = trimmed, "Unparseable date string, using current time");
            now
        })
    }

    fn month_number(&self, name: &str) -> Option<u32> {
        self.months
            .iter()
            .find(|(month, _)| month.eq_ignore_ascii_case(name))
            .map(|(_, number)| *number)
    }

    fn parse_relative(&self, text: &str, now: DateTime<FixedOffset>) -> Option<DateTime<FixedOffset>> {
        let lowered = text.to_lowercase();
        let tokens: Vec<&str> = lowered.split_whitespace().collect();

        tokens.windows(2).find_map(|pair| {
            let amount: u32 = pair[0].parse().ok()?;
            let unit = self
                .relative_units
                .iter()
                .find(|unit| pair[1].contains(unit.word()))?;
            let offset = unit.duration(i64::from(amount))?;
            if offset.num_minutes() > MAX_RELATIVE_MINUTES {
                return None;
            }
            now.checked_sub_signed(offset)
        })
    }

    fn parse_absolute(&self, text: &str) -> Option<DateTime<FixedOffset>> {
        let cleaned = text.replace(TIMEZONE_SUFFIX, " ").replace([',', '|'], " ");
        let tokens: Vec<&str> = cleaned.split_whitespace().collect();

        // The weekday (and any other prefix) is skipped by scanning for the
        // `<day> <month> <year> <HH:MM>` window.
        tokens.windows(4).find_map(|window| {
            let day: u32 = window[0].parse().ok()?;
            let month = self.month_number(window[1])?;
            let year = window[2];
            if year.len() != 4 || !year.chars().all(|c| c.is_ascii_digit()) {
                return None;
            }
            let (hour, minute) = window[3].split_once([':', '.'])?;
            let hour: u32 = hour.parse().ok()?;
            let minute: u32 = minute.parse().ok()?;

            let iso = format!(
                "{}-{:02}-{:02}T{:02}:{:02}:00+07:00",
                year, month, day, hour, minute
            );
            DateTime::parse_from_rfc3339(&iso).ok()
        })
    }
}
