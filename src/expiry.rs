use std::sync::OnceLock;

use chrono::{Days, Local, Months, NaiveDate};
use regex::Regex;

// Date format
//------------------------------------------------------------------------------

// M/d/yyyy
const DATE_FORMAT: &str = "%-m/%-d/%Y";
const DATE_PATTERN: &str = r"^(\d{1,2})/(\d{1,2})/(\d{4,})$";

fn date_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(DATE_PATTERN).expect("date pattern is valid"))
}

/// Current calendar date in the system's local timezone.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Formats a date as `M/d/yyyy`, e.g. `2/10/2024`.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Parses a `M/d/yyyy` date. Month and day take one or two digits, the year at least four.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let caps = date_regex().captures(s)?;
    let month = caps[1].parse().ok()?;
    let day = caps[2].parse().ok()?;
    let year = caps[3].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

// Expiry window
//------------------------------------------------------------------------------

/// Relative expiry, resolved against a start date by adding days and then months.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub struct ExpiryWindow {
    pub days: u32,
    pub months: u32,
}

impl Default for ExpiryWindow {
    fn default() -> Self {
        Self { days: 2, months: 0 }
    }
}

impl ExpiryWindow {
    pub fn new(days: u32, months: u32) -> Self {
        Self { days, months }
    }

    // Month arithmetic clamps to the last day of the target month
    pub fn resolve(self, start: NaiveDate) -> Option<NaiveDate> {
        start
            .checked_add_days(Days::new(self.days.into()))?
            .checked_add_months(Months::new(self.months))
    }

    pub fn format_from(self, start: NaiveDate) -> Option<String> {
        self.resolve(start).map(format_date)
    }

    pub fn format_from_today(self) -> Option<String> {
        self.format_from(today())
    }
}
