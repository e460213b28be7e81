//! Reporting periods and site-local date handling.

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, Offset, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Number of days shown before today on the `today` chart.
pub const TODAY_CHART_LOOKBACK_DAYS: i64 = 3;

/// Named lookback window anchored at the site's current local date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PeriodPreset {
    #[default]
    Today,
    LastSevenDays,
    LastFourteenDays,
    LastThirtyDays,
}

impl PeriodPreset {
    /// Parse a `period` query value. Unknown or missing values fall back to
    /// [`PeriodPreset::Today`] instead of failing the request.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some("last_seven_days") => Self::LastSevenDays,
            Some("last_fourteen_days") => Self::LastFourteenDays,
            Some("last_thirty_days") => Self::LastThirtyDays,
            _ => Self::Today,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Today => "today",
            Self::LastSevenDays => "last_seven_days",
            Self::LastFourteenDays => "last_fourteen_days",
            Self::LastThirtyDays => "last_thirty_days",
        }
    }

    fn days_before_today(&self) -> i64 {
        match self {
            Self::Today => 0,
            Self::LastSevenDays => 6,
            Self::LastFourteenDays => 13,
            Self::LastThirtyDays => 29,
        }
    }

    /// Inclusive report range ending at `today`.
    pub fn range(&self, today: NaiveDate) -> DateRange {
        DateRange {
            start: today - Duration::days(self.days_before_today()),
            end: today,
        }
    }

    /// Span of dates drawn on the chart. Wider than [`Self::range`] only for
    /// `today`, which also shows the preceding days for context.
    pub fn chart_span(&self, today: NaiveDate) -> DateRange {
        match self {
            Self::Today => DateRange {
                start: today - Duration::days(TODAY_CHART_LOOKBACK_DAYS),
                end: today,
            },
            _ => self.range(today),
        }
    }
}

/// Inclusive range of site-local calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Every date in the range, in order. Empty when `end < start`.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        self.start.iter_days().take_while(move |d| *d <= end)
    }
}

/// Parse the site's UTC offset setting.
///
/// Accepts `+HH:MM`, `-HH:MM`, `+HHMM`, `+HH`, `Z` and `UTC`. An empty string
/// is UTC.
pub fn parse_utc_offset(raw: &str) -> Result<FixedOffset, CoreError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("utc") || trimmed == "Z" {
        return Ok(utc());
    }

    let invalid = || CoreError::InvalidUtcOffset(raw.to_string());
    if !trimmed.is_ascii() {
        return Err(invalid());
    }

    let (sign, rest) = match trimmed.as_bytes()[0] {
        b'+' => (1, &trimmed[1..]),
        b'-' => (-1, &trimmed[1..]),
        _ => return Err(invalid()),
    };

    let (hours, minutes) = match rest.len() {
        2 => (rest, "00"),
        4 => rest.split_at(2),
        5 if rest.as_bytes()[2] == b':' => (&rest[..2], &rest[3..]),
        _ => return Err(invalid()),
    };

    if !hours.bytes().chain(minutes.bytes()).all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }

    let hours: u32 = hours.parse().map_err(|_| invalid())?;
    let minutes: u32 = minutes.parse().map_err(|_| invalid())?;
    if hours > 23 || minutes > 59 {
        return Err(invalid());
    }

    let seconds = (hours * 3600 + minutes * 60) as i32;
    FixedOffset::east_opt(sign * seconds).ok_or_else(invalid)
}

/// Like [`parse_utc_offset`] but treats a missing or unparsable setting as UTC.
pub fn utc_offset_or_default(raw: Option<&str>) -> FixedOffset {
    raw.and_then(|r| parse_utc_offset(r).ok()).unwrap_or_else(utc)
}

/// The site-local calendar date at instant `now`.
pub fn local_date(now: DateTime<Utc>, offset: &FixedOffset) -> NaiveDate {
    now.with_timezone(offset).date_naive()
}

fn utc() -> FixedOffset {
    Utc.fix()
}
