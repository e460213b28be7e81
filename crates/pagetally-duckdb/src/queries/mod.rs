pub mod breakdowns;
pub mod entries;
pub mod timeseries;

use chrono::NaiveDate;

use pagetally_core::period::DateRange;

/// `(start, end)` as `YYYY-MM-DD` strings for `CAST(? AS DATE)` parameters.
pub(crate) fn range_params(range: &DateRange) -> (String, String) {
    (fmt_date(range.start), fmt_date(range.end))
}

pub(crate) fn fmt_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
