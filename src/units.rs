//! Calendar arithmetic over timeline units (day, week, month, quarter, year).
//!
//! All functions are pure. Dates are wall-clock `NaiveDateTime`s; there is no
//! timezone handling anywhere in the engine.

use std::fmt;

use chrono::{Datelike, Duration, Locale, Months, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};

use crate::model::ViewMode;

pub const INVALID_DATE: &str = "Invalid date";
pub const INVALID_DATE_RANGE: &str = "Invalid date range";

/// Last representable millisecond of a day.
fn last_millisecond() -> NaiveTime {
    NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap_or(NaiveTime::MIN)
}

pub fn start_of_day(dt: NaiveDateTime) -> NaiveDateTime {
    dt.date().and_time(NaiveTime::MIN)
}

pub fn end_of_day(dt: NaiveDateTime) -> NaiveDateTime {
    dt.date().and_time(last_millisecond())
}

/// Midnight of the first day of the unit containing `dt`. Weeks start on Monday.
pub fn unit_start(dt: NaiveDateTime, mode: ViewMode) -> NaiveDateTime {
    let date = dt.date();
    let first = match mode {
        ViewMode::Day => date,
        ViewMode::Week => date - Duration::days(date.weekday().num_days_from_monday() as i64),
        ViewMode::Month => first_of_month(date.year(), date.month()).unwrap_or(date),
        ViewMode::Quarter => {
            let month = (date.month0() / 3) * 3 + 1;
            first_of_month(date.year(), month).unwrap_or(date)
        }
        ViewMode::Year => first_of_month(date.year(), 1).unwrap_or(date),
    };
    first.and_time(NaiveTime::MIN)
}

/// Start of the unit following the one that starts at `start`.
pub fn next_unit(start: NaiveDateTime, mode: ViewMode) -> Option<NaiveDateTime> {
    match mode {
        ViewMode::Day => start.checked_add_signed(Duration::days(1)),
        ViewMode::Week => start.checked_add_signed(Duration::days(7)),
        ViewMode::Month => start.checked_add_months(Months::new(1)),
        ViewMode::Quarter => start.checked_add_months(Months::new(3)),
        ViewMode::Year => start.checked_add_months(Months::new(12)),
    }
}

/// Last millisecond of the unit containing `dt`.
pub fn unit_end(dt: NaiveDateTime, mode: ViewMode) -> NaiveDateTime {
    next_unit(unit_start(dt, mode), mode)
        .map(|next| next - Duration::milliseconds(1))
        .unwrap_or_else(|| end_of_day(dt))
}

/// Unit-start dates covering `[start, end]`, both boundary units included.
///
/// The arguments may be given in either order.
pub fn units_between(start: NaiveDateTime, end: NaiveDateTime, mode: ViewMode) -> Vec<NaiveDateTime> {
    let (from, to) = if start <= end { (start, end) } else { (end, start) };
    let mut units = Vec::new();
    let mut cursor = Some(unit_start(from, mode));
    while let Some(current) = cursor {
        if current > to {
            break;
        }
        units.push(current);
        cursor = next_unit(current, mode);
    }
    units
}

fn first_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1)
}

/// Number of days in `month` (1-based) of `year`. Zero for an invalid month.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let Some(first) = first_of_month(year, month) else {
        return 0;
    };
    first
        .checked_add_months(Months::new(1))
        .map(|next| (next - first).num_days() as u32)
        .unwrap_or(31)
}

/// Monotonic index of the unit containing `dt`; consecutive units differ by 1.
fn unit_index(dt: NaiveDateTime, mode: ViewMode) -> i64 {
    let date = dt.date();
    match mode {
        ViewMode::Day => date.num_days_from_ce() as i64,
        ViewMode::Week => (unit_start(dt, mode).date().num_days_from_ce() as i64).div_euclid(7),
        ViewMode::Month => date.year() as i64 * 12 + date.month0() as i64,
        ViewMode::Quarter => date.year() as i64 * 4 + (date.month0() / 3) as i64,
        ViewMode::Year => date.year() as i64,
    }
}

/// A count of timeline units with its pluralized label, e.g. "3 weeks".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitDuration {
    pub value: i64,
    pub unit: &'static str,
}

impl fmt::Display for UnitDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.value, self.unit)
    }
}

/// Inclusive count of units touched between two dates, in either order.
pub fn duration(start: Option<NaiveDateTime>, end: Option<NaiveDateTime>, mode: ViewMode) -> UnitDuration {
    let (Some(a), Some(b)) = (start, end) else {
        return UnitDuration {
            value: 0,
            unit: ViewMode::Day.policy().unit_plural,
        };
    };
    let value = (unit_index(b, mode) - unit_index(a, mode)).abs() + 1;
    UnitDuration {
        value,
        unit: mode.policy().unit_label(value),
    }
}

fn localized(dt: NaiveDateTime, fmt: &str, locale: Locale) -> String {
    Utc.from_utc_datetime(&dt).format_localized(fmt, locale).to_string()
}

/// e.g. "Jan 5, 2024".
pub fn format_date(date: Option<NaiveDateTime>, locale: Locale) -> String {
    match date {
        Some(d) => localized(d, "%b %-d, %Y", locale),
        None => INVALID_DATE.to_string(),
    }
}

/// e.g. "January 2024".
pub fn format_month(date: Option<NaiveDateTime>, locale: Locale) -> String {
    match date {
        Some(d) => localized(d, "%B %Y", locale),
        None => INVALID_DATE.to_string(),
    }
}

pub fn format_date_range(start: Option<NaiveDateTime>, end: Option<NaiveDateTime>, locale: Locale) -> String {
    match (start, end) {
        (Some(_), Some(_)) => format!("{} - {}", format_date(start, locale), format_date(end, locale)),
        _ => INVALID_DATE_RANGE.to_string(),
    }
}

/// Column header text for the unit starting at `start`.
pub fn unit_header_label(start: NaiveDateTime, mode: ViewMode, locale: Locale) -> String {
    match mode {
        ViewMode::Day => localized(start, "%-d", locale),
        ViewMode::Week => localized(start, "W%V", locale),
        ViewMode::Month => localized(start, "%b %Y", locale),
        ViewMode::Quarter => format!("Q{} {}", start.month0() / 3 + 1, start.year()),
        ViewMode::Year => start.year().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    // ── Unit boundaries ─────────────────────────────────────────────────

    #[test]
    fn test_unit_start_per_mode() {
        let dt = at(2024, 5, 15) + Duration::hours(13);
        assert_eq!(unit_start(dt, ViewMode::Day), at(2024, 5, 15));
        // 2024-05-15 is a Wednesday
        assert_eq!(unit_start(dt, ViewMode::Week), at(2024, 5, 13));
        assert_eq!(unit_start(dt, ViewMode::Month), at(2024, 5, 1));
        assert_eq!(unit_start(dt, ViewMode::Quarter), at(2024, 4, 1));
        assert_eq!(unit_start(dt, ViewMode::Year), at(2024, 1, 1));
    }

    #[test]
    fn test_unit_end_is_last_millisecond() {
        let end = unit_end(at(2024, 2, 10), ViewMode::Month);
        assert_eq!(end, end_of_day(at(2024, 2, 29)));
        assert_eq!(end_of_day(at(2024, 2, 29)).and_utc().timestamp_subsec_millis(), 999);
    }

    #[test]
    fn test_units_between_includes_partial_boundaries() {
        let units = units_between(at(2024, 1, 20), at(2024, 3, 2), ViewMode::Month);
        assert_eq!(units, vec![at(2024, 1, 1), at(2024, 2, 1), at(2024, 3, 1)]);
    }

    #[test]
    fn test_units_between_is_order_agnostic() {
        let forward = units_between(at(2024, 1, 1), at(2024, 1, 10), ViewMode::Day);
        let backward = units_between(at(2024, 1, 10), at(2024, 1, 1), ViewMode::Day);
        assert_eq!(forward.len(), 10);
        assert_eq!(forward, backward);
    }

    #[test]
    fn test_units_between_quarters_and_years() {
        let quarters = units_between(at(2023, 11, 5), at(2024, 4, 1), ViewMode::Quarter);
        assert_eq!(quarters, vec![at(2023, 10, 1), at(2024, 1, 1), at(2024, 4, 1)]);
        let years = units_between(at(2022, 6, 1), at(2024, 1, 1), ViewMode::Year);
        assert_eq!(years.len(), 3);
    }

    #[test]
    fn test_days_in_month_handles_leap_years() {
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(2023, 2), 28);
        assert_eq!(days_in_month(1900, 2), 28);
        assert_eq!(days_in_month(2000, 2), 29);
        assert_eq!(days_in_month(2024, 12), 31);
        assert_eq!(days_in_month(2024, 13), 0);
    }

    // ── Duration ────────────────────────────────────────────────────────

    #[test]
    fn test_duration_counts_inclusive_units() {
        let d = duration(Some(at(2024, 1, 1)), Some(at(2024, 1, 15)), ViewMode::Day);
        assert_eq!(d, UnitDuration { value: 15, unit: "days" });
        let d = duration(Some(at(2024, 1, 31)), Some(at(2024, 2, 1)), ViewMode::Month);
        assert_eq!(d.to_string(), "2 months");
        let d = duration(Some(at(2024, 1, 2)), Some(at(2024, 1, 3)), ViewMode::Week);
        assert_eq!(d.to_string(), "1 week");
    }

    #[test]
    fn test_duration_is_symmetric() {
        let pairs = [
            (at(2023, 12, 30), at(2024, 2, 3)),
            (at(2020, 2, 29), at(2024, 2, 29)),
            (at(2024, 6, 1), at(2024, 6, 1)),
        ];
        for mode in ViewMode::ALL {
            for (a, b) in pairs {
                assert_eq!(duration(Some(a), Some(b), mode), duration(Some(b), Some(a), mode));
            }
        }
    }

    #[test]
    fn test_duration_of_invalid_dates_is_zero_days() {
        let d = duration(None, Some(at(2024, 1, 1)), ViewMode::Year);
        assert_eq!(d, UnitDuration { value: 0, unit: "days" });
    }

    // ── Formatting ──────────────────────────────────────────────────────

    #[test]
    fn test_format_date_and_month() {
        assert_eq!(format_date(Some(at(2024, 1, 5)), Locale::en_US), "Jan 5, 2024");
        assert_eq!(format_month(Some(at(2024, 1, 5)), Locale::en_US), "January 2024");
        assert_eq!(format_month(Some(at(2024, 1, 5)), Locale::de_DE), "Januar 2024");
    }

    #[test]
    fn test_invalid_input_formats_to_literal_strings() {
        assert_eq!(format_date(None, Locale::en_US), "Invalid date");
        assert_eq!(format_month(None, Locale::en_US), "Invalid date");
        assert_eq!(format_date_range(Some(at(2024, 1, 1)), None, Locale::en_US), "Invalid date range");
    }

    #[test]
    fn test_format_date_range() {
        let s = format_date_range(Some(at(2024, 1, 1)), Some(at(2024, 1, 15)), Locale::en_US);
        assert_eq!(s, "Jan 1, 2024 - Jan 15, 2024");
    }

    #[test]
    fn test_unit_header_labels() {
        assert_eq!(unit_header_label(at(2024, 7, 1), ViewMode::Quarter, Locale::en_US), "Q3 2024");
        assert_eq!(unit_header_label(at(2024, 7, 1), ViewMode::Year, Locale::en_US), "2024");
        assert_eq!(unit_header_label(at(2024, 7, 9), ViewMode::Day, Locale::en_US), "9");
    }
}
