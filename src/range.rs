//! Default visible window derived from the tasks themselves.

use chrono::{Local, Months, NaiveDateTime};

use crate::model::{TaskGroup, TimelineWindow, ViewMode};
use crate::units;

fn valid_intervals(groups: &[TaskGroup]) -> impl Iterator<Item = (NaiveDateTime, NaiveDateTime)> + '_ {
    groups
        .iter()
        .flat_map(|g| g.tasks.iter())
        .filter_map(|t| t.interval())
}

/// First day of the month holding the earliest task start.
///
/// Falls back to one month before `now` when no task has valid dates.
pub fn find_earliest_date_at(groups: &[TaskGroup], now: NaiveDateTime) -> NaiveDateTime {
    let earliest = valid_intervals(groups)
        .map(|(start, _)| start)
        .min()
        .unwrap_or_else(|| now.checked_sub_months(Months::new(1)).unwrap_or(now));
    units::unit_start(earliest, ViewMode::Month)
}

/// Last millisecond of the month holding the latest task end.
///
/// Falls back to one month after `now` when no task has valid dates.
pub fn find_latest_date_at(groups: &[TaskGroup], now: NaiveDateTime) -> NaiveDateTime {
    let latest = valid_intervals(groups)
        .map(|(_, end)| end)
        .max()
        .unwrap_or_else(|| now.checked_add_months(Months::new(1)).unwrap_or(now));
    units::unit_end(latest, ViewMode::Month)
}

pub fn find_earliest_date(groups: &[TaskGroup]) -> NaiveDateTime {
    find_earliest_date_at(groups, Local::now().naive_local())
}

pub fn find_latest_date(groups: &[TaskGroup]) -> NaiveDateTime {
    find_latest_date_at(groups, Local::now().naive_local())
}

/// Window for the chart: the explicit bounds when given, otherwise the
/// task range rounded out to whole units of `view_mode`.
pub fn derive_window(
    groups: &[TaskGroup],
    explicit: Option<(NaiveDateTime, NaiveDateTime)>,
    view_mode: ViewMode,
    unit_width: f64,
) -> TimelineWindow {
    let (start, end) = match explicit {
        Some(bounds) => bounds,
        None => {
            let start = find_earliest_date(groups);
            let end = find_latest_date(groups);
            (
                units::unit_start(start, view_mode),
                units::unit_end(end, view_mode),
            )
        }
    };
    TimelineWindow::new(start, end, view_mode, unit_width)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Task;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn groups() -> Vec<TaskGroup> {
        let mut broken = Task::new("x", "Broken", at(2020, 1, 1), at(2020, 1, 2));
        broken.start_date = None;
        vec![
            TaskGroup::new(
                "a",
                "Alpha",
                vec![
                    Task::new("1", "One", at(2024, 3, 10), at(2024, 3, 20)),
                    broken,
                ],
            ),
            TaskGroup::new(
                "b",
                "Beta",
                vec![Task::new("2", "Two", at(2024, 5, 12), at(2024, 2, 14))],
            ),
        ]
    }

    #[test]
    fn test_earliest_and_latest_round_out_to_months() {
        let now = at(2030, 1, 1);
        assert_eq!(find_earliest_date_at(&groups(), now), at(2024, 2, 1));
        assert_eq!(
            find_latest_date_at(&groups(), now),
            units::end_of_day(at(2024, 5, 31))
        );
    }

    #[test]
    fn test_empty_groups_fall_back_around_now() {
        let now = at(2024, 6, 15);
        assert_eq!(find_earliest_date_at(&[], now), at(2024, 5, 1));
        assert_eq!(find_latest_date_at(&[], now), units::end_of_day(at(2024, 7, 31)));
        let empty = vec![TaskGroup::new("g", "Empty", Vec::new())];
        assert_eq!(find_earliest_date_at(&empty, now), at(2024, 5, 1));
    }

    #[test]
    fn test_explicit_window_is_kept() {
        let w = derive_window(&groups(), Some((at(2024, 1, 1), at(2024, 1, 31))), ViewMode::Day, 20.0);
        assert_eq!(w.start, at(2024, 1, 1));
        assert_eq!(w.total_units, 31);
    }

    #[test]
    fn test_derived_window_aligns_to_view_unit() {
        let w = derive_window(&groups(), None, ViewMode::Quarter, 100.0);
        assert_eq!(w.start, at(2024, 1, 1));
        assert_eq!(w.end, units::end_of_day(at(2024, 6, 30)));
        assert_eq!(w.total_units, 2);
    }
}
