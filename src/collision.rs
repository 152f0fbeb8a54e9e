//! Greedy first-fit packing of tasks into non-overlapping display rows.

use chrono::NaiveDateTime;

use crate::model::{Task, ViewMode, ViewPolicy};

/// Rows of tasks, top to bottom. No two tasks in a row visually overlap.
pub type RowArrangement = Vec<Vec<Task>>;

type Span = (NaiveDateTime, NaiveDateTime);

/// The task interval with the view mode's tolerance trimmed from both ends.
///
/// The trim never crosses the midpoint, so short tasks shrink to a point
/// instead of inverting.
fn trimmed_span(task: &Task, policy: &ViewPolicy) -> Option<Span> {
    let (start, end) = task.interval()?;
    let trim = policy.buffer().min((end - start) / 2);
    Some((start + trim, end - trim))
}

fn spans_overlap(a: Span, b: Span) -> bool {
    a.0 <= b.1 && b.0 <= a.1
}

/// True if the two bars would intersect on screen under `mode`.
///
/// Tasks with invalid dates never overlap anything.
pub fn visually_overlap(a: &Task, b: &Task, mode: ViewMode) -> bool {
    let policy = mode.policy();
    match (trimmed_span(a, policy), trimmed_span(b, policy)) {
        (Some(a), Some(b)) => spans_overlap(a, b),
        _ => false,
    }
}

fn pack<'a>(tasks: impl IntoIterator<Item = (Span, &'a Task)>) -> RowArrangement {
    let mut rows: Vec<Vec<(Span, &Task)>> = Vec::new();
    for (span, task) in tasks {
        let slot = rows
            .iter()
            .position(|row| row.iter().all(|(other, _)| !spans_overlap(span, *other)));
        match slot {
            Some(index) => rows[index].push((span, task)),
            None => rows.push(vec![(span, task)]),
        }
    }
    rows.into_iter()
        .map(|row| row.into_iter().map(|(_, task)| task.clone()).collect())
        .collect()
}

fn valid_spans<'a>(tasks: &'a [Task], mode: ViewMode) -> Vec<(Span, &'a Task)> {
    let policy = mode.policy();
    let spans: Vec<_> = tasks
        .iter()
        .filter_map(|t| trimmed_span(t, policy).map(|span| (span, t)))
        .collect();
    if spans.len() < tasks.len() {
        tracing::debug!(
            skipped = tasks.len() - spans.len(),
            "tasks with invalid dates left out of the arrangement"
        );
    }
    spans
}

/// Pack tasks into rows after a stable sort by start date.
///
/// Tasks with invalid dates are dropped silently.
pub fn detect_overlaps(tasks: &[Task], mode: ViewMode) -> RowArrangement {
    let mut spans = valid_spans(tasks, mode);
    // Sort on the untrimmed start so the order matches the task dates.
    spans.sort_by_key(|(_, task)| task.interval().map(|(start, _)| start));
    pack(spans)
}

/// Pack tasks into rows in the order given, without sorting.
pub fn arrange_in_order(tasks: &[Task], mode: ViewMode) -> RowArrangement {
    pack(valid_spans(tasks, mode))
}

/// Whether `task` overlaps any task in `all_tasks` other than itself and
/// the task named by `exclude_id`.
pub fn would_collide(task: &Task, all_tasks: &[Task], mode: ViewMode, exclude_id: Option<&str>) -> bool {
    all_tasks
        .iter()
        .filter(|other| other.id != task.id && Some(other.id.as_str()) != exclude_id)
        .any(|other| visually_overlap(task, other, mode))
}

/// Arrangement that would result if `updated` replaced the task with its id.
pub fn preview_arrangement(updated: &Task, all_tasks: &[Task], mode: ViewMode) -> RowArrangement {
    let replaced: Vec<Task> = all_tasks
        .iter()
        .map(|t| if t.id == updated.id { updated.clone() } else { t.clone() })
        .collect();
    detect_overlaps(&replaced, mode)
}

/// Row index holding the task with `id`.
pub fn row_of(rows: &RowArrangement, id: &str) -> Option<usize> {
    rows.iter().position(|row| row.iter().any(|t| t.id == id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};
    use pretty_assertions::assert_eq;

    fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn task(id: &str, start: NaiveDateTime, end: NaiveDateTime) -> Task {
        Task::new(id, id.to_uppercase(), start, end)
    }

    fn ids(rows: &RowArrangement) -> Vec<Vec<&str>> {
        rows.iter()
            .map(|row| row.iter().map(|t| t.id.as_str()).collect())
            .collect()
    }

    // ── detect_overlaps ─────────────────────────────────────────────────

    #[test]
    fn test_empty_input_has_no_rows() {
        assert!(detect_overlaps(&[], ViewMode::Month).is_empty());
    }

    #[test]
    fn test_single_task_single_row() {
        let rows = detect_overlaps(&[task("a", at(2024, 1, 1), at(2024, 1, 3))], ViewMode::Day);
        assert_eq!(ids(&rows), vec![vec!["a"]]);
    }

    #[test]
    fn test_disjoint_tasks_share_one_row_in_start_order() {
        let tasks = vec![
            task("c", at(2024, 3, 1), at(2024, 3, 10)),
            task("a", at(2024, 1, 1), at(2024, 1, 10)),
            task("b", at(2024, 2, 1), at(2024, 2, 10)),
        ];
        for mode in ViewMode::ALL {
            let rows = detect_overlaps(&tasks, mode);
            assert_eq!(ids(&rows), vec![vec!["a", "b", "c"]], "{mode:?}");
        }
    }

    #[test]
    fn test_chain_sharing_an_instant_needs_one_row_each() {
        let tasks: Vec<Task> = (0..5)
            .map(|i| task(&format!("t{i}"), at(2024, 1, 1) + Duration::days(i), at(2024, 2, 1) + Duration::days(i)))
            .collect();
        let rows = detect_overlaps(&tasks, ViewMode::Month);
        assert_eq!(rows.len(), 5);
        assert!(rows.iter().all(|row| row.len() == 1));
    }

    #[test]
    fn test_adjacent_tasks_in_month_view_share_a_row() {
        let tasks = vec![
            task("b", at(2024, 1, 16), at(2024, 1, 31)),
            task("a", at(2024, 1, 1), at(2024, 1, 15)),
        ];
        let rows = detect_overlaps(&tasks, ViewMode::Month);
        assert_eq!(ids(&rows), vec![vec!["a", "b"]]);
    }

    #[test]
    fn test_overlapping_tasks_split_into_two_rows() {
        let tasks = vec![
            task("a", at(2024, 1, 1), at(2024, 1, 15)),
            task("b", at(2024, 1, 10), at(2024, 1, 31)),
        ];
        let rows = detect_overlaps(&tasks, ViewMode::Month);
        assert_eq!(ids(&rows), vec![vec!["a"], vec!["b"]]);
    }

    #[test]
    fn test_touching_endpoints_are_absorbed_by_buffer() {
        let tasks = vec![
            task("a", at(2024, 1, 1), at(2024, 1, 15)),
            task("b", at(2024, 1, 15), at(2024, 1, 31)),
        ];
        assert_eq!(detect_overlaps(&tasks, ViewMode::Day).len(), 1);
    }

    #[test]
    fn test_first_fit_reuses_earliest_free_row() {
        let tasks = vec![
            task("a", at(2024, 1, 1), at(2024, 1, 10)),
            task("b", at(2024, 1, 5), at(2024, 1, 20)),
            task("c", at(2024, 1, 12), at(2024, 1, 15)),
        ];
        let rows = detect_overlaps(&tasks, ViewMode::Day);
        assert_eq!(ids(&rows), vec![vec!["a", "c"], vec!["b"]]);
    }

    #[test]
    fn test_invalid_tasks_are_excluded() {
        let mut broken = task("x", at(2024, 1, 1), at(2024, 1, 2));
        broken.start_date = None;
        assert!(detect_overlaps(std::slice::from_ref(&broken), ViewMode::Day).is_empty());

        let rows = detect_overlaps(&[broken, task("a", at(2024, 1, 1), at(2024, 1, 2))], ViewMode::Day);
        assert_eq!(ids(&rows), vec![vec!["a"]]);
    }

    #[test]
    fn test_inverted_task_is_packed_by_its_real_interval() {
        let tasks = vec![
            task("a", at(2024, 1, 20), at(2024, 1, 10)),
            task("b", at(2024, 1, 1), at(2024, 1, 5)),
        ];
        let rows = detect_overlaps(&tasks, ViewMode::Day);
        assert_eq!(ids(&rows), vec![vec!["b", "a"]]);
    }

    #[test]
    fn test_equal_starts_keep_input_order() {
        let tasks = vec![
            task("second", at(2024, 1, 1), at(2024, 1, 3)),
            task("first", at(2024, 1, 1), at(2024, 1, 9)),
        ];
        let rows = detect_overlaps(&tasks, ViewMode::Day);
        assert_eq!(ids(&rows), vec![vec!["second"], vec!["first"]]);
    }

    #[test]
    fn test_arrange_in_order_skips_sorting() {
        let tasks = vec![
            task("late", at(2024, 1, 10), at(2024, 1, 20)),
            task("early", at(2024, 1, 1), at(2024, 1, 12)),
        ];
        let rows = arrange_in_order(&tasks, ViewMode::Day);
        assert_eq!(ids(&rows), vec![vec!["late"], vec!["early"]]);
    }

    // ── would_collide / preview ─────────────────────────────────────────

    #[test]
    fn test_would_collide_ignores_self() {
        let a = task("a", at(2024, 1, 1), at(2024, 1, 15));
        let far = task("far", at(2024, 6, 1), at(2024, 6, 15));
        assert!(!would_collide(&a, &[a.clone(), far], ViewMode::Month, None));
    }

    #[test]
    fn test_would_collide_respects_exclude_id() {
        let a = task("a", at(2024, 1, 1), at(2024, 1, 15));
        let b = task("b", at(2024, 1, 10), at(2024, 1, 31));
        assert!(would_collide(&a, &[b.clone()], ViewMode::Month, None));
        assert!(!would_collide(&a, &[b], ViewMode::Month, Some("b")));
    }

    #[test]
    fn test_preview_replaces_by_id() {
        let tasks = vec![
            task("a", at(2024, 1, 1), at(2024, 1, 15)),
            task("b", at(2024, 1, 10), at(2024, 1, 31)),
        ];
        assert_eq!(detect_overlaps(&tasks, ViewMode::Day).len(), 2);

        let moved = tasks[1].with_dates(at(2024, 2, 1), at(2024, 2, 10));
        let rows = preview_arrangement(&moved, &tasks, ViewMode::Day);
        assert_eq!(ids(&rows), vec![vec!["a", "b"]]);
        assert_eq!(rows[0][1].start_date, Some(at(2024, 2, 1)));
        assert_eq!(row_of(&rows, "b"), Some(0));
        assert_eq!(row_of(&rows, "missing"), None);
    }
}
