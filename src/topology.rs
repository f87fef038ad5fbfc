//! Normalization of host series into topology lines.
//!
//! Each [`RawSeries`] becomes one [`Line`]: its name is split into path
//! segments, leading segments shared with the previous line are blanked, and
//! every `event_time` row becomes an [`Event`] whose end is either given,
//! inferred from the next row, or pushed past the visible window.

use crate::color::{Color, ColorResolver};
use crate::frame::{EVENT_TIME_END_FIELD, EVENT_TIME_FIELD, FieldValue, RawSeries, VALUE_FIELD};
use crate::view::Timestamp;

/// Offset past the window end given to events that never close.
pub const END_SENTINEL_OFFSET: i64 = 10_000;

/// Color used when a series has no value column to resolve from.
pub const DEFAULT_EVENT_COLOR: Color = Color::new(0.5, 0.5, 0.5, 1.0);

/// One time-bounded labeled span.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    /// Start instant.
    pub time: Timestamp,
    /// End instant.
    pub time_end: Timestamp,
    /// Value label.
    pub label: String,
    /// Display color.
    pub color: Color,
}

/// One row of the chart.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    /// Path segments, blanked where shared with the previous line.
    pub path: Vec<String>,
    /// Events in source row order.
    pub events: Vec<Event>,
}

/// Parameters for [`normalize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizeOptions {
    /// Path separator.
    pub separator: char,
    /// End of the visible window, base of the sentinel end time.
    pub window_to: Timestamp,
}

struct PendingEvent {
    time: Timestamp,
    time_end: Option<Timestamp>,
    label: String,
    color: Color,
}

/// Convert host series into lines, one per series, order preserved.
pub fn normalize(
    series: &[RawSeries],
    options: NormalizeOptions,
    resolver: &mut dyn ColorResolver,
) -> Vec<Line> {
    let mut previous: Option<Vec<String>> = None;
    let lines: Vec<Line> = series
        .iter()
        .map(|frame| {
            let parts = split_path(frame.name.as_deref(), options.separator);
            let path = clear_redundancy(&parts, previous.as_deref());
            previous = Some(parts);
            Line {
                path,
                events: build_events(frame, options.window_to, resolver),
            }
        })
        .collect();
    tracing::debug!(
        lines = lines.len(),
        events = lines.iter().map(|line| line.events.len()).sum::<usize>(),
        "normalized topology"
    );
    lines
}

/// Split a series name into path segments.
pub fn split_path(name: Option<&str>, separator: char) -> Vec<String> {
    name.map(|name| name.split(separator).map(str::to_string).collect())
        .unwrap_or_default()
}

/// Blank the leading segments of `current` that repeat `previous`.
///
/// Once a segment differs, it and every later segment are kept verbatim.
pub fn clear_redundancy(current: &[String], previous: Option<&[String]>) -> Vec<String> {
    let Some(previous) = previous else {
        return current.to_vec();
    };
    let mut changed = false;
    current
        .iter()
        .enumerate()
        .map(|(index, part)| {
            if changed || previous.get(index) != Some(part) {
                changed = true;
                part.clone()
            } else {
                String::new()
            }
        })
        .collect()
}

fn build_events(
    frame: &RawSeries,
    window_to: Timestamp,
    resolver: &mut dyn ColorResolver,
) -> Vec<Event> {
    let Some(times) = frame.field(EVENT_TIME_FIELD) else {
        tracing::warn!(series = ?frame.name, "series has no {EVENT_TIME_FIELD} field");
        return Vec::new();
    };
    let value_field = frame.field(VALUE_FIELD);
    let end_field = frame.field(EVENT_TIME_END_FIELD);
    let null = FieldValue::Null;

    let mut events: Vec<PendingEvent> = Vec::with_capacity(times.values.len());
    for (row, cell) in times.values.iter().enumerate() {
        let Some(time) = cell.as_timestamp() else {
            tracing::warn!(series = ?frame.name, row, "skipping row without a readable event time");
            continue;
        };
        let value = value_field.and_then(|field| field.value(row)).unwrap_or(&null);
        let color = value_field
            .map(|field| resolver.resolve(field, value))
            .unwrap_or(DEFAULT_EVENT_COLOR);
        let time_end = end_field
            .and_then(|field| field.value(row))
            .and_then(FieldValue::as_timestamp);

        if let Some(last) = events.last_mut()
            && last.time_end.is_none()
        {
            last.time_end = Some(time);
        }

        events.push(PendingEvent {
            time,
            time_end,
            label: value.display(),
            color,
        });
    }

    let sentinel = window_to.saturating_add(END_SENTINEL_OFFSET);
    events
        .into_iter()
        .map(|event| Event {
            time: event.time,
            time_end: event.time_end.unwrap_or(sentinel),
            label: event.label,
            color: event.color,
        })
        .collect()
}

/// Distinct `(label, color)` pairs in first-seen order, one per label.
pub fn legend_entries(lines: &[Line]) -> Vec<(String, Color)> {
    let mut entries: Vec<(String, Color)> = Vec::new();
    for event in lines.iter().flat_map(|line| &line.events) {
        if !entries.iter().any(|(label, _)| *label == event.label) {
            entries.push((event.label.clone(), event.color));
        }
    }
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::FieldColorResolver;
    use crate::frame::Field;

    const OPTIONS: NormalizeOptions = NormalizeOptions {
        separator: '|',
        window_to: 100,
    };

    fn series(name: &str, times: &[i64], labels: &[&str]) -> RawSeries {
        RawSeries::new(name)
            .with_field(Field::new(EVENT_TIME_FIELD, times.iter().copied()))
            .with_field(Field::new(VALUE_FIELD, labels.iter().copied()))
    }

    fn run(input: &[RawSeries]) -> Vec<Line> {
        normalize(input, OPTIONS, &mut FieldColorResolver::new())
    }

    fn parts(path: &[&str]) -> Vec<String> {
        path.iter().map(|part| part.to_string()).collect()
    }

    #[test]
    fn one_line_per_series_in_order() {
        let input = vec![
            series("b", &[0], &["x"]),
            series("a", &[5], &["y"]),
            series("c", &[], &[]),
        ];
        let lines = run(&input);
        assert_eq!(lines.len(), 3);
        let names: Vec<_> = lines.iter().map(|line| line.path.join("|")).collect();
        assert_eq!(names, ["b", "a", "c"]);
    }

    #[test]
    fn identical_paths_are_fully_blanked() {
        let current = parts(&["A", "B", "C"]);
        let blanked = clear_redundancy(&current, Some(&current));
        assert_eq!(blanked, parts(&["", "", ""]));
    }

    #[test]
    fn segments_after_first_difference_are_kept() {
        let previous = parts(&["A", "B", "C"]);
        let current = parts(&["A", "X", "C"]);
        assert_eq!(
            clear_redundancy(&current, Some(&previous)),
            parts(&["", "X", "C"])
        );
        assert_eq!(clear_redundancy(&current, None), current);
    }

    #[test]
    fn suppression_compares_against_raw_previous_name() {
        let input = vec![
            series("A|B|C", &[0], &["a"]),
            series("A|B|D", &[0], &["a"]),
            series("A|B|D", &[0], &["a"]),
        ];
        let lines = run(&input);
        assert_eq!(lines[0].path, parts(&["A", "B", "C"]));
        assert_eq!(lines[1].path, parts(&["", "", "D"]));
        assert_eq!(lines[2].path, parts(&["", "", ""]));
    }

    #[test]
    fn back_to_back_events_close_previous_span() {
        let lines = run(&[series("l", &[0, 10], &["a", "b"])]);
        let events = &lines[0].events;
        assert_eq!(events[0].time_end, 10);
        assert_eq!(events[0].label, "a");
        assert_eq!(events[1].label, "b");
    }

    #[test]
    fn trailing_event_gets_sentinel_end() {
        let lines = run(&[series("l", &[0, 10, 20], &["a", "b", "c"])]);
        assert_eq!(lines[0].events[2].time_end, 100 + 10_000);
    }

    #[test]
    fn single_event_gets_sentinel_end() {
        let lines = run(&[series("l", &[42], &["a"])]);
        assert_eq!(lines[0].events[0].time_end, 10_100);
    }

    #[test]
    fn explicit_end_is_kept() {
        let input = series("l", &[0, 30], &["a", "b"]).with_field(Field::new(
            EVENT_TIME_END_FIELD,
            [FieldValue::from(5_i64), FieldValue::Null],
        ));
        let lines = run(&[input]);
        assert_eq!(lines[0].events[0].time_end, 5);
        assert_eq!(lines[0].events[1].time_end, 10_100);
    }

    #[test]
    fn explicit_end_on_current_row_still_closes_previous() {
        let input = series("l", &[0, 30], &["a", "b"]).with_field(Field::new(
            EVENT_TIME_END_FIELD,
            [FieldValue::Null, FieldValue::from(40_i64)],
        ));
        let lines = run(&[input]);
        assert_eq!(lines[0].events[0].time_end, 30);
        assert_eq!(lines[0].events[1].time_end, 40);
    }

    #[test]
    fn missing_value_column_degrades_to_empty_label() {
        let input = RawSeries::new("l").with_field(Field::new(EVENT_TIME_FIELD, [1_i64, 2]));
        let lines = run(&[input]);
        assert_eq!(lines[0].events.len(), 2);
        assert!(lines[0].events.iter().all(|event| event.label.is_empty()));
        assert_eq!(lines[0].events[0].color, DEFAULT_EVENT_COLOR);
    }

    #[test]
    fn unreadable_times_are_skipped() {
        let input = RawSeries::new("l")
            .with_field(Field::new(
                EVENT_TIME_FIELD,
                [FieldValue::from(0_i64), FieldValue::Null, FieldValue::from(8_i64)],
            ))
            .with_field(Field::new(VALUE_FIELD, ["a", "b", "c"]));
        let lines = run(&[input]);
        let labels: Vec<_> = lines[0].events.iter().map(|e| e.label.as_str()).collect();
        assert_eq!(labels, ["a", "c"]);
        assert_eq!(lines[0].events[0].time_end, 8);
    }

    #[test]
    fn unnamed_series_has_empty_path() {
        let mut input = series("x", &[0], &["a"]);
        input.name = None;
        assert!(run(&[input])[0].path.is_empty());
    }

    #[test]
    fn legend_lists_each_label_once() {
        let lines = run(&[
            series("a", &[0, 1], &["up", "down"]),
            series("b", &[0], &["up"]),
        ]);
        let legend = legend_entries(&lines);
        let labels: Vec<_> = legend.iter().map(|(label, _)| label.as_str()).collect();
        assert_eq!(labels, ["up", "down"]);
    }
}
