//! Observation facts: grouping into step sections and time-range filtering.
//!
//! Observations are `obs(..., T).` facts whose last argument is an integer
//! timestamp.

use std::collections::HashMap;

use regex::Regex;
use tracing::{debug, warn};

use crate::error::{PrepError, PrepResult};

const OBS_PREFIX: &str = "obs(";

/// Fact portion of a line, without a trailing `%` comment.
fn strip_inline_comment(line: &str) -> &str {
    line.split('%').next().unwrap_or_default().trim()
}

fn with_newline(line: &str) -> String {
    if line.ends_with('\n') {
        line.to_string()
    } else {
        format!("{line}\n")
    }
}

fn extract_timestamp(fact: &str, line: usize) -> PrepResult<i64> {
    let payload = fact
        .strip_prefix(OBS_PREFIX)
        .and_then(|rest| rest.strip_suffix(")."))
        .ok_or_else(|| PrepError::Observation {
            line,
            message: format!("Expected obs(...) fact, got '{fact}'."),
        })?;

    let text = payload.rsplit(',').next().unwrap_or(payload).trim();
    text.parse::<i64>().map_err(|_| PrepError::Observation {
        line,
        message: format!("Timestamp '{text}' is not an integer."),
    })
}

/// Step label for a timestamp: `t5` for 5, `tn4` for -4.
fn step_label(value: i64) -> String {
    if value < 0 {
        format!("tn{}", value.unsigned_abs())
    } else {
        format!("t{value}")
    }
}

struct Bucket {
    value: i64,
    lines: Vec<String>,
}

/// Group observations by timestamp into `#program step(t<T>).` sections.
///
/// Negative timestamps are labelled `tn<|T|>`. Every other line is kept as a header above the sections. Each section
/// opens with `step_time(T, T).` followed by its observations in source
/// order. Sections are sorted by timestamp unless `preserve_order` is set,
/// in which case they follow first appearance.
pub fn group_observations(source: &str, preserve_order: bool) -> PrepResult<String> {
    let mut buckets: Vec<Bucket> = Vec::new();
    let mut index: HashMap<i64, usize> = HashMap::new();
    let mut header = Vec::new();

    for (number, line) in source.split_inclusive('\n').enumerate() {
        let fact = strip_inline_comment(line);
        if !fact.starts_with(OBS_PREFIX) {
            header.push(with_newline(line));
            continue;
        }

        let value = extract_timestamp(fact, number + 1)?;
        let slot = *index.entry(value).or_insert_with(|| {
            buckets.push(Bucket {
                value,
                lines: Vec::new(),
            });
            buckets.len() - 1
        });
        buckets[slot].lines.push(with_newline(line));
    }

    if !preserve_order {
        buckets.sort_by_key(|bucket| bucket.value);
    }
    debug!(steps = buckets.len(), header = header.len(), "Grouped observations");

    let mut out = String::new();
    for line in &header {
        out.push_str(line);
    }
    if !header.is_empty() && !buckets.is_empty() {
        out.push('\n');
    }
    for bucket in &buckets {
        let ts = bucket.value;
        out.push_str(&format!("#program step({}).\n", step_label(ts)));
        out.push_str(&format!("step_time({ts}, {ts}).\n"));
        for line in &bucket.lines {
            out.push_str(line);
        }
        out.push('\n');
    }
    Ok(out)
}

/// Keep only observation lines whose timestamp lies in `start..=end`.
///
/// Lines are copied unchanged, comments included. Everything that is not
/// an observation with an integer last argument is dropped.
pub fn filter_observations(source: &str, start: i64, end: i64) -> PrepResult<String> {
    let time_value = Regex::new(r",\s*([+-]?\d+)\)\.\s*$")?;
    let mut out = String::new();
    let mut kept = 0usize;

    for line in source.split_inclusive('\n') {
        let content = strip_inline_comment(line);
        if !content.starts_with(OBS_PREFIX) {
            continue;
        }
        let Some(captures) = time_value.captures(content) else {
            continue;
        };
        let Ok(value) = captures[1].parse::<i64>() else {
            warn!(value = &captures[1], "Timestamp out of range, skipping");
            continue;
        };
        if (start..=end).contains(&value) {
            out.push_str(line);
            kept += 1;
        }
    }

    debug!(kept, start, end, "Filtered observations");
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_groups_sorted_by_timestamp() {
        let source = "% patients\nperson(p1).\nobs(p1, fever, 5).\nobs(p1, cough, 2).\nobs(p1, rash, 5).\n";
        let out = group_observations(source, false).unwrap();
        assert_eq!(
            out,
            "% patients\nperson(p1).\n\n\
             #program step(t2).\nstep_time(2, 2).\nobs(p1, cough, 2).\n\n\
             #program step(t5).\nstep_time(5, 5).\nobs(p1, fever, 5).\nobs(p1, rash, 5).\n\n"
        );
    }

    #[test]
    fn test_preserve_order_keeps_first_appearance() {
        let source = "obs(a, 10).\nobs(b, 3).\n";
        let out = group_observations(source, true).unwrap();
        let t10 = out.find("step(t10)").unwrap();
        let t3 = out.find("step(t3)").unwrap();
        assert!(t10 < t3);
        // No header, so no separating blank line at the top.
        assert!(out.starts_with("#program step(t10)."));
    }

    #[test]
    fn test_numeric_not_lexicographic_sort() {
        let out = group_observations("obs(a, 10).\nobs(b, 9).\n", false).unwrap();
        assert!(out.find("step(t9)").unwrap() < out.find("step(t10)").unwrap());
    }

    #[test]
    fn test_trailing_comment_on_observation() {
        let out = group_observations("obs(a, 1). % first", false).unwrap();
        assert!(out.contains("obs(a, 1). % first\n"));
    }

    #[test]
    fn test_negative_timestamps_get_constant_labels() {
        let out = group_observations("obs(a, -4).\nobs(b, 2).\n", false).unwrap();
        assert_eq!(
            out,
            "#program step(tn4).\nstep_time(-4, -4).\nobs(a, -4).\n\n\
             #program step(t2).\nstep_time(2, 2).\nobs(b, 2).\n\n"
        );
    }

    #[test]
    fn test_signed_and_plain_timestamps_share_a_step() {
        let out = group_observations("obs(a, +3).\nobs(b, 3).\n", false).unwrap();
        assert_eq!(out.matches("#program step(t3).").count(), 1);
        assert!(out.contains("obs(a, +3).\nobs(b, 3).\n"));
    }

    #[test]
    fn test_bad_timestamp_reports_line() {
        let err = group_observations("person(p).\nobs(a, soon).\n", false).unwrap_err();
        match err {
            PrepError::Observation { line, message } => {
                assert_eq!(line, 2);
                assert!(message.contains("soon"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_malformed_observation() {
        let err = group_observations("obs(a, 1)\n", false).unwrap_err();
        assert!(matches!(err, PrepError::Observation { line: 1, .. }));
    }

    #[test]
    fn test_no_observations_is_header_only() {
        let source = "person(p1).\n";
        assert_eq!(group_observations(source, false).unwrap(), source);
    }

    #[test]
    fn test_filter_inclusive_range() {
        let source = "person(p).\nobs(a, 1).\nobs(b, 2). % keep\nobs(c, 3).\nobs(d, -4).\n";
        assert_eq!(
            filter_observations(source, 2, 3).unwrap(),
            "obs(b, 2). % keep\nobs(c, 3).\n"
        );
        assert_eq!(filter_observations(source, -5, 0).unwrap(), "obs(d, -4).\n");
    }

    #[test]
    fn test_filter_skips_non_integer_times() {
        let source = "obs(a, t1).\n% obs(b, 1).\nobs(c, 1).";
        assert_eq!(filter_observations(source, 0, 5).unwrap(), "obs(c, 1).");
    }
}
