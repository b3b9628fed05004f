//! Wrapping raw rule and fact files with `#program` sections and guards.

use crate::statements::{classify, guard_rule, split_arguments, split_statements};

const SIMPLE_EVENTS_GUARD: &str = "use_simple_events(t)";
const META_EVENTS_GUARD: &str = "use_meta_events(t)";

/// Put atemporal facts under `#program base.`.
///
/// Sources whose first non-comment line is already a `#program` directive
/// are returned unchanged.
pub fn wrap_atemporal(source: &str) -> String {
    let first = source
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty() && !line.starts_with('%'));
    match first {
        Some(line) if line.starts_with("#program") => source.to_string(),
        _ => format!("#program base.\n\n{source}"),
    }
}

/// Variable in the penultimate argument of a rule head, e.g. `T` in
/// `event(P, T, seconds)`.
fn time_variable(head: &str) -> Option<String> {
    let head = head.trim();
    if !head.ends_with(')') {
        return None;
    }
    let (_, args) = head.split_once('(')?;
    let args = &args[..args.rfind(')')?];
    let args = split_arguments(args);
    if args.len() < 2 {
        return None;
    }
    let candidate = args[args.len() - 2].trim();
    candidate
        .starts_with(|c: char| c.is_uppercase())
        .then(|| candidate.to_string())
}

fn simple_event_guards(statement: &str) -> Vec<String> {
    let mut guards = vec![SIMPLE_EVENTS_GUARD.to_string()];
    let head = statement
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty() && !line.starts_with('%'))
        .and_then(|line| line.split_once(":-"))
        .map(|(head, _)| head);
    if let Some(var) = head.and_then(time_variable) {
        guards.push(format!("time_scope(t, {var})"));
    }
    guards
}

/// Split simple-event rules into a base section (facts) and a `step(t)`
/// section whose rules are guarded by `use_simple_events(t)`, plus
/// `time_scope(t, X)` when the head's penultimate argument is a variable.
pub fn wrap_simple_events(source: &str) -> String {
    let classified = classify(&split_statements(source));

    let mut out = String::from("#program base.\n\n");
    for statement in &classified.base {
        out.push_str(statement);
    }
    if classified
        .base
        .last()
        .is_some_and(|last| !last.ends_with("\n\n"))
    {
        out.push('\n');
    }

    out.push_str("#program step(t).\n");
    out.push_str(&format!("#external {SIMPLE_EVENTS_GUARD}.\n\n"));
    for statement in &classified.dynamic {
        out.push_str(&guard_rule(statement, &simple_event_guards(statement)));
        out.push_str("\n\n");
    }

    format!("{}\n", out.trim_end())
}

/// Keep facts as they are and move meta-event rules into a `check(t)`
/// section guarded by `use_meta_events(t)`.
pub fn wrap_meta_events(source: &str) -> String {
    let classified = classify(&split_statements(source));

    let mut out = String::new();
    for statement in &classified.base {
        out.push_str(statement);
    }

    if !classified.dynamic.is_empty() {
        out.push_str("#program check(t).\n");
        out.push_str(&format!("#external {META_EVENTS_GUARD}.\n\n"));
        let guards = [META_EVENTS_GUARD.to_string()];
        for statement in &classified.dynamic {
            out.push_str(&guard_rule(statement, &guards));
            out.push_str("\n\n");
        }
    }

    format!("{}\n", out.trim_end())
}
