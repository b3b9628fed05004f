//! Guard switch names.
//!
//! Every guard is a one-argument external atom keyed by the step label,
//! e.g. `use_linear(3)`. The names are fixed by the CASPER encodings.

/// Guards enabled while a `step(t)` section is being solved.
pub const STEP_GUARDS: [&str; 4] = [
    "use_temporal_index",
    "use_simple_events",
    "use_expansion",
    "use_linear",
];

/// Guards enabled while a `check(t)` section is being solved.
pub const CHECK_GUARDS: [&str; 3] = ["use_meta_events", "use_repair", "use_preference"];

/// All guard names, step guards first.
pub fn all_guards() -> impl Iterator<Item = &'static str> {
    STEP_GUARDS.iter().chain(CHECK_GUARDS.iter()).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_guards_order() {
        let names: Vec<_> = all_guards().collect();
        assert_eq!(names.len(), 7);
        assert_eq!(names[0], "use_temporal_index");
        assert_eq!(names[3], "use_linear");
        assert_eq!(names[4], "use_meta_events");
        assert_eq!(names[6], "use_preference");
    }
}
