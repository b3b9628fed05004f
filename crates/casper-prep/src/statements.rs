//! Statement-level view of a rule file.
//!
//! A statement is everything up to and including a line ending in `.`
//! (comment lines and directives never close one). Leading comments stay
//! attached to the statement that follows them.

/// Statements of a rule file split by the guard-injecting wrappers.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub(crate) struct Classified {
    /// Facts and comment-only blocks, newline terminated.
    pub base: Vec<String>,
    /// Rules (first content line contains `:-`).
    pub dynamic: Vec<String>,
}

fn is_directive(stripped: &str) -> bool {
    stripped.starts_with("#program") || stripped.starts_with("#external")
}

pub(crate) fn split_statements(contents: &str) -> Vec<String> {
    let mut statements = Vec::new();
    let mut buffer = String::new();
    for line in contents.split_inclusive('\n') {
        buffer.push_str(line);
        let stripped = line.trim();
        if is_directive(stripped) {
            continue;
        }
        if stripped.ends_with('.') && !stripped.starts_with('%') {
            statements.push(std::mem::take(&mut buffer));
        }
    }
    if !buffer.is_empty() {
        statements.push(buffer);
    }
    statements
}

/// First line that is neither blank nor a comment.
fn leading_content(statement: &str) -> Option<&str> {
    statement
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty() && !line.starts_with('%'))
}

/// Sort statements into base and dynamic parts; existing directives are dropped.
pub(crate) fn classify(statements: &[String]) -> Classified {
    let mut classified = Classified::default();
    for statement in statements {
        let stripped = statement.trim();
        if stripped.is_empty() || is_directive(stripped) {
            continue;
        }
        match leading_content(statement) {
            Some(content) if content.contains(":-") => {
                classified.dynamic.push(statement.clone());
            }
            Some(_) if !stripped.ends_with('.') => {
                classified.base.push(format!("{}\n", statement.trim_end()));
            }
            _ => classified.base.push(terminated(statement)),
        }
    }
    classified
}

fn terminated(statement: &str) -> String {
    if statement.ends_with('\n') {
        statement.to_string()
    } else {
        format!("{statement}\n")
    }
}

/// Split a statement into its leading comment/blank lines and the rest.
fn separate_prefix(statement: &str) -> (&str, &str) {
    let mut offset = 0;
    for line in statement.split_inclusive('\n') {
        let stripped = line.trim();
        if !stripped.is_empty() && !stripped.starts_with('%') {
            break;
        }
        offset += line.len();
    }
    statement.split_at(offset)
}

/// Top-level comma-separated arguments; nested brackets are kept whole.
pub(crate) fn split_arguments(text: &str) -> Vec<String> {
    let mut args = Vec::new();
    let mut depth = 0usize;
    let mut current = String::new();
    for c in text.chars() {
        if c == ',' && depth == 0 {
            args.push(current.trim().to_string());
            current.clear();
            continue;
        }
        current.push(c);
        match c {
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    if !current.is_empty() {
        args.push(current.trim().to_string());
    }
    args
}

fn indent_block(text: &str) -> String {
    text.lines()
        .map(|line| {
            let line = line.trim();
            if line.is_empty() {
                String::new()
            } else {
                format!("    {line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Rewrite `head :- body.` so the body starts with `guards`.
///
/// Leading comments are kept above the rule. Statements without `:-` are
/// returned as facts with a terminating period.
pub(crate) fn guard_rule(statement: &str, guards: &[String]) -> String {
    let raw = statement.trim_matches('\n');
    let (prefix, core) = separate_prefix(raw);
    let core = core.trim();
    if core.is_empty() {
        return raw.to_string();
    }

    let Some((head, body)) = core.split_once(":-") else {
        return if core.ends_with('.') {
            format!("{prefix}{core}")
        } else {
            format!("{prefix}{core}.")
        };
    };

    let body = body.trim();
    let body = body.strip_suffix('.').unwrap_or(body).trim_end();

    let mut lines: Vec<String> = guards.iter().map(|g| format!("    {g}")).collect();
    let body_block = indent_block(body);
    if !body_block.is_empty() {
        lines.push(body_block);
    }

    let head = head.trim();
    let opener = if head.is_empty() {
        ":-".to_string()
    } else {
        format!("{head} :-")
    };
    format!("{prefix}{opener}\n{}.", lines.join(",\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_statements_multiline_rule() {
        let source = "% facts\nperson(p).\nsick(P) :-\n    obs(P, fever, T).\n#program base.\nx.";
        let statements = split_statements(source);
        assert_eq!(
            statements,
            vec![
                "% facts\nperson(p).\n",
                "sick(P) :-\n    obs(P, fever, T).\n",
                "#program base.\nx.",
            ]
        );
    }

    #[test]
    fn test_comment_ending_in_period_does_not_close() {
        let statements = split_statements("% note.\na.\n");
        assert_eq!(statements, vec!["% note.\na.\n"]);
    }

    #[test]
    fn test_classify() {
        let statements = split_statements("% lead\nb(X) :- a(X).\nc\n% tail\n");
        let classified = classify(&statements);
        assert_eq!(classified.base, vec!["c\n% tail\n"]);
        assert_eq!(classified.dynamic, vec!["% lead\nb(X) :- a(X).\n"]);

        let classified = classify(&split_statements("a.\n#program step(t).\nb.\n"));
        assert_eq!(classified.base, vec!["a.\n"]);
        assert!(classified.dynamic.is_empty());
    }

    #[test]
    fn test_split_arguments_nested() {
        assert_eq!(
            split_arguments("P, f(a, b), [1,2], T"),
            vec!["P", "f(a, b)", "[1,2]", "T"]
        );
    }

    #[test]
    fn test_guard_rule_with_comment_prefix() {
        let guards = vec!["g(t)".to_string()];
        let out = guard_rule("% why\nh(X) :- a(X),\n      b(X).\n", &guards);
        assert_eq!(out, "% why\nh(X) :-\n    g(t),\n    a(X),\n    b(X).");
    }

    #[test]
    fn test_guard_constraint() {
        let guards = vec!["g(t)".to_string()];
        assert_eq!(guard_rule(":- a, b.", &guards), ":-\n    g(t),\n    a, b.");
    }

    #[test]
    fn test_guard_rule_leaves_facts() {
        assert_eq!(guard_rule("a", &[]), "a.");
        assert_eq!(guard_rule("a.\n", &[]), "a.");
    }
}
