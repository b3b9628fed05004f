//! Step labels and step plan extraction.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type for step plan operations.
pub type PlanResult<T> = Result<T, PlanError>;

/// Errors raised while extracting a step plan.
#[derive(Debug, Error)]
pub enum PlanError {
    /// The program declares no `#program step(...)` section.
    #[error("No #program step(...) declarations found in {source_name}")]
    NoStepsFound { source_name: String },

    /// A step header carries a label that is neither a number nor a constant.
    #[error("Invalid step label '{label}' on line {line}")]
    InvalidLabel { line: usize, label: String },

    /// The program source could not be read.
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Identifier of one incremental solving phase.
///
/// Numbers map to solver integers, symbols to solver constants (`t5`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StepLabel {
    Number(i32),
    Symbol(String),
}

impl StepLabel {
    /// Parse a header parameter. Returns `None` for anything that is not an
    /// integer in the solver's number domain or a lower-case constant.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if let Ok(n) = text.parse::<i32>() {
            return Some(StepLabel::Number(n));
        }
        if is_constant(text) {
            return Some(StepLabel::Symbol(text.to_string()));
        }
        None
    }
}

impl fmt::Display for StepLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepLabel::Number(n) => write!(f, "{n}"),
            StepLabel::Symbol(s) => f.write_str(s),
        }
    }
}

impl From<i32> for StepLabel {
    fn from(n: i32) -> Self {
        StepLabel::Number(n)
    }
}

fn is_constant(text: &str) -> bool {
    let trimmed = text.trim_start_matches('_');
    let mut chars = trimmed.chars();
    match chars.next() {
        Some(c) if c.is_ascii_lowercase() => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '\'')
        }
        _ => false,
    }
}

/// Split a `#program <name>[(<param>)].` directive into name and parameter.
///
/// The line is trimmed first; anything after the closing `.` is ignored.
pub fn parse_program_directive(line: &str) -> Option<(&str, Option<&str>)> {
    let rest = line.trim().strip_prefix("#program")?;
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let rest = rest.trim_start();
    let name_len = rest
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .unwrap_or(rest.len());
    if name_len == 0 {
        return None;
    }
    let (name, rest) = rest.split_at(name_len);
    let rest = rest.trim_start();

    if let Some(inner) = rest.strip_prefix('(') {
        let close = inner.find(')')?;
        let param = inner[..close].trim();
        inner[close + 1..].trim_start().strip_prefix('.')?;
        Some((name, Some(param)))
    } else {
        rest.strip_prefix('.')?;
        Some((name, None))
    }
}

/// Ordered, duplicate-free step labels of a facts program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepPlan {
    labels: Vec<StepLabel>,
}

impl StepPlan {
    /// Extract the plan from program text.
    ///
    /// Labels keep the order of their first declaration. A program without
    /// any step header is rejected.
    pub fn extract(source: &str, source_name: &str) -> PlanResult<Self> {
        let labels = collect_labels(source, "step")?;
        if labels.is_empty() {
            return Err(PlanError::NoStepsFound {
                source_name: source_name.to_string(),
            });
        }
        Ok(Self { labels })
    }

    /// Read and extract the plan from a file.
    pub fn from_path(path: &Path) -> PlanResult<Self> {
        let source = std::fs::read_to_string(path).map_err(|source| PlanError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::extract(&source, &path.display().to_string())
    }

    /// Labels of `#program check(<label>).` headers, in declaration order.
    pub fn check_labels(source: &str) -> PlanResult<Vec<StepLabel>> {
        collect_labels(source, "check")
    }

    pub fn labels(&self) -> &[StepLabel] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, StepLabel> {
        self.labels.iter()
    }
}

impl<'a> IntoIterator for &'a StepPlan {
    type Item = &'a StepLabel;
    type IntoIter = std::slice::Iter<'a, StepLabel>;

    fn into_iter(self) -> Self::IntoIter {
        self.labels.iter()
    }
}

fn collect_labels(source: &str, section: &str) -> PlanResult<Vec<StepLabel>> {
    let mut labels: Vec<StepLabel> = Vec::new();
    for (idx, line) in source.lines().enumerate() {
        let Some((name, Some(param))) = parse_program_directive(line) else {
            continue;
        };
        if name != section {
            continue;
        }
        let label = StepLabel::parse(param).ok_or_else(|| PlanError::InvalidLabel {
            line: idx + 1,
            label: param.to_string(),
        })?;
        if !labels.contains(&label) {
            labels.push(label);
        }
    }
    Ok(labels)
}
