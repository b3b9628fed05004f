//! Solver report document.
//!
//! Mirrors the JSON layout clingo emits with `--outf=2`, so the same types
//! read clingo's own output and the reports written by the incremental driver.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Round seconds to millisecond precision.
pub fn round_millis(secs: f64) -> f64 {
    (secs * 1000.0).round() / 1000.0
}

/// One model: its shown atoms, costs and elapsed time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Witness {
    #[serde(default)]
    pub value: Vec<String>,
    #[serde(default)]
    pub costs: Vec<i64>,
    #[serde(default)]
    pub time: f64,
}

impl Witness {
    /// Build a witness from atoms, sorted and without duplicates.
    pub fn from_atoms<I, S>(atoms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let value: BTreeSet<String> = atoms.into_iter().map(Into::into).collect();
        Self {
            value: value.into_iter().collect(),
            costs: Vec::new(),
            time: 0.0,
        }
    }

    /// An empty witness (no atoms).
    pub fn empty() -> Self {
        Self::from_atoms(Vec::<String>::new())
    }

    /// Union of several witnesses' atoms.
    pub fn merged<'a, I>(witnesses: I) -> Self
    where
        I: IntoIterator<Item = &'a Witness>,
    {
        Self::from_atoms(
            witnesses
                .into_iter()
                .flat_map(|w| w.value.iter().cloned()),
        )
    }

    /// Whether the atom list is strictly ascending.
    pub fn is_canonical(&self) -> bool {
        self.value.windows(2).all(|pair| pair[0] < pair[1])
    }
}

/// One solve call: its time interval and the models it produced.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Call {
    #[serde(default)]
    pub start: f64,
    #[serde(default)]
    pub stop: f64,
    #[serde(default)]
    pub witnesses: Vec<Witness>,
}

/// Overall satisfiability verdict.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    #[serde(rename = "SAT", alias = "SATISFIABLE", alias = "OPTIMUM FOUND")]
    Sat,
    #[serde(rename = "UNSAT", alias = "UNSATISFIABLE")]
    Unsat,
    #[default]
    #[serde(rename = "UNKNOWN")]
    Unknown,
}

impl Verdict {
    /// `Sat` iff at least one witness exists.
    pub fn from_witness_count(count: usize) -> Self {
        if count > 0 {
            Verdict::Sat
        } else {
            Verdict::Unsat
        }
    }
}

/// Model count summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Models {
    #[serde(default)]
    pub number: usize,
    #[serde(default = "default_more")]
    pub more: String,
}

fn default_more() -> String {
    "no".to_string()
}

impl Default for Models {
    fn default() -> Self {
        Self {
            number: 0,
            more: default_more(),
        }
    }
}

/// Aggregate timing breakdown in seconds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Timing {
    #[serde(default)]
    pub total: f64,
    #[serde(default)]
    pub solve: f64,
    #[serde(default)]
    pub model: f64,
    #[serde(default)]
    pub unsat: f64,
    #[serde(default, rename = "CPU")]
    pub cpu: f64,
}

/// The result document of one or more solve calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Report {
    #[serde(default)]
    pub solver: String,
    #[serde(default)]
    pub input: Vec<String>,
    #[serde(default)]
    pub call: Vec<Call>,
    #[serde(default)]
    pub result: Verdict,
    #[serde(default)]
    pub models: Models,
    #[serde(default)]
    pub calls: usize,
    #[serde(default)]
    pub time: Timing,
    #[serde(default = "empty_stats")]
    pub stats: Value,
    /// Keys this model does not know about, kept for round-tripping.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn empty_stats() -> Value {
    Value::Object(Map::new())
}

impl Report {
    /// Build a single-call report whose verdict and model count follow the witnesses.
    pub fn single_call(
        solver: impl Into<String>,
        input: Vec<String>,
        call: Call,
        time: Timing,
    ) -> Self {
        let count = call.witnesses.len();
        Self {
            solver: solver.into(),
            input,
            call: vec![call],
            result: Verdict::from_witness_count(count),
            models: Models {
                number: count,
                more: default_more(),
            },
            calls: 1,
            time,
            stats: empty_stats(),
            extra: Map::new(),
        }
    }

    /// Witnesses of the first call, if any.
    pub fn witnesses(&self) -> &[Witness] {
        self.call
            .first()
            .map(|c| c.witnesses.as_slice())
            .unwrap_or(&[])
    }

    /// First model's atoms, if the report has one.
    pub fn first_model(&self) -> Option<&[String]> {
        self.witnesses().first().map(|w| w.value.as_slice())
    }

    /// Serialize as indented JSON.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
