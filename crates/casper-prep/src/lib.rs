//! Rule and fact preparation for CASPER.
//!
//! Line-oriented rewrites that turn user-written files into the sectioned,
//! guard-annotated programs the incremental driver solves:
//!
//! - [`group_observations`]: `obs(..., T).` facts into `#program step(t<T>).` sections
//! - [`filter_observations`]: keep observations inside a time range
//! - [`wrap_atemporal`]: put plain facts under `#program base.`
//! - [`wrap_simple_events`] / [`wrap_meta_events`]: move rules into the
//!   `step(t)` / `check(t)` sections with their guards
//! - [`step_activation`]: guard facts for one-shot runs

mod activation;
mod error;
mod observations;
mod statements;
mod wrap;

pub use activation::step_activation;
pub use error::{PrepError, PrepResult};
pub use observations::{filter_observations, group_observations};
pub use wrap::{wrap_atemporal, wrap_meta_events, wrap_simple_events};
