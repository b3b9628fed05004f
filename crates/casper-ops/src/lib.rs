//! CASPER Operations Layer
//!
//! A typed API over the two CASPER operations, shared by the CLI and
//! programmatic callers:
//!
//! - **Incremental run**: extract the step plan, drive one solving session
//!   through base/step/check shots and aggregate the report.
//! - **Meta-event recomputation**: re-solve every witness of a stored report
//!   in a bounded pool of solver subprocesses and rewrite the report.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use casper_ops::{Config, MetaEventRequest, OpsContext};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let ctx = OpsContext::new(Config::load()?);
//!     let request = MetaEventRequest::new(
//!         vec!["rules/base.lp".into()],
//!         "rules/meta.lp",
//!         "report.json",
//!     )
//!     .with_threads(4);
//!     let response = ctx.recompute_meta_events(&request).await?;
//!     println!("{}", response.report.to_json_pretty()?);
//!     Ok(())
//! }
//! ```

mod config;
mod context;
mod error;
mod meta;
mod requests;
mod responses;

pub use config::Config;
pub use context::OpsContext;
pub use error::{OpsError, OpsResult};
pub use requests::*;
pub use responses::*;

pub use casper_engine::WitnessMode;
