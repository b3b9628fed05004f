//! OpsContext - the service that executes CASPER operations.
//!
//! Holds configuration and provides the incremental run and the meta-event
//! recomputation. Used by the CLI or any other consumer.

use std::path::Path;

use casper_core::{Report, StepPlan};
use casper_engine::{IncrementalInputs, IncrementalSolver, ReportAggregator, SolvingSession};
use tracing::{info, warn};

use crate::config::Config;
use crate::error::{OpsError, OpsResult};
use crate::meta::{apply_outcomes, MetaRunner};
use crate::requests::*;
use crate::responses::*;

/// The main operations context.
#[derive(Debug, Clone)]
pub struct OpsContext {
    /// Configuration for operations.
    pub config: Config,
}

impl OpsContext {
    /// Create a new OpsContext with the given configuration.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Create a new OpsContext with configuration loaded from disk and env.
    pub fn default_config() -> OpsResult<Self> {
        Ok(Self::new(Config::load()?))
    }

    // =========================================================================
    // Incremental Operations
    // =========================================================================

    /// Run the incremental loop on a caller-provided session.
    ///
    /// The step plan is extracted before the session is touched, so a
    /// program without steps fails without any grounding.
    pub fn incremental_with<S: SolvingSession>(
        &self,
        session: &mut S,
        request: &IncrementalRequest,
    ) -> OpsResult<IncrementalResponse> {
        let plan = StepPlan::from_path(&request.facts)?;
        info!(
            steps = plan.len(),
            facts = %request.facts.display(),
            "Extracted step plan"
        );

        let inputs = IncrementalInputs::new(request.base.clone(), request.step.clone())
            .with_check(request.check.clone());
        let run = IncrementalSolver::new(session).run(&plan, &inputs)?;
        let report = ReportAggregator::new(request.witness_mode).aggregate(&run);

        info!(
            models = report.models.number,
            result = ?report.result,
            "Incremental run finished"
        );

        Ok(IncrementalResponse {
            report,
            steps: plan.labels().to_vec(),
        })
    }

    /// Run the incremental loop on a fresh libclingo session.
    #[cfg(feature = "clingo")]
    pub fn incremental(&self, request: &IncrementalRequest) -> OpsResult<IncrementalResponse> {
        // Fail on a missing step plan before creating the control object.
        StepPlan::from_path(&request.facts)?;
        let args = request
            .clingo_args
            .clone()
            .unwrap_or_else(|| self.config.clingo_args.clone());
        let mut session = casper_engine::ClingoSession::new(args)?;
        self.incremental_with(&mut session, request)
    }

    /// Incremental solving needs the `clingo` feature.
    #[cfg(not(feature = "clingo"))]
    pub fn incremental(&self, request: &IncrementalRequest) -> OpsResult<IncrementalResponse> {
        StepPlan::from_path(&request.facts)?;
        Err(OpsError::BackendUnavailable)
    }

    // =========================================================================
    // Meta-Event Operations
    // =========================================================================

    /// Recompute meta-events for every witness of a stored report.
    ///
    /// Subprocess failures degrade single witnesses; a malformed report or
    /// an invalid pool size fails the whole operation.
    pub async fn recompute_meta_events(
        &self,
        request: &MetaEventRequest,
    ) -> OpsResult<MetaEventResponse> {
        let threads = request.threads.unwrap_or(self.config.threads);
        if threads == 0 {
            return Err(OpsError::InvalidThreads(threads));
        }

        let mut report = Self::load_report(&request.report_path)?;
        if report.call.is_empty() {
            return Err(OpsError::EmptyReport {
                path: request.report_path.clone(),
            });
        }

        let runner = MetaRunner {
            clingo_bin: self.config.clingo_bin.clone(),
            base_files: request.base_files.clone(),
            meta_event: request.meta_event.clone(),
            unit: request
                .unit
                .clone()
                .unwrap_or_else(|| self.config.time_unit.clone()),
            timeout: request.timeout.or_else(|| self.config.solve_timeout()),
        };

        let witnesses = report.witnesses().to_vec();
        info!(
            witnesses = witnesses.len(),
            threads,
            solver = %runner.clingo_bin.display(),
            "Recomputing meta-events"
        );
        let outcomes = runner.recompute_all(&witnesses, threads).await;

        let degraded = outcomes.iter().filter(|o| o.degraded).count();
        let recomputed = outcomes.len() - degraded;
        if degraded > 0 {
            warn!(degraded, recomputed, "Some witnesses were left empty");
        }

        apply_outcomes(
            &mut report,
            outcomes,
            &request.meta_event,
            &self.config.stale_input_marker,
        );

        Ok(MetaEventResponse {
            report,
            recomputed,
            degraded,
        })
    }

    /// Read a report file.
    pub fn load_report(path: &Path) -> OpsResult<Report> {
        let contents = std::fs::read_to_string(path)?;
        serde_json::from_str(&contents).map_err(|source| OpsError::MalformedReport {
            path: path.to_path_buf(),
            source,
        })
    }
}
