//! Outbound result shapes consumed by report and risk-assessment
//! collaborators.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use sim_models::correlation::CorrelationMatrix;
use sim_models::distributions::DistributionKind;
use sim_models::variables::VariableSpec;

use crate::analysis::{ConfidenceInterval, ConvergenceReport, RiskMetrics, SummaryStatistics};

/// The durable product of one simulation run.
///
/// Everything a reporting collaborator needs: per-variable statistics and
/// intervals, tail risk metrics on the loss variable, the convergence
/// diagnostic, and whether an engine-owned correlation matrix had to be
/// repaired. Raw samples are deliberately absent; they are ephemeral
/// unless requested through the explicit raw-sampling entry points.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    /// Per-variable descriptive statistics, keyed by variable name.
    pub statistics: BTreeMap<String, SummaryStatistics>,
    /// Per-variable confidence intervals at the configured level.
    pub confidence_intervals: BTreeMap<String, ConfidenceInterval>,
    /// Tail risk metrics on the loss variable.
    pub risk_metrics: RiskMetrics,
    /// Running-mean convergence diagnostic.
    pub convergence: ConvergenceReport,
    /// True if an engine-generated correlation matrix was repaired by
    /// eigenvalue clipping. Caller-supplied matrices are never adjusted.
    pub matrix_adjusted: bool,
    /// Number of Monte Carlo iterations the result was reduced from.
    pub iterations: usize,
    /// Seed the run used, recorded so any result can be reproduced.
    pub seed: u64,
}

/// Introspection view of a registered scenario.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScenarioInfo {
    /// Scenario name.
    pub name: String,
    /// Human-readable description.
    pub description: String,
    /// The template's variables.
    pub variables: Vec<VariableSpec>,
    /// Distribution family per variable name.
    pub distributions: BTreeMap<String, DistributionKind>,
    /// The template's default correlation matrix.
    pub default_correlation: CorrelationMatrix,
}
