//! Report envelope and audit trace for a scenario calculation.
//!
//! This module contains the [`ScenarioReport`] type handed to rendering,
//! document-export and data-export collaborators, and the audit structures
//! that record every rule the engine applied.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Recommendation, RunwayAnalysis, ScenarioInput, ScenarioResult};

/// A single step in the audit trace recording a calculation decision.
///
/// Each step captures the input, output, and reasoning for a rule application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// Statute or scheme the rule models, if any (e.g. "§34 EStG").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legal_ref: Option<String>,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// A warning generated during calculation.
///
/// Warnings flag degraded input that was resolved to a fallback instead of
/// failing the calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditWarning {
    /// A code identifying the type of warning.
    pub code: String,
    /// A human-readable description of the warning.
    pub message: String,
    /// The severity level (e.g., "low", "medium", "high").
    pub severity: String,
}

/// The complete audit trace for a calculation.
///
/// # Example
///
/// ```
/// use exit_runway_engine::models::AuditTrace;
///
/// let trace = AuditTrace {
///     steps: vec![],
///     warnings: vec![],
///     duration_us: 1234,
/// };
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditTrace {
    /// The sequence of calculation steps.
    pub steps: Vec<AuditStep>,
    /// Any warnings generated during calculation.
    pub warnings: Vec<AuditWarning>,
    /// The total calculation duration in microseconds.
    pub duration_us: u64,
}

/// Everything one end-to-end scenario calculation produces.
///
/// `result`, `runway` and `recommendation` are fully determined by `input`
/// and the engine configuration; only the identifier, timestamp and audit
/// duration vary between runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioReport {
    /// Unique identifier for this calculation.
    pub calculation_id: Uuid,
    /// When the calculation was performed.
    pub timestamp: DateTime<Utc>,
    /// The version of the engine that performed the calculation.
    pub engine_version: String,
    /// The input after boundary normalization.
    pub input: ScenarioInput,
    /// Two-year cash-flow breakdown.
    pub result: ScenarioResult,
    /// Runway and per-year surplus.
    pub runway: RunwayAnalysis,
    /// Severance options.
    pub recommendation: Recommendation,
    /// Complete audit trace of calculation decisions.
    pub audit_trace: AuditTrace,
}
