//! Core data models for the Exit Runway Engine.
//!
//! This module contains the input record, the derived results and the audit
//! structures shared by every calculation step.

mod analysis;
mod region;
mod report;
mod scenario_input;
mod scenario_result;

pub use analysis::{
    NetRateSource, OptionOutcome, Recommendation, RunwayAnalysis, SeveranceOption, YearSplit,
};
pub use region::{RegionInfo, UNKNOWN_REGION};
pub use report::{AuditStep, AuditTrace, AuditWarning, ScenarioReport};
pub use scenario_input::{
    ExpenseBreakdown, MAX_MONEY_AMOUNT, MAX_SEVERANCE_MONTHS, MONTHS_PER_YEAR, ScenarioInput,
    TaxClass,
};
pub use scenario_result::{ScenarioResult, SeveranceTax, YearBreakdown};
