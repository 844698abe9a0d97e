//! End-to-end scenario calculation.
//!
//! [`calculate_scenario`] normalizes the input, then runs region lookup,
//! benefit allocation, runway analysis and the recommendation solver in that
//! order, collecting one audit step per rule applied.

use std::time::Instant;

use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::EngineConfig;
use crate::models::{AuditStep, AuditTrace, AuditWarning, ScenarioInput, ScenarioReport};

use super::benefit_allocation::allocate_benefits;
use super::recommendation::recommend_severance;
use super::region_resolver::resolve_region;
use super::runway::analyze_runway;

/// Calculates a complete exit scenario.
///
/// Never fails: out-of-domain input is clamped and an unresolvable postal
/// code maps to the `Unknown` region, each recorded as an [`AuditWarning`].
///
/// # Example
///
/// ```
/// use exit_runway_engine::calculation::calculate_scenario;
/// use exit_runway_engine::config::EngineConfig;
/// use exit_runway_engine::models::{ScenarioInput, TaxClass};
/// use rust_decimal::Decimal;
///
/// let config = EngineConfig::germany();
/// let input = ScenarioInput::new(Decimal::new(90_000, 0), Decimal::new(6, 0), TaxClass::MarriedFavorable, "89231")
///     .with_monthly_expenses(Decimal::new(3_000, 0));
///
/// let report = calculate_scenario(&input, &config);
/// assert_eq!(report.result.region.region_name, "Bayern (Bavaria)");
/// assert_eq!(report.runway.runway_months, Decimal::new(2211, 2));
/// assert!(report.audit_trace.warnings.is_empty());
/// ```
pub fn calculate_scenario(input: &ScenarioInput, config: &EngineConfig) -> ScenarioReport {
    let start_time = Instant::now();
    let calculation_id = Uuid::new_v4();
    let policy = config.policy();

    let (input, mut warnings) = input.normalized(policy);
    for warning in &warnings {
        warn!(
            calculation_id = %calculation_id,
            code = %warning.code,
            message = %warning.message,
            "Scenario input adjusted"
        );
    }

    let mut steps: Vec<AuditStep> = Vec::with_capacity(8);

    let lookup = resolve_region(&input.postal_code, config.regions(), 1);
    if lookup.region.is_unknown() {
        warn!(
            calculation_id = %calculation_id,
            postal_code = %input.postal_code,
            "Postal code did not resolve to a region"
        );
        warnings.push(AuditWarning {
            code: "UNKNOWN_REGION".to_string(),
            message: format!(
                "Postal code '{}' did not resolve to a federal state; no family benefit applied",
                input.postal_code
            ),
            severity: "medium".to_string(),
        });
    }
    debug!(
        calculation_id = %calculation_id,
        region = %lookup.region.region_name,
        "Resolved region"
    );
    steps.push(lookup.audit_step);

    let allocation = allocate_benefits(&input, &lookup.region, policy, 2);
    let result = allocation.result;
    debug!(
        calculation_id = %calculation_id,
        net_severance = %result.severance.net_severance,
        benefit_months = result.total_unemployment_benefit_months,
        total_two_years = %result.total_two_years,
        "Allocated benefits"
    );
    let next_step = 2 + allocation.audit_steps.len() as u32;
    steps.extend(allocation.audit_steps);

    let runway = analyze_runway(&result, next_step);
    debug!(
        calculation_id = %calculation_id,
        runway_months = %runway.analysis.runway_months,
        total_surplus = %runway.analysis.total_surplus,
        "Analyzed runway"
    );
    steps.push(runway.audit_step);
    let runway = runway.analysis;

    let solved = recommend_severance(&result, &runway, &policy.recommendation, next_step + 1);
    debug!(
        calculation_id = %calculation_id,
        breakeven_months = solved.recommendation.breakeven_option.months,
        "Solved severance options"
    );
    steps.push(solved.audit_step);
    for warning in &solved.warnings {
        warn!(
            calculation_id = %calculation_id,
            code = %warning.code,
            message = %warning.message,
            "Severance options capped"
        );
    }
    warnings.extend(solved.warnings);

    let duration_us = start_time.elapsed().as_micros() as u64;

    info!(
        calculation_id = %calculation_id,
        region = %result.region.region_name,
        runway_months = %runway.runway_months.round_dp(2),
        total_surplus = %runway.total_surplus.round_dp(2),
        warnings = warnings.len(),
        duration_us = duration_us,
        "Scenario calculated"
    );

    ScenarioReport {
        calculation_id,
        timestamp: Utc::now(),
        engine_version: env!("CARGO_PKG_VERSION").to_string(),
        input,
        result,
        runway,
        recommendation: solved.recommendation,
        audit_trace: AuditTrace {
            steps,
            warnings,
            duration_us,
        },
    }
}
