//! Severance recommendation solver.
//!
//! Solves for the severance size at which two-year post-exit cash equals
//! two-year expenses and proposes three whole-month options around it.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::config::RecommendationPolicy;
use crate::models::{
    AuditStep, AuditWarning, NetRateSource, OptionOutcome, Recommendation, RunwayAnalysis, ScenarioResult,
    SeveranceOption,
};

/// Net severance per gross EUR assumed when the scenario has no severance to
/// derive it from.
///
/// An approximation, not validated against real tax data. Overridable through
/// `recommendation.default_net_severance_rate` in `policy.yaml`.
pub const DEFAULT_NET_SEVERANCE_RATE: Decimal = Decimal::from_parts(75, 0, 0, false, 2);

/// Fraction of one severance month within which a projected surplus counts
/// as break-even.
pub const BREAKEVEN_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 1);

/// Builds deficit, break-even and surplus severance options.
///
/// # Example
///
/// ```
/// use exit_runway_engine::calculation::{allocate, analyze, recommend};
/// use exit_runway_engine::config::EngineConfig;
/// use exit_runway_engine::models::{OptionOutcome, ScenarioInput, TaxClass};
/// use rust_decimal::Decimal;
///
/// let config = EngineConfig::germany();
/// let input = ScenarioInput::new(Decimal::new(90_000, 0), Decimal::new(6, 0), TaxClass::MarriedFavorable, "89231")
///     .with_monthly_expenses(Decimal::new(3_000, 0));
/// let region = config.regions().resolve(&input.postal_code);
/// let result = allocate(&input, &region, config.policy());
/// let runway = analyze(&result);
///
/// let recommendation = recommend(&result, &runway, &config.policy().recommendation);
/// assert_eq!(recommendation.breakeven_option.months, 4);
/// assert_eq!(recommendation.deficit_option.outcome, OptionOutcome::Deficit);
/// ```
pub fn recommend(
    result: &ScenarioResult,
    runway: &RunwayAnalysis,
    policy: &RecommendationPolicy,
) -> Recommendation {
    let severance = &result.severance;
    let (net_severance_rate, net_rate_source) = match severance
        .net_severance
        .checked_div(severance.gross_severance)
    {
        Some(rate) if !severance.gross_severance.is_zero() => (rate, NetRateSource::Realized),
        _ => (policy.default_net_severance_rate, NetRateSource::Default),
    };

    let net_per_severance_month = result.monthly_gross_salary.saturating_mul(net_severance_rate);
    let current_surplus = runway.total_surplus;
    let shortfall = runway.total_expenses.saturating_sub(runway.cash_after_exit);

    let additional_months_needed = if current_surplus < Decimal::ZERO {
        (-current_surplus)
            .checked_div(net_per_severance_month)
            .unwrap_or(Decimal::ZERO)
    } else {
        Decimal::ZERO
    };

    let breakeven_exact = if net_per_severance_month > Decimal::ZERO {
        shortfall
            .checked_div(net_per_severance_month)
            .and_then(|months| months.checked_add(result.severance_months))
    } else {
        None
    };

    let pivot = breakeven_exact.unwrap_or(result.severance_months);
    let floor = pivot.floor();
    let deficit_months = whole_months(floor.checked_sub(Decimal::ONE));
    let breakeven_months = whole_months(Some(pivot.ceil()));
    let surplus_months = whole_months(floor.checked_add(Decimal::TWO));

    let tolerance = policy.breakeven_tolerance.saturating_mul(net_per_severance_month);
    let option = |months: u32| {
        severance_option(
            months,
            result,
            runway,
            net_severance_rate,
            tolerance,
        )
    };

    Recommendation {
        net_severance_rate,
        net_rate_source,
        net_per_severance_month,
        current_surplus,
        additional_months_needed,
        breakeven_exact,
        deficit_option: option(deficit_months),
        breakeven_option: option(breakeven_months),
        surplus_option: option(surplus_months),
    }
}

/// Converts a month count to a whole number of at least one month.
///
/// Counts beyond `u32` saturate to `u32::MAX`; [`recommend_severance`] flags
/// options that hit it.
fn whole_months(months: Option<Decimal>) -> u32 {
    match months {
        Some(m) if m < Decimal::ONE => 1,
        Some(m) => m.to_u32().unwrap_or(u32::MAX),
        None => u32::MAX,
    }
}

fn severance_option(
    months: u32,
    result: &ScenarioResult,
    runway: &RunwayAnalysis,
    net_severance_rate: Decimal,
    tolerance: Decimal,
) -> SeveranceOption {
    let gross_severance = result.monthly_gross_salary.saturating_mul(Decimal::from(months));
    let net_severance = gross_severance.saturating_mul(net_severance_rate);
    let projected_surplus = runway
        .cash_after_exit
        .saturating_sub(runway.total_expenses)
        .saturating_add(net_severance.saturating_sub(result.severance.net_severance));

    SeveranceOption {
        months,
        gross_severance,
        net_severance,
        projected_surplus,
        outcome: classify(projected_surplus, tolerance),
    }
}

/// Classifies a projected surplus against the break-even tolerance.
pub fn classify(projected_surplus: Decimal, tolerance: Decimal) -> OptionOutcome {
    if projected_surplus.abs() < tolerance {
        OptionOutcome::BreakEven
    } else if projected_surplus >= Decimal::ZERO {
        OptionOutcome::Surplus
    } else {
        OptionOutcome::Deficit
    }
}

/// The result of the recommendation solver, including the audit step.
#[derive(Debug, Clone)]
pub struct RecommendationResult {
    /// The recommended options.
    pub recommendation: Recommendation,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
    /// Raised when an option's month count was capped.
    pub warnings: Vec<AuditWarning>,
}

/// Builds the severance options and records the calculation.
///
/// An option whose month count does not fit a `u32` is capped at
/// `u32::MAX` and reported as an `OPTION_MONTHS_CAPPED` warning.
pub fn recommend_severance(
    result: &ScenarioResult,
    runway: &RunwayAnalysis,
    policy: &RecommendationPolicy,
    step_number: u32,
) -> RecommendationResult {
    let recommendation = recommend(result, runway, policy);

    let rate_note = match recommendation.net_rate_source {
        NetRateSource::Realized => "realized",
        NetRateSource::Default => "default",
    };
    let capped = recommendation
        .options()
        .iter()
        .filter(|o| o.months == u32::MAX)
        .count();
    let mut warnings = Vec::new();
    if capped > 0 {
        warnings.push(AuditWarning {
            code: "OPTION_MONTHS_CAPPED".to_string(),
            message: format!(
                "{} of 3 severance options capped at {} months; break-even is {}",
                capped,
                u32::MAX,
                recommendation
                    .breakeven_exact
                    .map(|b| format!("{} months", b.round_dp(2)))
                    .unwrap_or_else(|| "out of range".to_string())
            ),
            severity: "high".to_string(),
        });
    }

    let mut reasoning = match recommendation.breakeven_exact {
        Some(breakeven) => format!(
            "Each severance month nets €{} ({} rate {}); break-even at {} months; options {} / {} / {}",
            recommendation.net_per_severance_month.round_dp(2),
            rate_note,
            recommendation.net_severance_rate.round_dp(4),
            breakeven.round_dp(2),
            recommendation.deficit_option.months,
            recommendation.breakeven_option.months,
            recommendation.surplus_option.months
        ),
        None => format!(
            "A severance month is worth nothing at this salary; no break-even exists, options built around the current {} months",
            result.severance_months
        ),
    };

    if capped > 0 {
        reasoning.push_str(&format!("; {} option(s) capped at {} months", capped, u32::MAX));
    }

    let options: Vec<serde_json::Value> = recommendation
        .options()
        .iter()
        .map(|o| {
            serde_json::json!({
                "months": o.months,
                "projected_surplus": o.projected_surplus.to_string(),
                "outcome": o.outcome
            })
        })
        .collect();

    let audit_step = AuditStep {
        step_number,
        rule_id: "severance_recommendation".to_string(),
        rule_name: "Severance Recommendation".to_string(),
        legal_ref: None,
        input: serde_json::json!({
            "severance_months": result.severance_months.to_string(),
            "monthly_gross_salary": result.monthly_gross_salary.to_string(),
            "cash_after_exit": runway.cash_after_exit.to_string(),
            "total_expenses": runway.total_expenses.to_string()
        }),
        output: serde_json::json!({
            "net_severance_rate": recommendation.net_severance_rate.to_string(),
            "net_rate_source": recommendation.net_rate_source,
            "breakeven_exact": recommendation.breakeven_exact.map(|b| b.to_string()),
            "options": options,
            "capped_options": capped
        }),
        reasoning,
    };

    RecommendationResult {
        recommendation,
        audit_step,
        warnings,
    }
}
