//! Runway analysis.
//!
//! Measures post-exit cash (severance plus benefits, salary excluded) against
//! monthly expenses: how many months it lasts, and the surplus or deficit in
//! each year.

use rust_decimal::Decimal;

use crate::models::{AuditStep, MONTHS_PER_YEAR, RunwayAnalysis, ScenarioResult, YearSplit};

/// Computes runway and per-year surplus for a scenario.
///
/// Expenses count from the exit date: `12 − months_worked` months in the exit
/// year and a full year after. Runway is zero when expenses are zero.
/// Amounts that would leave the `Decimal` range saturate at its bounds.
///
/// # Example
///
/// ```
/// use exit_runway_engine::calculation::{allocate, analyze};
/// use exit_runway_engine::config::EngineConfig;
/// use exit_runway_engine::models::{ScenarioInput, TaxClass};
/// use rust_decimal::Decimal;
///
/// let config = EngineConfig::germany();
/// let input = ScenarioInput::new(Decimal::new(90_000, 0), Decimal::new(6, 0), TaxClass::MarriedFavorable, "89231")
///     .with_monthly_expenses(Decimal::new(3_000, 0));
/// let region = config.regions().resolve(&input.postal_code);
/// let result = allocate(&input, &region, config.policy());
///
/// let runway = analyze(&result);
/// assert_eq!(runway.runway_months, Decimal::new(2211, 2));
/// assert_eq!(runway.total_surplus, Decimal::new(12_330, 0));
/// ```
pub fn analyze(result: &ScenarioResult) -> RunwayAnalysis {
    let monthly_expenses = result.monthly_expenses;

    let cash_after_exit_by_year = YearSplit {
        exit_year: result.exit_year.cash_after_exit(),
        following_year: result.following_year.cash_after_exit(),
    };
    let cash_after_exit = cash_after_exit_by_year.total();

    let runway_months = cash_after_exit
        .checked_div(monthly_expenses)
        .unwrap_or(Decimal::ZERO);

    let expense_months_exit_year = result.exit_year.months_after_exit();
    let expense_months_following_year = MONTHS_PER_YEAR;

    let expenses_by_year = YearSplit {
        exit_year: monthly_expenses.saturating_mul(Decimal::from(expense_months_exit_year)),
        following_year: monthly_expenses.saturating_mul(Decimal::from(expense_months_following_year)),
    };
    let total_expenses = expenses_by_year.total();

    let surplus_by_year = YearSplit {
        exit_year: cash_after_exit_by_year
            .exit_year
            .saturating_sub(expenses_by_year.exit_year),
        following_year: cash_after_exit_by_year
            .following_year
            .saturating_sub(expenses_by_year.following_year),
    };

    RunwayAnalysis {
        cash_after_exit,
        cash_after_exit_by_year,
        runway_months,
        expense_months_exit_year,
        expense_months_following_year,
        expenses_by_year,
        total_expenses,
        surplus_by_year,
        total_surplus: surplus_by_year.total(),
    }
}

/// The result of runway analysis, including the audit step.
#[derive(Debug, Clone)]
pub struct RunwayResult {
    /// The runway analysis.
    pub analysis: RunwayAnalysis,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Computes runway and records the calculation.
pub fn analyze_runway(result: &ScenarioResult, step_number: u32) -> RunwayResult {
    let analysis = analyze(result);

    let reasoning = if result.monthly_expenses.is_zero() {
        format!(
            "€{} cash after exit; no expenses given, runway reported as 0",
            analysis.cash_after_exit.round_dp(2)
        )
    } else {
        format!(
            "€{} cash after exit / €{} monthly expenses = {} months; surplus €{} + €{} = €{}",
            analysis.cash_after_exit.round_dp(2),
            result.monthly_expenses.round_dp(2),
            analysis.runway_months.round_dp(1),
            analysis.surplus_by_year.exit_year.round_dp(2),
            analysis.surplus_by_year.following_year.round_dp(2),
            analysis.total_surplus.round_dp(2)
        )
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "runway".to_string(),
        rule_name: "Runway Analysis".to_string(),
        legal_ref: None,
        input: serde_json::json!({
            "cash_after_exit": analysis.cash_after_exit.to_string(),
            "monthly_expenses": result.monthly_expenses.to_string(),
            "expense_months_exit_year": analysis.expense_months_exit_year,
            "expense_months_following_year": analysis.expense_months_following_year
        }),
        output: serde_json::json!({
            "runway_months": analysis.runway_months.to_string(),
            "total_expenses": analysis.total_expenses.to_string(),
            "surplus_exit_year": analysis.surplus_by_year.exit_year.to_string(),
            "surplus_following_year": analysis.surplus_by_year.following_year.to_string(),
            "total_surplus": analysis.total_surplus.to_string()
        }),
        reasoning,
    };

    RunwayResult {
        analysis,
        audit_step,
    }
}
