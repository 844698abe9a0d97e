//! Severance taxation under the five-fifths rule (Fünftelregelung).
//!
//! One fifth of the severance is added to the annual salary, the extra tax
//! this fifth causes is computed, and that extra tax is multiplied by five.
//! The income-tax function itself sits behind [`IncomeTaxModel`].

use rust_decimal::Decimal;

use crate::models::{AuditStep, SeveranceTax};

/// The number of fifths the severance is split into.
pub const SEVERANCE_FIFTHS: Decimal = Decimal::from_parts(5, 0, 0, false, 0);

/// Annual income tax as a function of taxable income.
pub trait IncomeTaxModel {
    /// Returns the tax owed on `annual_income`.
    fn income_tax(&self, annual_income: Decimal) -> Decimal;
}

/// Flat model: everything above the net rate is tax.
///
/// `tax(income) = (1 − net_rate) × income`. Under this model the five-fifths
/// rule reduces to a flat `1 − net_rate` on the severance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlatNetRateTax {
    /// Share of gross income kept after tax.
    pub net_rate: Decimal,
}

impl FlatNetRateTax {
    /// Creates a flat model for the given net rate.
    pub fn new(net_rate: Decimal) -> Self {
        Self { net_rate }
    }
}

impl IncomeTaxModel for FlatNetRateTax {
    fn income_tax(&self, annual_income: Decimal) -> Decimal {
        Decimal::ONE
            .saturating_sub(self.net_rate)
            .saturating_mul(annual_income)
    }
}

/// Tax attributable to `severance` under the five-fifths rule.
///
/// When salary plus one fifth leaves the `Decimal` range, the fifth is
/// measured just below the salary instead.
pub fn five_fifths_tax<M: IncomeTaxModel + ?Sized>(
    model: &M,
    annual_salary: Decimal,
    severance: Decimal,
) -> Decimal {
    let one_fifth = severance / SEVERANCE_FIFTHS;
    let tax_per_fifth = match annual_salary.checked_add(one_fifth) {
        Some(with_fifth) => model
            .income_tax(with_fifth)
            .saturating_sub(model.income_tax(annual_salary)),
        None => model
            .income_tax(annual_salary)
            .saturating_sub(model.income_tax(annual_salary.saturating_sub(one_fifth))),
    };
    tax_per_fifth.saturating_mul(SEVERANCE_FIFTHS)
}

/// Taxes a severance payment with any income-tax model.
pub fn compute_tax_with<M: IncomeTaxModel + ?Sized>(
    model: &M,
    annual_salary: Decimal,
    gross_severance: Decimal,
) -> SeveranceTax {
    let tax_amount = five_fifths_tax(model, annual_salary, gross_severance);
    let effective_rate = tax_amount
        .checked_div(gross_severance)
        .unwrap_or(Decimal::ZERO);

    SeveranceTax {
        gross_severance,
        tax_amount,
        net_severance: gross_severance.saturating_sub(tax_amount),
        effective_rate,
    }
}

/// Taxes a severance payment with the flat net-rate model.
///
/// # Example
///
/// ```
/// use exit_runway_engine::calculation::compute_tax;
/// use rust_decimal::Decimal;
///
/// let tax = compute_tax(Decimal::new(90_000, 0), Decimal::new(45_000, 0), Decimal::new(67, 2));
/// assert_eq!(tax.tax_amount, Decimal::new(14_850, 0));
/// assert_eq!(tax.net_severance, Decimal::new(30_150, 0));
/// assert_eq!(tax.effective_rate, Decimal::new(33, 2));
/// ```
pub fn compute_tax(annual_salary: Decimal, gross_severance: Decimal, net_rate: Decimal) -> SeveranceTax {
    compute_tax_with(&FlatNetRateTax::new(net_rate), annual_salary, gross_severance)
}

/// The result of taxing the severance, including the audit step.
#[derive(Debug, Clone)]
pub struct SeveranceTaxResult {
    /// Gross, tax and net severance.
    pub tax: SeveranceTax,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Taxes the severance with the flat model and records the calculation.
pub fn calculate_severance_tax(
    annual_salary: Decimal,
    gross_severance: Decimal,
    net_rate: Decimal,
    step_number: u32,
) -> SeveranceTaxResult {
    let tax = compute_tax(annual_salary, gross_severance, net_rate);

    let reasoning = if gross_severance.is_zero() {
        "No severance; nothing to tax".to_string()
    } else {
        format!(
            "€{} severance taxed as 5 × the extra tax on €{} salary plus one fifth: €{} tax, €{} net ({}% effective)",
            gross_severance.round_dp(2),
            annual_salary.round_dp(2),
            tax.tax_amount.round_dp(2),
            tax.net_severance.round_dp(2),
            tax.effective_rate
                .saturating_mul(Decimal::ONE_HUNDRED)
                .round_dp(2)
                .normalize()
        )
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "severance_tax".to_string(),
        rule_name: "Severance Tax (Five-Fifths Rule)".to_string(),
        legal_ref: Some("§34 EStG".to_string()),
        input: serde_json::json!({
            "annual_salary": annual_salary.to_string(),
            "gross_severance": gross_severance.to_string(),
            "net_rate": net_rate.to_string()
        }),
        output: serde_json::json!({
            "tax_amount": tax.tax_amount.to_string(),
            "net_severance": tax.net_severance.to_string(),
            "effective_rate": tax.effective_rate.to_string()
        }),
        reasoning,
    };

    SeveranceTaxResult { tax, audit_step }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    /// Two-bracket model used to check the five-fifths shape is kept.
    struct SteppedTax;

    impl IncomeTaxModel for SteppedTax {
        fn income_tax(&self, annual_income: Decimal) -> Decimal {
            let threshold = dec("100000");
            if annual_income <= threshold {
                annual_income * dec("0.30")
            } else {
                threshold * dec("0.30") + (annual_income - threshold) * dec("0.45")
            }
        }
    }

    /// ST-001: €45,000 severance on €90,000 salary, married
    #[test]
    fn test_married_favorable_severance() {
        let tax = compute_tax(dec("90000"), dec("45000"), dec("0.67"));

        assert_eq!(tax.gross_severance, dec("45000"));
        assert_eq!(tax.tax_amount, dec("14850"));
        assert_eq!(tax.net_severance, dec("30150"));
        assert_eq!(tax.effective_rate, dec("0.33"));
    }

    /// ST-002: single standard rate
    #[test]
    fn test_single_standard_severance() {
        let tax = compute_tax(dec("60000"), dec("30000"), dec("0.60"));

        assert_eq!(tax.tax_amount, dec("12000"));
        assert_eq!(tax.net_severance, dec("18000"));
        assert_eq!(tax.effective_rate, dec("0.40"));
    }

    /// ST-003: zero severance
    #[test]
    fn test_zero_severance() {
        let tax = compute_tax(dec("90000"), Decimal::ZERO, dec("0.67"));

        assert_eq!(tax.tax_amount, Decimal::ZERO);
        assert_eq!(tax.net_severance, Decimal::ZERO);
        assert_eq!(tax.effective_rate, Decimal::ZERO);
    }

    #[test]
    fn test_zero_salary_still_taxes_severance() {
        let tax = compute_tax(Decimal::ZERO, dec("10000"), dec("0.60"));
        assert_eq!(tax.tax_amount, dec("4000"));
        assert_eq!(tax.net_severance + tax.tax_amount, dec("10000"));
    }

    #[test]
    fn test_salary_at_decimal_max_does_not_overflow() {
        let tax = compute_tax(Decimal::MAX, dec("1000"), dec("0.67"));

        assert!(tax.tax_amount >= Decimal::ZERO);
        assert!(tax.tax_amount <= dec("1000"));
        assert_eq!(tax.net_severance + tax.tax_amount, dec("1000"));
    }

    #[test]
    fn test_severance_at_decimal_max_does_not_overflow() {
        let result = calculate_severance_tax(dec("1000"), Decimal::MAX, dec("0.67"), 2);

        assert!(result.tax.tax_amount > Decimal::ZERO);
        assert!(result.tax.net_severance > Decimal::ZERO);
        assert!(result.tax.effective_rate <= Decimal::ONE);
        assert!(result.audit_step.reasoning.contains("effective"));
    }

    #[test]
    fn test_five_fifths_with_progressive_model() {
        let extra = five_fifths_tax(&SteppedTax, dec("90000"), dec("45000"));
        // tax(99,000) − tax(90,000) = 2,700; × 5
        assert_eq!(extra, dec("13500"));

        let crossing = five_fifths_tax(&SteppedTax, dec("95000"), dec("50000"));
        // tax(105,000) = 32,250; tax(95,000) = 28,500; difference 3,750; × 5
        assert_eq!(crossing, dec("18750"));
    }

    #[test]
    fn test_compute_tax_with_custom_model() {
        let tax = compute_tax_with(&SteppedTax, dec("95000"), dec("50000"));
        assert_eq!(tax.net_severance, dec("31250"));
        assert_eq!(tax.effective_rate, dec("0.375"));
    }

    #[test]
    fn test_model_usable_as_trait_object() {
        let model: &dyn IncomeTaxModel = &FlatNetRateTax::new(dec("0.67"));
        assert_eq!(five_fifths_tax(model, dec("90000"), dec("45000")), dec("14850"));
    }

    #[test]
    fn test_flat_model_income_tax() {
        let model = FlatNetRateTax::new(dec("0.67"));
        assert_eq!(model.income_tax(dec("90000")), dec("29700"));
        assert_eq!(model.income_tax(Decimal::ZERO), Decimal::ZERO);
    }

    #[test]
    fn test_calculate_severance_tax_audit_step() {
        let result = calculate_severance_tax(dec("90000"), dec("45000"), dec("0.67"), 2);

        assert_eq!(result.tax.net_severance, dec("30150"));
        assert_eq!(result.audit_step.step_number, 2);
        assert_eq!(result.audit_step.rule_id, "severance_tax");
        assert_eq!(result.audit_step.legal_ref.as_deref(), Some("§34 EStG"));
        let tax_amount = result.audit_step.output["tax_amount"].as_str().unwrap();
        assert_eq!(dec(tax_amount), dec("14850"));
        assert!(result.audit_step.reasoning.contains("33% effective"));
    }

    #[test]
    fn test_calculate_severance_tax_audit_step_without_severance() {
        let result = calculate_severance_tax(dec("90000"), Decimal::ZERO, dec("0.67"), 2);
        assert_eq!(result.audit_step.reasoning, "No severance; nothing to tax");
    }
}
