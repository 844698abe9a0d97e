//! Two-year cash-flow breakdown produced by benefit allocation.
//!
//! [`ScenarioResult`] holds every money and time figure of a scenario. It is
//! fully determined by the normalized input, the resolved region and the
//! benefit policy; consumers read it and never recompute from it.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{MONTHS_PER_YEAR, RegionInfo, TaxClass};

/// Severance taxed under the five-fifths rule.
///
/// # Example
///
/// ```
/// use exit_runway_engine::models::SeveranceTax;
/// use rust_decimal::Decimal;
///
/// let tax = SeveranceTax {
///     gross_severance: Decimal::new(45_000, 0),
///     tax_amount: Decimal::new(14_850, 0),
///     net_severance: Decimal::new(30_150, 0),
///     effective_rate: Decimal::new(33, 2),
/// };
/// assert_eq!(tax.net_severance + tax.tax_amount, tax.gross_severance);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeveranceTax {
    /// Severance before tax.
    pub gross_severance: Decimal,
    /// Total tax attributed to the severance.
    pub tax_amount: Decimal,
    /// Severance after tax.
    pub net_severance: Decimal,
    /// `tax_amount / gross_severance`, zero when there is no severance.
    pub effective_rate: Decimal,
}

/// Cash flows for one calendar year of the scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearBreakdown {
    /// Calendar year these figures belong to.
    pub calendar_year: i32,
    /// Months of net salary received (zero in the following year).
    pub salary_months: u32,
    /// Net salary received.
    pub salary: Decimal,
    /// Net severance paid out (zero in the following year).
    pub net_severance: Decimal,
    /// Sperrzeit months without unemployment benefit.
    pub sperrzeit_months: u32,
    /// Months of unemployment benefit (ALG1) paid.
    pub unemployment_benefit_months: u32,
    /// Unemployment benefit paid.
    pub unemployment_benefit: Decimal,
    /// Child benefit (Kindergeld) paid.
    pub child_benefit: Decimal,
    /// Regional family benefit (Familiengeld) paid.
    pub family_benefit: Decimal,
    /// Sum of all income for the year, salary included.
    pub total: Decimal,
    /// `total` as a percentage of annual gross salary, zero without salary.
    pub income_percentage: Decimal,
}

impl YearBreakdown {
    /// Income available from the exit date on: everything except salary.
    pub fn cash_after_exit(&self) -> Decimal {
        self.net_severance
            .saturating_add(self.unemployment_benefit)
            .saturating_add(self.child_benefit)
            .saturating_add(self.family_benefit)
    }

    /// Months of the year not covered by salary.
    pub fn months_after_exit(&self) -> u32 {
        MONTHS_PER_YEAR.saturating_sub(self.salary_months)
    }
}

/// The complete two-year cash-flow breakdown of an exit scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioResult {
    /// Region the postal code resolved to.
    pub region: RegionInfo,
    /// Wage-tax class the net rates were derived from.
    pub tax_class: TaxClass,
    /// Annual gross salary / 12.
    pub monthly_gross_salary: Decimal,
    /// Flat net rate applied to gross salary.
    pub net_salary_rate: Decimal,
    /// Monthly gross salary × net rate.
    pub monthly_net_salary: Decimal,
    /// Severance expressed in months of gross salary.
    pub severance_months: Decimal,
    /// Gross, tax and net severance.
    pub severance: SeveranceTax,
    /// Share of net salary paid as unemployment benefit.
    pub unemployment_benefit_rate: Decimal,
    /// Monthly unemployment benefit.
    pub monthly_unemployment_benefit: Decimal,
    /// Monthly child benefit for all children.
    pub monthly_child_benefit: Decimal,
    /// Children whose age falls in the family-benefit window.
    pub family_benefit_eligible_children: u32,
    /// Monthly family benefit for all eligible children.
    pub monthly_family_benefit: Decimal,
    /// Monthly living expenses the runway is measured against.
    pub monthly_expenses: Decimal,
    /// Year in which the employment ends.
    pub exit_year: YearBreakdown,
    /// Calendar year after the exit.
    pub following_year: YearBreakdown,
    /// Unemployment-benefit months across both years.
    pub total_unemployment_benefit_months: u32,
    /// Sum of both yearly totals.
    pub total_two_years: Decimal,
}

impl ScenarioResult {
    /// Severance plus every benefit stream across both years.
    pub fn cash_after_exit(&self) -> Decimal {
        self.exit_year
            .cash_after_exit()
            .saturating_add(self.following_year.cash_after_exit())
    }
}
