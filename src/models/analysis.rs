//! Runway and severance-recommendation output models.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A money figure split across the exit year and the following year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearSplit {
    /// Amount for the exit year.
    pub exit_year: Decimal,
    /// Amount for the following year.
    pub following_year: Decimal,
}

impl YearSplit {
    /// Sum of both years.
    pub fn total(&self) -> Decimal {
        self.exit_year.saturating_add(self.following_year)
    }
}

/// How long post-exit cash lasts and where each year ends up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunwayAnalysis {
    /// Severance plus every benefit stream; salary excluded.
    pub cash_after_exit: Decimal,
    /// `cash_after_exit` per year.
    pub cash_after_exit_by_year: YearSplit,
    /// `cash_after_exit / monthly_expenses`, zero when expenses are zero.
    pub runway_months: Decimal,
    /// Months of expenses counted per year (exit year: after the exit date).
    pub expense_months_exit_year: u32,
    /// Months of expenses counted in the following year.
    pub expense_months_following_year: u32,
    /// Projected expenses per year.
    pub expenses_by_year: YearSplit,
    /// Expenses across both years.
    pub total_expenses: Decimal,
    /// Cash after exit minus expenses, per year; may be negative.
    pub surplus_by_year: YearSplit,
    /// Cash after exit minus expenses over both years; may be negative.
    pub total_surplus: Decimal,
}

/// Classification of a projected surplus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionOutcome {
    /// Expenses exceed post-exit cash.
    Deficit,
    /// Within a tenth of one severance month of zero.
    BreakEven,
    /// Post-exit cash exceeds expenses.
    Surplus,
}

/// Where the net-severance rate used by the solver came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NetRateSource {
    /// Net severance divided by gross severance of the scenario.
    Realized,
    /// The configured fallback, used when the scenario has no severance.
    Default,
}

/// One candidate severance size and what it would lead to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeveranceOption {
    /// Severance in whole months of gross salary.
    pub months: u32,
    /// Gross severance for `months`.
    pub gross_severance: Decimal,
    /// Net severance for `months` at the solver's net rate.
    pub net_severance: Decimal,
    /// Two-year surplus with this severance; negative is a deficit.
    pub projected_surplus: Decimal,
    /// Classification of `projected_surplus`.
    pub outcome: OptionOutcome,
}

/// Severance sizes that lead to a deficit, break-even and a surplus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    /// Net severance per gross severance EUR used for every option.
    pub net_severance_rate: Decimal,
    /// Whether `net_severance_rate` was realized or defaulted.
    pub net_rate_source: NetRateSource,
    /// Net value of one more month of severance.
    pub net_per_severance_month: Decimal,
    /// Two-year surplus with the current severance; negative is a deficit.
    pub current_surplus: Decimal,
    /// Additional severance months needed to break even, zero in surplus.
    pub additional_months_needed: Decimal,
    /// Fractional severance months at which income equals expenses;
    /// `None` when one severance month is worth nothing.
    pub breakeven_exact: Option<Decimal>,
    /// One month below break-even.
    pub deficit_option: SeveranceOption,
    /// Break-even rounded up.
    pub breakeven_option: SeveranceOption,
    /// Two months above break-even.
    pub surplus_option: SeveranceOption,
}

impl Recommendation {
    /// The three options in deficit, break-even, surplus order.
    pub fn options(&self) -> [&SeveranceOption; 3] {
        [
            &self.deficit_option,
            &self.breakeven_option,
            &self.surplus_option,
        ]
    }
}
