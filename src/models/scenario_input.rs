//! Scenario input model and boundary normalization.
//!
//! This module defines the [`ScenarioInput`] record a form-collection layer
//! builds for each calculation, the [`TaxClass`] enum, and the itemised
//! [`ExpenseBreakdown`] that feeds the monthly expense figure.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::BenefitPolicy;
use crate::error::{EngineError, EngineResult};

use super::AuditWarning;

/// Number of months in a calendar year.
pub const MONTHS_PER_YEAR: u32 = 12;

/// Upper bound applied to every money field during normalization (EUR).
pub const MAX_MONEY_AMOUNT: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

/// Upper bound applied to the severance month count during normalization.
pub const MAX_SEVERANCE_MONTHS: Decimal = Decimal::from_parts(120, 0, 0, false, 0);

/// German wage-tax class, reduced to the two variants the engine models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaxClass {
    /// Steuerklasse III (married, favourable split).
    MarriedFavorable,
    /// Steuerklasse I (single).
    SingleStandard,
}

impl TaxClass {
    /// Returns the snake_case identifier used in serialized output.
    pub fn as_str(&self) -> &'static str {
        match self {
            TaxClass::MarriedFavorable => "married_favorable",
            TaxClass::SingleStandard => "single_standard",
        }
    }
}

/// Itemised monthly living expenses.
///
/// # Example
///
/// ```
/// use exit_runway_engine::models::ExpenseBreakdown;
/// use rust_decimal::Decimal;
///
/// let expenses = ExpenseBreakdown {
///     housing: Decimal::new(1200, 0),
///     utilities: Decimal::new(250, 0),
///     groceries: Decimal::new(600, 0),
///     transport: Decimal::new(300, 0),
///     childcare: Decimal::ZERO,
///     other: Decimal::new(650, 0),
/// };
/// assert_eq!(expenses.total(), Decimal::new(3000, 0));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseBreakdown {
    /// Rent or mortgage.
    #[serde(default)]
    pub housing: Decimal,
    /// Electricity, internet, broadcasting fee.
    #[serde(default)]
    pub utilities: Decimal,
    /// Food and household items.
    #[serde(default)]
    pub groceries: Decimal,
    /// Car, fuel, insurance or public transport.
    #[serde(default)]
    pub transport: Decimal,
    /// Kindergarten and other childcare fees.
    #[serde(default)]
    pub childcare: Decimal,
    /// Insurance, phone, subscriptions and everything else.
    #[serde(default)]
    pub other: Decimal,
}

impl ExpenseBreakdown {
    /// Returns the sum of all categories.
    pub fn total(&self) -> Decimal {
        [self.utilities, self.groceries, self.transport, self.childcare, self.other]
            .into_iter()
            .fold(self.housing, Decimal::saturating_add)
    }
}

/// Everything the engine needs to evaluate one exit scenario.
///
/// Constructed once per calculation and never mutated by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioInput {
    /// Annual gross salary in EUR.
    pub annual_gross_salary: Decimal,
    /// Severance expressed in months of gross salary.
    pub severance_months: Decimal,
    /// Wage-tax class.
    pub tax_class: TaxClass,
    /// Whether the employee has dependent children.
    #[serde(default)]
    pub has_children: bool,
    /// Number of dependent children.
    #[serde(default)]
    pub num_children: u32,
    /// Age in years of each child, one entry per child.
    #[serde(default)]
    pub child_ages: Vec<u32>,
    /// Monthly living expenses in EUR.
    #[serde(default)]
    pub monthly_expenses: Decimal,
    /// Months without unemployment benefit after the exit.
    #[serde(default)]
    pub sperrzeit_months: u32,
    /// Months of salary received in the exit year before leaving.
    pub months_worked_in_exit_year: u32,
    /// German postal code (PLZ), 4 or 5 digits.
    pub postal_code: String,
    /// Calendar year of the exit; the policy default applies when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exit_year: Option<i32>,
}

impl ScenarioInput {
    /// Creates an input for a childless employee with no expenses, no
    /// sperrzeit and six months worked in the exit year.
    ///
    /// # Example
    ///
    /// ```
    /// use exit_runway_engine::models::{ScenarioInput, TaxClass};
    /// use rust_decimal::Decimal;
    ///
    /// let input = ScenarioInput::new(Decimal::new(90_000, 0), Decimal::new(6, 0), TaxClass::MarriedFavorable, "89231")
    ///     .with_monthly_expenses(Decimal::new(3_000, 0))
    ///     .with_children(&[2]);
    ///
    /// assert!(input.has_children);
    /// assert_eq!(input.num_children, 1);
    /// ```
    pub fn new(
        annual_gross_salary: Decimal,
        severance_months: Decimal,
        tax_class: TaxClass,
        postal_code: impl Into<String>,
    ) -> Self {
        Self {
            annual_gross_salary,
            severance_months,
            tax_class,
            has_children: false,
            num_children: 0,
            child_ages: Vec::new(),
            monthly_expenses: Decimal::ZERO,
            sperrzeit_months: 0,
            months_worked_in_exit_year: 6,
            postal_code: postal_code.into(),
            exit_year: None,
        }
    }

    /// Sets the children's ages; an empty slice means no children.
    pub fn with_children(mut self, ages: &[u32]) -> Self {
        self.has_children = !ages.is_empty();
        self.num_children = ages.len() as u32;
        self.child_ages = ages.to_vec();
        self
    }

    /// Sets the monthly expense total.
    pub fn with_monthly_expenses(mut self, monthly_expenses: Decimal) -> Self {
        self.monthly_expenses = monthly_expenses;
        self
    }

    /// Sets the monthly expense total from an itemised breakdown.
    pub fn with_expenses(self, expenses: &ExpenseBreakdown) -> Self {
        self.with_monthly_expenses(expenses.total())
    }

    /// Sets the sperrzeit length in months.
    pub fn with_sperrzeit(mut self, months: u32) -> Self {
        self.sperrzeit_months = months;
        self
    }

    /// Sets the number of salaried months in the exit year.
    pub fn with_months_worked(mut self, months: u32) -> Self {
        self.months_worked_in_exit_year = months;
        self
    }

    /// Sets the calendar year of the exit.
    pub fn with_exit_year(mut self, year: i32) -> Self {
        self.exit_year = Some(year);
        self
    }

    /// Strictly checks every field against its documented domain.
    ///
    /// The calculation pipeline does not call this; it normalizes instead.
    /// Collaborators that prefer to reject bad input up front can use it.
    pub fn validate(&self, policy: &BenefitPolicy) -> EngineResult<()> {
        let money_fields = [
            ("annual_gross_salary", self.annual_gross_salary),
            ("monthly_expenses", self.monthly_expenses),
        ];
        for (field, value) in money_fields {
            if value < Decimal::ZERO {
                return Err(invalid(field, format!("must not be negative, got {}", value)));
            }
            if value > MAX_MONEY_AMOUNT {
                return Err(invalid(
                    field,
                    format!("must not exceed {}, got {}", MAX_MONEY_AMOUNT, value),
                ));
            }
        }

        if self.severance_months < Decimal::ZERO {
            return Err(invalid(
                "severance_months",
                format!("must not be negative, got {}", self.severance_months),
            ));
        }
        if self.severance_months > MAX_SEVERANCE_MONTHS {
            return Err(invalid(
                "severance_months",
                format!("must not exceed {}", MAX_SEVERANCE_MONTHS),
            ));
        }

        let max_sperrzeit = policy.unemployment_benefit.max_sperrzeit_months;
        if self.sperrzeit_months > max_sperrzeit {
            return Err(invalid(
                "sperrzeit_months",
                format!("must be between 0 and {}", max_sperrzeit),
            ));
        }

        if !(1..=MONTHS_PER_YEAR).contains(&self.months_worked_in_exit_year) {
            return Err(invalid(
                "months_worked_in_exit_year",
                format!("must be between 1 and {}", MONTHS_PER_YEAR),
            ));
        }

        if self.has_children && self.child_ages.len() != self.num_children as usize {
            return Err(invalid(
                "child_ages",
                format!(
                    "expected {} ages, got {}",
                    self.num_children,
                    self.child_ages.len()
                ),
            ));
        }

        let code = self.postal_code.trim();
        if !(4..=5).contains(&code.len()) || !code.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid("postal_code", "must be 4 or 5 digits"));
        }

        Ok(())
    }

    /// Returns a copy with every field clamped into its documented domain,
    /// plus one warning per adjustment made.
    ///
    /// The postal code is left untouched; an unresolvable code maps to the
    /// `Unknown` region downstream.
    pub fn normalized(&self, policy: &BenefitPolicy) -> (ScenarioInput, Vec<AuditWarning>) {
        let mut input = self.clone();
        let mut warnings = Vec::new();

        input.annual_gross_salary = clamp_money(
            "annual_gross_salary",
            self.annual_gross_salary,
            MAX_MONEY_AMOUNT,
            &mut warnings,
        );
        input.monthly_expenses = clamp_money(
            "monthly_expenses",
            self.monthly_expenses,
            MAX_MONEY_AMOUNT,
            &mut warnings,
        );
        input.severance_months = clamp_money(
            "severance_months",
            self.severance_months,
            MAX_SEVERANCE_MONTHS,
            &mut warnings,
        );

        let max_sperrzeit = policy.unemployment_benefit.max_sperrzeit_months;
        if self.sperrzeit_months > max_sperrzeit {
            input.sperrzeit_months = max_sperrzeit;
            warnings.push(clamped(
                "sperrzeit_months",
                self.sperrzeit_months,
                max_sperrzeit,
            ));
        }

        let worked = self.months_worked_in_exit_year.clamp(1, MONTHS_PER_YEAR);
        if worked != self.months_worked_in_exit_year {
            input.months_worked_in_exit_year = worked;
            warnings.push(clamped(
                "months_worked_in_exit_year",
                self.months_worked_in_exit_year,
                worked,
            ));
        }

        if !self.has_children {
            if self.num_children > 0 || !self.child_ages.is_empty() {
                warnings.push(AuditWarning {
                    code: "CHILDREN_IGNORED".to_string(),
                    message: format!(
                        "has_children is false; ignoring num_children={} and {} child ages",
                        self.num_children,
                        self.child_ages.len()
                    ),
                    severity: "low".to_string(),
                });
            }
            input.num_children = 0;
            input.child_ages.clear();
        } else if self.child_ages.len() > self.num_children as usize {
            input.child_ages.truncate(self.num_children as usize);
            warnings.push(AuditWarning {
                code: "CHILD_AGES_TRUNCATED".to_string(),
                message: format!(
                    "{} child ages given for {} children; extra ages ignored",
                    self.child_ages.len(),
                    self.num_children
                ),
                severity: "low".to_string(),
            });
        }

        (input, warnings)
    }
}

fn invalid(field: &str, message: impl Into<String>) -> EngineError {
    EngineError::InvalidInput {
        field: field.to_string(),
        message: message.into(),
    }
}

fn clamp_money(
    field: &str,
    value: Decimal,
    max: Decimal,
    warnings: &mut Vec<AuditWarning>,
) -> Decimal {
    let clamped_value = value.max(Decimal::ZERO).min(max);
    if clamped_value != value {
        warnings.push(clamped(field, value, clamped_value));
    }
    clamped_value
}

fn clamped(field: &str, from: impl std::fmt::Display, to: impl std::fmt::Display) -> AuditWarning {
    AuditWarning {
        code: "INPUT_CLAMPED".to_string(),
        message: format!("{} clamped from {} to {}", field, from, to),
        severity: "medium".to_string(),
    }
}
