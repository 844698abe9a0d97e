//! Two-year benefit allocation.
//!
//! This module turns a normalized [`ScenarioInput`] and its resolved region
//! into the complete [`ScenarioResult`]: salary and severance in the exit
//! year, unemployment benefit (ALG1) split across both years under the
//! lifetime cap, and child and family benefits for every month of both years.

use rust_decimal::Decimal;

use crate::config::BenefitPolicy;
use crate::models::{
    AuditStep, MONTHS_PER_YEAR, RegionInfo, ScenarioInput, ScenarioResult, YearBreakdown,
};

use super::severance_tax::calculate_severance_tax;

/// How many months of ALG1 fall into each year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BenefitMonths {
    /// Months after the exit date spent in sperrzeit, within the exit year.
    pub sperrzeit_exit_year: u32,
    /// ALG1 months paid in the exit year.
    pub exit_year: u32,
    /// ALG1 months paid in the following year.
    pub following_year: u32,
}

impl BenefitMonths {
    /// ALG1 months across both years.
    pub fn total(&self) -> u32 {
        self.exit_year + self.following_year
    }
}

/// Splits the ALG1 entitlement across the exit year and the following year.
///
/// The exit year pays for whatever is left after the salaried months and the
/// sperrzeit. The following year pays the rest of the `max_months` cap, at
/// most one full year. Sperrzeit that would extend past the exit year does
/// not reduce the following year.
pub fn split_benefit_months(months_worked: u32, sperrzeit_months: u32, max_months: u32) -> BenefitMonths {
    let months_after_exit = MONTHS_PER_YEAR.saturating_sub(months_worked);
    let exit_year = months_after_exit
        .saturating_sub(sperrzeit_months)
        .min(max_months);
    let following_year = max_months.saturating_sub(exit_year).min(MONTHS_PER_YEAR);

    BenefitMonths {
        sperrzeit_exit_year: sperrzeit_months.min(months_after_exit),
        exit_year,
        following_year,
    }
}

/// Counts the children whose age falls in the family-benefit window.
///
/// Zero unless the person has children and the region pays the benefit.
pub fn eligible_family_benefit_children(
    input: &ScenarioInput,
    region: &RegionInfo,
    policy: &BenefitPolicy,
) -> u32 {
    if !input.has_children || !region.has_family_benefit {
        return 0;
    }
    input
        .child_ages
        .iter()
        .filter(|&&age| policy.family_benefit.is_eligible(age))
        .count() as u32
}

/// The result of benefit allocation, including the audit steps.
#[derive(Debug, Clone)]
pub struct BenefitAllocationResult {
    /// The two-year breakdown.
    pub result: ScenarioResult,
    /// One audit step per allocation rule, in application order.
    pub audit_steps: Vec<AuditStep>,
}

/// Computes the two-year cash-flow breakdown.
///
/// Expects input already passed through [`ScenarioInput::normalized`]. Month
/// arithmetic saturates at zero either way, and money that would leave the
/// `Decimal` range saturates at its bounds.
///
/// # Example
///
/// ```
/// use exit_runway_engine::calculation::allocate;
/// use exit_runway_engine::config::EngineConfig;
/// use exit_runway_engine::models::{ScenarioInput, TaxClass};
/// use rust_decimal::Decimal;
///
/// let config = EngineConfig::germany();
/// let input = ScenarioInput::new(Decimal::new(90_000, 0), Decimal::new(6, 0), TaxClass::MarriedFavorable, "89231");
/// let region = config.regions().resolve(&input.postal_code);
///
/// let result = allocate(&input, &region, config.policy());
/// assert_eq!(result.monthly_gross_salary, Decimal::new(7_500, 0));
/// assert_eq!(result.exit_year.unemployment_benefit_months, 6);
/// assert_eq!(result.following_year.unemployment_benefit_months, 6);
/// ```
pub fn allocate(input: &ScenarioInput, region: &RegionInfo, policy: &BenefitPolicy) -> ScenarioResult {
    allocate_benefits(input, region, policy, 1).result
}

/// Computes the two-year breakdown and records each rule applied.
pub fn allocate_benefits(
    input: &ScenarioInput,
    region: &RegionInfo,
    policy: &BenefitPolicy,
    step_number: u32,
) -> BenefitAllocationResult {
    let mut audit_steps = Vec::with_capacity(5);
    let mut step = step_number;
    let months_per_year = Decimal::from(MONTHS_PER_YEAR);
    let annual_salary = input.annual_gross_salary;

    // Salary
    let net_salary_rate = policy.net_salary_rates.for_tax_class(input.tax_class);
    let monthly_gross_salary = annual_salary / months_per_year;
    let monthly_net_salary = monthly_gross_salary.saturating_mul(net_salary_rate);
    let months_worked = input.months_worked_in_exit_year.min(MONTHS_PER_YEAR);
    let salary = monthly_net_salary.saturating_mul(Decimal::from(months_worked));

    audit_steps.push(AuditStep {
        step_number: step,
        rule_id: "net_salary".to_string(),
        rule_name: "Net Salary".to_string(),
        legal_ref: None,
        input: serde_json::json!({
            "annual_gross_salary": annual_salary.to_string(),
            "tax_class": input.tax_class.as_str(),
            "months_worked_in_exit_year": months_worked
        }),
        output: serde_json::json!({
            "monthly_gross_salary": monthly_gross_salary.to_string(),
            "net_salary_rate": net_salary_rate.to_string(),
            "monthly_net_salary": monthly_net_salary.to_string(),
            "salary": salary.to_string()
        }),
        reasoning: format!(
            "€{}/month gross at {} net rate is €{}/month net; {} months worked pay €{}",
            monthly_gross_salary.round_dp(2),
            net_salary_rate,
            monthly_net_salary.round_dp(2),
            months_worked,
            salary.round_dp(2)
        ),
    });
    step += 1;

    // Severance
    let gross_severance = monthly_gross_salary.saturating_mul(input.severance_months);
    let severance = calculate_severance_tax(annual_salary, gross_severance, net_salary_rate, step);
    audit_steps.push(severance.audit_step);
    let severance = severance.tax;
    step += 1;

    // Unemployment benefit
    let unemployment_benefit_rate = if input.has_children {
        policy.unemployment_benefit.rate_with_children
    } else {
        policy.unemployment_benefit.rate_without_children
    };
    let monthly_unemployment_benefit = monthly_net_salary.saturating_mul(unemployment_benefit_rate);
    let months = split_benefit_months(
        months_worked,
        input.sperrzeit_months,
        policy.unemployment_benefit.max_months,
    );

    audit_steps.push(AuditStep {
        step_number: step,
        rule_id: "unemployment_benefit".to_string(),
        rule_name: "Unemployment Benefit (ALG1)".to_string(),
        legal_ref: Some("§§147, 149, 159 SGB III".to_string()),
        input: serde_json::json!({
            "monthly_net_salary": monthly_net_salary.to_string(),
            "has_children": input.has_children,
            "months_worked_in_exit_year": months_worked,
            "sperrzeit_months": input.sperrzeit_months,
            "max_months": policy.unemployment_benefit.max_months
        }),
        output: serde_json::json!({
            "rate": unemployment_benefit_rate.to_string(),
            "monthly_benefit": monthly_unemployment_benefit.to_string(),
            "exit_year_months": months.exit_year,
            "following_year_months": months.following_year
        }),
        reasoning: format!(
            "{} of net salary ({}) is €{}/month; {} months after exit less {} sperrzeit leaves {} months this year, {} next year (cap {})",
            unemployment_benefit_rate,
            if input.has_children { "with children" } else { "without children" },
            monthly_unemployment_benefit.round_dp(2),
            MONTHS_PER_YEAR.saturating_sub(months_worked),
            months.sperrzeit_exit_year,
            months.exit_year,
            months.following_year,
            policy.unemployment_benefit.max_months
        ),
    });
    step += 1;

    // Child benefit
    let monthly_child_benefit = if input.has_children {
        policy
            .child_benefit
            .monthly_per_child
            .saturating_mul(Decimal::from(input.num_children))
    } else {
        Decimal::ZERO
    };

    audit_steps.push(AuditStep {
        step_number: step,
        rule_id: "child_benefit".to_string(),
        rule_name: "Child Benefit (Kindergeld)".to_string(),
        legal_ref: Some("§66 EStG".to_string()),
        input: serde_json::json!({
            "has_children": input.has_children,
            "num_children": input.num_children,
            "monthly_per_child": policy.child_benefit.monthly_per_child.to_string()
        }),
        output: serde_json::json!({
            "monthly_child_benefit": monthly_child_benefit.to_string()
        }),
        reasoning: if input.has_children {
            format!(
                "€{} × {} children = €{}/month for both years",
                policy.child_benefit.monthly_per_child,
                input.num_children,
                monthly_child_benefit
            )
        } else {
            "No children; no child benefit".to_string()
        },
    });
    step += 1;

    // Family benefit
    let eligible_children = eligible_family_benefit_children(input, region, policy);
    let monthly_family_benefit = region
        .family_benefit_amount
        .saturating_mul(Decimal::from(eligible_children));

    audit_steps.push(AuditStep {
        step_number: step,
        rule_id: "family_benefit".to_string(),
        rule_name: "Regional Family Benefit (Familiengeld)".to_string(),
        legal_ref: Some("Familiengeld (Landesrecht)".to_string()),
        input: serde_json::json!({
            "region": region.region_name,
            "has_family_benefit": region.has_family_benefit,
            "amount_per_child": region.family_benefit_amount.to_string(),
            "child_ages": input.child_ages,
            "min_age": policy.family_benefit.min_age,
            "max_age": policy.family_benefit.max_age
        }),
        output: serde_json::json!({
            "eligible_children": eligible_children,
            "monthly_family_benefit": monthly_family_benefit.to_string()
        }),
        reasoning: if !region.has_family_benefit {
            format!("{} pays no family benefit", region.region_name)
        } else if !input.has_children {
            format!("{} pays a family benefit but there are no children", region.region_name)
        } else {
            format!(
                "{} pays €{} per child aged {}-{}; {} of {} children eligible: €{}/month",
                region.region_name,
                region.family_benefit_amount,
                policy.family_benefit.min_age,
                policy.family_benefit.max_age,
                eligible_children,
                input.child_ages.len(),
                monthly_family_benefit
            )
        },
    });

    // Years
    let calendar_year = input.exit_year.unwrap_or(policy.default_exit_year);
    let annual_child_benefit = monthly_child_benefit.saturating_mul(months_per_year);
    let annual_family_benefit = monthly_family_benefit.saturating_mul(months_per_year);

    let exit_year = year_breakdown(
        calendar_year,
        months_worked,
        salary,
        severance.net_severance,
        months.sperrzeit_exit_year,
        months.exit_year,
        monthly_unemployment_benefit,
        annual_child_benefit,
        annual_family_benefit,
        annual_salary,
    );
    let following_year = year_breakdown(
        calendar_year.saturating_add(1),
        0,
        Decimal::ZERO,
        Decimal::ZERO,
        0,
        months.following_year,
        monthly_unemployment_benefit,
        annual_child_benefit,
        annual_family_benefit,
        annual_salary,
    );

    let total_two_years = exit_year.total.saturating_add(following_year.total);

    let result = ScenarioResult {
        region: region.clone(),
        tax_class: input.tax_class,
        monthly_gross_salary,
        net_salary_rate,
        monthly_net_salary,
        severance_months: input.severance_months,
        severance,
        unemployment_benefit_rate,
        monthly_unemployment_benefit,
        monthly_child_benefit,
        family_benefit_eligible_children: eligible_children,
        monthly_family_benefit,
        monthly_expenses: input.monthly_expenses,
        exit_year,
        following_year,
        total_unemployment_benefit_months: months.total(),
        total_two_years,
    };

    BenefitAllocationResult { result, audit_steps }
}

#[allow(clippy::too_many_arguments)]
fn year_breakdown(
    calendar_year: i32,
    salary_months: u32,
    salary: Decimal,
    net_severance: Decimal,
    sperrzeit_months: u32,
    benefit_months: u32,
    monthly_unemployment_benefit: Decimal,
    child_benefit: Decimal,
    family_benefit: Decimal,
    annual_gross_salary: Decimal,
) -> YearBreakdown {
    let unemployment_benefit = monthly_unemployment_benefit.saturating_mul(Decimal::from(benefit_months));
    let total = [net_severance, unemployment_benefit, child_benefit, family_benefit]
        .into_iter()
        .fold(salary, Decimal::saturating_add);
    let income_percentage = total
        .checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|scaled| scaled.checked_div(annual_gross_salary))
        .or_else(|| {
            total
                .checked_div(annual_gross_salary)
                .and_then(|share| share.checked_mul(Decimal::ONE_HUNDRED))
        })
        .unwrap_or(Decimal::ZERO);

    YearBreakdown {
        calendar_year,
        salary_months,
        salary,
        net_severance,
        sperrzeit_months,
        unemployment_benefit_months: benefit_months,
        unemployment_benefit,
        child_benefit,
        family_benefit,
        total,
        income_percentage,
    }
}
