//! Configuration types for exit scenario calculation.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculation::RegionTable;
use crate::models::TaxClass;

/// Metadata about the policy set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyMetadata {
    /// Jurisdiction code (e.g., "DE").
    pub code: String,
    /// The human-readable name of the policy set.
    pub name: String,
    /// The version or effective date of the rates.
    pub version: String,
}

/// Flat net-salary rates per tax class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetSalaryRates {
    /// Net rate for Steuerklasse III.
    pub married_favorable: Decimal,
    /// Net rate for Steuerklasse I.
    pub single_standard: Decimal,
}

impl NetSalaryRates {
    /// Returns the net rate for a tax class.
    pub fn for_tax_class(&self, tax_class: TaxClass) -> Decimal {
        match tax_class {
            TaxClass::MarriedFavorable => self.married_favorable,
            TaxClass::SingleStandard => self.single_standard,
        }
    }
}

/// Unemployment benefit (ALG1) parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnemploymentBenefitPolicy {
    /// Share of net salary paid when the claimant has children.
    pub rate_with_children: Decimal,
    /// Share of net salary paid otherwise.
    pub rate_without_children: Decimal,
    /// Lifetime cap on benefit months across both years.
    pub max_months: u32,
    /// Longest sperrzeit the engine accepts.
    pub max_sperrzeit_months: u32,
}

/// Child benefit (Kindergeld) parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChildBenefitPolicy {
    /// Monthly amount per child.
    pub monthly_per_child: Decimal,
}

/// Age window for regional family benefit eligibility (inclusive).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FamilyBenefitPolicy {
    /// Youngest eligible age in years.
    pub min_age: u32,
    /// Oldest eligible age in years.
    pub max_age: u32,
}

impl FamilyBenefitPolicy {
    /// Returns true if a child of this age counts toward the benefit.
    pub fn is_eligible(&self, age: u32) -> bool {
        (self.min_age..=self.max_age).contains(&age)
    }
}

/// Constants used by the severance recommendation solver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationPolicy {
    /// Net-severance rate assumed when the scenario has no severance.
    ///
    /// An approximation; it has not been validated against real tax data.
    pub default_net_severance_rate: Decimal,
    /// Fraction of one severance month within which a surplus counts as
    /// break-even.
    pub breakeven_tolerance: Decimal,
}

/// The complete benefit and tax policy, as loaded from `policy.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BenefitPolicy {
    /// Policy metadata.
    pub metadata: PolicyMetadata,
    /// Net-salary rates.
    pub net_salary_rates: NetSalaryRates,
    /// ALG1 parameters.
    pub unemployment_benefit: UnemploymentBenefitPolicy,
    /// Kindergeld parameters.
    pub child_benefit: ChildBenefitPolicy,
    /// Familiengeld eligibility.
    pub family_benefit: FamilyBenefitPolicy,
    /// Solver constants.
    pub recommendation: RecommendationPolicy,
    /// Exit year assumed when the input does not name one.
    pub default_exit_year: i32,
}

/// An inclusive range of postal codes, written as `[start, end]` in YAML.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostalRange(pub u32, pub u32);

impl PostalRange {
    /// First code in the range.
    pub fn start(&self) -> u32 {
        self.0
    }

    /// Last code in the range.
    pub fn end(&self) -> u32 {
        self.1
    }

    /// Returns true if `code` lies within the range.
    pub fn contains(&self, code: u32) -> bool {
        self.0 <= code && code <= self.1
    }
}

/// One entry of the ordered postal-code table.
///
/// A code matches when it falls in any of `ranges` and in none of `exclude`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionRule {
    /// Display name of the federal state.
    pub name: String,
    /// Code ranges belonging to the state.
    pub ranges: Vec<PostalRange>,
    /// Carve-outs tested against the same code.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclude: Vec<PostalRange>,
    /// Monthly family benefit per eligible child, if the state pays one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family_benefit: Option<Decimal>,
}

impl RegionRule {
    /// Returns true if this rule claims `code` when evaluated on its own.
    pub fn matches(&self, code: u32) -> bool {
        self.ranges.iter().any(|r| r.contains(code)) && !self.exclude.iter().any(|r| r.contains(code))
    }
}

/// `regions.yaml` file structure.
#[derive(Debug, Clone, Deserialize)]
pub struct RegionsConfig {
    /// Rules in evaluation order.
    pub regions: Vec<RegionRule>,
}

/// The complete engine configuration.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Benefit and tax policy.
    policy: BenefitPolicy,
    /// Compiled postal-code table.
    regions: RegionTable,
}

impl EngineConfig {
    /// Creates a new EngineConfig from its component parts.
    pub fn new(policy: BenefitPolicy, regions: RegionTable) -> Self {
        Self { policy, regions }
    }

    /// Returns the benefit policy.
    pub fn policy(&self) -> &BenefitPolicy {
        &self.policy
    }

    /// Returns the postal-code table.
    pub fn regions(&self) -> &RegionTable {
        &self.regions
    }
}
