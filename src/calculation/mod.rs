//! Calculation logic for the Exit Runway Engine.
//!
//! This module contains the calculation steps of an exit scenario: postal-code
//! region lookup, five-fifths severance taxation, two-year benefit allocation,
//! runway analysis and the severance recommendation solver, plus the
//! [`calculate_scenario`] pipeline that runs them in order.

mod benefit_allocation;
mod recommendation;
mod region_resolver;
mod runway;
mod scenario;
mod severance_tax;

pub use benefit_allocation::{
    BenefitAllocationResult, BenefitMonths, allocate, allocate_benefits,
    eligible_family_benefit_children, split_benefit_months,
};
pub use recommendation::{
    BREAKEVEN_TOLERANCE, DEFAULT_NET_SEVERANCE_RATE, RecommendationResult, classify, recommend,
    recommend_severance,
};
pub use region_resolver::{
    MAX_POSTAL_CODE, RegionLookupResult, RegionTable, ShadowedRange, parse_postal_code,
    resolve_region,
};
pub use runway::{RunwayResult, analyze, analyze_runway};
pub use scenario::calculate_scenario;
pub use severance_tax::{
    FlatNetRateTax, IncomeTaxModel, SEVERANCE_FIFTHS, SeveranceTaxResult, calculate_severance_tax,
    compute_tax, compute_tax_with, five_fifths_tax,
};
