//! Built-in German policy and postal-code table.
//!
//! These values mirror `config/germany/*.yaml` so the engine can run without
//! touching the filesystem.

use rust_decimal::Decimal;

use crate::calculation::{BREAKEVEN_TOLERANCE, DEFAULT_NET_SEVERANCE_RATE, RegionTable};

use super::types::{
    BenefitPolicy, ChildBenefitPolicy, EngineConfig, FamilyBenefitPolicy, NetSalaryRates,
    PolicyMetadata, PostalRange, RecommendationPolicy, RegionRule, UnemploymentBenefitPolicy,
};

/// Kindergeld per child per month (2026).
pub const CHILD_BENEFIT_MONTHLY: Decimal = Decimal::from_parts(250, 0, 0, false, 0);

/// Exit year assumed when an input does not specify one.
pub const DEFAULT_EXIT_YEAR: i32 = 2026;

type RuleSpec = (
    &'static str,
    &'static [(u32, u32)],
    &'static [(u32, u32)],
    Option<u32>,
);

/// Ordered postal-code rules. Earlier rules win where ranges overlap.
///
/// Overlaps are kept exactly as observed: Saarland is never reached because
/// Hessen and Rheinland-Pfalz claim 66xxx first, and the Bremen and
/// Mecklenburg-Vorpommern carve-outs exclude codes an earlier rule already
/// owns.
const GERMANY_RULES: &[RuleSpec] = &[
    (
        "Bayern (Bavaria)",
        &[(80000, 87999), (89000, 89999), (91000, 94999)],
        &[],
        Some(250),
    ),
    (
        "Sachsen (Saxony)",
        &[(1000, 1999), (2600, 2999), (4000, 4999)],
        &[],
        Some(200),
    ),
    (
        "Thüringen (Thuringia)",
        &[(96000, 99999), (7000, 7999)],
        &[],
        Some(200),
    ),
    ("Berlin", &[(10000, 14999)], &[], None),
    (
        "Brandenburg",
        &[(3000, 3999), (14400, 16999), (19300, 19357)],
        &[],
        None,
    ),
    (
        "Mecklenburg-Vorpommern",
        &[(17000, 19999)],
        &[(19300, 19357)],
        None,
    ),
    (
        "Hamburg",
        &[(20000, 21999), (22000, 22999), (27000, 27999)],
        &[],
        None,
    ),
    (
        "Schleswig-Holstein",
        &[(24000, 25999), (23000, 23999)],
        &[],
        None,
    ),
    (
        "Bremen",
        &[(28000, 28999), (26000, 27999)],
        &[(27000, 27999)],
        None,
    ),
    (
        "Niedersachsen (Lower Saxony)",
        &[(26000, 27999), (29000, 31999), (37000, 38999), (48000, 49999)],
        &[],
        None,
    ),
    (
        "Nordrhein-Westfalen (NRW)",
        &[
            (32000, 33999),
            (34000, 36999),
            (40000, 47999),
            (50000, 53999),
            (57000, 59999),
        ],
        &[],
        None,
    ),
    (
        "Hessen (Hesse)",
        &[(34000, 36999), (60000, 64999), (65000, 66999)],
        &[],
        None,
    ),
    (
        "Rheinland-Pfalz (Rhineland-Palatinate)",
        &[(54000, 56999), (66000, 67999)],
        &[],
        None,
    ),
    ("Saarland", &[(66000, 66999)], &[], None),
    (
        "Baden-Württemberg",
        &[(68000, 69999), (70000, 76999), (77000, 79999), (88000, 88999)],
        &[],
        None,
    ),
    (
        "Sachsen-Anhalt (Saxony-Anhalt)",
        &[(6000, 6999), (38000, 39999)],
        &[],
        None,
    ),
];

fn ranges(spec: &[(u32, u32)]) -> Vec<PostalRange> {
    spec.iter().map(|&(start, end)| PostalRange(start, end)).collect()
}

/// Returns the built-in German region rules in evaluation order.
pub fn germany_region_rules() -> Vec<RegionRule> {
    GERMANY_RULES
        .iter()
        .map(|&(name, include, exclude, benefit)| RegionRule {
            name: name.to_string(),
            ranges: ranges(include),
            exclude: ranges(exclude),
            family_benefit: benefit.map(Decimal::from),
        })
        .collect()
}

impl BenefitPolicy {
    /// Returns the built-in German policy (2026 rates).
    pub fn germany() -> Self {
        Self {
            metadata: PolicyMetadata {
                code: "DE".to_string(),
                name: "Germany employment exit".to_string(),
                version: "2026-01-01".to_string(),
            },
            net_salary_rates: NetSalaryRates {
                married_favorable: Decimal::new(67, 2),
                single_standard: Decimal::new(60, 2),
            },
            unemployment_benefit: UnemploymentBenefitPolicy {
                rate_with_children: Decimal::new(67, 2),
                rate_without_children: Decimal::new(60, 2),
                max_months: 12,
                max_sperrzeit_months: 6,
            },
            child_benefit: ChildBenefitPolicy {
                monthly_per_child: CHILD_BENEFIT_MONTHLY,
            },
            family_benefit: FamilyBenefitPolicy {
                min_age: 1,
                max_age: 3,
            },
            recommendation: RecommendationPolicy {
                default_net_severance_rate: DEFAULT_NET_SEVERANCE_RATE,
                breakeven_tolerance: BREAKEVEN_TOLERANCE,
            },
            default_exit_year: DEFAULT_EXIT_YEAR,
        }
    }
}

impl EngineConfig {
    /// Returns the built-in German configuration.
    pub fn germany() -> Self {
        let regions = RegionTable::compile(germany_region_rules());
        Self::new(BenefitPolicy::germany(), regions)
    }
}
