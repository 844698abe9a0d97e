//! Postal-code to region resolution.
//!
//! The region table is an ordered list of range rules where the first match
//! wins. Ranges overlap, so evaluation order is part of the table's meaning.
//! [`RegionTable`] compiles the ordered rules once into a sorted, disjoint
//! partition and answers lookups by binary search over it.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::RegionRule;
use crate::error::{EngineError, EngineResult};
use crate::models::{AuditStep, RegionInfo};

/// Highest valid postal code.
pub const MAX_POSTAL_CODE: u32 = 99_999;

/// A maximal run of codes owned by one rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Segment {
    start: u32,
    end: u32,
    rule: usize,
}

/// Codes a rule lists but never receives because an earlier rule claims them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShadowedRange {
    /// The rule that lists the codes.
    pub region: String,
    /// The earlier rule that wins them.
    pub claimed_by: String,
    /// First shadowed code.
    pub start: u32,
    /// Last shadowed code.
    pub end: u32,
}

/// Ordered postal-code rules compiled into a disjoint lookup partition.
#[derive(Debug, Clone)]
pub struct RegionTable {
    rules: Vec<RegionRule>,
    partition: Vec<Segment>,
}

impl RegionTable {
    /// Validates the rules and compiles them into a lookup table.
    ///
    /// Fails if a rule has no name, no ranges, an inverted range, a range
    /// beyond 99999, or a negative family benefit.
    pub fn new(rules: Vec<RegionRule>) -> EngineResult<Self> {
        for rule in &rules {
            validate_rule(rule)?;
        }
        Ok(Self::compile(rules))
    }

    /// Compiles rules already known to be valid.
    pub(crate) fn compile(rules: Vec<RegionRule>) -> Self {
        let mut table = Self {
            rules,
            partition: Vec::new(),
        };

        for (start, end) in table.elementary_intervals() {
            let Some(rule) = table.first_match_index(start) else {
                continue;
            };
            let extends_last = table
                .partition
                .last()
                .is_some_and(|last| last.rule == rule && last.end + 1 == start);
            if extends_last {
                if let Some(last) = table.partition.last_mut() {
                    last.end = end;
                }
            } else {
                table.partition.push(Segment { start, end, rule });
            }
        }

        table
    }

    /// Returns the rules in evaluation order.
    pub fn rules(&self) -> &[RegionRule] {
        &self.rules
    }

    /// Evaluates the rules literally, in order, returning the first match.
    pub fn first_match(&self, code: u32) -> Option<&RegionRule> {
        self.first_match_index(code).map(|i| &self.rules[i])
    }

    /// Looks a code up in the compiled partition.
    ///
    /// Always agrees with [`RegionTable::first_match`].
    pub fn lookup(&self, code: u32) -> Option<&RegionRule> {
        let idx = self.partition.partition_point(|s| s.end < code);
        self.partition
            .get(idx)
            .filter(|s| s.start <= code)
            .map(|s| &self.rules[s.rule])
    }

    /// Resolves a postal code string to its region.
    ///
    /// Malformed codes and codes no rule claims resolve to
    /// [`RegionInfo::unknown`]. Never fails.
    ///
    /// # Example
    ///
    /// ```
    /// use exit_runway_engine::config::EngineConfig;
    /// use rust_decimal::Decimal;
    ///
    /// let config = EngineConfig::germany();
    /// let region = config.regions().resolve("89231");
    /// assert_eq!(region.region_name, "Bayern (Bavaria)");
    /// assert_eq!(region.family_benefit_amount, Decimal::new(250, 0));
    ///
    /// assert!(config.regions().resolve("abc").is_unknown());
    /// ```
    pub fn resolve(&self, postal_code: &str) -> RegionInfo {
        parse_postal_code(postal_code)
            .and_then(|code| self.lookup(code))
            .map(region_info)
            .unwrap_or_else(RegionInfo::unknown)
    }

    /// Names of rules that own no code at all.
    pub fn unreachable_rules(&self) -> Vec<&str> {
        (0..self.rules.len())
            .filter(|i| !self.partition.iter().any(|s| s.rule == *i))
            .map(|i| self.rules[i].name.as_str())
            .collect()
    }

    /// Every code range a rule lists but loses to an earlier rule.
    pub fn shadowed_ranges(&self) -> Vec<ShadowedRange> {
        let mut runs: Vec<(usize, usize, u32, u32)> = Vec::new();

        for (start, end) in self.elementary_intervals() {
            let Some(winner) = self.first_match_index(start) else {
                continue;
            };
            for loser in (winner + 1)..self.rules.len() {
                if !self.rules[loser].matches(start) {
                    continue;
                }
                let open_run = runs
                    .iter()
                    .rposition(|&(l, w, _, last)| l == loser && w == winner && last + 1 == start);
                match open_run {
                    Some(i) => runs[i].3 = end,
                    None => runs.push((loser, winner, start, end)),
                }
            }
        }

        runs.sort_by_key(|&(loser, _, start, _)| (loser, start));
        runs.into_iter()
            .map(|(loser, winner, start, end)| ShadowedRange {
                region: self.rules[loser].name.clone(),
                claimed_by: self.rules[winner].name.clone(),
                start,
                end,
            })
            .collect()
    }

    fn first_match_index(&self, code: u32) -> Option<usize> {
        self.rules.iter().position(|rule| rule.matches(code))
    }

    /// Splits 0..=99999 at every range boundary. Within each interval every
    /// rule either matches all codes or none.
    fn elementary_intervals(&self) -> Vec<(u32, u32)> {
        let mut cuts = vec![0, MAX_POSTAL_CODE + 1];
        for rule in &self.rules {
            for range in rule.ranges.iter().chain(&rule.exclude) {
                cuts.push(range.start());
                cuts.push(range.end() + 1);
            }
        }
        cuts.retain(|&c| c <= MAX_POSTAL_CODE + 1);
        cuts.sort_unstable();
        cuts.dedup();

        cuts.windows(2).map(|w| (w[0], w[1] - 1)).collect()
    }
}

fn validate_rule(rule: &RegionRule) -> EngineResult<()> {
    let invalid = |message: String| EngineError::InvalidRegionTable {
        region: rule.name.clone(),
        message,
    };

    if rule.name.trim().is_empty() {
        return Err(invalid("region name must not be empty".to_string()));
    }
    if rule.ranges.is_empty() {
        return Err(invalid("at least one range is required".to_string()));
    }
    for range in rule.ranges.iter().chain(&rule.exclude) {
        if range.start() > range.end() {
            return Err(invalid(format!(
                "range start {} is greater than end {}",
                range.start(),
                range.end()
            )));
        }
        if range.end() > MAX_POSTAL_CODE {
            return Err(invalid(format!(
                "range end {} exceeds {}",
                range.end(),
                MAX_POSTAL_CODE
            )));
        }
    }
    if rule.family_benefit.is_some_and(|amount| amount < Decimal::ZERO) {
        return Err(invalid("family benefit must not be negative".to_string()));
    }
    Ok(())
}

fn region_info(rule: &RegionRule) -> RegionInfo {
    let amount = rule.family_benefit.unwrap_or(Decimal::ZERO);
    RegionInfo {
        region_name: rule.name.clone(),
        has_family_benefit: amount > Decimal::ZERO,
        family_benefit_amount: amount,
    }
}

/// Parses a 4- or 5-digit postal code, ignoring surrounding whitespace.
///
/// Four-digit codes are the eastern codes written without their leading zero
/// ("1067" is 01067).
pub fn parse_postal_code(postal_code: &str) -> Option<u32> {
    let code = postal_code.trim();
    if !(4..=5).contains(&code.len()) || !code.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    code.parse().ok()
}

/// The result of resolving the scenario's postal code, with its audit step.
#[derive(Debug, Clone)]
pub struct RegionLookupResult {
    /// The resolved region.
    pub region: RegionInfo,
    /// The audit step recording this lookup.
    pub audit_step: AuditStep,
}

/// Resolves a postal code and records the decision.
pub fn resolve_region(postal_code: &str, table: &RegionTable, step_number: u32) -> RegionLookupResult {
    let parsed = parse_postal_code(postal_code);
    let region = table.resolve(postal_code);

    let reasoning = match parsed {
        None => format!(
            "Postal code '{}' is not 4-5 digits; using Unknown region",
            postal_code
        ),
        Some(code) if region.is_unknown() => {
            format!("No region rule covers {:05}; using Unknown region", code)
        }
        Some(code) if region.has_family_benefit => format!(
            "{:05} resolves to {} (family benefit €{} per eligible child)",
            code,
            region.region_name,
            region.family_benefit_amount.normalize()
        ),
        Some(code) => format!(
            "{:05} resolves to {} (no family benefit)",
            code, region.region_name
        ),
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "region_lookup".to_string(),
        rule_name: "Region Lookup".to_string(),
        legal_ref: Some("Landesfamiliengeld".to_string()),
        input: serde_json::json!({
            "postal_code": postal_code,
            "parsed": parsed
        }),
        output: serde_json::json!({
            "region_name": region.region_name,
            "has_family_benefit": region.has_family_benefit,
            "family_benefit_amount": region.family_benefit_amount.normalize().to_string()
        }),
        reasoning,
    };

    RegionLookupResult { region, audit_step }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{PostalRange, germany_region_rules};

    fn germany() -> RegionTable {
        RegionTable::new(germany_region_rules()).unwrap()
    }

    fn rule(name: &str, ranges: &[(u32, u32)], exclude: &[(u32, u32)]) -> RegionRule {
        RegionRule {
            name: name.to_string(),
            ranges: ranges.iter().map(|&(a, b)| PostalRange(a, b)).collect(),
            exclude: exclude.iter().map(|&(a, b)| PostalRange(a, b)).collect(),
            family_benefit: None,
        }
    }

    /// RR-001: documented postal codes map to their expected region
    #[test]
    fn test_documented_postal_codes() {
        let table = germany();
        let cases = [
            ("89231", "Bayern (Bavaria)"),
            ("80331", "Bayern (Bavaria)"),
            ("94032", "Bayern (Bavaria)"),
            ("01067", "Sachsen (Saxony)"),
            ("1067", "Sachsen (Saxony)"),
            ("04109", "Sachsen (Saxony)"),
            ("02826", "Sachsen (Saxony)"),
            ("99084", "Thüringen (Thuringia)"),
            ("07743", "Thüringen (Thuringia)"),
            ("10115", "Berlin"),
            ("14467", "Berlin"),
            ("03046", "Brandenburg"),
            ("15230", "Brandenburg"),
            ("19348", "Brandenburg"),
            ("18055", "Mecklenburg-Vorpommern"),
            ("19053", "Mecklenburg-Vorpommern"),
            ("20095", "Hamburg"),
            ("27568", "Hamburg"),
            ("24103", "Schleswig-Holstein"),
            ("23552", "Schleswig-Holstein"),
            ("28195", "Bremen"),
            ("26122", "Bremen"),
            ("30159", "Niedersachsen (Lower Saxony)"),
            ("38100", "Niedersachsen (Lower Saxony)"),
            ("49074", "Niedersachsen (Lower Saxony)"),
            ("40213", "Nordrhein-Westfalen (NRW)"),
            ("34117", "Nordrhein-Westfalen (NRW)"),
            ("50667", "Nordrhein-Westfalen (NRW)"),
            ("60311", "Hessen (Hesse)"),
            ("66111", "Hessen (Hesse)"),
            ("55116", "Rheinland-Pfalz (Rhineland-Palatinate)"),
            ("67059", "Rheinland-Pfalz (Rhineland-Palatinate)"),
            ("70173", "Baden-Württemberg"),
            ("88045", "Baden-Württemberg"),
            ("06108", "Sachsen-Anhalt (Saxony-Anhalt)"),
            ("39104", "Sachsen-Anhalt (Saxony-Anhalt)"),
        ];

        for (code, expected) in cases {
            assert_eq!(table.resolve(code).region_name, expected, "postal code {}", code);
        }
    }

    /// RR-002: uncovered codes resolve to Unknown
    #[test]
    fn test_uncovered_codes_are_unknown() {
        let table = germany();
        for code in ["00999", "05000", "08056", "09111", "90402", "95444"] {
            let region = table.resolve(code);
            assert!(region.is_unknown(), "postal code {} resolved to {}", code, region.region_name);
            assert!(!region.has_family_benefit);
            assert_eq!(region.family_benefit_amount, Decimal::ZERO);
        }
    }

    /// RR-003: malformed input never fails
    #[test]
    fn test_malformed_codes_are_unknown() {
        let table = germany();
        for code in ["", "123", "123456", "8923a", "-8923", "89 231", "٨٩٢٣١"] {
            assert!(table.resolve(code).is_unknown(), "accepted {:?}", code);
        }
    }

    #[test]
    fn test_whitespace_is_trimmed() {
        assert_eq!(germany().resolve(" 10115 ").region_name, "Berlin");
    }

    /// RR-004: family benefit regions
    #[test]
    fn test_family_benefit_amounts() {
        let table = germany();

        let bayern = table.resolve("89231");
        assert!(bayern.has_family_benefit);
        assert_eq!(bayern.family_benefit_amount, Decimal::new(250, 0));

        let sachsen = table.resolve("01067");
        assert_eq!(sachsen.family_benefit_amount, Decimal::new(200, 0));

        let thueringen = table.resolve("99084");
        assert_eq!(thueringen.family_benefit_amount, Decimal::new(200, 0));

        let berlin = table.resolve("10115");
        assert!(!berlin.has_family_benefit);
        assert_eq!(berlin.family_benefit_amount, Decimal::ZERO);
    }

    /// RR-005: the partition agrees with literal first-match evaluation everywhere
    #[test]
    fn test_partition_matches_first_match_for_every_code() {
        let table = germany();
        for code in 0..=MAX_POSTAL_CODE {
            assert_eq!(
                table.lookup(code).map(|r| r.name.as_str()),
                table.first_match(code).map(|r| r.name.as_str()),
                "code {:05}",
                code
            );
        }
    }

    /// RR-006: Saarland is listed but never reached
    #[test]
    fn test_saarland_is_unreachable() {
        assert_eq!(germany().unreachable_rules(), vec!["Saarland"]);
    }

    #[test]
    fn test_shadowed_ranges_report_overlaps() {
        let shadowed = germany().shadowed_ranges();

        let find = |region: &str, claimed_by: &str| {
            shadowed
                .iter()
                .find(|s| s.region == region && s.claimed_by == claimed_by)
                .map(|s| (s.start, s.end))
        };

        assert_eq!(find("Brandenburg", "Berlin"), Some((14400, 14999)));
        assert_eq!(find("Niedersachsen (Lower Saxony)", "Bremen"), Some((26000, 26999)));
        assert_eq!(find("Niedersachsen (Lower Saxony)", "Hamburg"), Some((27000, 27999)));
        assert_eq!(find("Hessen (Hesse)", "Nordrhein-Westfalen (NRW)"), Some((34000, 36999)));
        assert_eq!(find("Saarland", "Hessen (Hesse)"), Some((66000, 66999)));
        assert_eq!(find("Rheinland-Pfalz (Rhineland-Palatinate)", "Hessen (Hesse)"), Some((66000, 66999)));
        assert_eq!(find("Sachsen-Anhalt (Saxony-Anhalt)", "Niedersachsen (Lower Saxony)"), Some((38000, 38999)));
        assert_eq!(find("Berlin", "Bayern (Bavaria)"), None);
    }

    #[test]
    fn test_order_decides_overlaps() {
        let broad_first = RegionTable::new(vec![
            rule("Broad", &[(10000, 19999)], &[]),
            rule("Narrow", &[(12000, 12999)], &[]),
        ])
        .unwrap();
        assert_eq!(broad_first.resolve("12345").region_name, "Broad");
        assert_eq!(broad_first.unreachable_rules(), vec!["Narrow"]);

        let narrow_first = RegionTable::new(vec![
            rule("Narrow", &[(12000, 12999)], &[]),
            rule("Broad", &[(10000, 19999)], &[]),
        ])
        .unwrap();
        assert_eq!(narrow_first.resolve("12345").region_name, "Narrow");
        assert_eq!(narrow_first.resolve("13000").region_name, "Broad");
        assert!(narrow_first.unreachable_rules().is_empty());
    }

    #[test]
    fn test_exclusion_falls_through_to_later_rule() {
        let table = RegionTable::new(vec![
            rule("Outer", &[(17000, 19999)], &[(19300, 19357)]),
            rule("Inner", &[(19300, 19357)], &[]),
        ])
        .unwrap();
        assert_eq!(table.resolve("19299").region_name, "Outer");
        assert_eq!(table.resolve("19300").region_name, "Inner");
        assert_eq!(table.resolve("19357").region_name, "Inner");
        assert_eq!(table.resolve("19358").region_name, "Outer");
    }

    #[test]
    fn test_rejects_inverted_range() {
        let result = RegionTable::new(vec![rule("Berlin", &[(14999, 10000)], &[])]);
        match result {
            Err(EngineError::InvalidRegionTable { region, message }) => {
                assert_eq!(region, "Berlin");
                assert!(message.contains("greater than"));
            }
            other => panic!("Expected InvalidRegionTable, got {:?}", other),
        }
    }

    #[test]
    fn test_rejects_out_of_range_code() {
        assert!(RegionTable::new(vec![rule("Nowhere", &[(99000, 100000)], &[])]).is_err());
    }

    #[test]
    fn test_rejects_rule_without_ranges() {
        assert!(RegionTable::new(vec![rule("Empty", &[], &[])]).is_err());
    }

    #[test]
    fn test_parse_postal_code() {
        assert_eq!(parse_postal_code("89231"), Some(89231));
        assert_eq!(parse_postal_code("01067"), Some(1067));
        assert_eq!(parse_postal_code("1067"), Some(1067));
        assert_eq!(parse_postal_code("00000"), Some(0));
        assert_eq!(parse_postal_code("123"), None);
        assert_eq!(parse_postal_code("+1234"), None);
    }

    #[test]
    fn test_resolve_region_audit_step() {
        let result = resolve_region("89231", &germany(), 1);

        assert_eq!(result.region.region_name, "Bayern (Bavaria)");
        assert_eq!(result.audit_step.step_number, 1);
        assert_eq!(result.audit_step.rule_id, "region_lookup");
        assert_eq!(result.audit_step.input["parsed"], 89231);
        assert_eq!(
            result.audit_step.output["family_benefit_amount"].as_str().unwrap(),
            "250"
        );
        assert!(result.audit_step.reasoning.contains("Bayern"));
        assert!(result.audit_step.reasoning.contains("€250"));
    }

    #[test]
    fn test_resolve_region_audit_step_for_malformed_code() {
        let result = resolve_region("abc", &germany(), 3);

        assert!(result.region.is_unknown());
        assert!(result.audit_step.input["parsed"].is_null());
        assert!(result.audit_step.reasoning.contains("not 4-5 digits"));
    }

    #[test]
    fn test_resolve_region_audit_step_pads_four_digit_codes() {
        let result = resolve_region("1067", &germany(), 1);
        assert!(result.audit_step.reasoning.starts_with("01067 resolves to Sachsen"));
    }
}
