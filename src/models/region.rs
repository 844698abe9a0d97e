//! Region information derived from a postal code.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Name of the sentinel region returned for unresolvable postal codes.
pub const UNKNOWN_REGION: &str = "Unknown";

/// The federal state a postal code resolves to and its family benefit.
///
/// # Example
///
/// ```
/// use exit_runway_engine::models::RegionInfo;
/// use rust_decimal::Decimal;
///
/// let unknown = RegionInfo::unknown();
/// assert_eq!(unknown.region_name, "Unknown");
/// assert!(!unknown.has_family_benefit);
/// assert_eq!(unknown.family_benefit_amount, Decimal::ZERO);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionInfo {
    /// Display name of the federal state.
    pub region_name: String,
    /// Whether the state pays a supplemental per-child family benefit.
    pub has_family_benefit: bool,
    /// Monthly family benefit per eligible child (EUR), zero if none.
    pub family_benefit_amount: Decimal,
}

impl RegionInfo {
    /// Returns the sentinel region used for malformed or unmapped codes.
    pub fn unknown() -> Self {
        Self {
            region_name: UNKNOWN_REGION.to_string(),
            has_family_benefit: false,
            family_benefit_amount: Decimal::ZERO,
        }
    }

    /// Returns true if this is the `Unknown` sentinel.
    pub fn is_unknown(&self) -> bool {
        self.region_name == UNKNOWN_REGION
    }
}
