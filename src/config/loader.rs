//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading the benefit
//! policy and postal-code table from YAML files.

use rust_decimal::Decimal;
use std::fs;
use std::path::Path;

use crate::calculation::RegionTable;
use crate::error::{EngineError, EngineResult};
use crate::models::MONTHS_PER_YEAR;

use super::types::{BenefitPolicy, EngineConfig, PolicyMetadata, RegionsConfig};

/// Loads and provides access to engine configuration.
///
/// # Directory Structure
///
/// ```text
/// config/germany/
/// ├── policy.yaml    # Rates, caps, benefit amounts, solver constants
/// └── regions.yaml   # Ordered postal-code rules
/// ```
///
/// # Example
///
/// ```no_run
/// use exit_runway_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/germany").unwrap();
/// println!("Loaded policy: {}", loader.metadata().name);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: EngineConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - Any required file is missing
    /// - Any file contains invalid YAML
    /// - A rate or tolerance lies outside `0..=1`
    /// - A benefit cap is zero, or the sperrzeit cap exceeds a year
    /// - A region rule is malformed
    ///
    /// # Example
    ///
    /// ```no_run
    /// use exit_runway_engine::config::ConfigLoader;
    ///
    /// let loader = ConfigLoader::load("./config/germany")?;
    /// # Ok::<(), exit_runway_engine::error::EngineError>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let policy_path = path.join("policy.yaml");
        let policy = Self::load_yaml::<BenefitPolicy>(&policy_path)?;
        Self::validate_policy(&policy, &policy_path)?;

        let regions_path = path.join("regions.yaml");
        let regions_config = Self::load_yaml::<RegionsConfig>(&regions_path)?;
        let regions = RegionTable::new(regions_config.regions)?;

        tracing::debug!(
            path = %path.display(),
            policy = %policy.metadata.name,
            region_rules = regions.rules().len(),
            "Loaded engine configuration"
        );

        Ok(Self {
            config: EngineConfig::new(policy, regions),
        })
    }

    /// Returns a loader holding the built-in German configuration.
    pub fn germany() -> Self {
        Self {
            config: EngineConfig::germany(),
        }
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    fn validate_policy(policy: &BenefitPolicy, path: &Path) -> EngineResult<()> {
        let rates = [
            ("net_salary_rates.married_favorable", policy.net_salary_rates.married_favorable),
            ("net_salary_rates.single_standard", policy.net_salary_rates.single_standard),
            (
                "unemployment_benefit.rate_with_children",
                policy.unemployment_benefit.rate_with_children,
            ),
            (
                "unemployment_benefit.rate_without_children",
                policy.unemployment_benefit.rate_without_children,
            ),
            (
                "recommendation.default_net_severance_rate",
                policy.recommendation.default_net_severance_rate,
            ),
            (
                "recommendation.breakeven_tolerance",
                policy.recommendation.breakeven_tolerance,
            ),
        ];

        for (field, rate) in rates {
            if rate < Decimal::ZERO || rate > Decimal::ONE {
                return Err(EngineError::ConfigParseError {
                    path: path.display().to_string(),
                    message: format!("{} must be between 0 and 1, got {}", field, rate),
                });
            }
        }

        let benefit = &policy.unemployment_benefit;
        if benefit.max_months == 0 {
            return Err(EngineError::ConfigParseError {
                path: path.display().to_string(),
                message: "unemployment_benefit.max_months must be at least 1".to_string(),
            });
        }
        if benefit.max_sperrzeit_months > MONTHS_PER_YEAR {
            return Err(EngineError::ConfigParseError {
                path: path.display().to_string(),
                message: format!(
                    "unemployment_benefit.max_sperrzeit_months must be at most {}, got {}",
                    MONTHS_PER_YEAR, benefit.max_sperrzeit_months
                ),
            });
        }

        if policy.family_benefit.min_age > policy.family_benefit.max_age {
            return Err(EngineError::ConfigParseError {
                path: path.display().to_string(),
                message: format!(
                    "family_benefit.min_age {} exceeds max_age {}",
                    policy.family_benefit.min_age, policy.family_benefit.max_age
                ),
            });
        }

        Ok(())
    }

    /// Returns the underlying engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Consumes the loader and returns the engine configuration.
    pub fn into_config(self) -> EngineConfig {
        self.config
    }

    /// Returns the policy metadata.
    pub fn metadata(&self) -> &PolicyMetadata {
        &self.config.policy().metadata
    }

    /// Returns the benefit policy.
    pub fn policy(&self) -> &BenefitPolicy {
        self.config.policy()
    }

    /// Returns the postal-code table.
    pub fn regions(&self) -> &RegionTable {
        self.config.regions()
    }
}
