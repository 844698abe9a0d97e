//! Configuration loading and management for the Exit Runway Engine.
//!
//! This module loads the benefit policy and the ordered postal-code table from
//! YAML files, and provides the same values built in.
//!
//! # Example
//!
//! ```no_run
//! use exit_runway_engine::config::ConfigLoader;
//!
//! let loader = ConfigLoader::load("./config/germany").unwrap();
//! println!("Loaded policy: {}", loader.metadata().name);
//! ```

mod defaults;
mod loader;
mod types;

pub use defaults::{CHILD_BENEFIT_MONTHLY, DEFAULT_EXIT_YEAR, germany_region_rules};
pub use loader::ConfigLoader;
pub use types::{
    BenefitPolicy, ChildBenefitPolicy, EngineConfig, FamilyBenefitPolicy, NetSalaryRates,
    PolicyMetadata, PostalRange, RecommendationPolicy, RegionRule, RegionsConfig,
    UnemploymentBenefitPolicy,
};
