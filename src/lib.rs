//! Exit Runway Engine for German employment exits
//!
//! This crate estimates an employee's financial position after leaving a job
//! in Germany: net severance under the five-fifths rule, unemployment benefit
//! across two calendar years, child and regional family benefits, cash runway,
//! and the severance size needed to break even.

#![warn(missing_docs)]

pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
