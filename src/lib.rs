//! attrition-eda: Exploratory Data Analysis Library
//!
//! Profiles an employee-attrition table, treats missing values and
//! outliers, derives features, and ranks them against the resignation
//! outcome by mutual information and Information Value.

pub mod cli;
pub mod pipeline;
pub mod report;
pub mod utils;
