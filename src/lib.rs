pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use config::{cli::LocalStorage, toml_config::RationConfig, OutputFormat};

#[cfg(feature = "cli")]
pub use config::Cli;

pub use core::{
    dilution::Dilution, evaluator::RationEvaluator, pearson::PearsonSquare,
    reference::ReferenceData,
};
pub use domain::report::{DilutionResult, PearsonResult, RationReport, Verdict};
pub use utils::error::{RationError, Result};
