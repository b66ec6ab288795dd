use crate::config::toml_config::RationConfig;
use crate::config::OutputFormat;
use crate::core::dilution::Dilution;
use crate::core::evaluator::RationEvaluator;
use crate::core::pearson::PearsonSquare;
use crate::core::reference::ReferenceData;
use crate::domain::ports::{ConfigProvider, Storage};
use crate::domain::report::{DilutionResult, PearsonResult, RationReport, Verdict};
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use std::io::Write;

use super::render;

/// Loads the reference tables named by `config` and evaluates one ration.
pub fn check<S: Storage, C: ConfigProvider>(
    storage: &S,
    config: &C,
    animal: &str,
    diet: &str,
) -> Result<RationReport> {
    tracing::info!(
        "Checking ration for '{}' against {} / {}",
        animal,
        config.standards_path(),
        config.feeds_path()
    );

    let data = ReferenceData::load(storage, config.standards_path(), config.feeds_path())?;
    let evaluator =
        RationEvaluator::with_settings(&data, config.check_settings(), config.match_settings());
    evaluator.evaluate(animal, diet)
}

pub fn pearson(target: f64, feed1: f64, feed2: f64) -> Result<PearsonResult> {
    PearsonSquare::solve(target, feed1, feed2)
}

pub fn dilute(start: f64, target: f64) -> Result<DilutionResult> {
    Dilution::solve(start, target)
}

/// Reads `--config` if given, applies command-line path overrides and validates.
pub fn resolve_config(
    config_path: Option<&str>,
    standards: Option<String>,
    feeds: Option<String>,
) -> Result<RationConfig> {
    let base = match config_path {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path);
            RationConfig::from_file(path)?
        }
        None => RationConfig::default(),
    };

    let config = base.with_overrides(standards, feeds);
    config.validate()?;
    tracing::debug!("Resolved config: {:?}", config);
    Ok(config)
}

pub fn write_ration<W: Write>(report: &RationReport, format: OutputFormat, out: &mut W) -> Result<()> {
    match format {
        OutputFormat::Text => render::render_ration(report, out)?,
        OutputFormat::Json => render::render_json("check", report, out)?,
    }
    Ok(())
}

#[cfg(feature = "cli")]
pub use cli_dispatch::execute;

#[cfg(feature = "cli")]
mod cli_dispatch {
    use super::*;
    use crate::config::{Cli, Command};
    use crate::config::cli::LocalStorage;

    /// Runs the parsed command, writing the report to `out`.
    ///
    /// A completed check returns its verdict; FAIL is not an error.
    pub fn execute<W: Write>(cli: &Cli, out: &mut W) -> Result<Option<Verdict>> {
        match &cli.command {
            Command::Check(args) => {
                let config = resolve_config(
                    cli.config.as_deref(),
                    args.standards.clone(),
                    args.feeds.clone(),
                )?;
                let report = check(&LocalStorage::default(), &config, &args.animal, &args.diet)?;
                write_ration(&report, cli.format, out)?;
                Ok(Some(report.verdict))
            }
            Command::Pearson(args) => {
                let result = pearson(args.target, args.feed1, args.feed2)?;
                match cli.format {
                    OutputFormat::Text => render::render_pearson(&result, out)?,
                    OutputFormat::Json => render::render_json("pearson", &result, out)?,
                }
                Ok(None)
            }
            Command::Dilute(args) => {
                let result = dilute(args.start, args.target)?;
                match cli.format {
                    OutputFormat::Text => render::render_dilution(&result, out)?,
                    OutputFormat::Json => render::render_json("dilute", &result, out)?,
                }
                Ok(None)
            }
        }
    }
}
