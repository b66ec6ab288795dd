use crate::core::evaluator::CheckSettings;
use crate::core::resolver::MatchSettings;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{RationError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;

pub const DEFAULT_STANDARDS_FILE: &str = "data/standards.csv";
pub const DEFAULT_FEEDS_FILE: &str = "data/feeds.csv";

/// Optional `ration.toml`. Every field falls back to a built-in default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RationConfig {
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub check: CheckConfig,
    #[serde(default)]
    pub matching: MatchingConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DataConfig {
    pub standards: Option<String>,
    pub feeds: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CheckConfig {
    pub normalization_tolerance: Option<f64>,
    pub ca_p_min: Option<f64>,
    pub ca_p_max: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MatchingConfig {
    pub max_suggestions: Option<usize>,
    pub similarity_cutoff: Option<f64>,
}

impl RationConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => RationError::MissingFile {
                path: path.display().to_string(),
            },
            _ => RationError::IoError(e),
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| RationError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${RATION_DATA_DIR})
    fn substitute_env_vars(content: &str) -> String {
        static ENV_VAR: OnceLock<Regex> = OnceLock::new();
        let re = ENV_VAR.get_or_init(|| {
            Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("static pattern is valid")
        });

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .into_owned()
    }

    /// Command-line paths win over the file, the file over the defaults.
    pub fn with_overrides(mut self, standards: Option<String>, feeds: Option<String>) -> Self {
        if standards.is_some() {
            self.data.standards = standards;
        }
        if feeds.is_some() {
            self.data.feeds = feeds;
        }
        self
    }
}

impl ConfigProvider for RationConfig {
    fn standards_path(&self) -> &str {
        self.data
            .standards
            .as_deref()
            .unwrap_or(DEFAULT_STANDARDS_FILE)
    }

    fn feeds_path(&self) -> &str {
        self.data.feeds.as_deref().unwrap_or(DEFAULT_FEEDS_FILE)
    }

    fn check_settings(&self) -> CheckSettings {
        let defaults = CheckSettings::default();
        CheckSettings {
            normalization_tolerance: self
                .check
                .normalization_tolerance
                .unwrap_or(defaults.normalization_tolerance),
            ca_p_min: self.check.ca_p_min.unwrap_or(defaults.ca_p_min),
            ca_p_max: self.check.ca_p_max.unwrap_or(defaults.ca_p_max),
        }
    }

    fn match_settings(&self) -> MatchSettings {
        let defaults = MatchSettings::default();
        MatchSettings {
            max_suggestions: self
                .matching
                .max_suggestions
                .unwrap_or(defaults.max_suggestions),
            similarity_cutoff: self
                .matching
                .similarity_cutoff
                .unwrap_or(defaults.similarity_cutoff),
        }
    }
}

impl Validate for RationConfig {
    fn validate(&self) -> Result<()> {
        // Any readable location is accepted; existence is checked when the table is loaded.
        validation::validate_path("data.standards", self.standards_path())?;
        validation::validate_path("data.feeds", self.feeds_path())?;

        let check = self.check_settings();
        validation::validate_range(
            "check.normalization_tolerance",
            check.normalization_tolerance,
            0.0,
            f64::MAX,
        )?;
        validation::validate_range("check.ca_p_min", check.ca_p_min, 0.0, f64::MAX)?;
        validation::validate_range("check.ca_p_max", check.ca_p_max, 0.0, f64::MAX)?;
        validation::validate_ordered("check.ca_p_min/ca_p_max", check.ca_p_min, check.ca_p_max)?;

        let matching = self.match_settings();
        validation::validate_positive_number(
            "matching.max_suggestions",
            matching.max_suggestions,
            1,
        )?;
        validation::validate_range(
            "matching.similarity_cutoff",
            matching.similarity_cutoff,
            0.0,
            1.0,
        )?;

        Ok(())
    }
}
