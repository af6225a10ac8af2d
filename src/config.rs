//! A module for validating and managing configurations for a blade fatigue assessment.

use anyhow::{bail, Context};
use regex::Regex;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::material::Material;
use crate::parser::SAMPLE_VARIABLE;

/// Represents an error that can occur during validation of configuration data.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct ValidationError {
    message: String,
}

impl ValidationError {
    /// Creates a new `ValidationError` with a given message.
    ///
    /// # Arguments
    ///
    /// * `message` - A description of the error.
    pub fn new(message: &str) -> ValidationError {
        ValidationError {
            message: message.to_owned(),
        }
    }
}

/// Represents the configuration for a blade fatigue assessment.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub material: Material,
    pub analysis: Analysis,
    pub loadcases: Vec<LoadCase>,
    /// Directory that relative load case files are resolved against.
    #[serde(skip)]
    pub base_dir: PathBuf,
}

impl Config {
    /// Validates the entire configuration.
    ///
    /// This method checks the validity of each component of the configuration
    /// and ensures all required conditions are met.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.material.validate()?;
        self.analysis.validate()?;
        if self.loadcases.is_empty() {
            return Err(ValidationError::new("loadcases must not be empty"));
        }
        let mut names = HashSet::new();
        for lc in &self.loadcases {
            lc.validate()?;
            if !names.insert(lc.name.as_str()) {
                return Err(ValidationError::new(&format!("duplicate loadcase name: {}", lc.name)));
            }
            let path = self.loadcase_path(lc);
            if !path.exists() {
                return Err(ValidationError::new(&format!(
                    "loadcase file does not exist: {}",
                    path.display()
                )));
            }
        }
        Ok(())
    }

    /// Full path of a load case record.
    pub fn loadcase_path(&self, lc: &LoadCase) -> PathBuf {
        self.base_dir.join(lc.file.trim())
    }
}

/// Represents how each load record is turned into a damage rate.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Analysis {
    /// Number of equal windows a record is split into and counted separately.
    pub segments: usize,
    /// How many times a full record repeats per year, e.g. 365.25 for one day.
    pub units_per_year: f64,
    /// The desired output format. Currently, "JSON" is supported as a valid output.
    pub output: String,
}

impl Analysis {
    /// Validates the `Analysis` section.
    ///
    /// # Examples
    ///
    /// ```
    /// use blade_fatigue::config::Analysis;
    ///
    /// let daily = Analysis { segments: 24, units_per_year: 365.25, output: String::from("JSON") };
    /// assert!(daily.validate().is_ok());
    ///
    /// let no_segments = Analysis { segments: 0, units_per_year: 365.25, output: String::from("JSON") };
    /// assert!(no_segments.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.segments == 0 {
            return Err(ValidationError::new("segments must be greater than 0"));
        }
        if !(self.units_per_year.is_finite() && self.units_per_year > 0.0) {
            return Err(ValidationError::new(&format!(
                "units_per_year must be greater than 0.0, got {}",
                self.units_per_year
            )));
        }
        match self.output.as_str() {
            "JSON" => Ok(()),
            _ => Err(ValidationError::new(&format!("output must be JSON, got {}", self.output))),
        }
    }
}

/// A single load record, e.g. one wind regime.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoadCase {
    pub name: String,
    /// Record file, relative to the configuration file.
    pub file: String,
    /// Zero-based column holding the samples.
    #[serde(default)]
    pub column: usize,
    /// Number of leading lines to skip.
    #[serde(default)]
    pub header: usize,
    /// Single-byte field delimiter.
    #[serde(default = "default_delimiter")]
    pub delimiter: String,
    /// Optional expression in `x` mapping raw samples to stress.
    pub transfer: Option<String>,
    /// Named constants available to `transfer`.
    #[serde(default)]
    pub parameters: HashMap<String, f64>,
}

fn default_delimiter() -> String {
    ",".to_owned()
}

impl LoadCase {
    /// The delimiter as the byte the record reader expects.
    pub fn delimiter_byte(&self) -> Result<u8, ValidationError> {
        match self.delimiter.as_bytes() {
            [byte] => Ok(*byte),
            _ => Err(ValidationError::new(&format!(
                "delimiter must be a single byte for loadcase {}, got {:?}",
                self.name, self.delimiter
            ))),
        }
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::new("loadcase name must not be empty"));
        }
        if self.file.trim().is_empty() {
            return Err(ValidationError::new(&format!("file must not be empty for loadcase {}", self.name)));
        }
        self.delimiter_byte()?;
        if let Some(transfer) = &self.transfer {
            if transfer.trim().is_empty() {
                return Err(ValidationError::new(&format!("transfer is empty for loadcase {}", self.name)));
            }
        }
        let re = Regex::new(r"^[a-zA-Z_][a-zA-Z0-9_]*$")
            .map_err(|e| ValidationError::new(&e.to_string()))?;
        for (key, value) in &self.parameters {
            if !re.is_match(key) || key == SAMPLE_VARIABLE {
                return Err(ValidationError::new(&format!("Invalid parameter name: {}", key)));
            }
            if !value.is_finite() {
                return Err(ValidationError::new(&format!(
                    "parameter {} must be a finite number, got {}",
                    key, value
                )));
            }
        }
        Ok(())
    }
}

/// Loads the configuration from a YAML or TOML file, chosen by extension.
///
/// # Arguments
///
/// * `config_path` - A path reference to the configuration file.
///
/// # Errors
///
/// This function will return an error if reading or parsing the configuration file fails,
/// including S-N parameters that are not positive.
pub fn load_config<P: AsRef<Path>>(config_path: P) -> anyhow::Result<Config> {
    let config_path = config_path.as_ref();
    let content = fs::read_to_string(config_path)
        .with_context(|| format!("failed to read config {}", config_path.display()))?;

    let mut config: Config = match config_path.extension().and_then(|e| e.to_str()) {
        Some("yaml") | Some("yml") => serde_yaml::from_str(&content)
            .with_context(|| format!("failed to parse {}", config_path.display()))?,
        Some("toml") => toml::from_str(&content)
            .with_context(|| format!("failed to parse {}", config_path.display()))?,
        _ => bail!("unsupported config format: {}", config_path.display()),
    };
    config.base_dir = config_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_config() {
        let config_path = "tests/config.yaml";
        let config = load_config(config_path).expect("Failed to load config");
        assert!(config.validate().is_ok(), "Expected Ok(()) but got Err with {:?}", config.validate());
        assert_eq!(config.loadcases.len(), 3);
        assert_eq!(config.analysis.segments, 24);
        assert_eq!(config.material.sn_curve.reference_cycles(), 1e6);
        assert_eq!(config.loadcase_path(&config.loadcases[0]), Path::new("tests/data/calm.csv"));
    }

    #[test]
    fn test_load_toml_config() {
        let config = load_config("tests/config.toml").expect("Failed to load config");
        assert!(config.validate().is_ok(), "{:?}", config.validate());
        assert_eq!(config.loadcases[0].name, "Measured");
        assert!(config.loadcases[0].transfer.is_none());
    }

    #[test]
    fn test_invalid_material_fails_to_load() {
        let err = load_config("tests/invalid_material.yaml").unwrap_err();
        assert!(format!("{:#}", err).contains("s_ref"), "{:#}", err);
    }

    #[test]
    fn test_unsupported_extension() {
        assert!(load_config("tests/data/calm.csv").is_err());
    }

    #[test]
    fn test_loadcase_validation() {
        let mut lc = LoadCase {
            name: "Calm".into(),
            file: "calm.csv".into(),
            column: 0,
            header: 0,
            delimiter: ",".into(),
            transfer: Some("k * x^2".into()),
            parameters: HashMap::from([("k".to_owned(), 500000.0)]),
        };
        assert!(lc.validate().is_ok());

        lc.parameters.insert("x".into(), 1.0);
        assert!(lc.validate().is_err());

        lc.parameters.remove("x");
        lc.parameters.insert("2k".into(), 1.0);
        assert!(lc.validate().is_err());

        lc.parameters.remove("2k");
        lc.delimiter = ";;".into();
        assert!(lc.validate().is_err());

        lc.delimiter = ";".into();
        assert_eq!(lc.delimiter_byte().unwrap(), b';');
        lc.transfer = Some("  ".into());
        assert!(lc.validate().is_err());
    }

    #[test]
    fn test_flat_loadcase_columns_are_read() {
        let config = load_config("tests/flat_columns.yaml").expect("Failed to load config");
        assert!(config.validate().is_ok(), "{:?}", config.validate());
        let lc = &config.loadcases[0];
        assert_eq!((lc.column, lc.header), (1, 0));
        let signal = crate::timeseries::read_signal(
            config.loadcase_path(lc),
            lc.column,
            lc.header,
            lc.delimiter_byte().unwrap(),
        )
        .expect("Failed to read record");
        assert_eq!(signal, vec![0.0, 3.0, 0.0]);
    }

    #[test]
    fn test_unknown_keys_fail_to_load() {
        // Layout keys nested under a sub-table are not part of the schema
        let err = load_config("tests/nested_layout.yaml").unwrap_err();
        assert!(format!("{:#}", err).contains("parse_config"), "{:#}", err);
    }

    #[test]
    fn test_duplicate_and_missing_loadcases() {
        let mut config = load_config("tests/config.yaml").expect("Failed to load config");
        config.loadcases[1].name = config.loadcases[0].name.clone();
        assert!(config.validate().is_err());

        let mut config = load_config("tests/config.yaml").expect("Failed to load config");
        config.loadcases[2].file = "data/missing.csv".into();
        assert!(config.validate().is_err());

        let mut config = load_config("tests/config.yaml").expect("Failed to load config");
        config.loadcases.clear();
        assert!(config.validate().is_err());
    }
}
