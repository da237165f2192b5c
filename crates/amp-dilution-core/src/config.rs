use config::{Config, ConfigError, Environment, File as ConfigFile};
use serde::{Deserialize, Serialize};

/// What to do with a system whose dilution cannot be computed
/// (zero total/companion flux, or no primary flux).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DegeneratePolicy {
    /// Write NaN for the row and leave it out of the summary and histogram.
    #[default]
    Skip,
    /// Abort the run.
    Fail,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub table_path: String,
    pub histogram_path: String,
    pub delimiter: String,
    pub id_column: String,
    pub flux_column: String,
    pub flux_err_column: String,
    pub dilution_column: String,
    pub dilution_err_column: String,
    pub sentinel: f64,
    pub threshold_percent: f64,
    pub histogram_bins: usize,
    pub degenerate_policy: DegeneratePolicy,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            table_path: "gaia_search_results_oscillating_stars.csv".to_string(),
            histogram_path: "amp_dil_osc_stars.png".to_string(),
            delimiter: "|".to_string(),
            id_column: "kic".to_string(),
            flux_column: "g_flux".to_string(),
            flux_err_column: "g_flux_err".to_string(),
            dilution_column: "amp_dil_per".to_string(),
            dilution_err_column: "amp_dil_err_per".to_string(),
            sentinel: -999.0,
            threshold_percent: 10.0,
            histogram_bins: 30,
            degenerate_policy: DegeneratePolicy::Skip,
        }
    }
}

impl AppConfig {
    /// The delimiter as the single byte the csv reader/writer expects.
    pub fn delimiter_byte(&self) -> Result<u8, ConfigError> {
        match self.delimiter.as_bytes() {
            [b] if b.is_ascii() => Ok(*b),
            _ => Err(ConfigError::Message(format!(
                "delimiter must be a single ASCII character, got {:?}",
                self.delimiter
            ))),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.delimiter_byte()?;
        if self.histogram_bins == 0 {
            return Err(ConfigError::Message(
                "histogram_bins must be at least 1".to_string(),
            ));
        }
        if self.dilution_column == self.dilution_err_column {
            return Err(ConfigError::Message(format!(
                "dilution_column and dilution_err_column are both '{}'",
                self.dilution_column
            )));
        }
        if !self.sentinel.is_finite() {
            return Err(ConfigError::Message("sentinel must be finite".to_string()));
        }
        Ok(())
    }
}

/// Built-in defaults, overridden by an optional `Config.toml`, overridden by
/// `AMP_DIL_*` environment variables.
pub fn load_configuration() -> Result<AppConfig, ConfigError> {
    let defaults = AppConfig::default();
    let builder = Config::builder()
        .set_default("table_path", defaults.table_path)?
        .set_default("histogram_path", defaults.histogram_path)?
        .set_default("delimiter", defaults.delimiter)?
        .set_default("id_column", defaults.id_column)?
        .set_default("flux_column", defaults.flux_column)?
        .set_default("flux_err_column", defaults.flux_err_column)?
        .set_default("dilution_column", defaults.dilution_column)?
        .set_default("dilution_err_column", defaults.dilution_err_column)?
        .set_default("sentinel", defaults.sentinel)?
        .set_default("threshold_percent", defaults.threshold_percent)?
        .set_default("histogram_bins", defaults.histogram_bins as u64)?
        .set_default("degenerate_policy", "skip")?
        .add_source(ConfigFile::with_name("Config").required(false))
        .add_source(Environment::with_prefix("AMP_DIL"))
        .build()?;
    let config = builder.try_deserialize::<AppConfig>()?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.delimiter_byte().unwrap(), b'|');
        assert_eq!(config.histogram_bins, 30);
        assert_eq!(config.degenerate_policy, DegeneratePolicy::Skip);
    }

    #[test]
    fn test_multichar_delimiter_rejected() {
        let config = AppConfig {
            delimiter: "||".to_string(),
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_bins_rejected() {
        let config = AppConfig {
            histogram_bins: 0,
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_same_derived_columns_rejected() {
        let config = AppConfig {
            dilution_err_column: "amp_dil_per".to_string(),
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
