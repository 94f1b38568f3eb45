use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::constants::{HOTEL_ALIASES, MARKET_CHANNELS};
use crate::error::{IngestError, Result};
use crate::record::Hotel;

/// Optional TOML overrides for the compiled-in attribution and detection
/// vocabularies. Everything defaults to the constants, so running without a
/// config file is the normal case.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IngestConfig {
    #[serde(default)]
    pub attribution: AttributionConfig,
    #[serde(default)]
    pub detection: DetectionConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AttributionConfig {
    /// Extra filename aliases, checked after the built-in alias table.
    #[serde(default)]
    pub aliases: Vec<AliasRule>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AliasRule {
    /// Substring matched against the upper-cased filename.
    pub pattern: String,
    /// Hotel name the alias resolves to (must be one of the known hotels).
    pub hotel: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DetectionConfig {
    /// Extra sales-channel codes recognized during market/segment
    /// sub-classification, on top of the built-in set.
    #[serde(default)]
    pub extra_channels: Vec<String>,
}

impl IngestConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            IngestError::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        let config: IngestConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config file when a path is given, otherwise the defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    fn validate(&self) -> Result<()> {
        for rule in &self.attribution.aliases {
            if Hotel::from_name(rule.hotel.to_uppercase().as_str()).is_none() {
                return Err(IngestError::Config(format!(
                    "alias '{}' names unknown hotel '{}'",
                    rule.pattern, rule.hotel
                )));
            }
        }
        Ok(())
    }

    /// Alias table in evaluation order: built-ins first, then config extras.
    pub fn alias_rules(&self) -> Vec<(String, Hotel)> {
        let mut rules: Vec<(String, Hotel)> = HOTEL_ALIASES
            .iter()
            .map(|(pattern, hotel)| {
                (
                    (*pattern).to_string(),
                    Hotel::from_name(hotel).expect("built-in alias targets a known hotel"),
                )
            })
            .collect();
        for rule in &self.attribution.aliases {
            if let Some(hotel) = Hotel::from_name(rule.hotel.to_uppercase().as_str()) {
                rules.push((rule.pattern.to_uppercase(), hotel));
            }
        }
        rules
    }

    /// Full set of sales-channel codes used for Market vs Segment
    /// classification.
    pub fn market_channels(&self) -> HashSet<String> {
        MARKET_CHANNELS
            .iter()
            .map(|c| (*c).to_string())
            .chain(self.detection.extra_channels.iter().map(|c| c.to_uppercase()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_builtin_vocabularies() {
        let config = IngestConfig::default();
        let channels = config.market_channels();
        assert!(channels.contains("OTA"));
        assert!(channels.contains("TUIUK"));
        assert_eq!(config.alias_rules().len(), HOTEL_ALIASES.len());
    }

    #[test]
    fn toml_overrides_extend_not_replace() {
        let config: IngestConfig = toml::from_str(
            r#"
            [detection]
            extra_channels = ["gds"]

            [[attribution.aliases]]
            pattern = "VILLAMARE"
            hotel = "CVM"
            "#,
        )
        .unwrap();
        config.validate().unwrap();
        assert!(config.market_channels().contains("GDS"));
        assert!(config.market_channels().contains("OTA"));
        let rules = config.alias_rules();
        assert_eq!(rules.last().unwrap().0, "VILLAMARE");
        assert_eq!(rules.last().unwrap().1, Hotel::Cvm);
    }

    #[test]
    fn load_reads_overrides_from_a_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("condges.toml");
        std::fs::write(
            &path,
            r#"
            [detection]
            extra_channels = ["gds"]
            "#,
        )
        .unwrap();

        let config = IngestConfig::load(&path).unwrap();
        assert!(config.market_channels().contains("GDS"));
        assert!(IngestConfig::load_or_default(Some(&path)).is_ok());
    }

    #[test]
    fn missing_config_file_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.toml");
        assert!(matches!(
            IngestConfig::load(&missing),
            Err(IngestError::Config(_))
        ));
        // Without a path the compiled-in defaults apply.
        let config = IngestConfig::load_or_default(None).unwrap();
        assert!(config.market_channels().contains("OTA"));
    }

    #[test]
    fn unknown_alias_hotel_is_a_config_error() {
        let config: IngestConfig = toml::from_str(
            r#"
            [[attribution.aliases]]
            pattern = "XX"
            hotel = "RITZ"
            "#,
        )
        .unwrap();
        assert!(config.validate().is_err());
    }
}
