//! Configuration for pattern detection and similarity search.
//!
//! Load order: `sema.toml` → environment variables → defaults.
//!
//! The detector thresholds, magic-number allow-list, and per-rule confidence
//! values are heuristic defaults inherited from the original rule set, not
//! validated tuning. They are deliberately configurable rather than baked in.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level engine configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SemaConfig {
    pub detector: DetectorConfig,
    pub similarity: SimilarityConfig,
}

/// Anti-pattern rule thresholds and confidences.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// A class with more than this many methods is flagged as a god class.
    pub god_class_methods: usize,
    /// A function spanning more than this many lines is flagged as a long method.
    pub long_method_lines: usize,
    /// A function with more than this many parameters is flagged.
    pub max_parameters: usize,
    /// Numeric literals that never count as magic numbers.
    /// Intentionally small — the rule favors over-reporting.
    pub magic_number_allowlist: Vec<f64>,
    pub god_class_confidence: f32,
    pub long_method_confidence: f32,
    pub excessive_parameters_confidence: f32,
    pub magic_number_confidence: f32,
}

/// Similarity search configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimilarityConfig {
    /// Minimum cosine score for a `find_similar` hit.
    pub threshold: f32,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            god_class_methods: 15,
            long_method_lines: 50,
            max_parameters: 5,
            magic_number_allowlist: vec![0.0, 1.0, -1.0, 100.0],
            god_class_confidence: 0.90,
            long_method_confidence: 0.85,
            excessive_parameters_confidence: 0.80,
            magic_number_confidence: 0.70,
        }
    }
}

impl Default for SimilarityConfig {
    fn default() -> Self {
        Self { threshold: 0.7 }
    }
}

/// Helper to parse an env var and apply it to a config field.
fn env_override<T: std::str::FromStr>(var: &str, target: &mut T) {
    if let Ok(v) = std::env::var(var)
        && let Ok(n) = v.parse()
    {
        *target = n;
    }
}

impl SemaConfig {
    /// Load config from `sema.toml` in the given directory, with env var
    /// overrides. Falls back to defaults if no config file exists.
    pub fn load(dir: &Path) -> Result<Self> {
        let config_path = dir.join("sema.toml");

        let mut config: Self = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            toml::from_str(&content)?
        } else {
            Self::default()
        };

        env_override(
            "SEMA_GOD_CLASS_METHODS",
            &mut config.detector.god_class_methods,
        );
        env_override(
            "SEMA_LONG_METHOD_LINES",
            &mut config.detector.long_method_lines,
        );
        env_override("SEMA_MAX_PARAMETERS", &mut config.detector.max_parameters);
        env_override(
            "SEMA_SIMILARITY_THRESHOLD",
            &mut config.similarity.threshold,
        );

        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the detector cannot honor.
    pub fn validate(&self) -> Result<()> {
        let d = &self.detector;
        for (rule, confidence) in [
            ("god_class", d.god_class_confidence),
            ("long_method", d.long_method_confidence),
            ("excessive_parameters", d.excessive_parameters_confidence),
            ("magic_number", d.magic_number_confidence),
        ] {
            if confidence <= 0.0 || confidence > 1.0 {
                anyhow::bail!(
                    "{} confidence ({}) must be within (0.0, 1.0]",
                    rule,
                    confidence
                );
            }
        }
        if !(-1.0..=1.0).contains(&self.similarity.threshold) {
            anyhow::bail!(
                "similarity threshold ({}) must be within [-1.0, 1.0]",
                self.similarity.threshold
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SemaConfig::default();
        assert_eq!(config.detector.god_class_methods, 15);
        assert_eq!(config.detector.long_method_lines, 50);
        assert_eq!(config.detector.max_parameters, 5);
        assert_eq!(
            config.detector.magic_number_allowlist,
            vec![0.0, 1.0, -1.0, 100.0]
        );
        assert_eq!(config.detector.god_class_confidence, 0.90);
        assert_eq!(config.similarity.threshold, 0.7);
    }

    #[test]
    fn test_config_from_toml() {
        let toml_str = r#"
[detector]
god_class_methods = 20
magic_number_allowlist = [0.0, 1.0]

[similarity]
threshold = 0.5
"#;
        let config: SemaConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.detector.god_class_methods, 20);
        assert_eq!(config.detector.magic_number_allowlist, vec![0.0, 1.0]);
        assert_eq!(config.similarity.threshold, 0.5);
        // Defaults for unspecified fields
        assert_eq!(config.detector.long_method_lines, 50);
        assert_eq!(config.detector.magic_number_confidence, 0.70);
    }

    #[test]
    fn test_config_load_nonexistent_dir_uses_defaults() {
        let config = SemaConfig::load(Path::new("/nonexistent/path")).unwrap();
        assert_eq!(config.detector.god_class_methods, 15);
    }

    #[test]
    fn test_config_load_from_file() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(
            tmp.path().join("sema.toml"),
            "[detector]\nmax_parameters = 8\n",
        )
        .unwrap();

        let config = SemaConfig::load(tmp.path()).unwrap();
        assert_eq!(config.detector.max_parameters, 8);
    }

    #[test]
    fn test_validate_rejects_zero_confidence() {
        let mut config = SemaConfig::default();
        config.detector.magic_number_confidence = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_confidence_above_one() {
        let mut config = SemaConfig::default();
        config.detector.god_class_confidence = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_out_of_range_threshold() {
        let mut config = SemaConfig::default();
        config.similarity.threshold = 2.0;
        assert!(config.validate().is_err());
    }
}
