//! Configuration for impute-core
//!
//! Merge thresholds and the likelihood tables behind the Bayesian scorer.
//! Every likelihood must be positive so posterior denominators can never
//! reach zero once a configuration passes validation.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::Result;

/// Top-level disambiguation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImputeConfig {
    /// Posterior thresholds gating merges
    pub thresholds: Thresholds,
    /// Priors and likelihood tables
    pub scoring: ScoringConfig,
}

impl Default for ImputeConfig {
    fn default() -> Self {
        Self {
            thresholds: Thresholds::default(),
            scoring: ScoringConfig::default(),
        }
    }
}

/// Posterior thresholds for the merge passes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// Merge immediately during a sweep at or above this posterior
    pub instant_merge: f64,
    /// Best-pair merge threshold for the name-evidence bootstrap pass
    pub bootstrap: f64,
    /// Best-pair merge threshold once coauthor evidence is in play
    pub merge: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            instant_merge: 0.99,
            bootstrap: 0.9,
            merge: 0.5,
        }
    }
}

/// A likelihood observed under the match and non-match hypotheses
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LikelihoodPair {
    pub given_match: f64,
    pub given_nonmatch: f64,
}

/// Priors and likelihood tables for the Bayesian scorer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Expected author population size behind the name prior
    pub expected_authors: u64,
    /// P(shared coauthor count | same author), indexed by capped count
    pub coauthor_match: Vec<f64>,
    /// P(shared coauthor count | different authors), indexed by capped count
    pub coauthor_nonmatch: Vec<f64>,
    /// Likelihoods of a mention omitting the first name
    pub drop_first_name: LikelihoodPair,
    /// Likelihoods of a mention dropping one half of a hyphenated surname
    pub drop_hyphenated_surname: LikelihoodPair,
    /// P(observed variant | same author) for single-edit spelling variants
    pub misspelling_likelihood: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            expected_authors: 1_000_000,
            coauthor_match: vec![0.5860, 0.2080, 0.0977, 0.0482, 0.0601],
            coauthor_nonmatch: vec![0.9915, 0.0066, 0.0011, 0.0004, 0.0004],
            drop_first_name: LikelihoodPair {
                given_match: 0.0086,
                given_nonmatch: 0.00012,
            },
            drop_hyphenated_surname: LikelihoodPair {
                given_match: 0.0031,
                given_nonmatch: 0.00002,
            },
            misspelling_likelihood: 0.1,
        }
    }
}

impl ImputeConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load and validate configuration from a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let config: Self = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize configuration to TOML
    pub fn to_toml(&self) -> std::result::Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Validate configuration values
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        check_threshold("instant_merge", self.thresholds.instant_merge)?;
        check_threshold("bootstrap", self.thresholds.bootstrap)?;
        check_threshold("merge", self.thresholds.merge)?;

        if self.scoring.expected_authors == 0 {
            return Err(ConfigError::ZeroExpectedAuthors);
        }

        if self.scoring.coauthor_match.is_empty() {
            return Err(ConfigError::EmptyTable("coauthor_match".to_string()));
        }
        if self.scoring.coauthor_nonmatch.is_empty() {
            return Err(ConfigError::EmptyTable("coauthor_nonmatch".to_string()));
        }
        if self.scoring.coauthor_match.len() != self.scoring.coauthor_nonmatch.len() {
            return Err(ConfigError::TableLengthMismatch {
                match_len: self.scoring.coauthor_match.len(),
                nonmatch_len: self.scoring.coauthor_nonmatch.len(),
            });
        }
        for (i, value) in self.scoring.coauthor_match.iter().enumerate() {
            check_likelihood(&format!("coauthor_match[{}]", i), *value)?;
        }
        for (i, value) in self.scoring.coauthor_nonmatch.iter().enumerate() {
            check_likelihood(&format!("coauthor_nonmatch[{}]", i), *value)?;
        }

        check_pair("drop_first_name", &self.scoring.drop_first_name)?;
        check_pair("drop_hyphenated_surname", &self.scoring.drop_hyphenated_surname)?;
        check_likelihood("misspelling_likelihood", self.scoring.misspelling_likelihood)?;

        Ok(())
    }
}

fn check_threshold(name: &str, value: f64) -> std::result::Result<(), ConfigError> {
    if value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidThreshold {
            name: name.to_string(),
            value,
        })
    }
}

fn check_likelihood(name: &str, value: f64) -> std::result::Result<(), ConfigError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::InvalidLikelihood {
            name: name.to_string(),
            value,
        })
    }
}

fn check_pair(name: &str, pair: &LikelihoodPair) -> std::result::Result<(), ConfigError> {
    check_likelihood(&format!("{}.given_match", name), pair.given_match)?;
    check_likelihood(&format!("{}.given_nonmatch", name), pair.given_nonmatch)
}
