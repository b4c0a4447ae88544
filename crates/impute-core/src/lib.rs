//! impute-core: Author name disambiguation over bibliographic mention lists
//!
//! This library provides the resolution machinery:
//! - Mention and cluster bookkeeping over a corpus partition
//! - Token blocking to bound candidate comparisons
//! - Bayesian match scoring (name priors, coauthor evidence, misspellings)
//! - The greedy agglomerative merge passes and the full pipeline
//! - Corpus reading, assignment reports, and likelihood table estimation
//!
//! Name parsing and the component frequency model live in `impute-names`.

pub mod blocking;
pub mod cluster;
pub mod config;
pub mod corpus;
pub mod engine;
pub mod error;
pub mod estimate;
pub mod mention;
pub mod pipeline;
pub mod registry;
pub mod report;
pub mod scoring;

pub use blocking::TokenBlocks;
pub use cluster::{Cluster, ClusterId};
pub use config::{ImputeConfig, LikelihoodPair, ScoringConfig, Thresholds};
pub use corpus::{read_mentions, read_mentions_from_path, CorpusStats};
pub use engine::MergeContext;
pub use error::{ConfigError, CorpusError, ImputeError, Result};
pub use estimate::{estimate, EstimatedParameters};
pub use mention::{Mention, MentionId};
pub use pipeline::Pipeline;
pub use registry::Partition;
pub use report::{
    best_match_f_score, merges_needed, splits_needed, write_assignments, write_merges_needed,
    write_splits_needed,
};
pub use scoring::{bayesian_update, Scorer};
