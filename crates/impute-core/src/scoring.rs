//! Bayesian scoring of cluster pairs
//!
//! Posteriors start from a name prior (how unlikely it is that two different
//! authors share this name form) and are updated with coauthor evidence.
//! Coauthor sets are resolved through the current assignment, so earlier
//! merges strengthen later evidence.

use std::collections::BTreeSet;

use impute_names::{AuthorName, NameFrequencyModel};

use crate::cluster::{Cluster, ClusterId};
use crate::config::{LikelihoodPair, ScoringConfig};
use crate::registry::Partition;

/// Posterior probability of a match after observing one piece of evidence,
/// in odds form. The denominator cannot reach zero under a validated
/// configuration; hitting zero means a likelihood table was corrupted.
pub fn bayesian_update(prior: f64, given_match: f64, given_nonmatch: f64) -> f64 {
    let numerator = prior * given_match;
    let denominator = numerator + (1.0 - prior) * given_nonmatch;
    assert!(
        denominator > 0.0,
        "zero posterior denominator: prior {} with likelihoods {}/{}",
        prior,
        given_match,
        given_nonmatch
    );
    numerator / denominator
}

/// Scores cluster pairs against a frequency model and likelihood tables.
///
/// The distinct-author count behind the name prior is pluggable; without an
/// external author registry it stays at one.
pub struct Scorer<'a> {
    model: &'a NameFrequencyModel,
    config: &'a ScoringConfig,
    distinct_authors: fn(&AuthorName) -> f64,
}

impl<'a> Scorer<'a> {
    pub fn new(model: &'a NameFrequencyModel, config: &'a ScoringConfig) -> Self {
        Self {
            model,
            config,
            distinct_authors: |_| 1.0,
        }
    }

    /// Replace the distinct-author count used by the name prior.
    pub fn with_distinct_authors(mut self, count: fn(&AuthorName) -> f64) -> Self {
        self.distinct_authors = count;
        self
    }

    /// Prior that two name forms denote the same author, from the rarity of
    /// their shared pattern. Zero when the names are incompatible.
    pub fn name_prior(&self, a: &Cluster, b: &Cluster) -> f64 {
        match AuthorName::intersect(a, b) {
            None => 0.0,
            Some(shared) => {
                let generation = self.model.pattern_probability(&shared);
                let distinct = (self.distinct_authors)(&shared);
                1.0 / (distinct + self.config.expected_authors as f64 * generation)
            }
        }
    }

    /// Likelihoods for the observed number of shared coauthors, capped at
    /// the top band of the tables.
    pub fn coauthor_likelihoods(
        &self,
        partition: &Partition,
        a: &Cluster,
        b: &Cluster,
    ) -> LikelihoodPair {
        let shared = shared_coauthor_count(partition, a, b);
        let capped = shared.min(self.config.coauthor_match.len() - 1);
        LikelihoodPair {
            given_match: self.config.coauthor_match[capped],
            given_nonmatch: self.config.coauthor_nonmatch[capped],
        }
    }

    /// Name prior updated with coauthor evidence.
    pub fn collective_posterior(
        &self,
        partition: &Partition,
        a: &Cluster,
        b: &Cluster,
    ) -> f64 {
        let prior = self.name_prior(a, b);
        if prior == 0.0 {
            return 0.0;
        }
        let pair = self.coauthor_likelihoods(partition, a, b);
        bayesian_update(prior, pair.given_match, pair.given_nonmatch)
    }

    /// Posterior that `wrong` is a misspelling of `right`: an edit-distance
    /// prior, updated with the rate at which true variants survive in print,
    /// then with coauthor evidence.
    pub fn spelling_posterior(
        &self,
        partition: &Partition,
        right: &Cluster,
        wrong: &Cluster,
    ) -> f64 {
        let prior = self.model.misspelling_prior(right, wrong);
        let spelled = bayesian_update(prior, self.config.misspelling_likelihood, 1.0);
        let pair = self.coauthor_likelihoods(partition, right, wrong);
        bayesian_update(spelled, pair.given_match, pair.given_nonmatch)
    }
}

/// Clusters appearing alongside `cluster` on its papers, resolved through
/// the current assignment and excluding the cluster itself.
fn coauthor_clusters(partition: &Partition, cluster: &Cluster) -> BTreeSet<ClusterId> {
    let mut coauthors = BTreeSet::new();
    for paper in &cluster.papers {
        for mention in partition.paper_mentions(paper) {
            let owner = partition.cluster_of(*mention);
            if owner != cluster.id {
                coauthors.insert(owner);
            }
        }
    }
    coauthors
}

fn shared_coauthor_count(partition: &Partition, a: &Cluster, b: &Cluster) -> usize {
    let coauthors_a = coauthor_clusters(partition, a);
    let coauthors_b = coauthor_clusters(partition, b);
    coauthors_a.intersection(&coauthors_b).count()
}
