//! The five-pass merge pipeline
//!
//! Passes run in a fixed order: a name-only bootstrap within token blocks, a
//! collective pass adding coauthor evidence over the same retained blocks,
//! then three fold-in passes over the whole shrunk partition that mutate a
//! cluster's name to expose merges the original spelling hid. Fold-in
//! mutations commit only together with a merge; otherwise they roll back.

use std::collections::{BTreeMap, BTreeSet};

use impute_names::{
    compatible, parse, same_first_last_initials, AuthorName, NameFrequencyModel, Named,
    Speller,
};

use crate::blocking::TokenBlocks;
use crate::cluster::{Cluster, ClusterId};
use crate::config::{ImputeConfig, LikelihoodPair};
use crate::engine::MergeContext;
use crate::registry::Partition;
use crate::scoring::{bayesian_update, Scorer};

/// Runs the merge passes over one partition.
///
/// The configuration must already have passed [`ImputeConfig::validate`];
/// the scorer asserts rather than recovers if a likelihood table is broken.
pub struct Pipeline<'a> {
    config: &'a ImputeConfig,
    scorer: Scorer<'a>,
    retained: Vec<MergeContext>,
}

impl<'a> Pipeline<'a> {
    pub fn new(config: &'a ImputeConfig, model: &'a NameFrequencyModel) -> Self {
        Self {
            config,
            scorer: Scorer::new(model, &config.scoring),
            retained: Vec::new(),
        }
    }

    /// Run all five passes in order.
    pub fn run(&mut self, partition: &mut Partition) {
        tracing::info!("Resolving {} mentions", partition.num_mentions());
        self.bootstrap(partition);
        self.collective(partition);
        self.drop_first_names(partition);
        self.drop_hyphenated_surnames(partition);
        self.correct_spellings(partition);
        partition.assign_final_names();
        tracing::info!(
            "Resolution complete: {} clusters from {} mentions",
            partition.num_clusters(),
            partition.num_mentions()
        );
    }

    /// Pass 1: name evidence only, within token blocks. The per-block
    /// contexts are retained for the collective pass.
    pub fn bootstrap(&mut self, partition: &mut Partition) {
        let blocks = TokenBlocks::build(partition);
        self.retained.clear();
        for (_, members) in blocks.iter() {
            let context = MergeContext::from_block(partition, members);
            context.run_merge(
                partition,
                |_, a, b| self.scorer.name_prior(a, b),
                self.config.thresholds.instant_merge,
                self.config.thresholds.bootstrap,
            );
            self.retained.push(context);
        }
        tracing::info!(
            "Bootstrap merge: {} clusters live across {} blocks",
            partition.num_clusters(),
            self.retained.len()
        );
    }

    /// Pass 2: coauthor evidence over the contexts retained from bootstrap.
    pub fn collective(&self, partition: &mut Partition) {
        for context in &self.retained {
            context.run_merge(
                partition,
                |p, a, b| self.scorer.collective_posterior(p, a, b),
                self.config.thresholds.instant_merge,
                self.config.thresholds.merge,
            );
        }
        tracing::info!(
            "Collective merge: {} clusters live",
            partition.num_clusters()
        );
    }

    /// Pass 3: demote the first name in favor of the first middle name and
    /// look for targets under the changed token. Sources carry a bare
    /// initial plus at least one middle name; targets must themselves carry
    /// a spelled-out first name.
    pub fn drop_first_names(&self, partition: &mut Partition) -> usize {
        let merges = self.fold_in(
            partition,
            self.config.scoring.drop_first_name,
            |source| {
                source.first_name().chars().count() == 1 && source.can_drop_first_name()
            },
            Cluster::drop_first_name,
            |target| target.first_name().chars().count() > 1,
        );
        tracing::info!(
            "First-name fold-in: {} merges, {} clusters live",
            merges,
            partition.num_clusters()
        );
        merges
    }

    /// Pass 4: strip the trailing half of a hyphenated surname. Any
    /// same-token cluster is an eligible target.
    pub fn drop_hyphenated_surnames(&self, partition: &mut Partition) -> usize {
        let merges = self.fold_in(
            partition,
            self.config.scoring.drop_hyphenated_surname,
            Cluster::has_hyphenated_last_name,
            Cluster::drop_hyphenated_last_name,
            |_| true,
        );
        tracing::info!(
            "Hyphenated-surname fold-in: {} merges, {} clusters live",
            merges,
            partition.num_clusters()
        );
        merges
    }

    /// Shared fold-in shape for passes 3 and 4: snapshot and mutate each
    /// qualifying cluster's name, seek the best target in the block of the
    /// changed token, and either merge or restore the snapshot. Blocks are
    /// built once per pass; liveness and compatibility are re-checked at
    /// use.
    fn fold_in(
        &self,
        partition: &mut Partition,
        pair: LikelihoodPair,
        can_mutate: impl Fn(&Cluster) -> bool,
        mutate: impl Fn(&mut Cluster),
        eligible_target: impl Fn(&Cluster) -> bool,
    ) -> usize {
        let blocks = TokenBlocks::build(partition);
        let sources = partition.live_cluster_ids();
        let mut merges = 0;

        for source_id in sources {
            if !partition.is_live(source_id) {
                continue;
            }
            {
                let Some(source) = partition.cluster_mut(source_id) else {
                    continue;
                };
                if !can_mutate(source) {
                    continue;
                }
                source.snapshot_name();
                mutate(source);
            }
            let Some(token) = partition.cluster(source_id).map(|c| c.token()) else {
                continue;
            };

            let mut best: Option<(f64, ClusterId)> = None;
            for &target_id in blocks.get(&token) {
                if target_id == source_id || !partition.is_live(target_id) {
                    continue;
                }
                let (Some(source), Some(target)) =
                    (partition.cluster(source_id), partition.cluster(target_id))
                else {
                    continue;
                };
                if !eligible_target(target) {
                    continue;
                }
                let collective = self.scorer.collective_posterior(partition, source, target);
                if collective == 0.0 {
                    continue;
                }
                let revised = bayesian_update(collective, pair.given_match, pair.given_nonmatch);
                if best.as_ref().map_or(true, |(top, _)| revised > *top) {
                    best = Some((revised, target_id));
                }
            }

            match best {
                Some((posterior, target_id))
                    if posterior > self.config.thresholds.merge =>
                {
                    if let Some(source) = partition.cluster_mut(source_id) {
                        source.commit_name();
                    }
                    partition.merge(source_id, target_id);
                    merges += 1;
                }
                _ => {
                    if let Some(source) = partition.cluster_mut(source_id) {
                        source.restore_name();
                    }
                }
            }
        }
        merges
    }

    /// Pass 5: find clusters whose full name is one edit from a name some
    /// single other cluster is known by, and fold the smaller into the
    /// larger when the evidence holds up. The mutation and merge are
    /// decided together, so this pass has no revert step.
    pub fn correct_spellings(&self, partition: &mut Partition) -> usize {
        let mut vocabulary: BTreeMap<String, Vec<ClusterId>> = BTreeMap::new();
        for cluster in partition.clusters() {
            for variant in cluster.name_variants() {
                vocabulary.entry(variant).or_default().push(cluster.id);
            }
        }
        let speller = Speller::new(vocabulary.keys().cloned());
        let live = partition.live_cluster_ids();
        let mut merges = 0;

        for cluster_id in live {
            if !partition.is_live(cluster_id) {
                continue;
            }
            let Some(cluster) = partition.cluster(cluster_id) else {
                continue;
            };
            let full_name = cluster.full_name();
            let own_mentions = cluster.num_mentions();

            let mut qualified: BTreeSet<ClusterId> = BTreeSet::new();
            for candidate in speller.candidates(&full_name) {
                if !same_first_last_initials(&full_name, &candidate) {
                    continue;
                }
                let Ok(candidate_name) = parse(&candidate) else {
                    continue;
                };
                let Some(holders) = vocabulary.get(&candidate) else {
                    continue;
                };
                for &other_id in holders {
                    if other_id == cluster_id || !partition.is_live(other_id) {
                        continue;
                    }
                    let Some(other) = partition.cluster(other_id) else {
                        continue;
                    };
                    if compatible(other, &candidate_name) {
                        qualified.insert(other_id);
                    }
                }
            }

            let mut qualified_iter = qualified.into_iter();
            let other_id = match (qualified_iter.next(), qualified_iter.next()) {
                (Some(id), None) => id,
                _ => continue,
            };

            let Some(other) = partition.cluster(other_id) else {
                continue;
            };
            let (wrong_id, right_id) = if other.num_mentions() <= own_mentions {
                (other_id, cluster_id)
            } else {
                (cluster_id, other_id)
            };
            let (Some(wrong), Some(right)) =
                (partition.cluster(wrong_id), partition.cluster(right_id))
            else {
                continue;
            };
            if wrong.shares_paper(right) {
                continue;
            }

            let posterior = self.scorer.spelling_posterior(partition, right, wrong);
            if posterior > self.config.thresholds.merge {
                let right_name = AuthorName {
                    first: right.first_name().to_string(),
                    middles: right.middle_names().to_vec(),
                    last: right.last_name().to_string(),
                    suffix: None,
                };
                if let Some(wrong_cluster) = partition.cluster_mut(wrong_id) {
                    wrong_cluster.adopt_spelling(&right_name);
                }
                partition.merge(wrong_id, right_id);
                merges += 1;
            }
        }
        tracing::info!(
            "Spelling fold-in: {} merges, {} clusters live",
            merges,
            partition.num_clusters()
        );
        merges
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mention::{Mention, MentionId};

    fn make_partition(rows: &[(&str, &str)]) -> Partition {
        let mentions = rows
            .iter()
            .enumerate()
            .map(|(i, (raw, paper))| {
                Mention::new(
                    MentionId(i as u32),
                    parse(raw).unwrap(),
                    paper.to_string(),
                    None,
                    raw.to_string(),
                )
            })
            .collect();
        Partition::from_mentions(mentions)
    }

    fn make_model(partition: &Partition) -> NameFrequencyModel {
        NameFrequencyModel::train(partition.mentions().iter().map(|m| &m.name))
    }

    #[test]
    fn test_bootstrap_merges_within_block_and_retains_contexts() {
        let mut partition = make_partition(&[
            ("John Smith", "p1"),
            ("J. Smith", "p2"),
            ("Karen White", "p3"),
        ]);
        let model = make_model(&partition);
        let mut config = ImputeConfig::default();
        config.scoring.expected_authors = 100;
        config.thresholds.bootstrap = 0.005;
        let mut pipeline = Pipeline::new(&config, &model);

        pipeline.bootstrap(&mut partition);

        assert_eq!(partition.num_clusters(), 2);
        assert_eq!(partition.cluster_of(MentionId(0)), ClusterId(1));
        let survivor = partition.cluster(ClusterId(1)).unwrap();
        assert_eq!(survivor.full_name(), "john smith");
        assert_eq!(pipeline.retained.len(), 2);
    }

    #[test]
    fn test_fold_in_restores_name_when_no_target_qualifies() {
        let mut partition = make_partition(&[
            ("J. Charles Smith", "p1"),
            ("Karen White", "p2"),
        ]);
        let model = make_model(&partition);
        let config = ImputeConfig::default();
        let pipeline = Pipeline::new(&config, &model);

        let merges = pipeline.drop_first_names(&mut partition);

        assert_eq!(merges, 0);
        assert_eq!(partition.num_clusters(), 2);
        let cluster = partition.cluster(ClusterId(0)).unwrap();
        assert_eq!(cluster.full_name(), "j charles smith");
        assert_eq!(cluster.token(), "smith_j");
    }

    #[test]
    fn test_spelled_out_first_name_is_not_droppable() {
        let mut partition = make_partition(&[
            ("John Charles Smith", "p1"),
            ("Charles Smith", "p2"),
        ]);
        let model = make_model(&partition);
        let mut config = ImputeConfig::default();
        config.scoring.expected_authors = 10;
        let pipeline = Pipeline::new(&config, &model);

        assert_eq!(pipeline.drop_first_names(&mut partition), 0);
        assert_eq!(partition.num_clusters(), 2);
    }

    #[test]
    fn test_drop_first_name_merges_into_spelled_out_target() {
        let mut partition = make_partition(&[
            ("J. Charles Smith", "p1"),
            ("Charles Smith", "p2"),
        ]);
        let model = make_model(&partition);
        let mut config = ImputeConfig::default();
        config.scoring.expected_authors = 10;
        let pipeline = Pipeline::new(&config, &model);

        let merges = pipeline.drop_first_names(&mut partition);

        assert_eq!(merges, 1);
        assert_eq!(partition.num_clusters(), 1);
        assert_eq!(partition.cluster_of(MentionId(0)), ClusterId(1));
        let survivor = partition.cluster(ClusterId(1)).unwrap();
        assert_eq!(survivor.full_name(), "charles smith");
    }

    #[test]
    fn test_spelling_corrects_and_merges_smaller_cluster() {
        // "Jon Doe" twice, "John Doe" five times, one coauthor appearing
        // with each of them on different papers.
        let mut partition = make_partition(&[
            ("Jon Doe", "p1"),
            ("Jon Doe", "p2"),
            ("John Doe", "p3"),
            ("John Doe", "p4"),
            ("John Doe", "p5"),
            ("John Doe", "p6"),
            ("John Doe", "p7"),
            ("Karen White", "p1"),
            ("Karen White", "p3"),
        ]);
        partition.merge(ClusterId(1), ClusterId(0));
        for source in 3..=6 {
            partition.merge(ClusterId(source), ClusterId(2));
        }
        partition.merge(ClusterId(8), ClusterId(7));

        let model = make_model(&partition);
        let config = ImputeConfig::default();
        let pipeline = Pipeline::new(&config, &model);

        let merges = pipeline.correct_spellings(&mut partition);

        assert_eq!(merges, 1);
        assert!(!partition.is_live(ClusterId(0)));
        assert_eq!(partition.cluster_of(MentionId(0)), ClusterId(2));
        let survivor = partition.cluster(ClusterId(2)).unwrap();
        assert_eq!(survivor.full_name(), "john doe");
        assert_eq!(survivor.num_mentions(), 7);
    }

    #[test]
    fn test_spelling_skips_ambiguous_and_shared_paper_pairs() {
        // "Jon Doe" sits one edit from both "John Doe" and "Jan Doe", and
        // shares a paper with each, so no pairing survives the filters even
        // with a permissive threshold.
        let mut partition = make_partition(&[
            ("Jon Doe", "p1"),
            ("John Doe", "p1"),
            ("Jan Doe", "p1"),
        ]);
        let model = make_model(&partition);
        let mut config = ImputeConfig::default();
        config.thresholds.merge = 0.04;
        let pipeline = Pipeline::new(&config, &model);

        let merges = pipeline.correct_spellings(&mut partition);

        assert_eq!(merges, 0);
        assert_eq!(partition.num_clusters(), 3);
    }
}
