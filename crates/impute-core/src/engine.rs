//! Agglomerative merge engine
//!
//! A [`MergeContext`] wraps one block of clusters with a pairwise
//! compatibility cache over their seed mentions, built once when the block
//! is formed. Contexts outlive the pass that created them: the collective
//! pass reuses the bootstrap contexts, scoring only whichever of their
//! members are still live.

use std::collections::{BTreeMap, BTreeSet};

use impute_names::compatible;

use crate::cluster::{Cluster, ClusterId};
use crate::mention::MentionId;
use crate::registry::Partition;

/// Scoring function over a pair of live clusters.
pub type ScoreFn<'a> = dyn Fn(&Partition, &Cluster, &Cluster) -> f64 + 'a;

/// One block's worth of merge candidates.
///
/// Built while every member is still the singleton cluster of its seed
/// mention, so the compatibility cache is keyed by mention id and stays
/// valid as clusters widen or die.
#[derive(Debug, Clone)]
pub struct MergeContext {
    members: Vec<ClusterId>,
    compat: BTreeMap<MentionId, BTreeSet<MentionId>>,
}

impl MergeContext {
    pub fn from_block(partition: &Partition, members: &[ClusterId]) -> Self {
        let seeds: Vec<MentionId> = members.iter().map(|c| MentionId(c.0)).collect();
        let mut compat: BTreeMap<MentionId, BTreeSet<MentionId>> = BTreeMap::new();
        for (i, &ma) in seeds.iter().enumerate() {
            for &mb in &seeds[i + 1..] {
                if compatible(partition.mention(ma), partition.mention(mb)) {
                    compat.entry(ma).or_default().insert(mb);
                    compat.entry(mb).or_default().insert(ma);
                }
            }
        }
        Self {
            members: members.to_vec(),
            compat,
        }
    }

    pub fn members(&self) -> &[ClusterId] {
        &self.members
    }

    /// Whether the seed mentions of two members were compatible when the
    /// context was built.
    pub fn admissible(&self, a: ClusterId, b: ClusterId) -> bool {
        self.compat
            .get(&MentionId(a.0))
            .map_or(false, |set| set.contains(&MentionId(b.0)))
    }

    /// Single greedy linear sweep: for each member in order, merge it into
    /// the first later member scoring above the instant threshold, then move
    /// on. Collapses near-duplicates cheaply before full rescoring.
    pub fn merge_sweep(
        &self,
        partition: &mut Partition,
        score: &ScoreFn,
        instant_threshold: f64,
    ) {
        for i in 0..self.members.len() {
            let source = self.members[i];
            if !partition.is_live(source) {
                continue;
            }
            for j in (i + 1)..self.members.len() {
                let target = self.members[j];
                if !partition.is_live(target) || !self.admissible(source, target) {
                    continue;
                }
                let value = match (partition.cluster(source), partition.cluster(target)) {
                    (Some(a), Some(b)) => score(partition, a, b),
                    _ => continue,
                };
                if value > instant_threshold {
                    partition.merge(source, target);
                    break;
                }
            }
        }
    }

    /// Score every admissible live pair, and merge the single best if it
    /// exceeds the threshold. Ties keep the earliest pair in member order.
    /// Returns whether a merge happened.
    pub fn merge_best(
        &self,
        partition: &mut Partition,
        score: &ScoreFn,
        threshold: f64,
    ) -> bool {
        let mut best: Option<(f64, ClusterId, ClusterId)> = None;
        for i in 0..self.members.len() {
            let source = self.members[i];
            if !partition.is_live(source) {
                continue;
            }
            for j in (i + 1)..self.members.len() {
                let target = self.members[j];
                if !partition.is_live(target) || !self.admissible(source, target) {
                    continue;
                }
                let value = match (partition.cluster(source), partition.cluster(target)) {
                    (Some(a), Some(b)) => score(partition, a, b),
                    _ => continue,
                };
                if best.as_ref().map_or(true, |(top, _, _)| value > *top) {
                    best = Some((value, source, target));
                }
            }
        }

        match best {
            Some((value, source, target)) if value > threshold => {
                partition.merge(source, target);
                true
            }
            _ => false,
        }
    }

    /// Sweep once, then merge best pairs to a fixpoint.
    pub fn run_merge<F>(
        &self,
        partition: &mut Partition,
        score: F,
        instant_threshold: f64,
        threshold: f64,
    ) where
        F: Fn(&Partition, &Cluster, &Cluster) -> f64,
    {
        self.merge_sweep(partition, &score, instant_threshold);
        while self.merge_best(partition, &score, threshold) {}
    }

    /// Group the context's seed mentions into mutually compatible sets:
    /// each mention joins the first group it is compatible with in full, or
    /// starts a new one. A pruning aid for oversized blocks; the pipeline
    /// does not currently call it.
    pub fn partition_by_compatibility(
        &self,
        partition: &Partition,
    ) -> Vec<BTreeSet<MentionId>> {
        let mut groups: Vec<BTreeSet<MentionId>> = Vec::new();
        for member in &self.members {
            let seed = MentionId(member.0);
            let mention = partition.mention(seed);
            let found = groups.iter_mut().find(|group| {
                group
                    .iter()
                    .all(|other| compatible(mention, partition.mention(*other)))
            });
            match found {
                Some(group) => {
                    group.insert(seed);
                }
                None => {
                    groups.push(BTreeSet::from([seed]));
                }
            }
        }
        groups
    }
}

/// Whether every group of `finer` sits inside some group of `coarser`.
pub fn stricter_than(finer: &[BTreeSet<MentionId>], coarser: &[BTreeSet<MentionId>]) -> bool {
    finer
        .iter()
        .all(|group| coarser.iter().any(|outer| group.is_subset(outer)))
}

/// Whether two compatibility groupings describe the same partition.
pub fn equivalent(a: &[BTreeSet<MentionId>], b: &[BTreeSet<MentionId>]) -> bool {
    stricter_than(a, b) && stricter_than(b, a)
}
