//! The evolving partition of mentions into clusters

use std::collections::BTreeMap;

use impute_names::Named;

use crate::cluster::{Cluster, ClusterId};
use crate::mention::{Mention, MentionId};

/// All mentions of a corpus, the live clusters over them, and the
/// mention-to-cluster assignment.
///
/// Mentions are immutable once loaded; merges remove a source cluster,
/// extend the target, and repoint the source's mentions. Mention ids index
/// the mention vector directly.
#[derive(Debug, Clone)]
pub struct Partition {
    mentions: Vec<Mention>,
    clusters: BTreeMap<ClusterId, Cluster>,
    assignment: Vec<ClusterId>,
    papers: BTreeMap<String, Vec<MentionId>>,
}

impl Partition {
    /// Seed one singleton cluster per mention. Cluster ids start out equal
    /// to the mention ids they wrap.
    pub fn from_mentions(mentions: Vec<Mention>) -> Self {
        let mut clusters = BTreeMap::new();
        let mut assignment = Vec::with_capacity(mentions.len());
        let mut papers: BTreeMap<String, Vec<MentionId>> = BTreeMap::new();

        for mention in &mentions {
            let cluster_id = ClusterId(mention.id.0);
            clusters.insert(cluster_id, Cluster::from_mention(cluster_id, mention));
            assignment.push(cluster_id);
            papers.entry(mention.paper.clone()).or_default().push(mention.id);
        }

        Self {
            mentions,
            clusters,
            assignment,
            papers,
        }
    }

    pub fn num_mentions(&self) -> usize {
        self.mentions.len()
    }

    pub fn num_clusters(&self) -> usize {
        self.clusters.len()
    }

    pub fn mentions(&self) -> &[Mention] {
        &self.mentions
    }

    pub fn mention(&self, id: MentionId) -> &Mention {
        &self.mentions[id.0 as usize]
    }

    pub fn cluster(&self, id: ClusterId) -> Option<&Cluster> {
        self.clusters.get(&id)
    }

    pub fn cluster_mut(&mut self, id: ClusterId) -> Option<&mut Cluster> {
        self.clusters.get_mut(&id)
    }

    pub fn is_live(&self, id: ClusterId) -> bool {
        self.clusters.contains_key(&id)
    }

    /// Live clusters in ascending id order.
    pub fn clusters(&self) -> impl Iterator<Item = &Cluster> {
        self.clusters.values()
    }

    pub fn live_cluster_ids(&self) -> Vec<ClusterId> {
        self.clusters.keys().copied().collect()
    }

    /// The live cluster currently holding a mention.
    pub fn cluster_of(&self, mention: MentionId) -> ClusterId {
        self.assignment[mention.0 as usize]
    }

    /// Mentions appearing on a paper, in id order.
    pub fn paper_mentions(&self, paper: &str) -> &[MentionId] {
        self.papers.get(paper).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Stamp every mention with the full name of its final cluster.
    /// Called once after the merge passes; purely output bookkeeping.
    pub fn assign_final_names(&mut self) {
        for i in 0..self.mentions.len() {
            let name = self
                .clusters
                .get(&self.assignment[i])
                .map(|cluster| cluster.full_name());
            self.mentions[i].assigned_name = name;
        }
    }

    /// Fold `source` into `target`: the target absorbs the source's mentions
    /// and papers, widens its name, and the source cluster dies. Both ids
    /// must be live; merging a cluster into itself is a no-op.
    pub fn merge(&mut self, source: ClusterId, target: ClusterId) {
        if source == target {
            return;
        }
        let Some(removed) = self.clusters.remove(&source) else {
            return;
        };
        let Some(survivor) = self.clusters.get_mut(&target) else {
            self.clusters.insert(source, removed);
            return;
        };
        survivor.extend(&removed);
        for mention in &removed.mentions {
            self.assignment[mention.0 as usize] = target;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use impute_names::{parse, Named};

    fn make_mentions(raws: &[(&str, &str)]) -> Vec<Mention> {
        raws.iter()
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
            .collect()
    }

    #[test]
    fn test_seeding_creates_singletons() {
        let partition = Partition::from_mentions(make_mentions(&[
            ("John Smith", "p1"),
            ("J. Smith", "p2"),
            ("Karen White", "p1"),
        ]));

        assert_eq!(partition.num_mentions(), 3);
        assert_eq!(partition.num_clusters(), 3);
        for i in 0..3 {
            assert_eq!(partition.cluster_of(MentionId(i)), ClusterId(i));
        }
        assert_eq!(
            partition.paper_mentions("p1"),
            &[MentionId(0), MentionId(2)]
        );
    }

    #[test]
    fn test_merge_repoints_and_widens() {
        let mut partition = Partition::from_mentions(make_mentions(&[
            ("J. Smith", "p1"),
            ("John Smith", "p2"),
        ]));

        partition.merge(ClusterId(1), ClusterId(0));

        assert_eq!(partition.num_clusters(), 1);
        assert!(!partition.is_live(ClusterId(1)));
        assert_eq!(partition.cluster_of(MentionId(1)), ClusterId(0));

        let survivor = partition.cluster(ClusterId(0)).unwrap();
        assert_eq!(survivor.full_name(), "john smith");
        assert_eq!(survivor.num_mentions(), 2);
        assert_eq!(survivor.papers.len(), 2);
    }

    #[test]
    fn test_assign_final_names() {
        let mut partition = Partition::from_mentions(make_mentions(&[
            ("J. Smith", "p1"),
            ("John Smith", "p2"),
            ("Karen White", "p3"),
        ]));
        partition.merge(ClusterId(0), ClusterId(1));
        partition.assign_final_names();

        assert_eq!(
            partition.mention(MentionId(0)).assigned_name.as_deref(),
            Some("john smith")
        );
        assert_eq!(
            partition.mention(MentionId(1)).assigned_name.as_deref(),
            Some("john smith")
        );
        assert_eq!(
            partition.mention(MentionId(2)).assigned_name.as_deref(),
            Some("karen white")
        );
    }

    #[test]
    fn test_merge_into_self_is_noop() {
        let mut partition =
            Partition::from_mentions(make_mentions(&[("John Smith", "p1")]));
        partition.merge(ClusterId(0), ClusterId(0));
        assert!(partition.is_live(ClusterId(0)));
        assert_eq!(partition.num_clusters(), 1);
    }

    #[test]
    fn test_merge_dead_source_is_noop() {
        let mut partition = Partition::from_mentions(make_mentions(&[
            ("John Smith", "p1"),
            ("J. Smith", "p2"),
        ]));
        partition.merge(ClusterId(1), ClusterId(0));
        partition.merge(ClusterId(1), ClusterId(0));
        assert_eq!(partition.num_clusters(), 1);
    }
}
