//! Token blocking: candidate pairs only form within a block

use std::collections::BTreeMap;

use impute_names::Named;

use crate::cluster::ClusterId;
use crate::registry::Partition;

/// Live clusters grouped by their blocking token (surname plus first
/// initial). Only clusters sharing a token are ever compared, so each merge
/// pass works one block at a time.
#[derive(Debug, Clone)]
pub struct TokenBlocks {
    blocks: BTreeMap<String, Vec<ClusterId>>,
}

impl TokenBlocks {
    /// Group the partition's live clusters by token. Blocks list cluster
    /// ids in ascending order.
    pub fn build(partition: &Partition) -> Self {
        let mut blocks: BTreeMap<String, Vec<ClusterId>> = BTreeMap::new();
        for cluster in partition.clusters() {
            blocks.entry(cluster.token()).or_default().push(cluster.id);
        }
        Self { blocks }
    }

    pub fn get(&self, token: &str) -> &[ClusterId] {
        self.blocks.get(token).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Blocks in ascending token order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[ClusterId])> {
        self.blocks.iter().map(|(token, ids)| (token.as_str(), ids.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mention::{Mention, MentionId};
    use impute_names::parse;

    fn make_partition(raws: &[&str]) -> Partition {
        let mentions = raws
            .iter()
            .enumerate()
            .map(|(i, raw)| {
                Mention::new(
                    MentionId(i as u32),
                    parse(raw).unwrap(),
                    format!("p{}", i),
                    None,
                    raw.to_string(),
                )
            })
            .collect();
        Partition::from_mentions(mentions)
    }

    #[test]
    fn test_blocks_group_by_token() {
        let partition =
            make_partition(&["John Smith", "J. Smith", "Jane Smith", "Karen White"]);
        let blocks = TokenBlocks::build(&partition);

        assert_eq!(blocks.len(), 2);
        assert_eq!(
            blocks.get("smith_j"),
            &[ClusterId(0), ClusterId(1), ClusterId(2)]
        );
        assert_eq!(blocks.get("white_k"), &[ClusterId(3)]);
        assert!(blocks.get("brown_a").is_empty());
    }

    #[test]
    fn test_rebuild_after_merge_drops_dead_clusters() {
        let mut partition = make_partition(&["John Smith", "J. Smith"]);
        partition.merge(ClusterId(1), ClusterId(0));

        let blocks = TokenBlocks::build(&partition);
        assert_eq!(blocks.get("smith_j"), &[ClusterId(0)]);
    }

    #[test]
    fn test_iteration_is_sorted_by_token() {
        let partition = make_partition(&["Karen White", "John Smith", "Ann Brown"]);
        let blocks = TokenBlocks::build(&partition);
        let tokens: Vec<&str> = blocks.iter().map(|(t, _)| t).collect();
        assert_eq!(tokens, vec!["brown_a", "smith_j", "white_k"]);
    }
}
