//! Clusters of mentions believed to denote one author

use std::collections::BTreeSet;

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use impute_names::{compatible_part, Named};

use crate::mention::{Mention, MentionId};

lazy_static! {
    static ref HYPHENATED_TAIL: Regex = Regex::new(r"-\w+$").unwrap();
}

/// Identifier of a cluster within a partition
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct ClusterId(pub u32);

#[derive(Debug, Clone, Serialize, Deserialize)]
struct NameSnapshot {
    first: String,
    middles: Vec<String>,
    last: String,
}

/// A group of mentions carrying the widest name form seen among them.
///
/// The name fields are mutated by the fold-in passes; `snapshot_name` and
/// `restore_name` bracket speculative mutations so a rejected merge leaves
/// the cluster bit-for-bit as it was.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cluster {
    pub id: ClusterId,
    pub mentions: BTreeSet<MentionId>,
    pub papers: BTreeSet<String>,
    first: String,
    middles: Vec<String>,
    last: String,
    backup: Option<NameSnapshot>,
}

impl Cluster {
    /// Seed a singleton cluster from one mention.
    pub fn from_mention(id: ClusterId, mention: &Mention) -> Self {
        Self {
            id,
            mentions: BTreeSet::from([mention.id]),
            papers: BTreeSet::from([mention.paper.clone()]),
            first: mention.first_name().to_string(),
            middles: mention.middle_names().to_vec(),
            last: mention.last_name().to_string(),
            backup: None,
        }
    }

    pub fn num_mentions(&self) -> usize {
        self.mentions.len()
    }

    /// Absorb another cluster: union mentions and papers, and widen the
    /// given-name components to the longer of the two forms. Ties keep this
    /// cluster's form. The surname is never widened; merges only join
    /// clusters whose surnames already agree.
    pub fn extend(&mut self, other: &Cluster) {
        self.mentions.extend(other.mentions.iter().copied());
        self.papers.extend(other.papers.iter().cloned());

        if other.first.len() > self.first.len() {
            self.first = other.first.clone();
        }
        if other.middles.len() > self.middles.len() {
            self.middles = other.middles.clone();
        } else if other.middles.len() == self.middles.len() {
            for (mine, theirs) in self.middles.iter_mut().zip(&other.middles) {
                if theirs.len() > mine.len() {
                    *mine = theirs.clone();
                }
            }
        }
    }

    /// True when the two clusters have at least one paper in common.
    pub fn shares_paper(&self, other: &Cluster) -> bool {
        self.papers.intersection(&other.papers).next().is_some()
    }

    // ===== Speculative name mutations =====

    /// Save the current name so a speculative mutation can be undone.
    pub fn snapshot_name(&mut self) {
        self.backup = Some(NameSnapshot {
            first: self.first.clone(),
            middles: self.middles.clone(),
            last: self.last.clone(),
        });
    }

    /// Undo the last speculative mutation.
    pub fn restore_name(&mut self) {
        if let Some(snapshot) = self.backup.take() {
            self.first = snapshot.first;
            self.middles = snapshot.middles;
            self.last = snapshot.last;
        }
    }

    /// Keep the current name and discard the saved one.
    pub fn commit_name(&mut self) {
        self.backup = None;
    }

    /// Whether the leading given name could have been omitted: requires a
    /// middle name to promote.
    pub fn can_drop_first_name(&self) -> bool {
        !self.middles.is_empty()
    }

    /// Drop the leading given name, promoting the first middle name.
    pub fn drop_first_name(&mut self) {
        if !self.middles.is_empty() {
            self.first = self.middles.remove(0);
        }
    }

    pub fn has_hyphenated_last_name(&self) -> bool {
        self.last.contains('-')
    }

    /// Drop the trailing half of a hyphenated surname.
    pub fn drop_hyphenated_last_name(&mut self) {
        self.last = HYPHENATED_TAIL.replace(&self.last, "").into_owned();
    }

    /// Overwrite this cluster's name with a correctly spelled one. The first
    /// name survives when it is still compatible with the corrected form, so
    /// a spelled-out first name is not clobbered by an initial.
    pub fn adopt_spelling(&mut self, right: &impl Named) {
        if !compatible_part(right.first_name(), &self.first) {
            self.first = right.first_name().to_string();
        }
        if right.middle_names() != self.middles {
            self.middles = right.middle_names().to_vec();
        }
        if right.last_name() != self.last {
            self.last = right.last_name().to_string();
        }
    }
}

impl Named for Cluster {
    fn first_name(&self) -> &str {
        &self.first
    }

    fn middle_names(&self) -> &[String] {
        &self.middles
    }

    fn last_name(&self) -> &str {
        &self.last
    }
}
