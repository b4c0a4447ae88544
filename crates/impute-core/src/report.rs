//! Resolution output and ground-truth diagnostics
//!
//! The assignment listing orders clusters by final name and numbers them
//! from one. The diagnostics are keyed by final name strings rather than
//! cluster ids: two clusters that end up with identical final names read as
//! one predicted identity.

use std::collections::BTreeMap;
use std::io::Write;

use impute_names::Named;

use crate::cluster::Cluster;
use crate::mention::Mention;
use crate::registry::Partition;
use crate::Result;

fn assigned_name_of(partition: &Partition, mention: &Mention) -> String {
    mention.assigned_name.clone().unwrap_or_else(|| {
        partition
            .cluster(partition.cluster_of(mention.id))
            .map(|cluster| cluster.full_name())
            .unwrap_or_default()
    })
}

/// Write one line per mention: `clusterOrdinal \t originalName \t paperId`.
/// Clusters are ordered by final name, mentions within a cluster by their
/// original string.
pub fn write_assignments<W: Write>(partition: &Partition, mut writer: W) -> Result<()> {
    let mut clusters: Vec<&Cluster> = partition.clusters().collect();
    clusters.sort_by_key(|cluster| (cluster.full_name(), cluster.id));

    for (index, cluster) in clusters.iter().enumerate() {
        let mut members: Vec<&Mention> = cluster
            .mentions
            .iter()
            .map(|id| partition.mention(*id))
            .collect();
        members.sort_by(|a, b| a.original.cmp(&b.original).then(a.id.cmp(&b.id)));
        for mention in members {
            writeln!(writer, "{}\t{}\t{}", index + 1, mention.original, mention.paper)?;
        }
    }
    Ok(())
}

/// Ground-truth authors whose mentions ended up under more than one final
/// name, with the names they were scattered across.
pub fn merges_needed(partition: &Partition) -> BTreeMap<String, Vec<String>> {
    let mut names_by_truth: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for mention in partition.mentions() {
        let Some(truth) = &mention.truth else {
            continue;
        };
        let name = assigned_name_of(partition, mention);
        let names = names_by_truth.entry(truth.clone()).or_default();
        if !names.contains(&name) {
            names.push(name);
        }
    }

    names_by_truth.retain(|_, names| names.len() > 1);
    for names in names_by_truth.values_mut() {
        names.sort();
    }
    names_by_truth
}

pub fn write_merges_needed<W: Write>(partition: &Partition, mut writer: W) -> Result<()> {
    for (truth, names) in merges_needed(partition) {
        writeln!(writer, "{}\t{}", truth, names.join(", "))?;
    }
    Ok(())
}

/// Final names that span more than one ground-truth author, each with the
/// longest canonical mention name observed for every truth involved.
pub fn splits_needed(partition: &Partition) -> BTreeMap<String, Vec<String>> {
    let mut truths_by_name: BTreeMap<String, BTreeMap<String, String>> = BTreeMap::new();
    for mention in partition.mentions() {
        let Some(truth) = &mention.truth else {
            continue;
        };
        let name = assigned_name_of(partition, mention);
        let representative = truths_by_name
            .entry(name)
            .or_default()
            .entry(truth.clone())
            .or_default();
        let canonical = mention.full_name();
        if canonical.len() > representative.len() {
            *representative = canonical;
        }
    }

    truths_by_name
        .into_iter()
        .filter(|(_, truths)| truths.len() > 1)
        .map(|(name, truths)| (name, truths.into_values().collect()))
        .collect()
}

pub fn write_splits_needed<W: Write>(partition: &Partition, mut writer: W) -> Result<()> {
    for (name, representatives) in splits_needed(partition) {
        writeln!(writer, "{}\t{}", name, representatives.join(", "))?;
    }
    Ok(())
}

/// Best-case F-score against ground truth: for each true author, the best
/// F1 over all predicted name groups, weighted by the author's mention
/// count. `None` when the corpus carries no truth labels.
pub fn best_match_f_score(partition: &Partition) -> Option<f64> {
    let mut group_sizes: BTreeMap<String, usize> = BTreeMap::new();
    let mut by_truth: BTreeMap<&str, Vec<String>> = BTreeMap::new();
    for mention in partition.mentions() {
        let name = assigned_name_of(partition, mention);
        *group_sizes.entry(name.clone()).or_insert(0) += 1;
        if let Some(truth) = &mention.truth {
            by_truth.entry(truth).or_default().push(name);
        }
    }
    if by_truth.is_empty() {
        return None;
    }

    let total: usize = by_truth.values().map(Vec::len).sum();
    let mut weighted = 0.0;
    for names in by_truth.values() {
        let mut overlaps: BTreeMap<&str, usize> = BTreeMap::new();
        for name in names {
            *overlaps.entry(name.as_str()).or_insert(0) += 1;
        }
        let mut best: f64 = 0.0;
        for (name, overlap) in overlaps {
            let group = group_sizes.get(name).copied().unwrap_or(overlap);
            let precision = overlap as f64 / group as f64;
            let recall = overlap as f64 / names.len() as f64;
            best = best.max(2.0 * precision * recall / (precision + recall));
        }
        weighted += best * names.len() as f64;
    }
    Some(weighted / total as f64)
}
