//! Coauthor likelihood estimation from a truth-labeled corpus.
//!
//! The match table is the empirical distribution of shared-coauthor counts
//! between a mention's own paper and the rest of its true author's papers.
//! The non-match table is estimated by sampling random author pairs. Both
//! are raw frequencies, so a sparse corpus can leave zero bins that
//! `ImputeConfig::validate` will reject until smoothed by hand.

use std::collections::{BTreeMap, BTreeSet};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::{CorpusError, Result};
use crate::mention::Mention;

/// Shared-coauthor counts at or above `TABLE_LEN - 1` share the last bin.
pub const TABLE_LEN: usize = 5;

const NONMATCH_SAMPLES: usize = 100_000;

/// Estimated likelihood tables plus corpus shape numbers worth logging.
#[derive(Debug, Clone, PartialEq)]
pub struct EstimatedParameters {
    pub coauthor_match: Vec<f64>,
    pub coauthor_nonmatch: Vec<f64>,
    pub authors: usize,
    pub papers_per_author: f64,
}

impl EstimatedParameters {
    /// Render as a TOML fragment that `ImputeConfig::from_toml` accepts.
    pub fn to_toml_fragment(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "# estimated from {} authors, {:.2} papers per author\n",
            self.authors, self.papers_per_author
        ));
        out.push_str("[scoring]\n");
        out.push_str(&format!(
            "coauthor_match = {}\n",
            format_table(&self.coauthor_match)
        ));
        out.push_str(&format!(
            "coauthor_nonmatch = {}\n",
            format_table(&self.coauthor_nonmatch)
        ));
        out
    }
}

fn format_table(values: &[f64]) -> String {
    let cells: Vec<String> = values.iter().map(|v| format!("{:.4}", v)).collect();
    format!("[{}]", cells.join(", "))
}

/// Estimate coauthor likelihood tables from truth labels. Mentions without
/// a label are ignored; a corpus with none at all is an error.
pub fn estimate(mentions: &[Mention], seed: u64) -> Result<EstimatedParameters> {
    let mut author_papers: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
    let mut paper_authors: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
    for mention in mentions {
        let Some(truth) = &mention.truth else {
            continue;
        };
        author_papers
            .entry(truth)
            .or_default()
            .insert(&mention.paper);
        paper_authors
            .entry(&mention.paper)
            .or_default()
            .insert(truth);
    }
    if author_papers.is_empty() {
        return Err(CorpusError::Empty.into());
    }

    let mut match_counts = vec![0u64; TABLE_LEN];
    let mut total = 0u64;
    for mention in mentions {
        let Some(truth) = &mention.truth else {
            continue;
        };
        let mut others: BTreeSet<&str> = BTreeSet::new();
        for paper in &author_papers[truth.as_str()] {
            if *paper != mention.paper {
                others.extend(paper_authors[paper].iter().copied());
            }
        }
        others.remove(truth.as_str());
        let own = &paper_authors[mention.paper.as_str()];
        let shared = others.intersection(own).count().min(TABLE_LEN - 1);
        match_counts[shared] += 1;
        total += 1;
    }

    let coauthors_of: Vec<BTreeSet<&str>> = author_papers
        .iter()
        .map(|(author, papers)| {
            let mut set: BTreeSet<&str> = BTreeSet::new();
            for paper in papers {
                set.extend(paper_authors[paper].iter().copied());
            }
            set.remove(*author);
            set
        })
        .collect();

    let mut rng = StdRng::seed_from_u64(seed);
    let mut nonmatch_counts = vec![0u64; TABLE_LEN];
    for _ in 0..NONMATCH_SAMPLES {
        let first = &coauthors_of[rng.gen_range(0..coauthors_of.len())];
        let second = &coauthors_of[rng.gen_range(0..coauthors_of.len())];
        let shared = first.intersection(second).count().min(TABLE_LEN - 1);
        nonmatch_counts[shared] += 1;
    }

    let papers: usize = author_papers.values().map(BTreeSet::len).sum();
    Ok(EstimatedParameters {
        coauthor_match: match_counts
            .iter()
            .map(|count| *count as f64 / total as f64)
            .collect(),
        coauthor_nonmatch: nonmatch_counts
            .iter()
            .map(|count| *count as f64 / NONMATCH_SAMPLES as f64)
            .collect(),
        authors: author_papers.len(),
        papers_per_author: papers as f64 / author_papers.len() as f64,
    })
}
