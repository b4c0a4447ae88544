//! Corpus loading: tab-separated mention records
//!
//! Each line is `paperId \t nameList` with an optional third ground-truth
//! author id column. The name field may list several authors separated by
//! commas and yields one mention per listed name; a field whose segments do
//! not stand alone as names reads as a single, possibly inverted
//! ("Smith, John") name. Records that cannot be split and names that cannot
//! be parsed are logged and skipped; only a corpus with no usable mentions
//! at all is an error.

use std::collections::BTreeSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use impute_names::parse;

use crate::error::{CorpusError, Result};
use crate::mention::{Mention, MentionId};

/// Counters from one corpus load
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CorpusStats {
    pub mentions: usize,
    pub papers: usize,
    pub skipped: usize,
    pub with_truth: usize,
}

/// Read mentions from tab-separated input. Mention ids are assigned in
/// input order, starting at zero; a multi-name field yields one mention per
/// listed name, all sharing the line's paper and truth ids.
pub fn read_mentions<R: Read>(reader: R) -> Result<(Vec<Mention>, CorpusStats)> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .from_reader(reader);

    let mut mentions = Vec::new();
    let mut papers: BTreeSet<String> = BTreeSet::new();
    let mut stats = CorpusStats::default();

    for (index, record) in csv_reader.records().enumerate() {
        let line = index + 1;
        let record = match record {
            Ok(record) => record,
            Err(err) => {
                tracing::warn!("Skipping line {}: {}", line, err);
                stats.skipped += 1;
                continue;
            }
        };

        let (paper, raw, truth) = match (record.get(0), record.get(1), record.len()) {
            (Some(paper), Some(raw), 2) => (paper, raw, None),
            (Some(paper), Some(raw), 3) => (
                paper,
                raw,
                record.get(2).filter(|truth| !truth.is_empty()),
            ),
            _ => {
                tracing::warn!("Skipping line {}: expected 2 or 3 fields", line);
                stats.skipped += 1;
                continue;
            }
        };

        for raw_name in split_name_field(raw) {
            match parse(raw_name) {
                Ok(name) => {
                    if truth.is_some() {
                        stats.with_truth += 1;
                    }
                    papers.insert(paper.to_string());
                    mentions.push(Mention::new(
                        MentionId(mentions.len() as u32),
                        name,
                        paper.to_string(),
                        truth.map(String::from),
                        raw_name.to_string(),
                    ));
                }
                Err(err) => {
                    tracing::warn!("Skipping name on line {}: {}", line, err);
                    stats.skipped += 1;
                }
            }
        }
    }

    if mentions.is_empty() {
        return Err(CorpusError::Empty.into());
    }
    stats.mentions = mentions.len();
    stats.papers = papers.len();
    Ok((mentions, stats))
}

/// Read mentions from a file on disk.
pub fn read_mentions_from_path<P: AsRef<Path>>(
    path: P,
) -> Result<(Vec<Mention>, CorpusStats)> {
    read_mentions(File::open(path)?)
}

/// Split a name field into its listed names. Commas separate authors only
/// when at least two comma-delimited segments stand alone as parseable
/// names; otherwise the whole field is one name, so an inverted
/// "Smith, John" still reads as a single mention.
fn split_name_field(raw: &str) -> Vec<&str> {
    let segments: Vec<&str> = raw
        .split(',')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .collect();
    if segments.len() < 2 {
        return vec![raw];
    }
    let standalone = segments
        .iter()
        .filter(|segment| parse(segment).is_ok())
        .count();
    if standalone > 1 {
        segments
    } else {
        vec![raw]
    }
}
