//! Shared corpus builders for integration tests

use impute_core::{Mention, MentionId, Partition};
use impute_names::{parse, NameFrequencyModel};

/// Mention with a parsed name and no truth label.
pub fn make_mention(id: u32, raw: &str, paper: &str) -> Mention {
    Mention::new(
        MentionId(id),
        parse(raw).unwrap(),
        paper.to_string(),
        None,
        raw.to_string(),
    )
}

/// Partition of singleton clusters built from (raw name, paper) rows.
pub fn make_partition(rows: &[(&str, &str)]) -> Partition {
    let mentions = rows
        .iter()
        .enumerate()
        .map(|(i, (raw, paper))| make_mention(i as u32, raw, paper))
        .collect();
    Partition::from_mentions(mentions)
}

/// Frequency model trained on one parsed name per raw string.
pub fn make_model(raws: &[&str]) -> NameFrequencyModel {
    let names: Vec<_> = raws.iter().map(|raw| parse(raw).unwrap()).collect();
    NameFrequencyModel::train(&names)
}
