use std::collections::BTreeMap;

use crate::models::FrequencyTable;

pub const OTHER_LABEL: &str = "other";

pub fn count_tags<I, S>(tags: I) -> BTreeMap<String, usize>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut counts = BTreeMap::new();
    for tag in tags {
        *counts.entry(tag.into()).or_insert(0) += 1;
    }
    counts
}

/// Folds every label seen fewer than `threshold` times into [`OTHER_LABEL`].
///
/// A real `"other"` tag is merged with the folded remainder. An empty input
/// stays empty.
pub fn bucket_long_tail(counts: BTreeMap<String, usize>, threshold: usize) -> FrequencyTable {
    let total = counts.values().sum();

    let (kept, tail): (BTreeMap<_, _>, BTreeMap<_, _>) = counts
        .into_iter()
        .partition(|(label, count)| *count >= threshold && label != OTHER_LABEL);

    let other: usize = tail.values().sum();
    let mut entries = kept;
    if !tail.is_empty() {
        entries.insert(OTHER_LABEL.to_string(), other);
    }

    FrequencyTable {
        threshold,
        total,
        entries,
    }
}

pub fn frequency_table<I, S>(tags: I, threshold: usize) -> FrequencyTable
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    bucket_long_tail(count_tags(tags), threshold)
}
