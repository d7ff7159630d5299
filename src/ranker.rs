/// One row of a ranked report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedRow<K> {
    pub key: K,
    pub total: u64,
}

/// Order totals by value, largest first
///
/// The sort is stable, so entries with equal totals keep the order they
/// were supplied in (reference-table order for the engine's totals).
pub fn rank<K>(totals: impl IntoIterator<Item = (K, u64)>) -> Vec<RankedRow<K>> {
    let mut entries: Vec<(K, u64)> = totals.into_iter().collect();
    entries.sort_by(|(_, a), (_, b)| b.cmp(a));

    entries
        .into_iter()
        .map(|(key, total)| RankedRow { key, total })
        .collect()
}
