use std::collections::HashMap;
use crate::types::{LeaderboardEntry, PlanetId, TradeEvent};

/// Groups trades by planet, summing volume and counting trades, then sorts
/// by total volume descending. The sort is stable: equal totals list
/// planets with integer ids first in ascending numeric order, then the
/// remaining planets in order of first occurrence.
pub fn compute_leaderboard<'a, I>(events: I) -> Vec<LeaderboardEntry>
where
    I: IntoIterator<Item = &'a TradeEvent>,
{
    let mut index: HashMap<&PlanetId, usize> = HashMap::new();
    let mut entries: Vec<LeaderboardEntry> = Vec::new();

    for event in events {
        let slot = *index.entry(&event.planet_id).or_insert_with(|| {
            entries.push(LeaderboardEntry::new(event.planet_id.clone()));
            entries.len() - 1
        });

        let entry = &mut entries[slot];
        entry.sum_transaction_value += event.volume;
        entry.number_of_transactions += 1;
    }

    entries.sort_by_key(|entry| match numeric_key(entry.planet_id.as_str()) {
        Some(n) => (0, n),
        None => (1, 0),
    });
    entries.sort_by(|a, b| b.sum_transaction_value.total_cmp(&a.sum_transaction_value));
    entries
}

/// Canonical decimal ids below `u32::MAX` ("7", not "07" or "+7").
fn numeric_key(id: &str) -> Option<u32> {
    let n: u32 = id.parse().ok()?;
    (n != u32::MAX && n.to_string() == id).then_some(n)
}
