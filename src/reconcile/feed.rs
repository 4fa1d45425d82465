use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::ledger::models::UnifiedTransactionRecord;

/// Active record-type filter for the reconciled feed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeFilter {
    None,
    Sent,
    Received,
    Swap,
    /// Confirmed records
    Success,
    /// Unconfirmed records
    Pending,
    /// No failure state is tracked for settled records, so this filter is
    /// defined to match nothing.
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    Date,
    Amount,
    Coin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// Explicit feed parameters, passed in rather than read from UI state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedSettings {
    pub filter: TypeFilter,
    pub sort_field: SortField,
    pub direction: SortDirection,
}

impl Default for FeedSettings {
    fn default() -> Self {
        Self {
            filter: TypeFilter::None,
            sort_field: SortField::Date,
            direction: SortDirection::Descending,
        }
    }
}

pub fn apply_filter(records: &mut Vec<UnifiedTransactionRecord>, filter: TypeFilter) {
    use crate::ledger::models::RecordKind;
    match filter {
        TypeFilter::None => {}
        TypeFilter::Sent => records.retain(|r| matches!(r.kind, RecordKind::Sent(_))),
        TypeFilter::Received => records.retain(|r| matches!(r.kind, RecordKind::Received(_))),
        TypeFilter::Swap => records.retain(|r| matches!(r.kind, RecordKind::Swapped { .. })),
        TypeFilter::Success => records.retain(|r| r.is_confirmed()),
        TypeFilter::Pending => records.retain(|r| !r.is_confirmed()),
        TypeFilter::Failed => records.clear(),
    }
}

/// Stable sort of the feed; ties keep their prior relative order.
pub fn apply_sort(
    records: &mut [UnifiedTransactionRecord],
    field: SortField,
    direction: SortDirection,
) {
    match field {
        SortField::Date => {
            // Missing timestamps sort as "now": after every confirmed
            // record ascending, before every confirmed record descending.
            records.sort_by(|a, b| directed(date_key(a).cmp(&date_key(b)), direction));
        }
        SortField::Amount => {
            records.sort_by(|a, b| {
                directed(a.principal_amount().cmp(&b.principal_amount()), direction)
            });
        }
        SortField::Coin => sort_by_coin(records, direction),
    }
}

fn directed(ordering: Ordering, direction: SortDirection) -> Ordering {
    match direction {
        SortDirection::Ascending => ordering,
        SortDirection::Descending => ordering.reverse(),
    }
}

/// The coin sort only compares asset codes within matching kind variants;
/// records of differing kinds are equal under it and keep their slots.
/// Sorting each variant group in place preserves exactly that.
fn sort_by_coin(records: &mut [UnifiedTransactionRecord], direction: SortDirection) {
    let tags: Vec<u8> = records.iter().map(|r| r.kind.variant_tag()).collect();
    for tag in [0u8, 1, 2, 3] {
        let slots: Vec<usize> = tags
            .iter()
            .enumerate()
            .filter(|(_, t)| **t == tag)
            .map(|(i, _)| i)
            .collect();
        if slots.len() < 2 {
            continue;
        }
        let mut group: Vec<UnifiedTransactionRecord> =
            slots.iter().map(|&i| records[i].clone()).collect();
        group.sort_by(|a, b| directed(coin_key(a).cmp(&coin_key(b)), direction));
        for (slot, record) in slots.into_iter().zip(group) {
            records[slot] = record;
        }
    }
}

fn date_key(record: &UnifiedTransactionRecord) -> i64 {
    record.timestamp.unwrap_or(i64::MAX)
}

fn coin_key(record: &UnifiedTransactionRecord) -> &str {
    record
        .kind
        .principal_asset()
        .map(|asset| asset.symbol.as_str())
        .unwrap_or("")
}

/// Case-insensitive substring search over the already-reconciled list
///
/// Matches asset code, displayed amount, the note, and label text; it does
/// not re-run suppression.
pub fn search_records<'a>(
    records: &'a [UnifiedTransactionRecord],
    text: &str,
) -> Vec<&'a UnifiedTransactionRecord> {
    let needle = text.to_lowercase();
    if needle.is_empty() {
        return records.iter().collect();
    }
    records
        .iter()
        .filter(|record| {
            record
                .kind
                .principal_asset()
                .is_some_and(|asset| asset.symbol.to_lowercase().contains(&needle))
                || record
                    .amount
                    .is_some_and(|amount| amount.to_string().contains(&needle))
                || record.user_data.note.to_lowercase().contains(&needle)
                || record
                    .user_data
                    .labels
                    .iter()
                    .any(|label| label.to_lowercase().contains(&needle))
        })
        .collect()
}
