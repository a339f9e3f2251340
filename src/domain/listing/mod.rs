//! Listing domain — the derived, render-ready view of one fetched page.
//!
//! Everything here is pure: the source [`Page`] is only read, and the same
//! inputs always yield the same rows.

pub mod filter;
pub mod pagination;

use crate::domain::coin::{MarketEntry, Page};
use serde::{Deserialize, Serialize};

pub use filter::{CapClass, ChangeClass, FilterState};
pub use pagination::{PageCount, Pagination};

/// One rendered row of the market list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListRow {
    pub entry: MarketEntry,
    /// Server rank when present and non-zero, else the positional rank.
    pub display_rank: u64,
    /// True for the pinned entry at the head of page 1.
    pub featured: bool,
}

/// Index of the entry to pin: symbol equal to `featured`, or name containing
/// it, both case-insensitive. First match wins.
pub fn featured_position(entries: &[MarketEntry], featured: &str) -> Option<usize> {
    let needle = featured.trim().to_lowercase();
    if needle.is_empty() {
        return None;
    }
    entries.iter().position(|e| {
        e.symbol.to_lowercase() == needle || e.name.to_lowercase().contains(&needle)
    })
}

/// Page entries with the featured entry moved to the front.
///
/// Only the first page is eligible; any other page is returned in server order.
/// Returns the reordered sequence and whether a pin was applied.
pub fn pin_featured<'a>(
    entries: &'a [MarketEntry],
    pagination: Pagination,
    featured: Option<&str>,
) -> (Vec<&'a MarketEntry>, bool) {
    let mut ordered: Vec<&MarketEntry> = entries.iter().collect();
    if !pagination.is_first() {
        return (ordered, false);
    }
    let Some(pos) = featured.and_then(|f| featured_position(entries, f)) else {
        return (ordered, false);
    };
    let pinned = ordered.remove(pos);
    ordered.insert(0, pinned);
    (ordered, true)
}

/// Pin, filter and rank a page into the exact sequence to render.
pub fn derive_rows(
    page: &Page,
    filter: &FilterState,
    pagination: Pagination,
    featured: Option<&str>,
) -> Vec<ListRow> {
    let (ordered, pinned) = pin_featured(&page.entries, pagination, featured);
    let pinned_id = if pinned {
        ordered.first().map(|e| e.id.clone())
    } else {
        None
    };

    ordered
        .into_iter()
        .filter(|e| filter.matches(e))
        .enumerate()
        .map(|(position, entry)| ListRow {
            display_rank: entry
                .rank()
                .map(u64::from)
                .unwrap_or_else(|| pagination.fallback_rank(position)),
            featured: position == 0 && pinned_id.as_ref() == Some(&entry.id),
            entry: entry.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::coin::test_support::{entry, entry_with};

    fn page_of(entries: Vec<MarketEntry>, page: u32, per_page: u32) -> Page {
        Page::new(page, per_page, entries)
    }

    fn ids(rows: &[ListRow]) -> Vec<String> {
        rows.iter().map(|r| r.entry.id.to_string()).collect()
    }

    fn twenty_with_vanry_at(pos: usize, ranked: bool) -> Vec<MarketEntry> {
        (0..20)
            .map(|i| {
                let rank = ranked.then_some(i as u32 + 1);
                if i == pos {
                    let mut e = entry("vanar-chain", "VANRY", rank);
                    e.name = "Vanar Chain".to_string();
                    e
                } else {
                    entry(&format!("coin-{i}"), &format!("c{i}"), rank)
                }
            })
            .collect()
    }

    #[test]
    fn test_pin_moves_entry_to_front_keeping_others() {
        let entries = twenty_with_vanry_at(15, true);
        let (ordered, pinned) = pin_featured(&entries, Pagination::new(1, 20), Some("vanry"));
        assert!(pinned);
        assert_eq!(ordered[0].id.as_str(), "vanar-chain");
        let rest: Vec<&str> = ordered[1..].iter().map(|e| e.id.as_str()).collect();
        let expected: Vec<&str> = entries
            .iter()
            .filter(|e| e.id.as_str() != "vanar-chain")
            .map(|e| e.id.as_str())
            .collect();
        assert_eq!(rest, expected);
    }

    #[test]
    fn test_pin_absent_leaves_order() {
        let entries: Vec<MarketEntry> = (0..5).map(|i| entry(&format!("c{i}"), "x", None)).collect();
        let (ordered, pinned) = pin_featured(&entries, Pagination::new(1, 5), Some("vanry"));
        assert!(!pinned);
        assert!(ordered.iter().zip(&entries).all(|(a, b)| a.id == b.id));
    }

    #[test]
    fn test_pin_by_name_substring() {
        let mut e = entry("vanar", "xyz", None);
        e.name = "Wrapped VANRY Token".to_string();
        let entries = vec![entry("a", "a", None), e];
        assert_eq!(featured_position(&entries, "vanry"), Some(1));
    }

    #[test]
    fn test_pin_only_on_first_page() {
        let entries = twenty_with_vanry_at(15, true);
        let (ordered, pinned) = pin_featured(&entries, Pagination::new(2, 20), Some("vanry"));
        assert!(!pinned);
        assert_eq!(ordered[15].id.as_str(), "vanar-chain");
    }

    #[test]
    fn test_end_to_end_first_page_with_ranks() {
        let page = page_of(twenty_with_vanry_at(15, true), 1, 20);
        let rows = derive_rows(&page, &FilterState::default(), Pagination::new(1, 20), Some("vanry"));

        assert_eq!(rows.len(), 20);
        assert_eq!(rows[0].entry.symbol, "VANRY");
        assert!(rows[0].featured);
        assert!(rows[1..].iter().all(|r| !r.featured));
        // Server ranks travel with their entries.
        assert_eq!(rows[0].display_rank, 16);
        let mut ranks: Vec<u64> = rows.iter().map(|r| r.display_rank).collect();
        ranks.sort_unstable();
        assert_eq!(ranks, (1..=20).collect::<Vec<u64>>());
    }

    #[test]
    fn test_end_to_end_positional_fallback() {
        let page = page_of(twenty_with_vanry_at(15, false), 1, 20);
        let rows = derive_rows(&page, &FilterState::default(), Pagination::new(1, 20), Some("vanry"));
        let ranks: Vec<u64> = rows.iter().map(|r| r.display_rank).collect();
        assert_eq!(ranks, (1..=20).collect::<Vec<u64>>());
        assert_eq!(rows[0].entry.symbol, "VANRY");
    }

    #[test]
    fn test_fallback_rank_uses_page_offset() {
        let entries = vec![entry("a", "a", None), entry("b", "b", Some(0)), entry("c", "c", Some(77))];
        let page = page_of(entries, 3, 10);
        let rows = derive_rows(&page, &FilterState::default(), Pagination::new(3, 10), None);
        let ranks: Vec<u64> = rows.iter().map(|r| r.display_rank).collect();
        assert_eq!(ranks, [21, 22, 77]);
    }

    #[test]
    fn test_filtered_out_pin_is_not_featured() {
        let mut entries = twenty_with_vanry_at(3, true);
        entries[0] = entry_with("coin-0", "c0", None, Some(2.0));
        let page = page_of(entries, 1, 20);
        let filter = FilterState::default().with_change(ChangeClass::Positive);
        let rows = derive_rows(&page, &filter, Pagination::new(1, 20), Some("vanry"));
        assert_eq!(ids(&rows), ["coin-0"]);
        assert!(!rows[0].featured);
        assert_eq!(rows[0].display_rank, 1);
    }

    #[test]
    fn test_derive_does_not_mutate_page() {
        let page = page_of(twenty_with_vanry_at(15, true), 1, 20);
        let before = page.clone();
        let _ = derive_rows(&page, &FilterState::default().with_search("c1"), Pagination::new(1, 20), Some("vanry"));
        assert_eq!(page, before);
    }
}
