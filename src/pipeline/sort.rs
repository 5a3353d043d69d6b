//! Result ordering.

use std::cmp::Ordering;

use crate::models::{Resource, SortBy, SortOrder};

/// Sort `results` in place.
///
/// The sort is stable, so records that compare equal keep their input order
/// and sorting twice gives the same result as sorting once. `order` is only
/// consulted by keys for which [`SortBy::respects_direction`] holds; the
/// others always produce their fixed order.
pub fn sort_results(results: &mut [Resource], sort_by: SortBy, order: SortOrder, query: &str) {
    let needle = query.to_lowercase();

    results.sort_by(|a, b| {
        let ordering = compare(a, b, sort_by, &needle);
        if sort_by.respects_direction() && order == SortOrder::Descending {
            ordering.reverse()
        } else {
            ordering
        }
    });
}

/// Owned variant of [`sort_results`]
pub fn sorted(mut results: Vec<Resource>, sort_by: SortBy, order: SortOrder, query: &str) -> Vec<Resource> {
    sort_results(&mut results, sort_by, order, query);
    results
}

/// Ascending comparison for direction-respecting keys, final order for the rest
fn compare(a: &Resource, b: &Resource, sort_by: SortBy, needle: &str) -> Ordering {
    match sort_by {
        SortBy::Relevance => title_hit(a, needle).cmp(&title_hit(b, needle)),
        SortBy::Popularity => b.popularity().cmp(&a.popularity()),
        SortBy::Recent => b.year.cmp(&a.year),
        SortBy::Oldest | SortBy::Date => a.year.cmp(&b.year),
        SortBy::TitleAsc => compare_titles(&a.title, &b.title),
        SortBy::TitleDesc => compare_titles(&b.title, &a.title),
        SortBy::Citations => a.citation_count.cmp(&b.citation_count),
        SortBy::Downloads => a.download_count.cmp(&b.download_count),
    }
}

/// Relevance score: whether the title contains the query. No query, no signal.
fn title_hit(resource: &Resource, needle: &str) -> bool {
    !needle.is_empty() && resource.title.to_lowercase().contains(needle)
}

/// Case-insensitive title order, with the raw text as tiebreaker
fn compare_titles(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}
