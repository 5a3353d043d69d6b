//! Result filtering by free-text query and advanced filters.

use crate::models::{AdvancedFilters, Resource};

/// Lower year bound used when only the upper one is given
pub const DEFAULT_YEAR_FROM: i32 = 1900;

/// Upper year bound used when only the lower one is given
pub const DEFAULT_YEAR_TO: i32 = 2030;

/// Whether `resource` matches a free-text query.
///
/// A blank query matches everything. Otherwise the lowercased query must be a
/// substring of the title, an author, the description, a tag, the journal or
/// the publisher.
pub fn matches_query(resource: &Resource, query: &str) -> bool {
    if query.trim().is_empty() {
        return true;
    }

    let needle = query.to_lowercase();
    let contains = |field: &str| field.to_lowercase().contains(&needle);

    contains(&resource.title)
        || resource.authors.iter().any(|author| contains(author))
        || contains(&resource.description)
        || resource.tags.iter().any(|tag| contains(tag))
        || resource.journal.as_deref().is_some_and(contains)
        || resource.publisher.as_deref().is_some_and(contains)
}

/// Resources matching `query`, in input order
pub fn filter_by_query(resources: &[Resource], query: &str) -> Vec<Resource> {
    resources
        .iter()
        .filter(|resource| matches_query(resource, query))
        .cloned()
        .collect()
}

/// Apply the format and year-range filters from the advanced search dialog
pub fn apply_advanced_filters(resources: Vec<Resource>, filters: &AdvancedFilters) -> Vec<Resource> {
    let format = filters.format.trim();
    let by_format = !format.is_empty() && format != "all";
    let range = filters.has_year_range().then(|| year_bounds(filters));
    if range == Some(None) {
        tracing::debug!(
            "Year range {:?}..{:?} is not numeric; no results match",
            filters.year_from,
            filters.year_to
        );
    }

    resources
        .into_iter()
        .filter(|resource| !by_format || resource.resource_type.id() == format)
        .filter(|resource| match range {
            Some(Some((from, to))) => (from..=to).contains(&resource.year),
            Some(None) => false,
            None => true,
        })
        .collect()
}

/// Effective `(from, to)` year bounds.
///
/// An empty bound takes its default. A bound that is set but has no leading
/// integer makes the whole range unsatisfiable, so `None` is returned.
pub fn year_bounds(filters: &AdvancedFilters) -> Option<(i32, i32)> {
    let bound = |value: &str, default: i32| {
        if value.is_empty() {
            Some(default)
        } else {
            parse_year(value)
        }
    };
    Some((
        bound(&filters.year_from, DEFAULT_YEAR_FROM)?,
        bound(&filters.year_to, DEFAULT_YEAR_TO)?,
    ))
}

/// Parse the leading integer of `value`, skipping leading whitespace and
/// ignoring trailing text ("2020s" -> 2020)
fn parse_year(value: &str) -> Option<i32> {
    let value = value.trim_start();
    let sign_len = usize::from(value.starts_with(['-', '+']));
    let digits = value[sign_len..]
        .find(|c: char| !c.is_ascii_digit())
        .map_or(value.len(), |end| end + sign_len);
    value[..digits].parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::fixtures::search_results;

    fn ids(resources: &[Resource]) -> Vec<&str> {
        resources.iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn test_empty_query_returns_everything_in_order() {
        let all = search_results();
        assert_eq!(filter_by_query(&all, ""), all);
        assert_eq!(filter_by_query(&all, "  \t"), all);
    }

    #[test]
    fn test_query_fields() {
        let all = search_results();
        // author
        assert_eq!(ids(&filter_by_query(&all, "chen, l.")), vec!["1", "2"]);
        // tag only
        assert_eq!(ids(&filter_by_query(&all, "qaoa")), vec!["4"]);
        // journal
        assert_eq!(ids(&filter_by_query(&all, "environmental science")), vec!["3"]);
        // publisher
        assert_eq!(ids(&filter_by_query(&all, "ACADEMIC PRESS")), vec!["2"]);
        assert!(filter_by_query(&all, "astrophysics").is_empty());
    }

    #[test]
    fn test_query_is_not_trimmed_when_matching() {
        let all = search_results();
        assert_eq!(ids(&filter_by_query(&all, " bert")), vec!["6"]);
        assert!(filter_by_query(&all, "bert  ").is_empty());
    }

    #[test]
    fn test_format_filter() {
        let filters = AdvancedFilters::default().format("thesis");
        assert_eq!(ids(&apply_advanced_filters(search_results(), &filters)), vec!["4"]);

        let all = AdvancedFilters::default();
        assert_eq!(apply_advanced_filters(search_results(), &all).len(), 6);
    }

    #[test]
    fn test_year_range_with_defaults() {
        let from = AdvancedFilters::default().year_from("2023");
        assert_eq!(
            ids(&apply_advanced_filters(search_results(), &from)),
            vec!["1", "3", "4", "5"]
        );

        let to = AdvancedFilters::default().year_to("2022");
        assert_eq!(ids(&apply_advanced_filters(search_results(), &to)), vec!["2", "6"]);

        let suffixed = AdvancedFilters::default().year_from(" 2023x");
        assert_eq!(year_bounds(&suffixed), Some((2023, DEFAULT_YEAR_TO)));
    }

    #[test]
    fn test_unparsable_year_bound_matches_nothing() {
        let garbage = AdvancedFilters::default().year_from("soon").year_to("2023");
        assert_eq!(year_bounds(&garbage), None);
        assert!(apply_advanced_filters(search_results(), &garbage).is_empty());

        let blank = AdvancedFilters::default().year_to(" ");
        assert!(blank.has_year_range());
        assert!(apply_advanced_filters(search_results(), &blank).is_empty());
    }
}
