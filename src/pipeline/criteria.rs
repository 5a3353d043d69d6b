//! Advanced-criteria normalization and row editing.

use crate::models::{AdvancedFilters, CriteriaOperator, SearchCriteria, SearchField};

/// Rows always shown in the advanced search dialog
pub const MIN_CRITERIA_ROWS: usize = 3;

const DEFAULT_FIELDS: [SearchField; MIN_CRITERIA_ROWS] =
    [SearchField::Keyword, SearchField::Title, SearchField::Author];

/// A single change to one criteria row
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CriteriaEdit {
    Field(SearchField),
    Value(String),
    Operator(CriteriaOperator),
}

/// Pad to at least three rows, then move filled rows ahead of empty ones.
///
/// Padding rows take the fields keyword, title, author by position (keyword
/// past the third) and join with AND. The partition is stable, so filled rows
/// keep their relative order, as do empty ones. Applying this twice is the
/// same as applying it once.
pub fn ensure_minimum_criteria(mut criteria: Vec<SearchCriteria>) -> Vec<SearchCriteria> {
    while criteria.len() < MIN_CRITERIA_ROWS {
        let field = DEFAULT_FIELDS
            .get(criteria.len())
            .copied()
            .unwrap_or(SearchField::Keyword);
        criteria.push(SearchCriteria::new(field, ""));
    }

    let (mut filled, empty): (Vec<_>, Vec<_>) =
        criteria.into_iter().partition(SearchCriteria::has_value);
    filled.extend(empty);
    filled
}

/// Rows shown when the dialog opens.
///
/// Existing rows are kept; with none, a non-blank main query seeds the
/// keyword row.
pub fn seed_criteria(existing: &[SearchCriteria], main_query: &str) -> Vec<SearchCriteria> {
    let query = main_query.trim();
    if existing.is_empty() && !query.is_empty() {
        return ensure_minimum_criteria(vec![SearchCriteria::new(SearchField::Keyword, query)]);
    }
    ensure_minimum_criteria(existing.to_vec())
}

/// The three blank default rows
pub fn reset_criteria() -> Vec<SearchCriteria> {
    ensure_minimum_criteria(Vec::new())
}

/// Append a blank keyword row
pub fn add_row(criteria: Vec<SearchCriteria>) -> Vec<SearchCriteria> {
    let mut criteria = criteria;
    criteria.push(SearchCriteria::new(SearchField::Keyword, ""));
    ensure_minimum_criteria(criteria)
}

/// Apply `edit` to the row at `index`; out-of-range indexes change nothing
pub fn update_row(
    criteria: Vec<SearchCriteria>,
    index: usize,
    edit: CriteriaEdit,
) -> Vec<SearchCriteria> {
    let mut criteria = criteria;
    if let Some(row) = criteria.get_mut(index) {
        match edit {
            CriteriaEdit::Field(field) => row.field = field,
            CriteriaEdit::Value(value) => row.value = value,
            CriteriaEdit::Operator(operator) => row.operator = operator,
        }
    }
    ensure_minimum_criteria(criteria)
}

/// Remove the row at `index`.
///
/// Refused (returns `None`) when only the minimum number of rows remain or
/// the index is out of range.
pub fn remove_row(criteria: &[SearchCriteria], index: usize) -> Option<Vec<SearchCriteria>> {
    if criteria.len() <= MIN_CRITERIA_ROWS || index >= criteria.len() {
        return None;
    }
    let remaining = criteria
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != index)
        .map(|(_, row)| row.clone())
        .collect();
    Some(ensure_minimum_criteria(remaining))
}

/// Rows with a non-blank value, as submitted with a search
pub fn valid_criteria(criteria: &[SearchCriteria]) -> Vec<SearchCriteria> {
    criteria.iter().filter(|row| row.has_value()).cloned().collect()
}

/// Human-readable form such as `title: "deep" AND author: "chen"`
pub fn describe_criteria(criteria: &[SearchCriteria]) -> String {
    let rows = valid_criteria(criteria);
    let mut out = String::new();
    for (i, row) in rows.iter().enumerate() {
        if i > 0 {
            // the connective lives on the preceding row
            out.push(' ');
            out.push_str(rows[i - 1].operator.as_str());
            out.push(' ');
        }
        out.push_str(&format!("{}: \"{}\"", row.field.id(), row.value.trim()));
    }
    out
}

/// Whether the advanced search goes beyond the plain query.
///
/// True when any row targets a field other than keyword or holds a value
/// other than the main query, or when format or a year bound is set.
pub fn is_advanced_search_active(
    query: &str,
    criteria: &[SearchCriteria],
    filters: &AdvancedFilters,
) -> bool {
    let beyond_query = criteria
        .iter()
        .any(|row| row.field != SearchField::Keyword || row.value != query);
    beyond_query || filters.is_active()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(field: SearchField, value: &str) -> SearchCriteria {
        SearchCriteria::new(field, value)
    }

    #[test]
    fn test_empty_list_gets_default_rows() {
        let rows = ensure_minimum_criteria(Vec::new());
        assert_eq!(
            rows,
            vec![
                row(SearchField::Keyword, ""),
                row(SearchField::Title, ""),
                row(SearchField::Author, ""),
            ]
        );
        assert!(rows.iter().all(|r| r.operator == CriteriaOperator::And));
    }

    #[test]
    fn test_padding_follows_position() {
        let rows = ensure_minimum_criteria(vec![row(SearchField::Doi, "10.1")]);
        assert_eq!(rows[0], row(SearchField::Doi, "10.1"));
        assert_eq!(rows[1].field, SearchField::Title);
        assert_eq!(rows[2].field, SearchField::Author);
    }

    #[test]
    fn test_filled_rows_first_and_stable() {
        let input = vec![
            row(SearchField::Keyword, ""),
            row(SearchField::Title, "b"),
            row(SearchField::Author, "  "),
            row(SearchField::Subject, "a"),
        ];
        let rows = ensure_minimum_criteria(input);
        let fields: Vec<SearchField> = rows.iter().map(|r| r.field).collect();
        assert_eq!(
            fields,
            vec![
                SearchField::Title,
                SearchField::Subject,
                SearchField::Keyword,
                SearchField::Author,
            ]
        );
        assert_eq!(ensure_minimum_criteria(rows.clone()), rows);
    }

    #[test]
    fn test_seed_from_main_query() {
        let rows = seed_criteria(&[], "  neural nets ");
        assert_eq!(rows[0], row(SearchField::Keyword, "neural nets"));
        assert_eq!(rows.len(), 3);

        let kept = seed_criteria(&[row(SearchField::Author, "Lee")], "ignored");
        assert_eq!(kept[0], row(SearchField::Author, "Lee"));
    }

    #[test]
    fn test_row_editing() {
        let rows = add_row(reset_criteria());
        assert_eq!(rows.len(), 4);

        let rows = update_row(rows, 3, CriteriaEdit::Value("ethics".into()));
        assert_eq!(rows[0], row(SearchField::Keyword, "ethics"));

        let rows = update_row(rows, 0, CriteriaEdit::Operator(CriteriaOperator::Or));
        assert_eq!(rows[0].operator, CriteriaOperator::Or);

        let rows = remove_row(&rows, 1).unwrap();
        assert_eq!(rows.len(), 3);
        assert!(remove_row(&rows, 0).is_none());
    }

    #[test]
    fn test_describe_and_validate() {
        let rows = vec![
            row(SearchField::Title, "deep").operator(CriteriaOperator::Not),
            row(SearchField::Author, ""),
            row(SearchField::Author, "chen"),
        ];
        assert_eq!(valid_criteria(&rows).len(), 2);
        assert_eq!(describe_criteria(&rows), r#"title: "deep" NOT author: "chen""#);
    }

    #[test]
    fn test_advanced_search_active() {
        let filters = AdvancedFilters::default();
        assert!(!is_advanced_search_active("ml", &[], &filters));
        assert!(!is_advanced_search_active(
            "ml",
            &[row(SearchField::Keyword, "ml")],
            &filters
        ));
        assert!(is_advanced_search_active(
            "ml",
            &[row(SearchField::Title, "ml")],
            &filters
        ));
        assert!(is_advanced_search_active(
            "ml",
            &[],
            &AdvancedFilters::default().year_to("2020")
        ));
    }
}
