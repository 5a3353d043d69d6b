//! Search criteria, advanced filters and sort option models.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Direction applied by direction-respecting sort keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortOrder {
    #[serde(rename = "asc")]
    Ascending,
    #[default]
    #[serde(rename = "desc")]
    Descending,
}

impl SortOrder {
    /// Returns the opposite direction
    pub fn toggled(self) -> Self {
        match self {
            SortOrder::Ascending => SortOrder::Descending,
            SortOrder::Descending => SortOrder::Ascending,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Ascending => "asc",
            SortOrder::Descending => "desc",
        }
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortOrder::Ascending),
            "desc" | "descending" => Ok(SortOrder::Descending),
            other => Err(format!("unknown sort order: {}", other)),
        }
    }
}

/// Sort key for result lists
///
/// The set is the union of the keys offered across the search pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortBy {
    #[default]
    Relevance,
    Popularity,
    Recent,
    Oldest,
    TitleAsc,
    TitleDesc,
    Date,
    Citations,
    Downloads,
}

impl SortBy {
    /// Every sort key, in menu order
    pub const ALL: [SortBy; 9] = [
        SortBy::Relevance,
        SortBy::Popularity,
        SortBy::Recent,
        SortBy::Oldest,
        SortBy::TitleAsc,
        SortBy::TitleDesc,
        SortBy::Date,
        SortBy::Citations,
        SortBy::Downloads,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            SortBy::Relevance => "relevance",
            SortBy::Popularity => "popularity",
            SortBy::Recent => "recent",
            SortBy::Oldest => "oldest",
            SortBy::TitleAsc => "title-asc",
            SortBy::TitleDesc => "title-desc",
            SortBy::Date => "date",
            SortBy::Citations => "citations",
            SortBy::Downloads => "downloads",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortBy::Relevance => "Relevance",
            SortBy::Popularity => "Most Popular",
            SortBy::Recent => "Most Recent",
            SortBy::Oldest => "Oldest First",
            SortBy::TitleAsc => "Title A-Z",
            SortBy::TitleDesc => "Title Z-A",
            SortBy::Date => "Publication Date",
            SortBy::Citations => "Citations",
            SortBy::Downloads => "Downloads",
        }
    }

    /// Whether the caller-supplied direction affects this key
    ///
    /// `recent`, `oldest`, `title-asc`, `title-desc` and `popularity` carry
    /// their direction in the key itself.
    pub fn respects_direction(&self) -> bool {
        matches!(
            self,
            SortBy::Relevance | SortBy::Date | SortBy::Citations | SortBy::Downloads
        )
    }
}

impl FromStr for SortBy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        SortBy::ALL
            .iter()
            .copied()
            .find(|key| key.id() == needle)
            .ok_or_else(|| format!("unknown sort key: {}", s))
    }
}

impl std::fmt::Display for SortBy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

/// Result list layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    List,
    Grid,
}

/// Field targeted by an advanced-criteria row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchField {
    #[default]
    Keyword,
    Title,
    Author,
    Abstract,
    Subject,
    Publisher,
    Doi,
    Isbn,
}

impl SearchField {
    pub const ALL: [SearchField; 8] = [
        SearchField::Keyword,
        SearchField::Title,
        SearchField::Author,
        SearchField::Abstract,
        SearchField::Subject,
        SearchField::Publisher,
        SearchField::Doi,
        SearchField::Isbn,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            SearchField::Keyword => "keyword",
            SearchField::Title => "title",
            SearchField::Author => "author",
            SearchField::Abstract => "abstract",
            SearchField::Subject => "subject",
            SearchField::Publisher => "publisher",
            SearchField::Doi => "doi",
            SearchField::Isbn => "isbn",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SearchField::Keyword => "Keyword",
            SearchField::Title => "Title",
            SearchField::Author => "Author",
            SearchField::Abstract => "Abstract",
            SearchField::Subject => "Subject",
            SearchField::Publisher => "Publisher",
            SearchField::Doi => "DOI",
            SearchField::Isbn => "ISBN",
        }
    }
}

impl FromStr for SearchField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        SearchField::ALL
            .iter()
            .copied()
            .find(|field| field.id() == needle)
            .ok_or_else(|| format!("unknown search field: {}", s))
    }
}

/// Boolean connective joining a criteria row to the previous one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CriteriaOperator {
    #[default]
    And,
    Or,
    Not,
}

impl CriteriaOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            CriteriaOperator::And => "AND",
            CriteriaOperator::Or => "OR",
            CriteriaOperator::Not => "NOT",
        }
    }
}

impl FromStr for CriteriaOperator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "AND" => Ok(CriteriaOperator::And),
            "OR" => Ok(CriteriaOperator::Or),
            "NOT" => Ok(CriteriaOperator::Not),
            other => Err(format!("unknown operator: {}", other)),
        }
    }
}

/// One row of an advanced query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchCriteria {
    pub field: SearchField,
    pub value: String,
    pub operator: CriteriaOperator,
}

impl SearchCriteria {
    /// Create a row joined with AND
    pub fn new(field: SearchField, value: impl Into<String>) -> Self {
        Self {
            field,
            value: value.into(),
            operator: CriteriaOperator::And,
        }
    }

    /// Set the operator
    pub fn operator(mut self, operator: CriteriaOperator) -> Self {
        self.operator = operator;
        self
    }

    /// Whether the trimmed value is non-empty
    pub fn has_value(&self) -> bool {
        !self.value.trim().is_empty()
    }
}

/// Structured filters set from the advanced search dialog
///
/// Year bounds are kept as the raw text the user typed; an empty string means
/// the bound is unset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvancedFilters {
    #[serde(default)]
    pub year_from: String,
    #[serde(default)]
    pub year_to: String,
    #[serde(default = "default_all")]
    pub format: String,
    #[serde(default = "default_all")]
    pub language: String,
}

fn default_all() -> String {
    "all".to_string()
}

impl Default for AdvancedFilters {
    fn default() -> Self {
        Self {
            year_from: String::new(),
            year_to: String::new(),
            format: default_all(),
            language: default_all(),
        }
    }
}

impl AdvancedFilters {
    /// Set the lower year bound
    pub fn year_from(mut self, year: impl Into<String>) -> Self {
        self.year_from = year.into();
        self
    }

    /// Set the upper year bound
    pub fn year_to(mut self, year: impl Into<String>) -> Self {
        self.year_to = year.into();
        self
    }

    /// Restrict results to one resource type, or "all"
    pub fn format(mut self, format: impl Into<String>) -> Self {
        self.format = format.into();
        self
    }

    /// Set the language
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Whether either year bound is set. A whitespace-only bound counts as set.
    pub fn has_year_range(&self) -> bool {
        !self.year_from.is_empty() || !self.year_to.is_empty()
    }

    /// Whether any filter differs from its default
    pub fn is_active(&self) -> bool {
        self.format != "all" || self.has_year_range()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_by_round_trips_through_ids() {
        for key in SortBy::ALL {
            assert_eq!(key.id().parse::<SortBy>().unwrap(), key);
        }
        assert!("newest".parse::<SortBy>().is_err());
        assert_eq!(
            serde_json::to_string(&SortBy::TitleAsc).unwrap(),
            "\"title-asc\""
        );
    }

    #[test]
    fn test_fixed_direction_keys() {
        assert!(!SortBy::Recent.respects_direction());
        assert!(!SortBy::Popularity.respects_direction());
        assert!(SortBy::Citations.respects_direction());
        assert_eq!(SortOrder::Ascending.toggled(), SortOrder::Descending);
    }

    #[test]
    fn test_criteria_serialization() {
        let row = SearchCriteria::new(SearchField::Author, "Smith").operator(CriteriaOperator::Not);
        let json = serde_json::to_string(&row).unwrap();
        assert_eq!(json, r#"{"field":"author","value":"Smith","operator":"NOT"}"#);
    }

    #[test]
    fn test_advanced_filters_defaults() {
        let filters: AdvancedFilters = serde_json::from_str(r#"{"yearFrom":"2020"}"#).unwrap();
        assert_eq!(filters.format, "all");
        assert_eq!(filters.year_to, "");
        assert!(filters.has_year_range());
        assert!(filters.is_active());
        assert!(!AdvancedFilters::default().is_active());
    }
}
