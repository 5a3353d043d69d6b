//! Facet catalog and selection models.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Selection widget for a facet group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterKind {
    #[default]
    Checkbox,
    Radio,
}

/// A selectable refinement with its advertised result count
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOption {
    pub id: String,
    pub label: String,
    pub count: u32,
}

impl FilterOption {
    pub fn new(id: impl Into<String>, label: impl Into<String>, count: u32) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            count,
        }
    }
}

/// A named facet group such as "Resource Type"
///
/// Counts are static catalog figures, not derived from the current result set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterGroup {
    pub id: String,
    pub title: String,
    pub options: Vec<FilterOption>,
    #[serde(rename = "type", default)]
    pub kind: FilterKind,
}

impl FilterGroup {
    pub fn new(id: impl Into<String>, title: impl Into<String>, options: Vec<FilterOption>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            options,
            kind: FilterKind::Checkbox,
        }
    }

    /// Look up an option label by id
    pub fn label_of(&self, option_id: &str) -> Option<&str> {
        self.options
            .iter()
            .find(|option| option.id == option_id)
            .map(|option| option.label.as_str())
    }
}

/// Mapping from facet group id to the selected option ids
///
/// Groups iterate in id order; options keep the order they were selected in
/// and never repeat. Groups left without options are dropped.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct SelectedFilters(BTreeMap<String, Vec<String>>);

/// Decoded pairs go through [`SelectedFilters::select`], so empty groups and
/// repeated options from a hand-edited URL are dropped.
impl<'de> Deserialize<'de> for SelectedFilters {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = BTreeMap::<String, Vec<String>>::deserialize(deserializer)?;
        Ok(raw
            .iter()
            .flat_map(|(group, options)| options.iter().map(move |option| (group, option)))
            .collect())
    }
}

impl SelectedFilters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an option to a group; returns false if it was already selected
    pub fn select(&mut self, group_id: &str, option_id: &str) -> bool {
        let options = self.0.entry(group_id.to_string()).or_default();
        if options.iter().any(|id| id == option_id) {
            return false;
        }
        options.push(option_id.to_string());
        true
    }

    /// Remove an option from a group; returns false if it was not selected
    pub fn deselect(&mut self, group_id: &str, option_id: &str) -> bool {
        let Some(options) = self.0.get_mut(group_id) else {
            return false;
        };
        let before = options.len();
        options.retain(|id| id != option_id);
        let removed = options.len() != before;
        if options.is_empty() {
            self.0.remove(group_id);
        }
        removed
    }

    pub fn is_selected(&self, group_id: &str, option_id: &str) -> bool {
        self.0
            .get(group_id)
            .is_some_and(|options| options.iter().any(|id| id == option_id))
    }

    /// Selected option ids for a group, empty when none
    pub fn options(&self, group_id: &str) -> &[String] {
        self.0.get(group_id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Total number of selected options across all groups
    pub fn total(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Iterate over `(group_id, option_id)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().flat_map(|(group, options)| {
            options
                .iter()
                .map(move |option| (group.as_str(), option.as_str()))
        })
    }

    /// Iterate over groups that have at least one selection
    pub fn groups(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0
            .iter()
            .map(|(group, options)| (group.as_str(), options.as_slice()))
    }
}

impl<G, O> FromIterator<(G, O)> for SelectedFilters
where
    G: AsRef<str>,
    O: AsRef<str>,
{
    fn from_iter<I: IntoIterator<Item = (G, O)>>(iter: I) -> Self {
        let mut selected = SelectedFilters::new();
        for (group, option) in iter {
            selected.select(group.as_ref(), option.as_ref());
        }
        selected
    }
}
