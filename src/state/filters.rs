//! Draft and committed facet selections.
//!
//! The sidebar edits selections live, so its changes land in both copies.
//! The dialog edits only the draft, which is promoted by [`FilterPanel::apply`]
//! or thrown away when the panel is dropped.

use std::collections::{BTreeMap, BTreeSet};

use crate::models::{FilterGroup, FilterOption, SelectedFilters};
use crate::routes::facets_param;

/// Options shown per group before "Show more"
pub const VISIBLE_OPTIONS: usize = 5;

/// Where facet edits are being made
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditMode {
    #[default]
    Sidebar,
    Dialog,
}

/// Selected-option totals for both copies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SelectionCounts {
    pub committed: usize,
    pub draft: usize,
}

/// Committed selections drive the results; the draft is what the user is
/// editing.
#[derive(Debug, Clone, Default)]
pub struct FilterSelection {
    committed: SelectedFilters,
    draft: SelectedFilters,
    mode: EditMode,
}

impl FilterSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from selections read out of the URL
    pub fn from_committed(committed: SelectedFilters) -> Self {
        Self {
            draft: committed.clone(),
            committed,
            mode: EditMode::Sidebar,
        }
    }

    pub fn committed(&self) -> &SelectedFilters {
        &self.committed
    }

    pub fn draft(&self) -> &SelectedFilters {
        &self.draft
    }

    pub fn mode(&self) -> EditMode {
        self.mode
    }

    /// Replace both copies, e.g. after navigating to a new URL
    pub fn sync(&mut self, committed: SelectedFilters) {
        self.draft = committed.clone();
        self.committed = committed;
    }

    /// Check or uncheck an option
    pub fn toggle(&mut self, group_id: &str, option_id: &str, checked: bool) {
        let edit = |selected: &mut SelectedFilters| {
            if checked {
                selected.select(group_id, option_id);
            } else {
                selected.deselect(group_id, option_id);
            }
        };
        edit(&mut self.draft);
        if self.mode == EditMode::Sidebar {
            edit(&mut self.committed);
        }
    }

    /// Uncheck an option
    pub fn remove(&mut self, group_id: &str, option_id: &str) {
        self.toggle(group_id, option_id, false);
    }

    /// Clear every selection in the copies the current mode edits
    pub fn clear_all(&mut self) {
        self.draft.clear();
        if self.mode == EditMode::Sidebar {
            self.committed.clear();
        }
    }

    /// Promote the draft and return the new `facets` parameter, or `None`
    /// when nothing is selected and the parameter should be dropped.
    pub fn apply(&mut self) -> Option<String> {
        self.committed = self.draft.clone();
        tracing::info!("Applied {} facet selections", self.committed.total());
        facets_param(&self.committed)
    }

    /// Throw away pending draft edits
    pub fn discard(&mut self) {
        self.draft = self.committed.clone();
    }

    /// Remove an active-filter chip; both copies follow
    pub fn remove_committed(&mut self, group_id: &str, option_id: &str) {
        self.committed.deselect(group_id, option_id);
        self.draft.deselect(group_id, option_id);
    }

    /// "Clear all" on the active-filter bar
    pub fn clear_committed(&mut self) {
        self.committed.clear();
        self.draft.clear();
    }

    pub fn counts(&self) -> SelectionCounts {
        SelectionCounts {
            committed: self.committed.total(),
            draft: self.draft.total(),
        }
    }

    pub fn has_pending_changes(&self) -> bool {
        self.draft != self.committed
    }

    /// Open an editing surface. The draft is reset from the committed copy
    /// on open and again when the returned guard is dropped.
    pub fn open_panel(&mut self, mode: EditMode) -> FilterPanel<'_> {
        self.discard();
        self.mode = mode;
        FilterPanel { selection: self }
    }
}

/// An open filter sidebar or dialog
#[derive(Debug)]
pub struct FilterPanel<'a> {
    selection: &'a mut FilterSelection,
}

impl FilterPanel<'_> {
    pub fn selection(&self) -> &FilterSelection {
        self.selection
    }

    pub fn toggle(&mut self, group_id: &str, option_id: &str, checked: bool) {
        self.selection.toggle(group_id, option_id, checked);
    }

    pub fn remove(&mut self, group_id: &str, option_id: &str) {
        self.selection.remove(group_id, option_id);
    }

    pub fn clear_all(&mut self) {
        self.selection.clear_all();
    }

    /// Commit the draft and close the panel
    pub fn apply(self) -> Option<String> {
        self.selection.apply()
    }

    /// Close the panel without committing
    pub fn cancel(self) {}
}

impl Drop for FilterPanel<'_> {
    fn drop(&mut self) {
        self.selection.discard();
        self.selection.mode = EditMode::Sidebar;
    }
}

/// Expansion and "show more" state of the facet sidebar
#[derive(Debug, Clone)]
pub struct FilterLayout {
    expanded: BTreeMap<String, bool>,
    show_all: BTreeSet<String>,
}

impl Default for FilterLayout {
    fn default() -> Self {
        let expanded = [
            ("type", true),
            ("year", true),
            ("subject", false),
            ("access", false),
            ("language", false),
        ]
        .into_iter()
        .map(|(group, open)| (group.to_string(), open))
        .collect();

        Self {
            expanded,
            show_all: BTreeSet::new(),
        }
    }
}

impl FilterLayout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Unknown groups start collapsed
    pub fn is_expanded(&self, group_id: &str) -> bool {
        self.expanded.get(group_id).copied().unwrap_or(false)
    }

    pub fn toggle_expanded(&mut self, group_id: &str) {
        let open = !self.is_expanded(group_id);
        self.expanded.insert(group_id.to_string(), open);
    }

    pub fn toggle_show_more(&mut self, group_id: &str) {
        if !self.show_all.remove(group_id) {
            self.show_all.insert(group_id.to_string());
        }
    }

    /// Options to render for a group
    pub fn visible_options<'g>(&self, group: &'g FilterGroup) -> &'g [FilterOption] {
        if self.show_all.contains(&group.id) || group.options.len() <= VISIBLE_OPTIONS {
            &group.options
        } else {
            &group.options[..VISIBLE_OPTIONS]
        }
    }

    /// Label of the show more/less button, `None` for short groups
    pub fn show_more_label(&self, group: &FilterGroup) -> Option<String> {
        if group.options.len() <= VISIBLE_OPTIONS {
            return None;
        }
        Some(if self.show_all.contains(&group.id) {
            "Show less".to_string()
        } else {
            format!("Show {} more", group.options.len() - VISIBLE_OPTIONS)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::fixtures;

    fn selected(pairs: &[(&str, &str)]) -> SelectedFilters {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_sidebar_edits_are_live() {
        let mut filters = FilterSelection::new();
        filters.toggle("type", "article", true);

        assert!(filters.committed().is_selected("type", "article"));
        assert!(!filters.has_pending_changes());

        filters.remove("type", "article");
        assert!(filters.committed().is_empty());
    }

    #[test]
    fn test_dialog_edits_stay_in_draft_until_applied() {
        let mut filters = FilterSelection::from_committed(selected(&[("year", "2024")]));
        {
            let mut panel = filters.open_panel(EditMode::Dialog);
            panel.toggle("type", "book", true);
            panel.remove("year", "2024");
            assert!(panel.selection().has_pending_changes());
            assert!(panel.selection().committed().is_selected("year", "2024"));

            let facets = panel.apply().unwrap();
            assert!(facets.contains("book"));
        }

        assert_eq!(filters.committed(), &selected(&[("type", "book")]));
        assert_eq!(filters.mode(), EditMode::Sidebar);
    }

    #[test]
    fn test_dropping_panel_discards_draft() {
        let mut filters = FilterSelection::from_committed(selected(&[("year", "2024")]));
        {
            let mut panel = filters.open_panel(EditMode::Dialog);
            panel.clear_all();
            assert_eq!(panel.selection().counts().draft, 0);
            panel.cancel();
        }

        assert_eq!(filters.draft(), filters.committed());
        assert_eq!(filters.counts(), SelectionCounts { committed: 1, draft: 1 });
    }

    #[test]
    fn test_apply_empty_selection_drops_param() {
        let mut filters = FilterSelection::from_committed(selected(&[("type", "thesis")]));
        let panel = {
            let mut panel = filters.open_panel(EditMode::Dialog);
            panel.clear_all();
            panel.apply()
        };
        assert_eq!(panel, None);
        assert!(filters.committed().is_empty());
    }

    #[test]
    fn test_chip_removal_updates_both_copies() {
        let mut filters =
            FilterSelection::from_committed(selected(&[("type", "article"), ("type", "book")]));
        filters.remove_committed("type", "article");
        assert_eq!(filters.committed().options("type"), ["book".to_string()]);
        assert_eq!(filters.draft(), filters.committed());

        filters.clear_committed();
        assert_eq!(filters.counts(), SelectionCounts::default());
    }

    #[test]
    fn test_layout_defaults_and_show_more() {
        let mut layout = FilterLayout::new();
        assert!(layout.is_expanded("type"));
        assert!(!layout.is_expanded("subject"));
        layout.toggle_expanded("subject");
        assert!(layout.is_expanded("subject"));

        let groups = fixtures::filter_groups();
        let subject = groups.iter().find(|g| g.id == "subject").unwrap();
        assert!(subject.options.len() > VISIBLE_OPTIONS);
        assert_eq!(layout.visible_options(subject).len(), VISIBLE_OPTIONS);
        assert_eq!(
            layout.show_more_label(subject),
            Some(format!("Show {} more", subject.options.len() - VISIBLE_OPTIONS))
        );

        layout.toggle_show_more("subject");
        assert_eq!(layout.visible_options(subject).len(), subject.options.len());
        assert_eq!(layout.show_more_label(subject).as_deref(), Some("Show less"));
    }
}
