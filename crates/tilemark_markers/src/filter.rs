//! # Marker Filter
//!
//! Per-category visibility. Each filterable icon key has a committed
//! `enabled` flag and a `staged` flag edited by the filter dialog:
//!
//! - [`MarkerFilter::begin_edit`] opens a [`FilterEdit`]
//! - `set` only touches staged flags
//! - `commit` copies staged into enabled
//! - `cancel` (or dropping the edit) puts staged back to enabled
//!
//! A marker whose icon has no filter entry is visible whenever it is in the
//! active dimension.

use std::collections::HashMap;
use std::sync::Arc;

use tilemark_shared::{Dimension, IconCatalog, IconKey, IconProvider};
use tracing::{info, warn};

use crate::marker::Marker;

/// Filter state of one icon category.
#[derive(Clone, Debug)]
pub struct FilterChoice {
    /// The category's icon.
    pub provider: Arc<dyn IconProvider>,
    enabled: bool,
    staged: bool,
}

impl FilterChoice {
    /// Committed state.
    #[must_use]
    pub const fn enabled(&self) -> bool {
        self.enabled
    }

    /// State shown in the dialog, not yet committed.
    #[must_use]
    pub const fn staged(&self) -> bool {
        self.staged
    }
}

/// Category visibility table, built once at startup.
#[derive(Clone, Debug, Default)]
pub struct MarkerFilter {
    choices: HashMap<IconKey, FilterChoice>,
}

impl MarkerFilter {
    /// Creates a filter with one entry per catalog icon that has a default.
    #[must_use]
    pub fn from_catalog(catalog: &IconCatalog) -> Self {
        let choices = catalog
            .iter()
            .filter_map(|icon| {
                icon.filter_default.map(|enabled| {
                    (
                        icon.provider.key().clone(),
                        FilterChoice {
                            provider: Arc::clone(&icon.provider),
                            enabled,
                            staged: enabled,
                        },
                    )
                })
            })
            .collect();
        Self { choices }
    }

    /// Forces categories on or off, e.g. from configuration.
    ///
    /// Returns the keys that have no filter entry.
    pub fn apply_overrides<'k>(
        &mut self,
        enable: impl IntoIterator<Item = &'k str>,
        disable: impl IntoIterator<Item = &'k str>,
    ) -> Vec<String> {
        let mut unknown = Vec::new();
        let overrides = enable
            .into_iter()
            .map(|key| (key, true))
            .chain(disable.into_iter().map(|key| (key, false)));
        for (key, enabled) in overrides {
            match self.choices.get_mut(&IconKey::new(key)) {
                Some(choice) => {
                    choice.enabled = enabled;
                    choice.staged = enabled;
                }
                None => {
                    warn!(key, "filter override for unknown icon");
                    unknown.push(key.to_string());
                }
            }
        }
        unknown
    }

    /// Committed state of a category, `None` if it has no entry.
    #[must_use]
    pub fn is_enabled(&self, key: &IconKey) -> Option<bool> {
        self.choices.get(key).map(|choice| choice.enabled)
    }

    /// Final visibility: category enabled and same dimension.
    #[must_use]
    pub fn is_visible(&self, marker: &Marker, active: &Dimension) -> bool {
        let in_dimension = marker.dimension == *active;
        match self.is_enabled(marker.icon.key()) {
            Some(enabled) => enabled && in_dimension,
            None => in_dimension,
        }
    }

    /// Choices sorted by display name, for the filter dialog.
    #[must_use]
    pub fn choices_sorted(&self) -> Vec<&FilterChoice> {
        let mut sorted: Vec<&FilterChoice> = self.choices.values().collect();
        sorted.sort_by(|a, b| {
            a.provider
                .display_name()
                .cmp(b.provider.display_name())
                .then_with(|| a.provider.key().cmp(b.provider.key()))
        });
        sorted
    }

    /// Number of filterable categories.
    #[must_use]
    pub fn len(&self) -> usize {
        self.choices.len()
    }

    /// Returns true if nothing is filterable.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.choices.is_empty()
    }

    /// Opens a staged edit.
    pub fn begin_edit(&mut self) -> FilterEdit<'_> {
        for choice in self.choices.values_mut() {
            choice.staged = choice.enabled;
        }
        FilterEdit {
            filter: self,
            done: false,
        }
    }

    fn reset_staged(&mut self) {
        for choice in self.choices.values_mut() {
            choice.staged = choice.enabled;
        }
    }
}

/// Open filter dialog. Dropping it without `commit` cancels.
#[derive(Debug)]
pub struct FilterEdit<'f> {
    filter: &'f mut MarkerFilter,
    done: bool,
}

impl FilterEdit<'_> {
    /// Stages a category state. Returns false for unknown keys.
    pub fn set(&mut self, key: &IconKey, enabled: bool) -> bool {
        match self.filter.choices.get_mut(key) {
            Some(choice) => {
                choice.staged = enabled;
                true
            }
            None => false,
        }
    }

    /// Staged state of a category.
    #[must_use]
    pub fn staged(&self, key: &IconKey) -> Option<bool> {
        self.filter.choices.get(key).map(|choice| choice.staged)
    }

    /// Choices as the dialog shows them.
    #[must_use]
    pub fn choices(&self) -> Vec<&FilterChoice> {
        self.filter.choices_sorted()
    }

    /// Copies every staged flag to its committed flag.
    ///
    /// Returns the number of categories whose state changed.
    pub fn commit(mut self) -> usize {
        let mut changed = 0;
        for choice in self.filter.choices.values_mut() {
            if choice.enabled != choice.staged {
                choice.enabled = choice.staged;
                changed += 1;
            }
        }
        self.done = true;
        info!(changed, "marker filter committed");
        changed
    }

    /// Discards staged changes.
    pub fn cancel(self) {}
}

impl Drop for FilterEdit<'_> {
    fn drop(&mut self) {
        if !self.done {
            self.filter.reset_staged();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tilemark_shared::EntityKind;

    fn marker(key: &str, dimension: Dimension) -> Marker {
        let catalog = IconCatalog::builtin();
        let icon = catalog.lookup(key).expect("known icon");
        Marker::new(0, 64, 0, dimension, icon, false)
    }

    #[test]
    fn test_defaults_from_catalog() {
        let filter = MarkerFilter::from_catalog(&IconCatalog::builtin());
        let ow = Dimension::OVERWORLD;

        assert!(filter.is_visible(&marker("entity.cow", ow), &ow));
        assert!(!filter.is_visible(&marker("block_entity.chest", ow), &ow));
        // No entry: dimension match only.
        assert_eq!(filter.is_enabled(&IconKey::from_static("entity.item")), None);
        assert!(filter.is_visible(&marker("entity.item", ow), &ow));
        assert!(!filter.is_visible(&marker("entity.item", ow), &Dimension::NETHER));
        assert!(!filter.is_visible(&marker("entity.cow", ow), &Dimension::NETHER));
    }

    #[test]
    fn test_cancel_keeps_committed_state() {
        let mut filter = MarkerFilter::from_catalog(&IconCatalog::builtin());
        let cow = IconKey::from_static("entity.cow");

        let mut edit = filter.begin_edit();
        assert!(edit.set(&cow, false));
        assert_eq!(edit.staged(&cow), Some(false));
        edit.cancel();

        assert_eq!(filter.is_enabled(&cow), Some(true));
        assert!(filter.choices_sorted().iter().all(|c| c.staged() == c.enabled()));
    }

    #[test]
    fn test_drop_without_commit_cancels() {
        let mut filter = MarkerFilter::from_catalog(&IconCatalog::builtin());
        let chest = IconKey::from_static("block_entity.chest");
        {
            let mut edit = filter.begin_edit();
            edit.set(&chest, true);
        }
        assert_eq!(filter.is_enabled(&chest), Some(false));
    }

    #[test]
    fn test_commit_counts_changes() {
        let mut filter = MarkerFilter::from_catalog(&IconCatalog::builtin());
        let chest = IconKey::from_static("block_entity.chest");
        let player = EntityKind::PLAYER.key.clone();

        let mut edit = filter.begin_edit();
        edit.set(&chest, true);
        edit.set(&player, true);
        assert!(!edit.set(&IconKey::from_static("nope"), true));
        assert_eq!(edit.commit(), 1);

        assert_eq!(filter.is_enabled(&chest), Some(true));
    }

    #[test]
    fn test_sorted_by_display_name() {
        let filter = MarkerFilter::from_catalog(&IconCatalog::builtin());
        let names: Vec<&str> = filter
            .choices_sorted()
            .iter()
            .map(|c| c.provider.display_name())
            .collect();
        let mut expected = names.clone();
        expected.sort_unstable();
        assert_eq!(names, expected);
        assert_eq!(names.first(), Some(&"Bat"));
    }

    #[test]
    fn test_overrides() {
        let mut filter = MarkerFilter::from_catalog(&IconCatalog::builtin());
        let unknown = filter.apply_overrides(["block_entity.sign"], ["entity.zombie", "entity.dragon"]);
        assert_eq!(unknown, vec!["entity.dragon".to_string()]);
        assert_eq!(filter.is_enabled(&IconKey::from_static("block_entity.sign")), Some(true));
        assert_eq!(filter.is_enabled(&IconKey::from_static("entity.zombie")), Some(false));
    }
}
