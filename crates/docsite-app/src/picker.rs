//! Picker state manager
//!
//! Holds one active value per picker kind declared by the current page and
//! derives which gated sections and minitoc entries are visible. Visibility is
//! recomputed synchronously on every successful selection.

use std::collections::{BTreeMap, BTreeSet};

use docsite_core::prelude::*;
use docsite_core::{Page, PickerDecl, PickerKind};

use crate::store::{picker_key, PreferenceStore, ScopedStore};

/// Stored value when still offered by `decl`, else the page default
pub fn resolve_initial(store: &ScopedStore, decl: &PickerDecl) -> String {
    match store.get(picker_key(decl.kind)) {
        Some(stored) if decl.offers(&stored) => stored,
        Some(stored) => {
            debug!(
                "Stored {} '{}' not offered here, using default '{}'",
                decl.kind, stored, decl.default
            );
            decl.default.clone()
        }
        None => decl.default.clone(),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PickerState {
    selections: BTreeMap<PickerKind, String>,
    visible_sections: BTreeSet<String>,
    visible_minitoc: Vec<String>,
}

impl PickerState {
    /// Initial selections for `page`.
    ///
    /// `version` is the negotiated version; when the page declares a version
    /// picker offering it, it wins over the stored cookie.
    pub fn initialize(page: &Page, store: &ScopedStore, version: Option<&str>) -> Self {
        let mut selections = BTreeMap::new();
        for decl in &page.pickers {
            let value = match (decl.kind, version) {
                (PickerKind::Version, Some(v)) if decl.offers(v) => v.to_string(),
                _ => resolve_initial(store, decl),
            };
            selections.insert(decl.kind, value);
        }

        let mut state = Self {
            selections,
            ..Self::default()
        };
        state.recompute(page);
        state
    }

    /// Validate and apply a selection, then persist it.
    ///
    /// Returns whether the visible set changed. An invalid value leaves the
    /// state and the store untouched.
    pub fn select(
        &mut self,
        page: &Page,
        store: &ScopedStore,
        kind: PickerKind,
        value: &str,
    ) -> Result<bool> {
        let offered = page.picker(kind).is_some_and(|decl| decl.offers(value));
        if !offered {
            return Err(Error::invalid_selection(kind, value));
        }

        self.selections.insert(kind, value.to_string());
        if let Err(e) = store.set(picker_key(kind), value) {
            warn!("Failed to persist {} selection '{}': {}", kind, value, e);
        }

        let before = (self.visible_sections.clone(), self.visible_minitoc.clone());
        self.recompute(page);
        Ok(before != (self.visible_sections.clone(), self.visible_minitoc.clone()))
    }

    /// Record a version chosen outside the picker (negotiator) without
    /// touching the store.
    pub fn sync_version(&mut self, page: &Page, version: &str) {
        if page
            .picker(PickerKind::Version)
            .is_some_and(|decl| decl.offers(version))
        {
            self.selections
                .insert(PickerKind::Version, version.to_string());
            self.recompute(page);
        }
    }

    pub fn current(&self, kind: PickerKind) -> Option<&str> {
        self.selections.get(&kind).map(String::as_str)
    }

    pub fn selections(&self) -> &BTreeMap<PickerKind, String> {
        &self.selections
    }

    pub fn is_section_visible(&self, id: &str) -> bool {
        self.visible_sections.contains(id)
    }

    /// Visible gated section ids, sorted
    pub fn visible_sections(&self) -> Vec<String> {
        self.visible_sections.iter().cloned().collect()
    }

    /// Anchors of visible minitoc entries, in page order
    pub fn visible_minitoc(&self) -> &[String] {
        &self.visible_minitoc
    }

    fn recompute(&mut self, page: &Page) {
        self.visible_sections = page
            .sections
            .iter()
            .filter(|s| s.is_visible(&self.selections))
            .map(|s| s.id.clone())
            .collect();

        self.visible_minitoc = page
            .minitoc
            .iter()
            .filter(|entry| match &entry.gating_section {
                Some(section) => self.visible_sections.contains(section),
                None => true,
            })
            .map(|entry| entry.anchor.clone())
            .collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use docsite_core::{ContentSection, MinitocEntry, PickerSelection};
    use std::sync::Arc;

    fn page() -> Page {
        Page {
            path: "/en/installing".into(),
            title: "Installing".into(),
            pickers: vec![
                PickerDecl {
                    kind: PickerKind::Platform,
                    options: vec!["mac".into(), "windows".into(), "linux".into()],
                    default: "linux".into(),
                },
                PickerDecl {
                    kind: PickerKind::Tool,
                    options: vec!["cli".into(), "desktop".into()],
                    default: "cli".into(),
                },
            ],
            sections: vec![
                ContentSection {
                    id: "mac-steps".into(),
                    requires: vec![PickerSelection::new(PickerKind::Platform, "mac")],
                },
                ContentSection {
                    id: "linux-cli".into(),
                    requires: vec![
                        PickerSelection::new(PickerKind::Platform, "linux"),
                        PickerSelection::new(PickerKind::Tool, "cli"),
                    ],
                },
            ],
            minitoc: vec![
                MinitocEntry {
                    anchor: "install-mac".into(),
                    title: "Install on macOS".into(),
                    gating_section: Some("mac-steps".into()),
                },
                MinitocEntry {
                    anchor: "install-linux".into(),
                    title: "Install on Linux".into(),
                    gating_section: Some("linux-cli".into()),
                },
                MinitocEntry {
                    anchor: "next-steps".into(),
                    title: "Next steps".into(),
                    gating_section: None,
                },
            ],
            ..Page::default()
        }
    }

    fn store() -> (Arc<MemoryStore>, ScopedStore) {
        let shared = Arc::new(MemoryStore::new());
        let scoped = ScopedStore::pickers(shared.clone());
        (shared, scoped)
    }

    #[test]
    fn test_initialize_uses_page_defaults() {
        let (_, scoped) = store();
        let state = PickerState::initialize(&page(), &scoped, None);
        assert_eq!(state.current(PickerKind::Platform), Some("linux"));
        assert_eq!(state.current(PickerKind::Tool), Some("cli"));
        assert_eq!(state.visible_sections(), vec!["linux-cli"]);
        assert_eq!(state.visible_minitoc(), ["install-linux", "next-steps"]);
    }

    #[test]
    fn test_resolve_initial_prefers_stored_offered_value() {
        let (shared, scoped) = store();
        let page = page();
        let decl = &page.pickers[0];

        shared.set("platform", "mac").unwrap();
        assert_eq!(resolve_initial(&scoped, decl), "mac");

        shared.set("platform", "solaris").unwrap();
        assert_eq!(resolve_initial(&scoped, decl), "linux");
    }

    #[test]
    fn test_select_updates_visibility_and_store() {
        let (shared, scoped) = store();
        let page = page();
        let mut state = PickerState::initialize(&page, &scoped, None);

        let changed = state
            .select(&page, &scoped, PickerKind::Platform, "mac")
            .unwrap();
        assert!(changed);
        assert!(state.is_section_visible("mac-steps"));
        assert!(!state.is_section_visible("linux-cli"));
        assert_eq!(state.visible_minitoc(), ["install-mac", "next-steps"]);
        assert_eq!(shared.get("platform").as_deref(), Some("mac"));
    }

    #[test]
    fn test_select_invalid_value_changes_nothing() {
        let (shared, scoped) = store();
        let page = page();
        let mut state = PickerState::initialize(&page, &scoped, None);
        let before = state.clone();

        let err = state
            .select(&page, &scoped, PickerKind::Platform, "solaris")
            .unwrap_err();
        assert!(matches!(err, Error::InvalidSelection { .. }));
        assert_eq!(state, before);
        assert_eq!(shared.get("platform"), None);

        // Kind the page does not declare
        assert!(state
            .select(&page, &scoped, PickerKind::Language, "python")
            .is_err());
    }

    #[test]
    fn test_select_same_value_reports_no_change() {
        let (_, scoped) = store();
        let page = page();
        let mut state = PickerState::initialize(&page, &scoped, None);
        assert!(!state
            .select(&page, &scoped, PickerKind::Platform, "linux")
            .unwrap());
    }

    #[test]
    fn test_selection_survives_reinitialize() {
        let (_, scoped) = store();
        let page = page();
        let mut state = PickerState::initialize(&page, &scoped, None);
        state
            .select(&page, &scoped, PickerKind::Tool, "desktop")
            .unwrap();

        let reloaded = PickerState::initialize(&page, &scoped, None);
        assert_eq!(reloaded.current(PickerKind::Tool), Some("desktop"));
        assert!(reloaded.visible_sections().is_empty());
    }

    #[test]
    fn test_negotiated_version_wins_over_cookie() {
        let (shared, scoped) = store();
        shared.set("version", "v1").unwrap();
        let mut page = page();
        page.pickers.push(PickerDecl {
            kind: PickerKind::Version,
            options: vec!["v1".into(), "v2".into()],
            default: "v1".into(),
        });

        let mut state = PickerState::initialize(&page, &scoped, Some("v2"));
        assert_eq!(state.current(PickerKind::Version), Some("v2"));

        state.sync_version(&page, "v1");
        assert_eq!(state.current(PickerKind::Version), Some("v1"));
        state.sync_version(&page, "v9");
        assert_eq!(state.current(PickerKind::Version), Some("v1"));
    }
}
