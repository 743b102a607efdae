//! Checked entries awaiting a bulk action.

use std::collections::BTreeSet;

use crate::domain::EntryId;

/// Set of checked entry ids.
///
/// [`SelectionSet::toggle_all`] remembers the set it replaced; calling it
/// again before any other change restores that set exactly. Every other
/// mutation forgets the remembered set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    ids: BTreeSet<EntryId>,
    before_toggle_all: Option<BTreeSet<EntryId>>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: EntryId) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = EntryId> + '_ {
        self.ids.iter().copied()
    }

    pub fn ids(&self) -> &BTreeSet<EntryId> {
        &self.ids
    }

    /// Flips membership of `id`; returns whether it is now selected.
    pub fn toggle(&mut self, id: EntryId) -> bool {
        self.forget_toggle_all();
        if self.ids.remove(&id) {
            false
        } else {
            self.ids.insert(id);
            true
        }
    }

    /// Clears everything when all of `visible` is already selected,
    /// otherwise adds all of `visible`.
    pub fn toggle_all(&mut self, visible: &[EntryId]) {
        if let Some(previous) = self.before_toggle_all.take() {
            self.ids = previous;
            return;
        }
        let previous = self.ids.clone();
        if visible.iter().all(|id| self.ids.contains(id)) {
            self.ids.clear();
        } else {
            self.ids.extend(visible.iter().copied());
        }
        self.before_toggle_all = Some(previous);
    }

    pub fn remove_all(&mut self, removed: &BTreeSet<EntryId>) {
        self.forget_toggle_all();
        self.ids.retain(|id| !removed.contains(id));
    }

    pub fn retain(&mut self, keep: impl Fn(EntryId) -> bool) {
        self.forget_toggle_all();
        self.ids.retain(|id| keep(*id));
    }

    pub fn clear(&mut self) {
        self.forget_toggle_all();
        self.ids.clear();
    }

    /// Drops the set remembered by the last `toggle_all`.
    pub fn forget_toggle_all(&mut self) {
        self.before_toggle_all = None;
    }
}
