//! The wallet ledger view model: one canonical entry list, one filter mode,
//! one selection set, and everything else derived on demand.

use std::collections::{BTreeSet, HashSet};

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::{
    domain::{EntryId, LedgerEntry, Notice, YearMonth},
    errors::{DeleteError, FetchError},
    source::LedgerSource,
};

use super::{
    filter::{self, FilterMode, Projection, ALL_CATEGORIES},
    selection::SelectionSet,
    time::{Clock, SystemClock},
    totals::{self, CategoryTotal, Totals, TotalsScope},
};

/// Decides whether the current user may delete an entry.
pub type DeleteGuard = Box<dyn Fn(&LedgerEntry) -> bool + Send + Sync>;

/// Handle for an issued fetch. Results are applied only if no newer fetch was
/// issued and the canonical list has not changed since.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    seq: u64,
    epoch: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStatus {
    Applied { entries: usize },
    /// A newer request or a local change superseded this result.
    Stale,
}

/// Result of a confirmed batch delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteOutcome {
    pub removed: BTreeSet<EntryId>,
    /// Requested ids the remote side did not remove; they stay selected.
    pub retained: BTreeSet<EntryId>,
    pub notice: Notice,
}

impl DeleteOutcome {
    pub fn is_partial(&self) -> bool {
        !self.retained.is_empty()
    }
}

pub struct LedgerViewModel {
    canonical: Vec<LedgerEntry>,
    active_month: YearMonth,
    mode: FilterMode,
    selection: SelectionSet,
    clock: Box<dyn Clock>,
    delete_guard: Option<DeleteGuard>,
    last_issued_load: u64,
    epoch: u64,
}

impl Default for LedgerViewModel {
    fn default() -> Self {
        Self::new(Box::new(SystemClock))
    }
}

impl LedgerViewModel {
    pub fn new(clock: Box<dyn Clock>) -> Self {
        let active_month = YearMonth::of(clock.today());
        Self {
            canonical: Vec::new(),
            active_month,
            mode: FilterMode::Month(active_month),
            selection: SelectionSet::new(),
            clock,
            delete_guard: None,
            last_issued_load: 0,
            epoch: 0,
        }
    }

    /// Restricts [`Self::delete_selected`] to entries accepted by `guard`.
    pub fn with_delete_guard(
        mut self,
        guard: impl Fn(&LedgerEntry) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.delete_guard = Some(Box::new(guard));
        self
    }

    // ----- loading -----

    /// Fetches every entry and replaces the canonical list. On failure the
    /// previous state is kept and the error is returned; there is no retry.
    pub fn load_entries(&mut self, source: &dyn LedgerSource) -> Result<LoadStatus, FetchError> {
        let ticket = self.begin_load();
        let result = source.fetch_all();
        self.finish_load(ticket, result)
    }

    pub fn begin_load(&mut self) -> LoadTicket {
        self.last_issued_load += 1;
        LoadTicket {
            seq: self.last_issued_load,
            epoch: self.epoch,
        }
    }

    pub fn finish_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<Vec<LedgerEntry>, FetchError>,
    ) -> Result<LoadStatus, FetchError> {
        if ticket.seq != self.last_issued_load || ticket.epoch != self.epoch {
            warn!(
                ticket = ticket.seq,
                latest = self.last_issued_load,
                "discarding stale fetch result"
            );
            return Ok(LoadStatus::Stale);
        }
        let entries = result.inspect_err(|err| warn!(error = %err, "fetch failed"))?;
        ensure_unique_ids(&entries)?;

        let count = entries.len();
        self.canonical = entries;
        self.epoch += 1;
        self.active_month = YearMonth::of(self.clock.today());
        self.mode = FilterMode::Month(self.active_month);
        let present: HashSet<EntryId> = self.canonical.iter().map(|entry| entry.id).collect();
        self.selection.retain(|id| present.contains(&id));
        info!(entries = count, month = %self.active_month, "ledger entries loaded");
        Ok(LoadStatus::Applied { entries: count })
    }

    // ----- navigation -----

    pub fn set_month(&mut self, month: YearMonth) {
        self.active_month = month;
        self.set_mode(FilterMode::Month(month));
    }

    pub fn previous_month(&mut self) {
        self.set_month(self.active_month.pred());
    }

    pub fn next_month(&mut self) {
        self.set_month(self.active_month.succ());
    }

    pub fn show_current_month(&mut self) {
        self.set_month(YearMonth::of(self.clock.today()));
    }

    /// Shows exactly the entries dated `date`; the month cursor follows it.
    pub fn select_date(&mut self, date: NaiveDate) {
        self.active_month = YearMonth::of(date);
        self.set_mode(FilterMode::ExactDate(date));
    }

    pub fn clear_date_filter(&mut self) {
        self.set_mode(FilterMode::Month(self.active_month));
    }

    pub fn show_whole_year(&mut self, year: i32) {
        self.set_mode(FilterMode::Year(year));
    }

    pub fn show_active_year(&mut self) {
        self.show_whole_year(self.active_month.year());
    }

    pub fn show_all(&mut self) {
        self.set_mode(FilterMode::AllTime);
    }

    /// Index 0 ("All") and out-of-range indices show every entry.
    pub fn select_category_tab(&mut self, index: usize) {
        let mut categories = self.categories();
        if index == 0 || index >= categories.len() {
            if index != 0 {
                debug!(index, "category tab out of range; showing all");
            }
            self.set_mode(FilterMode::AllTime);
        } else {
            self.set_mode(FilterMode::Category(categories.swap_remove(index)));
        }
    }

    /// Selects the tab labelled `name`, returning its index when it exists.
    /// A real category named like the first tab wins over the first tab.
    pub fn select_category(&mut self, name: &str) -> Option<usize> {
        let index = category_tab_index(&self.categories(), name)
            .or_else(|| (name == ALL_CATEGORIES).then_some(0))?;
        self.select_category_tab(index);
        Some(index)
    }

    fn set_mode(&mut self, mode: FilterMode) {
        debug!(mode = %mode, "filter mode changed");
        self.mode = mode;
        self.selection.forget_toggle_all();
    }

    // ----- selection -----

    /// Flips the checked state of `id`. Unknown ids are ignored.
    pub fn toggle_selection(&mut self, id: EntryId) -> bool {
        if self.entry(id).is_none() {
            debug!(%id, "ignoring selection of unknown entry");
            return false;
        }
        let selected = self.selection.toggle(id);
        debug!(%id, selected, "selection toggled");
        selected
    }

    /// Select-all scoped to the current projection.
    pub fn toggle_select_all(&mut self) {
        let visible = self.projection().ids();
        self.selection.toggle_all(&visible);
        debug!(selected = self.selection.len(), "select-all toggled");
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    // ----- deletion -----

    /// Sends the selection as one batch delete. On success the removed ids
    /// leave the canonical list and the selection; on failure nothing changes.
    pub fn delete_selected(
        &mut self,
        source: &dyn LedgerSource,
    ) -> Result<DeleteOutcome, DeleteError> {
        let requested = self.selection.ids().clone();
        if requested.is_empty() {
            return Err(DeleteError::NothingSelected);
        }
        if let Some(guard) = &self.delete_guard {
            let denied: Vec<EntryId> = self
                .canonical
                .iter()
                .filter(|entry| requested.contains(&entry.id) && !guard(entry))
                .map(|entry| entry.id)
                .collect();
            if !denied.is_empty() {
                return Err(DeleteError::NotPermitted(denied));
            }
        }

        let receipt = source
            .delete_batch(&requested)
            .inspect_err(|err| warn!(error = %err, count = requested.len(), "batch delete failed"))?;

        let removed: BTreeSet<EntryId> = receipt
            .removed
            .intersection(&requested)
            .copied()
            .collect();
        let retained: BTreeSet<EntryId> = requested.difference(&removed).copied().collect();

        self.canonical.retain(|entry| !removed.contains(&entry.id));
        self.selection.remove_all(&removed);
        self.epoch += 1;
        if let Some(name) = self.mode.category() {
            if !self.canonical.iter().any(|entry| entry.category == name) {
                debug!(category = name, "category emptied by delete; showing all");
                self.mode = FilterMode::AllTime;
            }
        }

        if retained.is_empty() {
            info!(removed = removed.len(), "entries deleted");
        } else {
            warn!(
                removed = removed.len(),
                retained = retained.len(),
                "remote removed only part of the batch"
            );
        }
        Ok(DeleteOutcome {
            removed,
            retained,
            notice: receipt.notice,
        })
    }

    // ----- derived views -----

    pub fn projection(&self) -> Projection<'_> {
        filter::project(&self.canonical, &self.mode)
    }

    pub fn categories(&self) -> Vec<String> {
        filter::categories(&self.canonical)
    }

    pub fn active_category_index(&self) -> usize {
        self.mode
            .category()
            .and_then(|name| category_tab_index(&self.categories(), name))
            .unwrap_or(0)
    }

    pub fn totals(&self, scope: TotalsScope) -> Totals {
        match scope {
            TotalsScope::All => Totals::of(&self.canonical),
            TotalsScope::ActivePeriod => match self.mode {
                FilterMode::ExactDate(date) => {
                    Totals::of(self.canonical.iter().filter(|entry| entry.date == date))
                }
                _ => Totals::of(
                    self.canonical
                        .iter()
                        .filter(|entry| self.active_month.contains(entry.date)),
                ),
            },
            TotalsScope::Projection => Totals::of(self.projection().iter()),
            TotalsScope::Category => {
                let projection = self.projection();
                match self.mode.category() {
                    Some(name) => {
                        Totals::of(projection.iter().filter(|entry| entry.category == name))
                    }
                    None => Totals::of(projection.iter()),
                }
            }
            TotalsScope::Selected => Totals::of(
                self.canonical
                    .iter()
                    .filter(|entry| self.selection.contains(entry.id)),
            )
            .expense_only(),
        }
    }

    /// Per-category sums over the current projection.
    pub fn category_breakdown(&self) -> Vec<CategoryTotal> {
        let projection = self.projection();
        let tabs = self.categories();
        totals::breakdown(&tabs[1..], projection.entries())
    }

    // ----- accessors -----

    pub fn entries(&self) -> &[LedgerEntry] {
        &self.canonical
    }

    pub fn entry(&self, id: EntryId) -> Option<&LedgerEntry> {
        self.canonical.iter().find(|entry| entry.id == id)
    }

    pub fn active_month(&self) -> YearMonth {
        self.active_month
    }

    pub fn mode(&self) -> &FilterMode {
        &self.mode
    }

    pub fn selected_date(&self) -> Option<NaiveDate> {
        self.mode.selected_date()
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    pub fn selected_ids(&self) -> Vec<EntryId> {
        self.selection.iter().collect()
    }

    pub fn is_selected(&self, id: EntryId) -> bool {
        self.selection.contains(id)
    }
}

/// Index of the tab for a real category; tab 0 is never a category.
fn category_tab_index(tabs: &[String], name: &str) -> Option<usize> {
    tabs.iter().skip(1).position(|label| label == name).map(|pos| pos + 1)
}

fn ensure_unique_ids(entries: &[LedgerEntry]) -> Result<(), FetchError> {
    let mut seen = HashSet::with_capacity(entries.len());
    for entry in entries {
        if !seen.insert(entry.id) {
            return Err(FetchError::Malformed(format!(
                "duplicate entry id #{}",
                entry.id
            )));
        }
    }
    Ok(())
}
