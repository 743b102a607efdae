//! Income/expense sums over slices of the ledger.

use std::fmt;

use crate::domain::LedgerEntry;

/// Which entries a [`Totals`] value is computed over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TotalsScope {
    /// The whole canonical list, regardless of the active filter.
    All,
    /// The selected date when one is active, otherwise the active month.
    ActivePeriod,
    /// The current projection.
    Projection,
    /// Projection entries of the active category tab.
    Category,
    /// Selected entries; expense only.
    Selected,
}

impl fmt::Display for TotalsScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TotalsScope::All => "all",
            TotalsScope::ActivePeriod => "active-period",
            TotalsScope::Projection => "projection",
            TotalsScope::Category => "category",
            TotalsScope::Selected => "selected",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Totals {
    pub income: u64,
    pub expense: u64,
}

impl Totals {
    pub fn of<'a>(entries: impl IntoIterator<Item = &'a LedgerEntry>) -> Self {
        entries.into_iter().fold(Self::default(), |acc, entry| Self {
            income: acc.income.saturating_add(entry.income),
            expense: acc.expense.saturating_add(entry.expense),
        })
    }

    pub fn expense_only(self) -> Self {
        Self {
            income: 0,
            expense: self.expense,
        }
    }

    /// Income minus expense.
    pub fn net(&self) -> i128 {
        i128::from(self.income) - i128::from(self.expense)
    }
}

/// Per-category sums for the category summary panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryTotal {
    pub category: String,
    pub count: usize,
    pub totals: Totals,
}

/// Groups `entries` by category, following the order of `categories`.
/// Categories without entries are omitted; the `"All"` label never matches.
pub fn breakdown(categories: &[String], entries: &[&LedgerEntry]) -> Vec<CategoryTotal> {
    categories
        .iter()
        .filter_map(|category| {
            let members: Vec<&LedgerEntry> = entries
                .iter()
                .copied()
                .filter(|entry| entry.category == *category)
                .collect();
            if members.is_empty() {
                return None;
            }
            Some(CategoryTotal {
                category: category.clone(),
                count: members.len(),
                totals: Totals::of(members),
            })
        })
        .collect()
}
