//! Expense list state for the ledger page.

#[cfg(test)]
#[path = "expenses_test.rs"]
mod expenses_test;

use crate::net::types::{CategoryTotal, Expense};

/// Loaded expenses plus request status.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExpensesState {
    /// Newest date first, ties by newest `created_at`. The server emits
    /// fixed-width UTC timestamps, so string order is time order.
    pub items: Vec<Expense>,
    pub loading: bool,
    pub error: Option<String>,
}

impl ExpensesState {
    /// Sum of all amounts, rounded to cents.
    #[must_use]
    pub fn total(&self) -> f64 {
        round_cents(self.items.iter().map(|e| e.amount).sum())
    }

    /// Per-category totals, largest first, ties broken by name.
    #[must_use]
    pub fn by_category(&self) -> Vec<CategoryTotal> {
        let mut totals: Vec<CategoryTotal> = Vec::new();
        for item in &self.items {
            match totals.iter_mut().find(|t| t.category == item.category) {
                Some(t) => {
                    t.total += item.amount;
                    t.count += 1;
                }
                None => totals.push(CategoryTotal { category: item.category.clone(), total: item.amount, count: 1 }),
            }
        }
        for t in &mut totals {
            t.total = round_cents(t.total);
        }
        totals.sort_by(|a, b| b.total.total_cmp(&a.total).then_with(|| a.category.cmp(&b.category)));
        totals
    }

    /// Insert keeping newest-first order. Replaces an item with the same id.
    pub fn insert(&mut self, expense: Expense) {
        self.items.retain(|e| e.id != expense.id);
        let pos = self
            .items
            .iter()
            .position(|e| (e.date.as_str(), e.created_at.as_str()) < (expense.date.as_str(), expense.created_at.as_str()))
            .unwrap_or(self.items.len());
        self.items.insert(pos, expense);
    }

    /// Remove by id. Returns whether anything was removed.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|e| e.id != id);
        self.items.len() != before
    }
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
