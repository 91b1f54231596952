//! Aggregation & totals: a pure projection over the current line set.
//!
//! Recomputed by display code whenever the line set or the labor cost
//! changes; nothing here owns state. Prices come from the attach-time
//! snapshots, so totals of past budgets stay stable when catalog prices
//! move (historical-pricing policy).

use serde::Serialize;

use crate::line::BudgetLine;

/// Derived cost figures for one budget.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BudgetTotals {
    pub materials_subtotal: f64,
    pub labor_cost: f64,
    pub grand_total: f64,
}

/// `Σ(snapshot price × quantity)` over the given lines.
pub fn materials_subtotal(lines: &[BudgetLine]) -> f64 {
    lines.iter().map(BudgetLine::subtotal).sum()
}

/// Materials subtotal plus labor.
pub fn compute_totals(lines: &[BudgetLine], labor_cost: f64) -> BudgetTotals {
    let materials_subtotal = materials_subtotal(lines);
    BudgetTotals {
        materials_subtotal,
        labor_cost,
        grand_total: materials_subtotal + labor_cost,
    }
}
