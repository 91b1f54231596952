//! `obraplan-app` — the application facade the rendering layer talks to.
//!
//! Composes the store, catalog, ledger, and budget services behind one
//! constructor, and re-exposes the store's change feed as named watch
//! methods. Display code calls the operations, subscribes to the feeds,
//! and recomputes totals from each pushed line set.

mod integration_tests;

use std::sync::Arc;

use obraplan_budgets::{
    BUDGET_LINES, BUDGETS, BudgetService, BudgetTotals, LINE_PARENT_FIELD, LineManager,
    compute_totals,
};
use obraplan_catalog::{MATERIALS, MaterialCatalog};
use obraplan_core::{BudgetId, DomainResult};
use obraplan_store::{ChangeSet, EntityStore, InMemoryStore, Scope, Subscription};

/// Application facade over one entity store.
#[derive(Debug, Clone)]
pub struct App<S> {
    store: S,
    catalog: MaterialCatalog<S>,
    budgets: BudgetService<S>,
    lines: LineManager<S>,
}

impl App<Arc<InMemoryStore>> {
    /// Facade over a fresh in-memory store (tests, demos).
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryStore::new()))
    }
}

impl<S> App<S>
where
    S: EntityStore + Clone,
{
    pub fn new(store: S) -> Self {
        Self {
            catalog: MaterialCatalog::new(store.clone()),
            budgets: BudgetService::new(store.clone()),
            lines: LineManager::new(store.clone()),
            store,
        }
    }

    /// Material catalog operations (CRUD; stock edits included).
    pub fn catalog(&self) -> &MaterialCatalog<S> {
        &self.catalog
    }

    /// Budget-level operations (create, rename, labor cost, listing).
    pub fn budgets(&self) -> &BudgetService<S> {
        &self.budgets
    }

    /// Line operations (add/remove/edit with stock accounting).
    pub fn lines(&self) -> &LineManager<S> {
        &self.lines
    }

    /// Delete a budget and all its lines (no stock restoration).
    pub fn delete_budget(&self, budget_id: BudgetId) -> DomainResult<()> {
        self.lines.cascade_delete_budget(budget_id)
    }

    /// Current totals of one budget: snapshot-priced subtotal plus labor.
    pub fn totals_for(&self, budget_id: BudgetId) -> DomainResult<BudgetTotals> {
        let budget = self.budgets.get(budget_id)?;
        let lines = self.lines.lines_for(budget_id)?;
        Ok(compute_totals(&lines, budget.labor_cost))
    }

    /// Watch the material catalog.
    pub fn watch_materials(&self) -> Subscription<ChangeSet> {
        self.store.subscribe(Scope::Collection(MATERIALS))
    }

    /// Watch the budget list.
    pub fn watch_budgets(&self) -> Subscription<ChangeSet> {
        self.store.subscribe(Scope::Collection(BUDGETS))
    }

    /// Watch the line set of one budget.
    pub fn watch_lines_of(&self, budget_id: BudgetId) -> Subscription<ChangeSet> {
        self.store.subscribe(Scope::Children {
            collection: BUDGET_LINES,
            parent_field: LINE_PARENT_FIELD,
            parent_id: *budget_id.as_uuid(),
        })
    }
}
