//! Budget-level upkeep: create, rename, labor cost, listing.

use chrono::Utc;
use tracing::{info, instrument};

use obraplan_core::{BudgetId, DomainError, DomainResult};
use obraplan_store::{EntityStore, OrderBy, document};

use crate::budget::{BUDGETS, Budget, validate_labor_cost, validate_name};

/// CRUD over budget records.
///
/// Deletion is not here: removing a budget cascades over its lines and
/// lives on [`LineManager::cascade_delete_budget`](crate::LineManager::cascade_delete_budget).
#[derive(Debug, Clone)]
pub struct BudgetService<S> {
    store: S,
}

impl<S> BudgetService<S>
where
    S: EntityStore,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Create a budget with zero labor cost, stamped now.
    #[instrument(skip(self, name), fields(name = %name.as_ref()))]
    pub fn create(&self, name: impl AsRef<str>) -> DomainResult<Budget> {
        let budget = Budget::new(name.as_ref(), Utc::now())?;
        self.store.put(
            BUDGETS,
            Some(*budget.id.as_uuid()),
            document::to_fields(&budget)?,
        )?;
        info!(budget_id = %budget.id, "budget created");
        Ok(budget)
    }

    /// Rename a budget.
    #[instrument(skip(self, name), fields(budget_id = %budget_id))]
    pub fn rename(&self, budget_id: BudgetId, name: impl AsRef<str>) -> DomainResult<()> {
        validate_name(name.as_ref())?;
        let mut budget = self.get(budget_id)?;
        budget.name = name.as_ref().to_string();
        self.store.put(
            BUDGETS,
            Some(*budget_id.as_uuid()),
            document::to_fields(&budget)?,
        )?;
        Ok(())
    }

    /// Set the labor cost figure added on top of the material subtotal.
    #[instrument(skip(self), fields(budget_id = %budget_id))]
    pub fn set_labor_cost(&self, budget_id: BudgetId, labor_cost: f64) -> DomainResult<()> {
        validate_labor_cost(labor_cost)?;
        let mut budget = self.get(budget_id)?;
        budget.labor_cost = labor_cost;
        self.store.put(
            BUDGETS,
            Some(*budget_id.as_uuid()),
            document::to_fields(&budget)?,
        )?;
        info!(labor_cost, "labor cost updated");
        Ok(())
    }

    pub fn get(&self, budget_id: BudgetId) -> DomainResult<Budget> {
        let doc = self.store.get(BUDGETS, *budget_id.as_uuid())?;
        Ok(doc.decode()?)
    }

    /// All budgets, newest first.
    pub fn list(&self) -> DomainResult<Vec<Budget>> {
        let docs = self
            .store
            .query(BUDGETS, None, Some(&OrderBy::desc("created_at")))?;
        docs.iter()
            .map(|d| d.decode().map_err(DomainError::from))
            .collect()
    }
}
