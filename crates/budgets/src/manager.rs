//! Budget line manager: line lifecycle + stock conservation.
//!
//! Every line mutation pairs with the matching inventory ledger call so
//! that, for each material, `stock = initial_stock - Σ(live line
//! quantities)`. The ledger call always lands **before** the line write
//! (reserve before create, release before delete). The two documented
//! holes in the invariant are the cascade delete (no per-line release)
//! and direct catalog stock edits.

use tracing::{info, instrument, warn};

use obraplan_core::{BudgetId, DomainError, DomainResult, LineId, MaterialId};
use obraplan_store::{DocumentRef, EntityStore, Filter, OrderBy, document};

use obraplan_catalog::{InventoryLedger, MATERIALS, Material};

use crate::budget::BUDGETS;
use crate::line::{AttachSnapshot, BUDGET_LINES, BudgetLine, LINE_PARENT_FIELD, validate_quantity};

/// Coordinates line documents with the inventory ledger.
#[derive(Debug, Clone)]
pub struct LineManager<S> {
    store: S,
    ledger: InventoryLedger<S>,
}

impl<S> LineManager<S>
where
    S: EntityStore + Clone,
{
    pub fn new(store: S) -> Self {
        let ledger = InventoryLedger::new(store.clone());
        Self { store, ledger }
    }

    /// Attach `quantity` units of a material to a budget.
    ///
    /// Reserves stock first; the line document is only created after the
    /// reservation committed, so a blocked reservation leaves no partial
    /// state. The created line snapshots the material's current name and
    /// price.
    #[instrument(skip(self), fields(budget_id = %budget_id, material_id = %material_id))]
    pub fn add_line(
        &self,
        budget_id: BudgetId,
        material_id: MaterialId,
        quantity: f64,
    ) -> DomainResult<LineId> {
        validate_quantity(quantity)?;

        // Both referenced records must exist before any stock moves.
        self.store.get(BUDGETS, *budget_id.as_uuid())?;
        let material: Material = self
            .store
            .get(MATERIALS, *material_id.as_uuid())?
            .decode()?;

        self.ledger.reserve(material_id, quantity)?;

        let line = BudgetLine::new(
            budget_id,
            material_id,
            quantity,
            AttachSnapshot {
                name: material.name,
                unit_price: material.unit_price,
            },
        )?;
        self.store.put(
            BUDGET_LINES,
            Some(*line.id.as_uuid()),
            document::to_fields(&line)?,
        )?;

        info!(line_id = %line.id, quantity, "line added");
        Ok(line.id)
    }

    /// Detach a line, restoring its quantity to the material's stock.
    ///
    /// A `NotFound` from the ledger is tolerated: the material was deleted
    /// from the catalog while this line still referenced it, and the line
    /// must remain removable. If the line deletion itself fails after the
    /// release committed, stock has been restored but the line still
    /// exists; the error is surfaced for a manual retry.
    #[instrument(skip(self), fields(budget_id = %budget_id, line_id = %line_id))]
    pub fn remove_line(&self, budget_id: BudgetId, line_id: LineId) -> DomainResult<()> {
        let line = self.owned_line(budget_id, line_id)?;

        match self.ledger.release(line.material_id, line.quantity) {
            Ok(()) => {}
            Err(DomainError::NotFound) => {
                warn!(material_id = %line.material_id, "releasing line of a deleted material, stock not restored");
            }
            Err(e) => return Err(e),
        }

        self.store.delete(BUDGET_LINES, *line_id.as_uuid())?;
        info!(quantity = line.quantity, "line removed");
        Ok(())
    }

    /// Change a line's quantity, moving stock by the delta.
    ///
    /// Fails `InsufficientStock` without touching the line when the
    /// increase exceeds available stock.
    #[instrument(skip(self), fields(budget_id = %budget_id, line_id = %line_id))]
    pub fn edit_line_quantity(
        &self,
        budget_id: BudgetId,
        line_id: LineId,
        new_quantity: f64,
    ) -> DomainResult<()> {
        validate_quantity(new_quantity)?;
        let mut line = self.owned_line(budget_id, line_id)?;

        let delta = new_quantity - line.quantity;
        self.ledger.adjust(line.material_id, delta)?;

        line.quantity = new_quantity;
        self.store.put(
            BUDGET_LINES,
            Some(*line_id.as_uuid()),
            document::to_fields(&line)?,
        )?;

        info!(delta, new_quantity, "line quantity updated");
        Ok(())
    }

    /// Current lines of a budget, oldest first.
    pub fn lines_for(&self, budget_id: BudgetId) -> DomainResult<Vec<BudgetLine>> {
        let filter = Filter::field_equals(LINE_PARENT_FIELD, budget_id.to_string());
        let docs = self
            .store
            .query(BUDGET_LINES, Some(&filter), Some(&OrderBy::asc("id")))?;
        docs.iter()
            .map(|d| d.decode().map_err(DomainError::from))
            .collect()
    }

    /// Delete a budget together with all its lines, in one batch.
    ///
    /// Stock is **not** restored for the deleted lines: the cascade is the
    /// one knowingly unbalanced path in the stock accounting (the consumed
    /// quantities stay consumed).
    #[instrument(skip(self), fields(budget_id = %budget_id))]
    pub fn cascade_delete_budget(&self, budget_id: BudgetId) -> DomainResult<()> {
        let filter = Filter::field_equals(LINE_PARENT_FIELD, budget_id.to_string());
        let lines = self.store.query(BUDGET_LINES, Some(&filter), None)?;

        let mut refs: Vec<DocumentRef> = lines
            .iter()
            .map(|d| DocumentRef::new(BUDGET_LINES, d.id))
            .collect();
        refs.push(DocumentRef::new(BUDGETS, *budget_id.as_uuid()));

        self.store.batch_delete(&refs)?;
        info!(deleted_lines = lines.len(), "budget cascade-deleted");
        Ok(())
    }

    /// Line lookup scoped to its budget; a line under a different budget
    /// is `NotFound` for this one.
    fn owned_line(&self, budget_id: BudgetId, line_id: LineId) -> DomainResult<BudgetLine> {
        let line: BudgetLine = self.store.get(BUDGET_LINES, *line_id.as_uuid())?.decode()?;
        if line.budget_id != budget_id {
            return Err(DomainError::NotFound);
        }
        Ok(line)
    }
}
