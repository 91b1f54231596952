use serde::{Deserialize, Serialize};

use obraplan_core::{BudgetId, DomainError, DomainResult, Entity, LineId, MaterialId, ValueObject};

/// Collection budget lines are persisted under.
pub const BUDGET_LINES: &str = "budget_lines";

/// Field linking a line document to its parent budget (subcollection key).
pub const LINE_PARENT_FIELD: &str = "budget_id";

/// Display attributes of a material, frozen at the moment it was attached
/// to a budget.
///
/// This is a value object, not a cache: it is never refreshed from the
/// catalog, so totals of old budgets stay stable when prices change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttachSnapshot {
    pub name: String,
    pub unit_price: f64,
}

impl ValueObject for AttachSnapshot {}

/// A quantity of one material attached to one budget.
///
/// The material reference is lookup-only; the line stays behind if the
/// material is later deleted from the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetLine {
    pub id: LineId,
    pub budget_id: BudgetId,
    pub material_id: MaterialId,
    pub quantity: f64,
    pub snapshot: AttachSnapshot,
}

impl BudgetLine {
    pub fn new(
        budget_id: BudgetId,
        material_id: MaterialId,
        quantity: f64,
        snapshot: AttachSnapshot,
    ) -> DomainResult<Self> {
        validate_quantity(quantity)?;
        Ok(Self {
            id: LineId::new(),
            budget_id,
            material_id,
            quantity,
            snapshot,
        })
    }

    /// Line cost at the attach-time price.
    pub fn subtotal(&self) -> f64 {
        self.snapshot.unit_price * self.quantity
    }
}

impl Entity for BudgetLine {
    type Id = LineId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

pub(crate) fn validate_quantity(quantity: f64) -> DomainResult<()> {
    if !quantity.is_finite() || quantity <= 0.0 {
        return Err(DomainError::validation(
            "quantity must be a number greater than zero",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> AttachSnapshot {
        AttachSnapshot {
            name: "Cemento".to_string(),
            unit_price: 10.0,
        }
    }

    #[test]
    fn zero_and_negative_quantities_are_rejected() {
        let budget = BudgetId::new();
        let material = MaterialId::new();
        assert!(BudgetLine::new(budget, material, 0.0, snapshot()).is_err());
        assert!(BudgetLine::new(budget, material, -3.0, snapshot()).is_err());
    }

    #[test]
    fn subtotal_uses_the_snapshot_price() {
        let line = BudgetLine::new(BudgetId::new(), MaterialId::new(), 2.0, snapshot()).unwrap();
        assert_eq!(line.subtotal(), 20.0);
    }
}
