use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use obraplan_core::{BudgetId, DomainError, DomainResult, Entity};

/// Collection budgets are persisted under.
pub const BUDGETS: &str = "budgets";

/// A named cost estimate. Lines live in their own collection, keyed back
/// to the budget; labor is a single figure added on top of the material
/// subtotal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    pub id: BudgetId,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub labor_cost: f64,
}

impl Budget {
    /// New budget with zero labor cost.
    pub fn new(name: impl Into<String>, created_at: DateTime<Utc>) -> DomainResult<Self> {
        let name = name.into();
        validate_name(&name)?;
        Ok(Self {
            id: BudgetId::new(),
            name,
            created_at,
            labor_cost: 0.0,
        })
    }
}

impl Entity for Budget {
    type Id = BudgetId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

pub(crate) fn validate_name(name: &str) -> DomainResult<()> {
    if name.trim().is_empty() {
        return Err(DomainError::validation("budget name cannot be empty"));
    }
    Ok(())
}

pub(crate) fn validate_labor_cost(labor_cost: f64) -> DomainResult<()> {
    if !labor_cost.is_finite() || labor_cost < 0.0 {
        return Err(DomainError::validation(
            "labor cost must be a number greater than or equal to zero",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_budget_starts_with_zero_labor() {
        let b = Budget::new("Reforma cocina", Utc::now()).unwrap();
        assert_eq!(b.labor_cost, 0.0);
    }

    #[test]
    fn blank_name_is_rejected() {
        assert!(Budget::new("   ", Utc::now()).is_err());
    }
}
