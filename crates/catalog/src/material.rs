use serde::{Deserialize, Serialize};

use obraplan_core::{DomainError, DomainResult, Entity, MaterialId};

/// Collection the catalog persists materials under.
pub const MATERIALS: &str = "materials";

/// Catalog entity: a purchasable material with unit price and available
/// stock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub id: MaterialId,
    pub name: String,
    pub unit_price: f64,
    pub stock: f64,
}

impl Material {
    /// Validate and build a new catalog record.
    pub fn new(name: impl Into<String>, unit_price: f64, stock: f64) -> DomainResult<Self> {
        let name = name.into();
        validate(&name, unit_price, stock)?;
        Ok(Self {
            id: MaterialId::new(),
            name,
            unit_price,
            stock,
        })
    }
}

impl Entity for Material {
    type Id = MaterialId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Shared field validation for create and direct edit.
pub(crate) fn validate(name: &str, unit_price: f64, stock: f64) -> DomainResult<()> {
    if name.trim().is_empty() {
        return Err(DomainError::validation("material name cannot be empty"));
    }
    if !unit_price.is_finite() || unit_price < 0.0 {
        return Err(DomainError::validation(
            "unit price must be a number greater than or equal to zero",
        ));
    }
    if !stock.is_finite() || stock < 0.0 {
        return Err(DomainError::validation(
            "stock must be a number greater than or equal to zero",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_rejects_blank_name_and_negative_numbers() {
        assert!(Material::new("  ", 1.0, 1.0).is_err());
        assert!(Material::new("Arena", -1.0, 1.0).is_err());
        assert!(Material::new("Arena", 1.0, -1.0).is_err());
        assert!(Material::new("Arena", f64::NAN, 1.0).is_err());
    }

    #[test]
    fn new_accepts_zero_price_and_zero_stock() {
        let m = Material::new("Arena", 0.0, 0.0).unwrap();
        assert_eq!(m.name, "Arena");
        assert_eq!(m.stock, 0.0);
    }
}
