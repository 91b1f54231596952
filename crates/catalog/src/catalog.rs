//! Material catalog CRUD.

use tracing::{info, instrument};

use obraplan_core::{DomainError, DomainResult, MaterialId};
use obraplan_store::{EntityStore, OrderBy, document};

use crate::material::{MATERIALS, Material, validate};

/// Catalog maintenance operations.
///
/// Everything here goes straight to the store; stock accounting belongs
/// to the [`InventoryLedger`](crate::InventoryLedger). The one overlap is
/// [`update`](Self::update), which writes the stock field directly and may
/// therefore invalidate in-flight reservations; that is the accepted cost
/// of letting the user correct a miscounted shelf.
#[derive(Debug, Clone)]
pub struct MaterialCatalog<S> {
    store: S,
}

impl<S> MaterialCatalog<S>
where
    S: EntityStore,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Add a material to the catalog.
    #[instrument(skip(self, name), fields(name = %name.as_ref()))]
    pub fn add(
        &self,
        name: impl AsRef<str>,
        unit_price: f64,
        stock: f64,
    ) -> DomainResult<Material> {
        let material = Material::new(name.as_ref(), unit_price, stock)?;
        self.store.put(
            MATERIALS,
            Some(*material.id.as_uuid()),
            document::to_fields(&material)?,
        )?;
        info!(material_id = %material.id, "material added");
        Ok(material)
    }

    /// Direct edit of a catalog record, stock included.
    #[instrument(skip(self, name), fields(material_id = %material_id))]
    pub fn update(
        &self,
        material_id: MaterialId,
        name: impl AsRef<str>,
        unit_price: f64,
        stock: f64,
    ) -> DomainResult<Material> {
        validate(name.as_ref(), unit_price, stock)?;

        // Reject edits of records that no longer exist instead of
        // resurrecting them through the upsert.
        let existing = self.store.get(MATERIALS, *material_id.as_uuid())?;
        let mut material: Material = existing.decode()?;
        material.name = name.as_ref().to_string();
        material.unit_price = unit_price;
        material.stock = stock;

        self.store.put(
            MATERIALS,
            Some(*material_id.as_uuid()),
            document::to_fields(&material)?,
        )?;
        Ok(material)
    }

    /// Remove a material from the catalog.
    ///
    /// Budget lines referencing it are left in place; their later ledger
    /// lookups resolve as `NotFound` (dangling references are a known
    /// property of the data model, not cleaned up here).
    #[instrument(skip(self), fields(material_id = %material_id))]
    pub fn remove(&self, material_id: MaterialId) -> DomainResult<()> {
        self.store.delete(MATERIALS, *material_id.as_uuid())?;
        info!(%material_id, "material removed");
        Ok(())
    }

    pub fn get(&self, material_id: MaterialId) -> DomainResult<Material> {
        let doc = self.store.get(MATERIALS, *material_id.as_uuid())?;
        Ok(doc.decode()?)
    }

    /// All materials, ordered by name.
    pub fn list(&self) -> DomainResult<Vec<Material>> {
        let docs = self
            .store
            .query(MATERIALS, None, Some(&OrderBy::asc("name")))?;
        docs.iter()
            .map(|d| d.decode().map_err(DomainError::from))
            .collect()
    }
}
