//! Inventory ledger: the one mutator path into `Material.stock`.
//!
//! Every stock movement is a conditional read-modify-write: read the
//! material document (capturing its version), decide against the stock it
//! carries, and commit with [`EntityStore::update_if`] against that
//! version. A concurrent writer moves the version and the commit comes
//! back `Conflict`, so two reservations can never both spend the same
//! stock; the loser re-reads and retries up to a small bound.

use tracing::{debug, instrument, warn};

use obraplan_core::{DomainError, DomainResult, MaterialId};
use obraplan_store::{EntityStore, StoreError, document};

use crate::material::{MATERIALS, Material};

/// Consecutive lost races tolerated before giving up with `Conflict`.
const MAX_COMMIT_ATTEMPTS: usize = 8;

/// Atomic-intent reserve/release/adjust operations over material stock.
#[derive(Debug, Clone)]
pub struct InventoryLedger<S> {
    store: S,
}

impl<S> InventoryLedger<S>
where
    S: EntityStore,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Reserve `amount` units: fails `InsufficientStock` when the material
    /// has less than `amount` available, otherwise commits `stock - amount`.
    #[instrument(skip(self), fields(material_id = %material_id))]
    pub fn reserve(&self, material_id: MaterialId, amount: f64) -> DomainResult<()> {
        ensure_amount(amount)?;
        self.commit_stock_change(material_id, -amount)
    }

    /// Release `amount` units: commits `stock + amount`.
    ///
    /// Never fails on "too much": releasing beyond the original
    /// reservation adds headroom. A lost or duplicate release therefore
    /// silently corrupts the conservation invariant; callers own the
    /// pairing discipline.
    #[instrument(skip(self), fields(material_id = %material_id))]
    pub fn release(&self, material_id: MaterialId, amount: f64) -> DomainResult<()> {
        ensure_amount(amount)?;
        self.commit_stock_change(material_id, amount)
    }

    /// Adjust for an edit-in-place: reserve semantics for `delta > 0`,
    /// release semantics for `delta < 0`, no-op for zero.
    ///
    /// `InsufficientStock` only when `delta > 0` exceeds available stock.
    #[instrument(skip(self), fields(material_id = %material_id))]
    pub fn adjust(&self, material_id: MaterialId, delta: f64) -> DomainResult<()> {
        if !delta.is_finite() {
            return Err(DomainError::validation("stock delta must be finite"));
        }
        if delta == 0.0 {
            return Ok(());
        }
        self.commit_stock_change(material_id, -delta)
    }

    /// Conditional read-modify-write loop. `stock_delta` is applied to the
    /// stored stock; a negative result is a blocked reservation.
    fn commit_stock_change(&self, material_id: MaterialId, stock_delta: f64) -> DomainResult<()> {
        for attempt in 1..=MAX_COMMIT_ATTEMPTS {
            let doc = self.store.get(MATERIALS, *material_id.as_uuid())?;
            let mut material: Material = doc.decode()?;

            let new_stock = material.stock + stock_delta;
            if new_stock < 0.0 {
                return Err(DomainError::insufficient_stock(
                    material.name,
                    material.stock,
                    -stock_delta,
                ));
            }

            material.stock = new_stock;
            let fields = document::to_fields(&material)?;

            match self
                .store
                .update_if(MATERIALS, *material_id.as_uuid(), doc.version, fields)
            {
                Ok(()) => {
                    debug!(%material_id, stock_delta, new_stock, "stock committed");
                    return Ok(());
                }
                Err(StoreError::Conflict(_)) => {
                    debug!(%material_id, attempt, "stock commit lost a race, retrying");
                }
                // The document vanished between read and write.
                Err(StoreError::NotFound) => return Err(DomainError::NotFound),
                Err(e) => return Err(e.into()),
            }
        }

        warn!(%material_id, "stock commit exhausted its retry budget");
        Err(DomainError::conflict(format!(
            "stock update for material {material_id} lost {MAX_COMMIT_ATTEMPTS} consecutive races"
        )))
    }
}

fn ensure_amount(amount: f64) -> DomainResult<()> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(DomainError::validation(
            "stock amount must be a non-negative number",
        ));
    }
    Ok(())
}
