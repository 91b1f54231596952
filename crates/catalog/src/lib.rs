//! Material catalog domain module.
//!
//! Owns the `Material` entity and the two services that touch it: the
//! [`MaterialCatalog`] (CRUD over catalog records) and the
//! [`InventoryLedger`], the sole authorized mutator of `Material.stock`.

pub mod catalog;
pub mod ledger;
pub mod material;

pub use catalog::MaterialCatalog;
pub use ledger::InventoryLedger;
pub use material::{MATERIALS, Material};
