//! Entity trait: identity + continuity across state changes.

/// Marker + minimal interface for stored records with identity.
///
/// Materials, budgets, and budget lines are entities: each carries a
/// typed id from [`crate::id`], and two records with the same id are the
/// same record regardless of field edits in between.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}
