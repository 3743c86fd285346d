//! Core documents for the SIFRP rules engine.
//!
//! This crate defines the persisted side of a character: the [`Actor`]
//! document, the items it owns, and the string-keyed transformer buckets
//! stored on it. It knows nothing about dice or rules; those live in
//! `sif-mechanics`, which reads and writes these documents.

/// Actor documents, identifiers, and the persisted attribute data.
pub mod entity;
/// Error types used throughout the crate.
pub mod error;
/// Owned items: abilities, weapons, armor, and plain equipment.
pub mod item;
/// The persisted representation of transformer contributions.
pub mod transformer;

/// Re-export actor types.
pub use entity::{Actor, ActorData, ActorKind, EntityId};
/// Re-export error types.
pub use error::{CoreError, CoreResult};
/// Re-export item types.
pub use item::{AbilityData, ArmorData, EquipmentData, Item, ItemKind, Specialty, WeaponData};
/// Re-export persisted transformer types.
pub use transformer::{PersistedTransformers, Transformer};
