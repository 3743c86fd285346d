//! Adding, removing, and summing transformer contributions.

use serde::{Deserialize, Serialize};
use sif_core::{Actor, Transformer};
use tracing::debug;

use crate::attribute::AttributeKey;
use crate::error::MechResult;
use crate::transformer::{TransformerStore, TransformerType};

/// Resolves entity source IDs to display names for aggregate detail.
pub trait SourceNames {
    /// The display name of the entity with this ID, if known.
    fn source_name(&self, source_id: &str) -> Option<String>;
}

impl SourceNames for Actor {
    fn source_name(&self, source_id: &str) -> Option<String> {
        self.item_name(source_id).map(str::to_string)
    }
}

/// Options for [`TransformerStore::aggregate`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AggregateOptions {
    /// Report each contributing source.
    pub include_detail: bool,
    /// Also sum the `all` bucket of the same type.
    pub include_global: bool,
}

impl AggregateOptions {
    /// Total only, attribute bucket only.
    pub const TOTAL: Self = Self {
        include_detail: false,
        include_global: false,
    };

    /// Total including the `all` bucket.
    pub const GLOBAL: Self = Self {
        include_detail: false,
        include_global: true,
    };

    /// Also report per-source detail.
    pub fn with_detail(mut self) -> Self {
        self.include_detail = true;
        self
    }
}

/// One source's share of an aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateDetail {
    /// Item display name for entity sources, otherwise the raw source ID.
    pub source_name: String,
    /// The source's contribution.
    pub magnitude: i32,
}

/// The sum of a bucket, optionally itemized.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Aggregate {
    /// Sum of all magnitudes.
    pub total: i32,
    /// Per-source breakdown; empty unless requested.
    pub detail: Vec<AggregateDetail>,
}

impl TransformerStore {
    /// Record `magnitude` from `source_id` on `attribute`.
    ///
    /// If the source already has an entry in that bucket its magnitude is
    /// overwritten; contributions from one source never stack.
    pub fn add(
        &mut self,
        ty: TransformerType,
        attribute: AttributeKey,
        source_id: impl Into<String>,
        magnitude: i32,
        source_is_entity: bool,
    ) -> MechResult<()> {
        self.require_loaded("add")?;
        let source_id = source_id.into();
        let bucket = self
            .buckets
            .entry(ty)
            .or_default()
            .entry(attribute)
            .or_default();

        match bucket.iter_mut().find(|t| t.source_id == source_id) {
            Some(existing) => existing.magnitude = magnitude,
            None => bucket.push(Transformer::new(
                source_id.as_str(),
                magnitude,
                source_is_entity,
            )),
        }

        debug!(%ty, %attribute, source = %source_id, magnitude, "added transformer");
        self.mark_mutated();
        Ok(())
    }

    /// [`add`](Self::add), then [`save`](Self::save) to the actor.
    pub fn add_and_save(
        &mut self,
        actor: &mut Actor,
        ty: TransformerType,
        attribute: AttributeKey,
        source_id: impl Into<String>,
        magnitude: i32,
        source_is_entity: bool,
    ) -> MechResult<()> {
        self.add(ty, attribute, source_id, magnitude, source_is_entity)?;
        self.save(actor)?;
        Ok(())
    }

    /// Remove the entry for `source_id` from one bucket.
    ///
    /// Returns whether an entry was removed. A missing bucket or a source
    /// with no entry leaves the store unchanged.
    pub fn remove(
        &mut self,
        ty: TransformerType,
        attribute: AttributeKey,
        source_id: &str,
    ) -> MechResult<bool> {
        self.require_loaded("remove")?;
        let Some(bucket) = self
            .buckets
            .get_mut(&ty)
            .and_then(|attrs| attrs.get_mut(&attribute))
        else {
            return Ok(false);
        };

        let Some(index) = bucket.iter().position(|t| t.source_id == source_id) else {
            return Ok(false);
        };
        bucket.remove(index);

        debug!(%ty, %attribute, source = source_id, "removed transformer");
        self.mark_mutated();
        Ok(true)
    }

    /// [`remove`](Self::remove), then [`save`](Self::save) to the actor.
    pub fn remove_and_save(
        &mut self,
        actor: &mut Actor,
        ty: TransformerType,
        attribute: AttributeKey,
        source_id: &str,
    ) -> MechResult<bool> {
        let removed = self.remove(ty, attribute, source_id)?;
        self.save(actor)?;
        Ok(removed)
    }

    /// Remove every entry written by `source_id`, in every bucket.
    ///
    /// Returns the number of entries removed.
    pub fn remove_source(&mut self, source_id: &str) -> MechResult<usize> {
        self.require_loaded("remove_source")?;
        let mut removed = 0;
        for attrs in self.buckets.values_mut() {
            for bucket in attrs.values_mut() {
                let before = bucket.len();
                bucket.retain(|t| t.source_id != source_id);
                removed += before - bucket.len();
            }
        }
        if removed > 0 {
            debug!(source = source_id, removed, "removed source from all buckets");
            self.mark_mutated();
        }
        Ok(removed)
    }

    /// Whether `source_id` has an entry in any bucket.
    pub fn has_source(&self, source_id: &str) -> bool {
        self.buckets
            .values()
            .flat_map(|attrs| attrs.values())
            .flatten()
            .any(|t| t.source_id == source_id)
    }

    /// The entries of one bucket, in insertion order.
    pub fn entries(&self, ty: TransformerType, attribute: AttributeKey) -> &[Transformer] {
        self.buckets
            .get(&ty)
            .and_then(|attrs| attrs.get(&attribute))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Sum of one bucket (plus `all` when `include_global`), without loading.
    pub fn total(&self, ty: TransformerType, attribute: AttributeKey, include_global: bool) -> i32 {
        self.contributing(ty, attribute, include_global)
            .map(|t| t.magnitude)
            .sum()
    }

    /// Sum the contributions to `attribute`, loading from `actor` first if
    /// the store has not been loaded yet.
    ///
    /// Entity sources in the detail are named through `actor`; other sources
    /// (and entities the actor no longer owns) are reported by raw ID.
    pub fn aggregate(
        &mut self,
        actor: &Actor,
        ty: TransformerType,
        attribute: AttributeKey,
        options: AggregateOptions,
    ) -> MechResult<Aggregate> {
        if !self.is_loaded() {
            self.reload(actor)?;
        }
        Ok(self.aggregate_with(actor, ty, attribute, options))
    }

    /// [`aggregate`](Self::aggregate) on an already loaded store with a
    /// custom name lookup.
    pub fn aggregate_with(
        &self,
        names: &dyn SourceNames,
        ty: TransformerType,
        attribute: AttributeKey,
        options: AggregateOptions,
    ) -> Aggregate {
        let mut aggregate = Aggregate::default();
        for t in self.contributing(ty, attribute, options.include_global) {
            aggregate.total += t.magnitude;
            if options.include_detail {
                let source_name = if t.source_is_entity {
                    names
                        .source_name(&t.source_id)
                        .unwrap_or_else(|| t.source_id.clone())
                } else {
                    t.source_id.clone()
                };
                aggregate.detail.push(AggregateDetail {
                    source_name,
                    magnitude: t.magnitude,
                });
            }
        }
        aggregate
    }

    fn contributing(
        &self,
        ty: TransformerType,
        attribute: AttributeKey,
        include_global: bool,
    ) -> impl Iterator<Item = &Transformer> {
        let global = if include_global && !attribute.is_global() {
            self.entries(ty, AttributeKey::All)
        } else {
            &[]
        };
        self.entries(ty, attribute).iter().chain(global.iter())
    }
}
