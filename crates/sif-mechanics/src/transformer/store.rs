//! Load/save lifecycle of a transformer store.
//!
//! A store is a snapshot of an actor's persisted buckets, stamped with the
//! document revision it was read at. Saving writes all four buckets back as
//! a full overwrite and refuses to do so when the document moved on in the
//! meantime, so a stale snapshot can never silently clobber another writer.

use std::collections::BTreeMap;

use sif_core::{Actor, PersistedTransformers, Transformer};
use tracing::{debug, warn};

use crate::attribute::AttributeKey;
use crate::error::{MechError, MechResult};
use crate::transformer::TransformerType;

pub(crate) type Buckets = BTreeMap<TransformerType, BTreeMap<AttributeKey, Vec<Transformer>>>;

/// Where a store is in its load → mutate → save lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreState {
    /// Nothing read from the document yet.
    #[default]
    Unloaded,
    /// Populated from the document, no changes since.
    Loaded,
    /// Changed since the last load or save.
    Mutated,
    /// Written back to the document.
    Saved,
}

/// An actor's transformers, typed and validated.
#[derive(Debug, Clone, Default)]
pub struct TransformerStore {
    pub(crate) buckets: Buckets,
    state: StoreState,
    revision: Option<u64>,
}

impl TransformerStore {
    /// Create an unloaded store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store loaded from an actor's persisted buckets.
    pub fn load(actor: &Actor) -> MechResult<Self> {
        let mut store = Self::new();
        store.reload(actor)?;
        Ok(store)
    }

    /// Replace the snapshot with the actor's current persisted buckets.
    ///
    /// Unsaved mutations are discarded.
    pub fn reload(&mut self, actor: &Actor) -> MechResult<()> {
        self.buckets = parse_persisted(&actor.data.transformers)?;
        self.revision = Some(actor.data.revision);
        self.state = StoreState::Loaded;
        debug!(
            actor = %actor.name,
            revision = actor.data.revision,
            "loaded transformers"
        );
        Ok(())
    }

    /// Write all four buckets back to the actor as a full overwrite.
    ///
    /// Returns the new document revision. Fails with
    /// [`MechError::StaleTransformers`] if the document was overwritten by
    /// someone else since this store was loaded.
    pub fn save(&mut self, actor: &mut Actor) -> MechResult<u64> {
        self.require_current(actor, "save")?;
        let revision = actor.overwrite_transformers(self.to_persisted());
        self.revision = Some(revision);
        self.state = StoreState::Saved;
        debug!(actor = %actor.name, revision, "saved transformers");
        Ok(revision)
    }

    /// The lifecycle state.
    pub fn state(&self) -> StoreState {
        self.state
    }

    /// The document revision this store was last loaded or saved at.
    pub fn revision(&self) -> Option<u64> {
        self.revision
    }

    /// Whether the store has been populated from a document.
    pub fn is_loaded(&self) -> bool {
        self.revision.is_some()
    }

    /// Render the buckets in their persisted, string-keyed form.
    ///
    /// All four type keys are always present, even when empty.
    pub fn to_persisted(&self) -> PersistedTransformers {
        TransformerType::ALL
            .into_iter()
            .map(|ty| {
                let attrs = self
                    .buckets
                    .get(&ty)
                    .map(|attrs| {
                        attrs
                            .iter()
                            .map(|(key, entries)| (key.as_str().to_string(), entries.clone()))
                            .collect()
                    })
                    .unwrap_or_default();
                (ty.key().to_string(), attrs)
            })
            .collect()
    }

    pub(crate) fn require_loaded(&self, operation: &'static str) -> MechResult<u64> {
        self.revision.ok_or_else(|| {
            warn!(operation, "transformer store used before load");
            MechError::NotLoaded
        })
    }

    /// Fail unless the store is loaded at the actor's current revision, so
    /// a following [`save`](Self::save) cannot be refused as stale.
    pub(crate) fn require_current(&self, actor: &Actor, operation: &'static str) -> MechResult<()> {
        let loaded = self.require_loaded(operation)?;
        let persisted = actor.data.revision;
        if loaded != persisted {
            warn!(
                actor = %actor.name,
                operation,
                loaded,
                persisted,
                "refusing to write stale transformers"
            );
            return Err(MechError::StaleTransformers { loaded, persisted });
        }
        Ok(())
    }

    pub(crate) fn mark_mutated(&mut self) {
        self.state = StoreState::Mutated;
    }
}

/// Parse the persisted buckets, rejecting unknown type or attribute keys.
fn parse_persisted(doc: &PersistedTransformers) -> MechResult<Buckets> {
    let mut buckets: Buckets = TransformerType::ALL
        .into_iter()
        .map(|ty| (ty, BTreeMap::new()))
        .collect();

    for (type_key, attrs) in doc {
        let ty: TransformerType = type_key.parse()?;
        let typed = buckets.entry(ty).or_default();
        for (attr_key, entries) in attrs {
            let key: AttributeKey = attr_key.parse()?;
            typed.entry(key).or_default().extend(entries.iter().cloned());
        }
    }

    Ok(buckets)
}
