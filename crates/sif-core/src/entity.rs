use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::item::{AbilityData, Item, WeaponData};
use crate::transformer::PersistedTransformers;

/// Unique identifier for actors and items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub Uuid);

impl EntityId {
    /// Generate a new random ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The kind of actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActorKind {
    /// A player character.
    Character,
    /// A military unit (formations apply here).
    Unit,
    /// A non-player character.
    Npc,
}

impl fmt::Display for ActorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Character => write!(f, "character"),
            Self::Unit => write!(f, "unit"),
            Self::Npc => write!(f, "npc"),
        }
    }
}

/// The persisted attribute document of an actor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActorData {
    /// Transformer buckets, keyed `type → attribute → entries`.
    pub transformers: PersistedTransformers,
    /// Bumped every time the transformer buckets are overwritten.
    pub revision: u64,
}

impl ActorData {
    /// Replace the whole transformer container. Returns the new revision.
    ///
    /// This is a full overwrite: buckets absent from `transformers` are gone
    /// afterwards. There is no merge with the previous value.
    pub fn overwrite_transformers(&mut self, transformers: PersistedTransformers) -> u64 {
        self.transformers = transformers;
        self.revision += 1;
        self.revision
    }
}

/// An actor document: a character, unit, or NPC with its owned items.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Actor {
    /// Unique identifier.
    pub id: EntityId,
    /// Display name.
    pub name: String,
    /// The kind of actor.
    pub kind: ActorKind,
    /// Persisted attribute data.
    pub data: ActorData,
    /// Owned items, abilities included.
    pub items: Vec<Item>,
    /// Timestamp when the actor was created.
    pub created_at: DateTime<Utc>,
    /// Timestamp of the last persisted change.
    pub updated_at: DateTime<Utc>,
}

impl Actor {
    /// Create an empty actor.
    pub fn new(kind: ActorKind, name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: EntityId::new(),
            name: name.into(),
            kind,
            data: ActorData::default(),
            items: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Take ownership of an item. Returns its ID.
    pub fn add_item(&mut self, item: Item) -> CoreResult<EntityId> {
        if self.items.iter().any(|i| i.id == item.id) {
            return Err(CoreError::DuplicateItem(item.id));
        }
        let id = item.id;
        self.items.push(item);
        self.updated_at = Utc::now();
        Ok(id)
    }

    /// Get an owned item by ID.
    pub fn item(&self, id: EntityId) -> Option<&Item> {
        self.items.iter().find(|i| i.id == id)
    }

    /// Get a mutable reference to an owned item by ID.
    pub fn item_mut(&mut self, id: EntityId) -> Option<&mut Item> {
        self.items.iter_mut().find(|i| i.id == id)
    }

    /// Remove an owned item and return it.
    pub fn remove_item(&mut self, id: EntityId) -> CoreResult<Item> {
        let index = self
            .items
            .iter()
            .position(|i| i.id == id)
            .ok_or(CoreError::ItemNotFound(id))?;
        self.updated_at = Utc::now();
        Ok(self.items.remove(index))
    }

    /// Iterate over owned abilities as `(name, data)` pairs.
    pub fn abilities(&self) -> impl Iterator<Item = (&str, &AbilityData)> {
        self.items
            .iter()
            .filter_map(|i| i.as_ability().map(|a| (i.name.as_str(), a)))
    }

    /// Find an owned ability by name (case-insensitive).
    pub fn find_ability(&self, name: &str) -> Option<&AbilityData> {
        self.abilities()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, a)| a)
    }

    /// Get an owned weapon by ID.
    pub fn weapon(&self, id: EntityId) -> CoreResult<&WeaponData> {
        let item = self.item(id).ok_or(CoreError::ItemNotFound(id))?;
        item.as_weapon().ok_or_else(|| CoreError::WrongItemKind {
            name: item.name.clone(),
            expected: "weapon",
        })
    }

    /// Display name of an owned item, if present.
    pub fn item_name(&self, id: &str) -> Option<&str> {
        self.items
            .iter()
            .find(|i| i.id.to_string() == id)
            .map(|i| i.name.as_str())
    }

    /// Overwrite the persisted transformer buckets. Returns the new revision.
    pub fn overwrite_transformers(&mut self, transformers: PersistedTransformers) -> u64 {
        self.updated_at = Utc::now();
        self.data.overwrite_transformers(transformers)
    }

    /// Serialize the actor document to JSON.
    pub fn to_json(&self) -> CoreResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Deserialize an actor document from JSON.
    pub fn from_json(json: &str) -> CoreResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
