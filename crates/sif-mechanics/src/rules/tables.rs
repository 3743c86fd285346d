//! Static rule tables applied to an actor as transformers.
//!
//! Dispositions, formations and facings are exclusive: an actor has at most
//! one of each, and applying one revokes the others in the same table.
//! Statuses stack. Every entry writes its effects under its own source ID,
//! `<table>:<name>`, so revoking one never touches another. An entry with no
//! effects writes a zero `modifiers` entry on `all` instead, so it still
//! shows up as active.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::attribute::AttributeKey;
use crate::error::{MechError, MechResult};
use crate::transformer::{TransformerStore, TransformerType};

/// One of the four rule tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableKind {
    /// Attitude toward an intrigue opponent.
    Disposition,
    /// Unit formation in warfare.
    Formation,
    /// Which side an attacker faces.
    Facing,
    /// A condition such as bleeding or prone.
    Status,
}

impl TableKind {
    /// All four tables.
    pub const ALL: [TableKind; 4] = [
        Self::Disposition,
        Self::Formation,
        Self::Facing,
        Self::Status,
    ];

    /// Table name, also the prefix of its source IDs.
    pub fn key(self) -> &'static str {
        match self {
            Self::Disposition => "disposition",
            Self::Formation => "formation",
            Self::Facing => "facing",
            Self::Status => "status",
        }
    }

    /// Whether at most one entry of this table can be active.
    pub fn is_exclusive(self) -> bool {
        !matches!(self, Self::Status)
    }
}

impl std::fmt::Display for TableKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// A single transformer an entry writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleEffect {
    /// Channel.
    #[serde(rename = "type")]
    pub ty: TransformerType,
    /// Target attribute.
    pub attribute: AttributeKey,
    /// Signed contribution.
    pub magnitude: i32,
}

impl RuleEffect {
    /// Create an effect.
    pub fn new(ty: TransformerType, attribute: impl Into<AttributeKey>, magnitude: i32) -> Self {
        Self {
            ty,
            attribute: attribute.into(),
            magnitude,
        }
    }
}

/// A named row of a rule table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleEntry {
    /// Entry name, matched case-insensitively.
    pub name: String,
    /// What applying the entry writes.
    #[serde(default)]
    pub effects: Vec<RuleEffect>,
}

impl RuleEntry {
    /// Create an entry.
    pub fn new(name: impl Into<String>, effects: Vec<RuleEffect>) -> Self {
        Self {
            name: name.into(),
            effects,
        }
    }
}

/// The four rule tables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleTables {
    /// Intrigue dispositions.
    pub dispositions: Vec<RuleEntry>,
    /// Warfare formations.
    pub formations: Vec<RuleEntry>,
    /// Attack facings.
    pub facings: Vec<RuleEntry>,
    /// Stackable statuses.
    pub statuses: Vec<RuleEntry>,
}

impl RuleTables {
    /// The built-in tables.
    pub fn standard() -> Self {
        super::preset::standard()
    }

    /// Load host-supplied tables. Missing tables are empty.
    pub fn from_json(json: &str) -> MechResult<Self> {
        serde_json::from_str(json).map_err(|e| MechError::InvalidConfig(e.to_string()))
    }

    /// The rows of one table.
    pub fn table(&self, kind: TableKind) -> &[RuleEntry] {
        match kind {
            TableKind::Disposition => &self.dispositions,
            TableKind::Formation => &self.formations,
            TableKind::Facing => &self.facings,
            TableKind::Status => &self.statuses,
        }
    }

    /// Look up an entry by case-insensitive name.
    pub fn entry(&self, kind: TableKind, name: &str) -> MechResult<&RuleEntry> {
        self.table(kind)
            .iter()
            .find(|e| e.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| MechError::UnknownTableEntry {
                table: kind.key(),
                name: name.to_string(),
            })
    }

    /// Apply an entry's effects to `store`.
    ///
    /// For exclusive tables, any other active entry of the same table is
    /// revoked first. Re-applying an active entry is idempotent.
    pub fn apply(&self, store: &mut TransformerStore, kind: TableKind, name: &str) -> MechResult<()> {
        let entry = self.entry(kind, name)?;
        let source = source_id(kind, &entry.name);

        if kind.is_exclusive() {
            for other in self.table(kind) {
                let other_source = source_id(kind, &other.name);
                if other_source != source {
                    store.remove_source(&other_source)?;
                }
            }
        }

        for effect in &entry.effects {
            store.add(effect.ty, effect.attribute, source.as_str(), effect.magnitude, false)?;
        }
        if entry.effects.is_empty() {
            store.add(TransformerType::Modifiers, AttributeKey::All, source.as_str(), 0, false)?;
        }
        debug!(table = %kind, entry = %entry.name, "applied rule entry");
        Ok(())
    }

    /// Remove an entry's effects from `store`. Returns how many transformer
    /// entries were removed.
    pub fn revoke(
        &self,
        store: &mut TransformerStore,
        kind: TableKind,
        name: &str,
    ) -> MechResult<usize> {
        let entry = self.entry(kind, name)?;
        let removed = store.remove_source(&source_id(kind, &entry.name))?;
        debug!(table = %kind, entry = %entry.name, removed, "revoked rule entry");
        Ok(removed)
    }

    /// Names of the entries of `kind` currently applied in `store`.
    pub fn active(&self, store: &TransformerStore, kind: TableKind) -> Vec<&str> {
        self.table(kind)
            .iter()
            .filter(|e| store.has_source(&source_id(kind, &e.name)))
            .map(|e| e.name.as_str())
            .collect()
    }
}

/// The source ID an entry's transformers are written under.
pub fn source_id(kind: TableKind, name: &str) -> String {
    format!("{}:{}", kind.key(), name.to_lowercase())
}
