//! Validation of persisted actor documents and rule tables.
//!
//! Checks that an actor's persisted transformer buckets use only known
//! keys, that no bucket carries two entries for one source, and that item
//! sources still exist. Rule tables are checked for duplicate names.

use std::collections::HashSet;

use sif_core::{Actor, ItemKind};

use crate::attribute::{Ability, AttributeKey};
use crate::formula::DamageExpr;
use crate::rules::{RuleTables, TableKind};
use crate::transformer::TransformerType;

/// A warning or error found during validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    /// The actor or table where the issue was found.
    pub entity: String,
    /// A human-readable description of the issue.
    pub message: String,
    /// Whether this is an error (true) or a warning (false).
    pub is_error: bool,
}

impl ValidationIssue {
    fn error(entity: &str, message: String) -> Self {
        Self {
            entity: entity.to_string(),
            message,
            is_error: true,
        }
    }

    fn warning(entity: &str, message: String) -> Self {
        Self {
            entity: entity.to_string(),
            message,
            is_error: false,
        }
    }
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let level = if self.is_error { "error" } else { "warning" };
        write!(f, "{level}: {}: {}", self.entity, self.message)
    }
}

/// Validate an actor document.
///
/// Errors: bucket keys the store would refuse to load. Warnings: data that
/// loads but is probably wrong.
pub fn validate_actor(actor: &Actor) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    validate_transformers(actor, &mut issues);
    validate_items(actor, &mut issues);
    issues
}

fn validate_transformers(actor: &Actor, issues: &mut Vec<ValidationIssue>) {
    let name = actor.name.as_str();

    for (type_key, attrs) in &actor.data.transformers {
        if let Err(e) = type_key.parse::<TransformerType>() {
            issues.push(ValidationIssue::error(name, e.to_string()));
        }

        for (attr_key, entries) in attrs {
            if let Err(e) = attr_key.parse::<AttributeKey>() {
                issues.push(ValidationIssue::error(name, e.to_string()));
            }

            let mut seen = HashSet::new();
            for entry in entries {
                if !seen.insert(entry.source_id.as_str()) {
                    issues.push(ValidationIssue::warning(
                        name,
                        format!(
                            "{type_key}.{attr_key} has more than one entry from source '{}'",
                            entry.source_id
                        ),
                    ));
                }
                if entry.source_is_entity && actor.item_name(&entry.source_id).is_none() {
                    issues.push(ValidationIssue::warning(
                        name,
                        format!(
                            "{type_key}.{attr_key} references missing item '{}'",
                            entry.source_id
                        ),
                    ));
                }
            }
        }
    }
}

fn validate_items(actor: &Actor, issues: &mut Vec<ValidationIssue>) {
    let name = actor.name.as_str();

    for item in &actor.items {
        match &item.kind {
            ItemKind::Ability(ability) => {
                if Ability::from_name(&item.name).is_none() {
                    issues.push(ValidationIssue::warning(
                        name,
                        format!("ability '{}' is not a known ability", item.name),
                    ));
                }
                if ability.rating < 0 {
                    issues.push(ValidationIssue::warning(
                        name,
                        format!("ability '{}' has negative rating {}", item.name, ability.rating),
                    ));
                }
            }
            ItemKind::Weapon(weapon) => {
                if Ability::from_name(&weapon.ability).is_none() {
                    issues.push(ValidationIssue::error(
                        name,
                        format!(
                            "weapon '{}' uses unknown ability '{}'",
                            item.name, weapon.ability
                        ),
                    ));
                }
                let damage = (!weapon.damage.is_empty()).then(|| DamageExpr::parse(&weapon.damage));
                if let Some(Err(e)) = damage {
                    issues.push(ValidationIssue::warning(
                        name,
                        format!("weapon '{}': {e}", item.name),
                    ));
                }
            }
            ItemKind::Armor(_) | ItemKind::Equipment(_) => {}
        }
    }
}

/// Validate rule tables: duplicate entry names shadow each other.
pub fn validate_tables(tables: &RuleTables) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    for kind in TableKind::ALL {
        let entity = format!("{kind} table");
        let mut seen = HashSet::new();
        for entry in tables.table(kind) {
            if !seen.insert(entry.name.to_lowercase()) {
                issues.push(ValidationIssue::error(
                    &entity,
                    format!("duplicate entry '{}'", entry.name),
                ));
            }
            if entry.effects.is_empty() && kind == TableKind::Status {
                issues.push(ValidationIssue::warning(
                    &entity,
                    format!("status '{}' has no effects", entry.name),
                ));
            }
        }
    }
    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use sif_core::{ActorKind, Item, PersistedTransformers, Transformer, WeaponData};

    use crate::rules::RuleEntry;

    fn push(doc: &mut PersistedTransformers, ty: &str, attr: &str, entry: Transformer) {
        doc.entry(ty.to_string())
            .or_default()
            .entry(attr.to_string())
            .or_default()
            .push(entry);
    }

    #[test]
    fn clean_actor_has_no_issues() {
        let mut actor = Actor::new(ActorKind::Character, "Tyrion");
        actor.add_item(Item::ability("Cunning", 6)).unwrap();
        let mut doc = PersistedTransformers::new();
        push(&mut doc, "bonuses", "cunning", Transformer::new("status:clever", 1, false));
        actor.data.transformers = doc;
        assert!(validate_actor(&actor).is_empty());
    }

    #[test]
    fn unknown_keys_are_errors() {
        let mut actor = Actor::new(ActorKind::Character, "Tyrion");
        let mut doc = PersistedTransformers::new();
        push(&mut doc, "boons", "cunning", Transformer::new("x", 1, false));
        push(&mut doc, "bonuses", "drinking", Transformer::new("x", 1, false));
        actor.data.transformers = doc;

        let issues = validate_actor(&actor);
        assert_eq!(issues.iter().filter(|i| i.is_error).count(), 2);
        assert!(issues[0].to_string().starts_with("error: Tyrion: "));
    }

    #[test]
    fn duplicate_sources_and_missing_items_warn() {
        let mut actor = Actor::new(ActorKind::Character, "Tyrion");
        let mut doc = PersistedTransformers::new();
        push(&mut doc, "modifiers", "combat_defense", Transformer::new("a", 1, false));
        push(&mut doc, "modifiers", "combat_defense", Transformer::new("a", 2, false));
        push(&mut doc, "modifiers", "movement", Transformer::new("gone", -1, true));
        actor.data.transformers = doc;

        let issues = validate_actor(&actor);
        assert_eq!(issues.len(), 2);
        assert!(issues.iter().all(|i| !i.is_error));
        assert!(issues[0].message.contains("more than one entry"));
        assert!(issues[1].message.contains("missing item 'gone'"));
    }

    #[test]
    fn item_checks() {
        let mut actor = Actor::new(ActorKind::Character, "Tyrion");
        actor.add_item(Item::ability("Drinking", 5)).unwrap();
        actor
            .add_item(Item::new(
                "Axe",
                ItemKind::Weapon(WeaponData {
                    ability: "Chopping".into(),
                    damage: "Athletics".into(),
                    ..WeaponData::default()
                }),
            ))
            .unwrap();

        let issues = validate_actor(&actor);
        assert_eq!(issues.len(), 3);
        assert_eq!(issues.iter().filter(|i| i.is_error).count(), 1);
    }

    #[test]
    fn standard_tables_are_clean() {
        assert!(validate_tables(&RuleTables::standard()).is_empty());
    }

    #[test]
    fn duplicate_table_entries_are_errors() {
        let mut tables = RuleTables::standard();
        tables.statuses.push(RuleEntry::new("PRONE", Vec::new()));
        let issues = validate_tables(&tables);
        assert_eq!(issues.len(), 2);
        assert!(issues.iter().any(|i| i.is_error && i.message.contains("PRONE")));
        assert_eq!(issues[0].entity, "status table");
    }
}
