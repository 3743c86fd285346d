//! The built-in rule tables.
//!
//! These produce the same [`RuleTables`] that the equivalent JSON would,
//! without requiring a file.

use crate::attribute::{Ability, AttributeKey, DerivedStat};
use crate::rules::tables::{RuleEffect, RuleEntry, RuleTables};
use crate::transformer::TransformerType::{Modifiers, Penalties};

/// All four standard tables.
pub fn standard() -> RuleTables {
    RuleTables {
        dispositions: dispositions(),
        formations: formations(),
        facings: facings(),
        statuses: statuses(),
    }
}

/// Intrigue dispositions, from warmest to coldest.
///
/// Each adjusts Persuasion and Deception tests made toward the other party.
pub fn dispositions() -> Vec<RuleEntry> {
    [
        ("Affectionate", 5, -2),
        ("Friendly", 3, -1),
        ("Amiable", 1, 0),
        ("Indifferent", 0, 0),
        ("Dislike", -2, 1),
        ("Unfriendly", -4, 2),
        ("Malicious", -6, 3),
    ]
    .into_iter()
    .map(|(name, persuasion, deception)| {
        let effects = [
            (Ability::Persuasion, persuasion),
            (Ability::Deception, deception),
        ]
        .into_iter()
        .filter(|(_, magnitude)| *magnitude != 0)
        .map(|(ability, magnitude)| RuleEffect::new(Modifiers, ability, magnitude))
        .collect();
        RuleEntry::new(name, effects)
    })
    .collect()
}

/// Warfare formations.
pub fn formations() -> Vec<RuleEntry> {
    vec![
        RuleEntry::new("Battle", Vec::new()),
        RuleEntry::new(
            "Column",
            vec![
                RuleEffect::new(Modifiers, DerivedStat::Movement, 2),
                RuleEffect::new(Modifiers, DerivedStat::CombatDefense, -3),
            ],
        ),
        RuleEntry::new(
            "Skirmish",
            vec![
                RuleEffect::new(Modifiers, DerivedStat::CombatDefense, 2),
                RuleEffect::new(Modifiers, DerivedStat::Discipline, 3),
            ],
        ),
        RuleEntry::new(
            "Square",
            vec![
                RuleEffect::new(Modifiers, DerivedStat::CombatDefense, 5),
                RuleEffect::new(Modifiers, DerivedStat::Movement, -2),
            ],
        ),
        RuleEntry::new(
            "Rout",
            vec![
                RuleEffect::new(Modifiers, DerivedStat::CombatDefense, -5),
                RuleEffect::new(Modifiers, DerivedStat::Discipline, -6),
            ],
        ),
    ]
}

/// Attack facings relative to the defender.
pub fn facings() -> Vec<RuleEntry> {
    vec![
        RuleEntry::new("Front", Vec::new()),
        RuleEntry::new(
            "Flank",
            vec![RuleEffect::new(Modifiers, DerivedStat::CombatDefense, -3)],
        ),
        RuleEntry::new(
            "Rear",
            vec![RuleEffect::new(Modifiers, DerivedStat::CombatDefense, -5)],
        ),
    ]
}

/// Stackable statuses.
pub fn statuses() -> Vec<RuleEntry> {
    vec![
        RuleEntry::new(
            "Bleeding",
            vec![RuleEffect::new(Penalties, AttributeKey::All, 1)],
        ),
        RuleEntry::new(
            "Fatigued",
            vec![RuleEffect::new(Penalties, AttributeKey::All, 1)],
        ),
        RuleEntry::new(
            "Prone",
            vec![
                RuleEffect::new(Modifiers, DerivedStat::CombatDefense, -5),
                RuleEffect::new(Modifiers, DerivedStat::Movement, -3),
            ],
        ),
        RuleEntry::new(
            "Frustrated",
            vec![
                RuleEffect::new(Penalties, Ability::Persuasion, 1),
                RuleEffect::new(Penalties, Ability::Deception, 1),
            ],
        ),
        RuleEntry::new(
            "Wounded",
            vec![RuleEffect::new(Modifiers, DerivedStat::Health, -3)],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    use crate::rules::tables::TableKind;

    #[test]
    fn names_are_unique_per_table() {
        let tables = standard();
        for kind in TableKind::ALL {
            let names: HashSet<String> = tables
                .table(kind)
                .iter()
                .map(|e| e.name.to_lowercase())
                .collect();
            assert_eq!(names.len(), tables.table(kind).len(), "{kind}");
        }
    }

    #[test]
    fn indifferent_disposition_has_no_effect() {
        let tables = standard();
        let entry = tables.entry(TableKind::Disposition, "Indifferent").unwrap();
        assert!(entry.effects.is_empty());
        assert_eq!(tables.dispositions.len(), 7);
    }

    #[test]
    fn json_round_trip_matches_preset() {
        let tables = standard();
        let json = serde_json::to_string(&tables).unwrap();
        assert_eq!(RuleTables::from_json(&json).unwrap(), tables);
    }
}
