//! End-to-end rules scenarios: documents in, formulas and rolls out.

use std::collections::BTreeMap;

use proptest::prelude::*;
use sif_core::{AbilityData, Actor, ActorKind, ArmorData, Item, ItemKind, Specialty, WeaponData};
use sif_mechanics::items::{discard_item, obtain_item};
use sif_mechanics::roll::resolve_dice;
use sif_mechanics::{
    Ability, AggregateOptions, AttributeKey, DiceFormula, DiceTag, Difficulty, MechError,
    RollDefinition, RollKind, RollResult, RulesConfig, TableKind, TransformerStore,
    TransformerType, ability_test_formula, formula_for, validate_actor,
};

const ATHLETICS: AttributeKey = AttributeKey::Ability(Ability::Athletics);

fn athlete() -> Actor {
    let mut actor = Actor::new(ActorKind::Character, "Arya");
    actor
        .add_item(Item::new(
            "Athletics",
            ItemKind::Ability(AbilityData {
                rating: 3,
                modifier: 0,
                specialties: vec![Specialty::new("Run", 2, 1)],
            }),
        ))
        .unwrap();
    actor
}

fn fields(f: &DiceFormula) -> (i32, i32, i32, i32) {
    (f.pool, f.bonus_dice, f.modifier, f.dice_penalty)
}

#[test]
fn specialty_test_formula() {
    let actor = athlete();
    let mut store = TransformerStore::new();
    let f = ability_test_formula(&actor, &mut store, "Athletics", Some("Run")).unwrap();
    assert_eq!(fields(&f), (3, 2, 1, 0));
}

#[test]
fn untrained_test_formula() {
    let actor = athlete();
    let mut store = TransformerStore::new();
    let f = ability_test_formula(&actor, &mut store, "Deception", None).unwrap();
    assert_eq!(fields(&f), (2, 0, 0, 0));
}

#[test]
fn floored_pool() {
    let mut actor = Actor::new(ActorKind::Character, "Hodor");
    actor.add_item(Item::ability("Knowledge", 0)).unwrap();
    let mut store = TransformerStore::load(&actor).unwrap();
    store
        .add_and_save(
            &mut actor,
            TransformerType::PoolMods,
            Ability::Knowledge.into(),
            "simple",
            -5,
            false,
        )
        .unwrap();

    let mut fresh = TransformerStore::new();
    let f = ability_test_formula(&actor, &mut fresh, "Knowledge", None).unwrap();
    assert_eq!((f.pool, f.dice_penalty), (1, 0));
}

#[test]
fn weapon_training_reallocation() {
    let mut actor = Actor::new(ActorKind::Character, "Podrick");
    actor
        .add_item(Item::new(
            "Fighting",
            ItemKind::Ability(AbilityData {
                rating: 4,
                modifier: 0,
                specialties: vec![Specialty::new("Axes", 5, 0), Specialty::new("Brawling", 1, 0)],
            }),
        ))
        .unwrap();
    let axe = actor
        .add_item(Item::new(
            "Battleaxe",
            ItemKind::Weapon(WeaponData {
                specialty: Some("Axes".into()),
                training: Some(2),
                ..WeaponData::default()
            }),
        ))
        .unwrap();
    let gauntlet = actor
        .add_item(Item::new(
            "Spiked Gauntlet",
            ItemKind::Weapon(WeaponData {
                specialty: Some("Brawling".into()),
                training: Some(3),
                ..WeaponData::default()
            }),
        ))
        .unwrap();
    let mut store = TransformerStore::load(&actor).unwrap();

    let f = formula_for(
        &RollDefinition::new("Axe", RollKind::WeaponTest { weapon: axe }),
        &actor,
        &mut store,
    )
    .unwrap();
    assert_eq!((f.pool, f.bonus_dice), (4, 3));

    let f = formula_for(
        &RollDefinition::new("Gauntlet", RollKind::WeaponTest { weapon: gauntlet }),
        &actor,
        &mut store,
    )
    .unwrap();
    assert_eq!((f.pool, f.bonus_dice), (2, 0));
}

#[test]
fn keep_highest_with_penalty() {
    let mut ctx = RulesConfig::default().with_seed(2024).build();
    let formula = DiceFormula {
        pool: 4,
        dice_penalty: 1,
        ..DiceFormula::default()
    };
    let kind = RollKind::Ability {
        ability: "Athletics".into(),
    };
    for _ in 0..20 {
        let outcome = ctx.roll(&formula, &kind, None).unwrap();
        let kept: Vec<u32> = outcome.dice.iter().filter(|d| d.kept).map(|d| d.value).collect();
        let dropped: Vec<u32> = outcome.dice.iter().filter(|d| !d.kept).map(|d| d.value).collect();
        assert_eq!(kept.len(), 3);
        assert!(dropped.iter().all(|d| kept.iter().all(|k| k >= d)));
        assert_eq!(outcome.kept_dice_total, kept.iter().sum::<u32>() as i32);
    }
}

#[test]
fn degree_bands_at_difficulty_twelve() {
    let difficulty = Difficulty::new(12);
    let kind = RollKind::Ability {
        ability: "Will".into(),
    };
    for (total, degree) in [(12, 1), (7, -2), (27, 4)] {
        let formula = DiceFormula {
            pool: 1,
            modifier: total - 1,
            ..DiceFormula::default()
        };
        let dice = RollResult::from_faces(&[(DiceTag::Test, 1)]);
        let outcome = resolve_dice(&formula, &kind, Some(&difficulty), dice);
        assert_eq!(outcome.final_total, total);
        assert_eq!(outcome.degree.map(|d| d.value()), Some(degree));
    }
}

#[test]
fn invalid_pool_rolls_nothing() {
    let mut ctx = RulesConfig::default().build();
    let formula = DiceFormula::parse("1|0|0|0|1").unwrap();
    let err = ctx
        .roll(&formula, &RollKind::Formula { formula: formula.to_string() }, None)
        .unwrap_err();
    assert!(matches!(err, MechError::InvalidPool { .. }));
}

#[test]
fn document_survives_json_round_trip() {
    let mut actor = athlete();
    let mut store = TransformerStore::load(&actor).unwrap();
    store
        .add(TransformerType::Bonuses, ATHLETICS, "status:inspired", 1, false)
        .unwrap();
    store.save(&mut actor).unwrap();

    let reloaded = Actor::from_json(&actor.to_json().unwrap()).unwrap();
    assert_eq!(reloaded.data.revision, 1);
    let mut store = TransformerStore::new();
    let f = ability_test_formula(&reloaded, &mut store, "Athletics", None).unwrap();
    assert_eq!(f.bonus_dice, 1);
}

#[test]
fn concurrent_writers_do_not_clobber() {
    let mut actor = athlete();
    let mut first = TransformerStore::load(&actor).unwrap();
    let mut second = TransformerStore::load(&actor).unwrap();

    first
        .add_and_save(&mut actor, TransformerType::Modifiers, ATHLETICS, "a", 1, false)
        .unwrap();
    let err = second
        .add_and_save(&mut actor, TransformerType::Modifiers, ATHLETICS, "b", 1, false)
        .unwrap_err();
    assert!(matches!(err, MechError::StaleTransformers { .. }));

    second.reload(&actor).unwrap();
    second
        .add_and_save(&mut actor, TransformerType::Modifiers, ATHLETICS, "b", 1, false)
        .unwrap();
    assert_eq!(actor.data.transformers["modifiers"]["athletics"].len(), 2);
}

#[test]
fn armored_and_bleeding_knight() {
    let mut actor = Actor::new(ActorKind::Character, "Loras");
    actor.add_item(Item::ability("Agility", 4)).unwrap();
    let ctx = RulesConfig::default().with_seed(1).build();
    let mut store = TransformerStore::load(&actor).unwrap();

    let armor = obtain_item(
        &mut actor,
        &mut store,
        Item::new(
            "Half Plate",
            ItemKind::Armor(ArmorData {
                rating: 7,
                penalty: 2,
                bulk: 1,
                equipped: true,
            }),
        ),
    )
    .unwrap();
    ctx.apply(&mut store, TableKind::Status, "Bleeding").unwrap();
    store.save(&mut actor).unwrap();

    let def = RollDefinition::new(
        "Dodge",
        RollKind::Ability {
            ability: "Agility".into(),
        },
    );
    let f = formula_for(&def, &actor, &mut store).unwrap();
    assert_eq!(fields(&f), (4, 0, -2, 1));

    let defense = ctx.defense_of(&actor, &mut store).unwrap();
    assert_eq!(defense.value, 4 + 2 + 2 - 2);

    let detail = store
        .aggregate(
            &actor,
            TransformerType::Modifiers,
            Ability::Agility.into(),
            AggregateOptions::TOTAL.with_detail(),
        )
        .unwrap();
    assert_eq!(detail.detail[0].source_name, "Half Plate");

    discard_item(&mut actor, &mut store, armor).unwrap();
    let f = formula_for(&def, &actor, &mut store).unwrap();
    assert_eq!(fields(&f), (4, 0, 0, 1));
    assert!(validate_actor(&actor).is_empty());
}

proptest! {
    #[test]
    fn aggregate_is_sum_of_latest_per_source(
        writes in prop::collection::vec((0usize..5, -10i32..10), 0..30),
        include_global in any::<bool>(),
    ) {
        let actor = Actor::new(ActorKind::Character, "Sam");
        let mut store = TransformerStore::load(&actor).unwrap();
        let mut latest = BTreeMap::new();
        for (source, magnitude) in &writes {
            store
                .add(TransformerType::Modifiers, ATHLETICS, format!("s{source}"), *magnitude, false)
                .unwrap();
            latest.insert(*source, *magnitude);
        }
        store.add(TransformerType::Modifiers, AttributeKey::All, "global", 7, false).unwrap();

        let options = if include_global { AggregateOptions::GLOBAL } else { AggregateOptions::TOTAL };
        let total = store
            .aggregate(&actor, TransformerType::Modifiers, ATHLETICS, options)
            .unwrap()
            .total;
        let expected: i32 = latest.values().sum::<i32>() + if include_global { 7 } else { 0 };
        prop_assert_eq!(total, expected);
        prop_assert_eq!(store.entries(TransformerType::Modifiers, ATHLETICS).len(), latest.len());
    }

    #[test]
    fn repeated_add_is_idempotent(magnitude in -20i32..20, times in 1usize..6) {
        let actor = Actor::new(ActorKind::Character, "Sam");
        let mut store = TransformerStore::load(&actor).unwrap();
        for _ in 0..times {
            store.add(TransformerType::Bonuses, ATHLETICS, "x", magnitude, true).unwrap();
        }
        prop_assert_eq!(store.total(TransformerType::Bonuses, ATHLETICS, false), magnitude);
    }

    #[test]
    fn save_then_load_preserves_totals(
        magnitudes in prop::collection::vec(-10i32..10, 1..8),
    ) {
        let mut actor = Actor::new(ActorKind::Character, "Sam");
        let mut store = TransformerStore::load(&actor).unwrap();
        for (i, magnitude) in magnitudes.iter().enumerate() {
            store.add(TransformerType::Penalties, ATHLETICS, format!("s{i}"), *magnitude, false).unwrap();
        }
        store.save(&mut actor).unwrap();
        let reloaded = TransformerStore::load(&actor).unwrap();
        prop_assert_eq!(
            reloaded.total(TransformerType::Penalties, ATHLETICS, false),
            magnitudes.iter().sum::<i32>()
        );
    }
}
