//! Item-kind hooks: how owning, equipping and discarding an item changes an
//! actor's transformers.
//!
//! Each [`ItemKind`] maps to a static [`ItemHooks`] record. Transformers an
//! item writes use the item's ID as source ID with `source_is_entity` set,
//! so discarding the item can clear them all at once.

use sif_core::{Actor, ArmorData, CoreError, EntityId, Item, ItemKind, WeaponData};
use tracing::debug;

use crate::attribute::{Ability, AttributeKey, DerivedStat};
use crate::error::MechResult;
use crate::transformer::{TransformerStore, TransformerType};

/// A hook run against the item and the owner's loaded store.
pub type ItemHook = fn(&Item, &mut TransformerStore) -> MechResult<()>;

/// The three lifecycle hooks of one item kind.
#[derive(Debug, Clone, Copy)]
pub struct ItemHooks {
    /// The item was added to an actor.
    pub on_obtained: ItemHook,
    /// The item's equipped flag changed.
    pub on_equipped_changed: ItemHook,
    /// The item was removed from an actor.
    pub on_discarded: ItemHook,
}

static PASSIVE: ItemHooks = ItemHooks {
    on_obtained: no_effect,
    on_equipped_changed: no_effect,
    on_discarded: no_effect,
};

static WEAPON: ItemHooks = ItemHooks {
    on_obtained: sync_equipped,
    on_equipped_changed: sync_equipped,
    on_discarded: clear_item,
};

static ARMOR: ItemHooks = ItemHooks {
    on_obtained: sync_equipped,
    on_equipped_changed: sync_equipped,
    on_discarded: clear_item,
};

/// The hooks for an item kind.
pub fn hooks_for(kind: &ItemKind) -> &'static ItemHooks {
    match kind {
        ItemKind::Ability(_) | ItemKind::Equipment(_) => &PASSIVE,
        ItemKind::Weapon(_) => &WEAPON,
        ItemKind::Armor(_) => &ARMOR,
    }
}

/// Add `item` to `actor`, run its obtained hook, and save.
///
/// Like the other item operations, this checks the store is current before
/// touching the actor, so a stale store leaves both unchanged.
pub fn obtain_item(actor: &mut Actor, store: &mut TransformerStore, item: Item) -> MechResult<EntityId> {
    store.require_current(actor, "obtain_item")?;
    let id = actor.add_item(item)?;
    if let Some(item) = actor.item(id) {
        (hooks_for(&item.kind).on_obtained)(item, store)?;
    }
    store.save(actor)?;
    Ok(id)
}

/// Equip or unequip an owned item, run its hook, and save.
///
/// Returns whether the flag changed. Abilities cannot be equipped.
pub fn set_equipped(
    actor: &mut Actor,
    store: &mut TransformerStore,
    id: EntityId,
    equipped: bool,
) -> MechResult<bool> {
    store.require_current(actor, "set_equipped")?;
    let item = actor
        .item_mut(id)
        .ok_or(CoreError::ItemNotFound(id))?;
    if item.is_equipped() == equipped || !item.set_equipped(equipped) {
        return Ok(false);
    }
    let item: &Item = item;
    (hooks_for(&item.kind).on_equipped_changed)(item, store)?;
    store.save(actor)?;
    Ok(true)
}

/// Remove an owned item, run its discarded hook, and save.
pub fn discard_item(actor: &mut Actor, store: &mut TransformerStore, id: EntityId) -> MechResult<Item> {
    store.require_current(actor, "discard_item")?;
    let item = actor.remove_item(id)?;
    (hooks_for(&item.kind).on_discarded)(&item, store)?;
    store.save(actor)?;
    Ok(item)
}

fn no_effect(_: &Item, _: &mut TransformerStore) -> MechResult<()> {
    Ok(())
}

fn clear_item(item: &Item, store: &mut TransformerStore) -> MechResult<()> {
    let removed = store.remove_source(&item.id.to_string())?;
    debug!(item = %item.name, removed, "cleared item transformers");
    Ok(())
}

/// Write the item's effects when equipped, clear them otherwise.
fn sync_equipped(item: &Item, store: &mut TransformerStore) -> MechResult<()> {
    clear_item(item, store)?;
    if !item.is_equipped() {
        return Ok(());
    }
    let effects = match &item.kind {
        ItemKind::Armor(armor) => armor_effects(armor),
        ItemKind::Weapon(weapon) => weapon_effects(weapon),
        ItemKind::Ability(_) | ItemKind::Equipment(_) => Vec::new(),
    };
    let source = item.id.to_string();
    for (attribute, magnitude) in effects {
        store.add(TransformerType::Modifiers, attribute, source.as_str(), magnitude, true)?;
    }
    debug!(item = %item.name, "applied equipped item");
    Ok(())
}

fn armor_effects(armor: &ArmorData) -> Vec<(AttributeKey, i32)> {
    [
        (DerivedStat::ArmorRating.into(), armor.rating),
        (DerivedStat::CombatDefense.into(), -armor.penalty),
        (Ability::Agility.into(), -armor.penalty),
        (DerivedStat::Movement.into(), -armor.bulk),
    ]
    .into_iter()
    .filter(|(_, magnitude)| *magnitude != 0)
    .collect()
}

fn weapon_effects(weapon: &WeaponData) -> Vec<(AttributeKey, i32)> {
    if weapon.defensive_bonus == 0 {
        return Vec::new();
    }
    vec![(DerivedStat::CombatDefense.into(), weapon.defensive_bonus)]
}
