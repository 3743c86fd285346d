//! Weapon adjustments to a test formula.

use sif_core::WeaponData;
use tracing::debug;

use crate::formula::DiceFormula;

/// Apply a weapon's fixed modifiers and training requirement to a formula.
///
/// Training absorbs bonus dice: with training `t` and `b` bonus dice, only
/// `b - t` bonus dice remain. When `b <= t` the shortfall is taken out of
/// the pool instead and no bonus dice remain. The pool is not floored here;
/// the roll itself rejects an unusable pool.
pub fn adjust_formula_by_weapon(mut formula: DiceFormula, weapon: &WeaponData) -> DiceFormula {
    formula.pool = formula.pool.saturating_add(weapon.custom_pool_modifier);
    formula.bonus_dice = formula
        .bonus_dice
        .saturating_add(weapon.custom_bonus_dice_modifier);
    formula.modifier = formula.modifier.saturating_add(weapon.custom_test_modifier);

    let Some(training) = weapon.training else {
        return formula;
    };

    let pool_modifier = formula.bonus_dice.saturating_sub(training);
    if pool_modifier <= 0 {
        formula.pool = formula.pool.saturating_add(pool_modifier);
        formula.bonus_dice = 0;
    } else {
        formula.bonus_dice = pool_modifier;
    }

    debug!(training, formula = %formula, "adjusted formula for weapon training");
    formula
}

#[cfg(test)]
mod tests {
    use super::*;

    fn formula(pool: i32, bonus_dice: i32) -> DiceFormula {
        DiceFormula {
            pool,
            bonus_dice,
            ..DiceFormula::default()
        }
    }

    fn trained(training: i32) -> WeaponData {
        WeaponData {
            training: Some(training),
            ..WeaponData::default()
        }
    }

    #[test]
    fn excess_bonus_dice_survive_training() {
        let f = adjust_formula_by_weapon(formula(4, 5), &trained(2));
        assert_eq!(f.bonus_dice, 3);
        assert_eq!(f.pool, 4);
    }

    #[test]
    fn shortfall_comes_out_of_pool() {
        let f = adjust_formula_by_weapon(formula(4, 1), &trained(3));
        assert_eq!(f.pool, 2);
        assert_eq!(f.bonus_dice, 0);
    }

    #[test]
    fn exact_training_uses_up_bonus_dice() {
        let f = adjust_formula_by_weapon(formula(3, 2), &trained(2));
        assert_eq!(f.pool, 3);
        assert_eq!(f.bonus_dice, 0);
    }

    #[test]
    fn untrained_weapon_only_applies_custom_modifiers() {
        let weapon = WeaponData {
            custom_pool_modifier: 1,
            custom_bonus_dice_modifier: 1,
            custom_test_modifier: -2,
            ..WeaponData::default()
        };
        let f = adjust_formula_by_weapon(formula(3, 1), &weapon);
        assert_eq!((f.pool, f.bonus_dice, f.modifier), (4, 2, -2));
    }

    #[test]
    fn custom_modifiers_apply_before_training() {
        let weapon = WeaponData {
            custom_bonus_dice_modifier: 2,
            training: Some(1),
            ..WeaponData::default()
        };
        let f = adjust_formula_by_weapon(formula(3, 0), &weapon);
        assert_eq!((f.pool, f.bonus_dice), (3, 1));
    }

    #[test]
    fn extreme_training_saturates() {
        let f = adjust_formula_by_weapon(formula(i32::MIN + 1, 0), &trained(i32::MAX));
        assert_eq!(f.pool, i32::MIN);
        assert_eq!(f.bonus_dice, 0);
    }

    #[test]
    fn pool_may_drop_to_zero() {
        let f = adjust_formula_by_weapon(formula(1, 0), &trained(2));
        assert_eq!(f.pool, -1);
    }
}
