//! Stat System - equipment to combat statistics.
//!
//! Every hero slot contributes a fixed, table-driven increment to the
//! combat statistics. Weapons feed the damage fields, armor the defense
//! fields, and everything adds weight. Dexterity is whatever the weight
//! budget leaves over.
//!
//! ```text
//! [ Hero loadout ]
//!      ↓  hand table ×2, armor table × slot factor ×4
//! [ CombatStats ]  (derived, never stored)
//! ```

use strum::IntoEnumIterator;

use crate::state::{ArmorPiece, ArmorSlot, Hero, Item};

/// Dexterity of a hero carrying nothing at all.
pub const DEXTERITY_BASE: u32 = 40;

/// Derived combat statistics. Pure function of a [`Hero`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatStats {
    pub crush_damage: u32,
    pub pierce_damage: u32,
    pub crush_defense: u32,
    pub pierce_defense: u32,
    /// Agility left after carrying the loadout; lighter heroes get more.
    pub dexterity_bonus: u32,
    pub weight: u32,
}

/// Increment a single slot adds to [`CombatStats`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct SlotContribution {
    crush_damage: u32,
    pierce_damage: u32,
    crush_defense: u32,
    pierce_defense: u32,
    weight: u32,
}

impl SlotContribution {
    const fn new(
        crush_damage: u32,
        pierce_damage: u32,
        crush_defense: u32,
        pierce_defense: u32,
        weight: u32,
    ) -> Self {
        Self {
            crush_damage,
            pierce_damage,
            crush_defense,
            pierce_defense,
            weight,
        }
    }

    const fn scaled(self, factor: u32) -> Self {
        Self {
            crush_damage: self.crush_damage * factor,
            pierce_damage: self.pierce_damage * factor,
            crush_defense: self.crush_defense * factor,
            pierce_defense: self.pierce_defense * factor,
            weight: self.weight * factor,
        }
    }
}

const fn hand(item: Item) -> SlotContribution {
    match item {
        // An empty hand still throws a punch.
        Item::None => SlotContribution::new(5, 0, 0, 0, 0),
        Item::Axe => SlotContribution::new(40, 0, 0, 0, 6),
        Item::Bow => SlotContribution::new(0, 35, 0, 0, 2),
        Item::Shield => SlotContribution::new(0, 0, 12, 18, 5),
        Item::Spear => SlotContribution::new(5, 45, 0, 0, 4),
        Item::Sword => SlotContribution::new(25, 25, 0, 0, 3),
    }
}

const fn armor(piece: ArmorPiece) -> SlotContribution {
    match piece {
        ArmorPiece::None => SlotContribution::new(0, 0, 0, 0, 0),
        ArmorPiece::Leather => SlotContribution::new(0, 0, 3, 5, 1),
        ArmorPiece::Metal => SlotContribution::new(0, 0, 8, 10, 4),
    }
}

/// Coverage multiplier of an armor slot.
const fn slot_factor(slot: ArmorSlot) -> u32 {
    match slot {
        ArmorSlot::Chest => 2,
        ArmorSlot::Helmet | ArmorSlot::Skirt | ArmorSlot::Greaves => 1,
    }
}

/// Computes the combat statistics of a hero.
///
/// Total and deterministic: every constructible hero has stats, and the same
/// hero always yields the same stats.
pub fn stats(hero: &Hero) -> CombatStats {
    let hands = hero.hands().into_iter().map(hand);
    let armor = ArmorSlot::iter().map(|slot| armor(hero.armor(slot)).scaled(slot_factor(slot)));

    let total = hands
        .chain(armor)
        .fold(SlotContribution::default(), |acc, slot| SlotContribution {
            crush_damage: acc.crush_damage + slot.crush_damage,
            pierce_damage: acc.pierce_damage + slot.pierce_damage,
            crush_defense: acc.crush_defense + slot.crush_defense,
            pierce_defense: acc.pierce_defense + slot.pierce_defense,
            weight: acc.weight + slot.weight,
        });

    CombatStats {
        crush_damage: total.crush_damage,
        pierce_damage: total.pierce_damage,
        crush_defense: total.crush_defense,
        pierce_defense: total.pierce_defense,
        dexterity_bonus: DEXTERITY_BASE.saturating_sub(total.weight),
        weight: total.weight,
    }
}

impl From<&Hero> for CombatStats {
    fn from(hero: &Hero) -> Self {
        stats(hero)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn unarmed_hero_fights_with_fists() {
        let stats = stats(&Hero::UNARMED);

        assert_eq!(stats.crush_damage, 10);
        assert_eq!(stats.pierce_damage, 0);
        assert_eq!(stats.crush_defense, 0);
        assert_eq!(stats.weight, 0);
        assert_eq!(stats.dexterity_bonus, DEXTERITY_BASE);
    }

    #[test]
    fn sword_and_shield_in_leather() {
        let hero = Hero::builder()
            .left_hand(Item::Sword)
            .right_hand(Item::Shield)
            .full_armor(ArmorPiece::Leather)
            .build();
        let stats = stats(&hero);

        // Sword 25/25, shield 12/18 defense, leather 3/5 over 5 coverage units
        assert_eq!(stats.crush_damage, 25);
        assert_eq!(stats.pierce_damage, 25);
        assert_eq!(stats.crush_defense, 12 + 15);
        assert_eq!(stats.pierce_defense, 18 + 25);
        assert_eq!(stats.weight, 3 + 5 + 5);
        assert_eq!(stats.dexterity_bonus, 40 - 13);
    }

    #[test]
    fn heaviest_loadout_keeps_positive_dexterity() {
        let hero = Hero::builder()
            .dual_wield(Item::Axe)
            .full_armor(ArmorPiece::Metal)
            .build();
        let stats = stats(&hero);

        assert_eq!(stats.weight, 12 + 20);
        assert_eq!(stats.dexterity_bonus, 8);
        assert_eq!(stats.crush_defense, 40);
        assert_eq!(stats.pierce_defense, 50);
    }

    fn any_item() -> impl Strategy<Value = Item> {
        prop::sample::select(Item::iter().collect::<Vec<_>>())
    }

    fn any_armor() -> impl Strategy<Value = ArmorPiece> {
        prop::sample::select(ArmorPiece::iter().collect::<Vec<_>>())
    }

    prop_compose! {
        pub(crate) fn any_hero()(
            left_hand in any_item(),
            right_hand in any_item(),
            helmet in any_armor(),
            chest in any_armor(),
            skirt in any_armor(),
            greaves in any_armor(),
        ) -> Hero {
            Hero { left_hand, right_hand, helmet, chest, skirt, greaves }
        }
    }

    proptest! {
        #[test]
        fn stats_are_pure(hero in any_hero()) {
            prop_assert_eq!(stats(&hero), stats(&hero));
        }

        #[test]
        fn dexterity_plus_weight_is_the_base(hero in any_hero()) {
            let stats = stats(&hero);
            prop_assert_eq!(stats.dexterity_bonus + stats.weight, DEXTERITY_BASE);
        }
    }
}
