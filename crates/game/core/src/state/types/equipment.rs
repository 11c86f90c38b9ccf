//! Hero loadouts.
//!
//! A hero is nothing but its equipment: two hand slots and four armor slots.
//! Combat statistics are derived from it on demand (see [`crate::stats`]) and
//! never stored.

/// Hand-slot contents.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Item {
    /// Empty hand (fights with a fist).
    #[default]
    None,
    Axe,
    Bow,
    Shield,
    Spear,
    Sword,
}

/// Contents of a helmet, chest, skirt or greaves slot.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ArmorPiece {
    #[default]
    None,
    Leather,
    Metal,
}

/// Armor slots on a hero.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum ArmorSlot {
    Helmet,
    Chest,
    Skirt,
    Greaves,
}

/// A hero's complete loadout. Immutable once locked in by selection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Hero {
    pub left_hand: Item,
    pub right_hand: Item,
    pub helmet: ArmorPiece,
    pub chest: ArmorPiece,
    pub skirt: ArmorPiece,
    pub greaves: ArmorPiece,
}

impl Hero {
    /// Fists-only hero without armor.
    pub const UNARMED: Hero = Hero {
        left_hand: Item::None,
        right_hand: Item::None,
        helmet: ArmorPiece::None,
        chest: ArmorPiece::None,
        skirt: ArmorPiece::None,
        greaves: ArmorPiece::None,
    };

    /// Creates a builder for constructing a hero.
    pub fn builder() -> HeroBuilder {
        HeroBuilder::default()
    }

    /// Both hand slots, left first.
    pub const fn hands(&self) -> [Item; 2] {
        [self.left_hand, self.right_hand]
    }

    /// Armor piece worn in `slot`.
    pub const fn armor(&self, slot: ArmorSlot) -> ArmorPiece {
        match slot {
            ArmorSlot::Helmet => self.helmet,
            ArmorSlot::Chest => self.chest,
            ArmorSlot::Skirt => self.skirt,
            ArmorSlot::Greaves => self.greaves,
        }
    }
}

/// Builder for constructing heroes.
#[derive(Default)]
pub struct HeroBuilder {
    hero: Hero,
}

impl HeroBuilder {
    pub fn left_hand(mut self, item: Item) -> Self {
        self.hero.left_hand = item;
        self
    }

    pub fn right_hand(mut self, item: Item) -> Self {
        self.hero.right_hand = item;
        self
    }

    /// Puts the same item in both hands.
    pub fn dual_wield(self, item: Item) -> Self {
        self.left_hand(item).right_hand(item)
    }

    pub fn armor(mut self, slot: ArmorSlot, piece: ArmorPiece) -> Self {
        match slot {
            ArmorSlot::Helmet => self.hero.helmet = piece,
            ArmorSlot::Chest => self.hero.chest = piece,
            ArmorSlot::Skirt => self.hero.skirt = piece,
            ArmorSlot::Greaves => self.hero.greaves = piece,
        }
        self
    }

    /// Wears `piece` in every armor slot.
    pub fn full_armor(mut self, piece: ArmorPiece) -> Self {
        self.hero.helmet = piece;
        self.hero.chest = piece;
        self.hero.skirt = piece;
        self.hero.greaves = piece;
        self
    }

    pub fn build(self) -> Hero {
        self.hero
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_sets_slots() {
        let hero = Hero::builder()
            .left_hand(Item::Sword)
            .right_hand(Item::Shield)
            .armor(ArmorSlot::Chest, ArmorPiece::Metal)
            .build();

        assert_eq!(hero.hands(), [Item::Sword, Item::Shield]);
        assert_eq!(hero.armor(ArmorSlot::Chest), ArmorPiece::Metal);
        assert_eq!(hero.armor(ArmorSlot::Helmet), ArmorPiece::None);
    }

    #[test]
    fn default_hero_is_unarmed() {
        assert_eq!(Hero::default(), Hero::UNARMED);
    }

    #[test]
    fn items_parse_case_insensitively() {
        assert_eq!("AXE".parse::<Item>(), Ok(Item::Axe));
        assert_eq!("metal".parse::<ArmorPiece>(), Ok(ArmorPiece::Metal));
        assert!("flail".parse::<Item>().is_err());
    }
}
