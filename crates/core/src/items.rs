//! Item value objects. An item is immutable once created; equipment modifies
//! the wearer's derived stats, consumables apply one-shot effects and are
//! removed from the inventory on use.

use crate::content::ConsumableEffect;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Item {
    Consumable { name: String, effect: ConsumableEffect },
    Weapon { name: String, attack: i32 },
    Armor { name: String, defense: i32 },
}

impl Item {
    pub fn name(&self) -> &str {
        match self {
            Item::Consumable { name, .. } | Item::Weapon { name, .. } | Item::Armor { name, .. } => {
                name
            }
        }
    }

    pub fn attack_bonus(&self) -> i32 {
        match self {
            Item::Weapon { attack, .. } => *attack,
            _ => 0,
        }
    }

    pub fn defense_bonus(&self) -> i32 {
        match self {
            Item::Armor { defense, .. } => *defense,
            _ => 0,
        }
    }
}
