//! The three-member party: rotation, experience, leveling, and the shared
//! inventory. The party persists across floors; only member vitals, levels,
//! equipment, and the inventory change.

use crate::content::{self, ConsumableEffect};
use crate::items::Item;
use crate::state::{self, StatusEffect};
use crate::types::{ActorClass, Tint};

pub const PARTY_SIZE: usize = 3;
pub const INVENTORY_CAPACITY: usize = 20;

const LEVEL_MAX_HP_GAIN: i32 = 5;
const LEVEL_ATTACK_GAIN: i32 = 1;
const PE_REGEN_PER_TURN: i32 = 2;

#[derive(Clone, Debug)]
pub struct Actor {
    pub class: ActorClass,
    pub name: &'static str,
    pub hp: i32,
    pub max_hp: i32,
    pub pe: i32,
    pub max_pe: i32,
    pub attack: i32,
    pub defense: i32,
    pub weapon: Option<Item>,
    pub armor: Option<Item>,
    pub level: u32,
    pub exp: i32,
    pub next_exp: i32,
    pub statuses: Vec<StatusEffect>,
    pub tint: Tint,
    pub skills: &'static [&'static str],
}

impl Actor {
    pub fn from_class(class: ActorClass) -> Self {
        let def = content::class(class);
        let mut actor = Self {
            class,
            name: def.name,
            hp: def.hp,
            max_hp: def.hp,
            pe: def.pe,
            max_pe: 100,
            attack: def.attack,
            defense: def.defense,
            weapon: None,
            armor: None,
            level: 1,
            exp: 0,
            next_exp: 50,
            statuses: Vec::new(),
            tint: def.tint,
            skills: def.skills,
        };
        match class {
            ActorClass::Tracker => {
                actor.weapon = Some(Item::Weapon { name: "Worn Shortbow".into(), attack: 2 });
            }
            ActorClass::Warden => {
                actor.armor = Some(Item::Armor { name: "Battered Jerkin".into(), defense: 3 });
            }
            ActorClass::Channeler => {}
        }
        actor
    }

    pub fn is_dead(&self) -> bool {
        self.hp <= 0
    }

    pub fn take_damage(&mut self, amount: i32) {
        self.hp = (self.hp - amount).max(0);
    }

    pub fn heal(&mut self, amount: i32) {
        self.hp = (self.hp + amount).min(self.max_hp);
    }

    pub fn restore_pe(&mut self, amount: i32) {
        self.pe = (self.pe + amount).min(self.max_pe);
    }

    pub fn regen_pe(&mut self) {
        self.restore_pe(PE_REGEN_PER_TURN);
    }

    /// Base attack plus the equipped weapon's bonus.
    pub fn derived_attack(&self) -> i32 {
        self.attack + self.weapon.as_ref().map_or(0, Item::attack_bonus)
    }

    /// Base defense plus armor and any active defensive status.
    pub fn derived_defense(&self) -> i32 {
        self.defense
            + self.armor.as_ref().map_or(0, Item::defense_bonus)
            + state::status_defense_bonus(&self.statuses)
    }

    pub fn is_restricted(&self) -> bool {
        state::is_restricted(&self.statuses)
    }

    /// Grants experience. Levels up at most once per grant even when the
    /// remainder would clear the next threshold as well; the curve's pacing
    /// depends on it. Returns the new level when a level-up happened.
    pub fn gain_exp(&mut self, amount: i32) -> Option<u32> {
        self.exp += amount;
        if self.exp < self.next_exp {
            return None;
        }
        self.level += 1;
        self.exp = 0;
        self.next_exp = (self.next_exp as f64 * 1.5).floor() as i32;
        self.max_hp += LEVEL_MAX_HP_GAIN;
        self.hp = self.max_hp;
        self.attack += LEVEL_ATTACK_GAIN;
        Some(self.level)
    }
}

/// A level-up that happened during an experience grant, for the caller's log.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LevelUp {
    pub name: &'static str,
    pub level: u32,
}

pub struct Party {
    pub members: [Actor; PARTY_SIZE],
    index: usize,
    pub inventory: Vec<Item>,
    game_over_fired: bool,
}

impl Party {
    pub fn new() -> Self {
        Self {
            members: [
                Actor::from_class(ActorClass::Tracker),
                Actor::from_class(ActorClass::Warden),
                Actor::from_class(ActorClass::Channeler),
            ],
            index: 0,
            inventory: Vec::new(),
            game_over_fired: false,
        }
    }

    pub fn active(&self) -> &Actor {
        &self.members[self.index]
    }

    pub fn active_mut(&mut self) -> &mut Actor {
        &mut self.members[self.index]
    }

    /// The member that will act after the next rotation, dead or not; used
    /// for the point-man swap tint on move events.
    pub fn next_active(&self) -> &Actor {
        &self.members[(self.index + 1) % PARTY_SIZE]
    }

    /// Advances the rotation, skipping dead members, scanning at most one
    /// full cycle. Returns `true` exactly once, on the rotation that finds
    /// the whole party dead.
    pub fn rotate(&mut self) -> bool {
        let mut steps = PARTY_SIZE;
        loop {
            self.index = (self.index + 1) % PARTY_SIZE;
            steps -= 1;
            if !self.active().is_dead() || steps == 0 {
                break;
            }
        }
        if self.active().is_dead() && !self.game_over_fired {
            self.game_over_fired = true;
            return true;
        }
        false
    }

    /// Full reward to the active member, half (floored) to every other
    /// living member. Dead members gain nothing.
    pub fn distribute_exp(&mut self, amount: i32) -> Vec<LevelUp> {
        let active_index = self.index;
        let mut level_ups = Vec::new();
        for (member_index, member) in self.members.iter_mut().enumerate() {
            if member.is_dead() {
                continue;
            }
            let share = if member_index == active_index { amount } else { amount / 2 };
            if let Some(level) = member.gain_exp(share) {
                level_ups.push(LevelUp { name: member.name, level });
            }
        }
        level_ups
    }

    /// Rejects the item when the inventory is at capacity, handing it back
    /// so the caller can report the overflow instead of losing the item.
    pub fn gain_item(&mut self, item: Item) -> Result<(), Item> {
        if self.inventory.len() >= INVENTORY_CAPACITY {
            return Err(item);
        }
        self.inventory.push(item);
        Ok(())
    }

    /// Applies the inventory slot to the active member: consumables resolve
    /// and vanish, equipment swaps with the currently worn piece. Returns a
    /// log line, or `None` for an empty slot.
    pub fn use_item(&mut self, slot: usize) -> Option<String> {
        if slot >= self.inventory.len() {
            return None;
        }
        let item = self.inventory.remove(slot);
        let actor_name = self.active().name;
        match item {
            Item::Consumable { name, effect } => {
                let actor = self.active_mut();
                match effect {
                    ConsumableEffect::Heal(amount) => actor.heal(amount),
                    ConsumableEffect::RestorePe(amount) => actor.restore_pe(amount),
                    ConsumableEffect::CureStatus => actor.statuses.clear(),
                }
                Some(format!("{actor_name} uses {name}."))
            }
            weapon @ Item::Weapon { .. } => {
                let previous = self.active_mut().weapon.replace(weapon);
                if let Some(previous) = previous {
                    self.inventory.push(previous);
                }
                Some(format!("{actor_name} re-arms."))
            }
            armor @ Item::Armor { .. } => {
                let previous = self.active_mut().armor.replace(armor);
                if let Some(previous) = previous {
                    self.inventory.push(previous);
                }
                Some(format!("{actor_name} straps in."))
            }
        }
    }

    pub fn all_dead(&self) -> bool {
        self.members.iter().all(Actor::is_dead)
    }
}

impl Default for Party {
    fn default() -> Self {
        Self::new()
    }
}
