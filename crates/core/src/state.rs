//! Per-floor mutable state: the tile grid, the enemy arena, and loot drops.
//! A `Floor` is created wholesale from generator output and discarded on
//! floor advance; the turn engine is its only mutator.

use slotmap::SlotMap;

use crate::items::Item;
use crate::mapgen::GeneratedFloor;
use crate::types::{AiBehavior, EnemyId, Pos, TileKind, Tint};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusTrait {
    DefensePlus(i32),
    Restrict,
    /// Damage over time: 5% of max hp per turn, at least 1.
    Poison,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StatusEffect {
    pub name: &'static str,
    pub remaining: u32,
    pub effect: StatusTrait,
}

/// Decrements durations in place and drops expired effects.
pub fn tick_statuses(statuses: &mut Vec<StatusEffect>) {
    for status in statuses.iter_mut() {
        status.remaining = status.remaining.saturating_sub(1);
    }
    statuses.retain(|status| status.remaining > 0);
}

pub fn status_defense_bonus(statuses: &[StatusEffect]) -> i32 {
    statuses
        .iter()
        .map(|status| match status.effect {
            StatusTrait::DefensePlus(amount) => amount,
            StatusTrait::Restrict | StatusTrait::Poison => 0,
        })
        .sum()
}

pub fn is_restricted(statuses: &[StatusEffect]) -> bool {
    statuses.iter().any(|status| status.effect == StatusTrait::Restrict)
}

pub fn is_poisoned(statuses: &[StatusEffect]) -> bool {
    statuses.iter().any(|status| status.effect == StatusTrait::Poison)
}

/// Per-turn poison bite for a victim with the given max hp.
pub fn poison_damage(max_hp: i32) -> i32 {
    (max_hp / 20).max(1)
}

#[derive(Clone)]
pub struct Map {
    pub width: usize,
    pub height: usize,
    pub tiles: Vec<TileKind>,
}

impl Map {
    /// Out-of-bounds reads are walls, so movement legality never indexes
    /// outside the grid.
    pub fn tile_at(&self, pos: Pos) -> TileKind {
        if pos.x < 0 || pos.y < 0 {
            return TileKind::Wall;
        }
        let x = pos.x as usize;
        let y = pos.y as usize;
        if x >= self.width || y >= self.height {
            return TileKind::Wall;
        }
        self.tiles[y * self.width + x]
    }

    pub fn in_bounds(&self, pos: Pos) -> bool {
        pos.x >= 0
            && pos.y >= 0
            && (pos.x as usize) < self.width
            && (pos.y as usize) < self.height
    }
}

#[derive(Clone, Debug)]
pub struct Enemy {
    pub id: EnemyId,
    pub name: &'static str,
    pub pos: Pos,
    pub hp: i32,
    pub max_hp: i32,
    pub attack: i32,
    pub defense: i32,
    pub behavior: AiBehavior,
    pub alerted: bool,
    /// Hits from this enemy inflict the poison status.
    pub poisons: bool,
    pub exp_reward: i32,
    pub tint: Tint,
    pub statuses: Vec<StatusEffect>,
}

impl Enemy {
    pub fn take_damage(&mut self, amount: i32) {
        self.hp = (self.hp - amount).max(0);
    }

    pub fn is_dead(&self) -> bool {
        self.hp <= 0
    }

    pub fn derived_attack(&self) -> i32 {
        self.attack
    }

    pub fn derived_defense(&self) -> i32 {
        self.defense + status_defense_bonus(&self.statuses)
    }
}

#[derive(Clone, Debug)]
pub struct LootDrop {
    pub pos: Pos,
    pub item: Item,
}

pub struct Floor {
    pub index: u32,
    pub map: Map,
    pub enemies: SlotMap<EnemyId, Enemy>,
    pub loot: Vec<LootDrop>,
    /// The party shares one marker on the grid; members swap in visually.
    pub player_pos: Pos,
    pub stairs: Pos,
}

impl Floor {
    pub fn from_generated(generated: GeneratedFloor, index: u32) -> Self {
        let map =
            Map { width: generated.width, height: generated.height, tiles: generated.tiles };

        let mut enemies = SlotMap::with_key();
        for spawn in generated.enemy_spawns {
            let id = enemies.insert(Enemy {
                id: EnemyId::default(),
                name: spawn.def.name,
                pos: spawn.pos,
                hp: spawn.hp,
                max_hp: spawn.hp,
                attack: spawn.def.attack,
                defense: 0,
                behavior: spawn.def.behavior,
                alerted: false,
                poisons: spawn.def.poisons,
                exp_reward: spawn.def.exp,
                tint: spawn.def.tint,
                statuses: Vec::new(),
            });
            enemies[id].id = id;
        }

        let loot = generated
            .loot_spawns
            .into_iter()
            .map(|spawn| LootDrop { pos: spawn.pos, item: spawn.item })
            .collect();

        Self {
            index,
            map,
            enemies,
            loot,
            player_pos: generated.player_spawn,
            stairs: generated.stairs,
        }
    }

    pub fn enemy_at(&self, pos: Pos) -> Option<EnemyId> {
        self.enemies.iter().find(|(_, enemy)| enemy.pos == pos).map(|(id, _)| id)
    }
}
