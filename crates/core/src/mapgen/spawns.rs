//! Enemy and loot placement on a carved layout.

use rand_chacha::ChaCha8Rng;

use crate::content::{self, FloorConfig};
use crate::items::Item;
use crate::types::{Pos, TileKind};

use super::layout::Layout;
use super::model::{EnemySpawn, LootSpawn};
use super::seed::{rand_unit, rand_usize};

const PLACEMENT_ATTEMPTS: usize = 200;
const ENEMY_BASE_HP: i32 = 10;
const ENEMY_HP_PER_FLOOR: i32 = 2;

/// Uniform rejection sampling over the grid. Non-Floor tiles, the entry
/// tile, the stairs, and already-claimed cells disqualify a candidate.
/// `None` when the attempt budget runs out on a cramped layout.
fn sample_free_cell(rng: &mut ChaCha8Rng, layout: &Layout, claimed: &[Pos]) -> Option<Pos> {
    for _ in 0..PLACEMENT_ATTEMPTS {
        let x = rand_usize(rng, 0, layout.width - 1);
        let y = rand_usize(rng, 0, layout.height - 1);
        let pos = Pos { x: x as i32, y: y as i32 };
        if layout.tiles[y * layout.width + x] != TileKind::Floor {
            continue;
        }
        if pos == layout.player_spawn || pos == layout.stairs || claimed.contains(&pos) {
            continue;
        }
        return Some(pos);
    }
    None
}

pub(super) fn generate_enemy_spawns(
    rng: &mut ChaCha8Rng,
    layout: &Layout,
    config: &FloorConfig,
    floor_index: u32,
) -> Vec<EnemySpawn> {
    let count = config.enemies + floor_index as usize;
    let hp = ENEMY_BASE_HP + floor_index as i32 * ENEMY_HP_PER_FLOOR;

    let mut spawns: Vec<EnemySpawn> = Vec::with_capacity(count);
    let mut claimed: Vec<Pos> = Vec::with_capacity(count);
    for _ in 0..count {
        let Some(pos) = sample_free_cell(rng, layout, &claimed) else {
            continue;
        };
        let def = &content::BESTIARY[rand_usize(rng, 0, content::BESTIARY.len() - 1)];
        claimed.push(pos);
        spawns.push(EnemySpawn { def, pos, hp });
    }
    spawns
}

pub(super) fn generate_loot_spawns(
    rng: &mut ChaCha8Rng,
    layout: &Layout,
    enemy_spawns: &[EnemySpawn],
    config: &FloorConfig,
    floor_index: u32,
) -> Vec<LootSpawn> {
    let mut spawns: Vec<LootSpawn> = Vec::with_capacity(config.loot);
    let mut claimed: Vec<Pos> = enemy_spawns.iter().map(|spawn| spawn.pos).collect();
    for _ in 0..config.loot {
        let Some(pos) = sample_free_cell(rng, layout, &claimed) else {
            continue;
        };
        claimed.push(pos);
        spawns.push(LootSpawn { pos, item: roll_loot(rng, floor_index) });
    }
    spawns
}

/// Loot distribution: 40% consumable, 30% weapon, 30% armor. Weapon prefixes
/// skew stronger with depth; the prefix index is capped at the table's end.
pub(super) fn roll_loot(rng: &mut ChaCha8Rng, floor_index: u32) -> Item {
    let roll = rand_unit(rng);
    if roll < 0.4 {
        let base = &content::CONSUMABLES[rand_usize(rng, 0, content::CONSUMABLES.len() - 1)];
        Item::Consumable { name: base.name.to_owned(), effect: base.effect }
    } else if roll < 0.7 {
        let base = &content::WEAPON_BASES[rand_usize(rng, 0, content::WEAPON_BASES.len() - 1)];
        let prefix_index = ((rand_unit(rng) * f64::from(floor_index + 2)) as usize)
            .min(content::WEAPON_PREFIXES.len() - 1);
        let prefix = &content::WEAPON_PREFIXES[prefix_index];
        Item::Weapon {
            name: format!("{} {}", prefix.name, base.name),
            attack: base.base_attack + prefix.attack_mod,
        }
    } else {
        let base = &content::ARMOR_BASES[rand_usize(rng, 0, content::ARMOR_BASES.len() - 1)];
        Item::Armor { name: base.name.to_owned(), defense: base.base_defense }
    }
}
