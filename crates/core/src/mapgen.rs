//! Procedural floor generation split into coherent submodules.

pub mod model;

mod layout;
mod seed;
mod spawns;

use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::SeedableRng;

use crate::content::FloorConfig;

pub use model::{EnemySpawn, GeneratedFloor, LootSpawn, Room};
pub use seed::derive_floor_seed;

/// Builds a complete floor from the run seed alone. The same
/// `(config, floor_index, run_seed)` triple always yields the same floor.
pub fn generate(config: &FloorConfig, floor_index: u32, run_seed: u64) -> GeneratedFloor {
    let floor_seed = seed::derive_floor_seed(run_seed, floor_index);
    let mut rng = ChaCha8Rng::seed_from_u64(floor_seed);

    let layout = layout::build_layout(&mut rng, config);
    let enemy_spawns = spawns::generate_enemy_spawns(&mut rng, &layout, config, floor_index);
    let loot_spawns =
        spawns::generate_loot_spawns(&mut rng, &layout, &enemy_spawns, config, floor_index);

    GeneratedFloor {
        width: layout.width,
        height: layout.height,
        tiles: layout.tiles,
        rooms: layout.rooms,
        player_spawn: layout.player_spawn,
        stairs: layout.stairs,
        enemy_spawns,
        loot_spawns,
    }
}
