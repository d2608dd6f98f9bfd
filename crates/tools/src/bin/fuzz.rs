//! Fuzz harness: hammers the engine with random intents and asserts the
//! simulation invariants after every action.

use anyhow::Result;
use clap::Parser;
use delve_core::cutscene::CutsceneStep;
use delve_core::{Engine, FloorTable, TileKind};
use rand_chacha::{
    ChaCha8Rng,
    rand_core::{Rng, SeedableRng},
};

const INVENTORY_CAPACITY: usize = 20;
const MESSAGE_LOG_CAP: usize = 15;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    #[arg(short, long, default_value_t = 2000)]
    actions: u32,
}

fn main() -> Result<()> {
    let args = Args::parse();

    println!("Starting fuzz harness on seed {} for {} actions...", args.seed, args.actions);
    let mut engine = Engine::new(args.seed, FloorTable::default());
    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);

    engine.begin();
    drain_cutscene(&mut engine);

    for _ in 0..args.actions {
        match rng.next_u32() % 10 {
            0..=6 => {
                let (dx, dy) = match rng.next_u32() % 4 {
                    0 => (1, 0),
                    1 => (-1, 0),
                    2 => (0, 1),
                    _ => (0, -1),
                };
                engine.process_turn(dx, dy);
                drain_cutscene(&mut engine);
            }
            7..=8 => {
                let skills = engine.party().active().skills;
                if !skills.is_empty() {
                    let skill = skills[rng.next_u32() as usize % skills.len()];
                    engine.execute_skill(skill);
                }
            }
            _ => {
                engine.use_item(rng.next_u32() as usize % INVENTORY_CAPACITY);
            }
        }

        assert_invariants(&engine);
        if engine.party().all_dead() {
            println!("Party wiped after {} turns.", engine.turn_count());
            break;
        }
    }

    println!("Fuzzing completed successfully.");
    println!("Turns taken: {}", engine.turn_count());
    println!("Floor reached: {}", engine.floor().index);
    println!("Snapshot Hash: {}", engine.snapshot_hash());
    Ok(())
}

fn assert_invariants(engine: &Engine) {
    for member in &engine.party().members {
        assert!(member.hp >= 0 && member.hp <= member.max_hp, "member HP out of range");
        assert!(member.pe >= 0 && member.pe <= member.max_pe, "member focus out of range");
    }
    assert!(engine.party().inventory.len() <= INVENTORY_CAPACITY, "inventory over capacity");
    assert!(engine.log().len() <= MESSAGE_LOG_CAP, "message log over capacity");

    let floor = engine.floor();
    assert!(floor.map.tile_at(floor.player_pos) != TileKind::Wall, "party inside a wall");
    for enemy in floor.enemies.values() {
        assert!(floor.map.tile_at(enemy.pos) != TileKind::Wall, "enemy inside a wall");
        assert!(enemy.hp > 0, "dead enemy still present");
    }
}

fn drain_cutscene(engine: &mut Engine) {
    while engine.is_input_blocked() {
        match engine.poll_cutscene() {
            Some(CutsceneStep::Dialog { .. }) => engine.advance_cutscene_dialog(),
            Some(_) => {}
            None => break,
        }
    }
}
