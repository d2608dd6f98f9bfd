//! Headless run driver: seeds an engine, plays the entry cutscene, walks the
//! party with seeded random intents, and prints the final snapshot hash.

use std::fs;

use clap::Parser;
use color_eyre::Result;
use color_eyre::eyre::WrapErr;
use delve_core::cutscene::CutsceneStep;
use delve_core::{Engine, FloorTable};
use rand_chacha::{
    ChaCha8Rng,
    rand_core::{Rng, SeedableRng},
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    #[arg(short, long, default_value_t = 200)]
    turns: u32,
    /// Optional floor table override, as JSON
    #[arg(short, long)]
    floors: Option<String>,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();

    let floor_table = match &args.floors {
        Some(path) => {
            let data = fs::read_to_string(path)
                .wrap_err_with(|| format!("failed to read floor table: {path}"))?;
            serde_json::from_str(&data).wrap_err("failed to deserialize floor table JSON")?
        }
        None => FloorTable::default(),
    };

    let mut engine = Engine::new(args.seed, floor_table);
    let mut driver_rng = ChaCha8Rng::seed_from_u64(args.seed);

    println!("Run seed {} for {} turns...", args.seed, args.turns);
    let events = engine.begin();
    println!("  {} setup event(s)", events.len());
    drain_cutscene(&mut engine);

    let mut event_count = 0_usize;
    for _ in 0..args.turns {
        let (dx, dy) = random_direction(&mut driver_rng);
        let batch = engine.process_turn(dx, dy);
        event_count += batch.len();
        drain_cutscene(&mut engine);

        // Occasionally channel a skill, the way a player mashing hotkeys would.
        if driver_rng.next_u32() % 8 == 0 {
            let skills = engine.party().active().skills;
            if !skills.is_empty() {
                let skill = skills[driver_rng.next_u32() as usize % skills.len()];
                event_count += engine.execute_skill(skill).len();
            }
        }

        if engine.is_input_blocked() {
            break;
        }
    }

    println!("Run complete.");
    println!("Turns taken: {}", engine.turn_count());
    println!("Floor reached: {}", engine.floor().index);
    println!("Events emitted: {event_count}");
    for line in engine.log() {
        println!("  log: {line}");
    }
    println!("Snapshot Hash: {}", engine.snapshot_hash());

    Ok(())
}

/// Plays any pending cutscene to completion, acknowledging dialogs.
fn drain_cutscene(engine: &mut Engine) {
    while engine.is_input_blocked() {
        match engine.poll_cutscene() {
            Some(CutsceneStep::Dialog { speaker, text }) => {
                println!("  {speaker}: {text}");
                engine.advance_cutscene_dialog();
            }
            Some(_) => {}
            None => break,
        }
    }
}

fn random_direction(rng: &mut ChaCha8Rng) -> (i32, i32) {
    match rng.next_u32() % 4 {
        0 => (1, 0),
        1 => (-1, 0),
        2 => (0, 1),
        _ => (0, -1),
    }
}
