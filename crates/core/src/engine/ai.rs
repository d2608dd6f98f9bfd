//! Enemy turn resolution.
//!
//! Enemies sleep until the party first comes within [`ALERT_RADIUS`]
//! Manhattan distance; alerting is permanent. Hunters and ambushers close in
//! one cardinal step per turn, patrols and turrets hold their ground, and
//! any alerted enemy adjacent to the party strikes instead of moving.

use crate::events::{EventKind, PresentationEvent};
use crate::state::{self, StatusEffect, StatusTrait};
use crate::types::{AiBehavior, EnemyId, Pos, TileKind, manhattan};

use super::{ALERT_RADIUS, Engine, MELEE_HOLD_MS, combat};

const POISON_TURNS: u32 = 5;

pub(super) fn enemy_phase(engine: &mut Engine, events: &mut Vec<PresentationEvent>) {
    if engine.game_over {
        return;
    }

    let ids: Vec<EnemyId> = engine.floor.enemies.keys().collect();
    for id in ids {
        act(engine, id, events);
    }
    events.push(EventKind::EnemyPositionSync.immediate());
}

fn act(engine: &mut Engine, id: EnemyId, events: &mut Vec<PresentationEvent>) {
    let player = engine.floor.player_pos;
    let (pos, behavior, mut alerted, name) = {
        let enemy = &engine.floor.enemies[id];
        (enemy.pos, enemy.behavior, enemy.alerted, enemy.name)
    };

    if !alerted && manhattan(pos, player) < ALERT_RADIUS {
        engine.floor.enemies[id].alerted = true;
        engine.push_log(format!("{name} notices the party!"));
        alerted = true;
    }
    if !alerted {
        return;
    }

    match behavior {
        AiBehavior::Hunter | AiBehavior::Ambush => {
            let dest = pos.offset_toward(player, combat::coin_flip(&mut engine.rng));
            if dest == player {
                attack(engine, id, events);
            } else if is_free(engine, dest) {
                engine.floor.enemies[id].pos = dest;
            }
        }
        AiBehavior::Patrol | AiBehavior::Turret => {
            if manhattan(pos, player) == 1 {
                attack(engine, id, events);
            }
        }
    }
}

fn attack(engine: &mut Engine, id: EnemyId, events: &mut Vec<PresentationEvent>) {
    let target = engine.floor.player_pos;
    let variation = combat::roll_variation(&mut engine.rng);
    let (enemy_attack, name, poisons) = {
        let enemy = &engine.floor.enemies[id];
        (enemy.derived_attack(), enemy.name, enemy.poisons)
    };
    let damage =
        combat::calc_damage(enemy_attack, engine.party.active().derived_defense(), variation);
    engine.party.active_mut().take_damage(damage);
    let victim = engine.party.active().name;

    events.push(EventKind::EnemyAttack { enemy: id, target }.paced(MELEE_HOLD_MS));
    events.push(EventKind::DamageNumber { amount: damage, at: target }.immediate());
    if engine.party.active().is_dead() {
        engine.push_log(format!("{victim} falls to the {name}."));
        return;
    }
    // Venom does not stack; a fresh bite never extends an active affliction.
    if poisons && !state::is_poisoned(&engine.party.active().statuses) {
        engine.party.active_mut().statuses.push(StatusEffect {
            name: "Poison",
            remaining: POISON_TURNS,
            effect: StatusTrait::Poison,
        });
        engine.push_log(format!("{victim} is poisoned!"));
    }
}

fn is_free(engine: &Engine, dest: Pos) -> bool {
    engine.floor.map.tile_at(dest) == TileKind::Floor && engine.floor.enemy_at(dest).is_none()
}

trait StepToward {
    fn offset_toward(self, target: Pos, prefer_horizontal: bool) -> Pos;
}

impl StepToward for Pos {
    /// One cardinal step toward `target`. When both axes are off, the coin
    /// flip picks which one to close first.
    fn offset_toward(self, target: Pos, prefer_horizontal: bool) -> Pos {
        let dx = (target.x - self.x).signum();
        let dy = (target.y - self.y).signum();
        if dx != 0 && (dy == 0 || prefer_horizontal) {
            self.offset(dx, 0)
        } else {
            self.offset(0, dy)
        }
    }
}
