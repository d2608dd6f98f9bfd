//! The turn engine: one call per player intent, a batch of presentation
//! events out. All simulation is synchronous; pacing travels on the events.

mod ai;
mod combat;

#[cfg(test)]
mod tests;

use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::SeedableRng;

use crate::content::{self, FloorTable, SkillPower, SkillTargeting};
use crate::cutscene::{CutscenePlayer, CutsceneStep};
use crate::events::{EventKind, PresentationEvent};
use crate::mapgen;
use crate::party::Party;
use crate::state::{self, Floor, LootDrop};
use crate::types::{EnemyId, Pos, TileKind, manhattan};

pub use combat::calc_damage;

const MESSAGE_LOG_CAP: usize = 15;
const ALERT_RADIUS: u32 = 7;

const MELEE_HOLD_MS: u32 = 150;
const HIT_HOLD_MS: u32 = 200;
const FLASH_HOLD_MS: u32 = 300;
const SKILL_TAIL_HOLD_MS: u32 = 500;
const ASCEND_HOLD_MS: u32 = 4000;

pub struct Engine {
    run_seed: u64,
    rng: ChaCha8Rng,
    floor_table: FloorTable,
    floor: Floor,
    party: Party,
    cutscene: CutscenePlayer,
    /// Newest-first, capped at [`MESSAGE_LOG_CAP`] lines.
    log: Vec<String>,
    game_over: bool,
    /// Renderer backpressure: intents are dropped, not queued, while the
    /// renderer is still draining the previous batch.
    renderer_idle: bool,
    turn_count: u64,
}

impl Engine {
    pub fn new(run_seed: u64, floor_table: FloorTable) -> Self {
        let config = floor_table.config(1);
        let generated = mapgen::generate(config, 1, run_seed);
        Self {
            run_seed,
            rng: ChaCha8Rng::seed_from_u64(run_seed),
            floor: Floor::from_generated(generated, 1),
            floor_table,
            party: Party::new(),
            cutscene: CutscenePlayer::new(),
            log: Vec::new(),
            game_over: false,
            renderer_idle: true,
            turn_count: 0,
        }
    }

    /// Announces the starting floor and kicks off its entry cutscene, if any.
    pub fn begin(&mut self) -> Vec<PresentationEvent> {
        let cutscene = self.floor_table.config(1).cutscene;
        if let Some(id) = cutscene {
            self.cutscene.play(content::cutscene_script(id));
        }
        vec![EventKind::FloorSetup { floor: 1, cutscene }.immediate()]
    }

    pub fn set_renderer_idle(&mut self, idle: bool) {
        self.renderer_idle = idle;
    }

    pub fn is_input_blocked(&self) -> bool {
        self.game_over || self.cutscene.is_active() || !self.renderer_idle
    }

    pub fn floor(&self) -> &Floor {
        &self.floor
    }

    pub fn party(&self) -> &Party {
        &self.party
    }

    pub fn log(&self) -> &[String] {
        &self.log
    }

    pub fn turn_count(&self) -> u64 {
        self.turn_count
    }

    /// One player turn: a unit step in a cardinal direction, resolved as a
    /// melee attack when an enemy holds the destination cell. Walking into a
    /// wall is a no-op that does not consume the turn.
    pub fn process_turn(&mut self, dx: i32, dy: i32) -> Vec<PresentationEvent> {
        if self.is_input_blocked() {
            return Vec::new();
        }
        if !matches!((dx, dy), (0, 1) | (0, -1) | (1, 0) | (-1, 0)) {
            return Vec::new();
        }

        let from = self.floor.player_pos;
        let dest = from.offset(dx, dy);
        if self.floor.map.tile_at(dest) == TileKind::Wall {
            return Vec::new();
        }

        let mut events = Vec::new();

        if self.party.active().is_restricted() {
            let name = self.party.active().name;
            self.push_log(format!("{name} strains against the binding."));
            self.finish_turn(&mut events);
            return events;
        }

        if let Some(enemy_id) = self.floor.enemy_at(dest) {
            self.melee(enemy_id, dest, &mut events);
            self.finish_turn(&mut events);
            return events;
        }

        self.floor.player_pos = dest;
        events.push(
            EventKind::Move { from, to: dest, next_tint: self.party.next_active().tint }
                .paced(MELEE_HOLD_MS),
        );

        self.pick_up_loot(dest, &mut events);

        if dest == self.floor.stairs {
            return self.advance_floor();
        }

        self.finish_turn(&mut events);
        events
    }

    /// Casts one of the active member's skills. Insufficient focus is a
    /// log-only no-op; the turn is not consumed and no enemy acts.
    pub fn execute_skill(&mut self, skill_id: &str) -> Vec<PresentationEvent> {
        if self.is_input_blocked() {
            return Vec::new();
        }
        let Some(def) = content::skill(skill_id) else {
            return Vec::new();
        };
        if !self.party.active().skills.contains(&def.id) {
            return Vec::new();
        }

        let caster_name = self.party.active().name;
        if self.party.active().pe < def.cost {
            self.push_log(format!("{caster_name} lacks the focus for {}.", def.name));
            return Vec::new();
        }
        self.party.active_mut().pe -= def.cost;
        self.push_log(format!("{caster_name} unleashes {}!", def.name));

        let mut events = vec![EventKind::Flash { tint: self.party.active().tint }.paced(FLASH_HOLD_MS)];
        let power = match def.power {
            SkillPower::Fixed(amount) => amount,
            SkillPower::Scaled(multiplier) => {
                (f64::from(self.party.active().derived_attack()) * multiplier).floor() as i32
            }
        };

        match def.targeting {
            SkillTargeting::Target => {
                if let Some(target) = self.first_enemy_in_range(def.range) {
                    self.skill_hit(target, power, &mut events);
                } else {
                    self.push_log("But nothing stirs.".to_owned());
                }
            }
            SkillTargeting::Drain => {
                if let Some(target) = self.first_enemy_in_range(def.range) {
                    let dealt = self.skill_hit(target, power, &mut events);
                    self.party.active_mut().heal(dealt);
                    events.push(
                        EventKind::HealNumber { amount: dealt, at: self.floor.player_pos }
                            .immediate(),
                    );
                } else {
                    self.push_log("But nothing stirs.".to_owned());
                }
            }
            SkillTargeting::MultiHit { hits } => {
                for _ in 0..hits {
                    let Some(target) = self.random_enemy_in_range(def.range) else {
                        break;
                    };
                    self.skill_hit(target, power, &mut events);
                }
            }
            SkillTargeting::AllEnemies => {
                events.push(EventKind::ScreenShake.immediate());
                let ids: Vec<EnemyId> = self.floor.enemies.keys().collect();
                for id in ids {
                    self.skill_hit(id, power, &mut events);
                }
            }
        }

        pace_tail(&mut events, SKILL_TAIL_HOLD_MS);
        events.push(EventKind::UiRefresh.immediate());
        events
    }

    /// Applies an inventory slot to the active member. Does not consume the
    /// turn.
    pub fn use_item(&mut self, slot: usize) -> Vec<PresentationEvent> {
        if self.is_input_blocked() {
            return Vec::new();
        }
        match self.party.use_item(slot) {
            Some(line) => {
                self.push_log(line);
                vec![EventKind::UiRefresh.immediate()]
            }
            None => Vec::new(),
        }
    }

    /// Drains the entry cutscene one step at a time. `Log` steps land in the
    /// message log here; `Wait` and `Dialog` steps are the caller's to pace.
    pub fn poll_cutscene(&mut self) -> Option<CutsceneStep> {
        let step = self.cutscene.poll()?;
        if let CutsceneStep::Log { text } = step {
            self.push_log(text.to_owned());
        }
        Some(step)
    }

    pub fn advance_cutscene_dialog(&mut self) {
        self.cutscene.advance_dialog();
    }

    /// Order-independent digest of the simulation state, for replay
    /// divergence checks.
    pub fn snapshot_hash(&self) -> u64 {
        use std::hash::Hasher;
        use xxhash_rust::xxh3::Xxh3;

        let mut hasher = Xxh3::new();
        hasher.write_u64(self.run_seed);
        hasher.write_u64(self.turn_count);
        hasher.write_u32(self.floor.index);
        hasher.write_i32(self.floor.player_pos.x);
        hasher.write_i32(self.floor.player_pos.y);

        for member in &self.party.members {
            hasher.write_i32(member.hp);
            hasher.write_i32(member.pe);
            hasher.write_u32(member.level);
            hasher.write_i32(member.exp);
        }

        let mut enemy_digest: Vec<(Pos, i32)> =
            self.floor.enemies.values().map(|enemy| (enemy.pos, enemy.hp)).collect();
        enemy_digest.sort();
        hasher.write_usize(enemy_digest.len());
        for (pos, hp) in enemy_digest {
            hasher.write_i32(pos.x);
            hasher.write_i32(pos.y);
            hasher.write_i32(hp);
        }
        hasher.write_usize(self.floor.loot.len());
        hasher.write_usize(self.party.inventory.len());

        hasher.finish()
    }

    fn melee(&mut self, enemy_id: EnemyId, dest: Pos, events: &mut Vec<PresentationEvent>) {
        events.push(EventKind::Attack { target: dest }.paced(MELEE_HOLD_MS));

        let attack = self.party.active().derived_attack();
        let variation = combat::roll_variation(&mut self.rng);
        let enemy = &mut self.floor.enemies[enemy_id];
        let damage = combat::calc_damage(attack, enemy.derived_defense(), variation);
        enemy.take_damage(damage);
        let dead = enemy.is_dead();

        events.push(EventKind::DamageNumber { amount: damage, at: dest }.immediate());
        events.push(EventKind::HitEffect { enemy: Some(enemy_id) }.paced(HIT_HOLD_MS));
        if dead {
            self.kill_enemy(enemy_id, events);
        }
    }

    /// Resolves one skill hit against `enemy_id` and returns the damage
    /// dealt. The target takes the computed power as-is; no variation roll
    /// and no defense reduction. Removal is idempotent; a stale id is a
    /// silent no-op.
    fn skill_hit(
        &mut self,
        enemy_id: EnemyId,
        power: i32,
        events: &mut Vec<PresentationEvent>,
    ) -> i32 {
        let Some(enemy) = self.floor.enemies.get_mut(enemy_id) else {
            return 0;
        };
        enemy.take_damage(power);
        let at = enemy.pos;
        let dead = enemy.is_dead();

        events.push(
            EventKind::Projectile { from: self.floor.player_pos, to: at, tint: self.party.active().tint }
                .immediate(),
        );
        events.push(EventKind::DamageNumber { amount: power, at }.immediate());
        events.push(EventKind::HitEffect { enemy: Some(enemy_id) }.paced(HIT_HOLD_MS));
        if dead {
            self.kill_enemy(enemy_id, events);
        }
        power
    }

    /// Removes the enemy, pays out experience, and reports level-ups. Safe to
    /// call twice with the same id; the second call finds nothing to remove.
    fn kill_enemy(&mut self, enemy_id: EnemyId, events: &mut Vec<PresentationEvent>) {
        let Some(enemy) = self.floor.enemies.remove(enemy_id) else {
            return;
        };
        let kill_hold_ms = self.floor_table.config(self.floor.index).kill_hold_ms;
        events.push(EventKind::Death { enemy: enemy_id }.paced(kill_hold_ms));
        self.push_log(format!("{} is destroyed. (+{} exp)", enemy.name, enemy.exp_reward));
        for level_up in self.party.distribute_exp(enemy.exp_reward) {
            self.push_log(format!("{} reaches level {}.", level_up.name, level_up.level));
        }
        events.push(EventKind::RosterSync.immediate());
    }

    fn pick_up_loot(&mut self, dest: Pos, events: &mut Vec<PresentationEvent>) {
        let Some(index) = self.floor.loot.iter().position(|drop| drop.pos == dest) else {
            return;
        };
        let drop = self.floor.loot.remove(index);
        match self.party.gain_item(drop.item) {
            Ok(()) => {
                self.push_log(format!(
                    "Picked up {}.",
                    self.party.inventory.last().map_or("it", |item| item.name())
                ));
                events.push(EventKind::ItemPickup { at: dest }.immediate());
                events.push(EventKind::LootSync.immediate());
            }
            Err(item) => {
                // Pack full: the drop stays on the floor instead of vanishing.
                self.push_log(format!("The pack is full; {} is left behind.", item.name()));
                self.floor.loot.push(LootDrop { pos: dest, item });
            }
        }
    }

    /// Leaves the current floor behind and builds the next one synchronously.
    /// The returned pair supersedes any events from the triggering move.
    fn advance_floor(&mut self) -> Vec<PresentationEvent> {
        let next_index = self.floor.index + 1;
        let config = self.floor_table.config(next_index);
        let cutscene = config.cutscene;
        let generated = mapgen::generate(config, next_index, self.run_seed);
        self.floor = Floor::from_generated(generated, next_index);
        self.push_log(format!("The party descends to floor {next_index}."));
        if let Some(id) = cutscene {
            self.cutscene.play(content::cutscene_script(id));
        }
        vec![
            EventKind::Ascend.paced(ASCEND_HOLD_MS),
            EventKind::FloorSetup { floor: next_index, cutscene }.immediate(),
        ]
    }

    /// Closes out the player action: rotate the point man, let every enemy
    /// act, tick poison and statuses, regenerate focus.
    fn finish_turn(&mut self, events: &mut Vec<PresentationEvent>) {
        if self.party.rotate() {
            self.push_log("Darkness takes the party.".to_owned());
            self.game_over = true;
        }
        events.push(EventKind::UiRefresh.immediate());

        ai::enemy_phase(self, events);
        self.tick_poison(events);

        // The enemy phase or a poison tick may have felled the fresh point
        // man; a dead member never holds the rotation.
        if self.party.active().is_dead() && self.party.rotate() {
            self.push_log("Darkness takes the party.".to_owned());
            self.game_over = true;
        }

        for member in &mut self.party.members {
            state::tick_statuses(&mut member.statuses);
        }
        for enemy in self.floor.enemies.values_mut() {
            state::tick_statuses(&mut enemy.statuses);
        }
        self.party.active_mut().regen_pe();
        self.turn_count += 1;
    }

    /// Poison bites every afflicted living member once per turn.
    fn tick_poison(&mut self, events: &mut Vec<PresentationEvent>) {
        let at = self.floor.player_pos;
        for index in 0..self.party.members.len() {
            let member = &mut self.party.members[index];
            if member.is_dead() || !state::is_poisoned(&member.statuses) {
                continue;
            }
            let damage = state::poison_damage(member.max_hp);
            member.take_damage(damage);
            let fallen = member.is_dead().then_some(member.name);
            events.push(EventKind::DamageNumber { amount: damage, at }.immediate());
            if let Some(name) = fallen {
                self.push_log(format!("{name} succumbs to the poison."));
            }
        }
    }

    fn first_enemy_in_range(&self, range: u32) -> Option<EnemyId> {
        let player = self.floor.player_pos;
        self.floor
            .enemies
            .iter()
            .find(|(_, enemy)| manhattan(player, enemy.pos) < range)
            .map(|(id, _)| id)
    }

    fn random_enemy_in_range(&mut self, range: u32) -> Option<EnemyId> {
        let player = self.floor.player_pos;
        let candidates: Vec<EnemyId> = self
            .floor
            .enemies
            .iter()
            .filter(|(_, enemy)| manhattan(player, enemy.pos) < range)
            .map(|(id, _)| id)
            .collect();
        if candidates.is_empty() {
            return None;
        }
        Some(candidates[combat::rand_index(&mut self.rng, candidates.len())])
    }

    fn push_log(&mut self, line: String) {
        self.log.insert(0, line);
        self.log.truncate(MESSAGE_LOG_CAP);
    }
}

/// Moves the skill resolution pause onto the batch's final event.
fn pace_tail(events: &mut [PresentationEvent], hold_ms: u32) {
    if let Some(last) = events.last_mut() {
        last.hold_ms = last.hold_ms.max(hold_ms);
    }
}
