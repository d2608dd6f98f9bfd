use slotmap::SlotMap;

use crate::content::{FloorTable, keys};
use crate::cutscene::CutsceneStep;
use crate::events::EventKind;
use crate::items::Item;
use crate::state::{Enemy, Floor, LootDrop, Map, StatusEffect, StatusTrait};
use crate::types::{AiBehavior, EnemyId, Pos, TileKind, Tint};

use super::*;

fn open_map(width: usize, height: usize) -> Map {
    let mut tiles = vec![TileKind::Floor; width * height];
    for x in 0..width {
        tiles[x] = TileKind::Wall;
        tiles[(height - 1) * width + x] = TileKind::Wall;
    }
    for y in 0..height {
        tiles[y * width] = TileKind::Wall;
        tiles[y * width + width - 1] = TileKind::Wall;
    }
    Map { width, height, tiles }
}

/// Engine over a handcrafted empty floor; no cutscene is running.
fn test_engine() -> Engine {
    test_engine_with(FloorTable::default())
}

fn test_engine_with(floor_table: FloorTable) -> Engine {
    let mut engine = Engine::new(7, floor_table);
    engine.floor = Floor {
        index: 1,
        map: open_map(20, 20),
        enemies: SlotMap::with_key(),
        loot: Vec::new(),
        player_pos: Pos { x: 2, y: 2 },
        stairs: Pos { x: 18, y: 18 },
    };
    engine
}

fn add_enemy(engine: &mut Engine, pos: Pos, hp: i32, behavior: AiBehavior) -> EnemyId {
    let id = engine.floor.enemies.insert(Enemy {
        id: EnemyId::default(),
        name: "Gnawer",
        pos,
        hp,
        max_hp: hp,
        attack: 3,
        defense: 0,
        behavior,
        alerted: false,
        poisons: false,
        exp_reward: 5,
        tint: Tint(0),
        statuses: Vec::new(),
    });
    engine.floor.enemies[id].id = id;
    id
}

#[test]
fn wall_step_is_a_noop_that_consumes_no_turn() {
    let mut engine = test_engine();
    engine.floor.player_pos = Pos { x: 1, y: 1 };

    let events = engine.process_turn(-1, 0);

    assert!(events.is_empty());
    assert_eq!(engine.turn_count(), 0);
    assert_eq!(engine.party().active().name, "Senna", "rotation must not advance");
}

#[test]
fn diagonal_and_zero_deltas_are_rejected() {
    let mut engine = test_engine();
    assert!(engine.process_turn(1, 1).is_empty());
    assert!(engine.process_turn(0, 0).is_empty());
    assert!(engine.process_turn(2, 0).is_empty());
    assert_eq!(engine.turn_count(), 0);
}

#[test]
fn open_step_moves_rotates_and_regenerates_focus() {
    let mut engine = test_engine();

    let events = engine.process_turn(1, 0);

    assert_eq!(engine.floor().player_pos, Pos { x: 3, y: 2 });
    assert!(matches!(events[0].kind, EventKind::Move { .. }));
    assert_eq!(engine.turn_count(), 1);
    // Senna stepped; Aldric is now on point and regenerated 2 focus.
    assert_eq!(engine.party().active().name, "Aldric");
    assert_eq!(engine.party().active().pe, 22);
}

#[test]
fn melee_emits_attack_damage_and_hit_in_order() {
    let mut engine = test_engine();
    let target = Pos { x: 3, y: 2 };
    let id = add_enemy(&mut engine, target, 100, AiBehavior::Turret);

    let events = engine.process_turn(1, 0);

    assert_eq!(events[0], EventKind::Attack { target }.paced(MELEE_HOLD_MS));
    assert!(matches!(events[1].kind, EventKind::DamageNumber { at, .. } if at == target));
    assert_eq!(events[2], EventKind::HitEffect { enemy: Some(id) }.paced(HIT_HOLD_MS));
    // Senna with her starter bow: floor(12 * [0.8, 1.2)).
    let hp = engine.floor().enemies[id].hp;
    assert!((100 - 14..=100 - 9).contains(&hp), "unexpected remaining hp {hp}");
    assert_eq!(engine.floor().player_pos, Pos { x: 2, y: 2 }, "attacking is not moving");
}

#[test]
fn killing_blow_removes_the_enemy_and_pays_exp_once() {
    let mut engine = test_engine();
    let id = add_enemy(&mut engine, Pos { x: 3, y: 2 }, 1, AiBehavior::Turret);

    let events = engine.process_turn(1, 0);

    assert!(engine.floor().enemies.get(id).is_none());
    assert!(events.iter().any(|event| event.kind == EventKind::Death { enemy: id }));
    assert_eq!(engine.party().members[0].exp, 5);
    assert_eq!(engine.party().members[1].exp, 2);
}

#[test]
fn kill_pause_is_sourced_from_the_floor_config() {
    let mut table = FloorTable::default();
    if let Some(config) = table.floors.get_mut(&1) {
        config.kill_hold_ms = 450;
    }
    let mut engine = test_engine_with(table);
    let id = add_enemy(&mut engine, Pos { x: 3, y: 2 }, 1, AiBehavior::Turret);

    let events = engine.process_turn(1, 0);

    let death = events
        .iter()
        .find(|event| event.kind == EventKind::Death { enemy: id })
        .expect("killing blow");
    assert_eq!(death.hold_ms, 450);
}

#[test]
fn kill_is_idempotent_for_a_stale_id() {
    let mut engine = test_engine();
    let id = add_enemy(&mut engine, Pos { x: 5, y: 5 }, 1, AiBehavior::Turret);

    let mut events = Vec::new();
    engine.kill_enemy(id, &mut events);
    engine.kill_enemy(id, &mut events);

    let deaths =
        events.iter().filter(|event| event.kind == EventKind::Death { enemy: id }).count();
    assert_eq!(deaths, 1);
    assert_eq!(engine.party().members[0].exp, 5, "experience must not pay out twice");
}

#[test]
fn restricted_actor_loses_the_turn_but_the_turn_still_passes() {
    let mut engine = test_engine();
    engine.party.active_mut().statuses.push(StatusEffect {
        name: "Snare",
        remaining: 2,
        effect: StatusTrait::Restrict,
    });

    let events = engine.process_turn(1, 0);

    assert_eq!(engine.floor().player_pos, Pos { x: 2, y: 2 });
    assert!(!events.iter().any(|event| matches!(event.kind, EventKind::Move { .. })));
    assert_eq!(engine.turn_count(), 1);
    assert!(engine.log()[0].contains("strains"));
}

#[test]
fn alert_radius_boundary_is_strictly_under_seven() {
    let mut engine = test_engine();
    let player = engine.floor.player_pos;
    let at_6 = add_enemy(&mut engine, player.offset(6, 0), 10, AiBehavior::Patrol);
    let at_7 = add_enemy(&mut engine, player.offset(7, 0), 10, AiBehavior::Patrol);
    let at_8 = add_enemy(&mut engine, player.offset(0, 8), 10, AiBehavior::Patrol);

    let mut events = Vec::new();
    ai::enemy_phase(&mut engine, &mut events);

    assert!(engine.floor().enemies[at_6].alerted);
    assert!(!engine.floor().enemies[at_7].alerted);
    assert!(!engine.floor().enemies[at_8].alerted);
}

#[test]
fn alerted_hunter_closes_one_cardinal_step() {
    let mut engine = test_engine();
    let id = add_enemy(&mut engine, Pos { x: 6, y: 2 }, 10, AiBehavior::Hunter);

    let mut events = Vec::new();
    ai::enemy_phase(&mut engine, &mut events);

    assert_eq!(engine.floor().enemies[id].pos, Pos { x: 5, y: 2 });
    assert_eq!(events.last().unwrap().kind, EventKind::EnemyPositionSync);
}

#[test]
fn adjacent_patrol_attacks_the_active_member() {
    let mut engine = test_engine();
    let id = add_enemy(&mut engine, Pos { x: 2, y: 3 }, 10, AiBehavior::Patrol);

    let hp_before = engine.party().active().hp;
    let mut events = Vec::new();
    ai::enemy_phase(&mut engine, &mut events);

    assert!(engine.party().active().hp < hp_before);
    assert!(events.iter().any(|event| matches!(
        event.kind,
        EventKind::EnemyAttack { enemy, .. } if enemy == id
    )));
}

#[test]
fn point_man_felled_in_the_enemy_phase_never_acts() {
    let mut engine = test_engine();
    let id = add_enemy(&mut engine, Pos { x: 3, y: 3 }, 50, AiBehavior::Turret);
    engine.floor.enemies[id].attack = 100;

    // Senna steps to (3,2); the turret one-shots the rotated-in Aldric.
    engine.process_turn(1, 0);

    assert!(engine.party().members[1].is_dead(), "the turret must fell the new point man");
    assert_eq!(engine.party().active().name, "Mire", "a corpse must not hold the rotation");

    let hp_before = engine.floor().enemies[id].hp;
    engine.process_turn(0, 1);
    assert!(engine.floor().enemies[id].hp < hp_before, "the living member melees in his stead");
}

#[test]
fn venomous_enemies_poison_on_hit_without_stacking() {
    let mut engine = test_engine();
    let id = add_enemy(&mut engine, Pos { x: 2, y: 3 }, 10, AiBehavior::Patrol);
    engine.floor.enemies[id].poisons = true;

    let mut events = Vec::new();
    ai::enemy_phase(&mut engine, &mut events);

    assert!(state::is_poisoned(&engine.party().active().statuses));
    assert!(engine.log().iter().any(|line| line.contains("poisoned")));

    ai::enemy_phase(&mut engine, &mut events);
    let afflictions = engine
        .party()
        .active()
        .statuses
        .iter()
        .filter(|status| status.effect == StatusTrait::Poison)
        .count();
    assert_eq!(afflictions, 1, "a second bite must not stack the poison");
}

#[test]
fn poison_bites_each_turn_and_expires() {
    let mut engine = test_engine();
    engine.party.members[1].statuses.push(StatusEffect {
        name: "Poison",
        remaining: 2,
        effect: StatusTrait::Poison,
    });

    // Aldric at 70 max hp loses 5% per tick.
    engine.process_turn(1, 0);
    assert_eq!(engine.party().members[1].hp, 70 - 3);
    engine.process_turn(-1, 0);
    assert_eq!(engine.party().members[1].hp, 70 - 6);
    engine.process_turn(1, 0);
    assert_eq!(engine.party().members[1].hp, 70 - 6, "expired poison must stop biting");
    assert!(engine.party().members[1].statuses.is_empty());
}

#[test]
fn poison_can_fell_a_member_and_frees_the_rotation() {
    let mut engine = test_engine();
    engine.party.members[1].hp = 2;
    engine.party.members[1].statuses.push(StatusEffect {
        name: "Poison",
        remaining: 3,
        effect: StatusTrait::Poison,
    });

    engine.process_turn(1, 0);

    assert!(engine.party().members[1].is_dead());
    assert!(engine.log().iter().any(|line| line.contains("succumbs to the poison")));
    assert_eq!(engine.party().active().name, "Mire");
}

#[test]
fn hunters_do_not_stack_onto_an_occupied_cell() {
    let mut engine = test_engine();
    // Adjacent hunter attacks in place, so its cell stays occupied.
    add_enemy(&mut engine, Pos { x: 3, y: 2 }, 10, AiBehavior::Hunter);
    let blocked = add_enemy(&mut engine, Pos { x: 4, y: 2 }, 10, AiBehavior::Hunter);

    let mut events = Vec::new();
    ai::enemy_phase(&mut engine, &mut events);

    assert_eq!(engine.floor().enemies[blocked].pos, Pos { x: 4, y: 2 });
}

#[test]
fn insufficient_focus_is_a_log_only_noop() {
    let mut engine = test_engine();
    let id = add_enemy(&mut engine, Pos { x: 4, y: 2 }, 10, AiBehavior::Turret);
    engine.party.active_mut().pe = 10;

    // Longshot costs 15.
    let events = engine.execute_skill(keys::SKILL_LONGSHOT);

    assert!(events.is_empty());
    assert_eq!(engine.party().active().pe, 10, "focus must not be deducted");
    assert_eq!(engine.floor().enemies[id].hp, 10);
    assert!(engine.log()[0].contains("lacks the focus"));
}

#[test]
fn unknown_or_unlearned_skills_are_rejected() {
    let mut engine = test_engine();
    assert!(engine.execute_skill("skill_nonexistent").is_empty());
    // Shockwave belongs to Aldric, not the currently active Senna.
    assert!(engine.execute_skill(keys::SKILL_SHOCKWAVE).is_empty());
}

#[test]
fn targeted_skill_hits_the_first_enemy_in_range() {
    let mut engine = test_engine();
    let in_range = add_enemy(&mut engine, Pos { x: 6, y: 2 }, 100, AiBehavior::Turret);
    let out_of_range = add_enemy(&mut engine, Pos { x: 12, y: 2 }, 100, AiBehavior::Turret);

    let events = engine.execute_skill(keys::SKILL_LONGSHOT);

    assert_eq!(events[0], EventKind::Flash { tint: engine.party().active().tint }.paced(FLASH_HOLD_MS));
    assert!(engine.floor().enemies[in_range].hp < 100);
    assert_eq!(engine.floor().enemies[out_of_range].hp, 100);
    assert_eq!(events.last().unwrap().kind, EventKind::UiRefresh);
    let tail_hold = events[events.len() - 2].hold_ms;
    assert!(tail_hold >= SKILL_TAIL_HOLD_MS, "skill batch must pause before the refresh");
}

#[test]
fn skill_hits_ignore_armor_and_land_at_full_power() {
    let mut engine = test_engine();
    engine.party.rotate(); // Aldric knows Shockwave.
    let id = add_enemy(&mut engine, Pos { x: 6, y: 2 }, 100, AiBehavior::Turret);
    engine.floor.enemies[id].defense = 40;

    engine.execute_skill(keys::SKILL_SHOCKWAVE);

    // Shockwave carries a fixed power of 15; the target takes the full hit.
    assert_eq!(engine.floor().enemies[id].hp, 100 - 15);
}

#[test]
fn skill_with_no_target_spends_focus_and_reports_nothing() {
    let mut engine = test_engine();
    let pe_before = engine.party().active().pe;

    let events = engine.execute_skill(keys::SKILL_LONGSHOT);

    assert_eq!(engine.party().active().pe, pe_before - 15);
    assert!(engine.log()[0].contains("nothing stirs"));
    assert!(!events.iter().any(|event| matches!(event.kind, EventKind::DamageNumber { .. })));
}

#[test]
fn all_enemies_skill_shakes_the_screen_and_hits_everyone() {
    let mut engine = test_engine();
    engine.party.rotate(); // Aldric knows Shockwave.
    let near = add_enemy(&mut engine, Pos { x: 4, y: 2 }, 100, AiBehavior::Turret);
    let far = add_enemy(&mut engine, Pos { x: 18, y: 17 }, 100, AiBehavior::Turret);

    let events = engine.execute_skill(keys::SKILL_SHOCKWAVE);

    assert!(events.iter().any(|event| event.kind == EventKind::ScreenShake));
    assert!(engine.floor().enemies[near].hp < 100);
    assert!(engine.floor().enemies[far].hp < 100, "range is advisory for floor-wide skills");
}

#[test]
fn drain_heals_the_caster_by_the_damage_dealt() {
    let mut engine = test_engine();
    engine.party.rotate();
    engine.party.rotate(); // Mire knows Siphon.
    engine.party.active_mut().hp = 10;
    add_enemy(&mut engine, Pos { x: 3, y: 2 }, 100, AiBehavior::Turret);

    let events = engine.execute_skill(keys::SKILL_SIPHON);

    let healed = events.iter().find_map(|event| match event.kind {
        EventKind::HealNumber { amount, .. } => Some(amount),
        _ => None,
    });
    let healed = healed.expect("drain must emit a heal number");
    assert_eq!(healed, 10, "siphon drains exactly its fixed power");
    assert_eq!(engine.party().active().hp, 10 + healed);
}

#[test]
fn multi_hit_skill_stops_when_no_target_remains_in_range() {
    let mut engine = test_engine();
    let events = engine.execute_skill(keys::SKILL_TWIN_BOLT);
    assert!(!events.iter().any(|event| matches!(event.kind, EventKind::DamageNumber { .. })));
}

#[test]
fn stepping_onto_the_stairs_supersedes_the_turn() {
    let mut engine = test_engine();
    engine.floor.player_pos = Pos { x: 18, y: 17 };

    let events = engine.process_turn(0, 1);

    assert_eq!(events.len(), 2);
    assert_eq!(events[0], EventKind::Ascend.paced(ASCEND_HOLD_MS));
    assert_eq!(events[1], EventKind::FloorSetup { floor: 2, cutscene: None }.immediate());
    assert_eq!(engine.floor().index, 2);
}

#[test]
fn loot_pickup_moves_the_drop_into_the_inventory() {
    let mut engine = test_engine();
    let dest = Pos { x: 3, y: 2 };
    engine.floor.loot.push(LootDrop {
        pos: dest,
        item: Item::Weapon { name: "Sabre".into(), attack: 6 },
    });

    let events = engine.process_turn(1, 0);

    assert!(engine.floor().loot.is_empty());
    assert_eq!(engine.party().inventory.len(), 1);
    assert!(events.iter().any(|event| event.kind == EventKind::ItemPickup { at: dest }));
    assert!(engine.log().iter().any(|line| line.contains("Picked up Sabre")));
}

#[test]
fn full_pack_leaves_the_drop_on_the_floor() {
    let mut engine = test_engine();
    for _ in 0..crate::party::INVENTORY_CAPACITY {
        engine
            .party
            .gain_item(Item::Armor { name: "Leathers".into(), defense: 6 })
            .expect("filling under capacity");
    }
    let dest = Pos { x: 3, y: 2 };
    engine.floor.loot.push(LootDrop {
        pos: dest,
        item: Item::Weapon { name: "Sabre".into(), attack: 6 },
    });

    engine.process_turn(1, 0);

    assert_eq!(engine.floor().loot.len(), 1, "the drop must survive the failed pickup");
    assert!(engine.log().iter().any(|line| line.contains("pack is full")));
}

#[test]
fn cutscene_blocks_input_until_fully_played_out() {
    let mut engine = Engine::new(7, FloorTable::default());
    let events = engine.begin();
    assert!(matches!(events[0].kind, EventKind::FloorSetup { floor: 1, cutscene: Some(_) }));
    assert!(engine.is_input_blocked());
    assert!(engine.process_turn(1, 0).is_empty());

    let mut guard = 0;
    while engine.is_input_blocked() {
        match engine.poll_cutscene() {
            Some(CutsceneStep::Dialog { .. }) => engine.advance_cutscene_dialog(),
            Some(_) => {}
            None => {}
        }
        guard += 1;
        assert!(guard < 100, "cutscene must terminate");
    }
    assert!(!engine.is_input_blocked());
}

#[test]
fn cutscene_log_steps_land_in_the_message_log() {
    let mut engine = Engine::new(7, FloorTable::default());
    engine.begin();
    while engine.is_input_blocked() {
        if let Some(CutsceneStep::Dialog { .. }) = engine.poll_cutscene() {
            engine.advance_cutscene_dialog();
        }
    }
    assert!(engine.log().iter().any(|line| line.contains("descent begins")));
}

#[test]
fn renderer_backpressure_drops_intents() {
    let mut engine = test_engine();
    engine.set_renderer_idle(false);
    assert!(engine.process_turn(1, 0).is_empty());
    engine.set_renderer_idle(true);
    assert!(!engine.process_turn(1, 0).is_empty());
}

#[test]
fn party_wipe_fires_game_over_once_and_freezes_input() {
    let mut engine = test_engine();
    for member in &mut engine.party.members {
        member.hp = 0;
    }

    let events = engine.process_turn(1, 0);

    assert!(!events.is_empty());
    assert!(engine.log().iter().any(|line| line.contains("Darkness takes the party")));
    assert!(engine.is_input_blocked());
    assert!(engine.process_turn(1, 0).is_empty());
}

#[test]
fn using_an_item_refreshes_the_ui_without_consuming_the_turn() {
    let mut engine = test_engine();
    engine.party.active_mut().hp = 1;
    engine.party.inventory.push(Item::Consumable {
        name: "Salve".into(),
        effect: crate::content::ConsumableEffect::Heal(30),
    });

    let events = engine.use_item(0);

    assert_eq!(events, vec![EventKind::UiRefresh.immediate()]);
    assert_eq!(engine.turn_count(), 0);
    assert_eq!(engine.party().active().hp, 31);
}

#[test]
fn message_log_is_newest_first_and_capped() {
    let mut engine = test_engine();
    for n in 0..20 {
        engine.push_log(format!("line {n}"));
    }
    assert_eq!(engine.log().len(), MESSAGE_LOG_CAP);
    assert_eq!(engine.log()[0], "line 19");
}

#[test]
fn identical_seeds_replay_to_identical_snapshots() {
    let walk = [(1, 0), (0, 1), (1, 0), (1, 0), (0, -1), (-1, 0), (0, 1), (1, 0)];

    let mut a = Engine::new(0xC0FFEE, FloorTable::default());
    let mut b = Engine::new(0xC0FFEE, FloorTable::default());
    for (dx, dy) in walk {
        a.process_turn(dx, dy);
        b.process_turn(dx, dy);
    }
    assert_eq!(a.snapshot_hash(), b.snapshot_hash());

    let mut c = Engine::new(0xBEEF, FloorTable::default());
    for (dx, dy) in walk {
        c.process_turn(dx, dy);
    }
    assert_ne!(a.snapshot_hash(), c.snapshot_hash());
}
