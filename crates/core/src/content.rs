//! Hardcoded content tables: classes, skills, bestiary, loot, floor configs.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::cutscene::CutsceneStep;
use crate::types::{ActorClass, AiBehavior, CutsceneId, Tint};

pub mod keys {
    pub const SKILL_TWIN_BOLT: &str = "skill_twin_bolt";
    pub const SKILL_LONGSHOT: &str = "skill_longshot";
    pub const SKILL_SHOCKWAVE: &str = "skill_shockwave";
    pub const SKILL_SIPHON: &str = "skill_siphon";
    pub const SKILL_OVERLOAD: &str = "skill_overload";
}

/// How a skill converts the caster's stats into a base damage figure.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SkillPower {
    /// Flat damage regardless of the caster's attack.
    Fixed(i32),
    /// `floor(derived_attack * multiplier)`.
    Scaled(f64),
}

/// Targeting policy. Range is Manhattan distance, strictly less than the
/// skill's `range`; for `AllEnemies` the range is advisory only.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkillTargeting {
    /// First enemy in range takes the full hit.
    Target,
    /// Every enemy on the floor takes the hit.
    AllEnemies,
    /// Re-rolls a random in-range target for each of `hits` hits.
    MultiHit { hits: u32 },
    /// Single target; the caster heals by the damage dealt.
    Drain,
}

pub struct SkillDef {
    pub id: &'static str,
    pub name: &'static str,
    pub cost: i32,
    pub range: u32,
    pub power: SkillPower,
    pub targeting: SkillTargeting,
}

pub struct ClassDef {
    pub class: ActorClass,
    pub name: &'static str,
    pub hp: i32,
    pub attack: i32,
    pub defense: i32,
    pub pe: i32,
    pub tint: Tint,
    pub skills: &'static [&'static str],
}

#[derive(Debug, PartialEq, Eq)]
pub struct EnemyDef {
    pub name: &'static str,
    pub attack: i32,
    pub exp: i32,
    pub behavior: AiBehavior,
    /// Hits from this enemy inflict the poison status.
    pub poisons: bool,
    pub tint: Tint,
}

pub struct WeaponBase {
    pub name: &'static str,
    pub base_attack: i32,
}

pub struct WeaponPrefix {
    pub name: &'static str,
    pub attack_mod: i32,
}

pub struct ArmorBase {
    pub name: &'static str,
    pub base_defense: i32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConsumableEffect {
    Heal(i32),
    RestorePe(i32),
    CureStatus,
}

pub struct ConsumableBase {
    pub name: &'static str,
    pub effect: ConsumableEffect,
}

/// Per-floor generation parameters. Unlisted floors fall back to
/// [`FloorTable::default_config`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FloorConfig {
    pub width: usize,
    pub height: usize,
    pub rooms: usize,
    pub enemies: usize,
    pub loot: usize,
    pub cutscene: Option<CutsceneId>,
    /// Renderer hold after an enemy death on this floor, in milliseconds.
    #[serde(default = "default_kill_hold_ms")]
    pub kill_hold_ms: u32,
}

fn default_kill_hold_ms() -> u32 {
    300
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FloorTable {
    pub floors: BTreeMap<u32, FloorConfig>,
    pub fallback: FloorConfig,
}

impl FloorTable {
    pub fn config(&self, floor: u32) -> &FloorConfig {
        self.floors.get(&floor).unwrap_or(&self.fallback)
    }
}

impl Default for FloorTable {
    fn default() -> Self {
        let mut floors = BTreeMap::new();
        floors.insert(
            1,
            FloorConfig {
                width: 30,
                height: 30,
                rooms: 12,
                enemies: 6,
                loot: 5,
                cutscene: Some(CutsceneId::Descent),
                kill_hold_ms: default_kill_hold_ms(),
            },
        );
        floors.insert(
            2,
            FloorConfig {
                width: 40,
                height: 40,
                rooms: 15,
                enemies: 10,
                loot: 8,
                cutscene: None,
                kill_hold_ms: default_kill_hold_ms(),
            },
        );
        floors.insert(
            3,
            FloorConfig {
                width: 50,
                height: 50,
                rooms: 20,
                enemies: 15,
                loot: 12,
                cutscene: None,
                kill_hold_ms: default_kill_hold_ms(),
            },
        );
        let fallback = FloorConfig {
            width: 60,
            height: 60,
            rooms: 25,
            enemies: 20,
            loot: 15,
            cutscene: None,
            kill_hold_ms: default_kill_hold_ms(),
        };
        Self { floors, fallback }
    }
}

pub const CLASSES: [ClassDef; 3] = [
    ClassDef {
        class: ActorClass::Tracker,
        name: "Senna",
        hp: 45,
        attack: 4,
        defense: 2,
        pe: 40,
        tint: Tint(0x00ffff_44),
        skills: &[keys::SKILL_TWIN_BOLT, keys::SKILL_LONGSHOT],
    },
    ClassDef {
        class: ActorClass::Warden,
        name: "Aldric",
        hp: 70,
        attack: 3,
        defense: 4,
        pe: 20,
        tint: Tint(0x0066ff_44),
        skills: &[keys::SKILL_SHOCKWAVE],
    },
    ClassDef {
        class: ActorClass::Channeler,
        name: "Mire",
        hp: 35,
        attack: 6,
        defense: 1,
        pe: 80,
        tint: Tint(0xff0044_44),
        skills: &[keys::SKILL_SIPHON, keys::SKILL_OVERLOAD],
    },
];

pub const SKILLS: [SkillDef; 5] = [
    SkillDef {
        id: keys::SKILL_TWIN_BOLT,
        name: "Twin Bolt",
        cost: 10,
        range: 6,
        power: SkillPower::Scaled(1.2),
        targeting: SkillTargeting::MultiHit { hits: 2 },
    },
    SkillDef {
        id: keys::SKILL_LONGSHOT,
        name: "Longshot",
        cost: 15,
        range: 8,
        power: SkillPower::Scaled(3.0),
        targeting: SkillTargeting::Target,
    },
    SkillDef {
        id: keys::SKILL_SHOCKWAVE,
        name: "Shockwave",
        cost: 15,
        range: 100,
        power: SkillPower::Fixed(15),
        targeting: SkillTargeting::AllEnemies,
    },
    SkillDef {
        id: keys::SKILL_SIPHON,
        name: "Siphon",
        cost: 10,
        range: 2,
        power: SkillPower::Fixed(10),
        targeting: SkillTargeting::Drain,
    },
    SkillDef {
        id: keys::SKILL_OVERLOAD,
        name: "Overload",
        cost: 60,
        range: 100,
        power: SkillPower::Fixed(60),
        targeting: SkillTargeting::AllEnemies,
    },
];

pub fn skill(id: &str) -> Option<&'static SkillDef> {
    SKILLS.iter().find(|skill| skill.id == id)
}

pub fn class(class: ActorClass) -> &'static ClassDef {
    CLASSES.iter().find(|def| def.class == class).expect("every class has a definition")
}

pub const BESTIARY: [EnemyDef; 5] = [
    EnemyDef {
        name: "Gnawer",
        attack: 3,
        exp: 5,
        behavior: AiBehavior::Hunter,
        poisons: false,
        tint: Tint(0x885544_00),
    },
    EnemyDef {
        name: "Shambler",
        attack: 5,
        exp: 12,
        behavior: AiBehavior::Patrol,
        poisons: false,
        tint: Tint(0x00ff44_00),
    },
    EnemyDef {
        name: "Lurker",
        attack: 8,
        exp: 25,
        behavior: AiBehavior::Ambush,
        poisons: true,
        tint: Tint(0xff4400_00),
    },
    EnemyDef {
        name: "Sentry",
        attack: 12,
        exp: 15,
        behavior: AiBehavior::Turret,
        poisons: false,
        tint: Tint(0xaa00ff_00),
    },
    EnemyDef {
        name: "Husk",
        attack: 6,
        exp: 20,
        behavior: AiBehavior::Hunter,
        poisons: true,
        tint: Tint(0x880000_00),
    },
];

pub const WEAPON_PREFIXES: [WeaponPrefix; 7] = [
    WeaponPrefix { name: "Rusted", attack_mod: -1 },
    WeaponPrefix { name: "Plain", attack_mod: 0 },
    WeaponPrefix { name: "Honed", attack_mod: 1 },
    WeaponPrefix { name: "Brutal", attack_mod: 3 },
    WeaponPrefix { name: "Venom", attack_mod: 2 },
    WeaponPrefix { name: "Ancient", attack_mod: 5 },
    WeaponPrefix { name: "Runed", attack_mod: 2 },
];

pub const WEAPON_BASES: [WeaponBase; 5] = [
    WeaponBase { name: "Shortbow", base_attack: 4 },
    WeaponBase { name: "Cudgel", base_attack: 3 },
    WeaponBase { name: "Greataxe", base_attack: 8 },
    WeaponBase { name: "Sabre", base_attack: 6 },
    WeaponBase { name: "Dirk", base_attack: 5 },
];

pub const ARMOR_BASES: [ArmorBase; 4] = [
    ArmorBase { name: "Padded Jerkin", base_defense: 2 },
    ArmorBase { name: "Chain Shirt", base_defense: 5 },
    ArmorBase { name: "Scale Coat", base_defense: 8 },
    ArmorBase { name: "Leathers", base_defense: 6 },
];

pub const CONSUMABLES: [ConsumableBase; 4] = [
    ConsumableBase { name: "Salve", effect: ConsumableEffect::Heal(30) },
    ConsumableBase { name: "Elixir", effect: ConsumableEffect::Heal(60) },
    ConsumableBase { name: "Ember Draught", effect: ConsumableEffect::RestorePe(20) },
    ConsumableBase { name: "Purgative", effect: ConsumableEffect::CureStatus },
];

pub fn cutscene_script(id: CutsceneId) -> &'static [CutsceneStep] {
    match id {
        CutsceneId::Descent => &[
            CutsceneStep::Wait { ms: 500 },
            CutsceneStep::Log { text: "The undercroft swallows the lantern light." },
            CutsceneStep::Wait { ms: 1000 },
            CutsceneStep::Dialog { speaker: "SENNA", text: "Tracks everywhere. None of them human." },
            CutsceneStep::Dialog { speaker: "ALDRIC", text: "Stay behind the shield arm." },
            CutsceneStep::Dialog { speaker: "MIRE", text: "Something down here is still singing." },
            CutsceneStep::Log { text: "The descent begins." },
        ],
    }
}
