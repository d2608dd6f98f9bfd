use serde::{Deserialize, Serialize};
use slotmap::new_key_type;

new_key_type! {
    pub struct EnemyId;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Pos {
    pub x: i32,
    pub y: i32,
}

impl Pos {
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self { x: self.x + dx, y: self.y + dy }
    }
}

pub fn manhattan(a: Pos, b: Pos) -> u32 {
    a.x.abs_diff(b.x) + a.y.abs_diff(b.y)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TileKind {
    Wall,
    Floor,
    Stairs,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ActorClass {
    Tracker,
    Warden,
    Channeler,
}

/// Movement disposition of an enemy. Hunter and ambush pursue once alerted;
/// patrol and turret never take a directed step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AiBehavior {
    Hunter,
    Patrol,
    Ambush,
    Turret,
}

/// Identifier for a scripted sequence played on floor entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CutsceneId {
    Descent,
}

/// Render tint carried by visual-swap and flash events so the renderer can
/// color them per party member without a state lookup.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Tint(pub u32);
