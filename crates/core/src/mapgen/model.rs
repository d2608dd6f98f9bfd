//! Public data models for generated floors.

use crate::content::EnemyDef;
use crate::items::Item;
use crate::types::{Pos, TileKind};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Room {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

impl Room {
    pub fn right(self) -> usize {
        self.x + self.width - 1
    }

    pub fn bottom(self) -> usize {
        self.y + self.height - 1
    }

    pub fn center(self) -> Pos {
        Pos { x: (self.x + self.width / 2) as i32, y: (self.y + self.height / 2) as i32 }
    }

    pub fn expanded(self, margin: usize) -> Self {
        let x = self.x.saturating_sub(margin);
        let y = self.y.saturating_sub(margin);
        let right = self.right() + margin;
        let bottom = self.bottom() + margin;
        Self { x, y, width: right - x + 1, height: bottom - y + 1 }
    }

    pub fn intersects(self, other: &Self) -> bool {
        self.x <= other.right()
            && self.right() >= other.x
            && self.y <= other.bottom()
            && self.bottom() >= other.y
    }
}

#[derive(Debug, PartialEq)]
pub struct EnemySpawn {
    pub def: &'static EnemyDef,
    pub pos: Pos,
    pub hp: i32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LootSpawn {
    pub pos: Pos,
    pub item: Item,
}

#[derive(Debug, PartialEq)]
pub struct GeneratedFloor {
    pub width: usize,
    pub height: usize,
    pub tiles: Vec<TileKind>,
    pub rooms: Vec<Room>,
    pub player_spawn: Pos,
    pub stairs: Pos,
    pub enemy_spawns: Vec<EnemySpawn>,
    pub loot_spawns: Vec<LootSpawn>,
}
