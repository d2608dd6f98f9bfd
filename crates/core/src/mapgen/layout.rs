//! Room placement and corridor carving.
//!
//! Rooms are sampled with rejection: one candidate per configured attempt,
//! discarded without retry when it would touch an existing room. Each
//! accepted room is immediately connected to the previous one with an
//! L-shaped corridor, so the walkable region is connected by construction.

use rand_chacha::ChaCha8Rng;

use crate::content::FloorConfig;
use crate::types::{Pos, TileKind};

use super::model::Room;
use super::seed::{rand_bool, rand_usize};

const MIN_ROOM_SIDE: usize = 4;
const MAX_ROOM_SIDE: usize = 8;

pub(super) struct Layout {
    pub(super) width: usize,
    pub(super) height: usize,
    pub(super) tiles: Vec<TileKind>,
    pub(super) rooms: Vec<Room>,
    pub(super) player_spawn: Pos,
    pub(super) stairs: Pos,
}

pub(super) fn build_layout(rng: &mut ChaCha8Rng, config: &FloorConfig) -> Layout {
    let width = config.width;
    let height = config.height;
    let mut tiles = vec![TileKind::Wall; width * height];
    let mut rooms: Vec<Room> = Vec::new();

    for _ in 0..config.rooms {
        let room_width = rand_usize(rng, MIN_ROOM_SIDE, MAX_ROOM_SIDE);
        let room_height = rand_usize(rng, MIN_ROOM_SIDE, MAX_ROOM_SIDE);
        if room_width + 2 >= width || room_height + 2 >= height {
            continue;
        }
        let x = rand_usize(rng, 1, width - room_width - 1);
        let y = rand_usize(rng, 1, height - room_height - 1);

        let candidate = Room { x, y, width: room_width, height: room_height };
        let candidate_with_margin = candidate.expanded(1);
        if rooms.iter().any(|existing| existing.expanded(1).intersects(&candidate_with_margin)) {
            continue;
        }

        carve_room(&mut tiles, width, &candidate);
        if let Some(previous) = rooms.last() {
            carve_l_corridor(
                &mut tiles,
                width,
                previous.center(),
                candidate.center(),
                rand_bool(rng),
            );
        }
        rooms.push(candidate);
    }

    if rooms.is_empty() {
        // Degenerate config. One carved cell keeps every downstream invariant.
        let fallback = Room {
            x: (width / 2).saturating_sub(1).max(1),
            y: (height / 2).saturating_sub(1).max(1),
            width: 1,
            height: 1,
        };
        carve_room(&mut tiles, width, &fallback);
        rooms.push(fallback);
    }

    let player_spawn = rooms[0].center();
    let stairs = rooms[rooms.len() - 1].center();
    tiles[stairs.y as usize * width + stairs.x as usize] = TileKind::Stairs;

    Layout { width, height, tiles, rooms, player_spawn, stairs }
}

fn carve_room(tiles: &mut [TileKind], width: usize, room: &Room) {
    for y in room.y..=room.bottom() {
        for x in room.x..=room.right() {
            tiles[y * width + x] = TileKind::Floor;
        }
    }
}

fn carve_l_corridor(
    tiles: &mut [TileKind],
    width: usize,
    start: Pos,
    end: Pos,
    horizontal_first: bool,
) {
    if horizontal_first {
        carve_horizontal(tiles, width, start.y, start.x, end.x);
        carve_vertical(tiles, width, end.x, start.y, end.y);
    } else {
        carve_vertical(tiles, width, start.x, start.y, end.y);
        carve_horizontal(tiles, width, end.y, start.x, end.x);
    }
}

fn carve_horizontal(tiles: &mut [TileKind], width: usize, y: i32, from_x: i32, to_x: i32) {
    for x in from_x.min(to_x)..=from_x.max(to_x) {
        tiles[y as usize * width + x as usize] = TileKind::Floor;
    }
}

fn carve_vertical(tiles: &mut [TileKind], width: usize, x: i32, from_y: i32, to_y: i32) {
    for y in from_y.min(to_y)..=from_y.max(to_y) {
        tiles[y as usize * width + x as usize] = TileKind::Floor;
    }
}
