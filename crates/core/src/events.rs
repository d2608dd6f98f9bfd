//! Presentation events emitted by the turn engine.
//!
//! The simulation never sleeps: every pacing decision the renderer must honor
//! is carried as a `hold_ms` annotation on the event itself. The renderer
//! consumes events strictly in order and waits `hold_ms` after each one
//! before processing the next.

use crate::types::{CutsceneId, EnemyId, Pos, Tint};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EventKind {
    /// Active actor lunges at the target cell.
    Attack { target: Pos },
    /// An enemy strikes the party's shared position.
    EnemyAttack { enemy: EnemyId, target: Pos },
    /// Party point-man swap: the shared marker slides to `to` and recolors
    /// to the next-active member's tint.
    Move { from: Pos, to: Pos, next_tint: Tint },
    DamageNumber { amount: i32, at: Pos },
    HealNumber { amount: i32, at: Pos },
    HitEffect { enemy: Option<EnemyId> },
    Death { enemy: EnemyId },
    ItemPickup { at: Pos },
    LootSync,
    EnemyPositionSync,
    RosterSync,
    UiRefresh,
    Flash { tint: Tint },
    Projectile { from: Pos, to: Pos, tint: Tint },
    ScreenShake,
    Ascend,
    FloorSetup { floor: u32, cutscene: Option<CutsceneId> },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PresentationEvent {
    pub kind: EventKind,
    /// Delay the renderer honors after this event, in milliseconds.
    pub hold_ms: u32,
}

impl EventKind {
    pub fn immediate(self) -> PresentationEvent {
        PresentationEvent { kind: self, hold_ms: 0 }
    }

    pub fn paced(self, hold_ms: u32) -> PresentationEvent {
        PresentationEvent { kind: self, hold_ms }
    }
}
