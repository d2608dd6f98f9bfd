//! Linear cutscene playback boundary.
//!
//! A script is a strict sequence of steps. While a script is active the
//! engine treats input as blocked. The player never sleeps: `Wait` steps are
//! handed back to the caller, which owns the timer and polls again when the
//! delay has elapsed. `Dialog` steps park the queue until the caller reports
//! the external advance signal (a UI click).

use std::collections::VecDeque;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CutsceneStep {
    Wait { ms: u32 },
    Dialog { speaker: &'static str, text: &'static str },
    Log { text: &'static str },
}

#[derive(Debug, Default)]
pub struct CutscenePlayer {
    queue: VecDeque<CutsceneStep>,
    awaiting_dialog: bool,
    active: bool,
}

impl CutscenePlayer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn play(&mut self, script: &'static [CutsceneStep]) {
        self.queue = script.iter().copied().collect();
        self.awaiting_dialog = false;
        self.active = true;
    }

    /// True from `play` until the last step has been consumed and, for a
    /// trailing dialog, acknowledged.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Pops the next step in script order. Returns `None` while parked on an
    /// unacknowledged dialog, and `None` (deactivating) once the script is
    /// exhausted.
    pub fn poll(&mut self) -> Option<CutsceneStep> {
        if !self.active || self.awaiting_dialog {
            return None;
        }
        match self.queue.pop_front() {
            Some(step) => {
                if matches!(step, CutsceneStep::Dialog { .. }) {
                    self.awaiting_dialog = true;
                }
                Some(step)
            }
            None => {
                self.active = false;
                None
            }
        }
    }

    /// External advance signal for the dialog currently on screen.
    pub fn advance_dialog(&mut self) {
        self.awaiting_dialog = false;
        if self.queue.is_empty() {
            self.active = false;
        }
    }
}
