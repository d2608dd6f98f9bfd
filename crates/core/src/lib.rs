pub mod content;
pub mod cutscene;
pub mod engine;
pub mod events;
pub mod items;
pub mod mapgen;
pub mod party;
pub mod state;
pub mod types;

pub use content::{FloorConfig, FloorTable};
pub use cutscene::{CutscenePlayer, CutsceneStep};
pub use engine::Engine;
pub use events::{EventKind, PresentationEvent};
pub use items::Item;
pub use party::{Actor, Party};
pub use state::{Enemy, Floor, Map};
pub use types::*;
