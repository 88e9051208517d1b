// Library surface: the game core plus the runtime plumbing the binary drives it with.
// Rendering lives in the binary only.
pub mod app_dirs;
pub mod clock;
pub mod config;
pub mod engine;
pub mod error;
pub mod history;
pub mod logging;
pub mod rng;
pub mod roster;
pub mod runtime;
pub mod score;
pub mod words;

pub use engine::{GameSnapshot, Phase, RoundSummary, TurnEngine};
pub use error::Rejected;
pub use roster::Team;
