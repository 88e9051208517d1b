pub mod list;
pub mod queue;

pub use list::WordList;
pub use queue::{WordQueue, PLACEHOLDER};
