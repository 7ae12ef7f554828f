pub mod moderator;
pub mod names;
pub mod player;
pub mod prompts;
pub mod role;
pub mod state;
pub mod tally;

pub use moderator::*;
pub use names::*;
pub use player::*;
pub use role::*;
pub use state::*;
pub use tally::*;
