pub mod config;
pub mod quest;
pub mod tally;
pub mod werewolf;
