use std::collections::VecDeque;

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tavern_types::Result;

use crate::names::mentioned_players;

/// A structured reply from a player. Fields a prompt did not ask for are left at their defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PlayerReply {
    #[serde(default)]
    pub thought: String,
    #[serde(default)]
    pub speak: String,
    /// Werewolves reached agreement during night discussion.
    #[serde(default)]
    pub agreement: bool,
    /// Witch uses the healing potion on tonight's victim.
    #[serde(default)]
    pub resurrect: bool,
    /// Witch uses the poison on the player named in `speak`.
    #[serde(default)]
    pub eliminate: bool,
}

impl PlayerReply {
    pub fn says(speak: impl Into<String>) -> Self {
        Self {
            speak: speak.into(),
            ..Self::default()
        }
    }

    pub fn from_value(value: Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }
}

/// A seat at the table, usually backed by a language model.
#[async_trait]
pub trait Player: Send {
    fn name(&self) -> &str;

    /// Answer a prompt addressed to this player.
    async fn speak(&mut self, prompt: &str) -> Result<PlayerReply>;

    /// Hear something said by the moderator or another player.
    async fn observe(&mut self, _announcement: &str) -> Result<()> {
        Ok(())
    }
}

/// Replays canned replies; stays silent once they run out.
#[derive(Debug, Clone)]
pub struct ScriptedPlayer {
    name: String,
    replies: VecDeque<PlayerReply>,
}

impl ScriptedPlayer {
    pub fn new(name: impl Into<String>, replies: impl IntoIterator<Item = PlayerReply>) -> Self {
        Self {
            name: name.into(),
            replies: replies.into_iter().collect(),
        }
    }

    pub fn silent(name: impl Into<String>) -> Self {
        Self::new(name, std::iter::empty())
    }
}

#[async_trait]
impl Player for ScriptedPlayer {
    fn name(&self) -> &str {
        &self.name
    }

    async fn speak(&mut self, _prompt: &str) -> Result<PlayerReply> {
        Ok(self.replies.pop_front().unwrap_or_default())
    }
}

/// Picks a random player mentioned in each prompt. Deterministic for a given seed.
#[derive(Debug, Clone)]
pub struct RandomPlayer {
    name: String,
    rng: StdRng,
}

impl RandomPlayer {
    pub fn new(name: impl Into<String>, seed: u64) -> Self {
        Self {
            name: name.into(),
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

#[async_trait]
impl Player for RandomPlayer {
    fn name(&self) -> &str {
        &self.name
    }

    async fn speak(&mut self, prompt: &str) -> Result<PlayerReply> {
        let candidates: Vec<String> = mentioned_players(prompt)
            .into_iter()
            .filter(|p| p != &self.name)
            .collect();
        let speak = candidates
            .choose(&mut self.rng)
            .map(|p| format!("I choose {p}."))
            .unwrap_or_default();
        Ok(PlayerReply {
            thought: String::new(),
            speak,
            agreement: true,
            resurrect: self.rng.gen_bool(0.5),
            eliminate: self.rng.gen_bool(0.3),
        })
    }
}
