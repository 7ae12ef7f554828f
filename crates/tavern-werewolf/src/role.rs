use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Werewolf,
    Villager,
    Seer,
    Witch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Team {
    Werewolves,
    Villagers,
}

impl Role {
    pub fn team(self) -> Team {
        match self {
            Role::Werewolf => Team::Werewolves,
            Role::Villager | Role::Seer | Role::Witch => Team::Villagers,
        }
    }

    /// Six seats: two werewolves, two villagers, a seer and a witch.
    pub fn default_lineup() -> Vec<Role> {
        vec![
            Role::Werewolf,
            Role::Werewolf,
            Role::Villager,
            Role::Villager,
            Role::Seer,
            Role::Witch,
        ]
    }

    /// What the seer learns about a player with this role.
    pub fn seer_label(self) -> &'static str {
        match self.team() {
            Team::Werewolves => "werewolf",
            Team::Villagers => "villager",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Role::Werewolf => "werewolf",
            Role::Villager => "villager",
            Role::Seer => "seer",
            Role::Witch => "witch",
        };
        f.pad(s)
    }
}
