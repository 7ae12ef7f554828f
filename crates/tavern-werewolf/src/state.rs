use serde::{Deserialize, Serialize};
use tavern_types::{GamePhase, PhaseEvent, Result, TavernError};

use crate::names::seat_name;
use crate::role::{Role, Team};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Seat {
    pub name: String,
    pub role: Role,
    pub alive: bool,
}

/// Everything the moderator knows about a werewolf game in progress.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    seats: Vec<Seat>,
    /// Witch still holds the healing potion.
    pub healing: bool,
    /// Witch still holds the poison.
    pub poison: bool,
    pub round: u32,
    phase: GamePhase,
}

impl GameState {
    /// Seat players `Player1..PlayerN` in lineup order.
    pub fn new(lineup: &[Role]) -> Self {
        let seats = lineup
            .iter()
            .enumerate()
            .map(|(i, role)| Seat {
                name: seat_name(i),
                role: *role,
                alive: true,
            })
            .collect();
        Self {
            seats,
            healing: true,
            poison: true,
            round: 0,
            phase: GamePhase::Setup,
        }
    }

    pub fn seats(&self) -> &[Seat] {
        &self.seats
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn advance(&mut self, event: PhaseEvent) -> Result<GamePhase> {
        let next = self.phase.transition(event)?;
        tracing::debug!(from = ?self.phase, to = ?next, "Phase transition");
        if event == PhaseEvent::NightFalls {
            self.round += 1;
        }
        self.phase = next;
        Ok(next)
    }

    pub fn seat(&self, name: &str) -> Option<&Seat> {
        self.seats.iter().find(|s| s.name == name)
    }

    pub fn role_of(&self, name: &str) -> Result<Role> {
        self.seat(name)
            .map(|s| s.role)
            .ok_or_else(|| TavernError::PlayerNotFound(name.to_string()))
    }

    pub fn is_alive(&self, name: &str) -> bool {
        self.seat(name).is_some_and(|s| s.alive)
    }

    pub fn alive_names(&self) -> Vec<String> {
        self.seats
            .iter()
            .filter(|s| s.alive)
            .map(|s| s.name.clone())
            .collect()
    }

    pub fn alive_with_role(&self, role: Role) -> Vec<String> {
        self.seats
            .iter()
            .filter(|s| s.alive && s.role == role)
            .map(|s| s.name.clone())
            .collect()
    }

    pub fn wolves_alive(&self) -> Vec<String> {
        self.alive_with_role(Role::Werewolf)
    }

    /// Mark players dead. Unknown, empty and already-dead names are ignored.
    /// Returns the players who died.
    pub fn eliminate<S: AsRef<str>>(&mut self, names: &[S]) -> Vec<String> {
        let mut died = Vec::new();
        for name in names.iter().map(AsRef::as_ref) {
            if let Some(seat) = self.seats.iter_mut().find(|s| s.alive && s.name == name) {
                seat.alive = false;
                tracing::info!(player = %seat.name, role = %seat.role, "Player eliminated");
                died.push(seat.name.clone());
            }
        }
        died
    }

    /// Werewolves win once they are at least half of the living;
    /// villagers win once no werewolf is left.
    pub fn winner(&self) -> Option<Team> {
        let alive = self.seats.iter().filter(|s| s.alive).count();
        let wolves = self.wolves_alive().len();
        if wolves * 2 >= alive {
            Some(Team::Werewolves)
        } else if wolves == 0 {
            Some(Team::Villagers)
        } else {
            None
        }
    }
}
