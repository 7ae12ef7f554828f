use serde::{Deserialize, Serialize};
use tavern_types::{GamePhase, PhaseEvent, Result, TavernError};

use crate::names::extract_player;
use crate::player::{Player, PlayerReply};
use crate::prompts;
use crate::role::{Role, Team};
use crate::state::GameState;
use crate::tally::majority;

pub const MODERATOR: &str = "Moderator";

/// Game loop settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GameConfig {
    #[serde(default = "default_max_game_rounds")]
    pub max_game_rounds: u32,

    /// Werewolf discussion passes per night before voting.
    #[serde(default = "default_max_wolf_discussion_rounds")]
    pub max_wolf_discussion_rounds: u32,

    #[serde(default = "Role::default_lineup")]
    pub lineup: Vec<Role>,
}

fn default_max_game_rounds() -> u32 {
    6
}

fn default_max_wolf_discussion_rounds() -> u32 {
    3
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            max_game_rounds: default_max_game_rounds(),
            max_wolf_discussion_rounds: default_max_wolf_discussion_rounds(),
            lineup: Role::default_lineup(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cause {
    Werewolves,
    Poison,
    Vote,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Death {
    pub player: String,
    pub round: u32,
    pub cause: Cause,
}

/// Something said at the table and who heard it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Announcement {
    pub round: u32,
    pub speaker: String,
    pub audience: Vec<String>,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameOutcome {
    /// `None` when the round limit was reached first.
    pub winner: Option<Team>,
    pub rounds_played: u32,
    pub deaths: Vec<Death>,
}

/// Runs a werewolf game: night kills, witch and seer turns, daytime votes.
pub struct Moderator {
    config: GameConfig,
    state: GameState,
    players: Vec<Box<dyn Player>>,
    transcript: Vec<Announcement>,
    deaths: Vec<Death>,
}

impl Moderator {
    /// `players` must be seated in lineup order, named `Player1..PlayerN`.
    pub fn new(config: GameConfig, players: Vec<Box<dyn Player>>) -> Result<Self> {
        if players.len() != config.lineup.len() {
            return Err(TavernError::Config(format!(
                "lineup has {} seats but {} players joined",
                config.lineup.len(),
                players.len()
            )));
        }
        let state = GameState::new(&config.lineup);
        for (seat, player) in state.seats().iter().zip(&players) {
            if seat.name != player.name() {
                return Err(TavernError::Config(format!(
                    "seat {} is taken by player {}",
                    seat.name,
                    player.name()
                )));
            }
        }
        Ok(Self {
            config,
            state,
            players,
            transcript: Vec::new(),
            deaths: Vec::new(),
        })
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn transcript(&self) -> &[Announcement] {
        &self.transcript
    }

    pub async fn run(&mut self) -> Result<GameOutcome> {
        for _ in 0..self.config.max_game_rounds {
            let dead = self.night().await?;
            if let Some(winner) = self.dawn(dead).await? {
                return Ok(self.outcome(Some(winner)));
            }
            if let Some(winner) = self.day().await? {
                return Ok(self.outcome(Some(winner)));
            }
        }
        if self.state.phase() != GamePhase::Setup {
            self.state.advance(PhaseEvent::GameEnded)?;
        }
        tracing::info!(rounds = self.state.round, "Round limit reached without a winner");
        Ok(self.outcome(None))
    }

    async fn night(&mut self) -> Result<Vec<(String, Cause)>> {
        self.state.advance(PhaseEvent::NightFalls)?;
        tracing::info!(round = self.state.round, "Night falls");

        let wolves = self.state.wolves_alive();
        let hint = prompts::to_wolves(&wolves);
        self.broadcast(MODERATOR, &wolves, &hint).await?;

        let mut prompt = hint;
        for _ in 0..self.config.max_wolf_discussion_rounds {
            let mut last = PlayerReply::default();
            for wolf in &wolves {
                last = self.ask(wolf, &prompt).await?;
                self.broadcast(wolf, &wolves, &last.speak).await?;
                if !last.speak.is_empty() {
                    prompt = last.speak.clone();
                }
            }
            if last.agreement {
                break;
            }
        }
        self.state.advance(PhaseEvent::DiscussionEnded)?;

        let alive = self.state.alive_names();
        let votes = self.collect_votes(&wolves, &prompts::to_wolves_vote(&alive)).await?;
        let victim = majority(&votes);
        tracing::info!(votes = ?votes, victim = ?victim, "Werewolves voted");
        self.broadcast(MODERATOR, &wolves, &prompts::to_wolves_result(victim.as_deref()))
            .await?;
        self.state.advance(PhaseEvent::VictimChosen)?;

        let mut dead: Vec<(String, Cause)> = victim
            .map(|v| vec![(v, Cause::Werewolves)])
            .unwrap_or_default();

        if let Some(witch) = self.state.alive_with_role(Role::Witch).into_iter().next() {
            self.witch_turn(&witch, &alive, &mut dead).await?;
        }
        self.state.advance(PhaseEvent::WitchDone)?;

        if let Some(seer) = self.state.alive_with_role(Role::Seer).into_iter().next() {
            self.seer_turn(&seer, &alive).await?;
        }
        self.state.advance(PhaseEvent::SeerDone)?;

        Ok(dead)
    }

    async fn witch_turn(
        &mut self,
        witch: &str,
        alive: &[String],
        dead: &mut Vec<(String, Cause)>,
    ) -> Result<()> {
        let mut healed_tonight = false;
        if self.state.healing {
            if let Some((victim, _)) = dead.first().cloned() {
                let reply = self
                    .ask(witch, &prompts::to_witch_resurrect(witch, &victim))
                    .await?;
                if reply.resurrect {
                    tracing::info!(player = %victim, "Witch used the healing potion");
                    dead.clear();
                    self.state.healing = false;
                    healed_tonight = true;
                }
            }
        }

        if self.state.poison && !healed_tonight {
            let reply = self.ask(witch, &prompts::to_witch_poison(alive)).await?;
            if reply.eliminate {
                let target = extract_player(&reply.speak)
                    .map(|(name, _)| name)
                    .filter(|name| self.state.is_alive(name));
                if let Some(target) = target {
                    tracing::info!(player = %target, "Witch used the poison");
                    dead.push((target, Cause::Poison));
                    self.state.poison = false;
                }
            }
        }
        Ok(())
    }

    async fn seer_turn(&mut self, seer: &str, alive: &[String]) -> Result<()> {
        let reply = self.ask(seer, &prompts::to_seer(seer, alive)).await?;
        let Some((target, _)) = extract_player(&reply.speak) else {
            return Ok(());
        };
        let Ok(role) = self.state.role_of(&target) else {
            return Ok(());
        };
        let result = prompts::to_seer_result(&target, role.seer_label());
        self.broadcast(MODERATOR, &[seer.to_string()], &result).await
    }

    /// Apply the night's deaths. Returns the winner if the game is over.
    async fn dawn(&mut self, dead: Vec<(String, Cause)>) -> Result<Option<Team>> {
        let names: Vec<String> = dead.iter().map(|(name, _)| name.clone()).collect();
        let died = self.state.eliminate(&names);
        for name in &died {
            if let Some((_, cause)) = dead.iter().find(|(n, _)| n == name) {
                self.record_death(name, *cause);
            }
        }

        if let Some(winner) = self.finish_if_won().await? {
            return Ok(Some(winner));
        }
        self.state.advance(PhaseEvent::DayBreaks)?;

        let alive = self.state.alive_names();
        let news = if died.is_empty() {
            prompts::to_all_peace()
        } else {
            prompts::to_all_danger(&died)
        };
        self.broadcast(MODERATOR, &alive, &news).await?;
        Ok(None)
    }

    /// Daytime discussion and elimination vote. Returns the winner if the game is over.
    async fn day(&mut self) -> Result<Option<Team>> {
        let alive = self.state.alive_names();
        let hint = prompts::to_all_discuss(&alive);
        self.broadcast(MODERATOR, &alive, &hint).await?;
        for player in &alive {
            let reply = self.ask(player, &hint).await?;
            self.broadcast(player, &alive, &reply.speak).await?;
        }
        self.state.advance(PhaseEvent::DiscussionEnded)?;

        let votes = self.collect_votes(&alive, &prompts::to_all_vote(&alive)).await?;
        let voted_out = majority(&votes);
        tracing::info!(votes = ?votes, voted_out = ?voted_out, "Village voted");
        self.broadcast(MODERATOR, &alive, &prompts::to_all_result(voted_out.as_deref()))
            .await?;

        if let Some(name) = voted_out {
            for died in self.state.eliminate(&[name]) {
                self.record_death(&died, Cause::Vote);
            }
        }

        if let Some(winner) = self.finish_if_won().await? {
            return Ok(Some(winner));
        }
        let alive = self.state.alive_names();
        self.broadcast(MODERATOR, &alive, &prompts::to_all_continue())
            .await?;
        Ok(None)
    }

    /// Ask each voter for a name. Votes for anyone not alive count as abstentions.
    async fn collect_votes(&mut self, voters: &[String], prompt: &str) -> Result<Vec<String>> {
        let mut votes = Vec::with_capacity(voters.len());
        for voter in voters {
            let reply = self.ask(voter, prompt).await?;
            let vote = extract_player(&reply.speak)
                .map(|(name, _)| name)
                .filter(|name| self.state.is_alive(name))
                .unwrap_or_default();
            votes.push(vote);
        }
        Ok(votes)
    }

    async fn finish_if_won(&mut self) -> Result<Option<Team>> {
        let Some(winner) = self.state.winner() else {
            return Ok(None);
        };
        self.state.advance(PhaseEvent::GameEnded)?;
        tracing::info!(winner = ?winner, round = self.state.round, "Game over");
        let everyone: Vec<String> = self.state.seats().iter().map(|s| s.name.clone()).collect();
        let message = match winner {
            Team::Werewolves => prompts::to_all_wolf_win(),
            Team::Villagers => prompts::to_all_village_win(),
        };
        self.broadcast(MODERATOR, &everyone, &message).await?;
        Ok(Some(winner))
    }

    async fn ask(&mut self, name: &str, prompt: &str) -> Result<PlayerReply> {
        let idx = self.seat_index(name)?;
        let reply = self.players[idx].speak(prompt).await?;
        tracing::debug!(player = name, speak = %reply.speak, "Player replied");
        Ok(reply)
    }

    /// Record `content` in the transcript and deliver it to everyone in
    /// `audience` except the speaker.
    async fn broadcast(&mut self, speaker: &str, audience: &[String], content: &str) -> Result<()> {
        self.transcript.push(Announcement {
            round: self.state.round,
            speaker: speaker.to_string(),
            audience: audience.to_vec(),
            content: content.to_string(),
        });
        for name in audience.iter().filter(|n| n.as_str() != speaker) {
            let idx = self.seat_index(name)?;
            self.players[idx].observe(content).await?;
        }
        Ok(())
    }

    fn seat_index(&self, name: &str) -> Result<usize> {
        self.state
            .seats()
            .iter()
            .position(|s| s.name == name)
            .ok_or_else(|| TavernError::PlayerNotFound(name.to_string()))
    }

    fn record_death(&mut self, player: &str, cause: Cause) {
        self.deaths.push(Death {
            player: player.to_string(),
            round: self.state.round,
            cause,
        });
    }

    fn outcome(&self, winner: Option<Team>) -> GameOutcome {
        GameOutcome {
            winner,
            rounds_played: self.state.round,
            deaths: self.deaths.clone(),
        }
    }
}
