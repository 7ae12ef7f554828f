use serde::{Deserialize, Serialize};

use super::error::TavernError;

/// Werewolf game phases, in the order a round visits them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GamePhase {
    Setup,
    WolfDiscussion,
    WolfVote,
    WitchTurn,
    SeerTurn,
    Dawn,
    DayDiscussion,
    DayVote,
    Finished,
}

/// Events that move the game between phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PhaseEvent {
    NightFalls,
    DiscussionEnded,
    VictimChosen,
    WitchDone,
    SeerDone,
    DayBreaks,
    GameEnded,
}

impl GamePhase {
    /// Attempt a phase transition given an event.
    /// Returns the new phase or an error if the transition is invalid.
    pub fn transition(self, event: PhaseEvent) -> super::error::Result<GamePhase> {
        match (self, event) {
            (GamePhase::Setup, PhaseEvent::NightFalls) => Ok(GamePhase::WolfDiscussion),

            // Night
            (GamePhase::WolfDiscussion, PhaseEvent::DiscussionEnded) => Ok(GamePhase::WolfVote),
            (GamePhase::WolfVote, PhaseEvent::VictimChosen) => Ok(GamePhase::WitchTurn),
            (GamePhase::WitchTurn, PhaseEvent::WitchDone) => Ok(GamePhase::SeerTurn),
            (GamePhase::SeerTurn, PhaseEvent::SeerDone) => Ok(GamePhase::Dawn),

            // Dawn resolves the night's deaths
            (GamePhase::Dawn, PhaseEvent::DayBreaks) => Ok(GamePhase::DayDiscussion),
            (GamePhase::Dawn, PhaseEvent::GameEnded) => Ok(GamePhase::Finished),

            // Day
            (GamePhase::DayDiscussion, PhaseEvent::DiscussionEnded) => Ok(GamePhase::DayVote),
            (GamePhase::DayVote, PhaseEvent::NightFalls) => Ok(GamePhase::WolfDiscussion),
            (GamePhase::DayVote, PhaseEvent::GameEnded) => Ok(GamePhase::Finished),

            (phase, event) => Err(TavernError::InvalidPhaseTransition { from: phase, event }),
        }
    }

    pub fn is_night(self) -> bool {
        matches!(
            self,
            GamePhase::WolfDiscussion
                | GamePhase::WolfVote
                | GamePhase::WitchTurn
                | GamePhase::SeerTurn
        )
    }

    pub fn is_finished(self) -> bool {
        self == GamePhase::Finished
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_round() {
        let mut phase = GamePhase::Setup;
        let events = [
            PhaseEvent::NightFalls,
            PhaseEvent::DiscussionEnded,
            PhaseEvent::VictimChosen,
            PhaseEvent::WitchDone,
            PhaseEvent::SeerDone,
            PhaseEvent::DayBreaks,
            PhaseEvent::DiscussionEnded,
        ];
        for event in events {
            phase = phase.transition(event).unwrap();
        }
        assert_eq!(phase, GamePhase::DayVote);

        let next_night = phase.transition(PhaseEvent::NightFalls).unwrap();
        assert_eq!(next_night, GamePhase::WolfDiscussion);
        assert!(next_night.is_night());
    }

    #[test]
    fn test_game_can_end_at_dawn_or_after_vote() {
        assert_eq!(
            GamePhase::Dawn.transition(PhaseEvent::GameEnded).unwrap(),
            GamePhase::Finished
        );
        assert_eq!(
            GamePhase::DayVote.transition(PhaseEvent::GameEnded).unwrap(),
            GamePhase::Finished
        );
    }

    #[test]
    fn test_invalid_transition() {
        let result = GamePhase::Setup.transition(PhaseEvent::DayBreaks);
        assert!(matches!(
            result,
            Err(TavernError::InvalidPhaseTransition {
                from: GamePhase::Setup,
                event: PhaseEvent::DayBreaks
            })
        ));
    }

    #[test]
    fn test_finished_is_terminal() {
        let phase = GamePhase::Finished;
        assert!(phase.is_finished());
        assert!(phase.transition(PhaseEvent::NightFalls).is_err());
        assert!(phase.transition(PhaseEvent::GameEnded).is_err());
    }
}
