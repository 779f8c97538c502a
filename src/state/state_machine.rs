use thiserror::Error;

/// High-level phases the tracked game can be in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// No roster submitted yet; the setup form is shown.
    Setup,
    /// Rounds are being entered.
    InProgress,
    /// A player reached the target; the winner screen is shown.
    Finished,
}

/// Operations that move the game between phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// Operator submits a roster and a target score.
    Start,
    /// Operator reports the outcome of a round.
    SubmitRound,
    /// Operator discards the game.
    Reset,
}

/// Error returned when an operation is not allowed in the current phase.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid transition: {event:?} cannot be applied while in {from:?}")]
pub struct InvalidTransition {
    /// The phase the game was in when the event was received.
    pub from: GamePhase,
    /// The event that cannot be applied from this phase.
    pub event: GameEvent,
}

/// Error returned when the work done under a plan produced a phase it does not allow.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{event:?} from {from:?} produced unexpected phase {actual:?}")]
pub struct ApplyError {
    pub from: GamePhase,
    pub event: GameEvent,
    pub actual: GamePhase,
}

/// A validated transition waiting for its resulting phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Plan {
    /// Phase the game was in when the plan was made.
    pub from: GamePhase,
    /// Event being applied.
    pub event: GameEvent,
    allowed: &'static [GamePhase],
}

impl Plan {
    /// Phases the transition may end in.
    pub fn allowed(&self) -> &'static [GamePhase] {
        self.allowed
    }

    /// Confirm the phase reached once the work is done.
    pub fn apply(self, actual: GamePhase) -> Result<GamePhase, ApplyError> {
        if self.allowed.contains(&actual) {
            Ok(actual)
        } else {
            Err(ApplyError {
                from: self.from,
                event: self.event,
                actual,
            })
        }
    }
}

/// Check that `event` may be applied from `from` and return the plan for it.
///
/// A submitted round keeps the game in progress or finishes it depending on
/// the scores, so the plan lists every acceptable outcome.
pub fn plan(from: GamePhase, event: GameEvent) -> Result<Plan, InvalidTransition> {
    let allowed: &'static [GamePhase] = match (from, event) {
        (GamePhase::Setup, GameEvent::Start) => &[GamePhase::InProgress],
        (GamePhase::InProgress, GameEvent::SubmitRound) => {
            &[GamePhase::InProgress, GamePhase::Finished]
        }
        (_, GameEvent::Reset) => &[GamePhase::Setup],
        (from, event) => return Err(InvalidTransition { from, event }),
    };

    Ok(Plan {
        from,
        event,
        allowed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apply(from: GamePhase, event: GameEvent, reached: GamePhase) -> GamePhase {
        plan(from, event).unwrap().apply(reached).unwrap()
    }

    #[test]
    fn full_happy_path_through_game() {
        let phase = apply(GamePhase::Setup, GameEvent::Start, GamePhase::InProgress);
        let phase = apply(phase, GameEvent::SubmitRound, GamePhase::InProgress);
        let phase = apply(phase, GameEvent::SubmitRound, GamePhase::Finished);
        assert_eq!(phase, GamePhase::Finished);
        assert_eq!(
            apply(phase, GameEvent::Reset, GamePhase::Setup),
            GamePhase::Setup
        );
    }

    #[test]
    fn reset_is_allowed_from_every_phase() {
        for from in [GamePhase::Setup, GamePhase::InProgress, GamePhase::Finished] {
            assert_eq!(plan(from, GameEvent::Reset).unwrap().allowed(), &[GamePhase::Setup]);
        }
    }

    #[test]
    fn starting_twice_is_rejected() {
        let err = plan(GamePhase::InProgress, GameEvent::Start).unwrap_err();
        assert_eq!(err.from, GamePhase::InProgress);
        assert_eq!(err.event, GameEvent::Start);
        assert!(plan(GamePhase::Finished, GameEvent::Start).is_err());
    }

    #[test]
    fn rounds_need_a_running_game() {
        assert!(plan(GamePhase::Setup, GameEvent::SubmitRound).is_err());
        assert!(plan(GamePhase::Finished, GameEvent::SubmitRound).is_err());
    }

    #[test]
    fn apply_rejects_unexpected_phase() {
        let plan = plan(GamePhase::Setup, GameEvent::Start).unwrap();
        let err = plan.apply(GamePhase::Finished).unwrap_err();
        assert_eq!(err.actual, GamePhase::Finished);
        assert_eq!(err.from, GamePhase::Setup);
    }
}
