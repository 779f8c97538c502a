use std::collections::HashSet;

use thiserror::Error;

use crate::{
    dao::models::{GameSnapshotEntity, PlayerEntity, SharePayloadEntity},
    state::state_machine::GamePhase,
};

/// Target score used when the operator does not pick one.
pub const DEFAULT_TARGET_SCORE: u32 = 250;
/// A game needs at least this many named players.
pub const MIN_PLAYERS: usize = 2;

/// Identifier of a player, unique within a game (`player-<join index>`).
pub type PlayerId = String;

/// Player tracked during a game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    /// Stable identifier derived from the join order.
    pub id: PlayerId,
    /// Display name, trimmed.
    pub name: String,
    /// Cumulative score; only ever grows.
    pub score: u32,
    /// Display color (`#RRGGBB`) picked from the palette by join order.
    pub color: String,
}

/// Bounds applied to a roster when a game starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RosterLimits {
    /// Maximum number of name entries accepted (blank ones included).
    pub max_players: usize,
    /// Lowest target score an operator may pick.
    pub min_target_score: u32,
    /// Highest target score an operator may pick.
    pub max_target_score: u32,
}

impl Default for RosterLimits {
    fn default() -> Self {
        Self {
            max_players: 8,
            min_target_score: 50,
            max_target_score: 1000,
        }
    }
}

/// Aggregated state of the single tracked game.
///
/// The value is never mutated in place by gameplay: starting a game and
/// resolving a round both return a new [`GameState`], and the caller decides
/// where to store it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    /// Players in join order.
    pub players: Vec<Player>,
    /// Score a player must reach to win.
    pub target_score: u32,
    /// Round being played, starting at 1.
    pub current_round: u32,
    /// Whether a roster has been submitted.
    pub started: bool,
    /// Whether a winner has been declared.
    pub ended: bool,
    /// Winner, present iff `ended`.
    pub winner_id: Option<PlayerId>,
}

impl Default for GameState {
    fn default() -> Self {
        Self::idle(DEFAULT_TARGET_SCORE)
    }
}

/// Reasons a roster cannot start a game.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SetupError {
    #[error("at most {max} players can join a game (got {got} entries)")]
    TooManyEntries { max: usize, got: usize },
    #[error("a game requires at least {min} named players (got {got})")]
    NotEnoughPlayers { min: usize, got: usize },
    #[error("target score must be between {min} and {max} (got {got})")]
    TargetOutOfRange { min: u32, max: u32, got: u32 },
    #[error("color palette is empty")]
    EmptyPalette,
}

/// Inconsistencies found in a serialized game (snapshot or share payload).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("game was never started")]
    NotStarted,
    #[error("a game requires at least {min} players (got {got})")]
    NotEnoughPlayers { min: usize, got: usize },
    #[error("player id must not be empty")]
    EmptyPlayerId,
    #[error("player `{0}` has an empty name")]
    EmptyPlayerName(PlayerId),
    #[error("duplicate player id `{0}`")]
    DuplicatePlayerId(PlayerId),
    #[error("target score must be positive")]
    InvalidTarget,
    #[error("round counter must start at 1")]
    InvalidRound,
    #[error("ended flag and winner disagree (ended: {ended}, winner present: {has_winner})")]
    WinnerMismatch { ended: bool, has_winner: bool },
    #[error("winner `{0}` is not part of the roster")]
    UnknownWinner(PlayerId),
    #[error("winner `{id}` has {score} points, below the target of {target}")]
    WinnerBelowTarget { id: PlayerId, score: u32, target: u32 },
    #[error("winner `{declared}` is not the first player to reach the target (`{expected}` is)")]
    WinnerNotFirst {
        declared: PlayerId,
        expected: PlayerId,
    },
    #[error("player `{0}` reached the target but no winner was declared")]
    UndeclaredWinner(PlayerId),
}

impl GameState {
    /// State shown before any roster has been submitted.
    pub fn idle(target_score: u32) -> Self {
        Self {
            players: Vec::new(),
            target_score,
            current_round: 1,
            started: false,
            ended: false,
            winner_id: None,
        }
    }

    /// Build a fresh game from the names typed by the operator.
    ///
    /// Names are trimmed and blank entries dropped; colors cycle through
    /// `palette` by join order.
    pub fn start(
        names: &[String],
        target_score: u32,
        palette: &[String],
        limits: &RosterLimits,
    ) -> Result<Self, SetupError> {
        if names.len() > limits.max_players {
            return Err(SetupError::TooManyEntries {
                max: limits.max_players,
                got: names.len(),
            });
        }

        let named = names
            .iter()
            .map(|name| name.trim())
            .filter(|name| !name.is_empty())
            .collect::<Vec<_>>();

        if named.len() < MIN_PLAYERS {
            return Err(SetupError::NotEnoughPlayers {
                min: MIN_PLAYERS,
                got: named.len(),
            });
        }

        if !(limits.min_target_score..=limits.max_target_score).contains(&target_score) {
            return Err(SetupError::TargetOutOfRange {
                min: limits.min_target_score,
                max: limits.max_target_score,
                got: target_score,
            });
        }

        if palette.is_empty() {
            return Err(SetupError::EmptyPalette);
        }

        let players = named
            .into_iter()
            .enumerate()
            .map(|(index, name)| Player {
                id: format!("player-{index}"),
                name: name.to_string(),
                score: 0,
                color: palette[index % palette.len()].clone(),
            })
            .collect();

        Ok(Self {
            players,
            target_score,
            current_round: 1,
            started: true,
            ended: false,
            winner_id: None,
        })
    }

    /// Lifecycle phase derived from the started/ended flags.
    pub fn phase(&self) -> GamePhase {
        match (self.started, self.ended) {
            (false, _) => GamePhase::Setup,
            (true, false) => GamePhase::InProgress,
            (true, true) => GamePhase::Finished,
        }
    }

    /// Look a player up by id.
    pub fn player(&self, id: &str) -> Option<&Player> {
        self.players.iter().find(|player| player.id == id)
    }

    /// The declared winner, if the game has ended.
    pub fn winner(&self) -> Option<&Player> {
        self.winner_id.as_deref().and_then(|id| self.player(id))
    }
}

/// First player in roster order whose score reached `target`.
pub fn first_reaching_target(players: &[Player], target: u32) -> Option<&Player> {
    players.iter().find(|player| player.score >= target)
}

/// Read-only copy of a game received through a share link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharedGame {
    /// Players in join order.
    pub players: Vec<Player>,
    /// Score the game was played to.
    pub target_score: u32,
    /// Round the game had reached when the link was made.
    pub current_round: u32,
    /// Winner, when the link was made after the game ended.
    pub winner_id: Option<PlayerId>,
}

impl SharedGame {
    /// The declared winner, if any.
    pub fn winner(&self) -> Option<&Player> {
        let id = self.winner_id.as_deref()?;
        self.players.iter().find(|player| player.id == id)
    }
}

fn validate_roster(players: &[Player], target_score: u32, round: u32) -> Result<(), SchemaError> {
    if players.len() < MIN_PLAYERS {
        return Err(SchemaError::NotEnoughPlayers {
            min: MIN_PLAYERS,
            got: players.len(),
        });
    }
    if target_score == 0 {
        return Err(SchemaError::InvalidTarget);
    }
    if round == 0 {
        return Err(SchemaError::InvalidRound);
    }

    let mut seen = HashSet::new();
    for player in players {
        if player.id.trim().is_empty() {
            return Err(SchemaError::EmptyPlayerId);
        }
        if player.name.trim().is_empty() {
            return Err(SchemaError::EmptyPlayerName(player.id.clone()));
        }
        if !seen.insert(player.id.as_str()) {
            return Err(SchemaError::DuplicatePlayerId(player.id.clone()));
        }
    }

    Ok(())
}

/// Resolve an embedded winner object against the roster by id.
///
/// The winner must be the first player in roster order at or above the
/// target, and nobody may sit at the target without a declared winner.
fn resolve_winner(
    players: &[Player],
    winner: Option<PlayerEntity>,
    target_score: u32,
) -> Result<Option<PlayerId>, SchemaError> {
    let first = first_reaching_target(players, target_score);
    let Some(winner) = winner else {
        return match first {
            Some(player) => Err(SchemaError::UndeclaredWinner(player.id.clone())),
            None => Ok(None),
        };
    };

    let player = players
        .iter()
        .find(|player| player.id == winner.id)
        .ok_or_else(|| SchemaError::UnknownWinner(winner.id.clone()))?;
    if player.score < target_score {
        return Err(SchemaError::WinnerBelowTarget {
            id: player.id.clone(),
            score: player.score,
            target: target_score,
        });
    }
    match first {
        Some(expected) if expected.id != player.id => Err(SchemaError::WinnerNotFirst {
            declared: player.id.clone(),
            expected: expected.id.clone(),
        }),
        _ => Ok(Some(player.id.clone())),
    }
}

impl From<PlayerEntity> for Player {
    fn from(value: PlayerEntity) -> Self {
        Self {
            id: value.id,
            name: value.name,
            score: value.score,
            color: value.color,
        }
    }
}

impl From<Player> for PlayerEntity {
    fn from(value: Player) -> Self {
        Self {
            id: value.id,
            name: value.name,
            score: value.score,
            color: value.color,
        }
    }
}

impl From<&GameState> for GameSnapshotEntity {
    fn from(game: &GameState) -> Self {
        Self {
            players: game.players.iter().cloned().map(Into::into).collect(),
            target_score: game.target_score,
            current_round: game.current_round,
            game_started: game.started,
            game_ended: game.ended,
            winner: game.winner().cloned().map(Into::into),
        }
    }
}

impl TryFrom<GameSnapshotEntity> for GameState {
    type Error = SchemaError;

    fn try_from(entity: GameSnapshotEntity) -> Result<Self, Self::Error> {
        if !entity.game_started {
            return Err(SchemaError::NotStarted);
        }

        let players = entity
            .players
            .into_iter()
            .map(Player::from)
            .collect::<Vec<_>>();
        validate_roster(&players, entity.target_score, entity.current_round)?;

        if entity.game_ended != entity.winner.is_some() {
            return Err(SchemaError::WinnerMismatch {
                ended: entity.game_ended,
                has_winner: entity.winner.is_some(),
            });
        }
        let winner_id = resolve_winner(&players, entity.winner, entity.target_score)?;

        Ok(Self {
            players,
            target_score: entity.target_score,
            current_round: entity.current_round,
            started: true,
            ended: winner_id.is_some(),
            winner_id,
        })
    }
}

impl From<&GameState> for SharePayloadEntity {
    fn from(game: &GameState) -> Self {
        Self {
            players: game.players.iter().cloned().map(Into::into).collect(),
            target_score: game.target_score,
            current_round: game.current_round,
            winner: game.winner().cloned().map(Into::into),
        }
    }
}

impl TryFrom<SharePayloadEntity> for SharedGame {
    type Error = SchemaError;

    fn try_from(entity: SharePayloadEntity) -> Result<Self, Self::Error> {
        let players = entity
            .players
            .into_iter()
            .map(Player::from)
            .collect::<Vec<_>>();
        validate_roster(&players, entity.target_score, entity.current_round)?;
        let winner_id = resolve_winner(&players, entity.winner, entity.target_score)?;

        Ok(Self {
            players,
            target_score: entity.target_score,
            current_round: entity.current_round,
            winner_id,
        })
    }
}
