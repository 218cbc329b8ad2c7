use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::game::MatchStatus;
use crate::registry::{GameId, PlayerId};

/// Stable, machine-checkable reason code carried by every error response.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    UnrecognizedOperation,
    InvalidArguments,
    DuplicateName,
    InvalidPlayerId,
    InvalidGameId,
    NotAPlayer,
    NotYourTurn,
    NotInProgress,
    IllegalMove,
    NotActive,
    ResourceExhausted,
}

impl ErrorCode {
    pub const ALL: [ErrorCode; 11] = [
        ErrorCode::UnrecognizedOperation,
        ErrorCode::InvalidArguments,
        ErrorCode::DuplicateName,
        ErrorCode::InvalidPlayerId,
        ErrorCode::InvalidGameId,
        ErrorCode::NotAPlayer,
        ErrorCode::NotYourTurn,
        ErrorCode::NotInProgress,
        ErrorCode::IllegalMove,
        ErrorCode::NotActive,
        ErrorCode::ResourceExhausted,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::UnrecognizedOperation => "UNRECOGNIZED_OPERATION",
            ErrorCode::InvalidArguments => "INVALID_ARGUMENTS",
            ErrorCode::DuplicateName => "DUPLICATE_NAME",
            ErrorCode::InvalidPlayerId => "INVALID_PLAYER_ID",
            ErrorCode::InvalidGameId => "INVALID_GAME_ID",
            ErrorCode::NotAPlayer => "NOT_A_PLAYER",
            ErrorCode::NotYourTurn => "NOT_YOUR_TURN",
            ErrorCode::NotInProgress => "NOT_IN_PROGRESS",
            ErrorCode::IllegalMove => "ILLEGAL_MOVE",
            ErrorCode::NotActive => "NOT_ACTIVE",
            ErrorCode::ResourceExhausted => "RESOURCE_EXHAUSTED",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ErrorCode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        ErrorCode::ALL
            .into_iter()
            .find(|code| code.as_str() == s)
            .ok_or_else(|| format!("unknown error code {s:?}"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("Unrecognized operation \"{0}\" in request")]
    UnrecognizedOperation(String),

    #[error("Invalid arguments, expected: {expected}")]
    InvalidArguments { expected: String },

    #[error("Invalid argument {name}: {reason}")]
    InvalidArgumentValue { name: &'static str, reason: String },

    #[error("A player named {0:?} is already registered")]
    DuplicateName(String),

    #[error("Unknown player {0}")]
    InvalidPlayerId(PlayerId),

    #[error("Unknown game {0}")]
    InvalidGameId(GameId),

    #[error("You are not a player in this game")]
    NotAPlayer,

    #[error("It is not your turn")]
    NotYourTurn,

    #[error("Game not in progress ({0})")]
    NotInProgress(MatchStatus),

    #[error("Illegal move")]
    IllegalMove,

    #[error("Game not active ({0})")]
    NotActive(MatchStatus),

    #[error("Cannot allocate another {namespace} identifier: namespace holds {len} entries")]
    ResourceExhausted { namespace: &'static str, len: usize },
}

impl Error {
    pub fn code(&self) -> ErrorCode {
        match self {
            Error::UnrecognizedOperation(_) => ErrorCode::UnrecognizedOperation,
            Error::InvalidArguments { .. } | Error::InvalidArgumentValue { .. } => {
                ErrorCode::InvalidArguments
            }
            Error::DuplicateName(_) => ErrorCode::DuplicateName,
            Error::InvalidPlayerId(_) => ErrorCode::InvalidPlayerId,
            Error::InvalidGameId(_) => ErrorCode::InvalidGameId,
            Error::NotAPlayer => ErrorCode::NotAPlayer,
            Error::NotYourTurn => ErrorCode::NotYourTurn,
            Error::NotInProgress(_) => ErrorCode::NotInProgress,
            Error::IllegalMove => ErrorCode::IllegalMove,
            Error::NotActive(_) => ErrorCode::NotActive,
            Error::ResourceExhausted { .. } => ErrorCode::ResourceExhausted,
        }
    }

    /// Continuing after a fatal error would break registry invariants.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::ResourceExhausted { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
