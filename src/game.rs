use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::board::{Board, PerColor};
use crate::error::{Error, Result};
use crate::moves::{Ply, Square};
use crate::piece::Color;
use crate::random::RandomSource;
use crate::registry::PlayerId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchStatus {
    /// Waiting for a second player.
    Pending,
    Ongoing,
    WhiteWon,
    BlackWon,
    Drawn,
    Cancelled,
}

impl MatchStatus {
    /// Pending and ongoing matches can still be cancelled.
    pub fn is_active(self) -> bool {
        matches!(self, MatchStatus::Pending | MatchStatus::Ongoing)
    }
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MatchStatus::Pending => "PENDING",
            MatchStatus::Ongoing => "ONGOING",
            MatchStatus::WhiteWon => "WHITE_WON",
            MatchStatus::BlackWon => "BLACK_WON",
            MatchStatus::Drawn => "DRAWN",
            MatchStatus::Cancelled => "CANCELLED",
        };
        f.write_str(s)
    }
}

/// A decided result of an ongoing match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    WhiteWon,
    BlackWon,
    Drawn,
}

impl From<Outcome> for MatchStatus {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::WhiteWon => MatchStatus::WhiteWon,
            Outcome::BlackWon => MatchStatus::BlackWon,
            Outcome::Drawn => MatchStatus::Drawn,
        }
    }
}

/// Everything a seated player may observe about a match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameView {
    pub you_are: Color,
    pub turn: Color,
    pub board: Board,
    pub history: Vec<Ply>,
}

#[derive(Debug, Clone)]
pub struct Match {
    board: Board,
    players: PerColor<Option<PlayerId>>,
    status: MatchStatus,
    history: Vec<Ply>,
}

impl Default for Match {
    fn default() -> Self {
        Self::new()
    }
}

impl Match {
    pub fn new() -> Self {
        Match {
            board: Board::new(),
            players: PerColor::default(),
            status: MatchStatus::Pending,
            history: Vec::new(),
        }
    }

    /// Rebuild a match from stored parts, e.g. a snapshot.
    pub fn from_parts(
        board: Board,
        players: PerColor<Option<PlayerId>>,
        status: MatchStatus,
        history: Vec<Ply>,
    ) -> Self {
        Match { board, players, status, history }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn status(&self) -> MatchStatus {
        self.status
    }

    pub fn history(&self) -> &[Ply] {
        &self.history
    }

    pub fn player(&self, color: Color) -> Option<PlayerId> {
        self.players[color]
    }

    pub fn whose_turn(&self) -> Color {
        if self.history.len() % 2 == 0 {
            Color::White
        } else {
            Color::Black
        }
    }

    pub fn color_of(&self, player: PlayerId) -> Option<Color> {
        Color::ALL
            .into_iter()
            .find(|c| self.players[*c] == Some(player))
    }

    /// Seat `player` in a free slot. Returns the assigned color, or `None`
    /// if the match is not pending or the player is already seated here.
    pub fn join(&mut self, player: PlayerId, rng: &mut dyn RandomSource) -> Option<Color> {
        if self.status != MatchStatus::Pending || self.color_of(player).is_some() {
            return None;
        }

        let color = match (self.players.white, self.players.black) {
            (None, None) => {
                if rng.next_bool() {
                    Color::White
                } else {
                    Color::Black
                }
            }
            (None, Some(_)) => Color::White,
            (Some(_), None) => Color::Black,
            (Some(_), Some(_)) => return None,
        };
        self.players[color] = Some(player);

        if self.players.white.is_some() && self.players.black.is_some() {
            self.status = MatchStatus::Ongoing;
        }
        debug!(%player, %color, status = %self.status, "seated player");
        Some(color)
    }

    pub fn make_ply(&mut self, player: PlayerId, from: Square, to: Square) -> Result<()> {
        if self.status != MatchStatus::Ongoing {
            return Err(Error::NotInProgress(self.status));
        }
        let color = self.color_of(player).ok_or(Error::NotAPlayer)?;
        if color != self.whose_turn() {
            return Err(Error::NotYourTurn);
        }
        if !self.board.apply_move(color, from, to) {
            return Err(Error::IllegalMove);
        }
        self.history.push(Ply::new(from, to));
        debug!(%player, %color, ply = %Ply::new(from, to), plies = self.history.len(), "added ply to history");
        Ok(())
    }

    pub fn cancel(&mut self) -> Result<()> {
        if !self.status.is_active() {
            return Err(Error::NotActive(self.status));
        }
        self.status = MatchStatus::Cancelled;
        Ok(())
    }

    /// Record a decided result. Only an ongoing match can be decided.
    pub fn conclude(&mut self, outcome: Outcome) -> Result<()> {
        if self.status != MatchStatus::Ongoing {
            return Err(Error::NotInProgress(self.status));
        }
        self.status = outcome.into();
        Ok(())
    }

    pub fn view_for(&self, player: PlayerId) -> Result<GameView> {
        let you_are = self.color_of(player).ok_or(Error::NotAPlayer)?;
        Ok(GameView {
            you_are,
            turn: self.whose_turn(),
            board: self.board.clone(),
            history: self.history.clone(),
        })
    }
}
