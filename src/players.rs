use std::future::Future;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use crate::client::ClientError;
use crate::dispatch::{Args, Dispatcher, Joined, Registered, Status, Turn};
use crate::error::{Error, ErrorCode};
use crate::game::{GameView, MatchStatus};
use crate::moves::Ply;
use crate::registry::{GameId, PlayerId};

pub trait Player {
    /// Choose the next ply for the side `view.you_are`, or `None` if there
    /// is nothing to play.
    fn select_ply(&mut self, view: &GameView) -> Option<Ply>;
}

/// Plays uniformly at random among the legal plies.
pub struct RandomPlayer {
    rng: StdRng,
}

impl RandomPlayer {
    pub fn new() -> Self {
        RandomPlayer { rng: StdRng::from_entropy() }
    }

    pub fn seeded(seed: u64) -> Self {
        RandomPlayer { rng: StdRng::seed_from_u64(seed) }
    }
}

impl Default for RandomPlayer {
    fn default() -> Self {
        Self::new()
    }
}

impl Player for RandomPlayer {
    fn select_ply(&mut self, view: &GameView) -> Option<Ply> {
        let plies = view.board.legal_plies(view.you_are);
        plies.choose(&mut self.rng).copied()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SeatError {
    #[error("request refused: {0}")]
    Refused(#[from] Error),

    #[error(transparent)]
    Remote(#[from] ClientError),

    #[error("unreadable reply: {0}")]
    Reply(#[from] serde_json::Error),

    #[error("not seated in a game yet")]
    NotJoined,
}

impl SeatError {
    /// The server's reason code, when the server refused the request.
    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            SeatError::Refused(e) => Some(e.code()),
            SeatError::Remote(ClientError::Refused { code, .. }) => Some(*code),
            _ => None,
        }
    }
}

/// Carries one request to the server and brings back its payload.
pub trait Transport {
    fn request(
        &self,
        operation: &str,
        args: Args,
    ) -> impl Future<Output = Result<Value, SeatError>> + Send;
}

impl Transport for Dispatcher {
    fn request(
        &self,
        operation: &str,
        args: Args,
    ) -> impl Future<Output = Result<Value, SeatError>> + Send {
        std::future::ready(self.handle(operation, &args).map_err(SeatError::from))
    }
}

/// What happened when a seat was asked to take its turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnResult {
    /// The opponent is to move, or the game has not started.
    Waiting,
    Played(Ply, MatchStatus),
    /// It is our turn but the player found no ply.
    NoPly,
    Finished(MatchStatus),
}

/// A registered player's session: which game it sits in and how it reaches
/// the server.
pub struct Seat<P, T> {
    transport: T,
    player: P,
    player_id: PlayerId,
    game_id: Option<GameId>,
}

impl<P: Player, T: Transport> Seat<P, T> {
    pub async fn register(transport: T, name: &str, player: P) -> Result<Self, SeatError> {
        let reply: Registered = request(&transport, "REGISTER", json!({ "name": name })).await?;
        info!(name, player = %reply.player_id, "registered");
        Ok(Seat { transport, player, player_id: reply.player_id, game_id: None })
    }

    pub fn player_id(&self) -> PlayerId {
        self.player_id
    }

    pub fn game_id(&self) -> Option<GameId> {
        self.game_id
    }

    pub async fn join(&mut self) -> Result<GameId, SeatError> {
        let args = json!({ "playerID": self.player_id });
        let reply: Joined = request(&self.transport, "JOIN_GAME", args).await?;
        self.game_id = Some(reply.game_id);
        Ok(reply.game_id)
    }

    fn seat_args(&self) -> Result<Value, SeatError> {
        let game_id = self.game_id.ok_or(SeatError::NotJoined)?;
        Ok(json!({ "playerID": self.player_id, "gameID": game_id }))
    }

    pub async fn status(&self) -> Result<MatchStatus, SeatError> {
        let reply: Status = request(&self.transport, "GET_STATUS", self.seat_args()?).await?;
        Ok(reply.status)
    }

    pub async fn is_my_turn(&self) -> Result<bool, SeatError> {
        let reply: Turn = request(&self.transport, "IS_MY_TURN", self.seat_args()?).await?;
        Ok(reply.is_my_turn)
    }

    pub async fn state(&self) -> Result<GameView, SeatError> {
        request(&self.transport, "GET_STATE", self.seat_args()?).await
    }

    /// Poll the game and, if it is our move, ask the player for a ply and
    /// submit it.
    pub async fn take_turn(&mut self) -> Result<TurnResult, SeatError> {
        let status = self.status().await?;
        if status != MatchStatus::Ongoing {
            return Ok(match status {
                MatchStatus::Pending => TurnResult::Waiting,
                finished => TurnResult::Finished(finished),
            });
        }
        if !self.is_my_turn().await? {
            return Ok(TurnResult::Waiting);
        }

        let view = self.state().await?;
        let Some(ply) = self.player.select_ply(&view) else {
            return Ok(TurnResult::NoPly);
        };
        let mut args = self.seat_args()?;
        args["fromRank"] = ply.from.rank().into();
        args["fromFile"] = ply.from.file().into();
        args["toRank"] = ply.to.rank().into();
        args["toFile"] = ply.to.file().into();
        let reply: Status = request(&self.transport, "MAKE_PLY", args).await?;
        debug!(player = %self.player_id, %ply, status = %reply.status, "played");
        Ok(TurnResult::Played(ply, reply.status))
    }

    /// Join a game if not seated yet, then keep taking turns, sleeping `poll`
    /// between checks, until the game ends, the player runs out of plies, or
    /// `max_plies` have been played. Returns the last known status.
    pub async fn play(&mut self, poll: Duration, max_plies: usize) -> Result<MatchStatus, SeatError> {
        if self.game_id.is_none() {
            self.join().await?;
        }
        let mut played = 0;
        while played < max_plies {
            match self.take_turn().await? {
                TurnResult::Played(..) => played += 1,
                TurnResult::Waiting => tokio::time::sleep(poll).await,
                TurnResult::NoPly => {
                    warn!(player = %self.player_id, "no ply to play, leaving the game");
                    break;
                }
                TurnResult::Finished(status) => return Ok(status),
            }
        }
        self.status().await
    }
}

async fn request<T, R>(transport: &T, operation: &str, args: Value) -> Result<R, SeatError>
where
    T: Transport,
    R: DeserializeOwned,
{
    let args: Args = match args {
        Value::Object(map) => map,
        _ => Args::new(),
    };
    let reply = transport.request(operation, args).await?;
    Ok(serde_json::from_value(reply)?)
}
