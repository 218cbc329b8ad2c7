use std::collections::BTreeSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::game::MatchStatus;
use crate::moves::Square;
use crate::registry::{GameId, PlayerId, Registry};

pub type Args = Map<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Register,
    JoinGame,
    GetStatus,
    GetState,
    MakePly,
    IsMyTurn,
}

impl Operation {
    pub const ALL: [Operation; 6] = [
        Operation::Register,
        Operation::JoinGame,
        Operation::GetStatus,
        Operation::GetState,
        Operation::MakePly,
        Operation::IsMyTurn,
    ];

    pub fn from_name(name: &str) -> Option<Operation> {
        Self::ALL.into_iter().find(|op| op.name() == name)
    }

    pub fn name(self) -> &'static str {
        match self {
            Operation::Register => "REGISTER",
            Operation::JoinGame => "JOIN_GAME",
            Operation::GetStatus => "GET_STATUS",
            Operation::GetState => "GET_STATE",
            Operation::MakePly => "MAKE_PLY",
            Operation::IsMyTurn => "IS_MY_TURN",
        }
    }

    /// The exact argument names a request for this operation must carry.
    pub fn required_args(self) -> &'static [&'static str] {
        match self {
            Operation::Register => &["name"],
            Operation::JoinGame => &["playerID"],
            Operation::GetStatus | Operation::GetState | Operation::IsMyTurn => {
                &["playerID", "gameID"]
            }
            Operation::MakePly => &[
                "playerID", "gameID", "fromRank", "fromFile", "toRank", "toFile",
            ],
        }
    }

    fn check_args(self, args: &Args) -> Result<()> {
        let expected: BTreeSet<&str> = self.required_args().iter().copied().collect();
        let supplied: BTreeSet<&str> = args.keys().map(String::as_str).collect();
        if expected == supplied {
            return Ok(());
        }
        Err(Error::InvalidArguments {
            expected: expected.into_iter().collect::<Vec<_>>().join(", "),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Registered {
    #[serde(rename = "playerID")]
    pub player_id: PlayerId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Joined {
    #[serde(rename = "gameID")]
    pub game_id: GameId,
}

/// Reply to GET_STATUS and MAKE_PLY.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Status {
    pub status: MatchStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Turn {
    pub is_my_turn: bool,
}

fn payload(value: impl Serialize) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}

fn string_arg<'a>(args: &'a Args, name: &'static str) -> Result<&'a str> {
    args.get(name).and_then(Value::as_str).ok_or(Error::InvalidArgumentValue {
        name,
        reason: "expected a string".to_string(),
    })
}

fn id_arg(args: &Args, name: &'static str) -> Result<u32> {
    args.get(name)
        .and_then(Value::as_u64)
        .and_then(|n| u32::try_from(n).ok())
        .ok_or(Error::InvalidArgumentValue {
            name,
            reason: "expected an unsigned 32-bit integer".to_string(),
        })
}

fn square_arg(args: &Args, rank: &'static str, file: &'static str) -> Result<Square> {
    let coordinate = |name: &'static str| {
        args.get(name).and_then(Value::as_i64).ok_or(Error::InvalidArgumentValue {
            name,
            reason: "expected an integer".to_string(),
        })
    };
    let (r, f) = (coordinate(rank)?, coordinate(file)?);
    Square::new(r, f).ok_or(Error::InvalidArgumentValue {
        name: if (0..8).contains(&r) { file } else { rank },
        reason: "outside the board".to_string(),
    })
}

/// Longest operation name repeated back in an error.
const MAX_ECHOED_NAME: usize = 32;

fn echoed(name: &str) -> String {
    if name.chars().count() <= MAX_ECHOED_NAME {
        return name.to_string();
    }
    let mut short: String = name.chars().take(MAX_ECHOED_NAME).collect();
    short.push_str("...");
    short
}

/// Routes requests to an explicitly supplied registry. Transports decode
/// requests into a name and argument map and render whatever comes back.
#[derive(Clone)]
pub struct Dispatcher {
    registry: Arc<Registry>,
}

impl Dispatcher {
    pub fn new(registry: Arc<Registry>) -> Self {
        Dispatcher { registry }
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    pub fn handle(&self, name: &str, args: &Args) -> Result<Value> {
        let result = Operation::from_name(name)
            .ok_or_else(|| Error::UnrecognizedOperation(echoed(name)))
            .and_then(|op| {
                op.check_args(args)?;
                self.invoke(op, args)
            });
        match &result {
            Ok(_) => debug!(operation = name, "request succeeded"),
            Err(e) => warn!(operation = %echoed(name), code = %e.code(), error = %e, "request failed"),
        }
        result
    }

    fn invoke(&self, op: Operation, args: &Args) -> Result<Value> {
        let registry = &self.registry;
        let player = || id_arg(args, "playerID").map(PlayerId::new);
        let game = || id_arg(args, "gameID").map(GameId::new);

        let value = match op {
            Operation::Register => {
                let player_id = registry.register(string_arg(args, "name")?)?;
                payload(Registered { player_id })
            }
            Operation::JoinGame => {
                let game_id = registry.join_game(player()?)?;
                payload(Joined { game_id })
            }
            Operation::GetStatus => {
                // Any caller may watch a game's status
                player()?;
                payload(Status { status: registry.get_status(game()?)? })
            }
            Operation::GetState => payload(registry.get_state(player()?, game()?)?),
            Operation::MakePly => {
                let from = square_arg(args, "fromRank", "fromFile")?;
                let to = square_arg(args, "toRank", "toFile")?;
                let status = registry.make_ply(player()?, game()?, from, to)?;
                payload(Status { status })
            }
            Operation::IsMyTurn => {
                let is_my_turn = registry.is_my_turn(player()?, game()?)?;
                payload(Turn { is_my_turn })
            }
        };
        Ok(value)
    }
}
