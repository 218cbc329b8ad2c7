use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::board::{Board, PerColor};
use crate::game::{Match, MatchStatus};
use crate::moves::Ply;
use crate::piece::Color;
use crate::random::StdRandom;
use crate::registry::{GameId, PlayerId, Registry};

/// Bumped whenever the document layout changes.
pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("snapshot version {found} does not match supported version {expected}")]
    Version { found: u32, expected: u32 },

    #[error("malformed snapshot: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("inconsistent snapshot: {0}")]
    Inconsistent(String),

    #[error("snapshot i/o: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub id: PlayerId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    pub id: GameId,
    pub white: Option<PlayerId>,
    pub black: Option<PlayerId>,
    pub status: MatchStatus,
    pub board: Board,
    pub history: Vec<Ply>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub version: u32,
    pub players: Vec<PlayerRecord>,
    /// Oldest first.
    pub games: Vec<GameRecord>,
}

#[derive(Deserialize)]
struct Header {
    version: u32,
}

impl Snapshot {
    pub fn capture(registry: &Registry) -> Snapshot {
        let (players, games) = registry.contents();
        let players = players
            .into_iter()
            .map(|(id, name)| PlayerRecord { id, name })
            .collect();
        let games = games
            .into_iter()
            .map(|(id, game)| GameRecord {
                id,
                white: game.player(Color::White),
                black: game.player(Color::Black),
                status: game.status(),
                board: game.board().clone(),
                history: game.history().to_vec(),
            })
            .collect();

        Snapshot { version: SNAPSHOT_VERSION, players, games }
    }

    pub fn restore(self) -> Result<Registry, SnapshotError> {
        let players = self.players.into_iter().map(|p| (p.id, p.name)).collect();
        let games = self
            .games
            .into_iter()
            .map(|g| {
                let seats = PerColor { white: g.white, black: g.black };
                (g.id, Match::from_parts(g.board, seats, g.status, g.history))
            })
            .collect();
        Registry::from_parts(players, games, Box::new(StdRandom::from_entropy()))
            .map_err(SnapshotError::Inconsistent)
    }

    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// The version header is checked before anything else is decoded.
    pub fn from_json(text: &str) -> Result<Snapshot, SnapshotError> {
        let header: Header = serde_json::from_str(text)?;
        if header.version != SNAPSHOT_VERSION {
            return Err(SnapshotError::Version {
                found: header.version,
                expected: SNAPSHOT_VERSION,
            });
        }
        Ok(serde_json::from_str(text)?)
    }

    /// Written beside `path` first and renamed over it, so a crash never
    /// leaves a truncated snapshot behind.
    pub fn save(&self, path: &Path) -> Result<(), SnapshotError> {
        let tmp = temp_path(path);
        fs::write(&tmp, self.to_json()?)?;
        fs::rename(&tmp, path)?;
        info!(path = %path.display(), players = self.players.len(), games = self.games.len(), "saved snapshot");
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Snapshot, SnapshotError> {
        let snapshot = Snapshot::from_json(&fs::read_to_string(path)?)?;
        info!(path = %path.display(), players = snapshot.players.len(), games = snapshot.games.len(), "loaded snapshot");
        Ok(snapshot)
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}
