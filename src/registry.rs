use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::game::{GameView, Match, MatchStatus, Outcome};
use crate::moves::Square;
use crate::piece::Color;
use crate::random::{RandomSource, StdRandom};

/// Namespaces stop accepting new identifiers at half of the id space so a
/// random draw always has at least even odds of being fresh.
pub const MAX_IDS_PER_NAMESPACE: usize = 1 << 31;

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(u32);

        impl $name {
            pub const fn new(raw: u32) -> Self {
                Self(raw)
            }

            pub const fn get(self) -> u32 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_type!(
    /// Identifies a registered player.
    PlayerId
);
id_type!(
    /// Identifies a match.
    GameId
);

pub type MatchHandle = Arc<Mutex<Match>>;

/// Every player and match known to the server. Locks are always taken
/// registry first, then match; a match lock is never held while waiting on
/// the registry.
pub struct Registry {
    inner: Mutex<Index>,
}

struct Index {
    players: HashMap<PlayerId, String>,
    names: HashMap<String, PlayerId>,
    matches: HashMap<GameId, MatchHandle>,
    /// Every game id, oldest first.
    order: Vec<GameId>,
    /// Games that may still be waiting for a second player, oldest first.
    pending: VecDeque<GameId>,
    rng: Box<dyn RandomSource>,
    id_limit: usize,
}

/// Draw a random id in `[1, u32::MAX]` not yet used in the namespace.
fn allocate_id<K>(
    namespace: &'static str,
    taken: &HashMap<K, impl Sized>,
    limit: usize,
    make: impl Fn(u32) -> K,
    rng: &mut dyn RandomSource,
) -> Result<K>
where
    K: std::hash::Hash + Eq,
{
    if taken.len() >= limit {
        return Err(Error::ResourceExhausted { namespace, len: taken.len() });
    }
    loop {
        let id = make(rng.next_in(1, u32::MAX));
        if !taken.contains_key(&id) {
            return Ok(id);
        }
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    pub fn new() -> Self {
        Self::with_random(Box::new(StdRandom::from_entropy()))
    }

    pub fn with_random(rng: Box<dyn RandomSource>) -> Self {
        Registry {
            inner: Mutex::new(Index {
                players: HashMap::new(),
                names: HashMap::new(),
                matches: HashMap::new(),
                order: Vec::new(),
                pending: VecDeque::new(),
                rng,
                id_limit: MAX_IDS_PER_NAMESPACE,
            }),
        }
    }

    #[cfg(test)]
    fn with_id_limit(self, limit: usize) -> Self {
        self.inner.lock().id_limit = limit;
        self
    }

    pub fn register(&self, name: &str) -> Result<PlayerId> {
        let mut inner = self.inner.lock();
        if inner.names.contains_key(name) {
            return Err(Error::DuplicateName(name.to_string()));
        }
        let Index { players, rng, id_limit, .. } = &mut *inner;
        let id = allocate_id("player", players, *id_limit, PlayerId::new, &mut **rng)?;
        inner.players.insert(id, name.to_string());
        inner.names.insert(name.to_string(), id);
        info!(name, player = %id, "registered player");
        Ok(id)
    }

    /// Seat the player in the oldest pending match that accepts them, or in a
    /// new match if none does.
    pub fn join_game(&self, player: PlayerId) -> Result<GameId> {
        let mut inner = self.inner.lock();
        if !inner.players.contains_key(&player) {
            return Err(Error::InvalidPlayerId(player));
        }
        let Index { matches, order, pending, rng, id_limit, .. } = &mut *inner;

        let mut i = 0;
        while i < pending.len() {
            let game_id = pending[i];
            let handle = match matches.get(&game_id) {
                Some(h) => h,
                None => {
                    pending.remove(i);
                    continue;
                }
            };
            let mut game = handle.lock();
            if game.status() != MatchStatus::Pending {
                // Cancelled while waiting
                pending.remove(i);
                continue;
            }
            if let Some(color) = game.join(player, &mut **rng) {
                if game.status() != MatchStatus::Pending {
                    pending.remove(i);
                }
                info!(%player, game = %game_id, %color, "added player to existing game");
                return Ok(game_id);
            }
            i += 1;
        }

        let game_id = allocate_id("game", matches, *id_limit, GameId::new, &mut **rng)?;
        let mut game = Match::new();
        let color = game.join(player, &mut **rng);
        debug_assert!(color.is_some(), "a fresh match always seats its first player");
        matches.insert(game_id, Arc::new(Mutex::new(game)));
        order.push(game_id);
        pending.push_back(game_id);
        info!(%player, game = %game_id, ?color, "added player to new game");
        Ok(game_id)
    }

    /// Handle to a match; the registry lock is released before returning.
    pub fn game(&self, game_id: GameId) -> Result<MatchHandle> {
        self.inner
            .lock()
            .matches
            .get(&game_id)
            .cloned()
            .ok_or(Error::InvalidGameId(game_id))
    }

    pub fn get_status(&self, game_id: GameId) -> Result<MatchStatus> {
        let handle = self.game(game_id)?;
        let status = handle.lock().status();
        debug!(game = %game_id, %status, "found status of game");
        Ok(status)
    }

    pub fn get_state(&self, player: PlayerId, game_id: GameId) -> Result<GameView> {
        let handle = self.game(game_id)?;
        let view = handle.lock().view_for(player)?;
        Ok(view)
    }

    pub fn is_my_turn(&self, player: PlayerId, game_id: GameId) -> Result<bool> {
        let handle = self.game(game_id)?;
        let game = handle.lock();
        let color = game.color_of(player).ok_or(Error::NotAPlayer)?;
        Ok(game.whose_turn() == color)
    }

    /// Make a ply and report the match status afterwards.
    pub fn make_ply(
        &self,
        player: PlayerId,
        game_id: GameId,
        from: Square,
        to: Square,
    ) -> Result<MatchStatus> {
        let handle = self.game(game_id)?;
        let mut game = handle.lock();
        game.make_ply(player, from, to)?;
        Ok(game.status())
    }

    pub fn cancel_game(&self, game_id: GameId) -> Result<()> {
        let handle = self.game(game_id)?;
        handle.lock().cancel()?;
        info!(game = %game_id, "cancelled game");
        Ok(())
    }

    pub fn conclude_game(&self, game_id: GameId, outcome: Outcome) -> Result<()> {
        let handle = self.game(game_id)?;
        let mut game = handle.lock();
        game.conclude(outcome)?;
        info!(game = %game_id, status = %game.status(), "game concluded");
        Ok(())
    }

    pub fn player_name(&self, player: PlayerId) -> Option<String> {
        self.inner.lock().players.get(&player).cloned()
    }

    pub fn player_count(&self) -> usize {
        self.inner.lock().players.len()
    }

    pub fn game_count(&self) -> usize {
        self.inner.lock().matches.len()
    }

    /// Players sorted by id, and games oldest first with each match copied
    /// under its own lock. Both are read under one registry lock so every
    /// seated player is among the returned players.
    pub(crate) fn contents(&self) -> (Vec<(PlayerId, String)>, Vec<(GameId, Match)>) {
        let inner = self.inner.lock();
        let mut players: Vec<(PlayerId, String)> =
            inner.players.iter().map(|(id, name)| (*id, name.clone())).collect();
        players.sort_by_key(|(id, _)| *id);
        let games = inner
            .order
            .iter()
            .filter_map(|id| inner.matches.get(id).map(|h| (*id, h.lock().clone())))
            .collect();
        (players, games)
    }

    /// Assemble a registry from restored parts, refusing anything a live
    /// registry could never have reached.
    pub(crate) fn from_parts(
        players: Vec<(PlayerId, String)>,
        games: Vec<(GameId, Match)>,
        rng: Box<dyn RandomSource>,
    ) -> std::result::Result<Self, String> {
        let mut index = Index {
            players: HashMap::new(),
            names: HashMap::new(),
            matches: HashMap::new(),
            order: Vec::new(),
            pending: VecDeque::new(),
            rng,
            id_limit: MAX_IDS_PER_NAMESPACE,
        };
        for (id, name) in players {
            if index.players.contains_key(&id) || index.names.contains_key(&name) {
                return Err(format!("duplicate player {id} ({name:?})"));
            }
            index.names.insert(name.clone(), id);
            index.players.insert(id, name);
        }
        for (id, game) in games {
            if index.matches.contains_key(&id) {
                return Err(format!("duplicate game {id}"));
            }
            check_seats(id, &game, &index.players)?;
            if game.status() == MatchStatus::Pending {
                index.pending.push_back(id);
            }
            index.matches.insert(id, Arc::new(Mutex::new(game)));
            index.order.push(id);
        }
        Ok(Registry { inner: Mutex::new(index) })
    }
}

fn check_seats(
    id: GameId,
    game: &Match,
    players: &HashMap<PlayerId, String>,
) -> std::result::Result<(), String> {
    let (white, black) = (game.player(Color::White), game.player(Color::Black));
    for seated in [white, black].into_iter().flatten() {
        if !players.contains_key(&seated) {
            return Err(format!("game {id} seats unregistered player {seated}"));
        }
    }
    if let (Some(w), Some(b)) = (white, black) {
        if w == b {
            return Err(format!("game {id} seats player {w} against themselves"));
        }
    }
    let seats = [white, black].iter().filter(|p| p.is_some()).count();
    let status = game.status();
    match status {
        MatchStatus::Pending if seats != 1 => {
            Err(format!("pending game {id} has {seats} players"))
        }
        MatchStatus::Ongoing | MatchStatus::WhiteWon | MatchStatus::BlackWon | MatchStatus::Drawn
            if seats != 2 =>
        {
            Err(format!("{status} game {id} has {seats} players"))
        }
        _ => Ok(()),
    }
}
