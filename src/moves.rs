use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub const BOARD_SIZE: u8 = 8;

/// A square on the board. Rank 0 is White's home rank, file 0 is the a-file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Square {
    rank: u8,
    file: u8,
}

impl Square {
    pub fn new(rank: i64, file: i64) -> Option<Square> {
        let range = 0..BOARD_SIZE as i64;
        if range.contains(&rank) && range.contains(&file) {
            Some(Square { rank: rank as u8, file: file as u8 })
        } else {
            None
        }
    }

    pub fn rank(self) -> u8 {
        self.rank
    }

    pub fn file(self) -> u8 {
        self.file
    }

    pub fn offset(self, d_rank: i8, d_file: i8) -> Option<Square> {
        Square::new(
            self.rank as i64 + d_rank as i64,
            self.file as i64 + d_file as i64,
        )
    }

    /// Iterates every square, rank-major from a1.
    pub fn all() -> impl Iterator<Item = Square> {
        (0..BOARD_SIZE).flat_map(|rank| (0..BOARD_SIZE).map(move |file| Square { rank, file }))
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let file = (b'a' + self.file) as char;
        let rank = (b'1' + self.rank) as char;
        write!(f, "{file}{rank}")
    }
}

impl FromStr for Square {
    type Err = String;

    /// Parse algebraic notation, e.g. "e4"
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = s.as_bytes();
        if bytes.len() != 2 {
            return Err(format!("invalid square {s:?}"));
        }
        let file = bytes[0].wrapping_sub(b'a') as i64;
        let rank = bytes[1].wrapping_sub(b'1') as i64;
        Square::new(rank, file).ok_or_else(|| format!("invalid square {s:?}"))
    }
}

/// One player's move, origin to destination.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "PlyRecord", into = "PlyRecord")]
pub struct Ply {
    pub from: Square,
    pub to: Square,
}

impl Ply {
    pub fn new(from: Square, to: Square) -> Self {
        Ply { from, to }
    }
}

impl fmt::Display for Ply {
    /// UCI-style notation, e.g. "e2e4"
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)
    }
}

impl FromStr for Ply {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 4 || !s.is_ascii() {
            return Err(format!("invalid ply {s:?}"));
        }
        Ok(Ply {
            from: s[..2].parse()?,
            to: s[2..].parse()?,
        })
    }
}

/// Wire form of a ply as it appears in game history.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlyRecord {
    pub from_rank: u8,
    pub from_file: u8,
    pub to_rank: u8,
    pub to_file: u8,
}

impl From<Ply> for PlyRecord {
    fn from(ply: Ply) -> Self {
        PlyRecord {
            from_rank: ply.from.rank,
            from_file: ply.from.file,
            to_rank: ply.to.rank,
            to_file: ply.to.file,
        }
    }
}

impl TryFrom<PlyRecord> for Ply {
    type Error = String;

    fn try_from(r: PlyRecord) -> Result<Self, Self::Error> {
        let from = Square::new(r.from_rank as i64, r.from_file as i64);
        let to = Square::new(r.to_rank as i64, r.to_file as i64);
        match (from, to) {
            (Some(from), Some(to)) => Ok(Ply { from, to }),
            _ => Err(format!("ply {r:?} leaves the board")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn squares_reject_off_board_coordinates() {
        assert!(Square::new(0, 0).is_some());
        assert!(Square::new(7, 7).is_some());
        assert!(Square::new(8, 0).is_none());
        assert!(Square::new(0, -1).is_none());
        assert_eq!(Square::all().count(), 64);
    }

    #[test]
    fn algebraic_notation() {
        let e2: Square = "e2".parse().unwrap();
        assert_eq!((e2.rank(), e2.file()), (1, 4));
        assert_eq!(e2.to_string(), "e2");
        assert!("i1".parse::<Square>().is_err());
        assert!("a9".parse::<Square>().is_err());

        let ply: Ply = "g8f6".parse().unwrap();
        assert_eq!(ply.to_string(), "g8f6");
        assert_eq!((ply.to.rank(), ply.to.file()), (5, 5));
    }

    #[test]
    fn history_wire_form_uses_rank_and_file_keys() {
        let ply: Ply = "e2e4".parse().unwrap();
        let json = serde_json::to_value(ply).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"fromRank": 1, "fromFile": 4, "toRank": 3, "toFile": 4})
        );
        let bad = serde_json::json!({"fromRank": 1, "fromFile": 4, "toRank": 9, "toFile": 4});
        assert!(serde_json::from_value::<Ply>(bad).is_err());
    }
}
