use std::fmt;
use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::moves::{Ply, Square, BOARD_SIZE};
use crate::piece::{Color, Piece, PieceType};

const QUEEN_SIDE_ROOK_FILE: u8 = 0;
const KING_SIDE_ROOK_FILE: u8 = 7;
const KING_FILE: u8 = 4;

/// Castling availability for one color. Flags only ever go from true to false.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CastlingRights {
    pub queen_side: bool,
    pub king_side: bool,
}

impl CastlingRights {
    pub const NONE: CastlingRights = CastlingRights { queen_side: false, king_side: false };
    pub const BOTH: CastlingRights = CastlingRights { queen_side: true, king_side: true };
}

/// A value held separately for each color.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct PerColor<T> {
    pub white: T,
    pub black: T,
}

impl<T: Copy> PerColor<T> {
    pub fn both(value: T) -> Self {
        PerColor { white: value, black: value }
    }
}

impl<T> Index<Color> for PerColor<T> {
    type Output = T;

    fn index(&self, color: Color) -> &T {
        match color {
            Color::White => &self.white,
            Color::Black => &self.black,
        }
    }
}

impl<T> IndexMut<Color> for PerColor<T> {
    fn index_mut(&mut self, color: Color) -> &mut T {
        match color {
            Color::White => &mut self.white,
            Color::Black => &mut self.black,
        }
    }
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    /// Indexed `[rank][file]`.
    pub layout: [[Option<Piece>; 8]; 8],
    /// `en_passant[color][file]` is set while a pawn of `color` that just
    /// advanced two ranks on `file` can be captured en passant.
    pub en_passant: PerColor<[bool; 8]>,
    pub can_castle: PerColor<CastlingRights>,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Create an empty board with no pieces. Useful for setting up test positions.
    pub fn empty() -> Self {
        Board {
            layout: [[None; 8]; 8],
            en_passant: PerColor::both([false; 8]),
            can_castle: PerColor::both(CastlingRights::NONE),
        }
    }

    pub fn new() -> Self {
        const BACK_RANK: [PieceType; 8] = [
            PieceType::Rook,
            PieceType::Knight,
            PieceType::Bishop,
            PieceType::Queen,
            PieceType::King,
            PieceType::Bishop,
            PieceType::Knight,
            PieceType::Rook,
        ];

        let mut board = Board::empty();
        for color in Color::ALL {
            let home = color.home_rank() as usize;
            let pawns = color.pawn_rank() as usize;
            for (file, piece_type) in BACK_RANK.iter().enumerate() {
                board.layout[home][file] = Some(Piece::new(*piece_type, color));
                board.layout[pawns][file] = Some(Piece::new(PieceType::Pawn, color));
            }
        }
        board.can_castle = PerColor::both(CastlingRights::BOTH);
        board
    }

    pub fn piece_at(&self, sq: Square) -> Option<Piece> {
        self.layout[sq.rank() as usize][sq.file() as usize]
    }

    pub fn set(&mut self, sq: Square, piece: Option<Piece>) {
        self.layout[sq.rank() as usize][sq.file() as usize] = piece;
    }

    fn take(&mut self, sq: Square) -> Option<Piece> {
        self.layout[sq.rank() as usize][sq.file() as usize].take()
    }

    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::all().filter_map(move |sq| self.piece_at(sq).map(|p| (sq, p)))
    }

    pub fn is_legal_move(&self, color: Color, from: Square, to: Square) -> bool {
        self.illegality(color, from, to).is_none()
    }

    /// Validate and, only if legal, make the move. Returns whether the move
    /// was applied; a rejected move leaves every field untouched.
    pub fn apply_move(&mut self, color: Color, from: Square, to: Square) -> bool {
        if let Some(reason) = self.illegality(color, from, to) {
            debug!(%color, %from, %to, reason, "rejected move");
            return false;
        }
        self.execute(color, from, to);
        debug!(%color, %from, %to, "moved piece");
        true
    }

    /// Every legal ply available to `color`.
    pub fn legal_plies(&self, color: Color) -> Vec<Ply> {
        let mut plies = Vec::new();
        for (from, piece) in self.pieces() {
            if piece.color != color {
                continue;
            }
            for to in Square::all() {
                if self.is_legal_move(color, from, to) {
                    plies.push(Ply::new(from, to));
                }
            }
        }
        plies
    }

    /// The first rule the move breaks, if any.
    fn illegality(&self, color: Color, from: Square, to: Square) -> Option<&'static str> {
        let piece = match self.piece_at(from) {
            Some(p) if p.color == color => p,
            Some(_) => return Some("origin holds an opposing piece"),
            None => return Some("origin is empty"),
        };

        if let Some(target) = self.piece_at(to) {
            if target.color == color {
                return Some("cannot capture own piece");
            }
            if target.is(PieceType::King) {
                return Some("kings cannot be captured");
            }
        }

        let d_rank = to.rank() as i8 - from.rank() as i8;
        let d_file = to.file() as i8 - from.file() as i8;

        let shape_ok = match piece.piece_type {
            PieceType::Pawn => self.is_pawn_move(color, from, to),
            PieceType::Knight => {
                matches!((d_rank.abs(), d_file.abs()), (1, 2) | (2, 1))
            }
            PieceType::Bishop => d_rank.abs() == d_file.abs() && self.is_clear_path(from, to),
            PieceType::Rook => (d_rank == 0 || d_file == 0) && self.is_clear_path(from, to),
            PieceType::Queen => {
                (d_rank == 0 || d_file == 0 || d_rank.abs() == d_file.abs())
                    && self.is_clear_path(from, to)
            }
            PieceType::King => {
                (d_rank.abs() <= 1 && d_file.abs() <= 1) || self.is_castle(color, from, to)
            }
        };

        if shape_ok {
            None
        } else {
            Some("piece cannot move that way")
        }
    }

    fn is_pawn_move(&self, color: Color, from: Square, to: Square) -> bool {
        let dir = color.forward();
        let d_rank = to.rank() as i8 - from.rank() as i8;
        let d_file = to.file() as i8 - from.file() as i8;
        let target_empty = self.piece_at(to).is_none();

        match (d_rank, d_file.abs()) {
            // Single push
            (r, 0) if r == dir => target_empty,
            // Double push from the starting rank over an empty square
            (r, 0) if r == 2 * dir => {
                from.rank() == color.pawn_rank()
                    && target_empty
                    && from
                        .offset(dir, 0)
                        .map(|mid| self.piece_at(mid).is_none())
                        .unwrap_or(false)
            }
            // Diagonal capture, possibly en passant
            (r, 1) if r == dir => !target_empty || self.is_en_passant_capture(color, from, to),
            _ => false,
        }
    }

    /// Whether a diagonal pawn step from `from` to `to` captures en passant.
    fn is_en_passant_capture(&self, color: Color, from: Square, to: Square) -> bool {
        let enemy = color.opposite();
        // The square the enemy pawn skipped over on its double advance.
        let skipped_rank = (enemy.pawn_rank() as i8 + enemy.forward()) as u8;
        if to.rank() != skipped_rank || self.piece_at(to).is_some() {
            return false;
        }
        if !self.en_passant[enemy][to.file() as usize] {
            return false;
        }
        Square::new(from.rank() as i64, to.file() as i64)
            .and_then(|sq| self.piece_at(sq))
            .map(|p| p == Piece::new(PieceType::Pawn, enemy))
            .unwrap_or(false)
    }

    /// A two-file king step along the home rank toward a rook that still has
    /// its castling right, with nothing in between.
    fn is_castle(&self, color: Color, from: Square, to: Square) -> bool {
        let home = color.home_rank();
        if from.rank() != home || to.rank() != home || from.file() != KING_FILE {
            return false;
        }
        let rights = self.can_castle[color];
        let (allowed, rook_file) = match to.file() as i8 - from.file() as i8 {
            2 => (rights.king_side, KING_SIDE_ROOK_FILE),
            -2 => (rights.queen_side, QUEEN_SIDE_ROOK_FILE),
            _ => return false,
        };
        if !allowed {
            return false;
        }
        let rook_sq = match Square::new(home as i64, rook_file as i64) {
            Some(sq) => sq,
            None => return false,
        };
        self.piece_at(rook_sq) == Some(Piece::new(PieceType::Rook, color))
            && self.is_clear_path(from, rook_sq)
    }

    /// True if every square strictly between `from` and `to` is empty.
    /// Only meaningful for straight or diagonal lines.
    fn is_clear_path(&self, from: Square, to: Square) -> bool {
        let step_rank = (to.rank() as i8 - from.rank() as i8).signum();
        let step_file = (to.file() as i8 - from.file() as i8).signum();
        let mut cursor = from.offset(step_rank, step_file);
        while let Some(sq) = cursor {
            if sq == to {
                return true;
            }
            if self.piece_at(sq).is_some() {
                return false;
            }
            cursor = sq.offset(step_rank, step_file);
        }
        false
    }

    /// Make a move already known to be legal.
    fn execute(&mut self, color: Color, from: Square, to: Square) {
        let en_passant_capture = self.is_en_passant_capture(color, from, to);
        let piece = match self.take(from) {
            Some(p) => p,
            None => return,
        };

        self.en_passant[color] = [false; BOARD_SIZE as usize];

        // Update castling rights
        match piece.piece_type {
            PieceType::King => self.can_castle[color] = CastlingRights::NONE,
            PieceType::Rook if from.rank() == color.home_rank() => match from.file() {
                QUEEN_SIDE_ROOK_FILE => self.can_castle[color].queen_side = false,
                KING_SIDE_ROOK_FILE => self.can_castle[color].king_side = false,
                _ => {}
            },
            _ => {}
        }
        // A rook captured in its corner takes the opponent's right with it
        let enemy = color.opposite();
        if to.rank() == enemy.home_rank() {
            match to.file() {
                QUEEN_SIDE_ROOK_FILE => self.can_castle[enemy].queen_side = false,
                KING_SIDE_ROOK_FILE => self.can_castle[enemy].king_side = false,
                _ => {}
            }
        }

        let d_rank = to.rank() as i8 - from.rank() as i8;
        let d_file = to.file() as i8 - from.file() as i8;

        if piece.is(PieceType::Pawn) && d_rank.abs() == 2 {
            self.en_passant[color][from.file() as usize] = true;
        }

        // A double-advanced pawn taken outright can no longer be passed
        if self.piece_at(to) == Some(Piece::new(PieceType::Pawn, enemy)) {
            self.en_passant[enemy][to.file() as usize] = false;
        }
        self.set(to, Some(piece));

        // Castling: bring the rook across the king
        if piece.is(PieceType::King) && d_file.abs() == 2 {
            let (rook_from, rook_to) = if d_file > 0 {
                (KING_SIDE_ROOK_FILE, KING_FILE + 1)
            } else {
                (QUEEN_SIDE_ROOK_FILE, KING_FILE - 1)
            };
            let rank = from.rank() as i64;
            if let (Some(rf), Some(rt)) = (
                Square::new(rank, rook_from as i64),
                Square::new(rank, rook_to as i64),
            ) {
                let rook = self.take(rf);
                self.set(rt, rook);
            }
        }

        if en_passant_capture {
            if let Some(victim) = Square::new(from.rank() as i64, to.file() as i64) {
                self.set(victim, None);
            }
            self.en_passant[enemy][to.file() as usize] = false;
        }
    }
}

impl fmt::Display for Board {
    /// Text diagram from White's side, rank 8 at the top.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in (0..BOARD_SIZE as usize).rev() {
            write!(f, "{} ", rank + 1)?;
            for file in 0..BOARD_SIZE as usize {
                match self.layout[rank][file] {
                    Some(p) => write!(f, "{p} ")?,
                    None => write!(f, ". ")?,
                }
            }
            writeln!(f)?;
        }
        write!(f, "  a b c d e f g h")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        s.parse().unwrap()
    }

    /// Helper: make a move from algebraic-style coordinates.
    fn play(board: &mut Board, color: Color, ply: &str) {
        let ply: Ply = ply.parse().unwrap();
        assert!(board.apply_move(color, ply.from, ply.to), "{ply} should be legal for {color}\n{board}");
    }

    fn place(board: &mut Board, at: &str, piece_type: PieceType, color: Color) {
        board.set(sq(at), Some(Piece::new(piece_type, color)));
    }

    #[test]
    fn starting_position_holds_thirty_two_pieces() {
        let board = Board::new();
        assert_eq!(board.pieces().count(), 32);
        assert_eq!(board.piece_at(sq("e1")), Some(Piece::new(PieceType::King, Color::White)));
        assert_eq!(board.piece_at(sq("d8")), Some(Piece::new(PieceType::Queen, Color::Black)));
        assert_eq!(board.can_castle, PerColor::both(CastlingRights::BOTH));
        assert_eq!(board.en_passant, PerColor::both([false; 8]));
        assert_eq!(board.legal_plies(Color::White).len(), 20);
        assert_eq!(board.legal_plies(Color::Black).len(), 20);
    }

    #[test]
    fn origin_and_destination_ownership() {
        let board = Board::new();
        // Empty origin
        assert!(!board.is_legal_move(Color::White, sq("e4"), sq("e5")));
        // Opponent's piece
        assert!(!board.is_legal_move(Color::White, sq("e7"), sq("e6")));
        // Own piece on destination
        assert!(!board.is_legal_move(Color::White, sq("a1"), sq("a2")));
        assert!(!board.is_legal_move(Color::White, sq("e1"), sq("e1")));
    }

    #[test]
    fn double_advance_sets_flag_for_one_ply() {
        let mut board = Board::new();
        play(&mut board, Color::White, "e2e4");
        assert!(board.en_passant[Color::White][4]);
        assert_eq!(board.en_passant[Color::White].iter().filter(|f| **f).count(), 1);

        // Black's ply leaves White's flag alone
        play(&mut board, Color::Black, "g8f6");
        assert!(board.en_passant[Color::White][4]);

        // White's next ply clears it regardless of where it goes
        play(&mut board, Color::White, "b1c3");
        assert_eq!(board.en_passant[Color::White], [false; 8]);
    }

    #[test]
    fn double_advance_needs_clear_path_and_start_rank() {
        let mut board = Board::new();
        place(&mut board, "e3", PieceType::Knight, Color::Black);
        assert!(!board.is_legal_move(Color::White, sq("e2"), sq("e4")));
        assert!(!board.is_legal_move(Color::White, sq("e2"), sq("e3")));

        let mut board = Board::new();
        place(&mut board, "d4", PieceType::Knight, Color::Black);
        assert!(!board.is_legal_move(Color::White, sq("d2"), sq("d4")));
        assert!(board.is_legal_move(Color::White, sq("d2"), sq("d3")));

        let mut board = Board::new();
        play(&mut board, Color::White, "a2a3");
        assert!(!board.is_legal_move(Color::White, sq("a3"), sq("a5")));
        assert!(!board.en_passant[Color::White][0]);
    }

    #[test]
    fn pawn_diagonal_needs_a_capture() {
        let mut board = Board::new();
        assert!(!board.is_legal_move(Color::White, sq("e2"), sq("d3")));
        place(&mut board, "d3", PieceType::Bishop, Color::Black);
        assert!(board.is_legal_move(Color::White, sq("e2"), sq("d3")));
        // Pawns never move backward
        assert!(!board.is_legal_move(Color::Black, sq("e7"), sq("e8")));
    }

    #[test]
    fn en_passant_removes_the_passed_pawn() {
        let mut board = Board::new();
        play(&mut board, Color::White, "e2e4");
        play(&mut board, Color::Black, "a7a6");
        play(&mut board, Color::White, "e4e5");
        play(&mut board, Color::Black, "d7d5");
        assert!(board.en_passant[Color::Black][3]);

        play(&mut board, Color::White, "e5d6");
        assert_eq!(board.piece_at(sq("d6")), Some(Piece::new(PieceType::Pawn, Color::White)));
        assert_eq!(board.piece_at(sq("d5")), None);
        assert_eq!(board.piece_at(sq("e5")), None);
        assert!(!board.en_passant[Color::Black][3]);
    }

    #[test]
    fn capturing_a_passed_pawn_outright_clears_its_flag() {
        let mut board = Board::new();
        play(&mut board, Color::White, "h2h3");
        play(&mut board, Color::Black, "g8f6");
        play(&mut board, Color::White, "e2e4");
        assert!(board.en_passant[Color::White][4]);

        play(&mut board, Color::Black, "f6e4");
        assert_eq!(board.piece_at(sq("e4")), Some(Piece::new(PieceType::Knight, Color::Black)));
        assert_eq!(board.en_passant[Color::White], [false; 8]);
    }

    #[test]
    fn en_passant_requires_the_flag() {
        let mut board = Board::new();
        play(&mut board, Color::White, "e2e4");
        play(&mut board, Color::Black, "d7d6");
        play(&mut board, Color::White, "e4e5");
        play(&mut board, Color::Black, "d6d5");
        // Two single steps never set the flag
        assert!(!board.is_legal_move(Color::White, sq("e5"), sq("d6")));

        let mut board = Board::new();
        play(&mut board, Color::White, "e2e4");
        play(&mut board, Color::Black, "a7a6");
        play(&mut board, Color::White, "e4e5");
        play(&mut board, Color::Black, "d7d5");
        play(&mut board, Color::White, "h2h3");
        play(&mut board, Color::Black, "a6a5");
        // The chance expired with Black's next ply
        assert!(!board.is_legal_move(Color::White, sq("e5"), sq("d6")));
    }

    #[test]
    fn black_captures_en_passant_too() {
        let mut board = Board::new();
        play(&mut board, Color::White, "h2h3");
        play(&mut board, Color::Black, "c7c5");
        play(&mut board, Color::White, "h3h4");
        play(&mut board, Color::Black, "c5c4");
        play(&mut board, Color::White, "d2d4");
        play(&mut board, Color::Black, "c4d3");
        assert_eq!(board.piece_at(sq("d4")), None);
        assert_eq!(board.piece_at(sq("d3")), Some(Piece::new(PieceType::Pawn, Color::Black)));
    }

    #[test]
    fn king_move_revokes_both_castling_rights() {
        let mut board = Board::new();
        play(&mut board, Color::White, "e2e4");
        play(&mut board, Color::Black, "e7e5");
        play(&mut board, Color::White, "e1e2");
        assert_eq!(board.can_castle[Color::White], CastlingRights::NONE);
        assert_eq!(board.can_castle[Color::Black], CastlingRights::BOTH);

        // Returning home does not restore them
        play(&mut board, Color::Black, "a7a6");
        play(&mut board, Color::White, "e2e1");
        assert_eq!(board.can_castle[Color::White], CastlingRights::NONE);
    }

    #[test]
    fn rook_move_revokes_only_its_side() {
        let mut board = Board::new();
        play(&mut board, Color::White, "a2a4");
        play(&mut board, Color::Black, "h7h5");
        play(&mut board, Color::White, "a1a3");
        assert_eq!(
            board.can_castle[Color::White],
            CastlingRights { queen_side: false, king_side: true }
        );
        play(&mut board, Color::Black, "h8h6");
        assert_eq!(
            board.can_castle[Color::Black],
            CastlingRights { queen_side: true, king_side: false }
        );
    }

    #[test]
    fn castling_moves_king_and_rook() {
        let mut board = Board::empty();
        place(&mut board, "e1", PieceType::King, Color::White);
        place(&mut board, "a1", PieceType::Rook, Color::White);
        place(&mut board, "h1", PieceType::Rook, Color::White);
        place(&mut board, "e8", PieceType::King, Color::Black);
        board.can_castle[Color::White] = CastlingRights::BOTH;

        let mut king_side = board.clone();
        play(&mut king_side, Color::White, "e1g1");
        assert_eq!(king_side.piece_at(sq("g1")), Some(Piece::new(PieceType::King, Color::White)));
        assert_eq!(king_side.piece_at(sq("f1")), Some(Piece::new(PieceType::Rook, Color::White)));
        assert_eq!(king_side.piece_at(sq("h1")), None);
        assert_eq!(king_side.can_castle[Color::White], CastlingRights::NONE);

        let mut queen_side = board.clone();
        play(&mut queen_side, Color::White, "e1c1");
        assert_eq!(queen_side.piece_at(sq("c1")), Some(Piece::new(PieceType::King, Color::White)));
        assert_eq!(queen_side.piece_at(sq("d1")), Some(Piece::new(PieceType::Rook, Color::White)));
        assert_eq!(queen_side.piece_at(sq("a1")), None);
    }

    #[test]
    fn castling_needs_right_and_empty_squares() {
        let board = Board::new();
        assert!(!board.is_legal_move(Color::White, sq("e1"), sq("g1")));

        let mut board = Board::empty();
        place(&mut board, "e8", PieceType::King, Color::Black);
        place(&mut board, "a8", PieceType::Rook, Color::Black);
        place(&mut board, "b8", PieceType::Knight, Color::Black);
        place(&mut board, "h8", PieceType::Rook, Color::Black);
        place(&mut board, "e1", PieceType::King, Color::White);
        board.can_castle[Color::Black] = CastlingRights { queen_side: true, king_side: false };

        // Knight on b8 blocks the queen side, the king side right is gone
        assert!(!board.is_legal_move(Color::Black, sq("e8"), sq("c8")));
        assert!(!board.is_legal_move(Color::Black, sq("e8"), sq("g8")));
        board.set(sq("b8"), None);
        assert!(board.is_legal_move(Color::Black, sq("e8"), sq("c8")));
        // Three files is never a king move
        assert!(!board.is_legal_move(Color::Black, sq("e8"), sq("b8")));
    }

    #[test]
    fn sliding_pieces_stop_at_blockers() {
        let mut board = Board::empty();
        place(&mut board, "d4", PieceType::Queen, Color::White);
        place(&mut board, "d6", PieceType::Pawn, Color::White);
        place(&mut board, "f6", PieceType::Pawn, Color::Black);
        place(&mut board, "a1", PieceType::Bishop, Color::Black);

        assert!(board.is_legal_move(Color::White, sq("d4"), sq("d5")));
        assert!(!board.is_legal_move(Color::White, sq("d4"), sq("d7")));
        assert!(board.is_legal_move(Color::White, sq("d4"), sq("f6")));
        assert!(!board.is_legal_move(Color::White, sq("d4"), sq("g7")));
        assert!(board.is_legal_move(Color::White, sq("d4"), sq("h4")));
        assert!(!board.is_legal_move(Color::White, sq("d4"), sq("e6")));

        assert!(board.is_legal_move(Color::Black, sq("a1"), sq("d4")));
        assert!(!board.is_legal_move(Color::Black, sq("a1"), sq("a2")));
    }

    #[test]
    fn knights_jump() {
        let board = Board::new();
        assert!(board.is_legal_move(Color::White, sq("g1"), sq("f3")));
        assert!(board.is_legal_move(Color::Black, sq("b8"), sq("c6")));
        assert!(!board.is_legal_move(Color::White, sq("g1"), sq("g3")));
    }

    #[test]
    fn kings_are_never_captured() {
        let mut board = Board::empty();
        place(&mut board, "e1", PieceType::King, Color::White);
        place(&mut board, "e8", PieceType::King, Color::Black);
        place(&mut board, "e4", PieceType::Rook, Color::Black);
        assert!(!board.is_legal_move(Color::Black, sq("e4"), sq("e1")));
        assert!(board.is_legal_move(Color::Black, sq("e4"), sq("e2")));
    }

    #[test]
    fn rejected_move_leaves_board_untouched() {
        let mut board = Board::new();
        play(&mut board, Color::White, "e2e4");
        let before = board.clone();
        for (from, to) in [("e4", "e6"), ("d1", "d3"), ("a8", "a6"), ("e1", "g1"), ("c3", "c4")] {
            assert!(!board.apply_move(Color::White, sq(from), sq(to)));
            assert_eq!(board, before);
        }
    }

    #[test]
    fn board_round_trips_through_json() {
        let mut board = Board::new();
        play(&mut board, Color::White, "e2e4");
        let json = serde_json::to_value(&board).unwrap();
        assert_eq!(json["enPassant"]["WHITE"][4], true);
        assert_eq!(json["canCastle"]["BLACK"]["kingSide"], true);
        assert_eq!(json["layout"][3][4]["pieceType"], "PAWN");
        let back: Board = serde_json::from_value(json).unwrap();
        assert_eq!(back, board);
    }
}
