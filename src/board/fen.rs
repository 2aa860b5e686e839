//! FEN (Forsyth-Edwards Notation) parsing and rendering (C6, §6).

use std::str::FromStr;

use crate::board::castling;
use crate::board::error::{FenError, MoveParseError};
use crate::board::state::Board;
use crate::types::{Color, File, Move, PieceKind, Position, Rank};

/// The standard initial position, as FEN.
pub const STARTPOS_FEN: &str =
    "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

fn color_label(color: Color) -> &'static str {
    match color {
        Color::White => "white",
        Color::Black => "black",
    }
}

impl Board {
    /// Parse a FEN string, or the literal synonym `"startpos"` (§6: accepted
    /// by a collaborator layer as shorthand for the standard initial FEN).
    pub fn try_from_fen(fen: &str) -> Result<Self, FenError> {
        let fen = fen.trim();
        if fen == "startpos" {
            return Ok(Board::new());
        }

        let mut board = Board::empty();
        let parts: Vec<&str> = fen.split_whitespace().collect();
        if parts.len() < 4 {
            #[cfg(feature = "logging")]
            log::debug!("try_from_fen: too few parts ({}) in {:?}", parts.len(), fen);
            return Err(FenError::TooFewParts { found: parts.len() });
        }

        let rank_groups: Vec<&str> = parts[0].split('/').collect();
        if rank_groups.len() != 8 {
            #[cfg(feature = "logging")]
            log::debug!(
                "try_from_fen: expected 8 rank groups, found {}",
                rank_groups.len()
            );
            return Err(FenError::WrongRankCount {
                found: rank_groups.len(),
            });
        }
        // Piece-list capacity is 32 slots, 16 per color (§3); a rank grouping
        // that sums to 8 per rank says nothing about totals across ranks, so
        // the count has to be checked as pieces are placed rather than
        // trusted from the rank structure alone (§7: parse failure must
        // never panic).
        let mut piece_counts = [0usize; 2];
        let mut king_counts = [0usize; 2];
        for (row, rank_str) in rank_groups.iter().enumerate() {
            // FEN lists rank 8 first; our internal rank index counts up from rank 1.
            let rank = Rank::new(7 - row as u8);
            let mut file = 0u8;
            for c in rank_str.chars() {
                if let Some(digit) = c.to_digit(10) {
                    file += digit as u8;
                    if file > 8 {
                        return Err(FenError::TooManyFiles {
                            rank: row,
                            files: file as usize,
                        });
                    }
                } else {
                    let (color, kind) =
                        PieceKind::from_char(c).ok_or(FenError::InvalidPiece { char: c })?;
                    if file >= 8 {
                        return Err(FenError::TooManyFiles {
                            rank: row,
                            files: file as usize + 1,
                        });
                    }
                    piece_counts[color.index()] += 1;
                    if piece_counts[color.index()] > 16 {
                        return Err(FenError::TooManyPieces {
                            color: color_label(color),
                            count: piece_counts[color.index()],
                        });
                    }
                    if kind == PieceKind::King {
                        king_counts[color.index()] += 1;
                        if king_counts[color.index()] > 1 {
                            return Err(FenError::WrongKingCount {
                                color: color_label(color),
                                count: king_counts[color.index()],
                            });
                        }
                    }
                    board.place(Position::new(File::new(file), rank), color, kind);
                    file += 1;
                }
            }
            if file != 8 {
                return Err(FenError::TooManyFiles {
                    rank: row,
                    files: file as usize,
                });
            }
        }

        if king_counts[Color::White.index()] != 1 {
            return Err(FenError::WrongKingCount {
                color: "white",
                count: king_counts[Color::White.index()],
            });
        }
        if king_counts[Color::Black.index()] != 1 {
            return Err(FenError::WrongKingCount {
                color: "black",
                count: king_counts[Color::Black.index()],
            });
        }

        board.side_to_move = match parts[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => {
                return Err(FenError::InvalidSideToMove {
                    found: other.to_string(),
                })
            }
        };

        for c in parts[2].chars() {
            match c {
                'K' => board.castling_rights |= castling::WHITE_KINGSIDE,
                'Q' => board.castling_rights |= castling::WHITE_QUEENSIDE,
                'k' => board.castling_rights |= castling::BLACK_KINGSIDE,
                'q' => board.castling_rights |= castling::BLACK_QUEENSIDE,
                '-' => {}
                _ => return Err(FenError::InvalidCastling { char: c }),
            }
        }

        board.en_passant_target = if parts[3] == "-" {
            None
        } else {
            Some(
                parts[3]
                    .parse::<Position>()
                    .map_err(|_| FenError::InvalidEnPassant {
                        found: parts[3].to_string(),
                    })?,
            )
        };

        // Move clocks are lenient: a missing or unparseable field falls back
        // to its default rather than failing the whole parse (not part of
        // the §7 FenError contract, which covers placement/side/castling/ep).
        board.halfmove_clock = parts.get(4).and_then(|s| s.parse().ok()).unwrap_or(0);
        board.fullmove_number = parts.get(5).and_then(|s| s.parse().ok()).unwrap_or(1);

        board.hash = board.compute_hash_from_scratch();
        Ok(board)
    }

    /// Render this board as a FEN string (§6). The move-history ring buffer
    /// is not part of FEN (§8, property 3).
    #[must_use]
    pub fn to_fen(&self) -> String {
        let mut rows = Vec::with_capacity(8);
        for row in 0..8u8 {
            let rank = Rank::new(7 - row);
            let mut group = String::new();
            let mut empty = 0u8;
            for file in 0..8u8 {
                let square = Position::new(File::new(file), rank);
                match self.piece_at(square) {
                    Some((color, kind)) => {
                        if empty > 0 {
                            group.push_str(&empty.to_string());
                            empty = 0;
                        }
                        group.push(kind.to_char(color));
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                group.push_str(&empty.to_string());
            }
            rows.push(group);
        }

        let side = match self.side_to_move {
            Color::White => "w",
            Color::Black => "b",
        };

        let mut rights = String::new();
        if self.castling_rights & castling::WHITE_KINGSIDE != 0 {
            rights.push('K');
        }
        if self.castling_rights & castling::WHITE_QUEENSIDE != 0 {
            rights.push('Q');
        }
        if self.castling_rights & castling::BLACK_KINGSIDE != 0 {
            rights.push('k');
        }
        if self.castling_rights & castling::BLACK_QUEENSIDE != 0 {
            rights.push('q');
        }
        if rights.is_empty() {
            rights.push('-');
        }

        let ep = self
            .en_passant_target
            .map_or_else(|| "-".to_string(), |sq| sq.to_string());

        format!(
            "{} {} {} {} {} {}",
            rows.join("/"),
            side,
            rights,
            ep,
            self.halfmove_clock,
            self.fullmove_number
        )
    }

    /// Parse a wire-format move string (`"e2e4"`, `"e7e8q"`) against this
    /// board's legal moves, filling in the bookkeeping fields (`captured`,
    /// `is_castling`, `is_en_passant`) that the bare `Move::from_str` cannot
    /// know without a position to check against.
    pub fn parse_move(&self, s: &str) -> Result<Move, MoveParseError> {
        let wire: Move = s.parse()?;
        self.legal_moves(self.side_to_move)
            .into_iter()
            .find(|mv| mv.from == wire.from && mv.to == wire.to && mv.promotion == wire.promotion)
            .ok_or_else(|| MoveParseError::IllegalMove {
                notation: s.to_string(),
            })
    }

    /// Parse a wire-format move and apply it in one call.
    pub fn apply_move_str(&mut self, s: &str) -> Result<Move, MoveParseError> {
        let mv = self.parse_move(s)?;
        self.apply_move(&mv);
        Ok(mv)
    }
}

impl FromStr for Board {
    type Err = FenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Board::try_from_fen(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn startpos_synonym_matches_new() {
        let parsed = Board::try_from_fen("startpos").unwrap();
        assert_eq!(parsed, Board::new());
    }

    #[test]
    fn parses_standard_fen() {
        let board = Board::try_from_fen(STARTPOS_FEN).unwrap();
        assert_eq!(board, Board::new());
    }

    #[test]
    fn round_trips_through_to_fen() {
        let board = Board::new();
        let rendered = board.to_fen();
        let parsed = Board::try_from_fen(&rendered).unwrap();
        assert_eq!(parsed, board);
    }

    #[test]
    fn round_trips_after_moves() {
        let mut board = Board::new();
        for mv in ["e2e4", "e7e5", "g1f3", "b8c6"] {
            board.apply_move(&mv.parse().unwrap());
        }
        let rendered = board.to_fen();
        let parsed = Board::try_from_fen(&rendered).unwrap();
        assert_eq!(parsed, board);
    }

    #[test]
    fn rejects_bad_piece_char() {
        let fen = "rnbqkbnx/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";
        assert!(matches!(
            Board::try_from_fen(fen),
            Err(FenError::InvalidPiece { char: 'x' })
        ));
    }

    #[test]
    fn rejects_rank_not_summing_to_eight() {
        let fen = "rnbqkbn/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";
        assert!(Board::try_from_fen(fen).is_err());
    }

    #[test]
    fn rejects_bad_side_to_move() {
        let fen = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR x KQkq - 0 1";
        assert!(matches!(
            Board::try_from_fen(fen),
            Err(FenError::InvalidSideToMove { .. })
        ));
    }

    #[test]
    fn en_passant_square_is_parsed() {
        let fen = "rnbqkbnr/pppp1ppp/8/4p3/4P3/8/PPPP1PPP/RNBQKBNR w KQkq e6 0 2";
        let board = Board::try_from_fen(fen).unwrap();
        assert_eq!(board.en_passant_target(), Some("e6".parse().unwrap()));
    }

    #[test]
    fn parse_move_fills_in_bookkeeping() {
        let board = Board::new();
        let mv = board.parse_move("e2e4").unwrap();
        assert!(!mv.is_capture());
        assert!(!mv.is_castling);
    }

    #[test]
    fn parse_move_rejects_illegal_move() {
        let board = Board::new();
        assert!(matches!(
            board.parse_move("e2e5"),
            Err(MoveParseError::IllegalMove { .. })
        ));
    }

    #[test]
    fn from_str_accepts_startpos() {
        let board: Board = "startpos".parse().unwrap();
        assert_eq!(board, Board::new());
    }

    #[test]
    fn rejects_more_than_sixteen_pieces_of_one_color() {
        let fen = "RRRRRRRR/RRRRRRRR/RRRRRRRR/RRRRRRRR/8/8/8/8 w - - 0 1";
        assert!(matches!(
            Board::try_from_fen(fen),
            Err(FenError::TooManyPieces { color: "white", .. })
        ));
    }

    #[test]
    fn rejects_a_kingless_board() {
        let fen = "8/8/8/8/8/8/8/8 w - - 0 1";
        assert!(matches!(
            Board::try_from_fen(fen),
            Err(FenError::WrongKingCount { color: "white", count: 0 })
        ));
    }

    #[test]
    fn rejects_two_kings_of_one_color() {
        let fen = "k7/8/8/8/8/8/8/KK2K3 w - - 0 1";
        assert!(matches!(
            Board::try_from_fen(fen),
            Err(FenError::WrongKingCount { color: "white", count: 2 })
        ));
    }
}
