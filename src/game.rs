//! Game state and the turn controller.
//!
//! [`GameState`] is mutated exclusively through [`GameState::place_tile`]
//! and [`GameState::move_tile`]. Both validate fully before touching any
//! state, so a `false` return is always an atomic no-op. Rule violations
//! are reported as `false`/empty results; anything that panics here is an
//! engine bug, not bad input.

use crate::board::{Board, Color, PieceType, Reserve, Tile};
use crate::hex::Coordinate;
use crate::moves::{is_pinned, moves_for};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

// ============================================================================
// Outcome
// ============================================================================

/// Endgame status. A queen surrounded on all six sides loses for its own
/// color; if both queens are surrounded at once the game is a draw rather
/// than a win for whichever queen happens to sit earlier in the tile list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    InProgress,
    Win(Color),
    Draw,
}

// ============================================================================
// GameState
// ============================================================================

/// Full state of one Hive game. Serializes to the wire shape consumed by
/// the server and bridge layers:
/// `{colorToMove, move, tiles, blackReserve, whiteReserve}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    pub color_to_move: Color,
    /// Which move of the game we are on; starts at 1 and advances only
    /// when White completes a turn.
    #[serde(rename = "move")]
    pub move_number: u32,
    #[serde(rename = "tiles")]
    pub board: Board,
    pub black_reserve: Reserve,
    pub white_reserve: Reserve,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    /// An empty board with full reserves, Black to move, move 1.
    pub fn new() -> Self {
        GameState {
            color_to_move: Color::Black,
            move_number: 1,
            board: Board::new(),
            black_reserve: Reserve::default(),
            white_reserve: Reserve::default(),
        }
    }

    #[inline]
    pub fn reserve(&self, color: Color) -> &Reserve {
        match color {
            Color::Black => &self.black_reserve,
            Color::White => &self.white_reserve,
        }
    }

    fn reserve_mut(&mut self, color: Color) -> &mut Reserve {
        match color {
            Color::Black => &mut self.black_reserve,
            Color::White => &mut self.white_reserve,
        }
    }

    /// Whether `color`'s queen bee is on the board.
    pub fn queen_placed(&self, color: Color) -> bool {
        self.board
            .iter()
            .any(|t| t.color == color && t.piece_type == PieceType::QueenBee)
    }

    // ------------------------------------------------------------------
    // Placement
    // ------------------------------------------------------------------

    /// Place a piece from the mover's reserve. Returns `false` and leaves
    /// the state untouched if any placement rule is violated.
    pub fn place_tile(&mut self, position: Coordinate, piece_type: PieceType) -> bool {
        if self.board.is_occupied(position) {
            // Placement starts a new stack, never lands atop one.
            return false;
        }

        let mover = self.color_to_move;

        if !self.queen_placed(mover) && self.move_number == 4 && piece_type != PieceType::QueenBee
        {
            return false;
        }

        if self.reserve(mover).count(piece_type) == 0 {
            return false;
        }

        if self.move_number == 1 {
            // Black's opening placement may go anywhere; White's must touch
            // the single black tile.
            if mover == Color::White {
                let first = self
                    .board
                    .tiles()
                    .first()
                    .expect("a black tile must be on the board by white's first move");
                if !position.adjacent().contains(&first.position) {
                    return false;
                }
            }
        } else {
            let mut touches_own = false;
            let mut touches_opposition = false;

            for adj in position.adjacent() {
                match self.board.top_tile_at(adj) {
                    Some(tile) if tile.color == mover => touches_own = true,
                    Some(_) => touches_opposition = true,
                    None => {}
                }
            }

            if !touches_own || touches_opposition {
                return false;
            }
        }

        self.reserve_mut(mover).take(piece_type);
        self.board.push(Tile {
            color: mover,
            position,
            piece_type,
            stack_height: 0,
        });
        self.advance_turn();

        true
    }

    /// All positions where `color` could legally place a tile under the
    /// steady-state adjacency rule (moves 2 and later): empty perimeter
    /// cells touching at least one of `color`'s tiles and none of the
    /// opponent's. Adjacency is judged by the top tile of each stack.
    pub fn legal_placements(&self, color: Color) -> FxHashSet<Coordinate> {
        let mut candidates: FxHashSet<Coordinate> = FxHashSet::default();
        for tile in self.board.iter() {
            for adj in tile.position.adjacent() {
                if !self.board.is_occupied(adj) {
                    candidates.insert(adj);
                }
            }
        }

        candidates
            .into_iter()
            .filter(|candidate| {
                let mut touches_own = false;
                let mut touches_opposition = false;
                for adj in candidate.adjacent() {
                    match self.board.top_tile_at(adj) {
                        Some(tile) if tile.color == color => touches_own = true,
                        Some(_) => touches_opposition = true,
                        None => {}
                    }
                }
                touches_own && !touches_opposition
            })
            .collect()
    }

    // ------------------------------------------------------------------
    // Movement
    // ------------------------------------------------------------------

    /// Move the top tile at `from` to `to`. Returns `false` and leaves the
    /// state untouched unless `from` holds a mover-owned, unpinned tile and
    /// `to` is in that tile's legal destination set.
    pub fn move_tile(&mut self, from: Coordinate, to: Coordinate) -> bool {
        let Some(index) = self.board.top_tile_index(from) else {
            return false;
        };
        let tile = self.board.tiles()[index];

        if tile.color != self.color_to_move {
            return false;
        }

        if is_pinned(&self.board, &tile) {
            return false;
        }

        let destinations = moves_for(&self.board, tile.color, tile.piece_type, from);
        if !destinations.contains(&to) {
            return false;
        }

        let stack_height = self.board.next_stack_height(to);
        let moved = self.board.tile_mut(index);
        moved.stack_height = stack_height;
        moved.position = to;
        self.advance_turn();

        true
    }

    /// The destination set `move_tile` would validate against: empty if the
    /// cell is empty, the top tile belongs to the opponent, or the tile is
    /// pinned.
    pub fn legal_moves(&self, position: Coordinate) -> Vec<Coordinate> {
        match self.board.top_tile_at(position) {
            Some(tile) if tile.color == self.color_to_move && !is_pinned(&self.board, tile) => {
                moves_for(&self.board, tile.color, tile.piece_type, position)
                    .into_iter()
                    .collect()
            }
            _ => Vec::new(),
        }
    }

    // ------------------------------------------------------------------
    // Turn bookkeeping
    // ------------------------------------------------------------------

    fn increment_move(&mut self) {
        if self.color_to_move == Color::White {
            self.move_number += 1;
        }
        self.color_to_move = self.color_to_move.opponent();
    }

    /// Complete the current turn, then skip the incoming player's turn if
    /// they have no legal action (the forced-pass rule). Skipping checks at
    /// most one full cycle so two simultaneously stuck players cannot spin
    /// the controller forever.
    fn advance_turn(&mut self) {
        self.increment_move();

        for _ in 0..2 {
            if self.must_pass() {
                self.increment_move();
            } else {
                break;
            }
        }
    }

    /// A player is forced to pass when it is past move 1, their queen is
    /// down, and they have neither a legal placement nor a legal movement.
    fn must_pass(&self) -> bool {
        if self.move_number == 1 {
            return false;
        }

        let mover = self.color_to_move;
        if !self.queen_placed(mover) {
            // Queen still in hand: placing her somewhere is the player's
            // problem, not a forced pass.
            return false;
        }

        let can_place =
            !self.reserve(mover).is_empty() && !self.legal_placements(mover).is_empty();
        if can_place {
            return false;
        }

        !self.mover_has_any_movement(mover)
    }

    fn mover_has_any_movement(&self, mover: Color) -> bool {
        for position in self.board.occupied_positions() {
            let top = self
                .board
                .top_tile_at(position)
                .expect("occupied position must have a top tile");
            if top.color != mover || is_pinned(&self.board, top) {
                continue;
            }
            if !moves_for(&self.board, mover, top.piece_type, position).is_empty() {
                return true;
            }
        }
        false
    }

    // ------------------------------------------------------------------
    // Endgame
    // ------------------------------------------------------------------

    /// Check every queen on the board for a full six-cell surround.
    pub fn outcome(&self) -> Outcome {
        let mut black_surrounded = false;
        let mut white_surrounded = false;

        for tile in self.board.iter() {
            if tile.piece_type != PieceType::QueenBee {
                continue;
            }
            let surrounded = tile
                .position
                .adjacent()
                .into_iter()
                .all(|adj| self.board.is_occupied(adj));
            if surrounded {
                match tile.color {
                    Color::Black => black_surrounded = true,
                    Color::White => white_surrounded = true,
                }
            }
        }

        match (black_surrounded, white_surrounded) {
            (true, true) => Outcome::Draw,
            (true, false) => Outcome::Win(Color::White),
            (false, true) => Outcome::Win(Color::Black),
            (false, false) => Outcome::InProgress,
        }
    }

    /// Boolean projection of [`GameState::outcome`] for collaborators:
    /// `(finished, winner)`, with `winner = None` for the draw case.
    pub fn is_over(&self) -> (bool, Option<Color>) {
        match self.outcome() {
            Outcome::InProgress => (false, None),
            Outcome::Win(color) => (true, Some(color)),
            Outcome::Draw => (true, None),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
