//! Pinning, sliding, and the seven per-piece move generators.
//!
//! Every generator takes the piece's current position and returns the full
//! set of destination coordinates legal for that piece type on the current
//! board, with duplicates collapsed and the origin excluded. Generators are
//! pure queries; the turn controller in [`crate::game`] owns all mutation.

use crate::board::{Board, Color, PieceType, Tile};
use crate::hex::{Coordinate, ADJACENT_OFFSETS};
use arrayvec::ArrayVec;
use rustc_hash::FxHashSet;
use std::collections::VecDeque;

/// Greatest straight-line distance a grasshopper could ever need to jump
/// with every tile of both colors in one contiguous run, plus one.
const GRASSHOPPER_RANGE: i64 = 26;

const SPIDER_MOVE_DISTANCE: usize = 3;

// ============================================================================
// Connectivity / pinning
// ============================================================================

/// Whether moving `tile` is ruled out by the board structure: a buried tile
/// can never move, and a ground-level tile whose removal would split the
/// hive into more than one connected component is pinned (the One-Hive
/// Rule).
pub fn is_pinned(board: &Board, tile: &Tile) -> bool {
    let top = board
        .top_tile_at(tile.position)
        .expect("pinning query for a tile that is not on the board");

    if tile.stack_height != top.stack_height {
        // Something is stacked above this tile.
        return true;
    }

    if tile.stack_height > 0 {
        // On top of a stack: the cell below stays occupied, so removing
        // this tile cannot disconnect anything.
        return false;
    }

    // Flood-fill the occupied positions with `tile`'s cell removed. The
    // search starts from whichever stack happens to sit at an adjacent
    // position, regardless of its height.
    let start = tile
        .position
        .adjacent()
        .into_iter()
        .find(|adj| board.is_occupied(*adj));

    let Some(start) = start else {
        // A lone tile with no neighbors is trivially free.
        return false;
    };

    let mut seen: FxHashSet<Coordinate> = FxHashSet::default();
    let mut queue: VecDeque<Coordinate> = VecDeque::new();
    queue.push_back(start);

    while let Some(position) = queue.pop_front() {
        if !seen.insert(position) {
            continue;
        }

        for adj in position.adjacent() {
            if adj == tile.position {
                continue;
            }
            if board.is_occupied(adj) && !seen.contains(&adj) {
                queue.push_back(adj);
            }
        }
    }

    seen.len() != board.occupied_positions().len() - 1
}

// ============================================================================
// Sliding
// ============================================================================

/// Single-step slide targets from `position`: the shared primitive behind
/// Queen, Ant, and Spider movement. `ignore` is the cell of the piece that
/// is mid-move, treated as empty for every occupancy check.
///
/// A neighbor qualifies when it is unoccupied, stays in contact with the
/// hive through a tile adjacent to both cells, and at least one of the two
/// cells flanking the slide direction is free (the "freedom to move" gate —
/// a piece cannot squeeze through a gap walled on both sides).
pub fn adjacent_slide_targets(
    board: &Board,
    position: Coordinate,
    ignore: Coordinate,
) -> ArrayVec<Coordinate, 6> {
    let neighbors = position.adjacent();

    let mut filled: ArrayVec<Coordinate, 6> = ArrayVec::new();
    for neighbor in neighbors {
        if neighbor != ignore && board.is_occupied(neighbor) {
            filled.push(neighbor);
        }
    }

    let mut targets: ArrayVec<Coordinate, 6> = ArrayVec::new();

    for neighbor in neighbors {
        if filled.contains(&neighbor) {
            continue;
        }

        // Contact: the slide must keep touching the hive via a tile that
        // borders both the current cell and the target.
        let keeps_contact = neighbor
            .adjacent()
            .into_iter()
            .any(|n| filled.contains(&n));
        if !keeps_contact {
            continue;
        }

        // Freedom to move: both flanking cells occupied means the gap is
        // physically impassable.
        let direction = neighbor - position;
        let clockwise = direction.rotate_cw() + position;
        let anticlockwise = direction.rotate_ccw() + position;

        if filled.contains(&clockwise) && filled.contains(&anticlockwise) {
            continue;
        }

        targets.push(neighbor);
    }

    targets
}

// ============================================================================
// Per-piece generators
// ============================================================================

/// Queen bee: a single slide step.
pub fn queen_bee_moves(board: &Board, from: Coordinate) -> FxHashSet<Coordinate> {
    adjacent_slide_targets(board, from, from).into_iter().collect()
}

/// Soldier ant: the breadth-first closure of slide steps, arbitrarily far
/// around the hive perimeter. The origin is excluded even when the closure
/// walks all the way around.
pub fn soldier_ant_moves(board: &Board, from: Coordinate) -> FxHashSet<Coordinate> {
    let mut seen: FxHashSet<Coordinate> = FxHashSet::default();
    let mut queue: VecDeque<Coordinate> = VecDeque::new();
    queue.push_back(from);

    while let Some(position) = queue.pop_front() {
        if !seen.insert(position) {
            continue;
        }
        for next in adjacent_slide_targets(board, position, from) {
            if !seen.contains(&next) {
                queue.push_back(next);
            }
        }
    }

    seen.remove(&from);
    seen
}

/// Spider: exactly three slide steps, never revisiting a position already
/// used on the same path. Each branch carries its own history — the same
/// cell may legitimately appear on two different branches.
pub fn spider_moves(board: &Board, from: Coordinate) -> FxHashSet<Coordinate> {
    struct Branch {
        position: Coordinate,
        visited: ArrayVec<Coordinate, SPIDER_MOVE_DISTANCE>,
    }

    let mut branches = vec![Branch {
        position: from,
        visited: ArrayVec::new(),
    }];

    for _ in 0..SPIDER_MOVE_DISTANCE {
        let mut next_generation = Vec::with_capacity(branches.len() * 2);

        for branch in &branches {
            for step in adjacent_slide_targets(board, branch.position, from) {
                if branch.visited.contains(&step) {
                    continue;
                }
                let mut visited = branch.visited.clone();
                visited.push(branch.position);
                next_generation.push(Branch {
                    position: step,
                    visited,
                });
            }
        }

        branches = next_generation;
    }

    branches
        .into_iter()
        .map(|b| b.position)
        .filter(|p| *p != from)
        .collect()
}

/// Grasshopper: jump in a straight line over the adjacent run of occupied
/// cells, landing on the first empty cell past the run. Directions with no
/// immediate neighbor produce no move.
pub fn grasshopper_moves(board: &Board, from: Coordinate) -> FxHashSet<Coordinate> {
    let mut moves = FxHashSet::default();

    for offset in ADJACENT_OFFSETS {
        if !board.is_occupied(from + offset) {
            continue;
        }

        // i = 1 is the occupied neighbor we just checked.
        let mut landed = false;
        for i in 2..=GRASSHOPPER_RANGE {
            let cell = from + offset * i;
            if !board.is_occupied(cell) {
                moves.insert(cell);
                landed = true;
                break;
            }
        }

        if !landed {
            // With 26 tiles in play a run longer than the board is impossible.
            panic!("grasshopper found no landing cell within {GRASSHOPPER_RANGE} cells; tile list is corrupt");
        }
    }

    moves
}

/// Ladybug: two hops across the tops of occupied cells, then one hop down
/// onto an empty cell. Paths never revisit a cell, but different two-hop
/// paths may reach the same drop-off.
pub fn ladybug_moves(board: &Board, from: Coordinate) -> FxHashSet<Coordinate> {
    struct Branch {
        position: Coordinate,
        visited: ArrayVec<Coordinate, 2>,
    }

    let mut branches = vec![Branch {
        position: from,
        visited: ArrayVec::new(),
    }];

    for _ in 0..2 {
        let mut next_generation = Vec::with_capacity(branches.len() * 2);

        for branch in &branches {
            for adj in branch.position.adjacent() {
                if !board.is_occupied(adj) || branch.visited.contains(&adj) {
                    continue;
                }
                let mut visited = branch.visited.clone();
                visited.push(branch.position);
                next_generation.push(Branch {
                    position: adj,
                    visited,
                });
            }
        }

        branches = next_generation;
    }

    // The ladybug is on top of a stack after two hops, so any empty
    // neighbor is a legal drop-off.
    let mut moves = FxHashSet::default();
    for branch in &branches {
        for adj in branch.position.adjacent() {
            if !board.is_occupied(adj) {
                moves.insert(adj);
            }
        }
    }

    moves
}

/// The beetle's raw step pattern: climb onto any occupied neighbor, or
/// slide around the rim to the cells reached by rotating an occupied
/// direction 60° either way. The freedom-to-move gate does not apply — a
/// beetle crosses gaps by walking over the top.
fn beetle_step_targets(board: &Board, from: Coordinate) -> FxHashSet<Coordinate> {
    let mut moves: FxHashSet<Coordinate> = FxHashSet::default();

    for adj in from.adjacent() {
        if board.is_occupied(adj) {
            moves.insert(adj);
        }
    }

    for occupied in moves.clone() {
        let direction = occupied - from;
        moves.insert(direction.rotate_cw() + from);
        moves.insert(direction.rotate_ccw() + from);
    }

    moves
}

/// Beetle: the step pattern above, consulted only while a beetle of the
/// moving color is actually on the board.
pub fn beetle_moves(board: &Board, mover: Color, from: Coordinate) -> FxHashSet<Coordinate> {
    let has_own_beetle = board
        .iter()
        .any(|t| t.color == mover && t.piece_type == PieceType::Beetle);

    if !has_own_beetle {
        return FxHashSet::default();
    }

    beetle_step_targets(board, from)
}

/// Mosquito: on top of a stack it moves exactly like a beetle; on the
/// ground it borrows the move set of every neighboring piece type. Other
/// mosquitoes are never mimicked, which keeps the dispatch finite.
pub fn mosquito_moves(board: &Board, mover: Color, from: Coordinate) -> FxHashSet<Coordinate> {
    let own = board
        .top_tile_at(from)
        .expect("mosquito move query for an empty cell");

    if own.stack_height > 0 {
        return beetle_step_targets(board, from);
    }

    let mut neighbor_types: ArrayVec<PieceType, 7> = ArrayVec::new();
    for tile in board.iter() {
        if from.adjacent().contains(&tile.position) && !neighbor_types.contains(&tile.piece_type) {
            neighbor_types.push(tile.piece_type);
        }
    }

    let mut moves = FxHashSet::default();
    for piece_type in neighbor_types {
        if piece_type == PieceType::Mosquito {
            continue;
        }
        moves.extend(moves_for(board, mover, piece_type, from));
    }

    moves
}

/// Dispatch on the closed piece-type set.
pub fn moves_for(
    board: &Board,
    mover: Color,
    piece_type: PieceType,
    from: Coordinate,
) -> FxHashSet<Coordinate> {
    match piece_type {
        PieceType::QueenBee => queen_bee_moves(board, from),
        PieceType::SoldierAnt => soldier_ant_moves(board, from),
        PieceType::Grasshopper => grasshopper_moves(board, from),
        PieceType::Spider => spider_moves(board, from),
        PieceType::Beetle => beetle_moves(board, mover, from),
        PieceType::Ladybug => ladybug_moves(board, from),
        PieceType::Mosquito => mosquito_moves(board, mover, from),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn board_with(tiles: &[(Color, PieceType, i64, i64, u32)]) -> Board {
        let mut board = Board::new();
        for &(color, piece_type, q, r, stack_height) in tiles {
            board.push(Tile {
                color,
                piece_type,
                position: Coordinate::new(q, r),
                stack_height,
            });
        }
        board
    }

    fn coords(set: &FxHashSet<Coordinate>) -> Vec<(i64, i64)> {
        let mut v: Vec<(i64, i64)> = set.iter().map(|c| (c.q, c.r)).collect();
        v.sort();
        v
    }

    // A straight line of four tiles: W at -2,-1 and B at 0,1 on the q axis.
    fn line_of_four() -> Board {
        board_with(&[
            (Color::Black, PieceType::QueenBee, 0, 0, 0),
            (Color::White, PieceType::QueenBee, -1, 0, 0),
            (Color::Black, PieceType::SoldierAnt, 1, 0, 0),
            (Color::White, PieceType::SoldierAnt, -2, 0, 0),
        ])
    }

    #[test]
    fn test_interior_tile_is_pinned() {
        let board = line_of_four();
        let queen = board.top_tile_at(Coordinate::new(0, 0)).copied().unwrap();
        assert!(is_pinned(&board, &queen));
    }

    #[test]
    fn test_end_tile_is_not_pinned() {
        let board = line_of_four();
        let ant = board.top_tile_at(Coordinate::new(1, 0)).copied().unwrap();
        assert!(!is_pinned(&board, &ant));
    }

    #[test]
    fn test_lone_tile_is_not_pinned() {
        let board = board_with(&[(Color::Black, PieceType::QueenBee, 0, 0, 0)]);
        let queen = board.top_tile_at(Coordinate::new(0, 0)).copied().unwrap();
        assert!(!is_pinned(&board, &queen));
    }

    #[test]
    fn test_buried_tile_is_pinned() {
        let board = board_with(&[
            (Color::Black, PieceType::QueenBee, 0, 0, 0),
            (Color::White, PieceType::Beetle, 0, 0, 1),
            (Color::Black, PieceType::SoldierAnt, 1, 0, 0),
        ]);
        let queen = board
            .iter()
            .find(|t| t.piece_type == PieceType::QueenBee)
            .copied()
            .unwrap();
        assert!(is_pinned(&board, &queen));
    }

    #[test]
    fn test_tile_atop_stack_is_not_pinned() {
        // The beetle sits on the queen; even though the hive hangs together
        // through that cell, the cell stays occupied after the beetle moves.
        let board = board_with(&[
            (Color::Black, PieceType::QueenBee, 0, 0, 0),
            (Color::White, PieceType::Beetle, 0, 0, 1),
            (Color::Black, PieceType::SoldierAnt, 1, 0, 0),
            (Color::White, PieceType::QueenBee, -1, 0, 0),
        ]);
        let beetle = board
            .iter()
            .find(|t| t.piece_type == PieceType::Beetle)
            .copied()
            .unwrap();
        assert!(!is_pinned(&board, &beetle));
    }

    #[test]
    fn test_slide_targets_two_tiles() {
        // Two adjacent tiles: each can slide to the two cells flanking the
        // shared edge.
        let board = board_with(&[
            (Color::Black, PieceType::QueenBee, 0, 0, 0),
            (Color::White, PieceType::QueenBee, 1, 0, 0),
        ]);
        let targets = adjacent_slide_targets(&board, Coordinate::new(0, 0), Coordinate::new(0, 0));
        let mut got: Vec<(i64, i64)> = targets.iter().map(|c| (c.q, c.r)).collect();
        got.sort();
        assert_eq!(got, vec![(0, 1), (1, -1)]);
    }

    #[test]
    fn test_slide_freedom_gate_blocks_squeeze() {
        // Tiles at (1,-1) and (0,1) flank the slide from (0,0) toward (1,0):
        // with both flanks filled the gap is impassable even though (1,0)
        // touches the hive.
        let board = board_with(&[
            (Color::Black, PieceType::QueenBee, 0, 0, 0),
            (Color::White, PieceType::Spider, 1, -1, 0),
            (Color::White, PieceType::Spider, 0, 1, 0),
        ]);
        let targets = adjacent_slide_targets(&board, Coordinate::new(0, 0), Coordinate::new(0, 0));
        assert!(!targets.contains(&Coordinate::new(1, 0)));
    }

    #[test]
    fn test_queen_single_step() {
        let board = line_of_four();
        let moves = queen_bee_moves(&board, Coordinate::new(1, 0));
        assert_eq!(coords(&moves), vec![(0, 1), (1, -1)]);
    }

    #[test]
    fn test_ant_walks_entire_perimeter() {
        let board = line_of_four();
        let moves = soldier_ant_moves(&board, Coordinate::new(1, 0));
        // The remaining 3-tile line is ringed by 10 empty cells; the ant
        // reaches all of them except its own origin.
        assert!(!moves.contains(&Coordinate::new(1, 0)));
        assert_eq!(moves.len(), 9);
        // A far-side cell is reachable by crawling around.
        assert!(moves.contains(&Coordinate::new(-3, 0)));
    }

    #[test]
    fn test_spider_exactly_three_steps() {
        let board = line_of_four();
        let moves = spider_moves(&board, Coordinate::new(1, 0));

        // 1-, 2-, and 4-step destinations are all rejected.
        assert!(!moves.contains(&Coordinate::new(1, -1))); // 1 step
        assert!(!moves.contains(&Coordinate::new(0, -1))); // 2 steps
        assert!(!moves.contains(&Coordinate::new(-2, -1))); // 4 steps

        // Exactly three slide steps along the top of the line.
        assert!(moves.contains(&Coordinate::new(-1, -1)));
        // Or along the bottom.
        assert!(moves.contains(&Coordinate::new(-2, 1)));
    }

    #[test]
    fn test_grasshopper_lands_past_run() {
        // Hopper at (2,0) with a run of three tiles to its west.
        let board = board_with(&[
            (Color::Black, PieceType::Grasshopper, 2, 0, 0),
            (Color::White, PieceType::QueenBee, 1, 0, 0),
            (Color::Black, PieceType::QueenBee, 0, 0, 0),
            (Color::White, PieceType::Spider, -1, 0, 0),
        ]);
        let moves = grasshopper_moves(&board, Coordinate::new(2, 0));
        // One direction has neighbors, so one jump: over the full run.
        assert_eq!(coords(&moves), vec![(-2, 0)]);
    }

    #[test]
    fn test_grasshopper_no_neighbor_no_move() {
        let board = board_with(&[
            (Color::Black, PieceType::Grasshopper, 0, 0, 0),
            (Color::White, PieceType::QueenBee, 0, 1, 0),
        ]);
        let moves = grasshopper_moves(&board, Coordinate::new(0, 0));
        // Only the one occupied direction yields a jump.
        assert_eq!(coords(&moves), vec![(0, 2)]);
    }

    #[test]
    fn test_ladybug_two_over_one_down() {
        let board = board_with(&[
            (Color::Black, PieceType::Ladybug, 1, 0, 0),
            (Color::White, PieceType::QueenBee, 0, 0, 0),
            (Color::Black, PieceType::QueenBee, -1, 0, 0),
        ]);
        let moves = ladybug_moves(&board, Coordinate::new(1, 0));

        // Two hops (0,0) -> (-1,0), then down to any empty neighbor of (-1,0).
        for expected in [(-2, 0), (-2, 1), (-1, -1), (-1, 1), (0, -1)] {
            assert!(
                moves.contains(&Coordinate::new(expected.0, expected.1)),
                "missing {expected:?} in {:?}",
                coords(&moves)
            );
        }
        // Its own origin is occupied, never a destination.
        assert!(!moves.contains(&Coordinate::new(1, 0)));
    }

    #[test]
    fn test_beetle_climbs_and_rounds_the_rim() {
        let board = board_with(&[
            (Color::Black, PieceType::Beetle, 1, 0, 0),
            (Color::White, PieceType::QueenBee, 0, 0, 0),
        ]);
        let moves = beetle_moves(&board, Color::Black, Coordinate::new(1, 0));

        // Climb onto the queen.
        assert!(moves.contains(&Coordinate::new(0, 0)));
        // Rim cells from rotating the occupied direction either way.
        assert!(moves.contains(&Coordinate::new(0, 1)));
        assert!(moves.contains(&Coordinate::new(1, -1)));
        assert_eq!(moves.len(), 3);
    }

    #[test]
    fn test_beetle_ignores_freedom_gate() {
        // Both flanks of the slide from (0,0) to (1,0) are filled; a queen
        // could not squeeze through, but the beetle climbs across.
        let board = board_with(&[
            (Color::Black, PieceType::Beetle, 0, 0, 0),
            (Color::White, PieceType::QueenBee, 1, -1, 0),
            (Color::White, PieceType::Spider, 0, 1, 0),
        ]);
        let moves = beetle_moves(&board, Color::Black, Coordinate::new(0, 0));
        assert!(moves.contains(&Coordinate::new(1, 0)));
    }

    #[test]
    fn test_mosquito_mimics_spider_neighbor() {
        let board = board_with(&[
            (Color::Black, PieceType::Mosquito, 1, 0, 0),
            (Color::White, PieceType::Spider, 0, 0, 0),
            (Color::Black, PieceType::QueenBee, -1, 0, 0),
        ]);
        let mosquito = mosquito_moves(&board, Color::Black, Coordinate::new(1, 0));
        let spider = spider_moves(&board, Coordinate::new(1, 0));
        assert_eq!(mosquito, spider);
    }

    #[test]
    fn test_mosquito_on_stack_moves_like_beetle() {
        let board = board_with(&[
            (Color::White, PieceType::QueenBee, 0, 0, 0),
            (Color::Black, PieceType::Mosquito, 0, 0, 1),
            (Color::White, PieceType::SoldierAnt, 1, 0, 0),
        ]);
        let mosquito = mosquito_moves(&board, Color::Black, Coordinate::new(0, 0));
        let beetle = beetle_step_targets(&board, Coordinate::new(0, 0));
        assert_eq!(mosquito, beetle);
    }

    #[test]
    fn test_mosquito_never_mimics_mosquito() {
        let board = board_with(&[
            (Color::Black, PieceType::Mosquito, 1, 0, 0),
            (Color::White, PieceType::Mosquito, 0, 0, 0),
        ]);
        let moves = mosquito_moves(&board, Color::Black, Coordinate::new(1, 0));
        assert!(moves.is_empty());
    }
}
