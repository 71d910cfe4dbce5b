//! Rules engine for the board game Hive.
//!
//! The crate is organized bottom-up:
//! - [`hex`] — axial coordinate arithmetic and rotations
//! - [`board`] — tiles, stacks, reserves and the wire representation
//! - [`moves`] — per-piece destination generators and the One Hive check
//! - [`game`] — placement and movement validation, turn flow, win detection
//!
//! [`game::GameState`] is the entry point: deserialize one from the wire
//! format (or start from [`game::GameState::new`]), drive it with
//! `place_tile` / `move_tile`, and poll `is_over` for the result.

pub mod board;
pub mod game;
pub mod hex;
pub mod moves;

pub use board::{Board, Color, PieceType, Reserve, Tile};
pub use game::{GameState, Outcome};
pub use hex::Coordinate;
