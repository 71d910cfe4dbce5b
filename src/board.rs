//! Data model and board queries.
//!
//! A Hive board is an ordered list of [`Tile`]s; positions are unbounded
//! axial hex coordinates and a position may hold several tiles stacked on
//! top of each other. Nothing here is cached: with at most 26 tiles in play
//! every query recomputes from the tile list.

use crate::hex::Coordinate;
use rustc_hash::FxHashSet;
use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

// ============================================================================
// Color
// ============================================================================

/// Player color. Black always moves first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Color {
    Black = 0,
    White = 1,
}

impl Color {
    #[inline]
    pub fn opponent(&self) -> Self {
        match self {
            Color::Black => Color::White,
            Color::White => Color::Black,
        }
    }

    /// Decode the wire integer (`0 = Black, 1 = White`).
    #[inline]
    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            0 => Some(Color::Black),
            1 => Some(Color::White),
            _ => None,
        }
    }
}

// Colors travel as bare integers on the wire, not as variant names.
impl Serialize for Color {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u8(*self as u8)
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let v = u8::deserialize(deserializer)?;
        Color::from_u8(v).ok_or_else(|| de::Error::custom(format!("invalid color code {v}")))
    }
}

// ============================================================================
// PieceType
// ============================================================================

/// The seven Hive piece types. Discriminants are the wire encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PieceType {
    QueenBee = 0,
    SoldierAnt = 1,
    Grasshopper = 2,
    Spider = 3,
    Beetle = 4,
    Ladybug = 5,
    Mosquito = 6,
}

/// All piece types in wire order. The closed set backs the reserve array
/// and the placement enumeration.
pub const ALL_PIECE_TYPES: [PieceType; 7] = [
    PieceType::QueenBee,
    PieceType::SoldierAnt,
    PieceType::Grasshopper,
    PieceType::Spider,
    PieceType::Beetle,
    PieceType::Ladybug,
    PieceType::Mosquito,
];

impl PieceType {
    /// Decode the wire integer (`0..=6`).
    #[inline]
    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            0 => Some(PieceType::QueenBee),
            1 => Some(PieceType::SoldierAnt),
            2 => Some(PieceType::Grasshopper),
            3 => Some(PieceType::Spider),
            4 => Some(PieceType::Beetle),
            5 => Some(PieceType::Ladybug),
            6 => Some(PieceType::Mosquito),
            _ => None,
        }
    }

    /// How many of this piece each color starts with in reserve.
    #[inline]
    pub fn initial_count(&self) -> u8 {
        match self {
            PieceType::QueenBee => 1,
            PieceType::SoldierAnt => 3,
            PieceType::Grasshopper => 3,
            PieceType::Spider => 2,
            PieceType::Beetle => 2,
            PieceType::Ladybug => 1,
            PieceType::Mosquito => 1,
        }
    }
}

impl Serialize for PieceType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u8(*self as u8)
    }
}

impl<'de> Deserialize<'de> for PieceType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let v = u8::deserialize(deserializer)?;
        PieceType::from_u8(v)
            .ok_or_else(|| de::Error::custom(format!("invalid piece type code {v}")))
    }
}

// ============================================================================
// Tile
// ============================================================================

/// One physical piece on the board. `stack_height` is the zero-based index
/// within the pile of tiles sharing `position`; only the tile with the
/// greatest height there is "on top".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tile {
    pub color: Color,
    pub position: Coordinate,
    pub piece_type: PieceType,
    pub stack_height: u32,
}

// ============================================================================
// Reserve
// ============================================================================

/// Unplaced pieces for one color, keyed by the closed `PieceType` set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reserve([u8; 7]);

impl Default for Reserve {
    fn default() -> Self {
        let mut counts = [0u8; 7];
        for piece_type in ALL_PIECE_TYPES {
            counts[piece_type as usize] = piece_type.initial_count();
        }
        Reserve(counts)
    }
}

impl Reserve {
    #[inline]
    pub fn count(&self, piece_type: PieceType) -> u8 {
        self.0[piece_type as usize]
    }

    /// True if no piece of any type remains.
    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|&c| c == 0)
    }

    /// Remove one piece of the given type. The caller must have checked the
    /// count first; a zero count here is a broken engine invariant.
    pub fn take(&mut self, piece_type: PieceType) {
        let count = &mut self.0[piece_type as usize];
        if *count == 0 {
            panic!(
                "reserve underflow for {piece_type:?}: placement was validated against an empty reserve"
            );
        }
        *count -= 1;
    }
}

// The wire shape is a map from piece-type code to remaining count.
impl Serialize for Reserve {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(7))?;
        for piece_type in ALL_PIECE_TYPES {
            map.serialize_entry(&(piece_type as u8), &self.count(piece_type))?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Reserve {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct ReserveVisitor;

        impl<'de> Visitor<'de> for ReserveVisitor {
            type Value = Reserve;

            fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                f.write_str("a map from piece type code to count")
            }

            fn visit_map<A>(self, mut access: A) -> Result<Reserve, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut counts = [0u8; 7];
                while let Some((piece_type, count)) = access.next_entry::<PieceType, u8>()? {
                    counts[piece_type as usize] = count;
                }
                Ok(Reserve(counts))
            }
        }

        deserializer.deserialize_map(ReserveVisitor)
    }
}

// ============================================================================
// Board
// ============================================================================

/// The ordered tile list plus the queries every other component is built on.
/// Serializes as the bare tile array (the `tiles` wire field).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Board {
    tiles: Vec<Tile>,
}

impl Board {
    pub fn new() -> Self {
        Board { tiles: Vec::new() }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    #[inline]
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Tile> {
        self.tiles.iter()
    }

    /// Append a tile. The caller (the turn controller) is responsible for
    /// having validated the placement.
    pub fn push(&mut self, tile: Tile) {
        self.tiles.push(tile);
    }

    /// The tile with the greatest stack height at `position`, if any.
    pub fn top_tile_at(&self, position: Coordinate) -> Option<&Tile> {
        self.tiles
            .iter()
            .filter(|t| t.position == position)
            .max_by_key(|t| t.stack_height)
    }

    /// Index of the topmost tile at `position`, for in-place mutation.
    pub(crate) fn top_tile_index(&self, position: Coordinate) -> Option<usize> {
        self.tiles
            .iter()
            .enumerate()
            .filter(|(_, t)| t.position == position)
            .max_by_key(|(_, t)| t.stack_height)
            .map(|(i, _)| i)
    }

    pub(crate) fn tile_mut(&mut self, index: usize) -> &mut Tile {
        &mut self.tiles[index]
    }

    /// The stack height a tile landing on `position` would take:
    /// one above the current top, or 0 for an empty cell.
    pub fn next_stack_height(&self, position: Coordinate) -> u32 {
        self.top_tile_at(position)
            .map(|t| t.stack_height + 1)
            .unwrap_or(0)
    }

    #[inline]
    pub fn is_occupied(&self, position: Coordinate) -> bool {
        self.tiles.iter().any(|t| t.position == position)
    }

    /// The set of distinct occupied positions (stacks collapse to one entry).
    pub fn occupied_positions(&self) -> FxHashSet<Coordinate> {
        self.tiles.iter().map(|t| t.position).collect()
    }
}

// ============================================================================
// Tests
// ============================================================================
