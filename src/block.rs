//! Block kinds and the capability table that drives the tick rules.
//!
//! Every rule in the tick engine asks questions of a block's capabilities rather
//! than of its kind, so adding a block is a matter of adding a variant and a row
//! in [`BlockType::capabilities`].

use std::fmt;
use std::ops::BitOr;
use std::str::FromStr;

use crate::error::ParseBlockError;

/// Physical capability flags of a block kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Capabilities(pub u8);

impl Capabilities {
    /// No capabilities: a static, solid block.
    pub const NONE: Self = Self(0);

    /// Falls when the cell below is passable.
    pub const HAS_GRAVITY: Self = Self(1 << 0);

    pub const IS_PASSABLE: Self = Self(1 << 1);

    /// Rolls diagonally down when blocked from falling straight.
    pub const CAN_SLIDE: Self = Self(1 << 2);

    /// Spreads sideways and can be displaced by sinking solids.
    pub const IS_FLUID: Self = Self(1 << 3);

    pub const IS_GAS: Self = Self(1 << 4);

    #[inline]
    pub const fn contains(self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }

    #[inline]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }
}

impl BitOr for Capabilities {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

/// A kind of block that can occupy a grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[repr(u8)]
pub enum BlockType {
    #[default]
    Air = 0,
    Sand = 1,
    Gravel = 2,
    Rock = 3,
    Water = 4,
    Smoke = 5,
}

impl BlockType {
    pub const ALL: [BlockType; 6] = [
        BlockType::Air,
        BlockType::Sand,
        BlockType::Gravel,
        BlockType::Rock,
        BlockType::Water,
        BlockType::Smoke,
    ];

    pub const fn capabilities(self) -> Capabilities {
        match self {
            BlockType::Air => Capabilities::IS_PASSABLE,
            BlockType::Sand => Capabilities::HAS_GRAVITY.union(Capabilities::CAN_SLIDE),
            BlockType::Gravel => Capabilities::HAS_GRAVITY,
            BlockType::Rock => Capabilities::NONE,
            BlockType::Water => Capabilities::HAS_GRAVITY.union(Capabilities::IS_FLUID),
            BlockType::Smoke => Capabilities::IS_GAS,
        }
    }

    #[inline]
    pub const fn has_gravity(self) -> bool {
        self.capabilities().contains(Capabilities::HAS_GRAVITY)
    }

    #[inline]
    pub const fn is_passable(self) -> bool {
        self.capabilities().contains(Capabilities::IS_PASSABLE)
    }

    #[inline]
    pub const fn can_slide(self) -> bool {
        self.capabilities().contains(Capabilities::CAN_SLIDE)
    }

    #[inline]
    pub const fn is_fluid(self) -> bool {
        self.capabilities().contains(Capabilities::IS_FLUID)
    }

    #[inline]
    pub const fn is_gas(self) -> bool {
        self.capabilities().contains(Capabilities::IS_GAS)
    }

    /// Numeric id used by the byte-oriented wasm interface.
    #[inline]
    pub const fn id(self) -> u8 {
        self as u8
    }

    pub fn from_id(id: u8) -> Option<BlockType> {
        Self::ALL.get(id as usize).copied()
    }

    /// The next kind in id order, wrapping back to `Air`.
    pub fn next(self) -> BlockType {
        Self::ALL[(self.id() as usize + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> BlockType {
        let len = Self::ALL.len();
        Self::ALL[(self.id() as usize + len - 1) % len]
    }

    pub const fn name(self) -> &'static str {
        match self {
            BlockType::Air => "Air",
            BlockType::Sand => "Sand",
            BlockType::Gravel => "Gravel",
            BlockType::Rock => "Rock",
            BlockType::Water => "Water",
            BlockType::Smoke => "Smoke",
        }
    }

    /// Single character used by the ASCII grid dump.
    pub const fn glyph(self) -> char {
        match self {
            BlockType::Air => '.',
            BlockType::Sand => 's',
            BlockType::Gravel => 'g',
            BlockType::Rock => '#',
            BlockType::Water => '~',
            BlockType::Smoke => '^',
        }
    }

    pub fn from_glyph(glyph: char) -> Option<BlockType> {
        Self::ALL.iter().copied().find(|kind| kind.glyph() == glyph)
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BlockType {
    type Err = ParseBlockError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ParseBlockError {
                name: trimmed.to_string(),
            })
    }
}
