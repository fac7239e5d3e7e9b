//! Paint brush state for an interactive front end.

use crate::block::BlockType;
use crate::rng::RandomSource;
use crate::world::World;

/// Square brush with an odd width, so it always has a centre cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Brush {
    pub kind: BlockType,
    width: u32,
    max_width: u32,
}

impl Brush {
    /// A one-cell sand brush for a world `world_width` cells wide. The brush
    /// can grow until it covers the whole width.
    pub fn new(world_width: u32) -> Self {
        let max_width = if world_width % 2 == 0 {
            world_width + 1
        } else {
            world_width.max(1)
        };
        Self {
            kind: BlockType::Sand,
            width: 1,
            max_width,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn grow(&mut self) {
        self.width = (self.width + 2).min(self.max_width);
    }

    pub fn shrink(&mut self) {
        self.width = self.width.saturating_sub(2).max(1);
    }

    pub fn next_kind(&mut self) {
        self.kind = self.kind.next();
    }

    pub fn prev_kind(&mut self) {
        self.kind = self.kind.prev();
    }

    /// Paint the selected kind centred on `(x, y)`.
    pub fn apply<R: RandomSource>(&self, world: &mut World<R>, x: i32, y: i32) -> usize {
        world.paint(x, y, self.width, self.kind)
    }
}
