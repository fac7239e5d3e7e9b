//! Fixed-size cell storage with bounds-checked access.
//!
//! Row 0 is the bottom of the world and `y` grows upward. Coordinates are
//! signed so that neighbor probes like `x - 1` at the left edge are simply out of
//! bounds instead of wrapping.

use std::fmt;

use crate::block::BlockType;
use crate::error::ParseGridError;

/// Lateral flow direction remembered by fluid cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    #[default]
    None,
    Left,
    Right,
}

/// `direction` is only meaningful while `kind` is a fluid; other kinds carry
/// whatever value they were created or swapped with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Cell {
    pub kind: BlockType,
    pub direction: Direction,
}

impl Cell {
    pub const AIR: Cell = Cell::new(BlockType::Air);

    pub const fn new(kind: BlockType) -> Self {
        Self {
            kind,
            direction: Direction::None,
        }
    }

    #[inline]
    pub const fn has_gravity(&self) -> bool {
        self.kind.has_gravity()
    }

    #[inline]
    pub const fn is_passable(&self) -> bool {
        self.kind.is_passable()
    }

    #[inline]
    pub const fn can_slide(&self) -> bool {
        self.kind.can_slide()
    }

    #[inline]
    pub const fn is_fluid(&self) -> bool {
        self.kind.is_fluid()
    }

    #[inline]
    pub const fn is_gas(&self) -> bool {
        self.kind.is_gas()
    }
}

impl From<BlockType> for Cell {
    fn from(kind: BlockType) -> Self {
        Cell::new(kind)
    }
}

/// Row-major `width * height` array of cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: u32,
    height: u32,
    cells: Vec<Cell>,
}

impl Grid {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::AIR; width as usize * height as usize],
        }
    }

    /// Build a grid from rows of [`BlockType::glyph`] characters, top row first.
    /// This is the same picture the `Display` impl prints.
    pub fn from_rows(rows: &[&str]) -> Result<Self, ParseGridError> {
        let width = rows.first().map_or(0, |r| r.chars().count());
        let height = rows.len();
        let mut grid = Grid::new(width as u32, height as u32);

        for (row, line) in rows.iter().enumerate() {
            let found = line.chars().count();
            if found != width {
                return Err(ParseGridError::Ragged {
                    row,
                    expected: width,
                    found,
                });
            }
            let y = (height - 1 - row) as i32;
            for (x, glyph) in line.chars().enumerate() {
                let kind = BlockType::from_glyph(glyph).ok_or(ParseGridError::UnknownGlyph {
                    glyph,
                    x: x as u32,
                    y: y as u32,
                })?;
                grid.set(x as i32, y, Cell::new(kind));
            }
        }
        Ok(grid)
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[inline]
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height
    }

    #[inline]
    pub fn index(&self, x: i32, y: i32) -> Option<usize> {
        if self.in_bounds(x, y) {
            Some(y as usize * self.width as usize + x as usize)
        } else {
            None
        }
    }

    pub fn get(&self, x: i32, y: i32) -> Option<Cell> {
        self.index(x, y).map(|i| self.cells[i])
    }

    /// Overwrite a cell. Returns `false` without touching the grid when
    /// `(x, y)` is out of bounds.
    pub fn set(&mut self, x: i32, y: i32, cell: Cell) -> bool {
        match self.index(x, y) {
            Some(i) => {
                self.cells[i] = cell;
                true
            }
            None => false,
        }
    }

    #[inline]
    pub(crate) fn cell(&self, index: usize) -> Cell {
        self.cells[index]
    }

    /// Mutable access used by the tick engine to update a fluid's direction.
    pub(crate) fn get_mut(&mut self, x: i32, y: i32) -> Option<&mut Cell> {
        let i = self.index(x, y)?;
        Some(&mut self.cells[i])
    }

    pub fn initialize(&mut self) {
        self.cells.fill(Cell::AIR);
    }

    /// Swap two in-bounds cells. Both cells move whole, direction included.
    pub(crate) fn swap(&mut self, a: usize, b: usize) {
        self.cells.swap(a, b);
    }

    pub fn cells(&self) -> impl Iterator<Item = &Cell> + '_ {
        self.cells.iter()
    }

    pub fn count(&self, kind: BlockType) -> usize {
        self.cells.iter().filter(|c| c.kind == kind).count()
    }

    /// Number of cells of each kind, indexed by [`BlockType::id`].
    pub fn histogram(&self) -> [usize; BlockType::ALL.len()] {
        let mut counts = [0; BlockType::ALL.len()];
        for cell in &self.cells {
            counts[cell.kind.id() as usize] += 1;
        }
        counts
    }
}

/// ASCII dump with the top row printed first.
impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in (0..self.height as i32).rev() {
            for x in 0..self.width as i32 {
                let glyph = self.get(x, y).map_or(' ', |c| c.kind.glyph());
                write!(f, "{glyph}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
