//! The world grid and its tick engine.
//!
//! A tick makes two passes over the grid. The first scans rows bottom to top and
//! handles everything that falls, slides, sinks or spreads. The second scans top
//! to bottom and lets gases rise. A per-tick [`ProcessedSet`] records every
//! position that took part in a swap so nothing moves twice.

use crate::block::BlockType;
use crate::grid::{Cell, Direction, Grid};
use crate::processed::ProcessedSet;
use crate::rng::{RandomSource, SeededRandom};

/// Swaps performed by one tick, by rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickSummary {
    pub falls: usize,
    pub sinks: usize,
    pub slides: usize,
    pub flows: usize,
    pub rises: usize,
}

impl TickSummary {
    pub fn moves(&self) -> usize {
        self.falls + self.sinks + self.slides + self.flows + self.rises
    }
}

/// Which rule moved a cell during the first pass.
enum Moved {
    Fell,
    Sank,
    Slid,
    Flowed,
}

pub struct World<R = SeededRandom> {
    grid: Grid,
    processed: ProcessedSet,
    rng: R,
    ticks: u64,
}

impl World<SeededRandom> {
    /// Create an air-filled world with an entropy-seeded generator.
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_random(width, height, SeededRandom::from_entropy())
    }

    /// Create an air-filled world whose coin flips are reproducible.
    pub fn with_seed(width: u32, height: u32, seed: u64) -> Self {
        Self::with_random(width, height, SeededRandom::new(seed))
    }
}

impl<R: RandomSource> World<R> {
    pub fn with_random(width: u32, height: u32, rng: R) -> Self {
        Self::from_grid(Grid::new(width, height), rng)
    }

    /// Take ownership of an existing grid.
    pub fn from_grid(grid: Grid, rng: R) -> Self {
        log::info!("Creating {}x{} world", grid.width(), grid.height());
        let processed = ProcessedSet::new(grid.len());
        Self {
            grid,
            processed,
            rng,
            ticks: 0,
        }
    }

    pub fn width(&self) -> u32 {
        self.grid.width()
    }

    pub fn height(&self) -> u32 {
        self.grid.height()
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn rng(&self) -> &R {
        &self.rng
    }

    pub fn rng_mut(&mut self) -> &mut R {
        &mut self.rng
    }

    /// Number of ticks run since creation.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Positions that took part in a swap during the most recent tick.
    pub fn last_processed(&self) -> &ProcessedSet {
        &self.processed
    }

    /// Fill the whole world with air.
    pub fn initialize(&mut self) {
        self.grid.initialize();
    }

    pub fn get_block(&self, x: i32, y: i32) -> Option<Cell> {
        self.grid.get(x, y)
    }

    pub fn set_block(&mut self, x: i32, y: i32, cell: Cell) -> bool {
        let written = self.grid.set(x, y, cell);
        if !written {
            log::debug!("Ignoring write of {} outside world at ({}, {})", cell.kind, x, y);
        }
        written
    }

    /// Paint a `width`-wide square brush centred on `(cx, cy)`.
    ///
    /// The brush is clipped to the world and leaves cells that already hold
    /// `kind` alone. Returns the number of cells written.
    pub fn paint(&mut self, cx: i32, cy: i32, width: u32, kind: BlockType) -> usize {
        let half = (width.max(1) / 2) as i32;
        let x_range =
            cx.saturating_sub(half).max(0)..=cx.saturating_add(half).min(self.width() as i32 - 1);
        let y_range =
            cy.saturating_sub(half).max(0)..=cy.saturating_add(half).min(self.height() as i32 - 1);

        let mut written = 0;
        for y in y_range {
            for x in x_range.clone() {
                match self.grid.get(x, y) {
                    Some(cell) if cell.kind != kind => {
                        self.grid.set(x, y, Cell::new(kind));
                        written += 1;
                    }
                    _ => {}
                }
            }
        }
        log::debug!("Painted {} {} cells around ({}, {})", written, kind, cx, cy);
        written
    }

    /// Advance the world by one step.
    pub fn tick(&mut self) -> TickSummary {
        self.processed.reset(self.grid.len());
        let mut summary = TickSummary::default();
        let width = self.width() as i32;
        let height = self.height() as i32;

        for y in 0..height {
            for x in 0..width {
                match self.update_cell(x, y) {
                    Some(Moved::Fell) => summary.falls += 1,
                    Some(Moved::Sank) => summary.sinks += 1,
                    Some(Moved::Slid) => summary.slides += 1,
                    Some(Moved::Flowed) => summary.flows += 1,
                    None => {}
                }
            }
        }

        for y in (0..height).rev() {
            for x in 0..width {
                if self.rise(x, y) {
                    summary.rises += 1;
                }
            }
        }

        self.ticks += 1;
        log::trace!("Tick {}: {:?}", self.ticks, summary);
        summary
    }

    /// First-pass rules for the cell at `(x, y)`.
    fn update_cell(&mut self, x: i32, y: i32) -> Option<Moved> {
        let index = self.grid.index(x, y)?;
        if self.processed.contains(index) {
            return None;
        }
        let cell = self.grid.get(x, y)?;
        if cell.is_gas() {
            return None;
        }

        if y > 0 && cell.has_gravity() {
            if let Some(below) = self.open(x, y - 1) {
                let below_cell = self.cell_at(below);
                if below_cell.is_passable() {
                    self.swap_marked(index, below);
                    return Some(Moved::Fell);
                }

                if !cell.is_fluid() && below_cell.is_fluid() {
                    // Last resort: trade places with the fluid directly. This can
                    // carry fluid a long way up through a pile of sinking blocks.
                    let target = self.displacement_target(x, y).unwrap_or(below);
                    self.swap_marked(index, target);
                    // `below` took part even when the block went elsewhere.
                    self.processed.mark(below);
                    return Some(Moved::Sank);
                }
            }
        }

        if cell.can_slide() {
            if let Some(target) = self.slide_target(x, y, cell.kind) {
                self.swap_marked(index, target);
                return Some(Moved::Slid);
            }
        }

        if cell.is_fluid() && self.flow(x, y, index) {
            return Some(Moved::Flowed);
        }

        None
    }

    /// First passable cell a block sinking from `(x, y)` into a fluid swaps with:
    /// above, then the diagonals one and two rows down, then the sides.
    fn displacement_target(&mut self, x: i32, y: i32) -> Option<usize> {
        if let Some(above) = self.vacant(x, y + 1) {
            return Some(above);
        }
        for dy in [-1, -2, 0] {
            let left = self.vacant(x - 1, y + dy);
            let right = self.vacant(x + 1, y + dy);
            if let Some(target) = self.pick(left, right) {
                return Some(target);
            }
        }
        None
    }

    fn slide_target(&mut self, x: i32, y: i32, kind: BlockType) -> Option<usize> {
        let left = self.slide_side(x - 1, y, kind);
        let right = self.slide_side(x + 1, y, kind);
        self.pick(left, right)
    }

    /// A diagonal slide into column `x` needs both the cell beside the block and
    /// the cell below that to make way.
    fn slide_side(&self, x: i32, y: i32, kind: BlockType) -> Option<usize> {
        let beside = self.grid.get(x, y)?;
        let target = self.open(x, y - 1)?;
        let diagonal = self.cell_at(target);
        let gives_way = |c: Cell| c.is_passable() || c.is_fluid();
        (gives_way(beside) && gives_way(diagonal) && diagonal.kind != kind).then_some(target)
    }

    /// Lateral spreading of a fluid. The cell keeps its direction as it moves so
    /// it keeps flowing the same way on later ticks.
    fn flow(&mut self, x: i32, y: i32, index: usize) -> bool {
        let left = self.vacant(x - 1, y);
        let right = self.vacant(x + 1, y);

        let direction = match (left, right) {
            (None, None) => return false,
            (Some(_), None) => Direction::Left,
            (None, Some(_)) => Direction::Right,
            (Some(_), Some(_)) => match self.cell_at(index).direction {
                Direction::None => {
                    if self.rng.next_bool() {
                        Direction::Left
                    } else {
                        Direction::Right
                    }
                }
                current => current,
            },
        };

        if let Some(cell) = self.grid.get_mut(x, y) {
            cell.direction = direction;
        }

        let target = match direction {
            Direction::Left => left,
            Direction::Right => right,
            Direction::None => None,
        };
        match target {
            Some(target) => {
                self.swap_marked(index, target);
                true
            }
            None => false,
        }
    }

    /// Second-pass rule: a gas moves up into a passable cell of another kind.
    fn rise(&mut self, x: i32, y: i32) -> bool {
        let Some(index) = self.grid.index(x, y) else {
            return false;
        };
        if self.processed.contains(index) {
            return false;
        }
        let Some(cell) = self.grid.get(x, y) else {
            return false;
        };
        if !cell.is_gas() {
            return false;
        }

        match self.vacant(x, y + 1) {
            Some(above) if self.cell_at(above).kind != cell.kind => {
                self.swap_marked(index, above);
                true
            }
            _ => false,
        }
    }

    /// Index of `(x, y)` if a moving block may take part in a swap with it.
    ///
    /// Passable cells can always be filled. Anything else must not have moved
    /// yet this tick.
    fn open(&self, x: i32, y: i32) -> Option<usize> {
        let index = self.grid.index(x, y)?;
        let cell = self.cell_at(index);
        (cell.is_passable() || !self.processed.contains(index)).then_some(index)
    }

    /// Index of `(x, y)` if it is in bounds and passable.
    fn vacant(&self, x: i32, y: i32) -> Option<usize> {
        let index = self.grid.index(x, y)?;
        self.cell_at(index).is_passable().then_some(index)
    }

    /// Choose between two candidates, flipping a coin only when both are valid.
    fn pick(&mut self, left: Option<usize>, right: Option<usize>) -> Option<usize> {
        match (left, right) {
            (Some(l), Some(r)) => Some(if self.rng.next_bool() { l } else { r }),
            (l, r) => l.or(r),
        }
    }

    #[inline]
    fn cell_at(&self, index: usize) -> Cell {
        self.grid.cell(index)
    }

    fn swap_marked(&mut self, a: usize, b: usize) {
        self.grid.swap(a, b);
        self.processed.mark(a);
        self.processed.mark(b);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::SequenceRandom;

    fn world(rows: &[&str], flips: &[bool]) -> World<SequenceRandom> {
        let grid = Grid::from_rows(rows).expect("valid test grid");
        World::from_grid(grid, SequenceRandom::new(flips.iter().copied()))
    }

    fn picture(rows: &[&str]) -> String {
        let mut out = rows.join("\n");
        out.push('\n');
        out
    }

    fn assert_grid<R: RandomSource>(world: &World<R>, rows: &[&str]) {
        assert_eq!(world.grid().to_string(), picture(rows));
    }

    #[test]
    fn lone_sand_falls_one_cell() {
        let mut w = world(&["...", ".s.", "..."], &[]);
        let summary = w.tick();
        assert_grid(&w, &["...", "...", ".s."]);
        assert_eq!(summary.falls, 1);
        assert_eq!(summary.moves(), 1);
        assert_eq!(w.rng().draws(), 0);
    }

    #[test]
    fn sand_on_rock_with_blocked_diagonals_stays() {
        let mut w = world(&[".s.", "###"], &[]);
        let summary = w.tick();
        assert_grid(&w, &[".s.", "###"]);
        assert_eq!(summary.moves(), 0);
        assert_eq!(w.rng().draws(), 0);
    }

    #[test]
    fn falling_column_moves_together() {
        let mut w = world(&["s", "s", "."], &[]);
        let summary = w.tick();
        assert_grid(&w, &[".", "s", "s"]);
        assert_eq!(summary.falls, 2);
    }

    #[test]
    fn water_falls_before_spreading() {
        let mut w = world(&["...", ".~.", "..."], &[]);
        w.tick();
        assert_grid(&w, &["...", "...", ".~."]);
        assert_eq!(w.rng().draws(), 0);
    }

    #[test]
    fn sinking_sand_swaps_with_the_cell_above_first() {
        let mut w = world(&["#.#", "#s#", "#~#"], &[]);
        let summary = w.tick();
        assert_grid(&w, &["#s#", "#.#", "#~#"]);
        assert_eq!(summary.sinks, 1);
        assert_eq!(w.rng().draws(), 0);

        // The water stayed put but still counts as part of the move.
        let below = w.grid().index(1, 0).unwrap();
        assert!(w.last_processed().contains(below));
        assert_eq!(w.last_processed().count(), 3);
    }

    #[test]
    fn sinking_sand_takes_a_diagonal_freed_earlier_in_the_tick() {
        // The water is boxed in when its turn comes. The sand beside it then
        // falls and leaves the lower right diagonal of the upper sand open.
        let mut w = world(&["###", "#s#", "#~s", "##."], &[]);
        let summary = w.tick();
        assert_grid(&w, &["###", "#.#", "#~s", "##s"]);
        assert_eq!(summary.falls, 1);
        assert_eq!(summary.sinks, 1);
        assert_eq!(w.rng().draws(), 0);

        let below = w.grid().index(1, 1).unwrap();
        assert!(w.last_processed().contains(below));
    }

    #[test]
    fn sinking_sand_flips_between_lower_diagonals() {
        // Above and the first diagonal pair are walled in; both cells two rows
        // down are free, so one coin flip decides. `false` picks the right side.
        let mut w = world(&["###", "#s#", "#~#", ".#."], &[false]);
        w.tick();
        assert_grid(&w, &["###", "#.#", "#~#", ".#s"]);
        assert_eq!(w.rng().draws(), 1);
    }

    #[test]
    fn sinking_sand_uses_side_cells_last() {
        let mut w = world(&["###", ".s#", "#~#", "###"], &[]);
        w.tick();
        assert_grid(&w, &["###", "s.#", "#~#", "###"]);
        assert_eq!(w.rng().draws(), 0);
    }

    #[test]
    fn sinking_sand_swaps_with_water_as_last_resort() {
        let mut w = world(&["###", "#s#", "#~#"], &[]);
        let summary = w.tick();
        assert_grid(&w, &["###", "#~#", "#s#"]);
        assert_eq!(summary.sinks, 1);
    }

    #[test]
    fn sand_slides_with_one_coin_flip() {
        let mut w = world(&[".s.", ".#."], &[true]);
        let summary = w.tick();
        assert_grid(&w, &["...", "s#."]);
        assert_eq!(summary.slides, 1);
        assert_eq!(w.rng().draws(), 1);
    }

    #[test]
    fn slide_needs_the_side_cell_clear() {
        let mut w = world(&[".s#", ".#."], &[]);
        w.tick();
        assert_grid(&w, &["..#", "s#."]);
        assert_eq!(w.rng().draws(), 0);
    }

    #[test]
    fn gravel_does_not_slide() {
        let mut w = world(&[".g.", ".#."], &[]);
        let summary = w.tick();
        assert_grid(&w, &[".g.", ".#."]);
        assert_eq!(summary.moves(), 0);
    }

    #[test]
    fn water_picks_a_random_direction_when_both_sides_are_open() {
        let mut w = world(&[".~."], &[true]);
        let summary = w.tick();
        assert_grid(&w, &["~.."]);
        assert_eq!(summary.flows, 1);
        assert_eq!(w.get_block(0, 0).map(|c| c.direction), Some(Direction::Left));
        assert_eq!(w.get_block(1, 0), Some(Cell::AIR));
        assert_eq!(w.rng().draws(), 1);
    }

    #[test]
    fn water_keeps_flowing_the_way_it_was_going() {
        let mut w = world(&[".....", "#####"], &[]);
        w.set_block(
            2,
            1,
            Cell {
                kind: BlockType::Water,
                direction: Direction::Right,
            },
        );
        w.tick();
        assert_grid(&w, &["...~.", "#####"]);
        assert_eq!(w.get_block(3, 1).map(|c| c.direction), Some(Direction::Right));
        w.tick();
        assert_grid(&w, &["....~", "#####"]);
        assert_eq!(w.rng().draws(), 0);
    }

    #[test]
    fn water_turns_toward_the_only_open_side() {
        let mut w = world(&["#~."], &[]);
        w.set_block(
            1,
            0,
            Cell {
                kind: BlockType::Water,
                direction: Direction::Left,
            },
        );
        w.tick();
        assert_grid(&w, &["#.~"]);
        assert_eq!(w.get_block(2, 0).map(|c| c.direction), Some(Direction::Right));
        assert_eq!(w.rng().draws(), 0);
    }

    #[test]
    fn boxed_in_water_keeps_its_direction() {
        let mut w = world(&["#~#"], &[]);
        let water = Cell {
            kind: BlockType::Water,
            direction: Direction::Left,
        };
        w.set_block(1, 0, water);
        let summary = w.tick();
        assert_eq!(w.get_block(1, 0), Some(water));
        assert_eq!(summary.moves(), 0);
    }

    #[test]
    fn moved_water_is_not_displaced_again_in_the_same_tick() {
        // The water flows left under the sand. The sand would otherwise fall
        // back on its last-resort swap and move that water a second time.
        let mut w = world(&["s#.", ".~#"], &[]);
        let summary = w.tick();
        assert_grid(&w, &["s#.", "~.#"]);
        assert_eq!(summary.flows, 1);
        assert_eq!(summary.sinks, 0);
    }

    #[test]
    fn fallen_water_does_not_spread_in_the_same_tick() {
        let mut w = world(&[".~.", "...", "###"], &[]);
        let summary = w.tick();
        assert_grid(&w, &["...", ".~.", "###"]);
        assert_eq!(summary.falls, 1);
        assert_eq!(summary.flows, 0);
        assert_eq!(w.rng().draws(), 0);
    }

    #[test]
    fn smoke_rises_into_air() {
        let mut w = world(&[".", "^"], &[]);
        let summary = w.tick();
        assert_grid(&w, &["^", "."]);
        assert_eq!(summary.rises, 1);
    }

    #[test]
    fn smoke_column_rises_together() {
        let mut w = world(&[".", "^", "^"], &[]);
        w.tick();
        assert_grid(&w, &["^", "^", "."]);
    }

    #[test]
    fn smoke_stops_under_ceiling_and_solids() {
        let mut w = world(&["^#", ".^"], &[]);
        let summary = w.tick();
        assert_grid(&w, &["^#", ".^"]);
        assert_eq!(summary.rises, 0);
    }

    #[test]
    fn all_air_is_a_fixed_point() {
        let mut w = World::with_random(8, 8, SequenceRandom::default());
        let before = w.grid().clone();
        for _ in 0..10 {
            assert_eq!(w.tick().moves(), 0);
        }
        assert_eq!(w.grid(), &before);
        assert_eq!(w.rng().draws(), 0);
        assert_eq!(w.ticks(), 10);
    }

    #[test]
    fn accessors_reject_out_of_bounds() {
        let mut w = World::with_seed(4, 3, 1);
        let sand = Cell::new(BlockType::Sand);
        assert_eq!(w.get_block(4, 0), None);
        assert_eq!(w.get_block(0, 3), None);
        assert_eq!(w.get_block(-1, 0), None);
        assert!(!w.set_block(4, 0, sand));
        assert!(!w.set_block(0, 3, sand));
        assert!(!w.set_block(0, -1, sand));
        assert_eq!(w.grid().count(BlockType::Sand), 0);
    }

    #[test]
    fn initialize_clears_the_world() {
        let mut w = World::with_seed(3, 3, 1);
        w.paint(1, 1, 3, BlockType::Rock);
        w.initialize();
        assert_eq!(w.grid().count(BlockType::Air), 9);
    }

    #[test]
    fn paint_clips_and_skips_matching_cells() {
        let mut w = World::with_seed(4, 4, 1);
        assert_eq!(w.paint(1, 1, 3, BlockType::Sand), 9);
        assert_eq!(w.paint(1, 1, 3, BlockType::Sand), 0);
        assert_eq!(w.paint(0, 3, 3, BlockType::Rock), 4);
        assert_eq!(w.paint(3, 3, 1, BlockType::Water), 1);
        assert_eq!(w.paint(10, 10, 3, BlockType::Water), 0);
        assert_eq!(w.grid().count(BlockType::Sand), 7);
    }

    #[test]
    fn paint_near_the_coordinate_limits_is_clipped() {
        let mut w = World::with_seed(4, 4, 1);
        assert_eq!(w.paint(i32::MAX, 0, 3, BlockType::Sand), 0);
        assert_eq!(w.paint(i32::MIN, i32::MIN, 3, BlockType::Sand), 0);
        assert_eq!(w.paint(i32::MAX, i32::MAX, 5, BlockType::Sand), 0);
        assert_eq!(w.paint(1, 1, u32::MAX, BlockType::Rock), 16);
    }

    #[test]
    fn processed_set_covers_every_swap() {
        let mut w = world(&[".", "s", "."], &[]);
        w.tick();
        let processed = w.last_processed();
        assert_eq!(processed.count(), 2);
        assert!(processed.contains(0) && processed.contains(1));
        assert!(!processed.contains(2));
    }
}
